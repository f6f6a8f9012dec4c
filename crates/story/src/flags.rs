//! Team code to flag code resolution.
//!
//! The matches CSV carries FIFA-era three letter codes (including codes of
//! states that no longer exist). Flags are keyed by lowercase ISO 3166-1
//! alpha-2, with `gb-*` subdivisions for the home nations.

/// Historic and FIFA-specific codes; consulted first.
const HISTORIC_CODES: &[(&str, &str)] = &[
    ("URY", "uy"), ("ARG", "ar"), ("FRA", "fr"), ("MEX", "mx"), ("PER", "pe"),
    ("ROU", "ro"), ("YUG", "yu"), ("BRA", "br"), ("USA", "us"), ("BEL", "be"),
    ("BOL", "bo"), ("PRY", "py"), ("CHL", "cl"),
    ("URU", "uy"), ("ROM", "ro"), ("PAR", "py"), ("CHI", "cl"),
    ("FRG", "de"), ("GER", "de"), ("GDR", "de"),
    ("URS", "ru"), ("RUS", "ru"),
    ("TCH", "cz"), ("CZE", "cz"), ("SVK", "sk"),
    ("SCG", "rs"), ("SRB", "rs"),
    ("NED", "nl"), ("HOL", "nl"),
    ("KOR", "kr"), ("PRK", "kp"),
    ("CIV", "ci"),
    ("ENG", "gb"),
];

/// ISO 3166-1 alpha-3 (plus a few football-only codes) to alpha-2.
const ISO3_CODES: &[(&str, &str)] = &[
    ("DZA", "dz"), ("AGO", "ao"), ("ARG", "ar"), ("AUS", "au"), ("AUT", "at"),
    ("BEL", "be"), ("BOL", "bo"), ("BIH", "ba"), ("BRA", "br"), ("BGR", "bg"),
    ("CMR", "cm"), ("CAN", "ca"), ("CHL", "cl"), ("CHN", "cn"), ("COL", "co"),
    ("CRI", "cr"), ("HRV", "hr"), ("CUB", "cu"), ("CZE", "cz"), ("CSK", "cz"),
    ("DNK", "dk"), ("IDN", "id"), ("DDR", "de"), ("ECU", "ec"), ("EGY", "eg"),
    ("SLV", "sv"), ("ENG", "gb-eng"), ("FRA", "fr"), ("DEU", "de"), ("GHA", "gh"),
    ("GRC", "gr"), ("HTI", "ht"), ("HND", "hn"), ("HUN", "hu"), ("ISL", "is"),
    ("IRN", "ir"), ("IRQ", "iq"), ("ISR", "il"), ("ITA", "it"), ("CIV", "ci"),
    ("JAM", "jm"), ("JPN", "jp"), ("KWT", "kw"), ("MEX", "mx"), ("MAR", "ma"),
    ("NLD", "nl"), ("NZL", "nz"), ("NGA", "ng"), ("PRK", "kp"), ("NIR", "gb-nir"),
    ("NOR", "no"), ("PAN", "pa"), ("PRY", "py"), ("PER", "pe"), ("POL", "pl"),
    ("PRT", "pt"), ("QAT", "qa"), ("IRL", "ie"), ("ROU", "ro"), ("RUS", "ru"),
    ("SAU", "sa"), ("SCO", "gb-sct"), ("SEN", "sn"), ("SRB", "rs"), ("SCG", "rs"),
    ("SVK", "sk"), ("SVN", "si"), ("ZAF", "za"), ("KOR", "kr"), ("SUN", "ru"),
    ("ESP", "es"), ("SWE", "se"), ("CHE", "ch"), ("TGO", "tg"), ("TTO", "tt"),
    ("TUN", "tn"), ("TUR", "tr"), ("UKR", "ua"), ("ARE", "ae"), ("USA", "us"),
    ("URY", "uy"), ("WAL", "gb-wls"), ("YUG", "rs"), ("COD", "cd"),
];

fn lookup(table: &[(&str, &'static str)], code: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == code).map(|(_, v)| *v)
}

/// Flag code for a team code from the matches CSV.
///
/// Historic table first, then the ISO3 table, otherwise the code lowercased
/// (already-ISO2 codes pass through). Blank input yields an empty code.
pub fn flag_code_for_team(code: &str) -> String {
    let upper = code.trim().to_uppercase();
    if upper.is_empty() {
        return String::new();
    }
    lookup(HISTORIC_CODES, &upper)
        .or_else(|| lookup(ISO3_CODES, &upper))
        .map(str::to_string)
        .unwrap_or_else(|| upper.to_lowercase())
}

/// Split a space-separated flag list (`"kr jp"`) into codes.
pub fn split_flags(flags: &str) -> Vec<String> {
    flags.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::{flag_code_for_team, split_flags};

    #[test]
    fn historic_codes_take_precedence() {
        assert_eq!(flag_code_for_team("FRG"), "de");
        assert_eq!(flag_code_for_team("eng"), "gb");
        assert_eq!(flag_code_for_team("URS"), "ru");
    }

    #[test]
    fn iso3_codes_map_to_iso2() {
        assert_eq!(flag_code_for_team("DEU"), "de");
        assert_eq!(flag_code_for_team("WAL"), "gb-wls");
    }

    #[test]
    fn unknown_codes_are_lowercased() {
        assert_eq!(flag_code_for_team("XYZ"), "xyz");
        assert_eq!(flag_code_for_team(" "), "");
    }

    #[test]
    fn splits_co_host_flags() {
        assert_eq!(split_flags(" kr  jp "), vec!["kr", "jp"]);
        assert!(split_flags("").is_empty());
    }
}
