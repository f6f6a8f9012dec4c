use serde::Serialize;

/// Football region a team plays under, as shown by the champions chart.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Confederation {
    Europe,
    SouthAmerica,
    NorthAmerica,
    Africa,
    Asia,
    Oceania,
    Unknown,
}

impl Confederation {
    pub const ALL: [Confederation; 7] = [
        Confederation::Europe,
        Confederation::SouthAmerica,
        Confederation::NorthAmerica,
        Confederation::Africa,
        Confederation::Asia,
        Confederation::Oceania,
        Confederation::Unknown,
    ];

    pub fn of_team(team: &str) -> Confederation {
        match team.trim() {
            "Uruguay" | "Argentina" | "Brazil" => Confederation::SouthAmerica,
            "Italy" | "Germany" | "West Germany" | "England" | "France" | "Spain"
            | "Netherlands" | "Portugal" | "Croatia" | "Belgium" | "Sweden" => {
                Confederation::Europe
            }
            "United States" | "Mexico" => Confederation::NorthAmerica,
            "Japan" | "South Korea" | "Korea Republic" => Confederation::Asia,
            "Morocco" | "Nigeria" => Confederation::Africa,
            "Australia" => Confederation::Oceania,
            _ => Confederation::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Confederation::Europe => "EUROPE",
            Confederation::SouthAmerica => "SOUTH_AMERICA",
            Confederation::NorthAmerica => "NORTH_AMERICA",
            Confederation::Africa => "AFRICA",
            Confederation::Asia => "ASIA",
            Confederation::Oceania => "OCEANIA",
            Confederation::Unknown => "UNKNOWN",
        }
    }

    pub fn parse(raw: &str) -> Option<Confederation> {
        let key = raw.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(key))
    }
}

impl std::fmt::Display for Confederation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Region selector of the champions chart; `"ALL"` disables filtering.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RegionFilter {
    #[default]
    All,
    Only(Confederation),
}

impl RegionFilter {
    /// Unrecognised values fall back to [`RegionFilter::All`].
    pub fn parse(raw: &str) -> RegionFilter {
        if raw.trim().eq_ignore_ascii_case("ALL") {
            return RegionFilter::All;
        }
        match Confederation::parse(raw) {
            Some(c) => RegionFilter::Only(c),
            None => {
                tracing::debug!(target: "insights", filter = raw, "unknown region filter");
                RegionFilter::All
            }
        }
    }

    pub fn admits(self, confederation: Confederation) -> bool {
        match self {
            RegionFilter::All => true,
            RegionFilter::Only(only) => only == confederation,
        }
    }
}
