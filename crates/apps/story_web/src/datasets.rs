//! Where the shell looks for each dataset. Candidates are tried in order.

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Dataset {
    Countries,
    Tournaments,
    Matches,
    Venues,
}

impl Dataset {
    pub fn name(self) -> &'static str {
        match self {
            Dataset::Countries => "country geometry",
            Dataset::Tournaments => "worldcups.json",
            Dataset::Matches => "worldcup_matches_1930_2022.csv",
            Dataset::Venues => "venues.json",
        }
    }

    pub fn candidates(self) -> &'static [&'static str] {
        match self {
            Dataset::Countries => &[
                "geo/MEDIAR-MAPA.json",
                "geo/BAJAR-MAPA.json",
                "data/geo/MEDIAR-MAPA.json",
                "data/geo/BAJAR-MAPA.json",
            ],
            Dataset::Tournaments => &["data/worldcups.json", "worldcups.json"],
            Dataset::Matches => &[
                "data/worldcup_matches_1930_2022.csv",
                "worldcup_matches_1930_2022.csv",
            ],
            Dataset::Venues => &["data/venues.json"],
        }
    }

    /// Venues only refine marker placement; the story runs without them.
    pub fn is_optional(self) -> bool {
        matches!(self, Dataset::Venues)
    }
}

pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim().trim_end_matches('/');
    if base.is_empty() {
        path.to_string()
    } else {
        format!("{base}/{path}")
    }
}

pub fn candidate_urls(base: &str, dataset: Dataset) -> Vec<String> {
    dataset
        .candidates()
        .iter()
        .map(|p| join_url(base, p))
        .collect()
}
