use serde::{Deserialize, Serialize};

use crate::error::FormatError;
use crate::venues::VenueTable;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChampionRecord {
    pub name: String,
    #[serde(default)]
    pub flag: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySectionRecord {
    pub key: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
}

/// One edition as stored in `worldcups.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentRecord {
    pub year: u16,
    pub host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co_host: Option<String>,
    #[serde(default)]
    pub host_flag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co_host_flag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mascot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub champion: Option<ChampionRecord>,
    #[serde(default)]
    pub history_sections: Vec<HistorySectionRecord>,
    #[serde(default)]
    pub venues: VenueTable,
    #[serde(default)]
    pub phase_order: Vec<String>,
}

impl TournamentRecord {
    /// `Tournament Id` value used by the matches CSV.
    pub fn tournament_id(&self) -> String {
        format!("WC-{}", self.year)
    }

    /// Empty strings in the source mean "no co-host".
    pub fn co_host_name(&self) -> Option<&str> {
        self.co_host.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentFile {
    pub cups: Vec<TournamentRecord>,
}

impl TournamentFile {
    pub fn from_json_str(payload: &str) -> Result<Self, FormatError> {
        serde_json::from_str(payload).map_err(|source| FormatError::Json {
            dataset: "worldcups.json",
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::TournamentFile;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_minimal_and_full_records() {
        let payload = r#"{"cups": [
          {"year": 1930, "host": "Uruguay", "hostFlag": "uy"},
          {"year": 2002, "host": "South Korea", "coHost": "Japan", "hostFlag": "kr",
           "coHostFlag": "jp", "audio": "assets/audio/2002.mp3",
           "champion": {"name": "Brazil", "flag": "br"},
           "historySections": [{"key": "overview", "title": "2002", "text": "First Asian cup"}],
           "venues": {"Saitama Stadium": {"lat": 35.9, "lon": 139.7}},
           "phaseOrder": ["group stage", "round of 16", "final"]}
        ]}"#;
        let file = TournamentFile::from_json_str(payload).expect("parse");
        assert_eq!(file.cups.len(), 2);
        let first = &file.cups[0];
        assert_eq!(first.tournament_id(), "WC-1930");
        assert_eq!(first.co_host_name(), None);
        assert!(first.venues.is_empty());

        let second = &file.cups[1];
        assert_eq!(second.co_host_name(), Some("Japan"));
        assert_eq!(second.champion.as_ref().map(|c| c.name.as_str()), Some("Brazil"));
        assert_eq!(second.history_sections[0].key, "overview");
        assert_eq!(second.phase_order, vec!["group stage", "round of 16", "final"]);
    }

    #[test]
    fn blank_co_host_is_none() {
        let payload = r#"{"cups": [{"year": 1934, "host": "Italy", "coHost": "  "}]}"#;
        let file = TournamentFile::from_json_str(payload).expect("parse");
        assert_eq!(file.cups[0].co_host_name(), None);
    }

    #[test]
    fn reports_dataset_name() {
        let err = TournamentFile::from_json_str("{").unwrap_err();
        assert!(err.to_string().contains("worldcups.json"));
    }
}
