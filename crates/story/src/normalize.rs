//! Stage, date and time normalization for raw match rows.

use serde::{Deserialize, Serialize};

/// Normalized tournament stage.
///
/// A closed set plus `Other`, which keeps an unrecognized label lowercased
/// and truncated to 30 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    GroupStage,
    SecondGroupStage,
    RoundOf16,
    QuarterFinals,
    SemiFinals,
    ThirdPlace,
    FinalRound,
    Final,
    PlayOff,
    Unknown,
    Other(String),
}

impl Stage {
    pub fn label(&self) -> &str {
        match self {
            Stage::GroupStage => "group stage",
            Stage::SecondGroupStage => "second group stage",
            Stage::RoundOf16 => "round of 16",
            Stage::QuarterFinals => "quarter-finals",
            Stage::SemiFinals => "semi-finals",
            Stage::ThirdPlace => "third-place match",
            Stage::FinalRound => "final round",
            Stage::Final => "final",
            Stage::PlayOff => "play-off",
            Stage::Unknown => "unknown",
            Stage::Other(raw) => raw,
        }
    }

    /// Which history section accompanies a match of this stage.
    pub fn history_key(&self) -> HistoryKey {
        match self {
            Stage::GroupStage | Stage::SecondGroupStage => HistoryKey::Groups,
            Stage::SemiFinals | Stage::ThirdPlace => HistoryKey::Semis,
            Stage::Final => HistoryKey::Final,
            _ => HistoryKey::Overview,
        }
    }

    /// Short axis label used by the insights flow diagram.
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Stage::GroupStage => "Group",
            Stage::SecondGroupStage => "2nd Group",
            Stage::RoundOf16 => "R16",
            Stage::QuarterFinals => "QF",
            Stage::SemiFinals => "SF",
            Stage::ThirdPlace => "3rd",
            Stage::FinalRound => "Final Round",
            Stage::Final => "Final",
            _ => "Other",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a raw stage label. Checks run in precedence order, so
/// "3rd Place Play-off" is a third-place match and "Final Round" is not a
/// final.
pub fn normalize_stage(raw: &str) -> Stage {
    let s = raw.trim().to_lowercase();
    if s.is_empty() {
        return Stage::Unknown;
    }
    if (s.contains("third") || s.contains("3rd")) && s.contains("place") {
        return Stage::ThirdPlace;
    }
    if s.contains("play-off") || s.contains("playoff") {
        return Stage::PlayOff;
    }
    if s.contains("final round") {
        return Stage::FinalRound;
    }
    if s == "final" {
        return Stage::Final;
    }
    if s.contains("semi") {
        return Stage::SemiFinals;
    }
    if s.contains("quarter") {
        return Stage::QuarterFinals;
    }
    if s.contains("round of 16") {
        return Stage::RoundOf16;
    }
    if s.contains("second group") {
        return Stage::SecondGroupStage;
    }
    if s.contains("group") {
        return Stage::GroupStage;
    }
    Stage::Other(s.chars().take(30).collect::<String>().trim().to_string())
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryKey {
    Overview,
    Groups,
    Semis,
    Final,
    Champion,
    Facts,
}

impl HistoryKey {
    pub fn as_str(self) -> &'static str {
        match self {
            HistoryKey::Overview => "overview",
            HistoryKey::Groups => "groups",
            HistoryKey::Semis => "semis",
            HistoryKey::Final => "final",
            HistoryKey::Champion => "champion",
            HistoryKey::Facts => "facts",
        }
    }
}

/// `M/D/YYYY` to `YYYY-MM-DD`. ISO dates pass through; anything else is `None`.
pub fn parse_mdy_to_iso(raw: &str) -> Option<String> {
    let s = raw.trim();
    if s.contains('/') {
        let parts: Vec<&str> = s.split('/').map(str::trim).collect();
        let [m, d, y] = parts.as_slice() else {
            return None;
        };
        let (m, d, y) = (m.parse::<u32>().ok()?, d.parse::<u32>().ok()?, y.parse::<u32>().ok()?);
        if !(1..=12).contains(&m) || !(1..=31).contains(&d) || y < 1000 {
            return None;
        }
        return Some(format!("{y:04}-{m:02}-{d:02}"));
    }
    if is_iso_date(s) { Some(s.to_string()) } else { None }
}

fn is_iso_date(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b[4] == b'-'
        && b[7] == b'-'
        && b.iter()
            .enumerate()
            .all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit())
}

/// `H:MM` or `HH:MM` to `HH:MM`; blank is midnight; anything else is `None`.
pub fn parse_time_hhmm(raw: &str) -> Option<String> {
    let s = raw.trim();
    if s.is_empty() {
        return Some("00:00".to_string());
    }
    let (h, m) = s.split_once(':')?;
    if h.is_empty() || h.len() > 2 || m.len() != 2 {
        return None;
    }
    let (h, m) = (h.parse::<u32>().ok()?, m.parse::<u32>().ok()?);
    if h > 23 || m > 59 {
        return None;
    }
    Some(format!("{h:02}:{m:02}"))
}
