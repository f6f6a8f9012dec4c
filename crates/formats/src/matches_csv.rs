use serde::Deserialize;

use crate::error::FormatError;

/// One row of `worldcup_matches_1930_2022.csv`, kept as raw text.
///
/// Columns the story does not use are ignored; missing columns read as empty.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct MatchRow {
    #[serde(rename = "Tournament Id")]
    pub tournament_id: String,
    #[serde(rename = "Stage Name")]
    pub stage_name: String,
    #[serde(rename = "Match Date")]
    pub match_date: String,
    #[serde(rename = "Match Time")]
    pub match_time: String,
    #[serde(rename = "Home Team Name")]
    pub home_team_name: String,
    #[serde(rename = "Away Team Name")]
    pub away_team_name: String,
    #[serde(rename = "Home Team Code")]
    pub home_team_code: String,
    #[serde(rename = "Away Team Code")]
    pub away_team_code: String,
    #[serde(rename = "Home Team Score")]
    pub home_team_score: String,
    #[serde(rename = "Away Team Score")]
    pub away_team_score: String,
    #[serde(rename = "Home Team Win")]
    pub home_team_win: String,
    #[serde(rename = "Away Team Win")]
    pub away_team_win: String,
    #[serde(rename = "Draw")]
    pub draw: String,
    #[serde(rename = "Result")]
    pub result: String,
    #[serde(rename = "Stadium Name")]
    pub stadium_name: String,
    #[serde(rename = "City Name")]
    pub city_name: String,
}

/// Lenient goal count: blank or non-numeric cells count as zero.
pub fn parse_goals(raw: &str) -> u32 {
    let t = raw.trim();
    t.parse::<u32>()
        .ok()
        .or_else(|| t.parse::<f64>().ok().filter(|g| *g >= 0.0).map(|g| g as u32))
        .unwrap_or(0)
}

fn is_flag_set(raw: &str) -> bool {
    matches!(raw.trim(), "1" | "1.0" | "true" | "True" | "TRUE")
}

impl MatchRow {
    pub fn home_goals(&self) -> u32 {
        parse_goals(&self.home_team_score)
    }

    pub fn away_goals(&self) -> u32 {
        parse_goals(&self.away_team_score)
    }

    pub fn is_home_win(&self) -> bool {
        is_flag_set(&self.home_team_win)
    }

    pub fn is_away_win(&self) -> bool {
        is_flag_set(&self.away_team_win)
    }

    pub fn is_draw(&self) -> bool {
        is_flag_set(&self.draw)
    }
}

pub fn read_match_rows(payload: &str) -> Result<Vec<MatchRow>, FormatError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(payload.as_bytes());
    let mut rows = Vec::new();
    for record in reader.deserialize::<MatchRow>() {
        rows.push(record?);
    }
    Ok(rows)
}
