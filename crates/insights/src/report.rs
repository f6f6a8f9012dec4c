use formats::{MatchRow, TournamentRecord};
use serde::Serialize;
use story::config::InsightsConfig;

use crate::analysis::champions::{ChampionCount, Champions};
use crate::analysis::flows::{FlowGraph, Flows, SortOrder};
use crate::analysis::network::{Rivalries, RivalryNetwork};
use crate::analysis::teams::{TeamRecord, Teams};
use crate::confederation::RegionFilter;

/// Everything the insights block plots, serialized for the page's charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsReport {
    pub champions: Vec<ChampionCount>,
    pub champion_goals: FlowGraph,
    pub stage_goals: FlowGraph,
    pub network: RivalryNetwork,
    pub teams: Vec<TeamRecord>,
}

/// Chart controls: region select, flow order and the network's minimum
/// meeting count.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct ReportOptions {
    pub region: RegionFilter,
    pub order: SortOrder,
    pub min_matches: Option<u32>,
}

impl InsightsReport {
    pub fn build(
        rows: &[MatchRow],
        cups: &[TournamentRecord],
        config: &InsightsConfig,
        options: ReportOptions,
    ) -> Self {
        let min_matches = options.min_matches.unwrap_or(config.network_min_matches);
        let report = Self {
            champions: Champions::top(cups, options.region, config.top_champions),
            champion_goals: Flows::champion_goals(rows, cups, options.order),
            stage_goals: Flows::stage_goals(rows),
            network: Rivalries::network(rows, config.network_top_teams, min_matches),
            teams: Teams::records(rows),
        };
        tracing::debug!(
            target: "insights",
            rows = rows.len(),
            cups = cups.len(),
            champions = report.champions.len(),
            links = report.network.links.len(),
            "insights report built"
        );
        report
    }
}

#[cfg(test)]
pub(crate) fn row(
    tournament: &str,
    stage: &str,
    home: &str,
    away: &str,
    hs: u32,
    aws: u32,
) -> MatchRow {
    let flag = |set: bool| if set { "1" } else { "0" }.to_string();
    MatchRow {
        tournament_id: tournament.into(),
        stage_name: stage.into(),
        home_team_name: home.into(),
        away_team_name: away.into(),
        home_team_score: hs.to_string(),
        away_team_score: aws.to_string(),
        home_team_win: flag(hs > aws),
        away_team_win: flag(aws > hs),
        draw: flag(hs == aws),
        ..MatchRow::default()
    }
}

#[cfg(test)]
pub(crate) fn test_rows() -> Vec<MatchRow> {
    vec![
        row("WC-1930", "group stage", "Uruguay", "Peru", 1, 0),
        row("WC-1930", "final", "Uruguay", "Argentina", 4, 2),
        row("WC-1934", "semi-finals", "Italy", "Austria", 1, 0),
        row("WC-1934", "final", "Italy", "Czechoslovakia", 2, 1),
        row("WC-1950", "group stage", "Uruguay", "Bolivia", 5, 0),
        row("WC-1958", "group stage", "Brazil", "Austria", 3, 0),
        row("WC-1958", "group stage", "England", "Brazil", 0, 0),
        row("WC-1938", "group stage", "Italy", "Brazil", 2, 1),
        row("WC-1958", "final", "Brazil", "Italy", 1, 1),
    ]
}

#[cfg(test)]
pub(crate) fn test_cups() -> Vec<TournamentRecord> {
    let payload = r#"{"cups": [
      {"year": 1930, "host": "Uruguay", "champion": {"name": "Uruguay", "flag": "uy"}},
      {"year": 1934, "host": "Italy", "champion": {"name": "Italy", "flag": "it"}},
      {"year": 1938, "host": "France", "champion": {"name": "Italy", "flag": "it"}},
      {"year": 1950, "host": "Brazil", "champion": {"name": "Uruguay", "flag": "uy"}},
      {"year": 1958, "host": "Sweden", "champion": {"name": "Brazil", "flag": "br"}},
      {"year": 2030, "host": "Morocco"}
    ]}"#;
    formats::TournamentFile::from_json_str(payload)
        .expect("fixture")
        .cups
}

#[cfg(test)]
mod tests {
    use super::{InsightsReport, ReportOptions, test_cups, test_rows};
    use crate::confederation::{Confederation, RegionFilter};
    use pretty_assertions::assert_eq;
    use story::config::InsightsConfig;

    #[test]
    fn builds_every_section() {
        let report = InsightsReport::build(
            &test_rows(),
            &test_cups(),
            &InsightsConfig::default(),
            ReportOptions::default(),
        );
        assert_eq!(report.champions.len(), 3);
        assert_eq!(report.champion_goals.nodes[0].name, "Uruguay");
        assert!(!report.stage_goals.links.is_empty());
        // default threshold of three meetings leaves no links in this fixture
        assert!(report.network.links.is_empty());
        assert_eq!(report.teams[0].team, "Brazil");
    }

    #[test]
    fn options_override_config() {
        let options = ReportOptions {
            region: RegionFilter::Only(Confederation::SouthAmerica),
            min_matches: Some(2),
            ..ReportOptions::default()
        };
        let report = InsightsReport::build(
            &test_rows(),
            &test_cups(),
            &InsightsConfig::default(),
            options,
        );
        let teams: Vec<_> = report.champions.iter().map(|c| c.team.as_str()).collect();
        assert_eq!(teams, vec!["Uruguay", "Brazil"]);
        assert_eq!(report.network.links.len(), 1);
    }

    #[test]
    fn serializes_with_camel_case_sections() {
        let report = InsightsReport::build(
            &test_rows(),
            &test_cups(),
            &InsightsConfig::default(),
            ReportOptions::default(),
        );
        let value = serde_json::to_value(&report).expect("json");
        assert!(value.get("championGoals").is_some());
        assert_eq!(value["champions"][0]["confederation"], "SOUTH_AMERICA");
    }
}
