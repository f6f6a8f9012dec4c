use formats::MatchRow;
use serde::Serialize;

use super::OrderedTally;

/// Undirected meeting count; `source` sorts before `target`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RivalryLink {
    pub source: String,
    pub target: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RivalryNetwork {
    pub teams: Vec<String>,
    pub links: Vec<RivalryLink>,
}

pub struct Rivalries;

impl Rivalries {
    /// The `top_n` most frequent teams and every pairing among them met at
    /// least `min_matches` times. Rows missing either team are skipped.
    pub fn network(rows: &[MatchRow], top_n: usize, min_matches: u32) -> RivalryNetwork {
        let mut pairs = OrderedTally::new();
        let mut appearances = OrderedTally::new();
        let mut skipped = 0usize;

        for row in rows {
            let home = row.home_team_name.as_str();
            let away = row.away_team_name.as_str();
            if !home.is_empty() {
                appearances.add(home, 1);
            }
            if !away.is_empty() {
                appearances.add(away, 1);
            }
            if home.is_empty() || away.is_empty() {
                skipped += 1;
                continue;
            }
            pairs.add(if home <= away { (home, away) } else { (away, home) }, 1);
        }
        if skipped > 0 {
            tracing::debug!(target: "insights", skipped, "rows without both teams left out of the network");
        }

        let mut teams: Vec<&str> = appearances
            .into_ranked()
            .into_iter()
            .map(|(team, _)| team)
            .collect();
        teams.truncate(top_n);

        let links = pairs
            .into_entries()
            .into_iter()
            .filter(|((a, b), count)| {
                *count >= min_matches && teams.contains(a) && teams.contains(b)
            })
            .map(|((a, b), count)| RivalryLink {
                source: a.to_string(),
                target: b.to_string(),
                count,
            })
            .collect();

        RivalryNetwork {
            teams: teams.into_iter().map(str::to_string).collect(),
            links,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Rivalries, RivalryLink};
    use crate::report::{row, test_rows};
    use pretty_assertions::assert_eq;

    #[test]
    fn top_teams_and_repeat_pairings() {
        let network = Rivalries::network(&test_rows(), 3, 2);
        assert_eq!(network.teams, vec!["Italy", "Brazil", "Uruguay"]);
        assert_eq!(
            network.links,
            vec![RivalryLink {
                source: "Brazil".into(),
                target: "Italy".into(),
                count: 2,
            }]
        );
    }

    #[test]
    fn links_need_both_teams_in_the_top_set() {
        let network = Rivalries::network(&test_rows(), 2, 1);
        assert_eq!(network.teams, vec!["Italy", "Brazil"]);
        assert_eq!(network.links.len(), 1);

        let network = Rivalries::network(&test_rows(), 15, 1);
        assert!(network.links.iter().all(|l| l.source < l.target));
        assert!(network.links.iter().any(|l| l.source == "Peru" && l.target == "Uruguay"));
    }

    #[test]
    fn rows_missing_a_team_only_count_appearances() {
        let rows = vec![row("WC-1930", "group stage", "Uruguay", "", 1, 0)];
        let network = Rivalries::network(&rows, 15, 1);
        assert_eq!(network.teams, vec!["Uruguay"]);
        assert!(network.links.is_empty());
    }
}
