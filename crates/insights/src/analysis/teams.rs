use std::collections::BTreeMap;

use formats::MatchRow;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TeamRecord {
    pub team: String,
    pub matches: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
}

impl TeamRecord {
    pub fn goal_difference(&self) -> i64 {
        i64::from(self.goals_for) - i64::from(self.goals_against)
    }

    fn record(&mut self, scored: u32, conceded: u32, won: bool, drawn: bool) {
        self.matches += 1;
        self.goals_for += scored;
        self.goals_against += conceded;
        if won {
            self.wins += 1;
        } else if drawn {
            self.draws += 1;
        } else {
            self.losses += 1;
        }
    }
}

pub struct Teams;

impl Teams {
    /// Per-team totals, most matches first; ties sort by name. Results come
    /// from the win and draw columns, so shoot-out winners count as wins.
    pub fn records(rows: &[MatchRow]) -> Vec<TeamRecord> {
        let mut by_team: BTreeMap<&str, TeamRecord> = BTreeMap::new();
        for row in rows {
            let (home, away) = (row.home_team_name.as_str(), row.away_team_name.as_str());
            if home.is_empty() || away.is_empty() {
                continue;
            }
            let (hg, ag) = (row.home_goals(), row.away_goals());
            let (home_won, away_won) = (row.is_home_win(), row.is_away_win());
            let drawn = row.is_draw() || !(home_won || away_won);

            by_team
                .entry(home)
                .or_insert_with(|| TeamRecord {
                    team: home.to_string(),
                    ..TeamRecord::default()
                })
                .record(hg, ag, home_won, drawn);
            by_team
                .entry(away)
                .or_insert_with(|| TeamRecord {
                    team: away.to_string(),
                    ..TeamRecord::default()
                })
                .record(ag, hg, away_won, drawn);
        }

        let mut records: Vec<TeamRecord> = by_team.into_values().collect();
        records.sort_by(|a, b| b.matches.cmp(&a.matches));
        records
    }

    pub fn find<'a>(records: &'a [TeamRecord], team: &str) -> Option<&'a TeamRecord> {
        records.iter().find(|r| r.team == team)
    }
}

#[cfg(test)]
mod tests {
    use super::{TeamRecord, Teams};
    use crate::report::test_rows;
    use pretty_assertions::assert_eq;

    #[test]
    fn brazil_record() {
        let records = Teams::records(&test_rows());
        let brazil = Teams::find(&records, "Brazil").expect("brazil");
        assert_eq!(
            brazil,
            &TeamRecord {
                team: "Brazil".into(),
                matches: 4,
                wins: 1,
                draws: 2,
                losses: 1,
                goals_for: 5,
                goals_against: 3,
            }
        );
        assert_eq!(brazil.goal_difference(), 2);
    }

    #[test]
    fn ordered_by_matches_then_name() {
        let records = Teams::records(&test_rows());
        let head: Vec<_> = records.iter().take(3).map(|r| r.team.as_str()).collect();
        assert_eq!(head, vec!["Brazil", "Italy", "Uruguay"]);
        let sum_wins: u32 = records.iter().map(|r| r.wins).sum();
        let sum_losses: u32 = records.iter().map(|r| r.losses).sum();
        assert_eq!(sum_wins, sum_losses);
    }
}
