use formats::TournamentRecord;
use serde::Serialize;

use super::OrderedTally;
use crate::confederation::{Confederation, RegionFilter};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChampionCount {
    pub team: String,
    pub titles: u32,
    pub confederation: Confederation,
}

pub struct Champions;

impl Champions {
    /// Titles per champion in first-title order. Editions without a champion
    /// are skipped.
    pub fn counts(cups: &[TournamentRecord]) -> Vec<ChampionCount> {
        let mut tally = OrderedTally::new();
        for cup in cups {
            let Some(name) = cup
                .champion
                .as_ref()
                .map(|c| c.name.trim())
                .filter(|n| !n.is_empty())
            else {
                continue;
            };
            tally.add(name.to_string(), 1);
        }
        tally
            .into_entries()
            .into_iter()
            .map(|(team, titles)| ChampionCount {
                confederation: Confederation::of_team(&team),
                team,
                titles,
            })
            .collect()
    }

    /// Champions inside `filter`, most titles first, at most `limit` entries.
    pub fn top(cups: &[TournamentRecord], filter: RegionFilter, limit: usize) -> Vec<ChampionCount> {
        let mut counts: Vec<ChampionCount> = Self::counts(cups)
            .into_iter()
            .filter(|c| filter.admits(c.confederation))
            .collect();
        counts.sort_by(|a, b| b.titles.cmp(&a.titles));
        counts.truncate(limit);
        counts
    }
}
