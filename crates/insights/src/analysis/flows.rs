use formats::{MatchRow, TournamentRecord};
use serde::{Deserialize, Serialize};
use story::normalize::normalize_stage;

use super::OrderedTally;

pub const CHAMPION_GOAL_BUCKETS: [&str; 5] = [
    "0-49 goals",
    "50-99 goals",
    "100-149 goals",
    "150-199 goals",
    "200+ goals",
];

pub const MATCH_GOAL_BUCKETS: [&str; 4] = ["0–1", "2–3", "4–5", "6+"];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Anything other than `"asc"` sorts descending.
    pub fn parse(raw: &str) -> SortOrder {
        if raw.trim().eq_ignore_ascii_case("asc") {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowNode {
    pub name: String,
}

/// `source` and `target` index into [`FlowGraph::nodes`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowLink {
    pub source: usize,
    pub target: usize,
    pub value: u32,
}

/// Two-column flow diagram: left nodes first, then the bucket column.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FlowGraph {
    pub nodes: Vec<FlowNode>,
    pub links: Vec<FlowLink>,
}

impl FlowGraph {
    fn with_columns<'a>(
        left: impl IntoIterator<Item = &'a str>,
        right: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let nodes = left
            .into_iter()
            .chain(right)
            .map(|name| FlowNode {
                name: name.to_string(),
            })
            .collect();
        Self {
            nodes,
            links: Vec::new(),
        }
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.name == name)
    }

    fn link(&mut self, from: &str, to: &str, value: u32) {
        if let (Some(source), Some(target)) = (self.index_of(from), self.index_of(to)) {
            self.links.push(FlowLink {
                source,
                target,
                value,
            });
        }
    }
}

fn champion_bucket(goals: u32) -> &'static str {
    match goals {
        0..50 => CHAMPION_GOAL_BUCKETS[0],
        50..100 => CHAMPION_GOAL_BUCKETS[1],
        100..150 => CHAMPION_GOAL_BUCKETS[2],
        150..200 => CHAMPION_GOAL_BUCKETS[3],
        _ => CHAMPION_GOAL_BUCKETS[4],
    }
}

fn match_bucket(goals: u32) -> &'static str {
    match goals {
        0..=1 => MATCH_GOAL_BUCKETS[0],
        2..=3 => MATCH_GOAL_BUCKETS[1],
        4..=5 => MATCH_GOAL_BUCKETS[2],
        _ => MATCH_GOAL_BUCKETS[3],
    }
}

pub struct Flows;

impl Flows {
    /// Goals every champion nation scored across all matches. Champions that
    /// never appear in `rows` get no node.
    pub fn champion_goals(
        rows: &[MatchRow],
        cups: &[TournamentRecord],
        order: SortOrder,
    ) -> FlowGraph {
        let mut champions: Vec<&str> = Vec::new();
        for cup in cups {
            let Some(name) = cup.champion.as_ref().map(|c| c.name.as_str()) else {
                continue;
            };
            if !name.is_empty() && !champions.contains(&name) {
                champions.push(name);
            }
        }

        let mut goals = OrderedTally::new();
        for row in rows {
            if champions.contains(&row.home_team_name.as_str()) {
                goals.add(row.home_team_name.as_str(), row.home_goals());
            }
            if champions.contains(&row.away_team_name.as_str()) {
                goals.add(row.away_team_name.as_str(), row.away_goals());
            }
        }

        let mut ranked: Vec<(&str, u32)> = champions
            .iter()
            .filter_map(|name| goals.get(name).map(|g| (*name, g)))
            .collect();
        match order {
            SortOrder::Desc => ranked.sort_by(|a, b| b.1.cmp(&a.1)),
            SortOrder::Asc => ranked.sort_by(|a, b| a.1.cmp(&b.1)),
        }

        let mut graph = FlowGraph::with_columns(
            ranked.iter().map(|(name, _)| *name),
            CHAMPION_GOAL_BUCKETS,
        );
        for (name, total) in &ranked {
            graph.link(name, champion_bucket(*total), *total);
        }
        graph
    }

    /// Match count per (stage, total goals) pair. Stages appear in the order
    /// they are first seen.
    pub fn stage_goals(rows: &[MatchRow]) -> FlowGraph {
        if rows.is_empty() {
            return FlowGraph::default();
        }
        let mut counts = OrderedTally::new();
        for row in rows {
            let stage = normalize_stage(&row.stage_name).abbreviation();
            let bucket = match_bucket(row.home_goals() + row.away_goals());
            counts.add((stage, bucket), 1);
        }
        let entries = counts.into_entries();

        let mut stages: Vec<&str> = Vec::new();
        for ((stage, _), _) in &entries {
            if !stages.contains(stage) {
                stages.push(*stage);
            }
        }

        let mut graph = FlowGraph::with_columns(stages, MATCH_GOAL_BUCKETS);
        for ((stage, bucket), count) in entries {
            graph.link(stage, bucket, count);
        }
        graph
    }
}
