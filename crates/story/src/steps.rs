//! The ordered narrative sequence, built once from the tournaments.

use crate::tournament::Tournament;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum StepKind {
    Intro,
    World,
    Worldcup,
    Split,
    Match,
    Champion,
    Facts,
    InsightsIntro,
    /// Dashboard chart 1..=3.
    InsightsChart(u8),
    InsightsConclusion,
}

impl StepKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StepKind::Intro => "intro",
            StepKind::World => "world",
            StepKind::Worldcup => "worldcup",
            StepKind::Split => "split",
            StepKind::Match => "match",
            StepKind::Champion => "champion",
            StepKind::Facts => "facts",
            StepKind::InsightsIntro => "insights-intro",
            StepKind::InsightsChart(1) => "insights-chart1",
            StepKind::InsightsChart(2) => "insights-chart2",
            StepKind::InsightsChart(_) => "insights-chart3",
            StepKind::InsightsConclusion => "insights-conclusion",
        }
    }

    pub fn is_insights(self) -> bool {
        matches!(
            self,
            StepKind::InsightsIntro | StepKind::InsightsChart(_) | StepKind::InsightsConclusion
        )
    }

    /// Kinds whose focus updates the scroll-direction estimate.
    pub fn tracks_direction(self) -> bool {
        matches!(self, StepKind::World | StepKind::Worldcup | StepKind::Split)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub kind: StepKind,
    pub year: Option<u16>,
    pub region_name: Option<String>,
    pub co_region_name: Option<String>,
    pub flag_code: Option<String>,
    pub audio_ref: Option<String>,
    pub match_index: Option<usize>,
}

impl Step {
    fn bare(kind: StepKind) -> Self {
        Self {
            kind,
            year: None,
            region_name: None,
            co_region_name: None,
            flag_code: None,
            audio_ref: None,
            match_index: None,
        }
    }

    fn for_tournament(kind: StepKind, t: &Tournament) -> Self {
        Self {
            kind,
            year: Some(t.year),
            region_name: Some(t.host.clone()),
            co_region_name: t.co_host.clone(),
            flag_code: Some(t.host_flag.clone()).filter(|f| !f.is_empty()),
            audio_ref: t.audio.clone(),
            match_index: None,
        }
    }
}

/// Build the full sequence:
///
/// `intro`, then per tournament `world, worldcup, split, match x N, champion,
/// facts`, then `world, insights-intro, insights-chart1..3,
/// insights-conclusion`.
///
/// A per-tournament `world` step carries the year of the tournament it
/// introduces; the closing `world` step carries none.
pub fn build_narrative_steps(tournaments: &[Tournament]) -> Vec<Step> {
    let match_total: usize = tournaments.iter().map(|t| t.matches.len()).sum();
    let mut steps = Vec::with_capacity(1 + tournaments.len() * 5 + match_total + 6);
    steps.push(Step::bare(StepKind::Intro));

    for t in tournaments {
        let mut world = Step::bare(StepKind::World);
        world.year = Some(t.year);
        steps.push(world);
        steps.push(Step::for_tournament(StepKind::Worldcup, t));
        steps.push(Step::for_tournament(StepKind::Split, t));
        for index in 0..t.matches.len() {
            let mut s = Step::for_tournament(StepKind::Match, t);
            s.match_index = Some(index);
            steps.push(s);
        }
        steps.push(Step::for_tournament(StepKind::Champion, t));
        steps.push(Step::for_tournament(StepKind::Facts, t));
    }

    steps.push(Step::bare(StepKind::World));
    steps.push(Step::bare(StepKind::InsightsIntro));
    for chart in 1..=3 {
        steps.push(Step::bare(StepKind::InsightsChart(chart)));
    }
    steps.push(Step::bare(StepKind::InsightsConclusion));
    steps
}

/// Index of the first `worldcup` step after `from`.
pub fn next_worldcup_step(steps: &[Step], from: usize) -> Option<usize> {
    steps
        .iter()
        .enumerate()
        .skip(from.saturating_add(1))
        .find(|(_, s)| s.kind == StepKind::Worldcup)
        .map(|(i, _)| i)
}
