//! Panel visibility and the content each panel shows.

use std::collections::BTreeSet;

use serde::Serialize;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum PanelId {
    Title,
    History,
    MatchDetail,
    Champion,
    FactsLogo,
    Overlay,
}

impl PanelId {
    pub const ALL: [PanelId; 6] = [
        PanelId::Title,
        PanelId::History,
        PanelId::MatchDetail,
        PanelId::Champion,
        PanelId::FactsLogo,
        PanelId::Overlay,
    ];
}

/// Screen layout the story is in. Exactly one at a time.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
pub enum PanelState {
    #[default]
    Hidden,
    /// Tournament title in the middle of the screen.
    CenteredTitle,
    /// Map on the left, title and history on the right.
    Split,
    Match,
    Champion,
    Facts,
}

/// The panels that are visible in `state`. Everything else is hidden.
pub fn visible_panels(state: PanelState) -> BTreeSet<PanelId> {
    let ids: &[PanelId] = match state {
        PanelState::Hidden => &[],
        PanelState::CenteredTitle => &[PanelId::Title],
        PanelState::Split => &[PanelId::Title, PanelId::History],
        PanelState::Match => &[
            PanelId::Title,
            PanelId::History,
            PanelId::MatchDetail,
            PanelId::Overlay,
        ],
        PanelState::Champion => &[PanelId::Title, PanelId::History, PanelId::Champion],
        PanelState::Facts => &[PanelId::Title, PanelId::History, PanelId::FactsLogo],
    };
    ids.iter().copied().collect()
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum TitleDock {
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamLine {
    pub name: String,
    pub flag_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PanelContent {
    Title {
        dock: TitleDock,
        text: String,
        flags: Vec<String>,
    },
    History {
        title: String,
        text: String,
        mascot: Option<String>,
    },
    MatchDetail {
        phase: String,
        date: String,
        time: String,
        city: String,
        stadium: String,
        home: TeamLine,
        away: TeamLine,
        score: String,
        result: String,
    },
    Champion {
        name: String,
        flag: String,
    },
    FactsLogo {
        src: String,
        fallback: String,
    },
    /// The overlay carries no content of its own; it is placed separately.
    Overlay,
}

#[cfg(test)]
mod tests {
    use super::{PanelId, PanelState, visible_panels};
    use pretty_assertions::assert_eq;

    #[test]
    fn hidden_shows_nothing() {
        assert!(visible_panels(PanelState::Hidden).is_empty());
    }

    #[test]
    fn match_state_includes_overlay_and_detail() {
        let v: Vec<PanelId> = visible_panels(PanelState::Match).into_iter().collect();
        assert_eq!(
            v,
            vec![
                PanelId::Title,
                PanelId::History,
                PanelId::MatchDetail,
                PanelId::Overlay
            ]
        );
    }

    #[test]
    fn overlay_only_in_match_state() {
        for state in [
            PanelState::Hidden,
            PanelState::CenteredTitle,
            PanelState::Split,
            PanelState::Champion,
            PanelState::Facts,
        ] {
            assert!(!visible_panels(state).contains(&PanelId::Overlay), "{state:?}");
        }
    }
}
