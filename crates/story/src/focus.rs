//! Scroll observation: direction, winning step, keyboard navigation.

use foundation::math::stable_total_cmp_f64;

use crate::steps::{Step, StepKind};

/// One observed step as reported by the page's intersection observer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Intersection {
    pub step_index: usize,
    /// Top edge of the step element relative to the viewport, in pixels.
    pub top_px: f64,
    pub is_intersecting: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ScrollDirection {
    #[default]
    Forward,
    Backward,
}

/// Scroll direction from successive offsets. Only a larger offset is
/// forward; an unchanged one counts as backward.
#[derive(Debug, Clone, Default)]
pub struct ScrollTracker {
    last_offset: f64,
    direction: ScrollDirection,
}

impl ScrollTracker {
    /// `initial_offset` is the page's scroll position when observation starts.
    pub fn new(initial_offset: f64) -> Self {
        Self {
            last_offset: initial_offset,
            direction: ScrollDirection::Forward,
        }
    }

    pub fn direction(&self) -> ScrollDirection {
        self.direction
    }

    pub fn observe(&mut self, offset: f64) -> ScrollDirection {
        self.direction = if offset > self.last_offset {
            ScrollDirection::Forward
        } else {
            ScrollDirection::Backward
        };
        self.last_offset = offset;
        self.direction
    }
}

/// The step that takes focus from one observation batch.
///
/// Intersecting entries are ordered by `top_px`. Scrolling forward, the one
/// lowest on screen wins; scrolling backward, the highest.
pub fn select_winning_step(batch: &[Intersection], direction: ScrollDirection) -> Option<usize> {
    let mut hits: Vec<&Intersection> = batch.iter().filter(|e| e.is_intersecting).collect();
    hits.sort_by(|a, b| stable_total_cmp_f64(a.top_px, b.top_px));
    let winner = match direction {
        ScrollDirection::Forward => hits.last(),
        ScrollDirection::Backward => hits.first(),
    };
    winner.map(|e| e.step_index)
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NavAction {
    ScrollToStep(usize),
    ScrollToTop,
    None,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct KeyOutcome {
    pub action: NavAction,
    pub prevent_default: bool,
}

const NEXT_KEYS: [&str; 4] = ["ArrowDown", "ArrowRight", "PageDown", " "];
const PREV_KEYS: [&str; 3] = ["ArrowUp", "ArrowLeft", "PageUp"];

/// Index of the step whose centre is closest to the viewport middle. Ties go
/// to the earlier step.
pub fn current_step_index(step_centers: &[f64], viewport_mid: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, c) in step_centers.iter().enumerate() {
        let d = (c - viewport_mid).abs();
        match best {
            Some((_, bd)) if d >= bd => {}
            _ => best = Some((i, d)),
        }
    }
    best.map(|(i, _)| i)
}

pub fn handle_keyboard_navigation(
    key: &str,
    step_centers: &[f64],
    viewport_mid: f64,
) -> KeyOutcome {
    let next = NEXT_KEYS.contains(&key);
    let prev = PREV_KEYS.contains(&key);
    let prevent_default = key == " ";
    let action = match current_step_index(step_centers, viewport_mid) {
        _ if !next && !prev => NavAction::None,
        None => NavAction::None,
        Some(current) if next => {
            if current + 1 >= step_centers.len() {
                NavAction::ScrollToTop
            } else {
                NavAction::ScrollToStep(current + 1)
            }
        }
        Some(current) => NavAction::ScrollToStep(current.saturating_sub(1)),
    };
    KeyOutcome {
        action,
        prevent_default,
    }
}

/// What the start button does.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StartAction {
    pub scroll_to: Option<usize>,
    pub unlock_audio: bool,
}

/// Scroll to the step after the intro and unlock audio.
pub fn start_action(steps: &[Step]) -> StartAction {
    let after_intro = steps
        .iter()
        .position(|s| s.kind == StepKind::Intro)
        .map(|i| i + 1)
        .filter(|&i| i < steps.len());
    StartAction {
        scroll_to: after_intro,
        unlock_audio: true,
    }
}
