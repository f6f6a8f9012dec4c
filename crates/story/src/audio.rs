//! Background track selection.

use crate::present::Presenter;

/// Holds the requested track until the first user gesture unlocks playback.
///
/// Requests for the track already playing are ignored. `stop` also drops any
/// pending request.
#[derive(Debug, Clone, Default)]
pub struct AudioDirector {
    unlocked: bool,
    pending: Option<String>,
    current: Option<String>,
}

impl AudioDirector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn request(&mut self, track: &str, presenter: &mut dyn Presenter) {
        if track.is_empty() {
            return;
        }
        if !self.unlocked {
            self.pending = Some(track.to_string());
            return;
        }
        self.pending = None;
        if self.current.as_deref() == Some(track) {
            return;
        }
        presenter.set_background_track(track);
        self.current = Some(track.to_string());
    }

    /// First gesture. Later calls are no-ops.
    pub fn unlock(&mut self, presenter: &mut dyn Presenter) {
        if self.unlocked {
            return;
        }
        self.unlocked = true;
        if let Some(track) = self.pending.take() {
            self.request(&track, presenter);
        }
    }

    pub fn stop(&mut self, presenter: &mut dyn Presenter) {
        self.pending = None;
        if self.current.take().is_some() {
            presenter.stop_background_track();
        }
    }
}
