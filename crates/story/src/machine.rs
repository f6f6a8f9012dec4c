//! The scroll-driven state machine.
//!
//! One [`StoryMachine`] per page. Every input carries the host time, so the
//! machine never reads a clock:
//! - `focus` / `observe` start a transition and bump the generation;
//! - `tick` eases the camera, runs the camera arrival follow-up once, then
//!   fires due timers in deadline order.
//!
//! Follow-ups and timers remember the generation that armed them and are
//! dropped when a newer focus has happened since.

use foundation::Time;
use foundation::math::Vec2;
use runtime::{Event, EventBus, TimerId, TimerQueue};
use tracing::{debug, warn};

use crate::active::ActiveRegionState;
use crate::audio::AudioDirector;
use crate::camera::{Camera, CameraTransform};
use crate::focus::{
    Intersection, KeyOutcome, ScrollDirection, ScrollTracker, StartAction,
    handle_keyboard_navigation, select_winning_step, start_action,
};
use crate::overlay::{MarkerPlacement, compute_connector_line, panel_anchor};
use crate::panels::{PanelId, PanelState, visible_panels};
use crate::present::Presenter;
use crate::steps::StepKind;
use crate::transition::{Arrival, AudioCue, PanelAnchor, Story, Transition};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Task {
    AutoAdvance { step: usize, generation: u64 },
    Remeasure { generation: u64 },
}

#[derive(Debug)]
pub struct StoryMachine {
    story: Story,
    camera: Camera<(Arrival, u64)>,
    camera_sent: Option<CameraTransform>,
    timers: TimerQueue<Task>,
    auto_advance: Option<TimerId>,
    audio: AudioDirector,
    scroll: ScrollTracker,
    generation: u64,
    panels: PanelState,
    active: ActiveRegionState,
    marker: Option<MarkerPlacement>,
    anchor: Option<PanelAnchor>,
    last_index: Option<usize>,
    last_kind: Option<StepKind>,
    last_year: Option<u16>,
    moving_backward: bool,
    log: EventBus,
    torn_down: bool,
}

impl StoryMachine {
    pub fn new(story: Story) -> Self {
        let camera = Camera::new(story.world_fit());
        Self {
            story,
            camera,
            camera_sent: None,
            timers: TimerQueue::new(),
            auto_advance: None,
            audio: AudioDirector::new(),
            scroll: ScrollTracker::new(0.0),
            generation: 0,
            panels: PanelState::Hidden,
            active: ActiveRegionState::default(),
            marker: None,
            anchor: None,
            last_index: None,
            last_kind: None,
            last_year: None,
            moving_backward: false,
            log: EventBus::new(),
            torn_down: false,
        }
    }

    /// Seed scroll tracking with the page's offset at load.
    pub fn with_scroll_origin(mut self, offset: f64) -> Self {
        self.scroll = ScrollTracker::new(offset);
        self
    }

    pub fn story(&self) -> &Story {
        &self.story
    }

    pub fn step_count(&self) -> usize {
        self.story.steps().len()
    }

    pub fn panel_state(&self) -> PanelState {
        self.panels
    }

    pub fn active_state(&self) -> &ActiveRegionState {
        &self.active
    }

    pub fn is_moving_backward(&self) -> bool {
        self.moving_backward
    }

    pub fn last_focused(&self) -> Option<usize> {
        self.last_index
    }

    pub fn camera_target(&self) -> CameraTransform {
        self.camera.target()
    }

    pub fn camera_at(&self, now: Time) -> CameraTransform {
        self.camera.current(now)
    }

    pub fn marker(&self) -> Option<&MarkerPlacement> {
        self.marker.as_ref()
    }

    pub fn has_pending_auto_advance(&self) -> bool {
        self.auto_advance.is_some_and(|id| self.timers.is_pending(id))
    }

    pub fn events(&self) -> &[Event] {
        self.log.events()
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.log.drain()
    }

    /// Feed one intersection-observer batch plus the scroll offset it was
    /// observed at.
    pub fn observe(
        &mut self,
        batch: &[Intersection],
        scroll_offset: f64,
        now: Time,
        presenter: &mut dyn Presenter,
    ) {
        let direction = self.scroll.observe(scroll_offset);
        if let Some(index) = select_winning_step(batch, direction) {
            self.focus(index, direction, now, presenter);
        }
    }

    /// Enter step `index`. Repeating a focus re-applies the same state.
    pub fn focus(
        &mut self,
        index: usize,
        direction: ScrollDirection,
        now: Time,
        presenter: &mut dyn Presenter,
    ) {
        if self.torn_down {
            return;
        }
        let Some((kind, year)) = self.story.steps().get(index).map(|s| (s.kind, s.year)) else {
            warn!(target: "story::machine", index, len = self.step_count(), "focus on missing step");
            self.log.emit(now, "skipped", format!("no step {index}"));
            return;
        };

        self.cancel_timers();
        self.generation += 1;
        if kind.tracks_direction() {
            self.moving_backward = self.detect_backward(index, kind, year, direction);
        }
        self.last_index = Some(index);
        self.last_kind = Some(kind);
        if year.is_some() {
            self.last_year = year;
        }

        debug!(
            target: "story::machine",
            index,
            kind = kind.as_str(),
            backward = self.moving_backward,
            generation = self.generation,
            "focus"
        );
        self.log.emit(now, "focus", format!("{index} {}", kind.as_str()));

        match self.story.plan(index) {
            Ok(t) => self.apply(t, now, presenter),
            Err(e) => {
                warn!(target: "story::machine", index, error = %e, "transition skipped");
                self.log.emit(now, "skipped", e.to_string());
            }
        }
    }

    /// Advance animations and timers to `now`.
    pub fn tick(&mut self, now: Time, presenter: &mut dyn Presenter) {
        if self.torn_down {
            return;
        }
        let current = self.camera.current(now);
        if self.camera_sent != Some(current) {
            presenter.set_camera(&current);
            self.camera_sent = Some(current);
        }

        if let Some((arrival, generation)) = self.camera.tick(now) {
            if generation == self.generation {
                self.arrive(arrival, now, presenter);
            } else {
                debug!(target: "story::machine", generation, "stale camera follow-up dropped");
            }
        }

        for (id, task) in self.timers.take_due(now) {
            if self.auto_advance == Some(id) {
                self.auto_advance = None;
            }
            self.run_task(task, now, presenter);
        }
    }

    /// Re-place the champion panel or facts logo and re-measure the connector.
    pub fn on_resize(&mut self, presenter: &mut dyn Presenter) {
        if self.torn_down {
            return;
        }
        self.place_anchor(presenter);
        if self.marker.is_some() {
            self.refresh_connector(presenter);
        }
    }

    /// Any user gesture (pointer or key) unlocks playback.
    pub fn unlock_audio(&mut self, presenter: &mut dyn Presenter) {
        if self.torn_down {
            return;
        }
        self.audio.unlock(presenter);
    }

    /// A key press: counts as a gesture, then resolves navigation against
    /// the current step centres.
    pub fn key_down(
        &mut self,
        key: &str,
        step_centers: &[f64],
        viewport_mid: f64,
        presenter: &mut dyn Presenter,
    ) -> KeyOutcome {
        self.unlock_audio(presenter);
        handle_keyboard_navigation(key, step_centers, viewport_mid)
    }

    /// Start button: unlock audio and report where to scroll.
    pub fn start(&mut self, presenter: &mut dyn Presenter) -> StartAction {
        let action = start_action(self.story.steps());
        if action.unlock_audio {
            self.unlock_audio(presenter);
        }
        action
    }

    /// Stops everything. Later calls on the machine are no-ops.
    pub fn teardown(&mut self, now: Time, presenter: &mut dyn Presenter) {
        if self.torn_down {
            return;
        }
        self.cancel_timers();
        self.camera.clear_hook();
        self.generation += 1;
        self.audio.stop(presenter);
        for id in PanelId::ALL {
            presenter.hide_panel(id);
        }
        presenter.set_connector(None);
        presenter.set_highlight(None);
        self.panels = PanelState::Hidden;
        self.active.clear();
        self.marker = None;
        self.anchor = None;
        self.torn_down = true;
        self.log.emit(now, "teardown", "");
    }

    fn cancel_timers(&mut self) {
        self.timers.cancel_all();
        self.auto_advance = None;
    }

    fn detect_backward(
        &self,
        index: usize,
        kind: StepKind,
        year: Option<u16>,
        direction: ScrollDirection,
    ) -> bool {
        let earlier_year = matches!((year, self.last_year), (Some(y), Some(last)) if y < last);
        let left_insights =
            kind == StepKind::World && self.last_kind.is_some_and(StepKind::is_insights);
        let scrolled_back = direction == ScrollDirection::Backward
            && self.last_index.is_some_and(|last| index < last);
        earlier_year || left_insights || scrolled_back
    }

    fn apply(&mut self, t: Transition, now: Time, presenter: &mut dyn Presenter) {
        for e in &t.degraded {
            warn!(target: "story::machine", kind = t.kind.as_str(), error = %e, "degraded transition");
            self.log.emit(now, "degraded", e.to_string());
        }

        let visible = visible_panels(t.panels);
        for id in PanelId::ALL {
            if !visible.contains(&id) {
                presenter.hide_panel(id);
            }
        }
        for (id, content) in &t.contents {
            presenter.show_panel(*id, content);
        }
        self.panels = t.panels;

        presenter.set_highlight(t.highlight.as_ref());
        if let Some(image) = &t.avatar {
            presenter.set_avatar_image(image);
        }
        match &t.audio {
            AudioCue::Keep => {}
            AudioCue::Request(track) => self.audio.request(track, presenter),
            AudioCue::Stop => self.audio.stop(presenter),
        }
        self.active = t.active;

        let mut defer_anchor = false;
        if let Some(mv) = t.camera {
            defer_anchor = mv.arrival == Some(Arrival::PlaceAnchor);
            let hook = mv.arrival.map(|a| (a, self.generation));
            self.camera.apply_transform(now, mv.target, mv.duration_ms, hook);
        }

        self.marker = t.marker.as_ref().and_then(|req| {
            let placed = self.story.place_marker(req, &self.camera.target());
            if placed.is_none() {
                warn!(target: "story::machine", "no position for the match marker");
            }
            placed
        });
        match &self.marker {
            Some(m) => {
                presenter.place_marker(m);
                self.refresh_connector(presenter);
            }
            None => {
                if visible.contains(&PanelId::Overlay) {
                    presenter.hide_panel(PanelId::Overlay);
                }
                presenter.set_connector(None);
            }
        }

        self.anchor = t.anchor;
        if !defer_anchor {
            self.place_anchor(presenter);
        }
        if let Some(delay) = t.remeasure_after_ms {
            self.timers.schedule(
                now,
                delay,
                Task::Remeasure {
                    generation: self.generation,
                },
            );
        }
    }

    fn arrive(&mut self, arrival: Arrival, now: Time, presenter: &mut dyn Presenter) {
        match arrival {
            Arrival::PreviewNext { step } => {
                let Some(preview) = self.story.preview_after(step) else {
                    return;
                };
                if let Some(track) = &preview.audio {
                    self.audio.request(track, presenter);
                }
                if let Some(h) = &preview.highlight {
                    presenter.set_highlight(Some(h));
                }
                if preview.region.is_some() && !self.moving_backward {
                    let task = Task::AutoAdvance {
                        step: preview.step,
                        generation: self.generation,
                    };
                    let delay = self.story.config().world_auto_enter_ms;
                    self.auto_advance = Some(self.timers.schedule(now, delay, task));
                    self.log.emit(now, "auto-advance-armed", preview.step.to_string());
                }
            }
            Arrival::RemeasureConnector => self.refresh_connector(presenter),
            Arrival::PlaceAnchor => self.place_anchor(presenter),
        }
    }

    fn run_task(&mut self, task: Task, now: Time, presenter: &mut dyn Presenter) {
        match task {
            Task::AutoAdvance { step, generation } if generation == self.generation => {
                debug!(target: "story::machine", step, "auto-advance");
                self.log.emit(now, "auto-advance", step.to_string());
                match self.story.plan(step) {
                    Ok(t) => self.apply(t, now, presenter),
                    Err(e) => warn!(target: "story::machine", step, error = %e, "auto-advance skipped"),
                }
            }
            Task::Remeasure { generation } if generation == self.generation => {
                self.place_anchor(presenter);
            }
            _ => debug!(target: "story::machine", ?task, "stale timer dropped"),
        }
    }

    fn refresh_connector(&self, presenter: &mut dyn Presenter) {
        let inset = self.story.config().overlay.panel_inset;
        let line = self.marker.as_ref().and_then(|m| {
            let rect = presenter.panel_rect(PanelId::MatchDetail)?;
            let to = presenter.screen_to_view(panel_anchor(&rect, inset));
            Some(compute_connector_line(m.anchor, to))
        });
        presenter.set_connector(line.as_ref());
    }

    fn place_anchor(&self, presenter: &mut dyn Presenter) {
        let Some(anchor) = &self.anchor else {
            return;
        };
        let Some(p) = self.story.anchor_point(anchor, &self.camera.target()) else {
            return;
        };
        let mut s = presenter.view_to_screen(p) + anchor.offset;
        if let (Some(pad), Some(vp)) = (anchor.viewport_pad, presenter.viewport()) {
            s = Vec2::new(
                s.x.min(vp.left + vp.width - pad).max(vp.left + pad),
                s.y.min(vp.top + vp.height - pad).max(vp.top + pad),
            );
        }
        presenter.position_panel(anchor.panel, s);
    }
}

#[cfg(test)]
mod tests {
    use super::StoryMachine;
    use crate::config::StoryConfig;
    use crate::focus::{Intersection, NavAction};
    use crate::focus::ScrollDirection::{Backward, Forward};
    use crate::overlay::ScreenRect;
    use crate::panels::{PanelContent, PanelId, PanelState, TitleDock};
    use crate::present::{Command, HighlightStyle, RecordingPresenter};
    use crate::steps::{Step, StepKind};
    use crate::test_support::{square, story, story_with};
    use crate::transition::Story;
    use foundation::Time;
    use foundation::math::Vec2;
    use pretty_assertions::assert_eq;
    use scene::regions::RegionRegistry;

    fn t(ms: f64) -> Time {
        Time(ms)
    }

    fn machine() -> (StoryMachine, RecordingPresenter) {
        (StoryMachine::new(story()), RecordingPresenter::new())
    }

    #[test]
    fn world_auto_advances_forward_after_delay() {
        let (mut m, mut p) = machine();
        m.focus(1, Forward, t(0.0), &mut p);
        assert_eq!(m.panel_state(), PanelState::Hidden);

        m.tick(t(849.0), &mut p);
        assert!(!m.has_pending_auto_advance());
        m.tick(t(850.0), &mut p);
        assert!(m.has_pending_auto_advance());
        let preview = p.last_highlight().flatten().expect("preview highlight");
        assert_eq!(preview.style, HighlightStyle::Preview);

        m.tick(t(1849.0), &mut p);
        assert_eq!(m.panel_state(), PanelState::Hidden);
        m.tick(t(1850.0), &mut p);
        assert_eq!(m.panel_state(), PanelState::CenteredTitle);
        assert!(m.active_state().is_centered);
        match p.content(PanelId::Title) {
            Some(PanelContent::Title { dock, text, flags }) => {
                assert_eq!(*dock, TitleDock::Center);
                assert_eq!(text, "WORLD CUP URUGUAY 1930");
                assert_eq!(flags, &vec!["uy".to_string()]);
            }
            other => panic!("unexpected title {other:?}"),
        }
        assert!(m.events().iter().any(|e| e.kind == "auto-advance"));
    }

    #[test]
    fn backward_world_never_auto_advances() {
        let (mut m, mut p) = machine();
        m.focus(9, Forward, t(0.0), &mut p);
        m.focus(8, Backward, t(10.0), &mut p);
        assert!(m.is_moving_backward());
        m.tick(t(860.0), &mut p);
        assert!(!m.has_pending_auto_advance());
        m.tick(t(5000.0), &mut p);
        assert_eq!(m.panel_state(), PanelState::Hidden);
    }

    #[test]
    fn any_year_decrease_is_backward() {
        let (mut m, mut p) = machine();
        m.focus(9, Forward, t(0.0), &mut p);
        m.focus(1, Forward, t(10.0), &mut p);
        assert!(m.is_moving_backward());
        m.focus(8, Forward, t(20.0), &mut p);
        assert!(!m.is_moving_backward());
    }

    #[test]
    fn returning_from_insights_is_backward() {
        let (mut m, mut p) = machine();
        m.focus(22, Forward, t(0.0), &mut p);
        m.focus(21, Forward, t(10.0), &mut p);
        assert!(m.is_moving_backward());
    }

    #[test]
    fn non_tracking_kinds_keep_the_flag() {
        let (mut m, mut p) = machine();
        m.focus(9, Forward, t(0.0), &mut p);
        m.focus(1, Forward, t(10.0), &mut p);
        m.focus(4, Forward, t(20.0), &mut p);
        assert!(m.is_moving_backward());
    }

    #[test]
    fn manual_focus_cancels_auto_advance() {
        let (mut m, mut p) = machine();
        m.focus(1, Forward, t(0.0), &mut p);
        m.tick(t(850.0), &mut p);
        assert!(m.has_pending_auto_advance());
        m.focus(3, Forward, t(900.0), &mut p);
        assert!(!m.has_pending_auto_advance());
        m.tick(t(3000.0), &mut p);
        assert_eq!(m.panel_state(), PanelState::Split);
        assert!(!m.events().iter().any(|e| e.kind == "auto-advance"));
    }

    #[test]
    fn superseded_world_follow_up_is_dropped() {
        let (mut m, mut p) = machine();
        m.focus(1, Forward, t(0.0), &mut p);
        // charts leave the camera (and its pending follow-up) alone
        m.focus(23, Forward, t(100.0), &mut p);
        m.tick(t(900.0), &mut p);
        assert!(!m.has_pending_auto_advance());
        assert_eq!(p.last_highlight(), Some(None));
    }

    #[test]
    fn repeated_focus_is_idempotent() {
        let (mut m, mut p) = machine();
        m.focus(3, Forward, t(0.0), &mut p);
        let first = p.take_commands();
        m.focus(3, Forward, t(0.0), &mut p);
        assert_eq!(p.take_commands(), first);
        assert_eq!(m.panel_state(), PanelState::Split);
    }

    #[test]
    fn match_places_marker_and_measures_connector_twice() {
        let (mut m, mut p) = machine();
        let rect = ScreenRect {
            left: 620.0,
            top: 200.0,
            width: 320.0,
            height: 160.0,
        };
        p.set_panel_rect(PanelId::MatchDetail, rect);
        m.focus(5, Forward, t(0.0), &mut p);
        assert_eq!(m.panel_state(), PanelState::Match);
        let marker = *m.marker().expect("marker");

        let connectors = |p: &RecordingPresenter| {
            p.commands()
                .iter()
                .filter_map(|c| match c {
                    Command::SetConnector(Some(line)) => Some(*line),
                    _ => None,
                })
                .collect::<Vec<_>>()
        };
        let lines = connectors(&p);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].from, marker.anchor);
        assert_eq!(lines[0].to, Vec2::new(634.0, 280.0));

        m.tick(t(450.0), &mut p);
        assert_eq!(connectors(&p).len(), 2);
        m.tick(t(900.0), &mut p);
        assert_eq!(connectors(&p).len(), 2);
    }

    #[test]
    fn marker_stays_inside_active_region() {
        let (mut m, mut p) = machine();
        m.focus(11, Forward, t(0.0), &mut p);
        let marker = *m.marker().expect("marker on centroid");
        let story = m.story();
        let italy = story.registry().resolve_region("Italy").expect("italy");
        let b = m
            .camera_target()
            .apply_bounds(&italy.main_bounds(story.projection()).expect("bounds"));
        assert!(marker.x >= b.min[0] && marker.x <= b.max[0] - marker.size);
        assert!(marker.y >= b.min[1] && marker.y <= b.max[1] - marker.size);
    }

    #[test]
    fn co_host_match_activates_co_host() {
        let (mut m, mut p) = machine();
        let registry = m.story().registry().clone();
        m.focus(18, Forward, t(0.0), &mut p);
        assert_eq!(m.active_state().primary, registry.resolve("Japan"));
        assert_eq!(m.active_state().region_key.as_deref(), Some("Japan-2002"));
        m.focus(17, Forward, t(10.0), &mut p);
        assert_eq!(m.active_state().primary, registry.resolve("Korea Republic"));
    }

    #[test]
    fn co_host_worldcup_highlights_both() {
        let (mut m, mut p) = machine();
        m.focus(15, Forward, t(0.0), &mut p);
        let h = p.last_highlight().flatten().expect("highlight");
        assert_eq!(h.style, HighlightStyle::Focus);
        assert_eq!(h.regions.len(), 2);
        assert!(m.active_state().secondary.is_some());
        match p.content(PanelId::Title) {
            Some(PanelContent::Title { flags, .. }) => {
                assert_eq!(flags, &vec!["kr".to_string(), "jp".to_string()])
            }
            other => panic!("unexpected title {other:?}"),
        }
    }

    #[test]
    fn champion_is_placed_on_arrival_and_after_settle() {
        let mut p = RecordingPresenter::new().with_viewport(ScreenRect {
            left: 0.0,
            top: 0.0,
            width: 1000.0,
            height: 600.0,
        });
        let mut m = StoryMachine::new(story());
        m.focus(6, Forward, t(0.0), &mut p);
        let placed = |p: &RecordingPresenter| {
            p.count(|c| matches!(c, Command::PositionPanel(PanelId::Champion, _)))
        };
        assert_eq!(placed(&p), 0);
        m.tick(t(450.0), &mut p);
        assert_eq!(placed(&p), 1);
        m.tick(t(520.0), &mut p);
        assert_eq!(placed(&p), 2);
        for c in p.commands() {
            if let Command::PositionPanel(_, at) = c {
                assert!((18.0..=982.0).contains(&at.x) && (18.0..=582.0).contains(&at.y));
            }
        }
        m.on_resize(&mut p);
        assert_eq!(placed(&p), 3);
    }

    #[test]
    fn leaving_champion_drops_settle_timer() {
        let (mut m, mut p) = machine();
        m.focus(6, Forward, t(0.0), &mut p);
        m.focus(7, Forward, t(100.0), &mut p);
        m.tick(t(1000.0), &mut p);
        assert_eq!(
            p.count(|c| matches!(c, Command::PositionPanel(PanelId::Champion, _))),
            0
        );
    }

    #[test]
    fn facts_logo_sits_right_of_host_centre() {
        let (mut m, mut p) = machine();
        m.focus(7, Forward, t(0.0), &mut p);
        let story = m.story();
        let uruguay = story.registry().resolve_region("Uruguay").expect("uruguay");
        let centre = m
            .camera_target()
            .apply(uruguay.main_bounds(story.projection()).expect("bounds").center());
        let at = p
            .commands()
            .iter()
            .find_map(|c| match c {
                Command::PositionPanel(PanelId::FactsLogo, at) => Some(*at),
                _ => None,
            })
            .expect("logo placed");
        assert_eq!(at, Vec2::new(centre.x + 30.0, centre.y));
        assert!(matches!(
            p.content(PanelId::FactsLogo),
            Some(PanelContent::FactsLogo { src, .. }) if src == "assets/logos/1930.png"
        ));
    }

    #[test]
    fn missing_geometry_keeps_panels_and_skips_camera() {
        let mut m = StoryMachine::new(story_with(RegionRegistry::new()));
        let mut p = RecordingPresenter::new();
        let before = m.camera_target();
        m.focus(3, Forward, t(0.0), &mut p);
        assert_eq!(m.panel_state(), PanelState::Split);
        assert!(p.visible().contains(&PanelId::History));
        assert_eq!(m.camera_target(), before);
        assert_eq!(p.last_highlight(), Some(None));
        assert!(m.events().iter().any(|e| e.kind == "degraded"));
    }

    #[test]
    fn missing_cup_is_a_no_op() {
        let step = Step {
            kind: StepKind::Split,
            year: Some(1999),
            region_name: None,
            co_region_name: None,
            flag_code: None,
            audio_ref: None,
            match_index: None,
        };
        let story = Story::new(
            StoryConfig::default(),
            Vec::new(),
            RegionRegistry::new(),
            vec![step],
        );
        let mut m = StoryMachine::new(story);
        let mut p = RecordingPresenter::new();
        m.focus(0, Forward, t(0.0), &mut p);
        assert!(p.commands().is_empty());
        assert!(m.events().iter().any(|e| e.kind == "skipped"));

        m.focus(7, Forward, t(1.0), &mut p);
        assert!(p.commands().is_empty());
        assert_eq!(m.last_focused(), Some(0));
    }

    #[test]
    fn unplaceable_match_drops_the_previous_marker() {
        let uruguay_only = || {
            let mut reg = RegionRegistry::new();
            reg.push(vec!["Uruguay".into()], square(-58.0, -35.0));
            reg
        };
        let mut fresh = StoryMachine::new(story_with(uruguay_only()));
        let mut p = RecordingPresenter::new();
        fresh.focus(11, Forward, t(0.0), &mut p);
        assert_eq!(fresh.marker(), None);

        let mut m = StoryMachine::new(story_with(uruguay_only()));
        let mut p = RecordingPresenter::new();
        m.focus(5, Forward, t(0.0), &mut p);
        assert!(m.marker().is_some());
        m.focus(11, Forward, t(10.0), &mut p);
        assert_eq!(m.marker(), fresh.marker());
        assert!(!p.visible().contains(&PanelId::Overlay));
        assert_eq!(
            p.commands()
                .iter()
                .rev()
                .find(|c| matches!(c, Command::SetConnector(_))),
            Some(&Command::SetConnector(None))
        );

        let n = p.count(|c| matches!(c, Command::SetConnector(Some(_))));
        m.on_resize(&mut p);
        assert_eq!(p.count(|c| matches!(c, Command::SetConnector(Some(_)))), n);
    }

    #[test]
    fn missing_step_leaves_pending_work_alone() {
        let (mut m, mut p) = machine();
        m.focus(1, Forward, t(0.0), &mut p);
        m.tick(t(850.0), &mut p);
        assert!(m.has_pending_auto_advance());
        m.focus(99, Forward, t(900.0), &mut p);
        assert!(m.has_pending_auto_advance());
        assert_eq!(m.last_focused(), Some(1));
        m.tick(t(1850.0), &mut p);
        assert_eq!(m.panel_state(), PanelState::CenteredTitle);
    }

    #[test]
    fn first_batch_at_load_offset_picks_the_top_step() {
        let (m, mut p) = machine();
        let mut m = m.with_scroll_origin(240.0);
        let batch = [
            Intersection {
                step_index: 0,
                top_px: 20.0,
                is_intersecting: true,
            },
            Intersection {
                step_index: 1,
                top_px: 480.0,
                is_intersecting: true,
            },
        ];
        m.observe(&batch, 240.0, t(0.0), &mut p);
        assert_eq!(m.last_focused(), Some(0));
        m.tick(t(2000.0), &mut p);
        assert!(!m.has_pending_auto_advance());

        m.observe(&batch, 300.0, t(2100.0), &mut p);
        assert_eq!(m.last_focused(), Some(1));
    }

    #[test]
    fn audio_follows_unlock_and_intro_stops_it() {
        let (mut m, mut p) = machine();
        m.focus(2, Forward, t(0.0), &mut p);
        assert!(p.tracks().is_empty());
        let start = m.start(&mut p);
        assert_eq!(start.scroll_to, Some(1));
        assert_eq!(p.tracks(), vec!["audio/1930.mp3"]);
        m.focus(3, Forward, t(10.0), &mut p);
        assert_eq!(p.tracks(), vec!["audio/1930.mp3"]);
        m.focus(0, Backward, t(20.0), &mut p);
        assert_eq!(p.count(|c| matches!(c, Command::StopTrack)), 1);
    }

    #[test]
    fn any_key_unlocks_the_pending_track() {
        let (mut m, mut p) = machine();
        m.focus(2, Forward, t(0.0), &mut p);
        assert!(p.tracks().is_empty());
        let out = m.key_down("Shift", &[100.0, 500.0], 480.0, &mut p);
        assert_eq!(out.action, NavAction::None);
        assert_eq!(p.tracks(), vec!["audio/1930.mp3"]);

        let out = m.key_down("ArrowUp", &[100.0, 500.0], 480.0, &mut p);
        assert_eq!(out.action, NavAction::ScrollToStep(0));
        assert_eq!(p.tracks(), vec!["audio/1930.mp3"]);
    }

    #[test]
    fn pointer_gesture_unlocks_without_start() {
        let (mut m, mut p) = machine();
        m.focus(9, Forward, t(0.0), &mut p);
        m.unlock_audio(&mut p);
        assert_eq!(p.tracks(), vec!["audio/1934.mp3"]);
    }

    #[test]
    fn teardown_silences_later_calls() {
        let (mut m, mut p) = machine();
        m.focus(1, Forward, t(0.0), &mut p);
        m.teardown(t(10.0), &mut p);
        assert_eq!(m.panel_state(), PanelState::Hidden);
        let n = p.commands().len();
        m.tick(t(5000.0), &mut p);
        m.focus(3, Forward, t(5000.0), &mut p);
        assert_eq!(p.commands().len(), n);
        assert!(!m.has_pending_auto_advance());
    }
}
