//! The rendering seam. The machine only ever issues absolute commands here.

use std::collections::{BTreeMap, BTreeSet};

use foundation::math::Vec2;
use scene::regions::RegionId;
use serde::Serialize;

use crate::camera::CameraTransform;
use crate::overlay::{ConnectorLine, MarkerPlacement, ScreenRect};
use crate::panels::{PanelContent, PanelId};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum HighlightStyle {
    /// Upcoming tournament seen from the world view.
    Preview,
    /// Host (and co-host) in their own colours, everything else nearly gone.
    Focus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionFill {
    pub region: RegionId,
    pub fill: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Highlight {
    pub style: HighlightStyle,
    pub regions: Vec<RegionFill>,
    /// Opacity of every region not listed.
    pub dim_opacity: f64,
}

/// Output side of the story.
///
/// Coordinates handed to `place_marker` and `set_connector` are in view-box
/// units (the map layer's space); `position_panel` takes screen pixels.
/// The conversion queries default to the identity for presenters whose view
/// box is the screen.
pub trait Presenter {
    fn show_panel(&mut self, panel: PanelId, content: &PanelContent);
    fn hide_panel(&mut self, panel: PanelId);
    fn set_background_track(&mut self, track: &str);
    fn stop_background_track(&mut self);
    fn set_avatar_image(&mut self, image: &str);
    fn set_highlight(&mut self, highlight: Option<&Highlight>);
    fn set_camera(&mut self, transform: &CameraTransform);
    fn place_marker(&mut self, marker: &MarkerPlacement);
    fn set_connector(&mut self, line: Option<&ConnectorLine>);
    fn position_panel(&mut self, panel: PanelId, at: Vec2);

    /// Current on-screen rectangle of a visible panel.
    fn panel_rect(&self, panel: PanelId) -> Option<ScreenRect>;

    fn viewport(&self) -> Option<ScreenRect> {
        None
    }

    fn view_to_screen(&self, p: Vec2) -> Vec2 {
        p
    }

    fn screen_to_view(&self, p: Vec2) -> Vec2 {
        p
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ShowPanel(PanelId, PanelContent),
    HidePanel(PanelId),
    SetTrack(String),
    StopTrack,
    SetAvatar(String),
    SetHighlight(Option<Highlight>),
    SetCamera(CameraTransform),
    PlaceMarker(MarkerPlacement),
    SetConnector(Option<ConnectorLine>),
    PositionPanel(PanelId, Vec2),
}

/// Presenter that keeps every command, for tests and headless runs.
///
/// Panel rectangles come from `set_panel_rect`; a panel reports its rect
/// only while shown.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    commands: Vec<Command>,
    visible: BTreeSet<PanelId>,
    contents: BTreeMap<PanelId, PanelContent>,
    rects: BTreeMap<PanelId, ScreenRect>,
    viewport: Option<ScreenRect>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_viewport(mut self, viewport: ScreenRect) -> Self {
        self.viewport = Some(viewport);
        self
    }

    pub fn set_panel_rect(&mut self, panel: PanelId, rect: ScreenRect) {
        self.rects.insert(panel, rect);
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    pub fn visible(&self) -> &BTreeSet<PanelId> {
        &self.visible
    }

    pub fn content(&self, panel: PanelId) -> Option<&PanelContent> {
        self.contents.get(&panel)
    }

    pub fn last_camera(&self) -> Option<CameraTransform> {
        self.commands.iter().rev().find_map(|c| match c {
            Command::SetCamera(t) => Some(*t),
            _ => None,
        })
    }

    pub fn last_highlight(&self) -> Option<Option<&Highlight>> {
        self.commands.iter().rev().find_map(|c| match c {
            Command::SetHighlight(h) => Some(h.as_ref()),
            _ => None,
        })
    }

    /// Tracks started, in order.
    pub fn tracks(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::SetTrack(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&Command) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }
}

impl Presenter for RecordingPresenter {
    fn show_panel(&mut self, panel: PanelId, content: &PanelContent) {
        self.visible.insert(panel);
        self.contents.insert(panel, content.clone());
        self.commands.push(Command::ShowPanel(panel, content.clone()));
    }

    fn hide_panel(&mut self, panel: PanelId) {
        self.visible.remove(&panel);
        self.contents.remove(&panel);
        self.commands.push(Command::HidePanel(panel));
    }

    fn set_background_track(&mut self, track: &str) {
        self.commands.push(Command::SetTrack(track.to_string()));
    }

    fn stop_background_track(&mut self) {
        self.commands.push(Command::StopTrack);
    }

    fn set_avatar_image(&mut self, image: &str) {
        self.commands.push(Command::SetAvatar(image.to_string()));
    }

    fn set_highlight(&mut self, highlight: Option<&Highlight>) {
        self.commands.push(Command::SetHighlight(highlight.cloned()));
    }

    fn set_camera(&mut self, transform: &CameraTransform) {
        self.commands.push(Command::SetCamera(*transform));
    }

    fn place_marker(&mut self, marker: &MarkerPlacement) {
        self.commands.push(Command::PlaceMarker(*marker));
    }

    fn set_connector(&mut self, line: Option<&ConnectorLine>) {
        self.commands.push(Command::SetConnector(line.copied()));
    }

    fn position_panel(&mut self, panel: PanelId, at: Vec2) {
        self.commands.push(Command::PositionPanel(panel, at));
    }

    fn panel_rect(&self, panel: PanelId) -> Option<ScreenRect> {
        if self.visible.contains(&panel) {
            self.rects.get(&panel).copied()
        } else {
            None
        }
    }

    fn viewport(&self) -> Option<ScreenRect> {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::{Command, Presenter, RecordingPresenter};
    use crate::overlay::ScreenRect;
    use crate::panels::{PanelContent, PanelId};
    use pretty_assertions::assert_eq;

    #[test]
    fn rect_only_reported_while_visible() {
        let mut p = RecordingPresenter::new();
        let rect = ScreenRect {
            left: 1.0,
            top: 2.0,
            width: 3.0,
            height: 4.0,
        };
        p.set_panel_rect(PanelId::MatchDetail, rect);
        assert_eq!(p.panel_rect(PanelId::MatchDetail), None);
        p.show_panel(PanelId::MatchDetail, &PanelContent::Overlay);
        assert_eq!(p.panel_rect(PanelId::MatchDetail), Some(rect));
        p.hide_panel(PanelId::MatchDetail);
        assert_eq!(p.panel_rect(PanelId::MatchDetail), None);
    }

    #[test]
    fn records_in_order() {
        let mut p = RecordingPresenter::new();
        p.set_background_track("a.mp3");
        p.stop_background_track();
        p.set_background_track("b.mp3");
        assert_eq!(p.tracks(), vec!["a.mp3", "b.mp3"]);
        assert_eq!(p.count(|c| matches!(c, Command::StopTrack)), 1);
        assert_eq!(p.take_commands().len(), 3);
        assert!(p.commands().is_empty());
    }
}
