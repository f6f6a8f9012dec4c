//! What a focused step should look like, computed without side effects.
//!
//! [`Story`] owns the immutable inputs (tournaments, regions, steps, config)
//! and turns a step index into a [`Transition`]: absolute panel, highlight,
//! camera and audio settings that the machine then applies.

use foundation::bounds::Aabb2;
use foundation::math::{GeoPoint, NaturalEarth1, Projection, Vec2};
use scene::regions::{RegionId, RegionRegistry};

use crate::active::{ActiveRegionState, resolve_active_region_for_match};
use crate::camera::{CameraTransform, Framing};
use crate::config::StoryConfig;
use crate::error::StoryError;
use crate::normalize::HistoryKey;
use crate::overlay::{MarkerPlacement, place_marker};
use crate::panels::{PanelContent, PanelId, PanelState, TeamLine, TitleDock};
use crate::present::{Highlight, HighlightStyle, RegionFill};
use crate::steps::{Step, StepKind, next_worldcup_step};
use crate::tournament::Tournament;

#[derive(Debug, Clone, PartialEq)]
pub enum AudioCue {
    Keep,
    Request(String),
    Stop,
}

/// Follow-up run once the camera reaches its target.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Arrival {
    /// World view reached: preview the tournament after step `step`.
    PreviewNext { step: usize },
    RemeasureConnector,
    PlaceAnchor,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraMove {
    pub target: CameraTransform,
    pub duration_ms: f64,
    pub arrival: Option<Arrival>,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MarkerRequest {
    pub point: Option<GeoPoint>,
    pub region: RegionId,
}

/// A panel pinned to a region's on-screen centre.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PanelAnchor {
    pub panel: PanelId,
    pub region: RegionId,
    /// Screen-pixel offset from the centre.
    pub offset: Vec2,
    /// Keep the point this far inside the viewport, when one is known.
    pub viewport_pad: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub kind: StepKind,
    pub panels: PanelState,
    pub contents: Vec<(PanelId, PanelContent)>,
    /// `None` clears every highlight.
    pub highlight: Option<Highlight>,
    /// `None` leaves the camera where it is.
    pub camera: Option<CameraMove>,
    pub audio: AudioCue,
    pub avatar: Option<String>,
    pub active: ActiveRegionState,
    pub marker: Option<MarkerRequest>,
    pub anchor: Option<PanelAnchor>,
    pub remeasure_after_ms: Option<f64>,
    /// Problems that were worked around (missing geometry).
    pub degraded: Vec<StoryError>,
}

impl Transition {
    fn blank(kind: StepKind) -> Self {
        Self {
            kind,
            panels: PanelState::Hidden,
            contents: Vec::new(),
            highlight: None,
            camera: None,
            audio: AudioCue::Keep,
            avatar: None,
            active: ActiveRegionState::default(),
            marker: None,
            anchor: None,
            remeasure_after_ms: None,
            degraded: Vec::new(),
        }
    }

    fn with_camera(mut self, target: CameraTransform, duration_ms: f64) -> Self {
        self.camera = Some(CameraMove {
            target,
            duration_ms,
            arrival: None,
        });
        self
    }

    fn arriving(mut self, arrival: Arrival) -> Self {
        if let Some(mv) = self.camera.as_mut() {
            mv.arrival = Some(arrival);
        }
        self
    }

    pub fn content(&self, panel: PanelId) -> Option<&PanelContent> {
        self.contents.iter().find(|(id, _)| *id == panel).map(|(_, c)| c)
    }
}

/// What the world view previews once it settles.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    /// Index of the `worldcup` step to auto-enter.
    pub step: usize,
    pub audio: Option<String>,
    pub region: Option<RegionId>,
    pub highlight: Option<Highlight>,
}

#[derive(Debug, Copy, Clone)]
struct Located<'a> {
    id: RegionId,
    bounds: Aabb2,
    name: &'a str,
}

/// Immutable story inputs plus the derived world framing.
#[derive(Debug, Clone)]
pub struct Story {
    config: StoryConfig,
    tournaments: Vec<Tournament>,
    registry: RegionRegistry,
    steps: Vec<Step>,
    projection: NaturalEarth1,
    framing: Framing,
    world_fit: CameraTransform,
}

impl Story {
    pub fn new(
        config: StoryConfig,
        tournaments: Vec<Tournament>,
        registry: RegionRegistry,
        steps: Vec<Step>,
    ) -> Self {
        let projection = NaturalEarth1::for_view_box(config.view_box.width, config.view_box.height);
        let framing = Framing::new(config.view_box, config.camera);
        let world_fit = framing.world_fit(&registry.world_bounds(&projection));
        Self {
            config,
            tournaments,
            registry,
            steps,
            projection,
            framing,
            world_fit,
        }
    }

    pub fn config(&self) -> &StoryConfig {
        &self.config
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn tournaments(&self) -> &[Tournament] {
        &self.tournaments
    }

    pub fn registry(&self) -> &RegionRegistry {
        &self.registry
    }

    pub fn projection(&self) -> &NaturalEarth1 {
        &self.projection
    }

    pub fn world_fit(&self) -> CameraTransform {
        self.world_fit
    }

    pub fn cup(&self, year: Option<u16>) -> Result<&Tournament, StoryError> {
        year.and_then(|y| self.tournaments.iter().find(|t| t.year == y))
            .ok_or(StoryError::MissingCup { year })
    }

    pub fn plan(&self, index: usize) -> Result<Transition, StoryError> {
        let step = self.steps.get(index).ok_or(StoryError::MissingStep {
            index,
            len: self.steps.len(),
        })?;
        let d = &self.config.durations;
        match step.kind {
            StepKind::Intro => {
                let mut t = Transition::blank(step.kind).with_camera(self.world_fit, d.intro);
                t.audio = AudioCue::Stop;
                Ok(t)
            }
            StepKind::World => Ok(Transition::blank(step.kind)
                .with_camera(self.world_fit, d.world)
                .arriving(Arrival::PreviewNext { step: index })),
            StepKind::Worldcup => self.plan_centered(step),
            StepKind::Split => self.plan_split(step),
            StepKind::Match => self.plan_match(index, step),
            StepKind::Champion => self.plan_champion(step),
            StepKind::Facts => self.plan_facts(step),
            StepKind::InsightsIntro => {
                let mut t = Transition::blank(step.kind).with_camera(self.world_fit, d.insights);
                t.audio = AudioCue::Stop;
                Ok(t)
            }
            StepKind::InsightsChart(_) | StepKind::InsightsConclusion => {
                Ok(Transition::blank(step.kind))
            }
        }
    }

    /// Preview for the `world` step at `world_index`: the next tournament's
    /// host, highlighted softly, and its track.
    pub fn preview_after(&self, world_index: usize) -> Option<Preview> {
        let next = next_worldcup_step(&self.steps, world_index)?;
        let step = self.steps.get(next)?;
        let region = step
            .region_name
            .as_deref()
            .and_then(|n| self.registry.resolve(n));
        Some(Preview {
            step: next,
            audio: step.audio_ref.clone(),
            region,
            highlight: region.map(|r| self.preview_highlight(r)),
        })
    }

    pub fn place_marker(
        &self,
        req: &MarkerRequest,
        camera: &CameraTransform,
    ) -> Option<MarkerPlacement> {
        let region = self.registry.get(req.region)?;
        place_marker(
            req.point,
            region,
            &self.projection,
            camera,
            &self.config.overlay,
        )
    }

    /// View-box position of an anchor's region centre under `camera`.
    pub fn anchor_point(&self, anchor: &PanelAnchor, camera: &CameraTransform) -> Option<Vec2> {
        let bounds = self.registry.get(anchor.region)?.main_bounds(&self.projection)?;
        Some(camera.apply(bounds.center()))
    }

    fn locate<'a>(&self, name: &'a str, degraded: &mut Vec<StoryError>) -> Option<Located<'a>> {
        let found = self.registry.resolve_region(name).and_then(|r| {
            r.main_bounds(&self.projection).map(|bounds| Located {
                id: r.id,
                bounds,
                name,
            })
        });
        if found.is_none() {
            degraded.push(StoryError::MissingGeometry {
                name: name.to_string(),
            });
        }
        found
    }

    /// Host, then co-host, whichever have geometry.
    fn locate_hosts<'a>(&self, t: &'a Tournament, degraded: &mut Vec<StoryError>) -> Vec<Located<'a>> {
        let mut out = Vec::with_capacity(2);
        out.extend(self.locate(&t.host, degraded));
        if let Some(co) = t.co_host.as_deref() {
            out.extend(self.locate(co, degraded));
        }
        out
    }

    fn preview_highlight(&self, region: RegionId) -> Highlight {
        let colors = &self.config.colors;
        Highlight {
            style: HighlightStyle::Preview,
            regions: vec![RegionFill {
                region,
                fill: colors.preview_fill.clone(),
            }],
            dim_opacity: colors.preview_dim_opacity,
        }
    }

    fn focus_highlight(&self, located: &[Located<'_>]) -> Option<Highlight> {
        if located.is_empty() {
            return None;
        }
        let colors = &self.config.colors;
        Some(Highlight {
            style: HighlightStyle::Focus,
            regions: located
                .iter()
                .map(|l| RegionFill {
                    region: l.id,
                    fill: colors.host_fill(l.name).to_string(),
                })
                .collect(),
            dim_opacity: colors.focus_dim_opacity,
        })
    }

    /// Left-frame fit for one region, or the offset pair fit for two.
    fn docked_fit(&self, located: &[Located<'_>]) -> Option<CameraTransform> {
        match located {
            [a, b, ..] => Some(self.framing.two_region_left_frame(&a.bounds, &b.bounds)),
            [a] => Some(self.framing.left_frame(&a.bounds)),
            [] => None,
        }
    }

    fn title(&self, t: &Tournament, dock: TitleDock) -> (PanelId, PanelContent) {
        (
            PanelId::Title,
            PanelContent::Title {
                dock,
                text: t.title(&self.config.labels),
                flags: t.flags(),
            },
        )
    }

    fn history(&self, t: &Tournament, key: HistoryKey) -> (PanelId, PanelContent) {
        let section = t.history_section(key, &self.config.labels);
        (
            PanelId::History,
            PanelContent::History {
                title: section.title,
                text: section.text,
                mascot: t.mascot.clone(),
            },
        )
    }

    fn audio_for(t: &Tournament) -> AudioCue {
        match t.audio.as_deref() {
            Some(track) if !track.is_empty() => AudioCue::Request(track.to_string()),
            _ => AudioCue::Keep,
        }
    }

    fn host_state(t: &Tournament, located: &[Located<'_>]) -> ActiveRegionState {
        ActiveRegionState {
            region_key: Some(format!("{}-{}", t.host, t.year)),
            primary: located.first().map(|l| l.id),
            secondary: located.get(1).map(|l| l.id),
            is_centered: false,
        }
    }

    fn plan_centered(&self, step: &Step) -> Result<Transition, StoryError> {
        let t = self.cup(step.year)?;
        let mut tr = Transition::blank(step.kind);
        tr.panels = PanelState::CenteredTitle;
        tr.contents.push(self.title(t, TitleDock::Center));
        tr.audio = Self::audio_for(t);

        let located = self.locate_hosts(t, &mut tr.degraded);
        let duration = self.config.durations.centered;
        match located.as_slice() {
            [a, b, ..] => {
                tr.highlight = self.focus_highlight(&located);
                tr = tr.with_camera(self.framing.two_region_left_frame(&a.bounds, &b.bounds), duration);
            }
            [a] => {
                tr.highlight = Some(self.preview_highlight(a.id));
                tr = tr.with_camera(self.framing.region_center(&a.bounds), duration);
            }
            [] => {}
        }
        tr.active = Self::host_state(t, &located);
        tr.active.is_centered = true;
        Ok(tr)
    }

    fn plan_split(&self, step: &Step) -> Result<Transition, StoryError> {
        let t = self.cup(step.year)?;
        let mut tr = Transition::blank(step.kind);
        tr.panels = PanelState::Split;
        tr.contents.push(self.title(t, TitleDock::Right));
        tr.contents.push(self.history(t, HistoryKey::Overview));
        tr.audio = Self::audio_for(t);
        tr.avatar = t.mascot.clone();

        let located = self.locate_hosts(t, &mut tr.degraded);
        tr.highlight = self.focus_highlight(&located);
        if let Some(fit) = self.docked_fit(&located) {
            tr = tr.with_camera(fit, self.config.durations.split);
        }
        tr.active = Self::host_state(t, &located);
        Ok(tr)
    }

    fn plan_match(&self, step_index: usize, step: &Step) -> Result<Transition, StoryError> {
        let t = self.cup(step.year)?;
        let index = step
            .match_index
            .ok_or(StoryError::MissingMatchIndex { step: step_index })?;
        let m = t.match_at(index)?;

        let mut tr = Transition::blank(step.kind);
        tr.panels = PanelState::Match;
        tr.contents.push(self.title(t, TitleDock::Right));
        tr.contents.push(self.history(t, m.history_key));
        tr.contents.push((
            PanelId::MatchDetail,
            PanelContent::MatchDetail {
                phase: m.display_phase_title.clone(),
                date: m.date.clone(),
                time: m.time.clone(),
                city: m.city.clone(),
                stadium: m.stadium.clone(),
                home: TeamLine {
                    name: m.home.display_name.clone(),
                    flag_code: m.home.flag_code.clone(),
                },
                away: TeamLine {
                    name: m.away.display_name.clone(),
                    flag_code: m.away.flag_code.clone(),
                },
                score: m.score.clone(),
                result: m.result_text.clone(),
            },
        ));
        tr.contents.push((PanelId::Overlay, PanelContent::Overlay));
        tr.audio = Self::audio_for(t);
        tr.avatar = t.mascot.clone();

        let active = resolve_active_region_for_match(m, t, &self.registry);
        let located = active.as_ref().and_then(|a| {
            let bounds = self.registry.get(a.region)?.main_bounds(&self.projection)?;
            Some(Located {
                id: a.region,
                bounds,
                name: a.name.as_str(),
            })
        });
        match (&active, located) {
            (Some(a), Some(l)) => {
                tr.highlight = self.focus_highlight(&[l]);
                tr = tr
                    .with_camera(self.framing.left_frame(&l.bounds), self.config.durations.detail)
                    .arriving(Arrival::RemeasureConnector);
                tr.marker = Some(MarkerRequest {
                    point: m.location,
                    region: l.id,
                });
                tr.active = ActiveRegionState {
                    region_key: Some(format!("{}-{}", a.name, t.year)),
                    primary: Some(l.id),
                    secondary: None,
                    is_centered: false,
                };
            }
            _ => {
                let name = active
                    .as_ref()
                    .map(|a| a.name.clone())
                    .unwrap_or_else(|| t.host.clone());
                tr.degraded.push(StoryError::MissingGeometry { name });
            }
        }
        Ok(tr)
    }

    fn plan_champion(&self, step: &Step) -> Result<Transition, StoryError> {
        let t = self.cup(step.year)?;
        let mut tr = Transition::blank(step.kind);
        tr.panels = PanelState::Champion;
        tr.contents.push(self.title(t, TitleDock::Right));
        tr.contents.push(self.history(t, HistoryKey::Champion));
        if let Some(c) = &t.champion {
            tr.contents.push((
                PanelId::Champion,
                PanelContent::Champion {
                    name: self.config.labels.country(&c.name).to_string(),
                    flag: c.flag.clone(),
                },
            ));
        }
        tr.audio = Self::audio_for(t);

        let host: Vec<Located<'_>> = self.locate(&t.host, &mut tr.degraded).into_iter().collect();
        if let Some(h) = host.first() {
            tr.highlight = self.focus_highlight(&host);
            tr = tr
                .with_camera(self.framing.left_frame(&h.bounds), self.config.durations.detail)
                .arriving(Arrival::PlaceAnchor);
            if t.champion.is_some() {
                tr.anchor = Some(PanelAnchor {
                    panel: PanelId::Champion,
                    region: h.id,
                    offset: Vec2::new(0.0, 0.0),
                    viewport_pad: Some(self.config.panels.champion_viewport_pad),
                });
                tr.remeasure_after_ms = Some(self.config.champion_settle_ms);
            }
        }
        tr.active = Self::host_state(t, &host);
        Ok(tr)
    }

    fn plan_facts(&self, step: &Step) -> Result<Transition, StoryError> {
        let t = self.cup(step.year)?;
        let mut tr = Transition::blank(step.kind);
        tr.panels = PanelState::Facts;
        tr.contents.push(self.title(t, TitleDock::Right));
        tr.contents.push(self.history(t, HistoryKey::Facts));
        tr.audio = Self::audio_for(t);

        let host: Vec<Located<'_>> = self.locate(&t.host, &mut tr.degraded).into_iter().collect();
        if let Some(h) = host.first() {
            let panels = &self.config.panels;
            tr.contents.push((
                PanelId::FactsLogo,
                PanelContent::FactsLogo {
                    src: panels.facts_logo_for(t.year),
                    fallback: panels.facts_logo_fallback.clone(),
                },
            ));
            tr.highlight = self.focus_highlight(&host);
            tr = tr.with_camera(self.framing.left_frame(&h.bounds), self.config.durations.detail);
            tr.anchor = Some(PanelAnchor {
                panel: PanelId::FactsLogo,
                region: h.id,
                offset: Vec2::new(panels.facts_logo_offset_x, 0.0),
                viewport_pad: None,
            });
        }
        tr.active = Self::host_state(t, &host);
        Ok(tr)
    }
}
