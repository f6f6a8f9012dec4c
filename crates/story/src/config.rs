use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub struct ConfigError(serde_json::Error);

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid story config: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewBox {
    pub width: f64,
    pub height: f64,
}

impl Default for ViewBox {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 600.0,
        }
    }
}

impl ViewBox {
    /// Sub-area reserved for a region while panels occupy the right side.
    pub fn left_frame(&self) -> FrameRect {
        FrameRect {
            x: 40.0,
            y: 40.0,
            w: (self.width * 0.58).floor(),
            h: self.height - 80.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Negative padding zooms past the world extent.
    pub world_fit_padding: f64,
    pub center_padding: f64,
    pub center_max_scale: f64,
    pub left_frame_fill: f64,
    pub pair_frame_fill: f64,
    /// Fraction of the left frame width the two-region fit shifts right.
    pub pair_offset_ratio: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            world_fit_padding: -0.35,
            center_padding: 0.14,
            center_max_scale: 18.0,
            left_frame_fill: 0.90,
            pair_frame_fill: 0.75,
            pair_offset_ratio: 0.3,
        }
    }
}

/// Eased transition length per step kind, in milliseconds.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionDurations {
    pub intro: f64,
    pub world: f64,
    pub centered: f64,
    pub split: f64,
    pub detail: f64,
    pub insights: f64,
}

impl Default for TransitionDurations {
    fn default() -> Self {
        Self {
            intro: 700.0,
            world: 850.0,
            centered: 1000.0,
            split: 1000.0,
            detail: 450.0,
            insights: 850.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub marker_size: f64,
    pub marker_margin: f64,
    /// Gap between the marker's bottom edge and the venue point.
    pub marker_lift: f64,
    /// Connector anchor, as a fraction of the marker size.
    pub anchor_x: f64,
    pub anchor_y: f64,
    /// Distance from the match panel's left edge to the connector end.
    pub panel_inset: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            marker_size: 60.0,
            marker_margin: 30.0,
            marker_lift: 15.0,
            anchor_x: 0.5,
            anchor_y: 0.92,
            panel_inset: 14.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelLayout {
    /// Champion card stays this far inside the viewport.
    pub champion_viewport_pad: f64,
    pub facts_logo_offset_x: f64,
    /// `{year}` is replaced by the tournament year.
    pub facts_logo_template: String,
    pub facts_logo_fallback: String,
}

impl Default for PanelLayout {
    fn default() -> Self {
        Self {
            champion_viewport_pad: 18.0,
            facts_logo_offset_x: 30.0,
            facts_logo_template: "assets/logos/{year}.png".to_string(),
            facts_logo_fallback: "assets/icons/copa1.png".to_string(),
        }
    }
}

impl PanelLayout {
    pub fn facts_logo_for(&self, year: u16) -> String {
        self.facts_logo_template.replace("{year}", &year.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapColors {
    pub base_fill: String,
    pub preview_fill: String,
    pub preview_dim_opacity: f64,
    pub focus_dim_opacity: f64,
    pub default_host_fill: String,
    pub host_fills: BTreeMap<String, String>,
}

impl Default for MapColors {
    fn default() -> Self {
        let host_fills = [
            ("Uruguay", "#0038a8"),
            ("Italy", "#009246"),
            ("France", "#0055a4"),
            ("Brazil", "#009c3b"),
            ("Switzerland", "#FF0000"),
            ("Sweden", "#006AA7"),
            ("Chile", "#0039A6"),
            ("England", "#C8102E"),
            ("Mexico", "#006847"),
            ("Germany", "#DD0000"),
            ("Argentina", "#74ACDF"),
            ("Spain", "#C60B1E"),
            ("United States", "#B22234"),
            ("Korea Republic", "#003478"),
            ("Japan", "#BC002D"),
            ("South Africa", "#007A4D"),
            ("Russia", "#0033A0"),
            ("Qatar", "#8D1B3D"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Self {
            base_fill: "#1a1f2b".to_string(),
            preview_fill: "#2a2f3b".to_string(),
            preview_dim_opacity: 0.35,
            focus_dim_opacity: 0.06,
            default_host_fill: "#2a4a5e".to_string(),
            host_fills,
        }
    }
}

impl MapColors {
    pub fn host_fill(&self, name: &str) -> &str {
        self.host_fills
            .get(name.trim())
            .map(String::as_str)
            .unwrap_or(&self.default_host_fill)
    }
}

/// Display strings. English defaults; supply a translated table as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub title_prefix: String,
    pub opening_match: String,
    pub unknown_stage: String,
    /// Normalized stage label to display title.
    pub stage_titles: BTreeMap<String, String>,
    /// Dataset team/country name to display name.
    pub country_names: BTreeMap<String, String>,
    /// `{team}` is replaced by the winner's display name.
    pub win_template: String,
    pub draw: String,
    pub history_fallback_title: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            title_prefix: "WORLD CUP".to_string(),
            opening_match: "opening match".to_string(),
            unknown_stage: "match".to_string(),
            stage_titles: BTreeMap::new(),
            country_names: BTreeMap::new(),
            win_template: "{team} wins".to_string(),
            draw: "Draw".to_string(),
            history_fallback_title: "History".to_string(),
        }
    }
}

impl Labels {
    pub fn country<'a>(&'a self, name: &'a str) -> &'a str {
        self.country_names
            .get(name)
            .map(String::as_str)
            .unwrap_or(name)
    }

    pub fn win(&self, team: &str) -> String {
        self.win_template.replace("{team}", team)
    }

    /// `WORLD CUP SOUTH KOREA/JAPAN 2002`.
    pub fn tournament_title(&self, host: &str, co_host: Option<&str>, year: u16) -> String {
        let mut places = self.country(host).to_uppercase();
        if let Some(co) = co_host {
            places.push('/');
            places.push_str(&self.country(co).to_uppercase());
        }
        format!("{} {places} {year}", self.title_prefix)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightsConfig {
    pub top_champions: usize,
    pub network_top_teams: usize,
    pub network_min_matches: u32,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            top_champions: 20,
            network_top_teams: 15,
            network_min_matches: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoryConfig {
    pub view_box: ViewBox,
    pub camera: CameraConfig,
    pub durations: TransitionDurations,
    pub world_auto_enter_ms: f64,
    /// Deferred champion re-measure after its camera transition ends.
    pub champion_settle_ms: f64,
    pub overlay: OverlayConfig,
    pub panels: PanelLayout,
    pub colors: MapColors,
    pub labels: Labels,
    pub default_venue_key: String,
    pub mark_opening_match: bool,
    pub intersection_thresholds: Vec<f64>,
    pub insights: InsightsConfig,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            view_box: ViewBox::default(),
            camera: CameraConfig::default(),
            durations: TransitionDurations::default(),
            world_auto_enter_ms: 1000.0,
            champion_settle_ms: 520.0,
            overlay: OverlayConfig::default(),
            panels: PanelLayout::default(),
            colors: MapColors::default(),
            labels: Labels::default(),
            default_venue_key: "Default Venue".to_string(),
            mark_opening_match: true,
            intersection_thresholds: vec![0.4, 0.6],
            insights: InsightsConfig::default(),
        }
    }
}

impl StoryConfig {
    pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(payload).map_err(ConfigError)
    }
}
