//! [`Presenter`] over the page's element ids.

use foundation::math::{Projection, Vec2};
use scene::regions::RegionRegistry;
use scene::shape::svg_path;
use story::camera::CameraTransform;
use story::config::{MapColors, ViewBox};
use story::overlay::{ConnectorLine, MarkerPlacement, ScreenRect};
use story::panels::{PanelContent, PanelId, TitleDock};
use story::present::{Highlight, Presenter};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlAudioElement, HtmlElement};

pub const MAP_LAYER: &str = "mapLayer";
pub const AVATAR: &str = "avatar";
pub const CONNECTOR: &str = "connector";
pub const AUDIO: &str = "bgAudio";
const VISIBLE: &str = "visible";

pub fn element_id(panel: PanelId) -> &'static str {
    match panel {
        PanelId::Title => "worldcupPanel",
        PanelId::History => "historyPanel",
        PanelId::MatchDetail => "matchPanel",
        PanelId::Champion => "championPanel",
        PanelId::FactsLogo => "factsLogo",
        PanelId::Overlay => AVATAR,
    }
}

fn region_element_id(index: usize) -> String {
    format!("region-{index}")
}

pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn flag_img(code: &str) -> String {
    let c = escape(code);
    format!(
        r#"<img class="flag" src="assets/flags/{c}.png" alt="{c}" onerror="this.onerror=null;this.src='assets/flgs/{c}.png'">"#
    )
}

/// Inner markup of a panel. The facts logo and the overlay are images and
/// get none.
pub(crate) fn panel_markup(content: &PanelContent) -> Option<String> {
    let html = match content {
        PanelContent::Title { text, flags, .. } => {
            let flags: String = flags.iter().map(|f| flag_img(f)).collect();
            format!(r#"<h2 class="wc-title">{}</h2><div class="wc-flags">{flags}</div>"#, escape(text))
        }
        PanelContent::History {
            title,
            text,
            mascot,
        } => {
            let mascot = mascot
                .as_deref()
                .map(|m| format!(r#"<img class="mascot" src="{}" alt="">"#, escape(m)))
                .unwrap_or_default();
            format!("<h3>{}</h3><p>{}</p>{mascot}", escape(title), escape(text))
        }
        PanelContent::MatchDetail {
            phase,
            date,
            time,
            city,
            stadium,
            home,
            away,
            score,
            result,
        } => format!(
            concat!(
                r#"<div class="phase">{}</div>"#,
                r#"<div class="when">{} {}</div>"#,
                r#"<div class="where">{} · {}</div>"#,
                r#"<div class="teams">{}<span>{}</span>"#,
                r#"<span class="score">{}</span>"#,
                r#"<span>{}</span>{}</div>"#,
                r#"<div class="result">{}</div>"#
            ),
            escape(phase),
            escape(date),
            escape(time),
            escape(stadium),
            escape(city),
            flag_img(&home.flag_code),
            escape(&home.name),
            escape(score),
            escape(&away.name),
            flag_img(&away.flag_code),
            escape(result),
        ),
        PanelContent::Champion { name, flag } => {
            format!(r#"{}<div class="champion-name">{}</div>"#, flag_img(flag), escape(name))
        }
        PanelContent::FactsLogo { .. } | PanelContent::Overlay => return None,
    };
    Some(html)
}

/// `<path>` elements for every region, drawn in base colour.
pub(crate) fn region_paths_markup(
    registry: &RegionRegistry,
    projection: &dyn Projection,
    base_fill: &str,
) -> String {
    registry
        .iter()
        .map(|region| {
            format!(
                r#"<path id="{}" class="country" d="{}" fill="{}" data-name="{}"></path>"#,
                region_element_id(region.id.index()),
                svg_path(&region.geometry, projection),
                escape(base_fill),
                escape(region.display_name()),
            )
        })
        .collect()
}

/// Fill and opacity of region `index` under `highlight`.
pub(crate) fn region_style(
    highlight: Option<&Highlight>,
    index: usize,
    colors: &MapColors,
) -> (String, f64) {
    let Some(h) = highlight else {
        return (colors.base_fill.clone(), 1.0);
    };
    match h.regions.iter().find(|r| r.region.index() == index) {
        Some(lit) => (lit.fill.clone(), 1.0),
        None => (colors.base_fill.clone(), h.dim_opacity),
    }
}

/// Placement of the view box inside the rendered `<svg>`
/// (`preserveAspectRatio="xMidYMid meet"`).
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct ViewFit {
    scale: f64,
    offset: Vec2,
}

impl ViewFit {
    pub(crate) fn new(svg: ScreenRect, view_box: ViewBox) -> Self {
        if view_box.width <= 0.0 || view_box.height <= 0.0 {
            return Self {
                scale: 1.0,
                offset: Vec2::new(svg.left, svg.top),
            };
        }
        let scale = (svg.width / view_box.width).min(svg.height / view_box.height);
        Self {
            scale,
            offset: Vec2::new(
                svg.left + (svg.width - view_box.width * scale) * 0.5,
                svg.top + (svg.height - view_box.height * scale) * 0.5,
            ),
        }
    }

    pub(crate) fn to_screen(self, p: Vec2) -> Vec2 {
        p.scale(self.scale) + self.offset
    }

    pub(crate) fn to_view(self, p: Vec2) -> Vec2 {
        if self.scale <= 0.0 {
            return p;
        }
        (p - self.offset).scale(1.0 / self.scale)
    }
}

fn rect_of(el: &Element) -> ScreenRect {
    let r = el.get_bounding_client_rect();
    ScreenRect {
        left: r.left(),
        top: r.top(),
        width: r.width(),
        height: r.height(),
    }
}

pub struct DomPresenter {
    document: Document,
    view_box: ViewBox,
    colors: MapColors,
    region_count: usize,
}

impl DomPresenter {
    pub fn new(document: Document, view_box: ViewBox, colors: MapColors) -> Self {
        Self {
            document,
            view_box,
            colors,
            region_count: 0,
        }
    }

    fn element(&self, id: &str) -> Option<Element> {
        let el = self.document.get_element_by_id(id);
        if el.is_none() {
            tracing::debug!(target: "story_web::dom", id, "element not found");
        }
        el
    }

    fn html(&self, id: &str) -> Option<HtmlElement> {
        self.element(id)?.dyn_into::<HtmlElement>().ok()
    }

    fn set_visible(&self, id: &str, visible: bool) {
        let Some(el) = self.element(id) else {
            return;
        };
        let classes = el.class_list();
        let _ = if visible {
            classes.add_1(VISIBLE)
        } else {
            classes.remove_1(VISIBLE)
        };
    }

    fn set_px(&self, el: &HtmlElement, property: &str, value: f64) {
        let _ = el.style().set_property(property, &format!("{value:.1}px"));
    }

    fn view_fit(&self) -> Option<ViewFit> {
        let svg = self.element(MAP_LAYER)?.closest("svg").ok()??;
        Some(ViewFit::new(rect_of(&svg), self.view_box))
    }

    /// Replace the map layer with one path per region.
    pub fn draw_regions(&mut self, registry: &RegionRegistry, projection: &dyn Projection) {
        let Some(layer) = self.element(MAP_LAYER) else {
            tracing::warn!(target: "story_web::dom", "no map layer; countries not drawn");
            return;
        };
        layer.set_inner_html(&region_paths_markup(registry, projection, &self.colors.base_fill));
        self.region_count = registry.len();
        tracing::info!(target: "story_web::dom", regions = self.region_count, "map drawn");
    }

    /// Ids of the `.step` sections in document order and their centres
    /// relative to the viewport.
    pub fn step_centers(&self) -> Vec<f64> {
        let Ok(nodes) = self.document.query_selector_all(".step") else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|n| n.dyn_into::<Element>().ok())
            .map(|el| {
                let r = rect_of(&el);
                r.top + r.height * 0.5
            })
            .collect()
    }

    pub fn scroll_to_step(&self, index: usize) {
        let Ok(nodes) = self.document.query_selector_all(".step") else {
            return;
        };
        if let Some(el) = nodes
            .item(index as u32)
            .and_then(|n| n.dyn_into::<Element>().ok())
        {
            el.scroll_into_view();
        }
    }
}

impl Presenter for DomPresenter {
    fn show_panel(&mut self, panel: PanelId, content: &PanelContent) {
        let id = element_id(panel);
        if let Some(el) = self.element(id) {
            match content {
                PanelContent::FactsLogo { src, fallback } => {
                    let _ = el.set_attribute("src", src);
                    let _ = el.set_attribute(
                        "onerror",
                        &format!("this.onerror=null;this.src='{}'", escape(fallback)),
                    );
                }
                PanelContent::Title { dock, .. } => {
                    let _ = el.class_list().toggle_with_force("dock-right", *dock == TitleDock::Right);
                }
                _ => {}
            }
            if let Some(html) = panel_markup(content) {
                el.set_inner_html(&html);
            }
        }
        self.set_visible(id, true);
        if panel == PanelId::Overlay {
            self.set_visible(CONNECTOR, true);
        }
    }

    fn hide_panel(&mut self, panel: PanelId) {
        self.set_visible(element_id(panel), false);
        if panel == PanelId::Overlay {
            self.set_visible(CONNECTOR, false);
        }
    }

    fn set_background_track(&mut self, track: &str) {
        let Some(audio) = self
            .element(AUDIO)
            .and_then(|el| el.dyn_into::<HtmlAudioElement>().ok())
        else {
            return;
        };
        audio.set_src(track);
        if let Err(err) = audio.play() {
            tracing::warn!(target: "story_web::dom", track, ?err, "audio did not start");
        }
    }

    fn stop_background_track(&mut self) {
        if let Some(audio) = self
            .element(AUDIO)
            .and_then(|el| el.dyn_into::<HtmlAudioElement>().ok())
        {
            let _ = audio.pause();
            audio.set_current_time(0.0);
        }
    }

    fn set_avatar_image(&mut self, image: &str) {
        if let Some(el) = self.element(AVATAR) {
            let _ = el.set_attribute("src", image);
        }
    }

    fn set_highlight(&mut self, highlight: Option<&Highlight>) {
        for index in 0..self.region_count {
            let Some(path) = self.document.get_element_by_id(&region_element_id(index)) else {
                continue;
            };
            let (fill, opacity) = region_style(highlight, index, &self.colors);
            let _ = path.set_attribute("fill", &fill);
            let _ = path.set_attribute("fill-opacity", &format!("{opacity:.2}"));
        }
    }

    fn set_camera(&mut self, transform: &CameraTransform) {
        if let Some(layer) = self.element(MAP_LAYER) {
            let _ = layer.set_attribute("transform", &transform.to_svg());
        }
    }

    fn place_marker(&mut self, marker: &MarkerPlacement) {
        let Some(avatar) = self.html(AVATAR) else {
            return;
        };
        let fit = self.view_fit();
        let (at, size) = match fit {
            Some(fit) => (
                fit.to_screen(Vec2::new(marker.x, marker.y)),
                marker.size * fit.scale,
            ),
            None => (Vec2::new(marker.x, marker.y), marker.size),
        };
        self.set_px(&avatar, "left", at.x);
        self.set_px(&avatar, "top", at.y);
        self.set_px(&avatar, "width", size);
        self.set_px(&avatar, "height", size);
    }

    fn set_connector(&mut self, line: Option<&ConnectorLine>) {
        let Some(line) = line else {
            self.set_visible(CONNECTOR, false);
            return;
        };
        if let Some(el) = self.element(CONNECTOR) {
            for (attr, v) in [
                ("x1", line.from.x),
                ("y1", line.from.y),
                ("x2", line.to.x),
                ("y2", line.to.y),
            ] {
                let _ = el.set_attribute(attr, &format!("{v:.2}"));
            }
        }
        self.set_visible(CONNECTOR, true);
    }

    fn position_panel(&mut self, panel: PanelId, at: Vec2) {
        if let Some(el) = self.html(element_id(panel)) {
            self.set_px(&el, "left", at.x);
            self.set_px(&el, "top", at.y);
        }
    }

    fn panel_rect(&self, panel: PanelId) -> Option<ScreenRect> {
        let el = self.element(element_id(panel))?;
        el.class_list().contains(VISIBLE).then(|| rect_of(&el))
    }

    fn viewport(&self) -> Option<ScreenRect> {
        let window = web_sys::window()?;
        let width = window.inner_width().ok()?.as_f64()?;
        let height = window.inner_height().ok()?.as_f64()?;
        Some(ScreenRect {
            left: 0.0,
            top: 0.0,
            width,
            height,
        })
    }

    fn view_to_screen(&self, p: Vec2) -> Vec2 {
        self.view_fit().map_or(p, |fit| fit.to_screen(p))
    }

    fn screen_to_view(&self, p: Vec2) -> Vec2 {
        self.view_fit().map_or(p, |fit| fit.to_view(p))
    }
}

#[cfg(test)]
mod tests {
    use super::{ViewFit, escape, panel_markup, region_style};
    use foundation::math::Vec2;
    use pretty_assertions::assert_eq;
    use scene::regions::RegionId;
    use story::config::{MapColors, ViewBox};
    use story::overlay::ScreenRect;
    use story::panels::PanelContent;
    use story::present::{Highlight, HighlightStyle, RegionFill};

    #[test]
    fn escapes_markup() {
        assert_eq!(escape(r#"<b a="1">&'"#), "&lt;b a=&quot;1&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn history_markup_includes_mascot() {
        let html = panel_markup(&PanelContent::History {
            title: "1930".into(),
            text: "First <cup>".into(),
            mascot: Some("m.png".into()),
        })
        .expect("markup");
        assert!(html.contains("First &lt;cup&gt;"));
        assert!(html.contains(r#"src="m.png""#));
        assert_eq!(panel_markup(&PanelContent::Overlay), None);
    }

    #[test]
    fn highlight_styles() {
        let colors = MapColors::default();
        let h = Highlight {
            style: HighlightStyle::Focus,
            regions: vec![RegionFill {
                region: RegionId(2),
                fill: "#0038a8".into(),
            }],
            dim_opacity: 0.06,
        };
        assert_eq!(region_style(Some(&h), 2, &colors), ("#0038a8".to_string(), 1.0));
        assert_eq!(region_style(Some(&h), 0, &colors), (colors.base_fill.clone(), 0.06));
        assert_eq!(region_style(None, 2, &colors), (colors.base_fill.clone(), 1.0));
    }

    #[test]
    fn view_fit_letterboxes_and_inverts() {
        let svg = ScreenRect {
            left: 0.0,
            top: 0.0,
            width: 2000.0,
            height: 1600.0,
        };
        let fit = ViewFit::new(svg, ViewBox::default());
        let s = fit.to_screen(Vec2::new(500.0, 300.0));
        assert!((s.x - 1000.0).abs() < 1e-9);
        assert!((s.y - 800.0).abs() < 1e-9);
        let back = fit.to_view(s);
        assert!((back.x - 500.0).abs() < 1e-9 && (back.y - 300.0).abs() < 1e-9);
    }
}
