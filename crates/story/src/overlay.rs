//! Marker (avatar) placement and the connector to the match panel.

use foundation::bounds::Aabb2;
use foundation::math::{GeoPoint, Projection, Vec2};
use scene::regions::Region;
use serde::Serialize;

use crate::camera::CameraTransform;
use crate::config::OverlayConfig;

/// Screen-space rectangle as reported by layout measurement.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize)]
pub struct ScreenRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width * 0.5, self.top + self.height * 0.5)
    }
}

/// Top-left of the marker box plus the point the connector leaves from.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MarkerPlacement {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub anchor: Vec2,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ConnectorLine {
    pub from: Vec2,
    pub to: Vec2,
}

/// Clamp one axis of the marker box into `[min, max]`.
///
/// The preferred interval keeps `margin` clear on both sides. When the region
/// is too small for that, the box is centred in `[min, max - size]`, and when
/// it is smaller than the box itself it sits at `min`.
pub fn clamp_axis(value: f64, min: f64, max: f64, size: f64, margin: f64) -> f64 {
    let lo = min + margin;
    let hi = max - size - margin;
    if lo <= hi {
        return value.clamp(lo, hi);
    }
    let far = max - size;
    if far >= min {
        (min + far) * 0.5
    } else {
        min
    }
}

/// Screen bounds of the active region's main polygon under `camera`.
pub fn region_screen_bounds(
    active: &Region,
    projection: &dyn Projection,
    camera: &CameraTransform,
) -> Option<Aabb2> {
    let bounds = active.main_bounds(projection)?;
    Some(camera.apply_bounds(&bounds))
}

/// Place the marker on the match point, or on the active region's centroid
/// when the match has no coordinates.
///
/// `camera` should be the transform the camera is heading to, so placement is
/// final even while the map is still easing. Returns `None` when neither a
/// point nor a centroid is available.
pub fn place_marker(
    point: Option<GeoPoint>,
    active: &Region,
    projection: &dyn Projection,
    camera: &CameraTransform,
    cfg: &OverlayConfig,
) -> Option<MarkerPlacement> {
    let size = cfg.marker_size;
    let (mut x, mut y) = match point {
        Some(p) => {
            let s = camera.apply(projection.project(p));
            (s.x - size * 0.5, s.y - (size + cfg.marker_lift))
        }
        None => {
            let c = camera.apply(active.main_centroid(projection)?);
            (c.x - size * 0.5, c.y - size * 0.5)
        }
    };
    if !(x.is_finite() && y.is_finite()) {
        return None;
    }

    if let Some(b) = region_screen_bounds(active, projection, camera) {
        x = clamp_axis(x, b.min[0], b.max[0], size, cfg.marker_margin);
        y = clamp_axis(y, b.min[1], b.max[1], size, cfg.marker_margin);
    }

    Some(MarkerPlacement {
        x,
        y,
        size,
        anchor: Vec2::new(x + cfg.anchor_x * size, y + cfg.anchor_y * size),
    })
}

/// Left-centre anchor of a panel, inset horizontally.
pub fn panel_anchor(rect: &ScreenRect, inset: f64) -> Vec2 {
    Vec2::new(rect.left + inset, rect.top + rect.height * 0.5)
}

pub fn compute_connector_line(marker_anchor: Vec2, panel_anchor: Vec2) -> ConnectorLine {
    ConnectorLine {
        from: marker_anchor,
        to: panel_anchor,
    }
}
