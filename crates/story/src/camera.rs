//! Map camera: fit computations and the eased, retargetable transform.

use foundation::bounds::Aabb2;
use foundation::math::Vec2;
use foundation::Time;
use runtime::{Lerp, Tween};
use serde::Serialize;

use crate::config::{CameraConfig, FrameRect, ViewBox};

/// Uniform pan/zoom applied to the map layer: `screen = p * scale + translate`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct CameraTransform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
}

impl Default for CameraTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl CameraTransform {
    pub fn identity() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            scale: 1.0,
        }
    }

    /// The transform that maps `center` (plane coordinates) to `screen` at `scale`.
    pub fn centering(center: Vec2, screen: Vec2, scale: f64) -> Self {
        Self {
            translate_x: screen.x - scale * center.x,
            translate_y: screen.y - scale * center.y,
            scale,
        }
    }

    pub fn apply(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x * self.scale + self.translate_x,
            p.y * self.scale + self.translate_y,
        )
    }

    pub fn apply_bounds(&self, b: &Aabb2) -> Aabb2 {
        if b.is_empty() {
            return *b;
        }
        Aabb2::from_points([
            self.apply(Vec2::new(b.min[0], b.min[1])),
            self.apply(Vec2::new(b.max[0], b.max[1])),
        ])
    }

    /// SVG `transform` attribute value.
    pub fn to_svg(&self) -> String {
        format!(
            "translate({:.3},{:.3}) scale({:.5})",
            self.translate_x, self.translate_y, self.scale
        )
    }
}

impl Lerp for CameraTransform {
    fn lerp(self, to: Self, t: f64) -> Self {
        Self {
            translate_x: self.translate_x.lerp(to.translate_x, t),
            translate_y: self.translate_y.lerp(to.translate_y, t),
            scale: self.scale.lerp(to.scale, t),
        }
    }
}

/// Fit computations against a fixed view box.
///
/// All fits are uniform-scale. Zero-extent bounds would produce infinite
/// scales; those are capped at `center_max_scale`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Framing {
    pub view: ViewBox,
    pub camera: CameraConfig,
}

impl Framing {
    pub fn new(view: ViewBox, camera: CameraConfig) -> Self {
        Self { view, camera }
    }

    fn cap(&self, scale: f64) -> f64 {
        if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            self.camera.center_max_scale
        }
    }

    fn view_center(&self) -> Vec2 {
        Vec2::new(self.view.width * 0.5, self.view.height * 0.5)
    }

    /// `scale = (1 - padding) * min(W/dx, H/dy)`, centred.
    pub fn world_fit(&self, world: &Aabb2) -> CameraTransform {
        if world.is_empty() {
            return CameraTransform::identity();
        }
        let fit = (self.view.width / world.width()).min(self.view.height / world.height());
        let scale = self.cap((1.0 - self.camera.world_fit_padding) * fit);
        CameraTransform::centering(world.center(), self.view_center(), scale)
    }

    /// Zoom a region to the middle of the view, capped at `center_max_scale`.
    pub fn region_center(&self, bounds: &Aabb2) -> CameraTransform {
        let extent = (bounds.width() / self.view.width).max(bounds.height() / self.view.height);
        let scale = self
            .cap((1.0 - self.camera.center_padding) / extent)
            .min(self.camera.center_max_scale);
        CameraTransform::centering(bounds.center(), self.view_center(), scale)
    }

    /// Fit into the left-docked frame.
    pub fn left_frame(&self, bounds: &Aabb2) -> CameraTransform {
        let frame = self.view.left_frame();
        let scale = self.cap(fill_scale(bounds, &frame) * self.camera.left_frame_fill);
        CameraTransform::centering(bounds.center(), frame_center(&frame), scale)
    }

    /// Fit the union of two regions into the left frame, then shift right.
    pub fn two_region_left_frame(&self, a: &Aabb2, b: &Aabb2) -> CameraTransform {
        let frame = self.view.left_frame();
        let union = a.union(b);
        let scale = self.cap(fill_scale(&union, &frame) * self.camera.pair_frame_fill);
        let mut t = CameraTransform::centering(union.center(), frame_center(&frame), scale);
        t.translate_x += frame.w * self.camera.pair_offset_ratio;
        t
    }
}

fn fill_scale(bounds: &Aabb2, frame: &FrameRect) -> f64 {
    (frame.w / bounds.width()).min(frame.h / bounds.height())
}

fn frame_center(frame: &FrameRect) -> Vec2 {
    Vec2::new(frame.x + frame.w * 0.5, frame.y + frame.h * 0.5)
}

/// Owner of the current view transform.
///
/// `apply_transform` eases from the value currently on screen, so a new
/// request mid-flight never jumps. Each transition may carry a completion
/// hook; `tick` hands it back exactly once when that transition finishes. A
/// newer transition replaces (drops) the pending hook.
#[derive(Debug, Clone)]
pub struct Camera<H> {
    tween: Tween<CameraTransform>,
    pending: Option<H>,
}

impl<H> Camera<H> {
    pub fn new(initial: CameraTransform) -> Self {
        Self {
            tween: Tween::settled(initial),
            pending: None,
        }
    }

    pub fn apply_transform(
        &mut self,
        now: Time,
        target: CameraTransform,
        duration_ms: f64,
        hook: Option<H>,
    ) {
        self.tween.retarget(now, target, duration_ms);
        self.pending = hook;
    }

    /// The transform on screen at `now`.
    pub fn current(&self, now: Time) -> CameraTransform {
        self.tween.sample(now)
    }

    /// Where the camera is headed. Overlay placement measures against this.
    pub fn target(&self) -> CameraTransform {
        self.tween.target()
    }

    pub fn is_animating(&self, now: Time) -> bool {
        !self.tween.is_done(now)
    }

    pub fn has_pending_hook(&self) -> bool {
        self.pending.is_some()
    }

    pub fn clear_hook(&mut self) {
        self.pending = None;
    }

    /// Completion hook of the running transition, once it has finished.
    pub fn tick(&mut self, now: Time) -> Option<H> {
        if self.tween.is_done(now) {
            self.pending.take()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Camera, CameraTransform, Framing};
    use crate::config::{CameraConfig, ViewBox};
    use foundation::bounds::Aabb2;
    use foundation::math::Vec2;
    use foundation::Time;

    fn framing() -> Framing {
        Framing::new(ViewBox::default(), CameraConfig::default())
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn world_fit_centres_with_negative_padding() {
        let world = Aabb2::new([0.0, 0.0], [1000.0, 500.0]);
        let t = framing().world_fit(&world);
        assert!(close(t.scale, 1.35 * 1.0));
        let c = t.apply(world.center());
        assert!(close(c.x, 500.0) && close(c.y, 300.0));
    }

    #[test]
    fn region_center_is_capped() {
        let tiny = Aabb2::new([500.0, 300.0], [500.5, 300.5]);
        let t = framing().region_center(&tiny);
        assert_eq!(t.scale, 18.0);
        let point = Aabb2::new([10.0, 10.0], [10.0, 10.0]);
        assert_eq!(framing().region_center(&point).scale, 18.0);
    }

    #[test]
    fn region_center_scale_formula() {
        let b = Aabb2::new([0.0, 0.0], [100.0, 30.0]);
        // max(100/1000, 30/600) = 0.1 -> 0.86 / 0.1
        let t = framing().region_center(&b);
        assert!(close(t.scale, 8.6));
    }

    #[test]
    fn left_frame_centres_in_frame() {
        let b = Aabb2::new([100.0, 100.0], [200.0, 150.0]);
        let t = framing().left_frame(&b);
        // min(580/100, 520/50) * 0.9
        assert!(close(t.scale, 5.8 * 0.9));
        let c = t.apply(b.center());
        assert!(close(c.x, 40.0 + 290.0) && close(c.y, 40.0 + 260.0));
    }

    #[test]
    fn two_region_frame_uses_union_and_offset() {
        let a = Aabb2::new([0.0, 0.0], [10.0, 10.0]);
        let b = Aabb2::new([30.0, 0.0], [40.0, 10.0]);
        let t = framing().two_region_left_frame(&a, &b);
        assert!(close(t.scale, (580.0_f64 / 40.0).min(52.0) * 0.75));
        let c = t.apply(Vec2::new(20.0, 5.0));
        assert!(close(c.x, 330.0 + 580.0 * 0.3));
    }

    #[test]
    fn hook_fires_once_at_completion() {
        let mut cam: Camera<&str> = Camera::new(CameraTransform::identity());
        let target = CameraTransform::centering(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0), 2.0);
        cam.apply_transform(Time(0.0), target, 100.0, Some("done"));
        assert!(cam.is_animating(Time(50.0)));
        assert_eq!(cam.tick(Time(50.0)), None);
        assert_eq!(cam.target(), target);
        assert_eq!(cam.tick(Time(100.0)), Some("done"));
        assert_eq!(cam.tick(Time(200.0)), None);
        assert_eq!(cam.current(Time(200.0)), target);
    }

    #[test]
    fn retarget_drops_superseded_hook_and_continues_smoothly() {
        let mut cam: Camera<u8> = Camera::new(CameraTransform::identity());
        let far = CameraTransform {
            translate_x: 100.0,
            translate_y: 0.0,
            scale: 3.0,
        };
        cam.apply_transform(Time(0.0), far, 100.0, Some(1));
        let mid = cam.current(Time(50.0));
        cam.apply_transform(Time(50.0), CameraTransform::identity(), 100.0, Some(2));
        assert_eq!(cam.current(Time(50.0)), mid);
        assert_eq!(cam.tick(Time(100.0)), None);
        assert_eq!(cam.tick(Time(150.0)), Some(2));
    }

    #[test]
    fn svg_transform_string() {
        let t = CameraTransform {
            translate_x: 1.0,
            translate_y: -2.5,
            scale: 1.5,
        };
        assert_eq!(t.to_svg(), "translate(1.000,-2.500) scale(1.50000)");
    }
}
