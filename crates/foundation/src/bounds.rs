use crate::math::Vec2;

/// Axis-aligned bounding box in plane (view box) coordinates.
///
/// An empty box has `min > max`; including the first point makes it a
/// degenerate box of zero extent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb2 {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Aabb2 {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Aabb2 { min, max }
    }

    pub fn empty() -> Self {
        Aabb2 {
            min: [f64::INFINITY, f64::INFINITY],
            max: [f64::NEG_INFINITY, f64::NEG_INFINITY],
        }
    }

    pub fn from_points<I: IntoIterator<Item = Vec2>>(points: I) -> Self {
        let mut out = Self::empty();
        for p in points {
            out.include(p);
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        !(self.min[0] <= self.max[0] && self.min[1] <= self.max[1])
    }

    pub fn include(&mut self, p: Vec2) {
        if !p.x.is_finite() || !p.y.is_finite() {
            return;
        }
        self.min[0] = self.min[0].min(p.x);
        self.min[1] = self.min[1].min(p.y);
        self.max[0] = self.max[0].max(p.x);
        self.max[1] = self.max[1].max(p.y);
    }

    pub fn union(&self, other: &Aabb2) -> Aabb2 {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Aabb2 {
            min: [self.min[0].min(other.min[0]), self.min[1].min(other.min[1])],
            max: [self.max[0].max(other.max[0]), self.max[1].max(other.max[1])],
        }
    }

    pub fn width(&self) -> f64 {
        if self.is_empty() { 0.0 } else { self.max[0] - self.min[0] }
    }

    pub fn height(&self) -> f64 {
        if self.is_empty() { 0.0 } else { self.max[1] - self.min[1] }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
        )
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min[0] && p.x <= self.max[0] && p.y >= self.min[1] && p.y <= self.max[1]
    }
}

impl Default for Aabb2 {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::Aabb2;
    use crate::math::Vec2;

    #[test]
    fn from_points_tracks_extent() {
        let b = Aabb2::from_points([Vec2::new(3.0, -1.0), Vec2::new(-2.0, 4.0)]);
        assert_eq!(b, Aabb2::new([-2.0, -1.0], [3.0, 4.0]));
        assert_eq!(b.width(), 5.0);
        assert_eq!(b.height(), 5.0);
        assert_eq!(b.center(), Vec2::new(0.5, 1.5));
    }

    #[test]
    fn empty_box_is_neutral_for_union() {
        let e = Aabb2::empty();
        let b = Aabb2::new([0.0, 0.0], [1.0, 2.0]);
        assert!(e.is_empty());
        assert_eq!(e.union(&b), b);
        assert_eq!(b.union(&e), b);
        assert_eq!(e.width(), 0.0);
    }

    #[test]
    fn include_ignores_non_finite() {
        let mut b = Aabb2::empty();
        b.include(Vec2::new(f64::NAN, 1.0));
        assert!(b.is_empty());
        b.include(Vec2::new(1.0, 1.0));
        assert!(!b.is_empty());
        assert!(b.contains(Vec2::new(1.0, 1.0)));
    }
}
