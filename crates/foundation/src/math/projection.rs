//! Plane projections from lon/lat degrees into view box coordinates.
//!
//! View box convention: `x` grows to the right, `y` grows downwards.

use super::{GeoPoint, Vec2};
use crate::bounds::Aabb2;

pub trait Projection {
    fn project(&self, p: GeoPoint) -> Vec2;

    fn project_bounds(&self, points: &[GeoPoint]) -> Aabb2 {
        Aabb2::from_points(points.iter().map(|p| self.project(*p)))
    }
}

/// Natural Earth I pseudo-cylindrical projection (Šavrič et al. polynomial).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NaturalEarth1 {
    pub scale: f64,
    pub translate: Vec2,
}

impl NaturalEarth1 {
    pub fn new(scale: f64, translate: Vec2) -> Self {
        Self { scale, translate }
    }

    /// Scale 180 centred in a `width x height` view box.
    pub fn for_view_box(width: f64, height: f64) -> Self {
        Self::new(180.0, Vec2::new(width * 0.5, height * 0.5))
    }

    fn raw(lambda: f64, phi: f64) -> (f64, f64) {
        let phi2 = phi * phi;
        let phi4 = phi2 * phi2;
        let x = lambda
            * (0.8707 - 0.131979 * phi2
                + phi4 * (-0.013791 + phi4 * (0.003971 * phi2 - 0.001529 * phi4)));
        let y = phi
            * (1.007226
                + phi2 * (0.015085 + phi4 * (-0.044475 + 0.028874 * phi2 - 0.005916 * phi4)));
        (x, y)
    }
}

impl Projection for NaturalEarth1 {
    fn project(&self, p: GeoPoint) -> Vec2 {
        let lat = p.lat_deg.clamp(-90.0, 90.0);
        let (x, y) = Self::raw(p.lon_deg.to_radians(), lat.to_radians());
        Vec2::new(
            self.translate.x + self.scale * x,
            self.translate.y - self.scale * y,
        )
    }
}

/// Plate carrée; one degree maps to `scale` units.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Equirectangular {
    pub scale: f64,
    pub translate: Vec2,
}

impl Projection for Equirectangular {
    fn project(&self, p: GeoPoint) -> Vec2 {
        Vec2::new(
            self.translate.x + self.scale * p.lon_deg,
            self.translate.y - self.scale * p.lat_deg,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Equirectangular, NaturalEarth1, Projection};
    use crate::math::{GeoPoint, Vec2};

    #[test]
    fn origin_maps_to_translate() {
        let p = NaturalEarth1::for_view_box(1000.0, 600.0);
        assert_eq!(p.project(GeoPoint::new(0.0, 0.0)), Vec2::new(500.0, 300.0));
    }

    #[test]
    fn east_is_right_and_north_is_up() {
        let p = NaturalEarth1::for_view_box(1000.0, 600.0);
        let east = p.project(GeoPoint::new(90.0, 0.0));
        let north = p.project(GeoPoint::new(0.0, 45.0));
        assert!(east.x > 500.0);
        assert!(north.y < 300.0);
    }

    #[test]
    fn world_fits_expected_envelope() {
        // Natural Earth I spans roughly 2.73 x 1.42 radians-units at unit scale.
        let p = NaturalEarth1::for_view_box(1000.0, 600.0);
        let b = p.project_bounds(&[
            GeoPoint::new(-180.0, 0.0),
            GeoPoint::new(180.0, 0.0),
            GeoPoint::new(0.0, 90.0),
            GeoPoint::new(0.0, -90.0),
        ]);
        assert!((b.width() - 180.0 * 2.0 * std::f64::consts::PI * 0.8707).abs() < 1e-6);
        assert!(b.height() > 400.0 && b.height() < 520.0);
    }

    #[test]
    fn equirectangular_is_linear() {
        let p = Equirectangular {
            scale: 2.0,
            translate: Vec2::new(10.0, 10.0),
        };
        assert_eq!(p.project(GeoPoint::new(5.0, 5.0)), Vec2::new(20.0, 0.0));
    }
}
