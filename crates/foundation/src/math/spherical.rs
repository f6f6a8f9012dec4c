//! Unit-sphere helpers for lon/lat rings.

/// Geographic coordinate in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl GeoPoint {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }
}

/// Unsigned area of a closed ring on the unit sphere, in steradians.
///
/// Uses the trapezoid approximation
/// `|sum (lon2 - lon1) * (2 + sin lat1 + sin lat2)| / 2`, which is exact
/// enough to rank country polygons against each other. Rings that cross the
/// antimeridian are unwrapped edge by edge.
pub fn ring_area_sr(ring: &[GeoPoint]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        let mut dlon = (b.lon_deg - a.lon_deg).to_radians();
        if dlon > std::f64::consts::PI {
            dlon -= 2.0 * std::f64::consts::PI;
        } else if dlon < -std::f64::consts::PI {
            dlon += 2.0 * std::f64::consts::PI;
        }
        sum += dlon * (2.0 + a.lat_deg.to_radians().sin() + b.lat_deg.to_radians().sin());
    }
    (sum * 0.5).abs()
}

/// Even-odd point-in-ring test in lon/lat degrees.
pub fn ring_contains(ring: &[GeoPoint], p: GeoPoint) -> bool {
    let mut inside = false;
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let a = ring[i];
        let b = ring[j];
        if (a.lat_deg > p.lat_deg) != (b.lat_deg > p.lat_deg) {
            let t = (p.lat_deg - a.lat_deg) / (b.lat_deg - a.lat_deg);
            let x = a.lon_deg + t * (b.lon_deg - a.lon_deg);
            if p.lon_deg < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
