//! Geometry queries over region shapes: area, containment, projected extent.

use foundation::bounds::Aabb2;
use foundation::math::precision::stable_total_cmp_f64;
use foundation::math::{GeoPoint, Projection, Vec2, ring_area_sr, ring_contains};
use formats::{Geometry, Ring};

/// Area of a polygon (outer ring minus holes) in steradians.
pub fn polygon_area_sr(polygon: &[Ring]) -> f64 {
    let Some((outer, holes)) = polygon.split_first() else {
        return 0.0;
    };
    let holes: f64 = holes.iter().map(|h| ring_area_sr(h)).sum();
    (ring_area_sr(outer) - holes).max(0.0)
}

pub fn geometry_area_sr(geometry: &Geometry) -> f64 {
    match geometry {
        Geometry::Polygon(p) => polygon_area_sr(p),
        Geometry::MultiPolygon(ps) => ps.iter().map(|p| polygon_area_sr(p)).sum(),
        Geometry::GeometryCollection(gs) => gs.iter().map(geometry_area_sr).sum(),
        _ => 0.0,
    }
}

/// The polygon used for framing a region.
///
/// A polygon is its own main polygon. A multipolygon yields its largest
/// member. A collection descends into its largest member and repeats. Ties
/// keep the earlier member. Geometries without any area yield `None`.
pub fn main_polygon(geometry: &Geometry) -> Option<&[Ring]> {
    match geometry {
        Geometry::Polygon(p) => Some(p.as_slice()),
        Geometry::MultiPolygon(ps) => largest_by(ps.iter(), |p| polygon_area_sr(p)).map(Vec::as_slice),
        Geometry::GeometryCollection(gs) => {
            let polygonal = gs.iter().filter(|g| {
                matches!(
                    g,
                    Geometry::Polygon(_) | Geometry::MultiPolygon(_) | Geometry::GeometryCollection(_)
                )
            });
            largest_by(polygonal, geometry_area_sr).and_then(main_polygon)
        }
        _ => None,
    }
}

fn largest_by<'a, T, I, F>(items: I, area: F) -> Option<&'a T>
where
    I: Iterator<Item = &'a T>,
    F: Fn(&T) -> f64,
{
    let mut best: Option<(&T, f64)> = None;
    for item in items {
        let a = area(item);
        match best {
            Some((_, best_area)) if stable_total_cmp_f64(a, best_area).is_le() => {}
            _ => best = Some((item, a)),
        }
    }
    best.map(|(item, _)| item)
}

pub fn polygon_contains(polygon: &[Ring], p: GeoPoint) -> bool {
    let Some((outer, holes)) = polygon.split_first() else {
        return false;
    };
    ring_contains(outer, p) && !holes.iter().any(|h| ring_contains(h, p))
}

pub fn geometry_contains(geometry: &Geometry, p: GeoPoint) -> bool {
    match geometry {
        Geometry::Polygon(poly) => polygon_contains(poly, p),
        Geometry::MultiPolygon(ps) => ps.iter().any(|poly| polygon_contains(poly, p)),
        Geometry::GeometryCollection(gs) => gs.iter().any(|g| geometry_contains(g, p)),
        _ => false,
    }
}

/// Every polygon of a geometry, collections flattened in document order.
pub fn polygons(geometry: &Geometry) -> Vec<&[Ring]> {
    let mut out = Vec::new();
    collect_polygons(geometry, &mut out);
    out
}

fn collect_polygons<'a>(geometry: &'a Geometry, out: &mut Vec<&'a [Ring]>) {
    match geometry {
        Geometry::Polygon(p) => out.push(p.as_slice()),
        Geometry::MultiPolygon(ps) => out.extend(ps.iter().map(Vec::as_slice)),
        Geometry::GeometryCollection(gs) => {
            for g in gs {
                collect_polygons(g, out);
            }
        }
        _ => {}
    }
}

/// Projected bounds of a polygon's outer ring.
pub fn projected_bounds(polygon: &[Ring], projection: &dyn Projection) -> Aabb2 {
    polygon
        .first()
        .map(|outer| projection.project_bounds(outer))
        .unwrap_or_default()
}

pub fn projected_geometry_bounds(geometry: &Geometry, projection: &dyn Projection) -> Aabb2 {
    polygons(geometry)
        .into_iter()
        .map(|p| projected_bounds(p, projection))
        .fold(Aabb2::empty(), |acc, b| acc.union(&b))
}

/// Area-weighted centroid of a projected polygon (holes subtract).
///
/// Falls back to the bounds centre for degenerate polygons.
pub fn projected_centroid(polygon: &[Ring], projection: &dyn Projection) -> Option<Vec2> {
    let mut area_sum = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for ring in polygon {
        let pts: Vec<Vec2> = ring.iter().map(|p| projection.project(*p)).collect();
        if pts.len() < 3 {
            continue;
        }
        for i in 0..pts.len() {
            let a = pts[i];
            let b = pts[(i + 1) % pts.len()];
            let cross = a.x * b.y - b.x * a.y;
            area_sum += cross;
            cx += (a.x + b.x) * cross;
            cy += (a.y + b.y) * cross;
        }
    }
    if area_sum.abs() > 1e-9 {
        // Signed sums: rings wound opposite to the outer ring subtract.
        return Some(Vec2::new(cx / (3.0 * area_sum), cy / (3.0 * area_sum)));
    }
    let b = projected_bounds(polygon, projection);
    if b.is_empty() { None } else { Some(b.center()) }
}

/// SVG path data (`M`/`L`/`Z`) for every polygon of a geometry.
pub fn svg_path(geometry: &Geometry, projection: &dyn Projection) -> String {
    let mut d = String::new();
    for polygon in polygons(geometry) {
        for ring in polygon {
            for (i, p) in ring.iter().enumerate() {
                let v = projection.project(*p);
                if !v.is_finite() {
                    continue;
                }
                let cmd = if i == 0 { 'M' } else { 'L' };
                d.push_str(&format!("{cmd}{:.2},{:.2}", v.x, v.y));
            }
            if !ring.is_empty() {
                d.push('Z');
            }
        }
    }
    d
}
