use std::collections::BTreeMap;

use foundation::bounds::Aabb2;
use foundation::math::{GeoPoint, Projection, Vec2};
use formats::{Feature, FeatureCollection, Geometry, Ring};

use crate::shape;

/// Property keys searched, in order, when matching a region by name.
pub const NAME_PROPERTIES: [&str; 5] = ["name", "NAME", "ADMIN", "Country", "NAME_EN"];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub u32);

impl RegionId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub id: RegionId,
    /// Every non-empty name property, in `NAME_PROPERTIES` order.
    pub names: Vec<String>,
    pub geometry: Geometry,
}

impl Region {
    pub fn display_name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or("")
    }

    pub fn main_polygon(&self) -> Option<&[Ring]> {
        shape::main_polygon(&self.geometry)
    }

    pub fn contains(&self, p: GeoPoint) -> bool {
        shape::geometry_contains(&self.geometry, p)
    }

    /// Projected bounds of the main polygon.
    pub fn main_bounds(&self, projection: &dyn Projection) -> Option<Aabb2> {
        let b = shape::projected_bounds(self.main_polygon()?, projection);
        if b.is_empty() { None } else { Some(b) }
    }

    pub fn main_centroid(&self, projection: &dyn Projection) -> Option<Vec2> {
        shape::projected_centroid(self.main_polygon()?, projection)
    }
}

/// The nameable regions of the map.
///
/// Lookup contract:
/// - aliases are applied first (`England` resolves as `United Kingdom`);
/// - names compare trimmed and case-insensitively against every property in
///   `NAME_PROPERTIES`;
/// - when several regions match, the lowest `RegionId` (document order) wins.
#[derive(Debug, Clone, Default)]
pub struct RegionRegistry {
    regions: Vec<Region>,
    aliases: BTreeMap<String, String>,
}

impl RegionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_features(collection: &FeatureCollection) -> Self {
        let mut registry = Self::new().with_alias("England", "United Kingdom");
        for feature in &collection.features {
            registry.push_feature(feature);
        }
        registry
    }

    pub fn with_alias(mut self, name: &str, canonical: &str) -> Self {
        self.aliases.insert(fold(name), canonical.to_string());
        self
    }

    pub fn push_feature(&mut self, feature: &Feature) -> RegionId {
        let names = NAME_PROPERTIES
            .iter()
            .filter_map(|k| feature.property_str(k))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        self.push(names, feature.geometry.clone())
    }

    pub fn push(&mut self, names: Vec<String>, geometry: Geometry) -> RegionId {
        let id = RegionId(self.regions.len() as u32);
        self.regions.push(Region {
            id,
            names,
            geometry,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn get(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    pub fn resolve(&self, name: &str) -> Option<RegionId> {
        let folded = fold(name);
        if folded.is_empty() {
            return None;
        }
        let target = match self.aliases.get(&folded) {
            Some(canonical) => fold(canonical),
            None => folded,
        };
        self.regions
            .iter()
            .find(|r| r.names.iter().any(|n| fold(n) == target))
            .map(|r| r.id)
    }

    pub fn resolve_region(&self, name: &str) -> Option<&Region> {
        self.resolve(name).and_then(|id| self.get(id))
    }

    /// Union of every region's projected extent.
    pub fn world_bounds(&self, projection: &dyn Projection) -> Aabb2 {
        self.regions
            .iter()
            .map(|r| shape::projected_geometry_bounds(&r.geometry, projection))
            .fold(Aabb2::empty(), |acc, b| acc.union(&b))
    }
}

fn fold(name: &str) -> String {
    name.trim().to_lowercase()
}
