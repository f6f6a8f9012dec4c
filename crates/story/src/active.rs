//! Which region(s) the story is currently about.

use scene::regions::{RegionId, RegionRegistry};

use crate::tournament::{Match, Tournament};

/// Owned by the machine; nothing else writes it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActiveRegionState {
    /// `"{region}-{year}"` of the focused tournament view.
    pub region_key: Option<String>,
    pub primary: Option<RegionId>,
    pub secondary: Option<RegionId>,
    pub is_centered: bool,
}

impl ActiveRegionState {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn set(&mut self, key: String, primary: RegionId, secondary: Option<RegionId>) {
        self.region_key = Some(key);
        self.primary = Some(primary);
        self.secondary = secondary;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveRegion {
    pub region: RegionId,
    pub name: String,
    pub flag: String,
}

/// The host, unless the match was played inside the co-host's territory.
///
/// Returns `None` when the chosen region has no geometry.
pub fn resolve_active_region_for_match(
    m: &Match,
    tournament: &Tournament,
    registry: &RegionRegistry,
) -> Option<ActiveRegion> {
    if let (Some(co_host), Some(point)) = (tournament.co_host.as_deref(), m.location) {
        if let Some(region) = registry.resolve_region(co_host) {
            if region.contains(point) {
                let flag = tournament
                    .co_host_flag
                    .clone()
                    .unwrap_or_else(|| tournament.host_flag.clone());
                return Some(ActiveRegion {
                    region: region.id,
                    name: co_host.to_string(),
                    flag,
                });
            }
        }
    }
    registry.resolve(&tournament.host).map(|region| ActiveRegion {
        region,
        name: tournament.host.clone(),
        flag: tournament.host_flag.clone(),
    })
}
