//! # Terrain Zones
//!
//! Zones are the 64x64 units the terrain is generated and retired in. Each
//! requested zone moves through the states of [`ZoneState`]; a zone absent
//! from the terrain's zone table has never been requested.

use std::collections::HashSet;

use super::coordinates::ZoneKey;

/// Lifecycle of a requested zone.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ZoneState {
    /// Chunks instantiated, fill task in flight.
    Filling,
    /// Blocks installed; chunks are meshed and drawn.
    Filled,
    /// Outside the border set; block data kept, meshes released.
    Retired,
}

/// Zones within `radius` zones of `center` (a square in zone space).
///
/// With `only_circumference`, only the outermost ring is returned.
pub fn zones_bordering(center: ZoneKey, radius: i32, only_circumference: bool) -> HashSet<ZoneKey> {
    let radius = radius.max(0);
    let mut zones = HashSet::with_capacity(((2 * radius + 1) * (2 * radius + 1)) as usize);
    for dx in -radius..=radius {
        for dz in -radius..=radius {
            if only_circumference && dx.abs() != radius && dz.abs() != radius {
                continue;
            }
            zones.insert(center.offset(dx, dz));
        }
    }
    zones
}
