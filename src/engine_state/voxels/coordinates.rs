//! # Coordinate Keys
//!
//! Composite keys addressing chunks and terrain zones in the Terrain Map.
//!
//! Both keys store the world-space block origin of the cell they name, so a
//! chunk key is always a multiple of [`CHUNK_WIDTH`] and a zone key a multiple
//! of [`ZONE_WIDTH`]. Conversions from arbitrary world positions use Euclidean
//! division so that negative coordinates map to the cell below them, never
//! towards zero.
//!
//! The world is bounded by the `i32` block range. Offsets saturate at its
//! edges and snap back to the outermost aligned key, so stepping past the
//! last chunk or zone returns that chunk or zone again.

use cgmath::Point3;

use super::chunk::{CHUNK_DEPTH, CHUNK_WIDTH};

/// Width of a terrain zone in blocks.
pub const ZONE_WIDTH: i32 = 64;
/// Number of chunks along one side of a zone.
pub const CHUNKS_PER_ZONE_SIDE: i32 = ZONE_WIDTH / CHUNK_WIDTH;

/// Identifies a chunk by the world-space origin of its corner block.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkKey {
    /// World X of the chunk origin.
    pub x: i32,
    /// World Z of the chunk origin.
    pub z: i32,
}

impl ChunkKey {
    /// Returns the key of the chunk containing world column `(x, z)`.
    pub fn containing(x: i32, z: i32) -> Self {
        ChunkKey {
            x: x.div_euclid(CHUNK_WIDTH) * CHUNK_WIDTH,
            z: z.div_euclid(CHUNK_DEPTH) * CHUNK_DEPTH,
        }
    }

    /// Returns the key of the chunk `dx`, `dz` chunks away from this one,
    /// clamped to the edge of the world.
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self::containing(
            self.x.saturating_add(dx.saturating_mul(CHUNK_WIDTH)),
            self.z.saturating_add(dz.saturating_mul(CHUNK_DEPTH)),
        )
    }

    /// The zone this chunk belongs to.
    pub fn zone(self) -> ZoneKey {
        ZoneKey::containing(self.x, self.z)
    }

    /// Packs the key into the legacy 64-bit form: X in the high word, Z in the low word.
    pub fn pack(self) -> i64 {
        ((self.x as i64) << 32) | (self.z as u32 as i64)
    }

    /// Inverse of [`ChunkKey::pack`], sign-extending both halves.
    pub fn unpack(packed: i64) -> Self {
        ChunkKey {
            x: (packed >> 32) as i32,
            z: packed as i32,
        }
    }
}

/// Identifies a 64x64 terrain zone by its world-space origin.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ZoneKey {
    /// World X of the zone origin.
    pub x: i32,
    /// World Z of the zone origin.
    pub z: i32,
}

impl ZoneKey {
    /// Returns the zone containing world column `(x, z)`.
    pub fn containing(x: i32, z: i32) -> Self {
        ZoneKey {
            x: x.div_euclid(ZONE_WIDTH) * ZONE_WIDTH,
            z: z.div_euclid(ZONE_WIDTH) * ZONE_WIDTH,
        }
    }

    /// Returns the zone containing a floating point observer position.
    ///
    /// Positions beyond the `i32` range land in the outermost zone.
    pub fn containing_point(position: Point3<f32>) -> Self {
        Self::containing(position.x.floor() as i32, position.z.floor() as i32)
    }

    /// Returns the zone `dx`, `dz` zones away from this one, clamped to the
    /// edge of the world.
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self::containing(
            self.x.saturating_add(dx.saturating_mul(ZONE_WIDTH)),
            self.z.saturating_add(dz.saturating_mul(ZONE_WIDTH)),
        )
    }

    /// The sixteen chunk keys covered by this zone, X-major.
    pub fn chunk_keys(self) -> impl Iterator<Item = ChunkKey> {
        (0..CHUNKS_PER_ZONE_SIDE).flat_map(move |dx| {
            (0..CHUNKS_PER_ZONE_SIDE).map(move |dz| {
                ChunkKey {
                    x: self.x,
                    z: self.z,
                }
                .offset(dx, dz)
            })
        })
    }
}
