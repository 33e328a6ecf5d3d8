//! # Column Filler
//!
//! Stamps block types into the vertical columns of a chunk from the biome's
//! height field. Rules, bottom to top, for a column of surface height `h`:
//!
//! 1. `y = 0` is bedrock.
//! 2. `y` in `[1, 128]` is stone, except where a cave is carved above `y = 63`:
//!    lava below `y = 85`, empty from there up.
//! 3. `y` in `[129, h)` depends on the regime. Grassland (`h < 150`) is dirt
//!    with the two topmost blocks grass. Mountains are stone, and when
//!    `h > 200` the two topmost blocks are snow.
//! 4. Any cell in `[128, 139)` still empty afterwards becomes water.

use crate::error::TerrainError;

use super::{
    biome::BiomeSampler,
    block::block_type::BlockType,
    chunk::{ChunkBlocks, CHUNK_DEPTH, CHUNK_WIDTH},
    coordinates::ChunkKey,
};

/// Highest y of the stone and cave layer.
pub const STONE_LAYER_TOP: i32 = 128;
/// Caves are only carved strictly above this height.
pub const CAVE_FLOOR: i32 = 63;
/// Carved cells below this height fill with lava.
pub const LAVA_LEVEL: i32 = 85;
/// First y flooded by the water pass.
pub const WATER_BOTTOM: i32 = 128;
/// First y above the water pass.
pub const WATER_TOP: i32 = 139;
/// Surfaces at or above this height use the mountain rules.
pub const MOUNTAIN_THRESHOLD: i32 = 150;
/// Mountains taller than this are capped with snow.
pub const SNOW_LINE: i32 = 200;

/// Block type of a single cell above bedrock, before the water pass.
fn block_for(sampler: &BiomeSampler, wx: i32, y: i32, wz: i32, height: i32) -> BlockType {
    if y <= STONE_LAYER_TOP {
        if y > CAVE_FLOOR && sampler.is_cave(wx, y, wz) {
            return if y < LAVA_LEVEL {
                BlockType::LAVA
            } else {
                BlockType::EMPTY
            };
        }
        return BlockType::STONE;
    }

    let capped = y >= height - 2;
    if height < MOUNTAIN_THRESHOLD {
        if capped {
            BlockType::GRASS
        } else {
            BlockType::DIRT
        }
    } else if capped && height > SNOW_LINE {
        BlockType::SNOW
    } else {
        BlockType::STONE
    }
}

/// Fills the column at chunk-local `(x, z)` and returns its surface height.
pub fn fill_column(
    blocks: &mut ChunkBlocks,
    origin: ChunkKey,
    x: i32,
    z: i32,
    sampler: &BiomeSampler,
) -> Result<i32, TerrainError> {
    let (wx, wz) = (origin.x + x, origin.z + z);
    let height = sampler.surface_height(wx, wz);

    blocks.set(x, 0, z, BlockType::BEDROCK)?;
    for y in 1..height {
        blocks.set(x, y, z, block_for(sampler, wx, y, wz, height))?;
    }

    for y in WATER_BOTTOM..WATER_TOP {
        if blocks.get(x, y, z) == BlockType::EMPTY {
            blocks.set(x, y, z, BlockType::WATER)?;
        }
    }

    Ok(height)
}

/// Generates the full contents of the chunk at `origin`.
pub fn fill_chunk(origin: ChunkKey, sampler: &BiomeSampler) -> Result<ChunkBlocks, TerrainError> {
    let mut blocks = ChunkBlocks::new();
    for x in 0..CHUNK_WIDTH {
        for z in 0..CHUNK_DEPTH {
            fill_column(&mut blocks, origin, x, z, sampler)?;
        }
    }
    Ok(blocks)
}
