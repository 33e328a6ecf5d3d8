//! # Block Module
//!
//! Block type definitions, block faces, and the texture atlas lookup that maps
//! a (block type, face) pair to a tile of the 16x16 atlas.

use block_side::BlockSide;
use block_type::BlockType;

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block types in memory.
pub type BlockTypeSize = u8;

/// Number of tiles along one side of the texture atlas.
pub const ATLAS_TILES_PER_SIDE: u32 = 16;

/// Size of one atlas tile in UV units.
pub const ATLAS_TILE_UV: f32 = 1.0 / ATLAS_TILES_PER_SIDE as f32;

/// Maps each block type to its atlas tile `(column, row)` for each face.
///
/// The outer array is indexed by `BlockType as usize`, the inner one by
/// `BlockSide as usize`: [XPOS, XNEG, YPOS, YNEG, ZPOS, ZNEG].
pub static BLOCK_TYPE_TO_ATLAS_TILES: [[(u8, u8); 6]; 8] = [
    [(0, 0); 6],                                                  // EMPTY (never drawn)
    [(3, 15), (3, 15), (8, 13), (2, 15), (3, 15), (3, 15)],       // GRASS
    [(2, 15); 6],                                                 // DIRT
    [(1, 15); 6],                                                 // STONE
    [(13, 3); 6],                                                 // WATER
    [(2, 11); 6],                                                 // SNOW
    [(1, 14); 6],                                                 // BEDROCK
    [(13, 1); 6],                                                 // LAVA
];

/// Returns the UV origin of the atlas tile for a block face.
pub fn atlas_uv_origin(block_type: BlockType, side: BlockSide) -> [f32; 2] {
    let (column, row) = BLOCK_TYPE_TO_ATLAS_TILES[block_type as usize][side as usize];
    [column as f32 * ATLAS_TILE_UV, row as f32 * ATLAS_TILE_UV]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grass_has_distinct_top_and_bottom() {
        let top = atlas_uv_origin(BlockType::GRASS, BlockSide::YPOS);
        let bottom = atlas_uv_origin(BlockType::GRASS, BlockSide::YNEG);
        let side = atlas_uv_origin(BlockType::GRASS, BlockSide::ZNEG);
        assert_eq!(top, [0.5, 13.0 / 16.0]);
        assert_eq!(bottom, atlas_uv_origin(BlockType::DIRT, BlockSide::XPOS));
        assert_ne!(top, side);
    }

    #[test]
    fn every_tile_fits_in_the_atlas() {
        for block in BlockType::ALL {
            for side in BlockSide::all() {
                let [u, v] = atlas_uv_origin(block, side);
                assert!((0.0..1.0).contains(&u) && (0.0..1.0).contains(&v));
            }
        }
    }
}
