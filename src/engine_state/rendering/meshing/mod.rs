//! Mesh generation for voxel chunks.
//!
//! This module converts a chunk's blocks into two GPU-friendly streams:
//! 1. An opaque stream holding every face of an opaque block that borders a transparent one
//! 2. A transparent stream holding every face of a water or lava block that borders
//!    a transparent block of another type
//!
//! # Architecture
//! - [`BlockSource`]: read capability over chunk-local coordinates, including one
//!   step past the chunk edge into its neighbors
//! - [`generate_chunk_mesh`]: the culled mesher, a pure function of a `BlockSource`
//! - `mesh/`: the quad and buffer types the mesher writes into
//! - [`ChunkRenderer`]: the draw interface implemented by the external renderer
//!
//! Worker tasks mesh against a [`ChunkNeighborhood`] snapshot, while the eager
//! path on the main thread meshes against the live terrain. Both go through
//! the same function and therefore emit identical output for identical blocks.
//!
//! [`ChunkNeighborhood`]: crate::engine_state::voxels::chunk::ChunkNeighborhood

use crate::engine_state::voxels::{
    block::{block_side::BlockSide, block_type::BlockType},
    chunk::{CHUNK_DEPTH, CHUNK_HEIGHT, CHUNK_WIDTH},
};

pub mod mesh;
pub mod renderer;

pub use mesh::{
    face::Face,
    mesh::{ChunkMeshData, MeshBuffers},
};
pub use renderer::{ChunkRenderer, CountingRenderer};

/// Read access to blocks in chunk-local coordinates.
///
/// Implementations must accept coordinates one step outside `[0, 16)` on X and Z
/// and outside `[0, 256)` on Y, returning `EMPTY` where nothing is known.
pub trait BlockSource {
    /// The block at the given chunk-local coordinate.
    fn block_at(&self, x: i32, y: i32, z: i32) -> BlockType;
}

impl<F> BlockSource for F
where
    F: Fn(i32, i32, i32) -> BlockType,
{
    fn block_at(&self, x: i32, y: i32, z: i32) -> BlockType {
        self(x, y, z)
    }
}

/// Builds the opaque and transparent meshes of one chunk.
///
/// Blocks are visited Z-major, then Y, then X, and faces in [`BlockSide::all`]
/// order, so the output is fully determined by the blocks `source` returns.
pub fn generate_chunk_mesh(source: &impl BlockSource) -> ChunkMeshData {
    let mut mesh = ChunkMeshData::default();

    for z in 0..CHUNK_DEPTH {
        for y in 0..CHUNK_HEIGHT {
            for x in 0..CHUNK_WIDTH {
                let current = source.block_at(x, y, z);
                if current == BlockType::EMPTY {
                    continue;
                }

                let stream = if current.is_transparent() {
                    &mut mesh.transparent
                } else {
                    &mut mesh.opaque
                };

                for side in BlockSide::all() {
                    let step = side.offset();
                    let neighbor = source.block_at(x + step.x, y + step.y, z + step.z);
                    if current.shows_face_towards(neighbor) {
                        stream.push_face(&Face::new(x, y, z, current, side));
                    }
                }
            }
        }
    }

    mesh
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::engine_state::voxels::chunk::{ChunkBlocks, ChunkNeighborhood};

    fn neighborhood_with(cells: &[((i32, i32, i32), BlockType)]) -> ChunkNeighborhood {
        let mut blocks = ChunkBlocks::new();
        for &((x, y, z), block) in cells {
            blocks.set(x, y, z, block).unwrap();
        }
        ChunkNeighborhood::isolated(Arc::new(blocks))
    }

    #[test]
    fn isolated_block_emits_six_faces() {
        let mesh = generate_chunk_mesh(&neighborhood_with(&[((4, 100, 7), BlockType::STONE)]));
        assert_eq!(mesh.opaque.face_count(), 6);
        assert_eq!(mesh.opaque.vertices.len(), 24);
        assert_eq!(mesh.opaque.index_count(), 36);
        assert!(mesh.transparent.is_empty());
    }

    #[test]
    fn fully_surrounded_solid_chunk_emits_nothing() {
        let mesh = generate_chunk_mesh(&|_x: i32, _y: i32, _z: i32| BlockType::STONE);
        assert_eq!(mesh.opaque.index_count(), 0);
        assert_eq!(mesh.transparent.index_count(), 0);
    }

    #[test]
    fn solid_chunk_without_neighbors_only_shows_its_hull() {
        let source = |x: i32, y: i32, z: i32| match ChunkBlocks::index(x, y, z) {
            Some(_) => BlockType::DIRT,
            None => BlockType::EMPTY,
        };
        let mesh = generate_chunk_mesh(&source);
        let hull = 2 * 16 * 16 + 4 * 16 * 256;
        assert_eq!(mesh.opaque.face_count(), hull);
        assert_eq!(mesh.opaque.index_count() % 6, 0);
    }

    #[test]
    fn adjacent_water_shares_no_internal_face() {
        let mesh = generate_chunk_mesh(&neighborhood_with(&[
            ((3, 130, 3), BlockType::WATER),
            ((4, 130, 3), BlockType::WATER),
        ]));
        assert_eq!(mesh.transparent.face_count(), 10);
        assert!(mesh.opaque.is_empty());
    }

    #[test]
    fn water_against_stone_only_draws_the_stone_side() {
        let mesh = generate_chunk_mesh(&neighborhood_with(&[
            ((3, 130, 3), BlockType::WATER),
            ((3, 129, 3), BlockType::STONE),
        ]));
        assert_eq!(mesh.transparent.face_count(), 5, "water hides its bottom face");
        assert_eq!(mesh.opaque.face_count(), 6, "stone still shows its top under water");
    }

    #[test]
    fn water_against_lava_draws_both_sides() {
        let mesh = generate_chunk_mesh(&neighborhood_with(&[
            ((3, 70, 3), BlockType::WATER),
            ((3, 70, 4), BlockType::LAVA),
        ]));
        assert_eq!(mesh.transparent.face_count(), 12);
    }

    #[test]
    fn edge_faces_are_culled_against_linked_neighbor() {
        let mut east = ChunkBlocks::new();
        east.set(0, 10, 5, BlockType::STONE).unwrap();
        let view = neighborhood_with(&[((15, 10, 5), BlockType::STONE)])
            .with_neighbor(BlockSide::XPOS, Arc::new(east));

        let mesh = generate_chunk_mesh(&view);
        assert_eq!(mesh.opaque.face_count(), 5);
        assert!(mesh
            .opaque
            .vertices
            .iter()
            .all(|v| v.normal != [1.0, 0.0, 0.0, 0.0]));
    }

    #[test]
    fn quads_use_fan_winding_with_running_offsets() {
        let mesh = generate_chunk_mesh(&neighborhood_with(&[
            ((0, 1, 0), BlockType::GRASS),
            ((9, 1, 9), BlockType::GRASS),
        ]));
        assert_eq!(&mesh.opaque.indices[..6], &[0, 1, 2, 0, 2, 3]);
        assert_eq!(&mesh.opaque.indices[6..12], &[4, 5, 6, 4, 6, 7]);
        let vertex_count = mesh.opaque.vertices.len() as u32;
        assert!(mesh.opaque.indices.iter().all(|&i| i < vertex_count));
    }

    #[test]
    fn meshing_is_repeatable() {
        let mut rng = fastrand::Rng::with_seed(99);
        let cells: Vec<_> = (0..3000)
            .map(|_| {
                (
                    (rng.i32(0..16), rng.i32(0..256), rng.i32(0..16)),
                    BlockType::ALL[rng.usize(..BlockType::ALL.len())],
                )
            })
            .collect();
        let view = neighborhood_with(&cells);

        let first = generate_chunk_mesh(&view);
        let second = generate_chunk_mesh(&view);
        assert_eq!(
            bytemuck::cast_slice::<_, u8>(first.opaque.vertices.as_slice()),
            bytemuck::cast_slice::<_, u8>(second.opaque.vertices.as_slice())
        );
        assert_eq!(first, second);
        assert_eq!(first.opaque.index_count() % 6, 0);
        assert_eq!(first.transparent.index_count() % 6, 0);
    }
}
