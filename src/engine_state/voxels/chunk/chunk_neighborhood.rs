//! Read-only view of a chunk together with its four horizontal neighbors.

use std::sync::Arc;

use crate::engine_state::{
    rendering::meshing::BlockSource,
    voxels::block::{block_side::BlockSide, block_type::BlockType},
};

use super::{ChunkBlocks, CHUNK_DEPTH, CHUNK_HEIGHT, CHUNK_WIDTH};

/// Snapshots of a chunk's blocks and of whichever horizontal neighbors exist.
///
/// Coordinates are chunk-local. Reads one step past an X or Z edge resolve
/// into the neighbor on that side; a missing neighbor, a diagonal position or
/// a height outside `[0, 256)` reads as `EMPTY`.
#[derive(Clone, Debug)]
pub struct ChunkNeighborhood {
    center: Arc<ChunkBlocks>,
    /// Indexed by [`neighbor_slot`]: XPOS, XNEG, ZPOS, ZNEG.
    neighbors: [Option<Arc<ChunkBlocks>>; 4],
}

/// Slot of a horizontal side in the neighbor array.
fn neighbor_slot(side: BlockSide) -> Option<usize> {
    match side {
        BlockSide::XPOS => Some(0),
        BlockSide::XNEG => Some(1),
        BlockSide::ZPOS => Some(2),
        BlockSide::ZNEG => Some(3),
        BlockSide::YPOS | BlockSide::YNEG => None,
    }
}

impl ChunkNeighborhood {
    /// A chunk with no neighbors linked.
    pub fn isolated(center: Arc<ChunkBlocks>) -> Self {
        ChunkNeighborhood {
            center,
            neighbors: [None, None, None, None],
        }
    }

    /// Links `blocks` as the neighbor on `side`. Vertical sides are ignored.
    pub fn with_neighbor(mut self, side: BlockSide, blocks: Arc<ChunkBlocks>) -> Self {
        if let Some(slot) = neighbor_slot(side) {
            self.neighbors[slot] = Some(blocks);
        }
        self
    }

    /// Whether a neighbor is linked on `side`.
    pub fn has_neighbor(&self, side: BlockSide) -> bool {
        neighbor_slot(side).is_some_and(|slot| self.neighbors[slot].is_some())
    }

    fn neighbor(&self, side: BlockSide) -> Option<&ChunkBlocks> {
        neighbor_slot(side).and_then(|slot| self.neighbors[slot].as_deref())
    }
}

impl BlockSource for ChunkNeighborhood {
    fn block_at(&self, x: i32, y: i32, z: i32) -> BlockType {
        if !(0..CHUNK_HEIGHT).contains(&y) {
            return BlockType::EMPTY;
        }
        let x_inside = (0..CHUNK_WIDTH).contains(&x);
        let z_inside = (0..CHUNK_DEPTH).contains(&z);

        let (side, lx, lz) = match (x_inside, z_inside) {
            (true, true) => return self.center.get(x, y, z),
            (false, true) if x >= CHUNK_WIDTH => (BlockSide::XPOS, x - CHUNK_WIDTH, z),
            (false, true) => (BlockSide::XNEG, x + CHUNK_WIDTH, z),
            (true, false) if z >= CHUNK_DEPTH => (BlockSide::ZPOS, x, z - CHUNK_DEPTH),
            (true, false) => (BlockSide::ZNEG, x, z + CHUNK_DEPTH),
            (false, false) => return BlockType::EMPTY,
        };

        self.neighbor(side)
            .map_or(BlockType::EMPTY, |blocks| blocks.get(lx, y, lz))
    }
}
