//! Dense block storage for a single chunk.

use std::fmt;

use crate::{
    engine_state::voxels::block::{block_type::BlockType, BlockTypeSize},
    error::TerrainError,
};

use super::{CHUNK_DEPTH, CHUNK_HEIGHT, CHUNK_VOLUME, CHUNK_WIDTH};

/// A fixed 16x256x16 array of block types, addressed `x + 16*y + 16*256*z`.
///
/// Cells hold the compact [`BlockTypeSize`] encoding and are decoded on read.
/// Reads outside the chunk volume return [`BlockType::EMPTY`]; writes outside it
/// are rejected with [`TerrainError::OutOfBounds`].
#[derive(Clone, PartialEq, Eq)]
pub struct ChunkBlocks {
    cells: Box<[BlockTypeSize]>,
}

impl ChunkBlocks {
    /// Creates a chunk volume filled with `EMPTY`.
    pub fn new() -> Self {
        ChunkBlocks {
            cells: vec![BlockType::EMPTY as BlockTypeSize; CHUNK_VOLUME].into_boxed_slice(),
        }
    }

    /// Linear index of a local coordinate, or `None` when outside the volume.
    #[inline]
    pub fn index(x: i32, y: i32, z: i32) -> Option<usize> {
        if !(0..CHUNK_WIDTH).contains(&x)
            || !(0..CHUNK_HEIGHT).contains(&y)
            || !(0..CHUNK_DEPTH).contains(&z)
        {
            return None;
        }
        Some((x + CHUNK_WIDTH * y + CHUNK_WIDTH * CHUNK_HEIGHT * z) as usize)
    }

    /// Block at a local coordinate, `EMPTY` outside the volume or for an
    /// unknown encoding.
    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> BlockType {
        Self::index(x, y, z)
            .and_then(|i| BlockType::from_int(self.cells[i]))
            .unwrap_or(BlockType::EMPTY)
    }

    /// Writes a block at a local coordinate.
    pub fn set(&mut self, x: i32, y: i32, z: i32, block: BlockType) -> Result<(), TerrainError> {
        let i = Self::index(x, y, z).ok_or(TerrainError::OutOfBounds { x, y, z })?;
        self.cells[i] = block as BlockTypeSize;
        Ok(())
    }

    /// Number of cells holding `block`.
    pub fn count(&self, block: BlockType) -> usize {
        let encoded = block as BlockTypeSize;
        self.cells.iter().filter(|&&b| b == encoded).count()
    }
}

impl Default for ChunkBlocks {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ChunkBlocks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkBlocks")
            .field("non_empty", &(CHUNK_VOLUME - self.count(BlockType::EMPTY)))
            .finish()
    }
}
