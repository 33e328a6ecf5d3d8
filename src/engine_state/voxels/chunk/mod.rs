//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a 16x256x16 column of blocks plus
//! the bookkeeping the terrain needs to stream it through fill and mesh tasks.
//!
//! ## Storage
//!
//! Blocks live in a dense [`ChunkBlocks`] array behind an `Arc`. Mesh tasks
//! take a cheap clone of that `Arc` as a snapshot; a later edit on the main
//! thread goes through `Arc::make_mut` and copies the array only while such a
//! snapshot is still alive. Workers therefore never observe a half-written
//! chunk, and the main thread never waits on them.
//!
//! ## Neighbors
//!
//! A chunk does not hold references to its neighbors. It knows its own
//! [`ChunkKey`], and neighbors are looked up by key in the Terrain Map on
//! demand (see [`ChunkNeighborhood`]). A neighbor is linked exactly when it
//! is present in the map, which makes linking symmetric by construction.
//!
//! ## Mesh buffers
//!
//! The opaque and transparent streams are tracked separately. Each is either
//! absent or generated; a generated stream may hold zero indices.

use std::sync::Arc;

use crate::{
    engine_state::rendering::meshing::{ChunkMeshData, MeshBuffers},
    error::TerrainError,
};

use super::{block::block_type::BlockType, coordinates::ChunkKey};

pub mod chunk_blocks;
pub mod chunk_neighborhood;

pub use chunk_blocks::ChunkBlocks;
pub use chunk_neighborhood::ChunkNeighborhood;

/// Width of a chunk along X in blocks.
pub const CHUNK_WIDTH: i32 = 16;
/// Height of a chunk (and of the world) in blocks.
pub const CHUNK_HEIGHT: i32 = 256;
/// Depth of a chunk along Z in blocks.
pub const CHUNK_DEPTH: i32 = 16;
/// Total number of cells in a chunk.
pub const CHUNK_VOLUME: usize = (CHUNK_WIDTH * CHUNK_HEIGHT * CHUNK_DEPTH) as usize;

/// Existence and contents of one uploaded mesh stream.
#[derive(Debug, Default)]
pub struct MeshBufferState {
    buffers: Option<MeshBuffers>,
}

impl MeshBufferState {
    /// Whether mesh data has been installed since the last release.
    pub fn is_generated(&self) -> bool {
        self.buffers.is_some()
    }

    /// Number of indices to draw; zero when absent.
    pub fn index_count(&self) -> usize {
        self.buffers.as_ref().map_or(0, MeshBuffers::index_count)
    }

    /// The installed buffers, if any.
    pub fn buffers(&self) -> Option<&MeshBuffers> {
        self.buffers.as_ref()
    }
}

/// Represents one 16x256x16 column of the voxel world.
#[derive(Debug)]
pub struct Chunk {
    /// World-space origin of this chunk.
    key: ChunkKey,
    blocks: Arc<ChunkBlocks>,
    /// Set once a fill task's output has been installed.
    filled: bool,
    opaque: MeshBufferState,
    transparent: MeshBufferState,
    mesh_in_flight: bool,
    remesh_requested: bool,
}

impl Chunk {
    /// Creates an all-`EMPTY` chunk awaiting its fill.
    pub fn new(key: ChunkKey) -> Self {
        Chunk {
            key,
            blocks: Arc::new(ChunkBlocks::new()),
            filled: false,
            opaque: MeshBufferState::default(),
            transparent: MeshBufferState::default(),
            mesh_in_flight: false,
            remesh_requested: false,
        }
    }

    /// The key (world-space origin) of this chunk.
    pub fn key(&self) -> ChunkKey {
        self.key
    }

    /// A shared snapshot of the block array.
    pub fn blocks(&self) -> &Arc<ChunkBlocks> {
        &self.blocks
    }

    /// Block at a local coordinate; `EMPTY` outside this chunk.
    ///
    /// Use [`ChunkNeighborhood`] to read across the chunk boundary.
    pub fn block_at(&self, x: i32, y: i32, z: i32) -> BlockType {
        self.blocks.get(x, y, z)
    }

    /// Writes a block at a local coordinate, copying the array if a snapshot is outstanding.
    pub fn set_block_at(
        &mut self,
        x: i32,
        y: i32,
        z: i32,
        block: BlockType,
    ) -> Result<(), TerrainError> {
        Arc::make_mut(&mut self.blocks).set(x, y, z, block)
    }

    /// Replaces the whole block array with the output of a fill task.
    pub fn install_blocks(&mut self, blocks: ChunkBlocks) {
        self.blocks = Arc::new(blocks);
        self.filled = true;
    }

    /// Marks the chunk's current contents as final without a fill task.
    pub(crate) fn mark_filled(&mut self) {
        self.filled = true;
    }

    /// Whether the chunk has received its generated contents.
    pub fn is_filled(&self) -> bool {
        self.filled
    }

    /// Whether the opaque stream has been generated.
    pub fn has_opaque_mesh(&self) -> bool {
        self.opaque.is_generated()
    }

    /// Whether the transparent stream has been generated.
    pub fn has_transparent_mesh(&self) -> bool {
        self.transparent.is_generated()
    }

    /// Whether both streams are ready to draw.
    pub fn is_meshed(&self) -> bool {
        self.has_opaque_mesh() && self.has_transparent_mesh()
    }

    /// The opaque stream.
    pub fn opaque_mesh(&self) -> &MeshBufferState {
        &self.opaque
    }

    /// The transparent stream.
    pub fn transparent_mesh(&self) -> &MeshBufferState {
        &self.transparent
    }

    /// Installs freshly built mesh data, replacing whatever was there.
    pub fn install_mesh(&mut self, mesh: ChunkMeshData) {
        self.opaque.buffers = Some(mesh.opaque);
        self.transparent.buffers = Some(mesh.transparent);
    }

    /// Frees both mesh streams.
    pub fn release_mesh(&mut self) {
        self.opaque.buffers = None;
        self.transparent.buffers = None;
    }

    /// Claims the chunk for a mesh task.
    ///
    /// Returns `false` when a task is already in flight; the request is then
    /// remembered and honoured when that task completes.
    pub(crate) fn try_begin_mesh(&mut self) -> bool {
        if self.mesh_in_flight {
            self.remesh_requested = true;
            return false;
        }
        self.mesh_in_flight = true;
        self.remesh_requested = false;
        true
    }

    /// Releases the mesh claim, returning whether another mesh was requested meanwhile.
    pub(crate) fn finish_mesh(&mut self) -> bool {
        self.mesh_in_flight = false;
        std::mem::take(&mut self.remesh_requested)
    }

    /// Drops any pending remesh request.
    pub(crate) fn cancel_remesh(&mut self) {
        self.remesh_requested = false;
    }

    /// Whether a mesh task currently owns this chunk.
    pub fn is_mesh_in_flight(&self) -> bool {
        self.mesh_in_flight
    }
}
