//! # Terrain Module
//!
//! This module provides the `Terrain` struct which owns every chunk in the
//! voxel world, the state of every requested zone, and the set of chunks
//! waiting to be meshed.
//!
//! ## Architecture
//!
//! The terrain is a sparse map from [`ChunkKey`] to [`Chunk`]. It is only ever
//! touched by the main thread: workers receive owned inputs (a zone to fill,
//! snapshots to mesh) and hand owned outputs back through task results, which
//! apply them here.
//!
//! ## Guarantees
//!
//! - A zone is requested at most once: it enters the zone table before its
//!   fill task is built and never leaves it.
//! - A chunk has at most one mesh task in flight. Requests arriving meanwhile
//!   are folded into a single follow-up remesh.
//! - Mesh tasks are only built for filled chunks of `Filled` zones, so no mesh
//!   task ever reads a chunk whose fill is still running.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use cgmath::{Matrix4, Point3, Vector3};
use log::{debug, trace};

use crate::{
    engine_state::rendering::{
        meshing::{generate_chunk_mesh, BlockSource, ChunkMeshData, ChunkRenderer},
        tasks::chunk_mesh_generation_task::ChunkMeshGenerationTask,
    },
    error::TerrainError,
};

use super::{
    block::{block_side::BlockSide, block_type::BlockType},
    chunk::{ChunkBlocks, Chunk, ChunkNeighborhood, CHUNK_DEPTH, CHUNK_HEIGHT, CHUNK_WIDTH},
    coordinates::{ChunkKey, ZoneKey, ZONE_WIDTH},
    raycast::{grid_march, RayHit},
    tasks::chunk_generation_task::ChunkGenerationTask,
    zones::ZoneState,
};

/// Height of the floor built by [`Terrain::create_test_scene`].
pub const TEST_SCENE_FLOOR: i32 = 128;

/// The voxel world: chunks, zone states and pending mesh work.
#[derive(Debug)]
pub struct Terrain {
    seed: u32,
    chunks: HashMap<ChunkKey, Chunk>,
    zones: HashMap<ZoneKey, ZoneState>,
    ready_for_meshing: HashSet<ChunkKey>,
}

/// World-space block reads for one chunk, used by the eager mesh path.
pub struct WorldBlockSource<'a> {
    terrain: &'a Terrain,
    origin: ChunkKey,
}

impl BlockSource for WorldBlockSource<'_> {
    fn block_at(&self, x: i32, y: i32, z: i32) -> BlockType {
        match (self.origin.x.checked_add(x), self.origin.z.checked_add(z)) {
            (Some(wx), Some(wz)) => self.terrain.block_at(wx, y, wz),
            _ => BlockType::EMPTY,
        }
    }
}

impl Terrain {
    /// Creates an empty terrain whose zones will be filled from `seed`.
    pub fn new(seed: u32) -> Self {
        Terrain {
            seed,
            chunks: HashMap::new(),
            zones: HashMap::new(),
            ready_for_meshing: HashSet::new(),
        }
    }

    /// Noise seed used by fill tasks.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// The chunk stored under `key`.
    pub fn chunk(&self, key: ChunkKey) -> Option<&Chunk> {
        self.chunks.get(&key)
    }

    /// The chunk containing world column `(x, z)`.
    pub fn chunk_at(&self, x: i32, z: i32) -> Option<&Chunk> {
        self.chunk(ChunkKey::containing(x, z))
    }

    /// Whether a chunk has been instantiated for world column `(x, z)`.
    pub fn has_chunk_at(&self, x: i32, z: i32) -> bool {
        self.chunk_at(x, z).is_some()
    }

    /// All instantiated chunks, in no particular order.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// Number of instantiated chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// State of a zone, `None` if it was never requested.
    pub fn zone_state(&self, zone: ZoneKey) -> Option<ZoneState> {
        self.zones.get(&zone).copied()
    }

    /// Every requested zone with its state.
    pub fn zones(&self) -> impl Iterator<Item = (ZoneKey, ZoneState)> + '_ {
        self.zones.iter().map(|(k, v)| (*k, *v))
    }

    /// Creates the chunk at `key` if missing and returns it.
    ///
    /// Neighbors need no explicit linking: a chunk sees every chunk present in
    /// the map next to it, and they see it in turn.
    pub fn instantiate_chunk_at(&mut self, key: ChunkKey) -> &mut Chunk {
        self.chunks.entry(key).or_insert_with(|| Chunk::new(key))
    }

    /// Snapshots of the chunk at `key` and whichever horizontal neighbors exist.
    pub fn neighborhood(&self, key: ChunkKey) -> Option<ChunkNeighborhood> {
        let chunk = self.chunks.get(&key)?;
        let mut view = ChunkNeighborhood::isolated(Arc::clone(chunk.blocks()));
        for side in BlockSide::horizontal() {
            let step = side.offset();
            if let Some(neighbor) = self.chunks.get(&key.offset(step.x, step.z)) {
                view = view.with_neighbor(side, Arc::clone(neighbor.blocks()));
            }
        }
        Some(view)
    }

    /// Block at a world position; `EMPTY` without a chunk or outside `[0, 256)`.
    pub fn block_at(&self, x: i32, y: i32, z: i32) -> BlockType {
        if !(0..CHUNK_HEIGHT).contains(&y) {
            return BlockType::EMPTY;
        }
        let key = ChunkKey::containing(x, z);
        self.chunks
            .get(&key)
            .map_or(BlockType::EMPTY, |chunk| chunk.block_at(x - key.x, y, z - key.z))
    }

    /// Writes a block at a world position and schedules the affected chunks for remeshing.
    ///
    /// # Errors
    /// - [`TerrainError::MissingChunk`] when no chunk covers `(x, z)`
    /// - [`TerrainError::UnfilledChunk`] when the chunk's fill has not landed,
    ///   since the fill would overwrite the edit
    /// - [`TerrainError::OutOfBounds`] when `y` is outside `[0, 256)`
    pub fn set_block_at(&mut self, x: i32, y: i32, z: i32, block: BlockType) -> Result<(), TerrainError> {
        let key = ChunkKey::containing(x, z);
        let chunk = self
            .chunks
            .get_mut(&key)
            .ok_or(TerrainError::MissingChunk { x, y, z })?;
        if !chunk.is_filled() {
            return Err(TerrainError::UnfilledChunk { x, y, z });
        }
        let (lx, lz) = (x - key.x, z - key.z);
        chunk
            .set_block_at(lx, y, lz, block)
            .map_err(|_| TerrainError::OutOfBounds { x, y, z })?;

        self.ready_for_meshing.insert(key);
        let edges = [
            (lx == 0, key.offset(-1, 0)),
            (lx == CHUNK_WIDTH - 1, key.offset(1, 0)),
            (lz == 0, key.offset(0, -1)),
            (lz == CHUNK_DEPTH - 1, key.offset(0, 1)),
        ];
        for (on_edge, neighbor) in edges {
            if on_edge && self.chunks.contains_key(&neighbor) {
                self.ready_for_meshing.insert(neighbor);
            }
        }
        Ok(())
    }

    /// Marks a chunk as needing a (re)mesh on the next drain.
    pub fn mark_for_meshing(&mut self, key: ChunkKey) {
        self.ready_for_meshing.insert(key);
    }

    /// Swaps out the set of chunks waiting to be meshed.
    pub fn take_ready_for_meshing(&mut self) -> HashSet<ChunkKey> {
        std::mem::take(&mut self.ready_for_meshing)
    }

    /// Number of chunks waiting to be meshed.
    pub fn ready_for_meshing_count(&self) -> usize {
        self.ready_for_meshing.len()
    }

    /// Requests generation of `zone`.
    ///
    /// Returns the fill task to submit, or `None` if the zone was already requested.
    /// The zone's sixteen chunks are instantiated immediately, so reads into
    /// it succeed while the fill is running. Writes are rejected until it lands.
    pub fn request_zone(&mut self, zone: ZoneKey) -> Option<ChunkGenerationTask> {
        if self.zones.contains_key(&zone) {
            return None;
        }
        self.zones.insert(zone, ZoneState::Filling);

        let keys: Vec<ChunkKey> = zone.chunk_keys().collect();
        for &key in &keys {
            self.instantiate_chunk_at(key);
        }
        debug!("Zone {:?} requested, filling {} chunks", zone, keys.len());
        Some(ChunkGenerationTask::new(zone, keys, self.seed))
    }

    /// Installs the output of a zone's fill task.
    ///
    /// Chunks of a `Filling` zone are queued for meshing. Filled neighbors
    /// across the zone edge are queued whatever the zone's state, since their
    /// boundary faces were meshed against an empty chunk. A zone retired while
    /// filling keeps its blocks but is not meshed.
    pub fn install_zone_fill(&mut self, zone: ZoneKey, filled: Vec<(ChunkKey, ChunkBlocks)>) {
        let keys: Vec<ChunkKey> = filled.iter().map(|(key, _)| *key).collect();
        for (key, blocks) in filled {
            match self.chunks.get_mut(&key) {
                Some(chunk) => chunk.install_blocks(blocks),
                None => debug!("Dropping fill for vanished chunk {:?}", key),
            }
        }

        match self.zones.get(&zone).copied() {
            Some(ZoneState::Filling) => {
                self.zones.insert(zone, ZoneState::Filled);
                debug!("Zone {:?} filled", zone);
                self.ready_for_meshing.extend(keys.iter().copied());
            }
            Some(state) => debug!("Zone {:?} filled while {:?}; not meshing", zone, state),
            None => debug!("Fill result for unknown zone {:?}", zone),
        }
        self.requeue_neighbors_across_edge(zone, &keys);
    }

    /// Queues the filled chunks outside `zone` that touch one of `keys`.
    fn requeue_neighbors_across_edge(&mut self, zone: ZoneKey, keys: &[ChunkKey]) {
        for key in keys {
            for side in BlockSide::horizontal() {
                let step = side.offset();
                let neighbor = key.offset(step.x, step.z);
                let filled = self.chunks.get(&neighbor).is_some_and(Chunk::is_filled);
                if neighbor.zone() != zone && filled {
                    self.ready_for_meshing.insert(neighbor);
                }
            }
        }
    }

    /// Moves a zone out of the border: releases its meshes and stops meshing it.
    ///
    /// Returns whether the zone changed state.
    pub fn retire_zone(&mut self, zone: ZoneKey) -> bool {
        match self.zones.get(&zone) {
            Some(ZoneState::Filled) | Some(ZoneState::Filling) => {}
            _ => return false,
        }
        self.zones.insert(zone, ZoneState::Retired);
        for key in zone.chunk_keys() {
            self.ready_for_meshing.remove(&key);
            if let Some(chunk) = self.chunks.get_mut(&key) {
                chunk.release_mesh();
                chunk.cancel_remesh();
            }
        }
        debug!("Zone {:?} retired", zone);
        true
    }

    /// Brings a retired zone back into the border.
    ///
    /// Filled chunks are queued for meshing together with the filled
    /// neighbors across the zone edge; a zone retired mid-fill returns to
    /// `Filling` and is meshed when its fill lands. Returns whether the zone
    /// changed state.
    pub fn revive_zone(&mut self, zone: ZoneKey) -> bool {
        if self.zones.get(&zone) != Some(&ZoneState::Retired) {
            return false;
        }
        let filled = zone
            .chunk_keys()
            .all(|key| self.chunks.get(&key).is_some_and(Chunk::is_filled));
        if filled {
            self.zones.insert(zone, ZoneState::Filled);
            let keys: Vec<ChunkKey> = zone.chunk_keys().collect();
            self.ready_for_meshing.extend(keys.iter().copied());
            self.requeue_neighbors_across_edge(zone, &keys);
        } else {
            self.zones.insert(zone, ZoneState::Filling);
        }
        debug!("Zone {:?} revived", zone);
        true
    }

    /// Whether the chunk at `key` may be meshed and drawn right now.
    fn is_meshable(&self, key: ChunkKey) -> bool {
        self.chunks.get(&key).is_some_and(Chunk::is_filled)
            && self.zones.get(&key.zone()) == Some(&ZoneState::Filled)
    }

    /// Claims the chunk at `key` and builds its mesh task.
    ///
    /// Returns `None` when the chunk cannot be meshed yet, or when a mesh task
    /// is already in flight (a follow-up is then scheduled on its completion).
    pub fn request_mesh(&mut self, key: ChunkKey) -> Option<ChunkMeshGenerationTask> {
        if !self.is_meshable(key) {
            return None;
        }
        let neighborhood = self.neighborhood(key)?;
        let chunk = self.chunks.get_mut(&key)?;
        if !chunk.try_begin_mesh() {
            trace!("Mesh of {:?} already in flight; deferring", key);
            return None;
        }
        Some(ChunkMeshGenerationTask::new(key, neighborhood))
    }

    /// Installs a mesh produced by a mesh task.
    ///
    /// Late results for vanished chunks or retired zones are discarded. Returns
    /// the follow-up mesh task when the chunk changed while this one ran.
    pub fn install_chunk_mesh(
        &mut self,
        key: ChunkKey,
        mesh: ChunkMeshData,
    ) -> Option<ChunkMeshGenerationTask> {
        let meshable = self.is_meshable(key);
        let Some(chunk) = self.chunks.get_mut(&key) else {
            debug!("Discarding mesh for vanished chunk {:?}", key);
            return None;
        };
        let remesh = chunk.finish_mesh();
        if !meshable {
            debug!("Discarding late mesh for retired chunk {:?}", key);
            return None;
        }
        trace!(
            "Installing mesh for {:?}: {} opaque / {} transparent indices",
            key,
            mesh.opaque.index_count(),
            mesh.transparent.index_count()
        );
        chunk.install_mesh(mesh);
        if remesh {
            self.request_mesh(key)
        } else {
            None
        }
    }

    /// Meshes chunks synchronously on the calling thread against live terrain.
    ///
    /// Chunks with a mesh task in flight are left to that task and remeshed
    /// once it lands. Returns the number of chunks meshed.
    pub fn mesh_chunks_now(&mut self, keys: impl IntoIterator<Item = ChunkKey>) -> usize {
        let mut meshed = 0;
        for key in keys {
            if !self.is_meshable(key) {
                continue;
            }
            let claimed = self
                .chunks
                .get_mut(&key)
                .is_some_and(Chunk::try_begin_mesh);
            if !claimed {
                continue;
            }
            let mesh = generate_chunk_mesh(&WorldBlockSource {
                terrain: self,
                origin: key,
            });
            if let Some(chunk) = self.chunks.get_mut(&key) {
                chunk.finish_mesh();
                chunk.install_mesh(mesh);
                meshed += 1;
            }
        }
        meshed
    }

    /// Draws every meshed chunk within `radius` blocks of `observer`.
    ///
    /// All opaque streams are submitted before any transparent one.
    pub fn draw(&self, renderer: &mut impl ChunkRenderer, observer: Point3<f32>, radius: i32) {
        let visible = self.visible_chunks(observer, radius);

        for chunk in &visible {
            if let Some(mesh) = chunk.opaque_mesh().buffers().filter(|m| !m.is_empty()) {
                renderer.draw_opaque(chunk_model(chunk.key()), mesh);
            }
        }
        for chunk in &visible {
            if let Some(mesh) = chunk.transparent_mesh().buffers().filter(|m| !m.is_empty()) {
                renderer.draw_transparent(chunk_model(chunk.key()), mesh);
            }
        }
    }

    fn visible_chunks(&self, observer: Point3<f32>, radius: i32) -> Vec<&Chunk> {
        let (ox, oz) = (observer.x.floor() as i32, observer.z.floor() as i32);
        let min = ChunkKey::containing(ox.saturating_sub(radius), oz.saturating_sub(radius));
        let max = ChunkKey::containing(ox.saturating_add(radius), oz.saturating_add(radius));

        let mut visible = Vec::new();
        for x in (min.x..=max.x).step_by(CHUNK_WIDTH as usize) {
            for z in (min.z..=max.z).step_by(CHUNK_DEPTH as usize) {
                if let Some(chunk) = self.chunks.get(&ChunkKey { x, z }) {
                    if chunk.is_meshed() {
                        visible.push(chunk);
                    }
                }
            }
        }
        visible
    }

    /// Casts a ray and returns the first solid block it enters.
    ///
    /// See [`grid_march`].
    pub fn grid_march(
        &self,
        origin: Point3<f32>,
        direction: Vector3<f32>,
    ) -> Result<Option<RayHit>, TerrainError> {
        grid_march(|x, y, z| self.block_at(x, y, z), origin, direction)
    }

    /// Builds a flat debug scene in the zone at the origin.
    ///
    /// A grass floor at `y = 128` spans the zone, stone walls run along `x = 0`
    /// and `z = 0`, and a dirt pillar stands at `(32, 32)`. The zone is marked
    /// filled and queued for meshing without any fill task.
    pub fn create_test_scene(&mut self) -> Result<(), TerrainError> {
        let zone = ZoneKey { x: 0, z: 0 };
        self.zones.insert(zone, ZoneState::Filled);
        for key in zone.chunk_keys() {
            self.instantiate_chunk_at(key).mark_filled();
        }

        for x in 0..ZONE_WIDTH {
            for z in 0..ZONE_WIDTH {
                self.set_block_at(x, TEST_SCENE_FLOOR, z, BlockType::GRASS)?;
            }
        }
        for i in 0..ZONE_WIDTH {
            for y in TEST_SCENE_FLOOR + 1..TEST_SCENE_FLOOR + 8 {
                self.set_block_at(i, y, 0, BlockType::STONE)?;
                self.set_block_at(0, y, i, BlockType::STONE)?;
            }
        }
        for y in TEST_SCENE_FLOOR + 1..TEST_SCENE_FLOOR + 16 {
            self.set_block_at(32, y, 32, BlockType::DIRT)?;
        }

        self.ready_for_meshing.extend(zone.chunk_keys());
        Ok(())
    }
}

/// Model transform placing a chunk mesh at its world origin.
fn chunk_model(key: ChunkKey) -> Matrix4<f32> {
    Matrix4::from_translation(Vector3::new(key.x as f32, 0.0, key.z as f32))
}
