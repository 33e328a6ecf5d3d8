//! # Chunk Generation Task
//!
//! Fills every chunk of one zone with procedurally generated blocks on a
//! worker thread. The task owns only keys and a seed; the finished block
//! arrays travel back in the result and are installed on the main thread.

use log::{debug, error};

use crate::engine_state::{
    task_management::task::{Task, TaskResult},
    voxels::{
        biome::BiomeSampler,
        chunk::ChunkBlocks,
        column_filler::fill_chunk,
        coordinates::{ChunkKey, ZoneKey},
        terrain::Terrain,
    },
};

/// Generates the block data of a zone's chunks.
pub struct ChunkGenerationTask {
    zone: ZoneKey,
    chunks: Vec<ChunkKey>,
    seed: u32,
}

impl ChunkGenerationTask {
    /// Creates a fill task for `chunks`, all of which belong to `zone`.
    pub fn new(zone: ZoneKey, chunks: Vec<ChunkKey>, seed: u32) -> Self {
        ChunkGenerationTask { zone, chunks, seed }
    }

    /// The zone this task fills.
    pub fn zone(&self) -> ZoneKey {
        self.zone
    }
}

impl Task for ChunkGenerationTask {
    fn process(self: Box<Self>) -> Box<dyn TaskResult + Send> {
        // Noise generators are built per task and never leave this thread.
        let sampler = BiomeSampler::new(self.seed);

        let mut filled = Vec::with_capacity(self.chunks.len());
        for key in self.chunks {
            match fill_chunk(key, &sampler) {
                Ok(blocks) => filled.push((key, blocks)),
                Err(err) => error!("Failed to fill chunk {:?}: {}", key, err),
            }
        }
        debug!("Generated {} chunks for zone {:?}", filled.len(), self.zone);

        Box::new(ChunkGenerationTaskResult {
            zone: self.zone,
            filled,
        })
    }
}

/// The filled block arrays of one zone.
pub struct ChunkGenerationTaskResult {
    zone: ZoneKey,
    filled: Vec<(ChunkKey, ChunkBlocks)>,
}

impl TaskResult for ChunkGenerationTaskResult {
    /// Installs the blocks. Meshing is scheduled through the terrain's
    /// ready-for-meshing set rather than as follow-up tasks.
    fn handle_result(self: Box<Self>, terrain: &mut Terrain) -> Vec<Box<dyn Task + Send>> {
        terrain.install_zone_fill(self.zone, self.filled);
        Vec::new()
    }
}
