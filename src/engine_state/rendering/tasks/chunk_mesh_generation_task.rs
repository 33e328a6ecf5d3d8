//! Task for generating the mesh of one chunk on a worker thread.
//!
//! The task carries a copy-on-write snapshot of the chunk and its four
//! horizontal neighbors, so edits made on the main thread while it runs never
//! reach it. Those edits mark the chunk for a follow-up mesh instead.

use log::trace;

use crate::engine_state::{
    rendering::meshing::{generate_chunk_mesh, ChunkMeshData},
    task_management::task::{Task, TaskResult},
    voxels::{chunk::ChunkNeighborhood, coordinates::ChunkKey, terrain::Terrain},
};

/// Builds the opaque and transparent meshes of a chunk.
pub struct ChunkMeshGenerationTask {
    /// The chunk being meshed
    chunk: ChunkKey,
    /// Block snapshot of the chunk and its neighbors
    neighborhood: ChunkNeighborhood,
}

impl ChunkMeshGenerationTask {
    /// Creates a mesh task for `chunk` over the given snapshot.
    pub fn new(chunk: ChunkKey, neighborhood: ChunkNeighborhood) -> Self {
        ChunkMeshGenerationTask {
            chunk,
            neighborhood,
        }
    }

    /// The chunk this task meshes.
    pub fn chunk(&self) -> ChunkKey {
        self.chunk
    }
}

impl Task for ChunkMeshGenerationTask {
    fn process(self: Box<Self>) -> Box<dyn TaskResult + Send> {
        let mesh = generate_chunk_mesh(&self.neighborhood);
        trace!(
            "Meshed {:?}: {} opaque / {} transparent faces",
            self.chunk,
            mesh.opaque.face_count(),
            mesh.transparent.face_count()
        );
        Box::new(ChunkMeshGenerationTaskResult {
            chunk: self.chunk,
            mesh,
        })
    }
}

/// A finished chunk mesh waiting to be installed.
pub struct ChunkMeshGenerationTaskResult {
    chunk: ChunkKey,
    mesh: ChunkMeshData,
}

impl TaskResult for ChunkMeshGenerationTaskResult {
    fn handle_result(self: Box<Self>, terrain: &mut Terrain) -> Vec<Box<dyn Task + Send>> {
        match terrain.install_chunk_mesh(self.chunk, self.mesh) {
            Some(follow_up) => vec![Box::new(follow_up)],
            None => Vec::new(),
        }
    }
}
