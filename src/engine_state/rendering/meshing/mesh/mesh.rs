//! Mesh data structures for chunk rendering.
//!
//! A chunk mesh is two independent streams, opaque and transparent, each an
//! interleaved vertex list plus a `u32` index list made of whole quads.

use super::face::{Face, QUAD_INDICES};
use crate::engine_state::rendering::Vertex;

/// Vertex and index data of one mesh stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers {
    /// Interleaved vertex data.
    pub vertices: Vec<Vertex>,
    /// Triangle indices into `vertices`.
    pub indices: Vec<u32>,
}

impl MeshBuffers {
    /// Appends the quad for `face`, offsetting its indices by the vertices already present.
    pub fn push_face(&mut self, face: &Face) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&face.vertices());
        self.indices.extend(QUAD_INDICES.iter().map(|i| i + base));
    }

    /// Number of indices to draw.
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Number of quads in the stream.
    pub fn face_count(&self) -> usize {
        self.indices.len() / QUAD_INDICES.len()
    }

    /// Whether the stream draws nothing.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// The two mesh streams built for one chunk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkMeshData {
    /// Faces of opaque blocks.
    pub opaque: MeshBuffers,
    /// Faces of water and lava, drawn after the opaque pass.
    pub transparent: MeshBuffers,
}
