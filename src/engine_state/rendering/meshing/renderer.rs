//! Draw interface between the terrain and the external renderer.
//!
//! The terrain never touches GPU primitives. During a draw it hands every
//! visible chunk's streams to a [`ChunkRenderer`], all opaque streams first and
//! then all transparent ones, so blending sees the finished opaque scene.

use cgmath::Matrix4;

use super::MeshBuffers;

/// Consumer of chunk meshes during a draw.
pub trait ChunkRenderer {
    /// Draws one chunk's opaque stream with `model` translating it to its world origin.
    fn draw_opaque(&mut self, model: Matrix4<f32>, mesh: &MeshBuffers);

    /// Draws one chunk's transparent stream. Called only after every opaque draw of the pass.
    fn draw_transparent(&mut self, model: Matrix4<f32>, mesh: &MeshBuffers);
}

/// A renderer that only tallies what it was asked to draw.
///
/// Used by the headless demo and by tests.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CountingRenderer {
    /// Opaque draw calls received.
    pub opaque_draws: usize,
    /// Transparent draw calls received.
    pub transparent_draws: usize,
    /// Indices submitted across both passes.
    pub indices: usize,
    /// Set if an opaque draw arrived after a transparent one.
    pub out_of_order: bool,
}

impl ChunkRenderer for CountingRenderer {
    fn draw_opaque(&mut self, _model: Matrix4<f32>, mesh: &MeshBuffers) {
        if self.transparent_draws > 0 {
            self.out_of_order = true;
        }
        self.opaque_draws += 1;
        self.indices += mesh.index_count();
    }

    fn draw_transparent(&mut self, _model: Matrix4<f32>, mesh: &MeshBuffers) {
        self.transparent_draws += 1;
        self.indices += mesh.index_count();
    }
}
