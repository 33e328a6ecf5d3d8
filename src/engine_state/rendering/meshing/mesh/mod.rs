//! Mesh generation primitives: per-face quads and the buffers they accumulate into.

pub mod face;
#[allow(clippy::module_inception)]
pub mod mesh;
