//! Rendering side of the terrain.
//!
//! Turns block data into per-chunk vertex and index streams and describes
//! their layout. Drawing itself happens behind the [`ChunkRenderer`] trait,
//! so the terrain never touches a GPU device.
//!
//! [`ChunkRenderer`]: meshing::ChunkRenderer

pub mod meshing;
pub mod tasks;
pub mod vertex;

pub use vertex::Vertex;
