//! Background tasks for the rendering side of the terrain.
//!
//! # Available Tasks
//! - `ChunkMeshGenerationTask`: builds a chunk's meshes from a block snapshot

pub mod chunk_mesh_generation_task;
