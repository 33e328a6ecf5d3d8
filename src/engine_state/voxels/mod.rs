//! # Voxel Terrain Core
//!
//! Block data, its spatial organisation and the procedural generator that
//! fills it.
//!
//! ## Architecture
//!
//! * **Block**: block types, face directions and the texture atlas table
//! * **Chunk**: 16x256x16 block arrays plus per-chunk mesh state
//! * **Coordinates**: chunk and zone keys, and the mapping from world positions
//! * **Zones**: the 64x64 generation units and their lifecycle
//! * **Biome / column filler**: noise sampling and the layer rules per column
//! * **Terrain**: the chunk map owned by the main thread
//! * **Raycast**: grid marching for block picking
//! * **Tasks**: zone fills run on the worker pool
//!
//! ## Data Flow
//!
//! 1. A zone is requested; its chunks are instantiated empty
//! 2. A fill task generates the blocks off the main thread
//! 3. The result is installed and the chunks are queued for meshing
//! 4. Edits write through the terrain and queue the affected chunks again

pub mod biome;
pub mod block;
pub mod chunk;
pub mod column_filler;
pub mod coordinates;
pub mod raycast;
pub mod tasks;
pub mod terrain;
pub mod zones;
