//! # Voxel Terrain Demo Entry Point
//!
//! Runs the headless terrain walk from the library's `run()` function.
//!
//! ## Usage
//!
//! ```bash
//! TERRAIN_CONFIG=terrain.json RUST_LOG=info cargo run --release
//! ```

fn main() {
    voxel_terrain::run();
}
