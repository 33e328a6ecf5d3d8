#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Terrain
//!
//! An infinite procedurally generated block terrain, streamed in 64x64 zones
//! around a moving observer and meshed on a pool of worker threads.
//!
//! ## Key Modules
//!
//! * `config` - JSON-loadable tunables
//! * `error` - Error types for writes, ray marching and configuration
//! * `engine_state` - The terrain manager, its voxel data, meshing and task management
//!
//! ## Architecture
//!
//! The crate stops at the renderer seam: meshes are produced as plain vertex
//! and index buffers and handed to a [`ChunkRenderer`] in two passes, opaque
//! first. Windowing, input and GPU upload belong to the embedding application.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let mut manager = voxel_terrain::TerrainManager::new(TerrainConfig::default());
//! loop {
//!     manager.tick(observer);
//!     manager.draw(&mut renderer);
//! }
//! ```
//!
//! The bundled binary runs a headless walk through the terrain:
//!
//! ```bash
//! RUST_LOG=info cargo run --release
//! ```

use std::time::{Duration, Instant};

use cgmath::{Point3, Vector3};
use log::{info, warn};

pub mod config;
pub mod engine_state;
pub mod error;

pub use config::TerrainConfig;
pub use engine_state::{
    rendering::{
        meshing::{ChunkRenderer, CountingRenderer, MeshBuffers},
        Vertex,
    },
    voxels::{
        block::{block_side::BlockSide, block_type::BlockType},
        coordinates::{ChunkKey, ZoneKey},
        terrain::Terrain,
    },
    TerrainManager, TerrainStats,
};
pub use error::{ConfigError, TerrainError};

/// Environment variable naming a JSON configuration file for [`run`].
pub const CONFIG_ENV_VAR: &str = "TERRAIN_CONFIG";

/// Blocks per second the demo observer walks along +X.
const DEMO_WALK_SPEED: f32 = 24.0;

/// Height the demo observer floats at, above every possible surface.
const DEMO_OBSERVER_HEIGHT: f32 = 255.5;

/// Ticks between random edits in the demo.
const DEMO_EDIT_INTERVAL: u32 = 15;

/// Runs the headless terrain demo.
///
/// An observer walks along +X at the configured tick rate while the manager
/// streams zones around it. Every few ticks a block below the observer is
/// broken or placed, and once a second a stats line is logged.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config = load_config();
    let tick_rate = config.tick_rate_hz.max(1);
    let tick_duration = Duration::from_secs_f64(1.0 / f64::from(tick_rate));
    let demo_ticks = config.demo_ticks;

    let mut rng = fastrand::Rng::with_seed(u64::from(config.seed));
    let mut manager = TerrainManager::new(config);
    let mut renderer = CountingRenderer::default();
    let mut observer = Point3::new(0.5, DEMO_OBSERVER_HEIGHT, 0.5);

    let start = Instant::now();
    let mut next_tick = start;
    for tick in 0..demo_ticks {
        manager.tick(observer);

        renderer = CountingRenderer::default();
        manager.draw(&mut renderer);

        if tick % DEMO_EDIT_INTERVAL == 0 {
            random_edit(&mut manager, &mut rng, observer);
        }
        if tick % tick_rate == 0 {
            info!(
                "tick {}: {}; drew {} opaque / {} transparent chunks",
                tick,
                manager.stats(),
                renderer.opaque_draws,
                renderer.transparent_draws
            );
        }

        observer.x += DEMO_WALK_SPEED / tick_rate as f32;

        next_tick += tick_duration;
        let now = Instant::now();
        if next_tick > now {
            std::thread::sleep(next_tick - now);
        } else {
            // Running behind; do not try to catch up with a burst of ticks.
            next_tick = now;
        }
    }

    info!(
        "Demo finished after {:.1?}: {}; last frame drew {} indices",
        start.elapsed(),
        manager.stats(),
        renderer.indices
    );
}

/// Reads the configuration named by [`CONFIG_ENV_VAR`], or the defaults.
fn load_config() -> TerrainConfig {
    let Ok(path) = std::env::var(CONFIG_ENV_VAR) else {
        return TerrainConfig::default();
    };
    match TerrainConfig::load(&path) {
        Ok(config) => {
            info!("Loaded configuration from {}", path);
            config
        }
        Err(err) => {
            warn!("Ignoring configuration {}: {}", path, err);
            TerrainConfig::default()
        }
    }
}

/// Breaks or places a block straight below a random cell near the observer.
fn random_edit(manager: &mut TerrainManager, rng: &mut fastrand::Rng, observer: Point3<f32>) {
    let origin = Point3::new(
        observer.x.floor() + rng.i32(-8..8) as f32 + 0.5,
        DEMO_OBSERVER_HEIGHT,
        observer.z.floor() + rng.i32(-8..8) as f32 + 0.5,
    );
    let down = Vector3::new(0.0, -DEMO_OBSERVER_HEIGHT, 0.0);

    let edited = if rng.bool() {
        manager.break_block(origin, down)
    } else {
        manager.place_block(origin, down, BlockType::random_filled(rng))
    };
    if let Err(err) = edited {
        warn!("Demo edit at {:?} failed: {}", origin, err);
    }
}
