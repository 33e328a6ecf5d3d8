//! # Terrain Configuration
//!
//! Tunables for generation, rendering and the worker pool, loaded from JSON.
//! Every field is optional in the file; missing fields take the defaults below.
//!
//! ```json
//! { "seed": 7, "generation_radius": 3, "worker_count": 2 }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Runtime configuration for a [`TerrainManager`](crate::TerrainManager).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Seed shared by every noise generator.
    pub seed: u32,
    /// Zones kept generated and meshed around the observer.
    pub generation_radius: i32,
    /// Blocks around the observer whose chunks are drawn.
    pub render_radius: i32,
    /// Worker threads; `0` selects the available parallelism.
    pub worker_count: usize,
    /// Fixed tick rate of the demo loop.
    pub tick_rate_hz: u32,
    /// Number of ticks the headless demo runs for.
    pub demo_ticks: u32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        TerrainConfig {
            seed: 0,
            generation_radius: 4,
            render_radius: 96,
            worker_count: 0,
            tick_rate_hz: 60,
            demo_ticks: 600,
        }
    }
}

impl TerrainConfig {
    /// Parses a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Number of worker threads to spawn, resolving `0` to the machine's parallelism.
    pub fn resolved_worker_count(&self) -> usize {
        if self.worker_count > 0 {
            return self.worker_count;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = TerrainConfig::from_json_str(r#"{ "seed": 7 }"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.generation_radius, 4);
        assert_eq!(config.render_radius, 96);
        assert_eq!(config.tick_rate_hz, 60);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = TerrainConfig::from_json_str("{ seed: }").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn zero_workers_resolves_to_at_least_one() {
        let config = TerrainConfig::default();
        assert!(config.resolved_worker_count() >= 1);

        let fixed = TerrainConfig {
            worker_count: 3,
            ..TerrainConfig::default()
        };
        assert_eq!(fixed.resolved_worker_count(), 3);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = TerrainConfig::load("/definitely/not/here/terrain.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
