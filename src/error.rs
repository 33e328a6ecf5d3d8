//! # Error Types
//!
//! Errors surfaced by the terrain core. Reads are total functions and never
//! produce these; only direct writes, ray marching and configuration loading do.

use thiserror::Error;

/// Failures raised by direct terrain manipulation.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TerrainError {
    /// A block write targeted a world position whose chunk was never instantiated.
    #[error("no chunk instantiated for block ({x}, {y}, {z})")]
    MissingChunk {
        /// World-space X.
        x: i32,
        /// World-space Y.
        y: i32,
        /// World-space Z.
        z: i32,
    },

    /// A block write fell outside the addressable volume.
    #[error("block coordinate ({x}, {y}, {z}) is out of bounds")]
    OutOfBounds {
        /// X coordinate of the rejected write.
        x: i32,
        /// Y coordinate of the rejected write.
        y: i32,
        /// Z coordinate of the rejected write.
        z: i32,
    },

    /// A block write targeted a chunk whose fill has not been installed yet.
    #[error("chunk holding block ({x}, {y}, {z}) has not been filled yet")]
    UnfilledChunk {
        /// World-space X.
        x: i32,
        /// World-space Y.
        y: i32,
        /// World-space Z.
        z: i32,
    },

    /// The grid march could not pick a crossing axis.
    #[error("ray march found no crossing axis; direction is not finite")]
    DegenerateRay,
}

/// Failures while loading a [`TerrainConfig`](crate::config::TerrainConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read terrain config: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid JSON for the expected shape.
    #[error("failed to parse terrain config: {0}")]
    Parse(#[from] serde_json::Error),
}
