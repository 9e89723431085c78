//! # Error Types
//!
//! Errors surfaced by the chunk lifecycle and by configuration loading.
//!
//! Queries outside the vertical extent of the world are deliberately absent
//! from this module: they resolve to air and are never reported as failures.
//! Likewise an all-air or fully enclosed chunk is a valid, empty mesh.

use std::path::PathBuf;

use thiserror::Error;

use crate::engine_state::voxels::chunk::ChunkCoordinate;

/// Failures raised while building or evicting chunk resources.
#[derive(Debug, Error)]
pub enum ChunkError {
    /// The mesh allocator ran out of room for this chunk's vertex data.
    ///
    /// Recoverable: the chunk stays pending and is retried on a later update.
    #[error(
        "mesh allocation for chunk {coordinate} needs {requested_bytes} bytes, only {available_bytes} available"
    )]
    ResourceExhausted {
        coordinate: ChunkCoordinate,
        requested_bytes: u64,
        available_bytes: u64,
    },

    /// The GPU reported an error while creating the vertex buffer.
    #[error("GPU buffer creation failed for chunk {coordinate}: {message}")]
    GpuAllocation {
        coordinate: ChunkCoordinate,
        message: String,
    },

    /// A local block index fell outside the grid.
    ///
    /// This is a programming error in coordinate math.
    #[error("local index {local:?} is outside the grid of chunk {coordinate}")]
    GridIndexOutOfBounds {
        coordinate: ChunkCoordinate,
        local: (i32, i32, i32),
    },
}

impl ChunkError {
    /// Whether the failed build should simply be retried on a later update.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ChunkError::ResourceExhausted { .. } | ChunkError::GpuAllocation { .. }
        )
    }
}

/// Failures raised while loading a [`StreamerConfig`](crate::StreamerConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid streamer config")]
    Parse(#[from] serde_json::Error),
}
