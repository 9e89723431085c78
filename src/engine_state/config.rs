use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{engine_state::voxels::terrain::TerrainSettings, error::ConfigError};

/// Default radius of the visible square, in chunks.
pub const DEFAULT_VIEW_DISTANCE: u32 = 4;
/// Default number of chunk builds per update.
pub const DEFAULT_BUILD_BUDGET: usize = 4;

/// Configuration of a [`WorldStreamer`](crate::WorldStreamer).
///
/// Loaded from JSON. Missing fields take their defaults:
///
/// ```json
/// {
///     "view_distance": 6,
///     "build_budget": 2,
///     "terrain": { "height_curve": 1.5 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamerConfig {
    /// Chunks visible in each direction from the viewer's chunk
    pub view_distance: u32,
    /// Maximum chunk builds per update
    pub build_budget: usize,
    pub terrain: TerrainSettings,
}

impl Default for StreamerConfig {
    fn default() -> Self {
        Self {
            view_distance: DEFAULT_VIEW_DISTANCE,
            build_budget: DEFAULT_BUILD_BUDGET,
            terrain: TerrainSettings::default(),
        }
    }
}

impl StreamerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }
}
