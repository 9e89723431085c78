//! # Terrain Module
//!
//! Turns world columns into surface heights and block columns.
//!
//! ## Pipeline
//!
//! 1. Two octave signals (continent and detail) are sampled from a [`NoiseField`]
//!    and blended by their weights
//! 2. The blend is smoothed over a 3×3 kernel of nearby sample points
//! 3. The smoothed value is mapped to `[0, 1]`, shaped by `height_curve` and scaled
//!    into the configured height band
//! 4. While a whole chunk is generated, each column is kept within
//!    [`MAX_SLOPE`] blocks of its west and north neighbors
//!
//! Settings are passed explicitly into every call. Replacing them, or reseeding the
//! noise, means every grid generated so far is stale; [`ChunkStore`] owns that clear.
//!
//! [`NoiseField`]: super::noise::NoiseField
//! [`ChunkStore`]: super::world::ChunkStore

mod terrain_profile;
mod terrain_settings;

pub use terrain_profile::{
    column_profile, TerrainProfile, DIRT_DEPTH, MAX_COLUMN_HEIGHT, MAX_SLOPE, MIN_COLUMN_HEIGHT,
    WATER_LEVEL,
};
pub use terrain_settings::TerrainSettings;
