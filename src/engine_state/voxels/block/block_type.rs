//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world
//! and the flat color each one is rendered with.

use std::fmt;

/// Enumerates all possible block types in the voxel world.
///
/// The set is closed. `AIR` is the absence value and is stored as `0`, so a
/// zeroed grid is an empty grid.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlockType {
    /// Empty space. Never meshed.
    #[default]
    AIR = 0,

    /// The topmost solid block of every terrain column.
    GRASS = 1,

    /// The three blocks directly under the grass layer.
    DIRT = 2,

    /// Everything below the dirt layer, down to `y = 0`.
    STONE = 3,

    /// Fills columns that end below the water level. Rendered translucent.
    WATER = 4,
}

/// Alpha used for water faces. Every other block type is opaque.
pub const WATER_ALPHA: f32 = 0.65;

impl BlockType {
    /// Returns `true` for the absence value.
    #[inline]
    pub fn is_air(self) -> bool {
        self == BlockType::AIR
    }

    /// The RGBA color written into every vertex of this block's faces.
    ///
    /// Air has no geometry; its color is fully transparent.
    pub fn color(self) -> [f32; 4] {
        match self {
            BlockType::AIR => [0.0, 0.0, 0.0, 0.0],
            BlockType::GRASS => [0.34, 0.62, 0.24, 1.0],
            BlockType::DIRT => [0.47, 0.33, 0.21, 1.0],
            BlockType::STONE => [0.52, 0.52, 0.54, 1.0],
            BlockType::WATER => [0.18, 0.38, 0.78, WATER_ALPHA],
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlockType::AIR => "air",
            BlockType::GRASS => "grass",
            BlockType::DIRT => "dirt",
            BlockType::STONE => "stone",
            BlockType::WATER => "water",
        };
        f.write_str(name)
    }
}
