//! # Chunk Module
//!
//! This module provides the `BlockGrid` struct and related functionality for storing
//! one chunk's worth of voxel data: a `CHUNK_SIZE × CHUNK_HEIGHT × CHUNK_SIZE` column
//! of blocks addressed by a [`ChunkCoordinate`].
//!
//! ## Storage
//!
//! A grid keeps two views of the same data:
//! - `blocks`: a dense array with one `BlockType` per cell, for direct lookups
//! - `solid_array`: a bit vector (1 bit per cell) marking non-air cells
//!
//! The bit vector makes the common mesher questions cheap: "is this cell solid",
//! "is this chunk empty" and "where are the solid cells" never touch the dense array.
//!
//! Both arrays are laid out x-fastest, then z, then y, so a horizontal layer of the
//! chunk is contiguous.
//!
//! Grids are immutable once built. Editing blocks is not supported; a change to
//! the terrain means generating a new grid and rebuilding its mesh.

use bitvec::vec::BitVec;
use cgmath::Point3;

use super::block::BlockType;
use crate::error::ChunkError;

mod chunk_coordinate;
mod chunk_creation;
pub mod chunk_iteration;

pub use chunk_coordinate::{ChunkCoordinate, MAX_CHUNK, MIN_CHUNK};
pub use chunk_creation::ChunkCreationIterator;
pub use chunk_iteration::ChunkBlockIterator;

/// The width and depth of a chunk in blocks.
pub const CHUNK_SIZE: i32 = 16;
/// The height of a chunk (and of the world) in blocks.
pub const CHUNK_HEIGHT: i32 = 64;
/// The number of block columns in a chunk (CHUNK_SIZE²).
pub const CHUNK_COLUMN_COUNT: usize = (CHUNK_SIZE * CHUNK_SIZE) as usize;
/// The number of blocks in one horizontal layer of a chunk.
pub const CHUNK_LAYER_SIZE: usize = CHUNK_COLUMN_COUNT;
/// The total number of blocks in a chunk.
pub const CHUNK_VOLUME: usize = CHUNK_LAYER_SIZE * CHUNK_HEIGHT as usize;

/// Dense block storage for one chunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockGrid {
    /// The chunk this grid belongs to.
    coordinate: ChunkCoordinate,

    /// One block type per cell.
    blocks: Vec<BlockType>,

    /// A bit vector where each bit represents whether the corresponding block is solid (1) or air (0).
    solid_array: BitVec,
}

impl BlockGrid {
    /// Creates a grid where every cell holds `block_type`.
    ///
    /// Used for stubs and tests; terrain grids come from [`ChunkCreationIterator`].
    pub fn filled(coordinate: ChunkCoordinate, block_type: BlockType) -> Self {
        BlockGrid {
            coordinate,
            blocks: vec![block_type; CHUNK_VOLUME],
            solid_array: BitVec::repeat(!block_type.is_air(), CHUNK_VOLUME),
        }
    }

    /// Creates a grid where every cell is air.
    pub fn empty(coordinate: ChunkCoordinate) -> Self {
        Self::filled(coordinate, BlockType::AIR)
    }

    pub(crate) fn from_parts(
        coordinate: ChunkCoordinate,
        blocks: Vec<BlockType>,
        solid_array: BitVec,
    ) -> Self {
        debug_assert_eq!(blocks.len(), CHUNK_VOLUME);
        debug_assert_eq!(solid_array.len(), CHUNK_VOLUME);
        BlockGrid {
            coordinate,
            blocks,
            solid_array,
        }
    }

    pub fn coordinate(&self) -> ChunkCoordinate {
        self.coordinate
    }

    /// Returns `true` if the local position lies inside the grid.
    #[inline]
    pub fn contains_local(x: i32, y: i32, z: i32) -> bool {
        (0..CHUNK_SIZE).contains(&x) && (0..CHUNK_HEIGHT).contains(&y) && (0..CHUNK_SIZE).contains(&z)
    }

    /// Flat index of a local position. The caller guarantees bounds.
    #[inline]
    pub(crate) fn index_of(x: i32, y: i32, z: i32) -> usize {
        x as usize + CHUNK_SIZE as usize * z as usize + CHUNK_LAYER_SIZE * y as usize
    }

    /// Inverse of [`index_of`](Self::index_of).
    #[inline]
    pub(crate) fn position_of(index: usize) -> Point3<i32> {
        let y = index / CHUNK_LAYER_SIZE;
        let rest = index % CHUNK_LAYER_SIZE;
        let z = rest / CHUNK_SIZE as usize;
        let x = rest % CHUNK_SIZE as usize;
        Point3::new(x as i32, y as i32, z as i32)
    }

    /// Gets the block at the specified chunk-relative coordinates.
    ///
    /// # Returns
    /// `None` if the coordinates are outside the grid.
    pub fn get(&self, x: i32, y: i32, z: i32) -> Option<BlockType> {
        if !Self::contains_local(x, y, z) {
            return None;
        }
        Some(self.blocks[Self::index_of(x, y, z)])
    }

    /// Like [`get`](Self::get), but treats an out-of-grid index as the invariant
    /// violation it is when the caller derived the position from this grid.
    pub fn try_get(&self, x: i32, y: i32, z: i32) -> Result<BlockType, ChunkError> {
        self.get(x, y, z).ok_or(ChunkError::GridIndexOutOfBounds {
            coordinate: self.coordinate,
            local: (x, y, z),
        })
    }

    /// Returns `true` if every cell is air.
    pub fn is_empty(&self) -> bool {
        self.solid_array.not_any()
    }

    /// Number of non-air cells.
    pub fn solid_count(&self) -> usize {
        self.solid_array.count_ones()
    }

    /// Iterates over every non-air block with its local position.
    pub fn solid_blocks(&self) -> ChunkBlockIterator<'_> {
        ChunkBlockIterator::new(self)
    }

    pub(crate) fn solid_array(&self) -> &BitVec {
        &self.solid_array
    }

    pub(crate) fn blocks(&self) -> &[BlockType] {
        &self.blocks
    }
}
