//! # Chunk Creation Module
//!
//! This module provides a builder for populating a [`BlockGrid`] one terrain column
//! at a time. It maintains the relationship between the dense block array and the
//! solidity bit vector so the two can never disagree.
//!
//! Columns are pushed in row-major scan order: Z is the outer loop, X the inner
//! one. This is the same order the terrain generator computes column heights in,
//! so the builder's cursor always matches the column being generated.

use bitvec::vec::BitVec;

use crate::engine_state::voxels::block::BlockType;

use super::{BlockGrid, ChunkCoordinate, CHUNK_HEIGHT, CHUNK_SIZE, CHUNK_VOLUME};

/// A builder for creating a chunk's block grid column by column.
pub struct ChunkCreationIterator {
    /// The chunk being created
    coordinate: ChunkCoordinate,
    /// Dense block storage, filled with air until a column is pushed
    blocks: Vec<BlockType>,
    /// Bit vector where each bit represents whether a block is solid (1) or air (0)
    solid_array: BitVec,
    /// Current X position within the chunk (0..CHUNK_SIZE)
    local_x: i32,
    /// Current Z position within the chunk (0..CHUNK_SIZE)
    local_z: i32,
}

impl ChunkCreationIterator {
    /// Creates a new `ChunkCreationIterator` positioned at local column `(0, 0)`.
    pub fn new(coordinate: ChunkCoordinate) -> Self {
        ChunkCreationIterator {
            coordinate,
            blocks: vec![BlockType::AIR; CHUNK_VOLUME],
            solid_array: BitVec::repeat(false, CHUNK_VOLUME),
            local_x: 0,
            local_z: 0,
        }
    }

    /// The local column the next push will write to, or `None` once every column is written.
    pub fn cursor(&self) -> Option<(i32, i32)> {
        (self.local_z < CHUNK_SIZE).then_some((self.local_x, self.local_z))
    }

    /// Writes one column (index = local y) at the cursor and advances the cursor.
    ///
    /// Cells beyond `column.len()` stay air. Pushing past the last column is ignored.
    pub fn push_column(&mut self, column: &[BlockType]) {
        let Some((x, z)) = self.cursor() else {
            return;
        };

        for (y, block_type) in column.iter().take(CHUNK_HEIGHT as usize).enumerate() {
            let index = BlockGrid::index_of(x, y as i32, z);
            self.blocks[index] = *block_type;
            self.solid_array.set(index, !block_type.is_air());
        }

        self.local_x += 1;
        if self.local_x == CHUNK_SIZE {
            self.local_x = 0;
            self.local_z += 1;
        }
    }

    /// Finalizes the chunk creation and returns the constructed grid.
    ///
    /// Columns that were never pushed are left as air.
    pub fn return_chunk(self) -> BlockGrid {
        BlockGrid::from_parts(self.coordinate, self.blocks, self.solid_array)
    }
}
