//! # Chunk Iteration Module
//!
//! This module provides an iterator over the non-air blocks of a chunk. It walks the
//! grid's solidity bit vector so runs of air are skipped without reading the dense
//! block array.

use bitvec::slice::IterOnes;
use cgmath::Point3;

use crate::engine_state::voxels::block::BlockType;

use super::BlockGrid;

/// An iterator over all non-air blocks in a chunk, yielding local positions.
pub struct ChunkBlockIterator<'a> {
    /// Reference to the grid being iterated over
    grid: &'a BlockGrid,
    /// Positions of the set bits in the solid array
    solid_offsets: IterOnes<'a, usize, bitvec::order::Lsb0>,
}

impl<'a> ChunkBlockIterator<'a> {
    /// Creates a new `ChunkBlockIterator` positioned at the first non-air block.
    pub fn new(grid: &'a BlockGrid) -> Self {
        ChunkBlockIterator {
            grid,
            solid_offsets: grid.solid_array().iter_ones(),
        }
    }
}

impl<'a> Iterator for ChunkBlockIterator<'a> {
    type Item = (Point3<i32>, BlockType);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.solid_offsets.next()?;
        Some((BlockGrid::position_of(index), self.grid.blocks()[index]))
    }
}
