//! # World Module
//!
//! This module provides the [`ChunkStore`], which owns every generated block grid of
//! the world and answers block queries across chunk boundaries.
//!
//! ## Architecture
//!
//! The store is sparse: only chunks that have been requested are kept in memory.
//! A missing chunk is generated from the [`TerrainProfile`] the first time it is
//! asked for and cached until it is removed or the whole store is cleared.
//!
//! Grids are handed out as `Arc<BlockGrid>`. A mesher can hold one chunk's grid while
//! it keeps querying (and generating) neighbors through `&mut` access to the store.
//!
//! ## Invalidation
//!
//! Generated grids depend on the terrain settings and the noise offsets. Replacing
//! either through the store clears every cached grid. Meshes built from the old grids
//! are owned elsewhere and must be released by their owner first.

use std::{collections::HashMap, sync::Arc};

use super::{
    block::BlockType,
    chunk::{BlockGrid, ChunkCoordinate, CHUNK_HEIGHT},
    noise::NoiseField,
    terrain::{TerrainProfile, TerrainSettings},
};

/// Read access to block data by chunk and by world position.
///
/// [`ChunkStore`] is the production implementation; meshing tests use stub sources
/// that return fixed grids.
pub trait BlockSource {
    /// Returns the grid of `coordinate`, generating it if necessary.
    fn grid(&mut self, coordinate: ChunkCoordinate) -> Arc<BlockGrid>;

    /// Returns the block at a world position.
    ///
    /// `y` outside `[0, CHUNK_HEIGHT)` is air. A chunk that has no grid yet is either
    /// generated (`generate_missing`) or treated as air.
    fn block_at(&mut self, world_x: i32, world_y: i32, world_z: i32, generate_missing: bool)
        -> BlockType;
}

/// Cache of generated block grids keyed by chunk coordinate.
///
/// # Examples
///
/// ```
/// use voxel_stream::{BlockType, ChunkCoordinate, ChunkStore, NoiseField, TerrainSettings};
///
/// let mut store = ChunkStore::new(NoiseField::with_offsets(0.0, 0.0), TerrainSettings::default());
///
/// // Queries below or above the world are air, not errors.
/// assert_eq!(store.block_at(0, -1, 0, true), BlockType::AIR);
///
/// // Without generation an unknown chunk reads as air and stays absent.
/// assert_eq!(store.block_at(0, 0, 0, false), BlockType::AIR);
/// assert!(!store.contains(ChunkCoordinate::new(0, 0)));
///
/// // With generation the bedrock layer is solid.
/// assert_ne!(store.block_at(0, 0, 0, true), BlockType::AIR);
/// assert!(store.contains(ChunkCoordinate::new(0, 0)));
/// ```
pub struct ChunkStore {
    /// Generated grids, at most one per coordinate.
    chunks: HashMap<ChunkCoordinate, Arc<BlockGrid>>,
    profile: TerrainProfile,
    settings: TerrainSettings,
}

impl ChunkStore {
    /// Creates an empty store.
    pub fn new(noise: NoiseField, settings: TerrainSettings) -> Self {
        ChunkStore {
            chunks: HashMap::new(),
            profile: TerrainProfile::new(noise),
            settings,
        }
    }

    /// Retrieves the grid at `coordinate`, generating and caching it if absent.
    ///
    /// Calling this twice without a clear in between returns the same grid.
    pub fn get(&mut self, coordinate: ChunkCoordinate) -> Arc<BlockGrid> {
        let profile = &self.profile;
        let settings = &self.settings;
        self.chunks
            .entry(coordinate)
            .or_insert_with(|| Arc::new(profile.generate_chunk(coordinate, settings)))
            .clone()
    }

    /// Returns the block at a world position.
    ///
    /// # Arguments
    ///
    /// * `world_x`, `world_y`, `world_z` - World block coordinates
    /// * `generate_missing` - Generate the containing chunk if it has no grid yet
    ///
    /// # Returns
    ///
    /// Air when `world_y` is outside the world, or when the chunk is absent and
    /// `generate_missing` is false.
    pub fn block_at(
        &mut self,
        world_x: i32,
        world_y: i32,
        world_z: i32,
        generate_missing: bool,
    ) -> BlockType {
        if !(0..CHUNK_HEIGHT).contains(&world_y) {
            return BlockType::AIR;
        }

        let (coordinate, local_x, local_z) = ChunkCoordinate::split_block(world_x, world_z);
        let grid = if generate_missing {
            self.get(coordinate)
        } else {
            match self.chunks.get(&coordinate) {
                Some(grid) => grid.clone(),
                None => return BlockType::AIR,
            }
        };

        grid.get(local_x, world_y, local_z).unwrap_or(BlockType::AIR)
    }

    pub fn contains(&self, coordinate: ChunkCoordinate) -> bool {
        self.chunks.contains_key(&coordinate)
    }

    /// Drops the grid at `coordinate`, if any.
    pub fn remove(&mut self, coordinate: ChunkCoordinate) -> Option<Arc<BlockGrid>> {
        self.chunks.remove(&coordinate)
    }

    /// Keeps only the grids for which `keep` returns `true`.
    ///
    /// # Returns
    ///
    /// The number of grids dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(ChunkCoordinate) -> bool) -> usize {
        let before = self.chunks.len();
        self.chunks.retain(|coordinate, _| keep(*coordinate));
        before - self.chunks.len()
    }

    /// Iterates over the coordinates that currently have a grid.
    pub fn coordinates(&self) -> impl Iterator<Item = ChunkCoordinate> + '_ {
        self.chunks.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Drops every grid.
    pub fn clear(&mut self) {
        self.chunks.clear();
    }

    pub fn settings(&self) -> &TerrainSettings {
        &self.settings
    }

    pub fn profile(&self) -> &TerrainProfile {
        &self.profile
    }

    /// Replaces the terrain settings and drops every grid.
    pub fn set_settings(&mut self, settings: TerrainSettings) {
        self.settings = settings;
        self.clear();
    }

    /// Draws new noise offsets and drops every grid.
    pub fn reseed(&mut self) {
        self.profile.reseed();
        self.clear();
    }

    /// Sets the noise offsets explicitly and drops every grid.
    pub fn reseed_with_offsets(&mut self, offset_x: f64, offset_z: f64) {
        self.profile.set_offsets(offset_x, offset_z);
        self.clear();
    }
}

impl BlockSource for ChunkStore {
    fn grid(&mut self, coordinate: ChunkCoordinate) -> Arc<BlockGrid> {
        self.get(coordinate)
    }

    fn block_at(
        &mut self,
        world_x: i32,
        world_y: i32,
        world_z: i32,
        generate_missing: bool,
    ) -> BlockType {
        ChunkStore::block_at(self, world_x, world_y, world_z, generate_missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::chunk::CHUNK_SIZE;

    fn store() -> ChunkStore {
        ChunkStore::new(NoiseField::with_offsets(0.0, 0.0), TerrainSettings::default())
    }

    #[test]
    fn out_of_world_queries_are_air() {
        let mut store = store();
        for y in [-1, -100, CHUNK_HEIGHT, CHUNK_HEIGHT + 7] {
            assert_eq!(store.block_at(3, y, 3, true), BlockType::AIR);
        }
        // Out-of-range queries never generate.
        assert!(store.is_empty());
    }

    #[test]
    fn get_twice_returns_identical_grids() {
        let mut store = store();
        let coordinate = ChunkCoordinate::new(-2, 5);
        let first = store.get(coordinate);
        let second = store.get(coordinate);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn regeneration_after_clear_is_deterministic() {
        let mut store = store();
        let coordinate = ChunkCoordinate::new(1, 1);
        let before = store.get(coordinate);
        store.clear();
        assert!(!store.contains(coordinate));
        let after = store.get(coordinate);
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(*before, *after);
    }

    #[test]
    fn block_at_resolves_negative_world_positions() {
        let mut store = store();
        let grid = store.get(ChunkCoordinate::new(-1, -1));
        for (lx, lz) in [(0, 0), (CHUNK_SIZE - 1, CHUNK_SIZE - 1), (4, 9)] {
            let wx = -CHUNK_SIZE + lx;
            let wz = -CHUNK_SIZE + lz;
            for y in [0, 10, 30, CHUNK_HEIGHT - 1] {
                assert_eq!(store.block_at(wx, y, wz, false), grid.get(lx, y, lz).unwrap());
            }
        }
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn missing_chunks_read_as_air_without_generation() {
        let mut store = store();
        assert_eq!(store.block_at(100, 0, 100, false), BlockType::AIR);
        assert!(store.is_empty());
        assert_eq!(store.block_at(100, 0, 100, true), BlockType::STONE);
        assert!(store.contains(ChunkCoordinate::from_block(100, 100)));
    }

    #[test]
    fn settings_and_reseed_clear_the_store() {
        let mut store = store();
        store.get(ChunkCoordinate::new(0, 0));
        store.get(ChunkCoordinate::new(0, 1));

        store.set_settings(TerrainSettings {
            height_curve: 0.5,
            ..TerrainSettings::default()
        });
        assert!(store.is_empty());
        assert_eq!(store.settings().height_curve, 0.5);

        store.get(ChunkCoordinate::new(0, 0));
        store.reseed_with_offsets(42.0, -42.0);
        assert!(store.is_empty());
        assert_eq!(store.profile().noise().offsets(), (42.0, -42.0));
    }

    #[test]
    fn retain_reports_dropped_grids() {
        let mut store = store();
        for x in 0..4 {
            store.get(ChunkCoordinate::new(x, 0));
        }
        let dropped = store.retain(|coordinate| coordinate.x % 2 == 0);
        assert_eq!(dropped, 2);
        let mut remaining: Vec<_> = store.coordinates().collect();
        remaining.sort();
        assert_eq!(
            remaining,
            vec![ChunkCoordinate::new(0, 0), ChunkCoordinate::new(2, 0)]
        );
    }
}
