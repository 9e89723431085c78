//! # Voxel Engine Core
//!
//! Block data of the streamed world, from noise to cached block grids.
//!
//! ## Architecture
//!
//! The voxel system is organized into several key components, leaves first:
//!
//! * **Block**: The closed set of block types and the six block sides
//! * **Chunk**: Fixed-size column grids of blocks and their coordinates
//! * **Noise**: Reseedable gradient noise
//! * **Terrain**: Surface heights and block columns derived from the noise
//! * **World**: The [`ChunkStore`](world::ChunkStore) caching generated grids
//! * **Visibility**: The square of chunks around the viewer
//!
//! ## Data Flow
//!
//! 1. The viewer position becomes a [`VisibilitySet`](visibility::VisibilitySet)
//! 2. The scheduler asks the store for grids of visible chunks
//! 3. The store generates missing grids from the terrain profile
//! 4. The mesher reads grids and their neighbors through the store

pub mod block;
pub mod chunk;
pub mod noise;
pub mod terrain;
pub mod visibility;
pub mod world;
