//! # Chunk Scheduling
//!
//! Decides, once per update, which chunks get built and which built chunks are
//! released.
//!
//! ## Lifecycle
//!
//! Each chunk coordinate is in one of four [`ChunkState`]s, derived from whether it
//! has a mesh and whether it is in the current visibility set:
//!
//! ```text
//!               visible                 built
//! Unrequested ──────────▶ PendingBuild ───────▶ Ready
//!      ▲                                          │ leaves visibility
//!      └─────────────── evicted ◀──── Evictable ◀─┘
//! ```
//!
//! ## Update Order
//!
//! 1. Pending visible chunks are built nearest-first, at most `build_budget` per update
//! 2. Meshes of chunks that left the visibility set are released, then their grids dropped
//! 3. Grids generated only as meshing neighbors are dropped once they leave the halo
//!
//! Eviction runs even when a build fails, so a full allocator always gets the chance
//! to reclaim memory before the failed chunk is retried.

mod chunk_scheduler;
mod chunk_state;

pub use chunk_scheduler::{ChunkScheduler, UpdateReport};
pub use chunk_state::ChunkState;
