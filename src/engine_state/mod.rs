//! # Engine State Module
//!
//! The core engine module that manages the streamed world around a moving viewer.
//!
//! ## Key Components
//!
//! * `WorldStreamer` - The main state container; the entry point for the frame loop
//! * `scheduling` - Build budgeting and eviction of chunks
//! * `rendering` - Vertex format and mesh construction
//! * `buffer_state` - The allocation seam between meshes and GPU memory
//! * `voxels` - Block data, terrain generation and the chunk store
//! * `config` - Serializable streamer configuration
//!
//! ## Frame Flow
//!
//! ```text
//! viewer (x, z) ─▶ VisibilitySet ─▶ ChunkScheduler ─▶ MeshBuilder / ChunkStore
//!                                        │
//!                                        ▼
//!                              draw_list() ─▶ external draw pass
//! ```
//!
//! Everything runs on the caller's thread. The build budget is the only bound on how
//! long one update takes.

use std::fmt;

use config::StreamerConfig;
use rendering::Vertex;
use scheduling::{ChunkScheduler, ChunkState, UpdateReport};
use voxels::{
    chunk::ChunkCoordinate, noise::NoiseField, terrain::TerrainSettings,
    visibility::{VisibilitySet, MAX_VIEW_DISTANCE}, world::ChunkStore,
};

use self::buffer_state::{ChunkMeshHandle, MeshAllocator};
use crate::error::ChunkError;

pub mod buffer_state;
pub mod config;
pub mod rendering;
pub mod scheduling;
pub mod voxels;

/// Resident resource counts of a [`WorldStreamer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamerStats {
    /// Chunks in the current visibility set
    pub visible_chunks: usize,
    /// Visible chunks still waiting for a build
    pub pending_chunks: usize,
    /// Block grids held by the chunk store, halo included
    pub resident_grids: usize,
    /// Mesh handles held by the scheduler, empty meshes included
    pub resident_meshes: usize,
    /// Vertices across all resident meshes
    pub resident_vertices: u64,
}

impl fmt::Display for StreamerStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} visible ({} pending), {} grids, {} meshes, {} vertices",
            self.visible_chunks,
            self.pending_chunks,
            self.resident_grids,
            self.resident_meshes,
            self.resident_vertices
        )
    }
}

/// Streams terrain around a viewer.
///
/// Owns the [`ChunkScheduler`] (and through it the chunk store and the mesh allocator)
/// together with the current visibility set.
///
/// # Examples
///
/// ```
/// use voxel_stream::{HostMeshAllocator, NoiseField, StreamerConfig, WorldStreamer};
///
/// let config = StreamerConfig { view_distance: 1, build_budget: 9, ..Default::default() };
/// let mut streamer = WorldStreamer::with_noise(
///     config,
///     HostMeshAllocator::new(),
///     NoiseField::with_offsets(0.0, 0.0),
/// );
///
/// let report = streamer.update_viewer(8.0, 8.0).unwrap();
/// assert_eq!(report.built, 9);
/// assert_eq!(streamer.draw_list().count(), 9);
/// ```
pub struct WorldStreamer<A: MeshAllocator> {
    scheduler: ChunkScheduler<A>,
    visible: VisibilitySet,
    view_distance: u32,
}

impl<A: MeshAllocator> WorldStreamer<A> {
    /// Creates a streamer with randomly seeded terrain.
    pub fn new(config: StreamerConfig, allocator: A) -> Self {
        Self::with_noise(config, allocator, NoiseField::new())
    }

    /// Creates a streamer whose terrain comes from `noise`.
    pub fn with_noise(config: StreamerConfig, allocator: A, noise: NoiseField) -> Self {
        let store = ChunkStore::new(noise, config.terrain);
        WorldStreamer {
            scheduler: ChunkScheduler::new(store, allocator, config.build_budget),
            visible: VisibilitySet::default(),
            view_distance: config.view_distance.min(MAX_VIEW_DISTANCE),
        }
    }

    /// The chunk containing the world-space viewer position.
    pub fn viewer_chunk(x: f32, z: f32) -> ChunkCoordinate {
        ChunkCoordinate::from_world(x, z)
    }

    /// Recomputes the visibility set around `(x, z)` and runs one scheduler update.
    ///
    /// # Errors
    ///
    /// A mesh allocation failure. It is recoverable: the chunk is retried by the
    /// next call.
    pub fn update_viewer(&mut self, x: f32, z: f32) -> Result<UpdateReport, ChunkError> {
        self.visible = VisibilitySet::from_viewer(x, z, self.view_distance);
        self.update()
    }

    /// Runs one scheduler update against the current visibility set.
    pub fn update(&mut self) -> Result<UpdateReport, ChunkError> {
        let start = web_time::Instant::now();
        let result = self.scheduler.update(&self.visible);
        let report = self.scheduler.last_report();
        log::debug!(
            "Update around chunk {}: {report} in {:?}",
            self.visible.center(),
            start.elapsed()
        );
        result
    }

    /// Replaces the terrain settings. Every mesh is released and every grid dropped;
    /// the next updates rebuild the visible area.
    pub fn set_settings(&mut self, settings: TerrainSettings) {
        self.scheduler.set_settings(settings);
    }

    /// Draws new noise offsets and discards all generated data.
    pub fn reseed(&mut self) {
        self.scheduler.reseed();
    }

    /// Sets the noise offsets and discards all generated data.
    pub fn reseed_with_offsets(&mut self, offset_x: f64, offset_z: f64) {
        self.scheduler.reseed_with_offsets(offset_x, offset_z);
    }

    /// Changes the view distance, clamped to [`MAX_VIEW_DISTANCE`]. The draw list
    /// follows immediately; meshes are built and evicted on the next update.
    pub fn set_view_distance(&mut self, view_distance: u32) {
        let view_distance = view_distance.min(MAX_VIEW_DISTANCE);
        self.view_distance = view_distance;
        if !self.visible.is_empty() {
            self.visible = VisibilitySet::around(self.visible.center(), view_distance);
        }
    }

    /// Changes how many chunks one update may build.
    pub fn set_build_budget(&mut self, build_budget: usize) {
        self.scheduler.set_build_budget(build_budget);
    }

    /// Current view distance in chunks.
    pub fn view_distance(&self) -> u32 {
        self.view_distance
    }

    /// The visibility set of the last viewer update.
    pub fn visibility(&self) -> &VisibilitySet {
        &self.visible
    }

    /// The scheduler, for read access to meshes and the chunk store.
    pub fn scheduler(&self) -> &ChunkScheduler<A> {
        &self.scheduler
    }

    /// The mesh allocator, e.g. to change its budget.
    pub fn allocator_mut(&mut self) -> &mut A {
        self.scheduler.allocator_mut()
    }

    /// Lifecycle state of `coordinate` against the current visibility set.
    pub fn chunk_state(&self, coordinate: ChunkCoordinate) -> ChunkState {
        self.scheduler.chunk_state(coordinate, &self.visible)
    }

    /// The meshes to draw this frame: ready chunks that have geometry.
    pub fn draw_list(
        &self,
    ) -> impl Iterator<Item = (ChunkCoordinate, &ChunkMeshHandle<A::Buffer>)> + '_ {
        self.scheduler
            .mesh_handles()
            .filter(|(coordinate, handle)| !handle.is_empty() && self.visible.contains(*coordinate))
    }

    /// Snapshot of the resident resource counts.
    pub fn stats(&self) -> StreamerStats {
        let ready = self
            .visible
            .iter()
            .filter(|coordinate| self.scheduler.mesh(*coordinate).is_some())
            .count();

        StreamerStats {
            visible_chunks: self.visible.len(),
            pending_chunks: self.visible.len() - ready,
            resident_grids: self.scheduler.store().len(),
            resident_meshes: self.scheduler.mesh_count(),
            resident_vertices: self.scheduler.resident_vertices(),
        }
    }

    /// Size in bytes of the vertex data the draw list covers.
    pub fn draw_list_bytes(&self) -> u64 {
        self.draw_list()
            .map(|(_, handle)| handle.vertex_count() as u64 * std::mem::size_of::<Vertex>() as u64)
            .sum()
    }
}
