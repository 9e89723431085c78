use std::{collections::HashMap, fmt};

use crate::{
    engine_state::{
        buffer_state::{ChunkMeshHandle, MeshAllocator},
        rendering::meshing::MeshBuilder,
        voxels::{
            chunk::ChunkCoordinate, terrain::TerrainSettings, visibility::VisibilitySet,
            world::ChunkStore,
        },
    },
    error::ChunkError,
};

use super::ChunkState;

/// What one scheduler update did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Chunks whose mesh was built this update
    pub built: usize,
    /// Visible chunks still waiting for a build after this update
    pub deferred: usize,
    /// Meshed chunks released because they left the visibility set
    pub evicted: usize,
    /// Halo grids dropped because no visible chunk borders them anymore
    pub pruned: usize,
}

impl fmt::Display for UpdateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "built {}, deferred {}, evicted {}, pruned {}",
            self.built, self.deferred, self.evicted, self.pruned
        )
    }
}

/// Owns the chunk store and every chunk mesh, and moves chunks through their lifecycle.
///
/// Every mesh handle the scheduler holds belongs to a coordinate of the visibility set
/// passed to the most recent [`update`](Self::update). Handles are always released to
/// the allocator before the grid of their chunk is dropped.
pub struct ChunkScheduler<A: MeshAllocator> {
    store: ChunkStore,
    allocator: A,
    meshes: HashMap<ChunkCoordinate, ChunkMeshHandle<A::Buffer>>,
    /// Maximum build units per update
    build_budget: usize,
    last_report: UpdateReport,
}

impl<A: MeshAllocator> ChunkScheduler<A> {
    pub fn new(store: ChunkStore, allocator: A, build_budget: usize) -> Self {
        ChunkScheduler {
            store,
            allocator,
            meshes: HashMap::new(),
            build_budget,
            last_report: UpdateReport::default(),
        }
    }

    /// Runs one update against `visible`.
    ///
    /// Builds pending chunks nearest-first until the budget is used up, then evicts
    /// meshed chunks outside `visible` and prunes stale halo grids.
    ///
    /// # Errors
    ///
    /// Returns the allocator's error if a mesh could not be allocated. No further chunks
    /// are built in that update, eviction still runs, and the failed chunk stays
    /// [`ChunkState::PendingBuild`] to be retried on the next update. The report of the
    /// failed update is available from [`last_report`](Self::last_report).
    pub fn update(&mut self, visible: &VisibilitySet) -> Result<UpdateReport, ChunkError> {
        let mut report = UpdateReport::default();
        let mut failure = None;

        for coordinate in visible.nearest_first() {
            if self.meshes.contains_key(&coordinate) {
                continue;
            }
            if failure.is_some() || report.built >= self.build_budget {
                report.deferred += 1;
                continue;
            }

            match self.build(coordinate) {
                Ok(()) => report.built += 1,
                Err(error) => {
                    log::warn!("Deferring chunk {coordinate}: {error}");
                    report.deferred += 1;
                    failure = Some(error);
                }
            }
        }

        report.evicted = self.evict(visible);
        report.pruned = self.prune_halo(visible);
        self.last_report = report;

        match failure {
            Some(error) => Err(error),
            None => Ok(report),
        }
    }

    /// One build unit: generate the grid if needed, mesh it and allocate the mesh.
    fn build(&mut self, coordinate: ChunkCoordinate) -> Result<(), ChunkError> {
        let vertices = MeshBuilder::build(coordinate, &mut self.store);

        let handle = if vertices.is_empty() {
            ChunkMeshHandle::empty()
        } else {
            let buffer = self.allocator.allocate(coordinate, &vertices)?;
            ChunkMeshHandle::new(buffer, vertices.len() as u32)
        };

        log::trace!(
            "Built chunk {coordinate} with {} vertices",
            handle.vertex_count()
        );
        self.meshes.insert(coordinate, handle);
        Ok(())
    }

    /// Releases every mesh outside `visible`, then drops its grid.
    fn evict(&mut self, visible: &VisibilitySet) -> usize {
        let stale: Vec<ChunkCoordinate> = self
            .meshes
            .keys()
            .copied()
            .filter(|coordinate| !visible.contains(*coordinate))
            .collect();

        for coordinate in &stale {
            self.release_mesh(*coordinate);
            self.store.remove(*coordinate);
            log::trace!("Evicted chunk {coordinate}");
        }

        stale.len()
    }

    /// Drops grids that have no mesh and no visible neighbor.
    fn prune_halo(&mut self, visible: &VisibilitySet) -> usize {
        let meshes = &self.meshes;
        self.store.retain(|coordinate| {
            meshes.contains_key(&coordinate) || visible.is_within_halo(coordinate)
        })
    }

    fn release_mesh(&mut self, coordinate: ChunkCoordinate) {
        if let Some(buffer) = self
            .meshes
            .remove(&coordinate)
            .and_then(ChunkMeshHandle::into_buffer)
        {
            self.allocator.release(buffer);
        }
    }

    /// Releases every mesh, then drops every grid.
    pub fn reset(&mut self) {
        let coordinates: Vec<ChunkCoordinate> = self.meshes.keys().copied().collect();
        for coordinate in coordinates {
            self.release_mesh(coordinate);
        }
        self.store.clear();
        log::info!("Chunk scheduler reset");
    }

    /// Replaces the terrain settings. All meshes and grids are discarded.
    pub fn set_settings(&mut self, settings: TerrainSettings) {
        self.reset();
        self.store.set_settings(settings);
        log::info!("Terrain settings replaced");
    }

    /// Draws new noise offsets. All meshes and grids are discarded.
    pub fn reseed(&mut self) {
        self.reset();
        self.store.reseed();
        let (x, z) = self.store.profile().noise().offsets();
        log::info!("Terrain reseeded with offsets ({x:.2}, {z:.2})");
    }

    /// Sets the noise offsets explicitly. All meshes and grids are discarded.
    pub fn reseed_with_offsets(&mut self, offset_x: f64, offset_z: f64) {
        self.reset();
        self.store.reseed_with_offsets(offset_x, offset_z);
        log::info!("Terrain reseeded with offsets ({offset_x:.2}, {offset_z:.2})");
    }

    /// The lifecycle state of `coordinate` relative to `visible`.
    pub fn chunk_state(&self, coordinate: ChunkCoordinate, visible: &VisibilitySet) -> ChunkState {
        ChunkState::derive(
            self.meshes.contains_key(&coordinate),
            visible.contains(coordinate),
        )
    }

    pub fn mesh(&self, coordinate: ChunkCoordinate) -> Option<&ChunkMeshHandle<A::Buffer>> {
        self.meshes.get(&coordinate)
    }

    /// Iterates over every mesh handle, including empty ones.
    pub fn mesh_handles(
        &self,
    ) -> impl Iterator<Item = (ChunkCoordinate, &ChunkMeshHandle<A::Buffer>)> + '_ {
        self.meshes.iter().map(|(coordinate, handle)| (*coordinate, handle))
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Total vertices across all meshes.
    pub fn resident_vertices(&self) -> u64 {
        self.meshes
            .values()
            .map(|handle| handle.vertex_count() as u64)
            .sum()
    }

    pub fn store(&self) -> &ChunkStore {
        &self.store
    }

    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    pub fn allocator_mut(&mut self) -> &mut A {
        &mut self.allocator
    }

    pub fn build_budget(&self) -> usize {
        self.build_budget
    }

    pub fn set_build_budget(&mut self, build_budget: usize) {
        self.build_budget = build_budget;
    }

    /// The report of the most recent update, including one that returned an error.
    pub fn last_report(&self) -> UpdateReport {
        self.last_report
    }
}
