//! Mesh construction for voxel rendering.
//!
//! This module converts a chunk's block grid into a flat triangle list. Every exposed
//! block side becomes one quad (two triangles, six vertices). A side is exposed when
//! the neighboring cell is air, whether that cell lies in the same chunk, in a
//! neighboring chunk or outside the world's vertical extent.

use cgmath::Vector3;

use crate::{
    engine_state::voxels::{
        block::BlockSide,
        chunk::{BlockGrid, ChunkCoordinate},
        world::BlockSource,
    },
    error::ChunkError,
};

use super::face::Face;
use crate::engine_state::rendering::Vertex;

/// Builds face-culled meshes from block data.
pub struct MeshBuilder;

impl MeshBuilder {
    /// Builds the mesh of the chunk at `coordinate`.
    ///
    /// Neighbor cells outside the chunk are read through `source` with generation
    /// enabled, so meshing a chunk generates its four face neighbors if they are
    /// missing. Generation itself never reads neighbors, so this never cascades.
    ///
    /// # Returns
    /// The vertex list in world space. An empty list is a valid "no geometry" result
    /// for all-air or fully enclosed chunks.
    ///
    /// # Panics
    /// In debug builds, if the grid reports a local index outside itself. Release
    /// builds log the error and return an empty mesh.
    pub fn build<S>(coordinate: ChunkCoordinate, source: &mut S) -> Vec<Vertex>
    where
        S: BlockSource + ?Sized,
    {
        match Self::try_build(coordinate, source) {
            Ok(vertices) => vertices,
            Err(error) => {
                if cfg!(debug_assertions) {
                    panic!("mesh construction invariant violated: {error}");
                }
                log::error!("Discarding mesh of chunk {coordinate}: {error}");
                Vec::new()
            }
        }
    }

    fn try_build<S>(coordinate: ChunkCoordinate, source: &mut S) -> Result<Vec<Vertex>, ChunkError>
    where
        S: BlockSource + ?Sized,
    {
        let grid = source.grid(coordinate);
        if grid.is_empty() {
            log::trace!("Chunk {coordinate} is all air, skipping mesh");
            return Ok(Vec::new());
        }

        let (origin_x, origin_z) = coordinate.block_origin();
        let origin = Vector3::new(origin_x, 0, origin_z);
        let mut vertices = Vec::new();

        for (local, block_type) in grid.solid_blocks() {
            for side in BlockSide::all() {
                let neighbor = local + side.offset();

                let neighbor_block = if BlockGrid::contains_local(neighbor.x, neighbor.y, neighbor.z) {
                    grid.try_get(neighbor.x, neighbor.y, neighbor.z)?
                } else {
                    let world = neighbor + origin;
                    source.block_at(world.x, world.y, world.z, true)
                };

                if neighbor_block.is_air() {
                    Face::new(local + origin, block_type, side).push_vertices(&mut vertices);
                }
            }
        }

        log::trace!(
            "Meshed chunk {coordinate}: {} faces from {} solid blocks",
            vertices.len() / 6,
            grid.solid_count()
        );
        Ok(vertices)
    }
}
