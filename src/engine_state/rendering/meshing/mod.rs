//! Mesh generation for voxel rendering.
//!
//! This module handles the conversion of block grids into vertex lists. Ownership of
//! the GPU-side copies lives with the scheduler; see
//! [`buffer_state`](crate::engine_state::buffer_state) for the allocation seam.

/// Core mesh generation algorithms and data structures.
mod mesh;

pub use mesh::*;
