//! Mesh generation for voxel rendering.
//!
//! This module converts block grids into GPU-friendly triangle lists.
//!
//! # Architecture
//! - [`MeshBuilder`]: Walks a chunk's solid blocks and emits every exposed side
//! - [`Face`]: One block side with its four corners, expanded into two triangles
//!
//! Faces are emitted one quad per exposed block side. Merging coplanar faces is left
//! to a later optimization pass; the output format does not depend on it.

mod face;
mod mesh;

pub use face::Face;
pub use mesh::MeshBuilder;
