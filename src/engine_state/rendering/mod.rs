//! Rendering-side data for the voxel engine.
//!
//! This module turns block data into geometry the draw pass can consume: the
//! [`Vertex`] format and the [`MeshBuilder`](meshing::MeshBuilder). Pipelines,
//! shaders and the frame loop are owned by the embedding application; it reads the
//! finished meshes through [`WorldStreamer::draw_list`](crate::WorldStreamer::draw_list).

pub mod meshing;
mod vertex;

// Re-export commonly used types
pub use vertex::Vertex;
