//! # Block Module
//!
//! This module provides the core block-related functionality for the terrain streamer.
//! It includes the closed set of block types and the six axis-aligned block faces
//! used when culling and emitting geometry.

pub mod block_side;
pub mod block_type;

pub use block_side::BlockSide;
pub use block_type::BlockType;
