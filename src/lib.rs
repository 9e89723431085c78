#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Stream
//!
//! The chunk lifecycle core of a streaming voxel world: procedural terrain generated
//! around a moving viewer, converted into renderable geometry a few chunks at a time,
//! and released again once it falls out of range.
//!
//! ## Key Modules
//!
//! * `engine_state::voxels` - Blocks, chunks, noise, terrain and the chunk store
//! * `engine_state::rendering` - Vertex format and face-culled mesh construction
//! * `engine_state::scheduling` - Budgeted builds and eviction
//! * `engine_state::buffer_state` - Mesh allocation on `wgpu` or in host memory
//! * `error` - Error types
//!
//! ## Architecture
//!
//! Window management, camera control, GPU pipelines and the frame loop belong to the
//! embedding application. It feeds the viewer position into a [`WorldStreamer`] once
//! per frame and draws whatever [`WorldStreamer::draw_list`] returns.
//!
//! ## Usage
//!
//! ```rust
//! use voxel_stream::{HostMeshAllocator, StreamerConfig, WorldStreamer};
//!
//! let mut streamer = WorldStreamer::new(StreamerConfig::default(), HostMeshAllocator::new());
//! for frame in 0..3 {
//!     let x = frame as f32 * 4.0;
//!     streamer.update_viewer(x, 0.0).unwrap();
//!     for (coordinate, mesh) in streamer.draw_list() {
//!         // Hand `mesh.buffer()` and `mesh.vertex_count()` to the draw pass.
//!         let _ = (coordinate, mesh.vertex_count());
//!     }
//! }
//! ```

use log::info;

mod engine_state;
pub mod error;

pub use engine_state::{
    buffer_state::{
        ChunkMeshHandle, HostMeshAllocator, HostMeshBuffer, MeshAllocator, WgpuMeshAllocator,
    },
    config::StreamerConfig,
    rendering::{meshing::MeshBuilder, Vertex},
    scheduling::{ChunkScheduler, ChunkState, UpdateReport},
    voxels::{
        block::{BlockSide, BlockType},
        chunk::{BlockGrid, ChunkCoordinate, CHUNK_HEIGHT, CHUNK_SIZE, MAX_CHUNK, MIN_CHUNK},
        noise::NoiseField,
        terrain::{column_profile, TerrainProfile, TerrainSettings, WATER_LEVEL},
        visibility::{VisibilitySet, MAX_VIEW_DISTANCE},
        world::{BlockSource, ChunkStore},
    },
    StreamerStats, WorldStreamer,
};
pub use error::{ChunkError, ConfigError};

/// Frames the headless driver walks the viewer for.
const DRIVER_FRAMES: u32 = 64;
/// World units the viewer moves per frame.
const DRIVER_STEP: f32 = 3.0;

/// Runs the headless streaming driver.
///
/// Loads the config file named by the first command-line argument (defaults when
/// absent), then walks a viewer along the X axis and logs every update.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config = match std::env::args().nth(1) {
        Some(path) => match StreamerConfig::load(&path) {
            Ok(config) => {
                info!("Loaded config from {path}");
                config
            }
            Err(error) => {
                log::error!("{error}, falling back to defaults");
                StreamerConfig::default()
            }
        },
        None => StreamerConfig::default(),
    };

    let mut streamer = WorldStreamer::new(config, HostMeshAllocator::new());
    let start = web_time::Instant::now();

    for frame in 0..DRIVER_FRAMES {
        let x = frame as f32 * DRIVER_STEP;
        if let Err(error) = streamer.update_viewer(x, 0.0) {
            log::warn!("Frame {frame}: {error}");
        }
    }

    info!(
        "Streamed {DRIVER_FRAMES} frames in {:?}: {}, {} bytes drawable",
        start.elapsed(),
        streamer.stats(),
        streamer.draw_list_bytes()
    );
}
