//! # Voxel Stream Entry Point
//!
//! Runs the headless streaming driver from the library's `run()` function.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=debug cargo run --release -- [config.json]
//! ```

fn main() {
    voxel_stream::run();
}
