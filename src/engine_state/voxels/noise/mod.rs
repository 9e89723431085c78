//! # Noise Module
//!
//! Deterministic gradient noise used by terrain generation.
//!
//! The lattice hashing uses a fixed permutation table; only a pair of world-space
//! offsets on X and Z is randomized when the field is reseeded. Two fields with the
//! same offsets produce bit-identical output.

mod noise_field;

pub use noise_field::{NoiseField, RESEED_OFFSET_RANGE};
