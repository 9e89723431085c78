use serde::{Deserialize, Serialize};

/// Tunable terrain generation parameters.
///
/// Values are not validated. Out-of-range numbers produce odd terrain, never a panic:
/// heights are always clamped into the world, and zero weight sums fall back to flat
/// contributions.
///
/// Every field has a default, so a partial JSON object is a valid settings value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    /// Frequency of the large-scale continent signal. Useful range `0.0005..0.02`.
    pub continent_freq: f64,
    /// Frequency of the small-scale detail signal. Useful range `0.001..0.02`.
    pub detail_freq: f64,
    /// Blend weight of the continent signal, `0.0..1.0`.
    pub continent_weight: f64,
    /// Blend weight of the detail signal, `0.0..1.0`.
    pub detail_weight: f64,
    /// Smoothing kernel weight of the center sample, `0.0..8.0`.
    pub smoothing_center_weight: f64,
    /// Smoothing kernel weight of each orthogonal sample, `0.0..8.0`.
    pub smoothing_edge_weight: f64,
    /// Smoothing kernel weight of each diagonal sample, `0.0..8.0`.
    pub smoothing_diag_weight: f64,
    /// Exponent applied to the normalized height. Above 1 flattens lowlands. `0.2..2.0`.
    pub height_curve: f64,
    /// Lowest surface height as a fraction of the world height, `0.0..0.8`.
    pub base_height_fraction: f64,
    /// Span of surface heights as a fraction of the world height, `0.05..0.8`.
    pub height_range_fraction: f64,
    pub continent_octaves: u32,
    pub continent_persistence: f64,
    pub detail_octaves: u32,
    pub detail_persistence: f64,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        TerrainSettings {
            continent_freq: 0.004,
            detail_freq: 0.015,
            continent_weight: 0.7,
            detail_weight: 0.3,
            smoothing_center_weight: 4.0,
            smoothing_edge_weight: 2.0,
            smoothing_diag_weight: 1.0,
            height_curve: 1.2,
            base_height_fraction: 0.2,
            height_range_fraction: 0.6,
            continent_octaves: 4,
            continent_persistence: 0.5,
            detail_octaves: 3,
            detail_persistence: 0.5,
        }
    }
}
