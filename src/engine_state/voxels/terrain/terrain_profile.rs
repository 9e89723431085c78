//! Column heights and block columns.

use crate::engine_state::voxels::{
    block::BlockType,
    chunk::{BlockGrid, ChunkCoordinate, ChunkCreationIterator, CHUNK_HEIGHT, CHUNK_SIZE},
    noise::NoiseField,
};

use super::TerrainSettings;

/// Water fills every air cell below this height.
pub const WATER_LEVEL: i32 = 20;
/// Lowest surface height any column can have.
pub const MIN_COLUMN_HEIGHT: i32 = 2;
/// Highest surface height any column can have.
pub const MAX_COLUMN_HEIGHT: i32 = CHUNK_HEIGHT - 2;
/// Largest height step between a column and its west or north neighbor inside one chunk.
pub const MAX_SLOPE: i32 = 2;
/// Dirt layers between the grass surface and stone.
pub const DIRT_DEPTH: i32 = 3;

/// Distance of the four orthogonal smoothing samples from the column center.
const EDGE_SAMPLE_OFFSET: f64 = 0.8;
/// Distance (per axis) of the four diagonal smoothing samples from the column center.
const DIAGONAL_SAMPLE_OFFSET: f64 = 1.8;

const EDGE_OFFSETS: [(f64, f64); 4] = [
    (EDGE_SAMPLE_OFFSET, 0.0),
    (-EDGE_SAMPLE_OFFSET, 0.0),
    (0.0, EDGE_SAMPLE_OFFSET),
    (0.0, -EDGE_SAMPLE_OFFSET),
];

const DIAGONAL_OFFSETS: [(f64, f64); 4] = [
    (DIAGONAL_SAMPLE_OFFSET, DIAGONAL_SAMPLE_OFFSET),
    (DIAGONAL_SAMPLE_OFFSET, -DIAGONAL_SAMPLE_OFFSET),
    (-DIAGONAL_SAMPLE_OFFSET, DIAGONAL_SAMPLE_OFFSET),
    (-DIAGONAL_SAMPLE_OFFSET, -DIAGONAL_SAMPLE_OFFSET),
];

/// Height generator backed by a single [`NoiseField`].
#[derive(Debug, Clone, Default)]
pub struct TerrainProfile {
    noise: NoiseField,
}

impl TerrainProfile {
    pub fn new(noise: NoiseField) -> Self {
        TerrainProfile { noise }
    }

    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    /// Draws new noise offsets. Every height computed before this call is stale.
    pub fn reseed(&mut self) {
        self.noise.reseed();
    }

    /// Sets the noise offsets explicitly. Every height computed before this call is stale.
    pub fn set_offsets(&mut self, offset_x: f64, offset_z: f64) {
        self.noise.set_offsets(offset_x, offset_z);
    }

    /// Blended continent + detail signal at a world-space point, in `[-1, 1]`.
    fn signal(&self, x: f64, z: f64, settings: &TerrainSettings) -> f64 {
        let continent = self.noise.octave_sample(
            x * settings.continent_freq,
            0.0,
            z * settings.continent_freq,
            settings.continent_octaves,
            settings.continent_persistence,
        );
        let detail = self.noise.octave_sample(
            x * settings.detail_freq,
            0.0,
            z * settings.detail_freq,
            settings.detail_octaves,
            settings.detail_persistence,
        );

        let weight_sum = settings.continent_weight + settings.detail_weight;
        if weight_sum.abs() < f64::EPSILON {
            return 0.0;
        }
        (continent * settings.continent_weight + detail * settings.detail_weight) / weight_sum
    }

    /// Signal averaged over the center, edge and diagonal samples around `(x, z)`.
    fn smoothed_signal(&self, x: f64, z: f64, settings: &TerrainSettings) -> f64 {
        let center = self.signal(x, z, settings);
        let edges: f64 = EDGE_OFFSETS
            .iter()
            .map(|(dx, dz)| self.signal(x + dx, z + dz, settings))
            .sum();
        let diagonals: f64 = DIAGONAL_OFFSETS
            .iter()
            .map(|(dx, dz)| self.signal(x + dx, z + dz, settings))
            .sum();

        let total_weight = settings.smoothing_center_weight
            + 4.0 * settings.smoothing_edge_weight
            + 4.0 * settings.smoothing_diag_weight;
        if total_weight.abs() < f64::EPSILON {
            return center;
        }

        (center * settings.smoothing_center_weight
            + edges * settings.smoothing_edge_weight
            + diagonals * settings.smoothing_diag_weight)
            / total_weight
    }

    /// Computes the surface height of the world column at `(world_x, world_z)`.
    ///
    /// The result is a pure function of the position, the settings and the noise
    /// offsets. It does not include the in-chunk slope clamp applied by
    /// [`chunk_heights`](Self::chunk_heights).
    ///
    /// # Returns
    /// A height in `[MIN_COLUMN_HEIGHT, MAX_COLUMN_HEIGHT]`.
    pub fn column_height(&self, world_x: i32, world_z: i32, settings: &TerrainSettings) -> i32 {
        let smoothed = self.smoothed_signal(world_x as f64, world_z as f64, settings);

        let normalized = ((smoothed + 1.0) * 0.5).clamp(0.0, 1.0);
        let shaped = normalized.powf(settings.height_curve);
        let height = CHUNK_HEIGHT as f64
            * (settings.base_height_fraction + settings.height_range_fraction * shaped);

        // NaN from a degenerate curve casts to 0 and is clamped like any low value.
        (height.floor() as i32).clamp(MIN_COLUMN_HEIGHT, MAX_COLUMN_HEIGHT)
    }

    /// Computes every column height of one chunk with the slope clamp applied.
    ///
    /// Columns are produced row-major (Z outer, X inner). Each column is clamped to
    /// within [`MAX_SLOPE`] of the west and north columns of the same chunk. Columns on
    /// the chunk's west and north edges are not clamped against the neighboring chunk.
    ///
    /// # Returns
    /// `CHUNK_SIZE²` heights, indexed `x + CHUNK_SIZE * z`.
    pub fn chunk_heights(&self, coordinate: ChunkCoordinate, settings: &TerrainSettings) -> Vec<i32> {
        let (origin_x, origin_z) = coordinate.block_origin();
        let size = CHUNK_SIZE as usize;
        let mut heights: Vec<i32> = Vec::with_capacity(size * size);

        for local_z in 0..size {
            for local_x in 0..size {
                let raw = self.column_height(
                    origin_x + local_x as i32,
                    origin_z + local_z as i32,
                    settings,
                );

                let west = (local_x > 0).then(|| heights[local_x - 1 + size * local_z]);
                let north = (local_z > 0).then(|| heights[local_x + size * (local_z - 1)]);

                let mut low = MIN_COLUMN_HEIGHT;
                let mut high = MAX_COLUMN_HEIGHT;
                for neighbor in [west, north].into_iter().flatten() {
                    low = low.max(neighbor - MAX_SLOPE);
                    high = high.min(neighbor + MAX_SLOPE);
                }

                // The west and north columns are both within MAX_SLOPE of the
                // north-west column, so the window is never empty.
                let height = if low <= high { raw.clamp(low, high) } else { raw };
                heights.push(height);
            }
        }

        heights
    }

    /// Generates the block grid of one chunk.
    ///
    /// Generation only reads this chunk's own columns; it never queries neighbors.
    pub fn generate_chunk(&self, coordinate: ChunkCoordinate, settings: &TerrainSettings) -> BlockGrid {
        let heights = self.chunk_heights(coordinate, settings);
        let mut cci = ChunkCreationIterator::new(coordinate);

        for height in heights {
            cci.push_column(&column_profile(height));
        }

        log::trace!("Generated terrain for chunk {coordinate}");
        cci.return_chunk()
    }
}

/// Builds the block column for a surface height.
///
/// Cells `y < height` are solid: grass on top, [`DIRT_DEPTH`] layers of dirt below it
/// and stone underneath. Cells from `height` up to [`WATER_LEVEL`] are water, the rest air.
pub fn column_profile(height: i32) -> [BlockType; CHUNK_HEIGHT as usize] {
    let mut column = [BlockType::AIR; CHUNK_HEIGHT as usize];
    let height = height.clamp(0, CHUNK_HEIGHT);

    for (y, cell) in column.iter_mut().enumerate() {
        let y = y as i32;
        *cell = if y >= height {
            if y < WATER_LEVEL {
                BlockType::WATER
            } else {
                BlockType::AIR
            }
        } else if y == height - 1 {
            BlockType::GRASS
        } else if y >= height - 1 - DIRT_DEPTH {
            BlockType::DIRT
        } else {
            BlockType::STONE
        };
    }

    column
}
