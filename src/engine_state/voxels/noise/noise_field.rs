//! Improved Perlin noise with a constant permutation table and reseedable X/Z offsets.

use ::noise::NoiseFn;

/// Reference permutation of `0..256`.
const PERMUTATION: [u8; 256] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225, 140, 36, 103, 30, 69,
    142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148, 247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219,
    203, 117, 35, 11, 32, 57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175,
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122, 60, 211, 133, 230,
    220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54, 65, 25, 63, 161, 1, 216, 80, 73, 209, 76,
    132, 187, 208, 89, 18, 169, 200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198, 173,
    186, 3, 64, 52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212, 207, 206,
    59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213, 119, 248, 152, 2, 44, 154, 163,
    70, 221, 153, 101, 155, 167, 43, 172, 9, 129, 22, 39, 253, 19, 98, 108, 110, 79, 113, 224, 232,
    178, 185, 112, 104, 218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12, 191, 179, 162,
    241, 81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157, 184, 84, 204,
    176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93, 222, 114, 67, 29, 24, 72, 243, 141,
    128, 195, 78, 66, 215, 61, 156, 180,
];

/// Builds the lookup table: the permutation repeated twice so `p[p[x] + y]` never wraps.
const fn doubled_permutation() -> [u8; 512] {
    let mut table = [0u8; 512];
    let mut i = 0;
    while i < 512 {
        table[i] = PERMUTATION[i & 255];
        i += 1;
    }
    table
}

const LOOKUP: [u8; 512] = doubled_permutation();

/// Reseeding draws each offset uniformly from `[-RESEED_OFFSET_RANGE, RESEED_OFFSET_RANGE)`.
pub const RESEED_OFFSET_RANGE: f64 = 10_000.0;

/// Continuous scalar field in `[-1, 1]`.
///
/// # Examples
///
/// ```
/// use voxel_stream::NoiseField;
///
/// let field = NoiseField::with_offsets(0.0, 0.0);
/// let value = field.octave_sample(12.3, 0.0, 45.6, 4, 0.5);
/// assert!((-1.0..=1.0).contains(&value));
/// ```
#[derive(Debug, Clone)]
pub struct NoiseField {
    permutation: [u8; 512],
    offset_x: f64,
    offset_z: f64,
}

impl Default for NoiseField {
    fn default() -> Self {
        Self::with_offsets(0.0, 0.0)
    }
}

impl NoiseField {
    /// Creates a field with random offsets.
    pub fn new() -> Self {
        let mut field = Self::default();
        field.reseed();
        field
    }

    /// Creates a field with fixed offsets. Used for reproducible worlds and tests.
    pub fn with_offsets(offset_x: f64, offset_z: f64) -> Self {
        NoiseField {
            permutation: LOOKUP,
            offset_x,
            offset_z,
        }
    }

    /// Draws new X/Z offsets from the thread-local generator.
    ///
    /// Every sample taken afterwards differs from before, so any terrain generated
    /// from this field must be discarded by the owner.
    pub fn reseed(&mut self) {
        self.reseed_with(&mut fastrand::Rng::new());
    }

    /// Draws new X/Z offsets from `rng`.
    pub fn reseed_with(&mut self, rng: &mut fastrand::Rng) {
        self.offset_x = (rng.f64() * 2.0 - 1.0) * RESEED_OFFSET_RANGE;
        self.offset_z = (rng.f64() * 2.0 - 1.0) * RESEED_OFFSET_RANGE;
    }

    pub fn set_offsets(&mut self, offset_x: f64, offset_z: f64) {
        self.offset_x = offset_x;
        self.offset_z = offset_z;
    }

    pub fn offsets(&self) -> (f64, f64) {
        (self.offset_x, self.offset_z)
    }

    /// Single-octave gradient noise at `(x, y, z)`.
    pub fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        let x = x + self.offset_x;
        let z = z + self.offset_z;

        let xf = x.floor();
        let yf = y.floor();
        let zf = z.floor();

        // Lattice cell, wrapped into the permutation period.
        let xi = (xf as i64 & 255) as usize;
        let yi = (yf as i64 & 255) as usize;
        let zi = (zf as i64 & 255) as usize;

        let xr = x - xf;
        let yr = y - yf;
        let zr = z - zf;

        let u = fade(xr);
        let v = fade(yr);
        let w = fade(zr);

        let p = &self.permutation;
        let a = p[xi] as usize + yi;
        let aa = p[a] as usize + zi;
        let ab = p[a + 1] as usize + zi;
        let b = p[xi + 1] as usize + yi;
        let ba = p[b] as usize + zi;
        let bb = p[b + 1] as usize + zi;

        let value = lerp(
            w,
            lerp(
                v,
                lerp(u, grad(p[aa], xr, yr, zr), grad(p[ba], xr - 1.0, yr, zr)),
                lerp(
                    u,
                    grad(p[ab], xr, yr - 1.0, zr),
                    grad(p[bb], xr - 1.0, yr - 1.0, zr),
                ),
            ),
            lerp(
                v,
                lerp(
                    u,
                    grad(p[aa + 1], xr, yr, zr - 1.0),
                    grad(p[ba + 1], xr - 1.0, yr, zr - 1.0),
                ),
                lerp(
                    u,
                    grad(p[ab + 1], xr, yr - 1.0, zr - 1.0),
                    grad(p[bb + 1], xr - 1.0, yr - 1.0, zr - 1.0),
                ),
            ),
        );

        value.clamp(-1.0, 1.0)
    }

    /// Sums `octave_count` octaves of [`sample`](Self::sample).
    ///
    /// Each octave doubles the frequency and scales the amplitude by `persistence`.
    /// The sum is divided by the total amplitude, so the result stays in `[-1, 1]`.
    /// Zero octaves yields `0.0`.
    pub fn octave_sample(
        &self,
        x: f64,
        y: f64,
        z: f64,
        octave_count: u32,
        persistence: f64,
    ) -> f64 {
        let mut total = 0.0;
        let mut amplitude_sum = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;

        for _ in 0..octave_count {
            total += self.sample(x * frequency, y * frequency, z * frequency) * amplitude;
            amplitude_sum += amplitude;
            amplitude *= persistence;
            frequency *= 2.0;
        }

        if amplitude_sum <= 0.0 {
            return 0.0;
        }
        (total / amplitude_sum).clamp(-1.0, 1.0)
    }
}

impl NoiseFn<f64, 3> for NoiseField {
    fn get(&self, point: [f64; 3]) -> f64 {
        self.sample(point[0], point[1], point[2])
    }
}

/// Quintic smoothing curve `6t⁵ − 15t⁴ + 10t³`.
#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

/// Dot product of the corner offset with one of 12 edge gradients picked by `hash`.
#[inline]
fn grad(hash: u8, x: f64, y: f64, z: f64) -> f64 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    let u = if h & 1 == 0 { u } else { -u };
    let v = if h & 2 == 0 { v } else { -v };
    u + v
}
