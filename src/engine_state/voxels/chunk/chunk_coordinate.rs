//! # Chunk Coordinate Module
//!
//! Chunk-grid addressing and the conversions between world space, block space
//! and chunk space.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::CHUNK_SIZE;

/// Smallest chunk coordinate whose blocks and face neighbors are addressable in `i32`.
pub const MIN_CHUNK: i32 = i32::MIN / CHUNK_SIZE + 1;
/// Largest chunk coordinate whose blocks and face neighbors are addressable in `i32`.
pub const MAX_CHUNK: i32 = i32::MAX / CHUNK_SIZE - 1;

/// Position of a chunk in chunk-grid units.
///
/// Chunk `(cx, cz)` covers world blocks `cx * CHUNK_SIZE .. (cx + 1) * CHUNK_SIZE`
/// on X and the same range on Z, for the full world height. Ordering is
/// lexicographic on `(x, z)` and is what gives the scheduler a stable walk order.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ChunkCoordinate {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoordinate {
    pub const fn new(x: i32, z: i32) -> Self {
        ChunkCoordinate { x, z }
    }

    /// The chunk containing the world-space point `(x, z)`.
    ///
    /// Uses floor division so negative positions land in negative chunks. Positions
    /// past the world's addressable range clamp to [`MIN_CHUNK`]/[`MAX_CHUNK`].
    pub fn from_world(x: f32, z: f32) -> Self {
        let to_chunk = |v: f32| ((v / CHUNK_SIZE as f32).floor() as i32).clamp(MIN_CHUNK, MAX_CHUNK);
        ChunkCoordinate {
            x: to_chunk(x),
            z: to_chunk(z),
        }
    }

    /// The chunk containing the world block column `(block_x, block_z)`.
    pub fn from_block(block_x: i32, block_z: i32) -> Self {
        ChunkCoordinate {
            x: block_x.div_euclid(CHUNK_SIZE),
            z: block_z.div_euclid(CHUNK_SIZE),
        }
    }

    /// Splits a world block column into its chunk and the local column inside it.
    pub fn split_block(block_x: i32, block_z: i32) -> (Self, i32, i32) {
        (
            Self::from_block(block_x, block_z),
            block_x.rem_euclid(CHUNK_SIZE),
            block_z.rem_euclid(CHUNK_SIZE),
        )
    }

    /// World block coordinates of this chunk's `(0, 0)` local column.
    ///
    /// Exact for chunks in `MIN_CHUNK..=MAX_CHUNK`; saturates outside it.
    pub fn block_origin(&self) -> (i32, i32) {
        (self.x.saturating_mul(CHUNK_SIZE), self.z.saturating_mul(CHUNK_SIZE))
    }

    /// Saturates at the `i32` limits.
    pub fn offset(&self, dx: i32, dz: i32) -> Self {
        ChunkCoordinate::new(self.x.saturating_add(dx), self.z.saturating_add(dz))
    }

    /// Like [`offset`](Self::offset), but `None` if the result leaves
    /// `MIN_CHUNK..=MAX_CHUNK`.
    pub fn checked_offset(&self, dx: i32, dz: i32) -> Option<Self> {
        let range = MIN_CHUNK..=MAX_CHUNK;
        let x = self.x.checked_add(dx).filter(|x| range.contains(x))?;
        let z = self.z.checked_add(dz).filter(|z| range.contains(z))?;
        Some(ChunkCoordinate::new(x, z))
    }

    /// The four chunks sharing a vertical face with this one.
    pub fn face_neighbors(&self) -> [ChunkCoordinate; 4] {
        [
            self.offset(-1, 0),
            self.offset(1, 0),
            self.offset(0, -1),
            self.offset(0, 1),
        ]
    }

    pub fn chebyshev_distance(&self, other: &Self) -> u64 {
        let dx = (i64::from(self.x) - i64::from(other.x)).unsigned_abs();
        let dz = (i64::from(self.z) - i64::from(other.z)).unsigned_abs();
        dx.max(dz)
    }

    pub fn distance_squared(&self, other: &Self) -> u64 {
        let dx = (i64::from(self.x) - i64::from(other.x)).unsigned_abs();
        let dz = (i64::from(self.z) - i64::from(other.z)).unsigned_abs();
        (dx * dx).saturating_add(dz * dz)
    }
}

impl fmt::Display for ChunkCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_positions_floor_into_chunks() {
        assert_eq!(ChunkCoordinate::from_world(0.0, 0.0), ChunkCoordinate::new(0, 0));
        assert_eq!(
            ChunkCoordinate::from_world(CHUNK_SIZE as f32 - 0.01, 0.5),
            ChunkCoordinate::new(0, 0)
        );
        assert_eq!(
            ChunkCoordinate::from_world(CHUNK_SIZE as f32, -0.01),
            ChunkCoordinate::new(1, -1)
        );
        assert_eq!(
            ChunkCoordinate::from_world(-(CHUNK_SIZE as f32) - 1.0, 3.0 * CHUNK_SIZE as f32),
            ChunkCoordinate::new(-2, 3)
        );
    }

    #[test]
    fn far_positions_clamp_to_the_addressable_range() {
        assert_eq!(
            ChunkCoordinate::from_world(1.0e11, -1.0e11),
            ChunkCoordinate::new(MAX_CHUNK, MIN_CHUNK)
        );
        assert_eq!(
            ChunkCoordinate::from_world(f32::INFINITY, f32::NEG_INFINITY),
            ChunkCoordinate::new(MAX_CHUNK, MIN_CHUNK)
        );

        let (origin_x, origin_z) = ChunkCoordinate::new(MAX_CHUNK, MIN_CHUNK).block_origin();
        assert!(origin_x.checked_add(CHUNK_SIZE + 1).is_some());
        assert!(origin_z.checked_sub(CHUNK_SIZE).is_some());
    }

    #[test]
    fn offsets_never_overflow() {
        let edge = ChunkCoordinate::new(i32::MAX, i32::MIN);
        assert_eq!(edge.offset(1, -1), edge);
        assert_eq!(edge.checked_offset(0, 0), None);

        let last = ChunkCoordinate::new(MAX_CHUNK, 0);
        assert_eq!(last.checked_offset(1, 0), None);
        assert_eq!(last.checked_offset(-1, 3), Some(ChunkCoordinate::new(MAX_CHUNK - 1, 3)));

        assert_eq!(edge.chebyshev_distance(&ChunkCoordinate::new(i32::MIN, 0)), u32::MAX as u64);
    }

    #[test]
    fn negative_blocks_split_into_positive_locals() {
        let (coordinate, lx, lz) = ChunkCoordinate::split_block(-1, CHUNK_SIZE + 2);
        assert_eq!(coordinate, ChunkCoordinate::new(-1, 1));
        assert_eq!((lx, lz), (CHUNK_SIZE - 1, 2));

        let (ox, oz) = coordinate.block_origin();
        assert_eq!((ox + lx, oz + lz), (-1, CHUNK_SIZE + 2));
    }

    #[test]
    fn ordering_is_lexicographic() {
        let mut coords = vec![
            ChunkCoordinate::new(1, -1),
            ChunkCoordinate::new(0, 5),
            ChunkCoordinate::new(0, -5),
        ];
        coords.sort();
        assert_eq!(
            coords,
            vec![
                ChunkCoordinate::new(0, -5),
                ChunkCoordinate::new(0, 5),
                ChunkCoordinate::new(1, -1),
            ]
        );
    }
}
