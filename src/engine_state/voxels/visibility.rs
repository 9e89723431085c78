//! # Visibility Module
//!
//! The set of chunk coordinates in range of the viewer, recomputed wholesale on
//! every update.

use std::collections::BTreeSet;

use super::chunk::ChunkCoordinate;

/// Largest supported view distance. Larger values are clamped to it.
pub const MAX_VIEW_DISTANCE: u32 = 256;

/// The square of chunks within `view_distance` of a center chunk.
///
/// # Examples
///
/// ```
/// use voxel_stream::{ChunkCoordinate, VisibilitySet};
///
/// let visible = VisibilitySet::around(ChunkCoordinate::new(0, 0), 2);
/// assert_eq!(visible.len(), 25);
/// assert!(visible.contains(ChunkCoordinate::new(-2, 2)));
/// assert!(!visible.contains(ChunkCoordinate::new(3, 0)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilitySet {
    center: ChunkCoordinate,
    view_distance: u32,
    coordinates: BTreeSet<ChunkCoordinate>,
}

impl VisibilitySet {
    /// Builds the `(2V + 1)²` coordinates centered on `center`.
    ///
    /// `view_distance` is clamped to [`MAX_VIEW_DISTANCE`]. Near the edge of the
    /// addressable world the square is cut off instead of wrapping.
    pub fn around(center: ChunkCoordinate, view_distance: u32) -> Self {
        let view_distance = view_distance.min(MAX_VIEW_DISTANCE);
        let radius = view_distance as i32;
        let coordinates = (-radius..=radius)
            .flat_map(|dx| (-radius..=radius).filter_map(move |dz| center.checked_offset(dx, dz)))
            .collect();

        VisibilitySet {
            center,
            view_distance,
            coordinates,
        }
    }

    /// Builds the set around the chunk containing the world-space viewer position.
    pub fn from_viewer(x: f32, z: f32, view_distance: u32) -> Self {
        Self::around(ChunkCoordinate::from_world(x, z), view_distance)
    }

    pub fn center(&self) -> ChunkCoordinate {
        self.center
    }

    pub fn view_distance(&self) -> u32 {
        self.view_distance
    }

    pub fn contains(&self, coordinate: ChunkCoordinate) -> bool {
        self.coordinates.contains(&coordinate)
    }

    /// Returns `true` if `coordinate` is visible or shares a face or corner with a
    /// visible chunk.
    pub fn is_within_halo(&self, coordinate: ChunkCoordinate) -> bool {
        if self.coordinates.is_empty() {
            return false;
        }
        coordinate.chebyshev_distance(&self.center) <= u64::from(self.view_distance) + 1
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// Iterates in coordinate order.
    pub fn iter(&self) -> impl Iterator<Item = ChunkCoordinate> + '_ {
        self.coordinates.iter().copied()
    }

    /// Coordinates ordered by squared distance from the center, ties in coordinate order.
    pub fn nearest_first(&self) -> Vec<ChunkCoordinate> {
        let mut ordered: Vec<ChunkCoordinate> = self.iter().collect();
        // Stable sort keeps the coordinate order among equal distances.
        ordered.sort_by_key(|coordinate| coordinate.distance_squared(&self.center));
        ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::chunk::MAX_CHUNK;

    #[test]
    fn square_is_centered_on_the_viewer_chunk() {
        for view_distance in [0u32, 1, 3] {
            let visible = VisibilitySet::from_viewer(5.0, 12.0, view_distance);
            let side = 2 * view_distance as usize + 1;
            assert_eq!(visible.len(), side * side);
            assert_eq!(visible.center(), ChunkCoordinate::new(0, 0));

            let v = view_distance as i32;
            let min_x = visible.iter().map(|c| c.x).min().unwrap();
            let max_x = visible.iter().map(|c| c.x).max().unwrap();
            let min_z = visible.iter().map(|c| c.z).min().unwrap();
            let max_z = visible.iter().map(|c| c.z).max().unwrap();
            assert_eq!((min_x, max_x, min_z, max_z), (-v, v, -v, v));
        }
    }

    #[test]
    fn negative_viewer_positions_use_floor() {
        let visible = VisibilitySet::from_viewer(-0.5, -16.0, 0);
        assert_eq!(visible.center(), ChunkCoordinate::new(-1, -1));
    }

    #[test]
    fn nearest_first_starts_at_the_center() {
        let visible = VisibilitySet::around(ChunkCoordinate::new(10, -4), 2);
        let ordered = visible.nearest_first();
        assert_eq!(ordered.len(), 25);
        assert_eq!(ordered[0], ChunkCoordinate::new(10, -4));
        assert_eq!(
            &ordered[1..5],
            &[
                ChunkCoordinate::new(9, -4),
                ChunkCoordinate::new(10, -5),
                ChunkCoordinate::new(10, -3),
                ChunkCoordinate::new(11, -4),
            ]
        );
        let distances: Vec<u64> = ordered
            .iter()
            .map(|c| c.distance_squared(&visible.center()))
            .collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn halo_extends_one_chunk_past_the_square() {
        let visible = VisibilitySet::around(ChunkCoordinate::new(0, 0), 1);
        assert!(visible.is_within_halo(ChunkCoordinate::new(2, -2)));
        assert!(!visible.is_within_halo(ChunkCoordinate::new(3, 0)));
        assert!(!VisibilitySet::default().is_within_halo(ChunkCoordinate::new(0, 0)));
    }

    #[test]
    fn huge_view_distance_is_clamped() {
        let visible = VisibilitySet::around(ChunkCoordinate::new(0, 0), u32::MAX);
        let side = 2 * MAX_VIEW_DISTANCE as usize + 1;
        assert_eq!(visible.view_distance(), MAX_VIEW_DISTANCE);
        assert_eq!(visible.len(), side * side);
        assert!(visible.is_within_halo(ChunkCoordinate::new(MAX_VIEW_DISTANCE as i32 + 1, 0)));
        assert!(!visible.is_within_halo(ChunkCoordinate::new(i32::MIN, i32::MAX)));
    }

    #[test]
    fn square_is_cut_off_at_the_world_edge() {
        let visible = VisibilitySet::from_viewer(1.0e11, 0.0, 1);
        assert_eq!(visible.center(), ChunkCoordinate::new(MAX_CHUNK, 0));
        assert_eq!(visible.len(), 2 * 3);
        assert!(visible.iter().all(|c| c.x <= MAX_CHUNK));
    }
}
