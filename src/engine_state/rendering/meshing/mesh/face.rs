use cgmath::Point3;

use crate::engine_state::{
    rendering::Vertex,
    voxels::block::{BlockSide, BlockType},
};

/// Represents a single quad face of a voxel in the mesh.
///
/// A face is defined by four corner points named as seen from outside the block
/// (lower-left, lower-right, upper-right, upper-left), so `ll → lr → ur` winds
/// counter-clockwise around the outward normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// Lower-left corner in world block coordinates
    pub ll: Point3<i32>,
    /// Lower-right corner in world block coordinates
    pub lr: Point3<i32>,
    /// Upper-right corner in world block coordinates
    pub ur: Point3<i32>,
    /// Upper-left corner in world block coordinates
    pub ul: Point3<i32>,
    /// The block the face belongs to
    pub block_type: BlockType,
    /// Which side of the block this face represents
    pub block_side: BlockSide,
}

impl Face {
    /// Creates the face on `block_side` of the block whose minimum corner is `position`.
    ///
    /// # Arguments
    /// * `position` - World block coordinates of the block
    /// * `block_type` - The type of the block, used for its color
    /// * `block_side` - Which side of the block this face represents
    pub fn new(position: Point3<i32>, block_type: BlockType, block_side: BlockSide) -> Self {
        let (i, j, k) = (position.x, position.y, position.z);
        let [ll, lr, ul, ur] = match block_side {
            BlockSide::FRONT => [
                Point3::new(i, j, k + 1),
                Point3::new(i + 1, j, k + 1),
                Point3::new(i, j + 1, k + 1),
                Point3::new(i + 1, j + 1, k + 1),
            ],
            BlockSide::BACK => [
                Point3::new(i + 1, j, k),
                Point3::new(i, j, k),
                Point3::new(i + 1, j + 1, k),
                Point3::new(i, j + 1, k),
            ],
            BlockSide::BOTTOM => [
                Point3::new(i, j, k),
                Point3::new(i + 1, j, k),
                Point3::new(i, j, k + 1),
                Point3::new(i + 1, j, k + 1),
            ],
            BlockSide::TOP => [
                Point3::new(i, j + 1, k + 1),
                Point3::new(i + 1, j + 1, k + 1),
                Point3::new(i, j + 1, k),
                Point3::new(i + 1, j + 1, k),
            ],
            BlockSide::LEFT => [
                Point3::new(i, j, k),
                Point3::new(i, j, k + 1),
                Point3::new(i, j + 1, k),
                Point3::new(i, j + 1, k + 1),
            ],
            BlockSide::RIGHT => [
                Point3::new(i + 1, j, k + 1),
                Point3::new(i + 1, j, k),
                Point3::new(i + 1, j + 1, k + 1),
                Point3::new(i + 1, j + 1, k),
            ],
        };

        Face {
            ll,
            lr,
            ur,
            ul,
            block_type,
            block_side,
        }
    }

    /// Appends the face as two triangles (`ll, lr, ur` and `ll, ur, ul`).
    pub fn push_vertices(&self, vertices: &mut Vec<Vertex>) {
        let color = self.block_type.color();
        let normal = self.block_side.normal();
        vertices.extend(
            [self.ll, self.lr, self.ur, self.ll, self.ur, self.ul]
                .into_iter()
                .map(|corner| Vertex::new(corner, color, normal)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;

    #[test]
    fn corners_wind_counter_clockwise_around_the_normal() {
        for side in BlockSide::all() {
            let face = Face::new(Point3::new(3, 4, -5), BlockType::STONE, side);
            let right: Vector3<i32> = face.lr - face.ll;
            let up: Vector3<i32> = face.ul - face.ll;
            assert_eq!(right.cross(up), side.offset(), "{side:?}");
            assert_eq!(face.ur - face.ll, right + up);
        }
    }

    #[test]
    fn faces_lie_on_the_block_boundary() {
        let position = Point3::new(0, 0, 0);
        for side in BlockSide::all() {
            let face = Face::new(position, BlockType::DIRT, side);
            let offset = side.offset();
            for corner in [face.ll, face.lr, face.ur, face.ul] {
                // Along the normal axis every corner sits on the outer plane.
                let along = corner.x * offset.x + corner.y * offset.y + corner.z * offset.z;
                let expected = if offset.x + offset.y + offset.z > 0 { 1 } else { 0 };
                assert_eq!(along.abs(), expected, "{side:?}");
            }
        }
    }

    #[test]
    fn two_triangles_per_face() {
        let mut vertices = Vec::new();
        Face::new(Point3::new(1, 2, 3), BlockType::WATER, BlockSide::TOP).push_vertices(&mut vertices);
        assert_eq!(vertices.len(), 6);
        assert!(vertices.iter().all(|v| v.normal == [0.0, 1.0, 0.0]));
        assert!(vertices.iter().all(|v| v.position[1] == 3.0));
        assert!(vertices.iter().all(|v| v.color == BlockType::WATER.color()));
    }
}
