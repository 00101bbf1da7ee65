use cgmath::Point3;

use crate::engine_state::rendering::Vertex;
use crate::engine_state::voxels::block::{block_side::BlockSide, BlockTypeSize};

/// A merged rectangle of block faces produced by the greedy mesher.
///
/// The rectangle lies in the slice `depth` along the side's normal axis and
/// covers `width` cells along the sweep U axis and `height` cells along the
/// sweep V axis, starting at cell `(u, v)`. All values are chunk-local.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub side: BlockSide,
    pub depth: usize,
    pub u: usize,
    pub v: usize,
    pub width: usize,
    pub height: usize,
    /// The block type as an integer, used for texture mapping
    pub block_id: BlockTypeSize,
    /// Light level of the cell in front of the face origin
    pub light_level: u8,
}

impl Face {
    /// A single-cell face of the block at chunk-local `(x, y, z)`.
    pub fn unit(side: BlockSide, x: usize, y: usize, z: usize, block_id: BlockTypeSize) -> Self {
        let cell = [x, y, z];
        let (u_axis, v_axis) = side.sweep_axes();
        Face {
            side,
            depth: cell[side.normal_axis()],
            u: cell[u_axis],
            v: cell[v_axis],
            width: 1,
            height: 1,
            block_id,
            light_level: 0,
        }
    }

    /// Corner positions relative to the chunk origin, counter-clockwise when
    /// seen from the side the face points to.
    pub fn corners(&self) -> [Point3<f32>; 4] {
        let normal_axis = self.side.normal_axis();
        let (u_axis, v_axis) = self.side.sweep_axes();
        let plane = if self.side.is_positive() {
            self.depth + 1
        } else {
            self.depth
        } as f32;

        let (u0, v0) = (self.u as f32, self.v as f32);
        let (u1, v1) = ((self.u + self.width) as f32, (self.v + self.height) as f32);

        // U x V points along +normal, so this order is counter-clockwise for
        // positive faces and must be mirrored for negative ones.
        let uv = if self.side.is_positive() {
            [(u0, v0), (u1, v0), (u1, v1), (u0, v1)]
        } else {
            [(u0, v0), (u0, v1), (u1, v1), (u1, v0)]
        };

        uv.map(|(u, v)| {
            let mut point = [0.0f32; 3];
            point[normal_axis] = plane;
            point[u_axis] = u;
            point[v_axis] = v;
            Point3::new(point[0], point[1], point[2])
        })
    }

    /// Generates the four vertices of this face in world space.
    ///
    /// # Arguments
    /// * `chunk_origin` - World block coordinate of the chunk's (0, 0, 0) cell
    /// * `texture_index` - Texture of this face, from the block type table
    pub fn generate_face_vertices(&self, chunk_origin: Point3<i32>, texture_index: u8) -> [Vertex; 4] {
        let offset = chunk_origin.cast::<f32>().unwrap_or(Point3::new(0.0, 0.0, 0.0));
        self.corners().map(|corner| {
            Vertex::new(
                Point3::new(corner.x + offset.x, corner.y + offset.y, corner.z + offset.z),
                self.side,
                texture_index,
                self.width as f32,
                self.height as f32,
                self.light_level,
            )
        })
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }
}
