//! Vertex data structures for voxel rendering.
//!
//! This module defines the vertex format produced by the mesher and consumed,
//! through the combined mesh, by the external renderer.

use cgmath::Point3;

use crate::engine_state::voxels::block::block_side::BlockSide;

/// A vertex in the voxel rendering pipeline.
///
/// Positions are world block coordinates, so per-chunk meshes can be
/// concatenated into one buffer without any per-chunk transform.
///
/// # Memory Layout
/// - Position: [f32; 3] (12 bytes)
/// - Face: u32 (4 bytes)
/// - Texture Index: u32 (4 bytes)
/// - Size: [f32; 2] (8 bytes), quad width and height for texture tiling
/// - Light: u32 (4 bytes), see [`Vertex::pack_light`]
///
/// Total size: 32 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in world block coordinates
    pub position: [f32; 3],
    /// Face id, `BlockSide as u32`
    pub face: u32,
    /// Index of the texture in the texture array
    pub texture_index: u32,
    /// Width and height of the quad in blocks; the texture repeats this often
    pub size: [f32; 2],
    /// Packed light data
    pub light: u32,
}

impl Vertex {
    /// Creates a new vertex.
    pub fn new(
        position: Point3<f32>,
        side: BlockSide,
        texture_index: u8,
        width: f32,
        height: f32,
        light_level: u8,
    ) -> Self {
        Vertex {
            position: [position.x, position.y, position.z],
            face: side as u32,
            texture_index: texture_index as u32,
            size: [width, height],
            light: Self::pack_light(light_level, side),
        }
    }

    /// Packs the light level of the cell a face looks into (low 4 bits) with
    /// the face id (bits 8..11) for directional shading.
    pub fn pack_light(light_level: u8, side: BlockSide) -> u32 {
        (light_level as u32 & 0xF) | ((side as u32) << 8)
    }

    /// Light level stored in [`Vertex::light`].
    pub fn light_level(&self) -> u8 {
        (self.light & 0xF) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout() {
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
    }

    #[test]
    fn test_light_packing() {
        let vertex = Vertex::new(Point3::new(1.0, 2.0, 3.0), BlockSide::TOP, 5, 4.0, 2.0, 12);
        assert_eq!(vertex.light_level(), 12);
        assert_eq!(vertex.light >> 8, BlockSide::TOP as u32);
        assert_eq!(vertex.face, 5);
        assert_eq!(vertex.size, [4.0, 2.0]);
    }
}
