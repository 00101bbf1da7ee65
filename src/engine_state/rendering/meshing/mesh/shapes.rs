//! Fixed geometry for block shapes that do not take part in greedy merging.
//!
//! A cross is two double-sided diagonal planes through the cell. Plane A (from the
//! cell's -X/-Z corner to its +X/+Z corner) goes into the FRONT and BACK buckets,
//! plane B into the LEFT and RIGHT buckets. A slab is the lower half of the cell.
//! Corner positions are clipped to the chunk bounds.

use cgmath::Point3;

use crate::engine_state::rendering::Vertex;
use crate::engine_state::voxels::{
    block::{block_side::BlockSide, block_type::BlockTypeTable, Block},
    chunk::{Chunk, CHUNK_DIMENSION},
};

use super::{
    face::Face,
    greedy::{facing_light, is_face_visible, NeighborLookup},
    mesh::ChunkMeshes,
};

const SLAB_HEIGHT: f32 = 0.5;

fn clip(corner: Point3<f32>) -> Point3<f32> {
    let limit = CHUNK_DIMENSION as f32;
    Point3::new(
        corner.x.clamp(0.0, limit),
        corner.y.clamp(0.0, limit),
        corner.z.clamp(0.0, limit),
    )
}

/// Size of the quad along each of the side's sweep axes, used for texture tiling.
fn extent(corners: &[Point3<f32>; 4], side: BlockSide) -> (f32, f32) {
    let (u_axis, v_axis) = side.sweep_axes();
    let span = |axis: usize| {
        let (min, max) = corners.iter().fold((f32::MAX, f32::MIN), |(min, max), corner| {
            (min.min(corner[axis]), max.max(corner[axis]))
        });
        max - min
    };
    (span(u_axis), span(v_axis))
}

fn push_corners(
    out: &mut ChunkMeshes,
    translucent: bool,
    origin: Point3<i32>,
    corners: [Point3<f32>; 4],
    side: BlockSide,
    size: (f32, f32),
    texture_index: u8,
    light_level: u8,
) {
    let offset = [origin.x as f32, origin.y as f32, origin.z as f32];
    let vertices = corners.map(|corner| {
        let corner = clip(corner);
        Vertex::new(
            Point3::new(corner.x + offset[0], corner.y + offset[1], corner.z + offset[2]),
            side,
            texture_index,
            size.0,
            size.1,
            light_level,
        )
    });
    out.bucket_mut(translucent).side_mut(side).push_quad(vertices);
}

/// Emits the two double-sided planes of a cross-shaped block at `(x, y, z)`.
pub fn emit_cross(
    table: &BlockTypeTable,
    origin: Point3<i32>,
    x: usize,
    y: usize,
    z: usize,
    block: Block,
    out: &mut ChunkMeshes,
) {
    let entry = table.entry(block.id);
    let (x0, y0, z0) = (x as f32, y as f32, z as f32);
    let (x1, y1, z1) = (x0 + 1.0, y0 + 1.0, z0 + 1.0);

    // Counter-clockwise seen from -X/+Z.
    let plane_a = [
        Point3::new(x0, y0, z0),
        Point3::new(x1, y0, z1),
        Point3::new(x1, y1, z1),
        Point3::new(x0, y1, z0),
    ];
    // Counter-clockwise seen from -X/-Z.
    let plane_b = [
        Point3::new(x1, y0, z0),
        Point3::new(x0, y0, z1),
        Point3::new(x0, y1, z1),
        Point3::new(x1, y1, z0),
    ];

    let reversed = |corners: [Point3<f32>; 4]| [corners[0], corners[3], corners[2], corners[1]];

    for (corners, side) in [
        (plane_a, BlockSide::FRONT),
        (reversed(plane_a), BlockSide::BACK),
        (plane_b, BlockSide::LEFT),
        (reversed(plane_b), BlockSide::RIGHT),
    ] {
        push_corners(
            out,
            entry.translucent,
            origin,
            corners,
            side,
            (1.0, 1.0),
            entry.face_texture[side as usize],
            block.light_level,
        );
    }
}

/// Emits a half-height box for the slab at `(x, y, z)`.
///
/// The top face always shows. The other five are culled like regular faces.
pub fn emit_slab(
    chunk: &Chunk,
    neighbors: &impl NeighborLookup,
    table: &BlockTypeTable,
    x: usize,
    y: usize,
    z: usize,
    out: &mut ChunkMeshes,
) {
    let block = chunk.block(x, y, z);
    let entry = table.entry(block.id);
    let origin = chunk.world_block_origin();
    let floor = y as f32;

    for side in BlockSide::all() {
        let light_level = if side == BlockSide::TOP {
            block.light_level
        } else {
            if !is_face_visible(chunk, neighbors, table, x, y, z, side) {
                continue;
            }
            facing_light(chunk, neighbors, x, y, z, side)
        };

        let corners = Face::unit(side, x, y, z, block.id)
            .corners()
            .map(|corner| Point3::new(corner.x, floor + (corner.y - floor) * SLAB_HEIGHT, corner.z));

        push_corners(
            out,
            entry.translucent,
            origin,
            corners,
            side,
            extent(&corners, side),
            entry.face_texture[side as usize],
            light_level,
        );
    }
}
