//! Greedy meshing implementation for voxel rendering.
//!
//! This module implements the greedy meshing algorithm which combines adjacent coplanar
//! faces of the same block type into larger quads, significantly reducing the number of
//! vertices the renderer has to process.
//!
//! For each face direction the chunk is cut into 16 slices along that direction's
//! normal. Every slice is swept with a 16x16 "consumed" mask: an unconsumed visible
//! cell first grows along the slice's U axis, then the whole row grows along V for as
//! long as *every* cell of the next row matches. Rows never extend partially, so
//! irregular terrain can produce more quads than an optimal cover would.

use std::cell::RefCell;

use bitvec::prelude::*;
use log::error;

use crate::engine_state::voxels::{
    block::{
        block_side::BlockSide,
        block_type::{BlockShape, BlockTypeTable},
        Block, BlockTypeSize, MAX_LIGHT_LEVEL,
    },
    chunk::{Chunk, CHUNK_DIMENSION, CHUNK_DIMENSION_I32, CHUNK_PLANE_SIZE},
};

use super::{face::Face, mesh::ChunkMeshes, shapes};

/// Resolves the chunks bordering the one being meshed.
///
/// `None` means the neighbor position lies outside the loaded grid, in which case
/// faces on that border are always treated as exposed.
pub trait NeighborLookup {
    fn neighbor(&self, side: BlockSide) -> Option<&Chunk>;
}

/// A lookup with no neighbors at all, for meshing a chunk in isolation.
#[derive(Debug, Default, Clone, Copy)]
pub struct Isolated;

impl NeighborLookup for Isolated {
    fn neighbor(&self, _side: BlockSide) -> Option<&Chunk> {
        None
    }
}

/// The six chunks around a grid slot, in `BlockSide` order.
#[derive(Default, Clone, Copy)]
pub struct ChunkNeighbors<'a> {
    chunks: [Option<&'a Chunk>; 6],
}

impl<'a> ChunkNeighbors<'a> {
    pub fn new(chunks: [Option<&'a Chunk>; 6]) -> Self {
        Self { chunks }
    }

    pub fn set(&mut self, side: BlockSide, chunk: Option<&'a Chunk>) {
        self.chunks[side as usize] = chunk;
    }
}

impl NeighborLookup for ChunkNeighbors<'_> {
    fn neighbor(&self, side: BlockSide) -> Option<&Chunk> {
        self.chunks[side as usize]
    }
}

/// The block one step from `(x, y, z)` towards `side`, following the step into the
/// neighboring chunk when it crosses the border. `None` outside the loaded grid.
pub fn neighbor_block(
    chunk: &Chunk,
    neighbors: &impl NeighborLookup,
    x: usize,
    y: usize,
    z: usize,
    side: BlockSide,
) -> Option<Block> {
    let step = side.normal();
    let (nx, ny, nz) = (x as i32 + step.x, y as i32 + step.y, z as i32 + step.z);

    if Chunk::contains(nx, ny, nz) {
        return Some(chunk.block(nx as usize, ny as usize, nz as usize));
    }

    neighbors.neighbor(side).map(|other| {
        other.block(
            nx.rem_euclid(CHUNK_DIMENSION_I32) as usize,
            ny.rem_euclid(CHUNK_DIMENSION_I32) as usize,
            nz.rem_euclid(CHUNK_DIMENSION_I32) as usize,
        )
    })
}

/// Decides whether the face of the block at `(x, y, z)` towards `side` is exposed.
///
/// * Neighbor outside the loaded grid or air: visible.
/// * Both blocks opaque: hidden.
/// * Both translucent: visible only if the ids differ, so glass against glass
///   culls while water against lava shows.
/// * Exactly one translucent: the translucent block's face is hidden and the
///   opaque block's face is shown.
pub fn is_face_visible(
    chunk: &Chunk,
    neighbors: &impl NeighborLookup,
    table: &BlockTypeTable,
    x: usize,
    y: usize,
    z: usize,
    side: BlockSide,
) -> bool {
    let Some(neighbor) = neighbor_block(chunk, neighbors, x, y, z, side) else {
        return true;
    };
    if neighbor.is_air() {
        return true;
    }

    let current = chunk.block_id(x, y, z);
    let current_translucent = table.is_translucent(current);
    let neighbor_translucent = table.is_translucent(neighbor.id);

    match (current_translucent, neighbor_translucent) {
        (false, false) => false,
        (true, true) => current != neighbor.id,
        // Mixed pair: visible iff the current block is opaque (`!current_translucent`).
        // Inverting this hides the terrain behind glass and water.
        _ => !current_translucent,
    }
}

/// Light level of the cell a face looks into. Open grid borders count as sky.
pub(crate) fn facing_light(
    chunk: &Chunk,
    neighbors: &impl NeighborLookup,
    x: usize,
    y: usize,
    z: usize,
    side: BlockSide,
) -> u8 {
    neighbor_block(chunk, neighbors, x, y, z, side)
        .map(|block| block.light_level)
        .unwrap_or(MAX_LIGHT_LEVEL)
}

#[derive(Clone, Copy, PartialEq, Eq)]
struct MaskCell {
    block_id: BlockTypeSize,
    light_level: u8,
}

/// Reusable per-thread buffers for one slice sweep.
struct MeshScratch {
    consumed: BitArr!(for CHUNK_PLANE_SIZE, in u64, Lsb0),
    mask: [Option<MaskCell>; CHUNK_PLANE_SIZE],
    faces: Vec<Face>,
}

impl MeshScratch {
    fn new() -> Self {
        Self {
            consumed: BitArray::ZERO,
            mask: [None; CHUNK_PLANE_SIZE],
            faces: Vec::with_capacity(CHUNK_PLANE_SIZE),
        }
    }
}

thread_local! {
    static SCRATCH: RefCell<MeshScratch> = RefCell::new(MeshScratch::new());
}

#[inline]
fn plane_index(u: usize, v: usize) -> usize {
    v * CHUNK_DIMENSION + u
}

/// Fills `scratch.mask` with the visible, greedily mergeable faces of one slice.
fn build_slice_mask(
    chunk: &Chunk,
    neighbors: &impl NeighborLookup,
    table: &BlockTypeTable,
    side: BlockSide,
    depth: usize,
    scratch: &mut MeshScratch,
) {
    let normal_axis = side.normal_axis();
    let (u_axis, v_axis) = side.sweep_axes();

    for v in 0..CHUNK_DIMENSION {
        for u in 0..CHUNK_DIMENSION {
            let mut cell = [0usize; 3];
            cell[normal_axis] = depth;
            cell[u_axis] = u;
            cell[v_axis] = v;
            let [x, y, z] = cell;

            let block = chunk.block(x, y, z);
            let mergeable = !block.is_air()
                && table.shape(block.id).is_greedy()
                && is_face_visible(chunk, neighbors, table, x, y, z, side);

            scratch.mask[plane_index(u, v)] = mergeable.then(|| MaskCell {
                block_id: block.id,
                light_level: facing_light(chunk, neighbors, x, y, z, side),
            });
        }
    }
}

/// Sweeps the slice mask and appends merged rectangles to `scratch.faces`.
fn merge_slice(side: BlockSide, depth: usize, scratch: &mut MeshScratch) {
    scratch.consumed.fill(false);

    for v in 0..CHUNK_DIMENSION {
        for u in 0..CHUNK_DIMENSION {
            let start = plane_index(u, v);
            if scratch.consumed[start] {
                continue;
            }
            let Some(cell) = scratch.mask[start] else {
                continue;
            };
            let matches = |scratch: &MeshScratch, index: usize| {
                !scratch.consumed[index]
                    && scratch.mask[index].map(|other| other.block_id) == Some(cell.block_id)
            };

            let mut width = 1;
            while u + width < CHUNK_DIMENSION && matches(scratch, plane_index(u + width, v)) {
                width += 1;
            }

            let mut height = 1;
            'rows: while v + height < CHUNK_DIMENSION {
                for du in 0..width {
                    if !matches(scratch, plane_index(u + du, v + height)) {
                        break 'rows;
                    }
                }
                height += 1;
            }

            for dv in 0..height {
                for du in 0..width {
                    scratch.consumed.set(plane_index(u + du, v + dv), true);
                }
            }

            scratch.faces.push(Face {
                side,
                depth,
                u,
                v,
                width,
                height,
                block_id: cell.block_id,
                light_level: cell.light_level,
            });
        }
    }
}

/// Meshes `chunk` into `out`, replacing whatever `out` held.
///
/// Greedy shapes are merged per slice; cross and slab blocks emit their fixed
/// geometry per cell. Each quad lands in the bucket of its face direction, in the
/// opaque or the transparent set depending on the block's translucency.
pub fn mesh_into(
    chunk: &Chunk,
    neighbors: &impl NeighborLookup,
    table: &BlockTypeTable,
    out: &mut ChunkMeshes,
) {
    out.clear();
    let origin = chunk.world_block_origin();

    SCRATCH.with(|scratch| {
        let Ok(mut scratch) = scratch.try_borrow_mut() else {
            error!("Mesh scratch space is already in use on this thread; skipping chunk");
            return;
        };
        scratch.faces.clear();

        for side in BlockSide::all() {
            for depth in 0..CHUNK_DIMENSION {
                build_slice_mask(chunk, neighbors, table, side, depth, &mut scratch);
                merge_slice(side, depth, &mut scratch);
            }
        }

        for face in scratch.faces.drain(..) {
            let entry = table.entry(face.block_id);
            let vertices = face.generate_face_vertices(origin, entry.face_texture[face.side as usize]);
            out.bucket_mut(entry.translucent)
                .side_mut(face.side)
                .push_quad(vertices);
        }
    });

    for x in 0..CHUNK_DIMENSION {
        for y in 0..CHUNK_DIMENSION {
            for z in 0..CHUNK_DIMENSION {
                let block = chunk.block(x, y, z);
                match table.shape(block.id) {
                    BlockShape::Cross if !block.is_air() => {
                        shapes::emit_cross(table, origin, x, y, z, block, out)
                    }
                    BlockShape::Slab if !block.is_air() => {
                        shapes::emit_slab(chunk, neighbors, table, x, y, z, out)
                    }
                    _ => {}
                }
            }
        }
    }
}

/// Meshes a chunk into freshly allocated buckets.
pub fn mesh(chunk: &Chunk, neighbors: &impl NeighborLookup, table: &BlockTypeTable) -> ChunkMeshes {
    let mut meshes = ChunkMeshes::new();
    mesh_into(chunk, neighbors, table, &mut meshes);
    meshes
}
