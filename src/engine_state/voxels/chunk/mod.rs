//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a 16x16x16 block grid together with
//! the mesh buckets derived from it and the flags the streaming and meshing
//! passes coordinate through.
//!
//! ## Storage
//!
//! Blocks are stored densely in `[x][y][z]` row-major order, so the block at
//! `(x, y, z)` lives at `x * 256 + y * 16 + z`. This is also the order of the
//! chunk file format (see [`persistence`]).
//!
//! ## Lifecycle
//!
//! A chunk value lives in a fixed grid slot for the whole run of the program.
//! Streaming claims it (`load`), the terrain generator or a chunk file fills it,
//! the mesher keeps its buckets current, and eviction (`evict`) hands the block
//! data back and clears the slot.

use cgmath::Point3;

use super::block::{Block, BlockTypeSize};
use crate::engine_state::rendering::meshing::ChunkMeshes;

pub mod persistence;

/// The dimension (width, height, depth) of a chunk in blocks.
pub const CHUNK_DIMENSION: usize = 16;
/// [`CHUNK_DIMENSION`] as a signed value, for world coordinate math.
pub const CHUNK_DIMENSION_I32: i32 = CHUNK_DIMENSION as i32;
/// The number of blocks in a single 2D plane of a chunk (CHUNK_DIMENSION²).
pub const CHUNK_PLANE_SIZE: usize = CHUNK_DIMENSION * CHUNK_DIMENSION;
/// The total number of blocks in a chunk (CHUNK_DIMENSION³).
pub const CHUNK_SIZE: usize = CHUNK_PLANE_SIZE * CHUNK_DIMENSION;

/// Where a grid slot is in its lifecycle.
///
/// Loading and evicting happen entirely inside one streaming pass while the grid
/// lock is held, so only these three states are ever observable.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChunkState {
    /// No chunk is loaded in this slot.
    Empty,
    /// Loaded, and the mesh buckets are stale.
    Dirty,
    /// Loaded, and the mesh buckets match the blocks.
    Meshed,
}

/// Represents a 16x16x16 collection of voxel blocks in the world.
///
/// When `needs_update` is false the opaque and transparent buckets reflect the
/// current block contents exactly.
pub struct Chunk {
    blocks: Box<[Block]>,
    /// Position in world-chunk coordinates (not block coordinates).
    pub world_position: Point3<i32>,
    /// The grid slot currently holding this chunk.
    pub render_position: Point3<usize>,
    pub is_loaded: bool,
    pub needs_update: bool,
    /// Set when blocks were edited after loading; such chunks are written back
    /// to disk on eviction.
    pub modified: bool,
    /// Per-face opaque and transparent mesh buckets.
    pub meshes: ChunkMeshes,
}

impl Chunk {
    /// Creates an empty, unloaded chunk for a grid slot. All blocks are air.
    pub fn new(render_position: Point3<usize>) -> Self {
        Chunk {
            blocks: empty_blocks(),
            world_position: Point3::new(0, 0, 0),
            render_position,
            is_loaded: false,
            needs_update: false,
            modified: false,
            meshes: ChunkMeshes::new(),
        }
    }

    /// Index of a chunk-local coordinate in the block array.
    #[inline]
    pub fn block_index(x: usize, y: usize, z: usize) -> usize {
        x * CHUNK_PLANE_SIZE + y * CHUNK_DIMENSION + z
    }

    /// Whether a signed chunk-local coordinate lies inside the chunk.
    #[inline]
    pub fn contains(x: i32, y: i32, z: i32) -> bool {
        (0..CHUNK_DIMENSION_I32).contains(&x)
            && (0..CHUNK_DIMENSION_I32).contains(&y)
            && (0..CHUNK_DIMENSION_I32).contains(&z)
    }

    /// Gets the block at the specified chunk-relative coordinates.
    ///
    /// # Panics
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn block(&self, x: usize, y: usize, z: usize) -> Block {
        self.blocks[Self::block_index(x, y, z)]
    }

    /// Shorthand for the id of [`Chunk::block`].
    #[inline]
    pub fn block_id(&self, x: usize, y: usize, z: usize) -> BlockTypeSize {
        self.block(x, y, z).id
    }

    /// Writes a block. The caller decides whether this dirties the mesh.
    #[inline]
    pub fn set_block(&mut self, x: usize, y: usize, z: usize, block: Block) {
        self.blocks[Self::block_index(x, y, z)] = block;
    }

    /// All blocks in `[x][y][z]` order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn blocks_mut(&mut self) -> &mut [Block] {
        &mut self.blocks
    }

    /// Fills every cell with the same block.
    pub fn fill(&mut self, block: Block) {
        self.blocks.fill(block);
    }

    /// Whether every block is air.
    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(Block::is_air)
    }

    /// Claims this chunk for a world position and installs its block data.
    ///
    /// The chunk becomes loaded and dirty. `blocks` must hold exactly
    /// [`CHUNK_SIZE`] blocks; shorter data leaves the remaining cells as air.
    pub fn load(&mut self, world_position: Point3<i32>, blocks: &[Block]) {
        let count = blocks.len().min(CHUNK_SIZE);
        self.blocks[..count].copy_from_slice(&blocks[..count]);
        self.blocks[count..].fill(Block::AIR);
        self.world_position = world_position;
        self.is_loaded = true;
        self.needs_update = true;
        self.modified = false;
        self.meshes.clear();
    }

    /// Releases the chunk: frees its mesh buffers, clears its flags and returns
    /// the block data it held.
    pub fn evict(&mut self) -> Box<[Block]> {
        let blocks = std::mem::replace(&mut self.blocks, empty_blocks());
        self.is_loaded = false;
        self.needs_update = false;
        self.modified = false;
        self.meshes.release();
        blocks
    }

    /// Current lifecycle state derived from the flags.
    pub fn state(&self) -> ChunkState {
        match (self.is_loaded, self.needs_update) {
            (false, _) => ChunkState::Empty,
            (true, true) => ChunkState::Dirty,
            (true, false) => ChunkState::Meshed,
        }
    }

    /// World block coordinate of this chunk's (0, 0, 0) cell.
    pub fn world_block_origin(&self) -> Point3<i32> {
        Point3::new(
            self.world_position.x.saturating_mul(CHUNK_DIMENSION_I32),
            self.world_position.y.saturating_mul(CHUNK_DIMENSION_I32),
            self.world_position.z.saturating_mul(CHUNK_DIMENSION_I32),
        )
    }
}

fn empty_blocks() -> Box<[Block]> {
    vec![Block::AIR; CHUNK_SIZE].into_boxed_slice()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::ids;

    #[test]
    fn test_block_index_is_x_major() {
        assert_eq!(Chunk::block_index(0, 0, 1), 1);
        assert_eq!(Chunk::block_index(0, 1, 0), CHUNK_DIMENSION);
        assert_eq!(Chunk::block_index(1, 0, 0), CHUNK_PLANE_SIZE);
        assert_eq!(Chunk::block_index(15, 15, 15), CHUNK_SIZE - 1);
    }

    #[test]
    fn test_load_and_evict_lifecycle() {
        let mut chunk = Chunk::new(Point3::new(1, 0, 2));
        assert_eq!(chunk.state(), ChunkState::Empty);
        assert!(chunk.is_empty());

        let blocks = vec![Block::new(ids::STONE); CHUNK_SIZE];
        chunk.load(Point3::new(5, 0, -3), &blocks);
        assert_eq!(chunk.state(), ChunkState::Dirty);
        assert_eq!(chunk.block_id(3, 4, 5), ids::STONE);
        assert_eq!(chunk.world_block_origin(), Point3::new(80, 0, -48));

        chunk.needs_update = false;
        assert_eq!(chunk.state(), ChunkState::Meshed);

        let returned = chunk.evict();
        assert_eq!(returned.len(), CHUNK_SIZE);
        assert!(returned.iter().all(|block| block.id == ids::STONE));
        assert_eq!(chunk.state(), ChunkState::Empty);
        assert!(chunk.is_empty());
        assert_eq!(chunk.render_position, Point3::new(1, 0, 2));
    }

    #[test]
    fn test_contains() {
        assert!(Chunk::contains(0, 15, 7));
        assert!(!Chunk::contains(-1, 0, 0));
        assert!(!Chunk::contains(0, 16, 0));
    }
}
