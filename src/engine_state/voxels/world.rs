//! # World Module
//!
//! This module provides the `ChunkGrid`: the fixed-size sliding window of chunks
//! that follows the viewer through the world.
//!
//! ## Architecture
//!
//! The grid is a single flat arena of `width * height * depth` chunks, indexed by
//! render-local slot coordinates `(x, y, z)` at `x * height * depth + y * depth + z`.
//! The arena never reallocates. When the viewer crosses a chunk border the window
//! origin moves and surviving chunks are relocated by swapping slot contents.
//!
//! Only the horizontal axes are windowed: a loaded chunk in slot `(x, y, z)` always
//! has world-chunk coordinates `(origin_cx + x, y, origin_cz + z)`.
//!
//! ## Dirty Propagation
//!
//! Any event that can change which faces of a chunk are exposed marks that chunk
//! `needs_update`: a neighbor being evicted, a neighbor being loaded, or a block
//! being edited on a shared border.

use cgmath::Point3;

use crate::core::{EngineError, Result};
use crate::engine_state::rendering::meshing::{mesh_into, ChunkNeighbors};
use crate::engine_state::voxels::{
    block::{block_side::BlockSide, block_type::BlockTypeTable, Block},
    chunk::{Chunk, CHUNK_DIMENSION_I32},
};

/// Largest world-chunk coordinate (in either direction) whose block
/// coordinates still fit in an `i32`. The window origin is clamped so every
/// slot stays inside this range.
pub const WORLD_CHUNK_LIMIT: i32 = i32::MAX / CHUNK_DIMENSION_I32 - 1;

/// Extents of the chunk grid, in chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDimensions {
    /// Slots along X.
    pub width: usize,
    /// Slots along Y; the world height.
    pub height: usize,
    /// Slots along Z.
    pub depth: usize,
}

impl GridDimensions {
    /// A square window `render_distance` chunks wide, `world_height` chunks tall.
    pub fn new(render_distance: usize, world_height: usize) -> Self {
        Self {
            width: render_distance,
            height: world_height,
            depth: render_distance,
        }
    }

    pub fn slot_count(&self) -> usize {
        self.width * self.height * self.depth
    }

    #[inline]
    pub fn contains(&self, x: i64, y: i64, z: i64) -> bool {
        (0..self.width as i64).contains(&x)
            && (0..self.height as i64).contains(&y)
            && (0..self.depth as i64).contains(&z)
    }

    /// Arena index of a slot. The slot must be in bounds.
    #[inline]
    pub fn slot_index(&self, x: usize, y: usize, z: usize) -> usize {
        x * self.height * self.depth + y * self.depth + z
    }

    /// Inverse of [`GridDimensions::slot_index`].
    pub fn slot_position(&self, index: usize) -> Point3<usize> {
        let plane = self.height * self.depth;
        Point3::new(index / plane, (index % plane) / self.depth, index % self.depth)
    }

    /// All slots in combine order: Y outermost, then X, then Z.
    pub fn combine_order(&self) -> impl Iterator<Item = Point3<usize>> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width).flat_map(move |x| (0..self.depth).map(move |z| Point3::new(x, y, z)))
        })
    }
}

/// A chunk removed from the grid by a window shift.
#[derive(Debug)]
pub struct EvictedChunk {
    pub world_position: Point3<i32>,
    pub blocks: Box<[Block]>,
    /// Whether the blocks were edited since the chunk was loaded.
    pub modified: bool,
}

/// Outcome of [`ChunkGrid::shift_window`].
#[derive(Debug, Default)]
pub struct ShiftReport {
    pub evicted: Vec<EvictedChunk>,
    /// Number of loaded chunks that moved to a new slot.
    pub shifted: usize,
}

/// The sliding window of loaded chunks.
pub struct ChunkGrid {
    dimensions: GridDimensions,
    chunks: Vec<Chunk>,
    origin_cx: i32,
    origin_cz: i32,
}

impl ChunkGrid {
    /// Creates a grid of empty slots with its origin at world chunk (0, 0).
    pub fn new(dimensions: GridDimensions) -> Self {
        let chunks = (0..dimensions.slot_count())
            .map(|index| Chunk::new(dimensions.slot_position(index)))
            .collect();

        Self {
            dimensions,
            chunks,
            origin_cx: 0,
            origin_cz: 0,
        }
    }

    pub fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// World-chunk coordinates of slot `(0, ·, 0)`.
    pub fn origin(&self) -> (i32, i32) {
        (self.origin_cx, self.origin_cz)
    }

    /// The window origin that centers the grid on a viewer at `position`
    /// (world block coordinates).
    pub fn window_origin_for(&self, position: Point3<f32>) -> (i32, i32) {
        let chunk_size = CHUNK_DIMENSION_I32 as f32;
        // Float to int casts saturate, so a far-out or NaN viewer still maps
        // to a finite chunk.
        let viewer_cx = (position.x / chunk_size).floor() as i32;
        let viewer_cz = (position.z / chunk_size).floor() as i32;
        (
            clamp_origin(viewer_cx.saturating_sub((self.dimensions.width / 2) as i32), self.dimensions.width),
            clamp_origin(viewer_cz.saturating_sub((self.dimensions.depth / 2) as i32), self.dimensions.depth),
        )
    }

    /// World-chunk coordinates a chunk in `slot` must have.
    pub fn expected_world_position(&self, slot: Point3<usize>) -> Point3<i32> {
        Point3::new(
            self.origin_cx.saturating_add(slot.x as i32),
            slot.y as i32,
            self.origin_cz.saturating_add(slot.z as i32),
        )
    }

    /// The slot that holds (or would hold) a world chunk, if it is inside the window.
    pub fn slot_for_world_chunk(&self, world_position: Point3<i32>) -> Option<Point3<usize>> {
        let x = world_position.x as i64 - self.origin_cx as i64;
        let y = world_position.y as i64;
        let z = world_position.z as i64 - self.origin_cz as i64;
        self.dimensions
            .contains(x, y, z)
            .then(|| Point3::new(x as usize, y as usize, z as usize))
    }

    pub fn chunk(&self, x: usize, y: usize, z: usize) -> Option<&Chunk> {
        self.dimensions
            .contains(x as i64, y as i64, z as i64)
            .then(|| &self.chunks[self.dimensions.slot_index(x, y, z)])
    }

    pub fn chunk_mut(&mut self, x: usize, y: usize, z: usize) -> Option<&mut Chunk> {
        if !self.dimensions.contains(x as i64, y as i64, z as i64) {
            return None;
        }
        let index = self.dimensions.slot_index(x, y, z);
        Some(&mut self.chunks[index])
    }

    /// All slots in arena order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn loaded_count(&self) -> usize {
        self.chunks.iter().filter(|chunk| chunk.is_loaded).count()
    }

    pub fn dirty_count(&self) -> usize {
        self.chunks
            .iter()
            .filter(|chunk| chunk.is_loaded && chunk.needs_update)
            .count()
    }

    fn neighbor_slot(&self, slot: Point3<usize>, side: BlockSide) -> Option<Point3<usize>> {
        let step = side.normal();
        let (x, y, z) = (
            slot.x as i64 + step.x as i64,
            slot.y as i64 + step.y as i64,
            slot.z as i64 + step.z as i64,
        );
        self.dimensions
            .contains(x, y, z)
            .then(|| Point3::new(x as usize, y as usize, z as usize))
    }

    /// The loaded chunks around a slot. Slots outside the grid or still empty
    /// are `None`.
    pub fn neighbors(&self, x: usize, y: usize, z: usize) -> ChunkNeighbors<'_> {
        let mut neighbors = ChunkNeighbors::default();
        for side in BlockSide::all() {
            let chunk = self
                .neighbor_slot(Point3::new(x, y, z), side)
                .map(|slot| &self.chunks[self.dimensions.slot_index(slot.x, slot.y, slot.z)])
                .filter(|chunk| chunk.is_loaded);
            neighbors.set(side, chunk);
        }
        neighbors
    }

    fn mark_neighbors_dirty(&mut self, slot: Point3<usize>, sides: &[BlockSide]) {
        for &side in sides {
            if let Some(neighbor) = self.neighbor_slot(slot, side) {
                let index = self.dimensions.slot_index(neighbor.x, neighbor.y, neighbor.z);
                let chunk = &mut self.chunks[index];
                if chunk.is_loaded {
                    chunk.needs_update = true;
                }
            }
        }
    }

    /// Regenerates the mesh buckets of one slot if it is loaded and dirty.
    ///
    /// Returns whether the slot was meshed. The caller must hold the grid
    /// exclusively for the whole call.
    pub fn remesh_slot(&mut self, x: usize, y: usize, z: usize, table: &BlockTypeTable) -> Result<bool> {
        if !self.dimensions.contains(x as i64, y as i64, z as i64) {
            return Err(EngineError::InvalidSlot { x, y, z });
        }
        let index = self.dimensions.slot_index(x, y, z);
        if !self.chunks[index].is_loaded || !self.chunks[index].needs_update {
            return Ok(false);
        }

        let mut meshes = std::mem::take(&mut self.chunks[index].meshes);
        mesh_into(&self.chunks[index], &self.neighbors(x, y, z), table, &mut meshes);

        let chunk = &mut self.chunks[index];
        chunk.meshes = meshes;
        chunk.needs_update = false;
        Ok(true)
    }

    /// Moves the window origin to `(new_cx, new_cz)`.
    ///
    /// Chunks that fall outside the new window are evicted and handed back;
    /// their surviving horizontal neighbors are marked dirty. Every other
    /// loaded chunk moves so that slot `(x, y, z)` holds what slot
    /// `(x + dx, y, z + dz)` held before. Slots with no source are left empty
    /// for the caller to fill with [`ChunkGrid::install_chunk`].
    pub fn shift_window(&mut self, new_cx: i32, new_cz: i32) -> ShiftReport {
        let new_cx = clamp_origin(new_cx, self.dimensions.width);
        let new_cz = clamp_origin(new_cz, self.dimensions.depth);
        let dx = new_cx as i64 - self.origin_cx as i64;
        let dz = new_cz as i64 - self.origin_cz as i64;
        let mut report = ShiftReport::default();
        if dx == 0 && dz == 0 {
            return report;
        }

        let dims = self.dimensions;
        let survives = |x: usize, y: usize, z: usize| dims.contains(x as i64 - dx, y as i64, z as i64 - dz);

        // Evict first, while neighbors are still at their old slots.
        for index in 0..self.chunks.len() {
            let slot = dims.slot_position(index);
            if !self.chunks[index].is_loaded || survives(slot.x, slot.y, slot.z) {
                continue;
            }

            let chunk = &mut self.chunks[index];
            let world_position = chunk.world_position;
            let modified = chunk.modified;
            let blocks = chunk.evict();
            report.evicted.push(EvictedChunk {
                world_position,
                blocks,
                modified,
            });

            for side in [BlockSide::LEFT, BlockSide::RIGHT, BlockSide::FRONT, BlockSide::BACK] {
                if let Some(neighbor) = self.neighbor_slot(slot, side) {
                    if survives(neighbor.x, neighbor.y, neighbor.z) {
                        let neighbor_index = dims.slot_index(neighbor.x, neighbor.y, neighbor.z);
                        let neighbor = &mut self.chunks[neighbor_index];
                        if neighbor.is_loaded {
                            neighbor.needs_update = true;
                        }
                    }
                }
            }
        }

        // Each source is visited after its destination, so every swap reads an
        // untouched source slot.
        let xs: Vec<usize> = if dx > 0 {
            (0..dims.width).collect()
        } else {
            (0..dims.width).rev().collect()
        };
        let zs: Vec<usize> = if dz > 0 {
            (0..dims.depth).collect()
        } else {
            (0..dims.depth).rev().collect()
        };

        for &x in &xs {
            for y in 0..dims.height {
                for &z in &zs {
                    let destination = dims.slot_index(x, y, z);
                    let (source_x, source_z) = (x as i64 + dx, z as i64 + dz);

                    if dims.contains(source_x, y as i64, source_z) {
                        let source = dims.slot_index(source_x as usize, y, source_z as usize);
                        if self.chunks[source].is_loaded {
                            report.shifted += 1;
                        }
                        self.chunks.swap(destination, source);
                    } else if self.chunks[destination].is_loaded {
                        let chunk = &mut self.chunks[destination];
                        let world_position = chunk.world_position;
                        let modified = chunk.modified;
                        report.evicted.push(EvictedChunk {
                            world_position,
                            blocks: chunk.evict(),
                            modified,
                        });
                    }
                }
            }
        }

        for (index, chunk) in self.chunks.iter_mut().enumerate() {
            chunk.render_position = dims.slot_position(index);
        }

        self.origin_cx = new_cx;
        self.origin_cz = new_cz;
        report
    }

    /// Empty slots and the world chunk each one should receive.
    pub fn empty_slots(&self) -> Vec<(Point3<usize>, Point3<i32>)> {
        self.chunks
            .iter()
            .enumerate()
            .filter(|(_, chunk)| !chunk.is_loaded)
            .map(|(index, _)| {
                let slot = self.dimensions.slot_position(index);
                (slot, self.expected_world_position(slot))
            })
            .collect()
    }

    /// Loads block data into an empty slot and marks its loaded neighbors dirty.
    ///
    /// Returns `Ok(false)` without touching the grid when the slot is already
    /// loaded or the window moved and the slot now expects a different chunk.
    pub fn install_chunk(
        &mut self,
        slot: Point3<usize>,
        world_position: Point3<i32>,
        blocks: &[Block],
        modified: bool,
    ) -> Result<bool> {
        let chunk = self
            .chunk(slot.x, slot.y, slot.z)
            .ok_or(EngineError::InvalidSlot {
                x: slot.x,
                y: slot.y,
                z: slot.z,
            })?;
        if chunk.is_loaded || self.expected_world_position(slot) != world_position {
            return Ok(false);
        }

        let index = self.dimensions.slot_index(slot.x, slot.y, slot.z);
        let chunk = &mut self.chunks[index];
        chunk.load(world_position, blocks);
        chunk.modified = modified;
        self.mark_neighbors_dirty(slot, &BlockSide::all());
        Ok(true)
    }

    fn locate_block(&self, world_block: Point3<i32>) -> Option<(usize, Point3<usize>, Point3<usize>)> {
        let world_chunk = Point3::new(
            world_block.x.div_euclid(CHUNK_DIMENSION_I32),
            world_block.y.div_euclid(CHUNK_DIMENSION_I32),
            world_block.z.div_euclid(CHUNK_DIMENSION_I32),
        );
        let slot = self.slot_for_world_chunk(world_chunk)?;
        let index = self.dimensions.slot_index(slot.x, slot.y, slot.z);
        let chunk = &self.chunks[index];
        if !chunk.is_loaded || chunk.world_position != world_chunk {
            return None;
        }

        let local = Point3::new(
            world_block.x.rem_euclid(CHUNK_DIMENSION_I32) as usize,
            world_block.y.rem_euclid(CHUNK_DIMENSION_I32) as usize,
            world_block.z.rem_euclid(CHUNK_DIMENSION_I32) as usize,
        );
        Some((index, slot, local))
    }

    /// Reads the block at a world block coordinate, if its chunk is loaded.
    pub fn block_at_world(&self, world_block: Point3<i32>) -> Option<Block> {
        self.locate_block(world_block)
            .map(|(index, _, local)| self.chunks[index].block(local.x, local.y, local.z))
    }

    /// Writes a block at a world block coordinate.
    ///
    /// The owning chunk becomes modified and dirty. When the cell lies on a chunk
    /// border the chunk across that border is marked dirty too. Returns `false` if
    /// the owning chunk is not loaded.
    pub fn set_block_world(&mut self, world_block: Point3<i32>, block: Block) -> bool {
        let Some((index, slot, local)) = self.locate_block(world_block) else {
            return false;
        };

        let chunk = &mut self.chunks[index];
        chunk.set_block(local.x, local.y, local.z, block);
        chunk.modified = true;
        chunk.needs_update = true;

        let last = (CHUNK_DIMENSION_I32 - 1) as usize;
        let mut borders = Vec::new();
        for (coordinate, negative, positive) in [
            (local.x, BlockSide::LEFT, BlockSide::RIGHT),
            (local.y, BlockSide::BOTTOM, BlockSide::TOP),
            (local.z, BlockSide::BACK, BlockSide::FRONT),
        ] {
            if coordinate == 0 {
                borders.push(negative);
            }
            if coordinate == last {
                borders.push(positive);
            }
        }
        self.mark_neighbors_dirty(slot, &borders);
        true
    }
}

/// Keeps a window of `extent` chunks starting at `origin` inside
/// `[-WORLD_CHUNK_LIMIT, WORLD_CHUNK_LIMIT]`.
fn clamp_origin(origin: i32, extent: usize) -> i32 {
    let extent = i32::try_from(extent).unwrap_or(i32::MAX).min(WORLD_CHUNK_LIMIT);
    origin.clamp(-WORLD_CHUNK_LIMIT, WORLD_CHUNK_LIMIT - extent + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::ids;
    use crate::engine_state::voxels::chunk::CHUNK_SIZE;

    fn solid(id: u8) -> Vec<Block> {
        vec![Block::new(id); CHUNK_SIZE]
    }

    fn fill_all(grid: &mut ChunkGrid) {
        for (slot, world_position) in grid.empty_slots() {
            let id = (world_position.x.rem_euclid(10) + 1) as u8;
            assert!(grid.install_chunk(slot, world_position, &solid(id), false).unwrap());
        }
    }

    #[test]
    fn test_slot_index_roundtrip() {
        let dims = GridDimensions::new(4, 3);
        for index in 0..dims.slot_count() {
            let slot = dims.slot_position(index);
            assert_eq!(dims.slot_index(slot.x, slot.y, slot.z), index);
        }
        assert_eq!(dims.slot_index(1, 0, 0), 12);
    }

    #[test]
    fn test_combine_order_is_y_then_x_then_z() {
        let dims = GridDimensions::new(2, 2);
        let order: Vec<_> = dims.combine_order().map(|p| (p.x, p.y, p.z)).collect();
        assert_eq!(
            order,
            vec![(0, 0, 0), (0, 0, 1), (1, 0, 0), (1, 0, 1), (0, 1, 0), (0, 1, 1), (1, 1, 0), (1, 1, 1)]
        );
    }

    #[test]
    fn test_window_origin_for() {
        let grid = ChunkGrid::new(GridDimensions::new(8, 2));
        assert_eq!(grid.window_origin_for(Point3::new(0.0, 0.0, 0.0)), (-4, -4));
        assert_eq!(grid.window_origin_for(Point3::new(-1.0, 50.0, 33.0)), (-5, -2));
    }

    #[test]
    fn test_far_viewer_stays_in_range() {
        let mut grid = ChunkGrid::new(GridDimensions::new(4, 1));
        let (cx, cz) = grid.window_origin_for(Point3::new(3.0e10, 0.0, -3.0e10));
        assert_eq!((cx, cz), (WORLD_CHUNK_LIMIT - 3, -WORLD_CHUNK_LIMIT));
        assert_eq!(grid.window_origin_for(Point3::new(f32::NAN, 0.0, f32::MAX)).1, WORLD_CHUNK_LIMIT - 3);

        grid.shift_window(i32::MAX, i32::MIN);
        assert_eq!(grid.origin(), (WORLD_CHUNK_LIMIT - 3, -WORLD_CHUNK_LIMIT));

        let far_corner = grid.expected_world_position(Point3::new(3, 0, 0));
        assert_eq!(far_corner.x, WORLD_CHUNK_LIMIT);
        let mut chunk = Chunk::new(Point3::new(3, 0, 0));
        chunk.world_position = far_corner;
        let block_origin = chunk.world_block_origin();
        assert!(block_origin.x.checked_add(CHUNK_DIMENSION_I32 - 1).is_some());
        assert!((-WORLD_CHUNK_LIMIT).checked_mul(CHUNK_DIMENSION_I32).is_some());
    }

    #[test]
    fn test_install_marks_loaded_neighbors_dirty() {
        let mut grid = ChunkGrid::new(GridDimensions::new(3, 1));
        let first = Point3::new(1, 0, 1);
        grid.install_chunk(first, grid.expected_world_position(first), &solid(ids::STONE), false)
            .unwrap();
        grid.chunk_mut(1, 0, 1).unwrap().needs_update = false;

        let second = Point3::new(2, 0, 1);
        grid.install_chunk(second, grid.expected_world_position(second), &solid(ids::STONE), false)
            .unwrap();
        assert!(grid.chunk(1, 0, 1).unwrap().needs_update);
    }

    #[test]
    fn test_install_rejects_wrong_position() {
        let mut grid = ChunkGrid::new(GridDimensions::new(3, 1));
        let result = grid.install_chunk(Point3::new(0, 0, 0), Point3::new(9, 0, 9), &solid(1), false);
        assert!(!result.unwrap());
        assert!(matches!(
            grid.install_chunk(Point3::new(5, 0, 0), Point3::new(5, 0, 0), &solid(1), false),
            Err(EngineError::InvalidSlot { .. })
        ));
    }

    #[test]
    fn test_shift_moves_survivors_and_evicts_edges() {
        let mut grid = ChunkGrid::new(GridDimensions::new(4, 2));
        fill_all(&mut grid);
        for chunk in grid.chunks.iter_mut() {
            chunk.needs_update = false;
        }
        let before: Vec<Point3<i32>> = grid.chunks().iter().map(|c| c.world_position).collect();

        let report = grid.shift_window(1, -2);
        // One column evicted along x, two along z, overlapping.
        assert_eq!(report.evicted.len(), (16 - 3 * 2) * 2);
        assert_eq!(report.shifted, 3 * 2 * 2);

        for x in 0..4 {
            for y in 0..2 {
                for z in 0..4 {
                    let chunk = grid.chunk(x, y, z).unwrap();
                    assert_eq!(chunk.render_position, Point3::new(x, y, z));
                    let source_z = z as i64 - 2;
                    if x + 1 < 4 && source_z >= 0 {
                        let old = before[grid.dimensions().slot_index(x + 1, y, source_z as usize)];
                        assert_eq!(chunk.world_position, old);
                        assert_eq!(chunk.world_position, grid.expected_world_position(Point3::new(x, y, z)));
                    } else {
                        assert!(!chunk.is_loaded);
                    }
                }
            }
        }
        assert_eq!(grid.origin(), (1, -2));
    }

    #[test]
    fn test_shift_marks_survivors_next_to_evicted_dirty() {
        let mut grid = ChunkGrid::new(GridDimensions::new(4, 1));
        fill_all(&mut grid);
        for chunk in grid.chunks.iter_mut() {
            chunk.needs_update = false;
        }

        grid.shift_window(1, 0);
        // Old column x = 1 neighbored the evicted column and now sits at x = 0.
        for z in 0..4 {
            assert!(grid.chunk(0, 0, z).unwrap().needs_update);
            assert!(!grid.chunk(1, 0, z).unwrap().needs_update);
        }
    }

    #[test]
    fn test_large_shift_evicts_everything() {
        let mut grid = ChunkGrid::new(GridDimensions::new(3, 1));
        fill_all(&mut grid);
        let report = grid.shift_window(100, 0);
        assert_eq!(report.evicted.len(), 9);
        assert_eq!(report.shifted, 0);
        assert_eq!(grid.loaded_count(), 0);
        assert_eq!(grid.empty_slots().len(), 9);
    }

    #[test]
    fn test_set_block_world_on_border_dirties_neighbor() {
        let mut grid = ChunkGrid::new(GridDimensions::new(2, 1));
        fill_all(&mut grid);
        for chunk in grid.chunks.iter_mut() {
            chunk.needs_update = false;
        }

        // World block x = 15 is the last column of chunk x = 0.
        let position = Point3::new(15, 3, 4);
        assert!(grid.set_block_world(position, Block::new(ids::GLASS)));
        assert_eq!(grid.block_at_world(position), Some(Block::new(ids::GLASS)));

        let edited = grid.chunk(0, 0, 0).unwrap();
        assert!(edited.modified && edited.needs_update);
        assert!(grid.chunk(1, 0, 0).unwrap().needs_update);
        assert!(!grid.chunk(0, 0, 1).unwrap().needs_update);

        assert!(!grid.set_block_world(Point3::new(500, 0, 0), Block::new(ids::GLASS)));
        assert_eq!(grid.block_at_world(Point3::new(0, -1, 0)), None);
    }

    #[test]
    fn test_remesh_slot() {
        let mut grid = ChunkGrid::new(GridDimensions::new(2, 1));
        let table = BlockTypeTable::default();
        fill_all(&mut grid);

        assert!(grid.remesh_slot(0, 0, 0, &table).unwrap());
        assert!(!grid.remesh_slot(0, 0, 0, &table).unwrap());
        let chunk = grid.chunk(0, 0, 0).unwrap();
        assert!(!chunk.needs_update);
        assert!(chunk.meshes.quad_count() > 0);

        assert!(matches!(
            grid.remesh_slot(2, 0, 0, &table),
            Err(EngineError::InvalidSlot { x: 2, y: 0, z: 0 })
        ));
    }
}
