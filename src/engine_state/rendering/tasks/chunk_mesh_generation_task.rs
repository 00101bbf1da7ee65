//! Task for regenerating chunk meshes on a worker thread.
//!
//! The grid is split into contiguous X slices, one `MeshPartitionTask` per
//! worker. A task walks its sub-volume and remeshes every loaded chunk whose
//! `needs_update` flag is set.

use std::ops::Range;
use std::sync::Arc;

use log::error;

use crate::{
    core::MtResource,
    engine_state::{
        task_management::task::{BatchSummary, Task, TaskResult},
        voxels::{
            block::block_type::BlockTypeTable,
            world::{ChunkGrid, GridDimensions},
        },
    },
};

/// A box of grid slots assigned to one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridPartition {
    pub x: Range<usize>,
    pub y: Range<usize>,
    pub z: Range<usize>,
}

impl GridPartition {
    pub fn slot_count(&self) -> usize {
        self.x.len() * self.y.len() * self.z.len()
    }
}

/// Splits the grid into at most `count` contiguous X slices covering every slot.
///
/// The first `width % count` slices are one column wider. A grid narrower than
/// `count` gets one slice per column.
pub fn partition_grid(dimensions: GridDimensions, count: usize) -> Vec<GridPartition> {
    let count = count.clamp(1, dimensions.width.max(1));
    let base = dimensions.width / count;
    let remainder = dimensions.width % count;

    let mut partitions = Vec::with_capacity(count);
    let mut start = 0;
    for index in 0..count {
        let width = base + usize::from(index < remainder);
        partitions.push(GridPartition {
            x: start..start + width,
            y: 0..dimensions.height,
            z: 0..dimensions.depth,
        });
        start += width;
    }
    partitions
}

/// Remeshes the dirty chunks of one grid partition.
///
/// The grid's write lock is the mesh lock: it is taken once per chunk, so
/// streaming can interleave with a running partition.
pub struct MeshPartitionTask {
    grid: MtResource<ChunkGrid>,
    table: Arc<BlockTypeTable>,
    partition: GridPartition,
}

impl MeshPartitionTask {
    pub fn new(grid: MtResource<ChunkGrid>, table: Arc<BlockTypeTable>, partition: GridPartition) -> Self {
        MeshPartitionTask {
            grid,
            table,
            partition,
        }
    }
}

impl Task for MeshPartitionTask {
    fn process(&self) -> Box<dyn TaskResult + Send> {
        let mut result = MeshPartitionResult::default();

        for x in self.partition.x.clone() {
            for y in self.partition.y.clone() {
                for z in self.partition.z.clone() {
                    match self.grid.get_mut().remesh_slot(x, y, z, &self.table) {
                        Ok(true) => result.chunks_meshed += 1,
                        Ok(false) => {}
                        Err(err) => {
                            error!("Skipping chunk while meshing: {}", err);
                            result.failures += 1;
                        }
                    }
                }
            }
        }

        Box::new(result)
    }
}

/// What one partition task did.
#[derive(Debug, Default)]
pub struct MeshPartitionResult {
    chunks_meshed: usize,
    failures: usize,
}

impl TaskResult for MeshPartitionResult {
    fn handle_result(self: Box<Self>, summary: &mut BatchSummary) {
        summary.chunks_meshed += self.chunks_meshed;
        summary.failures += self.failures;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Point3;

    use crate::engine_state::voxels::{
        block::{block_type::ids, Block},
        chunk::CHUNK_SIZE,
    };

    #[test]
    fn test_partition_covers_grid() {
        let dimensions = GridDimensions::new(10, 3);
        let partitions = partition_grid(dimensions, 4);
        assert_eq!(partitions.len(), 4);
        assert_eq!(
            partitions.iter().map(|p| p.x.clone()).collect::<Vec<_>>(),
            vec![0..3, 3..6, 6..8, 8..10]
        );
        let total: usize = partitions.iter().map(GridPartition::slot_count).sum();
        assert_eq!(total, dimensions.slot_count());
    }

    #[test]
    fn test_more_workers_than_columns() {
        let partitions = partition_grid(GridDimensions::new(2, 1), 8);
        assert_eq!(partitions.len(), 2);
        assert_eq!(partitions[1].x, 1..2);
    }

    #[test]
    fn test_task_meshes_dirty_chunks_in_range() {
        let mut grid = ChunkGrid::new(GridDimensions::new(2, 1));
        for (slot, world_position) in grid.empty_slots() {
            grid.install_chunk(slot, world_position, &vec![Block::new(ids::STONE); CHUNK_SIZE], false)
                .unwrap();
        }
        let grid = MtResource::new(grid);
        let table = Arc::new(BlockTypeTable::default());

        let task = MeshPartitionTask::new(
            grid.clone(),
            table,
            GridPartition {
                x: 0..1,
                y: 0..1,
                z: 0..2,
            },
        );
        let mut summary = BatchSummary::default();
        task.process().handle_result(&mut summary);

        assert_eq!(summary.chunks_meshed, 2);
        let grid = grid.get();
        assert!(!grid.chunk(0, 0, 0).unwrap().needs_update);
        assert!(grid.chunk(1, 0, 0).unwrap().needs_update);
        assert_eq!(grid.chunk(0, 0, 1).unwrap().world_position, Point3::new(0, 0, 1));
    }

    #[test]
    fn test_out_of_range_partition_is_reported() {
        let grid = MtResource::new(ChunkGrid::new(GridDimensions::new(1, 1)));
        let task = MeshPartitionTask::new(
            grid,
            Arc::new(BlockTypeTable::default()),
            GridPartition {
                x: 0..2,
                y: 0..1,
                z: 0..1,
            },
        );
        let mut summary = BatchSummary::default();
        task.process().handle_result(&mut summary);
        assert_eq!(summary.failures, 1);
        assert_eq!(summary.chunks_meshed, 0);
    }
}
