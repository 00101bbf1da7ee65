//! Background tasks for the rendering system.
//!
//! # Available Tasks
//! - `MeshPartitionTask`: Remeshes the dirty chunks of one slice of the grid

pub mod chunk_mesh_generation_task;

pub use chunk_mesh_generation_task::{partition_grid, GridPartition, MeshPartitionTask};
