//! Mesh generation for voxel rendering.
//!
//! This module converts chunk block data into per-face vertex and index buckets.
//!
//! # Architecture
//! - [`Mesh`] / [`ChunkMeshes`]: the six per-face buckets of a chunk, twice
//!   (opaque and transparent)
//! - [`Face`]: a merged rectangle of block faces and its vertex generation
//! - `greedy`: the slice-sweeping greedy mesher and the face visibility rules
//! - `shapes`: fixed cross and slab geometry
//!
//! # Usage
//! ```
//! use cgmath::Point3;
//! use voxel_streamer::engine_state::{
//!     rendering::meshing::{mesh, Isolated},
//!     voxels::{block::{block_type::{ids, BlockTypeTable}, Block}, chunk::Chunk},
//! };
//!
//! let mut chunk = Chunk::new(Point3::new(0, 0, 0));
//! chunk.fill(Block::new(ids::STONE));
//! let meshes = mesh(&chunk, &Isolated, &BlockTypeTable::default());
//! assert_eq!(meshes.opaque.quad_count(), 6);
//! ```

mod face;
mod greedy;
#[allow(clippy::module_inception)]
mod mesh;
mod shapes;

pub use face::Face;
pub use greedy::{
    is_face_visible, mesh, mesh_into, neighbor_block, ChunkNeighbors, Isolated, NeighborLookup,
};
pub use mesh::*;
