//! Mesh generation and management for voxel rendering.
//!
//! Chunk block data becomes renderable geometry in two stages:
//! 1. Every tick, worker threads run the greedy mesher on dirty chunks and store
//!    the result in each chunk's twelve per-face buckets
//! 2. If any chunk changed, the combiner concatenates all loaded chunks' buckets
//!    into one opaque and one transparent buffer for the renderer
//!
//! # Architecture
//! - `mesh/`: Greedy mesher, shape geometry and per-chunk bucket types
//! - `MeshingPipeline`: Tick driver over the worker pool and the combiner
//! - `Combiner`: Builds the combined meshes and the render lookup tables
//! - `MeshPool`: Capacity policy of the combined buffers
//! - `RenderLookupTable`: Per-chunk index ranges and visibility flags

mod combiner;
mod mesh;
mod mesh_pool;
mod pipeline;
mod render_lookup;

pub use combiner::{CombineReport, Combiner};
pub use mesh::*;
pub use mesh_pool::{CombinedMesh, MeshPool};
pub use pipeline::{MeshingPipeline, TickClock, TickReport, MAX_CATCH_UP_TICKS};
pub use render_lookup::{ChunkRenderSlice, RenderLookupTable};
