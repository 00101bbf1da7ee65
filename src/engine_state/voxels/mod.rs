//! # Voxels
//!
//! Representation of the voxel world and the machinery that keeps the loaded
//! part of it around the viewer.
//!
//! ## Architecture
//!
//! * **Block**: Block values, faces and the block type table
//! * **Chunk**: Fixed-size 16x16x16 block arrays and their file format
//! * **World**: The sliding `ChunkGrid` window of loaded chunks
//! * **Terrain**: Generators that fill new chunks from world coordinates
//! * **Streaming**: Moves the window with the viewer on a background thread
//!
//! ## Data Flow
//!
//! 1. The viewer moves and a streaming pass is requested
//! 2. The pass shifts the grid, evicts chunks that left it and loads new ones
//! 3. Every chunk whose exposed faces may have changed is marked dirty
//! 4. The meshing pipeline picks the dirty chunks up on its next tick

pub mod block;
pub mod chunk;
pub mod streaming;
pub mod terrain;
pub mod world;
