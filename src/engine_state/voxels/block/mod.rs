//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel engine.
//! It includes the block type table, block face handling, and the block value type.

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block ids in memory.
pub type BlockTypeSize = u8;

/// Light level of a cell open to the sky.
pub const MAX_LIGHT_LEVEL: u8 = 15;

/// Represents a single voxel block in the world.
///
/// This is a lightweight value type that stores only the block id and its light
/// level. Block properties are looked up from the block type table.
///
/// # Memory Layout
/// The `#[repr(C)]` attribute fixes the layout to two bytes, `[id, light_level]`,
/// which is also the per-block layout of the chunk file format.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug, Default, PartialEq, Eq, Hash)]
pub struct Block {
    /// The block id. Id 0 is air.
    pub id: BlockTypeSize,
    /// Light level in `0..=MAX_LIGHT_LEVEL`.
    pub light_level: u8,
}

impl Block {
    /// The air block with no light.
    pub const AIR: Block = Block {
        id: block_type::ids::AIR,
        light_level: 0,
    };

    /// Creates a new unlit block of the given id.
    pub const fn new(id: BlockTypeSize) -> Self {
        Block { id, light_level: 0 }
    }

    /// Creates a block with an explicit light level.
    pub const fn with_light(id: BlockTypeSize, light_level: u8) -> Self {
        Block { id, light_level }
    }

    #[inline]
    pub fn is_air(&self) -> bool {
        self.id == block_type::ids::AIR
    }
}
