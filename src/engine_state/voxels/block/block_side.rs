//! # Block Side Module
//!
//! This module defines the different faces/sides of a voxel block.
//! It provides the normal and sweep axes used by the mesher and by
//! neighbor lookups across chunk borders.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel block.
///
/// Each variant corresponds to a specific face and is assigned a unique integer value.
/// The values match the face texture order of a block type entry, so
/// `entry.face_texture[side as usize]` is the texture of that face.
///
/// The order is: [FRONT, LEFT, BACK, RIGHT, BOTTOM, TOP]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The front face (facing positive Z)
    FRONT = 0,

    /// The left face (facing negative X)
    LEFT = 1,

    /// The back face (facing negative Z)
    BACK = 2,

    /// The right face (facing positive X)
    RIGHT = 3,

    /// The bottom face (facing negative Y)
    BOTTOM = 4,

    /// The top face (facing positive Y)
    TOP = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in a consistent order.
    ///
    /// The order is: [FRONT, LEFT, BACK, RIGHT, BOTTOM, TOP]
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::LEFT,
            BlockSide::BACK,
            BlockSide::RIGHT,
            BlockSide::BOTTOM,
            BlockSide::TOP,
        ]
    }

    /// Unit step from a block to the neighbor this face looks at.
    pub fn normal(self) -> Vector3<i32> {
        match self {
            BlockSide::FRONT => Vector3::new(0, 0, 1),
            BlockSide::LEFT => Vector3::new(-1, 0, 0),
            BlockSide::BACK => Vector3::new(0, 0, -1),
            BlockSide::RIGHT => Vector3::new(1, 0, 0),
            BlockSide::BOTTOM => Vector3::new(0, -1, 0),
            BlockSide::TOP => Vector3::new(0, 1, 0),
        }
    }

    /// The face pointing the other way.
    pub fn opposite(self) -> BlockSide {
        match self {
            BlockSide::FRONT => BlockSide::BACK,
            BlockSide::LEFT => BlockSide::RIGHT,
            BlockSide::BACK => BlockSide::FRONT,
            BlockSide::RIGHT => BlockSide::LEFT,
            BlockSide::BOTTOM => BlockSide::TOP,
            BlockSide::TOP => BlockSide::BOTTOM,
        }
    }

    /// Index (0 = x, 1 = y, 2 = z) of the axis this face's normal runs along.
    pub fn normal_axis(self) -> usize {
        match self {
            BlockSide::LEFT | BlockSide::RIGHT => 0,
            BlockSide::BOTTOM | BlockSide::TOP => 1,
            BlockSide::FRONT | BlockSide::BACK => 2,
        }
    }

    /// Whether the normal points along the positive direction of its axis.
    pub fn is_positive(self) -> bool {
        matches!(self, BlockSide::FRONT | BlockSide::RIGHT | BlockSide::TOP)
    }

    /// The (U, V) sweep axes of a slice perpendicular to this face.
    ///
    /// U, V and the normal axis form a right-handed cycle, so U x V points
    /// along the positive normal axis. Quad winding relies on this.
    pub fn sweep_axes(self) -> (usize, usize) {
        let d = self.normal_axis();
        ((d + 1) % 3, (d + 2) % 3)
    }

    /// Converts a raw face id back to a side.
    pub fn from_index(index: usize) -> Option<BlockSide> {
        BlockSide::all().get(index).copied()
    }
}
