//! # Block Side Module
//!
//! This module defines the six faces of a voxel block, the direction each one
//! points in, and the unit-cube corners that make up its quad.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel block.
///
/// The discriminants index the per-face tables in this crate, and the order of
/// [`BlockSide::all`] is the order faces are emitted in by the mesher.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// Facing positive X.
    XPOS = 0,

    /// Facing negative X.
    XNEG = 1,

    /// Facing positive Y (top).
    YPOS = 2,

    /// Facing negative Y (bottom).
    YNEG = 3,

    /// Facing positive Z.
    ZPOS = 4,

    /// Facing negative Z.
    ZNEG = 5,
}

/// Corner positions of each face on the unit cube, counter-clockwise seen from outside.
static FACE_CORNERS: [[[f32; 3]; 4]; 6] = [
    [[1., 0., 1.], [1., 0., 0.], [1., 1., 0.], [1., 1., 1.]],
    [[0., 0., 0.], [0., 0., 1.], [0., 1., 1.], [0., 1., 0.]],
    [[0., 1., 1.], [1., 1., 1.], [1., 1., 0.], [0., 1., 0.]],
    [[0., 0., 0.], [1., 0., 0.], [1., 0., 1.], [0., 0., 1.]],
    [[0., 0., 1.], [1., 0., 1.], [1., 1., 1.], [0., 1., 1.]],
    [[1., 0., 0.], [0., 0., 0.], [0., 1., 0.], [1., 1., 0.]],
];

impl BlockSide {
    /// Returns all six faces in emission order.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::XPOS,
            BlockSide::XNEG,
            BlockSide::YPOS,
            BlockSide::YNEG,
            BlockSide::ZPOS,
            BlockSide::ZNEG,
        ]
    }

    /// The four horizontal faces, the only directions in which chunks have neighbors.
    pub fn horizontal() -> [BlockSide; 4] {
        [
            BlockSide::XPOS,
            BlockSide::XNEG,
            BlockSide::ZPOS,
            BlockSide::ZNEG,
        ]
    }

    /// Integer step from a block to its neighbor across this face.
    pub fn offset(self) -> Vector3<i32> {
        match self {
            BlockSide::XPOS => Vector3::new(1, 0, 0),
            BlockSide::XNEG => Vector3::new(-1, 0, 0),
            BlockSide::YPOS => Vector3::new(0, 1, 0),
            BlockSide::YNEG => Vector3::new(0, -1, 0),
            BlockSide::ZPOS => Vector3::new(0, 0, 1),
            BlockSide::ZNEG => Vector3::new(0, 0, -1),
        }
    }

    /// Outward unit normal of this face.
    pub fn normal(self) -> Vector3<f32> {
        let offset = self.offset();
        Vector3::new(offset.x as f32, offset.y as f32, offset.z as f32)
    }

    /// The face pointing the other way.
    pub fn opposite(self) -> BlockSide {
        match self {
            BlockSide::XPOS => BlockSide::XNEG,
            BlockSide::XNEG => BlockSide::XPOS,
            BlockSide::YPOS => BlockSide::YNEG,
            BlockSide::YNEG => BlockSide::YPOS,
            BlockSide::ZPOS => BlockSide::ZNEG,
            BlockSide::ZNEG => BlockSide::ZPOS,
        }
    }

    /// Unit-cube corners of this face's quad.
    pub fn corners(self) -> &'static [[f32; 3]; 4] {
        &FACE_CORNERS[self as usize]
    }
}
