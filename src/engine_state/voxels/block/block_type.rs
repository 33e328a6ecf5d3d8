//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world and
//! the transparency rules the mesher culls faces with.

use num_derive::FromPrimitive;

use super::BlockTypeSize;

/// Enumerates all possible block types in the voxel world.
///
/// The `FromPrimitive` derive allows conversion from the compact
/// [`BlockTypeSize`] representation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// Nothing. Transparent.
    #[default]
    EMPTY,

    /// Grass capped dirt, with distinct top, side and bottom textures.
    GRASS,

    /// Plain dirt below the grassland surface.
    DIRT,

    /// Stone, the bulk of the underground and of mountains.
    STONE,

    /// Water filling low cave voids up to sea level. Transparent.
    WATER,

    /// Snow capping tall mountains.
    SNOW,

    /// The indestructible floor at y = 0.
    BEDROCK,

    /// Lava pooling in deep caves. Transparent.
    LAVA,
}

impl BlockType {
    /// Every block type, in discriminant order.
    pub const ALL: [BlockType; 8] = [
        BlockType::EMPTY,
        BlockType::GRASS,
        BlockType::DIRT,
        BlockType::STONE,
        BlockType::WATER,
        BlockType::SNOW,
        BlockType::BEDROCK,
        BlockType::LAVA,
    ];

    /// Converts a `BlockTypeSize` to a `BlockType`, or `None` for unknown values.
    pub fn from_int(btype: BlockTypeSize) -> Option<Self> {
        num_traits::FromPrimitive::from_u8(btype)
    }

    /// Whether light (and the camera) passes through this block.
    pub fn is_transparent(self) -> bool {
        matches!(self, BlockType::EMPTY | BlockType::WATER | BlockType::LAVA)
    }

    /// Whether a ray or a collision check should stop at this block.
    pub fn is_solid(self) -> bool {
        !self.is_transparent()
    }

    /// Decides whether the face of `self` towards `neighbor` is drawn.
    ///
    /// Opaque blocks show a face to any transparent neighbor. Transparent blocks
    /// only show a face to a transparent neighbor of a different type, so two
    /// adjacent water cells share no face while water against air does.
    pub fn shows_face_towards(self, neighbor: BlockType) -> bool {
        if self == BlockType::EMPTY {
            return false;
        }
        if self.is_transparent() {
            neighbor.is_transparent() && neighbor != self
        } else {
            neighbor.is_transparent()
        }
    }

    /// Generates a random block type, excluding `EMPTY`.
    pub fn random_filled(rng: &mut fastrand::Rng) -> Self {
        Self::ALL[rng.usize(1..Self::ALL.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transparency_classes() {
        let transparent: Vec<_> = BlockType::ALL
            .into_iter()
            .filter(|t| t.is_transparent())
            .collect();
        assert_eq!(
            transparent,
            vec![BlockType::EMPTY, BlockType::WATER, BlockType::LAVA]
        );
    }

    #[test]
    fn face_rules() {
        assert!(BlockType::STONE.shows_face_towards(BlockType::EMPTY));
        assert!(BlockType::STONE.shows_face_towards(BlockType::WATER));
        assert!(!BlockType::STONE.shows_face_towards(BlockType::DIRT));
        assert!(BlockType::WATER.shows_face_towards(BlockType::EMPTY));
        assert!(BlockType::WATER.shows_face_towards(BlockType::LAVA));
        assert!(!BlockType::WATER.shows_face_towards(BlockType::WATER));
        assert!(!BlockType::WATER.shows_face_towards(BlockType::STONE));
        assert!(!BlockType::EMPTY.shows_face_towards(BlockType::EMPTY));
    }

    #[test]
    fn integer_conversion_matches_discriminants() {
        for block in BlockType::ALL {
            assert_eq!(BlockType::from_int(block as BlockTypeSize), Some(block));
        }
        assert_eq!(BlockType::from_int(8), None);
    }

    #[test]
    fn random_filled_never_yields_empty() {
        let mut rng = fastrand::Rng::with_seed(11);
        for _ in 0..256 {
            assert_ne!(BlockType::random_filled(&mut rng), BlockType::EMPTY);
        }
    }
}
