use crate::engine_state::{
    rendering::Vertex,
    voxels::block::{
        atlas_uv_origin, block_side::BlockSide, block_type::BlockType, ATLAS_TILE_UV,
    },
};

/// Corner UVs within one atlas tile, matching the corner order of [`BlockSide::corners`].
const TILE_CORNER_UVS: [[f32; 2]; 4] = [
    [0.0, 0.0],
    [ATLAS_TILE_UV, 0.0],
    [ATLAS_TILE_UV, ATLAS_TILE_UV],
    [0.0, ATLAS_TILE_UV],
];

/// Index pattern of one quad: two triangles, 0-1-2 and 0-2-3.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// A single visible face of one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    /// Chunk-local coordinate of the block owning the face.
    pub x: i32,
    /// Chunk-local Y.
    pub y: i32,
    /// Chunk-local Z.
    pub z: i32,
    /// The block type, used for the texture lookup.
    pub block_type: BlockType,
    /// Which side of the block this face is on.
    pub block_side: BlockSide,
}

impl Face {
    /// Creates the face on `block_side` of the block at `(x, y, z)`.
    pub fn new(x: i32, y: i32, z: i32, block_type: BlockType, block_side: BlockSide) -> Self {
        Face {
            x,
            y,
            z,
            block_type,
            block_side,
        }
    }

    /// The four vertices of this face's quad.
    pub fn vertices(&self) -> [Vertex; 4] {
        let normal = self.block_side.normal();
        let normal = [normal.x, normal.y, normal.z];
        let [u0, v0] = atlas_uv_origin(self.block_type, self.block_side);
        let corners = self.block_side.corners();

        std::array::from_fn(|i| {
            let [cx, cy, cz] = corners[i];
            let [du, dv] = TILE_CORNER_UVS[i];
            Vertex::new(
                [self.x as f32 + cx, self.y as f32 + cy, self.z as f32 + cz],
                normal,
                [u0 + du, v0 + dv],
            )
        })
    }
}
