//! Vertex data structures and layouts for voxel rendering.
//!
//! This module defines the interleaved vertex format produced by the mesher
//! and the matching buffer layout for the shader pipeline that consumes it.

/// A vertex of a chunk mesh, in chunk-local space.
///
/// # Memory Layout
/// - Position: [f32; 4] (16 bytes), homogeneous with `w = 1`
/// - Normal: [f32; 4] (16 bytes), face direction with `w = 0`
/// - UV: [f32; 2] (8 bytes), texture atlas coordinate
///
/// Total size: 40 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Homogeneous position relative to the chunk origin.
    pub position: [f32; 4],
    /// Outward normal of the face this vertex belongs to.
    pub normal: [f32; 4],
    /// Atlas texture coordinate.
    pub uv: [f32; 2],
}

impl Vertex {
    /// Creates a new vertex from a 3D position, a face normal and a UV.
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Vertex {
            position: [position[0], position[1], position[2], 1.0],
            normal: [normal[0], normal[1], normal[2], 0.0],
            uv,
        }
    }

    /// Returns the vertex buffer layout description for the shader pipeline.
    ///
    /// # Shader Attributes
    /// - `location = 0`: position (vec4<f32>)
    /// - `location = 1`: normal (vec4<f32>)
    /// - `location = 2`: uv (vec2<f32>)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}
