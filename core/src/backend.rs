// Capabilities the pipeline needs from a graphics API.
// Handles are opaque associated types so the same renderer drives an
// OpenGL context or a headless recorder.
use std::fmt;

use glam::Mat4;

use crate::error::BackendError;
use crate::frame::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

// One float vertex attribute sourced from a tightly packed buffer
#[derive(Debug)]
pub struct AttributeBinding<'a, B> {
    pub name: &'a str,
    pub buffer: &'a B,
    pub components: i32,
}

pub trait RenderBackend {
    type Buffer;
    type VertexArray;
    type Program;
    type UniformLocation;

    fn compile_program(
        &self,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<Self::Program, BackendError>;

    fn uniform_location(&self, program: &Self::Program, name: &str)
    -> Option<Self::UniformLocation>;

    fn allocate_vertex_buffer(&self, data: &[f32]) -> Result<Self::Buffer, BackendError>;

    // Record how the program's attributes read from the given buffers
    fn bind_attributes(
        &self,
        program: &Self::Program,
        bindings: &[AttributeBinding<'_, Self::Buffer>],
    ) -> Result<Self::VertexArray, BackendError>;

    // Depth test on, face culling off, target cleared
    fn begin_frame(&self, viewport: Viewport, clear_color: [f32; 4]);

    fn activate_program(&self, program: &Self::Program);

    fn set_uniform_mat4(&self, location: Option<&Self::UniformLocation>, matrix: &Mat4);

    // Non-indexed triangle list
    fn draw_triangles(&self, vertex_array: &Self::VertexArray, vertex_count: u32);

    fn end_frame(&self);

    fn release_buffer(&self, buffer: Self::Buffer);

    fn release_vertex_array(&self, vertex_array: Self::VertexArray);

    fn release_program(&self, program: Self::Program);
}

// Asks the host to run another frame after this one
pub trait FrameScheduler {
    fn schedule_next_frame(&self);
}
