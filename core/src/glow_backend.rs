// RenderBackend on top of a glow OpenGL context (desktop GL 3.3+ or GLES 3.0).
// Every call assumes the context is current on this thread.
use glam::Mat4;
use glow::HasContext as _;
use tracing::warn;

use crate::backend::{AttributeBinding, RenderBackend, ShaderStage};
use crate::error::BackendError;
use crate::frame::Viewport;

fn shader_header(gl: &glow::Context) -> &'static str {
    if gl.version().is_embedded {
        "#version 300 es\nprecision mediump float;\n"
    } else {
        "#version 330\n"
    }
}

impl RenderBackend for glow::Context {
    type Buffer = glow::Buffer;
    type VertexArray = glow::VertexArray;
    type Program = glow::Program;
    type UniformLocation = glow::UniformLocation;

    fn compile_program(
        &self,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<glow::Program, BackendError> {
        let header = shader_header(self);
        let stages = [
            (ShaderStage::Vertex, glow::VERTEX_SHADER, vertex_src),
            (ShaderStage::Fragment, glow::FRAGMENT_SHADER, fragment_src),
        ];

        unsafe {
            let program = self.create_program().map_err(BackendError::Allocation)?;
            let mut shaders = Vec::with_capacity(stages.len());

            for (stage, kind, src) in stages {
                let shader = match self.create_shader(kind) {
                    Ok(shader) => shader,
                    Err(e) => {
                        for s in shaders {
                            self.delete_shader(s);
                        }
                        self.delete_program(program);
                        return Err(BackendError::Allocation(e));
                    }
                };
                self.shader_source(shader, &format!("{header}{src}"));
                self.compile_shader(shader);
                if !self.get_shader_compile_status(shader) {
                    let log = self.get_shader_info_log(shader);
                    self.delete_shader(shader);
                    for s in shaders {
                        self.delete_shader(s);
                    }
                    self.delete_program(program);
                    return Err(BackendError::Compile { stage, log });
                }
                self.attach_shader(program, shader);
                shaders.push(shader);
            }

            self.link_program(program);
            for shader in shaders {
                self.detach_shader(program, shader);
                self.delete_shader(shader);
            }
            if !self.get_program_link_status(program) {
                let log = self.get_program_info_log(program);
                self.delete_program(program);
                return Err(BackendError::Link { log });
            }
            Ok(program)
        }
    }

    fn uniform_location(&self, program: &glow::Program, name: &str) -> Option<glow::UniformLocation> {
        unsafe { self.get_uniform_location(*program, name) }
    }

    fn allocate_vertex_buffer(&self, data: &[f32]) -> Result<glow::Buffer, BackendError> {
        unsafe {
            let buffer = self.create_buffer().map_err(BackendError::Allocation)?;
            self.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(data),
                glow::STATIC_DRAW,
            );
            self.bind_buffer(glow::ARRAY_BUFFER, None);
            Ok(buffer)
        }
    }

    fn bind_attributes(
        &self,
        program: &glow::Program,
        bindings: &[AttributeBinding<'_, glow::Buffer>],
    ) -> Result<glow::VertexArray, BackendError> {
        unsafe {
            let vertex_array = self
                .create_vertex_array()
                .map_err(BackendError::Allocation)?;
            self.bind_vertex_array(Some(vertex_array));
            for binding in bindings {
                let Some(location) = self.get_attrib_location(*program, binding.name) else {
                    warn!(attribute = binding.name, "attribute not active in program");
                    continue;
                };
                self.bind_buffer(glow::ARRAY_BUFFER, Some(*binding.buffer));
                self.enable_vertex_attrib_array(location);
                self.vertex_attrib_pointer_f32(
                    location,
                    binding.components,
                    glow::FLOAT,
                    false,
                    0,
                    0,
                );
            }
            self.bind_vertex_array(None);
            self.bind_buffer(glow::ARRAY_BUFFER, None);
            Ok(vertex_array)
        }
    }

    fn begin_frame(&self, viewport: Viewport, clear_color: [f32; 4]) {
        let [r, g, b, a] = clear_color;
        unsafe {
            self.viewport(viewport.x, viewport.y, viewport.width, viewport.height);
            self.enable(glow::DEPTH_TEST);
            self.depth_func(glow::LESS);
            // the terrain is open underneath, both faces stay visible
            self.disable(glow::CULL_FACE);
            self.clear_color(r, g, b, a);
            self.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }

    fn activate_program(&self, program: &glow::Program) {
        unsafe { self.use_program(Some(*program)) }
    }

    fn set_uniform_mat4(&self, location: Option<&glow::UniformLocation>, matrix: &Mat4) {
        unsafe { self.uniform_matrix_4_f32_slice(location, false, &matrix.to_cols_array()) }
    }

    fn draw_triangles(&self, vertex_array: &glow::VertexArray, vertex_count: u32) {
        let count = vertex_count.min(i32::MAX as u32) as i32;
        unsafe {
            self.bind_vertex_array(Some(*vertex_array));
            self.draw_arrays(glow::TRIANGLES, 0, count);
        }
    }

    fn end_frame(&self) {
        unsafe {
            self.bind_vertex_array(None);
            self.use_program(None);
            self.disable(glow::DEPTH_TEST);
        }
    }

    fn release_buffer(&self, buffer: glow::Buffer) {
        unsafe { self.delete_buffer(buffer) }
    }

    fn release_vertex_array(&self, vertex_array: glow::VertexArray) {
        unsafe { self.delete_vertex_array(vertex_array) }
    }

    fn release_program(&self, program: glow::Program) {
        unsafe { self.delete_program(program) }
    }
}
