use tracing::{debug, info};

use crate::backend::{AttributeBinding, RenderBackend};
use crate::error::BackendError;
use crate::frame::{FrameUniforms, Viewport};
use crate::mesh::Mesh;

// GLSL bodies without a `#version` line; the backend adds the header
// that matches its context (desktop GL or GLES)
pub const VERTEX_SHADER: &str = include_str!("shaders/terrain.vert");
pub const FRAGMENT_SHADER: &str = include_str!("shaders/terrain.frag");

const POSITION_ATTRIBUTE: &str = "position";
const ELEVATION_ATTRIBUTE: &str = "elevation";
const MODEL_VIEW_UNIFORM: &str = "modelview";
const PROJECTION_UNIFORM: &str = "projection";

struct GpuMesh<B: RenderBackend> {
    positions: B::Buffer,
    elevations: B::Buffer,
    vertex_array: B::VertexArray,
    vertex_count: u32,
}

// Owns the shader program and the mesh currently on the GPU
pub struct FrameRenderer<B: RenderBackend> {
    program: B::Program,
    model_view: Option<B::UniformLocation>,
    projection: Option<B::UniformLocation>,
    mesh: Option<GpuMesh<B>>,
    clear_color: [f32; 4],
}

impl<B: RenderBackend> FrameRenderer<B> {
    pub fn new(backend: &B, clear_color: [f32; 4]) -> Result<Self, BackendError> {
        Self::with_shaders(backend, VERTEX_SHADER, FRAGMENT_SHADER, clear_color)
    }

    pub fn with_shaders(
        backend: &B,
        vertex_src: &str,
        fragment_src: &str,
        clear_color: [f32; 4],
    ) -> Result<Self, BackendError> {
        let program = backend.compile_program(vertex_src, fragment_src)?;
        let model_view = backend.uniform_location(&program, MODEL_VIEW_UNIFORM);
        let projection = backend.uniform_location(&program, PROJECTION_UNIFORM);
        info!(
            model_view = model_view.is_some(),
            projection = projection.is_some(),
            "shader program ready"
        );
        Ok(Self {
            program,
            model_view,
            projection,
            mesh: None,
            clear_color,
        })
    }

    // Upload `mesh` and swap it in. On failure nothing is swapped and the
    // previous mesh keeps drawing.
    pub fn install_mesh(&mut self, backend: &B, mesh: &Mesh) -> Result<(), BackendError> {
        let positions = backend.allocate_vertex_buffer(mesh.positions())?;
        let elevations = match backend.allocate_vertex_buffer(mesh.scalar_attr()) {
            Ok(buffer) => buffer,
            Err(err) => {
                backend.release_buffer(positions);
                return Err(err);
            }
        };
        let bindings = [
            AttributeBinding {
                name: POSITION_ATTRIBUTE,
                buffer: &positions,
                components: 3,
            },
            AttributeBinding {
                name: ELEVATION_ATTRIBUTE,
                buffer: &elevations,
                components: 3,
            },
        ];
        let vertex_array = match backend.bind_attributes(&self.program, &bindings) {
            Ok(vao) => vao,
            Err(err) => {
                backend.release_buffer(positions);
                backend.release_buffer(elevations);
                return Err(err);
            }
        };

        let uploaded = GpuMesh {
            positions,
            elevations,
            vertex_array,
            vertex_count: mesh.vertex_count(),
        };
        debug!(vertices = uploaded.vertex_count, "mesh uploaded");
        if let Some(old) = self.mesh.replace(uploaded) {
            release_mesh(backend, old);
        }
        Ok(())
    }

    pub fn vertex_count(&self) -> u32 {
        self.mesh.as_ref().map_or(0, |m| m.vertex_count)
    }

    // Clear, push uniforms and draw the installed mesh. With no mesh (or an
    // empty one) the target is only cleared.
    pub fn draw(&self, backend: &B, frame: &FrameUniforms, viewport: Viewport) {
        backend.begin_frame(viewport, self.clear_color);
        if let Some(mesh) = self.mesh.as_ref().filter(|m| m.vertex_count > 0) {
            backend.activate_program(&self.program);
            backend.set_uniform_mat4(self.model_view.as_ref(), &frame.model_view);
            backend.set_uniform_mat4(self.projection.as_ref(), &frame.projection);
            backend.draw_triangles(&mesh.vertex_array, mesh.vertex_count);
        }
        backend.end_frame();
    }

    pub fn destroy(self, backend: &B) {
        if let Some(mesh) = self.mesh {
            release_mesh(backend, mesh);
        }
        backend.release_program(self.program);
    }
}

fn release_mesh<B: RenderBackend>(backend: &B, mesh: GpuMesh<B>) {
    backend.release_vertex_array(mesh.vertex_array);
    backend.release_buffer(mesh.positions);
    backend.release_buffer(mesh.elevations);
}
