// One viewer session: camera + input state, the active terrain, and the
// surface it is drawn into. The UI shell forwards events here and asks for
// per-frame uniforms; nothing lives in globals.
use glam::Mat4;
use tracing::{info, warn};

use crate::backend::{FrameScheduler, RenderBackend};
use crate::camera::{CameraState, ProjectionMode};
use crate::config::ViewerConfig;
use crate::error::{BackendError, DecodeError};
use crate::frame::{FrameUniforms, SurfaceSize, prepare_frame};
use crate::heightfield::{Heightfield, decode_image, extract};
use crate::interaction::{InputEvent, InteractionState, KeyCommand, PointerButton, PointerDragState};
use crate::mesh::{Mesh, tessellate};
use crate::renderer::FrameRenderer;

// A heightfield and the mesh built from it; installed as one unit
#[derive(Debug, Clone, PartialEq)]
pub struct Terrain {
    pub heightfield: Heightfield,
    pub mesh: Mesh,
}

// Decode, extract and tessellate. CPU only, safe to run off the UI thread.
pub fn load_terrain(bytes: &[u8]) -> Result<Terrain, DecodeError> {
    let image = decode_image(bytes)?;
    let heightfield = extract(&image)?;
    let mesh = tessellate(&heightfield);
    if mesh.is_empty() {
        warn!(
            width = heightfield.width(),
            height = heightfield.height(),
            "image too thin to form any triangles"
        );
    }
    info!(
        width = heightfield.width(),
        height = heightfield.height(),
        triangles = mesh.triangle_count(),
        "terrain built"
    );
    Ok(Terrain { heightfield, mesh })
}

#[derive(Debug, Clone)]
pub struct Session {
    config: ViewerConfig,
    interaction: InteractionState,
    surface: SurfaceSize,
    terrain: Option<Terrain>,
}

impl Session {
    pub fn new(config: ViewerConfig, surface: SurfaceSize) -> Self {
        Self {
            config,
            interaction: InteractionState::default(),
            surface,
            terrain: None,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn camera(&self) -> &CameraState {
        &self.interaction.camera
    }

    pub fn drag(&self) -> &PointerDragState {
        &self.interaction.drag
    }

    pub fn surface(&self) -> SurfaceSize {
        self.surface
    }

    pub fn terrain(&self) -> Option<&Terrain> {
        self.terrain.as_ref()
    }

    pub fn handle(&mut self, event: InputEvent) {
        self.interaction.handle(event, &self.config.interaction);
    }

    pub fn on_pointer_down(&mut self, x: f32, y: f32, button: PointerButton) {
        self.handle(InputEvent::PointerDown { x, y, button });
    }

    pub fn on_pointer_move(&mut self, x: f32, y: f32) {
        self.handle(InputEvent::PointerMove { x, y });
    }

    pub fn on_pointer_up(&mut self) {
        self.handle(InputEvent::PointerUp);
    }

    pub fn on_pointer_leave(&mut self) {
        self.handle(InputEvent::PointerLeave);
    }

    pub fn on_wheel(&mut self, delta_y: f32) {
        self.handle(InputEvent::Wheel { delta_y });
    }

    pub fn on_height_slider_changed(&mut self, value: f32) {
        self.handle(InputEvent::HeightSlider(value));
    }

    pub fn on_projection_changed(&mut self, mode: ProjectionMode) {
        self.handle(InputEvent::Projection(mode));
    }

    pub fn on_key(&mut self, command: KeyCommand) {
        self.handle(InputEvent::Key(command));
    }

    pub fn resize(&mut self, surface: SurfaceSize) {
        self.surface = surface;
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.interaction
            .camera
            .projection_matrix(self.surface.aspect(), &self.config.projection)
    }

    pub fn prepare_frame(&self) -> FrameUniforms {
        prepare_frame(&self.interaction.camera, self.surface, &self.config)
    }

    // Uniforms for this frame; also books the next one so the loop keeps going
    pub fn render_frame(&self, scheduler: &impl FrameScheduler) -> FrameUniforms {
        let frame = self.prepare_frame();
        scheduler.schedule_next_frame();
        frame
    }

    // Upload first, then swap heightfield and mesh together.
    // If the upload fails the previous terrain stays installed.
    pub fn install_terrain<B: RenderBackend>(
        &mut self,
        backend: &B,
        renderer: &mut FrameRenderer<B>,
        terrain: Terrain,
    ) -> Result<(), BackendError> {
        renderer.install_mesh(backend, &terrain.mesh)?;
        info!(
            width = terrain.heightfield.width(),
            height = terrain.heightfield.height(),
            vertices = terrain.mesh.vertex_count(),
            "terrain installed"
        );
        self.terrain = Some(terrain);
        Ok(())
    }
}

// Everything needed to draw: the session plus the GPU-side renderer
pub struct RenderHandle<B: RenderBackend> {
    pub session: Session,
    pub renderer: FrameRenderer<B>,
}

// Compile the shader program and set up a session showing the placeholder
// box until the first terrain replaces it. Errors here are fatal to startup.
pub fn initialize_session<B: RenderBackend>(
    backend: &B,
    surface: SurfaceSize,
    config: ViewerConfig,
) -> Result<RenderHandle<B>, BackendError> {
    let mut renderer = FrameRenderer::new(backend, config.view.clear_color)?;
    if let Err(err) = renderer.install_mesh(backend, &Mesh::unit_box()) {
        renderer.destroy(backend);
        return Err(err);
    }
    info!(width = surface.width, height = surface.height, "session initialized");
    Ok(RenderHandle {
        session: Session::new(config, surface),
        renderer,
    })
}
