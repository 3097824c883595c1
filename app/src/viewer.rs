use std::path::PathBuf;
use std::sync::Arc;

use eframe::{App, CreationContext, Frame, egui, egui_glow, glow};
use egui::{ColorImage, TextureHandle, mutex::Mutex};
use heightmap::{
    BackendError, FrameRenderer, FrameScheduler, KeyCommand, ProjectionMode, RenderHandle, Session,
    SurfaceSize, Terrain, ViewerConfig, Viewport, initialize_session, preview,
};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::input::translate_events;
use crate::loader::{LoadOutcome, TerrainLoader};

const PREVIEW_SIDE: u32 = 192;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("no OpenGL context available, the viewer needs the glow renderer")]
    NoGlContext,
    #[error("shader setup failed: {0}")]
    Backend(#[from] BackendError),
    #[error("could not start the loader runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

// Asks egui for another frame; the session calls this after every render
struct RepaintScheduler<'a>(&'a egui::Context);

impl FrameScheduler for RepaintScheduler<'_> {
    fn schedule_next_frame(&self) {
        self.0.request_repaint();
    }
}

pub struct ViewerApp {
    session: Session,
    // shared with the paint callback, which runs inside egui's GL pass
    renderer: Arc<Mutex<Option<FrameRenderer<glow::Context>>>>,
    loader: TerrainLoader,

    preview: Option<TextureHandle>,
    status_message: String,
}

impl ViewerApp {
    pub fn new(
        cc: &CreationContext<'_>,
        config: ViewerConfig,
        initial_image: Option<PathBuf>,
    ) -> Result<Self, StartupError> {
        Self::build(cc, config, initial_image)
            .inspect_err(|err| error!(%err, "viewer failed to start"))
    }

    fn build(
        cc: &CreationContext<'_>,
        config: ViewerConfig,
        initial_image: Option<PathBuf>,
    ) -> Result<Self, StartupError> {
        let gl = cc.gl.as_ref().ok_or(StartupError::NoGlContext)?;
        let screen = cc.egui_ctx.screen_rect();
        let surface = SurfaceSize::new(screen.width(), screen.height());
        let RenderHandle { session, renderer } = initialize_session(&**gl, surface, config)?;

        let mut loader = TerrainLoader::new(cc.egui_ctx.clone())?;
        let status_message = match initial_image {
            Some(path) => {
                let message = format!("Loading {}…", path.display());
                loader.open_path(path);
                message
            }
            None => "Open an image to begin".to_owned(),
        };

        Ok(Self {
            session,
            renderer: Arc::new(Mutex::new(Some(renderer))),
            loader,
            preview: None,
            status_message,
        })
    }

    fn open_dialog(&mut self) {
        let picked = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg", "bmp", "gif", "tif", "tiff", "webp"])
            .pick_file();
        if let Some(path) = picked {
            self.status_message = format!("Loading {}…", path.display());
            self.loader.open_path(path);
        }
    }

    // Files dropped onto the window; web builds hand over bytes, native over paths
    fn accept_drops(&mut self, ctx: &egui::Context) {
        for file in ctx.input(|i| i.raw.dropped_files.clone()) {
            if let Some(bytes) = file.bytes {
                self.status_message = format!("Loading {}…", file.name);
                self.loader.on_image_selected(file.name, bytes.to_vec());
            } else if let Some(path) = file.path {
                self.status_message = format!("Loading {}…", path.display());
                self.loader.open_path(path);
            }
        }
    }

    // Install finished loads in arrival order; the last one wins
    fn apply_loads(&mut self, ctx: &egui::Context, frame: &Frame) {
        for LoadOutcome {
            seq,
            source,
            result,
        } in self.loader.poll()
        {
            match result {
                Ok(terrain) => self.install(ctx, frame, seq, &source, terrain),
                Err(err) => {
                    warn!(seq, %source, %err, "image rejected");
                    self.status_message = format!("Could not load {source}: {err}");
                }
            }
        }
    }

    fn install(&mut self, ctx: &egui::Context, frame: &Frame, seq: u64, source: &str, terrain: Terrain) {
        let Some(gl) = frame.gl() else {
            warn!(seq, "no GL context, dropping terrain");
            return;
        };
        let mut guard = self.renderer.lock();
        let Some(renderer) = guard.as_mut() else {
            return;
        };

        let (w, h, rgb) = preview::thumbnail(&terrain.heightfield, PREVIEW_SIDE);
        match self.session.install_terrain(&**gl, renderer, terrain) {
            Ok(()) => {
                let image = ColorImage::from_rgb([w as usize, h as usize], &rgb);
                self.preview =
                    Some(ctx.load_texture("heightfield", image, egui::TextureOptions::NEAREST));
                info!(seq, %source, "showing terrain");
                self.status_message = format!("Loaded {source}");
            }
            Err(err) => {
                error!(seq, %err, "GPU upload failed, keeping previous terrain");
                self.status_message = format!("GPU upload failed: {err}");
            }
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Heightmap Viewer");
        ui.separator();

        ui.horizontal(|ui| {
            if ui.button("Open image…").clicked() {
                self.open_dialog();
            }
            if self.loader.pending() > 0 {
                ui.spinner();
            }
        });

        ui.separator();

        // slider position is derived from the camera so reset stays in sync
        ui.label("Height");
        let divisor = self.session.config().interaction.height_slider_divisor;
        let mut slider = self.session.camera().height_scale * divisor;
        if ui
            .add(egui::Slider::new(&mut slider, 0.0..=100.0).step_by(1.0))
            .changed()
        {
            self.session.on_height_slider_changed(slider);
        }

        let current = self.session.camera().projection_mode;
        let mut mode = current;
        egui::ComboBox::from_label("Projection")
            .selected_text(mode.to_string())
            .show_ui(ui, |ui| {
                for m in ProjectionMode::ALL {
                    ui.selectable_value(&mut mode, m, m.to_string());
                }
            });
        if mode != current {
            self.session.on_projection_changed(mode);
        }

        if ui.button("Reset view").clicked() {
            self.session.on_key(KeyCommand::ResetView);
        }

        ui.separator();

        if let Some(terrain) = self.session.terrain() {
            let hf = &terrain.heightfield;
            let (lo, hi) = hf.min_max();
            ui.label(format!("{}×{} samples", hf.width(), hf.height()));
            ui.label(format!("{} triangles", terrain.mesh.triangle_count()));
            ui.label(format!("elevation {lo:.3} – {hi:.3}"));
        }
        if let Some(tex) = &self.preview {
            ui.image((tex.id(), tex.size_vec2()));
        }

        ui.separator();
        ui.small("Left drag: rotate\nRight drag: pan\nWheel: zoom\nR: reset view\nP: toggle projection");
        ui.separator();
        ui.label(&self.status_message);
    }

    fn terrain_view(&mut self, ui: &mut egui::Ui) {
        let (rect, response) =
            ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
        self.session
            .resize(SurfaceSize::new(rect.width(), rect.height()));

        let keyboard_free = !ui.ctx().wants_keyboard_input();
        let events = ui.input(|i| i.events.clone());
        for event in translate_events(&events, rect, response.hovered(), keyboard_free) {
            self.session.handle(event);
        }

        let uniforms = self.session.render_frame(&RepaintScheduler(ui.ctx()));
        let renderer = Arc::clone(&self.renderer);
        let callback = egui_glow::CallbackFn::new(move |info, painter| {
            let px = info.viewport_in_pixels();
            let viewport = Viewport {
                x: px.left_px,
                y: px.from_bottom_px,
                width: px.width_px,
                height: px.height_px,
            };
            if let Some(renderer) = renderer.lock().as_ref() {
                renderer.draw(&**painter.gl(), &uniforms, viewport);
            }
        });
        ui.painter().add(egui::PaintCallback {
            rect,
            callback: Arc::new(callback),
        });
    }
}

impl App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut Frame) {
        self.accept_drops(ctx);
        self.apply_loads(ctx, frame);

        egui::SidePanel::left("controls").show(ctx, |ui| self.controls(ui));
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.terrain_view(ui));
    }

    fn on_exit(&mut self, gl: Option<&glow::Context>) {
        let renderer = self.renderer.lock().take();
        if let (Some(gl), Some(renderer)) = (gl, renderer) {
            renderer.destroy(gl);
        }
    }
}
