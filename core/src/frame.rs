use glam::Mat4;

use crate::camera::{CameraState, view_matrix};
use crate::config::ViewerConfig;

// Drawable area in logical pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}

impl SurfaceSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    // A collapsed side (0 or negative) counts as one pixel
    pub fn aspect(&self) -> f32 {
        self.width.max(1.0) / self.height.max(1.0)
    }
}

// Framebuffer rectangle in physical pixels, origin at the bottom-left
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

// Per-frame uniform state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    pub model_view: Mat4,
    pub projection: Mat4,
}

// Rebuilt from scratch every frame; the camera changes continuously
pub fn prepare_frame(camera: &CameraState, surface: SurfaceSize, config: &ViewerConfig) -> FrameUniforms {
    let projection = camera.projection_matrix(surface.aspect(), &config.projection);
    let model_view = view_matrix(&config.view) * camera.model_matrix();
    FrameUniforms {
        model_view,
        projection,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn collapsed_surface_has_finite_aspect() {
        assert_eq!(SurfaceSize::new(800.0, 0.0).aspect(), 800.0);
        assert_eq!(SurfaceSize::new(0.0, 0.0).aspect(), 1.0);
    }

    #[test]
    fn model_view_is_view_times_model() {
        let config = ViewerConfig::default();
        let camera = CameraState {
            y_rotation: 0.3,
            pan_x: 0.5,
            ..Default::default()
        };
        let frame = prepare_frame(&camera, SurfaceSize::new(640.0, 480.0), &config);
        let expected = view_matrix(&config.view) * camera.model_matrix();
        assert_eq!(frame.model_view, expected);
    }

    #[test]
    fn origin_projects_to_screen_center() {
        let frame = prepare_frame(
            &CameraState::default(),
            SurfaceSize::new(1024.0, 768.0),
            &ViewerConfig::default(),
        );
        let clip = (frame.projection * frame.model_view).project_point3(Vec3::ZERO);
        assert!(clip.x.abs() < 1e-5 && clip.y.abs() < 1e-5);
        assert!(clip.z > -1.0 && clip.z < 1.0);
    }
}
