use std::fmt;

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::{ProjectionConfig, ViewConfig};
use crate::transform::{
    compose, look_at, orthographic, perspective, rotate_y, rotate_z, scale, translate,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionMode {
    #[default]
    Perspective,
    Orthographic,
}

impl ProjectionMode {
    pub const ALL: [ProjectionMode; 2] = [ProjectionMode::Perspective, ProjectionMode::Orthographic];

    pub fn toggled(self) -> Self {
        match self {
            ProjectionMode::Perspective => ProjectionMode::Orthographic,
            ProjectionMode::Orthographic => ProjectionMode::Perspective,
        }
    }
}

impl fmt::Display for ProjectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionMode::Perspective => f.write_str("Perspective"),
            ProjectionMode::Orthographic => f.write_str("Orthographic"),
        }
    }
}

// Everything the frame renderer reads from the interaction layer.
// Only the interaction state machine writes it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    // radians, unbounded
    pub y_rotation: f32,
    pub z_rotation: f32,
    // > 0
    pub zoom_factor: f32,
    // > 0
    pub height_scale: f32,
    pub pan_x: f32,
    pub pan_y: f32,
    pub projection_mode: ProjectionMode,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            y_rotation: 0.0,
            z_rotation: 0.0,
            zoom_factor: 1.0,
            height_scale: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            projection_mode: ProjectionMode::Perspective,
        }
    }
}

impl CameraState {
    // T(pan) * S(height) * S(zoom) * Ry * Rz: rotate in local space first,
    // then exaggerate height, then zoom, then pan in world space.
    // Perspective zoom lives here, not in the projection.
    pub fn model_matrix(&self) -> Mat4 {
        let zoom = self.zoom_factor;
        compose(&[
            translate(self.pan_x, self.pan_y, 0.0),
            scale(1.0, self.height_scale, 1.0),
            scale(zoom, zoom, zoom),
            rotate_y(self.y_rotation),
            rotate_z(self.z_rotation),
        ])
    }

    // Zoom only changes the orthographic frustum; the perspective FOV is fixed
    pub fn projection_matrix(&self, aspect: f32, config: &ProjectionConfig) -> Mat4 {
        match self.projection_mode {
            ProjectionMode::Perspective => perspective(
                config.fov_y_degrees.to_radians(),
                aspect,
                config.near,
                config.far,
            ),
            ProjectionMode::Orthographic => {
                let half_height = config.ortho_half_height / self.zoom_factor;
                let half_width = half_height * aspect;
                orthographic(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    config.near,
                    config.far,
                )
            }
        }
    }
}

// Fixed camera: the model moves, the eye does not
pub fn view_matrix(config: &ViewConfig) -> Mat4 {
    look_at(
        Vec3::from_array(config.eye),
        Vec3::from_array(config.target),
        Vec3::Y,
    )
}
