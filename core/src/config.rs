use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;

// Viewer tunables. Every section has defaults so a partial TOML file works:
//
//   [interaction]
//   drag_sensitivity = 0.02
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub projection: ProjectionConfig,
    pub view: ViewConfig,
    pub interaction: InteractionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    // orthographic half-height at zoom 1.0
    pub ortho_half_height: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 70.0,
            near: 0.001,
            far: 20.0,
            ortho_half_height: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub eye: [f32; 3],
    pub target: [f32; 3],
    pub clear_color: [f32; 4],
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            eye: [0.0, 5.0, 5.0],
            target: [0.0, 0.0, 0.0],
            clear_color: [0.2, 0.2, 0.2, 1.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    // radians (or model units when panning) per pixel of drag
    pub drag_sensitivity: f32,
    pub zoom_in_factor: f32,
    pub zoom_out_factor: f32,
    // floor for zoom and height scale
    pub min_scale: f32,
    pub max_zoom: f32,
    // slider value / divisor = height scale
    pub height_slider_divisor: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            drag_sensitivity: 0.01,
            zoom_in_factor: 1.1,
            zoom_out_factor: 0.9,
            min_scale: 1e-3,
            max_zoom: 1e4,
            height_slider_divisor: 50.0,
        }
    }
}

impl ViewerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    // Zoom and height scale must never reach zero or go non-finite,
    // whatever the file says. NaN fails every check.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.projection;
        let i = &self.interaction;
        require("projection.near", p.near, p.near > 0.0, "must be > 0")?;
        require("projection.far", p.far, p.far > p.near, "must be > near")?;
        require(
            "projection.fov_y_degrees",
            p.fov_y_degrees,
            p.fov_y_degrees > 0.0 && p.fov_y_degrees < 180.0,
            "must be in (0, 180)",
        )?;
        require(
            "projection.ortho_half_height",
            p.ortho_half_height,
            p.ortho_half_height > 0.0,
            "must be > 0",
        )?;
        require("interaction.min_scale", i.min_scale, i.min_scale > 0.0, "must be > 0")?;
        require(
            "interaction.max_zoom",
            i.max_zoom,
            i.max_zoom.is_finite() && i.max_zoom >= i.min_scale,
            "must be finite and >= min_scale",
        )?;
        require(
            "interaction.zoom_in_factor",
            i.zoom_in_factor,
            i.zoom_in_factor > 0.0 && i.zoom_in_factor.is_finite(),
            "must be finite and > 0",
        )?;
        require(
            "interaction.zoom_out_factor",
            i.zoom_out_factor,
            i.zoom_out_factor > 0.0 && i.zoom_out_factor.is_finite(),
            "must be finite and > 0",
        )?;
        require(
            "interaction.height_slider_divisor",
            i.height_slider_divisor,
            i.height_slider_divisor > 0.0 && i.height_slider_divisor.is_finite(),
            "must be finite and > 0",
        )?;
        require(
            "interaction.drag_sensitivity",
            i.drag_sensitivity,
            i.drag_sensitivity.is_finite(),
            "must be finite",
        )
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        info!(path = %path.display(), "loaded viewer config");
        Ok(config)
    }
}

fn require(
    field: &'static str,
    value: f32,
    ok: bool,
    requirement: &'static str,
) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            value,
            requirement,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(ViewerConfig::from_toml_str("").unwrap(), ViewerConfig::default());
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = ViewerConfig::from_toml_str(
            r#"
            [interaction]
            drag_sensitivity = 0.02

            [view]
            eye = [1.0, 2.0, 3.0]
            "#,
        )
        .unwrap();
        assert_eq!(config.interaction.drag_sensitivity, 0.02);
        assert_eq!(config.interaction.zoom_in_factor, 1.1);
        assert_eq!(config.view.eye, [1.0, 2.0, 3.0]);
        assert_eq!(config.view.target, [0.0, 0.0, 0.0]);
        assert_eq!(config.projection, ProjectionConfig::default());
    }

    #[test]
    fn serialized_defaults_parse_back() {
        let text = toml::to_string(&ViewerConfig::default()).unwrap();
        assert_eq!(
            ViewerConfig::from_toml_str(&text).unwrap(),
            ViewerConfig::default()
        );
    }

    #[test]
    fn bad_types_are_reported() {
        let err = ViewerConfig::from_toml_str("[projection]\nnear = \"close\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    fn invalid_field(text: &str) -> &'static str {
        match ViewerConfig::from_toml_str(text) {
            Err(ConfigError::Invalid { field, .. }) => field,
            other => panic!("expected a rejected value, got {other:?}"),
        }
    }

    #[test]
    fn zero_divisor_is_rejected() {
        assert_eq!(
            invalid_field("[interaction]\nheight_slider_divisor = 0.0"),
            "interaction.height_slider_divisor"
        );
    }

    #[test]
    fn zero_floor_and_zero_zoom_factor_are_rejected() {
        assert_eq!(
            invalid_field("[interaction]\nmin_scale = 0.0\nzoom_out_factor = 0.0"),
            "interaction.min_scale"
        );
        assert_eq!(
            invalid_field("[interaction]\nzoom_out_factor = 0.0"),
            "interaction.zoom_out_factor"
        );
        assert_eq!(
            invalid_field("[interaction]\nzoom_in_factor = -1.1"),
            "interaction.zoom_in_factor"
        );
        assert_eq!(
            invalid_field("[interaction]\nmax_zoom = 0.0001"),
            "interaction.max_zoom"
        );
    }

    #[test]
    fn bad_projection_planes_are_rejected() {
        assert_eq!(invalid_field("[projection]\nnear = 0.0"), "projection.near");
        assert_eq!(
            invalid_field("[projection]\nnear = 5.0\nfar = 5.0"),
            "projection.far"
        );
        assert_eq!(
            invalid_field("[projection]\northo_half_height = 0.0"),
            "projection.ortho_half_height"
        );
        assert_eq!(
            invalid_field("[projection]\nfov_y_degrees = nan"),
            "projection.fov_y_degrees"
        );
    }

    #[test]
    fn defaults_validate() {
        assert!(ViewerConfig::default().validate().is_ok());
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = ViewerConfig::load(Path::new("/nonexistent/viewer.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
