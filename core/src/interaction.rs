// Input -> camera state machine.
//
// Idle/dragging lives in `PointerDragState::active`; the button that started
// the drag picks rotate (primary) or pan (secondary). Every transition is a
// pure function of (state, event), so it can be tested without a window or GPU.
use tracing::{debug, warn};

use crate::camera::{CameraState, ProjectionMode};
use crate::config::InteractionConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    // restore the default camera, keeping the projection mode
    ResetView,
    ToggleProjection,
}

// Coordinates are surface-relative pixels, y growing downwards.
// `Wheel::delta_y` uses the DOM sign: negative scrolls up (zoom in).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f32, y: f32, button: PointerButton },
    PointerMove { x: f32, y: f32 },
    PointerUp,
    PointerLeave,
    Wheel { delta_y: f32 },
    HeightSlider(f32),
    Projection(ProjectionMode),
    Key(KeyCommand),
}

// Scoped to one press-move-release sequence
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerDragState {
    pub active: bool,
    pub last_x: f32,
    pub last_y: f32,
    pub primary_button: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InteractionState {
    pub camera: CameraState,
    pub drag: PointerDragState,
}

impl InteractionState {
    pub fn handle(&mut self, event: InputEvent, config: &InteractionConfig) {
        *self = transition(*self, event, config);
    }
}

pub fn transition(
    state: InteractionState,
    event: InputEvent,
    config: &InteractionConfig,
) -> InteractionState {
    let InteractionState {
        mut camera,
        mut drag,
    } = state;

    match event {
        InputEvent::PointerDown { x, y, button } => {
            let primary = match button {
                PointerButton::Primary => true,
                PointerButton::Secondary => false,
                PointerButton::Middle | PointerButton::Other => return state,
            };
            if !x.is_finite() || !y.is_finite() {
                warn!(x, y, "ignoring press at non-finite position");
                return state;
            }
            drag = PointerDragState {
                active: true,
                last_x: x,
                last_y: y,
                primary_button: primary,
            };
            let mode = if primary { "rotate" } else { "pan" };
            debug!(x, y, mode, "drag start");
        }

        InputEvent::PointerMove { x, y } => {
            if !drag.active || !x.is_finite() || !y.is_finite() {
                return state;
            }
            // incremental: relative to the previous move, not the press point
            let dx = x - drag.last_x;
            let dy = y - drag.last_y;
            let k = config.drag_sensitivity;
            if drag.primary_button {
                camera.y_rotation += dx * k;
                camera.z_rotation += dy * k;
            } else {
                camera.pan_x += dx * k;
                // screen y grows down, world y grows up
                camera.pan_y -= dy * k;
            }
            drag.last_x = x;
            drag.last_y = y;
        }

        InputEvent::PointerUp | InputEvent::PointerLeave => {
            if drag.active {
                debug!("drag end");
            }
            drag = PointerDragState::default();
        }

        InputEvent::Wheel { delta_y } => {
            // in then out does not land back on 1.0
            let factor = if delta_y < 0.0 {
                config.zoom_in_factor
            } else if delta_y > 0.0 {
                config.zoom_out_factor
            } else {
                return state;
            };
            camera.zoom_factor = clamp_zoom(camera.zoom_factor * factor, config);
        }

        InputEvent::HeightSlider(value) => {
            if !value.is_finite() {
                warn!(value, "ignoring non-finite height slider value");
                return state;
            }
            camera.height_scale = floor_scale(value / config.height_slider_divisor, config);
        }

        InputEvent::Projection(mode) => {
            if mode != camera.projection_mode {
                debug!(%mode, "projection changed");
            }
            camera.projection_mode = mode;
        }

        InputEvent::Key(KeyCommand::ResetView) => {
            camera = CameraState {
                projection_mode: camera.projection_mode,
                ..CameraState::default()
            };
            drag = PointerDragState::default();
        }

        InputEvent::Key(KeyCommand::ToggleProjection) => {
            camera.projection_mode = camera.projection_mode.toggled();
            debug!(mode = %camera.projection_mode, "projection toggled");
        }
    }

    InteractionState { camera, drag }
}

fn floor_scale(value: f32, config: &InteractionConfig) -> f32 {
    if value < config.min_scale {
        warn!(value, floor = config.min_scale, "scale clamped");
        config.min_scale
    } else {
        value
    }
}

fn clamp_zoom(value: f32, config: &InteractionConfig) -> f32 {
    floor_scale(value, config).min(config.max_zoom)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(events: &[InputEvent]) -> InteractionState {
        let config = InteractionConfig::default();
        events
            .iter()
            .fold(InteractionState::default(), |s, e| transition(s, *e, &config))
    }

    #[test]
    fn primary_drag_rotates() {
        let k = InteractionConfig::default().drag_sensitivity;
        let s = run(&[
            InputEvent::PointerDown {
                x: 10.0,
                y: 10.0,
                button: PointerButton::Primary,
            },
            InputEvent::PointerMove { x: 15.0, y: 18.0 },
            InputEvent::PointerUp,
        ]);
        assert_eq!(s.camera.y_rotation, 5.0 * k);
        assert_eq!(s.camera.z_rotation, 8.0 * k);
        assert_eq!(s.camera.pan_x, 0.0);
        assert!(!s.drag.active);
    }

    #[test]
    fn release_while_idle_is_noop() {
        let idle = InteractionState::default();
        let config = InteractionConfig::default();
        assert_eq!(transition(idle, InputEvent::PointerUp, &config), idle);
        assert_eq!(transition(idle, InputEvent::PointerLeave, &config), idle);
    }

    #[test]
    fn secondary_drag_pans_with_inverted_y() {
        let k = InteractionConfig::default().drag_sensitivity;
        let s = run(&[
            InputEvent::PointerDown {
                x: 0.0,
                y: 0.0,
                button: PointerButton::Secondary,
            },
            InputEvent::PointerMove { x: 4.0, y: 6.0 },
        ]);
        assert_eq!(s.camera.pan_x, 4.0 * k);
        assert_eq!(s.camera.pan_y, -(6.0 * k));
        assert_eq!(s.camera.y_rotation, 0.0);
        assert!(s.drag.active);
        assert!(!s.drag.primary_button);
    }

    #[test]
    fn moves_accumulate_from_last_position() {
        let k = InteractionConfig::default().drag_sensitivity;
        let s = run(&[
            InputEvent::PointerDown {
                x: 0.0,
                y: 0.0,
                button: PointerButton::Primary,
            },
            InputEvent::PointerMove { x: 2.0, y: 0.0 },
            InputEvent::PointerMove { x: 5.0, y: 0.0 },
        ]);
        assert_eq!(s.camera.y_rotation, 2.0 * k + 3.0 * k);
        assert_eq!(s.drag.last_x, 5.0);
    }

    #[test]
    fn moving_without_press_changes_nothing() {
        let s = run(&[InputEvent::PointerMove { x: 50.0, y: 50.0 }]);
        assert_eq!(s, InteractionState::default());
    }

    #[test]
    fn leave_ends_drag() {
        let s = run(&[
            InputEvent::PointerDown {
                x: 1.0,
                y: 1.0,
                button: PointerButton::Primary,
            },
            InputEvent::PointerLeave,
            InputEvent::PointerMove { x: 100.0, y: 100.0 },
        ]);
        assert!(!s.drag.active);
        assert_eq!(s.camera.y_rotation, 0.0);
    }

    #[test]
    fn non_finite_press_is_ignored() {
        let s = run(&[
            InputEvent::PointerDown {
                x: f32::NAN,
                y: 10.0,
                button: PointerButton::Primary,
            },
            InputEvent::PointerMove { x: 15.0, y: 18.0 },
        ]);
        assert!(!s.drag.active);
        assert_eq!(s.camera, CameraState::default());

        // an earlier drag is not replaced by a bad press
        let s = run(&[
            InputEvent::PointerDown {
                x: 10.0,
                y: 10.0,
                button: PointerButton::Primary,
            },
            InputEvent::PointerDown {
                x: 0.0,
                y: f32::INFINITY,
                button: PointerButton::Secondary,
            },
            InputEvent::PointerMove { x: 15.0, y: 18.0 },
        ]);
        assert!(s.camera.y_rotation.is_finite() && s.camera.z_rotation.is_finite());
        assert_eq!(s.camera.pan_x, 0.0);
    }

    #[test]
    fn middle_button_does_not_drag() {
        let s = run(&[InputEvent::PointerDown {
            x: 1.0,
            y: 1.0,
            button: PointerButton::Middle,
        }]);
        assert!(!s.drag.active);
    }

    #[test]
    fn wheel_is_asymmetric() {
        let s = run(&[
            InputEvent::Wheel { delta_y: -120.0 },
            InputEvent::Wheel { delta_y: 120.0 },
        ]);
        assert!((s.camera.zoom_factor - 0.99).abs() < 1e-6);
        assert_ne!(s.camera.zoom_factor, 1.0);
    }

    #[test]
    fn zero_wheel_delta_is_ignored() {
        let s = run(&[InputEvent::Wheel { delta_y: 0.0 }]);
        assert_eq!(s.camera.zoom_factor, 1.0);
    }

    #[test]
    fn zoom_never_reaches_zero() {
        let events = vec![InputEvent::Wheel { delta_y: 1.0 }; 2000];
        let s = run(&events);
        assert!(s.camera.zoom_factor >= InteractionConfig::default().min_scale);
        assert!(s.camera.zoom_factor > 0.0);
    }

    #[test]
    fn zoom_stays_finite() {
        let events = vec![InputEvent::Wheel { delta_y: -1.0 }; 20_000];
        let s = run(&events);
        assert!(s.camera.zoom_factor.is_finite());
        assert_eq!(s.camera.zoom_factor, InteractionConfig::default().max_zoom);
    }

    #[test]
    fn height_slider_sets_scale() {
        let s = run(&[InputEvent::HeightSlider(75.0)]);
        assert_eq!(s.camera.height_scale, 1.5);

        let s = run(&[InputEvent::HeightSlider(0.0)]);
        assert_eq!(s.camera.height_scale, InteractionConfig::default().min_scale);

        let s = run(&[InputEvent::HeightSlider(f32::NAN)]);
        assert_eq!(s.camera.height_scale, 1.0);
    }

    #[test]
    fn projection_and_reset() {
        let s = run(&[
            InputEvent::Projection(ProjectionMode::Orthographic),
            InputEvent::Wheel { delta_y: -1.0 },
            InputEvent::PointerDown {
                x: 0.0,
                y: 0.0,
                button: PointerButton::Primary,
            },
            InputEvent::PointerMove { x: 30.0, y: 0.0 },
            InputEvent::Key(KeyCommand::ResetView),
        ]);
        assert_eq!(s.camera.projection_mode, ProjectionMode::Orthographic);
        assert_eq!(s.camera.zoom_factor, 1.0);
        assert_eq!(s.camera.y_rotation, 0.0);
        assert!(!s.drag.active);

        let s = run(&[InputEvent::Key(KeyCommand::ToggleProjection)]);
        assert_eq!(s.camera.projection_mode, ProjectionMode::Orthographic);
    }
}
