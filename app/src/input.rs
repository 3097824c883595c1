// egui events -> session input events
use egui::{Event, Key, Rect};
use heightmap::{InputEvent, KeyCommand, PointerButton};

pub fn pointer_button(button: egui::PointerButton) -> PointerButton {
    match button {
        egui::PointerButton::Primary => PointerButton::Primary,
        egui::PointerButton::Secondary => PointerButton::Secondary,
        egui::PointerButton::Middle => PointerButton::Middle,
        _ => PointerButton::Other,
    }
}

pub fn key_command(key: Key) -> Option<KeyCommand> {
    match key {
        Key::R => Some(KeyCommand::ResetView),
        Key::P => Some(KeyCommand::ToggleProjection),
        _ => None,
    }
}

// egui reports scrolling up as positive y; the session wants the DOM sign
pub fn wheel_event(egui_delta_y: f32) -> Option<InputEvent> {
    (egui_delta_y != 0.0).then_some(InputEvent::Wheel {
        delta_y: -egui_delta_y,
    })
}

// Presses only count inside the view; moves and releases are tracked
// window-wide so a drag that wanders off the view still ends cleanly.
pub fn translate_events(
    events: &[Event],
    view: Rect,
    hovered: bool,
    keyboard_free: bool,
) -> Vec<InputEvent> {
    let mut out = Vec::new();
    for event in events {
        match event {
            Event::PointerButton {
                pos,
                button,
                pressed: true,
                ..
            } if view.contains(*pos) => {
                let local = *pos - view.min;
                out.push(InputEvent::PointerDown {
                    x: local.x,
                    y: local.y,
                    button: pointer_button(*button),
                });
            }
            Event::PointerButton { pressed: false, .. } => out.push(InputEvent::PointerUp),
            Event::PointerMoved(pos) => {
                let local = *pos - view.min;
                out.push(InputEvent::PointerMove {
                    x: local.x,
                    y: local.y,
                });
            }
            Event::PointerGone => out.push(InputEvent::PointerLeave),
            Event::MouseWheel { delta, .. } if hovered => out.extend(wheel_event(delta.y)),
            Event::Key {
                key, pressed: true, ..
            } if keyboard_free => {
                out.extend(key_command(*key).map(InputEvent::Key));
            }
            _ => {}
        }
    }
    out
}
