use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::PhysicalKey;

use super::event::{InputEvent, MouseButton};

/// Translate a winit window event into an [`InputEvent`]. Events the
/// engine does not consume (resize, redraw, focus, ...) map to `None`.
#[must_use]
pub fn translate_window_event(event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::CursorMoved { position, .. } => Some(InputEvent::CursorMoved {
            x: position.x as f32,
            y: position.y as f32,
        }),
        WindowEvent::CursorLeft { .. } => Some(InputEvent::CursorLeft),
        WindowEvent::MouseInput { button, state, .. } => Some(InputEvent::MouseButton {
            button: MouseButton::from(*button),
            pressed: *state == ElementState::Pressed,
        }),
        WindowEvent::MouseWheel { delta, .. } => {
            let delta = match delta {
                MouseScrollDelta::LineDelta(_, y) => *y,
                MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
            };
            Some(InputEvent::Scroll { delta })
        }
        WindowEvent::ModifiersChanged(modifiers) => Some(InputEvent::ModifiersChanged {
            shift: modifiers.state().shift_key(),
        }),
        WindowEvent::KeyboardInput { event, .. } => {
            if event.state != ElementState::Pressed || event.repeat {
                return None;
            }
            let PhysicalKey::Code(code) = event.physical_key else {
                return None;
            };
            Some(InputEvent::KeyPressed {
                key: format!("{code:?}"),
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use winit::dpi::PhysicalPosition;
    use winit::event::{DeviceId, TouchPhase};

    use super::*;

    #[test]
    fn wheel_lines_pass_through() {
        let event = WindowEvent::MouseWheel {
            device_id: unsafe { DeviceId::dummy() },
            delta: MouseScrollDelta::LineDelta(0.0, 2.0),
            phase: TouchPhase::Moved,
        };
        assert_eq!(
            translate_window_event(&event),
            Some(InputEvent::Scroll { delta: 2.0 })
        );
    }

    #[test]
    fn cursor_positions_become_pixels() {
        let event = WindowEvent::CursorMoved {
            device_id: unsafe { DeviceId::dummy() },
            position: PhysicalPosition::new(12.5, 40.0),
        };
        assert_eq!(
            translate_window_event(&event),
            Some(InputEvent::CursorMoved { x: 12.5, y: 40.0 })
        );
    }

    #[test]
    fn unrelated_events_are_dropped() {
        assert_eq!(translate_window_event(&WindowEvent::RedrawRequested), None);
    }
}
