//! Converts raw platform events into engine commands.
//!
//! The `InputProcessor` owns all transient input state (cursor position,
//! viewport size, drag detection, modifier keys) and the key-binding map.
//! It is the only thing that sits between raw window events and the
//! engine's [`execute`](crate::engine::SceneEngine::execute) method.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::event::{InputEvent, MouseButton};
use crate::engine::command::SceneCommand;

/// Cursor travel (physical pixels) after which a press becomes a drag.
const DRAG_THRESHOLD: f32 = 3.0;

/// Maps physical key strings to [`SceneCommand`] variants.
///
/// Key strings use the `winit::keyboard::KeyCode` debug format:
/// `"KeyR"`, `"Space"`, `"Escape"`, etc.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeyBindings {
    /// Forward map: key string → command tag.
    bindings: HashMap<String, KeyCommandTag>,
}

/// Serializable tag for the key-bindable subset of [`SceneCommand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCommandTag {
    /// Play the intro camera path from the start.
    RestartFlyThrough,
    /// Jump to the end of the intro camera path.
    SkipFlyThrough,
    /// Turn hover highlighting on or off.
    ToggleHover,
}

impl KeyCommandTag {
    fn to_command(self) -> SceneCommand {
        match self {
            Self::RestartFlyThrough => SceneCommand::RestartFlyThrough,
            Self::SkipFlyThrough => SceneCommand::SkipFlyThrough,
            Self::ToggleHover => SceneCommand::ToggleHover,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let bindings = HashMap::from([
            ("KeyR".into(), KeyCommandTag::RestartFlyThrough),
            ("Space".into(), KeyCommandTag::SkipFlyThrough),
            ("KeyH".into(), KeyCommandTag::ToggleHover),
        ]);
        Self { bindings }
    }
}

impl KeyBindings {
    /// Look up the command for a physical key string.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<SceneCommand> {
        self.bindings.get(key).map(|tag| tag.to_command())
    }

    /// Bind `key` to `tag`, replacing any previous binding.
    pub fn bind(&mut self, key: impl Into<String>, tag: KeyCommandTag) {
        let _ = self.bindings.insert(key.into(), tag);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// InputProcessor
// ─────────────────────────────────────────────────────────────────────────────

/// Converts raw window events into [`SceneCommand`]s.
///
/// # Usage
///
/// ```ignore
/// if let Some(cmd) = input_processor.handle_event(event) {
///     engine.execute(cmd);
/// }
/// ```
pub struct InputProcessor {
    /// Last cursor position in physical pixels.
    cursor: Option<Vec2>,
    /// Surface size in physical pixels.
    viewport: Vec2,
    /// Button held and the cursor position when it went down.
    pressed: Option<(MouseButton, Vec2)>,
    /// Whether the held button has moved past the drag threshold.
    dragging: bool,
    /// Whether the shift modifier is currently held.
    shift_pressed: bool,
    /// Key string → command mapping.
    key_bindings: KeyBindings,
}

impl InputProcessor {
    /// Create a new processor with default key bindings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cursor: None,
            viewport: Vec2::ONE,
            pressed: None,
            dragging: false,
            shift_pressed: false,
            key_bindings: KeyBindings::default(),
        }
    }

    /// Create a processor with custom key bindings.
    #[must_use]
    pub fn with_key_bindings(key_bindings: KeyBindings) -> Self {
        Self {
            key_bindings,
            ..Self::new()
        }
    }

    /// Record the surface size used for NDC conversion.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = Vec2::new(width.max(1) as f32, height.max(1) as f32);
    }

    /// Current cursor position in physical pixels.
    #[must_use]
    pub fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }

    /// Cursor in normalized device coordinates.
    #[must_use]
    pub fn cursor_ndc(&self) -> Option<Vec2> {
        self.cursor.map(|p| self.to_ndc(p))
    }

    /// Whether a button is held and has moved past the drag threshold.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Whether the shift modifier is held.
    #[must_use]
    pub fn shift_pressed(&self) -> bool {
        self.shift_pressed
    }

    /// Read-only access to the key bindings.
    #[must_use]
    pub fn key_bindings(&self) -> &KeyBindings {
        &self.key_bindings
    }

    /// Mutable access to the key bindings for reconfiguration.
    pub fn key_bindings_mut(&mut self) -> &mut KeyBindings {
        &mut self.key_bindings
    }

    /// Pixel position to NDC: `x` right and `y` up, both in -1..=1.
    fn to_ndc(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x / self.viewport.x * 2.0 - 1.0,
            -(p.y / self.viewport.y * 2.0 - 1.0),
        )
    }

    /// Process a raw input event and return zero or one commands.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<SceneCommand> {
        match event {
            InputEvent::CursorMoved { x, y } => self.handle_cursor_moved(Vec2::new(x, y)),
            InputEvent::CursorLeft => {
                self.cursor = None;
                self.pressed = None;
                self.dragging = false;
                Some(SceneCommand::ClearHover)
            }
            InputEvent::MouseButton { button, pressed } => {
                self.handle_mouse_button(button, pressed)
            }
            InputEvent::Scroll { delta } => Some(SceneCommand::Zoom { delta }),
            InputEvent::ModifiersChanged { shift } => {
                self.shift_pressed = shift;
                None
            }
            InputEvent::KeyPressed { key } => self.key_bindings.lookup(&key),
        }
    }

    /// Cursor moved: orbit while a button is held, hover otherwise.
    fn handle_cursor_moved(&mut self, position: Vec2) -> Option<SceneCommand> {
        let previous = self.cursor.replace(position);

        let Some((button, origin)) = self.pressed else {
            return Some(SceneCommand::Hover {
                ndc: self.to_ndc(position),
            });
        };

        if position.distance(origin) > DRAG_THRESHOLD {
            self.dragging = true;
        }
        let delta = position - previous.unwrap_or(position);
        if delta == Vec2::ZERO {
            return None;
        }
        match button {
            MouseButton::Left if !self.shift_pressed => Some(SceneCommand::RotateCamera { delta }),
            MouseButton::Left | MouseButton::Right => Some(SceneCommand::PanCamera { delta }),
            MouseButton::Middle => Some(SceneCommand::Zoom {
                delta: -delta.y * 0.1,
            }),
        }
    }

    /// Mouse button press/release: a left release that did not drag is a
    /// click at the cursor.
    fn handle_mouse_button(&mut self, button: MouseButton, pressed: bool) -> Option<SceneCommand> {
        if pressed {
            if self.pressed.is_none() {
                let origin = self.cursor.unwrap_or(Vec2::ZERO);
                self.pressed = Some((button, origin));
                self.dragging = false;
            }
            return None;
        }

        let Some((held, _)) = self.pressed else {
            return None;
        };
        if held != button {
            return None;
        }
        self.pressed = None;
        let was_drag = std::mem::take(&mut self.dragging);
        if button != MouseButton::Left || was_drag {
            return None;
        }
        self.cursor_ndc().map(|ndc| SceneCommand::Click { ndc })
    }
}

impl Default for InputProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processor() -> InputProcessor {
        let mut p = InputProcessor::new();
        p.set_viewport(800, 600);
        p
    }

    fn move_to(p: &mut InputProcessor, x: f32, y: f32) -> Option<SceneCommand> {
        p.handle_event(InputEvent::CursorMoved { x, y })
    }

    fn button(p: &mut InputProcessor, button: MouseButton, pressed: bool) -> Option<SceneCommand> {
        p.handle_event(InputEvent::MouseButton { button, pressed })
    }

    #[test]
    fn hover_reports_ndc() {
        let mut p = processor();
        assert_eq!(
            move_to(&mut p, 400.0, 300.0),
            Some(SceneCommand::Hover { ndc: Vec2::ZERO })
        );
        assert_eq!(
            move_to(&mut p, 0.0, 0.0),
            Some(SceneCommand::Hover {
                ndc: Vec2::new(-1.0, 1.0)
            })
        );
        assert_eq!(
            move_to(&mut p, 800.0, 600.0),
            Some(SceneCommand::Hover {
                ndc: Vec2::new(1.0, -1.0)
            })
        );
    }

    #[test]
    fn press_and_release_in_place_clicks() {
        let mut p = processor();
        let _ = move_to(&mut p, 200.0, 150.0);
        assert_eq!(button(&mut p, MouseButton::Left, true), None);
        assert_eq!(
            button(&mut p, MouseButton::Left, false),
            Some(SceneCommand::Click {
                ndc: Vec2::new(-0.5, 0.5)
            })
        );
    }

    #[test]
    fn small_jitter_still_clicks() {
        let mut p = processor();
        let _ = move_to(&mut p, 200.0, 150.0);
        let _ = button(&mut p, MouseButton::Left, true);
        let _ = move_to(&mut p, 201.0, 151.0);
        assert!(matches!(
            button(&mut p, MouseButton::Left, false),
            Some(SceneCommand::Click { .. })
        ));
    }

    #[test]
    fn drag_rotates_and_suppresses_click() {
        let mut p = processor();
        let _ = move_to(&mut p, 100.0, 100.0);
        let _ = button(&mut p, MouseButton::Left, true);
        assert_eq!(
            move_to(&mut p, 120.0, 90.0),
            Some(SceneCommand::RotateCamera {
                delta: Vec2::new(20.0, -10.0)
            })
        );
        assert!(p.is_dragging());
        assert_eq!(button(&mut p, MouseButton::Left, false), None);
        assert!(!p.is_dragging());
    }

    #[test]
    fn shift_or_right_drag_pans() {
        let mut p = processor();
        let _ = move_to(&mut p, 100.0, 100.0);
        let _ = button(&mut p, MouseButton::Right, true);
        assert_eq!(
            move_to(&mut p, 110.0, 100.0),
            Some(SceneCommand::PanCamera {
                delta: Vec2::new(10.0, 0.0)
            })
        );
        assert_eq!(button(&mut p, MouseButton::Right, false), None);

        let _ = p.handle_event(InputEvent::ModifiersChanged { shift: true });
        let _ = button(&mut p, MouseButton::Left, true);
        assert!(matches!(
            move_to(&mut p, 100.0, 120.0),
            Some(SceneCommand::PanCamera { .. })
        ));
    }

    #[test]
    fn default_keys_map_to_commands() {
        let mut p = processor();
        let press = |key: &str| InputEvent::KeyPressed { key: key.into() };
        assert_eq!(p.handle_event(press("KeyR")), Some(SceneCommand::RestartFlyThrough));
        assert_eq!(p.handle_event(press("Space")), Some(SceneCommand::SkipFlyThrough));
        assert_eq!(p.handle_event(press("KeyH")), Some(SceneCommand::ToggleHover));
        assert_eq!(p.handle_event(press("KeyQ")), None);
    }

    #[test]
    fn rebinding_a_key() {
        let mut p = processor();
        p.key_bindings_mut().bind("Enter", KeyCommandTag::SkipFlyThrough);
        assert_eq!(
            p.handle_event(InputEvent::KeyPressed { key: "Enter".into() }),
            Some(SceneCommand::SkipFlyThrough)
        );
    }

    #[test]
    fn leaving_the_window_clears_hover() {
        let mut p = processor();
        let _ = move_to(&mut p, 10.0, 10.0);
        assert_eq!(p.handle_event(InputEvent::CursorLeft), Some(SceneCommand::ClearHover));
        assert_eq!(p.cursor(), None);
    }

    #[test]
    fn scroll_zooms() {
        let mut p = processor();
        assert_eq!(
            p.handle_event(InputEvent::Scroll { delta: 1.5 }),
            Some(SceneCommand::Zoom { delta: 1.5 })
        );
    }
}
