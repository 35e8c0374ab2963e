//! The engine's complete interactive vocabulary.
//!
//! Every user-facing operation, whether triggered by a key press, a mouse
//! gesture or a programmatic call, is represented as a [`SceneCommand`].
//! Consumers construct commands and pass them to
//! [`SceneEngine::execute`](super::SceneEngine::execute). What the engine
//! wants the host to do in return comes back as a [`SceneEvent`].

use glam::Vec2;

pub use crate::picking::CursorIcon;

// ── Commands ─────────────────────────────────────────────────────────────

/// A discrete or parameterized operation the engine can perform.
///
/// ```ignore
/// engine.execute(SceneCommand::SkipFlyThrough);
/// engine.execute(SceneCommand::Zoom { delta: 1.0 });
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneCommand {
    // ── Camera ──────────────────────────────────────────────────────
    /// Rotate the orbit by `delta` pixels of mouse movement.
    RotateCamera {
        /// Horizontal and vertical drag delta.
        delta: Vec2,
    },

    /// Pan the orbit target by `delta` pixels of mouse movement.
    PanCamera {
        /// Horizontal and vertical drag delta.
        delta: Vec2,
    },

    /// Zoom the orbit (positive = zoom in, negative = zoom out).
    Zoom {
        /// Scroll amount.
        delta: f32,
    },

    /// Play the intro camera path from the start.
    RestartFlyThrough,

    /// Jump to the end of the intro camera path and hand over to the
    /// orbit controls.
    SkipFlyThrough,

    // ── Picking ─────────────────────────────────────────────────────
    /// Hit-test under the cursor and move the hover highlight.
    Hover {
        /// Cursor in normalized device coordinates.
        ndc: Vec2,
    },

    /// Drop the hover highlight (cursor left the surface).
    ClearHover,

    /// Hit-test under the cursor and follow the hit model's link.
    Click {
        /// Cursor in normalized device coordinates.
        ndc: Vec2,
    },

    /// Turn hover highlighting on or off.
    ToggleHover,
}

// ── Events ───────────────────────────────────────────────────────────────

/// Something the host should act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneEvent {
    /// Open this page (the clicked model's link).
    Navigate(String),
    /// Show a different mouse cursor.
    CursorChanged(CursorIcon),
}
