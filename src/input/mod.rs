//! Input handling: event types, the window-event translation shared by
//! the native and browser front ends, and the input processor that turns
//! raw events into engine commands.

/// Platform-agnostic input events.
pub mod event;
/// Converts raw events into engine commands.
pub mod processor;
/// winit `WindowEvent` translation.
#[cfg(any(feature = "viewer", feature = "web"))]
pub mod window_events;

pub use event::{InputEvent, MouseButton};
pub use processor::{InputProcessor, KeyBindings, KeyCommandTag};
#[cfg(any(feature = "viewer", feature = "web"))]
pub use window_events::translate_window_event;
