//! Shared utilities: frame timing, easing curves and color conversion.

pub mod color;
pub mod easing;
pub mod frame_timing;
