//! Keyframed camera path played once at startup.
//!
//! The path is split into equal-length segments between consecutive
//! keyframes. Within a segment the position is lerped, shaped by the
//! configured [`Easing`]. The path only moves the camera; the rig keeps it
//! aimed at the orbit target.

use glam::Vec3;

use crate::options::FlyThroughOptions;
use crate::util::easing::Easing;

/// Playback state of the intro path.
#[derive(Debug, Clone)]
pub struct FlyThrough {
    keyframes: Vec<Vec3>,
    /// Normalized progress over the whole path, 0..=1.
    progress: f32,
    /// Progress per second.
    speed: f32,
    easing: Easing,
}

impl FlyThrough {
    /// Build a path from options. A disabled path starts finished.
    #[must_use]
    pub fn new(options: &FlyThroughOptions) -> Self {
        Self {
            keyframes: options
                .keyframes
                .iter()
                .map(|k| Vec3::from_array(k.position))
                .collect(),
            progress: if options.enabled { 0.0 } else { 1.0 },
            speed: options.speed.max(0.0),
            easing: options.easing,
        }
    }

    /// Normalized progress, 0..=1.
    #[must_use]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Whether the path has reached its last keyframe.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.progress >= 1.0
    }

    /// Position at the current progress, `None` if the path has no keyframes.
    #[must_use]
    pub fn current(&self) -> Option<Vec3> {
        self.sample(self.progress)
    }

    /// Position at normalized progress `t`.
    #[must_use]
    pub fn sample(&self, t: f32) -> Option<Vec3> {
        let (first, rest) = self.keyframes.split_first()?;
        if rest.is_empty() {
            return Some(*first);
        }
        let segments = self.keyframes.len() - 1;
        let scaled = t.clamp(0.0, 1.0) * segments as f32;
        let index = (scaled.floor() as usize).min(segments - 1);
        let local = self.easing.evaluate(scaled - index as f32);
        Some(self.keyframes[index].lerp(self.keyframes[index + 1], local))
    }

    /// Advance by `dt` seconds and return the new position, or `None` once the
    /// path had already finished before this call.
    pub fn advance(&mut self, dt: f32) -> Option<Vec3> {
        if self.is_finished() {
            return None;
        }
        self.progress = (self.progress + self.speed * dt).min(1.0);
        self.current()
    }

    /// Rewind to the first keyframe.
    pub fn restart(&mut self) {
        self.progress = 0.0;
    }

    /// Jump to the last keyframe.
    pub fn skip(&mut self) -> Option<Vec3> {
        self.progress = 1.0;
        self.current()
    }
}
