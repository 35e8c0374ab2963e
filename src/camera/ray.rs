use glam::{Vec2, Vec3};

use super::core::Camera;

/// Half-line used for hover and click hit-testing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point in world space.
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    /// Ray from the camera through a point in normalized device
    /// coordinates (`x` right, `y` up, both in -1..=1).
    #[must_use]
    pub fn from_ndc(ndc: Vec2, camera: &Camera) -> Self {
        let inv = camera.build_matrix().inverse();
        let near = inv * ndc.extend(0.0).extend(1.0);
        let far = inv * ndc.extend(1.0).extend(1.0);
        let near = near.truncate() / near.w;
        let far = far.truncate() / far.w;
        Self {
            origin: camera.position,
            direction: (far - near).normalize_or(camera.forward()),
        }
    }

    /// Point at parameter `t` along the ray.
    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
