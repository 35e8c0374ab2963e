//! Damped orbit controls.
//!
//! Input accumulates into pending spherical, pan and zoom deltas. Each
//! [`OrbitControls::update`] applies a `damping` fraction of the pending
//! rotation and pan, then decays what remains, so motion eases out after
//! the pointer stops.

use std::f32::consts::PI;

use glam::{Vec2, Vec3};

use super::core::Camera;
use crate::options::CameraOptions;

/// Keeps the polar angle away from the poles where the up vector flips.
const POLAR_EPSILON: f32 = 1e-4;

/// Pending motion below this magnitude is dropped.
const SETTLE_EPSILON: f32 = 1e-6;

/// Orbit state around a target, in three-style spherical coordinates
/// (polar angle from +Y, azimuth from +Z toward +X).
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    target: Vec3,
    radius: f32,
    theta: f32,
    phi: f32,

    pending_theta: f32,
    pending_phi: f32,
    pending_pan: Vec3,
    pending_scale: f32,

    damping: f32,
    rotate_speed: f32,
    pan_speed: f32,
    zoom_speed: f32,
    min_distance: f32,
    max_distance: f32,
}

impl OrbitControls {
    /// Seed the orbit so it reproduces the camera's current position.
    #[must_use]
    pub fn from_position(position: Vec3, options: &CameraOptions) -> Self {
        let target = Vec3::from_array(options.target);
        let offset = position - target;
        let radius = offset.length().max(options.min_distance);
        let theta = offset.x.atan2(offset.z);
        let phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        Self {
            target,
            radius,
            theta,
            phi: phi.clamp(POLAR_EPSILON, PI - POLAR_EPSILON),
            pending_theta: 0.0,
            pending_phi: 0.0,
            pending_pan: Vec3::ZERO,
            pending_scale: 1.0,
            damping: options.damping.clamp(0.0, 1.0),
            rotate_speed: options.rotate_speed,
            pan_speed: options.pan_speed,
            zoom_speed: options.zoom_speed,
            min_distance: options.min_distance,
            max_distance: options.max_distance,
        }
    }

    /// Orbit center.
    #[must_use]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Current distance from the target.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Camera position implied by the current spherical state.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        let sin_phi = self.phi.sin();
        self.target
            + self.radius
                * Vec3::new(
                    sin_phi * self.theta.sin(),
                    self.phi.cos(),
                    sin_phi * self.theta.cos(),
                )
    }

    /// Queue a rotation from a pointer drag of `delta` pixels.
    pub fn rotate(&mut self, delta: Vec2) {
        self.pending_theta -= delta.x * self.rotate_speed;
        self.pending_phi -= delta.y * self.rotate_speed;
    }

    /// Queue a pan from a pointer drag of `delta` pixels. One pixel moves
    /// the target by one pixel's worth of world space at target depth.
    pub fn pan(&mut self, delta: Vec2, camera: &Camera, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        let half_fov = (camera.fovy.to_radians() * 0.5).tan();
        let world_per_pixel = 2.0 * self.radius * half_fov / viewport_height;
        let scale = world_per_pixel * self.pan_speed;
        self.pending_pan +=
            camera.right() * (-delta.x * scale) + camera.up() * (delta.y * scale);
    }

    /// Queue a zoom step (positive = toward the target).
    pub fn zoom(&mut self, delta: f32) {
        self.pending_scale *= (1.0 - delta * self.zoom_speed).max(0.05);
    }

    /// Whether any queued motion remains.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.pending_theta.abs() < SETTLE_EPSILON
            && self.pending_phi.abs() < SETTLE_EPSILON
            && self.pending_pan.length_squared() < SETTLE_EPSILON
            && (self.pending_scale - 1.0).abs() < SETTLE_EPSILON
    }

    /// Apply one frame of damped motion and place `camera` on the orbit,
    /// facing the target.
    pub fn update(&mut self, camera: &mut Camera) {
        let step = self.damping;

        self.theta += self.pending_theta * step;
        self.phi = (self.phi + self.pending_phi * step)
            .clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        self.radius = (self.radius * self.pending_scale)
            .clamp(self.min_distance, self.max_distance);
        self.target += self.pending_pan * step;

        let decay = 1.0 - step;
        self.pending_theta *= decay;
        self.pending_phi *= decay;
        self.pending_pan *= decay;
        self.pending_scale = 1.0;
        if self.is_settled() {
            self.pending_theta = 0.0;
            self.pending_phi = 0.0;
            self.pending_pan = Vec3::ZERO;
        }

        camera.position = self.position();
        camera.look_at(self.target);
    }
}

#[cfg(test)]
mod tests {
    use glam::Quat;

    use super::*;

    fn camera() -> Camera {
        Camera {
            position: Vec3::new(-1.0, 1.0, 4.0),
            orientation: Quat::IDENTITY,
            aspect: 1.0,
            fovy: 10.0,
            znear: 0.1,
            zfar: 1000.0,
        }
    }

    #[test]
    fn seeding_reproduces_position() {
        let options = CameraOptions::default();
        let position = Vec3::new(-1.0, 1.0, 4.0);
        let orbit = OrbitControls::from_position(position, &options);
        assert!((orbit.position() - position).length() < 1e-4);
    }

    #[test]
    fn update_without_input_keeps_camera_and_faces_target() {
        let options = CameraOptions::default();
        let mut cam = camera();
        let mut orbit = OrbitControls::from_position(cam.position, &options);
        orbit.update(&mut cam);
        assert!((cam.position - Vec3::new(-1.0, 1.0, 4.0)).length() < 1e-4);
        let to_target = (orbit.target() - cam.position).normalize();
        assert!((cam.forward() - to_target).length() < 1e-4);
    }

    #[test]
    fn rotation_is_damped_and_preserves_radius() {
        let options = CameraOptions::default();
        let mut cam = camera();
        let mut orbit = OrbitControls::from_position(cam.position, &options);
        let radius = orbit.radius();
        orbit.rotate(Vec2::new(100.0, 0.0));

        let before = cam.position;
        orbit.update(&mut cam);
        let first_step = (cam.position - before).length();
        let before = cam.position;
        orbit.update(&mut cam);
        let second_step = (cam.position - before).length();

        assert!(first_step > 0.0);
        assert!(second_step < first_step);
        assert!((orbit.radius() - radius).abs() < 1e-4);
    }

    #[test]
    fn motion_settles_eventually() {
        let options = CameraOptions::default();
        let mut cam = camera();
        let mut orbit = OrbitControls::from_position(cam.position, &options);
        orbit.rotate(Vec2::new(30.0, -10.0));
        for _ in 0..2000 {
            orbit.update(&mut cam);
        }
        assert!(orbit.is_settled());
    }

    #[test]
    fn polar_angle_never_flips_over_the_pole() {
        let options = CameraOptions::default();
        let mut cam = camera();
        let mut orbit = OrbitControls::from_position(cam.position, &options);
        orbit.rotate(Vec2::new(0.0, 1.0e6));
        for _ in 0..100 {
            orbit.update(&mut cam);
        }
        assert!(cam.position.y > orbit.target().y);
        assert!(cam.position.is_finite());
    }

    #[test]
    fn zoom_is_clamped() {
        let options = CameraOptions::default();
        let mut cam = camera();
        let mut orbit = OrbitControls::from_position(cam.position, &options);
        for _ in 0..200 {
            orbit.zoom(10.0);
            orbit.update(&mut cam);
        }
        assert!((orbit.radius() - options.min_distance).abs() < 1e-5);
        for _ in 0..200 {
            orbit.zoom(-10.0);
            orbit.update(&mut cam);
        }
        assert!((orbit.radius() - options.max_distance).abs() < 1e-3);
    }

    #[test]
    fn pan_moves_target_sideways() {
        let options = CameraOptions::default();
        let mut cam = camera();
        let mut orbit = OrbitControls::from_position(cam.position, &options);
        orbit.update(&mut cam);
        let start = orbit.target();
        orbit.pan(Vec2::new(50.0, 0.0), &cam, 600.0);
        for _ in 0..500 {
            orbit.update(&mut cam);
        }
        let moved = orbit.target() - start;
        assert!(moved.length() > 0.0);
        // Dragging right moves the scene right, so the target moves left.
        assert!(moved.dot(cam.right()) < 0.0);
    }
}
