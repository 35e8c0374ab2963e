//! CPU-side camera state: a fly-through that hands over to orbit controls.

use glam::{Quat, Vec2, Vec3};

use super::core::Camera;
use super::fly_through::FlyThrough;
use super::orbit::OrbitControls;
use super::ray::Ray;
use crate::options::{CameraOptions, FlyThroughOptions};

/// Which system currently owns the camera pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    /// The intro path is playing; orbit input is ignored.
    FlyThrough,
    /// Damped orbit controls.
    Orbit,
}

/// Camera plus the two systems that can drive it.
#[derive(Debug, Clone)]
pub struct CameraRig {
    /// The camera being driven.
    pub camera: Camera,
    fly_through: FlyThrough,
    orbit: OrbitControls,
    options: CameraOptions,
    viewport: Vec2,
}

impl CameraRig {
    /// Place the camera at the start of the fly-through (or at its end when
    /// the fly-through is disabled).
    #[must_use]
    pub fn new(
        camera_options: &CameraOptions,
        fly_options: &FlyThroughOptions,
        viewport: (u32, u32),
    ) -> Self {
        let viewport = Vec2::new(viewport.0.max(1) as f32, viewport.1.max(1) as f32);
        let fly_through = FlyThrough::new(fly_options);
        let target = Vec3::from_array(camera_options.target);

        let mut camera = Camera {
            position: target + Vec3::new(0.0, 0.0, 5.0),
            orientation: Quat::IDENTITY,
            aspect: viewport.x / viewport.y,
            fovy: camera_options.fovy,
            znear: camera_options.znear,
            zfar: camera_options.zfar,
        };
        if let Some(position) = fly_through.current() {
            camera.position = position;
        }
        camera.look_at(target);
        let orbit = OrbitControls::from_position(camera.position, camera_options);

        Self {
            camera,
            fly_through,
            orbit,
            options: camera_options.clone(),
            viewport,
        }
    }

    /// Which system owns the camera right now.
    #[must_use]
    pub fn mode(&self) -> CameraMode {
        if self.fly_through.is_finished() {
            CameraMode::Orbit
        } else {
            CameraMode::FlyThrough
        }
    }

    /// Fly-through progress, 0..=1.
    #[must_use]
    pub fn fly_through_progress(&self) -> f32 {
        self.fly_through.progress()
    }

    /// Advance one frame.
    pub fn update(&mut self, dt: f32) {
        if let Some(position) = self.fly_through.advance(dt) {
            self.fly_to(position);
            if self.fly_through.is_finished() {
                self.hand_over_to_orbit();
            }
            return;
        }
        self.orbit.update(&mut self.camera);
    }

    /// Replay the fly-through from its first keyframe.
    pub fn restart_fly_through(&mut self) {
        self.fly_through.restart();
        if let Some(position) = self.fly_through.current() {
            self.fly_to(position);
        }
    }

    /// Jump to the end of the fly-through and give control to the orbit.
    pub fn skip_fly_through(&mut self) {
        if self.mode() == CameraMode::Orbit {
            return;
        }
        if let Some(position) = self.fly_through.skip() {
            self.fly_to(position);
        }
        self.hand_over_to_orbit();
    }

    /// Queue an orbit rotation. Returns `false` while the fly-through owns
    /// the camera.
    pub fn rotate(&mut self, delta: Vec2) -> bool {
        if self.mode() != CameraMode::Orbit {
            return false;
        }
        self.orbit.rotate(delta);
        true
    }

    /// Queue an orbit pan. Returns `false` while the fly-through owns the
    /// camera.
    pub fn pan(&mut self, delta: Vec2) -> bool {
        if self.mode() != CameraMode::Orbit {
            return false;
        }
        self.orbit.pan(delta, &self.camera, self.viewport.y);
        true
    }

    /// Queue an orbit zoom. Returns `false` while the fly-through owns the
    /// camera.
    pub fn zoom(&mut self, delta: f32) -> bool {
        if self.mode() != CameraMode::Orbit {
            return false;
        }
        self.orbit.zoom(delta);
        true
    }

    /// Track a new viewport size. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.viewport = Vec2::new(width as f32, height as f32);
        self.camera.aspect = self.viewport.x / self.viewport.y;
    }

    /// Apply new camera options, keeping the current camera position.
    pub fn set_options(&mut self, options: &CameraOptions) {
        self.camera.fovy = options.fovy;
        self.camera.znear = options.znear;
        self.camera.zfar = options.zfar;
        self.options = options.clone();
        self.orbit = OrbitControls::from_position(self.camera.position, options);
    }

    /// Picking ray through a point in normalized device coordinates.
    #[must_use]
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        Ray::from_ndc(ndc, &self.camera)
    }

    /// Move along the path while facing the orbit target.
    fn fly_to(&mut self, position: Vec3) {
        self.camera.position = position;
        self.camera.look_at(self.orbit.target());
    }

    fn hand_over_to_orbit(&mut self) {
        self.orbit =
            OrbitControls::from_position(self.camera.position, &self.options);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rig() -> CameraRig {
        CameraRig::new(
            &CameraOptions::default(),
            &FlyThroughOptions::default(),
            (800, 600),
        )
    }

    #[test]
    fn starts_flying_from_first_keyframe() {
        let rig = rig();
        assert_eq!(rig.mode(), CameraMode::FlyThrough);
        assert!(
            (rig.camera.position - Vec3::new(24.68, 11.13, -20.68)).length()
                < 1e-4
        );
        assert!((rig.camera.aspect - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn fly_through_always_faces_the_target() {
        let mut rig = rig();
        let target = Vec3::new(0.0, 0.75, 0.0);
        let mut frames = 0;
        loop {
            let to_target = (target - rig.camera.position).normalize();
            let angle = rig.camera.forward().angle_between(to_target);
            assert!(
                angle.to_degrees() < 0.5,
                "frame {frames}: {} deg off target",
                angle.to_degrees()
            );
            if rig.mode() == CameraMode::Orbit {
                break;
            }
            rig.update(1.0 / 60.0);
            frames += 1;
            assert!(frames < 1000, "fly-through never finished");
        }
    }

    #[test]
    fn restart_and_skip_face_the_target() {
        let target = Vec3::new(0.0, 0.75, 0.0);
        let mut rig = rig();
        for _ in 0..80 {
            rig.update(1.0 / 60.0);
        }
        rig.skip_fly_through();
        let to_target = (target - rig.camera.position).normalize();
        assert!((rig.camera.forward() - to_target).length() < 1e-4);

        rig.restart_fly_through();
        let to_target = (target - rig.camera.position).normalize();
        assert!((rig.camera.forward() - to_target).length() < 1e-4);
    }

    #[test]
    fn orbit_input_is_ignored_while_flying() {
        let mut rig = rig();
        assert!(!rig.rotate(Vec2::new(10.0, 0.0)));
        assert!(!rig.pan(Vec2::new(10.0, 0.0)));
        assert!(!rig.zoom(1.0));
    }

    #[test]
    fn hands_over_to_orbit_at_path_end() {
        let mut rig = rig();
        let mut frames = 0;
        while rig.mode() == CameraMode::FlyThrough {
            rig.update(1.0 / 60.0);
            frames += 1;
            assert!(frames < 1000, "fly-through never finished");
        }
        // 0.18/s at 60 fps is 0.003 per frame, so roughly 334 frames.
        assert!((330..=340).contains(&frames));
        let end = rig.camera.position;
        assert!((end - Vec3::new(-1.0, 1.0, 4.0)).length() < 1e-4);

        assert!(rig.rotate(Vec2::new(10.0, 0.0)));
        rig.update(1.0 / 60.0);
        assert!((rig.camera.position - end).length() > 0.0);
    }

    #[test]
    fn orbit_keeps_looking_at_target() {
        let mut rig = rig();
        rig.skip_fly_through();
        let _ = rig.rotate(Vec2::new(40.0, 15.0));
        for _ in 0..30 {
            rig.update(1.0 / 60.0);
        }
        let to_target =
            (Vec3::new(0.0, 0.75, 0.0) - rig.camera.position).normalize();
        assert!((rig.camera.forward() - to_target).length() < 1e-4);
    }

    #[test]
    fn restart_returns_to_fly_through() {
        let mut rig = rig();
        rig.skip_fly_through();
        assert_eq!(rig.mode(), CameraMode::Orbit);
        rig.restart_fly_through();
        assert_eq!(rig.mode(), CameraMode::FlyThrough);
        assert_eq!(rig.fly_through_progress(), 0.0);
    }

    #[test]
    fn zero_resize_is_ignored() {
        let mut rig = rig();
        rig.resize(0, 300);
        assert!((rig.camera.aspect - 800.0 / 600.0).abs() < 1e-6);
        rig.resize(1000, 500);
        assert!((rig.camera.aspect - 2.0).abs() < 1e-6);
    }

    #[test]
    fn center_ray_points_into_the_scene() {
        let mut rig = rig();
        rig.skip_fly_through();
        rig.update(0.0);
        let ray = rig.ray_from_ndc(Vec2::ZERO);
        let to_target = (Vec3::new(0.0, 0.75, 0.0) - ray.origin).normalize();
        assert!(ray.direction.dot(to_target) > 0.999);
    }
}
