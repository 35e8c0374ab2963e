use glam::{Mat4, Quat, Vec3};

/// Perspective camera defined by a world-space pose and projection
/// parameters.
///
/// The camera looks down its local -Z axis with +Y up.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Eye (camera) position in world space.
    pub position: Vec3,
    /// World-space orientation.
    pub orientation: Quat,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
/// GPU uniform buffer holding the view-projection matrix and camera metadata.
pub struct CameraUniform {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Camera world-space position.
    pub position: [f32; 3],
    /// Viewport aspect ratio.
    pub aspect: f32,
    /// Camera forward direction.
    pub forward: [f32; 3],
    /// Vertical field of view in degrees.
    pub fovy: f32,
}

impl Camera {
    /// World-to-view transform.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position)
            .inverse()
    }

    /// Projection matrix. `perspective_rh` already uses the [0,1] depth
    /// range wgpu expects.
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        )
    }

    /// Build the combined view-projection matrix.
    #[must_use]
    pub fn build_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Unit vector the camera looks along.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    /// Unit vector pointing right on screen.
    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.orientation * Vec3::X
    }

    /// Unit vector pointing up on screen.
    #[must_use]
    pub fn up(&self) -> Vec3 {
        self.orientation * Vec3::Y
    }

    /// Rotate the camera in place to face `target`, keeping +Y up.
    ///
    /// Leaves the orientation untouched when `target` coincides with the
    /// camera or sits straight above/below it.
    pub fn look_at(&mut self, target: Vec3) {
        let dir = target - self.position;
        if dir.length_squared() < 1e-12 {
            return;
        }
        let dir = dir.normalize();
        if dir.cross(Vec3::Y).length_squared() < 1e-10 {
            return;
        }
        let view = Mat4::look_at_rh(self.position, target, Vec3::Y);
        self.orientation = Quat::from_mat4(&view.inverse()).normalize();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraUniform {
    /// Create a new camera uniform with identity view-projection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 3],
            aspect: 1.6,
            forward: [0.0, 0.0, -1.0],
            fovy: 10.0,
        }
    }

    /// Update uniform fields from the given camera's current state.
    pub fn update_view_proj(&mut self, camera: &Camera) {
        self.view_proj = camera.build_matrix().to_cols_array_2d();
        self.position = camera.position.to_array();
        self.aspect = camera.aspect;
        self.forward = camera.forward().to_array();
        self.fovy = camera.fovy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera_at(position: Vec3) -> Camera {
        Camera {
            position,
            orientation: Quat::IDENTITY,
            aspect: 1.0,
            fovy: 45.0,
            znear: 0.1,
            zfar: 100.0,
        }
    }

    #[test]
    fn identity_camera_looks_down_negative_z() {
        let camera = camera_at(Vec3::ZERO);
        assert!((camera.forward() - Vec3::NEG_Z).length() < 1e-6);
        let clip = camera.build_matrix() * Vec3::new(0.0, 0.0, -10.0).extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);
        assert!((0.0..=1.0).contains(&ndc.z));
    }

    #[test]
    fn look_at_faces_target() {
        let mut camera = camera_at(Vec3::new(-1.0, 1.0, 4.0));
        let target = Vec3::new(0.0, 0.75, 0.0);
        camera.look_at(target);
        let expected = (target - camera.position).normalize();
        assert!((camera.forward() - expected).length() < 1e-5);
        assert!(camera.up().y > 0.0);
    }

    #[test]
    fn look_at_ignores_degenerate_targets() {
        let mut camera = camera_at(Vec3::ZERO);
        camera.look_at(Vec3::ZERO);
        camera.look_at(Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(camera.orientation, Quat::IDENTITY);
    }

    #[test]
    fn uniform_tracks_camera() {
        let camera = camera_at(Vec3::new(1.0, 2.0, 3.0));
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&camera);
        assert_eq!(uniform.position, [1.0, 2.0, 3.0]);
        assert_eq!(uniform.fovy, 45.0);
        assert_eq!(uniform.forward, [0.0, 0.0, -1.0]);
    }
}
