use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Camera projection and orbit-control parameters.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    #[schemars(title = "Field of View", range(min = 5.0, max = 90.0), extend("step" = 1.0))]
    pub fovy: f32,
    /// Near clipping plane distance.
    #[schemars(skip)]
    pub znear: f32,
    /// Far clipping plane distance.
    #[schemars(skip)]
    pub zfar: f32,
    /// Point the orbit controls revolve around.
    #[schemars(skip)]
    pub target: [f32; 3],
    /// Fraction of the pending orbit motion applied each frame.
    #[schemars(title = "Damping", range(min = 0.01, max = 1.0), extend("step" = 0.01))]
    pub damping: f32,
    /// Radians of orbit per pixel of drag.
    #[schemars(title = "Rotate Speed", range(min = 0.001, max = 0.05), extend("step" = 0.001))]
    pub rotate_speed: f32,
    /// Pan sensitivity multiplier.
    #[schemars(title = "Pan Speed", range(min = 0.1, max = 2.0), extend("step" = 0.05))]
    pub pan_speed: f32,
    /// Zoom sensitivity multiplier.
    #[schemars(title = "Zoom Speed", range(min = 0.01, max = 0.5), extend("step" = 0.01))]
    pub zoom_speed: f32,
    /// Closest the orbit may approach the target.
    #[schemars(skip)]
    pub min_distance: f32,
    /// Farthest the orbit may retreat from the target.
    #[schemars(skip)]
    pub max_distance: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 10.0,
            znear: 0.1,
            zfar: 1000.0,
            target: [0.0, 0.75, 0.0],
            damping: 0.05,
            rotate_speed: 0.005,
            pan_speed: 1.0,
            zoom_speed: 0.05,
            min_distance: 0.5,
            max_distance: 200.0,
        }
    }
}
