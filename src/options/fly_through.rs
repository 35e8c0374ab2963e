use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::util::easing::Easing;

/// One stop on the fly-through path. The camera faces the orbit target
/// at every point, so only the position is keyed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct CameraKeyframe {
    /// World-space camera position.
    pub position: [f32; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Fly-through", inline)]
#[serde(default)]
/// Intro camera path played once at startup.
pub struct FlyThroughOptions {
    /// Play the path at startup. When off the camera starts at the last
    /// keyframe.
    #[schemars(title = "Enabled")]
    pub enabled: bool,
    /// Path progress per second (the whole path spans 0..1).
    #[schemars(title = "Speed", range(min = 0.01, max = 2.0), extend("step" = 0.01))]
    pub speed: f32,
    /// Easing applied within each segment.
    #[schemars(skip)]
    pub easing: Easing,
    /// Path keyframes, visited in order over equal-length segments.
    #[schemars(skip)]
    pub keyframes: Vec<CameraKeyframe>,
}

impl Default for FlyThroughOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            speed: 0.18,
            easing: Easing::Linear,
            keyframes: vec![
                CameraKeyframe {
                    position: [24.68, 11.13, -20.68],
                },
                CameraKeyframe {
                    position: [-11.62, 4.82, -3.38],
                },
                CameraKeyframe {
                    position: [-1.0, 1.0, 4.0],
                },
            ],
        }
    }
}
