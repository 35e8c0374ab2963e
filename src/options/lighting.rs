use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Lighting", inline)]
#[serde(default)]
/// Ambient + shadow-casting directional light.
pub struct LightingOptions {
    /// Ambient light color as `0xRRGGBB`.
    #[schemars(skip)]
    pub ambient_color: u32,
    /// Ambient light intensity.
    #[schemars(title = "Ambient", range(min = 0.0, max = 3.0), extend("step" = 0.05))]
    pub ambient_intensity: f32,
    /// Directional light color as `0xRRGGBB`.
    #[schemars(skip)]
    pub directional_color: u32,
    /// Directional light intensity.
    #[schemars(title = "Key Light", range(min = 0.0, max = 3.0), extend("step" = 0.05))]
    pub directional_intensity: f32,
    /// Directional light position; the light shines toward the origin.
    #[schemars(skip)]
    pub directional_position: [f32; 3],
    /// Shadow map resolution (square).
    #[schemars(skip)]
    pub shadow_map_size: u32,
    /// Half-width of the orthographic shadow frustum.
    #[schemars(skip)]
    pub shadow_extent: f32,
    /// Far plane of the shadow frustum.
    #[schemars(skip)]
    pub shadow_far: f32,
    /// Depth bias applied when comparing against the shadow map.
    #[schemars(title = "Shadow Bias", range(min = 0.0, max = 0.01), extend("step" = 0.0005))]
    pub shadow_bias: f32,
}

impl Default for LightingOptions {
    fn default() -> Self {
        Self {
            ambient_color: 0xff_ff_ff,
            ambient_intensity: 1.0,
            directional_color: 0xff_ff_ff,
            directional_intensity: 1.0,
            directional_position: [5.0, 5.0, 5.0],
            shadow_map_size: 1024,
            shadow_extent: 7.0,
            shadow_far: 15.0,
            shadow_bias: 0.002,
        }
    }
}
