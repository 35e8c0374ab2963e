use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Renderer", inline)]
#[serde(default)]
/// Output surface parameters.
pub struct RendererOptions {
    /// Color drawn where no background image covers the frame, `0xRRGGBB`.
    #[schemars(skip)]
    pub clear_color: u32,
    /// Upper bound on the device pixel ratio used for the render surface.
    #[schemars(title = "Max Pixel Ratio", range(min = 1.0, max = 3.0), extend("step" = 0.5))]
    pub max_pixel_ratio: f64,
    /// Render the directional light's shadow map.
    #[schemars(title = "Shadows")]
    pub shadows: bool,
    /// Filter shadow lookups with a 3x3 PCF kernel.
    #[schemars(title = "Soft Shadows")]
    pub soft_shadows: bool,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            clear_color: 0xaa_aa_aa,
            max_pixel_ratio: 2.0,
            shadows: true,
            soft_shadows: true,
        }
    }
}

impl RendererOptions {
    /// Clamp a window scale factor to the configured maximum.
    #[must_use]
    pub fn pixel_ratio(&self, scale_factor: f64) -> f64 {
        scale_factor.min(self.max_pixel_ratio).max(1.0)
    }
}
