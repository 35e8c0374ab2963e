use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Bend", inline)]
#[serde(default)]
/// Vertex bend applied to swimming models.
///
/// In object space: `x += sin(z * bend_frequency + t) * bend_amplitude` and
/// `y += sin(t + x * sway_frequency) * sway_amplitude`.
pub struct BendOptions {
    /// Spatial frequency of the sideways bend along the body axis.
    #[schemars(title = "Bend Frequency", range(min = 0.0, max = 10.0), extend("step" = 0.1))]
    pub bend_frequency: f32,
    /// Sideways displacement amplitude.
    #[schemars(title = "Bend Amplitude", range(min = 0.0, max = 0.5), extend("step" = 0.01))]
    pub bend_amplitude: f32,
    /// Spatial frequency of the vertical sway.
    #[schemars(title = "Sway Frequency", range(min = 0.0, max = 10.0), extend("step" = 0.1))]
    pub sway_frequency: f32,
    /// Vertical displacement amplitude.
    #[schemars(title = "Sway Amplitude", range(min = 0.0, max = 0.2), extend("step" = 0.005))]
    pub sway_amplitude: f32,
    /// Multiplier on elapsed seconds fed to the shader.
    #[schemars(title = "Time Scale", range(min = 0.0, max = 4.0), extend("step" = 0.1))]
    pub time_scale: f32,
}

impl Default for BendOptions {
    fn default() -> Self {
        Self {
            bend_frequency: 2.0,
            bend_amplitude: 0.1,
            sway_frequency: 2.0,
            sway_amplitude: 0.02,
            time_scale: 1.0,
        }
    }
}
