use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Hover", inline)]
#[serde(default)]
/// Hover highlight parameters.
pub struct HoverOptions {
    /// Highlight hovered meshes.
    #[schemars(title = "Highlight")]
    pub enabled: bool,
    /// Emissive color applied to the hovered mesh, `0xRRGGBB`.
    #[schemars(skip)]
    pub highlight_color: u32,
}

impl Default for HoverOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            highlight_color: 0x00_ff_00,
        }
    }
}
