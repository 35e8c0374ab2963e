//! Centralized rendering/interaction options with TOML preset support.
//!
//! All tweakable settings (camera, fly-through, lighting, bend effect,
//! hover highlight, renderer, keybindings) are consolidated here. Options
//! serialize to/from TOML for presets stored in `assets/presets/`.

mod bend;
mod camera;
mod fly_through;
mod hover;
mod lighting;
mod renderer;

use std::path::Path;

pub use bend::BendOptions;
pub use camera::CameraOptions;
pub use fly_through::{CameraKeyframe, FlyThroughOptions};
pub use hover::HoverOptions;
pub use lighting::LightingOptions;
pub use renderer::RendererOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::TidepoolError;
use crate::input::KeyBindings;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[lighting]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Camera projection and orbit parameters.
    pub camera: CameraOptions,
    /// Intro camera path.
    pub fly_through: FlyThroughOptions,
    /// Lighting parameters.
    pub lighting: LightingOptions,
    /// Vertex bend effect parameters.
    pub bend: BendOptions,
    /// Hover highlight parameters.
    pub hover: HoverOptions,
    /// Output surface parameters.
    pub renderer: RendererOptions,
    /// Keyboard binding options.
    #[schemars(skip)]
    pub keybindings: KeyBindings,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Parse options from a TOML string. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`TidepoolError::OptionsParse`] on malformed TOML.
    pub fn from_toml(content: &str) -> Result<Self, TidepoolError> {
        toml::from_str(content)
            .map_err(|e| TidepoolError::OptionsParse(e.to_string()))
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`TidepoolError::Io`] if the file cannot be read and
    /// [`TidepoolError::OptionsParse`] on malformed TOML.
    pub fn load(path: &Path) -> Result<Self, TidepoolError> {
        let content =
            std::fs::read_to_string(path).map_err(TidepoolError::Io)?;
        Self::from_toml(&content)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), TidepoolError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TidepoolError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(TidepoolError::Io)?;
        }
        std::fs::write(path, content).map_err(TidepoolError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[lighting]
ambient_intensity = 0.5
";
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.lighting.ambient_intensity, 0.5);
        assert_eq!(opts.lighting.shadow_map_size, 1024);
        assert_eq!(opts.camera.fovy, 10.0);
        assert_eq!(opts.renderer.clear_color, 0xaa_aa_aa);
    }

    #[test]
    fn hex_colors_parse_from_toml() {
        let opts = Options::from_toml(
            r"
[hover]
highlight_color = 0xff0000
",
        )
        .unwrap();
        assert_eq!(opts.hover.highlight_color, 0xff_00_00);
        assert!(opts.hover.enabled);
    }

    #[test]
    fn malformed_toml_is_an_options_error() {
        let err = Options::from_toml("[camera\nfovy = ").unwrap_err();
        assert!(matches!(err, TidepoolError::OptionsParse(_)));
    }

    #[test]
    fn default_fly_through_has_three_keyframes() {
        let opts = Options::default();
        assert_eq!(opts.fly_through.keyframes.len(), 3);
        assert_eq!(opts.fly_through.keyframes[2].position, [-1.0, 1.0, 4.0]);
    }

    #[test]
    fn pixel_ratio_is_clamped() {
        let opts = RendererOptions::default();
        assert_eq!(opts.pixel_ratio(3.0), 2.0);
        assert_eq!(opts.pixel_ratio(1.5), 1.5);
        assert_eq!(opts.pixel_ratio(0.5), 1.0);
    }

    #[test]
    fn keybinding_lookup() {
        use crate::engine::command::SceneCommand;
        let opts = Options::default();
        assert_eq!(
            opts.keybindings.lookup("KeyR"),
            Some(SceneCommand::RestartFlyThrough)
        );
        assert_eq!(
            opts.keybindings.lookup("Space"),
            Some(SceneCommand::SkipFlyThrough)
        );
        assert_eq!(opts.keybindings.lookup("KeyZ"), None);
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("camera"));
        assert!(props.contains_key("lighting"));
        assert!(props.contains_key("bend"));
        assert!(props.contains_key("fly_through"));
        assert!(!props.contains_key("keybindings"));

        let lighting = &props["lighting"]["properties"];
        assert!(lighting.get("ambient_intensity").is_some());
        assert!(lighting.get("directional_position").is_none());
    }

    #[test]
    fn shipped_presets_parse() {
        let low = Options::from_toml(include_str!(
            "../../assets/presets/low_power.toml"
        ))
        .unwrap();
        assert_eq!(low.lighting.shadow_map_size, 512);
        assert!(!low.renderer.soft_shadows);
        assert_eq!(low.camera, CameraOptions::default());

        let calm =
            Options::from_toml(include_str!("../../assets/presets/calm.toml"))
                .unwrap();
        assert_eq!(calm.bend.time_scale, 0.5);
        assert_eq!(calm.hover.highlight_color, 0x66_cc_ff);
    }

    #[test]
    fn list_presets_sorts_toml_stems() {
        let dir = std::env::temp_dir()
            .join(format!("tidepool-presets-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        Options::default().save(&dir.join("night.toml")).unwrap();
        Options::default().save(&dir.join("day.toml")).unwrap();
        std::fs::write(dir.join("notes.txt"), "x").unwrap();

        assert_eq!(Options::list_presets(&dir), vec!["day", "night"]);
        let loaded = Options::load(&dir.join("day.toml")).unwrap();
        assert_eq!(loaded, Options::default());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
