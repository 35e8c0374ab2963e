//! Scene description: which models to load, where to place them, and
//! which ones link to sub-pages.
//!
//! A manifest is plain TOML:
//!
//! ```toml
//! background = "models/img/Inside.png"
//!
//! [[models]]
//! name = "gold"
//! path = "models/04/Gold.gltf"
//! scale = 0.05
//! offset = [-0.4, 0.5]
//! rotate_y = 0.5
//! bend = true
//! link = "/gold.html"
//! float = { base_y = 0.5, frequency = 1.2, amplitude = 0.05 }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TidepoolError;

/// Vertical bobbing motion: `y = base_y + sin(t * frequency) * amplitude`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FloatMotion {
    /// Rest height.
    pub base_y: f32,
    /// Angular frequency in radians per second.
    pub frequency: f32,
    /// Peak displacement from the rest height.
    pub amplitude: f32,
}

impl FloatMotion {
    /// Height at `elapsed` seconds.
    #[must_use]
    pub fn offset(&self, elapsed: f32) -> f32 {
        self.base_y + (elapsed * self.frequency).sin() * self.amplitude
    }
}

/// One model placed in the scene.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelSpec {
    /// Display name, also used in log lines.
    pub name: String,
    /// glTF/GLB path relative to the asset root.
    pub path: String,
    /// Uniform scale applied to the model root. Negative values mirror.
    #[serde(default = "default_scale")]
    pub scale: f32,
    /// Root `(x, y)` position.
    #[serde(default)]
    pub offset: [f32; 2],
    /// Root rotation about +Y in radians.
    #[serde(default)]
    pub rotate_y: f32,
    /// Apply the vertex bend effect.
    #[serde(default)]
    pub bend: bool,
    /// Page opened when the model is clicked. Models with a link are the
    /// only hover/click candidates.
    #[serde(default)]
    pub link: Option<String>,
    /// Per-frame bobbing; overrides `offset[1]` while active.
    #[serde(default)]
    pub float: Option<FloatMotion>,
}

fn default_scale() -> f32 {
    1.0
}

impl ModelSpec {
    /// Whether hovering/clicking this model does anything.
    #[must_use]
    pub fn is_clickable(&self) -> bool {
        self.link.is_some()
    }
}

/// Complete scene description.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneManifest {
    /// Background image path relative to the asset root.
    pub background: Option<String>,
    /// Models in load order.
    pub models: Vec<ModelSpec>,
}

impl Default for SceneManifest {
    fn default() -> Self {
        Self {
            background: Some("models/img/Inside.png".into()),
            models: vec![
                ModelSpec {
                    name: "gigante".into(),
                    path: "models/01/gigante.gltf".into(),
                    scale: 0.025,
                    offset: [0.0, 0.40],
                    rotate_y: 0.0,
                    bend: false,
                    link: None,
                    float: None,
                },
                ModelSpec {
                    name: "anchoby".into(),
                    path: "models/02/anchoby.gltf".into(),
                    scale: -7.0 * 0.009,
                    offset: [0.2, 0.8],
                    rotate_y: std::f32::consts::PI,
                    bend: true,
                    link: Some("/anchoby.html".into()),
                    float: Some(FloatMotion {
                        base_y: 0.8,
                        frequency: 2.0,
                        amplitude: 0.05,
                    }),
                },
                ModelSpec {
                    name: "whaleshark".into(),
                    path: "models/Duck/WhaleShark.gltf".into(),
                    scale: 0.01,
                    offset: [-0.2, 1.0],
                    rotate_y: 0.0,
                    bend: true,
                    link: Some("/whaleshark.html".into()),
                    float: Some(FloatMotion {
                        base_y: 1.0,
                        frequency: 1.5,
                        amplitude: 0.07,
                    }),
                },
                ModelSpec {
                    name: "gold".into(),
                    path: "models/04/Gold.gltf".into(),
                    scale: 0.05,
                    offset: [-0.4, 0.5],
                    rotate_y: 0.5,
                    bend: true,
                    link: Some("/gold.html".into()),
                    float: Some(FloatMotion {
                        base_y: 0.5,
                        frequency: 1.2,
                        amplitude: 0.05,
                    }),
                },
                ModelSpec {
                    name: "mini".into(),
                    path: "models/Fox/mini.gltf".into(),
                    scale: 0.04,
                    offset: [-0.05, 0.323],
                    rotate_y: 0.0,
                    bend: false,
                    link: None,
                    float: None,
                },
            ],
        }
    }
}

impl SceneManifest {
    /// Parse a manifest from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`TidepoolError::OptionsParse`] on malformed TOML.
    pub fn from_toml(content: &str) -> Result<Self, TidepoolError> {
        toml::from_str(content)
            .map_err(|e| TidepoolError::OptionsParse(e.to_string()))
    }

    /// Load a manifest file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, TidepoolError> {
        let content =
            std::fs::read_to_string(path).map_err(TidepoolError::Io)?;
        Self::from_toml(&content)
    }

    /// Every path the scene will read directly (models and background).
    pub fn asset_paths(&self) -> impl Iterator<Item = &str> {
        self.models
            .iter()
            .map(|m| m.path.as_str())
            .chain(self.background.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scene_has_three_links() {
        let manifest = SceneManifest::default();
        let links: Vec<_> = manifest
            .models
            .iter()
            .filter_map(|m| m.link.as_deref())
            .collect();
        assert_eq!(
            links,
            vec!["/anchoby.html", "/whaleshark.html", "/gold.html"]
        );
    }

    #[test]
    fn bending_models_are_the_clickable_ones() {
        for model in &SceneManifest::default().models {
            assert_eq!(model.bend, model.is_clickable(), "{}", model.name);
        }
    }

    #[test]
    fn float_motion_oscillates_around_base() {
        let motion = FloatMotion {
            base_y: 0.8,
            frequency: 2.0,
            amplitude: 0.05,
        };
        assert_eq!(motion.offset(0.0), 0.8);
        let peak = motion.offset(std::f32::consts::FRAC_PI_4);
        assert!((peak - 0.85).abs() < 1e-6);
        for i in 0..100 {
            let y = motion.offset(i as f32 * 0.1);
            assert!((0.75 - 1e-6..=0.85 + 1e-6).contains(&y));
        }
    }

    #[test]
    fn manifest_parses_with_defaults() {
        let manifest = SceneManifest::from_toml(
            r#"
[[models]]
name = "reef"
path = "reef.glb"
"#,
        )
        .unwrap();
        assert_eq!(manifest.background, None);
        let reef = &manifest.models[0];
        assert_eq!(reef.scale, 1.0);
        assert_eq!(reef.offset, [0.0, 0.0]);
        assert!(!reef.bend);
        assert!(!reef.is_clickable());
    }

    #[test]
    fn default_round_trips_through_toml() {
        let manifest = SceneManifest::default();
        let text = toml::to_string_pretty(&manifest).unwrap();
        assert_eq!(SceneManifest::from_toml(&text).unwrap(), manifest);
    }

    #[test]
    fn asset_paths_include_background() {
        let manifest = SceneManifest::default();
        let paths: Vec<_> = manifest.asset_paths().collect();
        assert_eq!(paths.len(), 6);
        assert_eq!(paths[5], "models/img/Inside.png");
    }

    #[test]
    fn shipped_manifest_matches_the_built_in_scene() {
        let shipped =
            SceneManifest::from_toml(include_str!("../assets/scene.toml")).unwrap();
        let built_in = SceneManifest::default();
        assert_eq!(shipped.background, built_in.background);
        assert_eq!(shipped.models.len(), built_in.models.len());
        for (a, b) in shipped.models.iter().zip(&built_in.models) {
            assert_eq!((&a.name, &a.path, &a.link), (&b.name, &b.path, &b.link));
            assert_eq!(a.bend, b.bend);
            assert_eq!(a.float.is_some(), b.float.is_some());
            assert!((a.scale - b.scale).abs() < 1e-6, "{}", a.name);
            assert!((a.rotate_y - b.rotate_y).abs() < 1e-6, "{}", a.name);
        }
    }
}
