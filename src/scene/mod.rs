//! Scene contents: placed models, their meshes, materials, node
//! hierarchies and the background image.
//!
//! The scene is pure CPU data. The renderer reads it every frame; picking
//! and hover mutate materials in place.

pub mod material;
pub mod mesh;
pub mod model;
pub mod node;

pub use material::{Material, TextureImage};
pub use mesh::{Aabb, MeshData};
pub use model::{Drawable, ModelData, SceneModel};
pub use node::{SceneNode, Transform};

use crate::util::frame_timing::FrameTick;

/// All models plus the backdrop.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    /// Models in manifest order (failed loads are absent).
    pub models: Vec<SceneModel>,
    /// Backdrop image; the clear color shows when absent.
    pub background: Option<TextureImage>,
    /// Seconds since the scene started, as of the last tick.
    pub elapsed: f32,
}

impl Scene {
    /// Scene with the given models and backdrop.
    #[must_use]
    pub fn new(models: Vec<SceneModel>, background: Option<TextureImage>) -> Self {
        Self {
            models,
            background,
            elapsed: 0.0,
        }
    }

    /// Per-frame update: float motion, animation mixers and the clock the
    /// bend shader reads.
    pub fn tick(&mut self, tick: FrameTick) {
        self.elapsed = tick.elapsed;
        for model in &mut self.models {
            model.tick(tick.elapsed, tick.delta);
        }
    }

    /// Time value fed to the bend shader.
    #[must_use]
    pub fn bend_time(&self, time_scale: f32) -> f32 {
        self.elapsed * time_scale
    }

    /// Indices of models that react to hover and click.
    pub fn clickable_models(&self) -> impl Iterator<Item = usize> + '_ {
        self.models
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_clickable())
            .map(|(i, _)| i)
    }

    /// Look a model up by manifest name.
    #[must_use]
    pub fn model(&self, name: &str) -> Option<&SceneModel> {
        self.models.iter().find(|m| m.name == name)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::model::tests::quad_data;
    use super::*;
    use crate::manifest::SceneManifest;

    /// The showcase layout with a unit quad standing in for every mesh.
    pub(crate) fn showcase_scene() -> Scene {
        let models = SceneManifest::default()
            .models
            .iter()
            .map(|spec| SceneModel::new(spec, quad_data()))
            .collect();
        Scene::new(models, None)
    }

    #[test]
    fn clickable_models_are_the_linked_ones() {
        let scene = showcase_scene();
        let names: Vec<_> = scene
            .clickable_models()
            .map(|i| scene.models[i].name.as_str())
            .collect();
        assert_eq!(names, vec!["anchoby", "whaleshark", "gold"]);
    }

    #[test]
    fn tick_moves_floating_models_only() {
        let mut scene = showcase_scene();
        scene.tick(FrameTick {
            elapsed: 0.25,
            delta: 0.016,
        });
        let anchoby = scene.model("anchoby").map(|m| m.root.translation.y);
        assert_eq!(anchoby, Some(0.8 + (0.5f32).sin() * 0.05));
        let mini = scene.model("mini").map(|m| m.root.translation.y);
        assert_eq!(mini, Some(0.323));
        assert_eq!(scene.bend_time(2.0), 0.5);
    }
}
