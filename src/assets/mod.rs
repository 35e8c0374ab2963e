//! Asset loading: model files, textures and the background image.
//!
//! Everything is read through an [`AssetSource`], so the same loaders
//! serve the native viewer (files on disk) and the browser (assets
//! prefetched into memory). A failed model is logged and left out of the
//! scene; a failed background falls back to the clear color.

mod image_loader;
mod model_loader;
mod source;

pub use image_loader::{decode_image, load_image};
pub use model_loader::{load_model, parse_model, referenced_uris};
pub use source::{resolve_uri, AssetSource, FileSource, MemorySource};

use crate::manifest::SceneManifest;
use crate::scene::Scene;

/// Load every model and the background named by `manifest`.
///
/// Never fails: assets that cannot be loaded are logged and skipped.
pub fn load_scene(source: &dyn AssetSource, manifest: &SceneManifest) -> Scene {
    let mut models = Vec::with_capacity(manifest.models.len());
    for spec in &manifest.models {
        match load_model(source, spec) {
            Ok(model) => {
                log::debug!(
                    "loaded model {} ({} meshes, {} clips)",
                    spec.name,
                    model.meshes.len(),
                    model.mixer.clips().len()
                );
                models.push(model);
            }
            Err(e) => log::error!("Error loading model {}: {e}", spec.path),
        }
    }

    let background = manifest.background.as_deref().and_then(|path| {
        load_image(source, path)
            .map_err(|e| log::error!("Error loading background {path}: {e}"))
            .ok()
    });

    Scene::new(models, background)
}

#[cfg(test)]
mod tests {
    use super::model_loader::tests::triangle_gltf;
    use super::*;
    use crate::manifest::ModelSpec;

    fn spec(name: &str, path: &str) -> ModelSpec {
        ModelSpec {
            name: name.into(),
            path: path.into(),
            scale: 1.0,
            offset: [0.0, 0.0],
            rotate_y: 0.0,
            bend: false,
            link: None,
            float: None,
        }
    }

    #[test]
    fn failed_models_are_skipped() {
        let mut source = MemorySource::default();
        source.insert("ok.gltf", triangle_gltf().into_bytes());
        source.insert("broken.gltf", b"{ not json".to_vec());
        let manifest = SceneManifest {
            background: Some("missing.png".into()),
            models: vec![
                spec("broken", "broken.gltf"),
                spec("ok", "ok.gltf"),
                spec("absent", "absent.gltf"),
            ],
        };

        let scene = load_scene(&source, &manifest);
        let names: Vec<_> = scene.models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["ok"]);
        assert!(scene.background.is_none());
    }
}
