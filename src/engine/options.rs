//! Options methods for SceneEngine

use std::path::Path;

use super::SceneEngine;
use crate::options::Options;

impl SceneEngine {
    /// Current options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Replace options and apply all changes to subsystems.
    pub fn set_options(&mut self, new: Options) {
        self.options = new;
        self.apply_options();
    }

    /// Push current option values to the camera, lighting, hover and input
    /// subsystems, and re-derive the surface size.
    pub fn apply_options(&mut self) {
        self.camera_controller.set_options(&self.options.camera);
        self.lighting.apply_options(
            &self.context.device,
            &self.context.queue,
            &self.options.lighting,
            &self.options.renderer,
        );
        self.hover.set_options(&self.options.hover, &mut self.scene);
        *self.input.key_bindings_mut() = self.options.keybindings.clone();
        let (w, h) = self.window_size;
        self.resize(w, h);
    }

    /// Load a named preset from `presets_dir`. Returns true on success.
    pub fn load_preset(&mut self, name: &str, presets_dir: &Path) -> bool {
        let path = presets_dir.join(format!("{name}.toml"));
        match Options::load(&path) {
            Ok(opts) => {
                log::info!("Loaded preset '{name}'");
                self.set_options(opts);
                true
            }
            Err(e) => {
                log::error!("Failed to load preset '{name}': {e}");
                false
            }
        }
    }

    /// Save the current options as a named preset. Returns true on
    /// success.
    pub fn save_preset(&self, name: &str, presets_dir: &Path) -> bool {
        let path = presets_dir.join(format!("{name}.toml"));
        match self.options.save(&path) {
            Ok(()) => {
                log::info!("Saved preset '{name}'");
                true
            }
            Err(e) => {
                log::error!("Failed to save preset '{name}': {e}");
                false
            }
        }
    }
}
