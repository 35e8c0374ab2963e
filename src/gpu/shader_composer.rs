use std::borrow::Cow;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor,
    ShaderLanguage, ShaderType,
};

use crate::error::TidepoolError;

/// Wraps `naga_oil::compose::Composer` to provide shader composition with
/// `#import` support.
///
/// Shared WGSL modules are registered at construction time. Consuming
/// shaders use `#import tidepool::module_name::item` to pull them in. The
/// composer produces `naga::Module` IR directly, skipping a WGSL re-parse
/// at pipeline creation.
pub struct ShaderComposer {
    composer: Composer,
}

struct ModuleDef {
    source: &'static str,
    file_path: &'static str,
}

/// Shared modules in dependency order.
const MODULES: &[ModuleDef] = &[
    ModuleDef {
        source: include_str!("../../assets/shaders/modules/camera.wgsl"),
        file_path: "modules/camera.wgsl",
    },
    ModuleDef {
        source: include_str!("../../assets/shaders/modules/draw.wgsl"),
        file_path: "modules/draw.wgsl",
    },
    ModuleDef {
        source: include_str!("../../assets/shaders/modules/bend.wgsl"),
        file_path: "modules/bend.wgsl",
    },
    ModuleDef {
        source: include_str!("../../assets/shaders/modules/lighting.wgsl"),
        file_path: "modules/lighting.wgsl",
    },
];

/// Mesh pass: bend, lighting and shadow lookup.
pub const MESH_SHADER: &str = include_str!("../../assets/shaders/mesh.wgsl");
/// Depth-only pass from the light.
pub const SHADOW_SHADER: &str =
    include_str!("../../assets/shaders/shadow.wgsl");
/// Full-screen background image.
pub const BACKGROUND_SHADER: &str =
    include_str!("../../assets/shaders/background.wgsl");

impl ShaderComposer {
    /// Register every shared module.
    ///
    /// # Errors
    ///
    /// Returns [`TidepoolError::Shader`] if a module fails to parse.
    pub fn new() -> Result<Self, TidepoolError> {
        let mut composer = Composer::default();
        for m in MODULES {
            let _ = composer
                .add_composable_module(ComposableModuleDescriptor {
                    source: m.source,
                    file_path: m.file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                })
                .map_err(|e| {
                    TidepoolError::Shader(format!("{}: {e}", m.file_path))
                })?;
        }
        Ok(Self { composer })
    }

    /// Compose a shader source string (which may contain `#import`
    /// directives) into a `wgpu::ShaderModule` ready for pipeline creation.
    ///
    /// # Errors
    ///
    /// Returns [`TidepoolError::Shader`] if composition fails.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        source: &str,
        file_path: &str,
    ) -> Result<wgpu::ShaderModule, TidepoolError> {
        let naga_module = self.compose_naga(source, file_path)?;
        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Naga(Cow::Owned(naga_module)),
        }))
    }

    /// Compose a shader source into a `naga::Module` without a device.
    ///
    /// # Errors
    ///
    /// Returns [`TidepoolError::Shader`] if composition fails.
    pub fn compose_naga(
        &mut self,
        source: &str,
        file_path: &str,
    ) -> Result<naga::Module, TidepoolError> {
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source,
                file_path,
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(|e| TidepoolError::Shader(format!("{file_path}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_shader_sources() -> [(&'static str, &'static str); 3] {
        [
            (MESH_SHADER, "mesh.wgsl"),
            (SHADOW_SHADER, "shadow.wgsl"),
            (BACKGROUND_SHADER, "background.wgsl"),
        ]
    }

    #[test]
    fn all_shaders_compose_and_validate() {
        let mut composer = ShaderComposer::new().unwrap();
        for (source, file_path) in all_shader_sources() {
            let module = composer
                .compose_naga(source, file_path)
                .unwrap_or_else(|e| panic!("{file_path} failed: {e}"));
            let mut validator = naga::valid::Validator::new(
                naga::valid::ValidationFlags::all(),
                naga::valid::Capabilities::default(),
            );
            let _ = validator
                .validate(&module)
                .unwrap_or_else(|e| panic!("{file_path} invalid: {e:?}"));
        }
    }

    #[test]
    fn shadow_shader_has_no_fragment_stage() {
        let mut composer = ShaderComposer::new().unwrap();
        let module = composer.compose_naga(SHADOW_SHADER, "shadow.wgsl").unwrap();
        assert!(module
            .entry_points
            .iter()
            .all(|ep| ep.stage == naga::ShaderStage::Vertex));
    }

    #[test]
    fn unknown_import_is_a_shader_error() {
        let mut composer = ShaderComposer::new().unwrap();
        let err = composer
            .compose_naga("#import tidepool::missing::Thing\n", "bad.wgsl")
            .unwrap_err();
        assert!(matches!(err, TidepoolError::Shader(_)));
    }
}
