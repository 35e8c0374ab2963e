//! GPU passes: shadow depth, background, and the lit mesh pass.
//!
//! Frame order is shadow map, then background (which clears the surface),
//! then meshes over it with a fresh depth buffer.

pub mod background;
pub mod lighting;
pub mod mesh;
pub(crate) mod pipeline_util;
pub mod shadow;

pub use background::BackgroundPass;
pub use lighting::{Lighting, LightingUniform};
pub use mesh::{DrawUniform, MeshRenderer, MeshVertex};
pub use shadow::ShadowPass;
