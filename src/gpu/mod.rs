//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization, shader composition,
//! bind group helpers and texture uploads.

/// Shared wgpu boilerplate helpers.
pub mod pipeline_helpers;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// WGSL shader composition with `#import` support via naga-oil.
pub mod shader_composer;
/// Depth targets and sampled textures.
pub mod texture;
