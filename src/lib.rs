// -- Lint policy ---------------------------------------------------------
// Crate-wide lints live in Cargo.toml; these are the ones that need
// attribute form.

// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
// Documentation and hygiene lints warn while the API settles
#![warn(missing_docs)]
#![warn(unused_results)]
#![warn(unused_qualifications)]
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]

//! Interactive 3D model showcase rendered with wgpu.
//!
//! Tidepool loads a handful of glTF models described by a
//! [`SceneManifest`], flies the camera along a keyframed path, then hands
//! control to an orbit camera. Models sway with a vertex bend, float on
//! sine curves and cast shadows from one directional light. Hovering a
//! linked model highlights it; clicking it asks the host to navigate.
//!
//! # Key entry points
//!
//! - [`SceneEngine`] - owns the GPU context, scene and all passes
//! - `Viewer` - a ready-made winit window (feature `viewer`)
//! - `web::start` - browser entry point (feature `web`, wasm32)
//! - [`Options`] - runtime configuration, loadable from TOML presets
//! - [`assets::load_scene`] - builds a [`Scene`] from a manifest
//!
//! # Frame
//!
//! Each frame advances model animation and float motion, moves the camera,
//! uploads uniforms and encodes three passes: shadow map, background and
//! meshes.

pub mod animation;
pub mod assets;
pub mod camera;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod input;
pub mod manifest;
pub mod options;
pub mod picking;
pub mod renderer;
pub mod scene;
pub mod util;
#[cfg(feature = "viewer")]
mod viewer;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

pub use engine::SceneEngine;
pub use error::TidepoolError;
pub use input::{InputEvent, MouseButton};
pub use manifest::SceneManifest;
pub use options::Options;
pub use scene::Scene;
#[cfg(feature = "viewer")]
pub use viewer::{NavigateCallback, Viewer, ViewerBuilder};
