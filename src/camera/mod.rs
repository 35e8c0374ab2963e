//! Camera system for the scene.
//!
//! A scripted fly-through drives the camera at startup; damped orbit
//! controls take over once the path completes. The camera also produces
//! picking rays from normalized device coordinates.

/// GPU-owning camera controller.
pub mod controller;
/// Core camera struct and GPU uniform types.
pub mod core;
/// Keyframed intro path.
pub mod fly_through;
/// Damped orbit controls around a target point.
pub mod orbit;
/// Picking rays.
pub mod ray;
/// CPU-side camera state machine (fly-through then orbit).
pub mod rig;
