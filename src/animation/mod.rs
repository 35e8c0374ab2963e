//! Keyframe animation for model node hierarchies.
//!
//! Clips come from the glTF `animations` array. Every clip found on a
//! model starts playing on load and loops; the [`AnimationMixer`] advances
//! them by the frame delta and writes the sampled values into the nodes'
//! local transforms.

pub mod clip;
pub mod mixer;

pub use clip::{AnimationClip, Channel, ChannelValues, Interpolation};
pub use mixer::AnimationMixer;
