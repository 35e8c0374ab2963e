use super::clip::AnimationClip;
use crate::scene::node::SceneNode;

/// Plays every clip of a model on a shared looping clock.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationMixer {
    clips: Vec<AnimationClip>,
    time: f32,
}

impl AnimationMixer {
    /// Mixer playing all of `clips`.
    #[must_use]
    pub fn new(clips: Vec<AnimationClip>) -> Self {
        Self { clips, time: 0.0 }
    }

    /// Whether there is anything to play.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Clips being played.
    #[must_use]
    pub fn clips(&self) -> &[AnimationClip] {
        &self.clips
    }

    /// Seconds of playback so far.
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Advance by `dt` seconds and pose `nodes`. Channels naming a node
    /// that does not exist are skipped.
    pub fn update(&mut self, dt: f32, nodes: &mut [SceneNode]) {
        if self.clips.is_empty() {
            return;
        }
        self.time += dt.max(0.0);
        for clip in &self.clips {
            let t = if clip.duration > 0.0 {
                self.time % clip.duration
            } else {
                0.0
            };
            for channel in &clip.channels {
                if let Some(node) = nodes.get_mut(channel.node) {
                    channel.apply(t, &mut node.local);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::animation::{Channel, ChannelValues, Interpolation};
    use crate::scene::node::Transform;

    fn bobbing_clip(node: usize) -> AnimationClip {
        AnimationClip::new(
            None,
            vec![Channel {
                node,
                times: vec![0.0, 1.0, 2.0],
                values: ChannelValues::Translation(vec![
                    Vec3::ZERO,
                    Vec3::Y,
                    Vec3::ZERO,
                ]),
                interpolation: Interpolation::Linear,
            }],
        )
    }

    fn nodes() -> Vec<SceneNode> {
        vec![SceneNode {
            name: Some("body".into()),
            parent: None,
            local: Transform::IDENTITY,
        }]
    }

    #[test]
    fn advances_by_frame_delta() {
        let mut mixer = AnimationMixer::new(vec![bobbing_clip(0)]);
        let mut nodes = nodes();
        mixer.update(0.5, &mut nodes);
        assert!((nodes[0].local.translation.y - 0.5).abs() < 1e-6);
        mixer.update(0.5, &mut nodes);
        assert!((nodes[0].local.translation.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn clips_loop() {
        let mut mixer = AnimationMixer::new(vec![bobbing_clip(0)]);
        let mut nodes = nodes();
        mixer.update(2.5, &mut nodes);
        assert!((nodes[0].local.translation.y - 0.5).abs() < 1e-5);
    }

    #[test]
    fn unknown_nodes_are_skipped() {
        let mut mixer = AnimationMixer::new(vec![bobbing_clip(7)]);
        let mut nodes = nodes();
        mixer.update(0.5, &mut nodes);
        assert_eq!(nodes[0].local, Transform::IDENTITY);
    }

    #[test]
    fn empty_mixer_keeps_its_clock() {
        let mut mixer = AnimationMixer::default();
        mixer.update(1.0, &mut []);
        assert!(mixer.is_empty());
        assert_eq!(mixer.time(), 0.0);
    }
}
