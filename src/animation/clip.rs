//! Animation clips and channel sampling.

use glam::{Quat, Vec3, Vec4};

use crate::scene::node::Transform;

/// How values between keyframes are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    /// Straight-line (slerp for rotations).
    Linear,
    /// Hold the previous keyframe.
    Step,
    /// Hermite spline; each keyframe stores in-tangent, value, out-tangent.
    CubicSpline,
}

/// Keyframe values for one animated property.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelValues {
    /// Node translation.
    Translation(Vec<Vec3>),
    /// Node rotation.
    Rotation(Vec<Quat>),
    /// Node scale.
    Scale(Vec<Vec3>),
}

/// Animates one property of one node.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    /// Target node index within the model.
    pub node: usize,
    /// Ascending keyframe times in seconds.
    pub times: Vec<f32>,
    /// Keyframe values (three per keyframe for cubic splines).
    pub values: ChannelValues,
    /// Interpolation mode.
    pub interpolation: Interpolation,
}

/// Where `t` falls on a channel's timeline.
enum Segment {
    /// Before the first or after the last keyframe, or a single keyframe.
    Hold(usize),
    /// Between keyframes `k` and `k + 1`, with local factor and duration.
    Between(usize, f32, f32),
}

impl Channel {
    /// Number of keyframes the values actually cover.
    fn keyframe_count(&self) -> usize {
        let stride = if self.interpolation == Interpolation::CubicSpline {
            3
        } else {
            1
        };
        let values = match &self.values {
            ChannelValues::Translation(v) | ChannelValues::Scale(v) => v.len(),
            ChannelValues::Rotation(v) => v.len(),
        };
        self.times.len().min(values / stride)
    }

    fn segment(&self, t: f32) -> Option<Segment> {
        let count = self.keyframe_count();
        if count == 0 {
            return None;
        }
        let times = &self.times[..count];
        let next = times.partition_point(|&k| k <= t);
        if next == 0 {
            return Some(Segment::Hold(0));
        }
        if next >= count {
            return Some(Segment::Hold(count - 1));
        }
        let prev = next - 1;
        let span = times[next] - times[prev];
        if span <= 0.0 || self.interpolation == Interpolation::Step {
            return Some(Segment::Hold(prev));
        }
        Some(Segment::Between(prev, (t - times[prev]) / span, span))
    }

    /// Write the channel's value at `t` into `transform`.
    pub fn apply(&self, t: f32, transform: &mut Transform) {
        let Some(segment) = self.segment(t) else {
            return;
        };
        let cubic = self.interpolation == Interpolation::CubicSpline;
        match &self.values {
            ChannelValues::Translation(v) => {
                transform.translation = sample_vec3(v, &segment, cubic);
            }
            ChannelValues::Scale(v) => {
                transform.scale = sample_vec3(v, &segment, cubic);
            }
            ChannelValues::Rotation(v) => {
                transform.rotation = sample_quat(v, &segment, cubic);
            }
        }
    }
}

/// Cubic Hermite basis weights for value₀, tangent₀, value₁, tangent₁.
fn hermite(s: f32) -> [f32; 4] {
    let s2 = s * s;
    let s3 = s2 * s;
    [
        2.0 * s3 - 3.0 * s2 + 1.0,
        s3 - 2.0 * s2 + s,
        -2.0 * s3 + 3.0 * s2,
        s3 - s2,
    ]
}

fn sample_vec3(values: &[Vec3], segment: &Segment, cubic: bool) -> Vec3 {
    let value = |k: usize| if cubic { values[3 * k + 1] } else { values[k] };
    match *segment {
        Segment::Hold(k) => value(k),
        Segment::Between(k, s, span) if cubic => {
            let [h00, h10, h01, h11] = hermite(s);
            let out_tangent = values[3 * k + 2] * span;
            let in_tangent = values[3 * (k + 1)] * span;
            h00 * value(k) + h10 * out_tangent + h01 * value(k + 1) + h11 * in_tangent
        }
        Segment::Between(k, s, _) => value(k).lerp(value(k + 1), s),
    }
}

fn sample_quat(values: &[Quat], segment: &Segment, cubic: bool) -> Quat {
    let value = |k: usize| if cubic { values[3 * k + 1] } else { values[k] };
    match *segment {
        Segment::Hold(k) => value(k).normalize(),
        Segment::Between(k, s, span) if cubic => {
            let [h00, h10, h01, h11] = hermite(s);
            let v = |q: Quat| Vec4::from(q);
            let blended = h00 * v(value(k))
                + h10 * v(values[3 * k + 2]) * span
                + h01 * v(value(k + 1))
                + h11 * v(values[3 * (k + 1)]) * span;
            Quat::from_vec4(blended).normalize()
        }
        Segment::Between(k, s, _) => value(k).slerp(value(k + 1), s),
    }
}

/// Named set of channels that play together.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    /// Clip name from the source file.
    pub name: Option<String>,
    /// Animated properties.
    pub channels: Vec<Channel>,
    /// Last keyframe time across all channels.
    pub duration: f32,
}

impl AnimationClip {
    /// Build a clip; the duration is the latest keyframe time.
    #[must_use]
    pub fn new(name: Option<String>, channels: Vec<Channel>) -> Self {
        let duration = channels
            .iter()
            .filter_map(|c| c.times.last().copied())
            .fold(0.0f32, f32::max);
        Self {
            name,
            channels,
            duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translation_channel(interpolation: Interpolation) -> Channel {
        Channel {
            node: 0,
            times: vec![0.0, 1.0, 2.0],
            values: ChannelValues::Translation(vec![
                Vec3::ZERO,
                Vec3::new(2.0, 0.0, 0.0),
                Vec3::new(2.0, 4.0, 0.0),
            ]),
            interpolation,
        }
    }

    fn sample(channel: &Channel, t: f32) -> Transform {
        let mut transform = Transform::IDENTITY;
        channel.apply(t, &mut transform);
        transform
    }

    #[test]
    fn linear_translation_interpolates() {
        let channel = translation_channel(Interpolation::Linear);
        assert_eq!(sample(&channel, 0.5).translation, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(sample(&channel, 1.5).translation, Vec3::new(2.0, 2.0, 0.0));
    }

    #[test]
    fn values_hold_outside_the_timeline() {
        let channel = translation_channel(Interpolation::Linear);
        assert_eq!(sample(&channel, -1.0).translation, Vec3::ZERO);
        assert_eq!(sample(&channel, 9.0).translation, Vec3::new(2.0, 4.0, 0.0));
    }

    #[test]
    fn step_holds_previous_keyframe() {
        let channel = translation_channel(Interpolation::Step);
        assert_eq!(sample(&channel, 0.99).translation, Vec3::ZERO);
        assert_eq!(sample(&channel, 1.0).translation, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn rotation_slerps() {
        let channel = Channel {
            node: 0,
            times: vec![0.0, 1.0],
            values: ChannelValues::Rotation(vec![
                Quat::IDENTITY,
                Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            ]),
            interpolation: Interpolation::Linear,
        };
        let half = sample(&channel, 0.5).rotation;
        let expected = Quat::from_rotation_y(std::f32::consts::FRAC_PI_4);
        assert!(half.angle_between(expected) < 1e-4);
    }

    #[test]
    fn cubic_spline_hits_keyframes_with_zero_tangents() {
        let channel = Channel {
            node: 0,
            times: vec![0.0, 1.0],
            values: ChannelValues::Scale(vec![
                Vec3::ZERO,
                Vec3::ONE,
                Vec3::ZERO,
                Vec3::ZERO,
                Vec3::splat(3.0),
                Vec3::ZERO,
            ]),
            interpolation: Interpolation::CubicSpline,
        };
        assert_eq!(sample(&channel, 0.0).scale, Vec3::ONE);
        assert_eq!(sample(&channel, 1.0).scale, Vec3::splat(3.0));
        let mid = sample(&channel, 0.5).scale;
        assert!((mid - Vec3::splat(2.0)).length() < 1e-5);
    }

    #[test]
    fn short_value_arrays_are_tolerated() {
        let channel = Channel {
            node: 0,
            times: vec![0.0, 1.0, 2.0],
            values: ChannelValues::Translation(vec![Vec3::X]),
            interpolation: Interpolation::Linear,
        };
        assert_eq!(sample(&channel, 1.5).translation, Vec3::X);

        let empty = Channel {
            values: ChannelValues::Translation(Vec::new()),
            ..channel
        };
        assert_eq!(sample(&empty, 1.0), Transform::IDENTITY);
    }

    #[test]
    fn clip_duration_is_last_keyframe() {
        let clip = AnimationClip::new(
            Some("swim".into()),
            vec![translation_channel(Interpolation::Linear)],
        );
        assert_eq!(clip.duration, 2.0);
    }
}
