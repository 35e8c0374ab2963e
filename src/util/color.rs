//! `0xRRGGBB` color helpers.

/// Split a packed `0xRRGGBB` value into sRGB channels in `[0, 1]`.
#[must_use]
pub fn hex_to_srgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Convert a single sRGB channel to linear.
#[must_use]
pub fn srgb_channel_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Packed `0xRRGGBB` to linear RGB, the space shaders light in.
#[must_use]
pub fn hex_to_linear(hex: u32) -> [f32; 3] {
    hex_to_srgb(hex).map(srgb_channel_to_linear)
}

/// Packed `0xRRGGBB` to a linear [`wgpu::Color`] with full alpha.
#[must_use]
pub fn hex_to_wgpu(hex: u32) -> wgpu::Color {
    let [r, g, b] = hex_to_linear(hex);
    wgpu::Color {
        r: f64::from(r),
        g: f64::from(g),
        b: f64::from(b),
        a: 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_channels() {
        assert_eq!(hex_to_srgb(0x00ff00), [0.0, 1.0, 0.0]);
        assert_eq!(hex_to_srgb(0xff0000), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn grey_is_darker_in_linear_space() {
        let [r, g, b] = hex_to_linear(0xaaaaaa);
        assert!(r < 0.667 && r > 0.35);
        assert_eq!(r, g);
        assert_eq!(g, b);
    }

    #[test]
    fn extremes_are_preserved() {
        assert_eq!(hex_to_linear(0x000000), [0.0; 3]);
        let white = hex_to_linear(0xffffff);
        assert!(white.iter().all(|c| (c - 1.0).abs() < 1e-6));
    }
}
