//! Surface parameters and decoded texture images.

/// Decoded RGBA8 image, row-major, sRGB-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes.
    pub rgba: Vec<u8>,
}

impl TextureImage {
    /// A 1x1 opaque white image, bound when a material has no texture.
    #[must_use]
    pub fn white() -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: vec![255; 4],
        }
    }
}

/// Metallic-roughness material with a swappable emissive color.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Linear RGBA base color factor.
    pub base_color: [f32; 4],
    /// Index into the model's textures.
    pub base_color_texture: Option<usize>,
    /// Current linear emissive color.
    pub emissive: [f32; 3],
    /// Emissive color as loaded, restored when a highlight ends.
    pub original_emissive: [f32; 3],
    /// Metalness factor.
    pub metallic: f32,
    /// Roughness factor.
    pub roughness: f32,
    /// Rendered into the shadow map.
    pub cast_shadow: bool,
    /// Darkened by the shadow map.
    pub receive_shadow: bool,
    /// Back faces count for hit-testing. glTF materials are single-sided
    /// unless marked otherwise.
    pub double_sided: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color: [1.0; 4],
            base_color_texture: None,
            emissive: [0.0; 3],
            original_emissive: [0.0; 3],
            metallic: 0.0,
            roughness: 1.0,
            cast_shadow: true,
            receive_shadow: true,
            double_sided: false,
        }
    }
}

impl Material {
    /// Material with the given emissive color recorded as the original.
    #[must_use]
    pub fn with_emissive(mut self, emissive: [f32; 3]) -> Self {
        self.emissive = emissive;
        self.original_emissive = emissive;
        self
    }

    /// Override the emissive color.
    pub fn highlight(&mut self, color: [f32; 3]) {
        self.emissive = color;
    }

    /// Restore the emissive color captured at load time.
    pub fn restore_emissive(&mut self) {
        self.emissive = self.original_emissive;
    }

    /// Whether the emissive color differs from the loaded one.
    #[must_use]
    pub fn is_highlighted(&self) -> bool {
        self.emissive != self.original_emissive
    }
}
