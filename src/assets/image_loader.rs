use super::source::AssetSource;
use crate::error::TidepoolError;
use crate::scene::TextureImage;

/// Decode PNG or JPEG bytes into RGBA8.
///
/// # Errors
///
/// Returns [`TidepoolError::AssetLoad`] naming `path` if decoding fails.
pub fn decode_image(path: &str, bytes: &[u8]) -> Result<TextureImage, TidepoolError> {
    let rgba = image::load_from_memory(bytes)
        .map_err(|e| TidepoolError::asset(path, e))?
        .to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(TextureImage {
        width,
        height,
        rgba: rgba.into_raw(),
    })
}

/// Read and decode an image asset.
///
/// # Errors
///
/// Returns [`TidepoolError::AssetLoad`] if the asset is missing or not a
/// decodable image.
pub fn load_image(source: &dyn AssetSource, path: &str) -> Result<TextureImage, TidepoolError> {
    let bytes = source.read(path)?;
    decode_image(path, &bytes)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::assets::MemorySource;

    /// PNG bytes of a 2x1 image: red then blue.
    pub(crate) fn two_pixel_png() -> Vec<u8> {
        let img = image::RgbaImage::from_raw(2, 1, vec![255, 0, 0, 255, 0, 0, 255, 255])
            .unwrap();
        let mut bytes = Cursor::new(Vec::new());
        img.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    #[test]
    fn png_decodes_to_rgba() {
        let mut source = MemorySource::default();
        source.insert("models/img/Inside.png", two_pixel_png());
        let image = load_image(&source, "models/img/Inside.png").unwrap();
        assert_eq!((image.width, image.height), (2, 1));
        assert_eq!(image.rgba, vec![255, 0, 0, 255, 0, 0, 255, 255]);
    }

    #[test]
    fn garbage_is_an_asset_error() {
        let err = decode_image("bad.png", b"definitely not a png").unwrap_err();
        assert!(matches!(err, TidepoolError::AssetLoad { ref path, .. } if path == "bad.png"));
    }
}
