//! Thumbnail derivation for generated artwork.

use std::io::Cursor;

use image::ImageFormat;

use super::StorageError;

/// Default bounding box for derived previews.
pub const DEFAULT_MAX_DIM: u32 = 512;

/// Decodes `bytes`, downscales to fit within `max_dim` on the longest
/// side (aspect preserved, never upscales), and re-encodes as PNG.
pub fn derive(bytes: &[u8], max_dim: u32) -> Result<Vec<u8>, StorageError> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| StorageError::Image(format!("failed to decode artifact: {}", e)))?;

    let scaled = img.thumbnail(max_dim, max_dim);

    let mut out = Cursor::new(Vec::new());
    scaled
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| StorageError::Image(format!("failed to encode thumbnail: {}", e)))?;

    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;

    fn sample_png(width: u32, height: u32) -> Vec<u8> {
        let img = image::DynamicImage::new_rgb8(width, height);
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_derive_downscales_large_image() {
        let png = sample_png(1024, 768);
        let thumb = derive(&png, 256).unwrap();

        let decoded = image::load_from_memory(&thumb).unwrap();
        let (w, h) = decoded.dimensions();
        assert!(w <= 256 && h <= 256);
        // Aspect ratio survives the downscale.
        assert_eq!(w, 256);
        assert_eq!(h, 192);
    }

    #[test]
    fn test_derive_keeps_small_image_size() {
        let png = sample_png(100, 80);
        let thumb = derive(&png, 512).unwrap();

        let decoded = image::load_from_memory(&thumb).unwrap();
        assert_eq!(decoded.dimensions(), (100, 80));
    }

    #[test]
    fn test_derive_rejects_garbage() {
        assert!(derive(b"not an image", 256).is_err());
    }
}
