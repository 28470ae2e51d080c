//! Loader for standard image formats (PNG, JPEG, BMP, TIFF, WebP).
//!
//! Converts RGB images to 3-band cubes, mostly useful for previews and
//! for checking the sampling tools against a known picture.

use ndarray::Array3;

use crate::cube::Cube;
use crate::data::loader::{CubeLoader, LoaderError};

/// Loader for standard image formats.
///
/// Extracts R, G and B as bands 0, 1 and 2, normalized to 0.0-1.0.
pub struct ImageLoader;

impl CubeLoader for ImageLoader {
    fn id(&self) -> &'static str {
        "image"
    }

    fn display_name(&self) -> &'static str {
        "Standard Image (RGB)"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["png", "jpg", "jpeg", "bmp", "tiff", "tif", "webp"]
    }

    fn can_load(&self, data: &[u8]) -> bool {
        if data.len() < 8 {
            return false;
        }

        // PNG
        data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A])
            // JPEG
            || data.starts_with(&[0xFF, 0xD8, 0xFF])
            // BMP
            || data.starts_with(b"BM")
            // TIFF, little and big endian
            || data.starts_with(&[0x49, 0x49, 0x2A, 0x00])
            || data.starts_with(&[0x4D, 0x4D, 0x00, 0x2A])
            // WebP: RIFF....WEBP
            || (data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP")
    }

    fn load(&self, data: &[u8]) -> Result<Cube, LoaderError> {
        let img = image::load_from_memory(data)
            .map_err(|e| LoaderError::new(format!("Failed to decode image: {}", e)))?
            .to_rgb8();

        let (width, height) = img.dimensions();
        let data = Array3::from_shape_fn((height as usize, width as usize, 3), |(r, c, b)| {
            f64::from(img.get_pixel(c as u32, r as u32)[b]) / 255.0
        });

        log::trace!(
            "ImageLoader: loaded {}x{} image as 3 bands (RGB)",
            width,
            height
        );
        Ok(Cube::new(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn png_bytes(img: &RgbImage) -> Vec<u8> {
        let mut bytes = Cursor::new(Vec::new());
        img.write_to(&mut bytes, ImageFormat::Png).expect("encode png");
        bytes.into_inner()
    }

    #[test]
    fn test_magic_detection() {
        let loader = ImageLoader;
        assert!(loader.can_load(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]));
        assert!(loader.can_load(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46]));
        assert!(!loader.can_load(&[0x93, b'N', b'U', b'M', b'P', b'Y', 1, 0]));
    }

    #[test]
    fn test_load_png_rows_and_columns() {
        // 3 wide, 2 tall: row 1, column 2 is pure red
        let mut img = RgbImage::new(3, 2);
        img.put_pixel(2, 1, Rgb([255, 0, 51]));
        let cube = ImageLoader.load(&png_bytes(&img)).unwrap();

        assert_eq!(cube.dim(), (2, 3, 3));
        assert_eq!(cube.get(1, 2, 0), Some(1.0));
        assert_eq!(cube.get(1, 2, 1), Some(0.0));
        assert_eq!(cube.get(1, 2, 2), Some(0.2));
        assert_eq!(cube.get(0, 0, 0), Some(0.0));
    }
}
