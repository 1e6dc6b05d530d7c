//! Output encoding.

use image::buffer::ConvertBuffer;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage, RgbaImage};

use inkcard_common::{RenderError, Result};

use crate::config::OutputFormat;

/// Encode a finished canvas.
///
/// JPEG drops the alpha channel and clamps `jpeg_quality` into `1..=100`;
/// PNG keeps RGBA as painted.
///
/// # Errors
///
/// [`RenderError::Encode`] when the encoder fails.
pub fn encode(image: &RgbaImage, format: OutputFormat, jpeg_quality: u8) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    match format {
        OutputFormat::Jpeg => {
            let rgb: RgbImage = image.convert();
            JpegEncoder::new_with_quality(&mut bytes, jpeg_quality.clamp(1, 100))
                .encode_image(&rgb)
                .map_err(|e| RenderError::Encode(e.to_string()))?;
        }
        OutputFormat::Png => {
            PngEncoder::new(&mut bytes)
                .write_image(
                    image.as_raw(),
                    image.width(),
                    image.height(),
                    ExtendedColorType::Rgba8,
                )
                .map_err(|e| RenderError::Encode(e.to_string()))?;
        }
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_jpeg_signature() {
        let image = RgbaImage::from_pixel(8, 8, Rgba([0, 128, 255, 255]));
        let bytes = encode(&image, OutputFormat::Jpeg, 100).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_png_keeps_pixels() {
        let image = RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 4]));
        let bytes = encode(&image, OutputFormat::Png, 0).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded, image);
    }
}
