//! Image data types shared across renderer components.
//!
//! [§ 4.8.3 The img element](https://html.spec.whatwg.org/multipage/embedded-content.html#the-img-element)

/// Decoded image data for a loaded image resource.
///
/// Contains RGBA pixel data (straight, not premultiplied alpha) and the
/// pixel dimensions. Layout stores the already-resized image on the box so
/// painting only has to blit it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    /// Width of the image in pixels.
    width: u32,
    /// Height of the image in pixels.
    height: u32,
    /// Raw RGBA pixel data (width * height * 4 bytes).
    rgba_data: Vec<u8>,
}

impl LoadedImage {
    /// Create a new `LoadedImage` from decoded RGBA pixel data.
    ///
    /// `rgba_data` must be `width * height * 4` bytes long.
    #[must_use]
    pub const fn new(width: u32, height: u32, rgba_data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            rgba_data,
        }
    }

    /// An image filled with a single color.
    #[must_use]
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = (width as usize) * (height as usize);
        Self::new(width, height, rgba.repeat(pixels))
    }

    /// Width of the image in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the image in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA pixel data.
    #[must_use]
    pub fn rgba_data(&self) -> &[u8] {
        &self.rgba_data
    }

    /// Consume the image and return its RGBA bytes.
    #[must_use]
    pub fn into_rgba_data(self) -> Vec<u8> {
        self.rgba_data
    }

    /// The RGBA value at `(x, y)`, or `None` outside the image.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + x as usize) * 4;
        let px = self.rgba_data.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_image_pixels() {
        let img = LoadedImage::solid(3, 2, [1, 2, 3, 4]);
        assert_eq!(img.rgba_data().len(), 24);
        assert_eq!(img.pixel(2, 1), Some([1, 2, 3, 4]));
        assert_eq!(img.pixel(3, 0), None);
    }
}
