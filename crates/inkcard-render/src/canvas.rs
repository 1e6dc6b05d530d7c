//! The pixel buffer a render paints into.
//!
//! Coordinates are signed so boxes hanging off the canvas can be passed
//! straight through; writes outside the buffer are dropped.

use image::{Rgba, RgbaImage};

use inkcard_common::LoadedImage;
use inkcard_css::{ColorValue, Rect};

/// An RGBA canvas that starts opaque white.
pub struct Canvas {
    buffer: RgbaImage,
}

impl Canvas {
    /// A `width` x `height` canvas filled with white.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buffer: RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255])),
        }
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// The RGBA value at `(x, y)`, or `None` off the canvas.
    #[must_use]
    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        let (x, y) = self.index(x, y)?;
        Some(self.buffer.get_pixel(x, y).0)
    }

    /// The finished buffer.
    #[must_use]
    pub fn into_image(self) -> RgbaImage {
        self.buffer
    }

    fn index(&self, x: i32, y: i32) -> Option<(u32, u32)> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        (x < self.buffer.width() && y < self.buffer.height()).then_some((x, y))
    }

    /// Overwrite one pixel, alpha included.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: ColorValue) {
        if let Some((x, y)) = self.index(x, y) {
            self.buffer.put_pixel(x, y, Rgba(color.to_rgba()));
        }
    }

    /// Blend `rgba` over one pixel with `coverage` (0 to 255) scaled by the
    /// source alpha.
    pub fn blend_pixel(&mut self, x: i32, y: i32, rgba: [u8; 4], coverage: u8) {
        let alpha = (u16::from(coverage) * u16::from(rgba[3]) / 255) as u8;
        if alpha == 0 {
            return;
        }
        if let Some((x, y)) = self.index(x, y) {
            let blended = if alpha == 255 {
                Rgba([rgba[0], rgba[1], rgba[2], 255])
            } else {
                alpha_blend(rgba, *self.buffer.get_pixel(x, y), alpha)
            };
            self.buffer.put_pixel(x, y, blended);
        }
    }

    /// Overwrite every pixel with `color`.
    pub fn fill(&mut self, color: ColorValue) {
        let px = Rgba(color.to_rgba());
        for pixel in self.buffer.pixels_mut() {
            *pixel = px;
        }
    }

    /// Overwrite the pixels of `rect` that lie on the canvas.
    pub fn fill_rect(&mut self, rect: &Rect, color: ColorValue) {
        let px = Rgba(color.to_rgba());
        let x_end = rect.x2.min(self.buffer.width() as i32 - 1);
        let y_end = rect.y2.min(self.buffer.height() as i32 - 1);
        for y in rect.y1.max(0)..=y_end {
            for x in rect.x1.max(0)..=x_end {
                self.buffer.put_pixel(x as u32, y as u32, px);
            }
        }
    }

    /// [§ 5.1 Source Over](https://www.w3.org/TR/compositing-1/#porterduffcompositingoperators_srcover)
    ///
    /// Composite `image` with its top-left corner at `(x, y)`.
    pub fn draw_image(&mut self, x: i32, y: i32, image: &LoadedImage) {
        let width = image.width() as usize;
        if width == 0 {
            return;
        }
        for (row, line) in image.rgba_data().chunks_exact(width * 4).enumerate() {
            for (col, px) in line.chunks_exact(4).enumerate() {
                self.blend_pixel(
                    x + col as i32,
                    y + row as i32,
                    [px[0], px[1], px[2], px[3]],
                    255,
                );
            }
        }
    }
}

/// Linear interpolation of `fg` over `bg`; the result is opaque.
fn alpha_blend(fg: [u8; 4], bg: Rgba<u8>, alpha: u8) -> Rgba<u8> {
    let a = f32::from(alpha) / 255.0;
    let inv_a = 1.0 - a;
    Rgba([
        f32::from(fg[0]).mul_add(a, f32::from(bg[0]) * inv_a).round() as u8,
        f32::from(fg[1]).mul_add(a, f32::from(bg[1]) * inv_a).round() as u8,
        f32::from(fg[2]).mul_add(a, f32::from(bg[2]) * inv_a).round() as u8,
        255,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_white() {
        let canvas = Canvas::new(3, 2);
        assert_eq!(canvas.pixel(2, 1), Some([255, 255, 255, 255]));
        assert_eq!(canvas.pixel(3, 0), None);
        assert_eq!(canvas.pixel(-1, 0), None);
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut canvas = Canvas::new(4, 4);
        canvas.fill_rect(&Rect::new(-5, 2, 10, 20), ColorValue::BLACK);
        assert_eq!(canvas.pixel(0, 1), Some([255, 255, 255, 255]));
        assert_eq!(canvas.pixel(0, 2), Some([0, 0, 0, 255]));
        assert_eq!(canvas.pixel(3, 3), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_fill_rect_is_source_copy() {
        let mut canvas = Canvas::new(1, 1);
        canvas.fill_rect(&Rect::new(0, 0, 0, 0), ColorValue::TRANSPARENT);
        assert_eq!(canvas.pixel(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_blend_half_coverage() {
        let mut canvas = Canvas::new(1, 1);
        canvas.blend_pixel(0, 0, [0, 0, 0, 255], 128);
        let [r, g, b, a] = canvas.pixel(0, 0).unwrap();
        assert_eq!((r, g, b, a), (127, 127, 127, 255));
    }

    #[test]
    fn test_draw_image_over() {
        let mut canvas = Canvas::new(4, 4);
        let image = LoadedImage::new(2, 1, vec![255, 0, 0, 255, 0, 0, 255, 0]);
        canvas.draw_image(1, 1, &image);
        assert_eq!(canvas.pixel(1, 1), Some([255, 0, 0, 255]));
        // Fully transparent source pixels leave the canvas alone.
        assert_eq!(canvas.pixel(2, 1), Some([255, 255, 255, 255]));
    }
}
