//! `img` loading: fetch, sniff, decode and resize.
//!
//! [§ 4.8.3 The img element](https://html.spec.whatwg.org/multipage/embedded-content.html#the-img-element)
//!
//! 1. **Fetch**: the `src` is resolved against the base URL and read over
//!    HTTP, from a `data:` URL or from disk.
//! 2. **Sniff**: [`detect_format`] tells SVG from raster data.
//! 3. **Decode**: an [`ImageDecoder`] turns the bytes into straight RGBA.
//! 4. **Resize**: layout asks for the final size through
//!    [`ImageSource::resize`]; scaling uses a Lanczos3 filter.

use image::RgbaImage;
use image::imageops::{self, FilterType};
use log::debug;

use inkcard_common::net::fetch_resource;
use inkcard_common::url::resolve_url;
use inkcard_common::{LoadedImage, RenderError, Result};
use inkcard_css::ImageSource;

/// Sniffed image format. The `image` crate tells raster formats apart
/// on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// SVG document, rasterized at its intrinsic size.
    Svg,
    /// PNG, JPEG, GIF or WebP.
    Raster,
}

/// Decide between SVG and raster.
///
/// An `.svg` extension or an `image/svg` data URL wins; otherwise the
/// first bytes after leading whitespace are checked for an XML or `<svg`
/// prologue.
#[must_use]
pub fn detect_format(resolved_url: &str, bytes: &[u8]) -> ImageFormat {
    let path = resolved_url
        .split(['#', '?'])
        .next()
        .unwrap_or(resolved_url);
    if std::path::Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
        || resolved_url.starts_with("data:image/svg")
    {
        return ImageFormat::Svg;
    }

    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let head = &bytes[start..];
    if head.starts_with(b"<?xml") || head.starts_with(b"<svg") {
        ImageFormat::Svg
    } else {
        ImageFormat::Raster
    }
}

/// Turns encoded bytes into a [`LoadedImage`].
pub trait ImageDecoder {
    /// Whether this decoder handles `format`.
    fn supports(&self, format: ImageFormat) -> bool;

    /// Decode `bytes`.
    ///
    /// # Errors
    ///
    /// A description of why the bytes could not be decoded.
    fn decode(&self, bytes: &[u8]) -> std::result::Result<LoadedImage, String>;
}

/// Rasterizes SVG with usvg, resvg and tiny-skia.
pub struct SvgDecoder;

impl ImageDecoder for SvgDecoder {
    fn supports(&self, format: ImageFormat) -> bool {
        format == ImageFormat::Svg
    }

    fn decode(&self, bytes: &[u8]) -> std::result::Result<LoadedImage, String> {
        let tree = usvg::Tree::from_data(bytes, &usvg::Options::default())
            .map_err(|e| format!("failed to parse SVG: {e}"))?;
        let size = tree.size().to_int_size();
        let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height())
            .ok_or_else(|| "SVG has zero-size dimensions".to_string())?;
        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        // tiny-skia stores premultiplied alpha; the canvas expects straight.
        let rgba: Vec<u8> = pixmap
            .pixels()
            .iter()
            .flat_map(|px| {
                let c = px.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
        Ok(LoadedImage::new(pixmap.width(), pixmap.height(), rgba))
    }
}

/// Decodes raster formats with the `image` crate.
pub struct RasterDecoder;

impl ImageDecoder for RasterDecoder {
    fn supports(&self, format: ImageFormat) -> bool {
        format == ImageFormat::Raster
    }

    fn decode(&self, bytes: &[u8]) -> std::result::Result<LoadedImage, String> {
        let rgba = image::load_from_memory(bytes)
            .map_err(|e| format!("could not decode image ({e})"))?
            .to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(LoadedImage::new(width, height, rgba.into_raw()))
    }
}

/// The renderer's [`ImageSource`].
pub struct ImageLoader {
    base_url: Option<String>,
    decoders: Vec<Box<dyn ImageDecoder>>,
}

impl ImageLoader {
    /// A loader resolving relative sources against `base_url`.
    #[must_use]
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            base_url,
            decoders: vec![Box::new(SvgDecoder), Box::new(RasterDecoder)],
        }
    }

    /// Sniff and decode already fetched bytes.
    ///
    /// # Errors
    ///
    /// [`RenderError::ImageDecode`] when no decoder accepts the bytes.
    pub fn decode(&self, src: &str, resolved_url: &str, bytes: &[u8]) -> Result<LoadedImage> {
        let format = detect_format(resolved_url, bytes);
        let decoder = self
            .decoders
            .iter()
            .find(|d| d.supports(format))
            .ok_or_else(|| RenderError::image(src, format!("no decoder for {format:?}")))?;
        decoder.decode(bytes).map_err(|e| RenderError::image(src, e))
    }
}

impl Default for ImageLoader {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ImageSource for ImageLoader {
    fn load(&mut self, src: &str) -> Result<LoadedImage> {
        let resolved = resolve_url(src, self.base_url.as_deref());
        let bytes = fetch_resource(&resolved).map_err(|e| RenderError::image(src, e))?;
        let image = self.decode(src, &resolved, &bytes)?;
        debug!(
            "decoded image '{src}' ({}x{}, {} bytes)",
            image.width(),
            image.height(),
            bytes.len()
        );
        Ok(image)
    }

    fn resize(&mut self, image: LoadedImage, width: u32, height: u32) -> Result<LoadedImage> {
        if image.width() == width && image.height() == height {
            return Ok(image);
        }
        if width == 0 || height == 0 {
            return Ok(LoadedImage::new(width, height, Vec::new()));
        }
        let (src_w, src_h) = (image.width(), image.height());
        let buffer = RgbaImage::from_raw(src_w, src_h, image.into_rgba_data()).ok_or_else(|| {
            RenderError::image("<decoded>", format!("pixel data does not match {src_w}x{src_h}"))
        })?;
        let scaled = imageops::resize(&buffer, width, height, FilterType::Lanczos3);
        Ok(LoadedImage::new(width, height, scaled.into_raw()))
    }
}
