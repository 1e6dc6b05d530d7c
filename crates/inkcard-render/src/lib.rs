//! Render pipeline for inkcard.
//!
//! # Scope
//!
//! This crate turns an HTML document into one encoded raster image:
//! - **Parsing** - HTML through `inkcard-dom`, `<style>` blocks through
//!   `inkcard-css`
//! - **Layout** - the `inkcard-css` box layout engine, with images fetched
//!   and scaled by [`ImageLoader`]
//! - **Painting** - backgrounds, rounded corners, solid borders, images
//!   and text onto a [`Canvas`]
//! - **Encoding** - JPEG or PNG
//!
//! A render is synchronous and either returns the whole image or the first
//! error. [`Renderer`] keeps its [`FontCache`] between renders.

pub mod canvas;
pub mod config;
pub mod encode;
pub mod font_cache;
pub mod image_loader;
pub mod painter;

pub use canvas::Canvas;
pub use config::{OutputFormat, RenderConfig};
pub use font_cache::FontCache;
pub use image_loader::ImageLoader;
pub use inkcard_common::{RenderError, Result};
pub use painter::Painter;

use std::fs;
use std::path::Path;

use image::RgbaImage;
use log::debug;

use inkcard_common::warning::clear_warnings;
use inkcard_css::{ApproximateFontMetrics, LayoutBox, LayoutEngine, document_stylesheet, resolve_px};
use inkcard_dom::DomTree;

/// An encoded render result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Encoding of `bytes`.
    pub format: OutputFormat,
    /// The encoded file.
    pub bytes: Vec<u8>,
}

/// A reusable render context.
pub struct Renderer {
    config: RenderConfig,
    fonts: FontCache,
}

impl Renderer {
    /// A renderer with an empty font cache over `config.font_dir`.
    #[must_use]
    pub fn new(config: RenderConfig) -> Self {
        let fonts = FontCache::new(config.font_dir.clone());
        Self { config, fonts }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// The font cache, e.g. to register fonts from memory.
    pub const fn fonts_mut(&mut self) -> &mut FontCache {
        &mut self.fonts
    }

    /// Parse and lay out `html` without painting.
    ///
    /// # Errors
    ///
    /// Any style, unit, image or root width error.
    pub fn layout_html(&self, html: &str) -> Result<LayoutBox> {
        self.layout_with_base(html, self.config.base_url.clone())
    }

    fn layout_with_base(&self, html: &str, base_url: Option<String>) -> Result<LayoutBox> {
        clear_warnings();
        let tree = DomTree::parse_html(html);
        let stylesheet = document_stylesheet(&tree)?;
        debug!("parsed {} nodes, {} style rules", tree.len(), stylesheet.len());

        let metrics = ApproximateFontMetrics::new(self.config.dpi);
        let mut images = ImageLoader::new(base_url);
        let root = LayoutEngine::new(&tree, &stylesheet, &metrics, &mut images)
            .layout_document(self.config.root_width)?;
        debug!("laid out {} boxes", root.box_count());
        Ok(root)
    }

    /// Lay out and paint `html`, returning the unencoded canvas.
    ///
    /// # Errors
    ///
    /// Any layout error, plus painting errors: malformed colors, non-solid
    /// borders and text without a usable font.
    pub fn paint_html(&mut self, html: &str) -> Result<RgbaImage> {
        let root = self.layout_html(html)?;
        self.paint_layout(&root)
    }

    fn paint_layout(&mut self, root: &LayoutBox) -> Result<RgbaImage> {
        let (width, height) = canvas_size(root)?;
        debug!("canvas {width}x{height}");

        let mut canvas = Canvas::new(width, height);
        Painter::new(
            &mut canvas,
            &mut self.fonts,
            self.config.dpi,
            self.config.default_font_family.as_deref(),
        )
        .paint(root)?;
        Ok(canvas.into_image())
    }

    /// Render `html` to an encoded image.
    ///
    /// # Errors
    ///
    /// The first error of any stage; no partial image is returned.
    pub fn render_html(&mut self, html: &str) -> Result<RenderedImage> {
        let root = self.layout_html(html)?;
        self.finish(&root)
    }

    /// Read and render an HTML file.
    ///
    /// Relative `img` sources resolve against the file's directory unless
    /// a `base_url` is configured.
    ///
    /// # Errors
    ///
    /// [`RenderError::Io`] when the file cannot be read, otherwise as
    /// [`Renderer::render_html`].
    pub fn render_file(&mut self, path: &Path) -> Result<RenderedImage> {
        let html = fs::read_to_string(path).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let base_url = self
            .config
            .base_url
            .clone()
            .or_else(|| {
                path.parent()
                    .filter(|dir| !dir.as_os_str().is_empty())
                    .map(|dir| format!("{}/", dir.display()))
            });
        let root = self.layout_with_base(&html, base_url)?;
        self.finish(&root)
    }

    fn finish(&mut self, root: &LayoutBox) -> Result<RenderedImage> {
        let image = self.paint_layout(root)?;
        let bytes = encode::encode(&image, self.config.format, self.config.jpeg_quality)?;
        debug!("encoded {} bytes as {:?}", bytes.len(), self.config.format);
        Ok(RenderedImage {
            width: image.width(),
            height: image.height(),
            format: self.config.format,
            bytes,
        })
    }
}

/// Canvas dimensions: the root's width, and its declared `height` when
/// that is positive, otherwise its laid-out height.
fn canvas_size(root: &LayoutBox) -> Result<(u32, u32)> {
    let container = &root.dimensions.container;
    let declared = resolve_px(root.style.height.as_deref())?;
    let height = if declared > 0 {
        declared
    } else {
        root.dimensions.outer.y2 + 1
    };
    Ok((
        container.width().max(1).unsigned_abs(),
        height.max(1).unsigned_abs(),
    ))
}

/// Render `html` with a one-off [`Renderer`].
///
/// # Errors
///
/// See [`Renderer::render_html`].
pub fn render_html(html: &str, config: &RenderConfig) -> Result<RenderedImage> {
    Renderer::new(config.clone()).render_html(html)
}

/// Render the HTML file at `path` with a one-off [`Renderer`].
///
/// # Errors
///
/// See [`Renderer::render_file`].
pub fn render_file(path: &Path, config: &RenderConfig) -> Result<RenderedImage> {
    Renderer::new(config.clone()).render_file(path)
}
