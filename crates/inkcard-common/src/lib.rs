//! Common utilities for the inkcard renderer.
//!
//! This crate provides shared infrastructure used by all renderer components:
//! - **Errors** - the [`RenderError`] taxonomy every stage reports through
//! - **Images** - decoded RGBA pixel data shared by layout and painting
//! - **Fetching** - blocking HTTP, `data:` URL and local file reads
//! - **Warning System** - de-duplicated warnings routed through `log`

pub mod error;
pub mod image;
pub mod net;
pub mod url;
pub mod warning;

pub use error::{RenderError, Result};
pub use image::LoadedImage;
