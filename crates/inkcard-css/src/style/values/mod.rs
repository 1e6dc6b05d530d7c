//! CSS value types: lengths and colors.

mod color;
mod length;

pub use color::ColorValue;
pub use length::{DEFAULT_FONT_SIZE_PX, LengthValue, resolve_length, resolve_px};
