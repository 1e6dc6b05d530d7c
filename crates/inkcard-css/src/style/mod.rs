//! Style values and the per-node resolved style.

mod computed;
/// CSS value types.
pub mod values;

pub use computed::{ResolvedStyle, Sides};
pub use values::{ColorValue, DEFAULT_FONT_SIZE_PX, LengthValue, resolve_length, resolve_px};
