//! Error taxonomy for a render call.
//!
//! Every anomaly in the pipeline is surfaced as a [`RenderError`] and
//! propagated to the caller. A render either completes or fails as a whole.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias used throughout the renderer.
pub type Result<T, E = RenderError> = std::result::Result<T, E>;

/// Errors that abort a render call.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Malformed stylesheet or inline `style` attribute: unknown property,
    /// wrong shorthand arity, missing `:` in a declaration.
    #[error("style parse error: {0}")]
    StyleParse(String),

    /// A length could not be resolved to pixels.
    #[error("cannot resolve '{value}': {reason}")]
    UnitResolution {
        /// The raw CSS value.
        value: String,
        /// Why resolution failed.
        reason: String,
    },

    /// Input uses a feature the renderer deliberately does not implement
    /// (descendant selectors, non-solid borders, ...).
    #[error("unsupported feature: {0}")]
    UnsupportedFeature(String),

    /// A referenced resource (font family, file) is not available.
    #[error("missing resource: {0}")]
    MissingResource(String),

    /// An image could not be fetched or decoded.
    #[error("image '{src}' could not be loaded: {reason}")]
    ImageDecode {
        /// The `src` the image was requested with.
        src: String,
        /// Underlying fetch or decode failure.
        reason: String,
    },

    /// The root element resolved to a zero width and no override was given.
    #[error("root element requires a non-zero pixel width")]
    MissingRootWidth,

    /// A configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The pixel buffer could not be encoded.
    #[error("failed to encode image: {0}")]
    Encode(String),

    /// Reading an input file failed.
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl RenderError {
    /// Shorthand for a [`RenderError::UnitResolution`].
    pub fn unit(value: &str, reason: impl Into<String>) -> Self {
        Self::UnitResolution {
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a [`RenderError::ImageDecode`].
    pub fn image(src: &str, reason: impl Into<String>) -> Self {
        Self::ImageDecode {
            src: src.to_string(),
            reason: reason.into(),
        }
    }
}
