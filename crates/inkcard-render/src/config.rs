//! Render configuration.
//!
//! Every field has a default, so an empty JSON object is a valid
//! configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use inkcard_common::{RenderError, Result};

/// Encoded output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Baseline JPEG. Alpha is dropped.
    #[default]
    Jpeg,
    /// 8-bit RGBA PNG.
    Png,
}

impl OutputFormat {
    /// Conventional file extension, without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }
}

/// Settings for a render call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Directory holding font files; a `font-family` names a file in it.
    pub font_dir: PathBuf,
    /// Resolution used by text measurement and glyph sizing.
    pub dpi: f64,
    /// Overrides the root element's `width` when set.
    pub root_width: Option<u32>,
    /// Family used for text that has no `font-family` anywhere above it.
    pub default_font_family: Option<String>,
    /// Output encoding.
    pub format: OutputFormat,
    /// JPEG quality, 1 to 100.
    pub jpeg_quality: u8,
    /// Base for relative `img src` values.
    pub base_url: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font_dir: PathBuf::from("fonts"),
            dpi: 72.0,
            root_width: None,
            default_font_family: None,
            format: OutputFormat::Jpeg,
            jpeg_quality: 100,
            base_url: None,
        }
    }
}

impl RenderConfig {
    /// Parse a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// [`RenderError::Config`] when the text is not a valid configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| RenderError::Config(e.to_string()))
    }

    /// Read and parse a JSON configuration file.
    ///
    /// # Errors
    ///
    /// [`RenderError::Io`] when the file cannot be read and
    /// [`RenderError::Config`] when its contents are invalid.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
            .map_err(|e| RenderError::Config(format!("{}: {e}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(RenderConfig::from_json_str("{}").unwrap(), RenderConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let config =
            RenderConfig::from_json_str(r#"{"dpi": 96, "format": "png", "root_width": 320}"#)
                .unwrap();
        assert!((config.dpi - 96.0).abs() < f64::EPSILON);
        assert_eq!(config.format, OutputFormat::Png);
        assert_eq!(config.root_width, Some(320));
        assert_eq!(config.jpeg_quality, 100);
        assert_eq!(config.font_dir, PathBuf::from("fonts"));
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            RenderConfig::from_json_str(r#"{"format": "bmp"}"#),
            Err(RenderError::Config(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            RenderConfig::from_json_file(Path::new("/nonexistent/inkcard.json")),
            Err(RenderError::Io { .. })
        ));
    }
}
