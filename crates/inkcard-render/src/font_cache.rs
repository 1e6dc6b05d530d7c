//! Font registry keyed by `font-family`.
//!
//! [§ 5.2 Font matching algorithm](https://www.w3.org/TR/css-fonts-4/#font-matching-algorithm)
//!
//! Matching is reduced to a lookup: the family name is a file name inside
//! the font directory. Fonts load on first use and stay cached for the
//! lifetime of the cache, so a [`crate::Renderer`] reused across documents
//! parses each font file once.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use fontdue::{Font, FontSettings};
use log::debug;

use inkcard_common::{RenderError, Result};

/// Lazily populated map from family name to parsed font.
pub struct FontCache {
    font_dir: PathBuf,
    fonts: HashMap<String, Font>,
}

impl FontCache {
    /// An empty cache loading from `font_dir`.
    pub fn new(font_dir: impl Into<PathBuf>) -> Self {
        Self {
            font_dir: font_dir.into(),
            fonts: HashMap::new(),
        }
    }

    /// Directory families are loaded from.
    #[must_use]
    pub fn font_dir(&self) -> &Path {
        &self.font_dir
    }

    /// Install a font from memory under `family`, replacing any cached one.
    ///
    /// # Errors
    ///
    /// [`RenderError::MissingResource`] when the bytes are not a font.
    pub fn register_bytes(&mut self, family: &str, bytes: Vec<u8>) -> Result<()> {
        let font = parse_font(family, bytes)?;
        let _ = self.fonts.insert(family.to_string(), font);
        Ok(())
    }

    /// Whether `family` is already loaded.
    #[must_use]
    pub fn contains(&self, family: &str) -> bool {
        self.fonts.contains_key(family)
    }

    /// Number of loaded families.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    /// Whether no family is loaded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// The font for `family`, loading `font_dir/family` on first use.
    ///
    /// # Errors
    ///
    /// [`RenderError::MissingResource`] when the file cannot be read or
    /// parsed.
    pub fn get(&mut self, family: &str) -> Result<&Font> {
        if !self.fonts.contains_key(family) {
            let path = self.font_dir.join(family);
            let bytes = fs::read(&path).map_err(|e| {
                RenderError::MissingResource(format!(
                    "font family '{family}' ({}): {e}",
                    path.display()
                ))
            })?;
            debug!("loaded font '{family}' from {}", path.display());
            let font = parse_font(family, bytes)?;
            let _ = self.fonts.insert(family.to_string(), font);
        }
        self.fonts
            .get(family)
            .ok_or_else(|| RenderError::MissingResource(format!("font family '{family}'")))
    }
}

fn parse_font(family: &str, bytes: Vec<u8>) -> Result<Font> {
    Font::from_bytes(bytes, FontSettings::default()).map_err(|e| {
        RenderError::MissingResource(format!("font family '{family}' is not a usable font: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_family() {
        let mut cache = FontCache::new("/nonexistent/fonts");
        let err = cache.get("Sans").err();
        assert!(matches!(err, Some(RenderError::MissingResource(_))));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_register_rejects_garbage() {
        let mut cache = FontCache::new("fonts");
        assert!(matches!(
            cache.register_bytes("Broken", b"not a font".to_vec()),
            Err(RenderError::MissingResource(_))
        ));
        assert!(!cache.contains("Broken"));
    }
}
