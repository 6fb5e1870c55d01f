//! # Text
//!
//! Font faces, metrics, autofit and single-line drawing.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`metrics`] | Bounding boxes, backend selection |
//! | [`autofit`] | Largest font size fitting a box |
//! | [`ttf`] | ab_glyph loading, layout, rasterization |
//! | [`bitmap`] | Built-in Spleen bitmap face |

pub mod autofit;
pub mod bitmap;
pub mod metrics;
pub mod ttf;

use ab_glyph::FontArc;
use image::RgbaImage;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::color::Color;
use crate::config::RenderConfig;
use crate::error::{AcreditaError, Result};

pub use autofit::{MAX_FONT_SIZE, find_max_font_size, text_fits};
pub use metrics::{MetricsEngine, TextBounds, TextMeasurer};

/// Names that select the built-in bitmap face in a block's `font` field.
const BUILTIN_NAMES: &[&str] = &["builtin", "bitmap", "spleen"];

/// A loaded font face.
#[derive(Clone)]
pub enum FontFace {
    /// Scalable TrueType/OpenType face.
    Outline(FontArc),
    /// Built-in Spleen bitmap face.
    Bitmap,
}

impl fmt::Debug for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontFace::Outline(_) => f.write_str("FontFace::Outline"),
            FontFace::Bitmap => f.write_str("FontFace::Bitmap"),
        }
    }
}

/// Draw one line of text, left edge at `x`, baseline at `baseline`.
pub fn draw_text(
    canvas: &mut RgbaImage,
    font: &FontFace,
    text: &str,
    size: f32,
    x: f32,
    baseline: f32,
    color: Color,
) {
    match font {
        FontFace::Outline(font) => ttf::draw_text(canvas, font, text, size, x, baseline, color),
        FontFace::Bitmap => bitmap::draw_text(canvas, text, size, x, baseline, color),
    }
}

/// Font faces available to one render.
///
/// Loads block fonts lazily and caches them by resolved path. The default
/// face is loaded eagerly: if the configured default font is unusable the
/// library cannot be built.
#[derive(Debug)]
pub struct FontLibrary {
    default: FontFace,
    fonts_dir: PathBuf,
    storage_root: PathBuf,
    cache: HashMap<PathBuf, FontFace>,
}

impl FontLibrary {
    pub fn new(config: &RenderConfig) -> Result<Self> {
        let default = match &config.default_font {
            None => FontFace::Bitmap,
            Some(path) => {
                let resolved = config.resolve(path);
                let font = ttf::load_font(&resolved).map_err(|e| {
                    AcreditaError::Config(format!("default font unusable: {}", e))
                })?;
                FontFace::Outline(font)
            }
        };
        Ok(Self {
            default,
            fonts_dir: config.resolve(&config.fonts_dir),
            storage_root: config.storage_root.clone(),
            cache: HashMap::new(),
        })
    }

    /// Library whose only face is the built-in bitmap font.
    pub fn builtin() -> Self {
        Self {
            default: FontFace::Bitmap,
            fonts_dir: PathBuf::from("fonts"),
            storage_root: PathBuf::from("."),
            cache: HashMap::new(),
        }
    }

    pub fn default_face(&self) -> &FontFace {
        &self.default
    }

    /// Resolve a block's `font` field.
    ///
    /// `None` is the default face. Otherwise tries, in order: the path as
    /// given (relative to the storage root), `fonts_dir/<name>`,
    /// `fonts_dir/<name>.ttf`.
    pub fn resolve(&mut self, font: Option<&str>) -> Result<FontFace> {
        let Some(name) = font.map(str::trim).filter(|n| !n.is_empty()) else {
            return Ok(self.default.clone());
        };
        if BUILTIN_NAMES.contains(&name.to_ascii_lowercase().as_str()) {
            return Ok(FontFace::Bitmap);
        }

        let path = self
            .candidates(name)
            .into_iter()
            .find(|p| p.is_file())
            .ok_or_else(|| AcreditaError::Font(format!("font '{}' not found", name)))?;

        if let Some(face) = self.cache.get(&path) {
            return Ok(face.clone());
        }
        let face = FontFace::Outline(ttf::load_font(&path)?);
        self.cache.insert(path, face.clone());
        Ok(face)
    }

    fn candidates(&self, name: &str) -> Vec<PathBuf> {
        let given = Path::new(name);
        let direct = if given.is_absolute() {
            given.to_path_buf()
        } else {
            self.storage_root.join(given)
        };
        vec![
            direct,
            self.fonts_dir.join(name),
            self.fonts_dir.join(format!("{}.ttf", name)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_default() {
        let mut fonts = FontLibrary::new(&RenderConfig::default()).unwrap();
        assert!(matches!(fonts.resolve(None).unwrap(), FontFace::Bitmap));
        assert!(matches!(fonts.resolve(Some("  ")).unwrap(), FontFace::Bitmap));
        assert!(matches!(fonts.resolve(Some("Spleen")).unwrap(), FontFace::Bitmap));
    }

    #[test]
    fn test_missing_default_font_is_config_error() {
        let config = RenderConfig {
            default_font: Some(PathBuf::from("/nonexistent/acredita/Default.ttf")),
            ..Default::default()
        };
        assert!(matches!(
            FontLibrary::new(&config),
            Err(AcreditaError::Config(_))
        ));
    }

    #[test]
    fn test_missing_block_font_is_font_error() {
        let mut fonts = FontLibrary::builtin();
        assert!(matches!(
            fonts.resolve(Some("Montserrat-Bold")),
            Err(AcreditaError::Font(_))
        ));
    }
}
