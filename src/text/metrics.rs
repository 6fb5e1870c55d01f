//! # Text Metrics
//!
//! Bounding boxes of rendered strings, relative to the text origin
//! (left edge) and baseline. `min_y` is negative above the baseline,
//! `max_y` positive below it.
//!
//! Two backends implement [`TextMeasurer`]:
//!
//! | Backend | Faces | Geometry |
//! |---------|-------|----------|
//! | [`OutlineMetrics`] | TTF/OTF | ink bounds of every outlined glyph |
//! | [`CellMetrics`] | TTF/OTF, bitmap | advances × ascent/descent |
//!
//! [`MetricsEngine`] picks a preferred backend once at startup and falls
//! back to cell metrics whenever the preferred one errors, so callers
//! never see a metrics failure.

use ab_glyph::Font;
use serde::Serialize;
use thiserror::Error;

use super::{FontFace, bitmap, ttf};
use crate::config::MetricsBackend;

/// Glyph-accurate bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TextBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
    pub width: f32,
    pub height: f32,
}

impl TextBounds {
    pub const EMPTY: TextBounds = TextBounds {
        min_x: 0.0,
        max_x: 0.0,
        min_y: 0.0,
        max_y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub fn from_extents(min_x: f32, max_x: f32, min_y: f32, max_y: f32) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
            width: (max_x - min_x).max(0.0),
            height: (max_y - min_y).max(0.0),
        }
    }
}

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("{backend} cannot measure this face")]
    Unsupported { backend: &'static str },

    #[error("invalid font size {0}")]
    InvalidSize(f32),
}

/// A way of measuring text.
pub trait TextMeasurer: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Measure `text` at `size` px. Empty text yields [`TextBounds::EMPTY`].
    fn measure(&self, text: &str, size: f32, font: &FontFace) -> Result<TextBounds, MetricsError>;
}

fn check_size(size: f32) -> Result<(), MetricsError> {
    if size.is_finite() && size > 0.0 {
        Ok(())
    } else {
        Err(MetricsError::InvalidSize(size))
    }
}

/// Ink bounds from glyph outlines.
#[derive(Debug, Default, Clone, Copy)]
pub struct OutlineMetrics;

impl TextMeasurer for OutlineMetrics {
    fn name(&self) -> &'static str {
        "outline"
    }

    fn measure(&self, text: &str, size: f32, font: &FontFace) -> Result<TextBounds, MetricsError> {
        let FontFace::Outline(font) = font else {
            return Err(MetricsError::Unsupported {
                backend: self.name(),
            });
        };
        if text.is_empty() {
            return Ok(TextBounds::EMPTY);
        }
        check_size(size)?;

        let layout = ttf::layout_line(font, text, size);
        let mut extents: Option<(f32, f32, f32, f32)> = None;
        for glyph in layout.glyphs {
            if let Some(outlined) = font.outline_glyph(glyph) {
                let b = outlined.px_bounds();
                extents = Some(match extents {
                    None => (b.min.x, b.max.x, b.min.y, b.max.y),
                    Some((x0, x1, y0, y1)) => {
                        (x0.min(b.min.x), x1.max(b.max.x), y0.min(b.min.y), y1.max(b.max.y))
                    }
                });
            }
        }

        Ok(match extents {
            Some((x0, x1, y0, y1)) => TextBounds::from_extents(x0, x1, y0, y1),
            // Whitespace only: advance but no ink
            None => TextBounds::from_extents(0.0, layout.advance, 0.0, 0.0),
        })
    }
}

/// Advance-box bounds. Works for every face.
#[derive(Debug, Default, Clone, Copy)]
pub struct CellMetrics;

impl TextMeasurer for CellMetrics {
    fn name(&self) -> &'static str {
        "cell"
    }

    fn measure(&self, text: &str, size: f32, font: &FontFace) -> Result<TextBounds, MetricsError> {
        if text.is_empty() {
            return Ok(TextBounds::EMPTY);
        }
        check_size(size)?;
        match font {
            FontFace::Bitmap => Ok(bitmap::cell_bounds(text, size)),
            FontFace::Outline(font) => {
                let layout = ttf::layout_line(font, text, size);
                let (ascent, descent) = ttf::vertical_metrics(font, size);
                Ok(TextBounds::from_extents(0.0, layout.advance, -ascent, -descent))
            }
        }
    }
}

/// Infallible metrics façade with silent fallback.
pub struct MetricsEngine {
    preferred: Option<Box<dyn TextMeasurer>>,
    fallback: CellMetrics,
}

impl std::fmt::Debug for MetricsEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsEngine")
            .field("backend", &self.backend_name())
            .finish()
    }
}

impl MetricsEngine {
    /// Cell metrics only.
    pub fn cell() -> Self {
        Self {
            preferred: None,
            fallback: CellMetrics,
        }
    }

    /// Outline metrics preferred, cell metrics as fallback.
    pub fn outline() -> Self {
        Self {
            preferred: Some(Box::new(OutlineMetrics)),
            fallback: CellMetrics,
        }
    }

    /// Select a backend by probing the default face.
    ///
    /// `Auto` keeps outline metrics unless they fail on an outline default
    /// face. With the bitmap default there is nothing to probe; outline
    /// metrics stay preferred for TTF block fonts.
    pub fn probe(backend: MetricsBackend, default_font: &FontFace) -> Self {
        let engine = match backend {
            MetricsBackend::Cell => Self::cell(),
            MetricsBackend::Outline => Self::outline(),
            MetricsBackend::Auto => match default_font {
                FontFace::Outline(_) => match OutlineMetrics.measure("Hg", 24.0, default_font) {
                    Ok(b) if b.width > 0.0 && b.height > 0.0 => Self::outline(),
                    Ok(_) => {
                        log::warn!("metrics probe: outline backend returned empty bounds, using cell");
                        Self::cell()
                    }
                    Err(e) => {
                        log::warn!("metrics probe: outline backend failed ({}), using cell", e);
                        Self::cell()
                    }
                },
                FontFace::Bitmap => Self::outline(),
            },
        };
        log::info!(
            "metrics backend selected backend={} requested={:?}",
            engine.backend_name(),
            backend
        );
        engine
    }

    pub fn backend_name(&self) -> &'static str {
        self.preferred
            .as_ref()
            .map(|m| m.name())
            .unwrap_or(self.fallback.name())
    }

    /// Measure text; never fails.
    pub fn measure(&self, text: &str, size: f32, font: &FontFace) -> TextBounds {
        if text.is_empty() {
            return TextBounds::EMPTY;
        }
        if let Some(preferred) = &self.preferred {
            match preferred.measure(text, size, font) {
                Ok(bounds) => return bounds,
                Err(e) => log::debug!("metrics fallback backend={} reason={}", preferred.name(), e),
            }
        }
        self.fallback.measure(text, size, font).unwrap_or_else(|e| {
            log::warn!("metrics unavailable text={:?} size={} reason={}", text, size, e);
            TextBounds::EMPTY
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_is_zero_box() {
        let engine = MetricsEngine::outline();
        assert_eq!(engine.measure("", 40.0, &FontFace::Bitmap), TextBounds::EMPTY);
        assert_eq!(
            CellMetrics.measure("", 40.0, &FontFace::Bitmap).unwrap(),
            TextBounds::EMPTY
        );
    }

    #[test]
    fn test_outline_rejects_bitmap_face() {
        assert!(matches!(
            OutlineMetrics.measure("A", 20.0, &FontFace::Bitmap),
            Err(MetricsError::Unsupported { .. })
        ));
    }

    #[test]
    fn test_engine_falls_back_silently() {
        let outline_first = MetricsEngine::outline();
        let cell_only = MetricsEngine::cell();
        let a = outline_first.measure("CREDENCIAL", 30.0, &FontFace::Bitmap);
        let b = cell_only.measure("CREDENCIAL", 30.0, &FontFace::Bitmap);
        assert_eq!(a, b);
        assert!(a.width > 0.0);
    }

    #[test]
    fn test_measure_is_deterministic() {
        let engine = MetricsEngine::probe(MetricsBackend::Auto, &FontFace::Bitmap);
        let first = engine.measure("Juan Perez", 27.0, &FontFace::Bitmap);
        let second = engine.measure("Juan Perez", 27.0, &FontFace::Bitmap);
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_size_degrades_to_empty() {
        let engine = MetricsEngine::cell();
        assert_eq!(engine.measure("A", 0.0, &FontFace::Bitmap), TextBounds::EMPTY);
        assert_eq!(engine.measure("A", f32::NAN, &FontFace::Bitmap), TextBounds::EMPTY);
    }

    #[test]
    fn test_baseline_relative_signs() {
        let b = CellMetrics.measure("Ag", 24.0, &FontFace::Bitmap).unwrap();
        assert!(b.min_y < 0.0);
        assert!(b.max_y > 0.0);
        assert_eq!(b.height, b.max_y - b.min_y);
    }
}
