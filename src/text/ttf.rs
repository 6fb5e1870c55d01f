//! TTF/OTF font loading and rendering.
//!
//! Lays out a single line with ab_glyph (advances plus kerning) and
//! rasterizes glyph outlines straight onto an RGBA canvas with
//! anti-aliased coverage.

use ab_glyph::{Font, FontArc, Glyph, GlyphId, ScaleFont, point};
use image::RgbaImage;
use std::path::Path;

use crate::canvas::blend_pixel;
use crate::color::Color;
use crate::error::{AcreditaError, Result};

/// Load a font file from disk.
pub fn load_font(path: &Path) -> Result<FontArc> {
    let data = std::fs::read(path)
        .map_err(|e| AcreditaError::Font(format!("{}: {}", path.display(), e)))?;
    FontArc::try_from_vec(data)
        .map_err(|e| AcreditaError::Font(format!("{}: {}", path.display(), e)))
}

/// Positioned glyphs for one line of text, baseline at y = 0.
pub struct LineLayout {
    pub glyphs: Vec<Glyph>,
    /// Caret position after the last glyph.
    pub advance: f32,
}

/// Lay out `text` on a single line starting at x = 0.
pub fn layout_line(font: &FontArc, text: &str, pixel_height: f32) -> LineLayout {
    let scaled = font.as_scaled(pixel_height);
    let mut glyphs = Vec::with_capacity(text.len());
    let mut caret_x = 0.0f32;
    let mut previous: Option<GlyphId> = None;

    for ch in text.chars() {
        let glyph_id = font.glyph_id(ch);
        if let Some(prev) = previous {
            caret_x += scaled.kern(prev, glyph_id);
        }
        glyphs.push(glyph_id.with_scale_and_position(pixel_height, point(caret_x, 0.0)));
        caret_x += scaled.h_advance(glyph_id);
        previous = Some(glyph_id);
    }

    LineLayout {
        glyphs,
        advance: caret_x,
    }
}

/// Ascent (positive) and descent (negative) at `pixel_height`.
pub fn vertical_metrics(font: &FontArc, pixel_height: f32) -> (f32, f32) {
    let scaled = font.as_scaled(pixel_height);
    (scaled.ascent(), scaled.descent())
}

/// Draw `text` with its origin (left edge of the first advance) at `x`
/// and its baseline at `baseline`.
pub fn draw_text(
    canvas: &mut RgbaImage,
    font: &FontArc,
    text: &str,
    pixel_height: f32,
    x: f32,
    baseline: f32,
    color: Color,
) {
    if text.is_empty() || pixel_height <= 0.0 {
        return;
    }
    let layout = layout_line(font, text, pixel_height);

    for mut glyph in layout.glyphs {
        glyph.position = point(glyph.position.x + x, glyph.position.y + baseline);
        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|px, py, coverage| {
                let cx = px as i64 + bounds.min.x as i64;
                let cy = py as i64 + bounds.min.y as i64;
                blend_pixel(canvas, cx, cy, color, coverage);
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_font_is_font_error() {
        let err = load_font(Path::new("/nonexistent/acredita/NoSuch.ttf")).unwrap_err();
        assert!(matches!(err, AcreditaError::Font(_)));
    }

    #[test]
    fn test_load_garbage_font_is_font_error() {
        let path = std::env::temp_dir().join(format!("acredita-bad-{}.ttf", uuid::Uuid::new_v4()));
        std::fs::write(&path, b"not a font").unwrap();
        let err = load_font(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, AcreditaError::Font(_)));
    }

    #[test]
    fn test_monospace_layout_advances_evenly() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/DejaVuSansMono.ttf");
        let font = load_font(&path).unwrap();
        let one = layout_line(&font, "M", 30.0).advance;
        let four = layout_line(&font, "MiWl", 30.0);
        assert_eq!(four.glyphs.len(), 4);
        assert!((four.advance - 4.0 * one).abs() < 0.01);

        let (ascent, descent) = vertical_metrics(&font, 30.0);
        assert!(ascent > 0.0 && descent < 0.0);
    }
}
