//! Built-in bitmap face.
//!
//! Uses the Spleen 12×24 bitmap font, scaled nearest-neighbor to the
//! requested pixel size. Every glyph occupies a fixed cell, so bounds are
//! a pure function of the character count and the size. This is the face
//! used when no TTF default font is configured, and the geometry used by
//! the cell metrics backend.

use image::RgbaImage;
use spleen_font::{FONT_12X24, PSF2Font};
use std::collections::HashMap;

use super::metrics::TextBounds;
use crate::canvas::blend_pixel;
use crate::color::Color;

/// Native glyph cell width in pixels.
pub const CELL_WIDTH: usize = 12;
/// Native glyph cell height in pixels.
pub const CELL_HEIGHT: usize = 24;
/// Row of the baseline inside the native cell (rows above are ascent).
pub const BASELINE_ROW: usize = 19;

/// Horizontal advance per character at `size` px.
#[inline]
pub fn advance(size: f32) -> f32 {
    size * CELL_WIDTH as f32 / CELL_HEIGHT as f32
}

/// Cell bounds of `text` at `size` px, relative to the left edge and baseline.
pub fn cell_bounds(text: &str, size: f32) -> TextBounds {
    let count = text.chars().count();
    if count == 0 || size <= 0.0 {
        return TextBounds::EMPTY;
    }
    let ascent = size * BASELINE_ROW as f32 / CELL_HEIGHT as f32;
    let descent = size - ascent;
    TextBounds::from_extents(0.0, advance(size) * count as f32, -ascent, descent)
}

/// Glyph bitmaps for one draw call. The font is parsed once and each
/// distinct character rasterized once.
struct GlyphCache {
    font: Option<PSF2Font<'static>>,
    glyphs: HashMap<char, Vec<u8>>,
}

impl GlyphCache {
    fn new() -> Self {
        let font = match PSF2Font::new(FONT_12X24) {
            Ok(font) => Some(font),
            Err(e) => {
                log::warn!("bitmap font unavailable, drawing boxes: {}", e);
                None
            }
        };
        Self {
            font,
            glyphs: HashMap::new(),
        }
    }

    fn get(&mut self, ch: char) -> &[u8] {
        let font = &mut self.font;
        self.glyphs
            .entry(ch)
            .or_insert_with(|| glyph_bitmap(font.as_mut(), ch))
    }
}

/// Generate a glyph bitmap. Each byte is 0 (empty) or 1 (ink).
fn glyph_bitmap(font: Option<&mut PSF2Font<'static>>, ch: char) -> Vec<u8> {
    let mut glyph = vec![0u8; CELL_WIDTH * CELL_HEIGHT];
    if ch == ' ' {
        return glyph;
    }
    let utf8 = ch.to_string();
    if let Some(font) = font
        && let Some(rows) = font.glyph_for_utf8(utf8.as_bytes())
    {
        for (row_y, row) in rows.enumerate() {
            for (col_x, on) in row.enumerate() {
                let idx = row_y * CELL_WIDTH + col_x;
                if col_x < CELL_WIDTH && idx < glyph.len() {
                    glyph[idx] = on as u8;
                }
            }
        }
        return glyph;
    }
    draw_box(&mut glyph, CELL_WIDTH, CELL_HEIGHT);
    glyph
}

/// Draw a box outline in the glyph buffer (unknown characters).
fn draw_box(glyph: &mut [u8], width: usize, height: usize) {
    for x in 0..width {
        glyph[x] = 1;
        glyph[(height - 1) * width + x] = 1;
    }
    for y in 0..height {
        glyph[y * width] = 1;
        glyph[y * width + width - 1] = 1;
    }
}

/// Draw `text` with its left edge at `x` and baseline at `baseline`.
pub fn draw_text(
    canvas: &mut RgbaImage,
    text: &str,
    size: f32,
    x: f32,
    baseline: f32,
    color: Color,
) {
    if text.is_empty() || size <= 0.0 {
        return;
    }
    let scale = size / CELL_HEIGHT as f32;
    let step = advance(size);
    let top = baseline - BASELINE_ROW as f32 * scale;
    let cell_w = step.ceil() as i64;
    let cell_h = size.ceil() as i64;
    let mut cache = GlyphCache::new();

    for (i, ch) in text.chars().enumerate() {
        let glyph = cache.get(ch);
        let left = x + step * i as f32;

        // Nearest neighbor: map each destination pixel back into the cell
        for dy in 0..cell_h {
            let sy = ((dy as f32 + 0.5) / scale) as usize;
            if sy >= CELL_HEIGHT {
                continue;
            }
            for dx in 0..cell_w {
                let sx = ((dx as f32 + 0.5) / scale) as usize;
                if sx >= CELL_WIDTH || glyph[sy * CELL_WIDTH + sx] == 0 {
                    continue;
                }
                let px = (left + dx as f32).floor() as i64;
                let py = (top + dy as f32).floor() as i64;
                blend_pixel(canvas, px, py, color, 1.0);
            }
        }
    }
}
