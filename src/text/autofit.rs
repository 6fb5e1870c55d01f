//! Autofit: the largest font size at which a string fits a box.
//!
//! Doubling probe from 1 px up to [`MAX_FONT_SIZE`], then binary search
//! between the last size that fit and the first that did not. The result
//! keeps a 1 px safety margin below the boundary.

use super::FontFace;
use super::metrics::MetricsEngine;

/// Hard ceiling for the doubling probe.
pub const MAX_FONT_SIZE: u32 = 400;

/// Whether `text` at `size` px fits inside `max_width` × `max_height`.
pub fn text_fits(
    engine: &MetricsEngine,
    text: &str,
    font: &FontFace,
    size: u32,
    max_width: f32,
    max_height: f32,
) -> bool {
    let bounds = engine.measure(text, size as f32, font);
    bounds.width <= max_width && bounds.height <= max_height
}

/// Largest font size (minus 1 px, floor 1) at which `text` fits.
///
/// Pass `f32::INFINITY` as `max_height` to constrain by width only.
pub fn find_max_font_size(
    engine: &MetricsEngine,
    text: &str,
    font: &FontFace,
    max_width: f32,
    max_height: f32,
) -> u32 {
    if text.is_empty() {
        return 1;
    }
    let fits = |size: u32| text_fits(engine, text, font, size, max_width, max_height);

    if !fits(1) {
        return 1;
    }

    // Doubling phase: `low` always fits, `high` is the first size that does not
    let mut low = 1u32;
    let mut high = None;
    while low < MAX_FONT_SIZE {
        let probe = (low * 2).min(MAX_FONT_SIZE);
        if fits(probe) {
            low = probe;
        } else {
            high = Some(probe);
            break;
        }
    }
    let Some(mut high) = high else {
        return MAX_FONT_SIZE - 1;
    };

    while high - low > 1 {
        let mid = low + (high - low) / 2;
        if fits(mid) {
            low = mid;
        } else {
            high = mid;
        }
    }

    low.saturating_sub(1).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> MetricsEngine {
        MetricsEngine::cell()
    }

    #[test]
    fn test_result_fits_and_is_tight() {
        let engine = engine();
        let font = FontFace::Bitmap;
        for (text, w, h) in [("12", 80.0, 90.0), ("PROVEEDOR S.A.", 300.0, 60.0), ("7", 33.0, 500.0)] {
            let size = find_max_font_size(&engine, text, &font, w, h);
            assert!(text_fits(&engine, text, &font, size, w, h), "{text} at {size}");
            // One px below the boundary: size+1 fits, size+2 does not
            assert!(text_fits(&engine, text, &font, size + 1, w, h), "{text} margin");
            assert!(!text_fits(&engine, text, &font, size + 2, w, h), "{text} tight");
        }
    }

    #[test]
    fn test_monotonic_in_width() {
        let engine = engine();
        let font = FontFace::Bitmap;
        let mut previous = u32::MAX;
        for width in (20..=600).rev().step_by(17) {
            let size = find_max_font_size(&engine, "ACREDITACION", &font, width as f32, 80.0);
            assert!(size <= previous, "width {width}: {size} > {previous}");
            previous = size;
        }
    }

    #[test]
    fn test_ceiling_and_floor() {
        let engine = engine();
        let font = FontFace::Bitmap;
        assert_eq!(
            find_max_font_size(&engine, "1", &font, 10_000.0, 10_000.0),
            MAX_FONT_SIZE - 1
        );
        assert_eq!(find_max_font_size(&engine, "TOO WIDE", &font, 1.0, 1.0), 1);
        assert_eq!(find_max_font_size(&engine, "", &font, 100.0, 100.0), 1);
    }

    #[test]
    fn test_width_only_constraint() {
        let engine = engine();
        let font = FontFace::Bitmap;
        // 10 chars * size/2 <= 200 -> size <= 40, margin -> 39
        assert_eq!(
            find_max_font_size(&engine, "ABCDEFGHIJ", &font, 200.0, f32::INFINITY),
            39
        );
    }

    #[test]
    fn test_deterministic() {
        let engine = engine();
        let font = FontFace::Bitmap;
        let a = find_max_font_size(&engine, "Zona 12", &font, 140.0, 70.0);
        let b = find_max_font_size(&engine, "Zona 12", &font, 140.0, 70.0);
        assert_eq!(a, b);
    }
}
