//! Provider banner: text on a rounded colored strip sized to the text.
//!
//! Geometry is planned first ([`plan_banner`]) and painted second, so the
//! overflow shrink can be tested without pixels.

use image::RgbaImage;
use serde::Serialize;

use crate::canvas::composite;
use crate::color::Color;
use crate::error::Result;
use crate::shape::{RoundedRectSpec, make_rounded_rect_layer};
use crate::template::{Alignment, Area, TextBlock};
use crate::text::{FontFace, MetricsEngine, TextBounds, draw_text, find_max_font_size};

const DEFAULT_RADIUS: f32 = 8.0;
const BANNER_TEXT: Color = Color::WHITE;

/// Resolved banner geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BannerPlan {
    pub font_size: f32,
    /// Pen position: left edge of the advance box.
    pub text_x: f32,
    pub baseline: f32,
    pub background: Area,
    /// Font was reduced to keep the banner on the canvas.
    pub shrunk: bool,
}

struct Geometry {
    bounds: TextBounds,
    bg_x: f32,
    bg_w: f32,
}

fn geometry(block: &TextBlock, bounds: TextBounds) -> Geometry {
    let pad = block.padding();
    let mut bg_w = block
        .fixed_width
        .unwrap_or(bounds.width + pad.left + pad.right);
    if let Some(max) = block.max_width {
        bg_w = bg_w.min(max);
    }
    let bg_x = match block.alignment {
        Alignment::Left => block.x - pad.left,
        Alignment::Center => block.x - bg_w / 2.0,
        Alignment::Right => block.x - bg_w + pad.right,
    };
    Geometry { bounds, bg_x, bg_w }
}

/// Widest banner that stays on a canvas `canvas_width` wide.
fn available_width(block: &TextBlock, canvas_width: f32) -> Option<f32> {
    let pad = block.padding();
    match block.alignment {
        Alignment::Left => Some(canvas_width - (block.x - pad.left)),
        Alignment::Center => Some(2.0 * (canvas_width - block.x)),
        // Anchored at its right edge; shrinking the font cannot move it.
        Alignment::Right => None,
    }
}

/// Plan the banner for `text`, shrinking the font if it would overflow
/// the right edge of the canvas.
pub fn plan_banner(
    block: &TextBlock,
    text: &str,
    font: &FontFace,
    metrics: &MetricsEngine,
    canvas_width: u32,
) -> BannerPlan {
    let pad = block.padding();
    let canvas_width = canvas_width as f32;
    let mut font_size = block.font_size.max(1.0);
    let mut geo = geometry(block, metrics.measure(text, font_size, font));
    let mut shrunk = false;

    let overflows = geo.bg_x + geo.bg_w > canvas_width;
    if overflows && block.fixed_width.is_none() {
        match available_width(block, canvas_width).map(|w| w - pad.left - pad.right) {
            Some(text_room) if text_room > 0.0 => {
                let fitted = find_max_font_size(metrics, text, font, text_room, f32::INFINITY);
                let fitted = (fitted as f32).min(font_size);
                if fitted < font_size {
                    log::info!(
                        "banner shrunk block={} requested={} final={} room={:.0}",
                        block.id,
                        font_size,
                        fitted,
                        text_room
                    );
                    font_size = fitted;
                    shrunk = true;
                    geo = geometry(block, metrics.measure(text, font_size, font));
                }
            }
            _ => log::warn!("banner overflows canvas block={} x={}", block.id, block.x),
        }
    }

    let bounds = geo.bounds;
    let ink_left = match block.alignment {
        Alignment::Left => geo.bg_x + pad.left,
        Alignment::Center => geo.bg_x + (geo.bg_w - bounds.width) / 2.0,
        Alignment::Right => geo.bg_x + geo.bg_w - pad.right - bounds.width,
    };
    let baseline = block.y + block.offset_y.unwrap_or(0.0);

    BannerPlan {
        font_size,
        text_x: ink_left - bounds.min_x,
        baseline,
        background: Area {
            x: geo.bg_x,
            y: baseline + bounds.min_y - pad.top,
            width: geo.bg_w,
            height: bounds.height + pad.top + pad.bottom,
        },
        shrunk,
    }
}

/// Paint a planned banner. Nothing is drawn when the background layer
/// cannot be built.
pub fn draw_banner(
    canvas: &mut RgbaImage,
    block: &TextBlock,
    plan: &BannerPlan,
    text: &str,
    font: &FontFace,
    supersample: u32,
) -> Result<()> {
    let Some(fill) = block.background_color else {
        return Ok(());
    };
    let bg = plan.background;
    let spec = RoundedRectSpec {
        width: bg.width.round().max(1.0) as u32,
        height: bg.height.round().max(1.0) as u32,
        radius: block.border_radius.unwrap_or(DEFAULT_RADIUS),
        fill,
        stroke: block.border_color.unwrap_or(Color::TRANSPARENT),
        stroke_width: block.border_width.unwrap_or(0.0),
        ..Default::default()
    };
    let layer = make_rounded_rect_layer(&spec, supersample)?;
    composite(canvas, &layer, bg.x.round() as i64, bg.y.round() as i64);
    draw_text(canvas, font, text, plan.font_size, plan.text_x, plan.baseline, BANNER_TEXT);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::new_canvas;
    use image::Rgba;

    fn banner(x: f32, size: f32) -> TextBlock {
        let mut block = TextBlock::new("proveedor", x, 100.0, size);
        block.background_color = Some(Color::rgb(0x1E, 0x3A, 0x8A));
        block
    }

    fn plan(block: &TextBlock, text: &str, canvas_width: u32) -> BannerPlan {
        plan_banner(block, text, &FontFace::Bitmap, &MetricsEngine::cell(), canvas_width)
    }

    #[test]
    fn test_banner_wraps_text_with_padding() {
        // "CLUB" at 24 px: 4 × 12 = 48 wide, cell box 24 tall (19 above baseline)
        let p = plan(&banner(50.0, 24.0), "CLUB", 1000);
        assert!(!p.shrunk);
        assert_eq!(p.font_size, 24.0);
        assert_eq!(p.text_x, 50.0);
        assert_eq!(p.baseline, 100.0);
        assert_eq!(
            p.background,
            Area {
                x: 34.0,
                y: 100.0 - 19.0 - 8.0,
                width: 48.0 + 32.0,
                height: 24.0 + 16.0,
            }
        );
    }

    #[test]
    fn test_overflow_shrinks_font() {
        let block = banner(300.0, 48.0);
        let p = plan(&block, "CLUB NORTE", 400);
        assert!(p.shrunk);
        assert!(p.font_size < 48.0);
        assert!(p.background.x + p.background.width <= 400.0);
        assert_eq!(p.background.x, 284.0);
    }

    #[test]
    fn test_fixed_width_never_shrinks() {
        let mut block = banner(300.0, 48.0);
        block.fixed_width = Some(500.0);
        let p = plan(&block, "CLUB NORTE", 400);
        assert!(!p.shrunk);
        assert_eq!(p.font_size, 48.0);
        assert_eq!(p.background.width, 500.0);
    }

    #[test]
    fn test_max_width_caps_background() {
        let mut block = banner(10.0, 24.0);
        block.max_width = Some(60.0);
        let p = plan(&block, "CLUB NORTE", 1000);
        assert_eq!(p.background.width, 60.0);
    }

    #[test]
    fn test_center_alignment_centers_background() {
        let mut block = banner(500.0, 24.0);
        block.alignment = Alignment::Center;
        let p = plan(&block, "CLUB", 1000);
        let center = p.background.x + p.background.width / 2.0;
        assert_eq!(center, 500.0);
        assert_eq!(p.text_x, 476.0);
    }

    #[test]
    fn test_offset_moves_baseline() {
        let mut block = banner(50.0, 24.0);
        block.offset_y = Some(12.0);
        assert_eq!(plan(&block, "CLUB", 1000).baseline, 112.0);
    }

    #[test]
    fn test_draw_paints_background_and_white_text() {
        let block = banner(50.0, 24.0);
        let mut canvas = new_canvas(300, 200, Color::rgb(128, 128, 128)).unwrap();
        let p = plan(&block, "CLUB", 300);
        draw_banner(&mut canvas, &block, &p, "CLUB", &FontFace::Bitmap, 2).unwrap();

        // Inside the padding band: banner color.
        let (x, y) = ((p.background.x + p.background.width / 2.0) as u32, (p.background.y + 3.0) as u32);
        assert_eq!(*canvas.get_pixel(x, y), Rgba([0x1E, 0x3A, 0x8A, 255]));
        let has_white = canvas.pixels().any(|px| *px == Rgba([255, 255, 255, 255]));
        assert!(has_white);
    }

    #[test]
    fn test_oversized_fixed_width_is_an_error() {
        let mut block = banner(50.0, 24.0);
        block.fixed_width = Some(3.0e9);
        let mut canvas = new_canvas(300, 200, Color::WHITE).unwrap();
        let p = plan(&block, "CLUB", 300);
        assert!(draw_banner(&mut canvas, &block, &p, "CLUB", &FontFace::Bitmap, 3).is_err());
    }
}
