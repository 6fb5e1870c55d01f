//! RGBA pixel compositing helpers shared by text, shapes and the compositor.
//!
//! Everything composites with straight (non-premultiplied) source-over.
//! Coordinates are signed so callers can draw partially off-canvas; out of
//! range pixels are dropped.

use image::{Rgba, RgbaImage};

use crate::color::Color;
use crate::error::{AcreditaError, Result};

/// Largest canvas edge we agree to allocate.
pub const MAX_CANVAS_EDGE: u32 = 16_384;

/// Allocate an opaque canvas filled with `color`.
pub fn new_canvas(width: u32, height: u32, color: Color) -> Result<RgbaImage> {
    if width == 0 || height == 0 || width > MAX_CANVAS_EDGE || height > MAX_CANVAS_EDGE {
        return Err(AcreditaError::CanvasAllocation(format!(
            "refusing {}x{} canvas",
            width, height
        )));
    }
    Ok(RgbaImage::from_pixel(width, height, color.to_rgba()))
}

/// Source-over of one straight-alpha pixel onto another.
#[inline]
pub fn over(dst: Rgba<u8>, src: Rgba<u8>, coverage: f32) -> Rgba<u8> {
    let sa = (src[3] as f32 / 255.0) * coverage.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return dst;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let mut out = [0u8; 4];
    for c in 0..3 {
        let s = src[c] as f32;
        let d = dst[c] as f32;
        let v = (s * sa + d * da * (1.0 - sa)) / out_a;
        out[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgba(out)
}

/// Blend `color` at `(x, y)` with the given coverage.
#[inline]
pub fn blend_pixel(img: &mut RgbaImage, x: i64, y: i64, color: Color, coverage: f32) {
    if x < 0 || y < 0 || x >= img.width() as i64 || y >= img.height() as i64 {
        return;
    }
    let px = img.get_pixel_mut(x as u32, y as u32);
    *px = over(*px, color.to_rgba(), coverage);
}

/// Fill an axis-aligned rectangle (clipped to the image).
pub fn fill_rect(img: &mut RgbaImage, x: i64, y: i64, width: i64, height: i64, color: Color) {
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + width).min(img.width() as i64);
    let y1 = (y + height).min(img.height() as i64);
    for py in y0..y1 {
        for px in x0..x1 {
            blend_pixel(img, px, py, color, 1.0);
        }
    }
}

/// Composite `layer` onto `canvas` with its top-left at `(x, y)`.
pub fn composite(canvas: &mut RgbaImage, layer: &RgbaImage, x: i64, y: i64) {
    image::imageops::overlay(canvas, layer, x, y);
}

/// Flatten onto an opaque background, dropping alpha.
pub fn flatten(img: &RgbaImage, background: Color) -> image::RgbImage {
    let bg = background.to_rgba();
    image::RgbImage::from_fn(img.width(), img.height(), |x, y| {
        let p = over(bg, *img.get_pixel(x, y), 1.0);
        image::Rgb([p[0], p[1], p[2]])
    })
}
