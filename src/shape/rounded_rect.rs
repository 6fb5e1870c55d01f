//! # Rounded Rectangles
//!
//! Anti-aliased rounded rectangles built from primitive pieces, rendered
//! at a supersampled resolution and filtered down.
//!
//! ## Construction
//!
//! ```text
//!   ╭──────────╮      central rect: full height, inset by r horizontally
//!   │          │      side rects:   left and right strips, inset by r vertically
//!   │          │      corner discs: radius r at each inner corner
//!   ╰──────────╯
//! ```
//!
//! A border is a full-size shape in the stroke color with an inset shape
//! (inset by the stroke width, radius reduced by the same amount) in the
//! fill color on top. A drop shadow is a blurred shape in the shadow color
//! placed `shadow_offset` px down and right, underneath.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::canvas::MAX_CANVAS_EDGE;
use crate::color::Color;
use crate::error::{AcreditaError, Result};

/// Geometry and paint of one rounded rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundedRectSpec {
    pub width: u32,
    pub height: u32,
    pub radius: f32,
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f32,
    pub shadow: bool,
    pub shadow_offset: u32,
    pub shadow_blur: f32,
    pub shadow_color: Color,
}

impl Default for RoundedRectSpec {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
            radius: 0.0,
            fill: Color::WHITE,
            stroke: Color::TRANSPARENT,
            stroke_width: 0.0,
            shadow: false,
            shadow_offset: 4,
            shadow_blur: 3.0,
            shadow_color: Color::rgba(0, 0, 0, 96),
        }
    }
}

impl RoundedRectSpec {
    /// Radius actually drawn: clamped to half the shorter side.
    pub fn effective_radius(&self) -> f32 {
        clamp_radius(self.radius, self.width.max(1) as f32, self.height.max(1) as f32)
    }

    /// Size of the layer produced for this spec.
    pub fn layer_size(&self) -> (u32, u32) {
        let (w, h) = (self.width.max(1), self.height.max(1));
        if self.shadow {
            let pad = self.shadow_offset.saturating_add(blur_pad(self.shadow_blur));
            (w.saturating_add(pad), h.saturating_add(pad))
        } else {
            (w, h)
        }
    }
}

#[inline]
fn clamp_radius(radius: f32, width: f32, height: f32) -> f32 {
    radius.max(0.0).min(width.min(height) / 2.0)
}

#[inline]
fn blur_pad(sigma: f32) -> u32 {
    if sigma > 0.0 { (sigma * 2.0).ceil() as u32 } else { 0 }
}

/// Union of rects and discs, one flag per pixel.
struct Mask {
    width: usize,
    height: usize,
    data: Vec<bool>,
}

impl Mask {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![false; width * height],
        }
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let x0 = x.round().max(0.0) as usize;
        let y0 = y.round().max(0.0) as usize;
        let x1 = ((x + w).round().max(0.0) as usize).min(self.width);
        let y1 = ((y + h).round().max(0.0) as usize).min(self.height);
        for py in y0..y1 {
            self.data[py * self.width + x0.min(x1)..py * self.width + x1].fill(true);
        }
    }

    fn fill_disc(&mut self, cx: f32, cy: f32, r: f32) {
        if r <= 0.0 {
            return;
        }
        let r_sq = r * r;
        let x0 = (cx - r).floor().max(0.0) as usize;
        let y0 = (cy - r).floor().max(0.0) as usize;
        let x1 = ((cx + r).ceil().max(0.0) as usize).min(self.width);
        let y1 = ((cy + r).ceil().max(0.0) as usize).min(self.height);
        for py in y0..y1 {
            for px in x0..x1 {
                let dx = px as f32 + 0.5 - cx;
                let dy = py as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r_sq {
                    self.data[py * self.width + px] = true;
                }
            }
        }
    }

    /// Central rect, two side rects, four corner discs.
    fn fill_rounded(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32) {
        let w = w.max(1.0);
        let h = h.max(1.0);
        let r = clamp_radius(radius, w, h);

        self.fill_rect(x + r, y, w - 2.0 * r, h);
        self.fill_rect(x, y + r, r, h - 2.0 * r);
        self.fill_rect(x + w - r, y + r, r, h - 2.0 * r);

        self.fill_disc(x + r, y + r, r);
        self.fill_disc(x + w - r, y + r, r);
        self.fill_disc(x + r, y + h - r, r);
        self.fill_disc(x + w - r, y + h - r, r);
    }

    fn paint(&self, img: &mut RgbaImage, color: Color) {
        let rgba = color.to_rgba();
        for (i, &on) in self.data.iter().enumerate() {
            if on {
                let x = (i % self.width) as u32;
                let y = (i / self.width) as u32;
                img.put_pixel(x, y, rgba);
            }
        }
    }
}

/// Transparent canvas whose color channels already hold `color`, so
/// filtering at shape edges does not pull in black.
fn clear_canvas(width: u32, height: u32, color: Color) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba([color.r, color.g, color.b, 0]))
}

/// Render the shape (border + fill, no shadow) at `width` × `height`.
fn render_shape(spec: &RoundedRectSpec, width: u32, height: u32, factor: u32) -> Result<RgbaImage> {
    let s = factor as f32;
    let (big_w, big_h) = match (width.checked_mul(factor), height.checked_mul(factor)) {
        (Some(w), Some(h)) => (w, h),
        _ => {
            return Err(AcreditaError::Shape(format!(
                "{}x{} at {}x supersampling overflows",
                width, height, factor
            )));
        }
    };
    let w = big_w as f32;
    let h = big_h as f32;
    let radius = clamp_radius(spec.radius * s, w, h);
    let stroke = (spec.stroke_width * s).max(0.0);

    let edge_color = if stroke > 0.0 { spec.stroke } else { spec.fill };
    let mut big = clear_canvas(big_w, big_h, edge_color);

    if stroke > 0.0 {
        let mut outer = Mask::new(big_w as usize, big_h as usize);
        outer.fill_rounded(0.0, 0.0, w, h, radius);
        outer.paint(&mut big, spec.stroke);

        let mut inner = Mask::new(big_w as usize, big_h as usize);
        inner.fill_rounded(
            stroke,
            stroke,
            (w - 2.0 * stroke).max(1.0),
            (h - 2.0 * stroke).max(1.0),
            (radius - stroke).max(0.0),
        );
        inner.paint(&mut big, spec.fill);
    } else {
        let mut mask = Mask::new(big_w as usize, big_h as usize);
        mask.fill_rounded(0.0, 0.0, w, h, radius);
        mask.paint(&mut big, spec.fill);
    }

    if factor == 1 {
        Ok(big)
    } else {
        Ok(imageops::resize(&big, width, height, FilterType::Triangle))
    }
}

/// Supersample factor, lowered so the oversized buffer keeps within
/// `MAX_CANVAS_EDGE` on both axes.
fn effective_factor(width: u32, height: u32, supersample: u32) -> u32 {
    let limit = (MAX_CANVAS_EDGE / width.max(height).max(1)).max(1);
    supersample.clamp(1, limit)
}

/// Render a rounded rectangle into a new transparent RGBA layer.
///
/// The shape occupies `(0, 0)..(width, height)`. With a shadow the layer
/// grows to the right and bottom by `shadow_offset` plus the blur spread.
///
/// Layers larger than `MAX_CANVAS_EDGE` on either side are refused with
/// [`AcreditaError::Shape`].
pub fn make_rounded_rect_layer(spec: &RoundedRectSpec, supersample: u32) -> Result<RgbaImage> {
    let width = spec.width.max(1);
    let height = spec.height.max(1);
    let (layer_w, layer_h) = spec.layer_size();
    if layer_w > MAX_CANVAS_EDGE || layer_h > MAX_CANVAS_EDGE {
        return Err(AcreditaError::Shape(format!(
            "layer {}x{} exceeds {} px",
            layer_w, layer_h, MAX_CANVAS_EDGE
        )));
    }
    let factor = effective_factor(width, height, supersample);
    if factor < supersample {
        log::debug!("supersample lowered from {} to {} for {}x{} layer", supersample, factor, width, height);
    }
    let shape = render_shape(spec, width, height, factor)?;

    if !spec.shadow {
        return Ok(shape);
    }

    let mut layer = clear_canvas(layer_w, layer_h, spec.shadow_color);

    let shadow_spec = RoundedRectSpec {
        fill: spec.shadow_color,
        stroke_width: 0.0,
        ..spec.clone()
    };
    let silhouette = render_shape(&shadow_spec, width, height, factor)?;
    let offset = spec.shadow_offset as i64;
    imageops::replace(&mut layer, &silhouette, offset, offset);
    if spec.shadow_blur > 0.0 {
        layer = imageops::blur(&layer, spec.shadow_blur);
    }

    imageops::overlay(&mut layer, &shape, 0, 0);
    Ok(layer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alpha(img: &RgbaImage, x: u32, y: u32) -> u8 {
        img.get_pixel(x, y)[3]
    }

    #[test]
    fn test_radius_clamps_to_half_min_side() {
        let spec = RoundedRectSpec {
            width: 10,
            height: 10,
            radius: 100.0,
            ..Default::default()
        };
        assert_eq!(spec.effective_radius(), 5.0);

        let layer = make_rounded_rect_layer(&spec, 3).unwrap();
        let explicit = make_rounded_rect_layer(
            &RoundedRectSpec {
                radius: 5.0,
                ..spec.clone()
            },
            3,
        )
        .unwrap();
        assert_eq!(layer, explicit);
        assert_eq!(layer.dimensions(), (10, 10));
        assert!(alpha(&layer, 0, 0) < 40, "corner should be cut away");
        assert_eq!(alpha(&layer, 5, 5), 255);
    }

    #[test]
    fn test_square_corners_without_radius() {
        let spec = RoundedRectSpec {
            width: 12,
            height: 8,
            fill: Color::rgb(10, 20, 30),
            ..Default::default()
        };
        let layer = make_rounded_rect_layer(&spec, 3).unwrap();
        assert_eq!(*layer.get_pixel(0, 0), Rgba([10, 20, 30, 255]));
        assert_eq!(*layer.get_pixel(11, 7), Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn test_antialiased_edges() {
        let spec = RoundedRectSpec {
            width: 40,
            height: 40,
            radius: 20.0,
            fill: Color::BLACK,
            ..Default::default()
        };
        let layer = make_rounded_rect_layer(&spec, 3).unwrap();
        let partial = layer.pixels().filter(|p| p[3] > 0 && p[3] < 255).count();
        assert!(partial > 0, "supersampling should leave partial coverage at the rim");
    }

    #[test]
    fn test_border_is_inset_fill() {
        let spec = RoundedRectSpec {
            width: 40,
            height: 20,
            radius: 4.0,
            fill: Color::WHITE,
            stroke: Color::rgb(200, 0, 0),
            stroke_width: 4.0,
            ..Default::default()
        };
        let layer = make_rounded_rect_layer(&spec, 3).unwrap();
        assert_eq!(*layer.get_pixel(20, 1), Rgba([200, 0, 0, 255]));
        assert_eq!(*layer.get_pixel(20, 10), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_shadow_extends_layer() {
        let spec = RoundedRectSpec {
            width: 30,
            height: 20,
            radius: 6.0,
            shadow: true,
            shadow_offset: 4,
            shadow_blur: 2.0,
            ..Default::default()
        };
        let layer = make_rounded_rect_layer(&spec, 3).unwrap();
        assert_eq!(layer.dimensions(), (38, 28));
        // Below the shape's bottom edge, inside the offset shadow
        assert!(alpha(&layer, 15, 22) > 0);
        // Shape itself stays opaque
        assert_eq!(alpha(&layer, 15, 10), 255);
    }

    #[test]
    fn test_degenerate_sizes_clamp_to_one_pixel() {
        let spec = RoundedRectSpec {
            width: 0,
            height: 0,
            radius: 3.0,
            stroke_width: 10.0,
            stroke: Color::BLACK,
            ..Default::default()
        };
        let layer = make_rounded_rect_layer(&spec, 3).unwrap();
        assert_eq!(layer.dimensions(), (1, 1));
    }

    #[test]
    fn test_oversized_layer_is_refused() {
        let spec = RoundedRectSpec {
            width: 3_000_000_000,
            height: 40,
            radius: 8.0,
            ..Default::default()
        };
        assert!(matches!(
            make_rounded_rect_layer(&spec, 3),
            Err(AcreditaError::Shape(_))
        ));

        let shadowed = RoundedRectSpec {
            width: MAX_CANVAS_EDGE,
            height: 10,
            shadow: true,
            ..Default::default()
        };
        assert!(make_rounded_rect_layer(&shadowed, 3).is_err());
    }

    #[test]
    fn test_large_layer_lowers_supersampling() {
        assert_eq!(effective_factor(40, 40, 3), 3);
        assert_eq!(effective_factor(MAX_CANVAS_EDGE / 2, 10, 3), 2);
        assert_eq!(effective_factor(MAX_CANVAS_EDGE, 10, 3), 1);
        assert_eq!(effective_factor(10, 10, 0), 1);
    }
}
