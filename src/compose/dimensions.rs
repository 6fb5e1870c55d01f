//! Canvas dimension detection from the template image.

use serde::Serialize;
use std::path::Path;

use crate::config::RenderConfig;
use crate::snapshot::TemplateSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// Landscape iff strictly wider than tall.
    pub fn of(width: u32, height: u32) -> Self {
        if width > height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }
}

/// Final canvas size of one render.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CanvasDimensions {
    pub width: u32,
    pub height: u32,
    pub orientation: Orientation,
    /// Template image size before scaling; `None` without a template image.
    pub original_width: Option<u32>,
    pub original_height: Option<u32>,
}

impl CanvasDimensions {
    /// Config default canvas.
    pub fn default_for(config: &RenderConfig) -> Self {
        Self {
            width: config.default_width,
            height: config.default_height,
            orientation: Orientation::of(config.default_width, config.default_height),
            original_width: None,
            original_height: None,
        }
    }

    /// Scale a template image of `width` × `height` so its long edge is `long_edge`.
    pub fn scaled_from(width: u32, height: u32, long_edge: u32) -> Self {
        let orientation = Orientation::of(width, height);
        let factor = long_edge as f64 / width.max(height).max(1) as f64;
        let (w, h) = match orientation {
            Orientation::Landscape => (long_edge, (height as f64 * factor).floor() as u32),
            Orientation::Portrait => ((width as f64 * factor).floor() as u32, long_edge),
        };
        Self {
            width: w.max(1),
            height: h.max(1),
            orientation,
            original_width: Some(width),
            original_height: Some(height),
        }
    }

    /// Factor from template pixel units to canvas pixels.
    pub fn scale(&self) -> f32 {
        match self.original_width {
            Some(original) if original > 0 => self.width as f32 / original as f32,
            _ => 1.0,
        }
    }
}

/// Canvas size for a template, falling back to the config defaults.
pub fn detect_dimensions(template: Option<&TemplateSnapshot>, config: &RenderConfig) -> CanvasDimensions {
    let Some(file) = template.and_then(|t| t.file_path.as_deref()) else {
        log::info!(
            "dimensions default width={} height={} reason=no template image",
            config.default_width,
            config.default_height
        );
        return CanvasDimensions::default_for(config);
    };
    let path = config.resolve(file);
    match read_size(&path) {
        Ok((w, h)) if w > 0 && h > 0 => {
            let dims = CanvasDimensions::scaled_from(w, h, config.max_long_edge);
            log::info!(
                "dimensions detected template={} original={}x{} canvas={}x{} orientation={:?}",
                path.display(),
                w,
                h,
                dims.width,
                dims.height,
                dims.orientation
            );
            dims
        }
        Ok((w, h)) => {
            log::warn!("dimensions default template={} reason=empty image {}x{}", path.display(), w, h);
            CanvasDimensions::default_for(config)
        }
        Err(e) => {
            log::warn!("dimensions default template={} reason={}", path.display(), e);
            CanvasDimensions::default_for(config)
        }
    }
}

fn read_size(path: &Path) -> image::ImageResult<(u32, u32)> {
    image::image_dimensions(path)
}
