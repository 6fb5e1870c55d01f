//! # Render Configuration
//!
//! Defaults and storage layout for credential rendering.
//!
//! ## Defaults
//!
//! | Setting | Value |
//! |---------|-------|
//! | Canvas (no template) | 1024 × 1448 px, portrait |
//! | Long edge cap | 1448 px |
//! | PDF reference DPI | 96 |
//! | Supersampling | 3× |
//!
//! ## Calculations
//!
//! ```text
//! mm = px * 25.4 / dpi
//!
//! At 96 DPI:
//!   1448 px = 383.1 mm
//!   1024 px = 270.9 mm
//! ```
//!
//! ## Usage
//!
//! ```
//! use acredita::config::RenderConfig;
//!
//! let config = RenderConfig::default();
//! assert_eq!(config.max_long_edge, 1448);
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::color::Color;
use crate::error::{AcreditaError, Result};

/// Which text metrics backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricsBackend {
    /// Probe the outline backend at startup, fall back to cell metrics.
    #[default]
    Auto,
    /// Always measure glyph outlines.
    Outline,
    /// Always measure advance cells.
    Cell,
}

/// Render settings supplied by the surrounding application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Canvas width when no template image is available
    pub default_width: u32,

    /// Canvas height when no template image is available
    pub default_height: u32,

    /// Long edge of the canvas after scaling a template image
    pub max_long_edge: u32,

    /// Base directory for relative template, photo, QR and font paths
    pub storage_root: PathBuf,

    /// Output directory for rendered PNGs (relative to `storage_root`)
    pub images_dir: PathBuf,

    /// Output directory for PDFs (relative to `storage_root`)
    pub pdfs_dir: PathBuf,

    /// Directory searched for block fonts given by bare name
    pub fonts_dir: PathBuf,

    /// Default TTF/OTF font. `None` uses the built-in bitmap face.
    pub default_font: Option<PathBuf>,

    /// Flat background used when the template has no image
    pub background_color: Color,

    /// Reference DPI for px → mm conversion
    pub pdf_dpi: f32,

    /// Supersampling factor for rounded shapes
    pub supersample: u32,

    /// Metrics backend selection
    pub metrics_backend: MetricsBackend,

    /// Default QR edge length at `default_width`, in px
    pub qr_size: u32,

    /// Default QR margin from the bottom-right corner at `default_width`, in px
    pub qr_margin: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            default_width: 1024,
            default_height: 1448,
            max_long_edge: 1448,
            storage_root: PathBuf::from("."),
            images_dir: PathBuf::from("credentials/images"),
            pdfs_dir: PathBuf::from("credentials/pdfs"),
            fonts_dir: PathBuf::from("fonts"),
            default_font: None,
            background_color: Color::rgb(0xF3, 0xF4, 0xF6),
            pdf_dpi: 96.0,
            supersample: 3,
            metrics_backend: MetricsBackend::Auto,
            qr_size: 180,
            qr_margin: 24,
        }
    }
}

impl RenderConfig {
    /// Load a configuration from a JSON file. Missing keys take defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: RenderConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make every render fail.
    pub fn validate(&self) -> Result<()> {
        if self.default_width == 0 || self.default_height == 0 {
            return Err(AcreditaError::Config(format!(
                "default canvas must be non-zero, got {}x{}",
                self.default_width, self.default_height
            )));
        }
        if self.max_long_edge == 0 {
            return Err(AcreditaError::Config("max_long_edge must be non-zero".into()));
        }
        if self.pdf_dpi <= 0.0 {
            return Err(AcreditaError::Config(format!(
                "pdf_dpi must be positive, got {}",
                self.pdf_dpi
            )));
        }
        Ok(())
    }

    /// Resolve a possibly relative input path against `storage_root`.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.storage_root.join(path)
        }
    }

    /// Deterministic PNG path for a credential.
    pub fn image_path(&self, uuid: &uuid::Uuid) -> PathBuf {
        self.resolve(&self.images_dir).join(format!("{}.png", uuid))
    }

    /// Deterministic PDF path for a credential.
    pub fn pdf_path(&self, uuid: &uuid::Uuid) -> PathBuf {
        self.resolve(&self.pdfs_dir).join(format!("{}.pdf", uuid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_takes_defaults() {
        let config: RenderConfig =
            serde_json::from_str(r#"{"default_width": 800, "metrics_backend": "cell"}"#).unwrap();
        assert_eq!(config.default_width, 800);
        assert_eq!(config.default_height, 1448);
        assert_eq!(config.metrics_backend, MetricsBackend::Cell);
    }

    #[test]
    fn test_validate_rejects_zero_canvas() {
        let config = RenderConfig {
            default_width: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(AcreditaError::Config(_))));
    }

    #[test]
    fn test_paths_keyed_by_uuid() {
        let config = RenderConfig {
            storage_root: PathBuf::from("/srv/app"),
            ..Default::default()
        };
        let id = uuid::Uuid::nil();
        assert_eq!(
            config.image_path(&id),
            PathBuf::from("/srv/app/credentials/images/00000000-0000-0000-0000-000000000000.png")
        );
        assert_eq!(
            config.resolve(Path::new("/abs/photo.jpg")),
            PathBuf::from("/abs/photo.jpg")
        );
    }
}
