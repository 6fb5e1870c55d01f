//! # Acredita - Credential Badge Compositor
//!
//! Acredita renders event access credentials from immutable snapshot
//! records. It provides:
//!
//! - **Text**: two metrics backends (glyph outlines, advance cells) and an
//!   autofit sizer
//! - **Shapes**: supersampled anti-aliased rounded rectangles with border
//!   and drop shadow
//! - **Zones grid**: authorized zones as numbered badges, laid out by count
//! - **Compositor**: template background, text blocks, photo, QR
//! - **PDF**: one page at the raster's exact physical size
//!
//! ## Quick Start
//!
//! ```no_run
//! use acredita::{RenderConfig, compose::generate_credential, snapshot::CredentialRecord};
//!
//! let record = CredentialRecord::from_json(&std::fs::read_to_string("record.json")?)?;
//! let config = RenderConfig::default();
//!
//! let artifacts = generate_credential(&record, &config)?;
//! println!("PNG: {}", artifacts.image_path.display());
//!
//! # Ok::<(), acredita::AcreditaError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`compose`] | Dimension detection, compositor, credential pipeline |
//! | [`text`] | Fonts, metrics backends, autofit |
//! | [`shape`] | Rounded-rectangle layers |
//! | [`zones`] | Zone grid planning and rendering |
//! | [`template`] | `layout_meta` types and block id → field table |
//! | [`pdf`] | Raster → print-exact PDF |
//! | [`snapshot`] | Input records |
//! | [`canvas`] | RGBA canvas helpers |
//! | [`config`] | Render configuration |
//! | [`error`] | Error types |

pub mod canvas;
pub mod color;
pub mod compose;
pub mod config;
pub mod error;
pub mod pdf;
pub mod shape;
pub mod snapshot;
pub mod template;
pub mod text;
pub mod zones;

// Re-exports for convenience
pub use color::Color;
pub use compose::{CredentialArtifacts, generate_credential};
pub use config::RenderConfig;
pub use error::AcreditaError;
