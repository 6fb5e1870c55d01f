//! # Error Types
//!
//! This module defines error types used throughout the acredita library.
//!
//! Variants fall into two groups. Fatal ones (`CanvasAllocation`, `Encode`,
//! `Pdf`, `Config`, `Io`, `Record`) abort a render and reach the caller.
//! The rest describe degradable failures: components catch them, log them
//! and carry on without the affected element.

use thiserror::Error;

/// Main error type for acredita operations
#[derive(Debug, Error)]
pub enum AcreditaError {
    /// Canvas could not be created (zero or absurd dimensions)
    #[error("Canvas allocation failed: {0}")]
    CanvasAllocation(String),

    /// Final raster could not be encoded or written
    #[error("Encode error: {0}")]
    Encode(String),

    /// PDF generation failed
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Invalid or unusable configuration (e.g. missing default font)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed credential record or layout metadata
    #[error("Record error: {0}")]
    Record(#[from] serde_json::Error),

    /// Font file missing or unparsable
    #[error("Font error: {0}")]
    Font(String),

    /// Image decode/processing error
    #[error("Image error: {0}")]
    Image(String),

    /// Shape layer could not be built (e.g. geometry larger than any canvas)
    #[error("Shape error: {0}")]
    Shape(String),

    /// Zone grid could not be rendered
    #[error("Zones error: {0}")]
    Zones(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for AcreditaError {
    fn from(err: image::ImageError) -> Self {
        AcreditaError::Image(err.to_string())
    }
}

impl From<lopdf::Error> for AcreditaError {
    fn from(err: lopdf::Error) -> Self {
        AcreditaError::Pdf(err.to_string())
    }
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, AcreditaError>;
