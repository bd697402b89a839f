//! # Error Types
//!
//! This module defines error types used throughout the recuerdo library.

use thiserror::Error;

/// Main error type for recuerdo operations
#[derive(Debug, Error)]
pub enum RecuerdoError {
    /// Source photo bytes are not a decodable image
    #[error("Decode error: {0}")]
    Decode(String),

    /// A stage of the thermal-effect pipeline produced no output
    #[error("Filter stage error: {0}")]
    FilterStage(String),

    /// Barcode/QR payload rejected or the encoder produced no output
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Image processing error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
