//! Paint error types

use thiserror::Error;

/// Errors raised by canvases and image export
#[derive(Error, Debug)]
pub enum PaintError {
    /// A pixmap needs a non-zero area
    #[error("Invalid pixmap dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// PNG encoding failed
    #[error("Image encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Result type for paint operations
pub type Result<T> = std::result::Result<T, PaintError>;
