//! Error types for the color-region detection engine.

use crate::core_modules::region::Region;
use thiserror::Error;

/// Main error type for probe operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The frame has no pixels. This is the "missing frame" case and is always a
    /// programmer error on the caller's side.
    #[error("Frame is empty or missing")]
    EmptyFrame,

    #[error("Region {region} lies outside the {frame_width}x{frame_height} frame")]
    OutOfBounds {
        region: Region,
        frame_width: u32,
        frame_height: u32,
    },

    #[error("Frame buffer too small: expected at least {expected} bytes, got {actual}")]
    BufferTooSmall { expected: usize, actual: usize },

    #[error("A {width}x{height} frame with a {stride} byte stride does not fit in memory")]
    FrameTooLarge { width: u32, height: u32, stride: usize },

    #[error("Row stride of {stride} bytes cannot hold a {row_bytes} byte row")]
    InvalidStride { stride: usize, row_bytes: usize },

    #[error("Invalid color range on channel {channel}: min {min} > max {max}")]
    InvalidColorRange { channel: char, min: u8, max: u8 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Worker task failed: {0}")]
    Worker(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

/// Result type alias for probe operations.
pub type Result<T> = std::result::Result<T, Error>;
