//! Error types for softraster

use thiserror::Error;

/// Errors surfaced by buffer access, scene files and the collaborator seams.
///
/// Degenerate geometry is never an error: drawing calls silently do nothing.
#[derive(Error, Debug)]
pub enum RasterError {
    /// Pixel access outside the buffer
    #[error("pixel ({x}, {y}) is outside a {width}x{height} buffer")]
    OutOfRange {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },

    /// Raw pixel data does not match the requested dimensions
    #[error("raw pixel data has {actual} bytes, expected {expected}")]
    DataLength { expected: usize, actual: usize },

    /// A color string that none of the supported formats accept
    #[error("unrecognized color string: {0:?}")]
    InvalidColor(String),

    /// File system failure while loading or saving
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Scene file could not be parsed or written
    #[error("scene format error: {0}")]
    Scene(#[from] serde_json::Error),

    /// Buffer dimensions whose pixel count does not fit in memory
    #[error("{width}x{height} buffer is too large")]
    TooLarge { width: u32, height: u32 },

    /// The image decoder rejected the input
    #[error("image decode failed: {0}")]
    Decode(String),
}

/// Result type for softraster operations
pub type Result<T> = std::result::Result<T, RasterError>;
