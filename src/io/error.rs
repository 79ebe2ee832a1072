//! Error types for palette construction, image decoding and mosaic synthesis

use std::fmt;
use std::path::PathBuf;

/// Main error type for all mosaic operations
#[derive(Debug)]
pub enum MosaicError {
    /// The filtered palette contains no colors
    ///
    /// Raised while building a palette, never at match time, so an empty
    /// palette surfaces as a configuration problem.
    EmptyPalette,

    /// Source image could not be decoded
    ImageDecode {
        /// Identifier of the failing source (file path or caller-supplied name)
        source_id: String,
        /// Underlying decoder error
        source: image::ImageError,
    },

    /// Grid or image dimensions are zero or otherwise unusable
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },

    /// A palette color string is not a valid hex color
    InvalidColor {
        /// The rejected input
        value: String,
    },

    /// Pixel access outside of the decoded buffer
    PixelOutOfBounds {
        /// Column that was requested
        x: u32,
        /// Row that was requested
        y: u32,
        /// Buffer dimensions (width, height)
        dimensions: (u32, u32),
    },

    /// Raw pixel data doesn't match its declared shape
    InvalidSourceData {
        /// Description of what's wrong with the source data
        reason: String,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// The conversion request was cancelled by its owner
    Cancelled,

    /// Failed to save a preview image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for MosaicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPalette => {
                write!(f, "Palette is empty after filtering; at least one color is required")
            }
            Self::ImageDecode { source_id, source } => {
                write!(f, "Failed to decode image '{source_id}': {source}")
            }
            Self::InvalidDimensions { width, height } => {
                write!(f, "Invalid dimensions {width}x{height}: both must be positive")
            }
            Self::InvalidColor { value } => {
                write!(f, "Invalid hex color '{value}'")
            }
            Self::PixelOutOfBounds { x, y, dimensions } => {
                write!(
                    f,
                    "Pixel ({x}, {y}) is outside the {}x{} image",
                    dimensions.0, dimensions.1
                )
            }
            Self::InvalidSourceData { reason } => {
                write!(f, "Invalid source data: {reason}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::Cancelled => write!(f, "Conversion was cancelled"),
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for MosaicError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageDecode { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for mosaic results
pub type Result<T> = std::result::Result<T, MosaicError>;

impl From<std::io::Error> for MosaicError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> MosaicError {
    MosaicError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Wrap a decoder error with the identifier of the source that failed
pub fn decode_error(source_id: impl Into<String>, source: image::ImageError) -> MosaicError {
    MosaicError::ImageDecode {
        source_id: source_id.into(),
        source,
    }
}
