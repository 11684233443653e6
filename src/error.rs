//! Error types for PDF conversion
//!
//! Every failure a conversion can hit maps to one variant here; the
//! converter flattens them into the message string of a failed result.

use thiserror::Error;

use crate::constants::{CONTEXT_UNAVAILABLE_MESSAGE, ENCODE_FAILED_MESSAGE};

/// Errors that can occur while converting a PDF page to an image
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Not running inside a host that provides a document context
    #[error("{0}")]
    EnvironmentUnsupported(String),

    /// The rendering engine could not be loaded
    #[error("Failed to load PDF engine: {0}")]
    EngineUnavailable(String),

    /// Reading the input file failed
    #[error("Failed to read file: {0}")]
    Read(#[from] std::io::Error),

    /// The bytes are not a PDF the engine understands (engine message verbatim)
    #[error("{0}")]
    Parse(String),

    /// The requested page does not exist
    #[error("Page {page} not found")]
    PageNotFound { page: u16 },

    /// The host refused a 2D drawing context
    #[error("{}", CONTEXT_UNAVAILABLE_MESSAGE)]
    ContextUnavailable,

    /// The engine failed while rasterizing (engine message verbatim)
    #[error("{0}")]
    Render(String),

    /// The encoder produced no blob
    #[error("{}", ENCODE_FAILED_MESSAGE)]
    EncodeFailed,
}

/// Result type alias for conversion operations
pub type ConvertResult<T> = Result<T, ConvertError>;
