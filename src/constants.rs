//! Crate-wide constants.
//!
//! Centralizes the fixed conversion parameters, media types and
//! user-facing messages so tests and the converter agree on them.

// ============================================================================
// Conversion Parameters
// ============================================================================

/// Scale factor applied to the page's intrinsic size (points → pixels)
pub const RENDER_SCALE: f32 = 2.0;

/// Page number (1-based) that gets converted
pub const FIRST_PAGE: u16 = 1;

/// Largest canvas (in pixels) the in-memory host hands out a 2D context for.
/// Matches the 16384×16384 area limit common to browser canvases.
pub const DEFAULT_MAX_CANVAS_PIXELS: u64 = 16_384 * 16_384;

/// Steps slower than this are reported with a warning
pub const DEFAULT_SLOW_STEP_MS: f64 = 500.0;

// ============================================================================
// Media Types
// ============================================================================

/// Media type of the produced image
pub const PNG_MIME: &str = "image/png";

/// Media type of PDF input files
pub const PDF_MIME: &str = "application/pdf";

/// Fallback media type for files of unknown kind
pub const OCTET_STREAM_MIME: &str = "application/octet-stream";

// ============================================================================
// Object URLs
// ============================================================================

/// Scheme prefix of object URLs
pub const BLOB_URL_SCHEME: &str = "blob:";

/// Origin used in object URLs when none is configured
pub const DEFAULT_BLOB_ORIGIN: &str = "http://localhost";

// ============================================================================
// Messages
// ============================================================================

/// Fallback failure message when an error carries no text
pub const DEFAULT_FAILURE_MESSAGE: &str = "Failed to convert PDF";

/// Failure message when the host refuses a 2D drawing context
pub const CONTEXT_UNAVAILABLE_MESSAGE: &str = "Canvas context not available";

/// Failure message when the encoder yields no blob
pub const ENCODE_FAILED_MESSAGE: &str = "Failed to create image blob";

// ============================================================================
// Environment Variables
// ============================================================================

/// Explicit path to the PDFium shared library
pub const ENV_PDFIUM_PATH: &str = "PDF2IMG_PDFIUM_PATH";

/// Origin used when minting object URLs
pub const ENV_BLOB_ORIGIN: &str = "PDF2IMG_BLOB_ORIGIN";

/// Canvas pixel limit override
pub const ENV_MAX_CANVAS_PIXELS: &str = "PDF2IMG_MAX_CANVAS_PIXELS";

/// Slow step threshold override (milliseconds)
pub const ENV_SLOW_STEP_MS: &str = "PDF2IMG_SLOW_STEP_MS";
