//! Converter configuration.
//!
//! Everything has a working default; the environment can override the
//! PDFium library location, the object URL origin and the host limits.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::{
    DEFAULT_BLOB_ORIGIN, DEFAULT_MAX_CANVAS_PIXELS, DEFAULT_SLOW_STEP_MS, ENV_BLOB_ORIGIN,
    ENV_MAX_CANVAS_PIXELS, ENV_PDFIUM_PATH, ENV_SLOW_STEP_MS,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Explicit PDFium shared library; tried before the search paths
    pub pdfium_library_path: Option<PathBuf>,
    /// Origin embedded in minted object URLs (`blob:<origin>/<uuid>`)
    pub blob_origin: String,
    /// Canvases above this many pixels get no 2D context
    pub max_canvas_pixels: u64,
    /// Conversion steps slower than this are logged as warnings
    pub slow_step_ms: f64,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            pdfium_library_path: None,
            blob_origin: DEFAULT_BLOB_ORIGIN.to_string(),
            max_canvas_pixels: DEFAULT_MAX_CANVAS_PIXELS,
            slow_step_ms: DEFAULT_SLOW_STEP_MS,
        }
    }
}

impl ConverterConfig {
    /// Defaults overridden by the `PDF2IMG_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Malformed values keep the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_PDFIUM_PATH).filter(|p| !p.trim().is_empty()) {
            config.pdfium_library_path = Some(PathBuf::from(path));
        }

        if let Some(origin) = lookup(ENV_BLOB_ORIGIN) {
            let origin = origin.trim().trim_end_matches('/');
            if origin.is_empty() {
                warn!(key = ENV_BLOB_ORIGIN, "Ignoring empty blob origin");
            } else {
                config.blob_origin = origin.to_string();
            }
        }

        if let Some(raw) = lookup(ENV_MAX_CANVAS_PIXELS) {
            match raw.trim().parse::<u64>() {
                Ok(pixels) => config.max_canvas_pixels = pixels,
                Err(e) => warn!(key = ENV_MAX_CANVAS_PIXELS, value = %raw, error = %e, "Ignoring invalid value"),
            }
        }

        if let Some(raw) = lookup(ENV_SLOW_STEP_MS) {
            match raw.trim().parse::<f64>() {
                Ok(ms) if ms.is_finite() && ms >= 0.0 => config.slow_step_ms = ms,
                _ => warn!(key = ENV_SLOW_STEP_MS, value = %raw, "Ignoring invalid value"),
            }
        }

        config
    }
}
