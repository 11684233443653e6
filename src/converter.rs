//! First-page PDF → PNG conversion.
//!
//! A conversion is one linear chain: load engine, read bytes, parse, fetch
//! page 1, size a canvas to the 2× viewport, render, encode PNG, mint an
//! object URL. Any failure along the way ends the chain and comes back as
//! a failed [`PdfConversionResult`]; nothing is retried.

use std::path::Path;
use std::sync::Arc;

use futures::channel::oneshot;
use once_cell::sync::Lazy;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::config::ConverterConfig;
use crate::constants::{DEFAULT_FAILURE_MESSAGE, FIRST_PAGE, PNG_MIME, RENDER_SCALE};
use crate::engine::EngineLoader;
use crate::error::{ConvertError, ConvertResult};
use crate::file::File;
use crate::host::{Blob, Canvas, Host, MemoryHost, canvas_dimension};
use crate::perf::{ScopedTimer, StepStats};

static DEFAULT_CONVERTER: Lazy<PdfToImageConverter> = Lazy::new(PdfToImageConverter::from_env);

/// Outcome of a conversion: either an image URL plus file, or an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfConversionResult {
    /// Object URL of the PNG; empty on failure
    pub image_url: String,
    /// The PNG as a named file; `None` on failure
    pub file: Option<File>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PdfConversionResult {
    pub fn success(image_url: String, file: File) -> Self {
        Self {
            image_url,
            file: Some(file),
            error: None,
        }
    }

    /// A failed result. Blank messages become the generic failure message.
    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            DEFAULT_FAILURE_MESSAGE.to_string()
        } else {
            message
        };
        Self {
            image_url: String::new(),
            file: None,
            error: Some(message),
        }
    }

    pub fn is_success(&self) -> bool {
        self.file.is_some() && self.error.is_none()
    }

    /// `(image_url, file)` on success, the error message otherwise.
    pub fn into_result(self) -> Result<(String, File), String> {
        match (self.file, self.error) {
            (Some(file), None) => Ok((self.image_url, file)),
            (_, error) => Err(error.unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string())),
        }
    }
}

/// Name of the output image: a trailing `.pdf` (any case) becomes `.png`.
/// Names without that suffix are kept as they are.
pub fn output_file_name(name: &str) -> String {
    let split = name.len().checked_sub(4).filter(|&i| name.is_char_boundary(i));
    match split {
        Some(i) if name[i..].eq_ignore_ascii_case(".pdf") => format!("{}.png", &name[..i]),
        _ => name.to_string(),
    }
}

/// Convert with the process-wide default converter.
pub async fn convert_pdf_to_image(file: &File) -> PdfConversionResult {
    DEFAULT_CONVERTER.convert(file).await
}

/// The converter behind [`convert_pdf_to_image`], e.g. to revoke its URLs.
pub fn default_converter() -> &'static PdfToImageConverter {
    &DEFAULT_CONVERTER
}

pub struct PdfToImageConverter {
    host: Arc<dyn Host>,
    loader: Arc<EngineLoader>,
    stats: StepStats,
    slow_step_ms: f64,
}

impl PdfToImageConverter {
    pub fn new(host: Arc<dyn Host>, loader: Arc<EngineLoader>) -> Self {
        Self {
            host,
            loader,
            stats: StepStats::new(),
            slow_step_ms: ConverterConfig::default().slow_step_ms,
        }
    }

    /// In-memory host and a PDFium engine bound per `config`.
    ///
    /// Shares the process-wide engine unless `config` names its own library.
    pub fn with_config(config: &ConverterConfig) -> Self {
        Self {
            slow_step_ms: config.slow_step_ms,
            ..Self::new(
                Arc::new(MemoryHost::new(config)),
                EngineLoader::for_config(config),
            )
        }
    }

    pub fn from_env() -> Self {
        Self::with_config(&ConverterConfig::from_env())
    }

    pub fn host(&self) -> &Arc<dyn Host> {
        &self.host
    }

    pub fn loader(&self) -> &Arc<EngineLoader> {
        &self.loader
    }

    /// Per-step timings across all conversions so far.
    pub fn stats(&self) -> &StepStats {
        &self.stats
    }

    /// Release an image URL returned by a previous conversion.
    pub fn revoke(&self, image_url: &str) -> bool {
        self.host.revoke_object_url(image_url)
    }

    /// Convert the first page of `file` to a PNG.
    pub async fn convert(&self, file: &File) -> PdfConversionResult {
        match self.try_convert(file).await {
            Ok((image_url, image)) => {
                info!(
                    input = file.name(),
                    output = image.name(),
                    size = image.size(),
                    "Converted PDF to image"
                );
                PdfConversionResult::success(image_url, image)
            }
            Err(e) => {
                error!(input = file.name(), error = %e, "PDF conversion failed");
                PdfConversionResult::failure(e.to_string())
            }
        }
    }

    /// Read `path` from disk and convert it.
    pub async fn convert_path(&self, path: &Path) -> PdfConversionResult {
        match File::from_path(path) {
            Ok(file) => self.convert(&file).await,
            Err(e) => {
                error!(path = %path.display(), error = %e, "PDF conversion failed");
                PdfConversionResult::failure(e.to_string())
            }
        }
    }

    async fn try_convert(&self, file: &File) -> ConvertResult<(String, File)> {
        let engine = {
            let _timer = self.timer("load_engine");
            self.loader.load(self.host.as_ref()).await?
        };

        let bytes = {
            let _timer = self.timer("read");
            file.read_bytes().await?
        };
        debug!(input = file.name(), bytes = bytes.len(), "Read input file");

        let document = {
            let _timer = self.timer("parse");
            engine.parse(bytes).await?
        };

        let page_count = document.page_count();
        if page_count < FIRST_PAGE {
            return Err(ConvertError::PageNotFound { page: FIRST_PAGE });
        }
        let page = {
            let _timer = self.timer("load_page");
            document.page(FIRST_PAGE).await?
        };

        let viewport = page.viewport(RENDER_SCALE);
        let width = canvas_dimension(viewport.width);
        let height = canvas_dimension(viewport.height);
        debug!(page_count, width, height, "Rendering first page");

        let mut canvas = self.host.create_canvas(width, height);
        {
            let Some(mut context) = canvas.context_2d() else {
                return Err(ConvertError::ContextUnavailable);
            };
            let _timer = self.timer("render");
            page.render(&mut context, &viewport).await?;
        }

        let blob = {
            let _timer = self.timer("encode");
            self.encode(canvas).await.ok_or(ConvertError::EncodeFailed)?
        };

        let image = File::new(output_file_name(file.name()), PNG_MIME, blob.shared_bytes());
        let image_url = self.host.create_object_url(&blob);
        Ok((image_url, image))
    }

    /// Bridge the host's callback-style encoder into a future.
    async fn encode(&self, canvas: Canvas) -> Option<Blob> {
        let (tx, rx) = oneshot::channel();
        self.host.to_blob(
            canvas,
            PNG_MIME,
            Box::new(move |blob| {
                let _ = tx.send(blob);
            }),
        );
        // A dropped callback counts as no blob.
        rx.await.ok().flatten()
    }

    fn timer(&self, step: &'static str) -> ScopedTimer<'_> {
        ScopedTimer::recording(step, self.slow_step_ms, &self.stats)
    }
}
