//! Lazily loaded, process-wide engine handle.

use std::sync::Arc;

use once_cell::sync::{Lazy, OnceCell};
use tracing::{debug, info};

use super::{PdfEngine, PdfiumEngine};
use crate::config::ConverterConfig;
use crate::error::{ConvertError, ConvertResult};
use crate::host::Host;

type InitFn = dyn Fn() -> ConvertResult<Arc<dyn PdfEngine>> + Send + Sync;

/// Message when no document context is available
const NO_DOCUMENT_CONTEXT: &str = "PDF conversion must run in a document context";

static GLOBAL: Lazy<Arc<EngineLoader>> =
    Lazy::new(|| Arc::new(EngineLoader::pdfium(ConverterConfig::from_env())));

/// Loads an engine on first use and hands out the cached instance after.
///
/// Initialization runs outside any lock: two callers racing on the first
/// load may both initialize, the first stored engine wins and the other is
/// dropped. A failed initialization is not cached.
pub struct EngineLoader {
    engine: OnceCell<Arc<dyn PdfEngine>>,
    init: Box<InitFn>,
}

impl EngineLoader {
    pub fn new<F>(init: F) -> Self
    where
        F: Fn() -> ConvertResult<Arc<dyn PdfEngine>> + Send + Sync + 'static,
    {
        Self {
            engine: OnceCell::new(),
            init: Box::new(init),
        }
    }

    /// A loader that already holds `engine`.
    pub fn preloaded(engine: Arc<dyn PdfEngine>) -> Self {
        let loader = Self::new(|| {
            Err(ConvertError::EngineUnavailable(
                "preloaded loader has no initializer".to_string(),
            ))
        });
        let _ = loader.engine.set(engine);
        loader
    }

    /// A PDFium loader bound to `config`'s library settings.
    pub fn pdfium(config: ConverterConfig) -> Self {
        Self::new(move || {
            let engine = PdfiumEngine::load(&config)?;
            Ok(Arc::new(engine) as Arc<dyn PdfEngine>)
        })
    }

    /// The process-wide PDFium loader, configured from the environment.
    pub fn global() -> Arc<EngineLoader> {
        Arc::clone(&GLOBAL)
    }

    /// The loader for `config`: the process-wide one unless `config` names a
    /// PDFium library other than the environment's.
    pub fn for_config(config: &ConverterConfig) -> Arc<EngineLoader> {
        match &config.pdfium_library_path {
            Some(path) if ConverterConfig::from_env().pdfium_library_path.as_ref() != Some(path) => {
                debug!(path = %path.display(), "Using dedicated PDFium loader");
                Arc::new(Self::pdfium(config.clone()))
            }
            _ => Self::global(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.engine.get().is_some()
    }

    /// Get the engine, loading it on first call.
    ///
    /// Fails with [`ConvertError::EnvironmentUnsupported`] when `host` has no
    /// document context; that check runs on every call, before the cache.
    pub async fn load(&self, host: &dyn Host) -> ConvertResult<Arc<dyn PdfEngine>> {
        if !host.has_document_context() {
            return Err(ConvertError::EnvironmentUnsupported(
                NO_DOCUMENT_CONTEXT.to_string(),
            ));
        }

        if let Some(engine) = self.engine.get() {
            return Ok(Arc::clone(engine));
        }

        debug!("Loading PDF engine");
        let engine = (self.init)()?;
        let engine = self.engine.get_or_init(|| engine);
        info!(engine = engine.name(), "PDF engine loaded");
        Ok(Arc::clone(engine))
    }
}
