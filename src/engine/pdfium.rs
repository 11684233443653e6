//! PDFium-backed engine with platform-specific library search paths.
//!
//! The PDFium dynamic library is located the same way across deployment
//! scenarios: an explicitly configured path first, then well-known
//! locations next to the working directory and the executable, then the
//! system library.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use pdfium_render::prelude::*;
use tracing::debug;

use super::{EngineDocument, EnginePage, PageSize, PdfEngine, Viewport};
use crate::config::ConverterConfig;
use crate::error::{ConvertError, ConvertResult};
use crate::host::RenderContext;

pub struct PdfiumLoader;

impl PdfiumLoader {
    /// Bind PDFium, trying `explicit` before the search paths.
    ///
    /// Search order:
    /// 1. `explicit` (file, or directory holding the platform library)
    /// 2. `lib/` in current working directory (development)
    /// 3. `lib/` relative to executable
    /// 4. `Resources/lib/` in macOS bundle
    /// 5. System library fallback
    pub fn load(explicit: Option<&Path>) -> Result<Pdfium, String> {
        for path in Self::search_paths(explicit) {
            if !path.exists() {
                continue;
            }
            match Pdfium::bind_to_library(&path) {
                Ok(bindings) => {
                    debug!(path = %path.display(), "Bound PDFium library");
                    return Ok(Pdfium::new(bindings));
                }
                Err(e) => debug!(path = %path.display(), error = ?e, "PDFium candidate rejected"),
            }
        }
        Pdfium::bind_to_system_library()
            .map(Pdfium::new)
            .map_err(|e| format!("Failed to load pdfium: {:?}", e))
    }

    /// Candidate library files in the order [`PdfiumLoader::load`] tries them.
    pub fn search_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Some(path) = explicit {
            if path.is_dir() {
                paths.push(Self::library_in(path));
            } else {
                paths.push(path.to_path_buf());
            }
        }

        if let Ok(cwd) = std::env::current_dir() {
            paths.push(Self::library_in(&cwd.join("lib")));
        }

        if let Ok(exe) = std::env::current_exe() {
            if let Some(parent) = exe.parent() {
                paths.push(Self::library_in(&parent.join("lib")));

                if let Some(grandparent) = parent.parent() {
                    paths.push(Self::library_in(&grandparent.join("Resources/lib")));
                }
            }
        }

        paths
    }

    fn library_in(dir: &Path) -> PathBuf {
        PathBuf::from(Pdfium::pdfium_platform_library_name_at_path(dir))
    }
}

/// [`PdfEngine`] over a bound PDFium library
pub struct PdfiumEngine {
    pdfium: Pdfium,
}

impl PdfiumEngine {
    pub fn load(config: &ConverterConfig) -> ConvertResult<Self> {
        let pdfium = PdfiumLoader::load(config.pdfium_library_path.as_deref())
            .map_err(ConvertError::EngineUnavailable)?;
        Ok(Self { pdfium })
    }
}

#[async_trait(?Send)]
impl PdfEngine for PdfiumEngine {
    fn name(&self) -> &str {
        "pdfium"
    }

    async fn parse<'a>(&'a self, bytes: Vec<u8>) -> ConvertResult<Box<dyn EngineDocument + 'a>> {
        let document = self
            .pdfium
            .load_pdf_from_byte_vec(bytes, None)
            .map_err(|e| ConvertError::Parse(e.to_string()))?;
        Ok(Box::new(PdfiumDocument { document }))
    }
}

struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
}

#[async_trait(?Send)]
impl EngineDocument for PdfiumDocument<'_> {
    fn page_count(&self) -> u16 {
        self.document.pages().len() as u16
    }

    async fn page<'b>(&'b self, number: u16) -> ConvertResult<Box<dyn EnginePage + 'b>> {
        if number == 0 || number > self.page_count() {
            return Err(ConvertError::PageNotFound { page: number });
        }
        let page = self
            .document
            .pages()
            .get(number - 1)
            .map_err(|_| ConvertError::PageNotFound { page: number })?;
        Ok(Box::new(PdfiumPage { page }))
    }
}

struct PdfiumPage<'a> {
    page: PdfPage<'a>,
}

#[async_trait(?Send)]
impl EnginePage for PdfiumPage<'_> {
    fn size(&self) -> PageSize {
        PageSize::new(self.page.width().value, self.page.height().value)
    }

    async fn render(&self, context: &mut RenderContext<'_>, _viewport: &Viewport) -> ConvertResult<()> {
        // The context is already sized to the viewport.
        let Some((width, height)) = render_target(context.size()) else {
            // Nothing to draw; the encoder turns an empty canvas into no blob.
            return Ok(());
        };
        let config = PdfRenderConfig::new()
            .set_target_width(width)
            .set_target_height(height);
        let bitmap = self
            .page
            .render_with_config(&config)
            .map_err(|e| ConvertError::Render(e.to_string()))?;
        context.draw_image(&bitmap.as_image(), 0, 0);
        Ok(())
    }
}

/// PDFium bitmap size for a context, `None` when it has no area.
fn render_target((width, height): (u32, u32)) -> Option<(i32, i32)> {
    if width == 0 || height == 0 {
        return None;
    }
    Some((
        i32::try_from(width).unwrap_or(i32::MAX),
        i32::try_from(height).unwrap_or(i32::MAX),
    ))
}
