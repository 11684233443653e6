//! Test helpers and fakes for reducing boilerplate in tests.
//!
//! This module provides:
//! - `TestPdfBuilder` - Builder for byte buffers the fake engine accepts
//! - `FakeEngine` - In-memory `PdfEngine` with switchable failure modes
//! - `TestHost` - `MemoryHost` wrapper that can simulate host failures
//! - `TestConverter` - Converter wired to the fakes, with an init counter

use async_trait::async_trait;
use futures::executor::block_on;
use image::Rgba;
use pdf2img::{
    Blob, Canvas, ConvertError, ConvertResult, EngineDocument, EngineLoader, EnginePage, File,
    Host, MemoryHost, PageSize, PdfConversionResult, PdfEngine, PdfToImageConverter,
    RenderContext, Viewport, host::BlobCallback,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Header every fake PDF starts with
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Message the fake engine reports for bytes it cannot parse
pub const INVALID_PDF_MESSAGE: &str = "Invalid PDF structure.";

/// Message the fake engine reports when rendering is set to fail
pub const RENDER_FAILURE_MESSAGE: &str = "Rendering cancelled: corrupt content stream";

/// US Letter in points
pub const LETTER: (f32, f32) = (612.0, 792.0);

// ============================================================================
// TestPdfBuilder - Builder for fake PDF bytes
// ============================================================================

/// Builder for byte buffers understood by [`FakeEngine`].
///
/// # Example
/// ```ignore
/// let bytes = TestPdfBuilder::new()
///     .with_page(612.0, 792.0)
///     .with_page(300.0, 200.0)
///     .build();
/// ```
#[derive(Default)]
pub struct TestPdfBuilder {
    pages: Vec<(f32, f32)>,
}

impl TestPdfBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a page with the given size in points.
    pub fn with_page(mut self, width: f32, height: f32) -> Self {
        self.pages.push((width, height));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut out = String::from("%PDF-1.7\n");
        for (width, height) in &self.pages {
            out.push_str(&format!("page {}x{}\n", width, height));
        }
        out.push_str("%%EOF\n");
        out.into_bytes()
    }

    /// Build and wrap as an input file.
    pub fn build_file(self, name: &str) -> File {
        File::new(name, "application/pdf", self.build())
    }
}

/// A one-page US Letter PDF file.
pub fn letter_pdf(name: &str) -> File {
    TestPdfBuilder::new()
        .with_page(LETTER.0, LETTER.1)
        .build_file(name)
}

// ============================================================================
// FakeEngine
// ============================================================================

#[derive(Default, Clone, Copy)]
pub struct FakeEngine {
    pub fail_render: bool,
}

#[async_trait(?Send)]
impl PdfEngine for FakeEngine {
    fn name(&self) -> &str {
        "fake"
    }

    async fn parse<'a>(&'a self, bytes: Vec<u8>) -> ConvertResult<Box<dyn EngineDocument + 'a>> {
        let invalid = || ConvertError::Parse(INVALID_PDF_MESSAGE.to_string());
        if !bytes.starts_with(PDF_MAGIC) {
            return Err(invalid());
        }
        let text = String::from_utf8(bytes).map_err(|_| invalid())?;
        let mut pages = Vec::new();
        for line in text.lines().filter(|l| l.starts_with("page ")) {
            let (w, h) = line["page ".len()..].split_once('x').ok_or_else(invalid)?;
            let width: f32 = w.parse().map_err(|_| invalid())?;
            let height: f32 = h.parse().map_err(|_| invalid())?;
            pages.push(PageSize::new(width, height));
        }
        Ok(Box::new(FakeDocument {
            pages,
            fail_render: self.fail_render,
        }))
    }
}

struct FakeDocument {
    pages: Vec<PageSize>,
    fail_render: bool,
}

#[async_trait(?Send)]
impl EngineDocument for FakeDocument {
    fn page_count(&self) -> u16 {
        self.pages.len() as u16
    }

    async fn page<'a>(&'a self, number: u16) -> ConvertResult<Box<dyn EnginePage + 'a>> {
        let size = number
            .checked_sub(1)
            .and_then(|i| self.pages.get(i as usize))
            .copied()
            .ok_or(ConvertError::PageNotFound { page: number })?;
        Ok(Box::new(FakePage {
            size,
            fail_render: self.fail_render,
        }))
    }
}

struct FakePage {
    size: PageSize,
    fail_render: bool,
}

#[async_trait(?Send)]
impl EnginePage for FakePage {
    fn size(&self) -> PageSize {
        self.size
    }

    async fn render(&self, context: &mut RenderContext<'_>, _viewport: &Viewport) -> ConvertResult<()> {
        if self.fail_render {
            return Err(ConvertError::Render(RENDER_FAILURE_MESSAGE.to_string()));
        }
        let (width, height) = context.size();
        context.fill(Rgba([255, 255, 255, 255]));
        context.fill_rect(0, 0, width, 1, Rgba([0, 0, 0, 255]));
        context.fill_rect(0, height.saturating_sub(1), width, 1, Rgba([0, 0, 0, 255]));
        Ok(())
    }
}

// ============================================================================
// TestHost
// ============================================================================

/// `MemoryHost` with switches for the failure paths a real host can take.
pub struct TestHost {
    pub inner: MemoryHost,
    pub document_context: bool,
    pub context_available: bool,
    pub drop_blob: bool,
}

impl Default for TestHost {
    fn default() -> Self {
        Self {
            inner: MemoryHost::default(),
            document_context: true,
            context_available: true,
            drop_blob: false,
        }
    }
}

impl TestHost {
    pub fn wrapping(inner: MemoryHost) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }
}

impl Host for TestHost {
    fn has_document_context(&self) -> bool {
        self.document_context
    }

    fn create_canvas(&self, width: u32, height: u32) -> Canvas {
        if self.context_available {
            self.inner.create_canvas(width, height)
        } else {
            Canvas::without_context(width, height)
        }
    }

    fn to_blob(&self, canvas: Canvas, mime_type: &str, callback: BlobCallback) {
        if self.drop_blob {
            callback(None);
        } else {
            self.inner.to_blob(canvas, mime_type, callback);
        }
    }

    fn create_object_url(&self, blob: &Blob) -> String {
        self.inner.create_object_url(blob)
    }

    fn revoke_object_url(&self, url: &str) -> bool {
        self.inner.revoke_object_url(url)
    }

    fn resolve_object_url(&self, url: &str) -> Option<Blob> {
        self.inner.resolve_object_url(url)
    }
}

// ============================================================================
// TestConverter
// ============================================================================

/// Loader that builds `engine` on demand and counts initializations.
pub fn counting_loader(engine: FakeEngine, inits: Arc<AtomicUsize>) -> Arc<EngineLoader> {
    Arc::new(EngineLoader::new(move || {
        inits.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(engine) as Arc<dyn PdfEngine>)
    }))
}

/// Converter over a [`TestHost`] and a counting [`FakeEngine`] loader.
pub struct TestConverter {
    pub converter: PdfToImageConverter,
    pub inits: Arc<AtomicUsize>,
}

impl TestConverter {
    pub fn new(host: TestHost) -> Self {
        Self::with_engine(host, FakeEngine::default())
    }

    pub fn with_engine(host: TestHost, engine: FakeEngine) -> Self {
        let inits = Arc::new(AtomicUsize::new(0));
        let loader = counting_loader(engine, Arc::clone(&inits));
        Self {
            converter: PdfToImageConverter::new(Arc::new(host), loader),
            inits,
        }
    }

    pub fn convert(&self, file: &File) -> PdfConversionResult {
        block_on(self.converter.convert(file))
    }

    pub fn init_count(&self) -> usize {
        self.inits.load(Ordering::SeqCst)
    }

    /// Decode the PNG behind a result's URL and return its dimensions.
    pub fn decoded_size(&self, result: &PdfConversionResult) -> (u32, u32) {
        let blob = self
            .converter
            .host()
            .resolve_object_url(&result.image_url)
            .expect("object URL should resolve");
        let image = image::load_from_memory(blob.bytes()).expect("blob should be a PNG");
        (image.width(), image.height())
    }
}

/// Assert `result` is the uniform failure shape carrying `message`.
pub fn assert_failure(result: &PdfConversionResult, message: &str) {
    assert_eq!(result, &PdfConversionResult::failure(message));
}
