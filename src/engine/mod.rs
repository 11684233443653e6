//! PDF engine capability.
//!
//! The converter never talks to a PDF library directly. It goes through
//! three small traits:
//!
//! - [`PdfEngine`] - parses bytes into a document
//! - [`EngineDocument`] - hands out pages by 1-based number
//! - [`EnginePage`] - reports its size and renders into a 2D context
//!
//! `pdfium` provides the production implementation; tests plug in fakes.
//! `loader` owns the process-wide lazily loaded engine.

mod loader;
mod pdfium;

pub use loader::EngineLoader;
pub use pdfium::{PdfiumEngine, PdfiumLoader};

use async_trait::async_trait;

use crate::error::ConvertResult;
use crate::host::RenderContext;

/// Parses PDF bytes. Loaded once per process and shared.
#[async_trait(?Send)]
pub trait PdfEngine: Send + Sync {
    /// Short engine identifier for logs
    fn name(&self) -> &str;

    /// Parse a complete PDF byte buffer.
    async fn parse<'a>(&'a self, bytes: Vec<u8>) -> ConvertResult<Box<dyn EngineDocument + 'a>>;
}

/// A parsed document.
#[async_trait(?Send)]
pub trait EngineDocument {
    fn page_count(&self) -> u16;

    /// Load a page by 1-based number.
    async fn page<'a>(&'a self, number: u16) -> ConvertResult<Box<dyn EnginePage + 'a>>;
}

/// One renderable page.
#[async_trait(?Send)]
pub trait EnginePage {
    /// Intrinsic page size in PDF points
    fn size(&self) -> PageSize;

    fn viewport(&self, scale: f32) -> Viewport {
        Viewport::new(self.size(), scale)
    }

    /// Rasterize the page into `context` using `viewport` geometry.
    async fn render(&self, context: &mut RenderContext<'_>, viewport: &Viewport) -> ConvertResult<()>;
}

/// Page dimensions in PDF points (1/72 inch)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Pixel-space geometry of a page at a given scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scale: f32,
}

impl Viewport {
    pub fn new(page: PageSize, scale: f32) -> Self {
        Self {
            width: page.width * scale,
            height: page.height * scale,
            scale,
        }
    }
}
