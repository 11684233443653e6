//! First-page PDF to PNG conversion for thumbnail previews.
//!
//! ```ignore
//! let converter = PdfToImageConverter::from_env();
//! let file = File::from_path(Path::new("report.pdf"))?;
//! let result = futures::executor::block_on(converter.convert(&file));
//! match result.into_result() {
//!     Ok((url, image)) => println!("{} -> {}", image.name(), url),
//!     Err(message) => eprintln!("{}", message),
//! }
//! ```
//!
//! ## Modules
//!
//! - `converter` - the conversion chain and its result type
//! - `engine` - PDF engine capability, lazy loader, PDFium backend
//! - `host` - canvases, blob encoding, object URLs
//! - `file` - named byte containers for input and output

pub mod config;
pub mod constants;
pub mod converter;
pub mod engine;
pub mod error;
pub mod file;
pub mod host;
pub mod logging;
pub mod perf;

pub use config::ConverterConfig;
pub use converter::{
    PdfConversionResult, PdfToImageConverter, convert_pdf_to_image, default_converter,
    output_file_name,
};
pub use engine::{EngineDocument, EngineLoader, EnginePage, PageSize, PdfEngine, Viewport};
pub use error::{ConvertError, ConvertResult};
pub use file::File;
pub use host::{Blob, BlobRegistry, Canvas, Host, MemoryHost, RenderContext};
