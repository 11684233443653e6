//! Integration tests for pdf2img.
//!
//! These tests drive complete conversions through `PdfToImageConverter`
//! against the fake engine, plus real PDFium when it is installed.
