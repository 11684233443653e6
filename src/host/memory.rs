//! In-process host: RGBA canvases, PNG encoding on a background thread and
//! an object URL registry.

use std::io::Cursor;
use std::sync::Arc;
use std::thread;

use image::{DynamicImage, ImageFormat};
use tracing::{debug, error, warn};

use super::{Blob, BlobCallback, BlobRegistry, Canvas, Host};
use crate::config::ConverterConfig;
use crate::constants::PNG_MIME;
use crate::profile_scope;

pub struct MemoryHost {
    registry: Arc<BlobRegistry>,
    max_canvas_pixels: u64,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new(&ConverterConfig::default())
    }
}

impl MemoryHost {
    pub fn new(config: &ConverterConfig) -> Self {
        Self {
            registry: Arc::new(BlobRegistry::new(config.blob_origin.clone())),
            max_canvas_pixels: config.max_canvas_pixels,
        }
    }

    /// Shared handle to the object URL registry.
    pub fn registry(&self) -> Arc<BlobRegistry> {
        Arc::clone(&self.registry)
    }

    /// Encode synchronously. Unsupported types fall back to PNG.
    pub fn encode(canvas: Canvas, mime_type: &str) -> Option<Blob> {
        profile_scope!("encode_png");

        if mime_type != PNG_MIME {
            debug!(requested = mime_type, "Unsupported blob type, encoding PNG");
        }

        // A canvas without pixels encodes to nothing.
        if canvas.width() == 0 || canvas.height() == 0 {
            return None;
        }
        let pixels = canvas.into_pixels()?;
        let mut buffer = Vec::new();
        match DynamicImage::ImageRgba8(pixels).write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png) {
            Ok(()) => Some(Blob::new(buffer, PNG_MIME)),
            Err(e) => {
                warn!(error = %e, "PNG encoding failed");
                None
            }
        }
    }
}

impl Host for MemoryHost {
    fn has_document_context(&self) -> bool {
        true
    }

    fn create_canvas(&self, width: u32, height: u32) -> Canvas {
        let area = u64::from(width) * u64::from(height);
        if area > self.max_canvas_pixels {
            warn!(width, height, limit = self.max_canvas_pixels, "Canvas exceeds pixel limit");
            return Canvas::without_context(width, height);
        }
        Canvas::new(width, height)
    }

    fn to_blob(&self, canvas: Canvas, mime_type: &str, callback: BlobCallback) {
        let mime_type = mime_type.to_string();
        let spawned = thread::Builder::new()
            .name("pdf2img-encode".to_string())
            .spawn(move || callback(Self::encode(canvas, &mime_type)));
        // On spawn failure the callback is dropped unrun; the waiting side
        // sees a cancelled completion and treats it as no blob.
        if let Err(e) = spawned {
            error!(error = %e, "Failed to spawn encoder thread");
        }
    }

    fn create_object_url(&self, blob: &Blob) -> String {
        self.registry.register(blob.clone())
    }

    fn revoke_object_url(&self, url: &str) -> bool {
        self.registry.revoke(url)
    }

    fn resolve_object_url(&self, url: &str) -> Option<Blob> {
        self.registry.resolve(url)
    }
}
