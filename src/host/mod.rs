//! Host drawing-surface capability.
//!
//! The host is whatever provides canvases, image encoding and object URLs:
//!
//! - [`Canvas`] - a 2D drawable sized in whole pixels
//! - [`RenderContext`] - the 2D drawing context engines paint into
//! - [`Blob`] - immutable encoded bytes with a media type
//! - [`Host::to_blob`] - callback-style encoding, `None` on failure
//!
//! `memory` is the in-process host.

mod memory;
mod registry;

pub use memory::MemoryHost;
pub use registry::BlobRegistry;

use std::sync::Arc;

use image::{DynamicImage, Rgba, RgbaImage};

/// Completion callback for [`Host::to_blob`]
pub type BlobCallback = Box<dyn FnOnce(Option<Blob>) + Send + 'static>;

pub trait Host: Send + Sync {
    /// Whether a document context exists to create canvases in
    fn has_document_context(&self) -> bool;

    /// Create a canvas. Whether it yields a 2D context is up to the host.
    fn create_canvas(&self, width: u32, height: u32) -> Canvas;

    /// Encode `canvas` as `mime_type` and hand the result to `callback`,
    /// possibly from another thread. Encoding failures yield `None`.
    fn to_blob(&self, canvas: Canvas, mime_type: &str, callback: BlobCallback);

    /// Mint a revocable URL referencing `blob`.
    fn create_object_url(&self, blob: &Blob) -> String;

    /// Release a URL minted by [`Host::create_object_url`].
    fn revoke_object_url(&self, url: &str) -> bool;

    /// Look up the blob behind a live object URL.
    fn resolve_object_url(&self, url: &str) -> Option<Blob>;
}

/// Convert a float dimension to canvas pixels: truncate toward zero,
/// clamp negatives and NaN to zero.
pub fn canvas_dimension(value: f32) -> u32 {
    if value.is_nan() || value <= 0.0 {
        0
    } else if value >= u32::MAX as f32 {
        u32::MAX
    } else {
        value.trunc() as u32
    }
}

/// 2D drawable surface.
///
/// A canvas without a backing store has dimensions but refuses to hand out
/// a drawing context.
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Option<RgbaImage>,
}

impl Canvas {
    /// Transparent canvas with a backing store.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: Some(RgbaImage::new(width, height)),
        }
    }

    /// Canvas whose 2D context is unavailable.
    pub fn without_context(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn context_2d(&mut self) -> Option<RenderContext<'_>> {
        self.pixels.as_mut().map(|pixels| RenderContext { pixels })
    }

    pub fn pixels(&self) -> Option<&RgbaImage> {
        self.pixels.as_ref()
    }

    pub fn into_pixels(self) -> Option<RgbaImage> {
        self.pixels
    }
}

/// 2D drawing context borrowed from a [`Canvas`]
pub struct RenderContext<'a> {
    pixels: &'a mut RgbaImage,
}

impl RenderContext<'_> {
    pub fn size(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn fill(&mut self, color: Rgba<u8>) {
        for pixel in self.pixels.pixels_mut() {
            *pixel = color;
        }
    }

    /// Fill a rectangle, clipped to the canvas.
    pub fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: Rgba<u8>) {
        let (canvas_w, canvas_h) = self.size();
        let x_end = x.saturating_add(width).min(canvas_w);
        let y_end = y.saturating_add(height).min(canvas_h);
        for py in y.min(y_end)..y_end {
            for px in x.min(x_end)..x_end {
                self.pixels.put_pixel(px, py, color);
            }
        }
    }

    /// Composite `image` with its top-left corner at (`x`, `y`).
    pub fn draw_image(&mut self, image: &DynamicImage, x: i64, y: i64) {
        image::imageops::overlay(&mut *self.pixels, &image.to_rgba8(), x, y);
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.pixels.get_pixel_checked(x, y).copied()
    }
}

/// Immutable encoded bytes with a media type
#[derive(Clone, PartialEq, Eq)]
pub struct Blob {
    data: Arc<[u8]>,
    mime_type: String,
}

impl Blob {
    pub fn new(data: impl Into<Arc<[u8]>>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Shared handle to the bytes, no copy.
    pub fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.data)
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

impl std::fmt::Debug for Blob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Blob")
            .field("mime_type", &self.mime_type)
            .field("size", &self.data.len())
            .finish()
    }
}
