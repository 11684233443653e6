//! File handles for conversion input and output.
//!
//! A [`File`] is an immutable, named byte container with a media type,
//! mirroring what a browser hands over from a file picker. Output images
//! use the same type so callers can upload or store them uniformly.

use std::path::Path;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::constants::{OCTET_STREAM_MIME, PDF_MIME};
use crate::error::ConvertResult;

/// Immutable named byte container
#[derive(Clone, PartialEq, Eq)]
pub struct File {
    name: String,
    mime_type: String,
    data: Arc<[u8]>,
}

impl File {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Load a file from disk, guessing the media type from its extension.
    pub fn from_path(path: &Path) -> ConvertResult<Self> {
        let data = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime_type = mime_for_name(&name);
        Ok(Self::new(name, mime_type, data))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Borrow the content without copying.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Read the full content.
    ///
    /// In-memory files resolve immediately; the async signature keeps the
    /// call site identical for hosts that stream file content.
    pub async fn read_bytes(&self) -> ConvertResult<Vec<u8>> {
        Ok(self.data.to_vec())
    }
}

impl std::fmt::Debug for File {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("File")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.data.len())
            .finish()
    }
}

/// Serialized as file metadata only (`{name, type, size}`); content stays out of JSON.
impl Serialize for File {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("File", 3)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("type", &self.mime_type)?;
        state.serialize_field("size", &self.data.len())?;
        state.end()
    }
}

fn mime_for_name(name: &str) -> &'static str {
    match Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("pdf") => PDF_MIME,
        Some("png") => crate::constants::PNG_MIME,
        _ => OCTET_STREAM_MIME,
    }
}
