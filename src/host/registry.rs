//! Object URL registry.
//!
//! Maps `blob:<origin>/<uuid>` URLs to the blobs they reference. Entries
//! live until revoked; nothing is evicted automatically.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::Blob;
use crate::constants::BLOB_URL_SCHEME;

pub struct BlobRegistry {
    origin: String,
    blobs: RwLock<HashMap<Uuid, Blob>>,
}

impl BlobRegistry {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            blobs: RwLock::new(HashMap::new()),
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Register `blob` under a fresh URL.
    pub fn register(&self, blob: Blob) -> String {
        let id = Uuid::new_v4();
        let size = blob.size();
        self.blobs.write().insert(id, blob);
        let url = self.url_for(&id);
        debug!(url = %url, size, "Registered object URL");
        url
    }

    pub fn resolve(&self, url: &str) -> Option<Blob> {
        let id = self.parse_url(url)?;
        self.resolve_id(&id)
    }

    pub fn resolve_id(&self, id: &Uuid) -> Option<Blob> {
        self.blobs.read().get(id).cloned()
    }

    /// Drop the entry behind `url`. Returns whether it existed.
    pub fn revoke(&self, url: &str) -> bool {
        let Some(id) = self.parse_url(url) else {
            return false;
        };
        let removed = self.blobs.write().remove(&id).is_some();
        if removed {
            debug!(url, "Revoked object URL");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }

    /// Extract the id from a URL minted by this registry.
    pub fn parse_url(&self, url: &str) -> Option<Uuid> {
        let rest = url
            .strip_prefix(BLOB_URL_SCHEME)?
            .strip_prefix(self.origin.as_str())?
            .strip_prefix('/')?;
        Uuid::parse_str(rest).ok()
    }

    fn url_for(&self, id: &Uuid) -> String {
        format!("{}{}/{}", BLOB_URL_SCHEME, self.origin, id)
    }
}
