use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::format::FormatKind;

/// Unique identifier for an uploaded blob.
pub type BlobId = u64;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Allocate a new unique blob ID.
fn next_blob_id() -> BlobId {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// A live blob as seen by readers of the store.
#[derive(Debug, Clone)]
pub struct BlobEntry {
    pub id: BlobId,
    pub url: String,
    pub format: FormatKind,
    pub bytes: Arc<[u8]>,
}

#[derive(Debug, Default)]
struct BlobRegistry {
    live: HashMap<BlobId, BlobEntry>,
    by_url: HashMap<String, BlobId>,
    revoked: Vec<BlobId>,
}

impl BlobRegistry {
    fn revoke(&mut self, id: BlobId) {
        let Some(entry) = self.live.remove(&id) else {
            debug_assert!(false, "blob {id} revoked twice");
            return;
        };
        self.by_url.remove(&entry.url);
        self.revoked.push(id);
        debug!("Revoked blob {} ({})", id, entry.url);
    }
}

/// Registry of uploaded model payloads, addressable by `blob:` URL while
/// their [`TransientHandle`] is alive. Cloning shares the registry.
#[derive(Debug, Clone, Default)]
pub struct BlobStore {
    inner: Arc<Mutex<BlobRegistry>>,
}

impl BlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `bytes` under a fresh `blob:` URL. The blob stays resolvable
    /// until the returned handle is dropped.
    pub fn allocate(&self, bytes: Vec<u8>, format: FormatKind) -> TransientHandle {
        let id = next_blob_id();
        let url = format!("blob:posekit/{}", Uuid::new_v4());
        let entry = BlobEntry {
            id,
            url: url.clone(),
            format,
            bytes: bytes.into(),
        };

        let mut registry = self.inner.lock();
        registry.by_url.insert(url.clone(), id);
        registry.live.insert(id, entry);
        debug!("Allocated blob {} ({})", id, url);

        TransientHandle {
            id,
            url,
            registry: Arc::clone(&self.inner),
        }
    }

    /// Look up a live blob by its URL.
    pub fn resolve(&self, url: &str) -> Option<BlobEntry> {
        let registry = self.inner.lock();
        let id = registry.by_url.get(url)?;
        registry.live.get(id).cloned()
    }

    /// Check if a blob has been allocated and not yet revoked.
    pub fn is_live(&self, id: BlobId) -> bool {
        self.inner.lock().live.contains_key(&id)
    }

    /// Number of blobs currently alive.
    pub fn live_count(&self) -> usize {
        self.inner.lock().live.len()
    }

    /// Every revoked blob ID, in revocation order.
    pub fn revocations(&self) -> Vec<BlobId> {
        self.inner.lock().revoked.clone()
    }
}

/// Owning reference to an uploaded blob. Not `Clone`: exactly one owner
/// exists, and dropping it revokes the blob, so every allocation is
/// revoked exactly once no matter which path releases it.
pub struct TransientHandle {
    id: BlobId,
    url: String,
    registry: Arc<Mutex<BlobRegistry>>,
}

impl TransientHandle {
    /// The unique ID of this blob.
    pub fn id(&self) -> BlobId {
        self.id
    }

    /// The `blob:` URL the payload is reachable under.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Debug for TransientHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransientHandle")
            .field("id", &self.id)
            .field("url", &self.url)
            .finish()
    }
}

impl Drop for TransientHandle {
    fn drop(&mut self) {
        self.registry.lock().revoke(self.id);
    }
}
