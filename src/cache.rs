//! Read-through document cache with freshness validation
//!
//! Sits between request handlers and a [`DocumentStore`]. Reads are served
//! from memory for [`RATE_LIMIT_WINDOW`] after each store consultation; past
//! that, the store is asked which file is current and the file is only
//! re-read when its identity (name + mtime) changed.
//!
//! # Locking
//!
//! All state sits behind one async mutex held for the whole of `get()` and
//! `put()`, disk I/O included. Operations are therefore linearized: a `put()`
//! that returns before a `get()` starts is always visible to it.
//!
//! # Failure
//!
//! I/O and parse errors propagate to the caller. The cached document and its
//! identity are left exactly as they were, while the check time still
//! advances so a failing store is retried at most once per window.

use crate::error::{FolioError, FolioResult};
use crate::store::{DocumentStore, SnapshotId};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, trace};

/// Minimum interval between two store consultations while a document is cached
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(2);

/// Document together with the snapshot it was loaded from or written as
struct Entry<D> {
    document: Arc<D>,
    identity: SnapshotId,
}

struct CacheState<D> {
    entry: Option<Entry<D>>,
    last_check: Option<Instant>,
}

/// Single-document cache over a [`DocumentStore`]
pub struct FreshnessCache<S, D> {
    store: S,
    window: Duration,
    state: Mutex<CacheState<D>>,
}

impl<S, D> FreshnessCache<S, D>
where
    S: DocumentStore,
    D: Serialize + DeserializeOwned + Default + Send + Sync,
{
    /// Create an empty cache using the default rate-limit window
    pub fn new(store: S) -> Self {
        Self::with_window(store, RATE_LIMIT_WINDOW)
    }

    /// Create an empty cache with a custom rate-limit window
    pub fn with_window(store: S, window: Duration) -> Self {
        Self {
            store,
            window,
            state: Mutex::new(CacheState {
                entry: None,
                last_check: None,
            }),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Identity of the cached document, if one is held
    pub async fn identity(&self) -> Option<SnapshotId> {
        let state = self.state.lock().await;
        state.entry.as_ref().map(|entry| entry.identity.clone())
    }

    /// Current document
    ///
    /// Returns a default document when the store holds no file at all. That
    /// absence is never cached: the next call re-resolves.
    pub async fn get(&self) -> FolioResult<Arc<D>> {
        let mut state = self.state.lock().await;
        let now = Instant::now();

        if let (Some(entry), Some(last_check)) = (&state.entry, state.last_check) {
            if now.duration_since(last_check) < self.window {
                trace!("Serving {} within rate-limit window", entry.identity.file);
                return Ok(Arc::clone(&entry.document));
            }
        }
        state.last_check = Some(now);

        let Some(file) = self.store.resolve_latest().await? else {
            debug!("No document file found, serving default document");
            return Ok(Arc::new(D::default()));
        };

        let modified = self.store.stat(&file).await?;
        let identity = SnapshotId::new(file, modified);

        if let Some(entry) = &state.entry {
            if entry.identity == identity {
                trace!("{} unchanged since last load", identity.file);
                return Ok(Arc::clone(&entry.document));
            }
        }

        info!(
            "Loading document from {} (modified {})",
            identity.file,
            DateTime::<Utc>::from(identity.modified).to_rfc3339()
        );

        let bytes = self.store.read(&identity.file).await?;
        let document: D = serde_json::from_slice(&bytes)
            .map_err(|e| FolioError::parse(identity.file.name(), e))?;

        let document = Arc::new(document);
        state.entry = Some(Entry {
            document: Arc::clone(&document),
            identity,
        });

        Ok(document)
    }

    /// Persist a new document and make it the cached value
    ///
    /// The rate-limit window restarts at the write, so reads within it return
    /// exactly this document.
    pub async fn put(&self, document: D) -> FolioResult<Arc<D>> {
        let mut bytes = serde_json::to_vec_pretty(&document)?;
        bytes.push(b'\n');

        let mut state = self.state.lock().await;
        let identity = self.store.write(&bytes).await?;
        debug!("Stored document as {}", identity.file);

        let document = Arc::new(document);
        state.entry = Some(Entry {
            document: Arc::clone(&document),
            identity,
        });
        state.last_check = Some(Instant::now());

        Ok(document)
    }
}
