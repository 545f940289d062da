//! Folio - portfolio document server
//!
//! Serves one JSON portfolio document over HTTP. The file on disk is the
//! source of truth; a freshness-validated in-memory cache keeps reads cheap
//! while picking up external edits and dated snapshots.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod portfolio;
pub mod server;
pub mod store;

pub use cache::{FreshnessCache, RATE_LIMIT_WINDOW};
pub use error::{FolioError, FolioResult};
pub use portfolio::Portfolio;
pub use store::{DocumentStore, FileRef, FsDocumentStore, SnapshotId};
