//! Document store abstraction
//!
//! A store knows which file currently holds the document and how to move its
//! raw bytes in and out. It never interprets the bytes; decoding belongs to
//! the cache layered on top.

mod fs;

pub use fs::FsDocumentStore;

use crate::error::FolioResult;
use async_trait::async_trait;
use std::fmt;
use std::time::SystemTime;

/// Name of a document file inside the store
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileRef {
    name: String,
}

impl FileRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for FileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Which on-disk version of the document is held: file name plus mtime
///
/// Two identities are equal only if both the file and the timestamp match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotId {
    pub file: FileRef,
    pub modified: SystemTime,
}

impl SnapshotId {
    pub fn new(file: FileRef, modified: SystemTime) -> Self {
        Self { file, modified }
    }
}

/// Backing storage for the single document
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Find the file holding the latest document, `None` if no file exists
    async fn resolve_latest(&self) -> FolioResult<Option<FileRef>>;

    /// Modification time of a resolved file
    async fn stat(&self, file: &FileRef) -> FolioResult<SystemTime>;

    /// Raw contents of a resolved file
    async fn read(&self, file: &FileRef) -> FolioResult<Vec<u8>>;

    /// Replace the current document file and return the identity it now has
    async fn write(&self, bytes: &[u8]) -> FolioResult<SnapshotId>;
}
