//! Filesystem-backed document store
//!
//! Candidates are regular files named `<prefix>*<suffix>` in the data
//! directory. The lexicographically greatest name wins, so callers must name
//! dated snapshots in a sortable way (`portfolio-2024-06-15.json`). When no
//! snapshot exists the legacy file is used. Writes always target the current
//! file, which itself matches the snapshot pattern.

use crate::config::StoreConfig;
use crate::error::{FolioError, FolioResult};
use crate::store::{DocumentStore, FileRef, SnapshotId};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, trace};

/// Document store rooted at a data directory
#[derive(Debug, Clone)]
pub struct FsDocumentStore {
    data_dir: PathBuf,
    current_file: String,
    snapshot_prefix: String,
    snapshot_suffix: String,
    legacy_file: String,
}

impl FsDocumentStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            data_dir: config.data_dir.clone(),
            current_file: config.current_file.clone(),
            snapshot_prefix: config.snapshot_prefix.clone(),
            snapshot_suffix: config.snapshot_suffix.clone(),
            legacy_file: config.legacy_file.clone(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path(&self, file: &FileRef) -> PathBuf {
        self.data_dir.join(file.name())
    }

    fn is_snapshot(&self, name: &str) -> bool {
        !name.starts_with('.')
            && name.starts_with(&self.snapshot_prefix)
            && name.ends_with(&self.snapshot_suffix)
    }

    /// Hidden sibling of the current file; never matches the snapshot pattern
    fn temp_path(&self) -> PathBuf {
        self.data_dir.join(format!(".{}.tmp", self.current_file))
    }

    async fn latest_snapshot(&self) -> FolioResult<Option<String>> {
        let mut entries = match fs::read_dir(&self.data_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Data directory {} does not exist", self.data_dir.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(FolioError::io(
                    format!("reading data directory {}", self.data_dir.display()),
                    e,
                ))
            }
        };

        let mut latest: Option<String> = None;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| FolioError::io("reading data directory entry", e))?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| FolioError::io("reading data directory entry type", e))?;
            if file_type.is_dir() {
                continue;
            }

            // Non UTF-8 names cannot follow the naming convention
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if !self.is_snapshot(&name) {
                continue;
            }

            if latest.as_deref().is_none_or(|current| name.as_str() > current) {
                latest = Some(name);
            }
        }

        Ok(latest)
    }

    async fn legacy_exists(&self) -> FolioResult<bool> {
        let path = self.data_dir.join(&self.legacy_file);
        match fs::metadata(&path).await {
            Ok(meta) => Ok(!meta.is_dir()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(FolioError::io(format!("checking {}", path.display()), e)),
        }
    }

    async fn write_temp(&self, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        let mut file = fs::File::create(path).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FsDocumentStore {
    async fn resolve_latest(&self) -> FolioResult<Option<FileRef>> {
        if let Some(name) = self.latest_snapshot().await? {
            trace!("Resolved dated snapshot {}", name);
            return Ok(Some(FileRef::new(name)));
        }

        if self.legacy_exists().await? {
            trace!("No dated snapshot, falling back to {}", self.legacy_file);
            return Ok(Some(FileRef::new(self.legacy_file.as_str())));
        }

        Ok(None)
    }

    async fn stat(&self, file: &FileRef) -> FolioResult<SystemTime> {
        let path = self.path(file);
        let meta = fs::metadata(&path)
            .await
            .map_err(|e| FolioError::io(format!("reading metadata of {}", path.display()), e))?;

        meta.modified()
            .map_err(|e| FolioError::io(format!("reading mtime of {}", path.display()), e))
    }

    async fn read(&self, file: &FileRef) -> FolioResult<Vec<u8>> {
        let path = self.path(file);
        fs::read(&path)
            .await
            .map_err(|e| FolioError::io(format!("reading {}", path.display()), e))
    }

    async fn write(&self, bytes: &[u8]) -> FolioResult<SnapshotId> {
        let current = FileRef::new(self.current_file.as_str());
        let target = self.path(&current);
        let temp = self.temp_path();

        if let Err(e) = self.write_temp(&temp, bytes).await {
            let _ = fs::remove_file(&temp).await;
            return Err(FolioError::io(format!("writing {}", temp.display()), e));
        }

        if let Err(e) = fs::rename(&temp, &target).await {
            let _ = fs::remove_file(&temp).await;
            return Err(FolioError::io(
                format!("replacing {} with {}", target.display(), temp.display()),
                e,
            ));
        }

        let modified = self.stat(&current).await?;
        debug!("Wrote {} bytes to {}", bytes.len(), target.display());
        Ok(SnapshotId::new(current, modified))
    }
}
