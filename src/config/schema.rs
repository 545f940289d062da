//! Configuration schema for Folio
//!
//! Configuration is stored at `~/.config/folio/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Document store settings
    pub store: StoreConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on
    pub bind: String,

    /// Directory of static assets served under `/static` (optional)
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
            static_dir: None,
        }
    }
}

/// Document store settings
///
/// Dated snapshots are discovered as `<snapshot_prefix>*<snapshot_suffix>`
/// and must be named so that lexicographic order is chronological order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the document files
    pub data_dir: PathBuf,

    /// File written by updates
    pub current_file: String,

    /// Prefix of dated snapshot files
    pub snapshot_prefix: String,

    /// Suffix of dated snapshot files
    pub snapshot_suffix: String,

    /// Fallback file used when no dated snapshot exists
    pub legacy_file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            current_file: "portfolio-current.json".to_string(),
            snapshot_prefix: "portfolio-".to_string(),
            snapshot_suffix: ".json".to_string(),
            legacy_file: "portfolio.json".to_string(),
        }
    }
}
