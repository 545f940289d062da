//! Error types for Folio
//!
//! All modules use `FolioResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Folio operations
pub type FolioResult<T> = Result<T, FolioError>;

/// All errors that can occur in Folio
#[derive(Error, Debug)]
pub enum FolioError {
    // Document errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse document {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Server errors
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Server(String),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl FolioError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a parse error for a stored document
    pub fn parse(file: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Parse {
            file: file.into(),
            source,
        }
    }

    /// Machine-readable error code used in HTTP error bodies
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "io_error",
            Self::Parse { .. } => "parse_error",
            Self::InvalidInput(_) => "invalid_input",
            Self::ConfigInvalid { .. } | Self::ConfigDirCreate { .. } => "config_error",
            Self::Bind { .. } | Self::Server(_) => "server_error",
            Self::Json(_) | Self::TomlParse(_) | Self::TomlSerialize(_) => "serialization_error",
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Bind { .. } => {
                Some("Another process may own the port. Pass --bind to pick another address")
            }
            Self::ConfigInvalid { .. } => {
                Some("Run: folio config init --force to regenerate defaults")
            }
            Self::Parse { .. } => Some("Fix or replace the stored document file"),
            _ => None,
        }
    }
}
