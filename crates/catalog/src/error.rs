use std::path::PathBuf;
use thiserror::Error;

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors raised while loading or querying the catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Catalog file could not be read
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog document is not valid TOML or has unexpected keys
    #[error("Catalog parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("catalog.schema_version {0} is not supported (expected 1)")]
    UnsupportedSchema(u32),

    /// Key is empty, not ASCII alphanumeric, too long, or reserved
    #[error("Invalid {kind} key '{key}': {reason}")]
    InvalidKey {
        kind: &'static str,
        key: String,
        reason: String,
    },

    #[error("Duplicate {kind} key '{key}'")]
    DuplicateKey { kind: &'static str, key: String },

    /// A filename listed twice across categories and special documents
    #[error("Filename '{filename}' appears in both '{first}' and '{second}'")]
    DuplicateFilename {
        filename: String,
        first: String,
        second: String,
    },

    #[error("Keyword '{keyword}' points at unknown file '{filename}'")]
    UnknownKeywordTarget { keyword: String, filename: String },

    #[error("Empty keyword in keyword table")]
    EmptyKeyword,

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Unknown special document: {0}")]
    UnknownSpecial(String),

    #[error("File '{filename}' is not listed in category '{category}'")]
    UnknownDocument { category: String, filename: String },

    /// Generic validation failure
    #[error("{0}")]
    Invalid(String),
}

impl CatalogError {
    pub(crate) fn invalid_key(
        kind: &'static str,
        key: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidKey {
            kind,
            key: key.into(),
            reason: reason.into(),
        }
    }
}
