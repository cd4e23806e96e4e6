use std::path::PathBuf;
use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Keyword, category, token or file is absent; rendered to the user
    #[error("Not found: {0}")]
    NotFound(String),

    /// Delivery was not confirmed; logged, never retried
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Outbound buttons the chat API would refuse; nothing is sent
    #[error("Invalid button layout: {0}")]
    InvalidLayout(String),

    /// Inbound update lacks a field the core needs
    #[error("Malformed event: {0}")]
    MalformedEvent(String),
}

impl EngineError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn malformed(what: impl Into<String>) -> Self {
        Self::MalformedEvent(what.into())
    }
}

/// Failures reported by a [`crate::Transport`] implementation
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Request(String),

    /// The chat API answered but refused the call
    #[error("{method} rejected: {description}")]
    Api { method: String, description: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TransportError {
    pub fn request(message: impl Into<String>) -> Self {
        Self::Request(message.into())
    }

    pub fn api(method: impl Into<String>, description: impl Into<String>) -> Self {
        Self::Api {
            method: method.into(),
            description: description.into(),
        }
    }
}
