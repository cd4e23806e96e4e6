use thiserror::Error;

pub type Result<T> = std::result::Result<T, CodecError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Token does not follow any known layout
    #[error("Malformed token: {0}")]
    Malformed(String),

    /// Token parsed but no catalog document matches it
    #[error("No document matches token: {0}")]
    NotFound(String),

    #[error("Token too long (chars={len}, max={max})")]
    TooLong { len: usize, max: usize },
}

impl CodecError {
    pub fn malformed(token: impl Into<String>) -> Self {
        Self::Malformed(token.into())
    }

    pub fn not_found(token: impl Into<String>) -> Self {
        Self::NotFound(token.into())
    }
}
