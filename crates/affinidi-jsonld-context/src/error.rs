use std::fmt;

/// Errors that can occur during context processing.
///
/// Only structural failures around remote context inclusion are fatal.
/// Malformed term definitions (wrong types for `@container`, `@type`,
/// `@index`, unknown keys) degrade to defaults instead of erroring, so a
/// partially valid context still yields a usable term table.
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    /// A context source IRI was revisited while flattening a single load call.
    #[error("Recursive context inclusion: {0}")]
    RecursiveContextInclusion(String),

    /// A remote-fetched document lacks the `@context` wrapper key.
    #[error("Invalid remote context: {0}")]
    InvalidRemoteContext(String),

    /// The injected fetch capability failed.
    #[error("Context fetch failed: {0}")]
    FetchFailed(String),
}

/// Result type alias for context operations.
pub type Result<T> = std::result::Result<T, ContextError>;

impl ContextError {
    pub fn recursive(msg: impl fmt::Display) -> Self {
        Self::RecursiveContextInclusion(msg.to_string())
    }

    pub fn invalid_remote(msg: impl fmt::Display) -> Self {
        Self::InvalidRemoteContext(msg.to_string())
    }

    pub fn fetch(msg: impl fmt::Display) -> Self {
        Self::FetchFailed(msg.to_string())
    }
}
