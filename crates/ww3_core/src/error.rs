//! Error types shared by every core component.

use std::path::PathBuf;

/// Errors surfaced by the core to its callers.
///
/// Skipping a missing NAMELIST file is not an error; see
/// [`crate::namelist::RewriteOutcome::Skipped`].
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The config file exists but is not a valid JSON object.
    #[error("Config file '{path}' is corrupt: {message}")]
    ConfigCorrupt { path: PathBuf, message: String },

    /// Saving the config file failed.
    #[error("Failed to write config file '{path}': {source}")]
    ConfigWriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Rewriting a NAMELIST file failed. The temp file has been removed.
    #[error("Failed to write NAMELIST file '{path}': {source}")]
    NamelistWriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Attempted to delete the only remaining output-variable scheme.
    #[error("Cannot delete '{0}': it is the last remaining scheme")]
    LastSchemeProtected(String),

    /// A required field is empty or a list entry is duplicated.
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

impl CoreError {
    /// Shorthand for a [`CoreError::ValidationFailed`].
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::ValidationFailed(message.into())
    }

    /// Whether the error is a user-input problem rather than an I/O one.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CoreError::ValidationFailed(_) | CoreError::LastSchemeProtected(_)
        )
    }
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
