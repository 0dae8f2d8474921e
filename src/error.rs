//! Error types for stretchtext operations.

use thiserror::Error;

/// Errors that can occur while loading documents or resolving summaries.
///
/// Resolution failures ([`Error::DetailNotFound`], [`Error::NoSiblingDetail`])
/// are never fatal to an interaction: the controller logs them and leaves the
/// summary untouched.
#[derive(Error, Debug)]
pub enum Error {
    #[error("No StretchText details element with ID: {id}")]
    DetailNotFound { id: String },

    #[error("No StretchText details element found for: {summary}")]
    NoSiblingDetail { summary: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error means a summary has no resolvable detail.
    pub fn is_unresolved_detail(&self) -> bool {
        matches!(
            self,
            Error::DetailNotFound { .. } | Error::NoSiblingDetail { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
