//! Error types for opening windows
//!
//! Every variant here is raised while a window is being opened. Once a
//! [`Window`](crate::window::Window) exists its operations report failure as
//! ordinary negative results (`false`, `None`, an empty read).

use thiserror::Error;

/// Errors that can occur while parsing a locator or resolving a backing resource
#[derive(Debug, Error)]
pub enum SubstreamError {
    /// Locator did not match the `scheme://offset:length[/id|/path]` grammar
    #[error("Malformed locator {locator:?}: {reason}")]
    MalformedLocator { locator: String, reason: String },

    /// Negative offset/length, or a range whose end does not fit in `u64`
    #[error("Invalid range: offset {offset}, length {length}")]
    InvalidRange { offset: i128, length: i128 },

    /// Resource id or path does not name a live resource
    #[error("Resource unavailable: {0}")]
    ResourceUnavailable(String),

    /// Resource cannot be positioned randomly
    #[error("Resource is not seekable: {0}")]
    NotSeekable(String),

    /// I/O error while copying or reopening (catch-all)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SubstreamError {
    pub(crate) fn malformed(locator: &str, reason: impl Into<String>) -> Self {
        SubstreamError::MalformedLocator {
            locator: locator.to_string(),
            reason: reason.into(),
        }
    }
}

/// Type alias for Result with SubstreamError
pub type Result<T> = std::result::Result<T, SubstreamError>;
