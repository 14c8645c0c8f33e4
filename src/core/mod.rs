//! Core types and error handling.
//!
//! - [`ColumnKey`] - identity of a column, the metadata cache key
//! - [`error`] - error types and user-facing error formatting

pub mod error;

pub use error::{ErrorContext, RenderError, UrlLinkError, user_friendly_error};

use std::fmt;

/// Opaque identifier of a column within a list (the field id).
///
/// Used verbatim as the metadata cache key, so two renders refer to the same
/// column exactly when their keys compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnKey(String);

impl ColumnKey {
    /// Create a key from any string-like identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as passed to the metadata source.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ColumnKey {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ColumnKey {
    fn from(id: String) -> Self {
        Self(id)
    }
}
