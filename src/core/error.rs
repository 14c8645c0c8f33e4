//! Error handling for urllink
//!
//! The error system follows two rules:
//! 1. **Strongly-typed errors** for precise handling in code
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`RenderError`] - failures local to a single row render. These never leave
//!   the renderer: they are logged as warnings and turn the row into a
//!   suppressed result.
//! - [`UrlLinkError`] - failures of the surrounding tool (configuration,
//!   identifiers, I/O) that do propagate to the caller.
//! - [`ErrorContext`] - wrapper adding details and a suggestion for display.
//!
//! Use [`user_friendly_error`] to convert any [`anyhow::Error`] into an
//! [`ErrorContext`] for printing.
//!
//! # Examples
//!
//! ```rust,no_run
//! use urllink::core::{UrlLinkError, ErrorContext};
//!
//! let context = ErrorContext::new(UrlLinkError::ConfigError {
//!     message: "list_id is required".to_string(),
//! })
//! .with_suggestion("Add list_id = \"<guid>\" to urllink.toml");
//!
//! context.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// Failure of one row render.
///
/// Every variant is handled inside the row renderer: it is reported with
/// `tracing::warn!` and degrades the row to a suppressed result. The type is
/// `Clone` because a failed metadata lookup is shared by every row of the
/// affected column.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The metadata source was unreachable or answered with an unexpected shape.
    ///
    /// Terminal for the column: the cache keeps the failed lookup and every
    /// later row of the same column observes this error.
    #[error("Failed to fetch template for column '{column}': {reason}")]
    MetadataFetch {
        /// Column whose description could not be fetched
        column: String,
        /// Underlying failure, including its cause chain
        reason: String,
    },

    /// The row's raw field value is not valid JSON.
    #[error("Row value is not valid JSON: {reason}")]
    PayloadParse {
        /// Parser message, including line and column
        reason: String,
    },

    /// The payload has a shape that cannot be substituted into a template.
    #[error("Cannot substitute row payload: {reason}")]
    Substitution {
        /// What was unexpected about the payload
        reason: String,
    },
}

/// The main error type for urllink operations outside the per-row pipeline.
#[derive(Error, Debug, Clone)]
pub enum UrlLinkError {
    /// Configuration content is invalid
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// Configuration file could not be parsed
    #[error("Invalid configuration file {file}: {reason}")]
    ConfigParseError {
        /// Path of the file that failed to parse
        file: String,
        /// Parser message
        reason: String,
    },

    /// A list or field identifier is not a GUID where one is required
    #[error("Invalid {kind} identifier '{value}': expected a GUID")]
    InvalidIdentifier {
        /// Which identifier was wrong ("list" or "field")
        kind: String,
        /// The rejected value
        value: String,
    },

    /// The remote metadata store answered with a non-success status
    #[error("Metadata request to {url} failed with status {status}")]
    MetadataHttpStatus {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// A row-level error surfaced directly, e.g. by the `substitute` command
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Other error
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

/// Error with additional user-facing context.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: UrlLinkError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context without suggestion or details.
    #[must_use]
    pub const fn new(error: UrlLinkError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr: error in red, details in yellow, suggestion in green.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with suggestions where the
/// failure is recognized.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(urllink_error) = error.downcast_ref::<UrlLinkError>() {
        return create_error_context(urllink_error.clone());
    }

    if let Some(render_error) = error.downcast_ref::<RenderError>() {
        return create_error_context(UrlLinkError::Render(render_error.clone()));
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        if io_error.kind() == std::io::ErrorKind::NotFound {
            return ErrorContext::new(UrlLinkError::Other {
                message: format!("{error:#}"),
            })
            .with_suggestion("Check that the file exists and the path is correct");
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(UrlLinkError::ConfigParseError {
            file: "urllink.toml".to_string(),
            reason: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax of the configuration file");
    }

    ErrorContext::new(UrlLinkError::Other {
        message: format!("{error:#}"),
    })
}

fn create_error_context(error: UrlLinkError) -> ErrorContext {
    match &error {
        UrlLinkError::ConfigError {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Review urllink.toml or pass another file with --config"),
        UrlLinkError::ConfigParseError {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check the TOML syntax: quotes, brackets and table headers"),
        UrlLinkError::InvalidIdentifier {
            ..
        } => ErrorContext::new(error)
            .with_details("SharePoint list and field ids look like 0f6b7c4e-5a2d-4c1b-9e3f-2a7d8c6b5e41")
            .with_suggestion("Copy the id from the list or field settings page"),
        UrlLinkError::MetadataHttpStatus {
            status,
            ..
        } => {
            let suggestion = match status {
                401 | 403 => "urllink does not authenticate; use a site that allows anonymous reads or configure [columns] instead",
                404 => "Check site_url, list_id and the field id",
                _ => "Check that the site is reachable",
            };
            ErrorContext::new(error).with_suggestion(suggestion)
        }
        UrlLinkError::Render(RenderError::PayloadParse {
            ..
        }) => ErrorContext::new(error).with_suggestion(
            "The payload must be a JSON object, e.g. {\"Title\": \"Open\", \"DocID\": \"42\"}",
        ),
        _ => ErrorContext::new(error),
    }
}
