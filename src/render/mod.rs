//! Row rendering: template lookup, substitution and the display gate.
//!
//! [`RowRenderer::render_row`] runs one row through a fixed sequence:
//!
//! 1. Resolve the column's template through the [`MetadataCache`]
//! 2. Parse the raw field value into a [`RowPayload`]
//! 3. Substitute payload values into the template
//! 4. Check the `Title` display field
//! 5. Build a [`LinkDescriptor`]
//!
//! Every failure along the way is logged with `tracing::warn!` and turns the
//! row into [`RenderResult::Suppressed`]; nothing is returned as an error, so
//! one bad row never affects its siblings.
//!
//! ```text
//! Pending ──▶ Resolved ──▶ Rendered
//!    │            └──────▶ Suppressed
//!    └──────▶ Failed ────▶ Suppressed
//! ```

mod cell;

pub use cell::{CellElement, CellEvent};

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::cache::MetadataCache;
use crate::core::{ColumnKey, RenderError};
use crate::templating::{RowPayload, Template};

/// Anchor target used when none is configured: open in a new browsing context.
pub const DEFAULT_TARGET: &str = "_blank";

/// A rendered link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkDescriptor {
    /// Substituted template
    pub href: String,
    /// Link text, the payload's `Title`
    pub text: String,
    /// Anchor target attribute
    pub target: String,
}

impl LinkDescriptor {
    /// Cell markup: one container holding one anchor.
    ///
    /// Attribute values and the text are HTML-escaped, so the title is always
    /// text content and never markup.
    pub fn to_html(&self) -> String {
        format!(
            "<div><a target=\"{}\" href=\"{}\">{}</a></div>",
            escape_html(&self.target),
            escape_html(&self.href),
            escape_html(&self.text)
        )
    }
}

/// Escape the characters that end a quoted attribute or start markup.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Why a row produced no link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuppressReason {
    /// Lookup, parsing or substitution failed
    Failed(RenderError),
    /// The payload has no `Title`
    DisplayFieldMissing,
}

impl fmt::Display for SuppressReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(e) => write!(f, "{e}"),
            Self::DisplayFieldMissing => f.write_str("No Title specified in row value"),
        }
    }
}

/// Outcome of one row render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderResult {
    /// The row renders as a link
    Rendered(LinkDescriptor),
    /// The row renders nothing
    Suppressed(SuppressReason),
}

impl RenderResult {
    /// Whether a link was produced.
    pub const fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered(_))
    }

    /// The link, if one was produced.
    pub const fn link(&self) -> Option<&LinkDescriptor> {
        match self {
            Self::Rendered(link) => Some(link),
            Self::Suppressed(_) => None,
        }
    }

    /// The suppression reason, if no link was produced.
    pub const fn suppress_reason(&self) -> Option<&SuppressReason> {
        match self {
            Self::Rendered(_) => None,
            Self::Suppressed(reason) => Some(reason),
        }
    }
}

/// Renders rows against templates from a shared [`MetadataCache`].
#[derive(Debug, Clone)]
pub struct RowRenderer {
    cache: Arc<MetadataCache>,
}

impl RowRenderer {
    /// Create a renderer reading templates from `cache`.
    pub const fn new(cache: Arc<MetadataCache>) -> Self {
        Self {
            cache,
        }
    }

    /// The shared template cache.
    pub const fn cache(&self) -> &Arc<MetadataCache> {
        &self.cache
    }

    /// Render one row of `column`.
    ///
    /// `target` is the configured anchor target; [`DEFAULT_TARGET`] when `None`.
    pub async fn render_row(
        &self,
        column: &ColumnKey,
        raw_field_value: &str,
        target: Option<&str>,
    ) -> RenderResult {
        let lookup = self.cache.resolve(column);

        let template = match lookup.await {
            Ok(template) => template,
            Err(e) => {
                tracing::warn!("Skipping row of column {column} ({raw_field_value}): {e}");
                return RenderResult::Suppressed(SuppressReason::Failed(e));
            }
        };

        match build_link(&template, raw_field_value, target) {
            Ok(Some(link)) => {
                tracing::trace!("Rendered row of column {column}: {}", link.href);
                RenderResult::Rendered(link)
            }
            Ok(None) => {
                tracing::warn!(
                    "No Title specified in JSON ({raw_field_value}) for row of column {column}"
                );
                RenderResult::Suppressed(SuppressReason::DisplayFieldMissing)
            }
            Err(e) => {
                tracing::warn!("Skipping row of column {column} ({raw_field_value}): {e}");
                RenderResult::Suppressed(SuppressReason::Failed(e))
            }
        }
    }
}

/// Substitute and gate one row. `Ok(None)` means the row has no title.
fn build_link(
    template: &Template,
    raw_field_value: &str,
    target: Option<&str>,
) -> Result<Option<LinkDescriptor>, RenderError> {
    let payload = RowPayload::parse(raw_field_value)?;
    let href = template.substitute(&payload)?;

    let Some(text) = payload.title()? else {
        return Ok(None);
    };

    Ok(Some(LinkDescriptor {
        href,
        text,
        target: target.unwrap_or(DEFAULT_TARGET).to_string(),
    }))
}
