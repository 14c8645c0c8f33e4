//! Memoized column template lookups.
//!
//! Rendering a list view calls the row renderer once per visible row, and
//! every row of a column needs the same template. [`MetadataCache`] keeps one
//! lookup per column so the metadata source is asked at most once per column
//! for the lifetime of the cache.
//!
//! # Lookup Lifecycle
//!
//! ```text
//! resolve(col) ──miss──▶ source.column_description() ──▶ store PendingLookup ──▶ return
//!      │                                                        ▲
//!      └────hit──────────────────────────────── clone ──────────┘
//! ```
//!
//! - The pending lookup is stored before the caller can await it. Renders that
//!   arrive while the fetch is in flight share it instead of starting another.
//! - The check and the insert are one [`DashMap::entry`] call, never split by
//!   an `.await`.
//! - Failed lookups stay cached. Every current and future render of that
//!   column observes the same [`RenderError::MetadataFetch`]; a new cache is
//!   needed to try again.
//! - Entries are never evicted: column templates are assumed static for the
//!   life of a rendering session.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::core::{ColumnKey, RenderError};
use crate::metadata::MetadataSource;
use crate::templating::Template;

/// An in-flight or completed template lookup for one column.
///
/// Cloning is cheap; all clones resolve to the same outcome.
pub type PendingLookup = Shared<BoxFuture<'static, Result<Template, RenderError>>>;

/// Column template cache shared by all rows of one customizer instance.
pub struct MetadataCache {
    source: Arc<dyn MetadataSource>,
    list_id: String,
    lookups: DashMap<ColumnKey, PendingLookup>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl MetadataCache {
    /// Create an empty cache for the columns of `list_id`.
    pub fn new(source: Arc<dyn MetadataSource>, list_id: impl Into<String>) -> Self {
        Self {
            source,
            list_id: list_id.into(),
            lookups: DashMap::new(),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// List whose columns this cache resolves.
    pub fn list_id(&self) -> &str {
        &self.list_id
    }

    /// Lookup of `column`'s template, starting the fetch on first request.
    ///
    /// Never suspends: the fetch is issued and recorded before this returns.
    pub fn resolve(&self, column: &ColumnKey) -> PendingLookup {
        match self.lookups.entry(column.clone()) {
            Entry::Occupied(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::trace!("Reusing template lookup for column {column}");
                entry.get().clone()
            }
            Entry::Vacant(entry) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(
                    "Fetching template for column {column} of list {}",
                    self.list_id
                );
                let lookup = self.fetch(column);
                entry.insert(lookup.clone());
                lookup
            }
        }
    }

    fn fetch(&self, column: &ColumnKey) -> PendingLookup {
        let request = self.source.column_description(&self.list_id, column.as_str());
        let column = column.clone();

        async move {
            match request.await {
                Ok(description) => {
                    tracing::debug!(
                        "Template for column {column}: {}",
                        description.description
                    );
                    Ok(Template::new(description.description))
                }
                Err(e) => {
                    tracing::warn!("Failed to fetch template for column {column}: {e:#}");
                    Err(RenderError::MetadataFetch {
                        column: column.to_string(),
                        reason: format!("{e:#}"),
                    })
                }
            }
        }
        .boxed()
        .shared()
    }

    /// Whether a lookup for `column` has been started.
    pub fn contains(&self, column: &ColumnKey) -> bool {
        self.lookups.contains_key(column)
    }

    /// Number of columns with a lookup.
    pub fn len(&self) -> usize {
        self.lookups.len()
    }

    /// Whether no lookup has been started yet.
    pub fn is_empty(&self) -> bool {
        self.lookups.is_empty()
    }

    /// Cache statistics as `(hits, misses)`.
    pub fn stats(&self) -> (usize, usize) {
        (self.hits.load(Ordering::Relaxed), self.misses.load(Ordering::Relaxed))
    }

    /// Hit rate as a percentage.
    pub fn hit_rate(&self) -> f64 {
        let (hits, misses) = self.stats();
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            (hits as f64 / total as f64) * 100.0
        }
    }
}

impl fmt::Debug for MetadataCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (hits, misses) = self.stats();
        f.debug_struct("MetadataCache")
            .field("list_id", &self.list_id)
            .field("columns", &self.lookups.len())
            .field("hits", &hits)
            .field("misses", &misses)
            .finish_non_exhaustive()
    }
}
