//! Test utilities for urllink
//!
//! Available to unit tests and, through the `test-utils` feature, to the
//! integration suite.
//!
//! - [`init_test_logging`] - once-only tracing setup that writes through the
//!   test harness
//! - [`CountingMetadataSource`] - wraps a source, counts fetches, and can hold
//!   each fetch open for a while so concurrent renders overlap
//! - [`FailingMetadataSource`] - every fetch fails
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use urllink::cache::MetadataCache;
//! use urllink::metadata::StaticMetadataSource;
//! use urllink::test_utils::CountingMetadataSource;
//!
//! let source = CountingMetadataSource::new(
//!     StaticMetadataSource::new().with_column("DocLink", "https://docs/{DocID}"),
//! );
//! let cache = MetadataCache::new(Arc::new(source.clone()), "list");
//! assert_eq!(source.calls(), 0);
//! ```

use anyhow::{Result, anyhow};
use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use std::sync::Once;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::metadata::{ColumnDescription, MetadataSource};

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG`; with neither, logging stays
/// off.
///
/// ```bash
/// RUST_LOG=urllink=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}

/// Metadata source wrapper that counts issued fetches.
///
/// The counter is incremented when a fetch is issued, not when it settles, so
/// it observes duplicate fetches even while earlier ones are still pending.
pub struct CountingMetadataSource<S> {
    inner: Arc<S>,
    calls: Arc<AtomicUsize>,
    delay: Option<Duration>,
}

impl<S> Clone for CountingMetadataSource<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            calls: Arc::clone(&self.calls),
            delay: self.delay,
        }
    }
}

impl<S: MetadataSource> CountingMetadataSource<S> {
    /// Wrap `inner`.
    pub fn new(inner: S) -> Self {
        Self {
            inner: Arc::new(inner),
            calls: Arc::new(AtomicUsize::new(0)),
            delay: None,
        }
    }

    /// Keep every fetch pending for `delay` before answering.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of fetches issued so far, across all clones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<S: MetadataSource> MetadataSource for CountingMetadataSource<S> {
    fn column_description(
        &self,
        list_id: &str,
        field_id: &str,
    ) -> BoxFuture<'static, Result<ColumnDescription>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let request = self.inner.column_description(list_id, field_id);
        let delay = self.delay;

        async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            request.await
        }
        .boxed()
    }
}

/// Metadata source whose fetches always fail with `message`.
#[derive(Debug, Clone)]
pub struct FailingMetadataSource {
    message: String,
}

impl FailingMetadataSource {
    /// Create a source failing with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl MetadataSource for FailingMetadataSource {
    fn column_description(
        &self,
        _list_id: &str,
        _field_id: &str,
    ) -> BoxFuture<'static, Result<ColumnDescription>> {
        let message = self.message.clone();
        async move { Err(anyhow!(message)) }.boxed()
    }
}
