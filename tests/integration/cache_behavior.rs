//! Integration tests for per-column template caching

use std::sync::Arc;
use std::time::Duration;

use urllink::cache::MetadataCache;
use urllink::config::UrlLinkProperties;
use urllink::core::{ColumnKey, RenderError};
use urllink::customizer::UrlLinkFieldCustomizer;
use urllink::metadata::StaticMetadataSource;
use urllink::render::{CellEvent, SuppressReason};
use urllink::test_utils::{CountingMetadataSource, FailingMetadataSource, init_test_logging};

fn docs_source() -> CountingMetadataSource<StaticMetadataSource> {
    CountingMetadataSource::new(
        StaticMetadataSource::new()
            .with_column("DocLink", "https://docs.contoso.com/view?id={DocID}")
            .with_column("Ticket", "https://tickets.contoso.com/{Queue}/{Id}"),
    )
    .with_delay(Duration::from_millis(25))
}

/// Many cells of one column started before the template arrives share one fetch
#[tokio::test]
async fn test_single_fetch_for_concurrent_cells() {
    init_test_logging(None);
    let source = docs_source();
    let cache = Arc::new(MetadataCache::new(Arc::new(source.clone()), "list"));
    let customizer = Arc::new(UrlLinkFieldCustomizer::new(UrlLinkProperties::default(), cache));

    let events: Vec<CellEvent> = (0..50)
        .map(|i| CellEvent::new("DocLink", format!(r#"{{"Title": "Doc {i}", "DocID": "D-{i}"}}"#)))
        .collect();
    let handles: Vec<_> = events.iter().map(|e| customizer.on_render_cell(e.clone())).collect();

    for handle in handles {
        assert!(handle.await.unwrap().is_rendered());
    }

    assert_eq!(source.calls(), 1);
    assert_eq!(customizer.cache().stats(), (49, 1));
    for (i, event) in events.iter().enumerate() {
        let html = event.dom_element.inner_html().unwrap();
        assert!(html.contains(&format!(">Doc {i}</a>")), "row {i}: {html}");
    }
}

/// Concurrent renders on a multi-threaded runtime still fetch once
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_single_fetch_across_worker_threads() {
    let source = docs_source();
    let cache = Arc::new(MetadataCache::new(Arc::new(source.clone()), "list"));
    let customizer = Arc::new(UrlLinkFieldCustomizer::new(UrlLinkProperties::default(), cache));

    let handles: Vec<_> = (0..100)
        .map(|i| {
            let column = if i % 2 == 0 { "DocLink" } else { "Ticket" };
            customizer.on_render_cell(CellEvent::new(
                column,
                format!(r#"{{"Title": "t", "DocID": "{i}", "Queue": "ops", "Id": {i}}}"#),
            ))
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().is_rendered());
    }

    assert_eq!(source.calls(), 2);
    assert_eq!(customizer.cache().len(), 2);
}

/// Later cells reuse the resolved template without another fetch
#[tokio::test]
async fn test_resolved_template_is_reused() {
    let source = docs_source();
    let cache = Arc::new(MetadataCache::new(Arc::new(source.clone()), "list"));
    let customizer = UrlLinkFieldCustomizer::new(UrlLinkProperties::default(), cache);

    let first = customizer
        .render_cell(&CellEvent::new("DocLink", r#"{"Title": "a", "DocID": "1"}"#))
        .await;
    let second = customizer
        .render_cell(&CellEvent::new("DocLink", r#"{"Title": "b", "DocID": "2"}"#))
        .await;

    assert_eq!(first.link().unwrap().href, "https://docs.contoso.com/view?id=1");
    assert_eq!(second.link().unwrap().href, "https://docs.contoso.com/view?id=2");
    assert_eq!(source.calls(), 1);
}

/// A failed fetch is terminal for the column and is not retried
#[tokio::test]
async fn test_failed_fetch_is_not_retried() {
    let source = CountingMetadataSource::new(FailingMetadataSource::new("503 Service Unavailable"));
    let cache = Arc::new(MetadataCache::new(Arc::new(source.clone()), "list"));
    let customizer = Arc::new(UrlLinkFieldCustomizer::new(UrlLinkProperties::default(), cache));

    for _ in 0..5 {
        let event = CellEvent::new("DocLink", r#"{"Title": "a"}"#);
        let result = customizer.render_cell(&event).await;
        assert!(matches!(
            result.suppress_reason(),
            Some(SuppressReason::Failed(RenderError::MetadataFetch { .. }))
        ));
        assert_eq!(event.dom_element.inner_html(), None);
    }

    assert_eq!(source.calls(), 1);
}

/// A fresh cache starts over, which is the only way to recover from a failed fetch
#[tokio::test]
async fn test_fresh_cache_fetches_again() {
    let source = docs_source();
    let column = ColumnKey::from("DocLink");

    let first = MetadataCache::new(Arc::new(source.clone()), "list");
    first.resolve(&column).await.unwrap();
    let second = MetadataCache::new(Arc::new(source.clone()), "list");
    second.resolve(&column).await.unwrap();

    assert_eq!(source.calls(), 2);
}
