//! Integration tests for row rendering through the field customizer

use std::sync::Arc;

use urllink::cache::MetadataCache;
use urllink::config::UrlLinkProperties;
use urllink::core::RenderError;
use urllink::customizer::UrlLinkFieldCustomizer;
use urllink::metadata::StaticMetadataSource;
use urllink::render::{CellEvent, RenderResult, SuppressReason};

fn customizer_for(template: &str, properties: UrlLinkProperties) -> Arc<UrlLinkFieldCustomizer> {
    let source = StaticMetadataSource::new().with_column("Link", template);
    let cache = Arc::new(MetadataCache::new(Arc::new(source), "list"));
    Arc::new(UrlLinkFieldCustomizer::new(properties, cache))
}

async fn render(customizer: &Arc<UrlLinkFieldCustomizer>, raw: &str) -> (RenderResult, CellEvent) {
    let event = CellEvent::new("Link", raw);
    let result = customizer.on_render_cell(event.clone()).await.unwrap();
    (result, event)
}

#[tokio::test]
async fn test_substitution_completeness() {
    let customizer = customizer_for("http://x/{a}/{b}", UrlLinkProperties::default());
    let (result, _) = render(&customizer, r#"{"Title": "T", "a": "1", "b": "2"}"#).await;
    assert_eq!(result.link().unwrap().href, "http://x/1/2");

    let customizer = customizer_for("http://x/{a}?again={a}", UrlLinkProperties::default());
    let (result, _) = render(&customizer, r#"{"Title": "T", "a": "1"}"#).await;
    assert_eq!(result.link().unwrap().href, "http://x/1?again=1");
}

#[tokio::test]
async fn test_unmatched_token_passthrough() {
    let customizer = customizer_for("http://x/{a}/{c}", UrlLinkProperties::default());
    let (result, _) = render(&customizer, r#"{"Title": "T", "a": "1"}"#).await;
    assert_eq!(result.link().unwrap().href, "http://x/1/{c}");
}

#[tokio::test]
async fn test_display_gate() {
    let customizer = customizer_for("http://x/{a}", UrlLinkProperties::default());
    let (result, event) = render(&customizer, r#"{"a": "1"}"#).await;
    assert_eq!(result, RenderResult::Suppressed(SuppressReason::DisplayFieldMissing));
    assert_eq!(event.dom_element.inner_html(), None);
}

#[tokio::test]
async fn test_malformed_json_does_not_affect_siblings() {
    let customizer = customizer_for("http://x/{id}", UrlLinkProperties::default());
    let rows = [r#"{"Title": "A", "id": "1"}"#, "{not json", r#"{"Title": "C", "id": "3"}"#];

    let events: Vec<CellEvent> = rows.iter().map(|raw| CellEvent::new("Link", *raw)).collect();
    let handles: Vec<_> = events.iter().map(|e| customizer.on_render_cell(e.clone())).collect();
    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap());
    }

    assert_eq!(results[0].link().unwrap().href, "http://x/1");
    assert!(matches!(
        results[1],
        RenderResult::Suppressed(SuppressReason::Failed(RenderError::PayloadParse { .. }))
    ));
    assert_eq!(results[2].link().unwrap().href, "http://x/3");
    assert!(events[0].dom_element.inner_html().is_some());
    assert!(events[1].dom_element.inner_html().is_none());
    assert!(events[2].dom_element.inner_html().is_some());
}

#[tokio::test]
async fn test_target_default_and_configured() {
    let default = customizer_for("http://x/", UrlLinkProperties::default());
    let (result, event) = render(&default, r#"{"Title": "T"}"#).await;
    assert_eq!(result.link().unwrap().target, "_blank");
    assert!(event.dom_element.inner_html().unwrap().contains("target=\"_blank\""));

    let properties = UrlLinkProperties::from_json(r#"{"target": "_self"}"#).unwrap();
    let configured = customizer_for("http://x/", properties);
    let (result, event) = render(&configured, r#"{"Title": "T"}"#).await;
    assert_eq!(result.link().unwrap().target, "_self");
    assert!(event.dom_element.inner_html().unwrap().contains("target=\"_self\""));
}

#[tokio::test]
async fn test_markup_contract() {
    let customizer = customizer_for("https://docs/{DocID}", UrlLinkProperties::default());
    let (_, event) = render(&customizer, r#"{"Title": "Q&A", "DocID": "42"}"#).await;

    let html = event.dom_element.inner_html().unwrap();
    assert!(html.starts_with("<div><a "));
    assert!(html.ends_with(">Q&amp;A</a></div>"));
    assert_eq!(html.matches("<a ").count(), 1);
    assert!(html.contains("href=\"https://docs/42\""));
}
