//! The field customizer: host-facing entry points.
//!
//! A host renders list views cell by cell. For each visible cell it calls
//! [`UrlLinkFieldCustomizer::on_render_cell`], and when the cell leaves the
//! view it calls [`UrlLinkFieldCustomizer::on_dispose_cell`]. The customizer
//! owns the column template cache for its whole lifetime; cells come and go.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use urllink::cache::MetadataCache;
//! use urllink::config::UrlLinkProperties;
//! use urllink::customizer::UrlLinkFieldCustomizer;
//! use urllink::metadata::StaticMetadataSource;
//! use urllink::render::CellEvent;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let source = StaticMetadataSource::new().with_column("DocLink", "https://docs/{DocID}");
//! let cache = Arc::new(MetadataCache::new(Arc::new(source), "list"));
//! let customizer = Arc::new(UrlLinkFieldCustomizer::new(UrlLinkProperties::default(), cache));
//! customizer.on_init();
//!
//! let event = CellEvent::new("DocLink", r#"{"Title": "Open", "DocID": "42"}"#);
//! customizer.on_render_cell(event.clone()).await?;
//! println!("{}", event.dom_element.inner_html().unwrap_or_default());
//!
//! customizer.on_dispose_cell(&event);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::cache::MetadataCache;
use crate::config::UrlLinkProperties;
use crate::render::{CellEvent, RenderResult, RowRenderer};

const LOG_SOURCE: &str = "UrlLinkFieldCustomizer";

/// Renders JSON row values as links built from the column's URL template.
#[derive(Debug)]
pub struct UrlLinkFieldCustomizer {
    properties: UrlLinkProperties,
    renderer: RowRenderer,
}

impl UrlLinkFieldCustomizer {
    /// Create a customizer reading templates from `cache`.
    pub const fn new(properties: UrlLinkProperties, cache: Arc<MetadataCache>) -> Self {
        Self {
            properties,
            renderer: RowRenderer::new(cache),
        }
    }

    /// Host initialization hook.
    pub fn on_init(&self) {
        tracing::info!(
            "Activated {LOG_SOURCE} for list {} with properties: {:?}",
            self.renderer.cache().list_id(),
            self.properties
        );
    }

    /// Customizer properties.
    pub const fn properties(&self) -> &UrlLinkProperties {
        &self.properties
    }

    /// Column template cache shared by all cells.
    pub const fn cache(&self) -> &Arc<MetadataCache> {
        self.renderer.cache()
    }

    /// Render a cell and write the markup into its element.
    ///
    /// If the cell was disposed before the row finished, the write is dropped.
    pub async fn render_cell(&self, event: &CellEvent) -> RenderResult {
        let result = self
            .renderer
            .render_row(&event.column, &event.field_value, self.properties.target.as_deref())
            .await;

        if let RenderResult::Rendered(link) = &result {
            if !event.dom_element.set_inner_html(link.to_html()) {
                tracing::debug!(
                    "Cell of column {} was disposed before rendering finished",
                    event.column
                );
            }
        }

        result
    }

    /// Host render callback: starts rendering the cell in the background.
    ///
    /// The render runs to completion even if the cell is disposed meanwhile.
    /// Must be called from within a tokio runtime.
    pub fn on_render_cell(self: &Arc<Self>, event: CellEvent) -> JoinHandle<RenderResult> {
        let customizer = Arc::clone(self);
        tokio::spawn(async move { customizer.render_cell(&event).await })
    }

    /// Host dispose callback: releases the cell's markup.
    pub fn on_dispose_cell(&self, event: &CellEvent) {
        event.dom_element.dispose();
    }
}
