//! Render rows of a column through the field customizer.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use futures::future::join_all;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncReadExt;

use crate::cache::MetadataCache;
use crate::config::CustomizerConfig;
use crate::core::ColumnKey;
use crate::customizer::UrlLinkFieldCustomizer;
use crate::render::{CellEvent, RenderResult};

/// Output format of `render`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Cell markup per row, an empty line for suppressed rows
    #[default]
    Html,
    /// One JSON object per row
    Json,
}

/// Render every input line as one row's raw field value.
///
/// All rows are started at once, the way a list view renders its visible
/// cells, so the column's template is fetched once no matter how many rows
/// there are. Output keeps input order.
#[derive(Args, Debug)]
pub struct RenderCommand {
    /// Field id of the column whose template is used
    #[arg(long)]
    column: String,

    /// Anchor target, overriding the configuration file
    #[arg(long)]
    target: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Html)]
    format: OutputFormat,

    /// File with one row value per line (default: stdin)
    input: Option<PathBuf>,
}

impl RenderCommand {
    /// Execute the command using the configuration at `config_path`.
    pub async fn execute(self, config_path: Option<PathBuf>) -> Result<()> {
        let config = CustomizerConfig::load_with_optional(config_path).await?;

        let mut properties = config.properties();
        if let Some(target) = self.target.clone() {
            properties.target = Some(target);
        }

        let cache = Arc::new(MetadataCache::new(config.metadata_source()?, config.list_id.clone()));
        let customizer = Arc::new(UrlLinkFieldCustomizer::new(properties, cache));
        customizer.on_init();

        let input = self.read_input().await?;
        let column = ColumnKey::new(self.column.as_str());
        let events: Vec<CellEvent> =
            input.lines().map(|line| CellEvent::new(column.clone(), line)).collect();

        let handles = events.iter().map(|event| customizer.on_render_cell(event.clone()));
        let mut results = Vec::with_capacity(events.len());
        for joined in join_all(handles).await {
            results.push(joined.context("Row render task failed")?);
        }

        for (row, (event, result)) in events.iter().zip(&results).enumerate() {
            println!("{}", self.format_row(row, event, result));
            customizer.on_dispose_cell(event);
        }

        let rendered = results.iter().filter(|r| r.is_rendered()).count();
        let (hits, misses) = customizer.cache().stats();
        tracing::info!(
            "Rendered {rendered} of {} rows ({misses} template fetches, {hits} cache hits)",
            results.len()
        );

        Ok(())
    }

    async fn read_input(&self) -> Result<String> {
        match &self.input {
            Some(path) => tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read rows from {}", path.display())),
            None => {
                let mut input = String::new();
                tokio::io::stdin()
                    .read_to_string(&mut input)
                    .await
                    .context("Failed to read rows from stdin")?;
                Ok(input)
            }
        }
    }

    fn format_row(&self, row: usize, event: &CellEvent, result: &RenderResult) -> String {
        match self.format {
            OutputFormat::Html => event.dom_element.inner_html().unwrap_or_default(),
            OutputFormat::Json => match result {
                RenderResult::Rendered(link) => json!({
                    "row": row,
                    "status": "rendered",
                    "link": link,
                    "html": event.dom_element.inner_html(),
                })
                .to_string(),
                RenderResult::Suppressed(reason) => json!({
                    "row": row,
                    "status": "suppressed",
                    "reason": reason.to_string(),
                })
                .to_string(),
            },
        }
    }
}
