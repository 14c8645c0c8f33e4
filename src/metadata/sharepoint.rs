//! SharePoint REST metadata source.

use anyhow::{Context, Result};
use futures::future::{BoxFuture, FutureExt};
use reqwest::header::ACCEPT;
use uuid::Uuid;

use super::{ColumnDescription, MetadataSource};
use crate::core::UrlLinkError;

const ODATA_NOMETADATA: &str = "application/json;odata=nometadata";

/// Reads field descriptions from `{site}/_api/web/lists(guid'..')/fields(guid'..')`.
///
/// Requests are unauthenticated and never retried; a failed request fails the
/// column's lookup.
#[derive(Debug, Clone)]
pub struct SharePointMetadataSource {
    client: reqwest::Client,
    site_url: String,
}

impl SharePointMetadataSource {
    /// Create a source for the site at `site_url`.
    pub fn new(site_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), site_url)
    }

    /// Create a source that sends requests through `client`.
    pub fn with_client(client: reqwest::Client, site_url: impl Into<String>) -> Self {
        let site_url = site_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            site_url,
        }
    }

    /// REST endpoint of a field definition.
    ///
    /// # Errors
    ///
    /// Returns [`UrlLinkError::InvalidIdentifier`] if either id is not a GUID.
    pub fn field_url(&self, list_id: &str, field_id: &str) -> Result<String, UrlLinkError> {
        let list = parse_guid("list", list_id)?;
        let field = parse_guid("field", field_id)?;
        Ok(format!("{}/_api/web/lists(guid'{list}')/fields(guid'{field}')", self.site_url))
    }
}

fn parse_guid(kind: &str, value: &str) -> Result<Uuid, UrlLinkError> {
    Uuid::parse_str(value.trim_matches(|c| c == '{' || c == '}')).map_err(|_| {
        UrlLinkError::InvalidIdentifier {
            kind: kind.to_string(),
            value: value.to_string(),
        }
    })
}

impl MetadataSource for SharePointMetadataSource {
    fn column_description(
        &self,
        list_id: &str,
        field_id: &str,
    ) -> BoxFuture<'static, Result<ColumnDescription>> {
        let url = self.field_url(list_id, field_id);
        let client = self.client.clone();

        async move {
            let url = url?;
            tracing::debug!("Fetching field definition from {url}");

            let response = client
                .get(&url)
                .header(ACCEPT, ODATA_NOMETADATA)
                .send()
                .await
                .with_context(|| format!("Failed to reach {url}"))?;

            let status = response.status();
            if !status.is_success() {
                return Err(UrlLinkError::MetadataHttpStatus {
                    url,
                    status: status.as_u16(),
                }
                .into());
            }

            let body: serde_json::Value = response
                .json()
                .await
                .with_context(|| format!("Response from {url} is not JSON"))?;

            ColumnDescription::from_json(body)
        }
        .boxed()
    }
}
