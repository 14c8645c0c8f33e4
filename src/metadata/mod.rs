//! Column metadata sources.
//!
//! A column's URL template lives in its free-text description, stored by an
//! external metadata service. [`MetadataSource`] abstracts "fetch the
//! description of field X in list Y" so the cache and renderer never depend
//! on a particular data-access library.
//!
//! Implementations:
//! - [`StaticMetadataSource`] - in-memory descriptions, e.g. from the
//!   `[columns]` table of `urllink.toml`
//! - [`SharePointMetadataSource`] - the SharePoint REST API

mod sharepoint;

pub use sharepoint::SharePointMetadataSource;

use anyhow::{Context, Result};
use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// The part of a field definition urllink cares about.
///
/// Mirrors the service's JSON shape: `{"Description": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ColumnDescription {
    /// Free-text column description, interpreted as the URL template
    pub description: String,
}

impl ColumnDescription {
    /// Create a description from its text.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }

    /// Extract the description from a field definition response.
    ///
    /// Accepts the flat `nometadata` shape and the verbose OData shape that
    /// wraps the object in `{"d": {...}}`. Extra properties are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the response is not an object or has no string
    /// `Description` property.
    pub fn from_json(value: JsonValue) -> Result<Self> {
        let mut map = match value {
            JsonValue::Object(map) => map,
            other => anyhow::bail!("Field definition is not a JSON object: {other}"),
        };
        if let Some(JsonValue::Object(inner)) = map.remove("d") {
            map = inner;
        }

        map.get("Description")
            .and_then(JsonValue::as_str)
            .map(Self::new)
            .context("Field definition does not contain a string 'Description' property")
    }
}

/// Capability to fetch a column's description.
///
/// The returned future is `'static`: implementations capture owned copies of
/// whatever they need, so callers may store the future before polling it.
/// Calling the method issues the fetch as far as callers are concerned.
pub trait MetadataSource: Send + Sync {
    /// Fetch the description of `field_id` in `list_id`.
    fn column_description(
        &self,
        list_id: &str,
        field_id: &str,
    ) -> BoxFuture<'static, Result<ColumnDescription>>;
}

/// Metadata source backed by a fixed field id to description map.
#[derive(Debug, Clone, Default)]
pub struct StaticMetadataSource {
    descriptions: HashMap<String, String>,
}

impl StaticMetadataSource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the description of a field.
    #[must_use]
    pub fn with_column(mut self, field_id: impl Into<String>, description: impl Into<String>) -> Self {
        self.descriptions.insert(field_id.into(), description.into());
        self
    }

    /// Number of known fields.
    pub fn len(&self) -> usize {
        self.descriptions.len()
    }

    /// Whether no field is known.
    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
    }
}

impl From<HashMap<String, String>> for StaticMetadataSource {
    fn from(descriptions: HashMap<String, String>) -> Self {
        Self {
            descriptions,
        }
    }
}

impl MetadataSource for StaticMetadataSource {
    fn column_description(
        &self,
        list_id: &str,
        field_id: &str,
    ) -> BoxFuture<'static, Result<ColumnDescription>> {
        let result = self
            .descriptions
            .get(field_id)
            .map(ColumnDescription::new)
            .with_context(|| format!("Field '{field_id}' not found in list '{list_id}'"));

        async move { result }.boxed()
    }
}
