//! Configuration for urllink.
//!
//! Two layers:
//!
//! - [`UrlLinkProperties`] - the customizer's property bag, delivered by the
//!   host as JSON (`{"target": "_self"}`)
//! - [`CustomizerConfig`] - the `urllink.toml` file read by the command-line
//!   front end, describing where column templates come from
//!
//! # File Format
//!
//! ```toml
//! # List whose columns are rendered
//! list_id = "0f6b7c4e-5a2d-4c1b-9e3f-2a7d8c6b5e41"
//!
//! # Anchor target (default "_blank")
//! target = "_self"
//!
//! # Fetch column descriptions from this SharePoint site...
//! site_url = "https://contoso.sharepoint.com/sites/docs"
//!
//! # ...or take them from here, keyed by field id
//! [columns]
//! DocLink = "https://docs.contoso.com/view?id={DocID}"
//! ```
//!
//! When `site_url` is set it wins and `[columns]` is ignored.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

use crate::core::UrlLinkError;
use crate::metadata::{MetadataSource, SharePointMetadataSource, StaticMetadataSource};

/// Configuration file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "urllink.toml";

/// Customizer properties supplied by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlLinkProperties {
    /// Anchor target attribute; `_blank` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl UrlLinkProperties {
    /// Parse the host's JSON property bag. Unknown properties are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not a JSON object with an optional string `target`.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid customizer properties")
    }
}

/// Contents of `urllink.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomizerConfig {
    /// List identifier passed to the metadata source
    #[serde(default)]
    pub list_id: String,

    /// Anchor target attribute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// SharePoint site serving field definitions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,

    /// Static column descriptions keyed by field id
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub columns: HashMap<String, String>,
}

impl CustomizerConfig {
    /// Load from `path`, or from [`DEFAULT_CONFIG_FILE`] when `None`.
    ///
    /// A missing default file yields the default configuration; a missing
    /// explicit file is an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(&path).await,
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::load_from(&path).await
                } else {
                    tracing::debug!("No {DEFAULT_CONFIG_FILE} found, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or does
    /// not match the schema.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content).map_err(|e| {
            UrlLinkError::ConfigParseError {
                file: path.display().to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Customizer properties derived from this file.
    pub fn properties(&self) -> UrlLinkProperties {
        UrlLinkProperties {
            target: self.target.clone(),
        }
    }

    /// Metadata source selected by this file.
    ///
    /// # Errors
    ///
    /// Returns [`UrlLinkError::ConfigError`] if `site_url` is set without a
    /// `list_id`.
    pub fn metadata_source(&self) -> Result<Arc<dyn MetadataSource>, UrlLinkError> {
        match &self.site_url {
            Some(site_url) => {
                if self.list_id.is_empty() {
                    return Err(UrlLinkError::ConfigError {
                        message: "list_id is required when site_url is set".to_string(),
                    });
                }
                tracing::debug!("Reading column descriptions from {site_url}");
                Ok(Arc::new(SharePointMetadataSource::new(site_url.clone())))
            }
            None => {
                tracing::debug!("Using {} configured column descriptions", self.columns.len());
                Ok(Arc::new(StaticMetadataSource::from(self.columns.clone())))
            }
        }
    }
}
