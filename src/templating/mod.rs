//! Column URL templates and per-row payload substitution.
//!
//! A column's description holds a URL template with `{name}` tokens. Each row
//! carries a JSON object whose keys fill those tokens:
//!
//! ```text
//! template: https://docs.contoso.com/view?id={DocID}&rev={Rev}
//! payload:  {"Title": "Open", "DocID": "A-17", "Rev": 3}
//! result:   https://docs.contoso.com/view?id=A-17&rev=3
//! ```
//!
//! # Substitution Rules
//!
//! - A token is `{` + name + `}` where the name contains no braces. `{{a}}`
//!   therefore contains the token `{a}` surrounded by literal braces.
//! - Every occurrence of a token is replaced, in a single left-to-right pass.
//!   Substituted values are never rescanned, so a value containing `{b}` does
//!   not pick up the `b` key and the outcome does not depend on key order.
//! - Tokens without a matching payload key are left as they are.
//! - Strings are inserted verbatim, numbers and booleans in their JSON text
//!   form, `null` as `null`. Arrays and objects are rejected with
//!   [`RenderError::Substitution`] when a token refers to them.
//!
//! # Examples
//!
//! ```rust
//! use urllink::templating::{RowPayload, Template};
//!
//! let template = Template::new("http://x/{a}/{b}/{a}");
//! let payload = RowPayload::parse(r#"{"a": "1", "b": 2}"#).unwrap();
//! assert_eq!(template.substitute(&payload).unwrap(), "http://x/1/2/1");
//! ```

use regex::Regex;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;
use std::sync::{Arc, LazyLock};

use crate::core::RenderError;

/// Payload key holding the link text.
pub const TITLE_FIELD: &str = "Title";

static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]*)\}").expect("token pattern is a valid regex"));

/// A column's URL template.
///
/// Immutable once fetched; cloning shares the underlying string, so every row
/// of a column holds the same allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template(Arc<str>);

impl Template {
    /// Wrap a template string.
    pub fn new(template: impl Into<Arc<str>>) -> Self {
        Self(template.into())
    }

    /// The raw template text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Names of all tokens in order of appearance, duplicates included.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        TOKEN_PATTERN
            .captures_iter(&self.0)
            .filter_map(|caps| caps.get(1).map(|name| name.as_str()))
    }

    /// Replace every token that has a payload key with the key's textual value.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Substitution`] if a referenced key holds an
    /// array or object.
    pub fn substitute(&self, payload: &RowPayload) -> Result<String, RenderError> {
        let template = self.as_str();
        let mut rendered = String::with_capacity(template.len());
        let mut last = 0;

        for caps in TOKEN_PATTERN.captures_iter(template) {
            let (Some(token), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let Some(value) = payload.get(name.as_str()) else {
                continue;
            };

            rendered.push_str(&template[last..token.start()]);
            rendered.push_str(&scalar_text(name.as_str(), value)?);
            last = token.end();
        }

        rendered.push_str(&template[last..]);
        Ok(rendered)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Template {
    fn from(template: &str) -> Self {
        Self::new(template)
    }
}

impl From<String> for Template {
    fn from(template: String) -> Self {
        Self::new(template)
    }
}

/// A row's parsed field value: a JSON object of substitution values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowPayload(Map<String, Value>);

impl RowPayload {
    /// Parse a row's raw field value.
    ///
    /// # Errors
    ///
    /// - [`RenderError::PayloadParse`] if `raw` is not valid JSON
    /// - [`RenderError::Substitution`] if it is valid JSON but not an object
    pub fn parse(raw: &str) -> Result<Self, RenderError> {
        let value: Value = serde_json::from_str(raw).map_err(|e| RenderError::PayloadParse {
            reason: e.to_string(),
        })?;

        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(RenderError::Substitution {
                reason: format!("expected a JSON object, found {}", json_kind(&other)),
            }),
        }
    }

    /// Raw JSON value for `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Payload keys in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Link text from the `Title` key.
    ///
    /// `None` when the key is absent or `null`; empty strings are a valid title.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Substitution`] if `Title` is an array or object.
    pub fn title(&self) -> Result<Option<String>, RenderError> {
        match self.get(TITLE_FIELD) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => scalar_text(TITLE_FIELD, value).map(|text| Some(text.into_owned())),
        }
    }
}

impl From<Map<String, Value>> for RowPayload {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn scalar_text<'a>(key: &str, value: &'a Value) -> Result<Cow<'a, str>, RenderError> {
    match value {
        Value::String(s) => Ok(Cow::Borrowed(s)),
        Value::Number(n) => Ok(Cow::Owned(n.to_string())),
        Value::Bool(b) => Ok(Cow::Owned(b.to_string())),
        Value::Null => Ok(Cow::Borrowed("null")),
        Value::Array(_) | Value::Object(_) => Err(RenderError::Substitution {
            reason: format!("value of '{key}' is {}, expected a scalar", json_kind(value)),
        }),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
