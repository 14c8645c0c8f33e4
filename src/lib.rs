//! urllink - column-template URL links for list views
//!
//! A list column stores a URL template in its description, and every row of
//! the column stores a JSON object. urllink renders each row as a link whose
//! address is the template with `{name}` tokens replaced by the row's values
//! and whose text is the row's `Title`:
//!
//! ```text
//! column description: https://docs.contoso.com/view?id={DocID}
//! row value:          {"Title": "Spec", "DocID": "A-17"}
//! rendered:           <div><a target="_blank" href="https://docs.contoso.com/view?id=A-17">Spec</a></div>
//! ```
//!
//! # Architecture Overview
//!
//! - [`cache`] - one template lookup per column, shared by all rows
//! - [`render`] - per-row parsing, substitution and the `Title` gate
//! - [`customizer`] - host entry points (`on_render_cell`, `on_dispose_cell`)
//! - [`metadata`] - where column descriptions come from
//! - [`templating`] - template and payload types, token substitution
//! - [`config`] - customizer properties and `urllink.toml`
//! - [`core`] - column keys and error types
//! - [`cli`] - the `urllink` command
//!
//! Row failures never propagate: a row that cannot be rendered is logged as a
//! warning and left empty, and its siblings render normally.

pub mod cache;
pub mod cli;
pub mod config;
pub mod core;
pub mod customizer;
pub mod metadata;
pub mod render;
pub mod templating;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
