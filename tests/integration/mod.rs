//! Integration test suite for urllink
//!
//! End-to-end tests that drive the library through its public API and the
//! `urllink` binary.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **cache_behavior**: one template fetch per column across many rows
//! - **rendering**: substitution, display gate and failure isolation
//! - **cli**: the `render` and `substitute` commands

mod cache_behavior;
mod cli;
mod rendering;
