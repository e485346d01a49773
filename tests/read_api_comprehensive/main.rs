//! Read API Comprehensive Test Suite
//!
//! End-to-end coverage of the exposed read surface: datasources, entity
//! resolution, history traversal, cursors, queries, the deprecated method
//! family, wire helpers and configuration files.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test read_api_comprehensive
//! cargo test --test read_api_comprehensive history::
//! RUST_LOG=vellum=trace cargo test --test read_api_comprehensive -- --nocapture
//! ```

#[path = "../common/mod.rs"]
mod common;

mod config_file;
mod cursors;
mod entity;
mod history;
mod legacy;
mod query;
mod wire;
