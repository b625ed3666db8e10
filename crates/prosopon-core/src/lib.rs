//! Core types and trait definitions for the Prosopon graph importer.
//!
//! This crate is deliberately free of database and I/O dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod dataset;
pub mod error;
pub mod factoid;
pub mod graph;
pub mod ontology;
pub mod person;

pub use error::{Error, Result};
