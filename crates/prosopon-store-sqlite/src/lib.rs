//! SQLite backend for the Prosopon graph store.
//!
//! Implements [`prosopon_core::graph::GraphSession`] over three tables
//! (nodes, node properties, edges) and wraps [`tokio_rusqlite`] so all
//! database access runs on a dedicated thread without blocking the async
//! runtime.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteGraph;
