//! The two startup catalogs the import engine consumes: the
//! controlled-vocabulary catalog and the bibliographic/authority catalog.
//!
//! Both are supplied once, as a single JSON document, and are read-only for
//! the duration of a run. Aggregate-source matcher rules are compiled at load
//! time so a malformed regex fails the run before any graph write happens.

pub mod error;
pub mod sources;
pub mod vocab;

use std::path::Path;

use serde::Deserialize;

pub use error::{Error, Result};
pub use sources::{
  AggregateRule, FallbackRef, MatcherRule, Scholar, SourceCatalog, SourceEntry,
};
pub use vocab::VocabCatalog;

// ─── Catalog ─────────────────────────────────────────────────────────────────

/// The serialized shape of the catalog document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogFile {
  #[serde(default)]
  pub vocabulary: VocabCatalog,
  #[serde(default)]
  pub sources: sources::SourceCatalogFile,
}

/// The loaded, matcher-compiled catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
  pub vocabulary: VocabCatalog,
  pub sources:    SourceCatalog,
}

impl Catalog {
  /// Load and compile a catalog from a JSON file.
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
    let raw = std::fs::read_to_string(path)?;
    Self::from_json(&raw)
  }

  /// Load and compile a catalog from a JSON string.
  pub fn from_json(raw: &str) -> Result<Self> {
    let file: CatalogFile = serde_json::from_str(raw)?;
    Self::from_file(file)
  }

  /// Compile a deserialized catalog document.
  pub fn from_file(file: CatalogFile) -> Result<Self> {
    Ok(Self {
      vocabulary: file.vocabulary,
      sources:    SourceCatalog::compile(file.sources)?,
    })
  }
}
