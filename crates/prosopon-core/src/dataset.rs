//! The typed input stream for one import run.
//!
//! Upstream extraction (the relational ORM, spreadsheet parsing, and so on)
//! is out of scope; it hands the importer this serialized shape and nothing
//! else.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::person::PersonRecord;

// ─── Seal records ────────────────────────────────────────────────────────────

/// A modern publication of a boulloterion, pointing into the bibliographic
/// catalog by source key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Publication {
  pub source: String,
  #[serde(default)]
  pub reference: String,
}

/// A seal-die and the inscription it carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoulloterionRecord {
  /// Catalogue number; the identity key for the physical object.
  pub number: u32,
  #[serde(default)]
  pub inscription: String,
  #[serde(default)]
  pub publications: Vec<Publication>,
}

// ─── Import set ──────────────────────────────────────────────────────────────

/// Everything one run consumes: person rows with their factoids, plus the
/// seal records factoids may reference by catalogue number.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportSet {
  #[serde(default)]
  pub persons: Vec<PersonRecord>,

  #[serde(default)]
  pub boulloteria: BTreeMap<u32, BoulloterionRecord>,
}
