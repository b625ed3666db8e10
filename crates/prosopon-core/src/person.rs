//! Person records — the envelope a set of factoids hangs off.
//!
//! A person row carries only the identity the source database assigned
//! (name plus numeric disambiguation code) and a handful of direct fields;
//! everything else about the person arrives as factoids.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::factoid::Factoid;

// ─── Identity key ────────────────────────────────────────────────────────────

/// The (name, numeric code) pair the source database uses to identify a
/// person. `Alexios 1` and `Alexios 2` are distinct people.
#[derive(
  Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PersonKey {
  pub name: String,
  pub code: u32,
}

impl PersonKey {
  pub fn new(name: impl Into<String>, code: u32) -> Self {
    Self { name: name.into(), code }
  }

  /// Whether this key names an anonymous placeholder rather than an
  /// identifiable individual. Anonymous *groups* (`Anonymi`, `Anonymae`)
  /// are excluded from the import entirely; anonymous individuals
  /// (`Anonymus 123`) are kept.
  pub fn is_anonymous_group(&self) -> bool {
    matches!(self.name.as_str(), "Anonymi" | "Anonymae")
  }

  /// Whether this key is a placeholder of any kind, including an anonymous
  /// individual referenced from a kinship factoid.
  pub fn is_placeholder(&self) -> bool {
    self.name.is_empty() || self.name.starts_with("Anonym")
  }
}

impl fmt::Display for PersonKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {}", self.name, self.code)
  }
}

// ─── Person record ───────────────────────────────────────────────────────────

/// One person row from the source database, with its factoids attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonRecord {
  pub key: PersonKey,

  /// Preferred display form, when it differs from `key.name`.
  #[serde(default)]
  pub display_name: Option<String>,

  /// The name in its original language and script.
  #[serde(default)]
  pub name_in_orig_lang: Option<String>,

  /// Raw gender value exactly as the source database spells it.
  #[serde(default)]
  pub gender: String,

  /// Disambiguating description ("emperor", "monk at Chios", ...).
  #[serde(default)]
  pub description: Option<String>,

  /// Active-period tag; used upstream as an inclusion filter and kept for
  /// audit only.
  #[serde(default)]
  pub floruit: Option<String>,

  #[serde(default)]
  pub factoids: Vec<Factoid>,
}

impl PersonRecord {
  /// The name to put on the person's graph node.
  pub fn display(&self) -> &str {
    self.display_name.as_deref().unwrap_or(&self.key.name)
  }
}
