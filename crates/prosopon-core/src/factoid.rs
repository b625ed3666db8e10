//! Factoid records — one atomic claim about a person, extracted from one
//! source passage.
//!
//! The payload enum is closed: the source database defines a fixed set of
//! factoid categories, and the variant name doubles as the discriminant used
//! in the serialized fact stream. Kinds the target ontology does not model
//! yet still deserialize; the run driver skips them explicitly.

use serde::{Deserialize, Serialize};
use strum::EnumIter;

use crate::{error::Result, person::PersonKey};

// ─── Kind tags ───────────────────────────────────────────────────────────────

/// The closed set of factoid categories.
///
/// The declaration order here is the order the run driver processes each
/// person's factoids in, so runs are reproducible.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FactoidKind {
  SecondName,
  AlternativeName,
  Death,
  Dignity,
  Ethnicity,
  Kinship,
  LanguageSkill,
  Occupation,
  Possession,
  Religion,
  Authorship,
  Description,
  Education,
  Eunuchs,
  Location,
  Narrative,
  UncertainIdent,
  AlternativeIdent,
}

impl FactoidKind {
  /// The discriminant string used in the serialized fact stream.
  /// Must match the `rename_all = "snake_case"` serde tags below.
  pub fn discriminant(self) -> &'static str {
    match self {
      Self::SecondName => "second_name",
      Self::AlternativeName => "alternative_name",
      Self::Death => "death",
      Self::Dignity => "dignity",
      Self::Ethnicity => "ethnicity",
      Self::Kinship => "kinship",
      Self::LanguageSkill => "language_skill",
      Self::Occupation => "occupation",
      Self::Possession => "possession",
      Self::Religion => "religion",
      Self::Authorship => "authorship",
      Self::Description => "description",
      Self::Education => "education",
      Self::Eunuchs => "eunuchs",
      Self::Location => "location",
      Self::Narrative => "narrative",
      Self::UncertainIdent => "uncertain_ident",
      Self::AlternativeIdent => "alternative_ident",
    }
  }
}

// ─── Typed payloads ──────────────────────────────────────────────────────────

/// Death sub-record. The date is a free-text string from the source
/// database; it is asserted verbatim as a time-span description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathRecord {
  #[serde(default)]
  pub date: String,
  #[serde(default)]
  pub note: Option<String>,
}

/// The typed payload of a factoid. The variant name serves as the kind
/// discriminant in the serialized stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum FactoidValue {
  // ── Modeled in the target ontology ──────────────────────────────────────
  SecondName { text: String },
  AlternativeName { text: String },
  /// A death factoid may arrive without its sub-record; the handler skips
  /// those with a warning.
  Death(Option<DeathRecord>),
  Dignity { label: String },
  Ethnicity { label: String },
  Kinship { relation: String, kin: Vec<PersonKey> },
  LanguageSkill { language: String },
  Occupation { label: String },
  Possession { description: String },
  Religion { label: String },

  // ── Not yet modeled; carried for completeness ───────────────────────────
  Authorship { text: String },
  Description { text: String },
  Education { text: String },
  Eunuchs { text: String },
  Location { text: String },
  Narrative { text: String },
  UncertainIdent { text: String },
  AlternativeIdent { text: String },
}

impl FactoidValue {
  pub fn kind(&self) -> FactoidKind {
    match self {
      Self::SecondName { .. } => FactoidKind::SecondName,
      Self::AlternativeName { .. } => FactoidKind::AlternativeName,
      Self::Death(_) => FactoidKind::Death,
      Self::Dignity { .. } => FactoidKind::Dignity,
      Self::Ethnicity { .. } => FactoidKind::Ethnicity,
      Self::Kinship { .. } => FactoidKind::Kinship,
      Self::LanguageSkill { .. } => FactoidKind::LanguageSkill,
      Self::Occupation { .. } => FactoidKind::Occupation,
      Self::Possession { .. } => FactoidKind::Possession,
      Self::Religion { .. } => FactoidKind::Religion,
      Self::Authorship { .. } => FactoidKind::Authorship,
      Self::Description { .. } => FactoidKind::Description,
      Self::Education { .. } => FactoidKind::Education,
      Self::Eunuchs { .. } => FactoidKind::Eunuchs,
      Self::Location { .. } => FactoidKind::Location,
      Self::Narrative { .. } => FactoidKind::Narrative,
      Self::UncertainIdent { .. } => FactoidKind::UncertainIdent,
      Self::AlternativeIdent { .. } => FactoidKind::AlternativeIdent,
    }
  }

  /// Deserialise from the discriminant string and JSON payload.
  pub fn from_parts(discriminant: &str, data: serde_json::Value) -> Result<Self> {
    let wrapped = serde_json::json!({ "kind": discriminant, "data": data });
    Ok(serde_json::from_value(wrapped)?)
  }
}

// ─── Factoid ─────────────────────────────────────────────────────────────────

/// One claim about a person. Immutable input; the importer never writes
/// factoids back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Factoid {
  /// Row id in the source database; recorded on every assertion this
  /// factoid produces, so audit sweeps can attribute graph records to
  /// their origin.
  pub id: u64,

  /// The named source the claim derives from (a text key, or the seal
  /// corpus when `boulloterion` is set).
  #[serde(default)]
  pub source: String,

  /// Page/locus reference within the source.
  #[serde(default)]
  pub source_ref: String,

  /// The passage in its original language, when the source database
  /// preserves it.
  #[serde(default)]
  pub original_text: Option<String>,

  /// Catalogue number of the seal-die this factoid was read from, for
  /// seal-derived claims.
  #[serde(default)]
  pub boulloterion: Option<u32>,

  /// Set when the source database marks the reading as doubtful; carried
  /// onto the resulting assertions.
  #[serde(default)]
  pub uncertain: bool,

  pub value: FactoidValue,
}

impl Factoid {
  pub fn kind(&self) -> FactoidKind {
    self.value.kind()
  }

  /// Log tag locating this factoid in the source database.
  pub fn origin(&self) -> String {
    format!("factoid:{}", self.id)
  }
}
