//! Error taxonomy for the import engine.
//!
//! [`Error`] is for programmer-error-class failures only: they propagate and
//! abort the run. Data-quality problems in the source rows are not errors —
//! they are [`SkipReason`]s, logged with enough context to locate the
//! offending row, after which the run continues.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("graph store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("catalog error: {0}")]
  Catalog(#[from] prosopon_catalog::Error),

  /// An assertion was requested with neither end resolvable to a real or
  /// creatable node. This is a caller bug, not a data problem.
  #[error("{origin}: neither subject nor object of an assertion is resolvable")]
  UnanchoredAssertion { origin: String },

  #[error("invalid name-extraction pattern: {0}")]
  NamePattern(#[from] regex::Error),
}

impl Error {
  pub(crate) fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Skip reasons ────────────────────────────────────────────────────────────

/// Why a fact was not turned into assertions. Every variant except
/// `NotModeled` is logged as a data-quality warning; `NotModeled` is the
/// deliberate outcome for factoid kinds the target ontology does not cover
/// yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
  /// The payload is empty or the required sub-record is missing.
  MissingPayload,
  /// A kinship factoid relating a person to themself.
  SelfKinship,
  /// Every referent of a kinship factoid is an anonymous placeholder.
  AnonymousReferent,
  /// Name extraction produced something too long to be a name.
  UnparseableName,
  /// A boulloterion with neither a publication nor a registered fallback.
  NoPublications,
  /// The fact's source is absent from the bibliographic catalog.
  UncataloguedSource,
  /// A label outside the category's curated value list.
  UnknownVocabValue,
  /// No handler is registered for this factoid kind.
  NotModeled,
}

impl SkipReason {
  /// Stable counter key for the run report.
  pub fn label(&self) -> &'static str {
    match self {
      Self::MissingPayload => "missing-payload",
      Self::SelfKinship => "self-kinship",
      Self::AnonymousReferent => "anonymous-referent",
      Self::UnparseableName => "unparseable-name",
      Self::NoPublications => "no-publications",
      Self::UncataloguedSource => "uncatalogued-source",
      Self::UnknownVocabValue => "unknown-vocabulary-value",
      Self::NotModeled => "not-modeled",
    }
  }
}

impl fmt::Display for SkipReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}
