//! The controlled-vocabulary catalog: permitted raw values per category and
//! the gender normalization table.

use std::collections::{BTreeMap, BTreeSet};

use prosopon_core::ontology::VocabCategory;
use serde::Deserialize;

/// Permitted values per controlled category, plus normalization data.
///
/// An empty value list means the category is not validated (the registry
/// admits any label); a non-empty list is the curated vocabulary and labels
/// outside it are rejected as data-quality errors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VocabCatalog {
  #[serde(default)]
  pub genders: Vec<String>,
  #[serde(default)]
  pub ethnicities: Vec<String>,
  #[serde(default)]
  pub religions: Vec<String>,
  #[serde(default)]
  pub languages: Vec<String>,
  #[serde(default)]
  pub dignities: Vec<String>,
  #[serde(default)]
  pub society_roles: Vec<String>,
  #[serde(default)]
  pub kinship_types: Vec<String>,

  /// Society-role labels modeled as legal designations (slave, monastic and
  /// clerical ranks) rather than plain occupations.
  #[serde(default)]
  pub legal_designations: BTreeSet<String>,

  /// Spelling corrections applied before gender lookup, on top of the
  /// built-in defaults.
  #[serde(default)]
  pub gender_aliases: BTreeMap<String, String>,
}

impl VocabCatalog {
  /// The permitted values for a category, or `None` when the category is
  /// not validated.
  pub fn permitted(&self, category: VocabCategory) -> Option<&[String]> {
    let values = match category {
      VocabCategory::Gender => &self.genders,
      VocabCategory::Ethnicity => &self.ethnicities,
      VocabCategory::Religion => &self.religions,
      VocabCategory::Language => &self.languages,
      VocabCategory::Dignity => &self.dignities,
      VocabCategory::SocietyRole => &self.society_roles,
      VocabCategory::KinshipType => &self.kinship_types,
    };
    if values.is_empty() { None } else { Some(values) }
  }

  pub fn is_legal_designation(&self, label: &str) -> bool {
    self.legal_designations.contains(label)
  }

  /// Normalize a raw gender value to its canonical label, or `None` when
  /// the value carries no assertable information ("Mixed", "Unknown",
  /// empty). Unknown gender is represented by the *absence* of an
  /// assertion, never by an "unknown" value node.
  pub fn normalize_gender(&self, raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
      return None;
    }
    let corrected = self
      .gender_aliases
      .get(trimmed)
      .map(String::as_str)
      .unwrap_or(match trimmed {
        // The source database's long-standing misspelling.
        "Eunach" => "Eunuch",
        other => other,
      });
    match corrected {
      "Mixed" | "Unknown" => None,
      other => Some(other.to_string()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn gender_misspelling_is_corrected() {
    let vocab = VocabCatalog::default();
    assert_eq!(vocab.normalize_gender("Eunach").as_deref(), Some("Eunuch"));
    assert_eq!(vocab.normalize_gender("Female").as_deref(), Some("Female"));
  }

  #[test]
  fn mixed_and_unknown_normalize_to_absence() {
    let vocab = VocabCatalog::default();
    assert_eq!(vocab.normalize_gender("Mixed"), None);
    assert_eq!(vocab.normalize_gender("Unknown"), None);
    assert_eq!(vocab.normalize_gender(""), None);
    assert_eq!(vocab.normalize_gender("   "), None);
  }

  #[test]
  fn catalog_aliases_override_raw_values() {
    let mut vocab = VocabCatalog::default();
    vocab
      .gender_aliases
      .insert("Femal".into(), "Female".into());
    assert_eq!(vocab.normalize_gender("Femal").as_deref(), Some("Female"));
  }

  #[test]
  fn empty_value_list_is_unvalidated() {
    let vocab = VocabCatalog::default();
    assert!(vocab.permitted(VocabCategory::Ethnicity).is_none());
  }
}
