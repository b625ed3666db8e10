//! The bibliographic/authority catalog: per-source editorial metadata,
//! aggregate-source disambiguation rules, and seal fallback references.

use std::collections::BTreeMap;

use prosopon_core::person::PersonKey;
use regex::Regex;
use serde::Deserialize;

use crate::error::{Error, Result};

// ─── Scholars ────────────────────────────────────────────────────────────────

/// A modern scholar, identified by VIAF so the same person resolves to the
/// same graph node across catalog entries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Scholar {
  pub name: String,
  pub viaf: String,
}

// ─── Source entries ──────────────────────────────────────────────────────────

/// Editorial metadata for one source key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceEntry {
  /// The contemporary (medieval) author, identified by the source
  /// database's own person key.
  #[serde(default)]
  pub author: Option<PersonKey>,

  /// The modern editor(s) of the edition used.
  #[serde(default)]
  pub editors: Vec<Scholar>,

  /// Canonical title of the abstract work.
  #[serde(default)]
  pub work: String,

  /// Canonical citation of the edition (the expression key).
  #[serde(default)]
  pub expression: String,

  /// Scholars who ingested this source into the database; they share
  /// authority for its assertions.
  #[serde(default)]
  pub analysts: Vec<Scholar>,
}

// ─── Aggregate-source matchers ───────────────────────────────────────────────

/// How a reference string is recognised as belonging to a sub-work.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MatcherRule {
  /// Literal prefix of the reference string.
  Prefix(String),
  /// Regular expression; the first match is the stripped literal.
  Regex(String),
}

/// One sub-work of an aggregate source, in table order.
#[derive(Debug, Clone, Deserialize)]
pub struct AggregateRuleFile {
  /// The disambiguated source key facts resolve to.
  pub key:  String,
  pub rule: MatcherRule,
}

/// A compiled sub-work rule.
#[derive(Debug, Clone)]
pub struct AggregateRule {
  pub key:     String,
  pub matcher: CompiledMatcher,
}

#[derive(Debug, Clone)]
pub enum CompiledMatcher {
  Prefix(String),
  Regex(Regex),
}

impl AggregateRule {
  /// If the reference matches, return it with the matched literal stripped.
  fn strip(&self, reference: &str) -> Option<String> {
    match &self.matcher {
      CompiledMatcher::Prefix(prefix) => reference
        .strip_prefix(prefix.as_str())
        .map(|rest| rest.trim_start_matches([' ', ',', '.', ':']).to_string()),
      CompiledMatcher::Regex(re) => re.find(reference).map(|m| {
        let mut rest = String::with_capacity(reference.len() - m.as_str().len());
        rest.push_str(&reference[..m.start()]);
        rest.push_str(&reference[m.end()..]);
        rest.trim_matches([' ', ',', '.', ':']).to_string()
      }),
    }
  }
}

// ─── Seal fallbacks ──────────────────────────────────────────────────────────

/// An explicitly registered bibliographic reference for a boulloterion whose
/// seal record lists no publication.
#[derive(Debug, Clone, Deserialize)]
pub struct FallbackRef {
  pub source: String,
  #[serde(default)]
  pub reference: String,
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

/// Serialized shape of the source catalog.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceCatalogFile {
  #[serde(default)]
  pub entries: BTreeMap<String, SourceEntry>,

  /// Aggregate source key → ordered sub-work rules.
  #[serde(default)]
  pub aggregates: BTreeMap<String, Vec<AggregateRuleFile>>,

  /// Boulloterion catalogue number → fallback reference.
  #[serde(default)]
  pub boulloterion_fallbacks: BTreeMap<u32, FallbackRef>,
}

/// The compiled source catalog.
#[derive(Debug, Clone, Default)]
pub struct SourceCatalog {
  pub entries: BTreeMap<String, SourceEntry>,
  pub aggregates: BTreeMap<String, Vec<AggregateRule>>,
  pub boulloterion_fallbacks: BTreeMap<u32, FallbackRef>,
}

impl SourceCatalog {
  /// Compile all matcher rules, failing eagerly on a malformed regex.
  pub fn compile(file: SourceCatalogFile) -> Result<Self> {
    let mut aggregates = BTreeMap::new();
    for (source, rules) in file.aggregates {
      let mut compiled = Vec::with_capacity(rules.len());
      for rule in rules {
        let matcher = match rule.rule {
          MatcherRule::Prefix(p) => CompiledMatcher::Prefix(p),
          MatcherRule::Regex(r) => {
            CompiledMatcher::Regex(Regex::new(&r).map_err(|err| Error::Matcher {
              aggregate: source.clone(),
              key:    rule.key.clone(),
              err,
            })?)
          }
        };
        compiled.push(AggregateRule { key: rule.key, matcher });
      }
      aggregates.insert(source, compiled);
    }
    Ok(Self {
      entries: file.entries,
      aggregates,
      boulloterion_fallbacks: file.boulloterion_fallbacks,
    })
  }

  pub fn entry(&self, key: &str) -> Option<&SourceEntry> {
    self.entries.get(key)
  }

  /// Resolve an aggregate source against a reference string.
  ///
  /// First rule to match (in table order) wins and its matched literal is
  /// stripped from the reference; an unmatched reference, or a source with
  /// no aggregate table, falls back to the unqualified top-level key.
  pub fn disambiguate(&self, source: &str, reference: &str) -> (String, String) {
    if let Some(rules) = self.aggregates.get(source) {
      for rule in rules {
        if let Some(stripped) = rule.strip(reference) {
          return (rule.key.clone(), stripped);
        }
      }
    }
    (source.to_string(), reference.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn aggregate_catalog() -> SourceCatalog {
    let file: SourceCatalogFile = serde_json::from_str(
      r#"{
        "entries": {},
        "aggregates": {
          "Eustathios Romaios": [
            { "key": "Eustathios Romaios Peira",
              "rule": { "kind": "prefix", "value": "Peira" } },
            { "key": "Eustathios Romaios Schminck",
              "rule": { "kind": "regex", "value": "^Schminck( [IVX]+)?" } }
          ]
        }
      }"#,
    )
    .unwrap();
    SourceCatalog::compile(file).unwrap()
  }

  #[test]
  fn prefix_rule_wins_and_strips() {
    let catalog = aggregate_catalog();
    let (key, reference) = catalog.disambiguate("Eustathios Romaios", "Peira 14.22");
    assert_eq!(key, "Eustathios Romaios Peira");
    assert_eq!(reference, "14.22");
  }

  #[test]
  fn regex_rule_matches_and_strips() {
    let catalog = aggregate_catalog();
    let (key, reference) =
      catalog.disambiguate("Eustathios Romaios", "Schminck II 12");
    assert_eq!(key, "Eustathios Romaios Schminck");
    assert_eq!(reference, "12");
  }

  #[test]
  fn unmatched_reference_falls_back_to_top_level() {
    let catalog = aggregate_catalog();
    let (key, reference) = catalog.disambiguate("Eustathios Romaios", "fol. 3r");
    assert_eq!(key, "Eustathios Romaios");
    assert_eq!(reference, "fol. 3r");
  }

  #[test]
  fn non_aggregate_source_passes_through() {
    let catalog = aggregate_catalog();
    let (key, reference) = catalog.disambiguate("Anna Komnene", "XV.11");
    assert_eq!(key, "Anna Komnene");
    assert_eq!(reference, "XV.11");
  }

  #[test]
  fn first_match_wins_in_table_order() {
    let file: SourceCatalogFile = serde_json::from_str(
      r#"{
        "aggregates": {
          "Compound": [
            { "key": "Compound A", "rule": { "kind": "prefix", "value": "Part" } },
            { "key": "Compound B", "rule": { "kind": "prefix", "value": "Part II" } }
          ]
        }
      }"#,
    )
    .unwrap();
    let catalog = SourceCatalog::compile(file).unwrap();
    // Even though "Part II" also matches, the earlier rule takes it.
    let (key, _) = catalog.disambiguate("Compound", "Part II 5");
    assert_eq!(key, "Compound A");
  }

  #[test]
  fn malformed_regex_fails_at_compile() {
    let file: SourceCatalogFile = serde_json::from_str(
      r#"{
        "aggregates": {
          "Bad": [ { "key": "Bad A", "rule": { "kind": "regex", "value": "(" } } ]
        }
      }"#,
    )
    .unwrap();
    assert!(matches!(
      SourceCatalog::compile(file),
      Err(Error::Matcher { .. })
    ));
  }
}
