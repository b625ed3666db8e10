//! The Controlled-Vocabulary Registry.
//!
//! Value nodes for closed categories (genders, religions, dignities, ...) are
//! created lazily on first use and memoized for the rest of the run. One node
//! exists per distinct (category, label) pair; dignity labels are normalized
//! before lookup, and the unnormalized spelling is cached against the same
//! node so repeated lookups with the qualifier succeed without re-truncation.

use prosopon_core::{
  graph::{GraphPattern, GraphSession, NodeId, NodeSpec},
  ontology::{EntityClass, Predicate, VocabCategory},
};
use tracing::warn;

use crate::{context::ImportContext, error::Result};

/// Truncate a dignity label at the first " of " qualifier.
///
/// Labels like "strategos of the Anatolikoi" are stored unsplit; "krites of
/// Thrace" is stored as "krites".
fn normalize_dignity(raw: &str) -> &str {
  if raw.contains(" of the ") {
    return raw;
  }
  match raw.find(" of ") {
    Some(at) => &raw[..at],
    None => raw,
  }
}

impl<S: GraphSession> ImportContext<S> {
  /// Resolve (or create) the value node for `(category, label)`, optionally
  /// linked by a broader-term edge to a supertype node of the same class.
  ///
  /// Returns `None` — after logging — when the label is empty or falls
  /// outside the category's curated value list; the caller skips the fact.
  pub async fn resolve_vocab(
    &mut self,
    category: VocabCategory,
    label: &str,
    broader: Option<&str>,
  ) -> Result<Option<NodeId>> {
    let raw = label.trim();
    if raw.is_empty() {
      return Ok(None);
    }

    if let Some(id) = self.vocab_cache.get(&(category, raw.to_string())) {
      return Ok(Some(*id));
    }

    let lookup = match category {
      VocabCategory::Dignity => normalize_dignity(raw),
      _ => raw,
    };

    if let Some(permitted) = self.catalog().vocabulary.permitted(category) {
      if !permitted.iter().any(|v| v == lookup) {
        warn!(
          category = category.name(),
          label = lookup,
          "value outside the curated vocabulary; fact will be skipped"
        );
        return Ok(None);
      }
    }

    // The normalized spelling may already be resolved; alias the raw one.
    if let Some(id) = self.vocab_cache.get(&(category, lookup.to_string())).copied() {
      self.vocab_cache.insert((category, raw.to_string()), id);
      return Ok(Some(id));
    }

    let class = self.value_class(category, lookup);

    let broader_node = match broader {
      Some(term) => Some(self.resolve_supertype(category, class, term).await?),
      None => None,
    };

    let mut pattern = GraphPattern::new();
    let broader_slot = broader_node.map(|id| pattern.bound(id));
    let value_slot = pattern.spec(NodeSpec::new(class).with("value", lookup));
    if let Some(broader_slot) = broader_slot {
      pattern.edge(Predicate::HasBroaderTerm, value_slot, broader_slot);
    }

    let (binding, created) = self.find_or_create(&pattern).await?;
    let node = binding.node(value_slot);
    if created {
      tracing::debug!(category = category.name(), label = lookup, %node, "created vocabulary value");
    }

    self.vocab_cache.insert((category, lookup.to_string()), node);
    if lookup != raw {
      self.vocab_cache.insert((category, raw.to_string()), node);
    }
    Ok(Some(node))
  }

  /// The node class for a value, honouring the legal-designation reroute:
  /// slave, monastic and clerical ranks arrive as society roles but are
  /// modeled as legal statuses, not occupations.
  pub(crate) fn value_class(&self, category: VocabCategory, label: &str) -> EntityClass {
    if category == VocabCategory::SocietyRole
      && self.catalog().vocabulary.is_legal_designation(label)
    {
      EntityClass::SocialQuality
    } else {
      category.target_class()
    }
  }

  /// Find or create a category supertype node. Supertypes are structural —
  /// they are not validated against the catalog's value lists.
  async fn resolve_supertype(
    &mut self,
    category: VocabCategory,
    class: EntityClass,
    term: &str,
  ) -> Result<NodeId> {
    if let Some(id) = self.vocab_cache.get(&(category, term.to_string())) {
      return Ok(*id);
    }
    let mut pattern = GraphPattern::new();
    let slot = pattern.spec(NodeSpec::new(class).with("value", term));
    let (binding, _) = self.find_or_create(&pattern).await?;
    let node = binding.node(slot);
    self.vocab_cache.insert((category, term.to_string()), node);
    Ok(node)
  }
}

#[cfg(test)]
mod tests {
  use super::normalize_dignity;

  #[test]
  fn plain_labels_pass_through() {
    assert_eq!(normalize_dignity("protospatharios"), "protospatharios");
  }

  #[test]
  fn of_qualifier_is_truncated() {
    assert_eq!(normalize_dignity("krites of Thrace"), "krites");
  }

  #[test]
  fn of_the_is_exempt() {
    assert_eq!(
      normalize_dignity("strategos of the Anatolikoi"),
      "strategos of the Anatolikoi"
    );
  }

  #[test]
  fn truncation_happens_at_first_occurrence() {
    assert_eq!(normalize_dignity("doux of Antioch of Syria"), "doux");
  }
}
