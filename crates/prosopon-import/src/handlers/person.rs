//! Direct person-record operations: gender, the source-database identifier,
//! and the disambiguating description.
//!
//! These do not arrive as factoids — they sit on the person row itself — so
//! they run once per person, with the implicit default authority and no
//! source.

use prosopon_core::{
  graph::{GraphPattern, GraphSession, NodeId, NodeSpec},
  ontology::{EntityClass, Predicate, VocabCategory},
  person::PersonRecord,
};

use crate::{
  assertion::{AssertionInput, NodeRef, PredicateRef},
  context::ImportContext,
  error::Result,
};

impl<S: GraphSession> ImportContext<S> {
  /// Resolve the person node for a record, attaching display properties on
  /// first creation.
  pub async fn resolve_person_record(&mut self, person: &PersonRecord) -> Result<NodeId> {
    let agent = self.agents().pbw;
    let mut extra: Vec<(&str, &str)> = Vec::new();
    if let Some(orig) = person.name_in_orig_lang.as_deref() {
      extra.push(("name_in_orig_lang", orig));
    }
    self
      .resolve_identified_entity_with(
        EntityClass::Person,
        agent,
        &person.key.to_string(),
        person.display(),
        &extra,
      )
      .await
  }
}

/// Record the person-row claims. Returns the number of newly created
/// assertions.
pub async fn record_direct<S: GraphSession>(
  ctx: &mut ImportContext<S>,
  person: &PersonRecord,
  person_node: NodeId,
) -> Result<usize> {
  let authority = ctx.agents().generic;
  let origin = format!("person:{}", person.key);
  let mut created = 0;

  // ── Gender ──────────────────────────────────────────────────────────────
  // Normalization may conclude the value carries no information ("Mixed",
  // "Unknown"); unknown gender is the absence of an assertion, not an
  // "unknown" value node.
  if let Some(label) = ctx.catalog().vocabulary.normalize_gender(&person.gender) {
    if let Some(gender) = ctx.resolve_vocab(VocabCategory::Gender, &label, None).await? {
      // Two coupled assertions share one type-assignment node: the
      // assignment classified the person, and it assigned the gender.
      let classified = ctx
        .assert_fact(AssertionInput::new(
          origin.clone(),
          NodeRef::New(NodeSpec::new(EntityClass::TypeAssignment)),
          PredicateRef::Fixed(Predicate::Classified),
          NodeRef::Existing(person_node),
          authority,
        ))
        .await?;
      if classified.created {
        created += 1;
      }

      let assigned = ctx
        .assert_fact(AssertionInput::new(
          origin.clone(),
          NodeRef::Existing(classified.subject),
          PredicateRef::Fixed(Predicate::AssignedType),
          NodeRef::Existing(gender),
          authority,
        ))
        .await?;
      if assigned.created {
        created += 1;
      }
    }
  }

  // ── Identifier ──────────────────────────────────────────────────────────
  // The identifier-assignment chain already exists (the person node was
  // resolved through it); the STAR layer additionally asserts the
  // identification so its provenance is queryable.
  let identifier_node = {
    let mut pattern = GraphPattern::new();
    let slot = pattern.spec(
      NodeSpec::new(EntityClass::Identifier).with("value", person.key.to_string()),
    );
    let (binding, _) = ctx.find_or_create(&pattern).await?;
    binding.node(slot)
  };
  let identified = ctx
    .assert_fact(AssertionInput::new(
      origin.clone(),
      NodeRef::Existing(person_node),
      PredicateRef::Fixed(Predicate::IsIdentifiedBy),
      NodeRef::Existing(identifier_node),
      authority,
    ))
    .await?;
  if identified.created {
    created += 1;
  }

  // ── Disambiguating description ──────────────────────────────────────────
  if let Some(description) = person.description.as_deref().filter(|d| !d.trim().is_empty()) {
    let described = ctx
      .assert_fact(AssertionInput::new(
        origin,
        NodeRef::Existing(person_node),
        PredicateRef::Fixed(Predicate::IsIdentifiedBy),
        NodeRef::New(
          NodeSpec::new(EntityClass::Appellation).with("value", description.trim()),
        ),
        authority,
      ))
      .await?;
    if described.created {
      created += 1;
    }
  }

  Ok(created)
}
