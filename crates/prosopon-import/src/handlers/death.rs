//! Death factoids.
//!
//! A person dies once: all sources describing the death share a single death
//! event node, found through any existing "was death of" assertion before a
//! new event is created. The date string, when present, is asserted as a
//! time-span of the event; the descriptive note rides on the "died"
//! assertion itself.

use prosopon_core::{
  factoid::FactoidValue,
  graph::{GraphPattern, GraphSession, NodeId, NodeSpec},
  ontology::{EntityClass, Predicate},
};
use tracing::warn;

use crate::{
  assertion::{AssertionInput, NodeRef, PredicateRef},
  context::ImportContext,
  error::{Result, SkipReason},
  handlers::{FactScope, Handled},
};

pub async fn handle<S: GraphSession>(
  ctx: &mut ImportContext<S>,
  scope: &FactScope<'_>,
) -> Result<Handled> {
  let FactoidValue::Death(record) = &scope.factoid.value else {
    return Ok(Handled::Skipped(SkipReason::MissingPayload));
  };
  let Some(record) = record else {
    warn!(
      person = %scope.person.key,
      factoid = scope.factoid.id,
      "death factoid lacks its sub-record; skipped"
    );
    return Ok(Handled::Skipped(SkipReason::MissingPayload));
  };

  let mut created = 0;

  // At most one death event per person, regardless of how many sources
  // describe it.
  let existing_event = find_death_event(ctx, scope.person_node).await?;
  let subject = match existing_event {
    Some(event) => NodeRef::Existing(event),
    None => NodeRef::New(NodeSpec::new(EntityClass::Death)),
  };

  let note = record
    .note
    .as_deref()
    .or(scope.factoid.original_text.as_deref());

  let mut died = AssertionInput::new(
    scope.factoid.origin(),
    subject,
    PredicateRef::Fixed(Predicate::WasDeathOf),
    NodeRef::Existing(scope.person_node),
    scope.authority,
  )
  .with_source(scope.source)
  .with_uncertain(scope.factoid.uncertain);
  if let Some(note) = note {
    died = died.with_note(note);
  }
  let died = ctx.assert_fact(died).await?;
  if died.created {
    created += 1;
  }

  // The time-span is asserted only when the source actually dates the
  // death.
  let date = record.date.trim();
  if !date.is_empty() {
    let dated = ctx
      .assert_fact(
        AssertionInput::new(
          scope.factoid.origin(),
          NodeRef::Existing(died.subject),
          PredicateRef::Fixed(Predicate::HasTimeSpan),
          NodeRef::New(NodeSpec::new(EntityClass::TimeSpan).with("value", date)),
          scope.authority,
        )
        .with_source(scope.source)
        .with_uncertain(scope.factoid.uncertain),
      )
      .await?;
    if dated.created {
      created += 1;
    }
  }

  Ok(Handled::Recorded { assertions: created })
}

/// Locate a person's death event through any existing "was death of"
/// assertion, whatever its authority or source.
async fn find_death_event<S: GraphSession>(
  ctx: &ImportContext<S>,
  person: NodeId,
) -> Result<Option<NodeId>> {
  let mut pattern = GraphPattern::new();
  let person_slot = pattern.bound(person);
  let assertion_slot = pattern.spec(
    NodeSpec::new(EntityClass::Assertion)
      .with("predicate", Predicate::WasDeathOf.code()),
  );
  let event_slot = pattern.spec(NodeSpec::new(EntityClass::Death));
  pattern.edge(Predicate::Assigned, assertion_slot, person_slot);
  pattern.edge(Predicate::AssignedAttributeTo, assertion_slot, event_slot);

  let found = ctx
    .store()
    .find_pattern(&pattern)
    .await
    .map_err(crate::error::Error::store)?;
  Ok(found.map(|binding| binding.node(event_slot)))
}
