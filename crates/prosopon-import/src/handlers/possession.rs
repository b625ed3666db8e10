//! Possession factoids.
//!
//! The possessed object is a generic physical-object node keyed by its
//! description text: two facts describing the same thing resolve to the same
//! node, whoever the owner is.

use prosopon_core::{
  factoid::FactoidValue,
  graph::{GraphPattern, GraphSession, NodeSpec},
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
  let FactoidValue::Possession { description } = &scope.factoid.value else {
    return Ok(Handled::Skipped(SkipReason::MissingPayload));
  };
  let description = description.trim();
  if description.is_empty() {
    warn!(
      person = %scope.person.key,
      factoid = scope.factoid.id,
      "possession factoid has no description; skipped"
    );
    return Ok(Handled::Skipped(SkipReason::MissingPayload));
  }

  // Deduplicated globally by description, so the object is resolved before
  // the assertion rather than scoped to it.
  let mut pattern = GraphPattern::new();
  let slot = pattern.spec(
    NodeSpec::new(EntityClass::HumanMadeObject).with("description", description),
  );
  let (binding, _) = ctx.find_or_create(&pattern).await?;
  let object = binding.node(slot);

  let outcome = ctx
    .assert_fact(
      AssertionInput::new(
        scope.factoid.origin(),
        NodeRef::Existing(object),
        PredicateRef::Fixed(Predicate::HasFormerOrCurrentOwner),
        NodeRef::Existing(scope.person_node),
        scope.authority,
      )
      .with_source(scope.source)
      .with_uncertain(scope.factoid.uncertain),
    )
    .await?;

  Ok(Handled::Recorded {
    assertions: usize::from(outcome.created),
  })
}
