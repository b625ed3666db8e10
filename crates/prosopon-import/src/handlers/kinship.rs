//! Kinship factoids.
//!
//! Each (person, kin) pair attested by a source gets one two-member kinship
//! group. The primary person's membership is asserted with the *specific*
//! relation predicate (the kinship-type vocabulary term); the kin's
//! membership uses the generic member predicate. Self-kinship is a data
//! error and produces nothing.

use prosopon_core::{
  factoid::FactoidValue,
  graph::{GraphPattern, GraphSession, NodeId, NodeSpec},
  ontology::{EntityClass, Predicate, VocabCategory},
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
  let FactoidValue::Kinship { relation, kin } = &scope.factoid.value else {
    return Ok(Handled::Skipped(SkipReason::MissingPayload));
  };
  if kin.is_empty() {
    warn!(
      person = %scope.person.key,
      factoid = scope.factoid.id,
      "kinship factoid names no referents; skipped"
    );
    return Ok(Handled::Skipped(SkipReason::MissingPayload));
  }

  let Some(kin_type) = ctx
    .resolve_vocab(VocabCategory::KinshipType, relation, None)
    .await?
  else {
    return Ok(Handled::Skipped(SkipReason::UnknownVocabValue));
  };

  let mut created = 0;
  let mut related = 0;
  let mut saw_self = false;

  for referent in kin {
    if referent.is_placeholder() {
      continue;
    }
    if *referent == scope.person.key {
      warn!(
        person = %scope.person.key,
        factoid = scope.factoid.id,
        "kinship factoid relates a person to themself; referent skipped"
      );
      saw_self = true;
      continue;
    }

    let kin_node = ctx.resolve_person(referent, &referent.name).await?;
    let group = resolve_kinship_group(ctx, scope.person_node, kin_node, scope.source).await?;

    // The primary person's membership carries the specific relation...
    let specific = ctx
      .assert_fact(
        AssertionInput::new(
          scope.factoid.origin(),
          NodeRef::Existing(scope.person_node),
          PredicateRef::Term(kin_type),
          NodeRef::Existing(group),
          scope.authority,
        )
        .with_source(scope.source)
        .with_uncertain(scope.factoid.uncertain),
      )
      .await?;
    if specific.created {
      created += 1;
    }

    // ...the kin's membership is generic.
    let generic = ctx
      .assert_fact(
        AssertionInput::new(
          scope.factoid.origin(),
          NodeRef::Existing(kin_node),
          PredicateRef::Fixed(Predicate::MemberOf),
          NodeRef::Existing(group),
          scope.authority,
        )
        .with_source(scope.source)
        .with_uncertain(scope.factoid.uncertain),
      )
      .await?;
    if generic.created {
      created += 1;
    }

    related += 1;
  }

  if related == 0 {
    let reason = if saw_self {
      SkipReason::SelfKinship
    } else {
      SkipReason::AnonymousReferent
    };
    return Ok(Handled::Skipped(reason));
  }
  Ok(Handled::Recorded { assertions: created })
}

/// At most one group per unordered (person, kin) pair per source context.
async fn resolve_kinship_group<S: GraphSession>(
  ctx: &mut ImportContext<S>,
  person: NodeId,
  kin: NodeId,
  source: NodeId,
) -> Result<NodeId> {
  let mut pair = [person.to_string(), kin.to_string()];
  pair.sort_unstable();

  let mut pattern = GraphPattern::new();
  let slot = pattern.spec(
    NodeSpec::new(EntityClass::KinshipGroup)
      .with("members", pair.join("|"))
      .with("context", source.to_string()),
  );
  let (binding, _) = ctx.find_or_create(&pattern).await?;
  Ok(binding.node(slot))
}
