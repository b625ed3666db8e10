//! Language-skill factoids.
//!
//! Modeled as a two-hop chain rather than a direct membership: the person
//! has a skill, and the skill concerns the know-how of the language.

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
  let FactoidValue::LanguageSkill { language } = &scope.factoid.value else {
    return Ok(Handled::Skipped(SkipReason::MissingPayload));
  };
  if language.trim().is_empty() {
    warn!(
      person = %scope.person.key,
      factoid = scope.factoid.id,
      "language-skill factoid has no language; skipped"
    );
    return Ok(Handled::Skipped(SkipReason::MissingPayload));
  }

  let Some(language_node) = ctx
    .resolve_vocab(VocabCategory::Language, language, None)
    .await?
  else {
    return Ok(Handled::Skipped(SkipReason::UnknownVocabValue));
  };

  let language = language.trim();
  let know_how = resolve_know_how(ctx, language, language_node).await?;
  let mut created = 0;

  // Person has a skill (scoped to this person by the assertion match)...
  let has_skill = ctx
    .assert_fact(
      AssertionInput::new(
        scope.factoid.origin(),
        NodeRef::Existing(scope.person_node),
        PredicateRef::Fixed(Predicate::HasSkill),
        NodeRef::New(NodeSpec::new(EntityClass::Skill).with("language", language)),
        scope.authority,
      )
      .with_source(scope.source)
      .with_uncertain(scope.factoid.uncertain),
    )
    .await?;
  if has_skill.created {
    created += 1;
  }

  // ...and the skill concerns the language's know-how.
  let concerns = ctx
    .assert_fact(
      AssertionInput::new(
        scope.factoid.origin(),
        NodeRef::Existing(has_skill.object),
        PredicateRef::Fixed(Predicate::Concerns),
        NodeRef::Existing(know_how),
        scope.authority,
      )
      .with_source(scope.source)
      .with_uncertain(scope.factoid.uncertain),
    )
    .await?;
  if concerns.created {
    created += 1;
  }

  Ok(Handled::Recorded { assertions: created })
}

/// One know-how node per language, typed by the language's vocabulary node.
async fn resolve_know_how<S: GraphSession>(
  ctx: &mut ImportContext<S>,
  language: &str,
  language_node: NodeId,
) -> Result<NodeId> {
  let mut pattern = GraphPattern::new();
  let language_slot = pattern.bound(language_node);
  let know_how_slot =
    pattern.spec(NodeSpec::new(EntityClass::KnowHow).with("value", language));
  pattern.edge(Predicate::HasType, know_how_slot, language_slot);
  let (binding, _) = ctx.find_or_create(&pattern).await?;
  Ok(binding.node(know_how_slot))
}
