//! Ethnicity, religion, occupation/society-role and dignity factoids.
//!
//! All four reduce to "assert group or role membership"; they differ only in
//! which controlled-vocabulary category the value node comes from and which
//! side of the predicate pair carries it. Ethnicities are group memberships;
//! religions and plain occupations pertain to the person; dignities and the
//! special-cased legal designations define the person (role embodiment).

use prosopon_core::{
  factoid::FactoidValue,
  graph::GraphSession,
  ontology::{Predicate, VocabCategory},
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
  let (category, label, broader) = match &scope.factoid.value {
    FactoidValue::Ethnicity { label } => (VocabCategory::Ethnicity, label, None),
    FactoidValue::Religion { label } => (VocabCategory::Religion, label, None),
    FactoidValue::Occupation { label } => {
      let broader = ctx
        .catalog()
        .vocabulary
        .is_legal_designation(label.trim())
        .then_some("legal status");
      (VocabCategory::SocietyRole, label, broader)
    }
    FactoidValue::Dignity { label } => (VocabCategory::Dignity, label, Some("dignity")),
    _ => return Ok(Handled::Skipped(SkipReason::MissingPayload)),
  };

  if label.trim().is_empty() {
    warn!(
      person = %scope.person.key,
      factoid = scope.factoid.id,
      category = category.name(),
      "factoid has an empty value; skipped"
    );
    return Ok(Handled::Skipped(SkipReason::MissingPayload));
  }

  let Some(value) = ctx.resolve_vocab(category, label, broader).await? else {
    return Ok(Handled::Skipped(SkipReason::UnknownVocabValue));
  };

  // Dignities and legal designations are role embodiments (the role is
  // defined by its bearer); the rest are memberships or pertinences of the
  // person.
  let legal = category == VocabCategory::SocietyRole
    && ctx.catalog().vocabulary.is_legal_designation(label.trim());
  let input = if category == VocabCategory::Dignity || legal {
    AssertionInput::new(
      scope.factoid.origin(),
      NodeRef::Existing(value),
      PredicateRef::Fixed(Predicate::IsDefinedBy),
      NodeRef::Existing(scope.person_node),
      scope.authority,
    )
  } else {
    let predicate = match category {
      VocabCategory::Ethnicity => Predicate::MemberOf,
      _ => Predicate::PertainsTo,
    };
    AssertionInput::new(
      scope.factoid.origin(),
      NodeRef::Existing(scope.person_node),
      PredicateRef::Fixed(predicate),
      NodeRef::Existing(value),
      scope.authority,
    )
  };

  let outcome = ctx
    .assert_fact(
      input
        .with_source(scope.source)
        .with_uncertain(scope.factoid.uncertain),
    )
    .await?;
  Ok(Handled::Recorded {
    assertions: usize::from(outcome.created),
  })
}
