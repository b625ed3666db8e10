//! Second-name and alternative-name factoids.
//!
//! The source rows are noisy free text ("Ioannes, also called Xiphilinos",
//! quoted bynames, editorial parentheses). An ordered pattern list extracts
//! the clean token; when nothing matches, the raw text is used — unless it is
//! long enough to signal an upstream parse failure, in which case the fact is
//! rejected with a warning.

use prosopon_core::{
  factoid::FactoidValue,
  graph::{GraphSession, NodeSpec},
  ontology::{EntityClass, Predicate},
};
use regex::Regex;
use tracing::warn;

use crate::{
  assertion::{AssertionInput, NodeRef, PredicateRef},
  context::ImportContext,
  error::{Result, SkipReason},
  handlers::{FactScope, Handled},
};

/// More words than this in an extracted "name" means the upstream text was
/// not a name at all.
const MAX_NAME_WORDS: usize = 5;

/// First-match-wins extraction over the ordered pattern list, falling back
/// to the trimmed raw text.
pub(crate) fn extract_name<'a>(patterns: &[Regex], text: &'a str) -> &'a str {
  for pattern in patterns {
    if let Some(captures) = pattern.captures(text) {
      if let Some(m) = captures.get(1) {
        return m.as_str().trim();
      }
    }
  }
  text.trim()
}

pub async fn handle<S: GraphSession>(
  ctx: &mut ImportContext<S>,
  scope: &FactScope<'_>,
) -> Result<Handled> {
  let text = match &scope.factoid.value {
    FactoidValue::SecondName { text } | FactoidValue::AlternativeName { text } => text,
    _ => return Ok(Handled::Skipped(SkipReason::MissingPayload)),
  };
  if text.trim().is_empty() {
    warn!(
      person = %scope.person.key,
      factoid = scope.factoid.id,
      "appellation factoid has no text; skipped"
    );
    return Ok(Handled::Skipped(SkipReason::MissingPayload));
  }

  let name = extract_name(&ctx.name_patterns, text);
  if name.split_whitespace().count() > MAX_NAME_WORDS {
    warn!(
      person = %scope.person.key,
      factoid = scope.factoid.id,
      text = name,
      "appellation did not reduce to a name; skipped"
    );
    return Ok(Handled::Skipped(SkipReason::UnparseableName));
  }

  let mut appellation = NodeSpec::new(EntityClass::Appellation).with("value", name);
  if name != text.trim() {
    appellation = appellation.on_create("extracted_from", text.trim());
  }

  let outcome = ctx
    .assert_fact(
      AssertionInput::new(
        scope.factoid.origin(),
        NodeRef::Existing(scope.person_node),
        PredicateRef::Fixed(Predicate::IsIdentifiedBy),
        NodeRef::New(appellation),
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

#[cfg(test)]
mod tests {
  use super::extract_name;
  use regex::Regex;

  fn patterns() -> Vec<Regex> {
    crate::context::test_name_patterns()
  }

  #[test]
  fn quoted_token_is_extracted() {
    assert_eq!(
      extract_name(&patterns(), "Ioannes \"Xiphilinos\" the monk"),
      "Xiphilinos"
    );
  }

  #[test]
  fn parenthesised_token_is_extracted() {
    assert_eq!(extract_name(&patterns(), "Ioannes (Xiphilinos)"), "Xiphilinos");
  }

  #[test]
  fn also_called_tail_is_extracted() {
    assert_eq!(
      extract_name(&patterns(), "Ioannes, also called Xiphilinos"),
      "Xiphilinos"
    );
  }

  #[test]
  fn leading_token_before_comma_wins_without_marker() {
    assert_eq!(extract_name(&patterns(), "Xiphilinos, of Trebizond"), "Xiphilinos");
  }

  #[test]
  fn unmatched_text_falls_back_to_raw() {
    assert_eq!(extract_name(&patterns(), "  Tornikios  "), "Tornikios");
  }
}
