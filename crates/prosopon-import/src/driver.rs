//! The run driver: Init → per-person loop → per-factoid-kind loop →
//! finalize.
//!
//! The driver owns ordering (persons in input order, factoid kinds in enum
//! order) and the end-of-run bookkeeping: every assertion not yet wrapped in
//! a documenting record is attached to a timestamped database-revision
//! marker, and the marker is rolled back when the sweep finds nothing —
//! empty audit entries never persist.

use std::{collections::BTreeMap, fmt};

use chrono::Utc;
use prosopon_core::{
  dataset::ImportSet,
  factoid::FactoidKind,
  graph::{GraphPattern, GraphSession, NodeId, NodeSpec},
  ontology::{EntityClass, Predicate},
};
use strum::IntoEnumIterator as _;
use tracing::{debug, info};

use crate::{
  context::ImportContext,
  error::{Error, Result},
  handlers::{self, FactScope, Handled, HandlerRegistry},
};

// ─── Report ──────────────────────────────────────────────────────────────────

/// What one run did, reported to the operator at completion.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
  /// Person records processed (placeholders excluded).
  pub persons: usize,
  /// Assertions newly created in this run.
  pub assertions_created: usize,
  /// Source keys actually resolved for at least one fact.
  pub sources_used: std::collections::BTreeSet<String>,
  /// Facts that produced (or idempotently matched) assertions.
  pub handled: usize,
  /// Data-quality skips, counted per reason label.
  pub skipped: BTreeMap<&'static str, usize>,
  /// Facts whose kind has no registered handler.
  pub not_modeled: usize,
  /// The revision marker, when the run created new records.
  pub revision: Option<NodeId>,
}

impl fmt::Display for RunReport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "persons processed:  {}", self.persons)?;
    writeln!(f, "facts handled:      {}", self.handled)?;
    writeln!(f, "facts not modeled:  {}", self.not_modeled)?;
    writeln!(f, "assertions created: {}", self.assertions_created)?;
    if !self.skipped.is_empty() {
      writeln!(f, "skipped:")?;
      for (reason, count) in &self.skipped {
        writeln!(f, "  {reason}: {count}")?;
      }
    }
    writeln!(f, "sources used:       {}", self.sources_used.len())?;
    for source in &self.sources_used {
      writeln!(f, "  {source}")?;
    }
    Ok(())
  }
}

// ─── Driver ──────────────────────────────────────────────────────────────────

/// Run a full import of `dataset` through `ctx`.
pub async fn run<S: GraphSession>(
  ctx: &mut ImportContext<S>,
  dataset: &ImportSet,
) -> Result<RunReport> {
  let registry = HandlerRegistry::standard();
  let mut report = RunReport::default();

  for person in &dataset.persons {
    if person.key.is_anonymous_group() {
      debug!(person = %person.key, "skipping anonymous-group record");
      continue;
    }

    let person_node = ctx.resolve_person_record(person).await?;
    report.persons += 1;

    // Direct person-row claims run first, under the implicit default
    // authority.
    handlers::person::record_direct(ctx, person, person_node).await?;

    for kind in FactoidKind::iter() {
      for factoid in person.factoids.iter().filter(|f| f.kind() == kind) {
        let Some(handler) = registry.get(kind) else {
          // Deliberately not yet modeled; not a data problem.
          debug!(
            person = %person.key,
            factoid = factoid.id,
            kind = kind.discriminant(),
            "no handler registered; kind not modeled"
          );
          report.not_modeled += 1;
          continue;
        };

        let Some(source_ref) = ctx.resolve_source(factoid, &dataset.boulloteria).await?
        else {
          *report.skipped.entry("unresolved-source").or_default() += 1;
          continue;
        };

        let scope = FactScope {
          person,
          person_node,
          source: source_ref.source,
          authority: source_ref.authority,
          factoid,
        };
        match handler(ctx, &scope).await? {
          Handled::Recorded { .. } => report.handled += 1,
          Handled::Skipped(reason) => {
            *report.skipped.entry(reason.label()).or_default() += 1;
          }
        }
      }
    }
  }

  report.revision = finalize(ctx).await?;
  report.assertions_created = ctx.created_assertions();
  report.sources_used = ctx.sources_used().clone();

  info!(
    persons = report.persons,
    assertions = report.assertions_created,
    "import run complete"
  );
  Ok(report)
}

/// Wrap every undocumented assertion in a Document record under a fresh
/// revision marker; delete the marker again if there was nothing to wrap.
async fn finalize<S: GraphSession>(ctx: &mut ImportContext<S>) -> Result<Option<NodeId>> {
  let agents = ctx.agents();

  // The marker is created first and rolled back when unused, so a crash
  // mid-sweep leaves documented assertions attached to a real marker.
  let mut revision_pattern = GraphPattern::new();
  let party_slot = revision_pattern.bound(agents.generic);
  let revision_slot = revision_pattern.spec(
    NodeSpec::new(EntityClass::Revision).with("timestamp", Utc::now().to_rfc3339()),
  );
  revision_pattern.edge(Predicate::CarriedOutBy, revision_slot, party_slot);
  let revision = ctx
    .store()
    .create_pattern(&revision_pattern)
    .await
    .map_err(Error::store)?
    .node(revision_slot);

  let undocumented = ctx
    .store()
    .nodes_without_incoming(EntityClass::Assertion, Predicate::Documents)
    .await
    .map_err(Error::store)?;

  if undocumented.is_empty() {
    debug!("no undocumented assertions; rolling back the revision marker");
    ctx.store().delete_node(revision).await.map_err(Error::store)?;
    return Ok(None);
  }

  for assertion in &undocumented {
    let mut pattern = GraphPattern::new();
    let revision_slot = pattern.bound(revision);
    let assertion_slot = pattern.bound(*assertion);
    let document_slot = pattern.spec(NodeSpec::new(EntityClass::Document));
    pattern.edge(Predicate::Documents, document_slot, assertion_slot);
    pattern.edge(Predicate::HasComponent, revision_slot, document_slot);
    ctx
      .store()
      .create_pattern(&pattern)
      .await
      .map_err(Error::store)?;
  }

  info!(
    documented = undocumented.len(),
    %revision,
    "revision sweep complete"
  );
  Ok(Some(revision))
}
