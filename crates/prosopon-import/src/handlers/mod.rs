//! Fact-type handlers and their registry.
//!
//! Each factoid kind the target ontology models has exactly one handler,
//! registered against the closed [`FactoidKind`] enum. Dispatch is an
//! explicit map lookup: a kind with no entry is a typed "not yet modeled"
//! outcome, not an error and not a silent reflection trick.

pub mod death;
pub mod kinship;
pub mod language;
pub mod membership;
pub mod names;
pub mod person;
pub mod possession;

use std::{collections::HashMap, future::Future, pin::Pin};

use prosopon_core::{
  factoid::{Factoid, FactoidKind},
  graph::{GraphSession, NodeId},
  person::PersonRecord,
};

use crate::{
  context::ImportContext,
  error::{Result, SkipReason},
};

// ─── Handler contract ────────────────────────────────────────────────────────

/// Everything a handler sees: the person row and its resolved node, the
/// resolved source and authority nodes, and the factoid itself.
pub struct FactScope<'a> {
  pub person:      &'a PersonRecord,
  pub person_node: NodeId,
  pub source:      NodeId,
  pub authority:   NodeId,
  pub factoid:     &'a Factoid,
}

/// What a handler did with a fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handled {
  /// The fact produced assertions; `assertions` counts newly created ones
  /// (zero on a re-run).
  Recorded { assertions: usize },
  /// The fact was skipped; the reason has been logged where warranted.
  Skipped(SkipReason),
}

pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<Handled>> + Send + 'a>>;

/// A registered handler. Plain function pointers keep the registry a closed,
/// inspectable table.
pub type Handler<S> =
  for<'a> fn(&'a mut ImportContext<S>, &'a FactScope<'a>) -> HandlerFuture<'a>;

// ─── Registry ────────────────────────────────────────────────────────────────

/// The explicit mapping from factoid kinds to handlers.
pub struct HandlerRegistry<S: GraphSession> {
  map: HashMap<FactoidKind, Handler<S>>,
}

impl<S: GraphSession> HandlerRegistry<S> {
  /// The standard registry: every kind the target ontology currently
  /// models. Kinds absent here (narratives, locations, education, ...) are
  /// deliberately not yet modeled.
  pub fn standard() -> Self {
    let mut map: HashMap<FactoidKind, Handler<S>> = HashMap::new();
    map.insert(FactoidKind::SecondName, dispatch_names::<S>);
    map.insert(FactoidKind::AlternativeName, dispatch_names::<S>);
    map.insert(FactoidKind::Death, dispatch_death::<S>);
    map.insert(FactoidKind::Dignity, dispatch_membership::<S>);
    map.insert(FactoidKind::Ethnicity, dispatch_membership::<S>);
    map.insert(FactoidKind::Kinship, dispatch_kinship::<S>);
    map.insert(FactoidKind::LanguageSkill, dispatch_language::<S>);
    map.insert(FactoidKind::Occupation, dispatch_membership::<S>);
    map.insert(FactoidKind::Possession, dispatch_possession::<S>);
    map.insert(FactoidKind::Religion, dispatch_membership::<S>);
    Self { map }
  }

  pub fn get(&self, kind: FactoidKind) -> Option<Handler<S>> {
    self.map.get(&kind).copied()
  }

  pub fn is_registered(&self, kind: FactoidKind) -> bool {
    self.map.contains_key(&kind)
  }
}

// Pin-boxing wrappers; function items coerce to the higher-ranked pointer
// type the registry stores.

fn dispatch_death<'a, S: GraphSession>(
  ctx: &'a mut ImportContext<S>,
  scope: &'a FactScope<'a>,
) -> HandlerFuture<'a> {
  Box::pin(death::handle(ctx, scope))
}

fn dispatch_kinship<'a, S: GraphSession>(
  ctx: &'a mut ImportContext<S>,
  scope: &'a FactScope<'a>,
) -> HandlerFuture<'a> {
  Box::pin(kinship::handle(ctx, scope))
}

fn dispatch_language<'a, S: GraphSession>(
  ctx: &'a mut ImportContext<S>,
  scope: &'a FactScope<'a>,
) -> HandlerFuture<'a> {
  Box::pin(language::handle(ctx, scope))
}

fn dispatch_membership<'a, S: GraphSession>(
  ctx: &'a mut ImportContext<S>,
  scope: &'a FactScope<'a>,
) -> HandlerFuture<'a> {
  Box::pin(membership::handle(ctx, scope))
}

fn dispatch_names<'a, S: GraphSession>(
  ctx: &'a mut ImportContext<S>,
  scope: &'a FactScope<'a>,
) -> HandlerFuture<'a> {
  Box::pin(names::handle(ctx, scope))
}

fn dispatch_possession<'a, S: GraphSession>(
  ctx: &'a mut ImportContext<S>,
  scope: &'a FactScope<'a>,
) -> HandlerFuture<'a> {
  Box::pin(possession::handle(ctx, scope))
}
