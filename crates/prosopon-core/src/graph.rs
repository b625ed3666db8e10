//! The typed graph-pattern model and the `GraphSession` trait.
//!
//! The trait is implemented by storage backends (e.g. `prosopon-store-sqlite`).
//! The import engine depends on this abstraction, not on any concrete
//! backend, and achieves idempotency exclusively through the single
//! [`find_or_create`] primitive: every resolver expresses its node shape as a
//! [`GraphPattern`] and lets the one audited match-then-create code path do
//! the rest.

use std::{collections::BTreeMap, fmt, future::Future};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  error::{Error, Result},
  ontology::{EntityClass, Predicate},
};

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// Opaque identifier of a graph node. Assigned by the store at creation and
/// stable for the lifetime of the graph.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct NodeId(pub Uuid);

impl fmt::Display for NodeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.hyphenated().fmt(f)
  }
}

// ─── Node specification ──────────────────────────────────────────────────────

/// The shape of a node to be matched or created.
///
/// `identity` properties participate in matching; `on_create` properties are
/// written only when the node is first created. Display names belong in
/// `on_create` so that a later correction does not fork the node's identity.
/// `without` labels are negative match clauses: the node must have no
/// outgoing edge with that label (an assertion with no source must not match
/// one that has a source).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSpec {
  pub class:     EntityClass,
  pub identity:  BTreeMap<String, String>,
  pub on_create: BTreeMap<String, String>,
  pub without:   Vec<Predicate>,
}

impl NodeSpec {
  pub fn new(class: EntityClass) -> Self {
    Self {
      class,
      identity: BTreeMap::new(),
      on_create: BTreeMap::new(),
      without: Vec::new(),
    }
  }

  /// Add an identity property (participates in matching).
  pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.identity.insert(key.into(), value.into());
    self
  }

  /// Add a property set only when the node is created.
  pub fn on_create(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.on_create.insert(key.into(), value.into());
    self
  }

  /// Require that a matching node has no outgoing edge with `label`.
  pub fn without(mut self, label: Predicate) -> Self {
    self.without.push(label);
    self
  }
}

// ─── Pattern ─────────────────────────────────────────────────────────────────

/// One node slot in a pattern: either a node already resolved to an id, or a
/// specification to match or create.
#[derive(Debug, Clone)]
pub enum PatternNode {
  Bound(NodeId),
  Spec(NodeSpec),
}

/// A directed, labelled edge between two node slots (indices into the
/// pattern's node list).
#[derive(Debug, Clone)]
pub struct PatternEdge {
  pub label: Predicate,
  pub from:  usize,
  pub to:    usize,
}

/// A small connected subgraph to be matched as a whole or created as a whole.
///
/// Matching considers the pattern in declared node order; callers put the
/// most selective slots first (bound nodes, then specs with identity
/// properties) so a conforming backend can narrow its search fastest.
#[derive(Debug, Clone, Default)]
pub struct GraphPattern {
  pub nodes: Vec<PatternNode>,
  pub edges: Vec<PatternEdge>,
}

impl GraphPattern {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add a slot for an already-resolved node; returns its index.
  pub fn bound(&mut self, id: NodeId) -> usize {
    self.nodes.push(PatternNode::Bound(id));
    self.nodes.len() - 1
  }

  /// Add a slot for a node to match-or-create; returns its index.
  pub fn spec(&mut self, spec: NodeSpec) -> usize {
    self.nodes.push(PatternNode::Spec(spec));
    self.nodes.len() - 1
  }

  pub fn edge(&mut self, label: Predicate, from: usize, to: usize) {
    self.edges.push(PatternEdge { label, from, to });
  }

  /// Check that every edge references a declared node slot.
  pub fn validate(&self) -> Result<()> {
    if self.nodes.is_empty() {
      return Err(Error::EmptyPattern);
    }
    let len = self.nodes.len();
    for e in &self.edges {
      for index in [e.from, e.to] {
        if index >= len {
          return Err(Error::PatternIndexOutOfRange { index, len });
        }
      }
    }
    Ok(())
  }
}

/// The node ids a pattern resolved to, in pattern slot order.
#[derive(Debug, Clone)]
pub struct PatternBinding {
  pub nodes: Vec<NodeId>,
}

impl PatternBinding {
  pub fn node(&self, index: usize) -> NodeId {
    self.nodes[index]
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a labelled property graph reachable through a
/// session-scoped request/response interface.
///
/// Every method is a single round trip. There are no cross-statement
/// transactions: the importer relies on match-before-create, so a crashed run
/// can always be resumed against the same store.
pub trait GraphSession: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Match the whole pattern against the store. Returns the first full
  /// binding in deterministic (creation) order, or `None`.
  fn find_pattern(
    &self,
    pattern: &GraphPattern,
  ) -> impl Future<Output = Result<Option<PatternBinding>, Self::Error>> + Send;

  /// Create every `Spec` slot of the pattern (bound slots must already
  /// exist) together with all declared edges, in one round trip. Edges that
  /// already exist are not duplicated.
  fn create_pattern(
    &self,
    pattern: &GraphPattern,
  ) -> impl Future<Output = Result<PatternBinding, Self::Error>> + Send;

  /// Set a property on an existing node, overwriting any previous value.
  fn set_node_property(
    &self,
    node: NodeId,
    key: &str,
    value: &str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send;

  /// Read a single property of a node.
  fn node_property(
    &self,
    node: NodeId,
    key: &str,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send;

  /// Delete a node and its properties and edges. The importer issues this
  /// only to roll back an empty revision marker.
  fn delete_node(
    &self,
    node: NodeId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send;

  /// All nodes of `class` lacking an incoming edge with `label`, in creation
  /// order. Used by the end-of-run documentation sweep.
  fn nodes_without_incoming(
    &self,
    class: EntityClass,
    label: Predicate,
  ) -> impl Future<Output = Result<Vec<NodeId>, Self::Error>> + Send;

  /// Number of nodes of a class.
  fn count_nodes(
    &self,
    class: EntityClass,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send;
}

// ─── The one match-then-create code path ─────────────────────────────────────

/// Find the pattern, or create it if absent. The boolean is `true` when the
/// pattern was created by this call.
///
/// This is the only place the importer decides between matching and
/// creating; every resolver funnels through it.
pub async fn find_or_create<S: GraphSession>(
  store: &S,
  pattern: &GraphPattern,
) -> Result<(PatternBinding, bool), S::Error> {
  if let Some(binding) = store.find_pattern(pattern).await? {
    return Ok((binding, false));
  }
  let binding = store.create_pattern(pattern).await?;
  Ok((binding, true))
}
