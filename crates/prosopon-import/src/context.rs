//! [`ImportContext`] — everything one run carries: the store session, the
//! catalogs, the memoization caches, and the process-constant agent nodes.
//!
//! The context is constructed once per run and threaded by mutable reference
//! through the resolvers and handlers; nothing retains it past the run. All
//! caches are in-memory and unbounded, which is acceptable because the
//! controlled-vocabulary space is small and a run is a one-shot batch.

use std::collections::{BTreeSet, HashMap};

use prosopon_catalog::Catalog;
use prosopon_core::graph::{
  find_or_create, GraphPattern, GraphSession, NodeId, NodeSpec, PatternBinding,
};
use prosopon_core::ontology::{EntityClass, VocabCategory};
use regex::Regex;

use crate::error::{Error, Result};

// ─── Process constants ───────────────────────────────────────────────────────

/// The source database's own identity-assigning authority.
pub const PBW_AGENT: &str = "Prosopography of the Byzantine World";

/// The VIAF authority, used as the key-space for modern scholars.
pub const VIAF_AGENT: &str = "Virtual International Authority File";

/// The generic default agent credited when a source has no registered
/// scholars. Every assertion has a non-null authority because of it.
pub const GENERIC_AGENT: &str = "Prosopography of the Byzantine World editors";

/// Default scholar credited for seal publications with no listed editor.
pub const DEFAULT_EDITOR_NAME: &str = "Jean-Claude Cheynet";
pub const DEFAULT_EDITOR_VIAF: &str = "26853752";

/// Ordered extraction patterns for appellation factoids. Group 1 of the
/// first matching pattern is the extracted name.
const NAME_PATTERNS: &[&str] = &[
  // A token inside double or typographic quotes.
  "[\"\u{201c}]([^\"\u{201d}]+)[\"\u{201d}]",
  // A parenthesised token.
  r"\(([^)]+)\)",
  // "X, also called Y" and its variants.
  r"(?:also (?:called|known as)|surnamed|called)\s+(\p{Lu}[\p{L}-]*)",
  // A leading capitalised token before a comma.
  r"^(\p{Lu}[\p{L}-]*),",
];

/// The fixed agent nodes, created (idempotently) at initialisation.
#[derive(Debug, Clone, Copy)]
pub struct Agents {
  pub pbw:  NodeId,
  pub viaf: NodeId,
  /// The generic default authority; also the responsible party recorded on
  /// each database revision.
  pub generic: NodeId,
  /// Person node for the default seal editor.
  pub default_editor: NodeId,
}

// ─── Context ─────────────────────────────────────────────────────────────────

/// Per-run state for the import engine.
pub struct ImportContext<S: GraphSession> {
  store:   S,
  catalog: Catalog,
  agents:  Agents,

  pub(crate) name_patterns: Vec<Regex>,

  // Memoization caches; correctness depends only on find-before-create,
  // these exist to avoid re-issuing round trips.
  pub(crate) vocab_cache: HashMap<(VocabCategory, String), NodeId>,
  pub(crate) identity_cache: HashMap<(NodeId, String), NodeId>,
  pub(crate) text_source_cache: HashMap<String, crate::authority::TextSource>,
  pub(crate) passage_cache: HashMap<(String, String), NodeId>,
  pub(crate) seal_cache: HashMap<u32, Option<crate::authority::SourceRef>>,

  pub(crate) sources_used: BTreeSet<String>,
  pub(crate) created_assertions: usize,
}

impl<S: GraphSession> ImportContext<S> {
  /// Create the context and the constant agent nodes. Idempotent against a
  /// pre-populated store — safe to re-run.
  pub async fn init(store: S, catalog: Catalog) -> Result<Self> {
    let pbw = constant_actor(&store, PBW_AGENT).await?;
    let viaf = constant_actor(&store, VIAF_AGENT).await?;
    let generic = constant_actor(&store, GENERIC_AGENT).await?;

    let name_patterns = NAME_PATTERNS
      .iter()
      .map(|p| Regex::new(p))
      .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut ctx = Self {
      store,
      catalog,
      // Placeholder until the editor person resolves below.
      agents: Agents { pbw, viaf, generic, default_editor: generic },
      name_patterns,
      vocab_cache: HashMap::new(),
      identity_cache: HashMap::new(),
      text_source_cache: HashMap::new(),
      passage_cache: HashMap::new(),
      seal_cache: HashMap::new(),
      sources_used: BTreeSet::new(),
      created_assertions: 0,
    };

    ctx.agents.default_editor = ctx
      .resolve_identified_entity(
        EntityClass::Person,
        viaf,
        DEFAULT_EDITOR_VIAF,
        DEFAULT_EDITOR_NAME,
      )
      .await?;

    Ok(ctx)
  }

  pub fn store(&self) -> &S {
    &self.store
  }

  pub fn catalog(&self) -> &Catalog {
    &self.catalog
  }

  pub fn agents(&self) -> Agents {
    self.agents
  }

  /// Count of assertions newly created so far in this run.
  pub fn created_assertions(&self) -> usize {
    self.created_assertions
  }

  /// Source keys resolved so far in this run.
  pub fn sources_used(&self) -> &BTreeSet<String> {
    &self.sources_used
  }

  /// The single match-then-create path, with store errors boxed at the
  /// engine boundary.
  pub(crate) async fn find_or_create(
    &self,
    pattern: &GraphPattern,
  ) -> Result<(PatternBinding, bool)> {
    find_or_create(&self.store, pattern)
      .await
      .map_err(Error::store)
  }
}

#[cfg(test)]
pub(crate) fn test_name_patterns() -> Vec<Regex> {
  NAME_PATTERNS
    .iter()
    .map(|p| Regex::new(p).expect("static pattern"))
    .collect()
}

/// Find or create one of the fixed agent nodes.
async fn constant_actor<S: GraphSession>(store: &S, name: &str) -> Result<NodeId> {
  let mut pattern = GraphPattern::new();
  let actor = pattern.spec(NodeSpec::new(EntityClass::Actor).with("name", name));
  let (binding, _) = find_or_create(store, &pattern)
    .await
    .map_err(Error::store)?;
  Ok(binding.node(actor))
}
