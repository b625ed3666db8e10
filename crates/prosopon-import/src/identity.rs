//! The Identified-Entity Resolver.
//!
//! Any entity that is uniquely identified by an (agent, identifier) pair —
//! a person under the source database's numbering, a modern scholar under
//! VIAF — resolves through the identifier-assignment chain:
//!
//! ```text
//! agent ←P14─ assignment ─P37→ identifier
//!                 └─────P140→ entity
//! ```
//!
//! The lookup key is strictly (agent, identifier). Display names are
//! on-create properties, so correcting one later does not fork identity.

use prosopon_core::{
  graph::{GraphPattern, GraphSession, NodeId, NodeSpec},
  ontology::{EntityClass, Predicate},
  person::PersonKey,
};

use crate::{context::ImportContext, error::Result};

impl<S: GraphSession> ImportContext<S> {
  /// Resolve (or create) the unique entity of `class` identified by
  /// `identifier` under `agent`. Repeated calls — within a run or across
  /// runs — yield the same node id.
  pub async fn resolve_identified_entity(
    &mut self,
    class: EntityClass,
    agent: NodeId,
    identifier: &str,
    display_name: &str,
  ) -> Result<NodeId> {
    self
      .resolve_identified_entity_with(class, agent, identifier, display_name, &[])
      .await
  }

  /// As [`resolve_identified_entity`](Self::resolve_identified_entity),
  /// with extra properties attached to the entity node on first creation.
  pub async fn resolve_identified_entity_with(
    &mut self,
    class: EntityClass,
    agent: NodeId,
    identifier: &str,
    display_name: &str,
    extra_on_create: &[(&str, &str)],
  ) -> Result<NodeId> {
    let cache_key = (agent, identifier.to_string());
    if let Some(id) = self.identity_cache.get(&cache_key) {
      return Ok(*id);
    }

    // The identifier value node is shared between agents; the assignment
    // disambiguates.
    let mut id_pattern = GraphPattern::new();
    let id_slot =
      id_pattern.spec(NodeSpec::new(EntityClass::Identifier).with("value", identifier));
    let (id_binding, _) = self.find_or_create(&id_pattern).await?;
    let identifier_node = id_binding.node(id_slot);

    let mut entity_spec = NodeSpec::new(class).on_create("name", display_name);
    for (key, value) in extra_on_create {
      entity_spec = entity_spec.on_create(*key, *value);
    }

    let mut pattern = GraphPattern::new();
    let agent_slot = pattern.bound(agent);
    let identifier_slot = pattern.bound(identifier_node);
    let assignment_slot = pattern.spec(NodeSpec::new(EntityClass::IdentifierAssignment));
    let entity_slot = pattern.spec(entity_spec);
    pattern.edge(Predicate::CarriedOutBy, assignment_slot, agent_slot);
    pattern.edge(Predicate::AssignedIdentifier, assignment_slot, identifier_slot);
    pattern.edge(Predicate::AssignedAttributeTo, assignment_slot, entity_slot);

    let (binding, created) = self.find_or_create(&pattern).await?;
    let entity = binding.node(entity_slot);

    if created {
      tracing::debug!(%entity, identifier, "created identified entity");
    }

    self.identity_cache.insert(cache_key, entity);
    Ok(entity)
  }

  /// Resolve a person by the source database's (name, code) key.
  pub async fn resolve_person(&mut self, key: &PersonKey, display: &str) -> Result<NodeId> {
    let agent = self.agents().pbw;
    self
      .resolve_identified_entity(EntityClass::Person, agent, &key.to_string(), display)
      .await
  }
}
