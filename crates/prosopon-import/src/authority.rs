//! The Source/Authority Resolver.
//!
//! Every fact derives either from a text (resolved to a work, an expression,
//! and a cited passage) or from a physical seal (resolved to a boulloterion
//! and the inscription it carries). In both cases the resolver also
//! determines the responsible modern authority — the editors and analysts of
//! the edition, an authority group when there are several, or the generic
//! default agent when none is registered. Authority is never null.

use std::collections::BTreeMap;

use prosopon_catalog::Scholar;
use prosopon_core::{
  dataset::{BoulloterionRecord, Publication},
  factoid::Factoid,
  graph::{GraphPattern, GraphSession, NodeId, NodeSpec},
  ontology::{EntityClass, Predicate},
};
use tracing::warn;

use crate::{
  assertion::{AssertionInput, NodeRef, PredicateRef},
  context::{ImportContext, DEFAULT_EDITOR_NAME, DEFAULT_EDITOR_VIAF},
  error::Result,
};

// ─── Resolved source ─────────────────────────────────────────────────────────

/// What a fact's source resolves to: the node its assertions cite (a text
/// passage or an inscription) and the responsible authority node.
#[derive(Debug, Clone, Copy)]
pub struct SourceRef {
  pub source:    NodeId,
  pub authority: NodeId,
}

/// Cached per-source state for text sources (keyed by the disambiguated
/// source key).
#[derive(Debug, Clone, Copy)]
pub struct TextSource {
  pub expression: NodeId,
  pub authority:  NodeId,
}

// ─── Resolver ────────────────────────────────────────────────────────────────

impl<S: GraphSession> ImportContext<S> {
  /// Resolve a fact's source and authority.
  ///
  /// `Ok(None)` means the fact must be skipped (uncatalogued source, seal
  /// without publications); the condition has already been logged.
  pub async fn resolve_source(
    &mut self,
    factoid: &Factoid,
    boulloteria: &BTreeMap<u32, BoulloterionRecord>,
  ) -> Result<Option<SourceRef>> {
    match factoid.boulloterion {
      Some(number) => self.resolve_seal_source(number, boulloteria).await,
      None => {
        self
          .resolve_text_source(&factoid.source, &factoid.source_ref)
          .await
      }
    }
  }

  // ── Text branch ───────────────────────────────────────────────────────────

  /// Resolve a text-derived source to its cited passage node and authority.
  pub async fn resolve_text_source(
    &mut self,
    source: &str,
    reference: &str,
  ) -> Result<Option<SourceRef>> {
    // Aggregate sources are disambiguated to a sub-key first; the matched
    // literal is stripped from the reference.
    let (key, reference) = self.catalog().sources.disambiguate(source, reference);

    let text = match self.text_source_cache.get(&key) {
      Some(text) => *text,
      None => {
        let Some(entry) = self.catalog().sources.entry(&key).cloned() else {
          warn!(source = %key, "source absent from the bibliographic catalog; fact skipped");
          return Ok(None);
        };
        if entry.expression.is_empty() {
          warn!(source = %key, "catalog entry lacks an edition citation; fact skipped");
          return Ok(None);
        }

        // The abstract work, shared by all expressions realising it.
        let title = if entry.work.is_empty() { key.clone() } else { entry.work.clone() };
        let mut work_pattern = GraphPattern::new();
        let work_slot =
          work_pattern.spec(NodeSpec::new(EntityClass::Work).with("title", title.as_str()));
        let (work_binding, _) = self.find_or_create(&work_pattern).await?;
        let work = work_binding.node(work_slot);

        // The expression, keyed by (source key, edition citation).
        let mut expr_pattern = GraphPattern::new();
        let work_bound = expr_pattern.bound(work);
        let expr_slot = expr_pattern.spec(
          NodeSpec::new(EntityClass::Expression)
            .with("source", key.as_str())
            .with("citation", entry.expression.as_str()),
        );
        expr_pattern.edge(Predicate::RealisationOf, expr_slot, work_bound);
        let (expr_binding, _) = self.find_or_create(&expr_pattern).await?;
        let expression = expr_binding.node(expr_slot);

        // Editors and analysts share authority for the source's claims.
        let mut scholars = entry.editors.clone();
        scholars.extend(entry.analysts.iter().cloned());
        let authority = self.resolve_authority_group(&scholars).await?;

        // Authorship attaches to the work, once, under the same authority.
        if let Some(author_key) = &entry.author {
          let author = self.resolve_person(author_key, &author_key.name).await?;
          self
            .assert_fact(AssertionInput::new(
              format!("source:{key}"),
              NodeRef::Existing(work),
              PredicateRef::Fixed(Predicate::WasCreatedBy),
              NodeRef::Existing(author),
              authority,
            ))
            .await?;
        }

        let text = TextSource { expression, authority };
        self.text_source_cache.insert(key.clone(), text);
        text
      }
    };

    let passage = self.resolve_passage(text.expression, &key, &reference).await?;
    self.sources_used.insert(key);
    Ok(Some(SourceRef { source: passage, authority: text.authority }))
  }

  /// Find or create the cited-passage node under an expression.
  async fn resolve_passage(
    &mut self,
    expression: NodeId,
    key: &str,
    reference: &str,
  ) -> Result<NodeId> {
    let cache_key = (key.to_string(), reference.to_string());
    if let Some(id) = self.passage_cache.get(&cache_key) {
      return Ok(*id);
    }

    let mut pattern = GraphPattern::new();
    let expr_slot = pattern.bound(expression);
    let passage_slot = pattern.spec(
      NodeSpec::new(EntityClass::Passage)
        .with("source", key)
        .with("reference", reference),
    );
    pattern.edge(Predicate::HasComponent, expr_slot, passage_slot);
    let (binding, _) = self.find_or_create(&pattern).await?;

    let passage = binding.node(passage_slot);
    self.passage_cache.insert(cache_key, passage);
    Ok(passage)
  }

  // ── Seal branch ───────────────────────────────────────────────────────────

  /// Resolve a seal-derived source: the boulloterion's inscription is the
  /// source node; the union of its publications' editors is the authority.
  async fn resolve_seal_source(
    &mut self,
    number: u32,
    boulloteria: &BTreeMap<u32, BoulloterionRecord>,
  ) -> Result<Option<SourceRef>> {
    if let Some(cached) = self.seal_cache.get(&number) {
      return Ok(*cached);
    }

    let Some(record) = boulloteria.get(&number) else {
      warn!(boulloterion = number, "factoid references an unknown boulloterion; fact skipped");
      self.seal_cache.insert(number, None);
      return Ok(None);
    };

    // A boulloterion must carry at least one publication, or an explicitly
    // registered fallback reference.
    let mut publications = record.publications.clone();
    if publications.is_empty() {
      match self.catalog().sources.boulloterion_fallbacks.get(&number) {
        Some(fallback) => publications.push(Publication {
          source:    fallback.source.clone(),
          reference: fallback.reference.clone(),
        }),
        None => {
          warn!(
            boulloterion = number,
            "no publication and no registered fallback; facts on it are skipped"
          );
          self.seal_cache.insert(number, None);
          return Ok(None);
        }
      }
    }

    // The physical object, keyed by catalogue number.
    let mut pattern = GraphPattern::new();
    let boulloterion_slot = pattern.spec(
      NodeSpec::new(EntityClass::Boulloterion).with("number", number.to_string()),
    );
    let (binding, _) = self.find_or_create(&pattern).await?;
    let boulloterion = binding.node(boulloterion_slot);

    // The inscription it carries.
    let mut inscription_pattern = GraphPattern::new();
    let b_slot = inscription_pattern.bound(boulloterion);
    let i_slot = inscription_pattern.spec(
      NodeSpec::new(EntityClass::Inscription)
        .with("boulloterion", number.to_string())
        .on_create("text", record.inscription.as_str()),
    );
    inscription_pattern.edge(Predicate::Carries, b_slot, i_slot);
    let (inscription_binding, _) = self.find_or_create(&inscription_pattern).await?;
    let inscription = inscription_binding.node(i_slot);

    // Union of editors over all publications; a publication whose source
    // has no listed editor contributes the default scholar.
    let mut scholars: Vec<Scholar> = Vec::new();
    for publication in &publications {
      match self.catalog().sources.entry(&publication.source) {
        Some(entry) if !entry.editors.is_empty() => {
          scholars.extend(entry.editors.iter().cloned());
        }
        _ => scholars.push(Scholar {
          name: DEFAULT_EDITOR_NAME.to_string(),
          viaf: DEFAULT_EDITOR_VIAF.to_string(),
        }),
      }
    }
    let authority = self.resolve_authority_group(&scholars).await?;

    // The carrying of the inscription is itself a sourced claim: one
    // assertion per bibliographic reference.
    for publication in &publications {
      let passage = match self
        .resolve_text_source(&publication.source, &publication.reference)
        .await?
      {
        Some(source_ref) => source_ref.source,
        // Publication sources missing from the catalog still ground the
        // claim; cite a bare passage node.
        None => {
          let mut pattern = GraphPattern::new();
          let slot = pattern.spec(
            NodeSpec::new(EntityClass::Passage)
              .with("source", publication.source.as_str())
              .with("reference", publication.reference.as_str()),
          );
          let (binding, _) = self.find_or_create(&pattern).await?;
          binding.node(slot)
        }
      };
      self
        .assert_fact(
          AssertionInput::new(
            format!("boulloterion:{number}"),
            NodeRef::Existing(boulloterion),
            PredicateRef::Fixed(Predicate::Carries),
            NodeRef::Existing(inscription),
            authority,
          )
          .with_source(passage),
        )
        .await?;
    }

    let resolved = SourceRef { source: inscription, authority };
    self.seal_cache.insert(number, Some(resolved));
    Ok(Some(resolved))
  }

  // ── Authority groups ──────────────────────────────────────────────────────

  /// Resolve a set of scholars to a single authority node: the generic
  /// default agent for an empty set, the scholar's person node for one, a
  /// deduplicated authority-group node for several.
  pub async fn resolve_authority_group(&mut self, scholars: &[Scholar]) -> Result<NodeId> {
    let mut seen: Vec<&Scholar> = Vec::new();
    for scholar in scholars {
      if !seen.iter().any(|s| s.viaf == scholar.viaf) {
        seen.push(scholar);
      }
    }

    match seen.len() {
      0 => Ok(self.agents().generic),
      1 => {
        let scholar = seen[0];
        let agent = self.agents().viaf;
        self
          .resolve_identified_entity(
            EntityClass::Person,
            agent,
            &scholar.viaf,
            &scholar.name,
          )
          .await
      }
      _ => {
        let mut members = Vec::with_capacity(seen.len());
        for scholar in &seen {
          let agent = self.agents().viaf;
          let member = self
            .resolve_identified_entity(
              EntityClass::Person,
              agent,
              &scholar.viaf,
              &scholar.name,
            )
            .await?;
          members.push(member);
        }

        // Group identity is the sorted VIAF key set.
        let mut viafs: Vec<&str> = seen.iter().map(|s| s.viaf.as_str()).collect();
        viafs.sort_unstable();

        let mut pattern = GraphPattern::new();
        let member_slots: Vec<usize> =
          members.iter().map(|id| pattern.bound(*id)).collect();
        let group_slot = pattern.spec(
          NodeSpec::new(EntityClass::Group).with("members", viafs.join(",")),
        );
        for slot in member_slots {
          pattern.edge(Predicate::MemberOf, slot, group_slot);
        }
        let (binding, _) = self.find_or_create(&pattern).await?;
        Ok(binding.node(group_slot))
      }
    }
  }
}
