//! The Assertion Builder — the structural heart of the importer.
//!
//! Every factual claim becomes one reified assertion node carrying its
//! predicate, wired to subject, object, authority and (when the claim has
//! one) source. The whole 5-tuple is matched in one round trip before
//! anything is created, so re-running the importer can never duplicate an
//! assertion.

use prosopon_core::{
  graph::{GraphPattern, GraphSession, NodeId, NodeSpec},
  ontology::{EntityClass, Predicate},
};

use crate::{
  context::ImportContext,
  error::{Error, Result},
};

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// An assertion end: either a node already resolved by a resolver, or a node
/// shape to be created alongside the assertion. A `New` shape is scoped to
/// the assertion: it matches only as part of the whole assertion pattern.
#[derive(Debug, Clone)]
pub enum NodeRef {
  Existing(NodeId),
  New(NodeSpec),
}

/// The asserted property: a fixed ontology predicate, or a
/// controlled-vocabulary term used as a predicate (kinship's specific
/// relation).
#[derive(Debug, Clone, Copy)]
pub enum PredicateRef {
  Fixed(Predicate),
  Term(NodeId),
}

impl PredicateRef {
  /// The value stored in the assertion's `predicate` identity property.
  pub fn key(self) -> String {
    match self {
      Self::Fixed(p) => p.code().to_string(),
      Self::Term(id) => format!("term:{id}"),
    }
  }
}

/// One call to the builder.
#[derive(Debug, Clone)]
pub struct AssertionInput {
  /// Tag of the record that produced this claim (`factoid:123`), recorded
  /// on the assertion for later audit sweeps.
  pub origin: String,
  pub subject: NodeRef,
  pub predicate: PredicateRef,
  pub object: NodeRef,
  /// Never null: a specific scholar, an authority group, or the generic
  /// default agent.
  pub authority: NodeId,
  pub source: Option<NodeId>,
  /// Free-text note attached to the assertion itself.
  pub note: Option<String>,
  pub uncertain: bool,
}

impl AssertionInput {
  pub fn new(
    origin: impl Into<String>,
    subject: NodeRef,
    predicate: PredicateRef,
    object: NodeRef,
    authority: NodeId,
  ) -> Self {
    Self {
      origin: origin.into(),
      subject,
      predicate,
      object,
      authority,
      source: None,
      note: None,
      uncertain: false,
    }
  }

  pub fn with_source(mut self, source: NodeId) -> Self {
    self.source = Some(source);
    self
  }

  pub fn with_note(mut self, note: impl Into<String>) -> Self {
    self.note = Some(note.into());
    self
  }

  pub fn with_uncertain(mut self, uncertain: bool) -> Self {
    self.uncertain = uncertain;
    self
  }
}

/// What one builder call resolved to.
#[derive(Debug, Clone, Copy)]
pub struct AssertionOutcome {
  pub assertion: NodeId,
  pub subject:   NodeId,
  pub object:    NodeId,
  /// `true` when this call created the assertion rather than matching it.
  pub created:   bool,
}

// ─── Builder ─────────────────────────────────────────────────────────────────

impl<S: GraphSession> ImportContext<S> {
  /// Record a claim, idempotently: match the full (subject, predicate,
  /// object, authority, source) tuple first, create only if absent.
  ///
  /// Pattern slots are declared most-selective-first — explicit source,
  /// then authority, then whichever ends are pre-resolved, then the
  /// assertion itself (narrowed by its predicate property), with any
  /// to-be-created end always last.
  pub async fn assert_fact(&mut self, input: AssertionInput) -> Result<AssertionOutcome> {
    if matches!(input.subject, NodeRef::New(_)) && matches!(input.object, NodeRef::New(_)) {
      return Err(Error::UnanchoredAssertion { origin: input.origin });
    }

    let mut pattern = GraphPattern::new();

    let source_slot = input.source.map(|s| pattern.bound(s));
    let authority_slot = pattern.bound(input.authority);

    let mut subject_slot = match &input.subject {
      NodeRef::Existing(id) => Some(pattern.bound(*id)),
      NodeRef::New(_) => None,
    };
    let mut object_slot = match &input.object {
      NodeRef::Existing(id) => Some(pattern.bound(*id)),
      NodeRef::New(_) => None,
    };

    let mut spec = NodeSpec::new(EntityClass::Assertion)
      .with("predicate", input.predicate.key())
      .on_create("origin", input.origin.as_str());
    if let Some(note) = &input.note {
      spec = spec.on_create("note", note.as_str());
    }
    if input.uncertain {
      spec = spec.on_create("uncertain", "true");
    }
    if input.source.is_none() {
      // A sourceless claim must not match a sourced one.
      spec = spec.without(Predicate::WasMotivatedBy);
    }
    let assertion_slot = pattern.spec(spec);

    if subject_slot.is_none() {
      if let NodeRef::New(spec) = input.subject {
        subject_slot = Some(pattern.spec(spec));
      }
    }
    if object_slot.is_none() {
      if let NodeRef::New(spec) = input.object {
        object_slot = Some(pattern.spec(spec));
      }
    }

    // Slots are all present by now; the matches above are exhaustive.
    let (subject_slot, object_slot) = match (subject_slot, object_slot) {
      (Some(s), Some(o)) => (s, o),
      _ => {
        return Err(Error::UnanchoredAssertion { origin: input.origin });
      }
    };

    pattern.edge(Predicate::AssignedAttributeTo, assertion_slot, subject_slot);
    pattern.edge(Predicate::Assigned, assertion_slot, object_slot);
    pattern.edge(Predicate::CarriedOutBy, assertion_slot, authority_slot);
    if let Some(source_slot) = source_slot {
      pattern.edge(Predicate::WasMotivatedBy, assertion_slot, source_slot);
    }

    let (binding, created) = self.find_or_create(&pattern).await?;
    let assertion = binding.node(assertion_slot);

    if created {
      self.created_assertions += 1;
    } else if let Some(note) = &input.note {
      // Assertions are immutable after creation except for descriptive
      // notes, which may be attached late.
      let existing = self
        .store()
        .node_property(assertion, "note")
        .await
        .map_err(Error::store)?;
      if existing.is_none() {
        self
          .store()
          .set_node_property(assertion, "note", note)
          .await
          .map_err(Error::store)?;
      }
    }

    Ok(AssertionOutcome {
      assertion,
      subject: binding.node(subject_slot),
      object: binding.node(object_slot),
      created,
    })
  }
}
