//! The fixed CIDOC-CRM / LRMoo vocabulary used by the target graph.
//!
//! Both enums are deliberately closed: every class and property the importer
//! can ever write is a variant here, so an unknown ontology code is
//! unrepresentable rather than a runtime lookup failure. Prefixes follow the
//! usual conventions — `crm:` for CIDOC-CRM, `lrmoo:` for LRMoo, `sdhss:` for
//! the social-historical extension classes, `pbw:` for entity shapes specific
//! to the source database, and `pros:` for the importer's own bookkeeping
//! nodes.

use serde::{Deserialize, Serialize};

// ─── Entity classes ──────────────────────────────────────────────────────────

/// The class of a graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityClass {
  /// A reified STAR assertion.
  Assertion,
  /// The act of an agent assigning an identifier to an entity.
  IdentifierAssignment,
  /// The act of assigning a type (used for gender classification).
  TypeAssignment,
  Person,
  /// A generic physical object (possessions).
  HumanMadeObject,
  /// The audit wrapper linking an assertion to a database revision.
  Document,
  /// The text carried by a boulloterion.
  Inscription,
  /// An identifying agency or editorial collective.
  Actor,
  /// A name or identifying description.
  Appellation,
  Identifier,
  TimeSpan,
  Language,
  Death,
  /// An ad-hoc collective of modern scholars sharing authority for a claim.
  Group,
  /// A seal-die, keyed by its catalogue number.
  Boulloterion,
  /// A 2-member group representing one attested kinship relation.
  KinshipGroup,
  /// The abstract literary work.
  Work,
  /// A specific edition of a work, keyed by citation.
  Expression,
  /// A cited span within an expression (the page/locus reference).
  Passage,
  /// Timestamped marker for one importer run.
  Revision,

  // Controlled-vocabulary value classes, one per category.
  Gender,
  EthnicGroup,
  ReligiousIdentity,
  SocialRole,
  Occupation,
  /// Legal designations (slave, monastic and clerical ranks).
  SocialQuality,
  KinshipType,
  Skill,
  KnowHow,
}

impl EntityClass {
  /// The fully-qualified label stored in the graph.
  pub fn qualified(self) -> &'static str {
    match self {
      Self::Assertion => "crm:E13_Attribute_Assignment",
      Self::IdentifierAssignment => "crm:E15_Identifier_Assignment",
      Self::TypeAssignment => "crm:E17_Type_Assignment",
      Self::Person => "crm:E21_Person",
      Self::HumanMadeObject => "crm:E22_Human-Made_Object",
      Self::Document => "crm:E31_Document",
      Self::Inscription => "crm:E34_Inscription",
      Self::Actor => "crm:E39_Actor",
      Self::Appellation => "crm:E41_Appellation",
      Self::Identifier => "crm:E42_Identifier",
      Self::TimeSpan => "crm:E52_Time-Span",
      Self::Language => "crm:E56_Language",
      Self::Death => "crm:E69_Death",
      Self::Group => "crm:E74_Group",
      Self::Boulloterion => "pbw:Boulloterion",
      Self::KinshipGroup => "pbw:Kinship_Group",
      Self::Work => "lrmoo:F1_Work",
      Self::Expression => "lrmoo:F2_Expression",
      Self::Passage => "pros:Passage",
      Self::Revision => "pros:Database_Revision",
      Self::Gender => "sdhss:C11_Gender",
      Self::EthnicGroup => "pbw:Ethnic_Group",
      Self::ReligiousIdentity => "sdhss:C23_Religious_Identity",
      Self::SocialRole => "sdhss:C12_Social_Role",
      Self::Occupation => "sdhss:C7_Occupation",
      Self::SocialQuality => "sdhss:C1_Social_Quality_of_an_Actor",
      Self::KinshipType => "sdhss:C4_Kinship",
      Self::Skill => "sdhss:C21_Skill",
      Self::KnowHow => "sdhss:C29_Know-How",
    }
  }
}

// ─── Predicates ──────────────────────────────────────────────────────────────

/// The label of a graph edge, or the asserted property of a STAR assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Predicate {
  IsIdentifiedBy,
  HasType,
  HasTimeSpan,
  CarriedOutBy,
  WasMotivatedBy,
  /// E15 assignment → identifier value.
  AssignedIdentifier,
  HasFormerOrCurrentOwner,
  Documents,
  WasDeathOf,
  /// Membership, person → group (the generic kinship-member predicate).
  MemberOf,
  HasBroaderTerm,
  Carries,
  /// Assertion → subject.
  AssignedAttributeTo,
  /// Assertion → object.
  Assigned,
  HasComponent,
  /// E17 type assignment → classified person.
  Classified,
  /// E17 type assignment → assigned type.
  AssignedType,
  /// Expression → the work it realises.
  RealisationOf,
  WasCreatedBy,
  PertainsTo,
  IsDefinedBy,
  HasSkill,
  Concerns,
}

impl Predicate {
  /// Short code, used as the `predicate` identity property of an assertion.
  pub fn code(self) -> &'static str {
    match self {
      Self::IsIdentifiedBy => "P1",
      Self::HasType => "P2",
      Self::HasTimeSpan => "P4",
      Self::CarriedOutBy => "P14",
      Self::WasMotivatedBy => "P17",
      Self::AssignedIdentifier => "P37",
      Self::Classified => "P41",
      Self::AssignedType => "P42",
      Self::HasFormerOrCurrentOwner => "P51",
      Self::Documents => "P70",
      Self::WasDeathOf => "P100",
      Self::MemberOf => "P107i",
      Self::HasBroaderTerm => "P127",
      Self::Carries => "P128",
      Self::AssignedAttributeTo => "P140",
      Self::Assigned => "P141",
      Self::HasComponent => "P148",
      Self::RealisationOf => "R3",
      Self::WasCreatedBy => "R16i",
      Self::PertainsTo => "SP36",
      Self::IsDefinedBy => "SP35",
      Self::HasSkill => "SP38",
      Self::Concerns => "SP37",
    }
  }

  /// The fully-qualified label stored in the graph.
  pub fn qualified(self) -> &'static str {
    match self {
      Self::IsIdentifiedBy => "crm:P1_is_identified_by",
      Self::HasType => "crm:P2_has_type",
      Self::HasTimeSpan => "crm:P4_has_time-span",
      Self::CarriedOutBy => "crm:P14_carried_out_by",
      Self::WasMotivatedBy => "crm:P17_was_motivated_by",
      Self::AssignedIdentifier => "crm:P37_assigned",
      Self::Classified => "crm:P41_classified",
      Self::AssignedType => "crm:P42_assigned",
      Self::HasFormerOrCurrentOwner => "crm:P51_has_former_or_current_owner",
      Self::Documents => "crm:P70_documents",
      Self::WasDeathOf => "crm:P100_was_death_of",
      Self::MemberOf => "crm:P107i_is_current_or_former_member_of",
      Self::HasBroaderTerm => "crm:P127_has_broader_term",
      Self::Carries => "crm:P128_carries",
      Self::AssignedAttributeTo => "crm:P140_assigned_attribute_to",
      Self::Assigned => "crm:P141_assigned",
      Self::HasComponent => "crm:P148_has_component",
      Self::RealisationOf => "lrmoo:R3_is_realisation_of",
      Self::WasCreatedBy => "lrmoo:R16i_was_created_by",
      Self::PertainsTo => "sdhss:P36_pertains_to",
      Self::IsDefinedBy => "sdhss:P35_is_defined_by",
      Self::HasSkill => "sdhss:P38_has_skill",
      Self::Concerns => "sdhss:P37_concerns",
    }
  }
}

// ─── Controlled-vocabulary categories ────────────────────────────────────────

/// The closed set of controlled-vocabulary categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VocabCategory {
  Gender,
  Ethnicity,
  Religion,
  Language,
  Dignity,
  SocietyRole,
  KinshipType,
}

impl VocabCategory {
  /// The node class a value of this category is created as.
  ///
  /// Society-role values may be rerouted to [`EntityClass::SocialQuality`]
  /// by the registry when the label is a legal designation; this is the
  /// default class only.
  pub fn target_class(self) -> EntityClass {
    match self {
      Self::Gender => EntityClass::Gender,
      Self::Ethnicity => EntityClass::EthnicGroup,
      Self::Religion => EntityClass::ReligiousIdentity,
      Self::Language => EntityClass::Language,
      Self::Dignity => EntityClass::SocialRole,
      Self::SocietyRole => EntityClass::Occupation,
      Self::KinshipType => EntityClass::KinshipType,
    }
  }

  /// Stable name used in cache keys and log lines.
  pub fn name(self) -> &'static str {
    match self {
      Self::Gender => "gender",
      Self::Ethnicity => "ethnicity",
      Self::Religion => "religion",
      Self::Language => "language",
      Self::Dignity => "dignity",
      Self::SocietyRole => "society-role",
      Self::KinshipType => "kinship-type",
    }
  }
}
