//! End-to-end tests for the import engine against an in-memory graph store.

use prosopon_catalog::Catalog;
use prosopon_core::{
  dataset::{BoulloterionRecord, ImportSet},
  factoid::{DeathRecord, Factoid, FactoidValue},
  graph::{GraphPattern, GraphSession, NodeSpec},
  ontology::{EntityClass, Predicate, VocabCategory},
  person::{PersonKey, PersonRecord},
};
use prosopon_store_sqlite::SqliteGraph;

use crate::{driver, ImportContext};

// ─── Fixtures ────────────────────────────────────────────────────────────────

fn catalog() -> Catalog {
  Catalog::from_json(
    r#"{
      "vocabulary": {
        "genders": ["Male", "Female", "Eunuch"],
        "legal_designations": ["slave", "monk"]
      },
      "sources": {
        "entries": {
          "Anna Komnene": {
            "author": { "name": "Anna", "code": 62 },
            "editors": [{ "name": "Diether Roderich Reinsch", "viaf": "54179635" }],
            "work": "Alexias",
            "expression": "Reinsch-Kambylis 2001"
          },
          "Skylitzes": {
            "editors": [],
            "work": "Synopsis Historion",
            "expression": "Thurn 1973"
          },
          "Eustathios Romaios Peira": {
            "editors": [{ "name": "Ioannes Zepos", "viaf": "27141373" }],
            "work": "Peira",
            "expression": "Zepos 1931"
          },
          "Eustathios Romaios Schminck": {
            "editors": [{ "name": "Andreas Schminck", "viaf": "23989486" }],
            "work": "Vier mittelbyzantinische Rechtsbuecher",
            "expression": "Schminck 1986"
          },
          "Seibt, Bleisiegel": {
            "editors": [{ "name": "Werner Seibt", "viaf": "2526327" }],
            "work": "Die byzantinischen Bleisiegel in Oesterreich",
            "expression": "Seibt 1978"
          }
        },
        "aggregates": {
          "Eustathios Romaios": [
            { "key": "Eustathios Romaios Peira",
              "rule": { "kind": "prefix", "value": "Peira" } },
            { "key": "Eustathios Romaios Schminck",
              "rule": { "kind": "regex", "value": "^Schminck( [IVX]+)?" } }
          ]
        },
        "boulloterion_fallbacks": {
          "99": { "source": "Seibt, Bleisiegel", "reference": "no. 12" }
        }
      }
    }"#,
  )
  .expect("test catalog")
}

fn person(name: &str, code: u32) -> PersonRecord {
  PersonRecord {
    key: PersonKey::new(name, code),
    display_name: None,
    name_in_orig_lang: None,
    gender: String::new(),
    description: None,
    floruit: None,
    factoids: Vec::new(),
  }
}

fn text_factoid(id: u64, source: &str, source_ref: &str, value: FactoidValue) -> Factoid {
  Factoid {
    id,
    source: source.into(),
    source_ref: source_ref.into(),
    original_text: None,
    boulloterion: None,
    uncertain: false,
    value,
  }
}

async fn run(store: &SqliteGraph, dataset: &ImportSet) -> driver::RunReport {
  let mut ctx = ImportContext::init(store.clone(), catalog())
    .await
    .expect("context init");
  driver::run(&mut ctx, dataset).await.expect("run")
}

async fn assertion_count(store: &SqliteGraph) -> u64 {
  store.count_nodes(EntityClass::Assertion).await.unwrap()
}

// ─── Idempotence ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn second_run_creates_no_new_assertions() {
  let store = SqliteGraph::open_in_memory().await.unwrap();

  let mut alexios = person("Alexios", 1);
  alexios.gender = "Male".into();
  alexios.factoids = vec![
    text_factoid(
      1,
      "Anna Komnene",
      "XV.11",
      FactoidValue::Death(Some(DeathRecord { date: "1118 August 15".into(), note: None })),
    ),
    text_factoid(2, "Anna Komnene", "I.1", FactoidValue::Ethnicity { label: "Roman".into() }),
    text_factoid(3, "Anna Komnene", "III.4", FactoidValue::Dignity {
      label: "megas domestikos".into(),
    }),
  ];
  let dataset = ImportSet { persons: vec![alexios], boulloteria: Default::default() };

  let first = run(&store, &dataset).await;
  assert!(first.assertions_created > 0);
  let after_first = assertion_count(&store).await;

  let second = run(&store, &dataset).await;
  assert_eq!(second.assertions_created, 0);
  assert_eq!(assertion_count(&store).await, after_first);
}

// ─── Identity stability ──────────────────────────────────────────────────────

#[tokio::test]
async fn identified_entities_are_stable_across_contexts() {
  let store = SqliteGraph::open_in_memory().await.unwrap();

  let mut first_ctx = ImportContext::init(store.clone(), catalog()).await.unwrap();
  let agent = first_ctx.agents().pbw;
  let first = first_ctx
    .resolve_identified_entity(EntityClass::Person, agent, "Alexios 1", "Alexios")
    .await
    .unwrap();

  // A fresh context simulates a separate run over the same store.
  let mut second_ctx = ImportContext::init(store.clone(), catalog()).await.unwrap();
  let agent = second_ctx.agents().pbw;
  let second = second_ctx
    .resolve_identified_entity(EntityClass::Person, agent, "Alexios 1", "Alexios")
    .await
    .unwrap();

  assert_eq!(first, second);
  assert_eq!(store.count_nodes(EntityClass::Person).await.unwrap(), 2);
  // (the default seal editor is the other person node)
}

#[tokio::test]
async fn display_name_correction_does_not_fork_identity() {
  let store = SqliteGraph::open_in_memory().await.unwrap();
  let mut ctx = ImportContext::init(store.clone(), catalog()).await.unwrap();
  let agent = ctx.agents().pbw;

  let first = ctx
    .resolve_identified_entity(EntityClass::Person, agent, "Maria 1", "Maria")
    .await
    .unwrap();

  let mut fresh = ImportContext::init(store.clone(), catalog()).await.unwrap();
  let agent = fresh.agents().pbw;
  let second = fresh
    .resolve_identified_entity(EntityClass::Person, agent, "Maria 1", "Maria of Alania")
    .await
    .unwrap();

  assert_eq!(first, second);
}

// ─── Authority ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn editorless_source_gets_the_generic_default_agent() {
  let store = SqliteGraph::open_in_memory().await.unwrap();
  let mut ctx = ImportContext::init(store.clone(), catalog()).await.unwrap();

  let resolved = ctx
    .resolve_text_source("Skylitzes", "p. 341")
    .await
    .unwrap()
    .expect("catalogued source resolves");

  assert_eq!(resolved.authority, ctx.agents().generic);
}

#[tokio::test]
async fn uncatalogued_source_rejects_the_fact() {
  let store = SqliteGraph::open_in_memory().await.unwrap();

  let mut p = person("Toros", 101);
  p.factoids = vec![text_factoid(7, "Matthew of Edessa", "II.2", FactoidValue::Ethnicity {
    label: "Armenian".into(),
  })];
  let dataset = ImportSet { persons: vec![p], boulloteria: Default::default() };

  let report = run(&store, &dataset).await;
  assert_eq!(report.skipped.get("unresolved-source"), Some(&1));
  assert_eq!(store.count_nodes(EntityClass::EthnicGroup).await.unwrap(), 0);
}

// ─── Controlled vocabulary ───────────────────────────────────────────────────

#[tokio::test]
async fn ethnicity_value_node_is_shared_between_persons() {
  let store = SqliteGraph::open_in_memory().await.unwrap();

  let mut toros = person("Toros", 101);
  toros.factoids = vec![text_factoid(1, "Anna Komnene", "VI.9", FactoidValue::Ethnicity {
    label: "Armenian".into(),
  })];
  let mut gagik = person("Gagik", 102);
  gagik.factoids = vec![text_factoid(2, "Anna Komnene", "VII.2", FactoidValue::Ethnicity {
    label: "Armenian".into(),
  })];
  let dataset = ImportSet { persons: vec![toros, gagik], boulloteria: Default::default() };

  run(&store, &dataset).await;
  assert_eq!(store.count_nodes(EntityClass::EthnicGroup).await.unwrap(), 1);
}

#[tokio::test]
async fn dignity_qualifier_resolves_to_the_truncated_node() {
  let store = SqliteGraph::open_in_memory().await.unwrap();
  let mut ctx = ImportContext::init(store.clone(), catalog()).await.unwrap();

  let qualified = ctx
    .resolve_vocab(VocabCategory::Dignity, "krites of Thrace", None)
    .await
    .unwrap()
    .unwrap();
  let plain = ctx
    .resolve_vocab(VocabCategory::Dignity, "krites", None)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(qualified, plain);

  // The unstripped spelling is cached too: a second lookup hits the cache
  // without re-truncating (and without another store round trip).
  let again = ctx
    .resolve_vocab(VocabCategory::Dignity, "krites of Thrace", None)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(again, plain);
}

#[tokio::test]
async fn of_the_dignities_stay_unsplit() {
  let store = SqliteGraph::open_in_memory().await.unwrap();
  let mut ctx = ImportContext::init(store.clone(), catalog()).await.unwrap();

  let unsplit = ctx
    .resolve_vocab(VocabCategory::Dignity, "strategos of the Anatolikoi", None)
    .await
    .unwrap()
    .unwrap();
  let plain = ctx
    .resolve_vocab(VocabCategory::Dignity, "strategos", None)
    .await
    .unwrap()
    .unwrap();
  assert_ne!(unsplit, plain);
}

#[tokio::test]
async fn vocabulary_stray_is_rejected() {
  let store = SqliteGraph::open_in_memory().await.unwrap();
  let mut ctx = ImportContext::init(store.clone(), catalog()).await.unwrap();

  // "Hermaphrodite" is not in the curated gender list.
  let resolved = ctx
    .resolve_vocab(VocabCategory::Gender, "Hermaphrodite", None)
    .await
    .unwrap();
  assert!(resolved.is_none());
}

// ─── Gender ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn misspelled_gender_is_corrected_and_asserted() {
  let store = SqliteGraph::open_in_memory().await.unwrap();

  let mut basileios = person("Basileios", 11);
  basileios.gender = "Eunach".into();
  let dataset = ImportSet { persons: vec![basileios], boulloteria: Default::default() };

  run(&store, &dataset).await;

  let mut pattern = GraphPattern::new();
  pattern.spec(NodeSpec::new(EntityClass::Gender).with("value", "Eunuch"));
  assert!(store.find_pattern(&pattern).await.unwrap().is_some());
  assert_eq!(store.count_nodes(EntityClass::TypeAssignment).await.unwrap(), 1);
}

#[tokio::test]
async fn mixed_gender_produces_no_assertion() {
  let store = SqliteGraph::open_in_memory().await.unwrap();

  let mut anonymos = person("Petros", 12);
  anonymos.gender = "Mixed".into();
  let dataset = ImportSet { persons: vec![anonymos], boulloteria: Default::default() };

  run(&store, &dataset).await;
  assert_eq!(store.count_nodes(EntityClass::TypeAssignment).await.unwrap(), 0);
  assert_eq!(store.count_nodes(EntityClass::Gender).await.unwrap(), 0);
}

// ─── Death ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn death_scenario_is_idempotent_and_single_event() {
  let store = SqliteGraph::open_in_memory().await.unwrap();

  let mut alexios = person("Alexios", 1);
  alexios.factoids = vec![text_factoid(
    1,
    "Anna Komnene",
    "XV.11",
    FactoidValue::Death(Some(DeathRecord { date: "1118 August 15".into(), note: None })),
  )];
  let dataset = ImportSet { persons: vec![alexios], boulloteria: Default::default() };

  run(&store, &dataset).await;
  run(&store, &dataset).await;

  assert_eq!(store.count_nodes(EntityClass::Death).await.unwrap(), 1);
  assert_eq!(store.count_nodes(EntityClass::TimeSpan).await.unwrap(), 1);

  // The died and time-span assertions both cite the XV.11 passage.
  let mut died = GraphPattern::new();
  let passage = died.spec(
    NodeSpec::new(EntityClass::Passage)
      .with("source", "Anna Komnene")
      .with("reference", "XV.11"),
  );
  let assertion = died.spec(
    NodeSpec::new(EntityClass::Assertion).with("predicate", Predicate::WasDeathOf.code()),
  );
  died.edge(Predicate::WasMotivatedBy, assertion, passage);
  assert!(store.find_pattern(&died).await.unwrap().is_some());

  let mut dated = GraphPattern::new();
  let passage = dated.spec(
    NodeSpec::new(EntityClass::Passage)
      .with("source", "Anna Komnene")
      .with("reference", "XV.11"),
  );
  let assertion = dated.spec(
    NodeSpec::new(EntityClass::Assertion).with("predicate", Predicate::HasTimeSpan.code()),
  );
  dated.edge(Predicate::WasMotivatedBy, assertion, passage);
  assert!(store.find_pattern(&dated).await.unwrap().is_some());
}

#[tokio::test]
async fn two_sources_share_one_death_event() {
  let store = SqliteGraph::open_in_memory().await.unwrap();

  let mut alexios = person("Alexios", 1);
  alexios.factoids = vec![
    text_factoid(
      1,
      "Anna Komnene",
      "XV.11",
      FactoidValue::Death(Some(DeathRecord { date: "1118 August 15".into(), note: None })),
    ),
    text_factoid(
      2,
      "Skylitzes",
      "p. 500",
      FactoidValue::Death(Some(DeathRecord { date: String::new(), note: None })),
    ),
  ];
  let dataset = ImportSet { persons: vec![alexios], boulloteria: Default::default() };

  run(&store, &dataset).await;
  assert_eq!(store.count_nodes(EntityClass::Death).await.unwrap(), 1);
}

#[tokio::test]
async fn death_without_subrecord_is_skipped() {
  let store = SqliteGraph::open_in_memory().await.unwrap();

  let mut p = person("Leon", 5);
  p.factoids = vec![text_factoid(3, "Anna Komnene", "II.2", FactoidValue::Death(None))];
  let dataset = ImportSet { persons: vec![p], boulloteria: Default::default() };

  let report = run(&store, &dataset).await;
  assert_eq!(report.skipped.get("missing-payload"), Some(&1));
  assert_eq!(store.count_nodes(EntityClass::Death).await.unwrap(), 0);
}

// ─── Kinship ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn kinship_produces_one_group_and_two_asymmetric_assertions() {
  let store = SqliteGraph::open_in_memory().await.unwrap();

  let mut isaakios = person("Isaakios", 2);
  isaakios.factoids = vec![text_factoid(4, "Anna Komnene", "III.4", FactoidValue::Kinship {
    relation: "brother".into(),
    kin: vec![PersonKey::new("Alexios", 1)],
  })];
  let dataset = ImportSet {
    persons: vec![person("Alexios", 1), isaakios],
    boulloteria: Default::default(),
  };

  run(&store, &dataset).await;
  assert_eq!(store.count_nodes(EntityClass::KinshipGroup).await.unwrap(), 1);

  // Resolve the participants and the kinship-type term with a fresh
  // context; identity stability makes the ids comparable.
  let mut ctx = ImportContext::init(store.clone(), catalog()).await.unwrap();
  let isaakios_node = ctx
    .resolve_person(&PersonKey::new("Isaakios", 2), "Isaakios")
    .await
    .unwrap();
  let alexios_node = ctx
    .resolve_person(&PersonKey::new("Alexios", 1), "Alexios")
    .await
    .unwrap();
  let brother = ctx
    .resolve_vocab(VocabCategory::KinshipType, "brother", None)
    .await
    .unwrap()
    .unwrap();

  // The primary person's membership carries the specific relation.
  let mut specific = GraphPattern::new();
  let subject = specific.bound(isaakios_node);
  let assertion = specific.spec(
    NodeSpec::new(EntityClass::Assertion).with("predicate", format!("term:{brother}")),
  );
  specific.edge(Predicate::AssignedAttributeTo, assertion, subject);
  assert!(store.find_pattern(&specific).await.unwrap().is_some());

  // The kin's membership is generic.
  let mut generic = GraphPattern::new();
  let subject = generic.bound(alexios_node);
  let assertion = generic.spec(
    NodeSpec::new(EntityClass::Assertion).with("predicate", Predicate::MemberOf.code()),
  );
  generic.edge(Predicate::AssignedAttributeTo, assertion, subject);
  assert!(store.find_pattern(&generic).await.unwrap().is_some());

  // And not the other way round.
  let mut inverted = GraphPattern::new();
  let subject = inverted.bound(isaakios_node);
  let assertion = inverted.spec(
    NodeSpec::new(EntityClass::Assertion).with("predicate", Predicate::MemberOf.code()),
  );
  inverted.edge(Predicate::AssignedAttributeTo, assertion, subject);
  assert!(store.find_pattern(&inverted).await.unwrap().is_none());
}

#[tokio::test]
async fn self_kinship_is_rejected() {
  let store = SqliteGraph::open_in_memory().await.unwrap();

  let mut p = person("Nikephoros", 3);
  p.factoids = vec![text_factoid(5, "Anna Komnene", "IV.1", FactoidValue::Kinship {
    relation: "uncle".into(),
    kin: vec![PersonKey::new("Nikephoros", 3)],
  })];
  let dataset = ImportSet { persons: vec![p], boulloteria: Default::default() };

  let report = run(&store, &dataset).await;
  assert_eq!(report.skipped.get("self-kinship"), Some(&1));
  assert_eq!(store.count_nodes(EntityClass::KinshipGroup).await.unwrap(), 0);
}

// ─── Aggregate sources ───────────────────────────────────────────────────────

#[tokio::test]
async fn aggregate_source_splits_into_distinct_expressions() {
  let store = SqliteGraph::open_in_memory().await.unwrap();

  let mut p = person("Eudokia", 4);
  p.factoids = vec![
    text_factoid(8, "Eustathios Romaios", "Peira 14.22", FactoidValue::Dignity {
      label: "patrikia".into(),
    }),
    text_factoid(9, "Eustathios Romaios", "Schminck II 3", FactoidValue::Dignity {
      label: "zoste patrikia".into(),
    }),
  ];
  let dataset = ImportSet { persons: vec![p], boulloteria: Default::default() };

  let report = run(&store, &dataset).await;
  assert!(report.sources_used.contains("Eustathios Romaios Peira"));
  assert!(report.sources_used.contains("Eustathios Romaios Schminck"));
  assert_eq!(store.count_nodes(EntityClass::Expression).await.unwrap(), 2);

  // The matched literal is stripped from the stored reference.
  let mut passage = GraphPattern::new();
  passage.spec(
    NodeSpec::new(EntityClass::Passage)
      .with("source", "Eustathios Romaios Peira")
      .with("reference", "14.22"),
  );
  assert!(store.find_pattern(&passage).await.unwrap().is_some());
}

// ─── Seals ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn seal_fact_cites_the_inscription() {
  let store = SqliteGraph::open_in_memory().await.unwrap();

  let mut p = person("Symeon", 21);
  p.factoids = vec![Factoid {
    id: 10,
    source: "Seals".into(),
    source_ref: String::new(),
    original_text: None,
    boulloterion: Some(204),
    uncertain: false,
    value: FactoidValue::Dignity { label: "protospatharios".into() },
  }];
  let mut dataset = ImportSet { persons: vec![p], boulloteria: Default::default() };
  dataset.boulloteria.insert(204, BoulloterionRecord {
    number: 204,
    inscription: "Lord, help your servant Symeon protospatharios".into(),
    publications: vec![prosopon_core::dataset::Publication {
      source:    "Seibt, Bleisiegel".into(),
      reference: "no. 87".into(),
    }],
  });

  run(&store, &dataset).await;

  assert_eq!(store.count_nodes(EntityClass::Boulloterion).await.unwrap(), 1);
  assert_eq!(store.count_nodes(EntityClass::Inscription).await.unwrap(), 1);

  // The dignity assertion is sourced from the inscription node.
  let mut pattern = GraphPattern::new();
  let inscription = pattern.spec(
    NodeSpec::new(EntityClass::Inscription).with("boulloterion", "204"),
  );
  let assertion = pattern.spec(
    NodeSpec::new(EntityClass::Assertion).with("predicate", Predicate::IsDefinedBy.code()),
  );
  pattern.edge(Predicate::WasMotivatedBy, assertion, inscription);
  assert!(store.find_pattern(&pattern).await.unwrap().is_some());
}

#[tokio::test]
async fn unpublished_boulloterion_uses_registered_fallback() {
  let store = SqliteGraph::open_in_memory().await.unwrap();

  let mut p = person("Theophano", 22);
  p.factoids = vec![Factoid {
    id: 11,
    source: "Seals".into(),
    source_ref: String::new(),
    original_text: None,
    boulloterion: Some(99),
    uncertain: false,
    value: FactoidValue::Occupation { label: "weaver".into() },
  }];
  let mut dataset = ImportSet { persons: vec![p], boulloteria: Default::default() };
  dataset.boulloteria.insert(99, BoulloterionRecord {
    number: 99,
    inscription: "Theophano".into(),
    publications: Vec::new(),
  });

  let report = run(&store, &dataset).await;
  assert_eq!(report.skipped.get("unresolved-source"), None);
  assert_eq!(store.count_nodes(EntityClass::Boulloterion).await.unwrap(), 1);
}

#[tokio::test]
async fn boulloterion_without_publications_or_fallback_is_skipped() {
  let store = SqliteGraph::open_in_memory().await.unwrap();

  let mut p = person("Kale", 23);
  p.factoids = vec![Factoid {
    id: 12,
    source: "Seals".into(),
    source_ref: String::new(),
    original_text: None,
    boulloterion: Some(500),
    uncertain: false,
    value: FactoidValue::Occupation { label: "weaver".into() },
  }];
  let mut dataset = ImportSet { persons: vec![p], boulloteria: Default::default() };
  dataset.boulloteria.insert(500, BoulloterionRecord {
    number: 500,
    inscription: "Kale".into(),
    publications: Vec::new(),
  });

  let report = run(&store, &dataset).await;
  assert_eq!(report.skipped.get("unresolved-source"), Some(&1));
  assert_eq!(store.count_nodes(EntityClass::Boulloterion).await.unwrap(), 0);
}

// ─── Possessions and language ────────────────────────────────────────────────

#[tokio::test]
async fn identical_possessions_share_one_object() {
  let store = SqliteGraph::open_in_memory().await.unwrap();

  let mut a = person("Ioannes", 31);
  a.factoids = vec![text_factoid(13, "Anna Komnene", "V.5", FactoidValue::Possession {
    description: "a mill at Chonai".into(),
  })];
  let mut b = person("Georgios", 32);
  b.factoids = vec![text_factoid(14, "Anna Komnene", "V.6", FactoidValue::Possession {
    description: "a mill at Chonai".into(),
  })];
  let dataset = ImportSet { persons: vec![a, b], boulloteria: Default::default() };

  run(&store, &dataset).await;
  assert_eq!(
    store.count_nodes(EntityClass::HumanMadeObject).await.unwrap(),
    1
  );
}

#[tokio::test]
async fn language_skill_builds_the_two_hop_chain() {
  let store = SqliteGraph::open_in_memory().await.unwrap();

  let mut p = person("Gregorios", 33);
  p.factoids = vec![text_factoid(15, "Anna Komnene", "VI.1", FactoidValue::LanguageSkill {
    language: "Georgian".into(),
  })];
  let dataset = ImportSet { persons: vec![p], boulloteria: Default::default() };

  run(&store, &dataset).await;
  run(&store, &dataset).await;

  assert_eq!(store.count_nodes(EntityClass::Skill).await.unwrap(), 1);
  assert_eq!(store.count_nodes(EntityClass::KnowHow).await.unwrap(), 1);
  assert_eq!(store.count_nodes(EntityClass::Language).await.unwrap(), 1);
}

// ─── Revision bookkeeping ────────────────────────────────────────────────────

#[tokio::test]
async fn empty_sweep_rolls_back_the_revision_marker() {
  let store = SqliteGraph::open_in_memory().await.unwrap();

  let dataset = ImportSet::default();
  let report = run(&store, &dataset).await;

  assert!(report.revision.is_none());
  assert_eq!(store.count_nodes(EntityClass::Revision).await.unwrap(), 0);
}

#[tokio::test]
async fn productive_run_keeps_one_revision_and_documents_everything() {
  let store = SqliteGraph::open_in_memory().await.unwrap();

  let mut p = person("Alexios", 1);
  p.factoids = vec![text_factoid(16, "Anna Komnene", "I.1", FactoidValue::Ethnicity {
    label: "Roman".into(),
  })];
  let dataset = ImportSet { persons: vec![p], boulloteria: Default::default() };

  let first = run(&store, &dataset).await;
  assert!(first.revision.is_some());
  assert_eq!(store.count_nodes(EntityClass::Revision).await.unwrap(), 1);

  let undocumented = store
    .nodes_without_incoming(EntityClass::Assertion, Predicate::Documents)
    .await
    .unwrap();
  assert!(undocumented.is_empty());

  // A second, unproductive run rolls its marker back.
  let second = run(&store, &dataset).await;
  assert!(second.revision.is_none());
  assert_eq!(store.count_nodes(EntityClass::Revision).await.unwrap(), 1);
}

// ─── Placeholders and unmodeled kinds ────────────────────────────────────────

#[tokio::test]
async fn anonymous_group_records_are_skipped() {
  let store = SqliteGraph::open_in_memory().await.unwrap();

  let dataset = ImportSet {
    persons: vec![person("Anonymi", 6001), person("Alexios", 1)],
    boulloteria: Default::default(),
  };
  let report = run(&store, &dataset).await;
  assert_eq!(report.persons, 1);
}

#[tokio::test]
async fn unmodeled_kinds_are_counted_not_erred() {
  let store = SqliteGraph::open_in_memory().await.unwrap();

  let mut p = person("Psellos", 61);
  p.factoids = vec![text_factoid(17, "Anna Komnene", "Prol.", FactoidValue::Education {
    text: "studied rhetoric".into(),
  })];
  let dataset = ImportSet { persons: vec![p], boulloteria: Default::default() };

  let report = run(&store, &dataset).await;
  assert_eq!(report.not_modeled, 1);
  assert!(report.skipped.is_empty());
}
