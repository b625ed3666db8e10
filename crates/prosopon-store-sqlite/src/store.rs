//! [`SqliteGraph`] — the SQLite implementation of
//! [`GraphSession`](prosopon_core::graph::GraphSession).
//!
//! Pattern matching assigns pattern slots in declared order, narrowing each
//! slot's candidates in SQL by class, identity properties, and every edge
//! whose other endpoint is already assigned. Callers order their patterns
//! most-selective-first, so the first slots cut the search space before the
//! open-ended ones are enumerated.

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use prosopon_core::{
  graph::{GraphPattern, GraphSession, NodeId, PatternBinding, PatternNode},
  ontology::{EntityClass, Predicate},
};

use crate::{
  encode::{decode_node_id, encode_dt, encode_node_id},
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A labelled property graph backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteGraph {
  conn: tokio_rusqlite::Connection,
}

impl SqliteGraph {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Verify that every bound slot of the pattern exists in the store.
  /// A missing bound node is a caller bug, reported as such.
  async fn ensure_bound(&self, pattern: &GraphPattern) -> Result<()> {
    let ids: Vec<String> = pattern
      .nodes
      .iter()
      .filter_map(|n| match n {
        PatternNode::Bound(id) => Some(encode_node_id(*id)),
        PatternNode::Spec(_) => None,
      })
      .collect();

    let missing: Option<String> = self
      .conn
      .call(move |conn| {
        for id in &ids {
          let exists: bool = conn
            .query_row(
              "SELECT 1 FROM nodes WHERE node_id = ?1",
              rusqlite::params![id],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
          if !exists {
            return Ok(Some(id.clone()));
          }
        }
        Ok(None)
      })
      .await?;

    match missing {
      Some(id) => Err(Error::BoundNodeNotFound(Uuid::parse_str(&id)?)),
      None => Ok(()),
    }
  }
}

// ─── Synchronous matching helpers ────────────────────────────────────────────

/// Candidate node ids for pattern slot `index`, narrowed by class, identity
/// properties, and edges to already-assigned slots. Creation order keeps the
/// result deterministic.
fn candidates(
  conn: &rusqlite::Connection,
  pattern: &GraphPattern,
  assigned: &[Option<String>],
  index: usize,
) -> rusqlite::Result<Vec<String>> {
  let spec = match &pattern.nodes[index] {
    PatternNode::Bound(id) => return Ok(vec![id.0.hyphenated().to_string()]),
    PatternNode::Spec(spec) => spec,
  };

  let mut sql = String::from("SELECT n.node_id FROM nodes n WHERE n.class = ?");
  let mut params: Vec<String> = vec![spec.class.qualified().to_string()];

  for (key, value) in &spec.identity {
    sql.push_str(
      " AND EXISTS (SELECT 1 FROM node_props p \
       WHERE p.node_id = n.node_id AND p.key = ? AND p.value = ?)",
    );
    params.push(key.clone());
    params.push(value.clone());
  }

  for label in &spec.without {
    sql.push_str(
      " AND NOT EXISTS (SELECT 1 FROM edges e \
       WHERE e.from_node = n.node_id AND e.label = ?)",
    );
    params.push(label.qualified().to_string());
  }

  // Every edge whose other endpoint is already assigned becomes a filter.
  for edge in &pattern.edges {
    if edge.from == index {
      if let Some(Some(other)) = assigned.get(edge.to) {
        sql.push_str(
          " AND EXISTS (SELECT 1 FROM edges e \
           WHERE e.from_node = n.node_id AND e.label = ? AND e.to_node = ?)",
        );
        params.push(edge.label.qualified().to_string());
        params.push(other.clone());
      }
    } else if edge.to == index {
      if let Some(Some(other)) = assigned.get(edge.from) {
        sql.push_str(
          " AND EXISTS (SELECT 1 FROM edges e \
           WHERE e.to_node = n.node_id AND e.label = ? AND e.from_node = ?)",
        );
        params.push(edge.label.qualified().to_string());
        params.push(other.clone());
      }
    }
  }

  sql.push_str(" ORDER BY n.created_at, n.node_id");

  let mut stmt = conn.prepare(&sql)?;
  let rows = stmt
    .query_map(rusqlite::params_from_iter(params.iter()), |row| row.get(0))?
    .collect::<rusqlite::Result<Vec<String>>>()?;
  Ok(rows)
}

fn edge_exists(
  conn: &rusqlite::Connection,
  label: Predicate,
  from: &str,
  to: &str,
) -> rusqlite::Result<bool> {
  let found: bool = conn
    .query_row(
      "SELECT 1 FROM edges WHERE label = ?1 AND from_node = ?2 AND to_node = ?3",
      rusqlite::params![label.qualified(), from, to],
      |_| Ok(true),
    )
    .optional()?
    .unwrap_or(false);
  Ok(found)
}

/// Whether slot `index`, tentatively set to its candidate, is consistent with
/// every edge whose other endpoint is already assigned. Candidate generation
/// covers this for spec slots; bound slots need the explicit check.
fn edges_consistent(
  conn: &rusqlite::Connection,
  pattern: &GraphPattern,
  assigned: &[Option<String>],
  index: usize,
) -> rusqlite::Result<bool> {
  let this = match &assigned[index] {
    Some(id) => id,
    None => return Ok(false),
  };
  for edge in &pattern.edges {
    let ok = if edge.from == index {
      match assigned.get(edge.to).and_then(|a| a.as_deref()) {
        Some(other) if edge.to != index => edge_exists(conn, edge.label, this, other)?,
        _ => true,
      }
    } else if edge.to == index {
      match assigned.get(edge.from).and_then(|a| a.as_deref()) {
        Some(other) if edge.from != index => edge_exists(conn, edge.label, other, this)?,
        _ => true,
      }
    } else {
      true
    };
    if !ok {
      return Ok(false);
    }
  }
  Ok(true)
}

/// Depth-first assignment of pattern slots in declared order.
fn solve(
  conn: &rusqlite::Connection,
  pattern: &GraphPattern,
  assigned: &mut Vec<Option<String>>,
  index: usize,
) -> rusqlite::Result<bool> {
  if index == pattern.nodes.len() {
    return Ok(true);
  }

  for candidate in candidates(conn, pattern, assigned, index)? {
    assigned[index] = Some(candidate);
    if edges_consistent(conn, pattern, assigned, index)?
      && solve(conn, pattern, assigned, index + 1)?
    {
      return Ok(true);
    }
    assigned[index] = None;
  }
  Ok(false)
}

// ─── GraphSession impl ───────────────────────────────────────────────────────

impl GraphSession for SqliteGraph {
  type Error = Error;

  async fn find_pattern(&self, pattern: &GraphPattern) -> Result<Option<PatternBinding>> {
    pattern.validate().map_err(Error::Core)?;
    self.ensure_bound(pattern).await?;

    let pattern = pattern.clone();
    let found: Option<Vec<String>> = self
      .conn
      .call(move |conn| {
        let mut assigned: Vec<Option<String>> = vec![None; pattern.nodes.len()];
        if solve(conn, &pattern, &mut assigned, 0)? {
          Ok(Some(assigned.into_iter().flatten().collect()))
        } else {
          Ok(None)
        }
      })
      .await?;

    found
      .map(|ids| {
        let nodes = ids
          .iter()
          .map(|s| decode_node_id(s))
          .collect::<Result<Vec<NodeId>>>()?;
        Ok(PatternBinding { nodes })
      })
      .transpose()
  }

  async fn create_pattern(&self, pattern: &GraphPattern) -> Result<PatternBinding> {
    pattern.validate().map_err(Error::Core)?;
    self.ensure_bound(pattern).await?;

    let pattern = pattern.clone();
    let now = encode_dt(Utc::now());

    let ids: Vec<String> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let mut ids: Vec<String> = Vec::with_capacity(pattern.nodes.len());
        for node in &pattern.nodes {
          match node {
            PatternNode::Bound(id) => ids.push(id.0.hyphenated().to_string()),
            PatternNode::Spec(spec) => {
              let id = Uuid::new_v4().hyphenated().to_string();
              tx.execute(
                "INSERT INTO nodes (node_id, class, created_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![id, spec.class.qualified(), now],
              )?;
              for (key, value) in spec.identity.iter().chain(spec.on_create.iter()) {
                tx.execute(
                  "INSERT INTO node_props (node_id, key, value) VALUES (?1, ?2, ?3)",
                  rusqlite::params![id, key, value],
                )?;
              }
              ids.push(id);
            }
          }
        }

        for edge in &pattern.edges {
          let edge_id = Uuid::new_v4().hyphenated().to_string();
          tx.execute(
            "INSERT OR IGNORE INTO edges (edge_id, label, from_node, to_node, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
              edge_id,
              edge.label.qualified(),
              ids[edge.from],
              ids[edge.to],
              now,
            ],
          )?;
        }

        tx.commit()?;
        Ok(ids)
      })
      .await?;

    let nodes = ids
      .iter()
      .map(|s| decode_node_id(s))
      .collect::<Result<Vec<NodeId>>>()?;
    Ok(PatternBinding { nodes })
  }

  async fn set_node_property(&self, node: NodeId, key: &str, value: &str) -> Result<()> {
    let id = encode_node_id(node);
    let key = key.to_owned();
    let value = value.to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO node_props (node_id, key, value) VALUES (?1, ?2, ?3)
           ON CONFLICT (node_id, key) DO UPDATE SET value = excluded.value",
          rusqlite::params![id, key, value],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn node_property(&self, node: NodeId, key: &str) -> Result<Option<String>> {
    let id = encode_node_id(node);
    let key = key.to_owned();

    let value: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT value FROM node_props WHERE node_id = ?1 AND key = ?2",
              rusqlite::params![id, key],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(value)
  }

  async fn delete_node(&self, node: NodeId) -> Result<()> {
    let id = encode_node_id(node);

    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM nodes WHERE node_id = ?1", rusqlite::params![id])?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn nodes_without_incoming(
    &self,
    class: EntityClass,
    label: Predicate,
  ) -> Result<Vec<NodeId>> {
    let class_str = class.qualified().to_string();
    let label_str = label.qualified().to_string();

    let ids: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT n.node_id FROM nodes n
           WHERE n.class = ?1
             AND NOT EXISTS (SELECT 1 FROM edges e
                             WHERE e.to_node = n.node_id AND e.label = ?2)
           ORDER BY n.created_at, n.node_id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![class_str, label_str], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;

    ids.iter().map(|s| decode_node_id(s)).collect()
  }

  async fn count_nodes(&self, class: EntityClass) -> Result<u64> {
    let class_str = class.qualified().to_string();

    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM nodes WHERE class = ?1",
          rusqlite::params![class_str],
          |row| row.get(0),
        )?)
      })
      .await?;
    Ok(count as u64)
  }
}
