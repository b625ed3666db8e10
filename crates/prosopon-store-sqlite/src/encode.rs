//! Encoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings; UUIDs are hyphenated lowercase; classes
//! and edge labels are their fully-qualified ontology strings.

use chrono::{DateTime, Utc};
use prosopon_core::graph::NodeId;
use uuid::Uuid;

use crate::Result;

pub fn encode_node_id(id: NodeId) -> String {
  id.0.hyphenated().to_string()
}

pub fn decode_node_id(s: &str) -> Result<NodeId> {
  Ok(NodeId(Uuid::parse_str(s)?))
}

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339()
}
