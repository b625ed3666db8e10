//! SQL schema for the SQLite graph store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS nodes (
    node_id     TEXT PRIMARY KEY,
    class       TEXT NOT NULL,   -- fully-qualified ontology label
    created_at  TEXT NOT NULL    -- ISO 8601 UTC; store-assigned
);

CREATE TABLE IF NOT EXISTS node_props (
    node_id  TEXT NOT NULL REFERENCES nodes(node_id) ON DELETE CASCADE,
    key      TEXT NOT NULL,
    value    TEXT NOT NULL,
    PRIMARY KEY (node_id, key)
);

-- At most one edge per (label, endpoints) triple; re-creating an existing
-- edge is a no-op, which keeps pattern creation idempotent at the edge level.
CREATE TABLE IF NOT EXISTS edges (
    edge_id     TEXT PRIMARY KEY,
    label       TEXT NOT NULL,   -- fully-qualified predicate label
    from_node   TEXT NOT NULL REFERENCES nodes(node_id) ON DELETE CASCADE,
    to_node     TEXT NOT NULL REFERENCES nodes(node_id) ON DELETE CASCADE,
    created_at  TEXT NOT NULL,
    UNIQUE (label, from_node, to_node)
);

CREATE INDEX IF NOT EXISTS nodes_class_idx    ON nodes(class);
CREATE INDEX IF NOT EXISTS node_props_kv_idx  ON node_props(key, value);
CREATE INDEX IF NOT EXISTS edges_from_idx     ON edges(from_node, label);
CREATE INDEX IF NOT EXISTS edges_to_idx       ON edges(to_node, label);

PRAGMA user_version = 1;
";
