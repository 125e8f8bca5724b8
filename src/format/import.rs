// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Validating import of externally supplied documents.
//!
//! Documents are inspected as loose JSON values rather than deserialized into
//! [`MindMapDocument`](super::MindMapDocument): per-node fields fall back to defaults instead of
//! failing the whole import, while the top-level shape is checked strictly.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::model::{Edge, MapId, MindMap, Node, NodeColor, NodeId, Point};

#[derive(Debug)]
pub enum ImportError {
    Read {
        path: PathBuf,
        source: io::Error,
    },
    Parse {
        source: serde_json::Error,
    },
    MissingField {
        field: &'static str,
    },
    InvalidNode {
        index: usize,
        reason: &'static str,
    },
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, source } => write!(f, "cannot read {path:?}: {source}"),
            Self::Parse { source } => write!(f, "invalid JSON: {source}"),
            Self::MissingField { field } => {
                write!(f, "invalid mind map file: missing or empty `{field}`")
            }
            Self::InvalidNode { index, reason } => {
                write!(f, "invalid mind map file: node #{index} {reason}")
            }
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source } => Some(source),
            Self::MissingField { .. } | Self::InvalidNode { .. } => None,
        }
    }
}

/// Reads and validates the document at `path`.
pub fn import_file(path: &Path, now_millis: u64) -> Result<MindMap, ImportError> {
    let text = fs::read_to_string(path).map_err(|source| ImportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    import_json(&text, now_millis)
}

pub fn import_json(text: &str, now_millis: u64) -> Result<MindMap, ImportError> {
    let value: Value =
        serde_json::from_str(text).map_err(|source| ImportError::Parse { source })?;
    import_value(&value, now_millis)
}

/// Validates `value` and builds a map from it.
///
/// `now_millis` stands in for a missing `createdAt`.
pub fn import_value(value: &Value, now_millis: u64) -> Result<MindMap, ImportError> {
    let object = value
        .as_object()
        .ok_or(ImportError::MissingField { field: "id" })?;

    let map_id = non_empty_str(object.get("id"))
        .and_then(|id| MapId::new(id).ok())
        .ok_or(ImportError::MissingField { field: "id" })?;
    let name =
        non_empty_str(object.get("name")).ok_or(ImportError::MissingField { field: "name" })?;
    let records = object
        .get("nodes")
        .and_then(Value::as_array)
        .ok_or(ImportError::MissingField { field: "nodes" })?;
    let created_at = object
        .get("createdAt")
        .and_then(Value::as_u64)
        .unwrap_or(now_millis);

    let mut nodes = Vec::with_capacity(records.len());
    let mut edges = Vec::new();
    for (index, record) in records.iter().enumerate() {
        let record = record.as_object().ok_or(ImportError::InvalidNode {
            index,
            reason: "is not an object",
        })?;
        let node = node_from_record(record).ok_or(ImportError::InvalidNode {
            index,
            reason: "has no id",
        })?;
        if let Some(parent_id) = id_field(record, "parentId") {
            edges.push(Edge::new(parent_id, node.node_id().clone()));
        }
        nodes.push(node);
    }

    let mut skipped_connections = 0usize;
    if let Some(connections) = object.get("connections").and_then(Value::as_array) {
        for connection in connections {
            let endpoints = connection.as_object().and_then(|connection| {
                Some((
                    id_field(connection, "source")?,
                    id_field(connection, "target")?,
                ))
            });
            match endpoints {
                Some((source, target)) => edges.push(Edge::new(source, target)),
                None => skipped_connections += 1,
            }
        }
    }

    let (map, repairs) = MindMap::from_parts(map_id, name, created_at, nodes, edges);
    if !repairs.is_empty() || skipped_connections > 0 {
        tracing::warn!(
            map_id = %map.map_id(),
            inserted_root = repairs.inserted_root,
            duplicate_nodes = repairs.duplicate_node_ids.len(),
            duplicate_edges = repairs.duplicate_edges,
            dropped_root_edges = repairs.dropped_root_edges,
            skipped_connections,
            "repaired imported mind map"
        );
    }
    Ok(map)
}

fn node_from_record(record: &Map<String, Value>) -> Option<Node> {
    let node_id = id_field(record, "id")?;
    let text = record
        .get("text")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let position = Point::new(coordinate(record.get("x")), coordinate(record.get("y")));
    let color = record
        .get("color")
        .and_then(Value::as_str)
        .and_then(NodeColor::from_hex)
        .unwrap_or_default();
    Some(Node::new(node_id, text, position, color))
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|value| !value.trim().is_empty())
}

/// Node ids are strings; bare integers are accepted as well.
fn id_field(record: &Map<String, Value>, key: &str) -> Option<NodeId> {
    match record.get(key)? {
        Value::String(value) => NodeId::new(value.as_str()).ok(),
        Value::Number(value) if value.is_u64() || value.is_i64() => {
            NodeId::new(value.to_string()).ok()
        }
        _ => None,
    }
}

fn coordinate(value: Option<&Value>) -> f64 {
    value.and_then(Value::as_f64).unwrap_or_default()
}
