// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mutation operations for mind maps.
//!
//! Every operation is validated before anything changes: an `Err` leaves the workspace exactly
//! as it was. A successful apply reports a small delta the caller can use to refresh derived
//! state; persistence is the caller's concern.

use std::fmt;

use crate::layout::{place_child, snapped};
use crate::model::{MapId, MindMap, Node, NodeColor, NodeId, Point, Workspace};

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    CreateMap {
        name: String,
    },
    RenameMap {
        map_id: MapId,
        name: String,
    },
    DeleteMap {
        map_id: MapId,
    },
    SelectMap {
        map_id: MapId,
    },
    AddNode {
        map_id: MapId,
        parent_id: NodeId,
        text: String,
        color: NodeColor,
    },
    DeleteNode {
        map_id: MapId,
        node_id: NodeId,
    },
    UpdateNodeText {
        map_id: MapId,
        node_id: NodeId,
        text: String,
    },
    UpdateNodeColor {
        map_id: MapId,
        node_id: NodeId,
        color: NodeColor,
    },
    MoveNode {
        map_id: MapId,
        node_id: NodeId,
        position: Point,
    },
    /// Installs an already validated map: replaces the map with the same id (activation kept)
    /// or appends it and makes it active.
    ImportMap {
        map: Box<MindMap>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyResult {
    pub map_id: MapId,
    pub delta: Delta,
}

/// Node ids added/removed/updated within `ApplyResult::map_id`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delta {
    pub added: Vec<NodeId>,
    pub removed: Vec<NodeId>,
    pub updated: Vec<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    EmptyName,
    EmptyText,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => f.write_str("name must not be empty"),
            Self::EmptyText => f.write_str("node text must not be empty"),
        }
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpError {
    Validation(ValidationError),
    MapNotFound { map_id: MapId },
    NodeNotFound { map_id: MapId, node_id: NodeId },
    RootNotDeletable { map_id: MapId },
}

impl fmt::Display for OpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "validation failed: {err}"),
            Self::MapNotFound { map_id } => write!(f, "mind map not found (id={map_id})"),
            Self::NodeNotFound { map_id, node_id } => {
                write!(f, "node not found (map={map_id}, id={node_id})")
            }
            Self::RootNotDeletable { map_id } => {
                write!(f, "the root node cannot be deleted (map={map_id})")
            }
        }
    }
}

impl std::error::Error for OpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for OpError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

/// Applies `op` to `ws`. `now_millis` feeds id allocation and creation timestamps.
pub fn apply_op(ws: &mut Workspace, op: &Op, now_millis: u64) -> Result<ApplyResult, OpError> {
    match op {
        Op::CreateMap { name } => {
            let name = required(name, ValidationError::EmptyName)?;
            let mut map_id = ws.ids_mut().next_map_id(now_millis);
            while ws.map(&map_id).is_some() {
                map_id = ws.ids_mut().next_map_id(now_millis);
            }
            ws.upsert_map(MindMap::new(map_id.clone(), name, now_millis));
            ws.set_active_map_id(Some(map_id.clone()));
            Ok(ApplyResult {
                map_id,
                delta: Delta {
                    added: vec![NodeId::root()],
                    ..Delta::default()
                },
            })
        }
        Op::RenameMap { map_id, name } => {
            let name = required(name, ValidationError::EmptyName)?;
            let map = find_map_mut(ws, map_id)?;
            map.set_name(name);
            Ok(ApplyResult {
                map_id: map_id.clone(),
                delta: Delta::default(),
            })
        }
        Op::DeleteMap { map_id } => {
            let was_active = ws.active_map_id() == Some(map_id);
            let removed = ws.remove_map(map_id).ok_or_else(|| OpError::MapNotFound {
                map_id: map_id.clone(),
            })?;
            if was_active {
                let fallback = ws.maps().first().map(|map| map.map_id().clone());
                ws.set_active_map_id(fallback);
            }
            Ok(ApplyResult {
                map_id: map_id.clone(),
                delta: Delta {
                    removed: removed.nodes().keys().cloned().collect(),
                    ..Delta::default()
                },
            })
        }
        Op::SelectMap { map_id } => {
            find_map(ws, map_id)?;
            ws.set_active_map_id(Some(map_id.clone()));
            Ok(ApplyResult {
                map_id: map_id.clone(),
                delta: Delta::default(),
            })
        }
        Op::AddNode {
            map_id,
            parent_id,
            text,
            color,
        } => {
            let text = required(text, ValidationError::EmptyText)?;
            let position = {
                let map = find_map(ws, map_id)?;
                place_child(map, parent_id).ok_or_else(|| OpError::NodeNotFound {
                    map_id: map_id.clone(),
                    node_id: parent_id.clone(),
                })?
            };
            let node_id = fresh_node_id(ws, map_id, now_millis);
            let node = Node::new(node_id.clone(), text, position, *color);
            let map = find_map_mut(ws, map_id)?;
            if !map.insert_child(parent_id, node) {
                return Err(OpError::NodeNotFound {
                    map_id: map_id.clone(),
                    node_id: parent_id.clone(),
                });
            }
            Ok(ApplyResult {
                map_id: map_id.clone(),
                delta: Delta {
                    added: vec![node_id],
                    ..Delta::default()
                },
            })
        }
        Op::DeleteNode { map_id, node_id } => {
            if node_id.is_root() {
                return Err(OpError::RootNotDeletable {
                    map_id: map_id.clone(),
                });
            }
            let map = find_map_mut(ws, map_id)?;
            let removed = map
                .remove_subtree(node_id)
                .ok_or_else(|| OpError::NodeNotFound {
                    map_id: map_id.clone(),
                    node_id: node_id.clone(),
                })?;
            if ws.active_map_id() == Some(map_id) {
                ws.interaction_mut().forget(&removed);
            }
            Ok(ApplyResult {
                map_id: map_id.clone(),
                delta: Delta {
                    removed,
                    ..Delta::default()
                },
            })
        }
        Op::UpdateNodeText {
            map_id,
            node_id,
            text,
        } => {
            let text = required(text, ValidationError::EmptyText)?;
            find_node_mut(ws, map_id, node_id)?.set_text(text);
            Ok(updated(map_id, node_id))
        }
        Op::UpdateNodeColor {
            map_id,
            node_id,
            color,
        } => {
            find_node_mut(ws, map_id, node_id)?.set_color(*color);
            Ok(updated(map_id, node_id))
        }
        Op::MoveNode {
            map_id,
            node_id,
            position,
        } => {
            let position = snapped(*position, ws.settings());
            find_node_mut(ws, map_id, node_id)?.set_position(position);
            Ok(updated(map_id, node_id))
        }
        Op::ImportMap { map } => {
            let map = MindMap::clone(map);
            let map_id = map.map_id().clone();
            let added = map.nodes().keys().cloned().collect();
            let removed = ws
                .map(&map_id)
                .map(|old| old.nodes().keys().cloned().collect())
                .unwrap_or_default();

            if ws.upsert_map(map) {
                if ws.active_map_id() == Some(&map_id) {
                    ws.interaction_mut().reset();
                }
            } else {
                ws.set_active_map_id(Some(map_id.clone()));
            }
            Ok(ApplyResult {
                map_id,
                delta: Delta {
                    added,
                    removed,
                    ..Delta::default()
                },
            })
        }
    }
}

/// Applies `ops` in order as one batch. On the first failure the workspace is restored and the
/// error is returned together with the index of the failing op.
pub fn apply_ops(
    ws: &mut Workspace,
    ops: &[Op],
    now_millis: u64,
) -> Result<Vec<ApplyResult>, (usize, OpError)> {
    let snapshot = ws.clone();
    let mut results = Vec::with_capacity(ops.len());
    for (index, op) in ops.iter().enumerate() {
        match apply_op(ws, op, now_millis) {
            Ok(result) => results.push(result),
            Err(err) => {
                *ws = snapshot;
                return Err((index, err));
            }
        }
    }
    Ok(results)
}

/// Installs `map`; returns true when it replaced an existing map with the same id.
/// Next allocated node id not already taken in `map_id`.
fn fresh_node_id(ws: &mut Workspace, map_id: &MapId, now_millis: u64) -> NodeId {
    loop {
        let node_id = ws.ids_mut().next_node_id(now_millis);
        if !ws
            .map(map_id)
            .is_some_and(|map| map.contains_node(&node_id))
        {
            return node_id;
        }
    }
}

pub fn import_map(ws: &mut Workspace, map: MindMap) -> bool {
    let replaces = ws.map(map.map_id()).is_some();
    let map_id = map.map_id().clone();
    let op = Op::ImportMap { map: Box::new(map) };
    match apply_op(ws, &op, 0) {
        Ok(_) => replaces,
        Err(err) => {
            tracing::warn!(map_id = %map_id, error = %err, "import failed");
            false
        }
    }
}

pub fn create_map(ws: &mut Workspace, name: &str, now_millis: u64) -> Result<MapId, OpError> {
    let op = Op::CreateMap {
        name: name.to_owned(),
    };
    apply_op(ws, &op, now_millis).map(|result| result.map_id)
}

pub fn delete_map(ws: &mut Workspace, map_id: &MapId) -> Result<Vec<NodeId>, OpError> {
    let op = Op::DeleteMap {
        map_id: map_id.clone(),
    };
    apply_op(ws, &op, 0).map(|result| result.delta.removed)
}

pub fn add_node(
    ws: &mut Workspace,
    map_id: &MapId,
    parent_id: &NodeId,
    text: &str,
    color: NodeColor,
    now_millis: u64,
) -> Result<NodeId, OpError> {
    let op = Op::AddNode {
        map_id: map_id.clone(),
        parent_id: parent_id.clone(),
        text: text.to_owned(),
        color,
    };
    let mut result = apply_op(ws, &op, now_millis)?;
    Ok(result.delta.added.remove(0))
}

pub fn delete_node(
    ws: &mut Workspace,
    map_id: &MapId,
    node_id: &NodeId,
) -> Result<Vec<NodeId>, OpError> {
    let op = Op::DeleteNode {
        map_id: map_id.clone(),
        node_id: node_id.clone(),
    };
    apply_op(ws, &op, 0).map(|result| result.delta.removed)
}

pub fn update_node_text(
    ws: &mut Workspace,
    map_id: &MapId,
    node_id: &NodeId,
    text: &str,
) -> Result<(), OpError> {
    let op = Op::UpdateNodeText {
        map_id: map_id.clone(),
        node_id: node_id.clone(),
        text: text.to_owned(),
    };
    apply_op(ws, &op, 0).map(|_| ())
}

pub fn update_node_color(
    ws: &mut Workspace,
    map_id: &MapId,
    node_id: &NodeId,
    color: NodeColor,
) -> Result<(), OpError> {
    let op = Op::UpdateNodeColor {
        map_id: map_id.clone(),
        node_id: node_id.clone(),
        color,
    };
    apply_op(ws, &op, 0).map(|_| ())
}

pub fn move_node(
    ws: &mut Workspace,
    map_id: &MapId,
    node_id: &NodeId,
    position: Point,
) -> Result<Point, OpError> {
    let op = Op::MoveNode {
        map_id: map_id.clone(),
        node_id: node_id.clone(),
        position,
    };
    apply_op(ws, &op, 0)?;
    find_map(ws, map_id)?
        .node(node_id)
        .map(Node::position)
        .ok_or_else(|| OpError::NodeNotFound {
            map_id: map_id.clone(),
            node_id: node_id.clone(),
        })
}

fn required(value: &str, err: ValidationError) -> Result<&str, ValidationError> {
    if value.trim().is_empty() {
        return Err(err);
    }
    Ok(value)
}

fn updated(map_id: &MapId, node_id: &NodeId) -> ApplyResult {
    ApplyResult {
        map_id: map_id.clone(),
        delta: Delta {
            updated: vec![node_id.clone()],
            ..Delta::default()
        },
    }
}

fn find_map<'a>(ws: &'a Workspace, map_id: &MapId) -> Result<&'a MindMap, OpError> {
    ws.map(map_id).ok_or_else(|| OpError::MapNotFound {
        map_id: map_id.clone(),
    })
}

fn find_map_mut<'a>(ws: &'a mut Workspace, map_id: &MapId) -> Result<&'a mut MindMap, OpError> {
    ws.map_mut(map_id).ok_or_else(|| OpError::MapNotFound {
        map_id: map_id.clone(),
    })
}

fn find_node_mut<'a>(
    ws: &'a mut Workspace,
    map_id: &MapId,
    node_id: &NodeId,
) -> Result<&'a mut Node, OpError> {
    find_map_mut(ws, map_id)?
        .node_mut(node_id)
        .ok_or_else(|| OpError::NodeNotFound {
            map_id: map_id.clone(),
            node_id: node_id.clone(),
        })
}
