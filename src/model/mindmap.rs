// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, BTreeSet};

use smallvec::SmallVec;

use super::ids::{MapId, NodeId};
use super::node::{Node, NodeColor, Point};

pub const DEFAULT_ROOT_TEXT: &str = "Central Idea";
pub const DEFAULT_ROOT_POSITION: Point = Point::new(400.0, 300.0);

/// A directed parent→child relation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    source: NodeId,
    target: NodeId,
}

impl Edge {
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self { source, target }
    }

    pub fn source(&self) -> &NodeId {
        &self.source
    }

    pub fn target(&self) -> &NodeId {
        &self.target
    }

    pub fn touches(&self, node_id: &NodeId) -> bool {
        &self.source == node_id || &self.target == node_id
    }
}

type ChildList = SmallVec<[NodeId; 4]>;

/// What [`MindMap::from_parts`] had to fix to restore the map invariants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapRepairs {
    pub inserted_root: bool,
    pub duplicate_node_ids: Vec<NodeId>,
    pub duplicate_edges: usize,
    pub dropped_root_edges: usize,
}

impl MapRepairs {
    pub fn is_empty(&self) -> bool {
        !self.inserted_root
            && self.duplicate_node_ids.is_empty()
            && self.duplicate_edges == 0
            && self.dropped_root_edges == 0
    }
}

/// A named mind map: a node set plus a directed edge set.
///
/// `children` is derived from `edges` and rebuilt after every structural change. It is keyed by
/// source id, so edges whose endpoints are missing (dangling) still participate in traversal.
#[derive(Debug, Clone, PartialEq)]
pub struct MindMap {
    map_id: MapId,
    name: String,
    created_at: u64,
    nodes: BTreeMap<NodeId, Node>,
    edges: Vec<Edge>,
    children: BTreeMap<NodeId, ChildList>,
}

impl MindMap {
    pub fn new(map_id: MapId, name: impl Into<String>, created_at: u64) -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(NodeId::root(), default_root());
        Self {
            map_id,
            name: name.into(),
            created_at,
            nodes,
            edges: Vec::new(),
            children: BTreeMap::new(),
        }
    }

    /// Builds a map from arbitrary (possibly malformed) parts.
    ///
    /// Duplicate node ids keep the first occurrence, a missing root is re-created, edges into
    /// the root and duplicate edges are dropped. Dangling edges are kept.
    pub fn from_parts(
        map_id: MapId,
        name: impl Into<String>,
        created_at: u64,
        nodes: impl IntoIterator<Item = Node>,
        edges: impl IntoIterator<Item = Edge>,
    ) -> (Self, MapRepairs) {
        let mut repairs = MapRepairs::default();

        let mut node_map = BTreeMap::new();
        for node in nodes {
            if node_map.contains_key(node.node_id()) {
                repairs.duplicate_node_ids.push(node.node_id().clone());
                continue;
            }
            node_map.insert(node.node_id().clone(), node);
        }
        if !node_map.contains_key(&NodeId::root()) {
            node_map.insert(NodeId::root(), default_root());
            repairs.inserted_root = true;
        }

        let mut seen = BTreeSet::new();
        let mut edge_list = Vec::new();
        for edge in edges {
            if edge.target().is_root() {
                repairs.dropped_root_edges += 1;
                continue;
            }
            if !seen.insert(edge.clone()) {
                repairs.duplicate_edges += 1;
                continue;
            }
            edge_list.push(edge);
        }

        let mut map = Self {
            map_id,
            name: name.into(),
            created_at,
            nodes: node_map,
            edges: edge_list,
            children: BTreeMap::new(),
        };
        map.rebuild_children();
        (map, repairs)
    }

    pub fn map_id(&self) -> &MapId {
        &self.map_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    pub fn nodes(&self) -> &BTreeMap<NodeId, Node> {
        &self.nodes
    }

    pub fn node(&self, node_id: &NodeId) -> Option<&Node> {
        self.nodes.get(node_id)
    }

    pub fn node_mut(&mut self, node_id: &NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(node_id)
    }

    pub fn contains_node(&self, node_id: &NodeId) -> bool {
        self.nodes.contains_key(node_id)
    }

    pub fn root(&self) -> Option<&Node> {
        self.nodes.get(&NodeId::root())
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Child ids of `node_id` in edge insertion order.
    pub fn children(&self, node_id: &NodeId) -> &[NodeId] {
        self.children
            .get(node_id)
            .map(|children| children.as_slice())
            .unwrap_or(&[])
    }

    /// The source of the first edge pointing at `node_id`.
    pub fn parent_of(&self, node_id: &NodeId) -> Option<&NodeId> {
        self.edges
            .iter()
            .find(|edge| edge.target() == node_id)
            .map(Edge::source)
    }

    /// Edges whose endpoints both exist, paired with their nodes. Dangling edges are skipped.
    pub fn drawable_edges(&self) -> impl Iterator<Item = (&Node, &Node)> + '_ {
        self.edges.iter().filter_map(|edge| {
            let source = self.nodes.get(edge.source())?;
            let target = self.nodes.get(edge.target())?;
            Some((source, target))
        })
    }

    /// Inserts `node` below `parent_id` and records the `parent → node` edge.
    ///
    /// Returns false (and changes nothing) when the parent is missing, the id is taken, or the
    /// node would shadow the root.
    pub fn insert_child(&mut self, parent_id: &NodeId, node: Node) -> bool {
        if !self.nodes.contains_key(parent_id)
            || node.node_id().is_root()
            || self.nodes.contains_key(node.node_id())
        {
            return false;
        }

        let child_id = node.node_id().clone();
        self.nodes.insert(child_id.clone(), node);
        self.edges
            .push(Edge::new(parent_id.clone(), child_id.clone()));
        self.children
            .entry(parent_id.clone())
            .or_default()
            .push(child_id);
        true
    }

    /// All nodes reachable from `node_id` through child edges, excluding `node_id` itself.
    ///
    /// Traversal is iterative and tracks visited ids, so cycles introduced by imported data
    /// terminate and each reachable node is reported once. The root is never reported.
    pub fn descendants(&self, node_id: &NodeId) -> Vec<NodeId> {
        let mut visited = BTreeSet::new();
        visited.insert(node_id.clone());

        let mut out = Vec::new();
        let mut stack: Vec<&NodeId> = self.children(node_id).iter().rev().collect();
        while let Some(current) = stack.pop() {
            if current.is_root() || !visited.insert(current.clone()) {
                continue;
            }
            if self.nodes.contains_key(current) {
                out.push(current.clone());
            }
            stack.extend(self.children(current).iter().rev());
        }
        out
    }

    /// Removes `node_id`, every descendant, and every edge incident to a removed id.
    ///
    /// Returns the removed node ids (starting with `node_id`), or `None` when `node_id` is the
    /// root or not present.
    pub fn remove_subtree(&mut self, node_id: &NodeId) -> Option<Vec<NodeId>> {
        if node_id.is_root() || !self.nodes.contains_key(node_id) {
            return None;
        }

        let mut removed = Vec::with_capacity(1);
        removed.push(node_id.clone());
        removed.extend(self.descendants(node_id));

        let removed_set: BTreeSet<&NodeId> = removed.iter().collect();
        for id in &removed {
            self.nodes.remove(id);
        }
        self.edges.retain(|edge| {
            !removed_set.contains(edge.source()) && !removed_set.contains(edge.target())
        });
        self.rebuild_children();

        Some(removed)
    }

    fn rebuild_children(&mut self) {
        self.children.clear();
        for edge in &self.edges {
            self.children
                .entry(edge.source().clone())
                .or_default()
                .push(edge.target().clone());
        }
    }
}

fn default_root() -> Node {
    Node::new(
        NodeId::root(),
        DEFAULT_ROOT_TEXT,
        DEFAULT_ROOT_POSITION,
        NodeColor::Purple,
    )
}
