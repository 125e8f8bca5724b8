// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![cfg(test)]

use super::ids::{MapId, NodeId};
use super::mindmap::{Edge, MindMap};
use super::node::{Node, NodeColor, Point};

pub(crate) fn nid(value: &str) -> NodeId {
    NodeId::new(value).expect("node id")
}

pub(crate) fn mid(value: &str) -> MapId {
    MapId::new(value).expect("map id")
}

fn node(id: &str, text: &str, x: f64, y: f64, color: NodeColor) -> Node {
    Node::new(nid(id), text, Point::new(x, y), color)
}

/// root → {a → {a1, a2}, b}
pub(crate) fn brainstorm_map() -> MindMap {
    let mut map = MindMap::new(mid("1000"), "Brainstorm", 1_000);
    let root = NodeId::root();
    assert!(map.insert_child(&root, node("1001", "Idea A", 650.0, 300.0, NodeColor::Teal)));
    assert!(map.insert_child(&root, node("1002", "Idea B", 650.0, 200.0, NodeColor::Orange)));
    let idea_a = nid("1001");
    assert!(map.insert_child(&idea_a, node("1003", "Detail 1", 900.0, 300.0, NodeColor::Blue)));
    assert!(map.insert_child(&idea_a, node("1004", "Detail 2", 900.0, 200.0, NodeColor::Pink)));
    map
}

/// root → a → b → a (cycle introduced by hand-edited data).
pub(crate) fn cyclic_map() -> MindMap {
    let (map, _) = MindMap::from_parts(
        mid("2000"),
        "Loop",
        2_000,
        [
            node("root", "Central Idea", 400.0, 300.0, NodeColor::Purple),
            node("a", "A", 650.0, 300.0, NodeColor::Teal),
            node("b", "B", 900.0, 300.0, NodeColor::Yellow),
        ],
        [
            Edge::new(NodeId::root(), nid("a")),
            Edge::new(nid("a"), nid("b")),
            Edge::new(nid("b"), nid("a")),
        ],
    );
    map
}
