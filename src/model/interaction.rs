// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::NodeId;
use super::node::Point;

/// An in-flight drag gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    node_id: NodeId,
    offset: Point,
}

impl DragState {
    pub fn new(node_id: NodeId, offset: Point) -> Self {
        Self { node_id, offset }
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    /// Pointer position minus node position, captured at pointer-down.
    pub fn offset(&self) -> Point {
        self.offset
    }
}

/// Selection and drag state for the active map.
///
/// Both fields always refer to nodes of the active map; switching maps resets them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionState {
    selected: Option<NodeId>,
    drag: Option<DragState>,
}

impl InteractionState {
    pub fn selected(&self) -> Option<&NodeId> {
        self.selected.as_ref()
    }

    pub fn select(&mut self, node_id: Option<NodeId>) {
        self.selected = node_id;
    }

    pub fn drag(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn begin_drag(&mut self, drag: DragState) {
        self.drag = Some(drag);
    }

    pub fn take_drag(&mut self) -> Option<DragState> {
        self.drag.take()
    }

    /// Drops selection/drag references to any of `removed`.
    pub fn forget(&mut self, removed: &[NodeId]) {
        if self
            .selected
            .as_ref()
            .is_some_and(|selected| removed.contains(selected))
        {
            self.selected = None;
        }
        if self
            .drag
            .as_ref()
            .is_some_and(|drag| removed.contains(drag.node_id()))
        {
            self.drag = None;
        }
    }

    pub fn reset(&mut self) {
        self.selected = None;
        self.drag = None;
    }
}
