// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Pointer-driven selection and drag.
//!
//! All functions take the interaction state explicitly, so gestures can be replayed in tests
//! without a rendering surface. Pointer coordinates are map coordinates.

use crate::model::{DragState, InteractionState, MindMap, NodeId, Point, Settings};

/// Rounds `value` to the nearest multiple of `grid`.
pub fn snap_value(value: f64, grid: f64) -> f64 {
    if grid <= 0.0 {
        return value;
    }
    (value / grid).round() * grid
}

pub fn snap_point(point: Point, grid: f64) -> Point {
    Point::new(snap_value(point.x, grid), snap_value(point.y, grid))
}

/// Applies the configured snapping (if any) to `point`.
pub fn snapped(point: Point, settings: &Settings) -> Point {
    match settings.active_grid() {
        Some(grid) => snap_point(point, grid),
        None => point,
    }
}

/// The top-most node under `point`. Later nodes are drawn over earlier ones.
pub fn node_at(map: &MindMap, point: Point) -> Option<NodeId> {
    map.nodes()
        .values()
        .rev()
        .find(|node| node.contains(point))
        .map(|node| node.node_id().clone())
}

/// Handles pointer-down: selects the node under the pointer and starts dragging it, or clears
/// the selection when the pointer is over empty canvas. Returns the hit node.
pub fn pointer_down(
    map: &MindMap,
    interaction: &mut InteractionState,
    pointer: Point,
) -> Option<NodeId> {
    let Some(node_id) = node_at(map, pointer) else {
        interaction.take_drag();
        interaction.select(None);
        return None;
    };

    let offset = map
        .node(&node_id)
        .map(|node| pointer - node.position())
        .unwrap_or_default();
    interaction.select(Some(node_id.clone()));
    interaction.begin_drag(DragState::new(node_id.clone(), offset));
    Some(node_id)
}

/// Handles pointer-move: repositions the dragged node to `pointer - offset` (snapped when
/// enabled). Returns the new position, or `None` if no drag is in progress.
///
/// This is a transient update; the caller persists only when the gesture ends.
pub fn pointer_move(
    map: &mut MindMap,
    interaction: &InteractionState,
    settings: &Settings,
    pointer: Point,
) -> Option<Point> {
    let drag = interaction.drag()?;
    let node = map.node_mut(drag.node_id())?;
    let position = snapped(pointer - drag.offset(), settings);
    node.set_position(position);
    Some(position)
}

/// Handles pointer-up or pointer-leave: ends the gesture and returns the node whose final
/// position should be persisted.
pub fn pointer_up(interaction: &mut InteractionState) -> Option<NodeId> {
    interaction
        .take_drag()
        .map(|drag| drag.node_id().clone())
}
