// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{MindMap, NodeId, Point};

/// Horizontal distance between a parent and its children.
pub const CHILD_OFFSET_X: f64 = 250.0;
/// Vertical step between consecutive siblings.
pub const SIBLING_STEP_Y: f64 = 100.0;

/// Offset of the `slot`-th child from its parent: first child level with the parent, then
/// alternating above/below with a growing distance.
pub fn child_offset(slot: usize) -> Point {
    let step = slot as f64 * SIBLING_STEP_Y;
    let dy = if slot % 2 == 1 { -step } else { step };
    Point::new(CHILD_OFFSET_X, dy)
}

/// Position for a new child of `parent`, given the positions of its existing children.
///
/// Starts at the slot matching the sibling count and walks forward until the slot is free, so
/// the result never coincides with an existing sibling (siblings may have been dragged or
/// deleted since they were placed).
pub fn next_child_position(parent: Point, siblings: &[Point]) -> Point {
    let mut slot = siblings.len();
    loop {
        let candidate = parent + child_offset(slot);
        if !siblings.iter().any(|sibling| *sibling == candidate) {
            return candidate;
        }
        slot += 1;
    }
}

/// Position for a new child of `parent_id` in `map`, or `None` if the parent is missing.
pub fn place_child(map: &MindMap, parent_id: &NodeId) -> Option<Point> {
    let parent = map.node(parent_id)?;
    let siblings = map
        .children(parent_id)
        .iter()
        .filter_map(|child_id| map.node(child_id))
        .map(|child| child.position())
        .collect::<Vec<_>>();
    Some(next_child_position(parent.position(), &siblings))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{child_offset, next_child_position, place_child, CHILD_OFFSET_X};
    use crate::model::fixtures::{brainstorm_map, nid};
    use crate::model::{NodeId, Point};

    #[rstest]
    #[case(0, 0.0)]
    #[case(1, -100.0)]
    #[case(2, 200.0)]
    #[case(3, -300.0)]
    #[case(4, 400.0)]
    fn child_offsets_alternate_around_the_parent(#[case] slot: usize, #[case] dy: f64) {
        assert_eq!(child_offset(slot), Point::new(CHILD_OFFSET_X, dy));
    }

    #[test]
    fn first_child_sits_level_with_parent() {
        let parent = Point::new(400.0, 300.0);
        assert_eq!(next_child_position(parent, &[]), Point::new(650.0, 300.0));
    }

    #[test]
    fn taken_slot_is_skipped_after_a_sibling_was_deleted() {
        let parent = Point::new(400.0, 300.0);
        // Slots 0 and 2 remain after slot 1 was deleted; slot 2 is the natural next pick.
        let siblings = [Point::new(650.0, 300.0), Point::new(650.0, 500.0)];
        assert_eq!(next_child_position(parent, &siblings), Point::new(650.0, 0.0));
    }

    #[test]
    fn place_child_uses_existing_children_of_the_parent() {
        let map = brainstorm_map();
        // root has two children, so the third lands at slot 2.
        assert_eq!(
            place_child(&map, &NodeId::root()),
            Some(Point::new(650.0, 500.0))
        );
        assert_eq!(place_child(&map, &nid("missing")), None);
    }
}
