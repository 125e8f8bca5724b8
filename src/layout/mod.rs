// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Layout and interaction control for mind maps.
//!
//! Placement of new children relative to their parent, grid snapping, and the pointer gesture
//! state machine (select, drag, release).

pub mod drag;
pub mod placement;

pub use drag::{node_at, pointer_down, pointer_move, pointer_up, snap_point, snap_value, snapped};
pub use placement::{child_offset, next_child_position, place_child, CHILD_OFFSET_X, SIBLING_STEP_Y};
