// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A workspace holds mind maps (node set + edge set) plus the interaction state and settings.

pub(crate) mod fixtures;
pub mod ids;
pub mod interaction;
pub mod mindmap;
pub mod node;
pub mod settings;
pub mod workspace;

pub use ids::{IdAllocator, IdError, MapId, NodeId, ROOT_NODE_ID};
pub use interaction::{DragState, InteractionState};
pub use mindmap::{Edge, MapRepairs, MindMap, DEFAULT_ROOT_POSITION, DEFAULT_ROOT_TEXT};
pub use node::{Node, NodeColor, Point, NODE_HEIGHT, NODE_WIDTH};
pub use settings::{Settings, DEFAULT_GRID_SIZE};
pub use workspace::Workspace;
