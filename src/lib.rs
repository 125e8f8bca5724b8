// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mindgraph: a terminal mind-map builder.
//!
//! Maps of colored nodes joined by parent/child edges, kept in a namespaced key-value store and
//! exchanged as JSON documents. [`board::Board`] is the entry point; [`tui`] drives it
//! interactively.

pub mod board;
pub mod format;
pub mod layout;
pub mod logging;
pub mod model;
pub mod ops;
pub mod store;
pub mod tui;

pub use board::{Board, BoardError, Export};
