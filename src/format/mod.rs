// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mind-map document export/import.
//!
//! Export emits `{ id, name, nodes, connections, createdAt }`; import accepts the same shape and
//! additionally folds per-node `parentId` entries into the edge set.

pub mod document;
pub mod import;

pub use document::{
    export_document, export_file_name, export_json, EdgeDocument, MindMapDocument, NodeDocument,
};
pub use import::{import_file, import_json, import_value, ImportError};
