// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! JSON document shape shared by export, import and the store.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::MindMap;

const EXPORT_FILE_SUFFIX: &str = "_mindmap.json";
const EXPORT_FALLBACK_FILE_NAME: &str = "mindmap.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MindMapDocument {
    pub id: String,
    pub name: String,
    pub nodes: Vec<NodeDocument>,
    #[serde(default)]
    pub connections: Vec<EdgeDocument>,
    #[serde(default)]
    pub created_at: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDocument {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeDocument {
    pub source: String,
    pub target: String,
}

impl MindMapDocument {
    /// Snapshot of `map`. Every node and every stored edge (dangling ones included) is written.
    pub fn from_map(map: &MindMap) -> Self {
        let nodes = map
            .nodes()
            .values()
            .map(|node| NodeDocument {
                id: node.node_id().to_string(),
                text: node.text().to_owned(),
                x: node.position().x,
                y: node.position().y,
                color: node.color().hex().to_owned(),
                parent_id: None,
            })
            .collect();
        let connections = map
            .edges()
            .iter()
            .map(|edge| EdgeDocument {
                source: edge.source().to_string(),
                target: edge.target().to_string(),
            })
            .collect();

        Self {
            id: map.map_id().to_string(),
            name: map.name().to_owned(),
            nodes,
            connections,
            created_at: map.created_at(),
        }
    }
}

pub fn export_document(map: &MindMap) -> MindMapDocument {
    MindMapDocument::from_map(map)
}

/// Pretty-printed export document for `map`.
pub fn export_json(map: &MindMap) -> Result<String, serde_json::Error> {
    let mut out = serde_json::to_string_pretty(&export_document(map))?;
    out.push('\n');
    Ok(out)
}

/// File name for an export of a map called `name`: `<sanitized>_mindmap.json`.
///
/// The name is lowercased and every run outside `[a-z0-9]` collapses into one `_`.
pub fn export_file_name(name: &str) -> String {
    static UNSAFE_RUNS: OnceLock<Regex> = OnceLock::new();
    let pattern = UNSAFE_RUNS
        .get_or_init(|| Regex::new("[^a-z0-9]+").expect("valid file name pattern"));

    let lowered = name.to_lowercase();
    let sanitized = pattern.replace_all(&lowered, "_");
    let sanitized = sanitized.trim_matches('_');
    if sanitized.is_empty() {
        return EXPORT_FALLBACK_FILE_NAME.to_owned();
    }
    format!("{sanitized}{EXPORT_FILE_SUFFIX}")
}
