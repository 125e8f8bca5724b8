// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mind-map records in the key-value store.
//!
//! | key (after the prefix) | value                                   |
//! |------------------------|-----------------------------------------|
//! | `mindmaps`             | array of export documents               |
//! | `active_mindmap`       | active map id or `null`                 |
//! | `mindmap_settings`     | `{ "snapToGrid": .., "gridSize": .. }`  |
//! | `mindmap_nodes`        | legacy single-map node list (read only) |

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::format::{export_document, import_value, MindMapDocument};
use crate::model::{MapId, MindMap, NodeId, Settings, Workspace, DEFAULT_GRID_SIZE};

use super::storage::{Storage, StorageBackend};

pub const MINDMAPS_KEY: &str = "mindmaps";
pub const ACTIVE_MINDMAP_KEY: &str = "active_mindmap";
pub const SETTINGS_KEY: &str = "mindmap_settings";
pub const LEGACY_NODES_KEY: &str = "mindmap_nodes";

pub const DEFAULT_MAP_NAME: &str = "My Mind Map";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsJson {
    #[serde(default)]
    snap_to_grid: bool,
    #[serde(default = "default_grid_size")]
    grid_size: u32,
}

fn default_grid_size() -> u32 {
    DEFAULT_GRID_SIZE
}

impl From<&Settings> for SettingsJson {
    fn from(settings: &Settings) -> Self {
        Self {
            snap_to_grid: settings.snap_to_grid(),
            grid_size: settings.grid_size(),
        }
    }
}

impl From<SettingsJson> for Settings {
    fn from(json: SettingsJson) -> Self {
        Settings::new(json.snap_to_grid, json.grid_size)
    }
}

/// Rebuilds the workspace from `storage`.
///
/// Unreadable records are skipped with a warning. When no map survives, the legacy single-map
/// node list is migrated if present, otherwise a fresh map with only the root is created and the
/// root is selected. The active id falls back to the first map when it does not resolve.
pub fn load_workspace<B: StorageBackend>(storage: &Storage<B>, now_millis: u64) -> Workspace {
    let mut ws = Workspace::new();

    let records: Vec<Value> = storage.get(MINDMAPS_KEY, Vec::new());
    for (index, record) in records.iter().enumerate() {
        match import_value(record, now_millis) {
            Ok(map) if ws.map(map.map_id()).is_some() => {
                tracing::warn!(
                    index,
                    map_id = %map.map_id(),
                    "skipping duplicate stored mind map"
                );
            }
            Ok(map) => {
                ws.upsert_map(map);
            }
            Err(err) => {
                tracing::warn!(index, error = %err, "skipping unreadable stored mind map");
            }
        }
    }

    let mut fresh = false;
    if ws.maps().is_empty() {
        match migrate_legacy_nodes(storage, &mut ws, now_millis) {
            Some(map) => {
                tracing::info!(map_id = %map.map_id(), "migrated legacy mind map nodes");
                ws.upsert_map(map);
            }
            None => {
                let map_id = ws.ids_mut().next_map_id(now_millis);
                ws.upsert_map(MindMap::new(map_id, DEFAULT_MAP_NAME, now_millis));
                fresh = true;
            }
        }
    }

    let active = storage
        .get::<Option<String>>(ACTIVE_MINDMAP_KEY, None)
        .and_then(|id| MapId::new(id).ok())
        .filter(|id| ws.map(id).is_some())
        .or_else(|| ws.maps().first().map(|map| map.map_id().clone()));
    ws.set_active_map_id(active);
    if fresh {
        ws.interaction_mut().select(Some(NodeId::root()));
    }

    let settings: SettingsJson =
        storage.get(SETTINGS_KEY, SettingsJson::from(&Settings::default()));
    ws.set_settings(settings.into());

    tracing::debug!(maps = ws.maps().len(), fresh, "loaded workspace");
    ws
}

fn migrate_legacy_nodes<B: StorageBackend>(
    storage: &Storage<B>,
    ws: &mut Workspace,
    now_millis: u64,
) -> Option<MindMap> {
    let nodes: Vec<Value> = storage.get(LEGACY_NODES_KEY, Vec::new());
    if nodes.is_empty() {
        return None;
    }
    let map_id = ws.ids_mut().next_map_id(now_millis);
    let document = json!({
        "id": map_id.as_str(),
        "name": DEFAULT_MAP_NAME,
        "nodes": nodes,
        "createdAt": now_millis,
    });
    match import_value(&document, now_millis) {
        Ok(map) => Some(map),
        Err(err) => {
            tracing::warn!(error = %err, "ignoring unreadable legacy mind map nodes");
            None
        }
    }
}

pub fn save_maps<B: StorageBackend>(storage: &mut Storage<B>, ws: &Workspace) -> bool {
    let documents: Vec<MindMapDocument> = ws.maps().iter().map(export_document).collect();
    storage.set(MINDMAPS_KEY, &documents)
}

pub fn save_active_map<B: StorageBackend>(storage: &mut Storage<B>, ws: &Workspace) -> bool {
    storage.set(ACTIVE_MINDMAP_KEY, &ws.active_map_id().map(MapId::as_str))
}

pub fn save_settings<B: StorageBackend>(storage: &mut Storage<B>, settings: &Settings) -> bool {
    storage.set(SETTINGS_KEY, &SettingsJson::from(settings))
}

/// Writes every mind-map record. Returns whether all writes succeeded; failures are logged by
/// [`Storage::set`].
pub fn save_workspace<B: StorageBackend>(storage: &mut Storage<B>, ws: &Workspace) -> bool {
    let maps = save_maps(storage, ws);
    let active = save_active_map(storage, ws);
    let settings = save_settings(storage, ws.settings());
    maps && active && settings
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};
    use serde_json::json;

    use super::{
        load_workspace, save_workspace, ACTIVE_MINDMAP_KEY, DEFAULT_MAP_NAME, LEGACY_NODES_KEY,
        MINDMAPS_KEY, SETTINGS_KEY,
    };
    use crate::model::fixtures::{brainstorm_map, mid, nid};
    use crate::model::{NodeId, Settings, Workspace};
    use crate::store::storage::{MemoryBackend, Storage};

    #[fixture]
    fn storage() -> Storage<MemoryBackend> {
        Storage::new(MemoryBackend::new())
    }

    #[rstest]
    fn empty_store_yields_a_default_map_with_the_root_selected(storage: Storage<MemoryBackend>) {
        let ws = load_workspace(&storage, 77);
        assert_eq!(ws.maps().len(), 1);
        let map = ws.active_map().expect("active");
        assert_eq!(map.name(), DEFAULT_MAP_NAME);
        assert_eq!(map.map_id().as_str(), "77");
        assert_eq!(map.nodes().len(), 1);
        assert_eq!(ws.interaction().selected(), Some(&NodeId::root()));
        assert_eq!(ws.settings(), &Settings::default());
    }

    #[rstest]
    fn save_then_load_restores_maps_activation_and_settings(
        mut storage: Storage<MemoryBackend>,
    ) {
        let mut ws = Workspace::new();
        ws.upsert_map(brainstorm_map());
        ws.set_active_map_id(Some(mid("1000")));
        ws.set_settings(Settings::new(true, 40));
        assert!(save_workspace(&mut storage, &ws));

        let loaded = load_workspace(&storage, 0);
        assert_eq!(loaded.maps(), ws.maps());
        assert_eq!(loaded.active_map_id(), Some(&mid("1000")));
        assert_eq!(loaded.settings(), &Settings::new(true, 40));
        assert_eq!(loaded.interaction().selected(), None);
        assert_eq!(loaded.ids().last(), 1004);
    }

    #[rstest]
    fn unreadable_records_are_skipped(mut storage: Storage<MemoryBackend>) {
        storage.set(
            MINDMAPS_KEY,
            &json!([
                {"name": "no id", "nodes": []},
                {"id": "5", "name": "Kept", "nodes": [{"id": "root"}]},
                {"id": "5", "name": "Duplicate", "nodes": []}
            ]),
        );
        storage.set(ACTIVE_MINDMAP_KEY, &"gone");

        let ws = load_workspace(&storage, 0);
        assert_eq!(ws.maps().len(), 1);
        assert_eq!(ws.maps()[0].name(), "Kept");
        assert_eq!(ws.active_map_id(), Some(&mid("5")));
    }

    #[rstest]
    fn legacy_node_lists_are_migrated(mut storage: Storage<MemoryBackend>) {
        storage.set(
            LEGACY_NODES_KEY,
            &json!([
                {"id": "root", "text": "Old root", "parentId": null, "x": 500, "y": 300,
                 "color": "#D6BCFA"},
                {"id": "1700000000000", "text": "Child", "parentId": "root", "x": 750, "y": 300,
                 "color": "#9BE8D8"}
            ]),
        );

        let ws = load_workspace(&storage, 10);
        let map = ws.active_map().expect("active");
        assert_eq!(map.name(), DEFAULT_MAP_NAME);
        assert_eq!(map.root().map(|root| root.text()), Some("Old root"));
        assert_eq!(map.children(&NodeId::root()), &[nid("1700000000000")]);
    }

    #[rstest]
    fn garbled_settings_fall_back_to_defaults(mut storage: Storage<MemoryBackend>) {
        storage.set(SETTINGS_KEY, &json!({"snapToGrid": "yes"}));
        let ws = load_workspace(&storage, 0);
        assert_eq!(ws.settings(), &Settings::default());

        storage.set(SETTINGS_KEY, &json!({"snapToGrid": true, "gridSize": 0}));
        let ws = load_workspace(&storage, 0);
        assert_eq!(ws.settings(), &Settings::new(true, 1));
    }
}
