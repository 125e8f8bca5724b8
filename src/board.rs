// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The mind-map tool: a workspace bound to a store.
//!
//! Every committed mutation is followed by a full write of the affected records. Drag moves are
//! transient; the final position is written when the gesture ends.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::format::{export_file_name, export_json, import_file, import_json, ImportError};
use crate::layout;
use crate::model::{MapId, MindMap, NodeColor, NodeId, Point, Settings, Workspace};
use crate::ops::{self, ApplyResult, Op, OpError};
use crate::store::{
    load_workspace, save_active_map, save_maps, save_settings, save_workspace, Storage,
    StorageBackend,
};

/// Milliseconds since the Unix epoch.
pub type Clock = fn() -> u64;

pub fn system_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or_default()
}

#[derive(Debug)]
pub enum BoardError {
    Op(OpError),
    Import(ImportError),
    Export {
        map_id: MapId,
        source: serde_json::Error,
    },
    Write {
        path: PathBuf,
        source: io::Error,
    },
    NoActiveMap,
    NothingSelected,
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Op(err) => write!(f, "{err}"),
            Self::Import(err) => write!(f, "import failed: {err}"),
            Self::Export { map_id, source } => {
                write!(f, "cannot export mind map {map_id}: {source}")
            }
            Self::Write { path, source } => write!(f, "cannot write {path:?}: {source}"),
            Self::NoActiveMap => f.write_str("no mind map is open"),
            Self::NothingSelected => f.write_str("no node is selected"),
        }
    }
}

impl std::error::Error for BoardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Op(err) => Some(err),
            Self::Import(err) => Some(err),
            Self::Export { source, .. } => Some(source),
            Self::Write { source, .. } => Some(source),
            Self::NoActiveMap | Self::NothingSelected => None,
        }
    }
}

impl From<OpError> for BoardError {
    fn from(err: OpError) -> Self {
        Self::Op(err)
    }
}

impl From<ImportError> for BoardError {
    fn from(err: ImportError) -> Self {
        Self::Import(err)
    }
}

/// A rendered export ready to be written or offered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub file_name: String,
    pub json: String,
}

#[derive(Debug)]
pub struct Board<B> {
    ws: Workspace,
    storage: Storage<B>,
    clock: Clock,
    last_save_ok: bool,
}

impl<B: StorageBackend> Board<B> {
    /// Loads the workspace from `storage` (or a fresh default one).
    pub fn open(storage: Storage<B>, clock: Clock) -> Self {
        let ws = load_workspace(&storage, clock());
        tracing::info!(
            maps = ws.maps().len(),
            active = ws.active_map_id().map(MapId::as_str),
            "opened mind-map board"
        );
        Self {
            ws,
            storage,
            clock,
            last_save_ok: true,
        }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.ws
    }

    pub fn storage(&self) -> &Storage<B> {
        &self.storage
    }

    pub fn into_storage(self) -> Storage<B> {
        self.storage
    }

    /// Whether the most recent write reached the store.
    pub fn last_save_ok(&self) -> bool {
        self.last_save_ok
    }

    pub fn active_map(&self) -> Option<&MindMap> {
        self.ws.active_map()
    }

    pub fn selected(&self) -> Option<&NodeId> {
        self.ws.interaction().selected()
    }

    pub fn settings(&self) -> &Settings {
        self.ws.settings()
    }

    /// Applies `op` and persists on success. Failures are logged and leave state untouched.
    pub fn apply(&mut self, op: Op) -> Result<ApplyResult, OpError> {
        let now = (self.clock)();
        match ops::apply_op(&mut self.ws, &op, now) {
            Ok(result) => {
                tracing::debug!(map_id = %result.map_id, delta = ?result.delta, "applied op");
                match op {
                    Op::SelectMap { .. } => self.persist_active(),
                    _ => self.persist_all(),
                }
                Ok(result)
            }
            Err(err) => {
                tracing::info!(error = %err, "rejected op");
                Err(err)
            }
        }
    }

    pub fn create_map(&mut self, name: &str) -> Result<MapId, OpError> {
        self.apply(Op::CreateMap {
            name: name.to_owned(),
        })
        .map(|result| result.map_id)
    }

    pub fn rename_map(&mut self, map_id: &MapId, name: &str) -> Result<(), OpError> {
        self.apply(Op::RenameMap {
            map_id: map_id.clone(),
            name: name.to_owned(),
        })
        .map(|_| ())
    }

    pub fn delete_map(&mut self, map_id: &MapId) -> Result<(), OpError> {
        self.apply(Op::DeleteMap {
            map_id: map_id.clone(),
        })
        .map(|_| ())
    }

    pub fn select_map(&mut self, map_id: &MapId) -> Result<(), OpError> {
        self.apply(Op::SelectMap {
            map_id: map_id.clone(),
        })
        .map(|_| ())
    }

    /// Activates the map `step` positions after (or before, when negative) the active one.
    pub fn cycle_map(&mut self, step: isize) -> Option<MapId> {
        let len = self.ws.maps().len();
        if len == 0 {
            return None;
        }
        let current = self
            .ws
            .active_map_id()
            .and_then(|map_id| self.ws.map_index(map_id))
            .unwrap_or_default();
        let next = (current as isize + step).rem_euclid(len as isize) as usize;
        let map_id = self.ws.maps()[next].map_id().clone();
        self.select_map(&map_id).ok()?;
        Some(map_id)
    }

    pub fn add_node(
        &mut self,
        map_id: &MapId,
        parent_id: &NodeId,
        text: &str,
        color: NodeColor,
    ) -> Result<NodeId, OpError> {
        let mut result = self.apply(Op::AddNode {
            map_id: map_id.clone(),
            parent_id: parent_id.clone(),
            text: text.to_owned(),
            color,
        })?;
        Ok(result.delta.added.remove(0))
    }

    /// Adds a child below the selected node of the active map and selects it. The color rotates
    /// through the palette with the node count.
    pub fn add_child_to_selected(&mut self, text: &str) -> Result<NodeId, BoardError> {
        let (map_id, parent_id, color) = {
            let map = self.ws.active_map().ok_or(BoardError::NoActiveMap)?;
            let parent_id = self.selected().cloned().ok_or(BoardError::NothingSelected)?;
            (
                map.map_id().clone(),
                parent_id,
                NodeColor::from_index(map.nodes().len()),
            )
        };
        let node_id = self.add_node(&map_id, &parent_id, text, color)?;
        self.ws.interaction_mut().select(Some(node_id.clone()));
        Ok(node_id)
    }

    pub fn delete_node(
        &mut self,
        map_id: &MapId,
        node_id: &NodeId,
    ) -> Result<Vec<NodeId>, OpError> {
        self.apply(Op::DeleteNode {
            map_id: map_id.clone(),
            node_id: node_id.clone(),
        })
        .map(|result| result.delta.removed)
    }

    pub fn delete_selected(&mut self) -> Result<Vec<NodeId>, BoardError> {
        let (map_id, node_id) = self.active_selection()?;
        Ok(self.delete_node(&map_id, &node_id)?)
    }

    pub fn update_node_text(
        &mut self,
        map_id: &MapId,
        node_id: &NodeId,
        text: &str,
    ) -> Result<(), OpError> {
        self.apply(Op::UpdateNodeText {
            map_id: map_id.clone(),
            node_id: node_id.clone(),
            text: text.to_owned(),
        })
        .map(|_| ())
    }

    pub fn rename_selected(&mut self, text: &str) -> Result<(), BoardError> {
        let (map_id, node_id) = self.active_selection()?;
        Ok(self.update_node_text(&map_id, &node_id, text)?)
    }

    pub fn update_node_color(
        &mut self,
        map_id: &MapId,
        node_id: &NodeId,
        color: NodeColor,
    ) -> Result<(), OpError> {
        self.apply(Op::UpdateNodeColor {
            map_id: map_id.clone(),
            node_id: node_id.clone(),
            color,
        })
        .map(|_| ())
    }

    /// Advances the selected node to the next palette color.
    pub fn cycle_selected_color(&mut self) -> Result<NodeColor, BoardError> {
        let (map_id, node_id) = self.active_selection()?;
        let color = self
            .ws
            .map(&map_id)
            .and_then(|map| map.node(&node_id))
            .map(|node| node.color().next())
            .unwrap_or_default();
        self.update_node_color(&map_id, &node_id, color)?;
        Ok(color)
    }

    /// Programmatic move; snapped when enabled and persisted immediately.
    pub fn move_node(
        &mut self,
        map_id: &MapId,
        node_id: &NodeId,
        position: Point,
    ) -> Result<Point, OpError> {
        self.apply(Op::MoveNode {
            map_id: map_id.clone(),
            node_id: node_id.clone(),
            position,
        })?;
        Ok(self
            .ws
            .map(map_id)
            .and_then(|map| map.node(node_id))
            .map(|node| node.position())
            .unwrap_or(position))
    }

    /// Moves the selected node by `delta`.
    pub fn nudge_selected(&mut self, delta: Point) -> Result<Point, BoardError> {
        let (map_id, node_id) = self.active_selection()?;
        let position = self
            .ws
            .map(&map_id)
            .and_then(|map| map.node(&node_id))
            .map(|node| node.position() + delta)
            .ok_or_else(|| OpError::NodeNotFound {
                map_id: map_id.clone(),
                node_id: node_id.clone(),
            })?;
        Ok(self.move_node(&map_id, &node_id, position)?)
    }

    /// Selects `node_id` in the active map, or clears the selection. Unknown ids clear it too.
    pub fn select_node(&mut self, node_id: Option<NodeId>) {
        let node_id = node_id.filter(|node_id| {
            self.ws
                .active_map()
                .is_some_and(|map| map.contains_node(node_id))
        });
        self.ws.interaction_mut().select(node_id);
    }

    /// Pointer pressed at `pointer` (map coordinates) on the active map.
    pub fn pointer_down(&mut self, pointer: Point) -> Option<NodeId> {
        let map_id = self.ws.active_map_id()?.clone();
        let (map, interaction, _) = self.ws.split_mut(&map_id)?;
        layout::pointer_down(map, interaction, pointer)
    }

    /// Pointer moved while pressed. Transient; nothing is written.
    pub fn pointer_move(&mut self, pointer: Point) -> Option<Point> {
        let map_id = self.ws.active_map_id()?.clone();
        let (map, interaction, settings) = self.ws.split_mut(&map_id)?;
        layout::pointer_move(map, interaction, settings, pointer)
    }

    /// Pointer released or left the canvas: ends the drag and writes the final position.
    pub fn pointer_up(&mut self) -> Option<NodeId> {
        let node_id = layout::pointer_up(self.ws.interaction_mut())?;
        tracing::debug!(node_id = %node_id, "drag finished");
        self.persist_maps();
        Some(node_id)
    }

    pub fn set_snap_to_grid(&mut self, snap_to_grid: bool) {
        self.ws.settings_mut().set_snap_to_grid(snap_to_grid);
        self.persist_settings();
    }

    pub fn toggle_snap_to_grid(&mut self) -> bool {
        let snap = !self.ws.settings().snap_to_grid();
        self.set_snap_to_grid(snap);
        snap
    }

    /// Sets the grid size (clamped to the supported range) and returns the stored value.
    pub fn set_grid_size(&mut self, grid_size: u32) -> u32 {
        self.ws.settings_mut().set_grid_size(grid_size);
        self.persist_settings();
        self.ws.settings().grid_size()
    }

    pub fn export_map(&self, map_id: &MapId) -> Result<Export, BoardError> {
        let map = self.ws.map(map_id).ok_or_else(|| OpError::MapNotFound {
            map_id: map_id.clone(),
        })?;
        let json = export_json(map).map_err(|source| BoardError::Export {
            map_id: map_id.clone(),
            source,
        })?;
        Ok(Export {
            file_name: export_file_name(map.name()),
            json,
        })
    }

    pub fn export_active(&self) -> Result<Export, BoardError> {
        let map_id = self.ws.active_map_id().ok_or(BoardError::NoActiveMap)?;
        self.export_map(map_id)
    }

    /// Writes the export of `map_id` into `dir` and returns the written path.
    pub fn export_map_to_dir(&self, map_id: &MapId, dir: &Path) -> Result<PathBuf, BoardError> {
        let export = self.export_map(map_id)?;
        let path = dir.join(&export.file_name);
        fs::write(&path, export.json.as_bytes()).map_err(|source| BoardError::Write {
            path: path.clone(),
            source,
        })?;
        tracing::info!(map_id = %map_id, path = %path.display(), "exported mind map");
        Ok(path)
    }

    /// Imports a document. A failed import changes nothing.
    pub fn import_str(&mut self, text: &str) -> Result<MapId, ImportError> {
        let map = import_json(text, (self.clock)())?;
        Ok(self.install(map))
    }

    pub fn import_path(&mut self, path: &Path) -> Result<MapId, ImportError> {
        let map = import_file(path, (self.clock)())?;
        Ok(self.install(map))
    }

    fn install(&mut self, map: MindMap) -> MapId {
        let map_id = map.map_id().clone();
        let nodes = map.nodes().len();
        let replaced = ops::import_map(&mut self.ws, map);
        tracing::info!(map_id = %map_id, nodes, replaced, "imported mind map");
        self.persist_all();
        map_id
    }

    fn active_selection(&self) -> Result<(MapId, NodeId), BoardError> {
        let map_id = self
            .ws
            .active_map_id()
            .cloned()
            .ok_or(BoardError::NoActiveMap)?;
        let node_id = self
            .selected()
            .cloned()
            .ok_or(BoardError::NothingSelected)?;
        Ok((map_id, node_id))
    }

    fn persist_all(&mut self) {
        self.last_save_ok = save_workspace(&mut self.storage, &self.ws);
    }

    fn persist_maps(&mut self) {
        self.last_save_ok = save_maps(&mut self.storage, &self.ws);
    }

    fn persist_active(&mut self) {
        self.last_save_ok = save_active_map(&mut self.storage, &self.ws);
    }

    fn persist_settings(&mut self) {
        self.last_save_ok = save_settings(&mut self.storage, self.ws.settings());
    }
}
