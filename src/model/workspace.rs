// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::{IdAllocator, MapId};
use super::interaction::InteractionState;
use super::mindmap::MindMap;
use super::settings::Settings;

/// The top-level container the board runs against.
///
/// Maps are kept in creation order; "first remaining map" fallbacks rely on it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workspace {
    maps: Vec<MindMap>,
    active_map_id: Option<MapId>,
    interaction: InteractionState,
    settings: Settings,
    ids: IdAllocator,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn maps(&self) -> &[MindMap] {
        &self.maps
    }

    pub fn map(&self, map_id: &MapId) -> Option<&MindMap> {
        self.maps.iter().find(|map| map.map_id() == map_id)
    }

    pub fn map_mut(&mut self, map_id: &MapId) -> Option<&mut MindMap> {
        self.maps.iter_mut().find(|map| map.map_id() == map_id)
    }

    pub fn map_index(&self, map_id: &MapId) -> Option<usize> {
        self.maps.iter().position(|map| map.map_id() == map_id)
    }

    /// Appends `map`, or replaces the map with the same id in place. Returns true on replace.
    pub fn upsert_map(&mut self, map: MindMap) -> bool {
        self.observe_ids(&map);
        match self.map_index(map.map_id()) {
            Some(index) => {
                self.maps[index] = map;
                true
            }
            None => {
                self.maps.push(map);
                false
            }
        }
    }

    pub fn remove_map(&mut self, map_id: &MapId) -> Option<MindMap> {
        let index = self.map_index(map_id)?;
        Some(self.maps.remove(index))
    }

    pub fn active_map_id(&self) -> Option<&MapId> {
        self.active_map_id.as_ref()
    }

    /// Sets the active map. Unknown ids deactivate. Interaction state is reset on change.
    pub fn set_active_map_id(&mut self, map_id: Option<MapId>) {
        let map_id = map_id.filter(|map_id| self.map_index(map_id).is_some());
        if map_id != self.active_map_id {
            self.interaction.reset();
        }
        self.active_map_id = map_id;
    }

    pub fn active_map(&self) -> Option<&MindMap> {
        self.active_map_id.as_ref().and_then(|map_id| self.map(map_id))
    }

    pub fn active_map_mut(&mut self) -> Option<&mut MindMap> {
        let map_id = self.active_map_id.clone()?;
        self.map_mut(&map_id)
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn interaction_mut(&mut self) -> &mut InteractionState {
        &mut self.interaction
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    pub fn ids_mut(&mut self) -> &mut IdAllocator {
        &mut self.ids
    }

    /// Borrows a map mutably together with the interaction state and settings.
    pub fn split_mut(
        &mut self,
        map_id: &MapId,
    ) -> Option<(&mut MindMap, &mut InteractionState, &Settings)> {
        let map = self.maps.iter_mut().find(|map| map.map_id() == map_id)?;
        Some((map, &mut self.interaction, &self.settings))
    }

    fn observe_ids(&mut self, map: &MindMap) {
        self.ids.observe(map.map_id().as_str());
        for node_id in map.nodes().keys() {
            self.ids.observe(node_id.as_str());
        }
    }
}
