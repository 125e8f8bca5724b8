// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

pub const DEFAULT_GRID_SIZE: u32 = 20;
pub const MIN_GRID_SIZE: u32 = 1;
pub const MAX_GRID_SIZE: u32 = 500;

/// User-tunable mind-map settings, persisted alongside the maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    snap_to_grid: bool,
    grid_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            snap_to_grid: false,
            grid_size: DEFAULT_GRID_SIZE,
        }
    }
}

impl Settings {
    pub fn new(snap_to_grid: bool, grid_size: u32) -> Self {
        Self {
            snap_to_grid,
            grid_size: grid_size.clamp(MIN_GRID_SIZE, MAX_GRID_SIZE),
        }
    }

    pub fn snap_to_grid(&self) -> bool {
        self.snap_to_grid
    }

    pub fn set_snap_to_grid(&mut self, snap_to_grid: bool) {
        self.snap_to_grid = snap_to_grid;
    }

    pub fn grid_size(&self) -> u32 {
        self.grid_size
    }

    pub fn set_grid_size(&mut self, grid_size: u32) {
        self.grid_size = grid_size.clamp(MIN_GRID_SIZE, MAX_GRID_SIZE);
    }

    /// The grid size to snap to, or `None` when snapping is off.
    pub fn active_grid(&self) -> Option<f64> {
        self.snap_to_grid.then_some(f64::from(self.grid_size))
    }
}
