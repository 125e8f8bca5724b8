// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence.
//!
//! A namespaced key-value [`Storage`] over pluggable backends (in-memory or one file per key in
//! a directory), and the mind-map records kept in it.

pub mod dir_backend;
pub mod mindmap_store;
pub mod storage;

pub use dir_backend::{DirBackend, WriteDurability};
pub use mindmap_store::{
    load_workspace, save_active_map, save_maps, save_settings, save_workspace, DEFAULT_MAP_NAME,
};
pub use storage::{MemoryBackend, Storage, StorageBackend, StoreError, STORAGE_PREFIX};
