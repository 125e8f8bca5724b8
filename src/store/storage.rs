// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Namespaced key-value storage.
//!
//! [`Storage`] is the tolerant front: reads fall back to a caller-supplied default and write
//! failures are logged instead of returned. Backends report every failure as a [`StoreError`];
//! the `try_*` methods surface them for callers that need to know.

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Prefix every key is stored under.
pub const STORAGE_PREFIX: &str = "productivity_suite_";

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        key: String,
        source: serde_json::Error,
    },
    QuotaExceeded {
        key: String,
        needed: usize,
        quota: usize,
    },
    InvalidKey {
        key: String,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { key, source } => write!(f, "json error for key {key:?}: {source}"),
            Self::QuotaExceeded { key, needed, quota } => write!(
                f,
                "storage quota exceeded writing {key:?} ({needed} bytes needed, quota {quota})"
            ),
            Self::InvalidKey { key } => write!(f, "invalid storage key {key:?}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::QuotaExceeded { .. } | Self::InvalidKey { .. } => None,
        }
    }
}

/// Raw string storage keyed by full (already prefixed) keys.
pub trait StorageBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn delete(&mut self, key: &str) -> Result<(), StoreError>;
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

/// In-memory backend with an optional byte quota over all keys and values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryBackend {
    entries: BTreeMap<String, String>,
    quota: Option<usize>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            quota: Some(quota),
        }
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    /// Bytes currently used by keys and values.
    pub fn used_bytes(&self) -> usize {
        self.entries
            .iter()
            .map(|(key, value)| key.len() + value.len())
            .sum()
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if let Some(quota) = self.quota {
            let replaced = self
                .entries
                .get(key)
                .map(|old| key.len() + old.len())
                .unwrap_or_default();
            let needed = self.used_bytes() - replaced + key.len() + value.len();
            if needed > quota {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_owned(),
                    needed,
                    quota,
                });
            }
        }
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.entries.keys().cloned().collect())
    }
}

/// JSON values under [`STORAGE_PREFIX`]-namespaced keys.
#[derive(Debug, Clone, Default)]
pub struct Storage<B> {
    backend: B,
}

impl<B: StorageBackend> Storage<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// The stored value for `key`, or `default` when it is absent, unreadable or unparsable.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.try_get(key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(err) => {
                tracing::warn!(key, error = %err, "falling back to default value");
                default
            }
        }
    }

    pub fn try_get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let full_key = checked_key(key)?;
        let Some(raw) = self.backend.read(&full_key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Json {
                key: full_key,
                source,
            })
    }

    /// Stores `value` under `key`. Failures are logged; returns whether the write happened.
    pub fn set<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> bool {
        match self.try_set(key, value) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(key, error = %err, "failed to save value");
                false
            }
        }
    }

    pub fn try_set<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
    ) -> Result<(), StoreError> {
        let full_key = checked_key(key)?;
        let raw = serde_json::to_string(value).map_err(|source| StoreError::Json {
            key: full_key.clone(),
            source,
        })?;
        self.backend.write(&full_key, &raw)
    }

    /// Removes `key`. Failures are logged; returns whether the removal happened.
    pub fn remove(&mut self, key: &str) -> bool {
        let result = checked_key(key).and_then(|full_key| self.backend.delete(&full_key));
        match result {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(key, error = %err, "failed to remove value");
                false
            }
        }
    }

    /// Removes every key under the prefix and returns how many were removed. Keys outside the
    /// prefix are left alone.
    pub fn clear_all(&mut self) -> usize {
        let keys = match self.backend.keys() {
            Ok(keys) => keys,
            Err(err) => {
                tracing::warn!(error = %err, "failed to list stored keys");
                return 0;
            }
        };

        let mut removed = 0;
        for key in keys.iter().filter(|key| key.starts_with(STORAGE_PREFIX)) {
            match self.backend.delete(key) {
                Ok(()) => removed += 1,
                Err(err) => {
                    tracing::warn!(key = key.as_str(), error = %err, "failed to remove value")
                }
            }
        }
        removed
    }
}

fn checked_key(key: &str) -> Result<String, StoreError> {
    if key.trim().is_empty() {
        return Err(StoreError::InvalidKey {
            key: key.to_owned(),
        });
    }
    Ok(format!("{STORAGE_PREFIX}{key}"))
}
