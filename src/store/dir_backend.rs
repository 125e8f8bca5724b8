// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use super::storage::{StorageBackend, StoreError};

const VALUE_FILE_EXTENSION: &str = "json";
const TEMP_FILE_PREFIX: &str = ".mindgraph.tmp.";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Fast, best-effort persistence.
    ///
    /// - Writes a temp file and renames atomically into place.
    /// - Does not perform per-file fsync/sync.
    #[default]
    BestEffort,

    /// Slower, best-effort durability.
    ///
    /// Attempts to flush written file contents and rename operations to stable storage where
    /// possible. Exact guarantees are platform/filesystem-dependent.
    Durable,
}

/// One `<key>.json` file per key inside a directory.
///
/// Keys that would not make portable file names are hex-encoded behind a `~` marker, so every
/// key maps to exactly one file and back.
#[derive(Debug, Clone)]
pub struct DirBackend {
    root: PathBuf,
    durability: WriteDurability,
}

impl DirBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            durability: WriteDurability::default(),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for_key(&self, key: &str) -> PathBuf {
        self.root.join(format!(
            "{}.{VALUE_FILE_EXTENSION}",
            encode_key_segment(key)
        ))
    }
}

impl StorageBackend for DirBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for_key(key);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root).map_err(|source| StoreError::Io {
            path: self.root.clone(),
            source,
        })?;
        write_atomic(&self.path_for_key(key), value.as_bytes(), self.durability)
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for_key(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.root.clone(),
                    source,
                })
            }
        };

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                path: self.root.clone(),
                source,
            })?;
            let path = entry.path();
            if !path.is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some(VALUE_FILE_EXTENSION)
            {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            if stem.starts_with(TEMP_FILE_PREFIX) {
                continue;
            }
            if let Some(key) = decode_key_segment(stem) {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }
}

fn encode_key_segment(segment: &str) -> String {
    if !needs_filename_segment_encoding(segment) {
        return segment.to_owned();
    }

    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(1 + segment.len().saturating_mul(2));
    out.push('~');
    for &b in segment.as_bytes() {
        out.push(HEX[(b >> 4) as usize] as char);
        out.push(HEX[(b & 0x0f) as usize] as char);
    }
    out
}

fn decode_key_segment(segment: &str) -> Option<String> {
    let Some(hex) = segment.strip_prefix('~') else {
        return Some(segment.to_owned());
    };
    if hex.len() % 2 != 0 {
        return None;
    }
    let bytes = (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok())
        .collect::<Option<Vec<u8>>>()?;
    String::from_utf8(bytes).ok()
}

fn needs_filename_segment_encoding(segment: &str) -> bool {
    if segment.starts_with('~') || segment.starts_with('.') {
        return true;
    }
    if segment.ends_with(' ') || segment.ends_with('.') {
        return true;
    }

    let trimmed = segment.trim_end_matches([' ', '.']);
    let base = trimmed.split('.').next().unwrap_or(trimmed);
    if is_windows_device_name(base) {
        return true;
    }

    segment.chars().any(|ch| {
        matches!(ch, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*')
            || ch <= '\u{1f}'
            || ch == '\u{7f}'
    })
}

fn is_windows_device_name(base: &str) -> bool {
    let base = base.to_ascii_uppercase();
    match base.as_str() {
        "CON" | "PRN" | "AUX" | "NUL" => true,
        _ => base
            .strip_prefix("COM")
            .or_else(|| base.strip_prefix("LPT"))
            .is_some_and(|num| num.len() == 1 && matches!(num.as_bytes()[0], b'1'..=b'9')),
    }
}

fn write_atomic(
    path: &Path,
    contents: &[u8],
    durability: WriteDurability,
) -> Result<(), StoreError> {
    match fs::symlink_metadata(path) {
        Ok(md) if md.file_type().is_symlink() => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source: io::Error::other("refusing to write through symlink"),
            });
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    let (Some(parent), Some(file_name)) = (path.parent(), path.file_name()) else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no parent or file name"),
        });
    };

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = parent.join(format!(
        "{TEMP_FILE_PREFIX}{}.{nanos}",
        file_name.to_string_lossy()
    ));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;

    file.write_all(contents).map_err(|source| StoreError::Io {
        path: tmp_path.clone(),
        source,
    })?;

    if durability == WriteDurability::Durable {
        file.sync_all().map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
    }
    drop(file);

    if let Err(source) = rename_overwrite(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir = fs::File::open(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
            dir.sync_all().map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    Ok(())
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err) if to.exists() => {
                fs::remove_file(to).map_err(|_| err)?;
                fs::rename(from, to)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    use super::{decode_key_segment, encode_key_segment, DirBackend, WriteDurability};
    use crate::store::storage::{Storage, StorageBackend, StoreError};

    #[fixture]
    fn dir() -> TempDir {
        tempfile::tempdir().expect("tempdir")
    }

    #[rstest]
    #[case("productivity_suite_mindmaps", "productivity_suite_mindmaps")]
    #[case("a/b", "~612f62")]
    #[case("CON", "~434f4e")]
    #[case("~x", "~7e78")]
    #[case(".hidden", "~2e68696464656e")]
    fn keys_encode_to_safe_file_names(#[case] key: &str, #[case] expected: &str) {
        let encoded = encode_key_segment(key);
        assert_eq!(encoded, expected);
        assert_eq!(decode_key_segment(&encoded).as_deref(), Some(key));
    }

    #[rstest]
    fn read_write_delete_round_trip(dir: TempDir) {
        let mut backend = DirBackend::new(dir.path().join("store"));
        assert_eq!(backend.read("k").expect("read"), None);
        assert_eq!(backend.keys().expect("keys"), Vec::<String>::new());

        backend.write("k", "[1]").expect("write");
        backend.write("k", "[2]").expect("overwrite");
        assert_eq!(backend.read("k").expect("read").as_deref(), Some("[2]"));
        assert!(dir.path().join("store").join("k.json").is_file());

        backend.delete("k").expect("delete");
        backend.delete("k").expect("delete again");
        assert_eq!(backend.read("k").expect("read"), None);
    }

    #[rstest]
    fn durable_writes_leave_no_temp_files(dir: TempDir) {
        let mut backend = DirBackend::new(dir.path()).with_durability(WriteDurability::Durable);
        backend.write("a/b", "true").expect("write");
        backend.write("plain", "false").expect("write");

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .expect("read dir")
            .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
            .collect();
        assert!(names.iter().all(|name| !name.starts_with(".mindgraph.tmp.")));
        assert_eq!(backend.keys().expect("keys"), ["a/b", "plain"]);
    }

    #[cfg(unix)]
    #[rstest]
    fn writes_refuse_to_follow_symlinks(dir: TempDir) {
        let target = dir.path().join("elsewhere.json");
        std::fs::write(&target, "[]").expect("write target");
        let mut backend = DirBackend::new(dir.path());
        std::os::unix::fs::symlink(&target, backend.path_for_key("k")).expect("symlink");

        let err = backend.write("k", "[1]").expect_err("symlink refused");
        match err {
            StoreError::Io { path, source } => {
                assert_eq!(path, backend.path_for_key("k"));
                assert_eq!(source.kind(), std::io::ErrorKind::Other);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(std::fs::read_to_string(&target).expect("read target"), "[]");
    }

    #[rstest]
    fn storage_clear_all_over_a_directory(dir: TempDir) {
        let mut storage = Storage::new(DirBackend::new(dir.path()));
        storage.set("mindmaps", &Vec::<u8>::new());
        storage.set("todos", &[1, 2]);
        std::fs::write(dir.path().join("notes.txt"), "keep").expect("write");

        assert_eq!(storage.clear_all(), 2);
        assert!(dir.path().join("notes.txt").is_file());
        assert_eq!(storage.backend().keys().expect("keys"), Vec::<String>::new());
    }
}
