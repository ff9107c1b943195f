//! Persistence media backing the note store.
//!
//! A medium is a synchronous string key/value map with a byte capacity. Usage
//! is accounted as the UTF-8 length of every key plus its value; a write that
//! would push usage past the capacity fails with `NoteError::StorageFull` and
//! leaves the medium untouched.

use std::{
    collections::BTreeMap,
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use log::{debug, error, info, trace, warn};
use tempfile::NamedTempFile;

use crate::{NoteError, Result};

/// Default capacity, matching the usual browser local storage quota
pub const DEFAULT_CAPACITY_BYTES: u64 = 5_000_000;

/// Synchronous key/value storage with a finite capacity.
pub trait StorageMedium: Send {
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove_item(&mut self, key: &str) -> Result<()>;

    /// All keys currently stored, in a stable order.
    fn keys(&self) -> Result<Vec<String>>;

    fn capacity_bytes(&self) -> u64;

    /// Bytes currently in use, keys included.
    fn used_bytes(&self) -> u64;
}

fn entry_size(key: &str, value: &str) -> u64 {
    (key.len() + value.len()) as u64
}

fn map_size(map: &BTreeMap<String, String>) -> u64 {
    map.iter().map(|(k, v)| entry_size(k, v)).sum()
}

/// Usage after replacing `key` with `value`, or `StorageFull` if it exceeds `capacity`.
fn check_capacity(
    map: &BTreeMap<String, String>,
    used: u64,
    capacity: u64,
    key: &str,
    value: &str,
) -> Result<u64> {
    let previous = map.get(key).map(|old| entry_size(key, old)).unwrap_or(0);
    let requested = used - previous + entry_size(key, value);

    if requested > capacity {
        warn!(
            "Write to {} rejected: {} bytes requested, capacity {}",
            key, requested, capacity
        );
        return Err(NoteError::StorageFull {
            key: key.to_string(),
            requested,
            capacity,
        });
    }

    Ok(requested)
}

/// In-process medium; contents are lost when it is dropped.
#[derive(Debug, Clone)]
pub struct MemoryMedium {
    entries: BTreeMap<String, String>,
    used: u64,
    capacity: u64,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY_BYTES)
    }

    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            entries: BTreeMap::new(),
            used: 0,
            capacity,
        }
    }
}

impl Default for MemoryMedium {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageMedium for MemoryMedium {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.used = check_capacity(&self.entries, self.used, self.capacity, key, value)?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        if let Some(old) = self.entries.remove(key) {
            self.used -= entry_size(key, &old);
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }

    fn capacity_bytes(&self) -> u64 {
        self.capacity
    }

    fn used_bytes(&self) -> u64 {
        self.used
    }
}

/// Medium persisted as a single JSON object in a file.
///
/// The file is rewritten atomically on every mutation: the new map is written
/// to a temporary file in the same directory and then renamed over the old one.
#[derive(Debug)]
pub struct FileMedium {
    path: PathBuf,
    entries: BTreeMap<String, String>,
    used: u64,
    capacity: u64,
}

impl FileMedium {
    /// Opens the medium at `path`, starting empty if the file does not exist.
    pub fn open(path: impl Into<PathBuf>, capacity: u64) -> Result<Self> {
        let path = path.into();
        info!("Opening storage file: {}", path.display());

        let entries: BTreeMap<String, String> = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(|e| {
                error!("Failed to read storage file {}: {}", path.display(), e);
                NoteError::Io(e)
            })?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&raw).map_err(|e| {
                    error!("Storage file {} is not a key/value map: {}", path.display(), e);
                    NoteError::corrupt(path.display().to_string(), e.to_string())
                })?
            }
        } else {
            debug!("Storage file does not exist yet: {}", path.display());
            BTreeMap::new()
        };

        let used = map_size(&entries);
        debug!("Loaded {} entries ({} bytes)", entries.len(), used);

        Ok(Self {
            path,
            entries,
            used,
            capacity,
        })
    }

    fn write_map(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                debug!("Creating parent directory: {}", parent.display());
                fs::create_dir_all(parent)?;
            }
        }

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp_file = NamedTempFile::new_in(dir).map_err(|e| {
            error!("Failed to create temporary file: {}", e);
            NoteError::Io(e)
        })?;

        trace!("Serializing {} entries", entries.len());
        let json = serde_json::to_string(entries)?;
        temp_file.write_all(json.as_bytes())?;
        temp_file.flush()?;

        temp_file.persist(&self.path).map_err(|e| {
            error!(
                "Failed to persist storage file {}: {}",
                self.path.display(),
                e.error
            );
            NoteError::Io(e.error)
        })?;

        Ok(())
    }
}

impl StorageMedium for FileMedium {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        let used = check_capacity(&self.entries, self.used, self.capacity, key, value)?;

        // The file is written first so a failed write leaves memory and disk in agreement.
        let mut next = self.entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.write_map(&next)?;

        self.entries = next;
        self.used = used;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        if !self.entries.contains_key(key) {
            return Ok(());
        }

        let mut next = self.entries.clone();
        let old = next.remove(key).unwrap_or_default();
        self.write_map(&next)?;

        self.entries = next;
        self.used -= entry_size(key, &old);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }

    fn capacity_bytes(&self) -> u64 {
        self.capacity
    }

    fn used_bytes(&self) -> u64 {
        self.used
    }
}
