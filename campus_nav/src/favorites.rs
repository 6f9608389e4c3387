//! Favorite buildings persisted to a key/value store.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::directory::Building;

/// Storage key holding the JSON array of favorite building ids.
pub const FAVORITES_KEY: &str = "campus-favorites";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed for {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not encode stored value")]
    Encode(#[from] serde_json::Error),
}

/// String key/value persistence in the manner of browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Volatile in-process store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a single JSON object file, one member per key.
///
/// The file is read on every `get` and rewritten on every `set`. A missing
/// or corrupt file reads as an empty store; a corrupt one is kept as a
/// backup on the next `set`.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<dir>/storage.json`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join("storage.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where a corrupt storage file is moved before it is overwritten.
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".bak");
        self.path.with_file_name(name)
    }

    /// Parsed entries, or `None` when the file exists but is not a JSON object.
    fn read_entries(&self) -> Result<Option<BTreeMap<String, String>>, StorageError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Some(BTreeMap::new())),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        match serde_json::from_str(&contents) {
            Ok(entries) => Ok(Some(entries)),
            Err(e) => {
                log::warn!("unreadable storage file {}: {}", self.path.display(), e);
                Ok(None)
            }
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_entries()?.and_then(|mut entries| entries.remove(key)))
    }

    /// Rewrites the file with `key` set. A corrupt file is first moved to
    /// [`backup_path`](FileStore::backup_path) so its contents survive.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };
        let mut entries = match self.read_entries()? {
            Some(entries) => entries,
            None => {
                let backup = self.backup_path();
                log::warn!("moving corrupt storage file to {}", backup.display());
                std::fs::rename(&self.path, &backup).map_err(io_err)?;
                BTreeMap::new()
            }
        };
        entries.insert(key.to_string(), value.to_string());
        let json = serde_json::to_string_pretty(&entries)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(&self.path, json).map_err(io_err)
    }
}

/// Favorite building ids, in the order they were added.
///
/// Every change is written to storage first and only applied in memory once
/// the write succeeds.
#[derive(Debug)]
pub struct FavoritesStore<S: KeyValueStore> {
    storage: S,
    ids: Vec<String>,
}

impl<S: KeyValueStore> FavoritesStore<S> {
    /// Hydrates from storage. Absent, unreadable or malformed data yields an
    /// empty set.
    pub fn load(storage: S) -> Self {
        let ids = match storage.get(FAVORITES_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(mut ids) => {
                    let mut seen = std::collections::HashSet::new();
                    ids.retain(|id| seen.insert(id.clone()));
                    ids
                }
                Err(e) => {
                    log::warn!("discarding malformed favorites: {e}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("could not read favorites: {e}");
                Vec::new()
            }
        };
        log::debug!("loaded {} favorites", ids.len());
        Self { storage, ids }
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.ids.iter().any(|f| f == id)
    }

    /// Flips membership of `id` and persists. Returns the new membership.
    /// On a storage error the membership is left unchanged.
    pub fn toggle(&mut self, id: &str) -> Result<bool, StorageError> {
        let mut ids = self.ids.clone();
        let now_favorite = if let Some(idx) = ids.iter().position(|f| f == id) {
            ids.remove(idx);
            false
        } else {
            ids.push(id.to_string());
            true
        };
        self.commit(ids)?;
        Ok(now_favorite)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The favorite buildings, in directory order.
    pub fn favorite_buildings<'a>(&self, buildings: &'a [Building]) -> Vec<&'a Building> {
        buildings.iter().filter(|b| self.is_favorite(&b.id)).collect()
    }

    /// Drops ids that name no building. Returns how many were removed.
    pub fn retain_known(&mut self, buildings: &[Building]) -> Result<usize, StorageError> {
        let mut ids = self.ids.clone();
        ids.retain(|id| buildings.iter().any(|b| &b.id == id));
        let removed = self.ids.len() - ids.len();
        if removed > 0 {
            self.commit(ids)?;
            log::info!("pruned {removed} unknown favorites");
        }
        Ok(removed)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn commit(&mut self, ids: Vec<String>) -> Result<(), StorageError> {
        let json = serde_json::to_string(&ids)?;
        self.storage.set(FAVORITES_KEY, &json)?;
        self.ids = ids;
        Ok(())
    }
}
