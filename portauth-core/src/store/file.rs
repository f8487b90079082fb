//! JSON file-backed key/value store.
//!
//! # Storage Location
//!
//! By default the file lives at `~/.config/portauth/auth.json` on Linux,
//! the equivalent application support directory on macOS, and
//! `%APPDATA%\portauth\auth.json` on Windows.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "entries": {
//!     "0": "127.0.0.1, , ",
//!     "3306": ", monuser, bW9ucHc=",
//!     "AutoUpdate": "true"
//!   }
//! }
//! ```
//!
//! On Unix the file is written with mode `0600`. Filesystem permissions are
//! the only protection stored passwords get.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{KeyValueStore, StoreError};

const FORMAT_VERSION: u32 = 1;

/// On-disk layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FileStoreData {
    /// Version of the store format (for future migrations).
    version: u32,

    /// All stored keys and values.
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

impl Default for FileStoreData {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

/// Key/value store persisted as a JSON file.
#[derive(Debug)]
pub struct FileStore {
    /// Path to the JSON file.
    path: PathBuf,

    /// In-memory copy of the file contents.
    data: FileStoreData,
}

impl FileStore {
    /// Get the default storage path.
    pub fn default_path() -> Result<PathBuf, StoreError> {
        let dirs = directories::ProjectDirs::from("com", "raibid-labs", "portauth")
            .ok_or(StoreError::ConfigDirUnavailable)?;

        Ok(dirs.config_dir().join("auth.json"))
    }

    /// Create a store bound to `path`. Nothing is read until [`load`](KeyValueStore::load).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            data: FileStoreData::default(),
        }
    }

    /// Create a store bound to the default path.
    pub fn at_default_path() -> Result<Self, StoreError> {
        Ok(Self::new(Self::default_path()?))
    }

    /// Get the storage path for this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl KeyValueStore for FileStore {
    fn load(&mut self) -> Result<(), StoreError> {
        self.data = FileStoreData::default();

        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::Missing {
                    path: self.path.clone(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let data: FileStoreData = serde_json::from_str(&contents)?;
        if data.version != FORMAT_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: data.version,
            });
        }

        tracing::debug!(path = ?self.path, keys = data.entries.len(), "Loaded store");
        self.data = data;
        Ok(())
    }

    fn save(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let contents = serde_json::to_string_pretty(&self.data)?;
        let tmp = self.temp_path();
        fs::write(&tmp, contents)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600))?;
        }

        fs::rename(&tmp, &self.path)?;

        tracing::debug!(path = ?self.path, keys = self.data.entries.len(), "Saved store");
        Ok(())
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.data.entries.get(key).map(String::as_str)
    }

    fn set(&mut self, key: &str, value: &str) {
        self.data
            .entries
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) -> bool {
        self.data.entries.remove(key).is_some()
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_> {
        Box::new(
            self.data
                .entries
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
        )
    }
}
