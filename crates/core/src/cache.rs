//! JSON settings cache
//!
//! Stores scalar values grouped by category:
//!
//! ```json
//! {
//!     "convars": {
//!         "steam_enable": true,
//!         "fps_max": 144
//!     },
//!     "graphics": {
//!         "startMaximized": false
//!     }
//! }
//! ```
//!
//! The variable registry uses one category for CACHE-flagged variables,
//! other subsystems are free to keep their own categories in the same file.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Settings cache errors
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Failed to read or write the cache file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Cache file is not valid JSON
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Cache file parsed, but the top level is not an object
    #[error("Settings file {0:?} must contain a JSON object")]
    NotAnObject(PathBuf),

    /// The file on disk could not be loaded or moved aside, so it is not overwritten
    #[error("Settings file {0:?} could not be loaded and is left untouched")]
    Preserved(PathBuf),
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Persistent `(category, key) → value` store backed by a JSON file
#[derive(Debug, Clone)]
pub struct SettingsCache {
    path: PathBuf,
    root: Map<String, Value>,
    /// Set when an unreadable file could not be moved out of the way
    preserve_file: bool,
}

impl SettingsCache {
    /// Create an empty cache bound to `path` without touching the disk
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            root: Map::new(),
            preserve_file: false,
        }
    }

    /// Create a cache and load it from disk
    ///
    /// A missing or unreadable file is not an error here: the problem is
    /// logged and the cache starts out empty. An unreadable file is renamed
    /// to `<path>.bak` first so a later [`save`](Self::save) cannot destroy
    /// it. If that rename fails, `save` refuses to touch the file.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let mut cache = Self::new(path);
        if let Err(e) = cache.load() {
            tracing::warn!("Failed to load settings cache {:?}: {}", cache.path, e);
            cache.set_aside();
        }
        cache
    }

    /// Path the unreadable file is moved to
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".bak");
        PathBuf::from(name)
    }

    fn set_aside(&mut self) {
        if !self.path.exists() {
            return;
        }

        let backup = self.backup_path();
        match std::fs::rename(&self.path, &backup) {
            Ok(()) => tracing::warn!("Moved unreadable settings cache to {:?}", backup),
            Err(e) => {
                tracing::warn!(
                    "Failed to move unreadable settings cache {:?}, it will not be overwritten: {}",
                    self.path,
                    e
                );
                self.preserve_file = true;
            }
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the in-memory contents with the file contents
    ///
    /// A file that does not exist yet loads as empty.
    pub fn load(&mut self) -> CacheResult<()> {
        if !self.path.exists() {
            self.root.clear();
            return Ok(());
        }

        let content = std::fs::read_to_string(&self.path)?;
        match serde_json::from_str::<Value>(&content)? {
            Value::Object(root) => {
                self.root = root;
                tracing::debug!("Loaded settings cache from {:?}", self.path);
                Ok(())
            }
            _ => Err(CacheError::NotAnObject(self.path.clone())),
        }
    }

    /// Write the in-memory contents to the file
    ///
    /// Creates parent directories if they don't exist.
    pub fn save(&self) -> CacheResult<()> {
        if self.preserve_file {
            return Err(CacheError::Preserved(self.path.clone()));
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(&self.root)?;
        std::fs::write(&self.path, content)?;
        tracing::debug!("Saved settings cache to {:?}", self.path);
        Ok(())
    }

    /// Check whether a category exists
    pub fn has_category(&self, category: &str) -> bool {
        matches!(self.root.get(category), Some(Value::Object(_)))
    }

    /// Check whether a key exists in a category
    pub fn has_value(&self, category: &str, key: &str) -> bool {
        self.raw_value(category, key).is_some()
    }

    /// Create an empty category if it doesn't exist
    pub fn add_category(&mut self, category: &str) {
        if !self.has_category(category) {
            self.root
                .insert(category.to_string(), Value::Object(Map::new()));
        }
    }

    /// Get the raw JSON value stored under `(category, key)`
    pub fn raw_value(&self, category: &str, key: &str) -> Option<&Value> {
        match self.root.get(category) {
            Some(Value::Object(entries)) => entries.get(key),
            _ => None,
        }
    }

    /// Get a typed value
    ///
    /// Returns `None` if the key is missing or holds a value of another type.
    pub fn get_value<T: DeserializeOwned>(&self, category: &str, key: &str) -> Option<T> {
        let value = self.raw_value(category, key)?;
        match serde_json::from_value(value.clone()) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Settings value {}.{} has unexpected type: {}", category, key, e);
                None
            }
        }
    }

    /// Store a value
    ///
    /// A missing key (or category) is only created when `create_if_missing`
    /// is set, an existing key is only replaced when `overwrite_if_exists`
    /// is set. Returns whether anything was written.
    pub fn set_value(
        &mut self,
        category: &str,
        key: &str,
        value: impl Into<Value>,
        create_if_missing: bool,
        overwrite_if_exists: bool,
    ) -> bool {
        let exists = self.has_value(category, key);
        if (exists && !overwrite_if_exists) || (!exists && !create_if_missing) {
            return false;
        }

        self.add_category(category);
        if let Some(Value::Object(entries)) = self.root.get_mut(category) {
            entries.insert(key.to_string(), value.into());
            true
        } else {
            false
        }
    }

    /// Remove a key, returning the old value
    pub fn remove_value(&mut self, category: &str, key: &str) -> Option<Value> {
        match self.root.get_mut(category) {
            Some(Value::Object(entries)) => entries.remove(key),
            _ => None,
        }
    }
}
