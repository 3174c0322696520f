//! # YAML Preferences Store
//!
//! File-backed key-value store. All keys live in a single YAML map, by
//! default `{data_directory}/preferences.yaml`:
//!
//! ```yaml
//! scheduled_notifications: '{"version":1,"alarms":[...]}'
//! ```
//!
//! The file is re-read on every access so a fresh process sees what an
//! earlier one wrote. Writes go to a temp file that is then renamed over the
//! original.

use crate::errors::StorageError;
use crate::storage::traits::KeyValueStore;
use log::debug;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

type Preferences = BTreeMap<String, String>;

#[derive(Clone)]
pub struct YamlFileStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl YamlFileStore {
    /// Open (without creating) the store at `path`. Parent directories are
    /// created on the first write.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Preferences, StorageError> {
        if !self.path.exists() {
            return Ok(Preferences::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| StorageError::io(&self.path, e))?;
        if content.trim().is_empty() {
            return Ok(Preferences::new());
        }

        Ok(serde_yaml::from_str(&content)?)
    }

    fn save(&self, preferences: &Preferences) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
            }
        }

        let yaml_content = serde_yaml::to_string(preferences)?;
        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, yaml_content).map_err(|e| StorageError::io(&temp_path, e))?;
        fs::rename(&temp_path, &self.path).map_err(|e| StorageError::io(&self.path, e))?;

        debug!("Saved {} preference keys to {:?}", preferences.len(), self.path);
        Ok(())
    }
}

impl KeyValueStore for YamlFileStore {
    fn get_string(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(self.load()?.remove(key))
    }

    fn put_string(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut preferences = self.load()?;
        preferences.insert(key.to_string(), value.to_string());
        self.save(&preferences)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut preferences = self.load()?;
        if preferences.remove(key).is_some() {
            self.save(&preferences)?;
        }
        Ok(())
    }
}
