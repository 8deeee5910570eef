//! Config store for loading, saving, and atomic updates.
//!
//! Key features:
//! - Atomic writes (write to temp file, then rename)
//! - Defaults merged under stored values on every load
//! - Enumerated values migrated to canonical tokens on load
//! - Unknown keys preserved for forward compatibility

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde_json::Value;

use super::document::ConfigDocument;
use super::schema;
use crate::atomic;
use crate::error::{CoreError, CoreResult};

/// Loads and persists the single user configuration document.
///
/// The store keeps a cached snapshot of the last document it loaded or
/// saved. Worker threads that need a consistent view call [`load`] and
/// work on their own copy.
///
/// [`load`]: ConfigStore::load
pub struct ConfigStore {
    /// Path to the config file.
    config_path: PathBuf,
    /// Last loaded or saved document.
    cache: Mutex<Option<ConfigDocument>>,
}

impl ConfigStore {
    /// Create a store for the given config file path.
    ///
    /// Does not touch the disk; call [`ConfigStore::load`] after.
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            cache: Mutex::new(None),
        }
    }

    /// Get the config file path.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Read the config file and merge it over the default schema.
    ///
    /// A missing or unreadable file yields the defaults. A file that exists
    /// but is not a JSON object is reported as [`CoreError::ConfigCorrupt`]
    /// and is left untouched on disk.
    pub fn load(&self) -> CoreResult<ConfigDocument> {
        let doc = self.read_from_disk()?;
        *self.cache.lock() = Some(doc.clone());
        Ok(doc)
    }

    /// Discard the cached snapshot and load again.
    pub fn reload(&self) -> CoreResult<ConfigDocument> {
        self.cache.lock().take();
        self.load()
    }

    /// The cached document, loading it first if nothing is cached.
    pub fn snapshot(&self) -> CoreResult<ConfigDocument> {
        if let Some(doc) = self.cache.lock().as_ref() {
            return Ok(doc.clone());
        }
        self.load()
    }

    /// Atomically replace the config file with `doc`.
    pub fn save(&self, doc: &ConfigDocument) -> CoreResult<()> {
        let json = doc.to_json_pretty().map_err(|e| self.write_failed(io::Error::other(e)))?;

        atomic::write_atomic(&self.config_path, json.as_bytes())
            .map_err(|e| self.write_failed(e))?;

        *self.cache.lock() = Some(doc.clone());
        tracing::debug!("Saved config to {}", self.config_path.display());
        Ok(())
    }

    /// Overwrite the file with the default schema.
    ///
    /// This is the recovery offered to the user after a corrupt load.
    pub fn reset_to_defaults(&self) -> CoreResult<ConfigDocument> {
        let doc = ConfigDocument::defaults();
        self.save(&doc)?;
        tracing::info!("Reset config at {} to defaults", self.config_path.display());
        Ok(doc)
    }

    fn read_from_disk(&self) -> CoreResult<ConfigDocument> {
        let content = match fs::read_to_string(&self.config_path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!(
                    "Config file not found at {}, using defaults",
                    self.config_path.display()
                );
                return Ok(ConfigDocument::defaults());
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to read config {}: {}, using defaults",
                    self.config_path.display(),
                    e
                );
                return Ok(ConfigDocument::defaults());
            }
        };

        let stored = match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                return Err(self.corrupt(format!("expected a JSON object, found {}", kind_of(&other))))
            }
            Err(e) => return Err(self.corrupt(e.to_string())),
        };

        let mut merged = schema::merge_over_defaults(stored);
        if schema::migrate(&mut merged) {
            tracing::info!("Migrated legacy values in {}", self.config_path.display());
        }
        Ok(ConfigDocument::from_map(merged))
    }

    fn corrupt(&self, message: String) -> CoreError {
        tracing::error!("Config {} is corrupt: {}", self.config_path.display(), message);
        CoreError::ConfigCorrupt {
            path: self.config_path.clone(),
            message,
        }
    }

    fn write_failed(&self, source: io::Error) -> CoreError {
        tracing::error!("Failed to save config {}: {}", self.config_path.display(), source);
        CoreError::ConfigWriteFailed {
            path: self.config_path.clone(),
            source,
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
