//! Bindings between `ww3_core` and the WW3 tool GUI.
//!
//! The GUI owns one [`Ww3Bridge`]. Widgets call a method per concern; the
//! bridge parses their text into typed values, updates the live config
//! document, persists it, and pushes NAMELIST changes through
//! [`NamelistSync`]. Calls that only report success return `bool` and log
//! the failure, like a widget slot would.

mod logging;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde_json::Value;
use ww3_core::config::{keys, ConfigDocument, ConfigStore};
use ww3_core::locale::{EnumField, FileSplit, Locale};
use ww3_core::logging::LogLevel;
use ww3_core::namelist::Decimal;
use ww3_core::paths::{PathKey, PathResolver};
use ww3_core::schemes::SchemeStore;
use ww3_core::st_versions::{StVersion, StVersionList};
use ww3_core::sync::{ChangeEvent, NamelistSync, SyncReport};
use ww3_core::{CoreError, CoreResult};

pub use logging::{init_logging, LOG_FILE_NAME};

/// Platform config file: `<config dir>/ww3tool/config.json`.
pub fn default_config_path() -> PathBuf {
    // XDG config dir on Linux, fall back to the current dir
    match dirs::config_dir() {
        Some(config_dir) => config_dir.join("ww3tool").join("config.json"),
        None => PathBuf::from("config.json"),
    }
}

pub fn version() -> String {
    ww3_core::version().to_string()
}

/// Live configuration plus the services the GUI needs.
pub struct Ww3Bridge {
    store: ConfigStore,
    doc: ConfigDocument,
    resolver: PathResolver,
    // In-memory changes a failed save left unpersisted.
    dirty: bool,
}

impl Ww3Bridge {
    /// Open the bridge for the app installed at `root`, using the platform
    /// config path.
    pub fn open(root: impl AsRef<Path>) -> anyhow::Result<Self> {
        Self::with_config_path(root, default_config_path())
    }

    /// Open with an explicit config file.
    ///
    /// A corrupt config file is an error; the GUI offers
    /// [`Ww3Bridge::reset_config`] in that case.
    pub fn with_config_path(
        root: impl AsRef<Path>,
        config_path: impl Into<PathBuf>,
    ) -> anyhow::Result<Self> {
        let store = ConfigStore::new(config_path);
        let doc = store
            .load()
            .with_context(|| format!("failed to load config {}", store.path().display()))?;
        Ok(Self::from_parts(root, store, doc))
    }

    /// Overwrite the config file with defaults, then open.
    pub fn reset_config(
        root: impl AsRef<Path>,
        config_path: impl Into<PathBuf>,
    ) -> anyhow::Result<Self> {
        let store = ConfigStore::new(config_path);
        let doc = store
            .reset_to_defaults()
            .with_context(|| format!("failed to reset config {}", store.path().display()))?;
        tracing::warn!("Config reset to defaults at {}", store.path().display());
        Ok(Self::from_parts(root, store, doc))
    }

    fn from_parts(root: impl AsRef<Path>, store: ConfigStore, doc: ConfigDocument) -> Self {
        let mut opened = doc.clone();
        SchemeStore::open(&mut opened);
        let created = opened != doc;

        let mut bridge = Self {
            store,
            doc: opened,
            resolver: PathResolver::new(root),
            dirty: false,
        };
        if created {
            bridge.save();
        }
        bridge
    }

    pub fn config_path(&self) -> &Path {
        self.store.path()
    }

    pub fn document(&self) -> &ConfigDocument {
        &self.doc
    }

    pub fn root(&self) -> &Path {
        self.resolver.root()
    }

    pub fn locale(&self) -> Locale {
        self.doc.locale()
    }

    pub fn log_level(&self) -> LogLevel {
        LogLevel::from_config(self.doc.get_str(keys::LOG_LEVEL))
    }

    /// Re-read the config file, dropping unsaved in-memory changes.
    pub fn reload(&mut self) -> anyhow::Result<()> {
        self.doc = self
            .store
            .reload()
            .with_context(|| format!("failed to reload config {}", self.store.path().display()))?;
        self.dirty = false;
        Ok(())
    }

    /// Whether the live document holds changes a failed save did not persist.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Persist the live document.
    pub fn save(&mut self) -> bool {
        match self.try_save() {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to save config: {}", e);
                false
            }
        }
    }

    fn try_save(&mut self) -> CoreResult<()> {
        let result = self.store.save(&self.doc);
        self.dirty = result.is_err();
        result
    }


    pub fn value(&self, key: &str) -> String {
        self.doc.get_string(key)
    }

    pub fn flag(&self, key: &str) -> bool {
        self.doc.get_bool(key)
    }

    /// Set a value and save. Returns false when nothing changed or the save
    /// failed; on failure the new value stays in memory and the next call
    /// retries the save even if the value is the same.
    pub fn set_value(&mut self, key: &str, value: impl Into<Value>) -> bool {
        if !self.doc.set_if_changed(key, value) && !self.dirty {
            return false;
        }
        tracing::debug!("{} changed", key);
        self.save()
    }

    /// Switch the UI language; stored as a canonical tag.
    pub fn set_language(&mut self, tag: &str) -> bool {
        let locale = Locale::from_tag(tag);
        self.set_value(keys::LANGUAGE, locale.tag())
    }


    /// Field text for a path key; empty shows the placeholder.
    pub fn path_display(&self, key: PathKey) -> String {
        self.resolver.display_for(&self.doc, key)
    }

    pub fn resolved_path(&self, key: PathKey) -> Option<PathBuf> {
        self.resolver.resolve(&self.doc, key)
    }

    pub fn set_path(&mut self, key: PathKey, input: &str) -> bool {
        let stored = self.resolver.store_value(key, input);
        self.set_value(key.config_key(), stored)
    }

    /// Select the working directory whose NAMELIST copies are kept in sync.
    pub fn select_workdir(&mut self, dir: &str) -> bool {
        self.set_path(PathKey::CurrentWorkdir, dir)
    }


    /// Display strings in the current language, in combo order.
    pub fn choices<F: EnumField>(&self) -> Vec<&'static str> {
        F::display_choices(self.locale())
    }

    pub fn selected_index<F: EnumField>(&self) -> usize {
        self.doc.enum_value::<F>().to_index()
    }

    /// Store the choice at `index` as its canonical token.
    pub fn select_index<F: EnumField>(&mut self, index: usize) -> bool {
        if !self.doc.set_enum(F::from_index(index)) && !self.dirty {
            return false;
        }
        self.save()
    }


    pub fn spectrum_changed(
        &mut self,
        freq_inc: &str,
        freq_start: &str,
        freq_num: &str,
        dir_num: &str,
    ) -> anyhow::Result<SyncReport> {
        let event = ChangeEvent::SpectrumChanged {
            freq_inc: parse_decimal(keys::FREQ_INC, freq_inc)?,
            freq_start: parse_decimal(keys::FREQ_START, freq_start)?,
            freq_num: parse_count(keys::FREQ_NUM, freq_num)?,
            dir_num: parse_count(keys::DIR_NUM, dir_num)?,
        };
        self.dispatch(event)
    }

    pub fn timesteps_changed(
        &mut self,
        dtmax: &str,
        dtxy: &str,
        dtkth: &str,
        dtmin: &str,
    ) -> anyhow::Result<SyncReport> {
        let event = ChangeEvent::TimestepsChanged {
            dtmax: parse_count(keys::DTMAX, dtmax)?,
            dtxy: parse_count(keys::DTXY, dtxy)?,
            dtkth: parse_count(keys::DTKTH, dtkth)?,
            dtmin: parse_count(keys::DTMIN, dtmin)?,
        };
        self.dispatch(event)
    }

    pub fn nearshore_changed(&mut self, zlim: &str, dmin: &str) -> anyhow::Result<SyncReport> {
        let dmin_value = parse_decimal(keys::GRID_DMIN, dmin)?;
        if dmin_value.value() < 0.0 {
            return Err(CoreError::validation(format!("{} must not be negative", keys::GRID_DMIN)).into());
        }
        let event = ChangeEvent::NearshoreChanged {
            zlim: parse_decimal(keys::GRID_ZLIM, zlim)?,
            dmin: dmin_value,
        };
        self.dispatch(event)
    }

    /// `choice` may be a canonical token or a display string in any
    /// language.
    pub fn file_split_changed(&mut self, choice: &str) -> anyhow::Result<SyncReport> {
        let split = FileSplit::from_token(choice)
            .or_else(|| FileSplit::from_display(choice))
            .ok_or_else(|| CoreError::validation(format!("unknown file split '{}'", choice)))?;
        self.dispatch(ChangeEvent::FileSplitChanged(split))
    }

    /// Save scheme `name` and write its codes into every known output
    /// NAMELIST.
    pub fn apply_output_vars<S: AsRef<str>>(
        &mut self,
        name: &str,
        codes: &[S],
    ) -> anyhow::Result<SyncReport> {
        self.dispatch(ChangeEvent::OutputVarsApplied {
            scheme_name: name.trim().to_string(),
            codes: codes.iter().map(|c| c.as_ref().to_string()).collect(),
        })
    }

    /// Record, persist, then rewrite the NAMELIST files.
    ///
    /// The config is saved only when the event changed it; the NAMELIST pass
    /// always runs and writes nothing for files already in sync.
    fn dispatch(&mut self, event: ChangeEvent) -> anyhow::Result<SyncReport> {
        let mut updated = self.doc.clone();
        NamelistSync::record(&event, &mut updated)?;
        if updated != self.doc || self.dirty {
            self.doc = updated;
            self.try_save()?;
        }

        let report = self.sync().apply(&event);
        for (path, e) in &report.failed {
            tracing::warn!("{} not updated: {}", path.display(), e);
        }
        Ok(report)
    }

    fn sync(&self) -> NamelistSync {
        NamelistSync::from_document(&self.resolver, &self.doc)
    }

    /// Spectrum fields for the page: template values win, config fills gaps.
    pub fn spectrum_values(&self) -> BTreeMap<String, String> {
        self.with_config_fallback(
            self.sync().read_spectrum_from_template(),
            &[keys::FREQ_INC, keys::FREQ_START, keys::FREQ_NUM, keys::DIR_NUM],
        )
    }

    pub fn nearshore_values(&self) -> BTreeMap<String, String> {
        self.with_config_fallback(
            self.sync().read_nearshore_from_template(),
            &[keys::GRID_ZLIM, keys::GRID_DMIN],
        )
    }

    fn with_config_fallback(
        &self,
        mut values: BTreeMap<String, String>,
        fields: &[&str],
    ) -> BTreeMap<String, String> {
        for key in fields {
            values
                .entry(key.to_string())
                .or_insert_with(|| self.doc.get_string(key));
        }
        values
    }


    pub fn scheme_names(&self) -> Vec<String> {
        let mut doc = self.doc.clone();
        let names = SchemeStore::open(&mut doc).list();
        names
    }

    pub fn scheme_codes(&self, name: &str) -> Option<Vec<String>> {
        let mut doc = self.doc.clone();
        let codes = SchemeStore::open(&mut doc).get(name);
        codes
    }

    pub fn default_scheme_name(&self) -> String {
        let mut doc = self.doc.clone();
        let name = SchemeStore::open(&mut doc).default_name();
        name
    }

    /// Delete a scheme. The default and the last scheme are refused.
    pub fn delete_scheme(&mut self, name: &str) -> bool {
        let deleted = SchemeStore::open(&mut self.doc).delete(name);
        deleted && self.save()
    }


    pub fn st_versions(&self) -> Vec<StVersion> {
        StVersionList::from_document(&self.doc).entries().to_vec()
    }

    pub fn add_st_version(&mut self, name: &str, path: &str) -> anyhow::Result<()> {
        self.update_st_versions(|list| list.add(StVersion::new(name.trim(), path.trim())))
    }

    pub fn remove_st_version(&mut self, name: &str) -> bool {
        let mut list = StVersionList::from_document(&self.doc);
        if !list.remove(name) {
            return false;
        }
        list.store(&mut self.doc);
        self.save()
    }

    /// Move `name` to the front of the list, making it the active build.
    pub fn make_default_st_version(&mut self, name: &str) -> anyhow::Result<()> {
        self.update_st_versions(|list| list.make_default(name))
    }

    fn update_st_versions(
        &mut self,
        change: impl FnOnce(&mut StVersionList) -> CoreResult<()>,
    ) -> anyhow::Result<()> {
        let mut list = StVersionList::from_document(&self.doc);
        change(&mut list)?;
        list.store(&mut self.doc);
        self.try_save()?;
        Ok(())
    }


    pub fn cpu_groups(&self) -> Vec<String> {
        self.doc.cpu_group()
    }

    /// Returns Ok(false) when the group already exists.
    pub fn add_cpu_group(&mut self, name: &str) -> anyhow::Result<bool> {
        if !self.doc.add_cpu_group(name)? && !self.dirty {
            return Ok(false);
        }
        self.try_save()?;
        Ok(true)
    }

    pub fn remove_cpu_group(&mut self, name: &str) -> bool {
        self.doc.remove_cpu_group(name) && self.save()
    }
}

fn parse_decimal(field: &str, text: &str) -> CoreResult<Decimal> {
    text.parse::<Decimal>()
        .map_err(|e| CoreError::validation(format!("{}: {}", field, e)))
}

fn parse_count(field: &str, text: &str) -> CoreResult<u32> {
    text.trim()
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| {
            CoreError::validation(format!("{}: '{}' is not a positive integer", field, text.trim()))
        })
}
