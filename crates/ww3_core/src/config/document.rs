//! The live configuration document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{keys, schema};
use crate::error::{CoreError, CoreResult};
use crate::locale::{EnumField, Locale};

/// A mapping from upper-snake config keys to JSON values.
///
/// Created by [`super::ConfigStore::load`]; the default schema keys are
/// always present, unknown keys are kept as-is.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument {
    values: Map<String, Value>,
}

impl ConfigDocument {
    /// A fresh document holding only the default schema.
    pub fn defaults() -> Self {
        Self {
            values: schema::defaults().clone(),
        }
    }

    /// Wrap an already-merged map.
    pub fn from_map(values: Map<String, Value>) -> Self {
        Self { values }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.values
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// String value of `key`, or `""` if missing or not a string.
    pub fn get_str(&self, key: &str) -> &str {
        self.values.get(key).and_then(Value::as_str).unwrap_or("")
    }

    /// Textual form of a scalar value; numbers are formatted, others are empty.
    pub fn get_string(&self, key: &str) -> String {
        match self.values.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }

    /// Boolean value of `key`, tolerating quoted legacy forms.
    pub fn get_bool(&self, key: &str) -> bool {
        self.values
            .get(key)
            .and_then(schema::coerce_bool)
            .unwrap_or(false)
    }

    /// Set `key` unconditionally.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// Set `key` only if the value differs. Returns true if it changed.
    ///
    /// Change handlers use this to avoid persisting programmatic widget
    /// updates that echo the current value back.
    pub fn set_if_changed(&mut self, key: &str, value: impl Into<Value>) -> bool {
        let value = value.into();
        if self.values.get(key) == Some(&value) {
            return false;
        }
        self.values.insert(key.to_string(), value);
        true
    }

    /// Locale selected by the `LANGUAGE` key.
    pub fn locale(&self) -> Locale {
        Locale::from_tag(self.get_str(keys::LANGUAGE))
    }

    /// Decoded value of an enumerated field.
    pub fn enum_value<F: EnumField>(&self) -> F {
        self.values
            .get(F::KEY)
            .map(F::decode)
            .unwrap_or_default()
    }

    /// Store an enumerated field as its canonical token.
    pub fn set_enum<F: EnumField>(&mut self, value: F) -> bool {
        self.set_if_changed(F::KEY, value.token())
    }

    /// A list of strings; non-string entries are skipped.
    pub fn string_list(&self, key: &str) -> Vec<String> {
        self.values
            .get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The user-editable CPU group list.
    pub fn cpu_group(&self) -> Vec<String> {
        self.string_list(keys::CPU_GROUP)
    }

    /// Append a CPU group entry. Returns false if it is already listed.
    pub fn add_cpu_group(&mut self, name: &str) -> CoreResult<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::validation("CPU group name is empty"));
        }
        let mut group = self.cpu_group();
        if group.iter().any(|g| g == name) {
            return Ok(false);
        }
        group.push(name.to_string());
        self.set(keys::CPU_GROUP, group);
        Ok(true)
    }

    /// Remove a CPU group entry. Returns false if it was not listed.
    pub fn remove_cpu_group(&mut self, name: &str) -> bool {
        let mut group = self.cpu_group();
        let before = group.len();
        group.retain(|g| g != name.trim());
        if group.len() == before {
            return false;
        }
        self.set(keys::CPU_GROUP, group);
        true
    }

    /// Serialize as pretty JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::FileSplit;
    use serde_json::json;

    #[test]
    fn set_if_changed_detects_echo() {
        let mut doc = ConfigDocument::defaults();
        assert!(!doc.set_if_changed(keys::DX, "0.05"));
        assert!(doc.set_if_changed(keys::DX, "0.1"));
        assert_eq!(doc.get_str(keys::DX), "0.1");
    }

    #[test]
    fn scalar_accessors() {
        let mut doc = ConfigDocument::defaults();
        doc.set(keys::FREQ_NUM, 36);
        doc.set(keys::USE_NESTED_GRID, "yes");
        assert_eq!(doc.get_string(keys::FREQ_NUM), "36");
        assert_eq!(doc.get_str(keys::FREQ_NUM), "");
        assert!(doc.get_bool(keys::USE_NESTED_GRID));
        assert!(!doc.get_bool("NOT_THERE"));
    }

    #[test]
    fn enums_read_and_write_canonical_tokens() {
        let mut doc = ConfigDocument::defaults();
        doc.set(keys::FILE_SPLIT, "月");
        assert_eq!(doc.enum_value::<FileSplit>(), FileSplit::Month);
        assert!(doc.set_enum(FileSplit::Year));
        assert_eq!(doc.get(keys::FILE_SPLIT), Some(&json!("Year")));
    }

    #[test]
    fn cpu_group_edits() {
        let mut doc = ConfigDocument::defaults();
        assert!(doc.add_cpu_group("node01").unwrap());
        assert!(doc.add_cpu_group(" node02 ").unwrap());
        assert!(!doc.add_cpu_group("node01").unwrap());
        assert!(doc.add_cpu_group("   ").is_err());
        assert_eq!(doc.cpu_group(), vec!["node01", "node02"]);

        assert!(doc.remove_cpu_group("node01"));
        assert!(!doc.remove_cpu_group("node01"));
        assert_eq!(doc.cpu_group(), vec!["node02"]);
    }

    #[test]
    fn locale_follows_language_key() {
        let mut doc = ConfigDocument::defaults();
        assert_eq!(doc.locale(), Locale::English);
        doc.set(keys::LANGUAGE, "zh_CN");
        assert_eq!(doc.locale(), Locale::Chinese);
    }
}
