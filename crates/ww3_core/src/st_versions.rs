//! Source-term (ST) build versions: named WW3 binary directories.
//!
//! The list order matters; the entry at index 0 is the active default.

use serde::{Deserialize, Serialize};

use crate::config::{keys, ConfigDocument};
use crate::error::{CoreError, CoreResult};

/// One compiled WW3 variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StVersion {
    pub name: String,
    pub path: String,
}

impl StVersion {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// The ordered `ST_VERSIONS` list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StVersionList {
    entries: Vec<StVersion>,
}

impl StVersionList {
    /// Read the list from a document. Malformed entries are skipped.
    pub fn from_document(doc: &ConfigDocument) -> Self {
        let entries = doc
            .get(keys::ST_VERSIONS)
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| serde_json::from_value::<StVersion>(item.clone()).ok())
                    .collect()
            })
            .unwrap_or_default();
        Self { entries }
    }

    /// Write the list back into a document.
    pub fn store(&self, doc: &mut ConfigDocument) {
        let items: Vec<serde_json::Value> = self
            .entries
            .iter()
            .filter_map(|entry| serde_json::to_value(entry).ok())
            .collect();
        doc.set(keys::ST_VERSIONS, items);
    }

    pub fn entries(&self) -> &[StVersion] {
        &self.entries
    }

    /// The active (first) entry.
    pub fn active(&self) -> Option<&StVersion> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an entry after validating it against the list.
    pub fn add(&mut self, entry: StVersion) -> CoreResult<()> {
        let entry = StVersion::new(entry.name.trim(), entry.path.trim());
        check_entry(&entry)?;
        if self.entries.iter().any(|e| e.name == entry.name) {
            return Err(CoreError::validation(format!(
                "ST version name '{}' is already used",
                entry.name
            )));
        }
        if self.entries.iter().any(|e| e.path == entry.path) {
            return Err(CoreError::validation(format!(
                "ST version path '{}' is already used",
                entry.path
            )));
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Remove an entry by name. Returns false if it was not listed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.name != name.trim());
        self.entries.len() != before
    }

    /// Move an entry to the front, making it the active default.
    pub fn make_default(&mut self, name: &str) -> CoreResult<()> {
        let index = self
            .entries
            .iter()
            .position(|e| e.name == name.trim())
            .ok_or_else(|| CoreError::validation(format!("no ST version named '{}'", name)))?;
        let entry = self.entries.remove(index);
        self.entries.insert(0, entry);
        Ok(())
    }

    /// Check the whole list: non-empty fields, distinct names and paths.
    pub fn validate(&self) -> CoreResult<()> {
        for (i, entry) in self.entries.iter().enumerate() {
            check_entry(entry)?;
            for other in &self.entries[i + 1..] {
                if other.name == entry.name {
                    return Err(CoreError::validation(format!(
                        "duplicate ST version name '{}'",
                        entry.name
                    )));
                }
                if other.path == entry.path {
                    return Err(CoreError::validation(format!(
                        "duplicate ST version path '{}'",
                        entry.path
                    )));
                }
            }
        }
        Ok(())
    }
}

fn check_entry(entry: &StVersion) -> CoreResult<()> {
    if entry.name.trim().is_empty() {
        return Err(CoreError::validation("ST version name is empty"));
    }
    if entry.path.trim().is_empty() {
        return Err(CoreError::validation(format!(
            "ST version '{}' has no path",
            entry.name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn add_rejects_empty_and_duplicates() {
        let mut list = StVersionList::default();
        list.add(StVersion::new("ST4", "/opt/ww3/st4/bin")).unwrap();

        assert!(list.add(StVersion::new("", "/opt/x")).is_err());
        assert!(list.add(StVersion::new("ST6", " ")).is_err());
        assert!(list.add(StVersion::new("ST4", "/opt/ww3/other")).is_err());
        assert!(list.add(StVersion::new("ST6", "/opt/ww3/st4/bin")).is_err());

        list.add(StVersion::new(" ST6 ", "/opt/ww3/st6/bin")).unwrap();
        assert_eq!(list.entries()[1].name, "ST6");
        assert_eq!(list.active().unwrap().name, "ST4");
    }

    #[test]
    fn make_default_moves_to_front() {
        let mut list = StVersionList::default();
        list.add(StVersion::new("ST2", "/a")).unwrap();
        list.add(StVersion::new("ST4", "/b")).unwrap();
        list.add(StVersion::new("ST6", "/c")).unwrap();

        list.make_default("ST6").unwrap();
        let names: Vec<_> = list.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["ST6", "ST2", "ST4"]);
        assert!(list.make_default("ST9").is_err());
    }

    #[test]
    fn document_round_trip_skips_malformed() {
        let mut doc = ConfigDocument::defaults();
        doc.set(
            keys::ST_VERSIONS,
            json!([{"name": "ST4", "path": "/b"}, {"name": "broken"}, "junk"]),
        );

        let mut list = StVersionList::from_document(&doc);
        assert_eq!(list.len(), 1);

        list.add(StVersion::new("ST6", "/c")).unwrap();
        assert!(list.remove("ST4"));
        assert!(!list.remove("ST4"));
        list.store(&mut doc);

        assert_eq!(doc.get(keys::ST_VERSIONS), Some(&json!([{"name": "ST6", "path": "/c"}])));
    }

    #[test]
    fn validate_catches_duplicates_from_disk() {
        let mut doc = ConfigDocument::defaults();
        doc.set(
            keys::ST_VERSIONS,
            json!([{"name": "A", "path": "/x"}, {"name": "B", "path": "/x"}]),
        );
        assert!(StVersionList::from_document(&doc).validate().is_err());
    }
}
