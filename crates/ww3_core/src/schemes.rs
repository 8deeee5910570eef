//! Named output-variable schemes.
//!
//! A scheme is an ordered set of WW3 output codes (`HS`, `PHS`, `TWS`, ...)
//! written verbatim into `FIELD%LIST` / `TYPE%FIELD%LIST`. The registry
//! lives in the config document under `OUTPUT_VARS_SCHEMES` and always holds
//! at least one scheme: the locale-named default.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::config::{keys, ConfigDocument};
use crate::error::{CoreError, CoreResult};
use crate::locale::Locale;

/// Codes of the built-in default scheme.
pub const DEFAULT_CODES: [&str; 11] = [
    "HS", "DIR", "FP", "T02", "WND", "PHS", "PTP", "PDIR", "PWS", "PNR", "TWS",
];

/// Name of the default scheme in `locale`.
pub fn default_scheme_name(locale: Locale) -> &'static str {
    match locale {
        Locale::English => "Default",
        Locale::Chinese => "默认",
    }
}

/// Whether `name` is the default scheme's name in any locale.
pub fn is_default_name(name: &str) -> bool {
    Locale::ALL
        .iter()
        .any(|l| default_scheme_name(*l) == name.trim())
}

/// Scheme registry view over a config document.
///
/// Mutations change the document only; persist it with
/// [`crate::config::ConfigStore::save`].
pub struct SchemeStore<'a> {
    doc: &'a mut ConfigDocument,
    locale: Locale,
}

impl<'a> SchemeStore<'a> {
    /// Open the registry, creating the default scheme if needed.
    pub fn open(doc: &'a mut ConfigDocument) -> Self {
        let locale = doc.locale();
        let mut store = Self { doc, locale };
        store.ensure_default();
        store
    }

    /// Create the locale-named default scheme if no default exists.
    ///
    /// Returns true if the document changed.
    pub fn ensure_default(&mut self) -> bool {
        let mut registry = self.registry();
        if registry.keys().any(|name| is_default_name(name)) {
            return false;
        }
        let name = default_scheme_name(self.locale);
        registry.insert(
            name.to_string(),
            DEFAULT_CODES.iter().map(|c| c.to_string()).collect(),
        );
        self.store(registry);
        tracing::debug!("Created default output scheme '{}'", name);
        true
    }

    /// Scheme names, sorted alphabetically.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.registry().into_keys().collect();
        names.sort_by_key(|n| n.to_lowercase());
        names
    }

    /// Codes of scheme `name`.
    pub fn get(&self, name: &str) -> Option<Vec<String>> {
        self.registry().remove(name.trim())
    }

    /// Name of the default scheme as currently stored.
    pub fn default_name(&self) -> String {
        self.registry()
            .into_keys()
            .find(|name| is_default_name(name))
            .unwrap_or_else(|| default_scheme_name(self.locale).to_string())
    }

    /// Create or replace a scheme.
    ///
    /// Codes are trimmed, upper-cased and de-duplicated keeping the first
    /// occurrence.
    pub fn upsert<S: AsRef<str>>(&mut self, name: &str, codes: &[S]) -> CoreResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::validation("scheme name is empty"));
        }
        let codes = normalize_codes(codes.iter().map(AsRef::as_ref));
        if codes.is_empty() {
            return Err(CoreError::validation(format!(
                "scheme '{}' has no output variables",
                name
            )));
        }

        let mut registry = self.registry();
        registry.insert(name.to_string(), codes);
        self.store(registry);
        tracing::info!("Saved output scheme '{}'", name);
        Ok(())
    }

    /// Delete a scheme, reporting why a refusal happened.
    pub fn try_delete(&mut self, name: &str) -> CoreResult<()> {
        let name = name.trim();
        let mut registry = self.registry();
        if !registry.contains_key(name) {
            return Err(CoreError::validation(format!("no scheme named '{}'", name)));
        }
        if registry.len() <= 1 {
            return Err(CoreError::LastSchemeProtected(name.to_string()));
        }
        if is_default_name(name) {
            return Err(CoreError::validation(format!(
                "the default scheme '{}' cannot be deleted",
                name
            )));
        }
        registry.remove(name);
        self.store(registry);
        tracing::info!("Deleted output scheme '{}'", name);
        Ok(())
    }

    /// Delete a scheme. Returns false if it was refused or not found.
    pub fn delete(&mut self, name: &str) -> bool {
        match self.try_delete(name) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Scheme not deleted: {}", e);
                false
            }
        }
    }

    fn registry(&self) -> BTreeMap<String, Vec<String>> {
        let Some(Value::Object(map)) = self.doc.get(keys::OUTPUT_VARS_SCHEMES) else {
            return BTreeMap::new();
        };
        map.iter()
            .filter_map(|(name, codes)| {
                let codes = match codes {
                    Value::Array(items) => normalize_codes(items.iter().filter_map(Value::as_str)),
                    // Legacy form: one space-separated string.
                    Value::String(s) => normalize_codes(s.split_whitespace()),
                    _ => Vec::new(),
                };
                let name = name.trim();
                (!name.is_empty() && !codes.is_empty()).then(|| (name.to_string(), codes))
            })
            .collect()
    }

    fn store(&mut self, registry: BTreeMap<String, Vec<String>>) {
        let map: Map<String, Value> = registry
            .into_iter()
            .map(|(name, codes)| (name, Value::from(codes)))
            .collect();
        self.doc.set(keys::OUTPUT_VARS_SCHEMES, Value::Object(map));
    }
}

pub(crate) fn normalize_codes<'s>(codes: impl Iterator<Item = &'s str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for code in codes {
        let code = code.trim().to_ascii_uppercase();
        if !code.is_empty() && !out.contains(&code) {
            out.push(code);
        }
    }
    out
}
