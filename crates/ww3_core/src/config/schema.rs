//! Built-in default schema.
//!
//! Every key listed here is guaranteed to be present in a loaded document.
//! Values stored on disk win over these; keys on disk that are not listed
//! here are carried through untouched.

use once_cell::sync::Lazy;
use serde_json::{json, Map, Value};

use super::keys;
use crate::locale::{
    canonicalize, Bathymetry, CoastlinePrecision, EnumField, FileSplit, Locale, RunMode, Theme,
};

static DEFAULTS: Lazy<Map<String, Value>> = Lazy::new(|| {
    [
        (keys::LANGUAGE, json!(Locale::English.tag())),
        (keys::THEME, json!(Theme::default().token())),
        (keys::RUN_MODE, json!(RunMode::default().token())),
        (keys::LOG_LEVEL, json!("info")),

        (keys::DX, json!("0.05")),
        (keys::DY, json!("0.05")),
        (keys::NESTED_OUTER_DX, json!("0.1")),
        (keys::NESTED_OUTER_DY, json!("0.1")),
        (keys::NESTED_CONTRACTION_COEFFICIENT, json!("3")),
        (keys::USE_NESTED_GRID, json!(false)),
        (keys::BATHYMETRY, json!(Bathymetry::default().token())),
        (keys::COASTLINE_PRECISION, json!(CoastlinePrecision::default().token())),
        (keys::FILE_SPLIT, json!(FileSplit::default().token())),
        (keys::CONFIRM_ON_EXIT, json!(true)),

        (keys::FREQ_INC, json!("1.1")),
        (keys::FREQ_START, json!("0.04118")),
        (keys::FREQ_NUM, json!("32")),
        (keys::DIR_NUM, json!("24")),

        (keys::DTMAX, json!("900")),
        (keys::DTXY, json!("320")),
        (keys::DTKTH, json!("300")),
        (keys::DTMIN, json!("15")),

        (keys::GRID_ZLIM, json!("-0.1")),
        (keys::GRID_DMIN, json!("2.5")),

        (keys::CPU_GROUP, json!([])),
        (keys::ST_VERSIONS, json!([])),
        (keys::OUTPUT_VARS_SCHEMES, json!({})),

        (keys::PUBLIC_WW3_PATH, json!("")),
        (keys::FORCING_PATH, json!("")),
        (keys::GRIDGEN_PATH, json!("")),
        (keys::REFERENCE_DATA_PATH, json!("")),
        (keys::DEFAULT_WORKDIR, json!("")),
        (keys::WW3BIN_PATH, json!("")),
        (keys::CURRENT_WORKDIR, json!("")),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value))
    .collect()
});

/// The default schema as a JSON object.
pub fn defaults() -> &'static Map<String, Value> {
    &DEFAULTS
}

/// Keys whose default is a boolean; stored values are coerced on load.
pub fn boolean_keys() -> impl Iterator<Item = &'static str> {
    defaults()
        .iter()
        .filter(|(_, v)| v.is_boolean())
        .map(|(k, _)| k.as_str())
}

/// Lenient boolean decoding for values written by older versions.
pub fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" | "" => Some(false),
            _ => None,
        },
        Value::Null => Some(false),
        _ => None,
    }
}

/// Merge stored values over the defaults: stored wins, defaults fill gaps,
/// unknown stored keys are kept.
pub fn merge_over_defaults(stored: Map<String, Value>) -> Map<String, Value> {
    let mut merged = defaults().clone();
    for (key, value) in stored {
        merged.insert(key, value);
    }
    merged
}

/// Force enumerated values to canonical tokens and coerce booleans.
///
/// Returns true if anything was rewritten.
pub fn migrate(doc: &mut Map<String, Value>) -> bool {
    let mut changed = false;

    if let Some(slot) = doc.get_mut(keys::COASTLINE_PRECISION) {
        changed |= canonicalize::<CoastlinePrecision>(slot);
    }
    if let Some(slot) = doc.get_mut(keys::FILE_SPLIT) {
        changed |= canonicalize::<FileSplit>(slot);
    }
    if let Some(slot) = doc.get_mut(keys::THEME) {
        changed |= canonicalize::<Theme>(slot);
    }
    if let Some(slot) = doc.get_mut(keys::RUN_MODE) {
        changed |= canonicalize::<RunMode>(slot);
    }
    if let Some(slot) = doc.get_mut(keys::BATHYMETRY) {
        changed |= canonicalize::<Bathymetry>(slot);
    }

    for key in boolean_keys() {
        let Some(slot) = doc.get_mut(key) else {
            continue;
        };
        if slot.is_boolean() {
            continue;
        }
        let coerced = coerce_bool(slot).unwrap_or_else(|| {
            defaults().get(key).and_then(Value::as_bool).unwrap_or(false)
        });
        *slot = Value::Bool(coerced);
        changed = true;
    }

    changed
}
