//! Locale policy: canonical tokens vs. localized display strings.
//!
//! Every enumerated config value has a stable, locale-free canonical token
//! used in JSON, NAMELIST and all logic, plus one display string per
//! supported locale for the GUI. Only canonical tokens are ever persisted.
//!
//! Decoding is forgiving: it accepts the canonical token, any locale's
//! display string, and (for [`FileSplit`]) the legacy WW3 integer code, so
//! older config files written with translated text migrate cleanly.

mod fields;

pub use fields::{Bathymetry, CoastlinePrecision, FileSplit, RunMode, Theme};

use serde_json::Value;
use unic_langid::LanguageIdentifier;

/// Supported GUI locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    English,
    Chinese,
}

impl Locale {
    /// Every supported locale.
    pub const ALL: [Locale; 2] = [Locale::English, Locale::Chinese];

    /// Map a `LANGUAGE` config tag (`en_US`, `zh-CN`, `zh`, ...) to a locale.
    ///
    /// Unknown or unparsable tags fall back to English.
    pub fn from_tag(tag: &str) -> Self {
        let normalized = tag.trim().replace('_', "-");
        match normalized.parse::<LanguageIdentifier>() {
            Ok(langid) => match langid.language.as_str() {
                "zh" => Locale::Chinese,
                _ => Locale::English,
            },
            Err(e) => {
                tracing::debug!("Unrecognized language tag '{}': {}", tag, e);
                Locale::English
            }
        }
    }

    /// Canonical tag stored in the `LANGUAGE` key.
    pub fn tag(&self) -> &'static str {
        match self {
            Locale::English => "en_US",
            Locale::Chinese => "zh_CN",
        }
    }
}

/// An enumerated configuration field with canonical and display forms.
pub trait EnumField: Copy + PartialEq + Default + 'static {
    /// Config key holding this field.
    const KEY: &'static str;

    /// All values, in combo-box order.
    fn all() -> &'static [Self];

    /// Canonical, locale-free token.
    fn token(&self) -> &'static str;

    /// Display string for the given locale.
    fn display(&self, locale: Locale) -> &'static str;

    /// Create from index (for UI combo boxes).
    fn from_index(index: usize) -> Self {
        Self::all().get(index).copied().unwrap_or_default()
    }

    /// Get index of this value (for UI combo boxes).
    fn to_index(&self) -> usize {
        Self::all().iter().position(|v| v == self).unwrap_or(0)
    }

    /// Match a canonical token, ignoring ASCII case.
    fn from_token(text: &str) -> Option<Self> {
        let text = text.trim();
        Self::all()
            .iter()
            .copied()
            .find(|v| v.token().eq_ignore_ascii_case(text))
    }

    /// Match a display string from any supported locale.
    fn from_display(text: &str) -> Option<Self> {
        let text = text.trim();
        Self::all().iter().copied().find(|v| {
            Locale::ALL
                .iter()
                .any(|l| v.display(*l).eq_ignore_ascii_case(text))
        })
    }

    /// Decode a stored value, `None` if nothing matches.
    fn decode_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Self::from_token(s).or_else(|| Self::from_display(s)),
            _ => None,
        }
    }

    /// Decode a stored value, falling back to the documented default.
    fn decode(value: &Value) -> Self {
        Self::decode_value(value).unwrap_or_else(|| {
            let fallback = Self::default();
            tracing::debug!(
                "Unrecognized {} value {}, using '{}'",
                Self::KEY,
                value,
                fallback.token()
            );
            fallback
        })
    }

    /// Decode free text from the GUI (token or display string).
    fn decode_str(text: &str) -> Self {
        Self::decode(&Value::String(text.to_string()))
    }

    /// Display strings for all values, for populating a combo box.
    fn display_choices(locale: Locale) -> Vec<&'static str> {
        Self::all().iter().map(|v| v.display(locale)).collect()
    }
}

/// Replace a stored enumerated value with its canonical token.
///
/// Returns true if the stored value changed.
pub fn canonicalize<F: EnumField>(slot: &mut Value) -> bool {
    let canonical = Value::String(F::decode(slot).token().to_string());
    if *slot != canonical {
        *slot = canonical;
        true
    } else {
        false
    }
}
