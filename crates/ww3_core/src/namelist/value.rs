//! Typed right-hand sides and their NAMELIST formatting rules.

use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// A decimal number together with the text the user typed it as.
///
/// `"0.04118"` is written back as `0.04118`, digit for digit, even where
/// the `f64` cannot represent it exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct Decimal {
    value: f64,
    places: usize,
    text: String,
}

impl Decimal {
    pub fn new(value: f64, places: usize) -> Self {
        Self {
            value,
            places,
            text: format!("{:.*}", places, value),
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn places(&self) -> usize {
        self.places
    }

    /// The typed text, zero-padded to at least `min_places` fraction digits.
    fn format_min_places(&self, min_places: usize) -> String {
        if self.places >= min_places {
            return self.text.clone();
        }
        let mut out = self.text.clone();
        if self.places == 0 {
            out.push('.');
        }
        out.extend(std::iter::repeat('0').take(min_places - self.places));
        out
    }
}

impl FromStr for Decimal {
    type Err = CoreError;

    fn from_str(text: &str) -> CoreResult<Self> {
        let text = text.trim();
        let value: f64 = text
            .parse()
            .map_err(|_| CoreError::validation(format!("'{}' is not a number", text)))?;
        if !value.is_finite() {
            return Err(CoreError::validation(format!("'{}' is not a finite number", text)));
        }

        if text.contains(['e', 'E']) {
            // Exponent form: write the shortest positional text that
            // round-trips the value.
            let shortest = value.to_string();
            let places = shortest.split_once('.').map(|(_, f)| f.len()).unwrap_or(0);
            return Ok(Self {
                value,
                places,
                text: shortest,
            });
        }

        let text = normalize_positional(text);
        let places = text.split_once('.').map(|(_, f)| f.len()).unwrap_or(0);
        Ok(Self {
            value,
            places,
            text,
        })
    }
}

/// `+1.5` to `1.5`, `.5` to `0.5`, `-.5` to `-0.5`, `5.` to `5`.
fn normalize_positional(text: &str) -> String {
    let text = text.strip_prefix('+').unwrap_or(text);
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let digits = digits.strip_suffix('.').unwrap_or(digits);
    if digits.starts_with('.') {
        format!("{}0{}", sign, digits)
    } else {
        format!("{}{}", sign, digits)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Right-hand side of a NAMELIST assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum NamelistValue {
    /// Floating literal; always written with at least one fractional digit.
    Float(Decimal),
    /// Integer literal.
    Int(i64),
    /// Signed decimal, written exactly as typed (e.g. `GRID%ZLIM = -0.1`).
    Signed(Decimal),
    /// Quoted, space-separated tokens: `'HS DIR FP T02'`.
    List(Vec<String>),
}

impl NamelistValue {
    /// The literal RHS text.
    pub fn format(&self) -> String {
        match self {
            NamelistValue::Float(d) => d.format_min_places(1),
            NamelistValue::Int(i) => i.to_string(),
            NamelistValue::Signed(d) => d.to_string(),
            NamelistValue::List(tokens) => format!("'{}'", tokens.join(" ")),
        }
    }

    /// Parse user text for `key` using that key's formatting rule.
    pub fn for_key(key: &str, raw: &str) -> CoreResult<Self> {
        let key = key.trim().to_ascii_uppercase();
        match key.as_str() {
            "SPECTRUM%XFR" | "SPECTRUM%FREQ1" => Ok(NamelistValue::Float(raw.parse()?)),
            "SPECTRUM%NK" | "SPECTRUM%NTH" | "FIELD%TIMESPLIT" | "POINT%TIMESPLIT"
            | "TRACK%TIMESPLIT" => parse_int(raw).map(NamelistValue::Int),
            k if k.starts_with("TIMESTEPS%DT") => parse_int(raw).map(NamelistValue::Int),
            "GRID%ZLIM" | "GRID%DMIN" => Ok(NamelistValue::Signed(raw.parse()?)),
            "FIELD%LIST" | "TYPE%FIELD%LIST" => Ok(NamelistValue::List(
                unquote(raw).split_whitespace().map(str::to_string).collect(),
            )),
            _ => Err(CoreError::validation(format!("no NAMELIST format for key {}", key))),
        }
    }
}

fn parse_int(raw: &str) -> CoreResult<i64> {
    raw.trim()
        .parse()
        .map_err(|_| CoreError::validation(format!("'{}' is not an integer", raw.trim())))
}

/// Strip a trailing comma and one level of surrounding quotes.
pub fn unquote(raw: &str) -> &str {
    let raw = raw.trim().trim_end_matches(',').trim_end();
    for q in ['\'', '"'] {
        if raw.len() >= 2 && raw.starts_with(q) && raw.ends_with(q) {
            return &raw[1..raw.len() - 1];
        }
    }
    raw
}

/// One `(group, key, value)` edit for [`super::rewrite`].
#[derive(Debug, Clone, PartialEq)]
pub struct NamelistEdit {
    pub group: String,
    pub key: String,
    pub value: NamelistValue,
}

impl NamelistEdit {
    pub fn new(group: impl Into<String>, key: impl Into<String>, value: NamelistValue) -> Self {
        Self {
            group: group.into(),
            key: key.into(),
            value,
        }
    }

    pub(crate) fn targets(&self, group: &str) -> bool {
        self.group.eq_ignore_ascii_case(group)
    }
}
