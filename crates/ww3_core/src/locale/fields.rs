//! The enumerated configuration fields.

use serde_json::Value;

use super::{EnumField, Locale};
use crate::config::keys;

/// Coastline resolution used by gridgen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CoastlinePrecision {
    #[default]
    Full,
    High,
    Medium,
    Low,
}

impl EnumField for CoastlinePrecision {
    const KEY: &'static str = keys::COASTLINE_PRECISION;

    fn all() -> &'static [Self] {
        &[Self::Full, Self::High, Self::Medium, Self::Low]
    }

    fn token(&self) -> &'static str {
        match self {
            Self::Full => "FULL",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }

    fn display(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::Full, Locale::English) => "Full",
            (Self::High, Locale::English) => "High",
            (Self::Medium, Locale::English) => "Medium",
            (Self::Low, Locale::English) => "Low",
            (Self::Full, Locale::Chinese) => "最高",
            (Self::High, Locale::Chinese) => "高",
            (Self::Medium, Locale::Chinese) => "中",
            (Self::Low, Locale::Chinese) => "低",
        }
    }
}

/// Output file split granularity (`*%TIMESPLIT` in the post-processing
/// NAMELISTs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FileSplit {
    #[default]
    None,
    Hour,
    Day,
    Month,
    Year,
}

impl FileSplit {
    /// WW3 TIMESPLIT code: 0 = single file, 10 = hourly, 8 = daily,
    /// 6 = monthly, 4 = yearly.
    pub fn timesplit(&self) -> i64 {
        match self {
            Self::None => 0,
            Self::Hour => 10,
            Self::Day => 8,
            Self::Month => 6,
            Self::Year => 4,
        }
    }

    /// Inverse of [`FileSplit::timesplit`].
    pub fn from_timesplit(code: i64) -> Option<Self> {
        Self::all().iter().copied().find(|v| v.timesplit() == code)
    }
}

impl EnumField for FileSplit {
    const KEY: &'static str = keys::FILE_SPLIT;

    fn all() -> &'static [Self] {
        &[Self::None, Self::Hour, Self::Day, Self::Month, Self::Year]
    }

    fn token(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Hour => "Hour",
            Self::Day => "Day",
            Self::Month => "Month",
            Self::Year => "Year",
        }
    }

    fn display(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::None, Locale::English) => "No split",
            (Self::Hour, Locale::English) => "Hour",
            (Self::Day, Locale::English) => "Day",
            (Self::Month, Locale::English) => "Month",
            (Self::Year, Locale::English) => "Year",
            (Self::None, Locale::Chinese) => "无",
            (Self::Hour, Locale::Chinese) => "小时",
            (Self::Day, Locale::Chinese) => "日",
            (Self::Month, Locale::Chinese) => "月",
            (Self::Year, Locale::Chinese) => "年",
        }
    }

    // Older configs stored the TIMESPLIT integer, as a number or a string.
    fn decode_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().and_then(Self::from_timesplit),
            Value::String(s) => Self::from_token(s)
                .or_else(|| Self::from_display(s))
                .or_else(|| s.trim().parse::<i64>().ok().and_then(Self::from_timesplit)),
            _ => None,
        }
    }
}

/// GUI color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    Light,
    Dark,
    #[default]
    Auto,
}

impl EnumField for Theme {
    const KEY: &'static str = keys::THEME;

    fn all() -> &'static [Self] {
        &[Self::Light, Self::Dark, Self::Auto]
    }

    fn token(&self) -> &'static str {
        match self {
            Self::Light => "LIGHT",
            Self::Dark => "DARK",
            Self::Auto => "AUTO",
        }
    }

    fn display(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::Light, Locale::English) => "Light",
            (Self::Dark, Locale::English) => "Dark",
            (Self::Auto, Locale::English) => "Follow system",
            (Self::Light, Locale::Chinese) => "浅色",
            (Self::Dark, Locale::Chinese) => "深色",
            (Self::Auto, Locale::Chinese) => "跟随系统",
        }
    }
}

/// Where runs execute; controls which GUI pages are visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunMode {
    #[default]
    Local,
    Server,
    Both,
}

impl EnumField for RunMode {
    const KEY: &'static str = keys::RUN_MODE;

    fn all() -> &'static [Self] {
        &[Self::Local, Self::Server, Self::Both]
    }

    fn token(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Server => "server",
            Self::Both => "both",
        }
    }

    fn display(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::Local, Locale::English) => "Local",
            (Self::Server, Locale::English) => "Server",
            (Self::Both, Locale::English) => "Local and server",
            (Self::Local, Locale::Chinese) => "本地",
            (Self::Server, Locale::Chinese) => "服务器",
            (Self::Both, Locale::Chinese) => "本地和服务器",
        }
    }
}

/// Bathymetry source. Dataset names are not translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Bathymetry {
    #[default]
    Gebco,
    Etop1,
    Etop2,
}

impl EnumField for Bathymetry {
    const KEY: &'static str = keys::BATHYMETRY;

    fn all() -> &'static [Self] {
        &[Self::Gebco, Self::Etop1, Self::Etop2]
    }

    fn token(&self) -> &'static str {
        match self {
            Self::Gebco => "GEBCO",
            Self::Etop1 => "ETOP1",
            Self::Etop2 => "ETOP2",
        }
    }

    fn display(&self, _locale: Locale) -> &'static str {
        self.token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn legacy_file_split_values_decode() {
        assert_eq!(FileSplit::decode(&json!(6)), FileSplit::Month);
        assert_eq!(FileSplit::decode(&json!("6")), FileSplit::Month);
        assert_eq!(FileSplit::decode(&json!("月")), FileSplit::Month);
        assert_eq!(FileSplit::decode(&json!("Month")), FileSplit::Month);
        assert_eq!(FileSplit::decode(&json!("month")), FileSplit::Month);
        assert_eq!(FileSplit::decode(&json!(10)), FileSplit::Hour);
    }

    // 8 is the daily TIMESPLIT code, so a stored 8 is Day, never Month.
    #[test]
    fn legacy_eight_is_day_per_timesplit_table() {
        assert_eq!(FileSplit::decode(&json!(8)), FileSplit::Day);
        assert_eq!(FileSplit::decode(&json!("8")), FileSplit::Day);
        assert_eq!(FileSplit::Day.timesplit(), 8);
        assert_ne!(FileSplit::decode(&json!(8)), FileSplit::Month);
    }

    #[test]
    fn unrecognized_values_use_defaults() {
        assert_eq!(FileSplit::decode(&json!(7)), FileSplit::None);
        assert_eq!(FileSplit::decode(&json!(null)), FileSplit::None);
        assert_eq!(CoastlinePrecision::decode(&json!("ultra")), CoastlinePrecision::Full);
        assert_eq!(Theme::decode(&json!(true)), Theme::Auto);
        assert_eq!(RunMode::decode_str("nowhere"), RunMode::Local);
    }

    #[test]
    fn timesplit_codes_match_ww3() {
        let codes: Vec<i64> = FileSplit::all().iter().map(|f| f.timesplit()).collect();
        assert_eq!(codes, vec![0, 10, 8, 6, 4]);
        assert_eq!(FileSplit::from_timesplit(4), Some(FileSplit::Year));
        assert_eq!(FileSplit::from_timesplit(5), None);
    }

    #[test]
    fn chinese_display_strings() {
        assert_eq!(CoastlinePrecision::Full.display(Locale::Chinese), "最高");
        assert_eq!(RunMode::Both.display(Locale::Chinese), "本地和服务器");
        assert_eq!(Bathymetry::Etop2.display(Locale::Chinese), "ETOP2");
    }
}
