//! Typed accessors over opaque settings maps.
//!
//! Settings on windows, blocks, and segments are open key-value maps that
//! mostly pass through to the native layer. The handful of keys the engine
//! itself interprets go through this module so lenient coercions (numeric
//! strings, mixed casing) are applied consistently everywhere.

use serde::{Deserialize, Serialize};

/// Opaque settings payload as it appears on the wire.
pub type SettingsMap = serde_json::Map<String, serde_json::Value>;

/// Look up a string-valued setting.
pub fn get_str<'a>(settings: &'a SettingsMap, key: &str) -> Option<&'a str> {
    settings.get(key).and_then(|v| v.as_str())
}

/// Look up a numeric setting. Accepts JSON numbers and numeric strings,
/// which design tools emit interchangeably.
pub fn get_f64(settings: &SettingsMap, key: &str) -> Option<f64> {
    match settings.get(key)? {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Look up a boolean setting. Accepts JSON booleans and "true"/"false" strings.
pub fn get_bool(settings: &SettingsMap, key: &str) -> Option<bool> {
    match settings.get(key)? {
        serde_json::Value::Bool(b) => Some(*b),
        serde_json::Value::String(s) => match s.trim() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Content alignment along an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    #[default]
    Start,
    Center,
    End,
}

impl Alignment {
    /// Parse the alignment spellings seen in published documents.
    ///
    /// # Examples
    /// ```
    /// use overcue_types::settings::Alignment;
    /// assert_eq!(Alignment::parse("left"), Some(Alignment::Start));
    /// assert_eq!(Alignment::parse("CENTER"), Some(Alignment::Center));
    /// assert_eq!(Alignment::parse("bottom"), Some(Alignment::End));
    /// assert_eq!(Alignment::parse("diagonal"), None);
    /// ```
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "start" | "left" | "top" | "leading" => Some(Self::Start),
            "center" | "centre" | "middle" => Some(Self::Center),
            "end" | "right" | "bottom" | "trailing" => Some(Self::End),
            _ => None,
        }
    }
}

/// Look up an alignment setting.
pub fn get_alignment(settings: &SettingsMap, key: &str) -> Option<Alignment> {
    get_str(settings, key).and_then(Alignment::parse)
}
