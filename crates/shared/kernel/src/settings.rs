//! Settings sources and value coercions.
//!
//! Hosts hand settings over either as a flat key-value map ([`FlatSettings`]) or as a
//! layered `config` tree ([`Settings`]). Both answer dotted keys such as
//! `webpack.other.stats_file`.

use crate::config::{ConfigError, ConfigErrorExt};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fmt;

const TRUTHY: &[&str] = &["t", "true", "y", "yes", "on", "1"];

/// A raw setting value as delivered by the host.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<String>),
}

impl SettingValue {
    /// Truthiness the way host settings spell it (`true`, `yes`, `on`, `1`, ...).
    #[must_use]
    pub fn as_bool(&self) -> bool {
        match self {
            Self::Bool(value) => *value,
            Self::Int(value) => *value != 0,
            Self::Float(value) => *value != 0.0,
            Self::Str(value) => TRUTHY.contains(&value.trim().to_lowercase().as_str()),
            Self::List(_) => false,
        }
    }

    /// Whitespace-separated words; list items are split and flattened too.
    #[must_use]
    pub fn as_list(&self) -> Vec<String> {
        match self {
            Self::List(items) => {
                items.iter().flat_map(|item| item.split_whitespace()).map(str::to_owned).collect()
            },
            Self::Str(value) => value.split_whitespace().map(str::to_owned).collect(),
            other => vec![other.to_string()],
        }
    }

    /// Numeric view, accepting numeric strings.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] for lists, booleans and non-numeric strings.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self, key: &str) -> Result<f64, ConfigError> {
        match self {
            Self::Int(value) => Ok(*value as f64),
            Self::Float(value) => Ok(*value),
            Self::Str(value) => value.trim().parse::<f64>().map_err(|e| ConfigError::InvalidValue {
                key: key.to_owned(),
                message: format!("'{value}' is not a number: {e}").into(),
                context: None,
            }),
            other => Err(ConfigError::InvalidValue {
                key: key.to_owned(),
                message: format!("expected a number, got {other}").into(),
                context: None,
            }),
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Str(value) => f.write_str(value),
            Self::List(items) => f.write_str(&items.join(" ")),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for SettingValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<Vec<&str>> for SettingValue {
    fn from(items: Vec<&str>) -> Self {
        Self::List(items.into_iter().map(str::to_owned).collect())
    }
}

/// Anything that can answer a dotted settings key.
pub trait SettingsSource: Send + Sync {
    /// Looks up `key`; `Ok(None)` means the key is not set at all.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the key exists but cannot be read as a setting value.
    fn get(&self, key: &str) -> Result<Option<SettingValue>, ConfigError>;
}

/// Flat `key -> value` settings, the shape most hosts pass around.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatSettings {
    values: BTreeMap<String, SettingValue>,
}

impl FlatSettings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<SettingValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<SettingValue>) {
        self.values.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for FlatSettings
where
    K: Into<String>,
    V: Into<SettingValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut settings = Self::new();
        for (key, value) in iter {
            settings.insert(key, value);
        }
        settings
    }
}

impl SettingsSource for FlatSettings {
    fn get(&self, key: &str) -> Result<Option<SettingValue>, ConfigError> {
        Ok(self.values.get(key).cloned())
    }
}

/// Layered settings backed by the `config` crate (file + environment).
#[derive(Debug, Clone)]
pub struct Settings {
    inner: config::Config,
}

impl Settings {
    #[must_use]
    pub const fn new(inner: config::Config) -> Self {
        Self { inner }
    }

    /// Deserializes the whole tree into a typed host config.
    ///
    /// # Errors
    /// Returns [`ConfigError::Config`] if the tree does not match `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        self.inner.clone().try_deserialize::<T>().context("Failed to deserialize settings")
    }
}

impl SettingsSource for Settings {
    fn get(&self, key: &str) -> Result<Option<SettingValue>, ConfigError> {
        match self.inner.get::<SettingValue>(key) {
            Ok(value) => Ok(Some(value)),
            Err(config::ConfigError::NotFound(_)) => Ok(None),
            Err(source) => Err(ConfigError::Config {
                source,
                context: Some(format!("Failed to read setting '{key}'").into()),
            }),
        }
    }
}

impl<S: SettingsSource + ?Sized> SettingsSource for &S {
    fn get(&self, key: &str) -> Result<Option<SettingValue>, ConfigError> {
        (**self).get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthy_strings() {
        for raw in ["true", "True", " yes ", "on", "1", "t", "Y"] {
            assert!(SettingValue::from(raw).as_bool(), "{raw} should be truthy");
        }
        for raw in ["false", "no", "0", "", "maybe"] {
            assert!(!SettingValue::from(raw).as_bool(), "{raw} should be falsy");
        }
        assert!(SettingValue::Bool(true).as_bool());
        assert!(SettingValue::Int(1).as_bool());
        assert!(!SettingValue::Int(0).as_bool());
    }

    #[test]
    fn lists_split_on_whitespace() {
        let value = SettingValue::from("*.map\n*.hot-update.js  *.txt");
        assert_eq!(value.as_list(), vec!["*.map", "*.hot-update.js", "*.txt"]);

        let value = SettingValue::from(vec!["a b", "c"]);
        assert_eq!(value.as_list(), vec!["a", "b", "c"]);
    }

    #[test]
    fn numbers_accept_strings() {
        assert!((SettingValue::from("0.5").as_f64("timeout").unwrap() - 0.5).abs() < f64::EPSILON);
        assert!((SettingValue::Int(3).as_f64("timeout").unwrap() - 3.0).abs() < f64::EPSILON);

        let err = SettingValue::from("soon").as_f64("timeout").expect_err("not a number");
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "timeout"));
    }

    #[test]
    fn flat_settings_lookup() {
        let settings: FlatSettings =
            [("webpack.debug", SettingValue::Bool(true))].into_iter().collect();

        assert_eq!(settings.get("webpack.debug").unwrap(), Some(SettingValue::Bool(true)));
        assert_eq!(settings.get("webpack.timeout").unwrap(), None);
        assert_eq!(settings.len(), 1);
    }
}
