//! Two-level settings resolution: named override, then `DEFAULT`, then hard default.

use crate::config::ConfigError;
use crate::settings::{SettingValue, SettingsSource};
use packhub_domain::config::Configuration;
use packhub_domain::constants::{
    BUNDLE_DIR, CACHE_MAX_AGE, CONFIGS, DEBUG, DEFAULT_CACHE_MAX_AGE, DEFAULT_CONFIG,
    FUTURE_CACHE_MAX_AGE, FUTURE_KEYWORD, IGNORE, IGNORE_RE, SETTINGS_PREFIX, STATIC_VIEW,
    STATIC_VIEW_NAME, STATS_FILE, TIMEOUT,
};
use std::time::Duration;
use tracing::debug;

/// Whether a named configuration falls back to `DEFAULT` for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inherit {
    Yes,
    No,
}

/// Full settings key for `key` in configuration `name`.
#[must_use]
pub fn setting_key(name: &str, key: &str) -> String {
    if name == DEFAULT_CONFIG {
        format!("{SETTINGS_PREFIX}.{key}")
    } else {
        format!("{SETTINGS_PREFIX}.{name}.{key}")
    }
}

/// Resolves one raw setting for configuration `name`.
///
/// # Errors
/// Propagates source read failures.
pub fn resolve<S>(
    source: &S,
    name: &str,
    key: &str,
    inherit: Inherit,
) -> Result<Option<SettingValue>, ConfigError>
where
    S: SettingsSource + ?Sized,
{
    if let Some(value) = source.get(&setting_key(name, key))? {
        return Ok(Some(value));
    }
    if name != DEFAULT_CONFIG && inherit == Inherit::Yes {
        return source.get(&setting_key(DEFAULT_CONFIG, key));
    }
    Ok(None)
}

/// Names of every configuration: `DEFAULT` first, then the `configs` list in order.
///
/// # Errors
/// Propagates source read failures.
pub fn configuration_names<S>(source: &S) -> Result<Vec<String>, ConfigError>
where
    S: SettingsSource + ?Sized,
{
    let mut names = vec![DEFAULT_CONFIG.to_owned()];
    if let Some(extra) = source.get(&setting_key(DEFAULT_CONFIG, CONFIGS))? {
        for name in extra.as_list() {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    Ok(names)
}

/// Builds the resolved [`Configuration`] for `name`.
///
/// Identity settings (`static_view`, `bundle_dir`, `static_view_name`, `stats_file`)
/// belong to each configuration; behaviour settings (`debug`, `timeout`,
/// `cache_max_age`, `ignore`, `ignore_re`) inherit from `DEFAULT`.
///
/// # Errors
/// Returns [`ConfigError::InvalidValue`] for unparsable numbers.
pub fn resolve_configuration<S>(
    source: &S,
    name: &str,
    root_package: &str,
) -> Result<Configuration, ConfigError>
where
    S: SettingsSource + ?Sized,
{
    let mut cfg = Configuration::defaults(name, root_package);
    let lookup = |key: &str, inherit: Inherit| resolve(source, name, key, inherit);

    if let Some(value) = lookup(DEBUG, Inherit::Yes)? {
        cfg.debug = value.as_bool();
    }
    if let Some(value) = lookup(STATIC_VIEW, Inherit::No)? {
        cfg.static_view = value.as_bool();
    }
    if let Some(value) = lookup(BUNDLE_DIR, Inherit::No)? {
        cfg.static_view_path = namespaced(&value.to_string(), root_package);
    }
    if let Some(value) = lookup(STATIC_VIEW_NAME, Inherit::No)? {
        cfg.static_view_name = value.to_string();
    }
    if let Some(value) = lookup(STATS_FILE, Inherit::No)? {
        cfg.stats_file = value.to_string();
    }
    if let Some(value) = lookup(TIMEOUT, Inherit::Yes)? {
        cfg.timeout = timeout(&value, &setting_key(name, TIMEOUT))?;
    }
    cfg.cache_max_age = match lookup(CACHE_MAX_AGE, Inherit::Yes)? {
        Some(value) => cache_max_age(&value, &setting_key(name, CACHE_MAX_AGE))?,
        None if cfg.debug => None,
        None => Some(DEFAULT_CACHE_MAX_AGE),
    };
    if let Some(value) = lookup(IGNORE, Inherit::Yes)? {
        cfg.ignore = value.as_list();
    }
    if let Some(value) = lookup(IGNORE_RE, Inherit::Yes)? {
        cfg.ignore_re = value.as_list();
    }

    debug!(
        config = %cfg.name,
        debug = cfg.debug,
        stats_file = %cfg.stats_file,
        static_view = %cfg.static_view_path,
        "Resolved webpack configuration"
    );
    Ok(cfg)
}

/// Prefixes a relative location with the root package (`dir` -> `pkg:dir`).
#[must_use]
pub fn namespaced(location: &str, root_package: &str) -> String {
    if location.contains(':') || location.starts_with('/') {
        location.to_owned()
    } else {
        format!("{root_package}:{location}")
    }
}

fn timeout(value: &SettingValue, key: &str) -> Result<Option<Duration>, ConfigError> {
    let seconds = value.as_f64(key)?;
    Duration::try_from_secs_f64(seconds)
        .map(|duration| (!duration.is_zero()).then_some(duration))
        .map_err(|e| ConfigError::InvalidValue {
            key: key.to_owned(),
            message: format!("timeout must be a non-negative number of seconds, got {seconds}: {e}")
                .into(),
            context: None,
        })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn cache_max_age(value: &SettingValue, key: &str) -> Result<Option<u64>, ConfigError> {
    if matches!(value, SettingValue::Str(raw) if raw.trim() == FUTURE_KEYWORD) {
        return Ok(Some(FUTURE_CACHE_MAX_AGE));
    }
    let seconds = value.as_f64(key)?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(ConfigError::InvalidValue {
            key: key.to_owned(),
            message: format!("cache_max_age must be non-negative, got {seconds}").into(),
            context: None,
        });
    }
    Ok(Some(seconds.round() as u64))
}
