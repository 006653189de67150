use crate::settings::Settings;
use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment prefix for overrides (`PACKHUB__WEBPACK__DEBUG=true` -> `webpack.debug`).
pub const ENV_PREFIX: &str = "PACKHUB";

/// Errors raised while loading or interpreting settings.
#[packhub_derive::packhub_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },

    #[error("Invalid value for '{key}'{}: {message}", format_context(.context))]
    InvalidValue {
        key: String,
        message: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },
}

/// Loads the layered settings used by a host application.
///
/// 1. **Base file**: `path` (defaults to `server`, any format the `config` crate detects).
/// 2. **Environment**: variables prefixed with `PACKHUB__`, nested with `__`
///    (e.g. `PACKHUB__WEBPACK__OTHER__STATS_FILE` -> `webpack.other.stats_file`).
///
/// The result is both a [`crate::settings::SettingsSource`] for webpack settings and a
/// deserializer for typed host config (see [`Settings::deserialize`]).
///
/// # Errors
/// Returns [`ConfigError::Config`] if the file is missing or malformed.
///
/// # Example
/// ```rust,no_run
/// use packhub_kernel::config::load_settings;
///
/// let settings = load_settings(Some("config/server.toml")).unwrap();
/// ```
pub fn load_settings(path: Option<impl AsRef<Path>>) -> Result<Settings, ConfigError> {
    let effective_path = path.map_or_else(|| PathBuf::from("server"), |p| p.as_ref().to_path_buf());

    info!(path = %effective_path.display(), "Loading settings");

    let config = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(true))
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()
        .context(format!("Failed to build settings from {}", effective_path.display()))?;

    Ok(Settings::new(config))
}

/// Loads settings and deserializes them straight into `T`.
///
/// # Errors
/// Returns [`ConfigError::Config`] if loading or deserialization fails.
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    load_settings(path)?.deserialize()
}
