//! Setting names and defaults understood by the settings resolver.

/// Name of the configuration every other configuration inherits from.
pub const DEFAULT_CONFIG: &str = "DEFAULT";

/// Prefix of every webpack setting key (`webpack.<key>` / `webpack.<name>.<key>`).
pub const SETTINGS_PREFIX: &str = "webpack";

pub const DEBUG: &str = "debug";
pub const STATIC_VIEW: &str = "static_view";
pub const BUNDLE_DIR: &str = "bundle_dir";
pub const STATIC_VIEW_NAME: &str = "static_view_name";
pub const STATS_FILE: &str = "stats_file";
pub const TIMEOUT: &str = "timeout";
pub const CACHE_MAX_AGE: &str = "cache_max_age";
pub const IGNORE: &str = "ignore";
pub const IGNORE_RE: &str = "ignore_re";
pub const CONFIGS: &str = "configs";

pub const DEFAULT_STATS_FILE: &str = "webpack-stats.json";
pub const DEFAULT_IGNORE: &[&str] = &["*.hot-update.js", "*.map"];

/// `cache_max_age` applied outside debug mode when nothing is configured.
pub const DEFAULT_CACHE_MAX_AGE: u64 = 3600;

/// Keyword accepted by `cache_max_age` for far-future expiry.
pub const FUTURE_KEYWORD: &str = "future";

/// Ten years, in seconds.
pub const FUTURE_CACHE_MAX_AGE: u64 = 10 * 365 * 24 * 60 * 60;

/// Prefix used for the default mount path and mount name of a configuration.
pub const MOUNT_PREFIX: &str = "webpack-";
