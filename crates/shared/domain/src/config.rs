use crate::constants::{DEFAULT_IGNORE, DEFAULT_STATS_FILE, MOUNT_PREFIX};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr};
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Fully resolved settings of one named webpack configuration.
///
/// Built by the kernel's settings resolver; every field already carries the
/// inherited or default value, so consumers never probe the raw settings again.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    pub name: String,
    /// Namespace applied to relative locations (`stats_file`, `bundle_dir`).
    pub root_package: String,
    /// Disables manifest caching and enables waiting for the compiler.
    pub debug: bool,
    /// Whether the host should register a static file route for the bundles.
    pub static_view: bool,
    /// Asset path of the bundle directory (`package:dir`, absolute dir, or bare name).
    pub static_view_path: String,
    /// Route name (or external base URL) the bundle directory is served under.
    pub static_view_name: String,
    /// Location of the manifest written by the bundle tracker.
    pub stats_file: String,
    /// Upper bound on waiting for a compile; `None` waits forever.
    pub timeout: Option<Duration>,
    /// `Cache-Control: max-age` for the static route, in seconds.
    pub cache_max_age: Option<u64>,
    /// Glob rules; matching chunk names are dropped from bundles.
    pub ignore: Vec<String>,
    /// Regex rules, matched from the start of the chunk name.
    pub ignore_re: Vec<String>,
}

impl Configuration {
    /// Hard defaults for `name`, before any setting is applied.
    #[must_use]
    pub fn defaults(name: impl Into<String>, root_package: impl Into<String>) -> Self {
        let name = name.into();
        let mount = format!("{MOUNT_PREFIX}{name}");
        Self {
            root_package: root_package.into(),
            debug: false,
            static_view: true,
            static_view_path: mount.clone(),
            static_view_name: mount,
            stats_file: DEFAULT_STATS_FILE.to_owned(),
            timeout: None,
            cache_max_age: None,
            ignore: DEFAULT_IGNORE.iter().map(|rule| (*rule).to_owned()).collect(),
            ignore_re: Vec::new(),
            name,
        }
    }

    /// Caching is on unless the configuration runs in debug mode.
    #[must_use]
    pub const fn should_cache(&self) -> bool {
        !self.debug
    }

    /// Waiting for an in-progress compile is on only in debug mode.
    #[must_use]
    pub const fn should_wait(&self) -> bool {
        self.debug
    }
}

/// Host application configuration (everything outside the `webpack` table).
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfigInner {
    pub server: ServerConfig,
    pub assets: AssetsConfig,
}

/// Arc-wrapped config for inexpensive cloning into handlers.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(flatten, default)]
    inner: Arc<AppConfigInner>,
}

impl Deref for AppConfig {
    type Target = AppConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for AppConfig {
    fn deref_mut(&mut self) -> &mut AppConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,
    /// Prefix for generated static URLs (e.g. `https://app.example.com`); empty for
    /// host-relative URLs.
    pub base_url: String,
}

/// Package namespaces and their directories on disk.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Namespace for relative `stats_file` / `bundle_dir` values.
    pub root_package: String,
    /// `package name -> directory` used to open `package:path` locations.
    pub packages: BTreeMap<String, PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { address: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: 6543, base_url: String::new() }
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        let mut packages = BTreeMap::new();
        packages.insert("app".to_owned(), PathBuf::from("."));
        Self { root_package: "app".to_owned(), packages }
    }
}
