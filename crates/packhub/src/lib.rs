//! Facade crate for packhub.
//! Re-exports domain/kernel primitives and the manifest feature, and wires a
//! [`manifest::Registry`] from host settings in one call.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! ```rust,no_run
//! use packhub::domain::config::AssetsConfig;
//! use packhub::kernel::config::load_settings;
//!
//! let settings = load_settings(Some("server.toml")).unwrap();
//! let registry = packhub::init(&settings, &AssetsConfig::default()).unwrap();
//! ```

pub use packhub_domain as domain;
pub use packhub_kernel as kernel;
pub use packhub_manifest as manifest;

use packhub_domain::config::AssetsConfig;
use packhub_kernel::settings::SettingsSource;
use packhub_manifest::{ManifestError, PackageRoots, Registry};
use tracing::info;

/// Package directories declared in the host's `[assets]` table.
#[must_use]
pub fn package_roots(assets: &AssetsConfig) -> PackageRoots {
    PackageRoots::from(assets.packages.clone())
}

/// Builds the configuration registry for a host.
///
/// # Errors
/// Returns [`ManifestError`] if a `webpack.*` setting is invalid or an ignore rule
/// does not compile.
pub fn init<S>(settings: &S, assets: &AssetsConfig) -> Result<Registry, ManifestError>
where
    S: SettingsSource + ?Sized,
{
    let registry = Registry::from_settings(settings, &assets.root_package, &package_roots(assets))?;
    info!(root_package = %assets.root_package, configs = registry.len(), "packhub initialized");
    Ok(registry)
}
