//! # Webpack manifests
//!
//! Reads the stats file written by `webpack-bundle-tracker` and turns named bundles
//! into ordered lists of asset URLs for server-side templates.
//!
//! ## Architecture
//!
//! 1.  **Resources ([`resource`]):** absolute paths or `package:path` locations.
//! 2.  **State ([`state`]):** one [`ManifestState`] per named configuration; owns the
//!     cache slot ([`cache`]) and the load / retry / wait loop.
//! 3.  **Bundles ([`bundle`]):** filters chunks through extensions and ignore rules
//!     ([`rules`]) and attaches URLs.
//! 4.  **Registry & scope ([`registry`], [`scope`]):** the process-wide configuration map
//!     and the per-request memoized [`Webpack`] facades.
//! 5.  **Rendering ([`render`]):** callback API for template engines.
//!
//! ## Example
//!
//! ```rust,no_run
//! use packhub_kernel::settings::FlatSettings;
//! use packhub_manifest::{ManifestError, PackageRoots, Registry, RequestScope};
//! use std::sync::Arc;
//!
//! let settings = FlatSettings::new().with("webpack.stats_file", "/srv/app/webpack-stats.json");
//! let registry = Registry::from_settings(&settings, "app", &PackageRoots::new())?;
//! let urls = |path: &str| Ok::<_, ManifestError>(format!("/static/{path}"));
//!
//! let scope = RequestScope::new(registry, Arc::new(urls));
//! for asset in scope.webpack("DEFAULT")?.get_bundle("main", None)? {
//!     println!("{}", asset.url());
//! }
//! # Ok::<(), ManifestError>(())
//! ```

pub mod bundle;
pub mod cache;
mod error;
pub mod manifest;
pub mod registry;
pub mod render;
pub mod resource;
pub mod rules;
pub mod scope;
pub mod state;

pub use crate::bundle::{BundleResolver, Extensions, StaticUrlResolver};
pub use crate::cache::ManifestCache;
pub use crate::error::{ManifestError, ManifestErrorExt};
pub use crate::manifest::{AssetDescriptor, Manifest, ManifestStatus};
pub use crate::registry::Registry;
pub use crate::render::{ASSET, BundleRef, render_bundle};
pub use crate::resource::{ManifestResource, PackageRoots};
pub use crate::scope::{RequestScope, Webpack};
pub use crate::state::ManifestState;
