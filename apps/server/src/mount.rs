//! Static routes for bundle directories and URL generation against them.

use axum::http::HeaderValue;
use packhub::manifest::{ManifestError, PackageRoots, Registry, StaticUrlResolver};
use std::path::PathBuf;
use tracing::{debug, warn};

/// One bundle directory exposed over HTTP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    /// Route prefix (`webpack-DEFAULT`) or external base URL (`https://cdn/...`).
    pub name: String,
    /// Asset path the bundles are addressed by (`app:bundles`, `/srv/dist`, ...).
    pub path: String,
    /// Directory on disk served by the route.
    pub dir: PathBuf,
    pub cache_max_age: Option<u64>,
}

impl Mount {
    /// External mounts only produce URLs; nothing is served locally.
    #[must_use]
    pub fn is_external(&self) -> bool {
        self.name.contains("://")
    }

    /// Route the directory is nested under, e.g. `/webpack-DEFAULT`.
    #[must_use]
    pub fn route(&self) -> String {
        format!("/{}", self.name.trim_matches('/'))
    }

    #[must_use]
    pub fn cache_control(&self) -> Option<HeaderValue> {
        self.cache_max_age.and_then(|age| HeaderValue::from_str(&format!("max-age={age}")).ok())
    }

    fn relative<'p>(&self, path: &'p str) -> Option<&'p str> {
        let prefix = self.path.trim_end_matches('/');
        path.strip_prefix(prefix)?.strip_prefix('/')
    }
}

/// Every static mount of the host, longest asset path first.
#[derive(Debug, Clone, Default)]
pub struct MountTable {
    base_url: String,
    mounts: Vec<Mount>,
}

impl MountTable {
    /// Registers a mount for every configuration with `static_view` enabled.
    ///
    /// # Errors
    /// Returns [`ManifestError::ResourceNotFound`] when a bundle directory belongs to an
    /// unregistered package.
    pub fn from_registry(
        registry: &Registry,
        roots: &PackageRoots,
        base_url: &str,
    ) -> Result<Self, ManifestError> {
        let mut table = Self { base_url: base_url.trim_end_matches('/').to_owned(), mounts: Vec::new() };

        for state in registry.states() {
            let cfg = state.configuration();
            if !cfg.static_view {
                debug!(config = %cfg.name, "Static view disabled");
                continue;
            }
            let dir = roots.locate(&cfg.static_view_path, &cfg.root_package).map_err(|source| {
                ManifestError::ResourceNotFound {
                    resource: cfg.static_view_path.clone(),
                    source,
                    context: Some(format!("Bundle directory of '{}'", cfg.name).into()),
                }
            })?;
            if !dir.is_dir() {
                warn!(config = %cfg.name, dir = %dir.display(), "Bundle directory does not exist yet");
            }
            table.add(Mount {
                name: cfg.static_view_name.clone(),
                path: cfg.static_view_path.clone(),
                dir,
                cache_max_age: cfg.cache_max_age,
            });
        }

        Ok(table)
    }

    /// Adds a mount; a later mount with the same name replaces the earlier one.
    pub fn add(&mut self, mount: Mount) {
        if let Some(pos) = self.mounts.iter().position(|known| known.name == mount.name) {
            warn!(name = %mount.name, "Static view registered twice, keeping the last one");
            self.mounts.remove(pos);
        }
        self.mounts.push(mount);
        self.mounts.sort_by_key(|mount| std::cmp::Reverse(mount.path.len()));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mount> {
        self.mounts.iter()
    }

    /// Locally served mounts.
    pub fn local(&self) -> impl Iterator<Item = &Mount> {
        self.mounts.iter().filter(|mount| !mount.is_external())
    }
}

impl StaticUrlResolver for MountTable {
    fn static_url(&self, path: &str) -> Result<String, ManifestError> {
        let (mount, rest) = self
            .mounts
            .iter()
            .find_map(|mount| mount.relative(path).map(|rest| (mount, rest)))
            .ok_or_else(|| ManifestError::StaticUrl { path: path.to_owned(), context: None })?;

        let name = mount.name.trim_matches('/');
        Ok(if mount.is_external() {
            format!("{name}/{rest}")
        } else {
            format!("{}/{name}/{rest}", self.base_url)
        })
    }
}
