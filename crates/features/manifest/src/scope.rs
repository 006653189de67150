//! Request-scoped access to webpack configurations.

use crate::bundle::{BundleResolver, Extensions, StaticUrlResolver};
use crate::error::ManifestError;
use crate::manifest::{AssetDescriptor, Manifest};
use crate::registry::Registry;
use crate::state::ManifestState;
use fxhash::FxHashMap;
use packhub_domain::constants::DEFAULT_CONFIG;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Lives as long as one request and hands out at most one [`Webpack`] per name.
pub struct RequestScope {
    registry: Registry,
    urls: Arc<dyn StaticUrlResolver>,
    facades: Mutex<FxHashMap<String, Arc<Webpack>>>,
}

impl fmt::Debug for RequestScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestScope")
            .field("registry", &self.registry)
            .field("facades", &self.facades.lock().keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl RequestScope {
    #[must_use]
    pub fn new(registry: Registry, urls: Arc<dyn StaticUrlResolver>) -> Self {
        Self { registry, urls, facades: Mutex::new(FxHashMap::default()) }
    }

    /// The facade for configuration `name`, created on first use.
    ///
    /// # Errors
    /// Returns [`ManifestError::UnknownConfiguration`] for unregistered names.
    pub fn webpack(&self, name: &str) -> Result<Arc<Webpack>, ManifestError> {
        let mut facades = self.facades.lock();
        if let Some(webpack) = facades.get(name) {
            return Ok(Arc::clone(webpack));
        }

        let state = Arc::clone(self.registry.get(name)?);
        let webpack = Arc::new(Webpack::new(state, Arc::clone(&self.urls)));
        facades.insert(name.to_owned(), Arc::clone(&webpack));
        Ok(webpack)
    }

    /// Shorthand for the `DEFAULT` configuration.
    ///
    /// # Errors
    /// Returns [`ManifestError::UnknownConfiguration`] if `DEFAULT` is not registered.
    pub fn default_webpack(&self) -> Result<Arc<Webpack>, ManifestError> {
        self.webpack(DEFAULT_CONFIG)
    }

    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }
}

/// Public API of one configuration within a request.
///
/// The manifest is loaded on first use and then reused for the rest of the request,
/// so every bundle rendered by one request comes from the same snapshot.
pub struct Webpack {
    state: Arc<ManifestState>,
    urls: Arc<dyn StaticUrlResolver>,
    snapshot: Mutex<Option<Arc<Manifest>>>,
}

impl fmt::Debug for Webpack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Webpack")
            .field("config", &self.state.name())
            .field("loaded", &self.snapshot.lock().is_some())
            .finish_non_exhaustive()
    }
}

impl Webpack {
    #[must_use]
    pub fn new(state: Arc<ManifestState>, urls: Arc<dyn StaticUrlResolver>) -> Self {
        Self { state, urls, snapshot: Mutex::new(None) }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.state.name()
    }

    #[must_use]
    pub const fn state(&self) -> &Arc<ManifestState> {
        &self.state
    }

    /// The request's manifest snapshot, loading it with the configuration defaults.
    ///
    /// The snapshot lock is held across the blocking load, so concurrent callers on the
    /// same facade wait for the first load (including its compile wait) to finish.
    ///
    /// # Errors
    /// Propagates [`ManifestState::load`] failures; a failed load is retried on the
    /// next call.
    pub fn manifest(&self) -> Result<Arc<Manifest>, ManifestError> {
        let mut snapshot = self.snapshot.lock();
        if let Some(manifest) = snapshot.as_ref() {
            return Ok(Arc::clone(manifest));
        }
        let manifest = self.state.load(None, None)?;
        *snapshot = Some(Arc::clone(&manifest));
        Ok(manifest)
    }

    /// Assets of `bundle`, optionally limited to `extensions`.
    ///
    /// # Errors
    /// See [`ManifestState::load`] and [`BundleResolver::resolve`].
    pub fn get_bundle(
        &self,
        bundle: &str,
        extensions: Option<&Extensions>,
    ) -> Result<Vec<AssetDescriptor>, ManifestError> {
        let manifest = self.manifest()?;
        BundleResolver::new(&self.state, self.urls.as_ref()).resolve(&manifest, bundle, extensions)
    }
}
