//! # Manifest State
//!
//! One [`ManifestState`] per named webpack configuration. It owns the resolved
//! settings, the compiled ignore rules and the manifest cache, and implements the
//! load algorithm:
//!
//! 1. Serve the cached manifest when caching is on and the slot is populated.
//! 2. Otherwise decode the stats file, retrying malformed JSON up to three times
//!    (the tracker may be halfway through rewriting it).
//! 3. When waiting, poll while the compiler reports `compiling`, bounded by the
//!    configured timeout.
//! 4. Store the fresh manifest and return it.
//!
//! Loading blocks the calling thread. Async hosts go through `spawn_blocking`.

use crate::cache::ManifestCache;
use crate::error::{ManifestError, ManifestErrorExt};
use crate::manifest::Manifest;
use crate::resource::{ManifestResource, PackageRoots};
use crate::rules::IgnoreRules;
use packhub_domain::config::Configuration;
use packhub_kernel::resolve::resolve_configuration;
use packhub_kernel::settings::SettingsSource;
use private::Sealed;
use std::io::Read;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Decode attempts before a malformed stats file is reported.
pub const DECODE_ATTEMPTS: u32 = 3;
/// Backoff unit between decode attempts (`attempt * RETRY_BACKOFF`).
pub const RETRY_BACKOFF: Duration = Duration::from_millis(200);
/// Sleep between polls while the compiler is running.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug)]
pub struct NoConfiguration;
#[derive(Debug)]
pub struct WithConfiguration(Configuration);

mod private {
    pub trait Sealed {}
}
impl Sealed for NoConfiguration {}
impl Sealed for WithConfiguration {}

/// Builder for [`ManifestState`]; [`ManifestStateBuilder::build`] appears once a
/// configuration is set.
#[derive(Debug)]
pub struct ManifestStateBuilder<C: Sealed = NoConfiguration> {
    configuration: C,
    roots: PackageRoots,
    cache: Option<Arc<ManifestCache>>,
}

impl ManifestStateBuilder<NoConfiguration> {
    pub fn configuration(self, configuration: Configuration) -> ManifestStateBuilder<WithConfiguration> {
        ManifestStateBuilder {
            configuration: WithConfiguration(configuration),
            roots: self.roots,
            cache: self.cache,
        }
    }
}

impl<C: Sealed> ManifestStateBuilder<C> {
    /// Package directories used to open `package:path` stats files.
    #[must_use = "The builder must be finished with build()."]
    pub fn roots(mut self, roots: PackageRoots) -> Self {
        self.roots = roots;
        self
    }

    /// Injects an existing cache slot (e.g. one shared with a test).
    #[must_use = "The builder must be finished with build()."]
    pub fn cache(mut self, cache: Arc<ManifestCache>) -> Self {
        self.cache = Some(cache);
        self
    }
}

impl ManifestStateBuilder<WithConfiguration> {
    /// # Errors
    /// Returns [`ManifestError::InvalidRule`] if an ignore glob or regex does not compile.
    pub fn build(self) -> Result<ManifestState, ManifestError> {
        let configuration = self.configuration.0;
        let rules = IgnoreRules::compile(&configuration.ignore, &configuration.ignore_re)
            .context(format!("Configuration '{}'", configuration.name))?;
        let stats_file =
            ManifestResource::create(&configuration.stats_file, &configuration.root_package);

        debug!(config = %configuration.name, %stats_file, "Manifest state ready");

        Ok(ManifestState {
            configuration,
            stats_file,
            rules,
            roots: self.roots,
            cache: self.cache.unwrap_or_default(),
        })
    }
}

/// Settings, ignore rules and cached manifest of one webpack configuration.
#[derive(Debug)]
pub struct ManifestState {
    configuration: Configuration,
    stats_file: ManifestResource,
    rules: IgnoreRules,
    roots: PackageRoots,
    cache: Arc<ManifestCache>,
}

impl ManifestState {
    #[must_use]
    pub fn builder() -> ManifestStateBuilder {
        ManifestStateBuilder { configuration: NoConfiguration, roots: PackageRoots::new(), cache: None }
    }

    /// Resolves configuration `name` from raw settings and builds its state.
    ///
    /// # Errors
    /// * [`ManifestError::Settings`] when a setting has an invalid value.
    /// * [`ManifestError::InvalidRule`] when an ignore rule does not compile.
    pub fn from_settings<S>(
        source: &S,
        name: &str,
        root_package: &str,
        roots: PackageRoots,
    ) -> Result<Self, ManifestError>
    where
        S: SettingsSource + ?Sized,
    {
        let configuration = resolve_configuration(source, name, root_package)
            .context(format!("Resolving webpack configuration '{name}'"))?;
        Self::builder().configuration(configuration).roots(roots).build()
    }

    #[must_use]
    pub const fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.configuration.name
    }

    #[must_use]
    pub const fn stats_file(&self) -> &ManifestResource {
        &self.stats_file
    }

    #[must_use]
    pub const fn rules(&self) -> &IgnoreRules {
        &self.rules
    }

    #[must_use]
    pub const fn roots(&self) -> &PackageRoots {
        &self.roots
    }

    #[must_use]
    pub const fn cache(&self) -> &Arc<ManifestCache> {
        &self.cache
    }

    #[must_use]
    pub const fn should_cache(&self) -> bool {
        self.configuration.should_cache()
    }

    #[must_use]
    pub const fn should_wait(&self) -> bool {
        self.configuration.should_wait()
    }

    /// Loads the manifest, honouring the cache and waiting for the compiler.
    ///
    /// `None` picks the configuration default: cache unless debug, wait only in debug.
    ///
    /// # Errors
    /// * [`ManifestError::ResourceNotFound`] if the stats file cannot be opened or read.
    /// * [`ManifestError::Parse`] if it is still malformed after every retry.
    /// * [`ManifestError::CompileTimeout`] if the compiler outlives the timeout.
    #[instrument(skip(self), fields(config = %self.configuration.name), level = "debug")]
    pub fn load(&self, cache: Option<bool>, wait: Option<bool>) -> Result<Arc<Manifest>, ManifestError> {
        let cache = cache.unwrap_or_else(|| self.should_cache());
        let wait = wait.unwrap_or_else(|| self.should_wait());

        if cache && let Some(manifest) = self.cache.get() {
            return Ok(manifest);
        }

        let mut manifest = self.decode()?;
        let started = Instant::now();
        while wait && manifest.status().is_compiling() {
            let elapsed = started.elapsed();
            if let Some(timeout) = self.configuration.timeout
                && elapsed > timeout
            {
                warn!(stats_file = %self.stats_file, ?elapsed, "Timed out waiting for webpack");
                return Err(ManifestError::CompileTimeout {
                    resource: self.stats_file.to_string(),
                    elapsed,
                    context: None,
                });
            }
            thread::sleep(POLL_INTERVAL);
            manifest = self.decode()?;
        }

        let manifest = Arc::new(manifest);
        self.cache.store(Arc::clone(&manifest));
        debug!(status = %manifest.status(), "Manifest loaded");
        Ok(manifest)
    }

    /// One read of the stats file with retries for malformed JSON.
    fn decode(&self) -> Result<Manifest, ManifestError> {
        let mut attempt = 0;
        loop {
            let bytes = self.read()?;
            match Manifest::from_slice(&bytes) {
                Ok(manifest) => return Ok(manifest),
                Err(source) if attempt + 1 < DECODE_ATTEMPTS => {
                    debug!(attempt, %source, "Stats file not decodable yet, retrying");
                    thread::sleep(RETRY_BACKOFF * attempt);
                    attempt += 1;
                },
                Err(source) => {
                    warn!(stats_file = %self.stats_file, %source, "Stats file is not valid JSON");
                    return Err(ManifestError::Parse {
                        resource: self.stats_file.to_string(),
                        source,
                        context: None,
                    });
                },
            }
        }
    }

    fn read(&self) -> Result<Vec<u8>, ManifestError> {
        let mut bytes = Vec::new();
        self.stats_file
            .open(&self.roots)
            .and_then(|mut reader| reader.read_to_end(&mut bytes))
            .map_err(|source| ManifestError::ResourceNotFound {
                resource: self.stats_file.to_string(),
                source,
                context: None,
            })?;
        Ok(bytes)
    }
}
