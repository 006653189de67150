//! Bundle lookup: filter a bundle's chunks and give each one a URL.

use crate::error::ManifestError;
use crate::manifest::{AssetDescriptor, Manifest, ManifestStatus};
use crate::state::ManifestState;
use std::fmt;
use tracing::trace;

/// Maps a mount-relative asset path (e.g. `app:bundles/main.js`) to a public URL.
///
/// Implemented by the host, which knows where static routes are mounted.
pub trait StaticUrlResolver: Send + Sync {
    /// # Errors
    /// Returns [`ManifestError::StaticUrl`] when no static route serves `path`.
    fn static_url(&self, path: &str) -> Result<String, ManifestError>;
}

impl<F> StaticUrlResolver for F
where
    F: Fn(&str) -> Result<String, ManifestError> + Send + Sync,
{
    fn static_url(&self, path: &str) -> Result<String, ManifestError> {
        self(path)
    }
}

/// File extension filter, e.g. `".js .css"`.
///
/// An empty filter keeps nothing; pass `None` to [`BundleResolver::resolve`] to keep
/// everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extensions(Vec<String>);

impl Extensions {
    /// Splits a whitespace-separated list.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        raw.split_whitespace().collect()
    }

    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.0.iter().any(|ext| name.ends_with(ext.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl From<&str> for Extensions {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<Vec<String>> for Extensions {
    fn from(items: Vec<String>) -> Self {
        Self(items)
    }
}

impl<S: Into<String>> FromIterator<S> for Extensions {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Resolves bundles of one configuration into asset descriptors.
pub struct BundleResolver<'a> {
    state: &'a ManifestState,
    urls: &'a dyn StaticUrlResolver,
}

impl fmt::Debug for BundleResolver<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BundleResolver").field("config", &self.state.name()).finish_non_exhaustive()
    }
}

impl<'a> BundleResolver<'a> {
    #[must_use]
    pub fn new(state: &'a ManifestState, urls: &'a dyn StaticUrlResolver) -> Self {
        Self { state, urls }
    }

    /// Chunks of `bundle` that pass the filters, each with a `url`, in manifest order.
    ///
    /// A chunk is kept when its name ends with one of `extensions` (if given) and no
    /// ignore rule matches it.
    ///
    /// # Errors
    /// * [`ManifestError::Compile`] when the manifest reports a failed build.
    /// * [`ManifestError::UnexpectedStatus`] for any status other than `done`/`error`.
    /// * [`ManifestError::UnknownBundle`] when the bundle is not listed.
    /// * [`ManifestError::StaticUrl`] when the host cannot produce a URL.
    pub fn resolve(
        &self,
        manifest: &Manifest,
        bundle: &str,
        extensions: Option<&Extensions>,
    ) -> Result<Vec<AssetDescriptor>, ManifestError> {
        match manifest.status() {
            ManifestStatus::Done => {},
            ManifestStatus::Error => {
                return Err(ManifestError::Compile {
                    error: manifest.error().unwrap_or_default().to_owned(),
                    message: manifest.message().unwrap_or_default().to_owned(),
                    context: None,
                });
            },
            status => {
                return Err(ManifestError::UnexpectedStatus {
                    status: status.to_string(),
                    resource: self.state.stats_file().to_string(),
                    context: None,
                });
            },
        }

        let chunks = manifest.chunks(bundle).ok_or_else(|| ManifestError::UnknownBundle {
            bundle: bundle.to_owned(),
            context: None,
        })?;

        let mut assets = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let Some(mut asset) = AssetDescriptor::from_chunk(chunk) else {
                return Err(malformed(bundle, "chunk is not an object"));
            };
            let Some(name) = asset.name().map(str::to_owned) else {
                return Err(malformed(bundle, "chunk has no name"));
            };
            if !self.keep(&name, extensions) {
                trace!(bundle, chunk = %name, "Chunk filtered out");
                continue;
            }
            self.decorate(&mut asset, &name)?;
            assets.push(asset);
        }
        Ok(assets)
    }

    fn keep(&self, name: &str, extensions: Option<&Extensions>) -> bool {
        extensions.is_none_or(|extensions| extensions.matches(name))
            && !self.state.rules().is_ignored(name)
    }

    fn decorate(&self, asset: &mut AssetDescriptor, name: &str) -> Result<(), ManifestError> {
        if asset.has_url() {
            return Ok(());
        }
        let url = match asset.public_path() {
            Some(public_path) => public_path.to_owned(),
            None => {
                let path = posix_join(&self.state.configuration().static_view_path, name);
                self.urls.static_url(&path)?
            },
        };
        asset.set_url(url);
        Ok(())
    }
}

fn malformed(bundle: &str, message: &'static str) -> ManifestError {
    ManifestError::Internal {
        message: message.into(),
        context: Some(format!("Bundle '{bundle}'").into()),
    }
}

/// `posixpath.join`-style join: an absolute `name` replaces `base`.
#[must_use]
pub fn posix_join(base: &str, name: &str) -> String {
    if name.starts_with('/') || base.is_empty() {
        name.to_owned()
    } else if base.ends_with('/') {
        format!("{base}{name}")
    } else {
        format!("{base}/{name}")
    }
}
