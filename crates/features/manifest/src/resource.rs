//! Logical file locations: absolute paths or `package:relative/path` locations.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

/// Package namespaces and the directories they live in.
///
/// Registered by the host at startup; `package:path` locations are opened relative
/// to the directory of their package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageRoots {
    roots: BTreeMap<String, PathBuf>,
}

impl PackageRoots {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration.
    #[must_use]
    pub fn with(mut self, package: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        self.insert(package, dir);
        self
    }

    pub fn insert(&mut self, package: impl Into<String>, dir: impl Into<PathBuf>) {
        self.roots.insert(package.into(), dir.into());
    }

    #[must_use]
    pub fn get(&self, package: &str) -> Option<&Path> {
        self.roots.get(package).map(PathBuf::as_path)
    }

    /// Filesystem path of `location` (see [`ManifestResource::create`]).
    ///
    /// # Errors
    /// Returns [`io::ErrorKind::NotFound`] when the package is not registered.
    pub fn locate(&self, location: &str, default_package: &str) -> io::Result<PathBuf> {
        ManifestResource::create(location, default_package).path_in(self)
    }
}

impl From<BTreeMap<String, PathBuf>> for PackageRoots {
    fn from(roots: BTreeMap<String, PathBuf>) -> Self {
        Self { roots }
    }
}

impl<K: Into<String>, V: Into<PathBuf>> FromIterator<(K, V)> for PackageRoots {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { roots: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}

/// Where a manifest lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ManifestResource {
    /// Absolute filesystem path.
    File(PathBuf),
    /// Path relative to a registered package directory.
    Package { package: String, path: String },
}

impl ManifestResource {
    /// Parses a location string.
    ///
    /// * `/abs/path` -> [`ManifestResource::File`]
    /// * `pkg:rel/path` -> package `pkg`
    /// * `rel/path` -> package `default_package`
    #[must_use]
    pub fn create(location: &str, default_package: &str) -> Self {
        if location.starts_with('/') {
            return Self::file(location);
        }
        match location.split_once(':') {
            Some((package, path)) => Self::package(package, path),
            None => Self::package(default_package, location),
        }
    }

    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    #[must_use]
    pub fn package(package: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Package { package: package.into(), path: path.into() }
    }

    /// The location in its original string form.
    #[must_use]
    pub fn location(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Package { package, path } => format!("{package}:{path}"),
        }
    }

    /// Resolves the location against `roots` without touching the filesystem.
    ///
    /// # Errors
    /// Returns [`io::ErrorKind::NotFound`] when the package is not registered.
    pub fn path_in(&self, roots: &PackageRoots) -> io::Result<PathBuf> {
        match self {
            Self::File(path) => Ok(path.clone()),
            Self::Package { package, path } => roots
                .get(package)
                .map(|dir| dir.join(path.trim_start_matches('/')))
                .ok_or_else(|| {
                    io::Error::new(io::ErrorKind::NotFound, format!("unknown package '{package}'"))
                }),
        }
    }

    /// Opens a fresh reader; nothing is cached between calls.
    ///
    /// # Errors
    /// Returns the underlying I/O error, or [`io::ErrorKind::NotFound`] for an unknown package.
    pub fn open(&self, roots: &PackageRoots) -> io::Result<BufReader<File>> {
        let path = self.path_in(roots)?;
        File::open(path).map(BufReader::new)
    }
}

impl fmt::Display for ManifestResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Resource('{}')", self.location())
    }
}
