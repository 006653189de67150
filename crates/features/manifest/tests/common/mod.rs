#![allow(dead_code, unreachable_pub)]

use packhub_domain::config::Configuration;
use packhub_manifest::{ManifestError, ManifestState, PackageRoots, StaticUrlResolver};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

pub const STATS: &str = "webpack-stats.json";

/// A stats file inside its own temporary package directory.
pub struct StatsFile {
    dir: TempDir,
}

impl StatsFile {
    pub fn new(content: &Value) -> Self {
        let stats = Self { dir: TempDir::new().unwrap() };
        stats.write(content);
        stats
    }

    pub fn empty() -> Self {
        Self { dir: TempDir::new().unwrap() }
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().join(STATS)
    }

    pub fn location(&self) -> String {
        self.path().display().to_string()
    }

    /// Replaces the file via rename so readers never see a half-written document.
    pub fn write(&self, content: &Value) {
        self.write_raw(&content.to_string());
    }

    pub fn write_raw(&self, raw: &str) {
        let staging = self.dir.path().join(".stats.tmp");
        fs::write(&staging, raw).unwrap();
        fs::rename(staging, self.path()).unwrap();
    }

    /// State for an absolute `stats_file`, customised by `configure`.
    pub fn state(&self, configure: impl FnOnce(&mut Configuration)) -> ManifestState {
        let mut cfg = Configuration::defaults("DEFAULT", "app");
        cfg.stats_file = self.location();
        configure(&mut cfg);
        ManifestState::builder()
            .configuration(cfg)
            .roots(PackageRoots::new().with("app", self.dir()))
            .build()
            .unwrap()
    }
}

/// URL resolver mounting everything under `/static/`.
pub fn static_urls() -> Arc<dyn StaticUrlResolver> {
    Arc::new(|path: &str| Ok::<_, ManifestError>(format!("/static/{path}")))
}
