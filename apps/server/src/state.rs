use crate::mount::MountTable;
use axum::extract::FromRef;
use packhub::domain::config::AppConfig;
use packhub::manifest::{Registry, RequestScope};
use std::ops::Deref;
use std::sync::Arc;

#[derive(Debug)]
pub struct AppStateInner {
    pub config: AppConfig,
    pub registry: Registry,
    pub mounts: Arc<MountTable>,
}

/// Shared handler state; cloning is one `Arc` bump.
#[derive(Debug, Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

impl AppState {
    #[must_use]
    pub fn new(config: AppConfig, registry: Registry, mounts: MountTable) -> Self {
        Self { inner: Arc::new(AppStateInner { config, registry, mounts: Arc::new(mounts) }) }
    }

    /// A fresh request scope resolving static URLs through the mount table.
    #[must_use]
    pub fn request_scope(&self) -> RequestScope {
        RequestScope::new(self.inner.registry.clone(), self.inner.mounts.clone())
    }
}

impl Deref for AppState {
    type Target = AppStateInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(state: &AppState) -> Self {
        state.inner.config.clone()
    }
}

impl FromRef<AppState> for Registry {
    fn from_ref(state: &AppState) -> Self {
        state.inner.registry.clone()
    }
}
