use crate::manifest::Manifest;
use parking_lot::RwLock;
use std::sync::Arc;

/// Single-slot manifest cache.
///
/// Empty at startup, replaced wholesale after every successful load and never
/// invalidated explicitly. Readers get the `Arc` that was current when they asked.
#[derive(Debug, Default)]
pub struct ManifestCache {
    slot: RwLock<Option<Arc<Manifest>>>,
}

impl ManifestCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self) -> Option<Arc<Manifest>> {
        self.slot.read().clone()
    }

    /// Replaces the slot content.
    pub fn store(&self, manifest: Arc<Manifest>) {
        *self.slot.write() = Some(manifest);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slot.read().is_none()
    }
}
