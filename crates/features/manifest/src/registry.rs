use crate::error::{ManifestError, ManifestErrorExt};
use crate::resource::PackageRoots;
use crate::state::ManifestState;
use packhub_domain::constants::DEFAULT_CONFIG;
use packhub_kernel::resolve::configuration_names;
use packhub_kernel::settings::SettingsSource;
use std::sync::Arc;
use tracing::info;

/// Process-wide map of configuration name to [`ManifestState`].
///
/// Built once at startup; `DEFAULT` always comes first, followed by the names from
/// the `webpack.configs` setting in declaration order.
#[derive(Debug, Clone)]
pub struct Registry {
    states: Arc<[Arc<ManifestState>]>,
}

impl Registry {
    /// Resolves every configuration named by `source`.
    ///
    /// # Errors
    /// * [`ManifestError::Settings`] if a setting is invalid.
    /// * [`ManifestError::InvalidRule`] if an ignore rule does not compile.
    pub fn from_settings<S>(
        source: &S,
        root_package: &str,
        roots: &PackageRoots,
    ) -> Result<Self, ManifestError>
    where
        S: SettingsSource + ?Sized,
    {
        let names = configuration_names(source).context("Reading webpack.configs")?;
        let states = names
            .iter()
            .map(|name| ManifestState::from_settings(source, name, root_package, roots.clone()))
            .collect::<Result<Vec<_>, _>>()?;

        info!(configs = ?names, "Webpack registry ready");
        Ok(Self::from_states(states))
    }

    /// Wraps prebuilt states; a later state replaces an earlier one with the same name.
    #[must_use]
    pub fn from_states(states: impl IntoIterator<Item = ManifestState>) -> Self {
        let mut unique: Vec<Arc<ManifestState>> = Vec::new();
        for state in states {
            match unique.iter_mut().find(|known| known.name() == state.name()) {
                Some(slot) => *slot = Arc::new(state),
                None => unique.push(Arc::new(state)),
            }
        }
        Self { states: unique.into() }
    }

    /// # Errors
    /// Returns [`ManifestError::UnknownConfiguration`] for names that were never registered.
    pub fn get(&self, name: &str) -> Result<&Arc<ManifestState>, ManifestError> {
        self.states.iter().find(|state| state.name() == name).ok_or_else(|| {
            ManifestError::UnknownConfiguration { name: name.to_owned(), context: None }
        })
    }

    /// The `DEFAULT` configuration, if registered.
    #[must_use]
    pub fn default_state(&self) -> Option<&Arc<ManifestState>> {
        self.get(DEFAULT_CONFIG).ok()
    }

    pub fn states(&self) -> impl Iterator<Item = &Arc<ManifestState>> {
        self.states.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.states.iter().map(|state| state.name())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
