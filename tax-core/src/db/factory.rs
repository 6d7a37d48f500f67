use std::collections::HashMap;

use async_trait::async_trait;

use super::repository::{RepositoryError, WizardRepository};

/// Where wizard progress is stored.
///
/// Built from the `backend` and `database` settings (`--backend`, `--db`).
/// `connection_string` is handed to the chosen backend as is; for SQLite it
/// is a file path such as `lk-tax.db` or `:memory:`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub backend: String,
    pub connection_string: String,
}

/// Opens a [`WizardRepository`] for one storage backend.
#[async_trait]
pub trait RepositoryFactory: Send + Sync {
    /// Name matched against [`DbConfig::backend`].
    fn backend_name(&self) -> &'static str;

    /// Opens the store, creating and migrating it if needed.
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn WizardRepository>, RepositoryError>;
}

/// Backends the binary was built with, looked up by name.
#[derive(Default)]
pub struct RepositoryRegistry {
    factories: HashMap<&'static str, Box<dyn RepositoryFactory>>,
}

impl RepositoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        factory: Box<dyn RepositoryFactory>,
    ) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Registered backend names, sorted.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Opens the repository for `config.backend`.
    ///
    /// # Errors
    ///
    /// [`RepositoryError::Configuration`] when the backend is not registered,
    /// otherwise whatever the backend returns while opening the store.
    pub async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn WizardRepository>, RepositoryError> {
        let Some(factory) = self.factories.get(config.backend.as_str()) else {
            return Err(RepositoryError::Configuration(format!(
                "unknown backend '{}'; available: {}",
                config.backend,
                self.available_backends().join(", ")
            )));
        };

        tracing::debug!(backend = %config.backend, "opening wizard store");
        factory.create(config).await
    }
}
