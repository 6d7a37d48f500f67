use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::wizard::WizardState;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Stored progress is corrupt: {0}")]
    Corrupt(String),
}

/// Summary row for a stored wizard session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub session_key: String,
    pub current_step: u8,
    pub last_saved: DateTime<Utc>,
}

/// Storage for wizard progress, keyed by session.
#[async_trait]
pub trait WizardRepository: Send + Sync {
    /// Loads saved progress.
    ///
    /// Returns [`RepositoryError::NotFound`] when nothing was saved under
    /// `session_key`, and [`RepositoryError::Corrupt`] when the stored data
    /// cannot be decoded.
    async fn load_progress(
        &self,
        session_key: &str,
    ) -> Result<WizardState, RepositoryError>;

    /// Inserts or replaces the progress for `session_key` and returns the
    /// save timestamp.
    async fn save_progress(
        &self,
        session_key: &str,
        state: &WizardState,
    ) -> Result<DateTime<Utc>, RepositoryError>;

    async fn delete_progress(
        &self,
        session_key: &str,
    ) -> Result<(), RepositoryError>;

    /// Every stored session, most recently saved first.
    async fn list_sessions(&self) -> Result<Vec<SessionSummary>, RepositoryError>;
}
