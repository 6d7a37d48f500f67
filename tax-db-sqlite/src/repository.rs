use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use tax_core::db::SessionSummary;
use tax_core::wizard::SavedProgress;
use tax_core::{Language, RepositoryError, WizardData, WizardRepository, WizardState};

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Opens `database_url`, creating the file if it does not exist.
    ///
    /// Accepts a bare path (`lk-tax.db`), a `sqlite:` URL, or `:memory:`.
    /// An in-memory database is private to a connection, so its pool is
    /// capped at one connection.
    pub async fn new(database_url: &str) -> Result<Self, RepositoryError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| RepositoryError::Connection(e.to_string()))?
            .create_if_missing(true);

        let in_memory = database_url.contains(":memory:");
        let pool = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { 4 })
            .connect_with(options)
            .await
            .map_err(|e| RepositoryError::Connection(format!("{database_url}: {e}")))?;

        tracing::debug!(database_url, "opened sqlite database");
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<(), RepositoryError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(format!("Failed to run migrations: {e}")))?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn row_to_state(row: &SqliteRow) -> Result<WizardState, RepositoryError> {
    let current_step: i64 = row
        .try_get("current_step")
        .map_err(|e| RepositoryError::Database(e.to_string()))?;
    let language: String = row
        .try_get("language")
        .map_err(|e| RepositoryError::Database(e.to_string()))?;
    let wizard_data: String = row
        .try_get("wizard_data")
        .map_err(|e| RepositoryError::Database(e.to_string()))?;
    let last_saved = row
        .try_get::<DateTime<Utc>, _>("last_saved")
        .map_err(|e| RepositoryError::Corrupt(format!("Failed to get last_saved: {e}")))?;

    let language = language
        .parse::<Language>()
        .map_err(|e| RepositoryError::Corrupt(e.to_string()))?;
    let wizard_data: WizardData = serde_json::from_str(&wizard_data)
        .map_err(|e| RepositoryError::Corrupt(format!("wizard_data: {e}")))?;

    // Out-of-range steps restart the wizard at step 1.
    Ok(WizardState::from(SavedProgress {
        wizard_data,
        current_step: u8::try_from(current_step).unwrap_or(0),
        language,
        last_saved: Some(last_saved),
    }))
}

#[async_trait]
impl WizardRepository for SqliteRepository {
    async fn load_progress(
        &self,
        session_key: &str,
    ) -> Result<WizardState, RepositoryError> {
        let row = sqlx::query(
            "SELECT current_step, language, wizard_data, last_saved
             FROM wizard_session WHERE session_key = ?",
        )
        .bind(session_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?
        .ok_or(RepositoryError::NotFound)?;

        row_to_state(&row)
    }

    async fn save_progress(
        &self,
        session_key: &str,
        state: &WizardState,
    ) -> Result<DateTime<Utc>, RepositoryError> {
        let now = Utc::now();
        let wizard_data = serde_json::to_string(state.data())
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        sqlx::query(
            "INSERT INTO wizard_session (session_key, current_step, language, wizard_data, last_saved)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT (session_key) DO UPDATE SET
                current_step = excluded.current_step,
                language = excluded.language,
                wizard_data = excluded.wizard_data,
                last_saved = excluded.last_saved",
        )
        .bind(session_key)
        .bind(i64::from(state.current_step().number()))
        .bind(state.language().code())
        .bind(wizard_data)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        tracing::debug!(session_key, step = state.current_step().number(), "saved wizard progress");
        Ok(now)
    }

    async fn delete_progress(
        &self,
        session_key: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM wizard_session WHERE session_key = ?")
            .bind(session_key)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn list_sessions(&self) -> Result<Vec<SessionSummary>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT session_key, current_step, last_saved
             FROM wizard_session ORDER BY last_saved DESC, session_key",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        rows.iter()
            .map(|row| {
                let current_step: i64 = row
                    .try_get("current_step")
                    .map_err(|e| RepositoryError::Database(e.to_string()))?;
                Ok(SessionSummary {
                    session_key: row
                        .try_get("session_key")
                        .map_err(|e| RepositoryError::Database(e.to_string()))?,
                    current_step: u8::try_from(current_step)
                        .map_err(|e| RepositoryError::Corrupt(e.to_string()))?,
                    last_saved: row
                        .try_get::<DateTime<Utc>, _>("last_saved")
                        .map_err(|e| RepositoryError::Corrupt(e.to_string()))?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sqlx::sqlite::SqlitePoolOptions;
    use tax_core::{IncomeSource, WizardDataPatch, WizardStep};

    use super::*;

    async fn setup_test_db() -> SqliteRepository {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");

        let repo = SqliteRepository::new_with_pool(pool).await;
        repo.run_migrations()
            .await
            .expect("Failed to run migrations");
        repo
    }

    fn sample_state() -> WizardState {
        let mut state = WizardState::new(Language::Sinhala);
        state.update_data(WizardDataPatch {
            name: Some("A.B. Perera".to_string()),
            tin: Some("123456789".to_string()),
            email: Some("perera@example.lk".to_string()),
            income: Some("2,500,000".to_string()),
            ..Default::default()
        });
        state.toggle_source(IncomeSource::Employment);
        state.toggle_source(IncomeSource::Investment);
        state.next_step();
        state.next_step();
        state
    }

    async fn insert_raw(
        repo: &SqliteRepository,
        key: &str,
        step: i64,
        language: &str,
        wizard_data: &str,
    ) {
        sqlx::query(
            "INSERT INTO wizard_session (session_key, current_step, language, wizard_data, last_saved)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(key)
        .bind(step)
        .bind(language)
        .bind(wizard_data)
        .bind(Utc::now())
        .execute(repo.pool())
        .await
        .expect("Failed to insert raw session");
    }

    #[tokio::test]
    async fn test_save_and_load_progress() {
        let repo = setup_test_db().await;
        let state = sample_state();

        let saved_at = repo
            .save_progress("tax-wizard-data", &state)
            .await
            .expect("Should save progress");
        let loaded = repo
            .load_progress("tax-wizard-data")
            .await
            .expect("Should load progress");

        assert_eq!(loaded.current_step(), WizardStep::Documents);
        assert_eq!(loaded.language(), Language::Sinhala);
        assert_eq!(loaded.data(), state.data());
        assert_eq!(loaded.last_saved(), Some(saved_at));
    }

    #[tokio::test]
    async fn test_load_progress_not_found() {
        let repo = setup_test_db().await;

        let result = repo.load_progress("missing").await;

        assert_eq!(result, Err(RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_save_replaces_existing_progress() {
        let repo = setup_test_db().await;
        let mut state = sample_state();
        repo.save_progress("key", &state).await.unwrap();

        state.next_step();
        state.change_language(Language::Tamil);
        repo.save_progress("key", &state).await.unwrap();

        let loaded = repo.load_progress("key").await.unwrap();
        assert_eq!(loaded.current_step(), WizardStep::TaxSummary);
        assert_eq!(loaded.language(), Language::Tamil);
        assert_eq!(repo.list_sessions().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let repo = setup_test_db().await;
        repo.save_progress("a", &sample_state()).await.unwrap();
        repo.save_progress("b", &WizardState::default()).await.unwrap();

        let a = repo.load_progress("a").await.unwrap();
        let b = repo.load_progress("b").await.unwrap();

        assert_eq!(a.data().name, "A.B. Perera");
        assert_eq!(b.data(), &WizardData::default());
        assert_eq!(b.current_step(), WizardStep::PersonalDetails);
    }

    #[tokio::test]
    async fn test_delete_progress() {
        let repo = setup_test_db().await;
        repo.save_progress("key", &sample_state()).await.unwrap();

        repo.delete_progress("key")
            .await
            .expect("Should delete progress");

        assert_eq!(repo.load_progress("key").await, Err(RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_progress_not_found() {
        let repo = setup_test_db().await;

        let result = repo.delete_progress("missing").await;

        assert_eq!(result, Err(RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_list_sessions_most_recent_first() {
        let repo = setup_test_db().await;
        repo.save_progress("older", &WizardState::default()).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        repo.save_progress("newer", &sample_state()).await.unwrap();

        let sessions = repo.list_sessions().await.unwrap();

        let keys: Vec<_> = sessions.iter().map(|s| s.session_key.as_str()).collect();
        assert_eq!(keys, vec!["newer", "older"]);
        assert_eq!(sessions[0].current_step, 3);
        assert_eq!(sessions[1].current_step, 1);
    }

    #[tokio::test]
    async fn test_list_sessions_empty() {
        let repo = setup_test_db().await;

        assert!(repo.list_sessions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_wizard_data_is_reported() {
        let repo = setup_test_db().await;
        insert_raw(&repo, "key", 2, "en", "{not json").await;

        let result = repo.load_progress("key").await;

        assert!(matches!(result, Err(RepositoryError::Corrupt(msg)) if msg.contains("wizard_data")));
    }

    #[tokio::test]
    async fn test_unknown_language_is_corrupt() {
        let repo = setup_test_db().await;
        insert_raw(&repo, "key", 2, "fr", "{}").await;

        assert!(matches!(
            repo.load_progress("key").await,
            Err(RepositoryError::Corrupt(_))
        ));
    }

    #[tokio::test]
    async fn test_out_of_range_step_restarts_wizard() {
        let repo = setup_test_db().await;
        insert_raw(&repo, "key", 42, "ta", r#"{"name":"Kumar"}"#).await;

        let loaded = repo.load_progress("key").await.unwrap();

        assert_eq!(loaded.current_step(), WizardStep::PersonalDetails);
        assert_eq!(loaded.language(), Language::Tamil);
        assert_eq!(loaded.data().name, "Kumar");
    }

    #[tokio::test]
    async fn test_new_opens_in_memory_database() {
        let repo = SqliteRepository::new(":memory:")
            .await
            .expect("Should open in-memory database");
        repo.run_migrations().await.expect("Should migrate");

        repo.save_progress("key", &sample_state()).await.unwrap();
        assert!(repo.load_progress("key").await.is_ok());
    }
}
