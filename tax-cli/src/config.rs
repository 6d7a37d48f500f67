//! Settings read from an optional TOML file and overridden by flags.
//!
//! ```toml
//! database = "lk-tax.db"
//! backend = "sqlite"
//! session = "tax-wizard-data"
//! language = "si"
//! log_level = "debug"
//! log_file = "lk-tax.log"
//! schedule = "schedules.csv"
//! year = "2024/2025"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tax_core::Language;
use tax_core::db::DbConfig;
use tax_core::wizard::DEFAULT_SESSION_KEY;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Connection string handed to the storage backend.
    pub database: String,
    pub backend: String,
    /// Key the wizard progress is saved under.
    pub session: String,
    /// Language for new sessions and calculator output.
    pub language: Language,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    /// CSV file of schedules; the built-in 2024/2025 schedule when unset.
    pub schedule: Option<PathBuf>,
    pub year: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: "lk-tax.db".to_string(),
            backend: "sqlite".to_string(),
            session: DEFAULT_SESSION_KEY.to_string(),
            language: Language::English,
            log_level: "info".to_string(),
            log_file: None,
            schedule: None,
            year: None,
        }
    }
}

/// Values given on the command line; `None` keeps the file or default value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub database: Option<String>,
    pub backend: Option<String>,
    pub session: Option<String>,
    pub language: Option<Language>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
    pub schedule: Option<PathBuf>,
    pub year: Option<String>,
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads `path` when given, otherwise starts from the defaults, then
    /// applies the overrides.
    pub fn resolve(
        path: Option<&Path>,
        overrides: ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply(overrides);
        Ok(config)
    }

    pub fn apply(
        &mut self,
        overrides: ConfigOverrides,
    ) {
        let ConfigOverrides {
            database,
            backend,
            session,
            language,
            log_level,
            log_file,
            schedule,
            year,
        } = overrides;

        if let Some(database) = database {
            self.database = database;
        }
        if let Some(backend) = backend {
            self.backend = backend;
        }
        if let Some(session) = session {
            self.session = session;
        }
        if let Some(language) = language {
            self.language = language;
        }
        if let Some(log_level) = log_level {
            self.log_level = log_level;
        }
        if log_file.is_some() {
            self.log_file = log_file;
        }
        if schedule.is_some() {
            self.schedule = schedule;
        }
        if year.is_some() {
            self.year = year;
        }
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig {
            backend: self.backend.clone(),
            connection_string: self.database.clone(),
        }
    }
}
