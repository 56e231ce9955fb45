use crate::error::AppError;
use std::path::PathBuf;

pub const TOKEN_ENV_VAR: &str = "TASKSPHERE_TOKEN";
pub const STORE_ENV_VAR: &str = "TASKSPHERE_STORE_PATH";
pub const ARCHIVE_ENV_VAR: &str = "TASKSPHERE_ARCHIVE_PATH";
const DEFAULT_ARCHIVE_FILE: &str = "completed_tasks.csv";

/// Resolved startup configuration. The token and store location are required
/// secrets; resolution fails before the process starts serving when either is
/// missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotConfig {
    pub token: String,
    pub store_path: PathBuf,
    pub archive_path: PathBuf,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub store_path: Option<PathBuf>,
    pub archive_path: Option<PathBuf>,
}

impl BotConfig {
    pub fn from_env(overrides: &ConfigOverrides) -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok(), overrides)
    }

    pub fn from_lookup<F>(lookup: F, overrides: &ConfigOverrides) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = non_empty(lookup(TOKEN_ENV_VAR))
            .ok_or_else(|| AppError::invalid_data(format!("{TOKEN_ENV_VAR} is not set")))?;

        let store_path = overrides
            .store_path
            .clone()
            .or_else(|| non_empty(lookup(STORE_ENV_VAR)).map(PathBuf::from))
            .ok_or_else(|| AppError::invalid_data(format!("{STORE_ENV_VAR} is not set")))?;

        let archive_path = overrides
            .archive_path
            .clone()
            .or_else(|| non_empty(lookup(ARCHIVE_ENV_VAR)).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ARCHIVE_FILE));

        Ok(Self {
            token,
            store_path,
            archive_path,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
