use std::path::PathBuf;
use std::time::Duration;

use crate::quiz::icon::DEFAULT_ICON_TTL;
use crate::quiz::{ReferenceData, ReferenceDataError};

pub const DEFAULT_QUESTION_COUNT: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("TELOXIDE_TOKEN is not set")]
    MissingToken,

    #[error("{name} must be a positive integer, got '{value}'")]
    NotPositive { name: &'static str, value: String },

    #[error("QUIZ_CLANS_PATH and QUIZ_QUESTIONS_PATH must be set together")]
    PartialDataPaths,
}

/// Settings read from the environment (and `.env`, when present).
pub struct BotConfig {
    pub token: String,
    pub question_count: usize,
    /// Clan catalog and question bank JSON files. The built-in tables are used when unset.
    pub data_paths: Option<(PathBuf, PathBuf)>,
    pub icon_cache_ttl: Duration,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let token = lookup("TELOXIDE_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let question_count = match lookup("QUIZ_QUESTION_COUNT") {
            Some(value) => positive("QUIZ_QUESTION_COUNT", value)? as usize,
            None => DEFAULT_QUESTION_COUNT,
        };

        let data_paths = match (lookup("QUIZ_CLANS_PATH"), lookup("QUIZ_QUESTIONS_PATH")) {
            (Some(clans), Some(questions)) => {
                Some((PathBuf::from(clans), PathBuf::from(questions)))
            }
            (None, None) => None,
            _ => return Err(ConfigError::PartialDataPaths),
        };

        let icon_cache_ttl = match lookup("QUIZ_ICON_CACHE_TTL_SECS") {
            Some(value) => Duration::from_secs(positive("QUIZ_ICON_CACHE_TTL_SECS", value)?),
            None => DEFAULT_ICON_TTL,
        };

        Ok(Self {
            token,
            question_count,
            data_paths,
            icon_cache_ttl,
        })
    }

    pub fn load_reference_data(&self) -> Result<ReferenceData, ReferenceDataError> {
        match &self.data_paths {
            Some((clans, questions)) => {
                log::info!(
                    "Loading reference data from {} and {}",
                    clans.display(),
                    questions.display()
                );
                ReferenceData::from_files(clans, questions)
            }
            None => ReferenceData::builtin(),
        }
    }
}

fn positive(name: &'static str, value: String) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(number) if number > 0 => Ok(number),
        _ => Err(ConfigError::NotPositive { name, value }),
    }
}
