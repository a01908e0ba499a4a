//! Service and LLM settings, filled from env vars (and `.env`).
//!
//! Binaries call `dotenv::dotenv().ok()` first, then `ServiceConfig::from_env()`
//! and, for real generation, `LlmSettings::from_env()`.

use std::time::Duration;

use thiserror::Error;

use crate::progress::{DEFAULT_CAPACITY, DEFAULT_LINGER};

/// Error loading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("{0} is not set; please configure it in .env")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed.
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Orchestration settings.
#[derive(Clone, Debug, PartialEq)]
pub struct ServiceConfig {
    /// Review score at or above which a draft is approved. `QUALITY_PASS_SCORE`, default 85.
    pub pass_score: u8,
    /// Drafting passes after which approval is forced (`iteration_count > max_iterations`).
    /// `MAX_ITERATIONS`, default 3.
    pub max_iterations: u32,
    /// Bounded progress queue size per execution. `PROGRESS_CAPACITY`, default 256.
    pub progress_capacity: usize,
    /// How long an unattended progress channel is kept. `PROGRESS_LINGER_SECS`, default 300.
    pub progress_linger: Duration,
    /// Age after which finished or paused checkpoints are pruned. `CHECKPOINT_TTL_SECS`, default 7 days.
    pub checkpoint_ttl: Duration,
    /// SQLite file for checkpoints. `DB_PATH`, default `checkpoints.db`.
    pub db_path: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            pass_score: 85,
            max_iterations: 3,
            progress_capacity: DEFAULT_CAPACITY,
            progress_linger: DEFAULT_LINGER,
            checkpoint_ttl: Duration::from_secs(7 * 24 * 3600),
            db_path: "checkpoints.db".to_string(),
        }
    }
}

fn parse<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(name) {
        None => Ok(None),
        Some(value) => {
            let parsed = value.trim().parse::<T>();
            parsed.map(Some).map_err(|_| ConfigError::Invalid { name, value })
        }
    }
}

impl ServiceConfig {
    /// Fill config from env vars; unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let pass_score: u8 = parse(&lookup, "QUALITY_PASS_SCORE")?.unwrap_or(defaults.pass_score);
        if pass_score > 100 {
            return Err(ConfigError::Invalid {
                name: "QUALITY_PASS_SCORE",
                value: pass_score.to_string(),
            });
        }
        let progress_capacity: usize =
            parse(&lookup, "PROGRESS_CAPACITY")?.unwrap_or(defaults.progress_capacity);
        if progress_capacity == 0 {
            return Err(ConfigError::Invalid {
                name: "PROGRESS_CAPACITY",
                value: "0".into(),
            });
        }
        Ok(Self {
            pass_score,
            max_iterations: parse(&lookup, "MAX_ITERATIONS")?.unwrap_or(defaults.max_iterations),
            progress_capacity,
            progress_linger: parse(&lookup, "PROGRESS_LINGER_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.progress_linger),
            checkpoint_ttl: parse(&lookup, "CHECKPOINT_TTL_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.checkpoint_ttl),
            db_path: lookup("DB_PATH").unwrap_or(defaults.db_path),
        })
    }
}

/// Settings for an OpenAI-compatible generation endpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct LlmSettings {
    /// `OPENAI_API_KEY`, required.
    pub api_key: String,
    /// `OPENAI_API_BASE`; unset uses the client default.
    pub api_base: Option<String>,
    /// `OPENAI_MODEL`, default `gpt-4o-mini`.
    pub model: String,
}

impl LlmSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup("OPENAI_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::Missing("OPENAI_API_KEY"))?;
        Ok(Self {
            api_key,
            api_base: lookup("OPENAI_API_BASE"),
            model: lookup("OPENAI_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string()),
        })
    }
}
