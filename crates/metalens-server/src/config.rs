use std::path::PathBuf;

use anyhow::{Context, Result};

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// SQLite file for analyses; the in-memory store is used when unset
    pub database_path: Option<PathBuf>,
    /// Upper bound for `?limit=` on the recent analyses listing
    pub recent_limit_max: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            rust_log: "info".to_string(),
            database_path: None,
            recent_limit_max: 50,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        Ok(Config {
            port: optional_env("PORT")
                .map(|value| value.parse::<u16>())
                .transpose()
                .context("PORT must be a valid port number")?
                .unwrap_or(defaults.port),
            rust_log: optional_env("RUST_LOG").unwrap_or(defaults.rust_log),
            database_path: optional_env("METALENS_DATABASE").map(PathBuf::from),
            recent_limit_max: optional_env("RECENT_LIMIT_MAX")
                .map(|value| value.parse::<usize>())
                .transpose()
                .context("RECENT_LIMIT_MAX must be a positive integer")?
                .unwrap_or(defaults.recent_limit_max),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}
