use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every setting has a development default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub recruiter_id: i64,
    pub port: u16,
    pub rust_log: String,
    pub local_store_path: PathBuf,
    pub backend_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            api_base: env_or("API_BASE", "http://127.0.0.1:8000"),
            recruiter_id: env_or("RECRUITER_ID", "1")
                .parse::<i64>()
                .context("RECRUITER_ID must be an integer")?,
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            local_store_path: PathBuf::from(env_or("LOCAL_STORE_PATH", ".dashboard-local.json")),
            backend_timeout_secs: env_or("BACKEND_TIMEOUT_SECS", "30")
                .parse::<u64>()
                .context("BACKEND_TIMEOUT_SECS must be a whole number of seconds")?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
