use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Runtime configuration, read from the environment (and `.env` via dotenvy
/// in `main`).
pub struct AppConfig {
    /// Directory holding the backing CSV files. Created on startup.
    pub data_dir: PathBuf,
    /// Shared secret for the session gate. Required; there is no default.
    pub password: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let data_dir = env::var("JOURNAL_DATA_DIR")
            .unwrap_or_else(|_| "data".into())
            .into();
        let password = env::var("JOURNAL_PASSWORD").context("JOURNAL_PASSWORD must be set")?;
        let port = match env::var("JOURNAL_PORT") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("JOURNAL_PORT is not a valid port: {raw}"))?,
            Err(_) => 3050,
        };
        Ok(AppConfig {
            data_dir,
            password,
            port,
        })
    }
}
