use anyhow::{Context, Result};
use std::env;

/// Server configuration, read once at startup. `JWT_SECRET` is consumed
/// directly by `rms_common::auth` and is not carried here.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    /// Shared secret expected in `x-api-key` on every `/rms/*` route.
    pub api_key: String,
    pub bind_addr: String,
    pub log_level: String,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let api_key = env::var("RMS_API_KEY").context("RMS_API_KEY must be set")?;
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            database_url,
            api_key,
            bind_addr,
            log_level,
        })
    }
}
