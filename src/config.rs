use std::path::PathBuf;

use anyhow::Context;
use serde::{Deserialize, de::DeserializeOwned};

use crate::store::RefreshPolicy;

/// The env vars needed for a scrape-and-store run.
#[derive(Debug, Deserialize)]
pub struct AppEnv {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// How many consecutive weeks each operator is asked for.
    #[serde(default = "default_scrape_weeks")]
    pub scrape_weeks: u32,
    /// Minutes between scrape cycles; unset means run once and exit.
    pub scrape_interval_minutes: Option<u64>,
    #[serde(default = "default_refresh_policy")]
    pub refresh_policy: RefreshPolicy,
    /// Overrides the system Chromium binary lookup.
    pub chromium_path: Option<PathBuf>,
}

fn default_database_url() -> String {
    "sqlite:timetables.db".to_string()
}

fn default_scrape_weeks() -> u32 {
    1
}

fn default_refresh_policy() -> RefreshPolicy {
    RefreshPolicy::ReplaceAll
}

/// The env vars needed for failure alerting. All of them are required; a
/// partly configured mail setup should fail at startup, not mid-scrape.
#[derive(Debug, Deserialize)]
pub struct SmtpSettings {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub smtp_enable_tls: bool,
    pub smtp_from_email: String,
    pub smtp_to_email: String,
}

// Extension trait.
pub trait LoadFromEnv: DeserializeOwned {
    fn load_from_env() -> anyhow::Result<Self> {
        // Don't throw an error if .env file doesn't exist.
        let _ = dotenv::dotenv();
        let config =
            envy::from_env::<Self>().context("failed to load env variables into config struct")?;
        Ok(config)
    }
}

impl<T: DeserializeOwned> LoadFromEnv for T {}
