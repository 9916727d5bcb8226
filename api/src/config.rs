use std::env;
use std::path::PathBuf;

use crate::app::WarningThresholds;

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory the profile cache is persisted in
    pub data_dir: PathBuf,
    /// Base URL of the hosted backend (billing, projects)
    pub backend_url: String,
    pub port: u16,
    /// Remaining-quota levels that trigger a limit warning
    pub warning_thresholds: WarningThresholds,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = WarningThresholds::default();

        Self {
            data_dir: env::var("SKYPORT_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./.skyport")),
            backend_url: env::var("BACKEND_URL")
                .unwrap_or_else(|_| "http://localhost:3001".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            warning_thresholds: WarningThresholds {
                projects: parse_var("PROJECT_WARNING_THRESHOLD").unwrap_or(defaults.projects),
                domains: parse_var("DOMAIN_WARNING_THRESHOLD").unwrap_or(defaults.domains),
            },
        }
    }
}

/// Parse an environment variable, ignoring it (with a warning) if malformed
fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(name, value = %raw, "Ignoring malformed environment variable");
            None
        }
    }
}
