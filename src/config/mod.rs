use std::fmt;

use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

/// Connection settings for the registry database.
///
/// Loaded once at startup and passed around immutably. The password comes
/// from the `BD_PASSWORD` environment variable and is never embedded in
/// source or written to any log line.
#[derive(Deserialize)]
pub struct Config {
    bd_password: String,
    #[serde(default = "default_database")]
    pub registry_db: String,
    #[serde(default = "default_user")]
    pub registry_user: String,
    #[serde(default = "default_host")]
    pub registry_host: String,
    #[serde(default = "default_port")]
    pub registry_port: u16,
}

fn default_database() -> String {
    "clients_db".to_string()
}

fn default_user() -> String {
    "postgres".to_string()
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5432
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This function will:
    /// 1. Load variables from .env file if it exists
    /// 2. Deserialize environment variables into Config struct
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenv().ok();

        // Parse environment variables into Config struct
        let config = envy::from_env::<Config>()?;

        Ok(config)
    }

    pub fn password(&self) -> &str {
        &self.bd_password
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bd_password", &"<redacted>")
            .field("registry_db", &self.registry_db)
            .field("registry_user", &self.registry_user)
            .field("registry_host", &self.registry_host)
            .field("registry_port", &self.registry_port)
            .finish()
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    // Ensure .env file is loaded
    dotenv().ok();

    // Load the configuration
    let config = Config::load()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment mutation is process-global, so everything lives in one test.
    #[test]
    fn loads_from_env_with_defaults_and_redacts_password() {
        unsafe {
            std::env::set_var("BD_PASSWORD", "s3cret");
            std::env::remove_var("REGISTRY_DB");
            std::env::remove_var("REGISTRY_USER");
            std::env::remove_var("REGISTRY_HOST");
            std::env::remove_var("REGISTRY_PORT");
        }

        let config = Config::load().expect("config should load from env");
        assert_eq!(config.password(), "s3cret");
        assert_eq!(config.registry_db, "clients_db");
        assert_eq!(config.registry_user, "postgres");
        assert_eq!(config.registry_host, "localhost");
        assert_eq!(config.registry_port, 5432);

        let printed = format!("{config:?}");
        assert!(!printed.contains("s3cret"));
        assert!(printed.contains("<redacted>"));
    }
}
