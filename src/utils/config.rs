//! Server configuration
//! Defaults, then an optional YAML file, then `.env`/environment.
//! CLI flags are applied on top by the binary.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::settings::{ApiKeysUpdate, SettingsError, SettingsRecord, SettingsUpdate};

pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Port the bundled frontend expects
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    /// Seed merged over the default settings at startup
    pub settings: SettingsUpdate,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_level: "info".to_string(),
            settings: SettingsUpdate::default(),
        }
    }
}

impl ServerConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        // dotenvy loads .env, but doesn't override already-set env vars
        dotenvy::dotenv().ok();

        let mut config = match path {
            Some(p) => Self::from_yaml_file(p)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Environment overrides. `lookup` is `std::env::var` outside of tests.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("DASHBOARD_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("DASHBOARD_PORT").or_else(|| lookup("PORT")) {
            self.port = port
                .trim()
                .parse()
                .with_context(|| format!("invalid port: {}", port))?;
        }
        if let Some(level) = lookup("RUST_LOG") {
            self.log_level = level;
        }

        let blockchain = lookup("BLOCKCHAIN_API_KEY");
        let exchange = lookup("EXCHANGE_API_KEY");
        if blockchain.is_some() || exchange.is_some() {
            let keys = self.settings.api_keys.get_or_insert_with(ApiKeysUpdate::default);
            if blockchain.is_some() {
                keys.blockchain = blockchain;
            }
            if exchange.is_some() {
                keys.exchange = exchange;
            }
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Same validation as `PUT /api/settings`
    pub fn initial_settings(&self) -> Result<SettingsRecord, SettingsError> {
        SettingsRecord::from_seed(&self.settings)
    }
}
