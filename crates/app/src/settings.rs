//! Settings of the dashboard binary.
//!
//! Values come from an optional TOML file (`config/dashboard.toml` unless
//! `--config` names another one) and are overridden by `DASHBOARD__*`
//! environment variables, e.g. `DASHBOARD__SERVER__PORT=8080`.
use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub const DEFAULT_CONFIG: &str = "config/dashboard.toml";

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Default for Database {
    fn default() -> Self {
        Self::Sqlite("dashboard.sqlite".to_string())
    }
}

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub database: Database,
    #[serde(default = "default_cors")]
    pub cors: bool,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: None,
            port: default_port(),
            database: Database::default(),
            cors: default_cors(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    #[serde(default)]
    pub server: Server,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_cors() -> bool {
    true
}

impl Settings {
    /// Load the settings. A missing file is fine only when it is the
    /// default one.
    pub fn new(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG).required(false),
        };

        let settings = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("DASHBOARD").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}
