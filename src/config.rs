//! Configuration management.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// E-utilities access settings
    #[serde(default)]
    pub entrez: EntrezConfig,

    /// Database settings
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Harvest paging settings
    #[serde(default)]
    pub harvest: HarvestConfig,
}

/// E-utilities access settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntrezConfig {
    /// Base URL of the E-utilities endpoints (overridable for tests)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Contact email sent with every call, per NCBI usage policy
    #[serde(default = "default_email")]
    pub email: String,

    /// Tool name sent with every call
    #[serde(default = "default_tool")]
    pub tool: String,
}

impl Default for EntrezConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            email: default_email(),
            tool: default_tool(),
        }
    }
}

/// Database settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database file
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Harvest paging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Identifier cap requested from a single search call
    #[serde(default = "default_id_cap")]
    pub id_cap: usize,

    /// Records requested per fetch call
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            id_cap: default_id_cap(),
            page_size: default_page_size(),
        }
    }
}

fn default_base_url() -> String {
    "https://eutils.ncbi.nlm.nih.gov/entrez/eutils".to_string()
}

fn default_email() -> String {
    std::env::var("PUBHARVEST_EMAIL").unwrap_or_else(|_| "pubharvest@example.org".to_string())
}

fn default_tool() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("publications.db")
}

fn default_id_cap() -> usize {
    crate::entrez::DEFAULT_ID_CAP
}

fn default_page_size() -> usize {
    crate::entrez::DEFAULT_PAGE_SIZE
}

/// Load configuration from a file, with `PUBHARVEST_*` environment overrides.
pub fn load_config(path: &PathBuf) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path.as_path()))
        .add_source(config::Environment::with_prefix("PUBHARVEST").separator("__"))
        .build()?;

    settings.try_deserialize()
}

/// Get the default configuration (from env vars or defaults)
pub fn get_config() -> Config {
    Config::default()
}
