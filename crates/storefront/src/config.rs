//! Widget configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `STORECART_DATA_DIR` - Directory for persisted values (default: the
//!   platform data directory plus `storecart`, or `./.storecart`)
//! - `STORECART_STORAGE_KEY` - Key the cart is stored under (default: cart)
//! - `STORECART_CATALOG` - Catalog YAML path (default: catalog.yaml)
//! - `STORECART_ACK_MILLIS` - How long "Added ✓" stays up (default: 1200)
//! - `STORECART_MERGE_POLICY` - `accumulate` or `saturate` (default: accumulate)
//! - `STORECART_LOG_FORMAT` - `pretty` or `json` (default: pretty)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::cart::MergePolicy;
use crate::feedback::DEFAULT_ACK_DELAY;
use crate::store::DEFAULT_STORAGE_KEY;

/// Directory name used under the platform data directory.
const DATA_DIR_NAME: &str = "storecart";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// storecart configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorecartConfig {
    /// Directory the file store writes to
    pub data_dir: PathBuf,
    /// Key the cart is persisted under
    pub storage_key: String,
    /// Path of the catalog file describing the page
    pub catalog_path: PathBuf,
    /// How long the add acknowledgment stays visible
    pub ack_delay: Duration,
    /// How repeated adds of one product combine
    pub merge_policy: MergePolicy,
    /// Log output format
    pub log_format: LogFormat,
}

impl Default for StorecartConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            catalog_path: PathBuf::from("catalog.yaml"),
            ack_delay: DEFAULT_ACK_DELAY,
            merge_policy: MergePolicy::default(),
            log_format: LogFormat::default(),
        }
    }
}

impl StorecartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let data_dir = lookup("STORECART_DATA_DIR").map_or(defaults.data_dir, PathBuf::from);
        let storage_key = lookup("STORECART_STORAGE_KEY")
            .filter(|key| !key.trim().is_empty())
            .unwrap_or(defaults.storage_key);
        let catalog_path =
            lookup("STORECART_CATALOG").map_or(defaults.catalog_path, PathBuf::from);

        let ack_delay = match lookup("STORECART_ACK_MILLIS") {
            Some(raw) => raw.trim().parse::<u64>().map(Duration::from_millis).map_err(|e| {
                ConfigError::InvalidEnvVar("STORECART_ACK_MILLIS".to_string(), e.to_string())
            })?,
            None => defaults.ack_delay,
        };

        let merge_policy = match lookup("STORECART_MERGE_POLICY") {
            Some(raw) => raw.parse::<MergePolicy>().map_err(|e| {
                ConfigError::InvalidEnvVar("STORECART_MERGE_POLICY".to_string(), e)
            })?,
            None => defaults.merge_policy,
        };

        let log_format = match lookup("STORECART_LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::InvalidEnvVar(
                    "STORECART_LOG_FORMAT".to_string(),
                    format!("expected 'pretty' or 'json', got '{other}'"),
                ));
            }
        };

        Ok(Self {
            data_dir,
            storage_key,
            catalog_path,
            ack_delay,
            merge_policy,
            log_format,
        })
    }
}

/// Platform data directory for storecart, or `./.storecart` without one.
fn default_data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(
        || PathBuf::from(".storecart"),
        |dir| dir.join(DATA_DIR_NAME),
    )
}
