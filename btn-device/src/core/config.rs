use super::staff::{StaffConfigError, StaffDirectory};
use std::path::PathBuf;

/// Store file name inside the work directory
const STORE_FILE: &str = "btn-device.redb";

/// Device configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | Directory holding the device store |
/// | LOG_LEVEL | info | Log level (overridden by RUST_LOG) |
/// | LOG_JSON | false | JSON log lines |
/// | LOG_DIR | (unset) | Daily rolling log files when set |
/// | ENVIRONMENT | development | development / staging / production |
/// | STAFF_CONFIG | (unset) | JSON staff directory replacing the stock accounts |
/// | ASSISTANT_KEYS | (unset) | Comma-separated assistant API keys |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/data/btn STAFF_CONFIG=/etc/btn/staff.json cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
    /// development | staging | production
    pub environment: String,
    pub staff_config: Option<String>,
    /// Key pool for the assistant, rotated on quota/overload errors
    pub assistant_keys: Vec<String>,
}

impl Config {
    /// Load configuration from the environment, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_dir: std::env::var("LOG_DIR").ok().filter(|v| !v.is_empty()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            staff_config: std::env::var("STAFF_CONFIG").ok().filter(|v| !v.is_empty()),
            assistant_keys: std::env::var("ASSISTANT_KEYS")
                .map(|v| parse_key_list(&v))
                .unwrap_or_default(),
        }
    }

    /// Override the work directory, mostly for tests
    pub fn with_work_dir(work_dir: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config
    }

    /// Path of the device store file
    pub fn store_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join(STORE_FILE)
    }

    /// Staff directory from `STAFF_CONFIG`, or the stock one
    pub fn load_staff(&self) -> Result<StaffDirectory, StaffConfigError> {
        match &self.staff_config {
            Some(path) => StaffDirectory::load(path),
            None => Ok(StaffDirectory::default()),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_key_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from)
        .collect()
}
