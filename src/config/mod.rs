use std::env;
use std::fmt;
use std::path::PathBuf;

/// Backing file used when `JOB_TRACKER_DATA_FILE` is not set.
pub const DEFAULT_DATA_FILE: &str = "jobApplications.json";

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the tracker.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub storage: StorageConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let data_file = match env::var("JOB_TRACKER_DATA_FILE") {
            Ok(value) if value.trim().is_empty() => return Err(ConfigError::EmptyDataFile),
            Ok(value) => PathBuf::from(value.trim()),
            Err(_) => PathBuf::from(DEFAULT_DATA_FILE),
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());

        Ok(Self {
            environment,
            storage: StorageConfig { data_file },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Location of the backing store.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_file: PathBuf,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    EmptyDataFile,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyDataFile => {
                write!(f, "JOB_TRACKER_DATA_FILE must not be empty when set")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
