//! # Application Configuration
//!
//! A single YAML file, `savingquest.yaml`, at the root of the data directory:
//!
//! ```yaml
//! storage:
//!   preferences_file: preferences.yaml
//!   alarm_storage_key: scheduled_notifications
//! formatting:
//!   grouping_separator: ','
//!   currency_symbol: $
//! chart:
//!   vertical_padding_fraction: 0.1
//!   trend_label_count: 5
//!   timeline_label_count: 4
//! alarms:
//!   exact_alarm_permission: true
//! logging:
//!   level: info
//! ```
//!
//! Every section and field is optional; missing values take their defaults.
//! The file is created with defaults the first time the data directory is
//! used.

use crate::domain::alarm_scheduler::DEFAULT_STORAGE_KEY;
use crate::domain::chart_geometry::ChartConfig;
use crate::domain::numeric_formatter::FormattingConfig;
use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "savingquest.yaml";
/// Overrides the default data directory
pub const DATA_DIR_ENV: &str = "SAVINGQUEST_DATA_DIR";
const DATA_DIR_NAME: &str = "MySavingQuest";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub formatting: FormattingConfig,
    pub chart: ChartConfig,
    pub alarms: AlarmConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Preferences file, relative to the data directory
    pub preferences_file: String,
    /// Preferences key holding the reminder records
    pub alarm_storage_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            preferences_file: "preferences.yaml".to_string(),
            alarm_storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AlarmConfig {
    /// Whether the host grants exact alarms
    pub exact_alarm_permission: bool,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            exact_alarm_permission: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load `savingquest.yaml` from `data_directory`, writing the defaults
    /// there first if the file does not exist
    pub fn load_or_create(data_directory: &Path) -> Result<Self> {
        let config_path = data_directory.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let yaml_content = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            let config: AppConfig = serde_yaml::from_str(&yaml_content)
                .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;
            debug!("Loaded configuration from {:?}", config_path);
            Ok(config)
        } else {
            let config = AppConfig::default();
            config.save(data_directory)?;
            info!("Created default configuration at {:?}", config_path);
            Ok(config)
        }
    }

    pub fn save(&self, data_directory: &Path) -> Result<()> {
        if !data_directory.exists() {
            fs::create_dir_all(data_directory)
                .with_context(|| format!("Failed to create {}", data_directory.display()))?;
        }

        let config_path = data_directory.join(CONFIG_FILE_NAME);
        let yaml_content = serde_yaml::to_string(self)?;
        let temp_path = config_path.with_extension("tmp");
        fs::write(&temp_path, yaml_content)?;
        fs::rename(&temp_path, &config_path)?;
        Ok(())
    }

    pub fn preferences_path(&self, data_directory: &Path) -> PathBuf {
        data_directory.join(&self.storage.preferences_file)
    }
}

/// `$SAVINGQUEST_DATA_DIR` if set, otherwise the platform data directory
pub fn default_data_directory() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }

    dirs::data_dir()
        .map(|dir| dir.join(DATA_DIR_NAME))
        .ok_or_else(|| anyhow!("Could not determine the platform data directory; set {}", DATA_DIR_ENV))
}
