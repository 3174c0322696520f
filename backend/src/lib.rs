//! # MySavingQuest client core
//!
//! Amount and date formatting, chart geometry and local reminder scheduling
//! for the MySavingQuest savings tracker.
//!
//! ## Architecture
//!
//! ```text
//! Screens / CLI
//!     ↓
//! App (explicitly constructed, owns the services)
//!     ↓
//! Domain (formatters, chart geometry, alarm scheduler)
//!     ↓
//! Storage (key-value store, alarm service)
//! ```

pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod storage;

use anyhow::{Context, Result};
use log::info;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use config::AppConfig;
use domain::{AlarmScheduler, LineChart, NumericFormatter};
use storage::{AlarmService, LoggingAlarmService, YamlFileStore};

pub type Scheduler = AlarmScheduler<YamlFileStore, Arc<dyn AlarmService>>;

/// All services for one data directory
pub struct App {
    pub config: AppConfig,
    pub data_directory: PathBuf,
    pub formatter: NumericFormatter,
    pub chart: LineChart,
    pub scheduler: Scheduler,
}

impl App {
    /// Load (or create) the configuration in `data_directory` and wire up the
    /// services, using the logging alarm service
    pub fn open(data_directory: &Path) -> Result<Self> {
        let config = AppConfig::load_or_create(data_directory)
            .with_context(|| format!("Failed to open data directory {}", data_directory.display()))?;
        Ok(Self::from_config(config, data_directory))
    }

    pub fn from_config(config: AppConfig, data_directory: &Path) -> Self {
        let alarm_service: Arc<dyn AlarmService> =
            Arc::new(LoggingAlarmService::new(config.alarms.exact_alarm_permission));
        Self::with_alarm_service(config, data_directory, alarm_service)
    }

    /// Wire up the services with a host-provided alarm service
    pub fn with_alarm_service(
        config: AppConfig,
        data_directory: &Path,
        alarm_service: Arc<dyn AlarmService>,
    ) -> Self {
        info!("Setting up services for {}", data_directory.display());

        let formatter = NumericFormatter::with_config(config.formatting.clone());
        let chart = LineChart::new(config.chart.clone(), formatter.clone());
        let store = YamlFileStore::new(config.preferences_path(data_directory));
        let scheduler =
            AlarmScheduler::with_storage_key(store, alarm_service, config.storage.alarm_storage_key.clone());

        Self {
            config,
            data_directory: data_directory.to_path_buf(),
            formatter,
            chart,
            scheduler,
        }
    }
}
