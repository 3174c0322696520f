//! # Storage Module
//!
//! Local persistence and OS-facing collaborators for the reminder scheduler.
//!
//! - **traits**: `KeyValueStore` and `AlarmService` abstractions
//! - **memory_store** / **yaml_store**: key-value store implementations
//! - **alarm_records**: encoding of the persisted alarm record set
//! - **alarm_service**: alarm service implementations for hosts without an
//!   OS alarm manager

pub mod alarm_records;
pub mod alarm_service;
pub mod memory_store;
pub mod traits;
pub mod yaml_store;

pub use alarm_service::{LoggingAlarmService, RecordingAlarmService};
pub use memory_store::MemoryStore;
pub use traits::{AlarmService, KeyValueStore};
pub use yaml_store::YamlFileStore;
