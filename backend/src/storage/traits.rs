//! # Storage Traits
//!
//! Abstractions over the two external collaborators of the reminder
//! scheduler: a durable string key-value store and the OS alarm service.
//! The domain layer only talks to these traits, so tests can swap in the
//! in-memory implementations.

use crate::errors::{AlarmServiceError, StorageError};
use shared::AlarmRequest;

/// Durable string key-value storage (shared-preferences style).
///
/// All operations are synchronous. A single call is atomic with respect to
/// other calls on the same handle, but a read followed by a write is not:
/// callers that read-modify-write must serialize themselves.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    fn get_string(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value
    fn put_string(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// One-shot wake-up alarm registration at the OS level.
///
/// Requests are identified by `request_id`; registering a request id that is
/// already registered replaces the earlier registration.
pub trait AlarmService: Send + Sync {
    /// Whether the app currently holds the exact-alarm permission
    fn can_schedule_exact_alarms(&self) -> bool;

    /// Register a one-shot exact alarm
    fn set_exact_alarm(&self, request: &AlarmRequest) -> Result<(), AlarmServiceError>;

    /// Cancel the alarm registered under `request_id`, if any
    fn cancel_alarm(&self, request_id: i32) -> Result<(), AlarmServiceError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get_string(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_string(key)
    }

    fn put_string(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).put_string(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<T: AlarmService + ?Sized> AlarmService for std::sync::Arc<T> {
    fn can_schedule_exact_alarms(&self) -> bool {
        (**self).can_schedule_exact_alarms()
    }

    fn set_exact_alarm(&self, request: &AlarmRequest) -> Result<(), AlarmServiceError> {
        (**self).set_exact_alarm(request)
    }

    fn cancel_alarm(&self, request_id: i32) -> Result<(), AlarmServiceError> {
        (**self).cancel_alarm(request_id)
    }
}
