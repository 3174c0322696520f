//! Alarm service implementations for environments without an OS alarm
//! manager: one that only logs (used by the CLI) and one that records
//! registrations in memory (used by tests and by embedders that deliver
//! alarms themselves).

use crate::errors::AlarmServiceError;
use crate::storage::traits::AlarmService;
use log::info;
use shared::AlarmRequest;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Logs every registration and cancellation
#[derive(Debug)]
pub struct LoggingAlarmService {
    exact_alarm_permission: bool,
}

impl LoggingAlarmService {
    pub fn new(exact_alarm_permission: bool) -> Self {
        Self {
            exact_alarm_permission,
        }
    }
}

impl AlarmService for LoggingAlarmService {
    fn can_schedule_exact_alarms(&self) -> bool {
        self.exact_alarm_permission
    }

    fn set_exact_alarm(&self, request: &AlarmRequest) -> Result<(), AlarmServiceError> {
        if !self.exact_alarm_permission {
            return Err(AlarmServiceError::PermissionDenied);
        }
        info!(
            "⏰ Alarm {} set for {} ({})",
            request.request_id, request.trigger_time_millis, request.payload.title
        );
        Ok(())
    }

    fn cancel_alarm(&self, request_id: i32) -> Result<(), AlarmServiceError> {
        info!("⏰ Alarm {} cancelled", request_id);
        Ok(())
    }
}

/// Keeps the currently registered requests, keyed by request id.
///
/// Clones share state, so a test can keep one handle while the scheduler
/// owns another.
#[derive(Clone, Debug)]
pub struct RecordingAlarmService {
    permission: Arc<AtomicBool>,
    registered: Arc<Mutex<BTreeMap<i32, AlarmRequest>>>,
}

impl RecordingAlarmService {
    pub fn new() -> Self {
        Self {
            permission: Arc::new(AtomicBool::new(true)),
            registered: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }

    pub fn set_permission(&self, granted: bool) {
        self.permission.store(granted, Ordering::SeqCst);
    }

    /// Snapshot of registered requests ordered by request id
    pub fn registered(&self) -> Vec<AlarmRequest> {
        self.registered
            .lock()
            .map(|registered| registered.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn is_registered(&self, request_id: i32) -> bool {
        self.registered
            .lock()
            .map(|registered| registered.contains_key(&request_id))
            .unwrap_or(false)
    }

    /// Pop every request due at `now_millis`, as the OS would when firing
    pub fn take_due(&self, now_millis: i64) -> Vec<AlarmRequest> {
        let Ok(mut registered) = self.registered.lock() else {
            return Vec::new();
        };
        let due: Vec<i32> = registered
            .values()
            .filter(|request| request.trigger_time_millis <= now_millis)
            .map(|request| request.request_id)
            .collect();
        due.iter().filter_map(|id| registered.remove(id)).collect()
    }
}

impl Default for RecordingAlarmService {
    fn default() -> Self {
        Self::new()
    }
}

impl AlarmService for RecordingAlarmService {
    fn can_schedule_exact_alarms(&self) -> bool {
        self.permission.load(Ordering::SeqCst)
    }

    fn set_exact_alarm(&self, request: &AlarmRequest) -> Result<(), AlarmServiceError> {
        if !self.can_schedule_exact_alarms() {
            return Err(AlarmServiceError::PermissionDenied);
        }
        let mut registered = self.registered.lock().map_err(|_| AlarmServiceError::Rejected {
            request_id: request.request_id,
            reason: "registry lock poisoned".to_string(),
        })?;
        registered.insert(request.request_id, request.clone());
        Ok(())
    }

    fn cancel_alarm(&self, request_id: i32) -> Result<(), AlarmServiceError> {
        let mut registered = self.registered.lock().map_err(|_| AlarmServiceError::Rejected {
            request_id,
            reason: "registry lock poisoned".to_string(),
        })?;
        registered.remove(&request_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ScheduledAlarm;

    fn request(id: i32, at: i64) -> AlarmRequest {
        AlarmRequest::from(&ScheduledAlarm::new(id, at, "title", "message"))
    }

    #[test]
    fn test_recording_service_replaces_same_request_id() {
        let service = RecordingAlarmService::new();
        service.set_exact_alarm(&request(1, 100)).unwrap();
        service.set_exact_alarm(&request(1, 200)).unwrap();

        let registered = service.registered();
        assert_eq!(registered.len(), 1);
        assert_eq!(registered[0].trigger_time_millis, 200);
    }

    #[test]
    fn test_recording_service_permission_denied() {
        let service = RecordingAlarmService::new();
        service.set_permission(false);

        assert!(!service.can_schedule_exact_alarms());
        assert_eq!(
            service.set_exact_alarm(&request(1, 100)),
            Err(AlarmServiceError::PermissionDenied)
        );
        assert!(service.registered().is_empty());
    }

    #[test]
    fn test_take_due_only_returns_fired_requests() {
        let service = RecordingAlarmService::new();
        service.set_exact_alarm(&request(1, 100)).unwrap();
        service.set_exact_alarm(&request(2, 500)).unwrap();

        let fired = service.take_due(300);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].request_id, 1);
        assert!(service.is_registered(2));
        assert!(!service.is_registered(1));
    }

    #[test]
    fn test_logging_service_honours_permission_flag() {
        assert!(LoggingAlarmService::new(true).set_exact_alarm(&request(1, 1)).is_ok());
        assert_eq!(
            LoggingAlarmService::new(false).set_exact_alarm(&request(1, 1)),
            Err(AlarmServiceError::PermissionDenied)
        );
    }
}
