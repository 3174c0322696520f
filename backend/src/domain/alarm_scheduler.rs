//! Local reminder scheduling for bill and balance "action needed" items.
//!
//! Each reminder is a one-shot exact alarm registered with the
//! [`AlarmService`], plus a record in the [`KeyValueStore`] so pending
//! reminders can be listed, updated or cancelled after a restart. Records
//! are unique by id and kept in insertion order.
//!
//! Without the exact-alarm permission a schedule request does nothing: no
//! alarm, no record, no error. The outcome is reported as
//! [`ScheduleOutcome::PermissionDenied`] and logged.
//!
//! Mutating operations take `&mut self`. The store itself only guarantees
//! per-call atomicity, so two schedulers over the same store must be
//! serialized by the caller.

use crate::errors::{AlarmServiceError, SchedulerError};
use crate::storage::alarm_records;
use crate::storage::traits::{AlarmService, KeyValueStore};
use log::{debug, info, warn};
use shared::{AlarmRequest, ScheduleOutcome, ScheduledAlarm};

pub const DEFAULT_STORAGE_KEY: &str = "scheduled_notifications";

/// Counts reported by [`AlarmScheduler::restore_pending`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreSummary {
    pub restored: usize,
    pub pruned: usize,
    pub denied: usize,
}

pub struct AlarmScheduler<S, A> {
    store: S,
    alarm_service: A,
    storage_key: String,
}

impl<S: KeyValueStore, A: AlarmService> AlarmScheduler<S, A> {
    pub fn new(store: S, alarm_service: A) -> Self {
        Self::with_storage_key(store, alarm_service, DEFAULT_STORAGE_KEY)
    }

    pub fn with_storage_key(store: S, alarm_service: A, storage_key: impl Into<String>) -> Self {
        Self {
            store,
            alarm_service,
            storage_key: storage_key.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn alarm_service(&self) -> &A {
        &self.alarm_service
    }

    /// Register a one-shot alarm at `trigger_time_millis` and persist its
    /// record, replacing any record with the same id
    pub fn schedule(
        &mut self,
        trigger_time_millis: i64,
        id: i32,
        title: &str,
        message: &str,
    ) -> Result<ScheduleOutcome, SchedulerError> {
        if !self.alarm_service.can_schedule_exact_alarms() {
            warn!("Exact alarm permission missing, reminder {} not scheduled", id);
            return Ok(ScheduleOutcome::PermissionDenied);
        }

        let mut records = self.load_records()?;
        let previous = records
            .iter()
            .position(|record| record.id == id)
            .map(|position| records.remove(position));

        let alarm = ScheduledAlarm::new(id, trigger_time_millis, title, message);
        match self.alarm_service.set_exact_alarm(&AlarmRequest::from(&alarm)) {
            Ok(()) => {}
            Err(AlarmServiceError::PermissionDenied) => {
                warn!("Alarm service refused reminder {}: permission denied", id);
                return Ok(ScheduleOutcome::PermissionDenied);
            }
            Err(e) => return Err(e.into()),
        }
        records.push(alarm);

        if let Err(e) = self.save_records(&records) {
            self.roll_back_registration(id, previous.as_ref());
            return Err(e);
        }

        info!("⏰ Scheduled reminder {} at {}", id, trigger_time_millis);
        Ok(ScheduleOutcome::Scheduled)
    }

    /// Put the OS registration for `id` back in line with the stored record:
    /// the previous alarm if one was persisted, nothing otherwise
    fn roll_back_registration(&self, id: i32, previous: Option<&ScheduledAlarm>) {
        let result = match previous {
            Some(alarm) => self.alarm_service.set_exact_alarm(&AlarmRequest::from(alarm)),
            None => self.alarm_service.cancel_alarm(id),
        };
        if let Err(e) = result {
            warn!("Failed to roll back alarm registration for reminder {}: {}", id, e);
        }
    }

    /// Cancel and re-create the reminder `id` with new values.
    ///
    /// Returns `false` when no record exists for `id`. Returns `true` once
    /// the old reminder is gone, even if the new one could not be scheduled
    /// for lack of permission.
    pub fn update(
        &mut self,
        id: i32,
        new_trigger_time_millis: i64,
        new_title: &str,
        new_message: &str,
    ) -> Result<bool, SchedulerError> {
        let mut records = self.load_records()?;
        let Some(position) = records.iter().position(|record| record.id == id) else {
            debug!("Update requested for unknown reminder {}", id);
            return Ok(false);
        };

        self.alarm_service.cancel_alarm(id)?;
        records.remove(position);
        self.save_records(&records)?;

        let outcome = self.schedule(new_trigger_time_millis, id, new_title, new_message)?;
        if outcome == ScheduleOutcome::PermissionDenied {
            warn!("Reminder {} was removed but could not be re-scheduled", id);
        }
        Ok(true)
    }

    /// Cancel the alarm and drop the record; unknown ids are ignored
    pub fn cancel(&mut self, id: i32) -> Result<(), SchedulerError> {
        self.alarm_service.cancel_alarm(id)?;
        if self.remove_record(id)?.is_some() {
            info!("Cancelled reminder {}", id);
        }
        Ok(())
    }

    /// All persisted reminders in insertion order
    pub fn list(&self) -> Result<Vec<ScheduledAlarm>, SchedulerError> {
        self.load_records()
    }

    pub fn get(&self, id: i32) -> Result<Option<ScheduledAlarm>, SchedulerError> {
        Ok(self.load_records()?.into_iter().find(|record| record.id == id))
    }

    /// Called by the notification receiver when alarm `id` fires. Drops the
    /// record and returns it for the notification text.
    pub fn on_alarm_fired(&mut self, id: i32) -> Result<Option<ScheduledAlarm>, SchedulerError> {
        let fired = self.remove_record(id)?;
        match &fired {
            Some(alarm) => debug!("Reminder {} fired: {}", id, alarm.title),
            None => warn!("Fired alarm {} had no persisted record", id),
        }
        Ok(fired)
    }

    /// Drop records whose trigger time is at or before `now_millis`
    pub fn prune_expired(&mut self, now_millis: i64) -> Result<Vec<ScheduledAlarm>, SchedulerError> {
        let (expired, pending): (Vec<_>, Vec<_>) = self
            .load_records()?
            .into_iter()
            .partition(|record| record.is_due(now_millis));

        if !expired.is_empty() {
            self.save_records(&pending)?;
            info!("Pruned {} expired reminders", expired.len());
        }
        Ok(expired)
    }

    /// Re-register every future reminder with the alarm service, e.g. after
    /// a reboot cleared the OS registrations. Past reminders are pruned.
    /// Records whose registration is denied are kept for a later retry.
    pub fn restore_pending(&mut self, now_millis: i64) -> Result<RestoreSummary, SchedulerError> {
        let mut summary = RestoreSummary {
            pruned: self.prune_expired(now_millis)?.len(),
            ..RestoreSummary::default()
        };

        for alarm in self.load_records()? {
            match self.alarm_service.set_exact_alarm(&AlarmRequest::from(&alarm)) {
                Ok(()) => summary.restored += 1,
                Err(AlarmServiceError::PermissionDenied) => summary.denied += 1,
                Err(e) => return Err(e.into()),
            }
        }

        info!(
            "Restored {} reminders ({} pruned, {} denied)",
            summary.restored, summary.pruned, summary.denied
        );
        Ok(summary)
    }

    fn load_records(&self) -> Result<Vec<ScheduledAlarm>, SchedulerError> {
        let blob = self.store.get_string(&self.storage_key)?;
        Ok(blob.as_deref().map(alarm_records::decode).unwrap_or_default())
    }

    fn save_records(&self, records: &[ScheduledAlarm]) -> Result<(), SchedulerError> {
        if records.is_empty() {
            self.store.remove(&self.storage_key)?;
        } else {
            let blob = alarm_records::encode(records)?;
            self.store.put_string(&self.storage_key, &blob)?;
        }
        Ok(())
    }

    fn remove_record(&self, id: i32) -> Result<Option<ScheduledAlarm>, SchedulerError> {
        let mut records = self.load_records()?;
        let Some(position) = records.iter().position(|record| record.id == id) else {
            return Ok(None);
        };
        let removed = records.remove(position);
        self.save_records(&records)?;
        Ok(Some(removed))
    }
}
