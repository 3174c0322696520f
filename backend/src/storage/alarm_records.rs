//! Encoding of the persisted alarm record set.
//!
//! The current format is a versioned JSON document:
//!
//! ```json
//! {"version":1,"alarms":[{"id":5,"trigger_time_millis":1760000000000,"title":"Rent","message":"Rent due"}]}
//! ```
//!
//! Older installs stored records as `id::trigger::title::message` joined by
//! `|||`. That layout is still accepted on read; malformed legacy entries are
//! dropped. Everything is written back in the JSON format.

use crate::errors::StorageError;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use shared::ScheduledAlarm;

pub const RECORD_FORMAT_VERSION: u32 = 1;
pub const LEGACY_RECORD_SEPARATOR: &str = "|||";
pub const LEGACY_FIELD_SEPARATOR: &str = "::";

#[derive(Debug, Serialize)]
struct AlarmRecordSet<'a> {
    version: u32,
    alarms: &'a [ScheduledAlarm],
}

/// Entries stay untyped so one bad record does not discard the rest
#[derive(Debug, Deserialize)]
struct StoredRecordSet {
    version: u32,
    alarms: Vec<serde_json::Value>,
}

pub fn encode(alarms: &[ScheduledAlarm]) -> Result<String, StorageError> {
    let record_set = AlarmRecordSet {
        version: RECORD_FORMAT_VERSION,
        alarms,
    };
    Ok(serde_json::to_string(&record_set)?)
}

/// Decode a stored blob. Never fails: unreadable content yields no records.
pub fn decode(blob: &str) -> Vec<ScheduledAlarm> {
    let trimmed = blob.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    if trimmed.starts_with('{') {
        return match serde_json::from_str::<StoredRecordSet>(trimmed) {
            Ok(record_set) => {
                if record_set.version > RECORD_FORMAT_VERSION {
                    warn!(
                        "Alarm records use newer format version {} (supported: {})",
                        record_set.version, RECORD_FORMAT_VERSION
                    );
                }
                decode_entries(record_set.alarms)
            }
            Err(e) => {
                warn!("Discarding unreadable alarm records: {}", e);
                Vec::new()
            }
        };
    }

    let alarms = decode_legacy(trimmed);
    debug!("Decoded {} alarm records from legacy format", alarms.len());
    alarms
}

fn decode_entries(entries: Vec<serde_json::Value>) -> Vec<ScheduledAlarm> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<ScheduledAlarm>(entry) {
            Ok(alarm) => Some(alarm),
            Err(e) => {
                warn!("Dropping malformed alarm record at index {}: {}", index, e);
                None
            }
        })
        .collect()
}

fn decode_legacy(blob: &str) -> Vec<ScheduledAlarm> {
    blob.split(LEGACY_RECORD_SEPARATOR)
        .filter_map(decode_legacy_record)
        .collect()
}

fn decode_legacy_record(record: &str) -> Option<ScheduledAlarm> {
    let fields: Vec<&str> = record.split(LEGACY_FIELD_SEPARATOR).collect();
    if fields.len() != 4 {
        return None;
    }

    let id = fields[0].trim().parse::<i32>().ok()?;
    let trigger_time_millis = fields[1].trim().parse::<i64>().ok()?;
    Some(ScheduledAlarm::new(id, trigger_time_millis, fields[2], fields[3]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_preserves_order_and_delimiters() {
        let alarms = vec![
            ScheduledAlarm::new(2, 2_000, "Internet", "Bill|||due::today"),
            ScheduledAlarm::new(1, 1_000, "Rent", "Pay rent"),
        ];

        let blob = encode(&alarms).unwrap();
        assert!(blob.starts_with("{\"version\":1"));
        assert_eq!(decode(&blob), alarms);
    }

    #[test]
    fn test_decode_empty() {
        assert!(decode("").is_empty());
        assert!(decode("   ").is_empty());
    }

    #[test]
    fn test_decode_legacy_format() {
        let blob = "5::1760000000000::Rent::Rent is due|||6::1760000500000::Gym::Gym membership";
        let alarms = decode(blob);

        assert_eq!(
            alarms,
            vec![
                ScheduledAlarm::new(5, 1_760_000_000_000, "Rent", "Rent is due"),
                ScheduledAlarm::new(6, 1_760_000_500_000, "Gym", "Gym membership"),
            ]
        );
    }

    #[test]
    fn test_decode_legacy_drops_malformed_entries() {
        let blob = "abc::1::t::m|||7::notanumber::t::m|||8::100::only-three|||9::200::ok::fine|||";
        let alarms = decode(blob);

        assert_eq!(alarms, vec![ScheduledAlarm::new(9, 200, "ok", "fine")]);
    }

    #[test]
    fn test_decode_json_drops_malformed_entries_only() {
        let blob = r#"{"version":1,"alarms":[
            {"id":1,"trigger_time_millis":1000,"title":"Rent","message":"Pay rent"},
            {"id":2,"title":"bad"},
            "not a record",
            {"id":3,"trigger_time_millis":3000,"title":"Gym","message":"Gym fee"}
        ]}"#;

        assert_eq!(
            decode(blob),
            vec![
                ScheduledAlarm::new(1, 1_000, "Rent", "Pay rent"),
                ScheduledAlarm::new(3, 3_000, "Gym", "Gym fee"),
            ]
        );
    }

    #[test]
    fn test_decode_corrupt_json_yields_nothing() {
        assert!(decode("{\"version\":1,\"alarms\":[{\"id\":").is_empty());
    }
}
