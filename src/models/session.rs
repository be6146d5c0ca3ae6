use crate::constants::TIME_FORMAT;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};

/// One finalized stretch of time in a tracked app.
///
/// Serialized as `{"start": "HH:MM:SS", "end": "HH:MM:SS", "duration": secs}`;
/// readers of the log file expect exactly these three keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(with = "hms")]
    pub start: NaiveTime,
    #[serde(with = "hms")]
    pub end: NaiveTime,
    pub duration: u64,
}

impl SessionRecord {
    /// Build a record that ends at `end` and lasted `duration` whole seconds.
    ///
    /// `start` is derived from `end` so the two always differ by exactly
    /// `duration` (wrapping past midnight for sessions that span it).
    pub fn ending_at(end: NaiveTime, duration: u64) -> Self {
        let end = end.with_nanosecond(0).unwrap_or(end);
        let span = i64::try_from(duration)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or_else(TimeDelta::zero);
        let (start, _) = end.overflowing_sub_signed(span);

        Self {
            start,
            end,
            duration,
        }
    }
}

/// A record together with where it is filed in the daily log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosedSession {
    pub date: NaiveDate,
    pub app: String,
    pub record: SessionRecord,
}

impl ClosedSession {
    /// Close a session for `app` at `finished_at`, filed under that day.
    pub fn new(app: String, finished_at: NaiveDateTime, duration: u64) -> Self {
        Self {
            date: finished_at.date(),
            app,
            record: SessionRecord::ending_at(finished_at.time(), duration),
        }
    }
}

mod hms {
    use super::TIME_FORMAT;
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(TIME_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, TIME_FORMAT).map_err(serde::de::Error::custom)
    }
}
