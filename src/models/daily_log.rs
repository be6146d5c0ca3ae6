use super::SessionRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// app -> sessions in the order they finished
pub type AppSessions = BTreeMap<String, Vec<SessionRecord>>;

/// The whole persisted log: date -> app -> sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailyLog {
    days: BTreeMap<NaiveDate, AppSessions>,
}

impl DailyLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Add `record` after every earlier session of `app` on `date`.
    pub fn append(&mut self, date: NaiveDate, app: &str, record: SessionRecord) {
        self.days
            .entry(date)
            .or_default()
            .entry(app.to_string())
            .or_default()
            .push(record);
    }

    pub fn day(&self, date: NaiveDate) -> Option<&AppSessions> {
        self.days.get(&date)
    }

    /// Days in ascending date order.
    pub fn days(&self) -> impl Iterator<Item = (&NaiveDate, &AppSessions)> {
        self.days.iter()
    }

    pub fn sessions(&self, date: NaiveDate, app: &str) -> &[SessionRecord] {
        self.day(date)
            .and_then(|apps| apps.get(app))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Seconds per app on `date`, in app name order.
    pub fn app_totals(&self, date: NaiveDate) -> Vec<(&str, u64)> {
        self.day(date)
            .map(|apps| {
                apps.iter()
                    .map(|(app, sessions)| (app.as_str(), total_secs(sessions)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Seconds across all apps on `date`.
    pub fn day_total(&self, date: NaiveDate) -> u64 {
        self.day(date).map_or(0, day_total_secs)
    }
}

pub fn total_secs(sessions: &[SessionRecord]) -> u64 {
    sessions.iter().map(|s| s.duration).sum()
}

pub fn day_total_secs(apps: &AppSessions) -> u64 {
    apps.values().map(|sessions| total_secs(sessions)).sum()
}
