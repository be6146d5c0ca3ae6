//! Shared test utilities for Trakk.
//!
//! This module provides common setup functions used across test modules.

#![cfg(test)]

use crate::error::ProbeError;
use crate::models::ClosedSession;
use crate::platform::{ActiveWindow, PlatformTracker};
use crate::store::LogStore;
use crate::validation::parse_date;
use chrono::NaiveTime;
use std::collections::VecDeque;
use std::sync::Mutex;
use tempfile::{tempdir, TempDir};

/// Create an empty log store in a temporary directory.
///
/// Returns a tuple of (LogStore, TempDir). The TempDir must be kept alive
/// for the duration of the test to prevent the data file from being deleted.
pub fn setup_test_store() -> (LogStore, TempDir) {
    let dir = tempdir().expect("Failed to create temp directory for test store");
    let store = LogStore::open(&dir.path().join("time_data.json"));
    (store, dir)
}

/// A closed session for `app` that ended at `end` (`HH:MM:SS`) on `date` (`YYYY-MM-DD`).
pub fn closed(date: &str, app: &str, end: &str, duration: u64) -> ClosedSession {
    let date = parse_date(date).expect("valid test date");
    let end = NaiveTime::parse_from_str(end, "%H:%M:%S").expect("valid test time");
    ClosedSession::new(app.to_string(), date.and_time(end), duration)
}

/// One scripted probe answer.
#[derive(Debug, Clone)]
pub enum Step {
    /// This app has focus and input has been idle this many seconds
    Focus(&'static str, f64),
    /// Nothing has focus
    Nothing,
    /// The window query fails
    Fail,
}

/// Probe that replays a script, one step per tick, repeating the last step
/// once the script runs out.
pub struct FakeProbe {
    steps: Mutex<VecDeque<Step>>,
    idle: Mutex<f64>,
}

impl FakeProbe {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            idle: Mutex::new(0.0),
        }
    }

    fn next_step(&self) -> Step {
        let mut steps = self.steps.lock().unwrap();
        if steps.len() > 1 {
            steps.pop_front().unwrap()
        } else {
            steps.front().cloned().unwrap_or(Step::Nothing)
        }
    }
}

impl PlatformTracker for FakeProbe {
    fn get_active_window(&self) -> Result<Option<ActiveWindow>, ProbeError> {
        match self.next_step() {
            Step::Focus(app, idle) => {
                *self.idle.lock().unwrap() = idle;
                Ok(Some(ActiveWindow {
                    app_name: app.to_string(),
                    window_title: String::new(),
                }))
            }
            Step::Nothing => {
                *self.idle.lock().unwrap() = 0.0;
                Ok(None)
            }
            Step::Fail => Err(ProbeError::Query("scripted failure".into())),
        }
    }

    fn get_idle_time_secs(&self) -> Result<f64, ProbeError> {
        Ok(*self.idle.lock().unwrap())
    }
}
