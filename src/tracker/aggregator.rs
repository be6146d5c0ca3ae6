use crate::constants::MINIMUM_ACTIVITY_DURATION_SECS;
use crate::models::ClosedSession;
use chrono::{DateTime, Local};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerState {
    Idle,
    Active {
        app: String,
        started_at: DateTime<Local>,
    },
}

/// Why the open session is being closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// No tracked app in focus, or the user went idle
    Untracked,
    /// A different tracked app took focus
    Switch,
    /// Tracking was stopped explicitly
    Stop,
}

/// Turns one candidate per tick into closed sessions. At most one session is
/// open at a time.
///
/// Sessions closed by going idle/untracked are dropped when shorter than
/// [`MINIMUM_ACTIVITY_DURATION_SECS`]. Sessions closed by an explicit stop are
/// always kept, and so are sessions closed by switching to another tracked
/// app unless `filter_short_switches` is set.
#[derive(Debug)]
pub struct Aggregator {
    state: TrackerState,
    filter_short_switches: bool,
}

impl Aggregator {
    pub fn new(filter_short_switches: bool) -> Self {
        Self {
            state: TrackerState::Idle,
            filter_short_switches,
        }
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn active_app(&self) -> Option<&str> {
        match &self.state {
            TrackerState::Active { app, .. } => Some(app.as_str()),
            TrackerState::Idle => None,
        }
    }

    /// Feed this tick's candidate. Returns the session that ended, if it is kept.
    pub fn observe(&mut self, candidate: Option<&str>, now: DateTime<Local>) -> Option<ClosedSession> {
        if self.active_app() == candidate {
            return None;
        }

        let closed = match candidate {
            Some(_) => self.finish(EndReason::Switch, now),
            None => self.finish(EndReason::Untracked, now),
        };

        if let Some(app) = candidate {
            self.state = TrackerState::Active {
                app: app.to_string(),
                started_at: now,
            };
        }

        closed
    }

    /// Close the open session because tracking stops; kept regardless of length.
    pub fn flush(&mut self, now: DateTime<Local>) -> Option<ClosedSession> {
        self.finish(EndReason::Stop, now)
    }

    /// Close the open session because the loop is failing; treated like going idle.
    pub fn abandon(&mut self, now: DateTime<Local>) -> Option<ClosedSession> {
        self.finish(EndReason::Untracked, now)
    }

    fn finish(&mut self, reason: EndReason, now: DateTime<Local>) -> Option<ClosedSession> {
        let TrackerState::Active { app, started_at } =
            std::mem::replace(&mut self.state, TrackerState::Idle)
        else {
            return None;
        };

        // A clock stepping backwards must not produce a negative duration.
        let duration = u64::try_from((now - started_at).num_seconds()).unwrap_or(0);

        let filtered = match reason {
            EndReason::Untracked => true,
            EndReason::Switch => self.filter_short_switches,
            EndReason::Stop => false,
        };
        if filtered && duration < MINIMUM_ACTIVITY_DURATION_SECS {
            log::debug!("Dropping {duration}s session for {app} ({reason:?})");
            return None;
        }

        Some(ClosedSession::new(app, now.naive_local(), duration))
    }
}
