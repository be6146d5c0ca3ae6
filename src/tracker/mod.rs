mod aggregator;

pub use aggregator::{Aggregator, EndReason, TrackerState};

use crate::config::{MatchTarget, TrackerConfig};
use crate::constants::{
    MAX_CONSECUTIVE_PROBE_FAILURES, STATUS_IDLE, STATUS_TRACKING, STOP_POLL_SLICE_MS,
};
use crate::error::{AppError, ProbeError};
use crate::matcher::AppMatcher;
use crate::models::ClosedSession;
use crate::platform::PlatformTracker;
use crate::store::LogStore;
use chrono::{DateTime, Local};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

/// Notifications from the tracking thread to whoever is displaying status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerEvent {
    Started,
    SessionLogged(ClosedSession),
    PersistFailed(String),
    Failed(String),
    /// Always the last event of a run
    Stopped,
}

/// What the probe reported for one tick
#[derive(Debug, Clone, PartialEq)]
struct Sample {
    identity: Option<String>,
    idle_secs: f64,
}

/// One tracking run: probe, matcher, state machine and log store, driven
/// one tick at a time on a single thread.
pub struct TrackerLoop {
    probe: Box<dyn PlatformTracker>,
    matcher: AppMatcher,
    aggregator: Aggregator,
    store: LogStore,
    match_target: MatchTarget,
    idle_threshold_secs: f64,
    consecutive_failures: u32,
    events: Sender<TrackerEvent>,
}

impl TrackerLoop {
    pub fn new(
        config: &TrackerConfig,
        probe: Box<dyn PlatformTracker>,
        store: LogStore,
        events: Sender<TrackerEvent>,
    ) -> Self {
        Self {
            probe,
            matcher: AppMatcher::new(&config.apps_to_track),
            aggregator: Aggregator::new(config.filter_short_switches),
            store,
            match_target: config.match_target,
            idle_threshold_secs: config.idle_threshold_secs,
            consecutive_failures: 0,
            events,
        }
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    pub fn store(&self) -> &LogStore {
        &self.store
    }

    /// Process one sample taken at `now`.
    ///
    /// A failing probe counts as "nothing tracked" for this tick. Only after
    /// [`MAX_CONSECUTIVE_PROBE_FAILURES`] failures in a row is an error returned.
    pub fn tick(&mut self, now: DateTime<Local>) -> Result<(), AppError> {
        let candidate = match self.sample() {
            Ok(sample) => {
                self.consecutive_failures = 0;
                self.candidate(&sample)
            }
            Err(e) => {
                self.consecutive_failures += 1;
                if self.consecutive_failures >= MAX_CONSECUTIVE_PROBE_FAILURES {
                    return Err(AppError::ProbeExhausted {
                        attempts: self.consecutive_failures,
                        last: e,
                    });
                }
                log::warn!(
                    "Foreground probe failed ({}/{}): {}",
                    self.consecutive_failures,
                    MAX_CONSECUTIVE_PROBE_FAILURES,
                    e
                );
                None
            }
        };

        if let Some(closed) = self.aggregator.observe(candidate.as_deref(), now) {
            self.record(closed);
        }
        Ok(())
    }

    /// Tracking is stopping: keep the open session whatever its length.
    pub fn finish_on_stop(&mut self, now: DateTime<Local>) {
        if let Some(closed) = self.aggregator.flush(now) {
            self.record(closed);
        }
    }

    /// Tracking is failing: close the open session as if the user went idle.
    pub fn finish_on_failure(&mut self, now: DateTime<Local>) {
        if let Some(closed) = self.aggregator.abandon(now) {
            self.record(closed);
        }
    }

    fn sample(&self) -> Result<Sample, ProbeError> {
        let identity = self
            .probe
            .get_active_window()?
            .map(|window| window.identity(self.match_target));
        let idle_secs = self.probe.get_idle_time_secs()?;

        Ok(Sample {
            identity,
            idle_secs,
        })
    }

    fn candidate(&self, sample: &Sample) -> Option<String> {
        if sample.idle_secs > self.idle_threshold_secs {
            return None;
        }
        let identity = sample.identity.as_deref()?;
        self.matcher.first_match(identity).map(str::to_string)
    }

    fn record(&mut self, closed: ClosedSession) {
        match self.store.append(&closed) {
            Ok(()) => {
                log::info!(
                    "Logged {}s of {} ({} - {})",
                    closed.record.duration,
                    closed.app,
                    closed.record.start,
                    closed.record.end
                );
                self.emit(TrackerEvent::SessionLogged(closed));
            }
            Err(e) => {
                log::error!("Failed to persist session for {}: {}", closed.app, e);
                self.emit(TrackerEvent::PersistFailed(e.to_string()));
            }
        }
    }

    fn emit(&self, event: TrackerEvent) {
        // Nobody listening is fine
        let _ = self.events.send(event);
    }
}

pub struct TrackerService {
    config: TrackerConfig,
    /// Set while a tracking thread is alive. Only that thread clears it.
    running: Arc<AtomicBool>,
    /// Stop token of the current run; every run gets a fresh one.
    keep_going: Mutex<Arc<AtomicBool>>,
    events: Sender<TrackerEvent>,
}

impl TrackerService {
    pub fn new(config: TrackerConfig, events: Sender<TrackerEvent>) -> Self {
        Self {
            config,
            running: Arc::new(AtomicBool::new(false)),
            keep_going: Mutex::new(Arc::new(AtomicBool::new(false))),
            events,
        }
    }

    fn current_token(&self) -> MutexGuard<'_, Arc<AtomicBool>> {
        self.keep_going.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Spawn the tracking thread. The log store is opened on that thread and
    /// owned by it until the run ends.
    ///
    /// Fails with [`AppError::AlreadyTracking`] while a previous run is still
    /// alive, including one that was asked to stop but has not exited yet.
    pub fn start(
        &self,
        probe: Box<dyn PlatformTracker>,
    ) -> Result<thread::JoinHandle<Result<(), AppError>>, AppError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(AppError::AlreadyTracking);
        }

        let data_file = match self.config.data_file() {
            Ok(path) => path,
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                return Err(e);
            }
        };

        let keep_going = Arc::new(AtomicBool::new(true));
        *self.current_token() = Arc::clone(&keep_going);

        let running = Arc::clone(&self.running);
        let config = self.config.clone();
        let events = self.events.clone();

        let spawned = thread::Builder::new()
            .name("trakk-tracker".into())
            .spawn(move || {
                let store = LogStore::open(&data_file);
                let mut tracker = TrackerLoop::new(&config, probe, store, events);
                let result = run_loop(&mut tracker, &keep_going, config.poll_interval());
                tracker.emit(TrackerEvent::Stopped);
                // Last touch of the log file happened above; a new run may start now.
                running.store(false, Ordering::SeqCst);
                result
            });

        spawned.map_err(|e| {
            self.running.store(false, Ordering::SeqCst);
            AppError::Io(e)
        })
    }

    /// Ask the tracking thread to finish. It flushes the open session and
    /// exits within one tick; `is_running` stays true until it has.
    pub fn stop(&self) {
        self.current_token().store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn status_text(&self) -> &'static str {
        if self.is_running() {
            STATUS_TRACKING
        } else {
            STATUS_IDLE
        }
    }
}

fn run_loop(
    tracker: &mut TrackerLoop,
    keep_going: &AtomicBool,
    interval: Duration,
) -> Result<(), AppError> {
    log::info!("Tracking started");
    tracker.emit(TrackerEvent::Started);

    let mut next_tick = Instant::now();
    loop {
        if !keep_going.load(Ordering::SeqCst) {
            tracker.finish_on_stop(Local::now());
            log::info!("Tracking stopped");
            return Ok(());
        }

        if let Err(e) = tracker.tick(Local::now()) {
            log::error!("Tracking stopped: {e}");
            tracker.finish_on_failure(Local::now());
            tracker.emit(TrackerEvent::Failed(e.to_string()));
            return Err(e);
        }

        // Ticks are sequential: a slow tick delays the next one rather than
        // letting them pile up.
        next_tick += interval;
        let now = Instant::now();
        if next_tick < now {
            next_tick = now;
        }
        wait_until(next_tick, keep_going);
    }
}

/// Sleep until `deadline`, waking early if `keep_going` is cleared.
fn wait_until(deadline: Instant, keep_going: &AtomicBool) {
    let slice = Duration::from_millis(STOP_POLL_SLICE_MS);
    while keep_going.load(Ordering::SeqCst) {
        let now = Instant::now();
        if now >= deadline {
            return;
        }
        thread::sleep((deadline - now).min(slice));
    }
}
