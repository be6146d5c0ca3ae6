// src/constants.rs

/// Sessions that end by going idle or untracked are dropped below this length.
pub const MINIMUM_ACTIVITY_DURATION_SECS: u64 = 10;

/// Default idle cutoff: no input for this long means the user is away.
pub const DEFAULT_IDLE_THRESHOLD_SECS: f64 = 300.0;

/// Default probe interval (1 Hz)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Consecutive probe failures tolerated before the tracking loop gives up.
pub const MAX_CONSECUTIVE_PROBE_FAILURES: u32 = 3;

/// Longest single sleep while waiting for the next tick, so a stop request is
/// noticed quickly even with long poll intervals.
pub const STOP_POLL_SLICE_MS: u64 = 100;

pub const SECS_PER_MINUTE: u64 = 60;
pub const SECS_PER_HOUR: u64 = 60 * 60;

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const DATA_FILE_NAME: &str = "time_data.json";
pub const REPORT_FILE_NAME: &str = "activity_report.html";

/// Suffix for the copy of a data file that could not be parsed.
pub const CORRUPT_FILE_SUFFIX: &str = "corrupt";

/// Date key layout in the persisted log.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Time-of-day layout for session start/end.
pub const TIME_FORMAT: &str = "%H:%M:%S";

pub const STATUS_TRACKING: &str = "Tracking your work activity now";
pub const STATUS_IDLE: &str = "Idle";
