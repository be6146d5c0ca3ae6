use crate::constants::DATE_FORMAT;
use crate::error::AppError;
use chrono::NaiveDate;

/// Validate the idle threshold in seconds.
pub fn validate_idle_threshold(secs: f64) -> Result<(), AppError> {
    if !secs.is_finite() {
        return Err(AppError::InvalidInput {
            field: "idle_threshold_secs",
            reason: "must be a finite number".into(),
        });
    }
    if secs < 0.0 {
        return Err(AppError::InvalidInput {
            field: "idle_threshold_secs",
            reason: "cannot be negative".into(),
        });
    }
    Ok(())
}

/// Validate the poll interval in milliseconds.
pub fn validate_poll_interval(ms: u64) -> Result<(), AppError> {
    if ms == 0 {
        return Err(AppError::InvalidInput {
            field: "poll_interval_ms",
            reason: "must be positive".into(),
        });
    }
    Ok(())
}

/// Validate the tracked-app list and return it with surrounding whitespace trimmed.
///
/// Empty entries are rejected: an empty substring would match every window.
pub fn validate_apps_to_track(apps: &[String]) -> Result<Vec<String>, AppError> {
    apps.iter()
        .map(|app| {
            let trimmed = app.trim();
            if trimmed.is_empty() {
                Err(AppError::InvalidInput {
                    field: "apps_to_track",
                    reason: "entries cannot be empty".into(),
                })
            } else {
                Ok(trimmed.to_string())
            }
        })
        .collect()
}

/// Parse a `YYYY-MM-DD` date argument.
pub fn parse_date(date: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).map_err(|e| AppError::InvalidInput {
        field: "date",
        reason: format!("'{date}' is not YYYY-MM-DD ({e})"),
    })
}
