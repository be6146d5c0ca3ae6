use crate::config::TrackerConfig;
use crate::error::AppError;
use crate::report;
use crate::store::LogStore;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct AppTotal {
    pub app: String,
    pub duration_secs: u64,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct DaySummaryResponse {
    pub date: String,
    pub total_secs: u64,
    pub apps: Vec<AppTotal>,
    /// `"<App>: <duration phrase>"` lines
    pub text: String,
}

/// Per-app totals for `date`, read fresh from the data file.
pub fn day_summary(config: &TrackerConfig, date: NaiveDate) -> Result<DaySummaryResponse, String> {
    let data_file = config.data_file().map_err(|e| {
        log::error!("Failed to resolve data file: {}", e);
        "Failed to load summary".to_string()
    })?;
    let log = LogStore::load(&data_file);

    let apps = log
        .app_totals(date)
        .into_iter()
        .map(|(app, duration_secs)| AppTotal {
            app: app.to_string(),
            duration_secs,
        })
        .collect();

    Ok(DaySummaryResponse {
        date: date.to_string(),
        total_secs: log.day_total(date),
        apps,
        text: report::summary(&log, date),
    })
}

/// Regenerate the HTML report and return the message to show for `today`.
pub fn generate_report(config: &TrackerConfig, today: NaiveDate) -> Result<String, String> {
    let resolve_err = |e: AppError| {
        log::error!("Failed to resolve output paths: {}", e);
        "Failed to generate report".to_string()
    };
    let data_file = config.data_file().map_err(resolve_err)?;
    let report_file = config.report_file().map_err(resolve_err)?;

    let log = LogStore::load(&data_file);
    report::write_report(&log, &report_file).map_err(|e| {
        log::error!("Failed to write report: {}", e);
        format!("Failed to generate report: {e}")
    })?;

    log::info!("Report written to {}", report_file.display());
    Ok(report::today_message(&log, today, &report_file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::closed;
    use tempfile::{tempdir, TempDir};

    fn config_with_data(dir: &TempDir) -> TrackerConfig {
        let data_file = dir.path().join("time_data.json");
        let mut store = LogStore::open(&data_file);
        store.append(&closed("2024-06-01", "Maya", "10:00:30", 30)).unwrap();
        store.append(&closed("2024-06-01", "Blender", "11:00:00", 90)).unwrap();

        TrackerConfig {
            data_file: Some(data_file),
            report_file: Some(dir.path().join("activity_report.html")),
            ..TrackerConfig::default()
        }
    }

    fn june(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn test_day_summary_reads_store() {
        let dir = tempdir().unwrap();
        let config = config_with_data(&dir);

        let summary = day_summary(&config, june(1)).unwrap();

        assert_eq!(summary.date, "2024-06-01");
        assert_eq!(summary.total_secs, 120);
        assert_eq!(
            summary.apps,
            vec![
                AppTotal { app: "Blender".into(), duration_secs: 90 },
                AppTotal { app: "Maya".into(), duration_secs: 30 },
            ]
        );
        assert_eq!(summary.text, "Blender: 1 minute 30 seconds\nMaya: 30 seconds");
    }

    #[test]
    fn test_day_summary_json_shape() {
        let dir = tempdir().unwrap();
        let summary = day_summary(&config_with_data(&dir), june(1)).unwrap();

        let value = serde_json::to_value(&summary).unwrap();

        assert_eq!(value["date"], "2024-06-01");
        assert_eq!(value["total_secs"], 120);
        assert_eq!(
            value["apps"],
            serde_json::json!([
                {"app": "Blender", "duration_secs": 90},
                {"app": "Maya", "duration_secs": 30}
            ])
        );
    }

    #[test]
    fn test_day_summary_empty_day() {
        let dir = tempdir().unwrap();
        let summary = day_summary(&config_with_data(&dir), june(2)).unwrap();
        assert_eq!(summary.total_secs, 0);
        assert!(summary.apps.is_empty());
        assert!(summary.text.is_empty());
    }

    #[test]
    fn test_generate_report_writes_file_and_returns_message() {
        let dir = tempdir().unwrap();
        let config = config_with_data(&dir);

        let message = generate_report(&config, june(1)).unwrap();

        assert!(message.starts_with("Today you have worked a total of: 0h 2m 0s"));
        let html = std::fs::read_to_string(dir.path().join("activity_report.html")).unwrap();
        assert!(html.contains("<h3>Blender</h3>"));
    }

    #[test]
    fn test_generate_report_failure_is_a_message() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, "file").unwrap();
        let config = TrackerConfig {
            report_file: Some(blocker.join("activity_report.html")),
            ..config_with_data(&dir)
        };

        let err = generate_report(&config, june(1)).unwrap_err();

        assert!(err.starts_with("Failed to generate report"));
    }
}
