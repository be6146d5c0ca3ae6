//! Read-only views over a [`DailyLog`]: text summary, HTML report and the
//! "today" notification message.

use crate::constants::{DATE_FORMAT, SECS_PER_HOUR, SECS_PER_MINUTE, TIME_FORMAT};
use crate::error::AppError;
use crate::models::{daily_log::total_secs, DailyLog};
use chrono::NaiveDate;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

fn split_hms(secs: u64) -> (u64, u64, u64) {
    (
        secs / SECS_PER_HOUR,
        (secs % SECS_PER_HOUR) / SECS_PER_MINUTE,
        secs % SECS_PER_MINUTE,
    )
}

fn unit(value: u64, label: &str) -> Option<String> {
    match value {
        0 => None,
        1 => Some(format!("1 {label}")),
        n => Some(format!("{n} {label}s")),
    }
}

/// `3661` -> `"1 hour 1 minute 1 second"`. Zero units are left out, so `0` is `""`.
pub fn duration_phrase(secs: u64) -> String {
    let (h, m, s) = split_hms(secs);
    [unit(h, "hour"), unit(m, "minute"), unit(s, "second")]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
}

/// `3661` -> `"1h 1m 1s"`
pub fn compact_duration(secs: u64) -> String {
    let (h, m, s) = split_hms(secs);
    format!("{h}h {m}m {s}s")
}

/// One `"<App>: <duration phrase>"` line per app tracked on `date`.
pub fn summary(log: &DailyLog, date: NaiveDate) -> String {
    log.app_totals(date)
        .into_iter()
        .map(|(app, secs)| format!("{app}: {}", duration_phrase(secs)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Render the whole log as a static HTML document, oldest day first.
pub fn report(log: &DailyLog) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Activity Report</title>\n</head>\n<body>\n<h1>Activity Report</h1>\n",
    );

    // Writing into a String cannot fail
    for (date, apps) in log.days() {
        let _ = writeln!(
            html,
            "<h2>{}, You worked for a total of {}</h2>",
            date.format(DATE_FORMAT),
            compact_duration(log.day_total(*date))
        );
        for (app, sessions) in apps {
            let _ = writeln!(
                html,
                "<h3>{}</h3>\n<p>Total time: {}</p>\n<ul>",
                escape_html(app),
                compact_duration(total_secs(sessions))
            );
            for session in sessions {
                let _ = writeln!(
                    html,
                    "<li>{} - {} ({}s)</li>",
                    session.start.format(TIME_FORMAT),
                    session.end.format(TIME_FORMAT),
                    session.duration
                );
            }
            html.push_str("</ul>\n");
        }
    }

    html.push_str("</body>\n</html>\n");
    html
}

/// Render the report and write it to `path`, creating parent directories.
pub fn write_report(log: &DailyLog, path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, report(log)).map_err(|source| AppError::Persist {
        path: path.to_path_buf(),
        source,
    })
}

/// Message shown after a report is generated.
pub fn today_message(log: &DailyLog, date: NaiveDate, report_path: &Path) -> String {
    let total = log.day_total(date);
    if total == 0 {
        return "No tracked activity found for today.".to_string();
    }

    let per_app = log
        .app_totals(date)
        .into_iter()
        .filter(|(_, secs)| *secs > 0)
        .map(|(app, secs)| format!("{app} {}", duration_phrase(secs)))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Today you have worked a total of: {} ({per_app})\nFor detailed activity report, check:\n{}",
        compact_duration(total),
        report_path.display()
    )
}
