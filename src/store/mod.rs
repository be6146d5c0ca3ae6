use crate::constants::CORRUPT_FILE_SUFFIX;
use crate::error::{is_not_found, AppError};
use crate::models::{ClosedSession, DailyLog};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Durable date -> app -> sessions log backed by a single JSON file.
///
/// The file is rewritten in full after every append. Only the tracking loop
/// holds a `LogStore`; readers call [`LogStore::load`] for a fresh copy.
pub struct LogStore {
    path: PathBuf,
    log: DailyLog,
}

impl LogStore {
    /// Open the store at `path`, loading whatever is already there.
    pub fn open(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            log: Self::load(path),
        }
    }

    /// Read the log at `path`. Never fails: anything unreadable is an empty log.
    ///
    /// A file that exists but cannot be read or parsed is set aside first so
    /// the next write cannot destroy it.
    pub fn load(path: &Path) -> DailyLog {
        let raw = match fs::read(path) {
            Ok(raw) => raw,
            Err(e) if is_not_found(&e) => return DailyLog::new(),
            Err(e) => {
                log::warn!("Could not read {}: {}, starting empty", path.display(), e);
                set_aside(path);
                return DailyLog::new();
            }
        };

        match serde_json::from_slice(&raw) {
            Ok(log) => log,
            Err(e) => {
                log::warn!("Could not parse {}: {}, starting empty", path.display(), e);
                set_aside(path);
                DailyLog::new()
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn log(&self) -> &DailyLog {
        &self.log
    }

    /// Append a finished session and rewrite the file.
    ///
    /// The in-memory log keeps the record even when the write fails, so the
    /// next successful write still includes it.
    pub fn append(&mut self, session: &ClosedSession) -> Result<(), AppError> {
        self.log
            .append(session.date, &session.app, session.record.clone());
        self.persist()
    }

    fn persist(&self) -> Result<(), AppError> {
        let persist_err = |source| AppError::Persist {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(persist_err)?;
        }

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.log.serialize(&mut ser)?;

        // Write a sibling file and rename it over the old one so a crash
        // mid-write never leaves a truncated log.
        let tmp = sibling_with_suffix(&self.path, "tmp");
        fs::write(&tmp, &buf).map_err(persist_err)?;
        fs::rename(&tmp, &self.path).map_err(persist_err)
    }
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

fn corrupt_backup_path(path: &Path) -> PathBuf {
    sibling_with_suffix(path, CORRUPT_FILE_SUFFIX)
}

/// Keep a bad data file at `<name>.corrupt`. Copy when possible; a file we
/// cannot read is moved instead, which still takes it out of the write path.
fn set_aside(path: &Path) {
    let backup = corrupt_backup_path(path);
    let kept = fs::copy(path, &backup)
        .map(|_| ())
        .or_else(|_| fs::rename(path, &backup));

    match kept {
        Ok(()) => log::warn!("Kept a copy of {} at {}", path.display(), backup.display()),
        Err(e) => log::error!("Failed to back up {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionRecord;
    use crate::test_utils::{closed, setup_test_store};
    use chrono::NaiveDate;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let log = LogStore::load(&dir.path().join("time_data.json"));
        assert!(log.is_empty());
    }

    #[test]
    fn test_append_persists_immediately() {
        let (mut store, _dir) = setup_test_store();

        store.append(&closed("2024-06-01", "Maya", "10:00:30", 30)).unwrap();

        let on_disk = LogStore::load(store.path());
        assert_eq!(&on_disk, store.log());
        assert_eq!(on_disk.day_total(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()), 30);
    }

    #[test]
    fn test_round_trip_multiple_dates_and_apps() {
        let (mut store, _dir) = setup_test_store();
        let sessions = [
            closed("2024-06-01", "Maya", "10:00:30", 30),
            closed("2024-06-01", "Blender", "10:05:00", 200),
            closed("2024-06-01", "Maya", "11:00:00", 15),
            closed("2024-06-02", "Maya", "09:00:00", 12),
        ];
        for session in &sessions {
            store.append(session).unwrap();
        }

        let reopened = LogStore::open(store.path());

        for session in &sessions {
            assert!(reopened
                .log()
                .sessions(session.date, &session.app)
                .contains(&session.record));
        }
        let maya_day1: Vec<u64> = reopened
            .log()
            .sessions(sessions[0].date, "Maya")
            .iter()
            .map(|r| r.duration)
            .collect();
        assert_eq!(maya_day1, vec![30, 15]);
    }

    #[test]
    fn test_reopen_appends_after_existing_records() {
        let (mut store, _dir) = setup_test_store();
        store.append(&closed("2024-06-01", "Maya", "10:00:30", 30)).unwrap();

        let mut reopened = LogStore::open(store.path());
        reopened.append(&closed("2024-06-01", "Maya", "10:10:00", 40)).unwrap();

        let durations: Vec<u64> = LogStore::load(store.path())
            .sessions(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(), "Maya")
            .iter()
            .map(|r| r.duration)
            .collect();
        assert_eq!(durations, vec![30, 40]);
    }

    #[test]
    fn test_file_uses_original_layout() {
        let (mut store, _dir) = setup_test_store();
        store.append(&closed("2024-06-01", "Maya", "10:00:30", 30)).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "2024-06-01": {"Maya": [{"start": "10:00:00", "end": "10:00:30", "duration": 30}]}
            })
        );
        assert!(raw.contains("\n    \"2024-06-01\""));
    }

    #[test]
    fn test_corrupt_file_loads_empty_and_is_kept() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("time_data.json");
        fs::write(&path, "{ broken").unwrap();

        let log = LogStore::load(&path);

        assert!(log.is_empty());
        let backup = dir.path().join("time_data.json.corrupt");
        assert_eq!(fs::read_to_string(backup).unwrap(), "{ broken");
    }

    #[test]
    fn test_invalid_utf8_file_is_kept_before_next_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("time_data.json");
        let original: &[u8] =
            b"{\"2024-05-01\": {\"Maya\xFF\": [{\"start\": \"10:00:00\", \"end\": \"10:00:30\", \"duration\": 30}]}}";
        fs::write(&path, original).unwrap();

        let mut store = LogStore::open(&path);
        assert!(store.log().is_empty());
        store.append(&closed("2024-06-01", "Blender", "10:01:00", 60)).unwrap();

        let backup = dir.path().join("time_data.json.corrupt");
        assert_eq!(fs::read(backup).unwrap(), original);
        let on_disk = LogStore::load(&path);
        assert_eq!(on_disk.day_total(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()), 60);
    }

    #[test]
    fn test_unreadable_path_loads_empty_and_is_kept() {
        let dir = tempdir().unwrap();
        // A directory where the file should be fails to read on every platform
        let path = dir.path().join("time_data.json");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("inside"), "x").unwrap();

        let log = LogStore::load(&path);

        assert!(log.is_empty());
        assert!(!path.exists());
        assert!(dir.path().join("time_data.json.corrupt").join("inside").exists());
    }

    #[test]
    fn test_failed_write_keeps_record_for_next_write() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocked");
        fs::write(&blocker, "not a directory").unwrap();
        let mut store = LogStore::open(&blocker.join("time_data.json"));

        let first = closed("2024-06-01", "Maya", "10:00:30", 30);
        let err = store.append(&first).unwrap_err();
        assert!(matches!(err, AppError::Persist { .. }));
        assert_eq!(store.log().sessions(first.date, "Maya"), &[first.record.clone()]);

        fs::remove_file(&blocker).unwrap();
        let second = closed("2024-06-01", "Maya", "10:05:00", 60);
        store.append(&second).unwrap();

        let on_disk = LogStore::load(store.path());
        let expected: Vec<SessionRecord> = vec![first.record, second.record];
        assert_eq!(on_disk.sessions(second.date, "Maya"), expected.as_slice());
    }
}
