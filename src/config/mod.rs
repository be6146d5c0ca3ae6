use crate::constants::{
    CONFIG_FILE_NAME, DATA_FILE_NAME, DEFAULT_IDLE_THRESHOLD_SECS, DEFAULT_POLL_INTERVAL_MS,
    REPORT_FILE_NAME,
};
use crate::error::{is_not_found, AppError};
use crate::validation;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Which part of the focused window is matched against `apps_to_track`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchTarget {
    /// Process or application name only
    App,
    /// Window title only
    Title,
    /// Application name followed by the window title
    #[default]
    Both,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub apps_to_track: Vec<String>,
    pub idle_threshold_secs: f64,
    pub poll_interval_ms: u64,
    pub match_target: MatchTarget,
    /// Apply the minimum-duration filter when switching between two tracked
    /// apps as well. Off by default: a direct switch always logs the session.
    pub filter_short_switches: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_file: Option<PathBuf>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            apps_to_track: Vec::new(),
            idle_threshold_secs: DEFAULT_IDLE_THRESHOLD_SECS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            match_target: MatchTarget::default(),
            filter_short_switches: false,
            data_file: None,
            report_file: None,
        }
    }
}

fn project_dirs() -> Result<ProjectDirs, AppError> {
    ProjectDirs::from("com", "trakk", "Trakk").ok_or(AppError::NoProjectDirs)
}

/// Default location of the config file.
pub fn default_config_path() -> Result<PathBuf, AppError> {
    Ok(project_dirs()?.config_dir().join(CONFIG_FILE_NAME))
}

impl TrackerConfig {
    /// Load configuration from `path`.
    ///
    /// A missing file yields the defaults, which track nothing until apps are configured.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if is_not_found(&e) => {
                log::info!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(AppError::Io(e)),
        };

        let config: Self = serde_json::from_str(&raw).map_err(|source| AppError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.validated()
    }

    /// Check every value and normalize the tracked-app list.
    pub fn validated(mut self) -> Result<Self, AppError> {
        validation::validate_idle_threshold(self.idle_threshold_secs)?;
        validation::validate_poll_interval(self.poll_interval_ms)?;
        self.apps_to_track = validation::validate_apps_to_track(&self.apps_to_track)?;
        Ok(self)
    }

    /// Write this configuration as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| AppError::Persist {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Where the daily log lives.
    pub fn data_file(&self) -> Result<PathBuf, AppError> {
        match &self.data_file {
            Some(path) => Ok(path.clone()),
            None => Ok(project_dirs()?.data_dir().join(DATA_FILE_NAME)),
        }
    }

    /// Where the HTML report is written.
    pub fn report_file(&self) -> Result<PathBuf, AppError> {
        match &self.report_file {
            Some(path) => Ok(path.clone()),
            None => Ok(project_dirs()?.data_dir().join(REPORT_FILE_NAME)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = TrackerConfig::load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, TrackerConfig::default());
        assert!(config.apps_to_track.is_empty());
    }

    #[test]
    fn test_original_config_shape_loads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"apps_to_track": ["Blender", " Maya "]}"#).unwrap();

        let config = TrackerConfig::load(&path).unwrap();

        assert_eq!(config.apps_to_track, vec!["Blender", "Maya"]);
        assert!((config.idle_threshold_secs - DEFAULT_IDLE_THRESHOLD_SECS).abs() < f64::EPSILON);
        assert_eq!(config.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        assert_eq!(config.match_target, MatchTarget::Both);
        assert!(!config.filter_short_switches);
    }

    #[test]
    fn test_full_config_loads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{
                "apps_to_track": ["Houdini"],
                "idle_threshold_secs": 60,
                "poll_interval_ms": 500,
                "match_target": "title",
                "filter_short_switches": true,
                "data_file": "/tmp/data.json"
            }"#,
        )
        .unwrap();

        let config = TrackerConfig::load(&path).unwrap();

        assert!((config.idle_threshold_secs - 60.0).abs() < f64::EPSILON);
        assert_eq!(config.poll_interval(), Duration::from_millis(500));
        assert_eq!(config.match_target, MatchTarget::Title);
        assert!(config.filter_short_switches);
        assert_eq!(config.data_file().unwrap(), PathBuf::from("/tmp/data.json"));
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = TrackerConfig::load(&path).unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"poll_interval_ms": 0}"#).unwrap();

        let err = TrackerConfig::load(&path).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput { field: "poll_interval_ms", .. }));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = TrackerConfig {
            apps_to_track: vec!["Nuke".into()],
            ..TrackerConfig::default()
        };

        config.save(&path).unwrap();

        assert_eq!(TrackerConfig::load(&path).unwrap(), config);
    }
}
