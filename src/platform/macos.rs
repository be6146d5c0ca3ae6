#![allow(unsafe_code, reason = "AppKit accessors are exposed as unsafe fns")]

use super::{ActiveWindow, PlatformTracker};
use crate::error::ProbeError;
use objc2_app_kit::NSWorkspace;
use std::process::Command;

pub struct MacOSTracker;

impl MacOSTracker {
    pub fn new() -> Result<Self, ProbeError> {
        Ok(Self)
    }
}

/// Pull `HIDIdleTime` (nanoseconds) out of `ioreg -c IOHIDSystem` output.
fn parse_hid_idle_secs(ioreg_output: &str) -> Option<f64> {
    ioreg_output
        .lines()
        .find(|line| line.contains("\"HIDIdleTime\""))
        .and_then(|line| line.split('=').nth(1))
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(|nanos| std::time::Duration::from_nanos(nanos).as_secs_f64())
}

impl PlatformTracker for MacOSTracker {
    fn get_active_window(&self) -> Result<Option<ActiveWindow>, ProbeError> {
        // Window titles need accessibility permissions, so only the app name is reported.
        let app_name = unsafe {
            let workspace = NSWorkspace::sharedWorkspace();
            workspace
                .frontmostApplication()
                .and_then(|app| app.localizedName())
                .map(|name| name.to_string())
        };

        Ok(app_name.map(|app_name| ActiveWindow {
            app_name,
            window_title: String::new(),
        }))
    }

    fn get_idle_time_secs(&self) -> Result<f64, ProbeError> {
        let output = Command::new("ioreg")
            .args(["-c", "IOHIDSystem", "-d", "4"])
            .output()
            .map_err(|e| ProbeError::Query(format!("ioreg: {e}")))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_hid_idle_secs(&stdout)
            .ok_or_else(|| ProbeError::Query("HIDIdleTime not reported".into()))
    }
}
