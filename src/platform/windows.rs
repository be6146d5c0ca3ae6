#![allow(unsafe_code, reason = "Win32 foreground and input queries are FFI")]
#![allow(clippy::as_conversions, reason = "Win32 buffer lengths are u32/i32")]

use super::{ActiveWindow, PlatformTracker};
use crate::error::ProbeError;
use std::path::Path;
use windows_sys::Win32::Foundation::CloseHandle;
use windows_sys::Win32::System::SystemInformation::GetTickCount64;
use windows_sys::Win32::System::Threading::{
    OpenProcess, QueryFullProcessImageNameW, PROCESS_QUERY_LIMITED_INFORMATION,
};
use windows_sys::Win32::UI::Input::KeyboardAndMouse::{GetLastInputInfo, LASTINPUTINFO};
use windows_sys::Win32::UI::WindowsAndMessaging::{
    GetForegroundWindow, GetWindowTextLengthW, GetWindowTextW, GetWindowThreadProcessId,
};

pub struct WindowsTracker;

impl WindowsTracker {
    pub fn new() -> Result<Self, ProbeError> {
        Ok(Self)
    }
}

fn process_exe_path(pid: u32) -> Option<String> {
    unsafe {
        let handle = OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, 0, pid);
        if handle.is_null() {
            return None;
        }

        let mut buf = vec![0u16; 1024];
        let mut size = buf.len() as u32;
        let ok = QueryFullProcessImageNameW(handle, 0, buf.as_mut_ptr(), &mut size);
        CloseHandle(handle);
        if ok == 0 || size == 0 {
            return None;
        }
        buf.truncate(size as usize);
        Some(String::from_utf16_lossy(&buf))
    }
}

impl PlatformTracker for WindowsTracker {
    fn get_active_window(&self) -> Result<Option<ActiveWindow>, ProbeError> {
        unsafe {
            let hwnd = GetForegroundWindow();
            if hwnd.is_null() {
                return Ok(None);
            }

            let mut pid: u32 = 0;
            GetWindowThreadProcessId(hwnd, &mut pid);
            if pid == 0 {
                return Err(ProbeError::Query("foreground window has no process".into()));
            }

            let len = GetWindowTextLengthW(hwnd);
            let window_title = if len > 0 {
                let mut buf = vec![0u16; len as usize + 1];
                let read = GetWindowTextW(hwnd, buf.as_mut_ptr(), buf.len() as i32);
                buf.truncate(read.max(0) as usize);
                String::from_utf16_lossy(&buf)
            } else {
                String::new()
            };

            // Process name, e.g. "maya.exe"
            let app_name = process_exe_path(pid)
                .as_deref()
                .and_then(|p| Path::new(p).file_name())
                .and_then(|s| s.to_str())
                .map(str::to_string)
                .ok_or_else(|| ProbeError::Query(format!("cannot resolve process {pid}")))?;

            Ok(Some(ActiveWindow {
                app_name,
                window_title,
            }))
        }
    }

    fn get_idle_time_secs(&self) -> Result<f64, ProbeError> {
        unsafe {
            let mut lii = LASTINPUTINFO {
                cbSize: std::mem::size_of::<LASTINPUTINFO>() as u32,
                dwTime: 0,
            };
            if GetLastInputInfo(&mut lii) == 0 {
                return Err(ProbeError::Query("GetLastInputInfo failed".into()));
            }

            // dwTime is a 32-bit tick count, compare against the low half.
            let now_low = (GetTickCount64() & 0xFFFF_FFFF) as u32;
            let diff_ms = now_low.wrapping_sub(lii.dwTime);
            Ok(f64::from(diff_ms) / 1000.0)
        }
    }
}
