pub mod types;

pub use types::{ActiveWindow, PlatformTracker};

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(target_os = "linux")]
pub mod linux;

#[cfg(windows)]
pub mod windows;

#[cfg(target_os = "macos")]
pub use macos::MacOSTracker as NativeTracker;

#[cfg(target_os = "linux")]
pub use linux::LinuxTracker as NativeTracker;

#[cfg(windows)]
pub use windows::WindowsTracker as NativeTracker;

#[cfg(not(any(target_os = "macos", target_os = "linux", windows)))]
pub use unsupported::UnsupportedTracker as NativeTracker;

#[cfg(not(any(target_os = "macos", target_os = "linux", windows)))]
mod unsupported {
    use super::{ActiveWindow, PlatformTracker};
    use crate::error::ProbeError;

    /// Every query fails, so the tracking loop gives up after its failure budget.
    pub struct UnsupportedTracker;

    impl UnsupportedTracker {
        pub fn new() -> Result<Self, ProbeError> {
            Ok(Self)
        }
    }

    impl PlatformTracker for UnsupportedTracker {
        fn get_active_window(&self) -> Result<Option<ActiveWindow>, ProbeError> {
            Err(ProbeError::Unsupported)
        }

        fn get_idle_time_secs(&self) -> Result<f64, ProbeError> {
            Err(ProbeError::Unsupported)
        }
    }
}
