use crate::config::MatchTarget;
use crate::error::ProbeError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveWindow {
    pub app_name: String,
    pub window_title: String,
}

impl ActiveWindow {
    /// The foreground identity string handed to the matcher.
    pub fn identity(&self, target: MatchTarget) -> String {
        match target {
            MatchTarget::App => self.app_name.clone(),
            MatchTarget::Title => self.window_title.clone(),
            MatchTarget::Both if self.window_title.is_empty() => self.app_name.clone(),
            MatchTarget::Both if self.app_name.is_empty() => self.window_title.clone(),
            MatchTarget::Both => format!("{} {}", self.app_name, self.window_title),
        }
    }
}

/// Foreground probe: what has focus and how long input has been idle.
pub trait PlatformTracker: Send {
    /// `Ok(None)` means nothing has focus (e.g. the desktop).
    fn get_active_window(&self) -> Result<Option<ActiveWindow>, ProbeError>;
    fn get_idle_time_secs(&self) -> Result<f64, ProbeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(app: &str, title: &str) -> ActiveWindow {
        ActiveWindow {
            app_name: app.into(),
            window_title: title.into(),
        }
    }

    #[test]
    fn test_identity_by_target() {
        let w = window("blender", "scene.blend - Blender 4.1");
        assert_eq!(w.identity(MatchTarget::App), "blender");
        assert_eq!(w.identity(MatchTarget::Title), "scene.blend - Blender 4.1");
        assert_eq!(w.identity(MatchTarget::Both), "blender scene.blend - Blender 4.1");
    }

    #[test]
    fn test_identity_both_skips_missing_half() {
        assert_eq!(window("maya.exe", "").identity(MatchTarget::Both), "maya.exe");
        assert_eq!(window("", "Untitled").identity(MatchTarget::Both), "Untitled");
    }
}
