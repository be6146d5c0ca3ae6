use super::{ActiveWindow, PlatformTracker};
use crate::error::ProbeError;
use x11rb::connection::Connection;
use x11rb::protocol::screensaver;
use x11rb::protocol::xproto::{AtomEnum, ConnectionExt, Window};
use x11rb::rust_connection::RustConnection;

pub struct LinuxTracker {
    conn: RustConnection,
    root: Window,
}

fn query_err(e: impl std::fmt::Display) -> ProbeError {
    ProbeError::Query(e.to_string())
}

impl LinuxTracker {
    pub fn new() -> Result<Self, ProbeError> {
        let (conn, screen_num) =
            x11rb::connect(None).map_err(|e| ProbeError::Connection(e.to_string()))?;
        let root = conn
            .setup()
            .roots
            .get(screen_num)
            .map(|screen| screen.root)
            .ok_or_else(|| ProbeError::Connection(format!("no X screen {screen_num}")))?;

        Ok(Self { conn, root })
    }

    fn get_atom(&self, name: &str) -> Result<u32, ProbeError> {
        Ok(self
            .conn
            .intern_atom(false, name.as_bytes())
            .map_err(query_err)?
            .reply()
            .map_err(query_err)?
            .atom)
    }

    fn get_window_property(&self, window: Window, atom: u32) -> Result<Option<String>, ProbeError> {
        let reply = self
            .conn
            .get_property(false, window, atom, AtomEnum::ANY, 0, 1024)
            .map_err(query_err)?
            .reply()
            .map_err(query_err)?;

        if reply.value.is_empty() {
            return Ok(None);
        }

        Ok(Some(String::from_utf8_lossy(&reply.value).into_owned()))
    }

    fn get_active_window_id(&self) -> Result<Option<Window>, ProbeError> {
        let atom = self.get_atom("_NET_ACTIVE_WINDOW")?;
        let reply = self
            .conn
            .get_property(false, self.root, atom, AtomEnum::WINDOW, 0, 1)
            .map_err(query_err)?
            .reply()
            .map_err(query_err)?;

        // Window 0 means no window has focus.
        Ok(reply
            .value32()
            .and_then(|mut values| values.next())
            .filter(|&id| id != 0))
    }
}

impl PlatformTracker for LinuxTracker {
    fn get_active_window(&self) -> Result<Option<ActiveWindow>, ProbeError> {
        let Some(window_id) = self.get_active_window_id()? else {
            return Ok(None);
        };

        let name_atom = self.get_atom("_NET_WM_NAME")?;
        let window_title = match self.get_window_property(window_id, name_atom)? {
            Some(title) => title,
            None => self
                .get_window_property(window_id, AtomEnum::WM_NAME.into())?
                .unwrap_or_default(),
        };

        // WM_CLASS is "instance\0class\0"
        let app_name = self
            .get_window_property(window_id, AtomEnum::WM_CLASS.into())?
            .and_then(|class| class.split('\0').next().map(str::to_string))
            .unwrap_or_default();

        Ok(Some(ActiveWindow {
            app_name,
            window_title,
        }))
    }

    fn get_idle_time_secs(&self) -> Result<f64, ProbeError> {
        let info = screensaver::query_info(&self.conn, self.root)
            .map_err(query_err)?
            .reply()
            .map_err(query_err)?;

        Ok(f64::from(info.ms_since_user_input) / 1000.0)
    }
}
