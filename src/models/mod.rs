pub mod daily_log;
pub mod session;

pub use daily_log::{AppSessions, DailyLog};
pub use session::{ClosedSession, SessionRecord};
