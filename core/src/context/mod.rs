mod log_file;
mod session_guard;
mod zone;

pub use log_file::{LOG_FILE_MARKER, LogFileError, LogFileInfo, parse_log_filename};
pub use session_guard::{SessionError, SessionGuard};
pub use zone::{UNKNOWN_ZONE, ZoneInfo, parse_zone_entered};

#[cfg(test)]
pub(crate) use session_guard::serial_session;
