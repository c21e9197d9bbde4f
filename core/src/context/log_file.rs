//! Log file naming contract
//!
//! Client logs are written as `eqlog_<Character>_<server>.txt`. The character
//! name is needed to attribute "You ..." lines, so it is recovered from the
//! file name alone, without touching the filesystem.

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::SessionError;

/// Prefix every client log file name carries.
pub const LOG_FILE_MARKER: &str = "eqlog_";

#[derive(Debug, Error)]
pub enum LogFileError {
    #[error("invalid log file {path:?} (expected eqlog_ prefix)")]
    MissingMarker { path: PathBuf },

    #[error("log file {path:?} does not name a character")]
    EmptyCharacterName { path: PathBuf },

    #[error("log file {path:?} does not exist")]
    NotFound { path: PathBuf },

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("failed to open {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Identity encoded in a log file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileInfo {
    pub character: String,
    pub server: Option<String>,
}

/// Recover the character (and server, when present) from a log file path.
///
/// ```
/// use eqlog_core::context::parse_log_filename;
/// let info = parse_log_filename("/games/eq/Logs/eqlog_Zinzarin_project1999.txt").unwrap();
/// assert_eq!(info.character, "Zinzarin");
/// assert_eq!(info.server.as_deref(), Some("project1999"));
/// ```
pub fn parse_log_filename(path: impl AsRef<Path>) -> Result<LogFileInfo, LogFileError> {
    let path = path.as_ref();
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();

    let Some(pos) = file_name.find(LOG_FILE_MARKER) else {
        return Err(LogFileError::MissingMarker {
            path: path.to_path_buf(),
        });
    };

    let rest = &file_name[pos + LOG_FILE_MARKER.len()..];
    let rest = rest.split_once('.').map_or(rest, |(stem, _)| stem);

    let (character, server) = match rest.split_once('_') {
        Some((character, server)) => (character, Some(server)),
        None => (rest, None),
    };

    if character.is_empty() {
        return Err(LogFileError::EmptyCharacterName {
            path: path.to_path_buf(),
        });
    }

    Ok(LogFileInfo {
        character: character.to_string(),
        server: server.filter(|s| !s.is_empty()).map(str::to_string),
    })
}
