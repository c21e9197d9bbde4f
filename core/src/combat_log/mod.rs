//! Raw log access: timestamped lines and the tailing line source.

mod line;
mod reader;

pub use line::{LogLine, TIMESTAMP_FORMAT, parse_line, parse_timestamp};
pub use reader::{LineSource, StartPosition};
