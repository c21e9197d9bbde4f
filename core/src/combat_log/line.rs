use chrono::NaiveDateTime;
use memchr::memchr;

/// Layout of the bracketed prefix, e.g. `[Tue Mar 12 20:15:00 2024]`.
pub const TIMESTAMP_FORMAT: &str = "%a %b %d %H:%M:%S %Y";

/// A raw log line together with its parsed timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub timestamp: NaiveDateTime,
    pub text: String,
}

impl LogLine {
    /// Text following the timestamp bracket, without the separating space.
    pub fn message(&self) -> &str {
        match memchr(b']', self.text.as_bytes()) {
            Some(end) => self.text[end + 1..].trim_start(),
            None => &self.text,
        }
    }
}

/// Parse a raw line into a [`LogLine`]. Lines without a usable timestamp yield `None`.
pub fn parse_line(raw: &str) -> Option<LogLine> {
    let (timestamp, _) = parse_timestamp(raw)?;
    Some(LogLine {
        timestamp,
        text: raw.to_string(),
    })
}

/// Extract the first bracketed substring and parse it as a timestamp.
/// Returns the timestamp and the remainder of the line after the closing bracket.
pub fn parse_timestamp(input: &str) -> Option<(NaiveDateTime, &str)> {
    let bytes = input.as_bytes();
    let open = memchr(b'[', bytes)?;
    let close = open + 1 + memchr(b']', &bytes[open + 1..])?;

    let ts = NaiveDateTime::parse_from_str(input[open + 1..close].trim(), TIMESTAMP_FORMAT).ok()?;
    Some((ts, &input[close + 1..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_timestamp() {
        let line = "[Tue Mar 12 20:15:00 2024] You have entered East Commonlands.";
        let (ts, rest) = parse_timestamp(line).expect("Should parse");
        let expected = NaiveDate::from_ymd_opt(2024, 3, 12)
            .unwrap()
            .and_hms_opt(20, 15, 0)
            .unwrap();
        assert_eq!(ts, expected);
        assert_eq!(rest, " You have entered East Commonlands.");
    }

    #[test]
    fn test_message_strips_prefix() {
        let line = parse_line("[Tue Mar 12 20:15:00 2024] You have gained an ability point!")
            .expect("Should parse");
        assert_eq!(line.message(), "You have gained an ability point!");
    }

    #[test]
    fn test_missing_bracket_is_rejected() {
        assert!(parse_line("Tue Mar 12 20:15:00 2024 You have entered Befallen.").is_none());
        assert!(parse_line("[Tue Mar 12 20:15:00 2024 unterminated").is_none());
        assert!(parse_line("").is_none());
    }

    #[test]
    fn test_malformed_timestamp_is_rejected() {
        assert!(parse_line("[not a date] You have entered Befallen.").is_none());
        assert!(parse_line("[Tue Mar 32 20:15:00 2024] bogus day").is_none());
        // Weekday must agree with the date
        assert!(parse_line("[Wed Mar 12 20:15:00 2024] wrong weekday").is_none());
    }

    #[test]
    fn test_first_bracket_wins() {
        let line = "[Tue Mar 12 20:15:00 2024] Soandso tells the guild, '[Mon Jan 01 00:00:00 2024]'";
        let (ts, _) = parse_timestamp(line).expect("Should parse");
        assert_eq!(ts.format("%H:%M:%S").to_string(), "20:15:00");
    }
}
