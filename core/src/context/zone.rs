use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

/// Zone name used before the first zone-change line is seen.
pub const UNKNOWN_ZONE: &str = "Unknown";

static ZONE_ENTERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^You have entered (.+)$").expect("zone pattern is valid"));

/// Extract the zone name from a "You have entered <zone>." message.
pub fn parse_zone_entered(message: &str) -> Option<&str> {
    let caps = ZONE_ENTERED.captures(message.trim_end())?;
    let zone = caps.get(1)?.as_str().trim_end_matches('.').trim();
    (!zone.is_empty()).then_some(zone)
}

/// The zone currently occupied and when it was entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneInfo {
    pub name: String,
    pub entered_at: NaiveDateTime,
}

impl ZoneInfo {
    pub fn new(name: impl Into<String>, entered_at: NaiveDateTime) -> Self {
        Self {
            name: name.into(),
            entered_at,
        }
    }

    pub fn unknown(entered_at: NaiveDateTime) -> Self {
        Self::new(UNKNOWN_ZONE, entered_at)
    }

    /// Seconds from zone entry to `at`. Negative if `at` precedes the entry.
    pub fn elapsed_secs(&self, at: NaiveDateTime) -> f64 {
        at.signed_duration_since(self.entered_at).num_milliseconds() as f64 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_zone_entered() {
        assert_eq!(
            parse_zone_entered("You have entered East Commonlands."),
            Some("East Commonlands")
        );
        assert_eq!(parse_zone_entered("You have entered The Bazaar.\r"), Some("The Bazaar"));
        assert_eq!(parse_zone_entered("You have entered Befallen"), Some("Befallen"));
    }

    #[test]
    fn test_parse_zone_rejects_other_lines() {
        assert_eq!(parse_zone_entered("Soandso says, 'You have entered my heart.'"), None);
        assert_eq!(parse_zone_entered("You have entered ."), None);
        assert_eq!(parse_zone_entered("You have gained an ability point!"), None);
    }

    #[test]
    fn test_elapsed_secs() {
        let entered = NaiveDate::from_ymd_opt(2024, 3, 12)
            .unwrap()
            .and_hms_opt(20, 0, 0)
            .unwrap();
        let zone = ZoneInfo::new("Befallen", entered);
        assert_eq!(zone.elapsed_secs(entered + chrono::Duration::seconds(90)), 90.0);
        assert_eq!(zone.elapsed_secs(entered - chrono::Duration::seconds(5)), -5.0);
    }
}
