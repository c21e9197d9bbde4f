//! Ability point gain rate, per zone.
//!
//! Counts "You have gained an ability point!" lines since the last zone change
//! and reports the hourly rate. Entering the ignored zone leaves the counter
//! and the zone clock untouched.

use std::fmt;

use chrono::NaiveDateTime;
use eqlog_types::TrackerConfig;
use eqlog_types::formatting::format_rate;
use tracing::debug;

use crate::combat_log::LogLine;
use crate::context::{ZoneInfo, parse_zone_entered};
use crate::events::{DispatchContext, LineHandler};

const ABILITY_POINT_GAINED: &str = "You have gained an ability point!";

/// Rate figures reported after each ability point.
#[derive(Debug, Clone, PartialEq)]
pub struct AbilityRate {
    pub total: u32,
    pub per_hour: f64,
    pub hours_in_zone: f64,
    pub minutes_since_last: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AbilityEvent {
    ZoneEntered { zone: String },
    PointGained(AbilityRate),
}

impl fmt::Display for AbilityEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZoneEntered { zone } => write!(f, "You have entered {}", zone),
            Self::PointGained(rate) => write!(
                f,
                "Total AA gained: {} / per hour: {}, Time in zone: {} hours, last AA ding: {} minutes",
                rate.total,
                format_rate(rate.per_hour),
                format_rate(rate.hours_in_zone),
                format_rate(rate.minutes_since_last),
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AbilityTracker {
    config: TrackerConfig,
    zone: ZoneInfo,
    gained: u32,
    last_gain_at: Option<NaiveDateTime>,
}

impl AbilityTracker {
    /// `started_at` stands in as the zone entry time until a zone line is seen.
    pub fn new(config: &TrackerConfig, started_at: NaiveDateTime) -> Self {
        Self {
            config: config.clone(),
            zone: ZoneInfo::unknown(started_at),
            gained: 0,
            last_gain_at: None,
        }
    }

    pub fn zone(&self) -> &ZoneInfo {
        &self.zone
    }

    /// Ability points gained since the current zone was entered.
    pub fn gained(&self) -> u32 {
        self.gained
    }

    /// Apply one line. Returns the event to report, if any.
    pub fn process(&mut self, line: &LogLine) -> Option<AbilityEvent> {
        let message = line.message();

        if let Some(zone) = parse_zone_entered(message) {
            return self.enter_zone(zone, line.timestamp);
        }

        if message.trim_end().starts_with(ABILITY_POINT_GAINED) {
            return self.gain_point(line.timestamp);
        }

        None
    }

    fn enter_zone(&mut self, zone: &str, at: NaiveDateTime) -> Option<AbilityEvent> {
        if self.config.is_ignored_zone(zone) {
            debug!(zone, "ignoring zone change");
            return None;
        }

        self.zone = ZoneInfo::new(zone, at);
        self.gained = 0;
        Some(AbilityEvent::ZoneEntered {
            zone: zone.to_string(),
        })
    }

    fn gain_point(&mut self, at: NaiveDateTime) -> Option<AbilityEvent> {
        let previous = self.last_gain_at.unwrap_or(self.zone.entered_at);
        let minutes_since_last = at.signed_duration_since(previous).num_milliseconds() as f64 / 60_000.0;
        self.last_gain_at = Some(at);
        self.gained += 1;

        let hours_in_zone = self.zone.elapsed_secs(at) / 3600.0;
        if hours_in_zone <= 0.0 {
            return None;
        }

        Some(AbilityEvent::PointGained(AbilityRate {
            total: self.gained,
            per_hour: self.gained as f64 / hours_in_zone,
            hours_in_zone,
            minutes_since_last,
        }))
    }
}

impl LineHandler for AbilityTracker {
    fn handle_line(&mut self, line: &LogLine, _ctx: &DispatchContext) {
        if let Some(event) = self.process(line) {
            println!("{}", event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat_log::parse_line;
    use chrono::NaiveDate;

    fn started() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 12)
            .unwrap()
            .and_hms_opt(19, 0, 0)
            .unwrap()
    }

    fn tracker() -> AbilityTracker {
        AbilityTracker::new(&TrackerConfig::default(), started())
    }

    fn line(raw: &str) -> LogLine {
        parse_line(raw).expect("test line has a timestamp")
    }

    #[test]
    fn test_zone_change_resets_counter() {
        let mut t = tracker();
        t.process(&line("[Tue Mar 12 20:00:00 2024] You have entered East Commonlands."));
        t.process(&line("[Tue Mar 12 20:30:00 2024] You have gained an ability point!"));
        assert_eq!(t.gained(), 1);

        let event = t.process(&line("[Tue Mar 12 20:45:00 2024] You have entered Befallen."));
        assert_eq!(
            event,
            Some(AbilityEvent::ZoneEntered {
                zone: "Befallen".to_string()
            })
        );
        assert_eq!(t.gained(), 0);
        assert_eq!(t.zone().name, "Befallen");
        assert_eq!(t.zone().entered_at.to_string(), "2024-03-12 20:45:00");
    }

    #[test]
    fn test_repeated_zone_still_resets() {
        let mut t = tracker();
        t.process(&line("[Tue Mar 12 20:00:00 2024] You have entered East Commonlands."));
        t.process(&line("[Tue Mar 12 20:10:00 2024] You have gained an ability point!"));
        let event = t.process(&line("[Tue Mar 12 20:20:00 2024] You have entered East Commonlands."));

        assert!(matches!(event, Some(AbilityEvent::ZoneEntered { .. })));
        assert_eq!(t.gained(), 0);
        assert_eq!(t.zone().entered_at.to_string(), "2024-03-12 20:20:00");
    }

    #[test]
    fn test_ignored_zone_changes_nothing() {
        let mut t = tracker();
        t.process(&line("[Tue Mar 12 20:00:00 2024] You have entered East Commonlands."));
        t.process(&line("[Tue Mar 12 20:10:00 2024] You have gained an ability point!"));

        let event = t.process(&line("[Tue Mar 12 20:20:00 2024] You have entered The Bazaar."));
        assert_eq!(event, None);
        assert_eq!(t.gained(), 1);
        assert_eq!(t.zone().name, "East Commonlands");
        assert_eq!(t.zone().entered_at.to_string(), "2024-03-12 20:00:00");
    }

    #[test]
    fn test_rate_after_n_gains() {
        let mut t = tracker();
        t.process(&line("[Tue Mar 12 20:00:00 2024] You have entered East Commonlands."));
        t.process(&line("[Tue Mar 12 20:20:00 2024] You have gained an ability point!"));
        t.process(&line("[Tue Mar 12 20:40:00 2024] You have gained an ability point!"));
        let event = t.process(&line("[Tue Mar 12 21:00:00 2024] You have gained an ability point!"));

        let Some(AbilityEvent::PointGained(rate)) = event else {
            panic!("expected a rate report, got {:?}", event);
        };
        assert_eq!(rate.total, 3);
        assert_eq!(rate.hours_in_zone, 1.0);
        assert_eq!(rate.per_hour, 3.0);
        assert_eq!(rate.minutes_since_last, 20.0);
    }

    #[test]
    fn test_first_gain_measured_from_zone_entry() {
        let mut t = tracker();
        t.process(&line("[Tue Mar 12 20:00:00 2024] You have entered East Commonlands."));
        let event = t.process(&line("[Tue Mar 12 20:15:00 2024] You have gained an ability point!"));

        let Some(AbilityEvent::PointGained(rate)) = event else {
            panic!("expected a rate report");
        };
        assert_eq!(rate.minutes_since_last, 15.0);
        assert_eq!(rate.per_hour, 4.0);
    }

    #[test]
    fn test_zero_elapsed_suppresses_report() {
        let mut t = tracker();
        t.process(&line("[Tue Mar 12 20:00:00 2024] You have entered East Commonlands."));
        let event = t.process(&line("[Tue Mar 12 20:00:00 2024] You have gained an ability point!"));

        assert_eq!(event, None);
        assert_eq!(t.gained(), 1);
    }

    #[test]
    fn test_negative_elapsed_suppresses_report() {
        // Replayed backlog precedes the tracker start time used as zone entry
        let mut t = tracker();
        let event = t.process(&line("[Tue Mar 12 18:00:00 2024] You have gained an ability point!"));
        assert_eq!(event, None);
        assert_eq!(t.gained(), 1);
    }

    #[test]
    fn test_display() {
        let event = AbilityEvent::PointGained(AbilityRate {
            total: 3,
            per_hour: 3.0,
            hours_in_zone: 1.0,
            minutes_since_last: 20.0,
        });
        assert_eq!(
            event.to_string(),
            "Total AA gained: 3 / per hour: 3.00, Time in zone: 1.00 hours, last AA ding: 20.00 minutes"
        );
        let zone = AbilityEvent::ZoneEntered {
            zone: "Befallen".to_string(),
        };
        assert_eq!(zone.to_string(), "You have entered Befallen");
    }

    #[test]
    fn test_unrelated_lines_are_ignored() {
        let mut t = tracker();
        assert_eq!(
            t.process(&line("[Tue Mar 12 20:00:00 2024] A gnoll hits YOU for 5 points of damage.")),
            None
        );
        assert_eq!(t.gained(), 0);
    }
}
