use std::fmt;

use chrono::NaiveDateTime;
use eqlog_types::formatting::{format_minutes, format_origin_breakdown, format_rate};

use super::Origin;

/// Running damage dealt by one source, split by origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DamageTotals {
    pub total: u64,
    pub melee: u64,
    pub direct: u64,
    pub dot: u64,
}

impl DamageTotals {
    pub fn add(&mut self, origin: Origin, amount: u64) {
        self.total += amount;
        match origin {
            Origin::Melee => self.melee += amount,
            Origin::Direct => self.direct += amount,
            Origin::Dot => self.dot += amount,
        }
    }
}

/// Damage one source dealt during the report window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceWindow {
    pub name: String,
    pub damage: u64,
    pub events: usize,
}

/// Damage one target took during the report window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetReceived {
    pub name: String,
    pub damage: u64,
}

/// Snapshot produced each time the pending window is flushed.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowReport {
    pub zone: String,
    pub window_start: NaiveDateTime,
    pub window_end: NaiveDateTime,
    /// Fixed divisor for the per-source window rate.
    pub window_secs: u64,
    pub zone_entered_at: NaiveDateTime,
    pub zone_elapsed_secs: f64,
    pub sources: Vec<SourceWindow>,
    pub received: Vec<TargetReceived>,
    pub zone_totals: Vec<(String, DamageTotals)>,
}

impl WindowReport {
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Rate over time spent in the zone, `None` when no time has elapsed.
    fn zone_rate(&self, damage: u64) -> Option<f64> {
        (self.zone_elapsed_secs > 0.0).then(|| damage as f64 / self.zone_elapsed_secs)
    }
}

impl fmt::Display for WindowReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let clock = |t: &NaiveDateTime| t.format("%H:%M:%S").to_string();
        let since = clock(&self.zone_entered_at);
        let minutes = format_minutes(self.zone_elapsed_secs.max(0.0));

        writeln!(
            f,
            "==DPS Report from {} to {} ({})==",
            clock(&self.window_start),
            clock(&self.window_end),
            self.sources.len()
        )?;
        if self.sources.is_empty() {
            writeln!(f, "No new DPS events")?;
        }
        for source in &self.sources {
            writeln!(
                f,
                "{}: {} dps, {} damage",
                source.name,
                format_rate(source.damage as f64 / self.window_secs.max(1) as f64),
                source.damage
            )?;
        }

        writeln!(
            f,
            "==Total Damage Received since {} ({} minutes, {} seconds)==",
            since,
            minutes,
            format_rate(self.zone_elapsed_secs.max(0.0))
        )?;
        for target in &self.received {
            if let Some(rate) = self.zone_rate(target.damage) {
                writeln!(
                    f,
                    "{}: {} dps, {} damage received",
                    target.name,
                    format_rate(rate),
                    target.damage
                )?;
            }
        }

        writeln!(
            f,
            "==Zone {} Damage Totals since {} ({} minutes)==",
            self.zone, since, minutes
        )?;
        for (name, totals) in &self.zone_totals {
            if let Some(rate) = self.zone_rate(totals.total) {
                writeln!(
                    f,
                    "{}: {} dps, {} damage ({})",
                    name,
                    format_rate(rate),
                    totals.total,
                    format_origin_breakdown(totals.melee, totals.direct, totals.dot)
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 12)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_totals_split_by_origin() {
        let mut totals = DamageTotals::default();
        totals.add(Origin::Melee, 10);
        totals.add(Origin::Dot, 5);
        totals.add(Origin::Melee, 3);
        assert_eq!(
            totals,
            DamageTotals {
                total: 18,
                melee: 13,
                direct: 0,
                dot: 5
            }
        );
    }

    #[test]
    fn test_render_full_report() {
        let report = WindowReport {
            zone: "East Commonlands".to_string(),
            window_start: at(20, 0, 0),
            window_end: at(20, 1, 0),
            window_secs: 60,
            zone_entered_at: at(19, 58, 0),
            zone_elapsed_secs: 180.0,
            sources: vec![SourceWindow {
                name: "Zinzarin".to_string(),
                damage: 600,
                events: 4,
            }],
            received: vec![TargetReceived {
                name: "a gnoll pup".to_string(),
                damage: 360,
            }],
            zone_totals: vec![(
                "Zinzarin".to_string(),
                DamageTotals {
                    total: 900,
                    melee: 600,
                    direct: 0,
                    dot: 300,
                },
            )],
        };

        let expected = "\
==DPS Report from 20:00:00 to 20:01:00 (1)==
Zinzarin: 10.00 dps, 600 damage
==Total Damage Received since 19:58:00 (3.00 minutes, 180.00 seconds)==
a gnoll pup: 2.00 dps, 360 damage received
==Zone East Commonlands Damage Totals since 19:58:00 (3.00 minutes)==
Zinzarin: 5.00 dps, 900 damage (67% melee, 33% dot)
";
        assert_eq!(report.to_string(), expected);
    }

    #[test]
    fn test_render_empty_window_without_elapsed_time() {
        let report = WindowReport {
            zone: "Befallen".to_string(),
            window_start: at(20, 0, 0),
            window_end: at(20, 0, 0),
            window_secs: 60,
            zone_entered_at: at(20, 0, 0),
            zone_elapsed_secs: 0.0,
            sources: vec![],
            received: vec![],
            zone_totals: vec![("Zinzarin".to_string(), DamageTotals::default())],
        };

        let rendered = report.to_string();
        assert!(report.is_empty());
        assert!(rendered.contains("No new DPS events\n"));
        // No rate can be computed with zero time in zone
        assert!(!rendered.contains("Zinzarin:"));
    }
}
