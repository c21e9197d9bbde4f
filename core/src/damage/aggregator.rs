//! Windowed damage aggregation
//!
//! Damage events collect in a pending window keyed by source. The window is
//! flushed into a [`WindowReport`] once per report interval of wall-clock time
//! (and on every zone change), folding each event into the per-zone totals.
//! Nothing is collected until the stream is live, so replayed backlog does not
//! inflate the rates.

use std::time::{Duration, Instant};

use chrono::NaiveDateTime;
use eqlog_types::TrackerConfig;
use hashbrown::HashMap;
use tracing::debug;

use super::report::{DamageTotals, SourceWindow, TargetReceived, WindowReport};
use super::{DamageEvent, classify_damage};
use crate::combat_log::LogLine;
use crate::context::{ZoneInfo, parse_zone_entered};
use crate::events::{DispatchContext, LineHandler};

pub struct DamageAggregator {
    player: String,
    config: TrackerConfig,
    interval: Duration,
    zone: ZoneInfo,
    pending: HashMap<String, Vec<DamageEvent>>,
    zone_totals: HashMap<String, DamageTotals>,
    last_damage_at: Option<NaiveDateTime>,
    last_flush: Option<Instant>,
    window_start: NaiveDateTime,
}

impl DamageAggregator {
    /// `player` is the character "you" resolves to; `started_at` stands in as the
    /// zone entry time until a zone line is seen.
    pub fn new(player: impl Into<String>, config: &TrackerConfig, started_at: NaiveDateTime) -> Self {
        Self {
            player: player.into(),
            config: config.clone(),
            interval: Duration::from_secs(config.report_interval_secs()),
            zone: ZoneInfo::unknown(started_at),
            pending: HashMap::new(),
            zone_totals: HashMap::new(),
            last_damage_at: None,
            last_flush: None,
            window_start: started_at,
        }
    }

    pub fn zone(&self) -> &ZoneInfo {
        &self.zone
    }

    pub fn zone_totals(&self) -> &HashMap<String, DamageTotals> {
        &self.zone_totals
    }

    /// Number of events waiting for the next flush.
    pub fn pending_events(&self) -> usize {
        self.pending.values().map(Vec::len).sum()
    }

    pub fn last_damage_at(&self) -> Option<NaiveDateTime> {
        self.last_damage_at
    }

    /// Apply one line. Returns a report when this line caused a flush.
    pub fn process(&mut self, line: &LogLine, ctx: &DispatchContext) -> Option<WindowReport> {
        if let Some(zone) = parse_zone_entered(line.message()) {
            return self.enter_zone(zone, line.timestamp, ctx);
        }

        if !ctx.is_live {
            return None;
        }

        if let Some(event) = classify_damage(line, &self.player) {
            self.record(event);
        }

        self.poll_window(line.timestamp, ctx.observed_at)
    }

    /// Add an event to the pending window.
    pub fn record(&mut self, event: DamageEvent) {
        self.last_damage_at = Some(event.timestamp);
        self.pending
            .entry(event.source.clone())
            .or_default()
            .push(event);
    }

    fn enter_zone(&mut self, zone: &str, at: NaiveDateTime, ctx: &DispatchContext) -> Option<WindowReport> {
        if self.config.is_ignored_zone(zone) {
            return None;
        }

        let report = ctx.is_live.then(|| {
            self.last_flush = Some(ctx.observed_at);
            self.flush(at)
        });

        debug!(from = %self.zone.name, to = zone, "resetting zone damage totals");
        self.zone = ZoneInfo::new(zone, at);
        self.zone_totals.clear();
        report
    }

    /// Flush once the report interval has passed since the previous flush.
    /// The clock only starts running after the first damage event.
    fn poll_window(&mut self, at: NaiveDateTime, now: Instant) -> Option<WindowReport> {
        if self.last_damage_at.is_none() {
            self.last_flush = Some(now);
            return None;
        }

        let last = *self.last_flush.get_or_insert(now);
        if now.saturating_duration_since(last) <= self.interval {
            return None;
        }

        self.last_flush = Some(now);
        Some(self.flush(at))
    }

    /// Fold the pending window into the zone totals and describe it.
    pub fn flush(&mut self, at: NaiveDateTime) -> WindowReport {
        let mut sources = Vec::with_capacity(self.pending.len());
        let mut received: HashMap<String, u64> = HashMap::new();

        for (name, events) in self.pending.drain() {
            let mut damage = 0;
            for event in &events {
                damage += event.amount;
                *received.entry(event.target.clone()).or_default() += event.amount;
                self.zone_totals
                    .entry(event.source.clone())
                    .or_default()
                    .add(event.origin, event.amount);
            }
            sources.push(SourceWindow {
                name,
                damage,
                events: events.len(),
            });
        }

        sources.sort_by(|a, b| b.damage.cmp(&a.damage).then_with(|| a.name.cmp(&b.name)));

        let mut received: Vec<TargetReceived> = received
            .into_iter()
            .map(|(name, damage)| TargetReceived { name, damage })
            .collect();
        received.sort_by(|a, b| b.damage.cmp(&a.damage).then_with(|| a.name.cmp(&b.name)));

        let mut zone_totals: Vec<(String, DamageTotals)> = self
            .zone_totals
            .iter()
            .map(|(name, totals)| (name.clone(), *totals))
            .collect();
        zone_totals.sort_by(|a, b| b.1.total.cmp(&a.1.total).then_with(|| a.0.cmp(&b.0)));

        let report = WindowReport {
            zone: self.zone.name.clone(),
            window_start: self.window_start,
            window_end: at,
            window_secs: self.interval.as_secs(),
            zone_entered_at: self.zone.entered_at,
            zone_elapsed_secs: self.zone.elapsed_secs(at),
            sources,
            received,
            zone_totals,
        };
        self.window_start = at;
        report
    }
}

impl LineHandler for DamageAggregator {
    fn handle_line(&mut self, line: &LogLine, ctx: &DispatchContext) {
        if let Some(report) = self.process(line, ctx) {
            print!("{}", report);
        }
    }
}
