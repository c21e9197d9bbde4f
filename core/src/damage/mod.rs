//! Combat damage: line classification, windowed aggregation and reporting.

mod aggregator;
mod classify;
mod report;

pub use aggregator::DamageAggregator;
pub use classify::{ATTACK_VERBS, DamageEvent, Origin, classify_damage, split_actor_phrase};
pub use report::{DamageTotals, SourceWindow, TargetReceived, WindowReport};
