pub mod ability_tracker;

pub use ability_tracker::{AbilityEvent, AbilityRate, AbilityTracker};
