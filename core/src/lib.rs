pub mod combat_log;
pub mod context;
pub mod damage;
pub mod events;
pub mod handlers;

// Re-exports for convenience
pub use combat_log::{LineSource, LogLine, StartPosition};
pub use context::{SessionGuard, parse_log_filename};
pub use damage::DamageAggregator;
pub use events::{DispatchContext, EventDispatcher, LineHandler};
pub use handlers::AbilityTracker;
