use std::time::Instant;

use crate::combat_log::LogLine;

/// Per-line facts supplied by the dispatcher alongside each line.
#[derive(Debug, Clone, Copy)]
pub struct DispatchContext {
    /// Whether the stream has crossed from historical replay into live data.
    pub is_live: bool,
    /// Wall-clock instant the line was dispatched.
    pub observed_at: Instant,
}

impl DispatchContext {
    pub fn new(is_live: bool) -> Self {
        Self {
            is_live,
            observed_at: Instant::now(),
        }
    }
}

/// A consumer of timestamped log lines.
///
/// Handlers run sequentially on the dispatcher task, so they must not block.
pub trait LineHandler: Send {
    fn handle_line(&mut self, line: &LogLine, ctx: &DispatchContext);
}

/// Adapts a closure into a [`LineHandler`].
pub struct LineFn<F>(pub F);

impl<F> LineHandler for LineFn<F>
where
    F: FnMut(&LogLine, &DispatchContext) + Send,
{
    fn handle_line(&mut self, line: &LogLine, ctx: &DispatchContext) {
        (self.0)(line, ctx)
    }
}
