//! Line dispatch
//!
//! The dispatcher owns the [`LineSource`], stamps each line with its parsed
//! timestamp and the current [`LiveState`], and hands it to every handler in
//! registration order. Handlers are fixed when the dispatcher is built, so the
//! set cannot change while lines are flowing.

use chrono::{Local, NaiveDateTime};
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};

use super::{DispatchContext, LineHandler, LiveState};
use crate::combat_log::{LineSource, StartPosition, parse_line};

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("failed reading log file")]
    Read(#[source] std::io::Error),

    #[error("dispatcher task failed")]
    Join(#[source] tokio::task::JoinError),
}

/// Counters reported when the dispatcher stops.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub lines_read: u64,
    pub lines_dispatched: u64,
    pub lines_dropped: u64,
    /// Timestamp of the line that moved the stream from replay to live.
    pub went_live_at: Option<NaiveDateTime>,
}

/// Fans parsed lines out to handlers while tracking live state.
pub struct LineFanout {
    live: LiveState,
    handlers: Vec<Box<dyn LineHandler>>,
    stats: DispatchStats,
}

impl LineFanout {
    pub fn new(live: LiveState, handlers: Vec<Box<dyn LineHandler>>) -> Self {
        Self {
            live,
            handlers,
            stats: DispatchStats::default(),
        }
    }

    pub fn is_live(&self) -> bool {
        self.live.is_live()
    }

    pub fn stats(&self) -> &DispatchStats {
        &self.stats
    }

    /// Parse and broadcast one raw line. Returns false if the line was dropped.
    pub fn dispatch(&mut self, raw: &str) -> bool {
        self.stats.lines_read += 1;

        let Some(line) = parse_line(raw) else {
            trace!(line = raw, "dropping line without timestamp");
            self.stats.lines_dropped += 1;
            return false;
        };

        if self.live.observe(line.timestamp) {
            info!(timestamp = %line.timestamp, "caught up with live log data");
            self.stats.went_live_at = Some(line.timestamp);
        }

        let ctx = DispatchContext::new(self.live.is_live());
        for handler in &mut self.handlers {
            handler.handle_line(&line, &ctx);
        }
        self.stats.lines_dispatched += 1;
        true
    }
}

pub struct EventDispatcherBuilder {
    source: LineSource,
    started_at: NaiveDateTime,
    handlers: Vec<Box<dyn LineHandler>>,
}

impl EventDispatcherBuilder {
    /// Override the reference time that separates backlog from live lines.
    pub fn started_at(mut self, started_at: NaiveDateTime) -> Self {
        self.started_at = started_at;
        self
    }

    pub fn handler(mut self, handler: impl LineHandler + 'static) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    pub fn boxed_handler(mut self, handler: Box<dyn LineHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn build(self) -> EventDispatcher {
        let live = match self.source.start_position() {
            StartPosition::Beginning => LiveState::replaying(self.started_at),
            StartPosition::End => LiveState::Live,
        };
        EventDispatcher {
            source: self.source,
            fanout: LineFanout::new(live, self.handlers),
        }
    }
}

pub struct EventDispatcher {
    source: LineSource,
    fanout: LineFanout,
}

impl EventDispatcher {
    /// Start building a dispatcher over `source`. The replay cutoff defaults to now.
    pub fn builder(source: LineSource) -> EventDispatcherBuilder {
        EventDispatcherBuilder {
            source,
            started_at: Local::now().naive_local(),
            handlers: Vec::new(),
        }
    }

    pub fn is_live(&self) -> bool {
        self.fanout.is_live()
    }

    pub fn stats(&self) -> &DispatchStats {
        self.fanout.stats()
    }

    /// Drain every complete line currently in the file without waiting for more.
    pub async fn dispatch_available(&mut self) -> Result<u64, DispatchError> {
        let mut count = 0;
        while let Some(raw) = self.source.try_next_line().await.map_err(DispatchError::Read)? {
            self.fanout.dispatch(&raw);
            count += 1;
        }
        Ok(count)
    }

    /// Follow the file until `shutdown` flips to true or its sender is dropped.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> Result<DispatchStats, DispatchError> {
        match self.source.start_position() {
            StartPosition::Beginning => println!("Starting at beginning of file"),
            StartPosition::End => println!("Starting at end of file"),
        }
        debug!(path = %self.source.path().display(), "dispatcher running");

        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                line = self.source.next_line() => {
                    let raw = line.map_err(DispatchError::Read)?;
                    self.fanout.dispatch(&raw);
                }
            }
        }

        let stats = self.fanout.stats().clone();
        info!(
            lines_read = stats.lines_read,
            lines_dispatched = stats.lines_dispatched,
            lines_dropped = stats.lines_dropped,
            "dispatcher stopped"
        );
        Ok(stats)
    }

    /// Spawn the poll loop on a background task and return immediately.
    pub fn start(self) -> DispatcherHandle {
        let (shutdown, rx) = watch::channel(false);
        let task = tokio::spawn(self.run(rx));
        DispatcherHandle { shutdown, task }
    }
}

/// Handle to a running dispatcher task.
pub struct DispatcherHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<Result<DispatchStats, DispatchError>>,
}

impl DispatcherHandle {
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the task to end on its own (read failure or panic).
    pub async fn wait(&mut self) -> Result<DispatchStats, DispatchError> {
        (&mut self.task).await.map_err(DispatchError::Join)?
    }

    /// Ask the task to stop and wait for it.
    pub async fn stop(self) -> Result<DispatchStats, DispatchError> {
        // The receiver is gone only if the task already finished
        let _ = self.shutdown.send(true);
        self.task.await.map_err(DispatchError::Join)?
    }
}
