use chrono::NaiveDateTime;

/// Replay/live state of the stream. Only ever moves from replay to live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveState {
    /// Lines stamped at or before `until` are historical backlog.
    Replaying { until: NaiveDateTime },
    Live,
}

impl LiveState {
    pub fn replaying(until: NaiveDateTime) -> Self {
        Self::Replaying { until }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live)
    }

    /// Feed a line timestamp. Returns true if this call flipped the state to live.
    pub fn observe(&mut self, timestamp: NaiveDateTime) -> bool {
        match *self {
            Self::Replaying { until } if timestamp > until => {
                *self = Self::Live;
                true
            }
            _ => false,
        }
    }
}
