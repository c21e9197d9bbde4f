use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

static SESSION_ACTIVE: AtomicBool = AtomicBool::new(false);

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("tracker already exists")]
    AlreadyRunning,
}

/// Process-wide claim on the single tracking session.
///
/// Only one guard can be alive at a time; the slot frees up when it drops.
#[derive(Debug)]
pub struct SessionGuard {
    _private: (),
}

impl SessionGuard {
    pub fn acquire() -> Result<Self, SessionError> {
        SESSION_ACTIVE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SessionError::AlreadyRunning)?;
        Ok(Self { _private: () })
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        SESSION_ACTIVE.store(false, Ordering::Release);
    }
}

/// Serializes tests that hold the process-wide session.
#[cfg(test)]
pub(crate) async fn serial_session() -> tokio::sync::MutexGuard<'static, ()> {
    static SERIAL: tokio::sync::Mutex<()> = tokio::sync::Mutex::const_new(());
    SERIAL.lock().await
}
