//! Shared shell state.
//!
//! One `ShellState` lives for the whole session, wrapped in an `Arc` and
//! handed to the bridge, the session client, and the shell itself. The
//! registry is deliberately not in here: it is owned by the bootstrap
//! sequence and becomes immutable once composed.

use parking_lot::{Mutex, RwLock};
use url::Url;

use crate::app_logger::{LOG_RING_CAPACITY, LogEntry, LogLevel, LogRingBuffer};
use crate::config::ShellConfig;

#[derive(Debug)]
pub struct ShellState {
    pub config: RwLock<ShellConfig>,
    /// Bearer token forwarded from the host context. `None` until the
    /// asynchronous token fetch resolves; requests sent before that
    /// simply carry no credentials.
    auth_token: RwLock<Option<String>>,
    /// API base origin, set exactly once at bridge mount. There is no
    /// support for switching environments mid-session.
    base_origin: RwLock<Option<Url>>,
    log_buffer: Mutex<LogRingBuffer>,
    /// Correlation id for this bootstrap, included in diagnostics.
    pub session_id: String,
}

impl ShellState {
    pub fn new(config: ShellConfig) -> Self {
        Self {
            config: RwLock::new(config),
            auth_token: RwLock::new(None),
            base_origin: RwLock::new(None),
            log_buffer: Mutex::new(LogRingBuffer::new(LOG_RING_CAPACITY)),
            session_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Record a structured entry in the session log store.
    pub fn log(&self, level: LogLevel, source: &str, message: impl Into<String>) {
        self.log_buffer.lock().push(level, source, message.into());
    }

    /// Snapshot of the session log, oldest first (0 = all entries).
    pub fn log_entries(&self, limit: usize) -> Vec<LogEntry> {
        self.log_buffer.lock().entries(limit)
    }

    pub fn bearer_token(&self) -> Option<String> {
        self.auth_token.read().clone()
    }

    pub fn set_bearer_token(&self, token: String) {
        *self.auth_token.write() = Some(token);
    }

    /// Set the base origin for the session. Returns `false` (and leaves
    /// the existing value in place) if it was already set.
    pub fn set_base_origin(&self, origin: Url) -> bool {
        let mut guard = self.base_origin.write();
        if guard.is_some() {
            return false;
        }
        *guard = Some(origin);
        true
    }

    pub fn base_origin(&self) -> Option<Url> {
        self.base_origin.read().clone()
    }
}
