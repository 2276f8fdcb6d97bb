//! In-session shell log store.
//!
//! A fixed-capacity ring buffer of structured entries covering the
//! bootstrap milestones (plugins loaded, environment resolved, gate
//! decision) and any composition or fetch problems. The console surfaces
//! these entries; they are the session's diagnostic record, separate from
//! the process-level `tracing` output.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// A single entry stored in the ring buffer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    pub timestamp_ms: i64,
    pub level: LogLevel,
    /// Originating shell area, e.g. `"plugins"`, `"router"`, `"bridge"`.
    pub source: String,
    pub message: String,
}

pub const LOG_RING_CAPACITY: usize = 512;

/// Fixed-capacity circular buffer. Oldest entries are overwritten once
/// the buffer is full; entry ids stay monotonic across wraps and clears.
#[derive(Debug)]
pub struct LogRingBuffer {
    entries: Vec<Option<LogEntry>>,
    capacity: usize,
    write_pos: usize,
    count: usize,
    next_id: u64,
}

impl LogRingBuffer {
    pub fn new(capacity: usize) -> Self {
        let mut entries = Vec::with_capacity(capacity);
        entries.resize_with(capacity, || None);
        Self {
            entries,
            capacity,
            write_pos: 0,
            count: 0,
            next_id: 1,
        }
    }

    /// Push a new entry. Returns the assigned entry id.
    pub fn push(&mut self, level: LogLevel, source: &str, message: String) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        self.entries[self.write_pos] = Some(LogEntry {
            id,
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
            level,
            source: source.to_string(),
            message,
        });
        self.write_pos = (self.write_pos + 1) % self.capacity;
        if self.count < self.capacity {
            self.count += 1;
        }

        id
    }

    /// Return entries oldest-first, up to `limit` most recent (0 = all).
    pub fn entries(&self, limit: usize) -> Vec<LogEntry> {
        if self.count == 0 {
            return Vec::new();
        }

        let effective = if limit == 0 {
            self.count
        } else {
            limit.min(self.count)
        };

        // When full, write_pos points at the oldest entry.
        let start = if self.count < self.capacity {
            0
        } else {
            self.write_pos
        };

        let skip = self.count - effective;
        let mut result = Vec::with_capacity(effective);
        for i in skip..self.count {
            let idx = (start + i) % self.capacity;
            if let Some(entry) = &self.entries[idx] {
                result.push(entry.clone());
            }
        }
        result
    }

    pub fn clear(&mut self) {
        for slot in self.entries.iter_mut() {
            *slot = None;
        }
        self.write_pos = 0;
        self.count = 0;
        // next_id stays monotonic
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
