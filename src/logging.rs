//! Domain log events and the sinks that receive them.
//!
//! The orchestrator journals events while it holds its lock and hands them
//! to the sink only after releasing it, so a slow sink never stalls an
//! operation's critical section.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use uuid::Uuid;

/// Default number of events a [`MemorySink`] retains.
pub const MEMORY_SINK_CAPACITY: usize = 500;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    /// An operator or user command was accepted.
    Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogSource {
    Mission,
    StateMachine,
    Navigation,
    Payload,
    Manual,
    System,
}

impl fmt::Display for LogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Mission => "MISSION",
            Self::StateMachine => "STATE_MACHINE",
            Self::Navigation => "NAVIGATION",
            Self::Payload => "PAYLOAD",
            Self::Manual => "MANUAL",
            Self::System => "SYSTEM",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    pub id: Uuid,
    pub level: LogLevel,
    pub message: String,
    pub source: LogSource,
    pub timestamp: DateTime<Utc>,
}

impl LogEvent {
    pub fn new(level: LogLevel, source: LogSource, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            level,
            message: message.into(),
            source,
            timestamp: Utc::now(),
        }
    }
}

/// Receiver of domain log events. Implementations must not block.
pub trait LogSink: Send + Sync {
    fn record(&self, event: LogEvent);
}

/// Forwards events to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn record(&self, event: LogEvent) {
        let source = event.source.to_string();
        match event.level {
            LogLevel::Info => tracing::info!(source = %source, "{}", event.message),
            LogLevel::Command => {
                tracing::info!(source = %source, level = "COMMAND", "{}", event.message)
            }
            LogLevel::Warn => tracing::warn!(source = %source, "{}", event.message),
            LogLevel::Error => tracing::error!(source = %source, "{}", event.message),
        }
    }
}

/// Keeps the most recent events in memory, newest first.
#[derive(Debug)]
pub struct MemorySink {
    events: Mutex<VecDeque<LogEvent>>,
    capacity: usize,
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new(MEMORY_SINK_CAPACITY)
    }
}

impl MemorySink {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }

    /// Snapshot of retained events, newest first.
    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    /// True if any retained event has `level` and contains `needle`.
    pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
        self.events
            .lock()
            .iter()
            .any(|e| e.level == level && e.message.contains(needle))
    }
}

impl LogSink for MemorySink {
    fn record(&self, event: LogEvent) {
        let mut events = self.events.lock();
        events.push_front(event);
        events.truncate(self.capacity);
    }
}
