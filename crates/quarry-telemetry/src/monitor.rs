// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! [`Monitor`] implementations.

use crate::logging::CONTENT_TARGET;
use log::Level;
use parking_lot::Mutex;
use quarry_core::{monitor::Monitor, operation::Owner};

/// Forwards content messages to the `log` facade under the `quarry::content` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMonitor;

impl Monitor for LogMonitor {
    fn log(&self, level: Level, message: &str) {
        log::log!(target: CONTENT_TARGET, level, "{message}");
    }

    fn log_as(&self, owner: &Owner, level: Level, message: &str) {
        log::log!(
            target: CONTENT_TARGET,
            level,
            "[{}] {message}",
            owner.display_name()
        );
    }
}

/// A single captured message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// The severity.
    pub level: Level,
    /// The formatted message, prefixed with `[owner]` for owner messages.
    pub message: String,
}

/// A [`Monitor`] that keeps every message in memory, for assertions.
#[derive(Debug, Default)]
pub struct RecordingMonitor {
    records: Mutex<Vec<LogRecord>>,
}

impl RecordingMonitor {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every message captured so far.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }

    /// Whether a message at `level` contains `needle`.
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.records
            .lock()
            .iter()
            .any(|record| record.level == level && record.message.contains(needle))
    }

    /// Number of messages at `level`.
    pub fn count(&self, level: Level) -> usize {
        self.records
            .lock()
            .iter()
            .filter(|record| record.level == level)
            .count()
    }

    /// Forgets every captured message.
    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl Monitor for RecordingMonitor {
    fn log(&self, level: Level, message: &str) {
        self.records.lock().push(LogRecord {
            level,
            message: message.to_string(),
        });
    }
}
