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

//! Storage backends for metric values.

use super::{MetricId, MetricsError, MetricsResult};
use parking_lot::RwLock;
use std::{collections::BTreeMap, fmt::Debug};

/// Storage for counter values.
pub trait MetricsBackend: Send + Sync + Debug + 'static {
    /// Registers a counter, keeping its value if it already exists.
    fn register_counter(&self, id: &MetricId, description: &str);

    /// Adds `delta` to a counter and returns the new value.
    fn increment_counter(&self, id: &MetricId, delta: u64) -> MetricsResult<u64>;

    /// Reads a counter.
    fn counter(&self, id: &MetricId) -> MetricsResult<u64>;

    /// The description a counter was registered with.
    fn description(&self, id: &MetricId) -> Option<String>;

    /// Every counter with its current value, ordered by id.
    fn snapshot(&self) -> Vec<(MetricId, u64)>;
}

#[derive(Debug)]
struct CounterSlot {
    description: String,
    value: u64,
}

/// A thread-safe in-memory backend.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    counters: RwLock<BTreeMap<MetricId, CounterSlot>>,
}

impl InMemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetricsBackend for InMemoryBackend {
    fn register_counter(&self, id: &MetricId, description: &str) {
        self.counters
            .write()
            .entry(id.clone())
            .or_insert_with(|| CounterSlot {
                description: description.to_string(),
                value: 0,
            });
    }

    fn increment_counter(&self, id: &MetricId, delta: u64) -> MetricsResult<u64> {
        let mut counters = self.counters.write();
        let slot = counters
            .get_mut(id)
            .ok_or_else(|| MetricsError::NotFound(id.clone()))?;
        slot.value = slot.value.saturating_add(delta);
        Ok(slot.value)
    }

    fn counter(&self, id: &MetricId) -> MetricsResult<u64> {
        self.counters
            .read()
            .get(id)
            .map(|slot| slot.value)
            .ok_or_else(|| MetricsError::NotFound(id.clone()))
    }

    fn description(&self, id: &MetricId) -> Option<String> {
        self.counters
            .read()
            .get(id)
            .map(|slot| slot.description.clone())
    }

    fn snapshot(&self) -> Vec<(MetricId, u64)> {
        self.counters
            .read()
            .iter()
            .map(|(id, slot)| (id.clone(), slot.value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_is_idempotent() {
        let backend = InMemoryBackend::new();
        let id = MetricId::new("content", "loads");
        backend.register_counter(&id, "loads");
        backend.increment_counter(&id, 3).unwrap();
        backend.register_counter(&id, "loads again");
        assert_eq!(backend.counter(&id), Ok(3));
        assert_eq!(backend.description(&id).as_deref(), Some("loads"));
    }

    #[test]
    fn test_unknown_counter() {
        let backend = InMemoryBackend::new();
        let id = MetricId::new("content", "missing");
        assert_eq!(backend.increment_counter(&id, 1), Err(MetricsError::NotFound(id.clone())));
        assert!(backend.snapshot().is_empty());
    }
}
