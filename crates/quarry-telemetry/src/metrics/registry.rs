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

//! Registry for managing metrics.

use super::{
    backend::{InMemoryBackend, MetricsBackend},
    MetricId, MetricsResult,
};
use std::sync::Arc;

/// Central registry for content metrics.
///
/// Registration hands out cheap [`CounterHandle`]s that update the shared
/// backend directly.
#[derive(Debug, Clone)]
pub struct MetricsRegistry {
    backend: Arc<dyn MetricsBackend>,
}

impl MetricsRegistry {
    /// Creates a registry with the default in-memory backend.
    pub fn new() -> Self {
        Self {
            backend: Arc::new(InMemoryBackend::new()),
        }
    }

    /// Creates a registry over a custom backend.
    pub fn with_backend(backend: Arc<dyn MetricsBackend>) -> Self {
        Self { backend }
    }

    /// Registers a counter. Registering an existing counter returns a handle to it.
    pub fn register_counter(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> CounterHandle {
        let id = MetricId::new(namespace, name);
        self.backend.register_counter(&id, &description.into());
        CounterHandle {
            id,
            backend: self.backend.clone(),
        }
    }

    /// Reads a counter by id.
    pub fn counter(&self, id: &MetricId) -> MetricsResult<u64> {
        self.backend.counter(id)
    }

    /// The description a counter was registered with.
    pub fn describe(&self, id: &MetricId) -> Option<String> {
        self.backend.description(id)
    }

    /// Every counter with its current value, ordered by id.
    pub fn snapshot(&self) -> Vec<(MetricId, u64)> {
        self.backend.snapshot()
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle for efficient counter operations.
#[derive(Debug, Clone)]
pub struct CounterHandle {
    id: MetricId,
    backend: Arc<dyn MetricsBackend>,
}

impl CounterHandle {
    /// Increments the counter by 1.
    pub fn increment(&self) -> MetricsResult<u64> {
        self.backend.increment_counter(&self.id, 1)
    }

    /// Increments the counter by `amount`.
    pub fn increment_by(&self, amount: u64) -> MetricsResult<u64> {
        self.backend.increment_counter(&self.id, amount)
    }

    /// Reads the current value.
    pub fn get(&self) -> MetricsResult<u64> {
        self.backend.counter(&self.id)
    }

    /// The metric id.
    pub fn id(&self) -> &MetricId {
        &self.id
    }
}
