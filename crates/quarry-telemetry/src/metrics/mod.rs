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

//! Counters describing what the content system did.

mod backend;
mod registry;

pub use backend::{InMemoryBackend, MetricsBackend};
pub use registry::{CounterHandle, MetricsRegistry};

use std::fmt;
use thiserror::Error;

/// Identifies a metric by namespace and name, e.g. `content.cache_hits`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MetricId {
    /// The subsystem owning the metric.
    pub namespace: String,
    /// The metric name within its namespace.
    pub name: String,
}

impl MetricId {
    /// Creates a metric id.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}

/// Errors raised by the metrics layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetricsError {
    /// No metric is registered under the id.
    #[error("Metric '{0}' is not registered")]
    NotFound(MetricId),
}

/// A convenient result alias for metric operations.
pub type MetricsResult<T> = Result<T, MetricsError>;
