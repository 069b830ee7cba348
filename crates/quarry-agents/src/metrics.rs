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

//! Counters updated by the content managers.

use quarry_lanes::LaneReport;
use quarry_telemetry::{CounterHandle, MetricsRegistry};

const NAMESPACE: &str = "content";

/// The metric handles used by the coordinator and its managers.
#[derive(Debug, Clone)]
pub struct ContentMetrics {
    /// Loads answered from a manager's cache.
    pub cache_hits: CounterHandle,
    /// Loads that went through the operation lane.
    pub lane_runs: CounterHandle,
    /// Loads whose value came from a mod loader.
    pub mod_loads: CounterHandle,
    /// Assets for which several exclusive loaders competed.
    pub loader_conflicts: CounterHandle,
    /// Load or edit operations that failed or returned unusable values.
    pub operation_faults: CounterHandle,
    /// Re-entrant loads that bypassed the lane.
    pub broken_loops: CounterHandle,
    /// Asset names evicted by invalidation.
    pub invalidated_assets: CounterHandle,
}

impl ContentMetrics {
    /// Registers the content counters in `registry`.
    pub fn new(registry: &MetricsRegistry) -> Self {
        Self {
            cache_hits: registry.register_counter(
                NAMESPACE,
                "cache_hits",
                "Loads answered from a content manager's cache",
            ),
            lane_runs: registry.register_counter(
                NAMESPACE,
                "lane_runs",
                "Loads that applied mod operations",
            ),
            mod_loads: registry.register_counter(
                NAMESPACE,
                "mod_loads",
                "Loads whose value was provided by a mod loader",
            ),
            loader_conflicts: registry.register_counter(
                NAMESPACE,
                "loader_conflicts",
                "Assets claimed by several exclusive loaders",
            ),
            operation_faults: registry.register_counter(
                NAMESPACE,
                "operation_faults",
                "Mod operations that failed or returned unusable values",
            ),
            broken_loops: registry.register_counter(
                NAMESPACE,
                "broken_loops",
                "Re-entrant loads that bypassed mod operations",
            ),
            invalidated_assets: registry.register_counter(
                NAMESPACE,
                "invalidated_assets",
                "Asset names evicted by cache invalidation",
            ),
        }
    }

    pub(crate) fn record_lane(&self, report: &LaneReport) {
        bump(&self.lane_runs, 1);
        if report.loaded_by.is_some() {
            bump(&self.mod_loads, 1);
        }
        if report.loader_conflict {
            bump(&self.loader_conflicts, 1);
        }
        let faults = report.faults + report.edits_rejected;
        if faults > 0 {
            bump(&self.operation_faults, faults as u64);
        }
    }
}

pub(crate) fn bump(counter: &CounterHandle, amount: u64) {
    if let Err(error) = counter.increment_by(amount) {
        log::debug!("Failed to update metric '{}': {}", counter.id(), error);
    }
}
