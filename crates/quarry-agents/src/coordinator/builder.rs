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

//! Construction of a [`ContentCoordinator`].

use super::{ContentCoordinator, CurrentLanguage};
use crate::{
    manager::{ContentManager, ManagerKind},
    metrics::ContentMetrics,
};
use arc_swap::ArcSwap;
use parking_lot::RwLock;
use quarry_core::{
    config::ContentConfig,
    host::{
        AssetPropagator, ContentEvents, GenerationCounter, GenerationSource, LocaleProvider,
        NoEvents, NoOperations, NoPropagation, OperationProvider, RawStore, StaticLocales,
    },
    locale::LocaleTable,
    monitor::Monitor,
};
use quarry_data::{LocalizedNameMap, TickCache};
use quarry_lanes::OperationLane;
use quarry_telemetry::{LogMonitor, MetricsRegistry};
use std::sync::{atomic::AtomicBool, Arc};

/// Collects the collaborators of a [`ContentCoordinator`].
///
/// Only the raw store is required; every other collaborator defaults to a
/// no-op implementation and logging goes to the `log` facade.
pub struct ContentCoordinatorBuilder {
    config: ContentConfig,
    raw_store: Arc<dyn RawStore>,
    operations: Arc<dyn OperationProvider>,
    locales: Arc<dyn LocaleProvider>,
    propagator: Arc<dyn AssetPropagator>,
    events: Arc<dyn ContentEvents>,
    generation: Arc<dyn GenerationSource>,
    monitor: Arc<dyn Monitor>,
    metrics_registry: MetricsRegistry,
}

impl ContentCoordinatorBuilder {
    pub(super) fn new(raw_store: Arc<dyn RawStore>) -> Self {
        Self {
            config: ContentConfig::default(),
            raw_store,
            operations: Arc::new(NoOperations),
            locales: Arc::new(StaticLocales::default()),
            propagator: Arc::new(NoPropagation),
            events: Arc::new(NoEvents),
            generation: Arc::new(GenerationCounter::new()),
            monitor: Arc::new(LogMonitor),
            metrics_registry: MetricsRegistry::new(),
        }
    }

    /// Sets the configuration.
    pub fn config(mut self, config: ContentConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the source of mod load and edit operations.
    pub fn operations(mut self, operations: Arc<dyn OperationProvider>) -> Self {
        self.operations = operations;
        self
    }

    /// Sets the source of custom locales.
    pub fn locales(mut self, locales: Arc<dyn LocaleProvider>) -> Self {
        self.locales = locales;
        self
    }

    /// Sets the propagator reloading world references after invalidation.
    pub fn propagator(mut self, propagator: Arc<dyn AssetPropagator>) -> Self {
        self.propagator = propagator;
        self
    }

    /// Sets the event sink.
    pub fn events(mut self, events: Arc<dyn ContentEvents>) -> Self {
        self.events = events;
        self
    }

    /// Sets the generation source scoping the operation memo.
    pub fn generation(mut self, generation: Arc<dyn GenerationSource>) -> Self {
        self.generation = generation;
        self
    }

    /// Sets the log sink.
    pub fn monitor(mut self, monitor: Arc<dyn Monitor>) -> Self {
        self.monitor = monitor;
        self
    }

    /// Registers the content counters in `registry` instead of a private one.
    pub fn metrics_registry(mut self, registry: MetricsRegistry) -> Self {
        self.metrics_registry = registry;
        self
    }

    /// Builds the coordinator with its main and propagation managers registered.
    pub fn build(self) -> Arc<ContentCoordinator> {
        let Self {
            config,
            raw_store,
            operations,
            locales,
            propagator,
            events,
            generation,
            monitor,
            metrics_registry,
        } = self;

        let locale_table = LocaleTable::with_custom(locales.custom_locale_codes());
        let language = CurrentLanguage {
            code: config.default_language,
            mod_locale: None,
        };

        let coordinator = Arc::new_cyclic(|weak| {
            let manager = |name: &str, kind: ManagerKind| {
                Arc::new(ContentManager::new(
                    name,
                    kind,
                    raw_store.clone(),
                    weak.clone(),
                    monitor.clone(),
                    config.aggressive_memory_optimizations,
                ))
            };
            let main_manager = manager(&config.main_manager_name, ManagerKind::Game);
            let propagation_manager =
                manager(&config.propagation_manager_name, ManagerKind::Propagation);

            ContentCoordinator {
                self_ref: weak.clone(),
                managers: RwLock::new(vec![main_manager.clone(), propagation_manager.clone()]),
                main_manager,
                propagation_manager,
                raw_store: raw_store.clone(),
                operations,
                locales,
                propagator,
                events,
                generation,
                lane: OperationLane::new(monitor.clone()),
                metrics: ContentMetrics::new(&metrics_registry),
                monitor: monitor.clone(),
                locale_table: ArcSwap::from_pointee(locale_table),
                operation_cache: TickCache::new(),
                localized_names: LocalizedNameMap::new(),
                language: RwLock::new(language),
                loading_first_asset_raised: AtomicBool::new(false),
                disposed: AtomicBool::new(false),
                config: config.clone(),
            }
        });

        coordinator.monitor.log(
            log::Level::Trace,
            &format!(
                "Content coordinator ready (managed prefix '{}').",
                coordinator.config.managed_prefix
            ),
        );
        coordinator
    }
}
