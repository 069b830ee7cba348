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

//! Shared fixtures for the coordinator integration tests.

#![allow(dead_code)]

use parking_lot::{Mutex, RwLock};
use quarry_agents::ContentCoordinator;
use quarry_core::{
    asset::{path::normalize_key, Asset, AssetBox, AssetInfo, AssetName, AssetType},
    config::ContentConfig,
    error::{ContentError, ContentResult},
    host::{
        AssetPropagator, ContentEvents, GenerationCounter, LiveReference, OperationProvider,
        PropagationResult, RawStore,
    },
    operation::{AssetOperationGroup, Owner},
};
use quarry_telemetry::RecordingMonitor;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

type Factory = Arc<dyn Fn() -> AssetBox + Send + Sync>;

/// An in-memory raw store that records every load request.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Factory>>,
    requests: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn insert<T: Asset + Clone>(&self, name: &str, value: T) {
        self.entries
            .write()
            .insert(normalize_key(name), Arc::new(move || AssetBox::new(value.clone())));
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    pub fn clear_requests(&self) {
        self.requests.lock().clear();
    }
}

impl RawStore for MemoryStore {
    fn load(&self, name: &AssetName, _asset_type: AssetType) -> ContentResult<AssetBox> {
        self.requests.lock().push(name.name().to_string());
        let factory = self
            .entries
            .read()
            .get(&normalize_key(name.name()))
            .cloned()
            .ok_or_else(|| ContentError::NotFound(name.to_string()))?;
        Ok(factory())
    }

    fn exists(&self, name: &AssetName) -> bool {
        self.entries.read().contains_key(&normalize_key(name.name()))
    }
}

/// Operation groups registered per asset name, with a lookup counter.
#[derive(Default)]
pub struct TestOperations {
    entries: RwLock<Vec<(String, AssetOperationGroup)>>,
    lookups: AtomicUsize,
}

impl TestOperations {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add(&self, name: &str, group: AssetOperationGroup) {
        self.entries.write().push((normalize_key(name), group));
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl OperationProvider for TestOperations {
    fn asset_operations(&self, info: &AssetInfo) -> Vec<AssetOperationGroup> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let key = normalize_key(info.name.name());
        self.entries
            .read()
            .iter()
            .filter(|(name, _)| *name == key)
            .map(|(_, group)| group.clone())
            .collect()
    }
}

/// Records every coordinator event.
#[derive(Default)]
pub struct RecordingEvents {
    pub first_loads: AtomicUsize,
    pub loaded: Mutex<Vec<(String, String)>>,
    pub invalidated: Mutex<Vec<Vec<String>>>,
}

impl ContentEvents for RecordingEvents {
    fn loading_first_asset(&self) {
        self.first_loads.fetch_add(1, Ordering::SeqCst);
    }

    fn asset_loaded(&self, manager: &str, name: &AssetName) {
        self.loaded
            .lock()
            .push((manager.to_string(), name.name().to_string()));
    }

    fn assets_invalidated(&self, names: &[AssetName]) {
        self.invalidated
            .lock()
            .push(names.iter().map(|name| name.name().to_string()).collect());
    }
}

/// A propagator that reloads a fixed set of names and reports live references.
#[derive(Default)]
pub struct TestPropagator {
    pub reloadable: RwLock<Vec<String>>,
    pub live: RwLock<Vec<LiveReference>>,
    pub updates_pathfinding: bool,
    pub calls: Mutex<Vec<HashMap<String, AssetType>>>,
}

impl AssetPropagator for TestPropagator {
    fn propagate(&self, assets: &HashMap<AssetName, AssetType>) -> PropagationResult {
        self.calls.lock().push(
            assets
                .iter()
                .map(|(name, asset_type)| (name.name().to_string(), *asset_type))
                .collect(),
        );
        let reloadable = self.reloadable.read();
        let propagated = assets
            .keys()
            .map(|name| {
                let reloaded = reloadable
                    .iter()
                    .any(|candidate| name.is_equivalent_to(candidate, true));
                (name.clone(), reloaded)
            })
            .collect();
        PropagationResult {
            propagated,
            updated_pathfinding: self.updates_pathfinding,
        }
    }

    fn live_references(&self) -> Vec<LiveReference> {
        self.live.read().clone()
    }
}

/// A fully wired coordinator with handles to every test collaborator.
pub struct Harness {
    pub coordinator: Arc<ContentCoordinator>,
    pub store: Arc<MemoryStore>,
    pub operations: Arc<TestOperations>,
    pub events: Arc<RecordingEvents>,
    pub propagator: Arc<TestPropagator>,
    pub generation: Arc<GenerationCounter>,
    pub monitor: Arc<RecordingMonitor>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with(ContentConfig::default(), TestPropagator::default())
    }

    pub fn with(config: ContentConfig, propagator: TestPropagator) -> Self {
        let store = MemoryStore::new();
        let operations = TestOperations::new();
        let events = Arc::new(RecordingEvents::default());
        let propagator = Arc::new(propagator);
        let generation = Arc::new(GenerationCounter::new());
        let monitor = Arc::new(RecordingMonitor::new());

        let coordinator = ContentCoordinator::builder(store.clone())
            .config(config)
            .operations(operations.clone())
            .events(events.clone())
            .propagator(propagator.clone())
            .generation(generation.clone())
            .monitor(monitor.clone())
            .build();

        Self {
            coordinator,
            store,
            operations,
            events,
            propagator,
            generation,
            monitor,
        }
    }

    pub fn name(&self, raw: &str) -> AssetName {
        self.coordinator
            .parse_asset_name(raw, true)
            .expect("valid asset name")
    }
}

pub fn owner(id: &str) -> Owner {
    Owner::new(id, format!("Mod {id}"))
}

/// A value that counts how often it was disposed.
#[derive(Clone)]
pub struct Tracked {
    pub label: String,
    pub disposed: Arc<AtomicUsize>,
}

impl Asset for Tracked {
    fn dispose(&self) {
        self.disposed.fetch_add(1, Ordering::SeqCst);
    }
}
