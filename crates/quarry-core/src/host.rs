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

//! Contracts implemented by the host application.
//!
//! The coordinator never touches disk, mods or world state directly; it asks
//! these collaborators instead.

use crate::{
    asset::{AssetBox, AssetInfo, AssetName, AssetType},
    error::ContentResult,
    operation::AssetOperationGroup,
};
use std::{
    collections::HashMap,
    sync::atomic::{AtomicU64, Ordering},
};

/// A source of raw asset values, e.g. packed game files or a mod folder.
pub trait RawStore: Send + Sync {
    /// Reads the asset `name` as `asset_type`.
    ///
    /// Must fail with [`ContentError::NotFound`](crate::ContentError::NotFound)
    /// when the asset doesn't exist, since localized lookups fall back on that
    /// error.
    fn load(&self, name: &AssetName, asset_type: AssetType) -> ContentResult<AssetBox>;

    /// Whether `name` exists in this store.
    fn exists(&self, name: &AssetName) -> bool;
}

/// Supplies the load and edit operations registered for an asset.
pub trait OperationProvider: Send + Sync {
    /// Returns the operation groups that apply to the asset, in owner registration order.
    fn asset_operations(&self, info: &AssetInfo) -> Vec<AssetOperationGroup>;
}

impl<F> OperationProvider for F
where
    F: Fn(&AssetInfo) -> Vec<AssetOperationGroup> + Send + Sync,
{
    fn asset_operations(&self, info: &AssetInfo) -> Vec<AssetOperationGroup> {
        self(info)
    }
}

/// An [`OperationProvider`] with no registered operations.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOperations;

impl OperationProvider for NoOperations {
    fn asset_operations(&self, _info: &AssetInfo) -> Vec<AssetOperationGroup> {
        Vec::new()
    }
}

/// Supplies the custom locales known to the host.
pub trait LocaleProvider: Send + Sync {
    /// The custom locale codes, e.g. `eo` for a fan translation.
    fn custom_locale_codes(&self) -> Vec<String>;
}

/// A [`LocaleProvider`] over a fixed list.
#[derive(Debug, Default, Clone)]
pub struct StaticLocales(pub Vec<String>);

impl LocaleProvider for StaticLocales {
    fn custom_locale_codes(&self) -> Vec<String> {
        self.0.clone()
    }
}

/// A monotonically increasing counter of host ticks.
pub trait GenerationSource: Send + Sync {
    /// The current generation.
    fn current_generation(&self) -> u64;
}

/// A [`GenerationSource`] advanced explicitly by the host loop.
#[derive(Debug, Default)]
pub struct GenerationCounter {
    generation: AtomicU64,
}

impl GenerationCounter {
    /// Creates a counter at generation zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves to the next generation and returns it.
    pub fn advance(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::AcqRel) + 1
    }
}

impl GenerationSource for GenerationCounter {
    fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}

/// Outcome of reloading world references to invalidated assets.
#[derive(Debug, Clone, Default)]
pub struct PropagationResult {
    /// For each invalidated name the propagator knows, whether it was reloaded.
    pub propagated: HashMap<AssetName, bool>,
    /// Whether derived pathfinding data was rebuilt.
    pub updated_pathfinding: bool,
}

/// A live world object holding an asset outside of any content cache.
#[derive(Debug, Clone)]
pub struct LiveReference {
    /// The asset name the object was loaded from.
    pub name: String,
    /// The runtime type of the value it holds.
    pub asset_type: AssetType,
}

/// Reloads world references after assets are invalidated.
pub trait AssetPropagator: Send + Sync {
    /// Reloads the given assets where they are in use.
    fn propagate(&self, assets: &HashMap<AssetName, AssetType>) -> PropagationResult;

    /// Assets held by live world objects, which are invalidated alongside cached
    /// ones even though no cache holds them.
    fn live_references(&self) -> Vec<LiveReference> {
        Vec::new()
    }
}

/// An [`AssetPropagator`] that knows no world state.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPropagation;

impl AssetPropagator for NoPropagation {
    fn propagate(&self, _assets: &HashMap<AssetName, AssetType>) -> PropagationResult {
        PropagationResult::default()
    }
}

/// Notifications raised by the coordinator.
pub trait ContentEvents: Send + Sync {
    /// Raised once, before a game content manager loads its first asset.
    fn loading_first_asset(&self) {}

    /// Raised after a content manager loaded an asset through the pipeline.
    fn asset_loaded(&self, _manager: &str, _name: &AssetName) {}

    /// Raised after assets were evicted, before world references are reloaded.
    fn assets_invalidated(&self, _names: &[AssetName]) {}
}

/// [`ContentEvents`] that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoEvents;

impl ContentEvents for NoEvents {}
