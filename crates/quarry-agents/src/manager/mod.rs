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

//! Content managers: per-manager caches and the load paths behind them.
//!
//! Game managers run every load through the operation lane; mod managers read
//! their owner's private files directly and never localize.

mod localized;
mod reentry;

use self::reentry::LoadingGuard;
use crate::{coordinator::ContentCoordinator, metrics::bump};
use log::Level;
use parking_lot::Mutex;
use quarry_core::{
    asset::{Asset, AssetBox, AssetInfo, AssetName, AssetType, SharedAsset, WeakAsset},
    error::{ContentError, ContentResult},
    host::RawStore,
    monitor::Monitor,
};
use quarry_data::ContentCache;
use quarry_lanes::LoaderSelection;
use std::{
    collections::HashSet,
    fmt,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Weak,
    },
};

static NEXT_MANAGER_ID: AtomicU64 = AtomicU64::new(1);

/// What a content manager loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManagerKind {
    /// Game content, with mod loaders and editors applied.
    Game,
    /// Game content reloaded to refresh live world references.
    Propagation,
    /// An owner's private files, addressed through managed keys.
    Mod {
        /// The owner's display name.
        display_name: String,
    },
}

impl ManagerKind {
    /// Whether this manager loads game content through the operation lane.
    pub fn is_game(&self) -> bool {
        matches!(self, ManagerKind::Game | ManagerKind::Propagation)
    }
}

/// A cache of loaded content plus the logic to fill it.
pub struct ContentManager {
    id: u64,
    name: String,
    kind: ManagerKind,
    cache: ContentCache,
    raw_store: Arc<dyn RawStore>,
    coordinator: Weak<ContentCoordinator>,
    monitor: Arc<dyn Monitor>,
    aggressive_memory_optimizations: bool,
    uncached: Mutex<Vec<WeakAsset>>,
    disposed: AtomicBool,
}

impl fmt::Debug for ContentManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentManager")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("cached", &self.cache.len())
            .finish_non_exhaustive()
    }
}

impl ContentManager {
    pub(crate) fn new(
        name: impl Into<String>,
        kind: ManagerKind,
        raw_store: Arc<dyn RawStore>,
        coordinator: Weak<ContentCoordinator>,
        monitor: Arc<dyn Monitor>,
        aggressive_memory_optimizations: bool,
    ) -> Self {
        Self {
            id: NEXT_MANAGER_ID.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
            kind,
            cache: ContentCache::new(),
            raw_store,
            coordinator,
            monitor,
            aggressive_memory_optimizations,
            uncached: Mutex::new(Vec::new()),
            disposed: AtomicBool::new(false),
        }
    }

    /// A process-unique id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The manager name. Mod managers are named after their managed prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// What this manager loads.
    pub fn kind(&self) -> &ManagerKind {
        &self.kind
    }

    /// Whether this manager serves an owner's private namespace.
    pub fn is_namespaced(&self) -> bool {
        matches!(self.kind, ManagerKind::Mod { .. })
    }

    /// Whether asset names are parsed for locale suffixes and localized on load.
    pub fn try_localize_keys(&self) -> bool {
        !self.is_namespaced()
    }

    /// Whether [`ContentManager::dispose`] was called.
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Loads `key` in the current language, caching the result.
    ///
    /// A key with an explicit locale suffix loads exactly that variant.
    pub fn load<T: Asset>(&self, key: &str) -> ContentResult<Arc<T>> {
        let coordinator = self.coordinator()?;
        let name = coordinator.parse_asset_name(key, self.try_localize_keys())?;
        if name.locale_code().is_some() {
            return self.load_exact(&name, true);
        }
        self.load_localized(&name, coordinator.language(), true)
    }

    /// Loads exactly `name`, without trying localized variants.
    pub fn load_exact<T: Asset>(&self, name: &AssetName, use_cache: bool) -> ContentResult<Arc<T>> {
        let value = self.load_exact_shared(name, AssetType::of::<T>(), use_cache)?;
        downcast(name, value)
    }

    pub(crate) fn load_exact_shared(
        &self,
        name: &AssetName,
        asset_type: AssetType,
        use_cache: bool,
    ) -> ContentResult<SharedAsset> {
        self.assert_not_disposed()?;
        let coordinator = self.coordinator()?;
        if self.kind.is_game() {
            coordinator.notify_loading_first_asset();
        }

        if use_cache {
            if let Some(value) = self.cache.get(name.name()) {
                bump(&coordinator.metrics().cache_hits, 1);
                return check_type(name, value, asset_type);
            }
        }

        if !self.kind.is_game() {
            let value = self.read_raw(name, asset_type)?.into_shared();
            self.track_asset(name, &value, use_cache);
            return Ok(value);
        }

        if let Some(key) = coordinator.try_parse_managed_asset_key(name.name()) {
            let value = coordinator.load_managed_asset_shared(&key, asset_type)?;
            self.track_asset(name, &value, use_cache);
            return Ok(value);
        }

        let Some(_guard) = LoadingGuard::enter(self.id, name) else {
            self.monitor
                .log(Level::Warn, &format!("Broke loop while loading asset '{name}'."));
            self.monitor.log(
                Level::Trace,
                "Bypassing mod loaders and editors for this asset.",
            );
            bump(&coordinator.metrics().broken_loops, 1);
            let value = self.read_raw(name, asset_type)?.into_shared();
            self.track_asset(name, &value, use_cache);
            return Ok(value);
        };

        let info = AssetInfo::new(name.clone(), asset_type);
        let groups = coordinator.get_asset_operations(&info);
        let outcome = coordinator
            .lane()
            .run(&info, &groups, || self.read_raw(name, asset_type))?;
        coordinator.metrics().record_lane(&outcome.report);

        let value = outcome.value.into_shared();
        self.track_asset(name, &value, use_cache);
        coordinator.events().asset_loaded(&self.name, name);
        Ok(value)
    }

    /// Whether `name` can be loaded as a `T` by this manager.
    pub fn does_asset_exist<T: Asset>(&self, name: &AssetName) -> ContentResult<bool> {
        self.assert_not_disposed()?;
        if self.cache.contains_key(name.name()) || self.raw_store.exists(name) {
            return Ok(true);
        }
        if !self.kind.is_game() {
            return Ok(false);
        }

        let coordinator = self.coordinator()?;
        if let Some(key) = coordinator.try_parse_managed_asset_key(name.name()) {
            return coordinator.does_managed_asset_exist::<T>(&key);
        }

        let info = AssetInfo::new(name.clone(), AssetType::of::<T>());
        let groups = coordinator.get_asset_operations(&info);
        Ok(matches!(
            coordinator.lane().select_loader(&info, &groups),
            LoaderSelection::Selected(_)
        ))
    }

    /// Whether `name` is in this manager's cache.
    pub fn is_loaded(&self, name: &AssetName) -> bool {
        self.cache.contains_key(name.name())
    }

    /// The cached value for `key`, if any.
    pub fn loaded_value(&self, key: &str) -> Option<SharedAsset> {
        self.cache.get(key)
    }

    /// The cached keys, in stored casing.
    pub fn cached_keys(&self) -> Vec<String> {
        self.cache.keys()
    }

    /// Evicts every cached asset whose base name matches `predicate`, along
    /// with every other locale of the same base name.
    ///
    /// Returns the base name and value of each removed entry.
    pub fn invalidate_cache<F>(
        &self,
        mut predicate: F,
        dispose: bool,
    ) -> ContentResult<Vec<(AssetName, SharedAsset)>>
    where
        F: FnMut(&AssetName, AssetType) -> bool,
    {
        let coordinator = self.coordinator()?;
        let mut matched: HashSet<AssetName> = HashSet::new();

        let removed = self.cache.remove(
            |key, value| {
                let base = self.base_name_of(&coordinator, key);
                if matched.contains(&base) {
                    return true;
                }
                if predicate(&base, value.asset_type()) {
                    matched.insert(base);
                    return true;
                }
                false
            },
            dispose || self.aggressive_memory_optimizations,
        );

        Ok(removed
            .into_iter()
            .map(|(key, value)| (self.base_name_of(&coordinator, &key), value))
            .collect())
    }

    /// Releases every cached and tracked value and unregisters the manager.
    /// Later loads fail with [`ContentError::ManagerDisposed`].
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }

        let cached = self.cache.clear(true);
        let uncached = std::mem::take(&mut *self.uncached.lock());
        for value in uncached.iter().filter_map(WeakAsset::upgrade) {
            value.dispose();
        }

        self.monitor.log(
            Level::Trace,
            &format!("Disposed content manager '{}' ({cached} cached assets).", self.name),
        );

        if let Some(coordinator) = self.coordinator.upgrade() {
            coordinator.on_manager_disposed(self.id);
        }
    }

    fn coordinator(&self) -> ContentResult<Arc<ContentCoordinator>> {
        self.coordinator
            .upgrade()
            .ok_or(ContentError::CoordinatorDisposed)
    }

    fn assert_not_disposed(&self) -> ContentResult<()> {
        if self.is_disposed() {
            return Err(ContentError::ManagerDisposed(self.name.clone()));
        }
        Ok(())
    }

    /// The name predicates see for a cached key: every variant of an asset
    /// shares one base name.
    fn base_name_of(&self, coordinator: &ContentCoordinator, key: &str) -> AssetName {
        let parsed = if self.try_localize_keys() {
            coordinator.unlocalized_name(key)
        } else {
            coordinator.parse_asset_name(key, false)
        };
        parsed.unwrap_or_else(|_| AssetName::new(key, None, None))
    }

    fn read_raw(&self, name: &AssetName, asset_type: AssetType) -> ContentResult<AssetBox> {
        let value = self.raw_store.load(name, asset_type)?;
        if value.asset_type() != asset_type {
            return Err(ContentError::TypeMismatch {
                name: name.to_string(),
                expected: asset_type.name(),
                actual: value.asset_type().name(),
            });
        }
        Ok(value)
    }

    fn track_asset(&self, name: &AssetName, value: &SharedAsset, use_cache: bool) {
        if use_cache {
            self.cache.insert(name.name(), value.clone());
            return;
        }
        let mut uncached = self.uncached.lock();
        uncached.retain(|weak| !weak.is_dead());
        uncached.push(value.downgrade());
    }
}

fn check_type(
    name: &AssetName,
    value: SharedAsset,
    asset_type: AssetType,
) -> ContentResult<SharedAsset> {
    if value.asset_type() != asset_type {
        return Err(ContentError::TypeMismatch {
            name: name.to_string(),
            expected: asset_type.name(),
            actual: value.asset_type().name(),
        });
    }
    Ok(value)
}

fn downcast<T: Asset>(name: &AssetName, value: SharedAsset) -> ContentResult<Arc<T>> {
    value.downcast::<T>().ok_or_else(|| ContentError::TypeMismatch {
        name: name.to_string(),
        expected: std::any::type_name::<T>(),
        actual: value.asset_type().name(),
    })
}
