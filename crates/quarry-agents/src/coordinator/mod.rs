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

//! The content coordinator.
//!
//! The coordinator owns every content manager and the state they share: the
//! locale table, the current language, the localized-name map and the
//! per-generation memo of operation lookups.

mod builder;
mod invalidation;
mod managed;

pub use builder::ContentCoordinatorBuilder;
pub use invalidation::InvalidationReport;
pub use managed::ManagedAssetKey;

use crate::{
    manager::{ContentManager, ManagerKind},
    metrics::ContentMetrics,
};
use arc_swap::ArcSwap;
use log::Level;
use parking_lot::RwLock;
use quarry_core::{
    asset::{AssetInfo, AssetName, AssetType, SharedAsset},
    config::ContentConfig,
    error::{ContentError, ContentResult},
    host::{
        AssetPropagator, ContentEvents, GenerationSource, LocaleProvider, OperationProvider,
        RawStore,
    },
    locale::{LanguageCode, LocaleTable},
    monitor::Monitor,
    operation::AssetOperationGroup,
    Asset,
};
use quarry_data::{LocalizedNameMap, TickCache};
use quarry_lanes::OperationLane;
use std::{
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Weak,
    },
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct OperationKey {
    name: AssetName,
    data_type: AssetType,
}

#[derive(Debug, Clone, Default)]
struct CurrentLanguage {
    code: LanguageCode,
    mod_locale: Option<String>,
}

/// Coordinates content managers, routing and cache invalidation.
pub struct ContentCoordinator {
    config: ContentConfig,
    self_ref: Weak<ContentCoordinator>,
    raw_store: Arc<dyn RawStore>,
    operations: Arc<dyn OperationProvider>,
    locales: Arc<dyn LocaleProvider>,
    propagator: Arc<dyn AssetPropagator>,
    events: Arc<dyn ContentEvents>,
    generation: Arc<dyn GenerationSource>,
    monitor: Arc<dyn Monitor>,
    lane: OperationLane,
    metrics: ContentMetrics,
    managers: RwLock<Vec<Arc<ContentManager>>>,
    main_manager: Arc<ContentManager>,
    propagation_manager: Arc<ContentManager>,
    locale_table: ArcSwap<LocaleTable>,
    operation_cache: TickCache<OperationKey, Arc<[AssetOperationGroup]>>,
    localized_names: LocalizedNameMap,
    language: RwLock<CurrentLanguage>,
    loading_first_asset_raised: AtomicBool,
    disposed: AtomicBool,
}

impl fmt::Debug for ContentCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentCoordinator")
            .field("managers", &self.managers.read().len())
            .field("language", &self.language.read().code)
            .field("disposed", &self.is_disposed())
            .finish_non_exhaustive()
    }
}

impl ContentCoordinator {
    /// Starts building a coordinator over the game's raw content store.
    pub fn builder(raw_store: Arc<dyn RawStore>) -> ContentCoordinatorBuilder {
        ContentCoordinatorBuilder::new(raw_store)
    }

    /// The configuration this coordinator was built with.
    pub fn config(&self) -> &ContentConfig {
        &self.config
    }

    /// The metric handles updated by this coordinator.
    pub fn metrics(&self) -> &ContentMetrics {
        &self.metrics
    }

    /// The main game content manager.
    pub fn main_content_manager(&self) -> &Arc<ContentManager> {
        &self.main_manager
    }

    /// The manager used to reload assets into live world references.
    pub fn propagation_content_manager(&self) -> &Arc<ContentManager> {
        &self.propagation_manager
    }

    /// Whether [`ContentCoordinator::dispose`] was called.
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    // Managers

    /// Creates and registers a game content manager.
    pub fn create_game_content_manager(
        &self,
        name: impl Into<String>,
    ) -> ContentResult<Arc<ContentManager>> {
        let manager = self.new_manager(name.into(), ManagerKind::Game, self.raw_store.clone());
        self.register(manager)
    }

    /// Creates and registers the private content manager of an owner.
    ///
    /// `name` should be the owner's managed prefix, see
    /// [`ContentCoordinator::get_managed_asset_prefix`].
    pub fn create_mod_content_manager(
        &self,
        name: impl Into<String>,
        display_name: impl Into<String>,
        raw_store: Arc<dyn RawStore>,
    ) -> ContentResult<Arc<ContentManager>> {
        let kind = ManagerKind::Mod {
            display_name: display_name.into(),
        };
        let manager = self.new_manager(name.into(), kind, raw_store);
        self.register(manager)
    }

    /// A snapshot of the registered managers.
    pub fn managers(&self) -> Vec<Arc<ContentManager>> {
        self.managers.read().clone()
    }

    /// Finds a registered manager by name (case-insensitive).
    pub fn find_manager(&self, name: &str) -> Option<Arc<ContentManager>> {
        self.managers
            .read()
            .iter()
            .find(|manager| manager.name().eq_ignore_ascii_case(name))
            .cloned()
    }

    pub(crate) fn on_manager_disposed(&self, manager_id: u64) {
        if self.is_disposed() {
            return;
        }
        self.managers
            .write()
            .retain(|manager| manager.id() != manager_id);
    }

    fn new_manager(
        &self,
        name: String,
        kind: ManagerKind,
        raw_store: Arc<dyn RawStore>,
    ) -> ContentManager {
        ContentManager::new(
            name,
            kind,
            raw_store,
            self.self_ref.clone(),
            self.monitor.clone(),
            self.config.aggressive_memory_optimizations,
        )
    }

    fn register(&self, manager: ContentManager) -> ContentResult<Arc<ContentManager>> {
        self.assert_not_disposed()?;
        let manager = Arc::new(manager);
        self.managers.write().push(manager.clone());
        self.monitor.log(
            Level::Trace,
            &format!("Created content manager '{}'.", manager.name()),
        );
        Ok(manager)
    }

    fn assert_not_disposed(&self) -> ContentResult<()> {
        if self.is_disposed() {
            return Err(ContentError::CoordinatorDisposed);
        }
        Ok(())
    }

    // Names and locales

    /// Parses a raw asset name. With `allow_locales`, a recognized locale suffix
    /// is split off.
    pub fn parse_asset_name(&self, raw: &str, allow_locales: bool) -> ContentResult<AssetName> {
        let table = self.locale_table.load();
        AssetName::parse(raw, |code| {
            if allow_locales {
                table.resolve(code)
            } else {
                None
            }
        })
    }

    /// Rebuilds the locale table from the host's current custom locales.
    pub fn refresh_locales(&self) {
        let table = LocaleTable::with_custom(self.locales.custom_locale_codes());
        self.monitor.log(
            Level::Trace,
            &format!("Rebuilt locale table ({} locales).", table.len()),
        );
        self.locale_table.store(Arc::new(table));
    }

    /// The current language.
    pub fn language(&self) -> LanguageCode {
        self.language.read().code
    }

    /// Switches the current language. `mod_locale` is the locale code used when
    /// `language` is [`LanguageCode::Mod`].
    pub fn set_language(&self, language: LanguageCode, mod_locale: Option<&str>) {
        let next = CurrentLanguage {
            code: language,
            mod_locale: mod_locale.map(str::to_owned),
        };
        let changed = {
            let mut current = self.language.write();
            let changed = current.code != next.code || current.mod_locale != next.mod_locale;
            *current = next;
            changed
        };
        if changed {
            self.localized_names.clear();
            self.monitor
                .log(Level::Debug, &format!("Content language set to '{language:?}'."));
        }
    }

    /// The locale suffix for `language`, or `None` for the base language.
    pub fn locale_code(&self, language: LanguageCode) -> Option<String> {
        match language {
            LanguageCode::Mod => self.language.read().mod_locale.clone(),
            other => other.builtin_locale().map(str::to_owned),
        }
    }

    /// The locale suffix of the current language, or an empty string for the base language.
    pub fn current_locale(&self) -> String {
        self.locale_code(self.language()).unwrap_or_default()
    }

    pub(crate) fn localized_names(&self) -> &LocalizedNameMap {
        &self.localized_names
    }

    // Loading

    /// Whether `name` can be loaded as a `T` through the main content manager.
    pub fn does_asset_exist<T: Asset>(&self, name: &AssetName) -> ContentResult<bool> {
        self.main_manager.does_asset_exist::<T>(name)
    }

    /// The operations registered for an asset, memoized for the current generation.
    pub fn get_asset_operations(&self, info: &AssetInfo) -> Arc<[AssetOperationGroup]> {
        let key = OperationKey {
            name: info.name.clone(),
            data_type: info.data_type,
        };
        self.operation_cache.get_or_insert_with(
            self.generation.current_generation(),
            &key,
            || self.operations.asset_operations(info).into(),
        )
    }

    /// The values cached for `key` by every game content manager.
    pub fn loaded_values(&self, key: &str) -> Vec<SharedAsset> {
        self.managers()
            .iter()
            .filter(|manager| !manager.is_namespaced())
            .filter_map(|manager| manager.loaded_value(key))
            .collect()
    }

    pub(crate) fn lane(&self) -> &OperationLane {
        &self.lane
    }

    pub(crate) fn monitor(&self) -> &dyn Monitor {
        self.monitor.as_ref()
    }

    pub(crate) fn events(&self) -> &dyn ContentEvents {
        self.events.as_ref()
    }

    pub(crate) fn notify_loading_first_asset(&self) {
        if !self.loading_first_asset_raised.swap(true, Ordering::AcqRel) {
            self.events.loading_first_asset();
        }
    }

    // Lifecycle

    /// Resets per-session state when the host returns to its title screen.
    ///
    /// Localized name mappings are forgotten; outside the base language, game
    /// content caches are also invalidated so assets reload in the right locale.
    pub fn on_returning_to_title_screen(&self) -> ContentResult<()> {
        self.localized_names.clear();
        if self.language().is_base() {
            return Ok(());
        }
        self.invalidate_cache_where(|manager, _, _| manager.kind().is_game(), false)?;
        Ok(())
    }

    /// Disposes every manager. Later calls on the coordinator fail with
    /// [`ContentError::CoordinatorDisposed`].
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        let managers = std::mem::take(&mut *self.managers.write());
        for manager in managers {
            manager.dispose();
        }
        self.operation_cache.clear();
        self.localized_names.clear();
        self.monitor.log(Level::Trace, "Disposed content coordinator.");
    }
}
