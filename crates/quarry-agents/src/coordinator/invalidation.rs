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

//! Cache invalidation and propagation.

use super::ContentCoordinator;
use crate::{manager::ContentManager, metrics::bump};
use log::Level;
use quarry_core::{
    asset::{AssetName, AssetType},
    error::ContentResult,
};
use std::collections::{HashMap, HashSet};

/// The result of an invalidation pass.
#[derive(Debug, Clone, Default)]
pub struct InvalidationReport {
    /// Base names evicted from at least one cache or live reference.
    pub invalidated: Vec<AssetName>,
    /// Names the propagator reloaded, sorted.
    pub propagated: Vec<AssetName>,
    /// Whether derived pathfinding data was rebuilt.
    pub updated_pathfinding: bool,
    /// The summary line written to the monitor.
    pub summary: String,
}

impl InvalidationReport {
    /// Whether nothing matched.
    pub fn is_empty(&self) -> bool {
        self.invalidated.is_empty()
    }
}

fn sorted_names<'a>(names: impl Iterator<Item = &'a AssetName>) -> Vec<AssetName> {
    let mut names: Vec<AssetName> = names.cloned().collect();
    names.sort_by_cached_key(|name| name.name().to_lowercase());
    names
}

fn join_names(names: &[AssetName]) -> String {
    names
        .iter()
        .map(AssetName::name)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ContentCoordinator {
    /// Evicts every asset whose base name and type match `predicate` from all
    /// content managers, then reloads world references to them.
    ///
    /// Returns the invalidated base names; an empty list means nothing matched.
    pub fn invalidate_cache<F>(&self, predicate: F, dispose: bool) -> ContentResult<Vec<AssetName>>
    where
        F: Fn(&AssetName, AssetType) -> bool,
    {
        self.invalidate_cache_where(|_, name, asset_type| predicate(name, asset_type), dispose)
            .map(|report| report.invalidated)
    }

    /// Evicts every variant of `name`, in any locale and of any type.
    pub fn invalidate_asset(&self, name: &str) -> ContentResult<Vec<AssetName>> {
        let target = self.unlocalized_name(name)?;
        self.invalidate_cache(|candidate, _| *candidate == target, false)
    }

    /// Parses `name` and strips its locale and international suffix, giving
    /// the base name invalidation predicates are matched against.
    pub fn unlocalized_name(&self, name: &str) -> ContentResult<AssetName> {
        let parsed = self.parse_asset_name(name, true)?;
        Ok(parsed
            .without_locale(&self.config.international_suffix)
            .unwrap_or(parsed))
    }

    /// Like [`ContentCoordinator::invalidate_cache`], with the manager holding
    /// each entry passed to the predicate, and the full report returned.
    pub fn invalidate_cache_where<F>(
        &self,
        predicate: F,
        dispose: bool,
    ) -> ContentResult<InvalidationReport>
    where
        F: Fn(&ContentManager, &AssetName, AssetType) -> bool,
    {
        self.assert_not_disposed()?;

        let mut invalidated: Vec<(AssetName, AssetType)> = Vec::new();
        let mut seen: HashSet<AssetName> = HashSet::new();

        for manager in self.managers() {
            let removed = manager.invalidate_cache(
                |name, asset_type| predicate(manager.as_ref(), name, asset_type),
                dispose,
            )?;
            for (name, value) in removed {
                if seen.insert(name.clone()) {
                    invalidated.push((name, value.asset_type()));
                }
            }
        }

        for live in self.propagator.live_references() {
            let Ok(name) = self.unlocalized_name(&live.name) else {
                continue;
            };
            if seen.contains(&name) {
                continue;
            }
            if predicate(self.main_manager.as_ref(), &name, live.asset_type) {
                seen.insert(name.clone());
                invalidated.push((name, live.asset_type));
            }
        }

        if invalidated.is_empty() {
            let summary = "Invalidated 0 cache entries.".to_string();
            self.monitor.log(Level::Trace, &summary);
            return Ok(InvalidationReport {
                summary,
                ..InvalidationReport::default()
            });
        }

        let suffix = &self.config.international_suffix;
        self.operation_cache.retain(|key, _| {
            let base = key
                .name
                .without_locale(suffix)
                .unwrap_or_else(|| key.name.clone());
            !seen.contains(&base)
        });
        for name in &seen {
            self.localized_names.forget(name.name());
        }

        let names = sorted_names(invalidated.iter().map(|(name, _)| name));
        bump(&self.metrics.invalidated_assets, names.len() as u64);
        self.events.assets_invalidated(&names);

        let by_name: HashMap<AssetName, AssetType> = invalidated.into_iter().collect();
        let result = self.propagator.propagate(&by_name);
        let propagated = sorted_names(
            result
                .propagated
                .iter()
                .filter(|(_, reloaded)| **reloaded)
                .map(|(name, _)| name),
        );

        let mut summary = format!(
            "Invalidated {} asset names ({}).",
            names.len(),
            join_names(&names)
        );
        if propagated.is_empty() {
            summary.push_str(" Propagated 0 core assets.");
        } else {
            summary.push_str(&format!(
                " Propagated {} core assets ({}).",
                propagated.len(),
                join_names(&propagated)
            ));
        }
        if result.updated_pathfinding {
            summary.push_str(" Updated NPC pathfinding cache.");
        }
        self.monitor.log(Level::Trace, &summary);

        Ok(InvalidationReport {
            invalidated: names,
            propagated,
            updated_pathfinding: result.updated_pathfinding,
            summary,
        })
    }
}
