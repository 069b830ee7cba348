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

//! Managed asset keys: `<managed prefix>/<owner id>/<relative path>`.
//!
//! A managed key addresses a file in an owner's private folder. Game managers
//! hand such keys to the owner's mod content manager instead of the lane.

use super::ContentCoordinator;
use crate::manager::ContentManager;
use quarry_core::{
    asset::{path::segments, Asset, AssetName, AssetType, SharedAsset},
    error::{ContentError, ContentResult},
};
use std::sync::Arc;

/// A managed key split into its owner's manager name and the relative asset path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedAssetKey {
    /// `<managed prefix>/<owner id>`, the name of the owner's content manager.
    pub manager_id: String,
    /// The asset path inside the owner's folder.
    pub relative_name: AssetName,
}

impl ContentCoordinator {
    /// The managed prefix for an owner's private content, e.g. `Managed/some.mod`.
    ///
    /// Owner ids are lowercased so the prefix is stable across spellings.
    pub fn get_managed_asset_prefix(&self, owner_id: &str) -> String {
        format!("{}/{}", self.config.managed_prefix, owner_id.trim().to_lowercase())
    }

    /// Whether `name` starts with the managed prefix.
    pub fn is_managed_asset_key(&self, name: &AssetName) -> bool {
        let parts = segments(name.name(), 2);
        parts.len() == 2 && parts[0].eq_ignore_ascii_case(&self.config.managed_prefix)
    }

    /// Splits a managed key. Returns `None` unless the key has exactly the
    /// managed prefix, an owner id and a non-empty relative path.
    pub fn try_parse_managed_asset_key(&self, key: &str) -> Option<ManagedAssetKey> {
        let parts = segments(key, 3);
        if parts.len() != 3 || !parts[0].eq_ignore_ascii_case(&self.config.managed_prefix) {
            return None;
        }
        let relative_name = self.parse_asset_name(parts[2], false).ok()?;
        Some(ManagedAssetKey {
            manager_id: format!("{}/{}", parts[0], parts[1]),
            relative_name,
        })
    }

    /// Whether the owner behind `key` has the asset as a `T`.
    pub fn does_managed_asset_exist<T: Asset>(&self, key: &ManagedAssetKey) -> ContentResult<bool> {
        let manager = self.namespaced_manager(key)?;
        manager.does_asset_exist::<T>(&key.relative_name)
    }

    /// Loads an asset from the owner behind `key`. Managed loads are never cached
    /// by the owner's manager.
    pub fn load_managed_asset<T: Asset>(&self, key: &ManagedAssetKey) -> ContentResult<Arc<T>> {
        let manager = self.namespaced_manager(key)?;
        manager.load_exact::<T>(&key.relative_name, false)
    }

    pub(crate) fn load_managed_asset_shared(
        &self,
        key: &ManagedAssetKey,
        asset_type: AssetType,
    ) -> ContentResult<SharedAsset> {
        let manager = self.namespaced_manager(key)?;
        manager.load_exact_shared(&key.relative_name, asset_type, false)
    }

    fn namespaced_manager(&self, key: &ManagedAssetKey) -> ContentResult<Arc<ContentManager>> {
        self.managers
            .read()
            .iter()
            .find(|manager| {
                manager.is_namespaced() && manager.name().eq_ignore_ascii_case(&key.manager_id)
            })
            .cloned()
            .ok_or_else(|| ContentError::UnhandledManagedPrefix {
                prefix: key.manager_id.clone(),
                key: format!("{}/{}", key.manager_id, key.relative_name),
            })
    }
}
