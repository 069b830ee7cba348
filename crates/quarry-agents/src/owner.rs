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

//! Content access on behalf of a single owner.

use crate::{coordinator::ContentCoordinator, manager::ContentManager};
use log::Level;
use quarry_core::{
    asset::{
        path::{has_invalid_characters, is_rooted, segments},
        Asset, AssetName, AssetType,
    },
    error::{ContentError, ContentResult},
    host::RawStore,
    operation::Owner,
};
use std::sync::Arc;

/// Where an owner's asset key points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSource {
    /// The game's content, with mod operations applied.
    GameContent,
    /// The owner's own folder.
    ModFolder,
}

/// An owner's view of the content system: its private folder plus uncached
/// access to game content.
pub struct OwnerContent {
    owner: Owner,
    coordinator: Arc<ContentCoordinator>,
    game_content: Arc<ContentManager>,
    mod_content: Arc<ContentManager>,
    managed_prefix: String,
}

impl OwnerContent {
    /// Creates the owner's game and mod content managers. `mod_store` reads the
    /// owner's folder.
    pub fn new(
        coordinator: &Arc<ContentCoordinator>,
        owner: Owner,
        mod_store: Arc<dyn RawStore>,
    ) -> ContentResult<Self> {
        let managed_prefix = coordinator.get_managed_asset_prefix(owner.id());
        let game_content =
            coordinator.create_game_content_manager(format!("{managed_prefix}.content"))?;
        let mod_content = coordinator.create_mod_content_manager(
            managed_prefix.clone(),
            owner.display_name(),
            mod_store,
        )?;

        Ok(Self {
            owner,
            coordinator: coordinator.clone(),
            game_content,
            mod_content,
            managed_prefix,
        })
    }

    /// The owner.
    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    /// The owner's managed prefix.
    pub fn managed_prefix(&self) -> &str {
        &self.managed_prefix
    }

    /// Loads `key` from the given source. Game content is loaded in the current
    /// language; nothing is cached by the owner's managers.
    pub fn load<T: Asset>(&self, key: &str, source: ContentSource) -> ContentResult<Arc<T>> {
        assert_valid_key(key)?;
        match source {
            ContentSource::GameContent => {
                let name = self.coordinator.parse_asset_name(key, true)?;
                self.game_content
                    .load_localized::<T>(&name, self.coordinator.language(), false)
            }
            ContentSource::ModFolder => {
                let name = self.coordinator.parse_asset_name(key, false)?;
                self.mod_content.load_exact::<T>(&name, false)
            }
        }
    }

    /// The key under which the asset can be loaded through any game content
    /// manager: the normalized key for game content, or the managed key for
    /// the owner's folder.
    pub fn actual_asset_key(&self, key: &str, source: ContentSource) -> ContentResult<String> {
        assert_valid_key(key)?;
        match source {
            ContentSource::GameContent => {
                Ok(self.coordinator.parse_asset_name(key, true)?.name().to_string())
            }
            ContentSource::ModFolder => {
                let name = self.coordinator.parse_asset_name(key, false)?;
                Ok(format!("{}/{}", self.managed_prefix, name.name()))
            }
        }
    }

    /// Invalidates every cached copy of `key`, in any locale. Returns whether anything was evicted.
    pub fn invalidate_key(&self, key: &str) -> ContentResult<bool> {
        let target = self.coordinator.unlocalized_name(key)?;
        self.log_request(&format!("Requested cache invalidation for '{target}'."));
        let removed = self
            .coordinator
            .invalidate_cache(|name, _| *name == target, false)?;
        Ok(!removed.is_empty())
    }

    /// Invalidates every cached asset of type `T`.
    pub fn invalidate_type<T: Asset>(&self) -> ContentResult<bool> {
        self.log_request(&format!(
            "Requested cache invalidation for all assets of type {}.",
            std::any::type_name::<T>()
        ));
        let removed = self
            .coordinator
            .invalidate_cache(|_, asset_type| asset_type.is::<T>(), false)?;
        Ok(!removed.is_empty())
    }

    /// Invalidates every cached asset matching `predicate`.
    pub fn invalidate_where<F>(&self, predicate: F) -> ContentResult<bool>
    where
        F: Fn(&AssetName, AssetType) -> bool,
    {
        self.log_request("Requested cache invalidation for all assets matching a predicate.");
        let removed = self.coordinator.invalidate_cache(predicate, false)?;
        Ok(!removed.is_empty())
    }

    /// Disposes both of the owner's managers.
    pub fn dispose(&self) {
        self.game_content.dispose();
        self.mod_content.dispose();
    }

    fn log_request(&self, message: &str) {
        self.coordinator
            .monitor()
            .log_as(&self.owner, Level::Trace, message);
    }
}

fn assert_valid_key(key: &str) -> ContentResult<()> {
    if key.trim().is_empty() {
        return Err(ContentError::EmptyName);
    }
    if has_invalid_characters(key) {
        return Err(ContentError::InvalidCharacters(key.to_string()));
    }
    if is_rooted(key) {
        return Err(ContentError::AbsolutePath(key.to_string()));
    }
    if segments(key, usize::MAX).contains(&"..") {
        return Err(ContentError::PathEscapesRoot(key.to_string()));
    }
    Ok(())
}
