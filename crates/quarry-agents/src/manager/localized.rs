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

//! Localized loads.
//!
//! For a non-base language the manager tries, in order, `<base>.<locale>`,
//! `<base><international suffix>` and finally `<base>` itself. The name that
//! answered is remembered so later loads go straight to it.

use super::{downcast, ContentManager};
use quarry_core::{
    asset::{Asset, AssetName, AssetType, SharedAsset},
    error::ContentResult,
    locale::LanguageCode,
};
use std::sync::Arc;

impl ContentManager {
    /// Loads the variant of `name` matching `language`, falling back to the
    /// unlocalized asset.
    pub fn load_localized<T: Asset>(
        &self,
        name: &AssetName,
        language: LanguageCode,
        use_cache: bool,
    ) -> ContentResult<Arc<T>> {
        let value = self.load_localized_shared(name, language, AssetType::of::<T>(), use_cache)?;
        downcast(name, value)
    }

    pub(crate) fn load_localized_shared(
        &self,
        name: &AssetName,
        language: LanguageCode,
        asset_type: AssetType,
        use_cache: bool,
    ) -> ContentResult<SharedAsset> {
        let coordinator = self.coordinator()?;
        if !self.try_localize_keys() || language.is_base() || name.locale_code().is_some() {
            return self.load_exact_shared(name, asset_type, use_cache);
        }
        let Some(locale) = coordinator.locale_code(language) else {
            return self.load_exact_shared(name, asset_type, use_cache);
        };

        let localized_names = coordinator.localized_names();
        if let Some(resolved) = localized_names.get(name.name()) {
            let target = coordinator.parse_asset_name(&resolved, true)?;
            return self.load_exact_shared(&target, asset_type, use_cache);
        }

        let candidates = [
            AssetName::new(name.base_name(), Some(locale), Some(language)),
            AssetName::new(
                format!("{}{}", name.base_name(), coordinator.config().international_suffix),
                None,
                None,
            ),
        ];
        for candidate in &candidates {
            if let Some(value) = self.try_load_variant(candidate, asset_type, use_cache)? {
                localized_names.record(name.name(), candidate.name());
                return Ok(value);
            }
        }

        localized_names.record(name.name(), name.name());
        self.load_exact_shared(name, asset_type, use_cache)
    }

    /// Loads a localized variant, mapping "doesn't exist" to `None`.
    fn try_load_variant(
        &self,
        name: &AssetName,
        asset_type: AssetType,
        use_cache: bool,
    ) -> ContentResult<Option<SharedAsset>> {
        match self.load_exact_shared(name, asset_type, use_cache) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.is_not_found() => Ok(None),
            Err(error) => Err(error),
        }
    }
}
