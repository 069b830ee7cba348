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

//! Detects an asset load that re-enters itself on the same thread.

use quarry_core::asset::AssetName;
use std::{cell::RefCell, collections::HashSet};

thread_local! {
    static ASSETS_BEING_LOADED: RefCell<HashSet<(u64, String)>> = RefCell::new(HashSet::new());
}

/// Marks an asset as being loaded by a manager until dropped.
pub(super) struct LoadingGuard {
    key: (u64, String),
}

impl LoadingGuard {
    /// Returns `None` if the same manager is already loading `name` on this thread.
    pub(super) fn enter(manager_id: u64, name: &AssetName) -> Option<Self> {
        let key = (manager_id, name.name().to_lowercase());
        let inserted = ASSETS_BEING_LOADED.with(|loading| loading.borrow_mut().insert(key.clone()));
        inserted.then(|| LoadingGuard { key })
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        ASSETS_BEING_LOADED.with(|loading| {
            loading.borrow_mut().remove(&self.key);
        });
    }
}
