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

//! Remembers which concrete asset name answered a localized request.

use parking_lot::RwLock;
use quarry_core::asset::path::normalize_key;
use std::collections::HashMap;

/// Maps a requested (unlocalized) asset name to the name that actually
/// resolved, e.g. `Data/mail` to `Data/mail.pt-BR` or back to itself.
///
/// Lookups are case-insensitive. A name is recorded at most once until the map
/// is cleared.
#[derive(Default)]
pub struct LocalizedNameMap {
    names: RwLock<HashMap<String, String>>,
}

impl LocalizedNameMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// The name that resolved for `requested`, if known.
    pub fn get(&self, requested: &str) -> Option<String> {
        self.names.read().get(&normalize_key(requested)).cloned()
    }

    /// Records that `requested` resolved to `resolved`. An existing mapping is kept.
    pub fn record(&self, requested: &str, resolved: &str) {
        self.names
            .write()
            .entry(normalize_key(requested))
            .or_insert_with(|| resolved.to_string());
    }

    /// Forgets the mapping for `requested`.
    pub fn forget(&self, requested: &str) -> bool {
        self.names.write().remove(&normalize_key(requested)).is_some()
    }

    /// Forgets every mapping.
    pub fn clear(&self) {
        self.names.write().clear();
    }

    /// Number of recorded mappings.
    pub fn len(&self) -> usize {
        self.names.read().len()
    }

    /// Returns `true` if nothing is recorded.
    pub fn is_empty(&self) -> bool {
        self.names.read().is_empty()
    }
}
