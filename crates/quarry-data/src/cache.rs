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

//! A case-insensitive, normalized-key store of loaded content.

use parking_lot::RwLock;
use quarry_core::asset::{
    path::{normalize_asset_name, normalize_key},
    SharedAsset,
};
use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    sync::atomic::{AtomicU64, Ordering},
};

static NEXT_CACHE_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static REMOVING: RefCell<HashSet<u64>> = RefCell::new(HashSet::new());
}

/// Marks a cache as being swept by [`ContentCache::remove`] on this thread.
struct RemovalGuard(u64);

impl RemovalGuard {
    fn enter(cache_id: u64) -> Option<Self> {
        REMOVING
            .with(|removing| removing.borrow_mut().insert(cache_id))
            .then(|| RemovalGuard(cache_id))
    }
}

impl Drop for RemovalGuard {
    fn drop(&mut self) {
        REMOVING.with(|removing| {
            removing.borrow_mut().remove(&self.0);
        });
    }
}

struct CacheEntry {
    raw_key: String,
    value: SharedAsset,
}

/// A central, in-memory cache of loaded content for one content manager.
///
/// Keys are normalized (separators unified, surrounding whitespace and
/// separators trimmed) and compared case-insensitively, so `Data\Fish` and
/// `data/fish/` address the same entry.
pub struct ContentCache {
    id: u64,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl Default for ContentCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentCache {
    /// Creates a new, empty cache.
    pub fn new() -> Self {
        Self {
            id: NEXT_CACHE_ID.fetch_add(1, Ordering::Relaxed),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Normalizes a key the way the cache does, keeping its case.
    pub fn normalize_key(key: &str) -> String {
        normalize_asset_name(key)
    }

    /// Returns the value cached under `key`.
    pub fn get(&self, key: &str) -> Option<SharedAsset> {
        self.entries
            .read()
            .get(&normalize_key(key))
            .map(|entry| entry.value.clone())
    }

    /// Whether a value is cached under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.read().contains_key(&normalize_key(key))
    }

    /// Caches `value` under `key`, replacing any previous value.
    pub fn insert(&self, key: &str, value: SharedAsset) {
        let entry = CacheEntry {
            raw_key: normalize_asset_name(key),
            value,
        };
        self.entries.write().insert(normalize_key(key), entry);
    }

    /// The normalized keys currently cached, in their stored casing.
    pub fn keys(&self) -> Vec<String> {
        self.entries
            .read()
            .values()
            .map(|entry| entry.raw_key.clone())
            .collect()
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Removes the entry under `key`, disposing its value if asked.
    pub fn remove_key(&self, key: &str, dispose: bool) -> Option<SharedAsset> {
        let removed = self.entries.write().remove(&normalize_key(key))?;
        if dispose {
            removed.value.dispose();
        }
        Some(removed.value)
    }

    /// Removes every entry matching `predicate` and returns the removed
    /// `(key, value)` pairs.
    ///
    /// The predicate runs once per entry present when the sweep starts, without
    /// any lock held. An entry replaced while the predicate ran is kept. A
    /// sweep started from inside a predicate of a sweep over the same cache is
    /// ignored.
    pub fn remove<F>(&self, mut predicate: F, dispose: bool) -> Vec<(String, SharedAsset)>
    where
        F: FnMut(&str, &SharedAsset) -> bool,
    {
        let Some(_guard) = RemovalGuard::enter(self.id) else {
            log::warn!(
                target: "quarry::content",
                "Ignored a nested removal pass on a content cache."
            );
            return Vec::new();
        };

        let snapshot: Vec<(String, String, SharedAsset)> = self
            .entries
            .read()
            .iter()
            .map(|(key, entry)| (key.clone(), entry.raw_key.clone(), entry.value.clone()))
            .collect();

        let matched: Vec<(String, String, SharedAsset)> = snapshot
            .into_iter()
            .filter(|(_, raw_key, value)| predicate(raw_key.as_str(), value))
            .collect();

        if matched.is_empty() {
            return Vec::new();
        }

        let mut removed = Vec::with_capacity(matched.len());
        {
            let mut entries = self.entries.write();
            for (key, raw_key, value) in matched {
                let unchanged = entries
                    .get(&key)
                    .is_some_and(|entry| entry.value.ptr_eq(&value));
                if unchanged {
                    entries.remove(&key);
                    removed.push((raw_key, value));
                }
            }
        }

        if dispose {
            for (_, value) in &removed {
                value.dispose();
            }
        }
        removed
    }

    /// Removes every entry, disposing values if asked. Returns how many were removed.
    pub fn clear(&self, dispose: bool) -> usize {
        let drained: Vec<CacheEntry> = self.entries.write().drain().map(|(_, entry)| entry).collect();
        if dispose {
            for entry in &drained {
                entry.value.dispose();
            }
        }
        drained.len()
    }
}
