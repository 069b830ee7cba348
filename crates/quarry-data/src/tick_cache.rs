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

//! A memo whose entries live for a single host generation.

use parking_lot::Mutex;
use std::{collections::HashMap, hash::Hash};

struct TickState<K, V> {
    generation: Option<u64>,
    entries: HashMap<K, V>,
}

/// A key/value memo cleared wholesale whenever the host generation changes.
///
/// The compute closure runs without the lock held, so it may itself use the
/// memo. When two callers race on the same key, the first value stored wins
/// and both receive it.
pub struct TickCache<K, V> {
    state: Mutex<TickState<K, V>>,
}

impl<K, V> Default for TickCache<K, V> {
    fn default() -> Self {
        Self {
            state: Mutex::new(TickState {
                generation: None,
                entries: HashMap::new(),
            }),
        }
    }
}

impl<K, V> TickCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates an empty memo.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value memoized for `key` in `generation`, computing it with `fetch` if needed.
    pub fn get_or_insert_with<F>(&self, generation: u64, key: &K, fetch: F) -> V
    where
        F: FnOnce() -> V,
    {
        {
            let mut state = self.state.lock();
            Self::roll(&mut state, generation);
            if let Some(value) = state.entries.get(key) {
                return value.clone();
            }
        }

        let value = fetch();

        let mut state = self.state.lock();
        Self::roll(&mut state, generation);
        state.entries.entry(key.clone()).or_insert(value).clone()
    }

    /// Forgets the value memoized for `key`.
    pub fn remove(&self, key: &K) -> bool {
        self.state.lock().entries.remove(key).is_some()
    }

    /// Keeps only the entries matching `keep`. Returns how many were dropped.
    pub fn retain<F>(&self, mut keep: F) -> usize
    where
        F: FnMut(&K, &V) -> bool,
    {
        let mut state = self.state.lock();
        let before = state.entries.len();
        state.entries.retain(|key, value| keep(key, &*value));
        before - state.entries.len()
    }

    /// Forgets every entry.
    pub fn clear(&self) {
        self.state.lock().entries.clear();
    }

    /// Number of memoized entries.
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// Returns `true` if nothing is memoized.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The generation the current entries belong to.
    pub fn generation(&self) -> Option<u64> {
        self.state.lock().generation
    }

    fn roll(state: &mut TickState<K, V>, generation: u64) {
        if state.generation != Some(generation) {
            state.entries.clear();
            state.generation = Some(generation);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_memoizes_within_generation() {
        let memo = TickCache::<&str, u32>::new();
        let calls = Cell::new(0);
        let fetch = || {
            calls.set(calls.get() + 1);
            7
        };

        assert_eq!(memo.get_or_insert_with(1, &"fish", fetch), 7);
        assert_eq!(memo.get_or_insert_with(1, &"fish", fetch), 7);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_new_generation_clears_everything() {
        let memo = TickCache::<&str, u32>::new();
        memo.get_or_insert_with(1, &"a", || 1);
        memo.get_or_insert_with(1, &"b", || 2);
        assert_eq!(memo.len(), 2);

        assert_eq!(memo.get_or_insert_with(2, &"a", || 10), 10);
        assert_eq!(memo.len(), 1);
        assert_eq!(memo.generation(), Some(2));
    }

    #[test]
    fn test_remove_and_retain() {
        let memo = TickCache::<&str, u32>::new();
        memo.get_or_insert_with(1, &"a", || 1);
        memo.get_or_insert_with(1, &"b", || 2);
        memo.get_or_insert_with(1, &"c", || 3);

        assert!(memo.remove(&"a"));
        assert!(!memo.remove(&"a"));
        assert_eq!(memo.retain(|_, value| *value != 2), 1);
        assert_eq!(memo.get_or_insert_with(1, &"c", || 99), 3);
        assert_eq!(memo.get_or_insert_with(1, &"b", || 20), 20);
    }

    #[test]
    fn test_first_writer_wins() {
        let memo = TickCache::<&str, u32>::new();
        let value = memo.get_or_insert_with(1, &"a", || {
            // A nested call stores a value first; the outer result is discarded.
            memo.get_or_insert_with(1, &"a", || 1)
                + 100
        });
        assert_eq!(value, 1);
    }
}
