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

//! # Quarry Data
//!
//! Storage structures behind the content coordinator: the per-manager content
//! cache, the tick-scoped memo used for operation lookups, and the map of
//! localized asset names.

#![warn(missing_docs)]

pub mod cache;
pub mod localized;
pub mod tick_cache;

pub use cache::ContentCache;
pub use localized::LocalizedNameMap;
pub use tick_cache::TickCache;
