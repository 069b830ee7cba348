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

//! # Quarry Agents
//!
//! The stateful side of the content system. A [`ContentCoordinator`] owns the
//! content managers, routes managed keys to their owners, localizes lookups and
//! propagates invalidations. Each [`ContentManager`] caches what it loads and
//! runs the [`OperationLane`](quarry_lanes::OperationLane) for game assets.

#![warn(missing_docs)]

pub mod coordinator;
pub mod manager;
pub mod metrics;
pub mod owner;
pub mod store;

pub use coordinator::{
    ContentCoordinator, ContentCoordinatorBuilder, InvalidationReport, ManagedAssetKey,
};
pub use manager::{ContentManager, ManagerKind};
pub use metrics::ContentMetrics;
pub use owner::{ContentSource, OwnerContent};
pub use store::FileStore;
