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

//! # Quarry Core
//!
//! Foundational crate containing asset names, operation descriptors and the
//! contracts a host implements to plug its storage, mods and world state into
//! the content coordinator.

#![warn(missing_docs)]

pub mod asset;
pub mod config;
pub mod error;
pub mod host;
pub mod locale;
pub mod monitor;
pub mod operation;

pub use asset::{Asset, AssetBox, AssetData, AssetInfo, AssetName, AssetType, SharedAsset};
pub use config::ContentConfig;
pub use error::{ContentError, ContentResult, ErrorKind};
pub use locale::{LanguageCode, LocaleTable};
pub use monitor::Monitor;
pub use operation::{
    AssetEditOperation, AssetLoadOperation, AssetOperationGroup, EditPriority, LoadPriority,
    Owner,
};
