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

use super::OperationLane;
use quarry_core::asset::{AssetBox, AssetInfo, AssetName, AssetType};
use quarry_telemetry::RecordingMonitor;
use std::sync::Arc;

pub(crate) fn lane() -> (OperationLane, Arc<RecordingMonitor>) {
    let monitor = Arc::new(RecordingMonitor::new());
    (OperationLane::new(monitor.clone()), monitor)
}

pub(crate) fn string_info(name: &str) -> AssetInfo {
    AssetInfo::new(AssetName::new(name, None, None), AssetType::of::<String>())
}

pub(crate) fn text_of(value: &AssetBox) -> &str {
    value.downcast_ref::<String>().map(String::as_str).unwrap_or_default()
}
