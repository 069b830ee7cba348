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

//! The lane that turns registered operations into a finished asset.
//!
//! A run goes through two stages:
//! 1. **Load**: pick at most one loader (highest priority, at most one
//!    exclusive) or fall back to the raw store.
//! 2. **Edit**: apply every edit in ascending priority, rolling back any edit
//!    that leaves the asset empty or of the wrong type.
//!
//! Faulty operations are logged against their owner and skipped; they never
//! fail the load.

mod edit;
mod load;
#[cfg(test)]
mod tests_support;

pub use load::LoaderSelection;

use quarry_core::{
    asset::{AssetBox, AssetInfo},
    error::{ContentError, ContentResult},
    monitor::Monitor,
    operation::{AssetOperationGroup, Owner},
};
use std::{any::Any, sync::Arc};

/// What happened during a lane run.
#[derive(Debug, Clone, Default)]
pub struct LaneReport {
    /// The owner whose loader provided the asset, if any.
    pub loaded_by: Option<Owner>,
    /// Whether several exclusive loaders competed for the asset.
    pub loader_conflict: bool,
    /// Operations that failed, panicked or returned an unusable value.
    pub faults: usize,
    /// Edits applied successfully.
    pub edits_applied: usize,
    /// Edits rolled back because they cleared the asset or changed its type.
    pub edits_rejected: usize,
}

/// The finished asset and the report of how it was produced.
#[derive(Debug)]
pub struct LaneOutcome {
    /// The loaded and edited value.
    pub value: AssetBox,
    /// How the value was produced.
    pub report: LaneReport,
}

/// Applies load and edit operations to an asset.
#[derive(Clone)]
pub struct OperationLane {
    monitor: Arc<dyn Monitor>,
}

impl OperationLane {
    /// Creates a lane logging to `monitor`.
    pub fn new(monitor: Arc<dyn Monitor>) -> Self {
        Self { monitor }
    }

    /// Produces the asset described by `info`.
    ///
    /// `raw_load` is called only when no loader supplied a usable value; its
    /// error (typically [`ContentError::NotFound`]) is returned as-is.
    pub fn run<F>(
        &self,
        info: &AssetInfo,
        groups: &[AssetOperationGroup],
        raw_load: F,
    ) -> ContentResult<LaneOutcome>
    where
        F: FnOnce() -> ContentResult<AssetBox>,
    {
        let mut report = LaneReport::default();

        let loaded = match self.select_loader(info, groups) {
            LoaderSelection::Selected(operation) => {
                let value = self.apply_loader(info, operation, &mut report);
                if value.is_some() {
                    report.loaded_by = Some(operation.owner.clone());
                }
                value
            }
            LoaderSelection::Conflict => {
                report.loader_conflict = true;
                None
            }
            LoaderSelection::None => None,
        };

        let value = match loaded {
            Some(value) => value,
            None => raw_load()?,
        };

        let value = self
            .apply_editors(info, value, groups, &mut report)
            .ok_or_else(|| ContentError::NotFound(info.name.to_string()))?;

        Ok(LaneOutcome { value, report })
    }
}

/// Extracts a readable message from a caught panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::tests_support::*;
    use super::*;
    use quarry_core::operation::{
        AssetEditOperation, AssetLoadOperation, EditPriority, LoadPriority,
    };

    fn raw() -> ContentResult<AssetBox> {
        Ok(AssetBox::new(String::from("raw")))
    }

    #[test]
    fn test_raw_load_without_operations() {
        let (lane, _) = lane();
        let outcome = lane.run(&string_info("Data/Fish"), &[], raw).unwrap();
        assert_eq!(text_of(&outcome.value), "raw");
        assert!(outcome.report.loaded_by.is_none());
    }

    #[test]
    fn test_raw_error_is_returned() {
        let (lane, _) = lane();
        let error = lane
            .run(&string_info("Data/Fish"), &[], || {
                Err(ContentError::NotFound("Data/Fish".into()))
            })
            .unwrap_err();
        assert!(error.is_not_found());
    }

    #[test]
    fn test_loader_then_edits() {
        let (lane, _) = lane();
        let owner = Owner::new("a", "A");
        let group = AssetOperationGroup::new(owner.clone())
            .with_load(AssetLoadOperation::typed(owner.clone(), LoadPriority::Medium, |_| {
                Ok(String::from("loaded"))
            }))
            .with_edit(AssetEditOperation::typed::<String, _>(owner, EditPriority::DEFAULT, |s| {
                s.push_str("+edit");
                Ok(())
            }));

        let outcome = lane.run(&string_info("Data/Fish"), &[group], raw).unwrap();
        assert_eq!(text_of(&outcome.value), "loaded+edit");
        assert_eq!(outcome.report.loaded_by.map(|o| o.id().to_string()).as_deref(), Some("a"));
        assert_eq!(outcome.report.edits_applied, 1);
    }

    #[test]
    fn test_panic_message_extraction() {
        let caught = std::panic::catch_unwind(|| panic!("boom {}", 1)).unwrap_err();
        assert_eq!(panic_message(caught.as_ref()), "boom 1");
        let caught = std::panic::catch_unwind(|| panic!("static")).unwrap_err();
        assert_eq!(panic_message(caught.as_ref()), "static");
    }
}
