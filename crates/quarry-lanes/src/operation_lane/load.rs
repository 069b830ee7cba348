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

//! Loader selection and invocation.

use super::{panic_message, LaneReport, OperationLane};
use log::Level;
use quarry_core::{
    asset::{AssetBox, AssetInfo},
    operation::{on_behalf_of_label, AssetLoadOperation, AssetOperationGroup, LoadPriority},
};
use std::panic::{self, AssertUnwindSafe};

/// The loader chosen for an asset.
#[derive(Debug)]
pub enum LoaderSelection<'a> {
    /// No loader applies; the raw store provides the asset.
    None,
    /// This loader provides the asset.
    Selected(&'a AssetLoadOperation),
    /// Several exclusive loaders compete; the raw store provides the asset.
    Conflict,
}

fn describe_loader(operation: &AssetLoadOperation) -> String {
    match on_behalf_of_label(operation.on_behalf_of.as_ref(), true) {
        Some(label) => format!("{}{}", operation.owner.display_name(), label),
        None => operation.owner.display_name().to_string(),
    }
}

impl OperationLane {
    /// Picks the loader for an asset: the highest priority wins, ties keep
    /// registration order, and more than one exclusive loader is a conflict.
    pub fn select_loader<'a>(
        &self,
        info: &AssetInfo,
        groups: &'a [AssetOperationGroup],
    ) -> LoaderSelection<'a> {
        let mut loaders: Vec<&AssetLoadOperation> = groups
            .iter()
            .flat_map(|group| group.load_operations.iter())
            .collect();
        if loaders.is_empty() {
            return LoaderSelection::None;
        }

        // Stable sort, so equal priorities keep registration order.
        loaders.sort_by(|a, b| b.priority.cmp(&a.priority));

        let exclusive: Vec<&AssetLoadOperation> = loaders
            .iter()
            .copied()
            .filter(|operation| operation.priority == LoadPriority::Exclusive)
            .collect();

        if exclusive.len() > 1 {
            let first_owner = exclusive[0].owner.id();
            let message = if exclusive.iter().all(|op| op.owner.id() == first_owner) {
                format!(
                    "The '{}' mod wants to provide the '{}' asset multiple times, which isn't supported. Both loaders are ignored and the default asset is used instead.",
                    exclusive[0].owner.display_name(),
                    info.name
                )
            } else {
                let owners: Vec<String> = exclusive.iter().map(|op| describe_loader(op)).collect();
                format!(
                    "Multiple mods want to provide the '{}' asset: {}. None of them are applied and the default asset is used instead.",
                    info.name,
                    owners.join(", ")
                )
            };
            self.monitor.log(Level::Warn, &message);
            return LoaderSelection::Conflict;
        }

        LoaderSelection::Selected(loaders[0])
    }

    /// Runs a loader, returning `None` if it failed, panicked or produced an
    /// unusable value.
    pub(super) fn apply_loader(
        &self,
        info: &AssetInfo,
        operation: &AssetLoadOperation,
        report: &mut LaneReport,
    ) -> Option<AssetBox> {
        let label = on_behalf_of_label(operation.on_behalf_of.as_ref(), true).unwrap_or_default();
        let owner = &operation.owner;

        let failure = match panic::catch_unwind(AssertUnwindSafe(|| operation.load(info))) {
            Ok(Ok(Some(value))) if value.asset_type() == info.data_type => {
                self.monitor.log_as(
                    owner,
                    Level::Trace,
                    &format!("Loaded asset '{}'{label}.", info.name),
                );
                return Some(value);
            }
            Ok(Ok(Some(value))) => format!(
                "Mod incorrectly loaded asset '{}'{label} as type '{}', expected '{}'; ignoring loader.",
                info.name,
                value.asset_type(),
                info.data_type
            ),
            Ok(Ok(None)) => format!(
                "Mod incorrectly set asset '{}'{label} to a null value; ignoring loader.",
                info.name
            ),
            Ok(Err(error)) => format!(
                "Mod crashed when loading asset '{}'{label}. The default asset is used instead. Error details:\n{error:?}",
                info.name
            ),
            Err(payload) => format!(
                "Mod crashed when loading asset '{}'{label}. The default asset is used instead. Error details:\n{}",
                info.name,
                panic_message(payload.as_ref())
            ),
        };

        report.faults += 1;
        self.monitor.log_as(owner, Level::Error, &failure);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation_lane::tests_support::*;
    use quarry_core::{
        asset::AssetBox,
        error::ContentResult,
        operation::{AssetLoadOperation, LoadPriority, Owner},
    };

    fn loader(owner: &Owner, priority: LoadPriority, text: &'static str) -> AssetLoadOperation {
        AssetLoadOperation::typed(owner.clone(), priority, move |_| Ok(text.to_string()))
    }

    fn raw() -> ContentResult<AssetBox> {
        Ok(AssetBox::new(String::from("raw")))
    }

    #[test]
    fn test_highest_priority_wins_ties_keep_order() {
        let (lane, _) = lane();
        let a = Owner::new("a", "A");
        let b = Owner::new("b", "B");
        let groups = vec![
            AssetOperationGroup::new(a.clone())
                .with_load(loader(&a, LoadPriority::Low, "a-low"))
                .with_load(loader(&a, LoadPriority::High, "a-high")),
            AssetOperationGroup::new(b.clone()).with_load(loader(&b, LoadPriority::High, "b-high")),
        ];

        let outcome = lane.run(&string_info("Data/Fish"), &groups, raw).unwrap();
        assert_eq!(text_of(&outcome.value), "a-high");
    }

    #[test]
    fn test_two_exclusive_owners_conflict() {
        let (lane, monitor) = lane();
        let a = Owner::new("a", "Mod A");
        let b = Owner::new("b", "Mod B");
        let groups = vec![
            AssetOperationGroup::new(a.clone()).with_load(loader(&a, LoadPriority::Exclusive, "a")),
            AssetOperationGroup::new(b.clone()).with_load(
                loader(&b, LoadPriority::Exclusive, "b").on_behalf_of(Owner::new("p", "Pack")),
            ),
            AssetOperationGroup::new(b.clone()).with_load(loader(&b, LoadPriority::High, "c")),
        ];

        let outcome = lane.run(&string_info("Data/Fish"), &groups, raw).unwrap();
        assert_eq!(text_of(&outcome.value), "raw");
        assert!(outcome.report.loader_conflict);
        assert!(monitor.contains(
            Level::Warn,
            "Multiple mods want to provide the 'Data/Fish' asset: Mod A, Mod B (for the 'Pack' content pack)"
        ));
    }

    #[test]
    fn test_same_owner_twice_exclusive() {
        let (lane, monitor) = lane();
        let a = Owner::new("a", "Mod A");
        let groups = vec![AssetOperationGroup::new(a.clone())
            .with_load(loader(&a, LoadPriority::Exclusive, "1"))
            .with_load(loader(&a, LoadPriority::Exclusive, "2"))];

        let outcome = lane.run(&string_info("Data/Fish"), &groups, raw).unwrap();
        assert_eq!(text_of(&outcome.value), "raw");
        assert!(monitor.contains(Level::Warn, "wants to provide the 'Data/Fish' asset multiple times"));
    }

    #[test]
    fn test_one_exclusive_beats_everything() {
        let (lane, _) = lane();
        let a = Owner::new("a", "A");
        let groups = vec![AssetOperationGroup::new(a.clone())
            .with_load(loader(&a, LoadPriority::High, "high"))
            .with_load(loader(&a, LoadPriority::Exclusive, "exclusive"))];

        let outcome = lane.run(&string_info("Data/Fish"), &groups, raw).unwrap();
        assert_eq!(text_of(&outcome.value), "exclusive");
    }

    #[test]
    fn test_faulty_loaders_fall_back_to_raw() {
        let (lane, monitor) = lane();
        let a = Owner::new("a", "Mod A");
        let cases = vec![
            AssetLoadOperation::new(a.clone(), LoadPriority::Medium, |_| Ok(None)),
            AssetLoadOperation::new(a.clone(), LoadPriority::Medium, |_| anyhow::bail!("broken")),
            AssetLoadOperation::new(a.clone(), LoadPriority::Medium, |_| panic!("loader panic")),
            AssetLoadOperation::typed(a.clone(), LoadPriority::Medium, |_| Ok(vec![1u8])),
        ];

        for operation in cases {
            let groups = vec![AssetOperationGroup::new(a.clone()).with_load(operation)];
            let outcome = lane.run(&string_info("Data/Fish"), &groups, raw).unwrap();
            assert_eq!(text_of(&outcome.value), "raw");
            assert_eq!(outcome.report.faults, 1);
            assert!(outcome.report.loaded_by.is_none());
        }

        assert!(monitor.contains(Level::Error, "[Mod A] Mod incorrectly set asset 'Data/Fish' to a null value"));
        assert!(monitor.contains(Level::Error, "broken"));
        assert!(monitor.contains(Level::Error, "loader panic"));
        assert!(monitor.contains(Level::Error, "as type"));
    }
}
