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

//! Edit application.

use super::{panic_message, LaneReport, OperationLane};
use log::Level;
use quarry_core::{
    asset::{AssetBox, AssetData, AssetInfo},
    operation::{on_behalf_of_label, AssetEditOperation, AssetOperationGroup},
};
use std::panic::{self, AssertUnwindSafe};

impl OperationLane {
    /// Applies every edit in ascending priority; equal priorities keep
    /// registration order. Returns `None` only if the asset was lost, which a
    /// rollback prevents.
    pub(super) fn apply_editors(
        &self,
        info: &AssetInfo,
        value: AssetBox,
        groups: &[AssetOperationGroup],
        report: &mut LaneReport,
    ) -> Option<AssetBox> {
        let mut edits: Vec<&AssetEditOperation> = groups
            .iter()
            .flat_map(|group| group.edit_operations.iter())
            .collect();
        if edits.is_empty() {
            return Some(value);
        }
        edits.sort_by_key(|operation| operation.priority);

        let mut data = AssetData::new(info.clone(), value);
        for operation in edits {
            data.commit();
            self.apply_editor(info, operation, &mut data, report);
        }
        data.commit();
        data.into_data()
    }

    fn apply_editor(
        &self,
        info: &AssetInfo,
        operation: &AssetEditOperation,
        data: &mut AssetData,
        report: &mut LaneReport,
    ) {
        let label = on_behalf_of_label(operation.on_behalf_of.as_ref(), true).unwrap_or_default();
        let owner = &operation.owner;

        let crash = match panic::catch_unwind(AssertUnwindSafe(|| operation.apply(data))) {
            Ok(Ok(())) => None,
            Ok(Err(error)) => Some(format!("{error:?}")),
            Err(payload) => Some(panic_message(payload.as_ref())),
        };
        if let Some(details) = &crash {
            report.faults += 1;
            self.monitor.log_as(
                owner,
                Level::Error,
                &format!(
                    "Mod crashed when editing asset '{}'{label}, which may cause errors in-game. Error details:\n{details}",
                    info.name
                ),
            );
        }

        let rejection = match data.data_type() {
            None => Some(format!(
                "Mod incorrectly set asset '{}'{label} to a null value; ignoring override.",
                info.name
            )),
            Some(actual) if actual != info.data_type => Some(format!(
                "Mod incorrectly set asset '{}'{label} to incompatible type '{}', expected '{}'; ignoring override.",
                info.name, actual, info.data_type
            )),
            Some(_) => None,
        };

        match rejection {
            Some(message) => {
                data.rollback();
                report.edits_rejected += 1;
                self.monitor.log_as(owner, Level::Warn, &message);
            }
            None if crash.is_none() => {
                report.edits_applied += 1;
                self.monitor.log_as(
                    owner,
                    Level::Trace,
                    &format!("Edited asset '{}'{label}.", info.name),
                );
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::operation_lane::tests_support::*;
    use log::Level;
    use quarry_core::{
        asset::{AssetBox, AssetData},
        error::ContentResult,
        operation::{AssetEditOperation, AssetOperationGroup, EditPriority, Owner},
    };

    fn raw() -> ContentResult<AssetBox> {
        Ok(AssetBox::new(String::from("raw")))
    }

    fn append(owner: &Owner, priority: EditPriority, suffix: &'static str) -> AssetEditOperation {
        AssetEditOperation::typed::<String, _>(owner.clone(), priority, move |text| {
            text.push_str(suffix);
            Ok(())
        })
    }

    #[test]
    fn test_edits_run_in_priority_then_registration_order() {
        let (lane, _) = lane();
        let a = Owner::new("a", "A");
        let b = Owner::new("b", "B");
        let groups = vec![
            AssetOperationGroup::new(a.clone())
                .with_edit(append(&a, EditPriority::LATE, "-late"))
                .with_edit(append(&a, EditPriority::DEFAULT, "-a")),
            AssetOperationGroup::new(b.clone())
                .with_edit(append(&b, EditPriority::DEFAULT, "-b"))
                .with_edit(append(&b, EditPriority::EARLY, "-early")),
        ];

        let outcome = lane.run(&string_info("Data/Fish"), &groups, raw).unwrap();
        assert_eq!(text_of(&outcome.value), "raw-early-a-b-late");
        assert_eq!(outcome.report.edits_applied, 4);
    }

    #[test]
    fn test_null_edit_is_discarded_with_owner_warning() {
        let (lane, monitor) = lane();
        let bad = Owner::new("bad", "Bad Mod");
        let good = Owner::new("good", "Good Mod");
        let groups = vec![
            AssetOperationGroup::new(bad.clone()).with_edit(AssetEditOperation::new(
                bad,
                EditPriority::DEFAULT,
                |data: &mut AssetData| {
                    data.set_raw(None);
                    Ok(())
                },
            )),
            AssetOperationGroup::new(good.clone()).with_edit(append(&good, EditPriority::LATE, "+good")),
        ];

        let outcome = lane.run(&string_info("Data/Fish"), &groups, raw).unwrap();
        assert_eq!(text_of(&outcome.value), "raw+good");
        assert_eq!(outcome.report.edits_rejected, 1);
        assert_eq!(outcome.report.edits_applied, 1);
        assert!(monitor.contains(
            Level::Warn,
            "[Bad Mod] Mod incorrectly set asset 'Data/Fish' to a null value; ignoring override."
        ));
    }

    #[test]
    fn test_wrong_type_edit_is_rolled_back() {
        let (lane, monitor) = lane();
        let a = Owner::new("a", "A");
        let groups = vec![AssetOperationGroup::new(a.clone())
            .with_edit(append(&a, EditPriority::DEFAULT, "+1"))
            .with_edit(AssetEditOperation::new(a, EditPriority::LATE, |data: &mut AssetData| {
                data.replace_with(vec![0u8; 4]);
                Ok(())
            }))];

        let outcome = lane.run(&string_info("Data/Fish"), &groups, raw).unwrap();
        assert_eq!(text_of(&outcome.value), "raw+1");
        assert!(monitor.contains(Level::Warn, "to incompatible type"));
    }

    #[test]
    fn test_crashing_edit_is_skipped() {
        let (lane, monitor) = lane();
        let a = Owner::new("a", "A");
        let groups = vec![AssetOperationGroup::new(a.clone())
            .with_edit(AssetEditOperation::typed::<String, _>(a.clone(), EditPriority::EARLY, |_| {
                anyhow::bail!("edit failed")
            }))
            .with_edit(AssetEditOperation::new(a.clone(), EditPriority::DEFAULT, |_: &mut AssetData| {
                panic!("edit panic")
            }))
            .with_edit(append(&a, EditPriority::LATE, "+ok"))];

        let outcome = lane.run(&string_info("Data/Fish"), &groups, raw).unwrap();
        assert_eq!(text_of(&outcome.value), "raw+ok");
        assert_eq!(outcome.report.faults, 2);
        assert_eq!(outcome.report.edits_applied, 1);
        assert!(monitor.contains(Level::Error, "edit failed"));
        assert!(monitor.contains(Level::Error, "edit panic"));
    }

    #[test]
    fn test_replacement_with_same_type_is_kept() {
        let (lane, _) = lane();
        let a = Owner::new("a", "A");
        let groups = vec![AssetOperationGroup::new(a.clone()).with_edit(AssetEditOperation::new(
            a,
            EditPriority::DEFAULT,
            |data: &mut AssetData| {
                data.replace_with(String::from("replaced"));
                Ok(())
            },
        ))];

        let outcome = lane.run(&string_info("Data/Fish"), &groups, raw).unwrap();
        assert_eq!(text_of(&outcome.value), "replaced");
    }
}
