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

//! Load and edit operations contributed by content owners.

use crate::asset::{Asset, AssetBox, AssetData, AssetInfo};
use std::{fmt, sync::Arc};

/// Identifies a content owner (typically a mod).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Owner {
    id: String,
    display_name: String,
}

impl Owner {
    /// Creates an owner from its unique id and a human-readable name.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }

    /// The unique id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The name shown in logs.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name)
    }
}

/// How strongly a loader wants to provide an asset. Ordered from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LoadPriority {
    /// Used only if no other loader applies.
    Low,
    /// The default priority.
    #[default]
    Medium,
    /// Preferred over low and medium loaders.
    High,
    /// Must be the only exclusive loader for the asset.
    Exclusive,
}

/// When an edit runs relative to other edits. Lower values run first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct EditPriority(pub i32);

impl EditPriority {
    /// Runs before default edits.
    pub const EARLY: EditPriority = EditPriority(-1000);
    /// The default priority.
    pub const DEFAULT: EditPriority = EditPriority(0);
    /// Runs after default edits.
    pub const LATE: EditPriority = EditPriority(1000);

    /// Returns this priority shifted by `offset`.
    pub fn offset(self, offset: i32) -> EditPriority {
        EditPriority(self.0.saturating_add(offset))
    }
}

/// Produces a complete asset. Returning `Ok(None)` is treated as a faulty loader.
pub type LoadFn = dyn Fn(&AssetInfo) -> anyhow::Result<Option<AssetBox>> + Send + Sync;

/// Mutates or replaces an asset.
pub type EditFn = dyn Fn(&mut AssetData) -> anyhow::Result<()> + Send + Sync;

/// Formats the "on behalf of" label attached to log lines.
///
/// Returns `None` when there is no content pack owner.
pub fn on_behalf_of_label(on_behalf_of: Option<&Owner>, parenthetical: bool) -> Option<String> {
    let owner = on_behalf_of?;
    Some(if parenthetical {
        format!(" (for the '{}' content pack)", owner.display_name())
    } else {
        format!("the '{}' content pack", owner.display_name())
    })
}

/// An operation that provides the initial version of an asset.
#[derive(Clone)]
pub struct AssetLoadOperation {
    /// The owner registering the operation.
    pub owner: Owner,
    /// How strongly the owner wants to provide the asset.
    pub priority: LoadPriority,
    /// The content pack the owner is acting for, if any.
    pub on_behalf_of: Option<Owner>,
    load: Arc<LoadFn>,
}

impl AssetLoadOperation {
    /// Creates a loader returning type-erased values.
    pub fn new<F>(owner: Owner, priority: LoadPriority, load: F) -> Self
    where
        F: Fn(&AssetInfo) -> anyhow::Result<Option<AssetBox>> + Send + Sync + 'static,
    {
        Self {
            owner,
            priority,
            on_behalf_of: None,
            load: Arc::new(load),
        }
    }

    /// Creates a loader producing a `T`.
    pub fn typed<T, F>(owner: Owner, priority: LoadPriority, load: F) -> Self
    where
        T: Asset,
        F: Fn(&AssetInfo) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        Self::new(owner, priority, move |info| load(info).map(|value| Some(AssetBox::new(value))))
    }

    /// Marks the operation as registered for a content pack.
    pub fn on_behalf_of(mut self, owner: Owner) -> Self {
        self.on_behalf_of = Some(owner);
        self
    }

    /// Runs the loader.
    pub fn load(&self, info: &AssetInfo) -> anyhow::Result<Option<AssetBox>> {
        (self.load)(info)
    }
}

impl fmt::Debug for AssetLoadOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetLoadOperation")
            .field("owner", &self.owner)
            .field("priority", &self.priority)
            .field("on_behalf_of", &self.on_behalf_of)
            .finish_non_exhaustive()
    }
}

/// An operation that edits an asset after it was loaded.
#[derive(Clone)]
pub struct AssetEditOperation {
    /// The owner registering the operation.
    pub owner: Owner,
    /// When the edit runs relative to others.
    pub priority: EditPriority,
    /// The content pack the owner is acting for, if any.
    pub on_behalf_of: Option<Owner>,
    edit: Arc<EditFn>,
}

impl AssetEditOperation {
    /// Creates an edit over the type-erased asset view.
    pub fn new<F>(owner: Owner, priority: EditPriority, edit: F) -> Self
    where
        F: Fn(&mut AssetData) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            owner,
            priority,
            on_behalf_of: None,
            edit: Arc::new(edit),
        }
    }

    /// Creates an edit that mutates a `T` in place. Fails if the asset isn't a `T`.
    pub fn typed<T, F>(owner: Owner, priority: EditPriority, edit: F) -> Self
    where
        T: Asset,
        F: Fn(&mut T) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::new(owner, priority, move |data| match data.data_mut::<T>() {
            Some(value) => edit(value),
            None => anyhow::bail!(
                "expected asset of type '{}'",
                std::any::type_name::<T>()
            ),
        })
    }

    /// Marks the operation as registered for a content pack.
    pub fn on_behalf_of(mut self, owner: Owner) -> Self {
        self.on_behalf_of = Some(owner);
        self
    }

    /// Runs the edit.
    pub fn apply(&self, data: &mut AssetData) -> anyhow::Result<()> {
        (self.edit)(data)
    }
}

impl fmt::Debug for AssetEditOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetEditOperation")
            .field("owner", &self.owner)
            .field("priority", &self.priority)
            .field("on_behalf_of", &self.on_behalf_of)
            .finish_non_exhaustive()
    }
}

/// The operations one owner registered for a given asset.
#[derive(Debug, Clone)]
pub struct AssetOperationGroup {
    /// The owner of every operation in the group.
    pub owner: Owner,
    /// Loaders, in registration order.
    pub load_operations: Vec<AssetLoadOperation>,
    /// Edits, in registration order.
    pub edit_operations: Vec<AssetEditOperation>,
}

impl AssetOperationGroup {
    /// Creates an empty group.
    pub fn new(owner: Owner) -> Self {
        Self {
            owner,
            load_operations: Vec::new(),
            edit_operations: Vec::new(),
        }
    }

    /// Adds a loader.
    pub fn with_load(mut self, operation: AssetLoadOperation) -> Self {
        self.load_operations.push(operation);
        self
    }

    /// Adds an edit.
    pub fn with_edit(mut self, operation: AssetEditOperation) -> Self {
        self.edit_operations.push(operation);
        self
    }
}
