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

//! Descriptors handed to load and edit operations.

use super::{Asset, AssetBox, AssetName, AssetType};

/// What is being loaded: the asset name, its locale and the requested type.
#[derive(Debug, Clone)]
pub struct AssetInfo {
    /// The locale being loaded, if any.
    pub locale: Option<String>,
    /// The asset name.
    pub name: AssetName,
    /// The type requested by the caller.
    pub data_type: AssetType,
}

impl AssetInfo {
    /// Describes a load of `name` as `data_type`; the locale is taken from the name.
    pub fn new(name: AssetName, data_type: AssetType) -> Self {
        Self {
            locale: name.locale_code().map(str::to_owned),
            name,
            data_type,
        }
    }

    /// Whether the requested type is `T`.
    pub fn is_type<T: Asset>(&self) -> bool {
        self.data_type.is::<T>()
    }
}

/// A mutable view of an asset being edited.
///
/// Edits either mutate the value in place or replace it. A replacement keeps
/// the value it displaced, so that an edit leaving the asset empty or of the
/// wrong type can be rolled back.
#[derive(Debug)]
pub struct AssetData {
    info: AssetInfo,
    data: Option<AssetBox>,
    displaced: Option<AssetBox>,
}

impl AssetData {
    /// Wraps a loaded value for editing.
    pub fn new(info: AssetInfo, data: AssetBox) -> Self {
        Self {
            info,
            data: Some(data),
            displaced: None,
        }
    }

    /// The asset being edited.
    pub fn info(&self) -> &AssetInfo {
        &self.info
    }

    /// The asset name being edited.
    pub fn name(&self) -> &AssetName {
        &self.info.name
    }

    /// The current value as `T`.
    pub fn data<T: Asset>(&self) -> Option<&T> {
        self.data.as_ref()?.downcast_ref::<T>()
    }

    /// The current value as a mutable `T`.
    pub fn data_mut<T: Asset>(&mut self) -> Option<&mut T> {
        self.data.as_mut()?.downcast_mut::<T>()
    }

    /// The runtime type of the current value, or `None` if it was cleared.
    pub fn data_type(&self) -> Option<AssetType> {
        self.data.as_ref().map(AssetBox::asset_type)
    }

    /// Replaces the value.
    pub fn replace_with<T: Asset>(&mut self, value: T) {
        self.set_raw(Some(AssetBox::new(value)));
    }

    /// Replaces the value with an already boxed one, or clears it.
    pub fn set_raw(&mut self, data: Option<AssetBox>) {
        let previous = std::mem::replace(&mut self.data, data);
        if self.displaced.is_none() {
            self.displaced = previous;
        }
    }

    /// Forgets the displaced value, making the current value the rollback point.
    pub fn commit(&mut self) {
        self.displaced = None;
    }

    /// Restores the value displaced since the last commit. Returns `false` if
    /// nothing was displaced.
    pub fn rollback(&mut self) -> bool {
        match self.displaced.take() {
            Some(previous) => {
                self.data = Some(previous);
                true
            }
            None => false,
        }
    }

    /// Consumes the view, returning the current value.
    pub fn into_data(self) -> Option<AssetBox> {
        self.data
    }
}
