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

//! Defines the core traits and types for the content system.
//!
//! Content values are stored type-erased: an [`AssetBox`] owns a value while it
//! moves through the load/edit pipeline, and a [`SharedAsset`] is the shared,
//! cached form handed back to callers.

mod data;
mod name;
pub mod path;

pub use data::{AssetData, AssetInfo};
pub use name::AssetName;

use std::{
    any::{Any, TypeId},
    collections::{BTreeMap, HashMap},
    fmt,
    hash::{Hash, Hasher},
    sync::{Arc, Weak},
};

/// A marker trait for types that can be loaded and cached as content.
///
/// `dispose` is invoked when a cached value is evicted with disposal requested,
/// or when its owning content manager is disposed. A value shared between
/// managers may see it more than once.
pub trait Asset: Send + Sync + 'static {
    /// Releases resources held by this value outside of Rust ownership.
    fn dispose(&self) {}
}

impl Asset for String {}
impl<T: Send + Sync + 'static> Asset for Vec<T> {}
impl<K, V, S> Asset for HashMap<K, V, S>
where
    K: Send + Sync + 'static,
    V: Send + Sync + 'static,
    S: Send + Sync + 'static,
{
}
impl<K: Send + Sync + 'static, V: Send + Sync + 'static> Asset for BTreeMap<K, V> {}

type ErasedValue = dyn Any + Send + Sync;

/// The runtime type of a content value.
#[derive(Clone, Copy)]
pub struct AssetType {
    id: TypeId,
    name: &'static str,
    dispose: fn(&ErasedValue),
}

fn dispose_erased<T: Asset>(value: &ErasedValue) {
    if let Some(value) = value.downcast_ref::<T>() {
        value.dispose();
    }
}

impl AssetType {
    /// Returns the runtime type descriptor of `T`.
    pub fn of<T: Asset>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            dispose: dispose_erased::<T>,
        }
    }

    /// The unique type identifier.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The fully qualified type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether this descriptor denotes `T`.
    pub fn is<T: Asset>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for AssetType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for AssetType {}

impl Hash for AssetType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// An owned, type-erased content value.
pub struct AssetBox {
    asset_type: AssetType,
    value: Box<ErasedValue>,
}

impl AssetBox {
    /// Wraps a value.
    pub fn new<T: Asset>(value: T) -> Self {
        Self {
            asset_type: AssetType::of::<T>(),
            value: Box::new(value),
        }
    }

    /// The runtime type of the wrapped value.
    pub fn asset_type(&self) -> AssetType {
        self.asset_type
    }

    /// Whether the wrapped value is a `T`.
    pub fn is<T: Asset>(&self) -> bool {
        self.asset_type.is::<T>()
    }

    /// Borrows the value as `T`.
    pub fn downcast_ref<T: Asset>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Mutably borrows the value as `T`.
    pub fn downcast_mut<T: Asset>(&mut self) -> Option<&mut T> {
        self.value.downcast_mut::<T>()
    }

    /// Unwraps the value as `T`, giving the box back on a type mismatch.
    pub fn into_inner<T: Asset>(self) -> Result<T, Self> {
        let asset_type = self.asset_type;
        match self.value.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(value) => Err(Self { asset_type, value }),
        }
    }

    /// Moves the value into its shared, cacheable form.
    pub fn into_shared(self) -> SharedAsset {
        SharedAsset {
            asset_type: self.asset_type,
            value: Arc::from(self.value),
        }
    }
}

impl fmt::Debug for AssetBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AssetBox").field(&self.asset_type).finish()
    }
}

/// A shared, type-erased content value, as stored in a content cache.
///
/// Clones point to the same value; [`SharedAsset::ptr_eq`] tells whether two
/// handles refer to the same instance.
#[derive(Clone)]
pub struct SharedAsset {
    asset_type: AssetType,
    value: Arc<ErasedValue>,
}

impl SharedAsset {
    /// Wraps an already shared value.
    pub fn from_arc<T: Asset>(value: Arc<T>) -> Self {
        Self {
            asset_type: AssetType::of::<T>(),
            value,
        }
    }

    /// The runtime type of the shared value.
    pub fn asset_type(&self) -> AssetType {
        self.asset_type
    }

    /// Returns a typed handle to the value, or `None` if it isn't a `T`.
    pub fn downcast<T: Asset>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.value).downcast::<T>().ok()
    }

    /// Borrows the value as `T`.
    pub fn downcast_ref<T: Asset>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Whether both handles refer to the same instance.
    pub fn ptr_eq(&self, other: &SharedAsset) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.value), Arc::as_ptr(&other.value))
    }

    /// Runs the value's [`Asset::dispose`] hook.
    pub fn dispose(&self) {
        (self.asset_type.dispose)(&*self.value);
    }

    /// Creates a weak handle that doesn't keep the value alive.
    pub fn downgrade(&self) -> WeakAsset {
        WeakAsset {
            asset_type: self.asset_type,
            value: Arc::downgrade(&self.value),
        }
    }
}

impl fmt::Debug for SharedAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedAsset").field(&self.asset_type).finish()
    }
}

/// A weak reference to a shared content value.
#[derive(Clone)]
pub struct WeakAsset {
    asset_type: AssetType,
    value: Weak<ErasedValue>,
}

impl WeakAsset {
    /// Returns the value if it is still alive.
    pub fn upgrade(&self) -> Option<SharedAsset> {
        self.value.upgrade().map(|value| SharedAsset {
            asset_type: self.asset_type,
            value,
        })
    }

    /// Whether the value has been dropped.
    pub fn is_dead(&self) -> bool {
        self.value.strong_count() == 0
    }
}
