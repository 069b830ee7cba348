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

//! A raw store reading assets from a folder on disk.

use anyhow::anyhow;
use quarry_core::{
    asset::{Asset, AssetBox, AssetName, AssetType},
    error::{ContentError, ContentResult},
    host::RawStore,
};
use std::{
    any::TypeId,
    collections::HashMap,
    fmt,
    path::{Path, PathBuf},
};

/// Internal trait for decoding any asset type.
trait AnyDecoder: Send + Sync {
    fn decode_any(&self, bytes: &[u8]) -> anyhow::Result<AssetBox>;
}

/// Wraps a typed decode function so it can sit in the type-erased registry.
struct DecoderWrapper<T, F>(F, std::marker::PhantomData<fn() -> T>);

impl<T, F> AnyDecoder for DecoderWrapper<T, F>
where
    T: Asset,
    F: Fn(&[u8]) -> anyhow::Result<T> + Send + Sync,
{
    fn decode_any(&self, bytes: &[u8]) -> anyhow::Result<AssetBox> {
        (self.0)(bytes).map(AssetBox::new)
    }
}

struct DecoderEntry {
    extensions: Vec<String>,
    decoder: Box<dyn AnyDecoder>,
}

/// Reads assets from files under a root folder.
///
/// An asset `Data/Fish` requested as `T` resolves to the file `Data/Fish`, or
/// to `Data/Fish<ext>` for each extension registered with `T`'s decoder.
/// `String` (UTF-8, `.txt`) and `Vec<u8>` (raw bytes) are decoded out of the box.
pub struct FileStore {
    root: PathBuf,
    decoders: HashMap<TypeId, DecoderEntry>,
}

impl fmt::Debug for FileStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileStore")
            .field("root", &self.root)
            .field("decoders", &self.decoders.len())
            .finish()
    }
}

impl FileStore {
    /// Creates a store over `root` with the default decoders.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            decoders: HashMap::new(),
        }
        .with_decoder::<String, _>(&[".txt"], |bytes| Ok(String::from_utf8(bytes.to_vec())?))
        .with_decoder::<Vec<u8>, _>(&[], |bytes| Ok(bytes.to_vec()))
    }

    /// Registers the decoder for `T`, replacing any previous one.
    pub fn with_decoder<T, F>(mut self, extensions: &[&str], decode: F) -> Self
    where
        T: Asset,
        F: Fn(&[u8]) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        let entry = DecoderEntry {
            extensions: extensions.iter().map(|ext| ext.to_string()).collect(),
            decoder: Box::new(DecoderWrapper(decode, std::marker::PhantomData)),
        };
        self.decoders.insert(TypeId::of::<T>(), entry);
        self
    }

    /// The root folder.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, name: &AssetName, extensions: &[String]) -> Option<PathBuf> {
        let exact = self.root.join(name.name());
        if exact.is_file() {
            return Some(exact);
        }
        extensions
            .iter()
            .map(|ext| self.root.join(format!("{}{}", name.name(), ext)))
            .find(|path| path.is_file())
    }
}

impl RawStore for FileStore {
    fn load(&self, name: &AssetName, asset_type: AssetType) -> ContentResult<AssetBox> {
        let entry = self
            .decoders
            .get(&asset_type.id())
            .ok_or_else(|| ContentError::RawLoad {
                name: name.to_string(),
                source: anyhow!("no decoder registered for type '{}'", asset_type),
            })?;

        let path = self
            .resolve(name, &entry.extensions)
            .ok_or_else(|| ContentError::NotFound(name.to_string()))?;

        let bytes = std::fs::read(&path).map_err(|error| ContentError::RawLoad {
            name: name.to_string(),
            source: anyhow::Error::new(error).context(format!("reading {}", path.display())),
        })?;

        entry
            .decoder
            .decode_any(&bytes)
            .map_err(|source| ContentError::RawLoad {
                name: name.to_string(),
                source,
            })
    }

    fn exists(&self, name: &AssetName) -> bool {
        if self.root.join(name.name()).is_file() {
            return true;
        }
        self.decoders
            .values()
            .any(|entry| self.resolve(name, &entry.extensions).is_some())
    }
}
