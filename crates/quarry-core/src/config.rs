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

//! Content coordinator configuration.

use crate::{
    error::{ContentError, ContentResult},
    locale::LanguageCode,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunables for the content coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// First segment of the keys that route to an owner's private content.
    pub managed_prefix: String,
    /// Suffix tried after the locale-specific variant of an asset.
    pub international_suffix: String,
    /// Name of the main game content manager.
    pub main_manager_name: String,
    /// Name of the manager used to reload assets into world references.
    pub propagation_manager_name: String,
    /// Dispose cached values on every invalidation, not only when asked.
    pub aggressive_memory_optimizations: bool,
    /// The language selected at startup.
    pub default_language: LanguageCode,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            managed_prefix: "Managed".to_string(),
            international_suffix: "_international".to_string(),
            main_manager_name: "Game.content".to_string(),
            propagation_manager_name: "Game.propagation".to_string(),
            aggressive_memory_optimizations: false,
            default_language: LanguageCode::En,
        }
    }
}

impl ContentConfig {
    /// Parses a configuration from RON text. Missing fields take their defaults.
    pub fn from_ron_str(text: &str) -> ContentResult<Self> {
        let config: ContentConfig =
            ron::from_str(text).map_err(|e| ContentError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a RON configuration file.
    pub fn load(path: impl AsRef<Path>) -> ContentResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ContentError::Config(format!("{}: {e}", path.display())))?;
        Self::from_ron_str(&text)
    }

    fn validate(&self) -> ContentResult<()> {
        if self.managed_prefix.trim().is_empty() {
            return Err(ContentError::Config("managed_prefix must not be empty".into()));
        }
        if self.managed_prefix.contains(['/', '\\']) {
            return Err(ContentError::Config(
                "managed_prefix must be a single path segment".into(),
            ));
        }
        if self.main_manager_name.trim().is_empty() {
            return Err(ContentError::Config("main_manager_name must not be empty".into()));
        }
        Ok(())
    }
}
