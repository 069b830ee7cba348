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

//! Parsed asset names.

use super::path::{has_invalid_characters, normalize_asset_name};
use crate::{
    error::{ContentError, ContentResult},
    locale::LanguageCode,
};
use std::{
    fmt,
    hash::{Hash, Hasher},
};

/// A normalized asset name, split into a base name and an optional locale.
///
/// Two names are equal when their base names and locale codes match
/// case-insensitively. The original casing is kept for display.
#[derive(Clone)]
pub struct AssetName {
    name: String,
    base_name: String,
    locale_code: Option<String>,
    language_code: Option<LanguageCode>,
    folded_base: String,
    folded_locale: Option<String>,
}

impl AssetName {
    /// Builds a name from an already split base name and locale.
    ///
    /// The base name is normalized; the locale is kept only if non-empty.
    pub fn new(
        base_name: impl AsRef<str>,
        locale_code: Option<String>,
        language_code: Option<LanguageCode>,
    ) -> Self {
        let base_name = normalize_asset_name(base_name.as_ref());
        let locale_code = locale_code
            .map(|code| code.trim().to_string())
            .filter(|code| !code.is_empty());
        let language_code = locale_code.as_ref().and(language_code);

        let name = match &locale_code {
            Some(locale) => format!("{base_name}.{locale}"),
            None => base_name.clone(),
        };

        Self {
            folded_base: base_name.to_lowercase(),
            folded_locale: locale_code.as_ref().map(|code| code.to_lowercase()),
            name,
            base_name,
            locale_code,
            language_code,
        }
    }

    /// Parses a raw asset name.
    ///
    /// The text after the last `.` of the final segment is split off as a locale
    /// when `resolve_locale` recognizes it; otherwise the whole name is the base
    /// name.
    pub fn parse(
        raw: &str,
        resolve_locale: impl Fn(&str) -> Option<LanguageCode>,
    ) -> ContentResult<Self> {
        if raw.trim().is_empty() {
            return Err(ContentError::EmptyName);
        }
        if has_invalid_characters(raw) {
            return Err(ContentError::InvalidCharacters(raw.to_string()));
        }

        let normalized = normalize_asset_name(raw);
        if normalized.is_empty() {
            return Err(ContentError::EmptyName);
        }

        let segment_start = normalized.rfind('/').map_or(0, |index| index + 1);
        if let Some(dot) = normalized.rfind('.') {
            if dot > segment_start && dot + 1 < normalized.len() {
                let suffix = &normalized[dot + 1..];
                if let Some(language) = resolve_locale(suffix) {
                    return Ok(Self::new(
                        &normalized[..dot],
                        Some(suffix.to_string()),
                        Some(language),
                    ));
                }
            }
        }

        Ok(Self::new(normalized, None, None))
    }

    /// The full normalized name, including the locale suffix if any.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name without its locale suffix.
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// The locale suffix, e.g. `pt-BR`.
    pub fn locale_code(&self) -> Option<&str> {
        self.locale_code.as_deref()
    }

    /// The language matching the locale suffix.
    pub fn language_code(&self) -> Option<LanguageCode> {
        self.language_code
    }

    /// Returns this name without its locale.
    pub fn base(&self) -> AssetName {
        if self.locale_code.is_none() {
            return self.clone();
        }
        AssetName::new(&self.base_name, None, None)
    }

    /// Returns the unlocalized form of this name, if it has one.
    ///
    /// A name carrying a locale yields its base name; a base name ending in
    /// `international_suffix` yields the name without that suffix.
    pub fn without_locale(&self, international_suffix: &str) -> Option<AssetName> {
        if self.locale_code.is_some() {
            return Some(self.base());
        }
        let suffix_len = international_suffix.len();
        if suffix_len == 0 || self.base_name.len() <= suffix_len {
            return None;
        }
        let split = self.base_name.len() - suffix_len;
        let tail = self.base_name.get(split..)?;
        if tail.eq_ignore_ascii_case(international_suffix) {
            let head = self.base_name.get(..split)?;
            return Some(AssetName::new(head, None, None));
        }
        None
    }

    /// Whether `other` names this asset, comparing case-insensitively after
    /// normalization. With `use_base_name` the locale is ignored.
    pub fn is_equivalent_to(&self, other: &str, use_base_name: bool) -> bool {
        let other = normalize_asset_name(other).to_lowercase();
        if use_base_name {
            other == self.folded_base
        } else {
            other == self.name.to_lowercase()
        }
    }

    /// Whether this name lies under `prefix`, compared segment-wise and case-insensitively.
    pub fn starts_with_path(&self, prefix: &str) -> bool {
        let prefix = normalize_asset_name(prefix).to_lowercase();
        if prefix.is_empty() {
            return true;
        }
        match self.folded_base.strip_prefix(&prefix) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

impl PartialEq for AssetName {
    fn eq(&self, other: &Self) -> bool {
        self.folded_base == other.folded_base && self.folded_locale == other.folded_locale
    }
}

impl Eq for AssetName {}

impl Hash for AssetName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.folded_base.hash(state);
        self.folded_locale.hash(state);
    }
}

impl fmt::Debug for AssetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssetName({:?})", self.name)
    }
}

impl fmt::Display for AssetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
