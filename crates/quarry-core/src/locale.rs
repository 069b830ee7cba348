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

//! Language codes and the locale lookup table used when parsing asset names.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A language the content pipeline can localize assets for.
///
/// `En` is the base language and has no locale suffix. `Mod` covers every
/// custom language registered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageCode {
    /// English, the base language.
    #[default]
    En,
    /// Japanese.
    Ja,
    /// Russian.
    Ru,
    /// Chinese (simplified).
    Zh,
    /// Portuguese (Brazil).
    Pt,
    /// Spanish.
    Es,
    /// German.
    De,
    /// Thai.
    Th,
    /// French.
    Fr,
    /// Korean.
    Ko,
    /// Italian.
    It,
    /// Turkish.
    Tr,
    /// Hungarian.
    Hu,
    /// A custom language supplied by the host.
    Mod,
}

impl LanguageCode {
    /// Every built-in language, in declaration order.
    pub const BUILTIN: [LanguageCode; 13] = [
        LanguageCode::En,
        LanguageCode::Ja,
        LanguageCode::Ru,
        LanguageCode::Zh,
        LanguageCode::Pt,
        LanguageCode::Es,
        LanguageCode::De,
        LanguageCode::Th,
        LanguageCode::Fr,
        LanguageCode::Ko,
        LanguageCode::It,
        LanguageCode::Tr,
        LanguageCode::Hu,
    ];

    /// The locale suffix for a built-in language, or `None` for the base and custom languages.
    pub fn builtin_locale(self) -> Option<&'static str> {
        match self {
            LanguageCode::En | LanguageCode::Mod => None,
            LanguageCode::Ja => Some("ja-JP"),
            LanguageCode::Ru => Some("ru-RU"),
            LanguageCode::Zh => Some("zh-CN"),
            LanguageCode::Pt => Some("pt-BR"),
            LanguageCode::Es => Some("es-ES"),
            LanguageCode::De => Some("de-DE"),
            LanguageCode::Th => Some("th-TH"),
            LanguageCode::Fr => Some("fr-FR"),
            LanguageCode::Ko => Some("ko-KR"),
            LanguageCode::It => Some("it-IT"),
            LanguageCode::Tr => Some("tr-TR"),
            LanguageCode::Hu => Some("hu-HU"),
        }
    }

    /// Whether this is the base language, for which no localized variant is searched.
    pub fn is_base(self) -> bool {
        self == LanguageCode::En
    }
}

/// A case-insensitive map from locale suffix to language.
///
/// Built-in locales always win over a custom locale with the same code.
#[derive(Debug, Clone, Default)]
pub struct LocaleTable {
    codes: HashMap<String, LanguageCode>,
    custom: Vec<String>,
}

impl LocaleTable {
    /// Creates a table containing only the built-in locales.
    pub fn builtin() -> Self {
        Self::with_custom(std::iter::empty::<&str>())
    }

    /// Creates a table from the built-in locales plus the given custom locale codes.
    pub fn with_custom<I, S>(custom: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut codes = HashMap::new();
        let mut kept = Vec::new();

        for code in custom {
            let code = code.as_ref().trim();
            if code.is_empty() {
                continue;
            }
            codes.insert(code.to_lowercase(), LanguageCode::Mod);
            kept.push(code.to_string());
        }

        for language in LanguageCode::BUILTIN {
            if let Some(locale) = language.builtin_locale() {
                codes.insert(locale.to_lowercase(), language);
            }
        }

        Self {
            codes,
            custom: kept,
        }
    }

    /// Resolves a locale suffix (case-insensitive) to its language.
    pub fn resolve(&self, locale: &str) -> Option<LanguageCode> {
        self.codes.get(&locale.to_lowercase()).copied()
    }

    /// The custom locale codes this table was built from.
    pub fn custom_codes(&self) -> &[String] {
        &self.custom
    }

    /// Number of recognized locale codes.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Returns `true` if no locale is recognized.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
