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

mod common;

use anyhow::Result;
use common::{Harness, MemoryStore};
use parking_lot::RwLock;
use quarry_agents::ContentCoordinator;
use quarry_core::{host::LocaleProvider, locale::LanguageCode};
use std::sync::Arc;

#[derive(Default)]
struct SharedLocales(RwLock<Vec<String>>);

impl LocaleProvider for SharedLocales {
    fn custom_locale_codes(&self) -> Vec<String> {
        self.0.read().clone()
    }
}

fn custom_locale_coordinator(
    codes: &[&str],
) -> (Arc<ContentCoordinator>, Arc<MemoryStore>, Arc<SharedLocales>) {
    let store = MemoryStore::new();
    let locales = Arc::new(SharedLocales::default());
    locales
        .0
        .write()
        .extend(codes.iter().map(|code| code.to_string()));
    let coordinator = ContentCoordinator::builder(store.clone())
        .locales(locales.clone())
        .build();
    (coordinator, store, locales)
}

#[test]
fn test_fallback_order_and_remembered_mapping() -> Result<()> {
    let harness = Harness::new();
    harness.store.insert("Data/mail", String::from("mail"));
    harness.coordinator.set_language(LanguageCode::Pt, None);
    let main = harness.coordinator.main_content_manager();
    let name = harness.name("Data/mail");

    let value = main.load_localized::<String>(&name, LanguageCode::Pt, false)?;
    assert_eq!(value.as_str(), "mail");
    assert_eq!(
        harness.store.requests(),
        vec!["Data/mail.pt-BR", "Data/mail_international", "Data/mail"]
    );

    harness.store.clear_requests();
    main.load_localized::<String>(&name, LanguageCode::Pt, false)?;
    assert_eq!(harness.store.requests(), vec!["Data/mail"]);
    Ok(())
}

#[test]
fn test_localized_variant_wins() -> Result<()> {
    let harness = Harness::new();
    harness.store.insert("Data/mail", String::from("mail"));
    harness.store.insert("Data/mail.pt-BR", String::from("correio"));
    harness.coordinator.set_language(LanguageCode::Pt, None);
    let main = harness.coordinator.main_content_manager();

    assert_eq!(main.load::<String>("Data/mail")?.as_str(), "correio");
    assert_eq!(main.cached_keys(), vec!["Data/mail.pt-BR".to_string()]);
    assert_eq!(harness.store.requests(), vec!["Data/mail.pt-BR"]);
    Ok(())
}

#[test]
fn test_international_variant() -> Result<()> {
    let harness = Harness::new();
    harness.store.insert("Fonts/Sans", String::from("latin"));
    harness
        .store
        .insert("Fonts/Sans_international", String::from("cjk"));
    harness.coordinator.set_language(LanguageCode::Ja, None);

    let value = harness
        .coordinator
        .main_content_manager()
        .load::<String>("Fonts/Sans")?;
    assert_eq!(value.as_str(), "cjk");
    Ok(())
}

#[test]
fn test_base_language_loads_exact_name() -> Result<()> {
    let harness = Harness::new();
    harness.store.insert("Data/mail", String::from("mail"));
    harness.store.insert("Data/mail.pt-BR", String::from("correio"));

    let value = harness
        .coordinator
        .main_content_manager()
        .load::<String>("Data/mail")?;
    assert_eq!(value.as_str(), "mail");
    assert_eq!(harness.store.requests(), vec!["Data/mail"]);
    Ok(())
}

#[test]
fn test_explicit_locale_is_exact() -> Result<()> {
    let harness = Harness::new();
    harness.store.insert("Data/mail.fr-FR", String::from("courrier"));
    let main = harness.coordinator.main_content_manager();

    assert_eq!(main.load::<String>("Data/mail.fr-FR")?.as_str(), "courrier");
    harness.coordinator.set_language(LanguageCode::Pt, None);
    assert!(main.load::<String>("Data/mail.pt-BR").is_err());
    assert_eq!(
        harness.store.requests(),
        vec!["Data/mail.fr-FR", "Data/mail.pt-BR"]
    );
    Ok(())
}

#[test]
fn test_custom_language() -> Result<()> {
    let (coordinator, store, _) = custom_locale_coordinator(&["eo"]);
    store.insert("Data/mail", String::from("mail"));
    store.insert("Data/mail.eo", String::from("poŝto"));

    coordinator.set_language(LanguageCode::Mod, Some("eo"));
    assert_eq!(coordinator.current_locale(), "eo");

    let name = coordinator.parse_asset_name("Data/mail.EO", true)?;
    assert_eq!(name.locale_code(), Some("EO"));
    assert_eq!(name.language_code(), Some(LanguageCode::Mod));

    let value = coordinator.main_content_manager().load::<String>("Data/mail")?;
    assert_eq!(value.as_str(), "poŝto");
    Ok(())
}

#[test]
fn test_refresh_locales_picks_up_new_codes() -> Result<()> {
    let (coordinator, _, locales) = custom_locale_coordinator(&[]);

    let before = coordinator.parse_asset_name("Data/mail.tlh", true)?;
    assert_eq!(before.locale_code(), None);
    assert_eq!(before.base_name(), "Data/mail.tlh");

    locales.0.write().push("tlh".to_string());
    coordinator.refresh_locales();

    let after = coordinator.parse_asset_name("Data/mail.tlh", true)?;
    assert_eq!(after.locale_code(), Some("tlh"));
    assert_eq!(after.base_name(), "Data/mail");

    let unlocalized = coordinator.parse_asset_name("Data/mail.tlh", false)?;
    assert_eq!(unlocalized.locale_code(), None);
    Ok(())
}

#[test]
fn test_language_change_forgets_mappings() -> Result<()> {
    let harness = Harness::new();
    harness.store.insert("Data/mail", String::from("mail"));
    harness.coordinator.set_language(LanguageCode::Pt, None);
    let main = harness.coordinator.main_content_manager();
    let name = harness.name("Data/mail");

    main.load_localized::<String>(&name, LanguageCode::Pt, false)?;
    harness.store.insert("Data/mail.pt-BR", String::from("correio"));
    let stale = main.load_localized::<String>(&name, LanguageCode::Pt, false)?;
    assert_eq!(stale.as_str(), "mail");

    harness.coordinator.set_language(LanguageCode::En, None);
    harness.coordinator.set_language(LanguageCode::Pt, None);
    let fresh = main.load_localized::<String>(&name, LanguageCode::Pt, false)?;
    assert_eq!(fresh.as_str(), "correio");
    Ok(())
}

#[test]
fn test_invalidation_forgets_mappings() -> Result<()> {
    let harness = Harness::new();
    harness.store.insert("Data/mail", String::from("mail"));
    harness.coordinator.set_language(LanguageCode::Pt, None);
    let main = harness.coordinator.main_content_manager();

    assert_eq!(main.load::<String>("Data/mail")?.as_str(), "mail");
    harness.store.insert("Data/mail.pt-BR", String::from("correio"));
    harness.coordinator.invalidate_asset("Data/mail")?;

    assert_eq!(main.load::<String>("Data/mail")?.as_str(), "correio");
    Ok(())
}

#[test]
fn test_locale_codes() {
    let harness = Harness::new();
    let coordinator = &harness.coordinator;

    assert_eq!(coordinator.language(), LanguageCode::En);
    assert_eq!(coordinator.current_locale(), "");
    assert_eq!(coordinator.locale_code(LanguageCode::Ja).as_deref(), Some("ja-JP"));

    coordinator.set_language(LanguageCode::De, None);
    assert_eq!(coordinator.current_locale(), "de-DE");
    assert_eq!(coordinator.locale_code(LanguageCode::Mod), None);
}
