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
use common::{owner, Harness, MemoryStore};
use quarry_agents::{ContentSource, ManagerKind, OwnerContent};
use quarry_core::{error::ErrorKind, locale::LanguageCode};

fn owner_with_store(harness: &Harness, id: &str) -> Result<(OwnerContent, std::sync::Arc<MemoryStore>)> {
    let store = MemoryStore::new();
    let content = OwnerContent::new(&harness.coordinator, owner(id), store.clone())?;
    Ok((content, store))
}

#[test]
fn test_managed_prefix() {
    let harness = Harness::new();
    assert_eq!(
        harness.coordinator.get_managed_asset_prefix(" Some.Mod "),
        "Managed/some.mod"
    );
    assert!(harness
        .coordinator
        .is_managed_asset_key(&harness.name("managed/some.mod/assets/fish")));
    assert!(!harness
        .coordinator
        .is_managed_asset_key(&harness.name("Data/Fish")));
}

#[test]
fn test_parse_managed_keys() {
    let harness = Harness::new();
    let coordinator = &harness.coordinator;

    let key = coordinator
        .try_parse_managed_asset_key("managed\\Some.Mod/assets/fish.pt-BR")
        .expect("managed key");
    assert_eq!(key.manager_id, "managed/Some.Mod");
    assert_eq!(key.relative_name.name(), "assets/fish.pt-BR");
    assert_eq!(key.relative_name.locale_code(), None);

    assert!(coordinator.try_parse_managed_asset_key("Managed/some.mod").is_none());
    assert!(coordinator.try_parse_managed_asset_key("Data/some.mod/fish").is_none());
    assert!(coordinator.try_parse_managed_asset_key("").is_none());
}

#[test]
fn test_managed_round_trip_through_main_manager() -> Result<()> {
    let harness = Harness::new();
    let (content, store) = owner_with_store(&harness, "Some.Mod")?;
    store.insert("assets/fish", String::from("trout"));

    let key = content.actual_asset_key("assets\\fish", ContentSource::ModFolder)?;
    assert_eq!(key, "Managed/some.mod/assets/fish");

    let main = harness.coordinator.main_content_manager();
    assert_eq!(main.load::<String>(&key)?.as_str(), "trout");
    assert_eq!(main.load::<String>(&key)?.as_str(), "trout");
    assert_eq!(store.requests(), vec!["assets/fish"]);
    assert_eq!(main.cached_keys(), vec![key.clone()]);

    let managed = harness
        .coordinator
        .try_parse_managed_asset_key(&key)
        .expect("managed key");
    harness.coordinator.load_managed_asset::<String>(&managed)?;
    harness.coordinator.load_managed_asset::<String>(&managed)?;
    assert_eq!(store.requests().len(), 3);
    Ok(())
}

#[test]
fn test_managed_key_in_other_language() -> Result<()> {
    let harness = Harness::new();
    let (content, store) = owner_with_store(&harness, "a")?;
    store.insert("maps/cave", String::from("cave"));
    harness.coordinator.set_language(LanguageCode::Pt, None);

    let key = content.actual_asset_key("maps/cave", ContentSource::ModFolder)?;
    let value = harness.coordinator.main_content_manager().load::<String>(&key)?;
    assert_eq!(value.as_str(), "cave");
    Ok(())
}

#[test]
fn test_unregistered_prefix() -> Result<()> {
    let harness = Harness::new();
    let error = harness
        .coordinator
        .main_content_manager()
        .load::<String>("Managed/nobody/fish")
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::UnhandledPrefix);
    Ok(())
}

#[test]
fn test_managed_asset_exists() -> Result<()> {
    let harness = Harness::new();
    let (_content, store) = owner_with_store(&harness, "a")?;
    store.insert("assets/fish", String::from("trout"));
    let coordinator = &harness.coordinator;

    let present = coordinator
        .try_parse_managed_asset_key("Managed/a/assets/fish")
        .expect("managed key");
    let missing = coordinator
        .try_parse_managed_asset_key("Managed/a/assets/eel")
        .expect("managed key");
    assert!(coordinator.does_managed_asset_exist::<String>(&present)?);
    assert!(!coordinator.does_managed_asset_exist::<String>(&missing)?);
    assert!(coordinator.does_asset_exist::<String>(&harness.name("Managed/a/assets/fish"))?);
    Ok(())
}

#[test]
fn test_mod_manager_is_namespaced() -> Result<()> {
    let harness = Harness::new();
    let (_content, store) = owner_with_store(&harness, "a")?;
    store.insert("i18n/default.pt-BR", String::from("olá"));
    harness.coordinator.set_language(LanguageCode::Pt, None);

    let manager = harness
        .coordinator
        .find_manager("MANAGED/A")
        .expect("mod manager");
    assert!(manager.is_namespaced());
    assert!(!manager.try_localize_keys());
    assert_eq!(
        manager.kind(),
        &ManagerKind::Mod {
            display_name: "Mod a".to_string()
        }
    );

    // The suffix stays part of the file name.
    let value = manager.load::<String>("i18n/default.pt-BR")?;
    assert_eq!(value.as_str(), "olá");
    assert!(manager.load::<String>("i18n/default").is_err());
    Ok(())
}
