use assert_fs::prelude::*;
use campus_nav::{
    directory::campus_buildings,
    favorites::{FavoritesStore, FileStore, KeyValueStore, MemoryStore, FAVORITES_KEY},
};

#[test]
fn double_toggle_restores_state_and_storage() {
    let mut favs = FavoritesStore::load(MemoryStore::new());
    favs.toggle("1").unwrap();
    let ids_before = favs.ids().to_vec();
    let stored_before = favs.storage().get(FAVORITES_KEY).unwrap();

    assert!(favs.toggle("4").unwrap());
    assert!(favs.is_favorite("4"));
    assert!(!favs.toggle("4").unwrap());

    assert_eq!(favs.ids(), ids_before.as_slice());
    assert_eq!(favs.storage().get(FAVORITES_KEY).unwrap(), stored_before);
}

#[test]
fn file_store_survives_reload() {
    let dir = assert_fs::TempDir::new().unwrap();
    {
        let mut favs = FavoritesStore::load(FileStore::in_dir(dir.path()));
        favs.toggle("2").unwrap();
        favs.toggle("7").unwrap();
    }
    dir.child("storage.json").assert(predicates::str::contains(FAVORITES_KEY));

    let favs = FavoritesStore::load(FileStore::in_dir(dir.path()));
    assert!(favs.is_favorite("2"));
    assert!(favs.is_favorite("7"));
    let names: Vec<_> = favs
        .favorite_buildings(campus_buildings())
        .iter()
        .map(|b| b.code.as_str())
        .collect();
    assert_eq!(names, ["STC", "ADM"]);
    dir.close().unwrap();
}

#[test]
fn corrupt_file_loads_empty() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("storage.json").write_str("not json at all").unwrap();
    let favs = FavoritesStore::load(FileStore::in_dir(dir.path()));
    assert!(favs.is_empty());
}

#[test]
fn unknown_ids_can_be_pruned() {
    let mut store = MemoryStore::new();
    store.set(FAVORITES_KEY, r#"["1","ghost","3"]"#).unwrap();
    let mut favs = FavoritesStore::load(store);
    assert_eq!(favs.retain_known(campus_buildings()).unwrap(), 1);
    assert_eq!(favs.ids(), ["1", "3"]);
    assert_eq!(
        favs.storage().get(FAVORITES_KEY).unwrap().as_deref(),
        Some(r#"["1","3"]"#)
    );
}

#[test]
fn file_store_creates_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");
    let mut store = FileStore::in_dir(&nested);
    store.set("k", "v").unwrap();
    assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
}

#[test]
fn corrupt_file_is_backed_up_before_overwrite() {
    let dir = assert_fs::TempDir::new().unwrap();
    let storage = dir.child("storage.json");
    storage.write_str(r#"{"other":"keep", broken"#).unwrap();

    let mut favs = FavoritesStore::load(FileStore::in_dir(dir.path()));
    assert!(favs.toggle("1").unwrap());

    dir.child("storage.json.bak")
        .assert(predicates::str::contains(r#""other":"keep""#));
    storage.assert(predicates::str::contains("campus-favorites"));
    let reloaded = FavoritesStore::load(FileStore::in_dir(dir.path()));
    assert_eq!(reloaded.ids(), ["1"]);
    dir.close().unwrap();
}
