use super::*;
use crate::{filters::catalog::FilterId, storage::kv::MemoryStore};
use serde_json::json;

#[test]
fn absent_settings_load_as_defaults() {
    let store = MemoryStore::new();
    let (record, report) = load_settings(&store).unwrap();
    assert_eq!(record, SettingsRecord::default());
    assert!(report.is_current());
}

#[test]
fn saved_settings_are_versioned_and_reload_identically() {
    let mut store = MemoryStore::new();
    let record = SettingsRecord {
        filter_id: FilterId::Tritanopia,
        contrast: 75.0,
        night_vision: true,
        ..SettingsRecord::default()
    };
    save_settings(&mut store, &record).unwrap();
    save_settings(&mut store, &record).unwrap();

    let raw = store.get(SETTINGS_KEY).unwrap().unwrap();
    assert_eq!(raw["schemaVersion"], json!(2));
    assert_eq!(load_settings(&store).unwrap().0, record);
}

#[test]
fn legacy_settings_are_upgraded_on_load() {
    let mut store = MemoryStore::new();
    store
        .set(
            SETTINGS_KEY,
            json!({ "filter": "Deuteranopia", "contrast": 90, "readingMode": true }),
        )
        .unwrap();
    let (record, report) = load_settings(&store).unwrap();
    assert_eq!(record.filter_id, FilterId::Deuteranopia);
    assert_eq!(report.from_version, 0);
    assert_eq!(report.discarded_fields, vec!["readingMode"]);
}

#[test]
fn profiles_round_trip_in_insertion_order() {
    let mut store = MemoryStore::new();
    let mut profiles = ProfileStore::new();
    profiles.save("Zeta", SettingsRecord::default()).unwrap();
    profiles.save("Alpha", SettingsRecord::default()).unwrap();
    save_profiles(&mut store, &profiles).unwrap();

    let loaded = load_profiles(&store).unwrap();
    assert_eq!(loaded, profiles);
}

#[test]
fn mixed_and_broken_profile_entries_are_tolerated() {
    let mut store = MemoryStore::new();
    store
        .set(
            PROFILES_KEY,
            json!([
                { "name": "Old", "baseFilter": "protanopia", "contrast": "110" },
                42,
                { "name": "Old", "baseFilter": "tritanopia" },
                {
                    "name": "New",
                    "settings": {
                        "filterId": "achromatopsia", "contrast": 100.0, "saturation": 100.0,
                        "nightVision": false, "customColors": null, "activeProfileName": null
                    },
                    "savedAt": "2025-03-01T00:00:00Z"
                }
            ]),
        )
        .unwrap();
    let loaded = load_profiles(&store).unwrap();
    let names: Vec<_> = loaded.list().into_iter().map(|p| p.name).collect();
    assert_eq!(names, ["Old", "New"]);
    assert_eq!(
        loaded.get("Old").unwrap().settings.filter_id,
        FilterId::Protanopia
    );
}

#[test]
fn non_array_profile_value_is_a_storage_error() {
    let mut store = MemoryStore::new();
    store.set(PROFILES_KEY, json!({ "name": "x" })).unwrap();
    assert!(matches!(
        load_profiles(&store).unwrap_err(),
        ColorLensError::Storage(_)
    ));
}
