use super::*;
use crate::{filters::catalog::FilterId, foundation::core::HexColor};
use serde_json::json;

#[test]
fn empty_object_is_v0_with_defaults() {
    let (record, report) = upgrade_settings(&json!({})).unwrap();
    assert_eq!(record, SettingsRecord::default());
    assert_eq!(report.from_version, 0);
    assert!(report.discarded_fields.is_empty());
}

#[test]
fn v0_popup_layout_is_upgraded_and_reading_mode_reported() {
    let legacy = json!({
        "filter": "Protanopia",
        "contrast": "130",
        "saturation": 80,
        "readingMode": true,
        "nightVision": false,
        "customColors": { "background": "#101010", "text": "#fafafa" }
    });
    let (record, report) = upgrade_settings(&legacy).unwrap();
    assert_eq!(record.filter_id, FilterId::Protanopia);
    assert_eq!(record.contrast, 130.0);
    assert_eq!(record.saturation, 80.0);
    // Partial custom colors mean no mapping at all.
    assert_eq!(record.custom_colors, None);
    assert_eq!(report.from_version, 0);
    assert_eq!(report.discarded_fields, vec!["readingMode"]);
    assert!(!report.is_current());
}

#[test]
fn v0_legacy_alias_resolves_to_achromatopsia() {
    let (record, _) = upgrade_settings(&json!({ "filter": "Monocromia" })).unwrap();
    assert_eq!(record.filter_id, FilterId::Achromatopsia);
}

#[test]
fn v1_layout_is_detected_by_filter_id() {
    let legacy = json!({
        "filterId": "tritanomaly",
        "contrast": 20,
        "readingMode": false,
        "theme": "dark"
    });
    let (record, report) = upgrade_settings(&legacy).unwrap();
    assert_eq!(report.from_version, 1);
    assert_eq!(record.filter_id, FilterId::Tritanomaly);
    assert_eq!(record.contrast, 50.0);
    let mut discarded = report.discarded_fields.clone();
    discarded.sort();
    assert_eq!(discarded, vec!["readingMode", "theme"]);
}

#[test]
fn current_envelope_round_trips_losslessly() {
    let record = SettingsRecord {
        filter_id: FilterId::Deuteranopia,
        contrast: 150.0,
        saturation: 40.0,
        night_vision: true,
        custom_colors: Some(crate::settings::record::CustomColors {
            background: HexColor::rgb(1, 2, 3),
            text: HexColor::GREEN,
            highlight: HexColor::BLUE,
        }),
        active_profile_name: Some("Evening".into()),
    };
    let value = serde_json::to_value(StoredSettings::current(record.clone())).unwrap();
    assert_eq!(value["schemaVersion"], json!(2));
    assert_eq!(value["settings"]["filterId"], json!("deuteranopia"));

    let (back, report) = upgrade_settings(&value).unwrap();
    assert_eq!(back, record);
    assert!(report.is_current());
}

#[test]
fn unknown_future_versions_and_non_objects_are_rejected() {
    let err = upgrade_settings(&json!({ "schemaVersion": 9, "settings": {} })).unwrap_err();
    assert!(matches!(err, ColorLensError::Validation(_)));
    assert!(upgrade_settings(&json!([1, 2])).is_err());
    assert!(upgrade_settings(&json!({ "schemaVersion": "two" })).is_err());
}

#[test]
fn legacy_profile_maps_enabled_color_map() {
    let legacy = json!({
        "name": "Leitura",
        "baseFilter": "deuteranomaly",
        "contrast": "250",
        "saturation": "90",
        "colorMap": { "red": "#000000", "green": "#ffffff", "blue": "#ffff00", "enabled": true },
        "savedAt": "2024-05-01T12:00:00.000Z"
    });
    let p = upgrade_profile(&legacy).unwrap();
    assert_eq!(p.name, "Leitura");
    assert_eq!(p.settings.filter_id, FilterId::Deuteranomaly);
    assert_eq!(p.settings.contrast, 200.0);
    assert_eq!(p.settings.saturation, 90.0);
    let c = p.settings.custom_colors.unwrap();
    assert_eq!(c.background, HexColor::rgb(0, 0, 0));
    assert_eq!(c.highlight, HexColor::rgb(0xff, 0xff, 0));
    assert_eq!(p.saved_at.to_rfc3339(), "2024-05-01T12:00:00+00:00");
}

#[test]
fn legacy_profile_ignores_disabled_or_invalid_color_map() {
    let disabled = json!({
        "name": "A",
        "colorMap": { "red": "#000000", "green": "#ffffff", "blue": "#ffff00", "enabled": false }
    });
    let p = upgrade_profile(&disabled).unwrap();
    assert_eq!(p.settings.custom_colors, None);
    assert_eq!(p.settings.filter_id, FilterId::None);
    assert_eq!(p.saved_at.timestamp(), 0);

    let invalid = json!({
        "name": "B",
        "colorMap": { "red": "nope", "green": "#ffffff", "blue": "#ffff00", "enabled": true }
    });
    assert_eq!(upgrade_profile(&invalid).unwrap().settings.custom_colors, None);
}

#[test]
fn current_profile_shape_is_read_directly() {
    let value = json!({
        "name": "Now",
        "settings": {
            "filterId": "protanopia",
            "contrast": 120.0,
            "saturation": 100.0,
            "nightVision": false,
            "customColors": null,
            "activeProfileName": null
        },
        "savedAt": "2025-01-02T03:04:05Z"
    });
    let p = upgrade_profile(&value).unwrap();
    assert_eq!(p.settings.filter_id, FilterId::Protanopia);
    assert_eq!(p.settings.contrast, 120.0);
}

#[test]
fn current_envelope_with_bad_custom_colors_keeps_the_rest() {
    let malformed = json!({
        "schemaVersion": 2,
        "settings": {
            "filterId": "protanopia",
            "contrast": 130,
            "saturation": 100,
            "nightVision": true,
            "customColors": { "background": "#zzzzzz", "text": "#ffffff", "highlight": "#000000" },
            "activeProfileName": null
        }
    });
    let (record, report) = upgrade_settings(&malformed).unwrap();
    assert_eq!(record.filter_id, FilterId::Protanopia);
    assert_eq!(record.contrast, 130.0);
    assert!(record.night_vision);
    assert_eq!(record.custom_colors, None);
    assert_eq!(report.from_version, 2);
    assert_eq!(report.discarded_fields, vec!["settings.customColors"]);
    assert!(!report.is_current());

    let partial = json!({
        "schemaVersion": 2,
        "settings": {
            "filterId": "protanopia",
            "customColors": { "background": "#101010" }
        }
    });
    let (record, report) = upgrade_settings(&partial).unwrap();
    assert_eq!(record.filter_id, FilterId::Protanopia);
    assert_eq!(record.custom_colors, None);
    assert_eq!(report.discarded_fields, vec!["settings.customColors"]);
}

#[test]
fn current_profile_with_partial_custom_colors_is_kept() {
    let value = json!({
        "name": "Half",
        "settings": {
            "filterId": "tritanopia",
            "customColors": { "background": "#101010", "text": "#fafafa" }
        },
        "savedAt": "2025-01-02T03:04:05Z"
    });
    let p = upgrade_profile(&value).unwrap();
    assert_eq!(p.name, "Half");
    assert_eq!(p.settings.filter_id, FilterId::Tritanopia);
    assert_eq!(p.settings.custom_colors, None);
}
