use super::*;
use crate::{document::dom::MemoryDocument, filters::catalog::FilterId};
use serde_json::json;

#[test]
fn apply_settings_merges_over_defaults_and_echoes_the_record() {
    let mut s = DocumentSession::new(MemoryDocument::new());
    let out = s.handle_json(&json!({
        "action": "applySettings",
        "settings": { "filterId": "deuteranopia", "saturation": "150" }
    }));
    assert_eq!(out.status, Status::Ok);
    assert_eq!(
        out.css_filter.as_deref(),
        Some("url(#deuteranopia) saturate(150%)")
    );
    let settings = out.settings.unwrap();
    assert_eq!(settings.filter_id, FilterId::Deuteranopia);
    assert_eq!(settings.contrast, 100.0);
    assert!(!settings.night_vision);
}

#[test]
fn legacy_action_names_are_accepted() {
    let mut s = DocumentSession::new(MemoryDocument::new());
    let out = s.handle_json(&json!({
        "action": "injectAndApplySettings",
        "settings": { "filter": "Monocromia", "nightVision": true }
    }));
    assert_eq!(out.status, Status::Ok);
    assert_eq!(
        out.css_filter.as_deref(),
        Some("grayscale(100%) brightness(80%) sepia(20%)")
    );
}

#[test]
fn invalid_custom_colors_fall_back_to_no_mapping() {
    let mut s = DocumentSession::new(MemoryDocument::new());
    let out = s.handle_message(Action::ApplySettings {
        settings: SettingsDraft {
            custom_colors: Some(crate::settings::record::RawCustomColors {
                background: Some("#12345".into()),
                text: Some("#ffffff".into()),
                highlight: Some("#000000".into()),
            }),
            ..SettingsDraft::default()
        },
    });
    assert_eq!(out.status, Status::Ok);
    assert_eq!(out.css_filter.as_deref(), Some(""));
    assert_eq!(out.settings.unwrap().custom_colors, None);
}

#[test]
fn not_ready_document_reports_pending() {
    let mut s = DocumentSession::new(MemoryDocument::loading());
    let out = s.handle_json(&json!({ "action": "applySettings", "settings": {} }));
    assert_eq!(out.status, Status::Pending);
    assert!(out.error.is_some());
    assert!(s.pending().is_some());
}

#[test]
fn ping_and_garbage() {
    let mut s = DocumentSession::new(MemoryDocument::new());
    let pong = serde_json::to_value(s.handle_json(&json!({ "action": "ping" }))).unwrap();
    assert_eq!(pong, json!({ "status": "ok" }));

    let out = s.handle_json(&json!({ "action": "selfDestruct" }));
    assert_eq!(out.status, Status::Error);
    assert!(out.error.is_some());
}
