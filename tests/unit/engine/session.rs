use super::*;
use crate::{
    document::dom::MemoryDocument,
    filters::catalog::FilterId,
    foundation::core::HexColor,
    settings::record::CustomColors,
};

fn with_custom(bg: HexColor) -> SettingsRecord {
    SettingsRecord {
        filter_id: FilterId::Protanopia,
        custom_colors: Some(CustomColors {
            background: bg,
            ..CustomColors::default()
        }),
        ..SettingsRecord::default()
    }
}

#[test]
fn rapid_edits_converge_to_the_last_submission() {
    let mut s = DocumentSession::new(MemoryDocument::new());
    for shade in [0x10, 0x20, 0x30] {
        s.submit(with_custom(HexColor::rgb(shade, 0, 0)));
    }
    let report = s.flush().unwrap();
    assert!(report.changed);
    assert_eq!(
        s.document().primitive_matrix(CUSTOM_PRIMITIVE_ID),
        compose_with(&with_custom(HexColor::rgb(0x30, 0, 0)), CUSTOM_PRIMITIVE_ID)
            .requires_primitive
            .map(|p| p.matrix)
    );
    assert_eq!(
        s.document().root_filter(),
        "url(#colorlens-custom-mapping) url(#protanopia)"
    );
    assert!(s.pending().is_none());
}

#[test]
fn unchanged_composition_skips_document_writes() {
    let mut s = DocumentSession::new(MemoryDocument::new());
    let r = with_custom(HexColor::rgb(1, 2, 3));
    s.apply(r.clone()).unwrap();
    let mutations = s.document().mutations();
    let snapshot = s.document().clone();

    let tagged = SettingsRecord {
        active_profile_name: Some("Work".into()),
        ..r
    };
    let report = s.apply(tagged).unwrap();
    assert!(!report.changed);
    assert_eq!(s.document(), &snapshot);
    assert_eq!(s.document().mutations(), mutations);
    assert_eq!(
        s.current().unwrap().active_profile_name.as_deref(),
        Some("Work")
    );
}

#[test]
fn attachment_failure_keeps_the_record_for_retry() {
    let mut s = DocumentSession::new(MemoryDocument::loading());
    let err = s.apply(with_custom(HexColor::RED)).unwrap_err();
    assert!(err.is_retryable());
    assert!(s.pending().is_some());
    assert_eq!(s.css_filter(), "");

    s.document_mut().mark_ready();
    let report = s.flush().unwrap();
    assert!(report.changed);
    assert!(report.reconcile.unwrap().container_created);
    assert!(s.pending().is_none());
    assert_eq!(s.document().node_count(), 4);
}

#[test]
fn flush_without_pending_is_a_noop() {
    let mut s = DocumentSession::new(MemoryDocument::new());
    let report = s.flush().unwrap();
    assert_eq!(report, FlushReport::default());
    assert_eq!(s.document().node_count(), 0);
}

#[test]
fn clearing_custom_colors_removes_the_stale_primitive() {
    let mut s = DocumentSession::new(MemoryDocument::new());
    s.apply(with_custom(HexColor::rgb(9, 9, 9))).unwrap();
    let report = s
        .apply(SettingsRecord {
            filter_id: FilterId::Protanopia,
            contrast: 120.0,
            ..SettingsRecord::default()
        })
        .unwrap();
    assert_eq!(
        report.reconcile.unwrap().removed,
        vec![CUSTOM_PRIMITIVE_ID]
    );
    assert_eq!(s.css_filter(), "url(#protanopia) contrast(120%)");
    assert_eq!(s.document().primitive_ids(), vec!["protanopia"]);
}

#[test]
fn custom_opts_flow_into_ids() {
    let opts = EngineOpts {
        container_id: "host-svg".into(),
        custom_primitive_id: "host-custom".into(),
    };
    let mut s = DocumentSession::with_opts(MemoryDocument::new(), opts.clone());
    s.apply(with_custom(HexColor::BLUE)).unwrap();
    assert!(s.document().has_element("host-svg"));
    assert!(s.document().has_element("host-custom"));
    assert!(s.css_filter().starts_with("url(#host-custom)"));
    assert_eq!(s.opts(), &opts);
}

#[test]
fn identical_apply_rebuilds_a_container_the_host_dropped() {
    let mut s = DocumentSession::new(MemoryDocument::new());
    let r = SettingsRecord {
        filter_id: FilterId::Protanopia,
        ..SettingsRecord::default()
    };
    s.apply(r.clone()).unwrap();
    assert!(s.document_mut().remove_element(CONTAINER_ID));
    assert!(!s.document().has_element("protanopia"));

    let report = s.apply(r).unwrap();
    assert!(report.changed);
    let reconcile = report.reconcile.unwrap();
    assert!(reconcile.container_created);
    assert_eq!(reconcile.inserted, vec!["protanopia"]);
    assert!(s.document().has_element(CONTAINER_ID));
    assert_eq!(s.document().primitive_ids(), vec!["protanopia"]);
    assert_eq!(s.document().root_filter(), "url(#protanopia)");
}
