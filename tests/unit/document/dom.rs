use super::*;

fn prim(id: &str) -> PrimitiveSpec {
    PrimitiveSpec {
        id: id.to_owned(),
        matrix: ColorMatrix::IDENTITY,
        custom: false,
    }
}

#[test]
fn loading_document_rejects_attachment() {
    let mut doc = MemoryDocument::loading();
    let err = doc.attach_container("c").unwrap_err();
    assert!(matches!(err, ColorLensError::AttachmentFailed(_)));
    doc.mark_ready();
    doc.attach_container("c").unwrap();
    assert!(doc.has_element("c"));
}

#[test]
fn container_is_created_at_most_once() {
    let mut doc = MemoryDocument::new();
    doc.attach_container("c").unwrap();
    assert!(doc.attach_container("c").is_err());
    assert_eq!(doc.node_count(), 2);
}

#[test]
fn primitives_need_an_attached_container() {
    let mut doc = MemoryDocument::new();
    assert!(doc.insert_primitive("c", &prim("p")).is_err());
    doc.attach_container("c").unwrap();
    assert!(doc.insert_primitive("other", &prim("p")).is_err());
    doc.insert_primitive("c", &prim("p")).unwrap();
    assert_eq!(doc.primitive_ids(), vec!["p"]);
    assert_eq!(doc.primitive_matrix("p"), Some(ColorMatrix::IDENTITY));
}

#[test]
fn remove_element_reports_what_happened() {
    let mut doc = MemoryDocument::new();
    assert!(!doc.remove_element("p"));
    doc.attach_container("c").unwrap();
    doc.insert_primitive("c", &prim("p")).unwrap();
    assert!(doc.remove_element("p"));
    assert!(!doc.remove_element("p"));
    assert!(doc.remove_element("c"));
    assert_eq!(doc.node_count(), 0);
}

#[test]
fn root_filter_writes_are_counted_only_on_change() {
    let mut doc = MemoryDocument::new();
    doc.set_root_filter("contrast(120%)");
    doc.set_root_filter("contrast(120%)");
    assert_eq!(doc.root_filter(), "contrast(120%)");
    assert_eq!(doc.mutations(), 1);
}

#[test]
fn markup_nests_filters_inside_hidden_defs() {
    let mut doc = MemoryDocument::new();
    assert_eq!(doc.container_markup().unwrap(), "");
    doc.attach_container("colorlens-svg-filters").unwrap();
    doc.insert_primitive("colorlens-svg-filters", &prim("a\"b"))
        .unwrap();
    let svg = doc.container_markup().unwrap();
    assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" id="colorlens-svg-filters""#));
    assert!(svg.contains(r#"style="display:none"><defs><filter id="a&quot;b""#));
    assert!(svg.contains(r#"values="1 0 0 0 0 0 1 0 0 0 0 0 1 0 0 0 0 0 1 0""#));
    assert!(svg.ends_with("</filter></defs></svg>"));
}

#[test]
fn markup_escapes_attribute_values() {
    let mut doc = MemoryDocument::new();
    doc.attach_container("c&<x>").unwrap();
    doc.insert_primitive("c&<x>", &prim("p")).unwrap();
    let svg = doc.container_markup().unwrap();
    assert!(svg.contains(r#"id="c&amp;&lt;x&gt;""#));
    assert!(svg.contains(r#"<feColorMatrix in="SourceGraphic" type="matrix" values="#));
    assert!(!svg.contains("c&<x>"));
}
