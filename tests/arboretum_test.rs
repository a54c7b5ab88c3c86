use encyclopedia::{Arboretum, Encyclopedia, EncyclopediaError, Forest};

type Styles = Arboretum<&'static str, String>;

/// Document
/// ├── Section 1
/// │   └── Section 1.1
/// └── Section 2
fn styled_document() -> Styles {
    let mut doc = Styles::new();
    doc.set("Document", "Section 1").unwrap();
    doc.set("Section 1", "Section 1.1").unwrap();
    doc.set_attribute(&"Section 1", "font", "Helvetica".to_string())
        .unwrap();
    doc.set("Document", "Section 2").unwrap();
    doc.set("Section 1.1", "Section 1.1.1").unwrap();
    doc
}

#[test]
fn test_inheritance_is_resolved_at_lookup() {
    let doc = styled_document();
    assert_eq!(
        doc.get_attribute(&"Section 1.1.1", "font").map(String::as_str),
        Some("Helvetica")
    );
    assert_eq!(doc.get_attribute(&"Section 2", "font"), None);
}

#[test]
fn test_root_attribute_reaches_every_branch() {
    let mut doc = styled_document();
    doc.set_attribute(&"Document", "font", "Times".to_string())
        .unwrap();
    doc.set("Section 2", "Appendix").unwrap();

    assert_eq!(
        doc.get_attribute(&"Appendix", "font").map(String::as_str),
        Some("Times")
    );
    assert_eq!(
        doc.get_attribute(&"Section 1.1", "font").map(String::as_str),
        Some("Helvetica")
    );
}

#[test]
fn test_attribute_on_shared_label() {
    let mut doc = Styles::new();
    doc.set("Book", "Chapter").unwrap();
    doc.set("Book", "Chapter").unwrap();
    assert_eq!(
        doc.set_attribute(&"Chapter", "numbered", "yes".to_string())
            .unwrap(),
        2
    );
    for chapter in doc.nodes_labeled(&"Chapter") {
        assert_eq!(
            doc.attribute_of(chapter, "numbered").map(String::as_str),
            Some("yes")
        );
    }
    assert_eq!(doc.clear_attribute(&"Chapter", "numbered").unwrap(), 2);
    assert!(doc.overlay().is_empty());
}

#[test]
fn test_merge_and_compose_carry_attributes() {
    let mut doc = styled_document();
    let mut notes = Styles::new();
    notes.set("Section 2", "Note").unwrap();
    notes
        .set_attribute(&"Note", "color", "grey".to_string())
        .unwrap();

    let composed = &doc * &notes;
    assert_eq!(
        composed.get_attribute(&"Note", "color").map(String::as_str),
        Some("grey")
    );
    assert!(!doc.contains_key(&"Note"));

    doc.merge(&notes).unwrap();
    assert_eq!(doc.tree_count(), 2);
    let note = doc.nodes_labeled(&"Note")[0];
    assert!(!notes.contains_node(note));
    assert_eq!(doc.attribute_of(note, "color").map(String::as_str), Some("grey"));
}

#[test]
fn test_plain_forest_graft_and_prune() {
    let mut doc = styled_document();
    let mut extra = Forest::new();
    extra.set("Table", "Row").unwrap();

    doc.graft_forest(&"Section 1.1.1", &extra).unwrap();
    assert_eq!(
        doc.get_attribute(&"Row", "font").map(String::as_str),
        Some("Helvetica")
    );

    doc.delete(&"Section 1").unwrap();
    assert!(doc.overlay().is_empty());
    assert_eq!(doc.get_attribute(&"Row", "font"), None);
    assert_eq!(doc.keys(), vec!["Document", "Section 2"]);
}

#[test]
fn test_frozen_arboretum() {
    let doc = styled_document().freeze();
    let mut frozen = doc.clone();
    assert_eq!(
        frozen.clear_attribute(&"Section 1", "font"),
        Err(EncyclopediaError::Frozen)
    );
    assert_eq!(frozen.set("Document", "Index"), Err(EncyclopediaError::Frozen));

    let copy = (&doc + &Styles::new()).unwrap();
    assert!(!copy.is_frozen());
    assert_eq!(copy.overlay().len(), 1);
}

#[test]
fn test_into_forest_drops_attributes() {
    let doc = styled_document();
    let forest = doc.clone().into_forest();
    assert_eq!(&forest, doc.forest());
    assert_eq!(Styles::from_forest(forest).overlay().len(), 0);
}
