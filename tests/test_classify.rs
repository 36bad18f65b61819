//! Field classification across the shapes real producers emit.

use acroform_oxide::{
    classify, ButtonFieldFlags, ChoiceFieldFlags, Dict, Document, Field, FieldKind, Object,
    ObjectRef, Rect, Widget,
};

fn add_field(doc: &mut Document, ft: Option<&str>, flags: Option<u32>) -> ObjectRef {
    let mut dict = Dict::new();
    dict.insert("T".to_string(), Object::from_text("Field1"));
    if let Some(ft) = ft {
        dict.insert("FT".to_string(), Object::Name(ft.to_string()));
    }
    if let Some(bits) = flags {
        dict.insert("Ff".to_string(), Object::Integer(bits as i64));
    }
    doc.add_object(Object::Dictionary(dict))
}

fn add_toggle_widget(doc: &mut Document, field: ObjectRef, on_name: &str) {
    let widget = Widget::create(doc, Rect::new(0.0, 0.0, 16.0, 16.0));
    let off = doc.add_object(Object::Stream {
        dict: Dict::new(),
        data: bytes::Bytes::new(),
    });
    let on = doc.add_object(Object::Stream {
        dict: Dict::new(),
        data: bytes::Bytes::new(),
    });
    widget.set_normal_appearance(doc, "Off", off).unwrap();
    widget.set_normal_appearance(doc, on_name, on).unwrap();
    doc.dict_set(widget.dict_ref(), "Parent", Object::Reference(field))
        .unwrap();
    let kids = doc
        .dict_mut(field)
        .unwrap()
        .entry("Kids".to_string())
        .or_insert_with(|| Object::Array(Vec::new()));
    kids.as_array_mut()
        .unwrap()
        .push(Object::Reference(widget.dict_ref()));
}

#[test]
fn test_ft_dispatch_matrix() {
    let mut doc = Document::new();

    let cases = [
        (Some("Tx"), None, FieldKind::Text),
        (Some("Sig"), None, FieldKind::Signature),
        (None, None, FieldKind::Generic),
        (
            Some("Ch"),
            Some(ChoiceFieldFlags::COMBO.bits()),
            FieldKind::ComboBox,
        ),
        (Some("Ch"), None, FieldKind::ListBox),
        (
            Some("Btn"),
            Some(ButtonFieldFlags::PUSHBUTTON.bits()),
            FieldKind::PushButton,
        ),
        (
            Some("Btn"),
            Some(ButtonFieldFlags::RADIO.bits()),
            FieldKind::RadioButton,
        ),
        (Some("Btn"), None, FieldKind::CheckBox),
    ];
    for (ft, flags, expected) in cases {
        let r = add_field(&mut doc, ft, flags);
        assert_eq!(
            classify(&doc, r).unwrap().kind(),
            expected,
            "FT {:?} flags {:?}",
            ft,
            flags
        );
    }
}

#[test]
fn test_unflagged_button_with_distinct_widget_names_is_radio() {
    let mut doc = Document::new();
    let field = add_field(&mut doc, Some("Btn"), None);
    add_toggle_widget(&mut doc, field, "Small");
    add_toggle_widget(&mut doc, field, "Large");

    assert_eq!(
        classify(&doc, field).unwrap().kind(),
        FieldKind::RadioButton
    );
}

#[test]
fn test_unflagged_button_with_duplicate_widget_names_is_checkbox() {
    let mut doc = Document::new();
    let field = add_field(&mut doc, Some("Btn"), None);
    add_toggle_widget(&mut doc, field, "Yes");
    add_toggle_widget(&mut doc, field, "Yes");
    add_toggle_widget(&mut doc, field, "Yes");

    assert_eq!(classify(&doc, field).unwrap().kind(), FieldKind::CheckBox);
}

#[test]
fn test_single_widget_button_is_checkbox() {
    let mut doc = Document::new();
    let field = add_field(&mut doc, Some("Btn"), None);
    add_toggle_widget(&mut doc, field, "Yes");

    assert_eq!(classify(&doc, field).unwrap().kind(), FieldKind::CheckBox);
}

#[test]
fn test_explicit_radio_flag_beats_widget_shape() {
    // One widget only, but the flag says radio.
    let mut doc = Document::new();
    let field = add_field(&mut doc, Some("Btn"), Some(ButtonFieldFlags::RADIO.bits()));
    add_toggle_widget(&mut doc, field, "On");

    assert_eq!(
        classify(&doc, field).unwrap().kind(),
        FieldKind::RadioButton
    );
}

#[test]
fn test_inherited_ft_and_flags() {
    let mut doc = Document::new();
    let parent = add_field(
        &mut doc,
        Some("Ch"),
        Some(ChoiceFieldFlags::COMBO.bits()),
    );
    let mut kid = Dict::new();
    kid.insert("T".to_string(), Object::from_text("Kid"));
    kid.insert("Parent".to_string(), Object::Reference(parent));
    let kid = doc.add_object(Object::Dictionary(kid));

    assert_eq!(classify(&doc, kid).unwrap().kind(), FieldKind::ComboBox);
}

#[test]
fn test_merged_field_widget_dict_classifies() {
    let mut doc = Document::new();
    let mut dict = Dict::new();
    dict.insert("T".to_string(), Object::from_text("Agree"));
    dict.insert("FT".to_string(), Object::Name("Btn".to_string()));
    dict.insert("Subtype".to_string(), Object::Name("Widget".to_string()));
    dict.insert(
        "Rect".to_string(),
        Rect::new(10.0, 10.0, 16.0, 16.0).to_array(),
    );
    let r = doc.add_object(Object::Dictionary(dict));

    let field = classify(&doc, r).unwrap();
    assert_eq!(field.kind(), FieldKind::CheckBox);

    // The merged dict is its own (single) widget.
    let mut node = field.node().clone();
    assert_eq!(node.widgets(&doc).unwrap().len(), 1);
}

#[test]
fn test_classification_stable_across_reruns() {
    let mut doc = Document::new();
    let field = add_field(&mut doc, Some("Btn"), None);
    add_toggle_widget(&mut doc, field, "Red");
    add_toggle_widget(&mut doc, field, "Blue");

    let kinds: Vec<FieldKind> = (0..3)
        .map(|_| classify(&doc, field).unwrap().kind())
        .collect();
    assert!(kinds.iter().all(|k| *k == FieldKind::RadioButton));
}

#[test]
fn test_field_enum_exposes_shared_node() {
    let mut doc = Document::new();
    let r = add_field(&mut doc, Some("Tx"), None);
    let field = classify(&doc, r).unwrap();
    match &field {
        Field::Text(text) => assert_eq!(text.dict_ref(), r),
        other => panic!("expected text field, got {:?}", other.kind()),
    }
    assert_eq!(field.fully_qualified_name(&doc), "Field1");
}
