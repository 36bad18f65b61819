//! Appearance synthesis observed through the object store.

use acroform_oxide::{
    AcroForm, CheckBoxField, ChoiceOption, Document, ListBoxField, Object, ObjectRef, Rect,
    TextAlignment, TextField, TextFieldFlags, Widget,
};

fn setup(doc: &mut Document) -> (AcroForm, ObjectRef) {
    let form = AcroForm::create(doc).unwrap();
    let page = doc.add_page(612.0, 792.0);
    (form, page)
}

fn normal_appearance_bytes(doc: &Document, widget: ObjectRef) -> String {
    let ap = doc.dict_get(widget, "AP").expect("widget has /AP");
    let n = ap.as_dict().unwrap().get("N").unwrap();
    match doc.resolve(n).unwrap() {
        Object::Stream { data, .. } => String::from_utf8_lossy(&data).to_string(),
        other => panic!("expected stream, got {:?}", other.type_name()),
    }
}

fn state_appearance_bytes(doc: &Document, widget: ObjectRef, state: &str) -> String {
    let ap = doc.dict_get(widget, "AP").expect("widget has /AP");
    let states = ap.as_dict().unwrap().get("N").unwrap().as_dict().unwrap();
    match doc.resolve(states.get(state).unwrap()).unwrap() {
        Object::Stream { data, .. } => String::from_utf8_lossy(&data).to_string(),
        other => panic!("expected stream, got {:?}", other.type_name()),
    }
}

#[test]
fn test_text_appearance_contains_value_and_marked_content() {
    let mut doc = Document::new();
    let (form, page) = setup(&mut doc);
    let field =
        TextField::create(&mut doc, "Name", page, Rect::new(72.0, 700.0, 200.0, 20.0)).unwrap();
    field.set_value(&mut doc, "Ada (Countess)").unwrap();
    form.add_field(&mut doc, field.dict_ref()).unwrap();

    form.regenerate_appearances(&mut doc).unwrap();

    let ops = normal_appearance_bytes(&doc, field.dict_ref());
    assert!(ops.contains("/Tx BMC"));
    assert!(ops.contains("EMC"));
    assert!(ops.contains("(Ada \\(Countess\\)) Tj"));
}

#[test]
fn test_checkbox_two_state_synthesis() {
    let mut doc = Document::new();
    let (form, page) = setup(&mut doc);
    let mut field =
        CheckBoxField::create(&mut doc, "Agree", page, Rect::new(72.0, 700.0, 16.0, 16.0))
            .unwrap();
    field.set_checked(&mut doc, true).unwrap();
    form.add_field(&mut doc, field.dict_ref()).unwrap();

    form.regenerate_appearances(&mut doc).unwrap();

    let off = state_appearance_bytes(&doc, field.dict_ref(), "Off");
    let on = state_appearance_bytes(&doc, field.dict_ref(), "Yes");
    assert!(off.contains("re S"));
    assert!(!off.contains("1 J"));
    assert!(on.contains("1 J"));

    assert_eq!(
        doc.dict_get(field.dict_ref(), "AS").unwrap().as_name(),
        Some("Yes")
    );
}

#[test]
fn test_existing_checkbox_appearance_only_toggles_state() {
    let mut doc = Document::new();
    let (form, page) = setup(&mut doc);
    let mut field =
        CheckBoxField::create(&mut doc, "Keep", page, Rect::new(72.0, 700.0, 16.0, 16.0)).unwrap();
    form.add_field(&mut doc, field.dict_ref()).unwrap();

    // Hand-made appearance from some other producer.
    let custom = doc.add_object(Object::Stream {
        dict: acroform_oxide::Dict::new(),
        data: bytes::Bytes::from_static(b"% custom"),
    });
    let widget = Widget::from_dict(&doc, field.dict_ref()).unwrap();
    widget.set_normal_appearance(&mut doc, "Off", custom).unwrap();
    widget.set_normal_appearance(&mut doc, "Yes", custom).unwrap();

    field.set_checked(&mut doc, true).unwrap();
    form.regenerate_appearances(&mut doc).unwrap();

    // Producer's streams survive untouched.
    assert_eq!(
        state_appearance_bytes(&doc, field.dict_ref(), "Yes"),
        "% custom"
    );
    assert_eq!(
        doc.dict_get(field.dict_ref(), "AS").unwrap().as_name(),
        Some("Yes")
    );
}

#[test]
fn test_comb_field_positions_each_character() {
    let mut doc = Document::new();
    let (form, page) = setup(&mut doc);
    let field =
        TextField::create(&mut doc, "Code", page, Rect::new(72.0, 650.0, 120.0, 20.0)).unwrap();
    field.set_text_flags(&mut doc, TextFieldFlags::COMB).unwrap();
    field.set_max_len(&mut doc, 6).unwrap();
    field.set_value(&mut doc, "42").unwrap();
    form.add_field(&mut doc, field.dict_ref()).unwrap();

    form.regenerate_appearances(&mut doc).unwrap();

    let ops = normal_appearance_bytes(&doc, field.dict_ref());
    assert_eq!(ops.matches(" Tj").count(), 2);
    assert!(ops.contains("(4) Tj"));
    assert!(ops.contains("(2) Tj"));
}

#[test]
fn test_max_len_truncates_rendered_value() {
    let mut doc = Document::new();
    let (form, page) = setup(&mut doc);
    let field =
        TextField::create(&mut doc, "Short", page, Rect::new(72.0, 600.0, 200.0, 20.0)).unwrap();
    field.set_max_len(&mut doc, 3).unwrap();
    field.set_value(&mut doc, "overflow").unwrap();
    form.add_field(&mut doc, field.dict_ref()).unwrap();

    form.regenerate_appearances(&mut doc).unwrap();

    let ops = normal_appearance_bytes(&doc, field.dict_ref());
    assert!(ops.contains("(ove) Tj"));
    assert!(!ops.contains("overflow"));
}

#[test]
fn test_multiline_field_emits_multiple_lines() {
    let mut doc = Document::new();
    let (form, page) = setup(&mut doc);
    let field =
        TextField::create(&mut doc, "Notes", page, Rect::new(72.0, 400.0, 80.0, 100.0)).unwrap();
    field
        .set_text_flags(&mut doc, TextFieldFlags::MULTILINE)
        .unwrap();
    field
        .set_value(&mut doc, "first line wraps onto more lines here")
        .unwrap();
    form.add_field(&mut doc, field.dict_ref()).unwrap();

    form.regenerate_appearances(&mut doc).unwrap();

    let ops = normal_appearance_bytes(&doc, field.dict_ref());
    assert!(ops.matches(" Tj").count() >= 2);
}

#[test]
fn test_alignment_changes_placement() {
    let mut doc = Document::new();
    let (form, page) = setup(&mut doc);
    let field =
        TextField::create(&mut doc, "A", page, Rect::new(72.0, 350.0, 200.0, 20.0)).unwrap();
    field.set_value(&mut doc, "hi").unwrap();
    form.add_field(&mut doc, field.dict_ref()).unwrap();

    form.regenerate_appearances(&mut doc).unwrap();
    let left = normal_appearance_bytes(&doc, field.dict_ref());

    field.set_alignment(&mut doc, TextAlignment::Right).unwrap();
    form.regenerate_appearances(&mut doc).unwrap();
    let right = normal_appearance_bytes(&doc, field.dict_ref());

    assert_ne!(left, right);
}

#[test]
fn test_rotated_widget_gets_matrix_and_swapped_bbox() {
    let mut doc = Document::new();
    let (form, page) = setup(&mut doc);
    let field =
        TextField::create(&mut doc, "Rot", page, Rect::new(72.0, 300.0, 100.0, 20.0)).unwrap();
    let widget = Widget::from_dict(&doc, field.dict_ref()).unwrap();
    widget.set_rotation(&mut doc, 90).unwrap();
    form.add_field(&mut doc, field.dict_ref()).unwrap();

    form.regenerate_appearances(&mut doc).unwrap();

    let ap = doc.dict_get(field.dict_ref(), "AP").unwrap();
    let n = ap.as_dict().unwrap().get("N").unwrap();
    let stream = doc.resolve(n).unwrap();
    let dict = stream.as_dict().unwrap();
    let bbox = dict.get("BBox").unwrap().as_array().unwrap();
    assert_eq!(bbox[2].as_number(), Some(20.0));
    assert_eq!(bbox[3].as_number(), Some(100.0));
    let matrix = dict.get("Matrix").unwrap().as_array().unwrap();
    assert_eq!(matrix[0].as_number(), Some(0.0));
    assert_eq!(matrix[1].as_number(), Some(1.0));
}

#[test]
fn test_listbox_highlight_behind_selection() {
    let mut doc = Document::new();
    let (form, page) = setup(&mut doc);
    let options: Vec<ChoiceOption> = ["Ham", "Cheese", "Olives"]
        .iter()
        .map(|s| ChoiceOption::plain(*s))
        .collect();
    let mut field = ListBoxField::create(
        &mut doc,
        "Toppings",
        page,
        Rect::new(72.0, 200.0, 120.0, 60.0),
        &options,
    )
    .unwrap();
    field.set_selected_indices(&mut doc, &[1]).unwrap();
    form.add_field(&mut doc, field.dict_ref()).unwrap();

    form.regenerate_appearances(&mut doc).unwrap();

    let ops = normal_appearance_bytes(&doc, field.dict_ref());
    assert!(ops.contains("0.6 0.75 0.85 rg"));
    assert!(ops.contains("(Cheese) Tj"));
}

#[test]
fn test_degenerate_rect_widget_is_skipped() {
    let mut doc = Document::new();
    let (form, page) = setup(&mut doc);
    let field =
        TextField::create(&mut doc, "Zero", page, Rect::new(72.0, 100.0, 0.0, 0.0)).unwrap();
    field.set_value(&mut doc, "invisible").unwrap();
    form.add_field(&mut doc, field.dict_ref()).unwrap();

    form.regenerate_appearances(&mut doc).unwrap();

    assert!(doc.dict_get(field.dict_ref(), "AP").is_none());
}
