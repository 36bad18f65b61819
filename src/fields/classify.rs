//! Field-type resolution.
//!
//! `/FT` and `/Ff` are inheritable, so classification walks the `/Parent`
//! chain. Button fields need an extra step: nothing in the dictionary says
//! "checkbox" outright, so absent an explicit radio flag the shape of the
//! widget set decides.

use crate::document::Document;
use crate::error::Result;
use crate::fields::flags::{ButtonFieldFlags, ChoiceFieldFlags};
use crate::fields::{
    CheckBoxField, ComboBoxField, Field, FieldNode, GenericField, ListBoxField, PushButtonField,
    RadioButtonField, SignatureField, TextField,
};
use crate::object::ObjectRef;
use std::collections::HashSet;

/// Classify a field dictionary into its typed variant.
///
/// Idempotent: the result depends only on the dictionary contents, so
/// re-classifying the same reference yields the same kind.
pub fn classify(doc: &Document, dict: ObjectRef) -> Result<Field> {
    let node = FieldNode::new(dict);
    let ft = node.inherited(doc, "FT").and_then(|o| {
        o.as_name().map(|s| s.to_string())
    });

    match ft.as_deref() {
        Some("Tx") => Ok(Field::Text(TextField::new(node))),
        Some("Ch") => {
            let flags = ChoiceFieldFlags::from_bits_truncate(node.flag_bits(doc));
            if flags.contains(ChoiceFieldFlags::COMBO) {
                Ok(Field::ComboBox(ComboBoxField::new(node)))
            } else {
                Ok(Field::ListBox(ListBoxField::new(node)))
            }
        },
        Some("Sig") => Ok(Field::Signature(SignatureField::new(node))),
        Some("Btn") => classify_button(doc, node),
        _ => Ok(Field::Generic(GenericField::new(node))),
    }
}

/// Split `/Btn` fields into push button, radio group, or checkbox.
///
/// The push-button and radio flags are authoritative when set. Without them
/// the widget set decides: a group of two or more widgets whose on-names are
/// pairwise distinct behaves as a radio group, anything else as a checkbox.
/// A checkbox split across two widgets that happen to carry different
/// on-names is indistinguishable from a radio group at this level and will
/// classify as one.
fn classify_button(doc: &Document, mut node: FieldNode) -> Result<Field> {
    let flags = ButtonFieldFlags::from_bits_truncate(node.flag_bits(doc));
    if flags.contains(ButtonFieldFlags::PUSHBUTTON) {
        return Ok(Field::PushButton(PushButtonField::new(node)));
    }
    if flags.contains(ButtonFieldFlags::RADIO)
        || flags.contains(ButtonFieldFlags::RADIOS_IN_UNISON)
    {
        return Ok(Field::RadioButton(RadioButtonField::new(node)));
    }

    let (widget_count, names) = {
        let widgets = node.widgets(doc)?;
        let names: Vec<String> = widgets
            .iter()
            .filter_map(|w| w.non_off_name(doc))
            .collect();
        (widgets.len(), names)
    };
    let distinct: HashSet<&str> = names.iter().map(|s| s.as_str()).collect();
    let is_radio =
        widget_count >= 2 && names.len() == widget_count && distinct.len() == names.len();

    log::debug!(
        "button field {}: {} widget(s), {} distinct on-name(s) -> {}",
        node.dict_ref(),
        widget_count,
        distinct.len(),
        if is_radio { "radio group" } else { "checkbox" }
    );

    if is_radio {
        Ok(Field::RadioButton(RadioButtonField::new(node)))
    } else {
        Ok(Field::CheckBox(CheckBoxField::new(node)))
    }
}
