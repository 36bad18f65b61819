//! Checkboxes: single on/off toggles (`/FT /Btn`, no radio or push-button flag).

use crate::document::Document;
use crate::error::{Error, Result};
use crate::fields::FieldNode;
use crate::geometry::Rect;
use crate::object::{Object, ObjectRef};
use crate::widget::{Widget, OFF_STATE};

/// On-state name used for fresh checkboxes that carry no appearance yet.
const DEFAULT_ON_STATE: &str = "Yes";

/// A single on/off toggle.
#[derive(Debug, Clone)]
pub struct CheckBoxField {
    node: FieldNode,
}

impl CheckBoxField {
    /// Wrap a classified field node.
    pub fn new(node: FieldNode) -> Self {
        Self { node }
    }

    /// Create a fresh unchecked checkbox as a merged field/widget dictionary
    /// placed on `page`.
    pub fn create(
        doc: &mut Document,
        name: &str,
        page: ObjectRef,
        rect: Rect,
    ) -> Result<CheckBoxField> {
        let widget = Widget::create(doc, rect);
        let r = widget.dict_ref();
        doc.dict_set(r, "FT", Object::Name("Btn".to_string()))?;
        doc.dict_set(r, "T", Object::from_text(name))?;
        doc.dict_set(r, "V", Object::Name(OFF_STATE.to_string()))?;
        doc.dict_set(r, "AS", Object::Name(OFF_STATE.to_string()))?;
        doc.add_annotation(page, r)?;
        Ok(CheckBoxField::new(FieldNode::new(r)))
    }

    /// The shared field node.
    pub fn node(&self) -> &FieldNode {
        &self.node
    }

    /// The shared field node, mutably.
    pub fn node_mut(&mut self) -> &mut FieldNode {
        &mut self.node
    }

    /// Reference of the underlying dictionary.
    pub fn dict_ref(&self) -> ObjectRef {
        self.node.dict_ref()
    }

    /// The name of the checked state: the first non-`Off` key of the first
    /// widget's normal appearance, or `Yes` for appearance-less fields.
    pub fn on_state_name(&mut self, doc: &Document) -> Result<String> {
        let widgets = self.node.widgets(doc)?;
        Ok(widgets
            .iter()
            .find_map(|w| w.non_off_name(doc))
            .unwrap_or_else(|| DEFAULT_ON_STATE.to_string()))
    }

    /// Whether the checkbox is checked.
    ///
    /// `/V` decides when present. Without it, the first widget's `/AS` is
    /// consulted, but only if that name is one of the widget's known
    /// appearance states; an `/AS` naming a state the appearance dictionary
    /// does not define is ignored.
    pub fn is_checked(&mut self, doc: &Document) -> Result<bool> {
        if let Some(v) = self.node.inherited(doc, "V").and_then(|o| {
            o.as_name().map(|s| s.to_string())
        }) {
            return Ok(v != OFF_STATE);
        }
        let widgets = self.node.widgets(doc)?;
        let Some(first) = widgets.first() else {
            return Ok(false);
        };
        let Some(state) = first.appearance_state(doc) else {
            return Ok(false);
        };
        if state == OFF_STATE {
            return Ok(false);
        }
        let known = first.appearance_state_names(doc);
        Ok(known.is_empty() || known.iter().any(|n| n == &state))
    }

    /// Check or uncheck the field, keeping `/V` and every widget's `/AS` in
    /// lockstep.
    pub fn set_checked(&mut self, doc: &mut Document, checked: bool) -> Result<()> {
        if self.node.is_read_only(doc) {
            return Err(Error::ReadOnlyField(self.node.fully_qualified_name(doc)));
        }
        let state = if checked {
            self.on_state_name(doc)?
        } else {
            OFF_STATE.to_string()
        };
        doc.dict_set(self.node.dict_ref(), "V", Object::Name(state.clone()))?;
        let widgets: Vec<Widget> = self.node.widgets(doc)?.to_vec();
        for widget in widgets {
            widget.set_appearance_state(doc, &state)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Dict;

    fn fresh_checkbox(doc: &mut Document) -> CheckBoxField {
        let page = doc.add_page(612.0, 792.0);
        CheckBoxField::create(doc, "Agree", page, Rect::new(72.0, 700.0, 15.0, 15.0)).unwrap()
    }

    #[test]
    fn test_fresh_checkbox_is_unchecked() {
        let mut doc = Document::new();
        let mut field = fresh_checkbox(&mut doc);
        assert!(!field.is_checked(&doc).unwrap());
        assert_eq!(field.on_state_name(&doc).unwrap(), "Yes");
    }

    #[test]
    fn test_toggle_updates_v_and_as() {
        let mut doc = Document::new();
        let mut field = fresh_checkbox(&mut doc);

        field.set_checked(&mut doc, true).unwrap();
        assert!(field.is_checked(&doc).unwrap());
        let r = field.dict_ref();
        assert_eq!(doc.dict_get(r, "V").unwrap().as_name(), Some("Yes"));
        assert_eq!(doc.dict_get(r, "AS").unwrap().as_name(), Some("Yes"));

        field.set_checked(&mut doc, false).unwrap();
        assert!(!field.is_checked(&doc).unwrap());
        assert_eq!(doc.dict_get(r, "V").unwrap().as_name(), Some("Off"));
        assert_eq!(doc.dict_get(r, "AS").unwrap().as_name(), Some("Off"));
    }

    #[test]
    fn test_on_state_from_appearance_dictionary() {
        let mut doc = Document::new();
        let mut field = fresh_checkbox(&mut doc);
        let stream = doc.add_object(Object::Stream {
            dict: Dict::new(),
            data: bytes::Bytes::new(),
        });
        let widget = Widget::from_dict(&doc, field.dict_ref()).unwrap();
        widget.set_normal_appearance(&mut doc, "Off", stream).unwrap();
        widget.set_normal_appearance(&mut doc, "Checked", stream).unwrap();

        field.node_mut().invalidate_widgets();
        assert_eq!(field.on_state_name(&doc).unwrap(), "Checked");

        field.set_checked(&mut doc, true).unwrap();
        assert_eq!(
            doc.dict_get(field.dict_ref(), "V").unwrap().as_name(),
            Some("Checked")
        );
    }

    #[test]
    fn test_as_fallback_cross_checked_against_known_states() {
        let mut doc = Document::new();
        let mut field = fresh_checkbox(&mut doc);
        let r = field.dict_ref();
        doc.dict_remove(r, "V").unwrap();

        let stream = doc.add_object(Object::Stream {
            dict: Dict::new(),
            data: bytes::Bytes::new(),
        });
        let widget = Widget::from_dict(&doc, r).unwrap();
        widget.set_normal_appearance(&mut doc, "Off", stream).unwrap();
        widget.set_normal_appearance(&mut doc, "Yes", stream).unwrap();

        // /AS names a state the appearance dictionary does not define
        doc.dict_set(r, "AS", Object::Name("Bogus".to_string())).unwrap();
        assert!(!field.is_checked(&doc).unwrap());

        doc.dict_set(r, "AS", Object::Name("Yes".to_string())).unwrap();
        assert!(field.is_checked(&doc).unwrap());
    }
}
