//! Push buttons, signature placeholders, and untyped container fields.

use crate::document::Document;
use crate::error::Result;
use crate::fields::flags::ButtonFieldFlags;
use crate::fields::FieldNode;
use crate::geometry::Rect;
use crate::object::{Object, ObjectRef};
use crate::widget::Widget;

/// An action button. Holds no persisted value; its face comes from the
/// `/MK/CA` caption.
#[derive(Debug, Clone)]
pub struct PushButtonField {
    node: FieldNode,
}

impl PushButtonField {
    /// Wrap a classified field node.
    pub fn new(node: FieldNode) -> Self {
        Self { node }
    }

    /// Create a fresh push button as a merged field/widget dictionary.
    pub fn create(
        doc: &mut Document,
        name: &str,
        page: ObjectRef,
        rect: Rect,
        caption: &str,
    ) -> Result<PushButtonField> {
        let widget = Widget::create(doc, rect);
        let r = widget.dict_ref();
        doc.dict_set(r, "FT", Object::Name("Btn".to_string()))?;
        doc.dict_set(r, "T", Object::from_text(name))?;
        doc.dict_set(
            r,
            "Ff",
            Object::Integer(ButtonFieldFlags::PUSHBUTTON.bits() as i64),
        )?;
        let mk = doc.ensure_sub_dict(r, "MK")?;
        mk.insert("CA".to_string(), Object::from_text(caption));
        doc.add_annotation(page, r)?;
        Ok(PushButtonField::new(FieldNode::new(r)))
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

    /// The button caption (`/MK/CA`), if set.
    pub fn caption(&self, doc: &Document) -> Option<String> {
        doc.dict_get(self.node.dict_ref(), "MK")
            .and_then(|mk| mk.as_dict()?.get("CA")?.as_text())
    }

    /// Set the button caption.
    pub fn set_caption(&self, doc: &mut Document, caption: &str) -> Result<()> {
        let mk = doc.ensure_sub_dict(self.node.dict_ref(), "MK")?;
        mk.insert("CA".to_string(), Object::from_text(caption));
        Ok(())
    }
}

/// A digital signature placeholder. This crate manages the field shell only;
/// filling it with an actual signature is cryptographic territory it does not
/// enter.
#[derive(Debug, Clone)]
pub struct SignatureField {
    node: FieldNode,
}

impl SignatureField {
    /// Wrap a classified field node.
    pub fn new(node: FieldNode) -> Self {
        Self { node }
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

    /// Whether a signature value is present.
    pub fn is_signed(&self, doc: &Document) -> bool {
        self.node.inherited(doc, "V").is_some()
    }
}

/// A field without a resolvable `/FT`: typically a pure container grouping
/// sub-fields under a common name prefix.
#[derive(Debug, Clone)]
pub struct GenericField {
    node: FieldNode,
}

impl GenericField {
    /// Wrap a classified field node.
    pub fn new(node: FieldNode) -> Self {
        Self { node }
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{classify, FieldKind};

    #[test]
    fn test_push_button_caption_roundtrip() {
        let mut doc = Document::new();
        let page = doc.add_page(612.0, 792.0);
        let button = PushButtonField::create(
            &mut doc,
            "Submit",
            page,
            Rect::new(72.0, 100.0, 80.0, 24.0),
            "Submit Form",
        )
        .unwrap();

        assert_eq!(button.caption(&doc).as_deref(), Some("Submit Form"));
        button.set_caption(&mut doc, "Send").unwrap();
        assert_eq!(button.caption(&doc).as_deref(), Some("Send"));

        assert_eq!(
            classify(&doc, button.dict_ref()).unwrap().kind(),
            FieldKind::PushButton
        );
    }

    #[test]
    fn test_signature_field_signed_state() {
        let mut doc = Document::new();
        let mut dict = crate::object::Dict::new();
        dict.insert("FT".to_string(), Object::Name("Sig".to_string()));
        dict.insert("T".to_string(), Object::from_text("Sig1"));
        let r = doc.add_object(Object::Dictionary(dict));

        let field = SignatureField::new(FieldNode::new(r));
        assert!(!field.is_signed(&doc));

        doc.dict_set(r, "V", Object::Dictionary(crate::object::Dict::new()))
            .unwrap();
        assert!(field.is_signed(&doc));
    }
}
