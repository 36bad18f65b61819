//! Text fields (`/FT /Tx`).

use crate::document::Document;
use crate::error::{Error, Result};
use crate::fields::flags::{TextAlignment, TextFieldFlags};
use crate::fields::FieldNode;
use crate::geometry::Rect;
use crate::object::{Object, ObjectRef};
use crate::widget::Widget;

/// A free-text entry field.
#[derive(Debug, Clone)]
pub struct TextField {
    node: FieldNode,
}

impl TextField {
    /// Wrap a classified field node.
    pub fn new(node: FieldNode) -> Self {
        Self { node }
    }

    /// Create a fresh text field as a merged field/widget dictionary placed
    /// on `page`.
    pub fn create(
        doc: &mut Document,
        name: &str,
        page: ObjectRef,
        rect: Rect,
    ) -> Result<TextField> {
        let widget = Widget::create(doc, rect);
        let r = widget.dict_ref();
        doc.dict_set(r, "FT", Object::Name("Tx".to_string()))?;
        doc.dict_set(r, "T", Object::from_text(name))?;
        doc.add_annotation(page, r)?;
        Ok(TextField::new(FieldNode::new(r)))
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

    /// The current value (`/V`, inherited), decoded as text.
    pub fn value(&self, doc: &Document) -> Option<String> {
        self.node.inherited(doc, "V").and_then(|o| o.as_text())
    }

    /// Set the field value.
    ///
    /// Values that fit single-byte encoding are stored that way; anything
    /// wider is stored as UTF-16BE with a byte-order mark, so the value reads
    /// back unchanged either way. Fails with [`Error::ReadOnlyField`] when
    /// the read-only flag is set.
    pub fn set_value(&self, doc: &mut Document, value: &str) -> Result<()> {
        if self.node.is_read_only(doc) {
            return Err(Error::ReadOnlyField(self.node.fully_qualified_name(doc)));
        }
        doc.dict_set(self.node.dict_ref(), "V", Object::from_text(value))
    }

    /// The default value (`/DV`), used by reset-form actions.
    pub fn default_value(&self, doc: &Document) -> Option<String> {
        self.node.inherited(doc, "DV").and_then(|o| o.as_text())
    }

    /// Set the default value.
    pub fn set_default_value(&self, doc: &mut Document, value: &str) -> Result<()> {
        doc.dict_set(self.node.dict_ref(), "DV", Object::from_text(value))
    }

    /// Maximum value length in characters (`/MaxLen`, inherited).
    pub fn max_len(&self, doc: &Document) -> Option<i64> {
        self.node.inherited(doc, "MaxLen").and_then(|o| o.as_integer())
    }

    /// Set the maximum value length.
    pub fn set_max_len(&self, doc: &mut Document, max_len: i64) -> Result<()> {
        doc.dict_set(self.node.dict_ref(), "MaxLen", Object::Integer(max_len))
    }

    /// Horizontal text alignment (`/Q`, inherited); left when absent.
    pub fn alignment(&self, doc: &Document) -> TextAlignment {
        self.node
            .inherited(doc, "Q")
            .and_then(|o| o.as_integer())
            .map(TextAlignment::from_q_value)
            .unwrap_or_default()
    }

    /// Set the horizontal text alignment.
    pub fn set_alignment(&self, doc: &mut Document, alignment: TextAlignment) -> Result<()> {
        doc.dict_set(
            self.node.dict_ref(),
            "Q",
            Object::Integer(alignment.q_value()),
        )
    }

    /// The field's flag set.
    pub fn text_flags(&self, doc: &Document) -> TextFieldFlags {
        TextFieldFlags::from_bits_truncate(self.node.flag_bits(doc))
    }

    /// Overwrite the field's flag set.
    pub fn set_text_flags(&self, doc: &mut Document, flags: TextFieldFlags) -> Result<()> {
        self.node.set_flag_bits(doc, flags.bits())
    }

    /// Whether the multiline flag is set.
    pub fn is_multiline(&self, doc: &Document) -> bool {
        self.text_flags(doc).contains(TextFieldFlags::MULTILINE)
    }

    /// Whether comb layout applies: the comb flag plus a positive `/MaxLen`.
    pub fn is_comb(&self, doc: &Document) -> bool {
        self.text_flags(doc).contains(TextFieldFlags::COMB)
            && self.max_len(doc).map(|n| n > 0).unwrap_or(false)
    }

    /// The default-appearance string (`/DA`, inherited).
    pub fn default_appearance(&self, doc: &Document) -> Option<String> {
        self.node.inherited(doc, "DA").and_then(|o| o.as_text())
    }

    /// Set the field's own default-appearance string.
    pub fn set_default_appearance(&self, doc: &mut Document, da: &str) -> Result<()> {
        doc.dict_set(self.node.dict_ref(), "DA", Object::from_text(da))
    }
}
