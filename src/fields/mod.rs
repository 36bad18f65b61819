//! Form fields: hierarchy, classification, and the typed field variants.
//!
//! A field is a dictionary in the document's object store; this module wraps
//! such dictionaries without owning them. [`FieldNode`] carries the shared
//! behavior (names, parent chain, kids, widgets) and each typed variant in the
//! submodules layers its family's value semantics on top.

pub mod button;
pub mod checkbox;
pub mod choice;
pub mod classify;
pub mod flags;
pub mod radio;
pub mod text;

use crate::document::Document;
use crate::error::Result;
use crate::object::{Object, ObjectRef};
use crate::widget::Widget;

pub use button::{GenericField, PushButtonField, SignatureField};
pub use checkbox::CheckBoxField;
pub use choice::{ChoiceOption, ComboBoxField, ListBoxField};
pub use classify::classify;
pub use radio::RadioButtonField;
pub use text::TextField;

/// Upper bound on `/Parent` hops; guards against reference cycles in
/// malformed documents.
const MAX_PARENT_DEPTH: usize = 64;

/// The resolved type of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text entry (`/FT /Tx`)
    Text,
    /// On/off toggle (`/FT /Btn`, neither push button nor radio)
    CheckBox,
    /// Exclusive group of toggles (`/FT /Btn` with the radio flag, or the
    /// multi-widget distinct-name shape)
    RadioButton,
    /// Dropdown (`/FT /Ch` with the combo flag)
    ComboBox,
    /// Scrolling list (`/FT /Ch` without the combo flag)
    ListBox,
    /// Action button holding no value (`/FT /Btn` with the push-button flag)
    PushButton,
    /// Digital signature placeholder (`/FT /Sig`)
    Signature,
    /// No resolvable `/FT`; usually a pure container node
    Generic,
}

/// A classified form field.
///
/// The enum is closed: every dictionary the classifier accepts maps to
/// exactly one variant, and each variant wraps the same [`FieldNode`].
#[derive(Debug, Clone)]
pub enum Field {
    /// Text field
    Text(TextField),
    /// Checkbox
    CheckBox(CheckBoxField),
    /// Radio button group
    RadioButton(RadioButtonField),
    /// Combo box (dropdown)
    ComboBox(ComboBoxField),
    /// List box
    ListBox(ListBoxField),
    /// Push button
    PushButton(PushButtonField),
    /// Signature field
    Signature(SignatureField),
    /// Untyped container field
    Generic(GenericField),
}

impl Field {
    /// The resolved field type.
    pub fn kind(&self) -> FieldKind {
        match self {
            Field::Text(_) => FieldKind::Text,
            Field::CheckBox(_) => FieldKind::CheckBox,
            Field::RadioButton(_) => FieldKind::RadioButton,
            Field::ComboBox(_) => FieldKind::ComboBox,
            Field::ListBox(_) => FieldKind::ListBox,
            Field::PushButton(_) => FieldKind::PushButton,
            Field::Signature(_) => FieldKind::Signature,
            Field::Generic(_) => FieldKind::Generic,
        }
    }

    /// The shared node behind this variant.
    pub fn node(&self) -> &FieldNode {
        match self {
            Field::Text(f) => f.node(),
            Field::CheckBox(f) => f.node(),
            Field::RadioButton(f) => f.node(),
            Field::ComboBox(f) => f.node(),
            Field::ListBox(f) => f.node(),
            Field::PushButton(f) => f.node(),
            Field::Signature(f) => f.node(),
            Field::Generic(f) => f.node(),
        }
    }

    /// The shared node, mutably (for cache invalidation).
    pub fn node_mut(&mut self) -> &mut FieldNode {
        match self {
            Field::Text(f) => f.node_mut(),
            Field::CheckBox(f) => f.node_mut(),
            Field::RadioButton(f) => f.node_mut(),
            Field::ComboBox(f) => f.node_mut(),
            Field::ListBox(f) => f.node_mut(),
            Field::PushButton(f) => f.node_mut(),
            Field::Signature(f) => f.node_mut(),
            Field::Generic(f) => f.node_mut(),
        }
    }

    /// Reference of the underlying field dictionary.
    pub fn dict_ref(&self) -> ObjectRef {
        self.node().dict_ref()
    }

    /// The field's fully qualified (dotted) name.
    pub fn fully_qualified_name(&self, doc: &Document) -> String {
        self.node().fully_qualified_name(doc)
    }
}

/// Whether a `/Kids` entry is itself a field (as opposed to a bare widget).
///
/// A kid is a field when it has no `/Subtype`, or when it carries field keys
/// (`/FT` or `/T`) regardless of `/Subtype`; the latter is the merged
/// field/widget shape.
pub(crate) fn is_field_dict(doc: &Document, dict: ObjectRef) -> bool {
    if doc.dict_get(dict, "Subtype").is_none() {
        return true;
    }
    doc.dict_get(dict, "FT").is_some() || doc.dict_get(dict, "T").is_some()
}

/// Whether a field dictionary is also its own widget annotation.
pub(crate) fn is_merged_field_dict(doc: &Document, dict: ObjectRef) -> bool {
    doc.dict_get(dict, "Subtype")
        .and_then(|o| o.as_name().map(|s| s == "Widget"))
        .unwrap_or(false)
}

/// Shared behavior of every field: naming, hierarchy, widgets, flags.
///
/// The node addresses the document store through an `ObjectRef`; it never
/// owns its parent or kids, so arbitrary hierarchy shapes (including merged
/// field/widget dictionaries) need no special ownership handling.
#[derive(Debug, Clone)]
pub struct FieldNode {
    dict: ObjectRef,
    widgets: Option<Vec<Widget>>,
}

impl FieldNode {
    /// Wrap a field dictionary reference.
    pub fn new(dict: ObjectRef) -> Self {
        Self { dict, widgets: None }
    }

    /// Reference of the underlying dictionary.
    pub fn dict_ref(&self) -> ObjectRef {
        self.dict
    }

    /// The field's partial name (`/T`), if set.
    pub fn partial_name(&self, doc: &Document) -> Option<String> {
        doc.dict_get(self.dict, "T").and_then(|o| o.as_text())
    }

    /// Set the field's partial name.
    pub fn set_partial_name(&self, doc: &mut Document, name: &str) -> Result<()> {
        doc.dict_set(self.dict, "T", Object::from_text(name))
    }

    /// The field's tooltip (`/TU`), if set.
    pub fn tooltip(&self, doc: &Document) -> Option<String> {
        doc.dict_get(self.dict, "TU").and_then(|o| o.as_text())
    }

    /// Set the field's tooltip.
    pub fn set_tooltip(&self, doc: &mut Document, tooltip: &str) -> Result<()> {
        doc.dict_set(self.dict, "TU", Object::from_text(tooltip))
    }

    /// The parent field's dictionary reference, if any.
    pub fn parent(&self, doc: &Document) -> Option<ObjectRef> {
        doc.dict(self.dict).ok()?.get("Parent")?.as_reference()
    }

    /// The fully qualified name: partial names joined with `.` from the root
    /// ancestor down to this field. Unnamed ancestors contribute nothing.
    pub fn fully_qualified_name(&self, doc: &Document) -> String {
        let mut parts = Vec::new();
        if let Some(name) = self.partial_name(doc) {
            parts.push(name);
        }
        let mut current = self.parent(doc);
        let mut depth = 0;
        while let Some(parent) = current {
            if depth >= MAX_PARENT_DEPTH {
                break;
            }
            depth += 1;
            let node = FieldNode::new(parent);
            if let Some(name) = node.partial_name(doc) {
                parts.push(name);
            }
            current = node.parent(doc);
        }
        parts.reverse();
        parts.join(".")
    }

    /// Read an inheritable key (`/FT`, `/Ff`, `/V`, `/DA`, `/Q`, ...) from
    /// this dictionary or the nearest ancestor that defines it.
    pub fn inherited(&self, doc: &Document, key: &str) -> Option<Object> {
        let mut current = self.dict;
        for _ in 0..MAX_PARENT_DEPTH {
            if let Some(value) = doc.dict_get(current, key) {
                return Some(value);
            }
            match FieldNode::new(current).parent(doc) {
                Some(parent) => current = parent,
                None => return None,
            }
        }
        None
    }

    /// Raw field-flag bits from the inherited `/Ff` entry; 0 when absent.
    pub fn flag_bits(&self, doc: &Document) -> u32 {
        self.inherited(doc, "Ff")
            .and_then(|o| o.as_integer())
            .unwrap_or(0) as u32
    }

    /// Overwrite the field's own `/Ff` entry.
    pub fn set_flag_bits(&self, doc: &mut Document, bits: u32) -> Result<()> {
        doc.dict_set(self.dict, "Ff", Object::Integer(bits as i64))
    }

    /// Whether the read-only bit is set (inherited).
    pub fn is_read_only(&self, doc: &Document) -> bool {
        self.flag_bits(doc) & flags::FieldFlags::READ_ONLY.bits() != 0
    }

    /// References of all `/Kids` entries, fields and widgets alike.
    pub fn kids(&self, doc: &Document) -> Vec<ObjectRef> {
        doc.dict_get(self.dict, "Kids")
            .and_then(|o| {
                o.as_array()
                    .map(|arr| arr.iter().filter_map(|k| k.as_reference()).collect())
            })
            .unwrap_or_default()
    }

    /// Kids that are themselves fields (sub-fields of this node).
    pub fn child_fields(&self, doc: &Document) -> Vec<ObjectRef> {
        self.kids(doc)
            .into_iter()
            .filter(|&kid| is_field_dict(doc, kid))
            .collect()
    }

    /// Whether any kid is itself a field.
    pub fn has_child_fields(&self, doc: &Document) -> bool {
        self.kids(doc).iter().any(|&kid| is_field_dict(doc, kid))
    }

    /// The field's widget annotations.
    ///
    /// A merged field/widget dictionary yields itself as the single widget;
    /// otherwise the non-field kids are wrapped. The list is memoized; call
    /// [`FieldNode::invalidate_widgets`] after adding or removing widgets.
    pub fn widgets(&mut self, doc: &Document) -> Result<&[Widget]> {
        if self.widgets.is_none() {
            let list = self.collect_widgets(doc)?;
            self.widgets = Some(list);
        }
        Ok(self.widgets.as_deref().unwrap_or(&[]))
    }

    /// Drop the memoized widget list so the next access re-reads `/Kids`.
    pub fn invalidate_widgets(&mut self) {
        self.widgets = None;
    }

    fn collect_widgets(&self, doc: &Document) -> Result<Vec<Widget>> {
        if is_merged_field_dict(doc, self.dict) {
            return Ok(vec![Widget::from_dict(doc, self.dict)?]);
        }
        let mut widgets = Vec::new();
        for kid in self.kids(doc) {
            if !is_field_dict(doc, kid) {
                widgets.push(Widget::from_dict(doc, kid)?);
            }
        }
        Ok(widgets)
    }

    /// Lazy pre-order walk over the fully qualified names of this node's
    /// descendant fields. Each call returns a fresh iterator.
    pub fn descendant_names<'a>(&self, doc: &'a Document) -> DescendantNames<'a> {
        let prefix = self.fully_qualified_name(doc);
        let stack: Vec<(ObjectRef, String)> = self
            .child_fields(doc)
            .into_iter()
            .rev()
            .map(|kid| (kid, prefix.clone()))
            .collect();
        DescendantNames { doc, stack }
    }
}

/// Iterator over descendant field names, depth-first pre-order.
pub struct DescendantNames<'a> {
    doc: &'a Document,
    stack: Vec<(ObjectRef, String)>,
}

impl<'a> Iterator for DescendantNames<'a> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while let Some((dict, prefix)) = self.stack.pop() {
            let node = FieldNode::new(dict);
            let name = match node.partial_name(self.doc) {
                Some(partial) if prefix.is_empty() => partial,
                Some(partial) => format!("{}.{}", prefix, partial),
                None => prefix.clone(),
            };
            for kid in node.child_fields(self.doc).into_iter().rev() {
                self.stack.push((kid, name.clone()));
            }
            if node.partial_name(self.doc).is_some() {
                return Some(name);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Dict;

    fn named_field(doc: &mut Document, name: &str) -> ObjectRef {
        let mut dict = Dict::new();
        dict.insert("T".to_string(), Object::from_text(name));
        doc.add_object(Object::Dictionary(dict))
    }

    fn link(doc: &mut Document, parent: ObjectRef, kid: ObjectRef) {
        doc.dict_set(kid, "Parent", Object::Reference(parent)).unwrap();
        let dict = doc.dict_mut(parent).unwrap();
        let kids = dict
            .entry("Kids".to_string())
            .or_insert_with(|| Object::Array(Vec::new()));
        kids.as_array_mut().unwrap().push(Object::Reference(kid));
    }

    #[test]
    fn test_fully_qualified_name_walks_parents() {
        let mut doc = Document::new();
        let root = named_field(&mut doc, "Address");
        let kid = named_field(&mut doc, "Street");
        link(&mut doc, root, kid);

        let node = FieldNode::new(kid);
        assert_eq!(node.partial_name(&doc).as_deref(), Some("Street"));
        assert_eq!(node.fully_qualified_name(&doc), "Address.Street");
    }

    #[test]
    fn test_unnamed_ancestor_contributes_nothing() {
        let mut doc = Document::new();
        let root = doc.add_object(Object::Dictionary(Dict::new()));
        let kid = named_field(&mut doc, "City");
        link(&mut doc, root, kid);

        assert_eq!(FieldNode::new(kid).fully_qualified_name(&doc), "City");
    }

    #[test]
    fn test_kids_split_fields_from_widgets() {
        let mut doc = Document::new();
        let root = named_field(&mut doc, "Group");

        let sub = named_field(&mut doc, "Sub");
        link(&mut doc, root, sub);

        let mut wdict = Dict::new();
        wdict.insert("Subtype".to_string(), Object::Name("Widget".to_string()));
        let widget = doc.add_object(Object::Dictionary(wdict));
        link(&mut doc, root, widget);

        let mut node = FieldNode::new(root);
        assert_eq!(node.child_fields(&doc), vec![sub]);
        assert!(node.has_child_fields(&doc));
        let widgets = node.widgets(&doc).unwrap();
        assert_eq!(widgets.len(), 1);
        assert_eq!(widgets[0].dict_ref(), widget);
    }

    #[test]
    fn test_merged_dict_is_its_own_widget() {
        let mut doc = Document::new();
        let mut dict = Dict::new();
        dict.insert("T".to_string(), Object::from_text("Agree"));
        dict.insert("FT".to_string(), Object::Name("Btn".to_string()));
        dict.insert("Subtype".to_string(), Object::Name("Widget".to_string()));
        let merged = doc.add_object(Object::Dictionary(dict));

        assert!(is_field_dict(&doc, merged));
        assert!(is_merged_field_dict(&doc, merged));

        let mut node = FieldNode::new(merged);
        let widgets = node.widgets(&doc).unwrap();
        assert_eq!(widgets.len(), 1);
        assert_eq!(widgets[0].dict_ref(), merged);
    }

    #[test]
    fn test_widget_cache_memoizes_until_invalidated() {
        let mut doc = Document::new();
        let root = named_field(&mut doc, "Group");
        let mut node = FieldNode::new(root);
        assert!(node.widgets(&doc).unwrap().is_empty());

        let mut wdict = Dict::new();
        wdict.insert("Subtype".to_string(), Object::Name("Widget".to_string()));
        let widget = doc.add_object(Object::Dictionary(wdict));
        link(&mut doc, root, widget);

        // Cached list is stale until invalidated.
        assert!(node.widgets(&doc).unwrap().is_empty());
        node.invalidate_widgets();
        assert_eq!(node.widgets(&doc).unwrap().len(), 1);
    }

    #[test]
    fn test_inherited_flags() {
        let mut doc = Document::new();
        let root = named_field(&mut doc, "Root");
        doc.dict_set(root, "Ff", Object::Integer(1)).unwrap();
        let kid = named_field(&mut doc, "Kid");
        link(&mut doc, root, kid);

        let node = FieldNode::new(kid);
        assert_eq!(node.flag_bits(&doc), 1);
        assert!(node.is_read_only(&doc));
    }

    #[test]
    fn test_descendant_names_preorder_and_restartable() {
        let mut doc = Document::new();
        let root = named_field(&mut doc, "Form");
        let a = named_field(&mut doc, "A");
        let b = named_field(&mut doc, "B");
        let a1 = named_field(&mut doc, "A1");
        link(&mut doc, root, a);
        link(&mut doc, root, b);
        link(&mut doc, a, a1);

        let node = FieldNode::new(root);
        let names: Vec<String> = node.descendant_names(&doc).collect();
        assert_eq!(names, vec!["Form.A", "Form.A.A1", "Form.B"]);

        // A second call starts over from the top.
        let again: Vec<String> = node.descendant_names(&doc).collect();
        assert_eq!(again, names);
    }

    #[test]
    fn test_parent_cycle_terminates() {
        let mut doc = Document::new();
        let a = named_field(&mut doc, "A");
        let b = named_field(&mut doc, "B");
        doc.dict_set(a, "Parent", Object::Reference(b)).unwrap();
        doc.dict_set(b, "Parent", Object::Reference(a)).unwrap();

        // Must not loop forever; exact name is unspecified for broken input.
        let _ = FieldNode::new(a).fully_qualified_name(&doc);
    }
}
