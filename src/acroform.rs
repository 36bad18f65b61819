//! The interactive form root: the document-level AcroForm dictionary.

use crate::appearance::{self, FormResources};
use crate::document::Document;
use crate::error::{Error, Result};
use crate::fields::{classify, Field, FieldNode};
use crate::object::{Dict, Object, ObjectRef};

/// Form-wide default appearance: Helvetica, auto-sized, black.
const DEFAULT_DA: &str = "/Helv 0 Tf 0 g";

/// Wrapper around the document's AcroForm dictionary.
#[derive(Debug, Clone, Copy)]
pub struct AcroForm {
    dict: ObjectRef,
}

impl AcroForm {
    /// Create a fresh form root with an empty field list, the standard
    /// default appearance, and Helvetica/ZapfDingbats registered in `/DR`,
    /// and install it as the document's form.
    pub fn create(doc: &mut Document) -> Result<AcroForm> {
        let mut dict = Dict::new();
        dict.insert("Fields".to_string(), Object::Array(Vec::new()));
        dict.insert("DA".to_string(), Object::from_text(DEFAULT_DA));
        let r = doc.add_object(Object::Dictionary(dict));
        doc.set_acroform_ref(Some(r));

        let form = AcroForm { dict: r };
        form.register_font(doc, "Helv", "Helvetica")?;
        form.register_font(doc, "ZaDb", "ZapfDingbats")?;
        Ok(form)
    }

    /// Wrap the document's existing form root, if it has one.
    pub fn from_document(doc: &Document) -> Option<AcroForm> {
        doc.acroform_ref().map(|dict| AcroForm { dict })
    }

    /// Reference of the AcroForm dictionary.
    pub fn dict_ref(&self) -> ObjectRef {
        self.dict
    }

    /// References of the root fields (`/Fields`).
    pub fn field_refs(&self, doc: &Document) -> Vec<ObjectRef> {
        doc.dict_get(self.dict, "Fields")
            .and_then(|o| {
                o.as_array()
                    .map(|arr| arr.iter().filter_map(|f| f.as_reference()).collect())
            })
            .unwrap_or_default()
    }

    /// Classify and return every root field.
    pub fn fields(&self, doc: &Document) -> Result<Vec<Field>> {
        self.field_refs(doc)
            .into_iter()
            .map(|r| classify(doc, r))
            .collect()
    }

    /// Find a field by its fully qualified name, searching the whole tree.
    pub fn field(&self, doc: &Document, name: &str) -> Result<Option<Field>> {
        for root in self.field_refs(doc) {
            if let Some(found) = find_by_name(doc, root, "", name) {
                return classify(doc, found).map(Some);
            }
        }
        Ok(None)
    }

    /// Register a root-level field in `/Fields`.
    pub fn add_field(&self, doc: &mut Document, field: ObjectRef) -> Result<()> {
        let dict = doc.dict_mut(self.dict)?;
        let fields = dict
            .entry("Fields".to_string())
            .or_insert_with(|| Object::Array(Vec::new()));
        let found = fields.type_name().to_string();
        let arr = fields.as_array_mut().ok_or(Error::InvalidObjectType {
            expected: "Array".to_string(),
            found,
        })?;
        arr.push(Object::Reference(field));
        Ok(())
    }

    /// Remove a root-level field from `/Fields`.
    pub fn remove_field(&self, doc: &mut Document, field: ObjectRef) -> Result<()> {
        let dict = doc.dict_mut(self.dict)?;
        if let Some(arr) = dict.get_mut("Fields").and_then(|o| o.as_array_mut()) {
            arr.retain(|o| o.as_reference() != Some(field));
        }
        Ok(())
    }

    /// Whether viewers are asked to regenerate appearances themselves.
    pub fn need_appearances(&self, doc: &Document) -> bool {
        doc.dict_get(self.dict, "NeedAppearances")
            .and_then(|o| o.as_bool())
            .unwrap_or(false)
    }

    /// Set the `NeedAppearances` viewer hint.
    pub fn set_need_appearances(&self, doc: &mut Document, value: bool) -> Result<()> {
        doc.dict_set(self.dict, "NeedAppearances", Object::Boolean(value))
    }

    /// The form-level default appearance string.
    pub fn default_appearance(&self, doc: &Document) -> Option<String> {
        doc.dict_get(self.dict, "DA").and_then(|o| o.as_text())
    }

    /// Get-or-create a standard Type1 font entry in `/DR/Font`.
    ///
    /// Returns the reference of the font dictionary; an existing entry under
    /// `name` is reused rather than replaced.
    pub fn register_font(
        &self,
        doc: &mut Document,
        name: &str,
        base_font: &str,
    ) -> Result<ObjectRef> {
        let existing = doc
            .dict_get(self.dict, "DR")
            .and_then(|dr| dr.as_dict()?.get("Font")?.as_dict()?.get(name)?.as_reference());
        if let Some(r) = existing {
            return Ok(r);
        }

        let mut font = Dict::new();
        font.insert("Type".to_string(), Object::Name("Font".to_string()));
        font.insert("Subtype".to_string(), Object::Name("Type1".to_string()));
        font.insert("BaseFont".to_string(), Object::Name(base_font.to_string()));
        font.insert(
            "Encoding".to_string(),
            Object::Name("WinAnsiEncoding".to_string()),
        );
        let font = doc.add_object(Object::Dictionary(font));

        let dr = doc.ensure_sub_dict(self.dict, "DR")?;
        let fonts = dr
            .entry("Font".to_string())
            .or_insert_with(|| Object::Dictionary(Dict::new()));
        let found = fonts.type_name().to_string();
        let fonts = fonts.as_dict_mut().ok_or(Error::InvalidObjectType {
            expected: "Dictionary".to_string(),
            found,
        })?;
        fonts.insert(name.to_string(), Object::Reference(font));
        Ok(font)
    }

    /// Snapshot the `/DR` fonts and default appearance for the synthesizer.
    pub fn form_resources(&self, doc: &Document) -> FormResources {
        let mut fonts = Dict::new();
        if let Some(dr_fonts) = doc
            .dict_get(self.dict, "DR")
            .and_then(|dr| dr.as_dict()?.get("Font").cloned())
        {
            if let Some(dict) = dr_fonts.as_dict() {
                fonts = dict.clone();
            }
        }
        let mut resources = Dict::new();
        resources.insert("Font".to_string(), Object::Dictionary(fonts));
        FormResources {
            resources: Object::Dictionary(resources),
            default_da: self
                .default_appearance(doc)
                .unwrap_or_else(|| DEFAULT_DA.to_string()),
        }
    }

    /// Regenerate the appearance streams of every field in the form, then
    /// clear the `NeedAppearances` hint since the streams are now current.
    pub fn regenerate_appearances(&self, doc: &mut Document) -> Result<()> {
        let resources = self.form_resources(doc);
        for root in self.field_refs(doc) {
            regenerate_tree(doc, root, &resources)?;
        }
        self.set_need_appearances(doc, false)
    }
}

fn regenerate_tree(doc: &mut Document, dict: ObjectRef, resources: &FormResources) -> Result<()> {
    let mut field = classify(doc, dict)?;
    appearance::regenerate_field(doc, &mut field, resources)?;
    for kid in FieldNode::new(dict).child_fields(doc) {
        regenerate_tree(doc, kid, resources)?;
    }
    Ok(())
}

fn find_by_name(doc: &Document, dict: ObjectRef, prefix: &str, target: &str) -> Option<ObjectRef> {
    let node = FieldNode::new(dict);
    let name = match node.partial_name(doc) {
        Some(partial) if prefix.is_empty() => partial,
        Some(partial) => format!("{}.{}", prefix, partial),
        None => prefix.to_string(),
    };
    if name == target {
        return Some(dict);
    }
    for kid in node.child_fields(doc) {
        if let Some(found) = find_by_name(doc, kid, &name, target) {
            return Some(found);
        }
    }
    None
}
