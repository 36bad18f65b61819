//! In-memory document object store and page model.
//!
//! The field engine treats the surrounding document as a service: resolve an
//! indirect reference, read/write typed values under a key, enumerate a page's
//! annotations, append content operators to a page. This module is the
//! in-memory implementation of that service boundary; parsing and serializing
//! actual PDF bytes live outside this crate.

use crate::error::{Error, Result};
use crate::object::{Dict, Object, ObjectRef};
use std::collections::HashMap;

/// A document: indirect object store, page list, and the interactive form root.
///
/// The document is the unit of exclusive ownership; all field wrappers address
/// it through `ObjectRef` keys rather than owning pointers.
#[derive(Debug, Default)]
pub struct Document {
    objects: HashMap<ObjectRef, Object>,
    next_id: u32,
    pages: Vec<ObjectRef>,
    acroform: Option<ObjectRef>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self {
            objects: HashMap::new(),
            next_id: 1,
            pages: Vec::new(),
            acroform: None,
        }
    }

    /// Store an object, allocating a fresh reference for it.
    pub fn add_object(&mut self, obj: Object) -> ObjectRef {
        let r = ObjectRef::new(self.next_id, 0);
        self.next_id += 1;
        self.objects.insert(r, obj);
        r
    }

    /// Replace the object stored under `r`.
    pub fn set_object(&mut self, r: ObjectRef, obj: Object) {
        self.objects.insert(r, obj);
    }

    /// Remove an object from the cross-reference store.
    pub fn remove_object(&mut self, r: ObjectRef) -> Option<Object> {
        self.objects.remove(&r)
    }

    /// Whether `r` still resolves to a stored object.
    pub fn contains(&self, r: ObjectRef) -> bool {
        self.objects.contains_key(&r)
    }

    /// Look up the object stored under `r`.
    pub fn get(&self, r: ObjectRef) -> Result<&Object> {
        self.objects
            .get(&r)
            .ok_or(Error::ObjectNotFound(r.id, r.gen))
    }

    /// Look up the object stored under `r`, mutably.
    pub fn get_mut(&mut self, r: ObjectRef) -> Result<&mut Object> {
        self.objects
            .get_mut(&r)
            .ok_or(Error::ObjectNotFound(r.id, r.gen))
    }

    /// Resolve an object that may be an indirect reference.
    ///
    /// References are followed (one level; stored objects are never
    /// references themselves), everything else is returned as a clone.
    pub fn resolve(&self, obj: &Object) -> Result<Object> {
        if let Some(r) = obj.as_reference() {
            self.get(r).cloned()
        } else {
            Ok(obj.clone())
        }
    }

    /// View the object at `r` as a dictionary (works for streams too).
    pub fn dict(&self, r: ObjectRef) -> Result<&Dict> {
        let obj = self.get(r)?;
        obj.as_dict().ok_or_else(|| Error::InvalidObjectType {
            expected: "Dictionary".to_string(),
            found: obj.type_name().to_string(),
        })
    }

    /// View the object at `r` as a mutable dictionary.
    pub fn dict_mut(&mut self, r: ObjectRef) -> Result<&mut Dict> {
        let obj = self
            .objects
            .get_mut(&r)
            .ok_or(Error::ObjectNotFound(r.id, r.gen))?;
        let found = obj.type_name().to_string();
        obj.as_dict_mut().ok_or(Error::InvalidObjectType {
            expected: "Dictionary".to_string(),
            found,
        })
    }

    /// Read a key from the dictionary at `r`, resolving one indirection.
    ///
    /// Returns `None` when the key is absent or holds `null`.
    pub fn dict_get(&self, r: ObjectRef, key: &str) -> Option<Object> {
        let value = self.dict(r).ok()?.get(key)?;
        match self.resolve(value) {
            Ok(Object::Null) => None,
            Ok(obj) => Some(obj),
            Err(_) => None,
        }
    }

    /// Write a key into the dictionary at `r`.
    pub fn dict_set(&mut self, r: ObjectRef, key: &str, value: Object) -> Result<()> {
        self.dict_mut(r)?.insert(key.to_string(), value);
        Ok(())
    }

    /// Remove a key from the dictionary at `r`.
    pub fn dict_remove(&mut self, r: ObjectRef, key: &str) -> Result<()> {
        self.dict_mut(r)?.shift_remove(key);
        Ok(())
    }

    /// Get-or-create a direct sub-dictionary under `key` in the dictionary at
    /// `r`, returning it mutably. Used for lazily created entries like `/MK`.
    pub fn ensure_sub_dict(&mut self, r: ObjectRef, key: &str) -> Result<&mut Dict> {
        let dict = self.dict_mut(r)?;
        let entry = dict
            .entry(key.to_string())
            .or_insert_with(|| Object::Dictionary(Dict::new()));
        let found = entry.type_name().to_string();
        entry.as_dict_mut().ok_or(Error::InvalidObjectType {
            expected: "Dictionary".to_string(),
            found,
        })
    }

    // === Pages ===

    /// Append a new page of the given size; returns its reference.
    pub fn add_page(&mut self, width: f64, height: f64) -> ObjectRef {
        let contents = self.add_object(Object::Stream {
            dict: Dict::new(),
            data: bytes::Bytes::new(),
        });
        let mut page = Dict::new();
        page.insert("Type".to_string(), Object::Name("Page".to_string()));
        page.insert(
            "MediaBox".to_string(),
            Object::Array(vec![
                Object::Real(0.0),
                Object::Real(0.0),
                Object::Real(width),
                Object::Real(height),
            ]),
        );
        page.insert("Annots".to_string(), Object::Array(Vec::new()));
        page.insert("Contents".to_string(), Object::Reference(contents));
        let r = self.add_object(Object::Dictionary(page));
        self.pages.push(r);
        r
    }

    /// References of all pages, in document order.
    pub fn pages(&self) -> &[ObjectRef] {
        &self.pages
    }

    /// The annotation references of a page.
    pub fn page_annotations(&self, page: ObjectRef) -> Result<Vec<ObjectRef>> {
        let annots = match self.dict_get(page, "Annots") {
            Some(obj) => obj,
            None => return Ok(Vec::new()),
        };
        let arr = annots.as_array().ok_or_else(|| Error::InvalidObjectType {
            expected: "Array".to_string(),
            found: annots.type_name().to_string(),
        })?;
        Ok(arr.iter().filter_map(|o| o.as_reference()).collect())
    }

    /// Attach an annotation to a page: adds it to `/Annots` and back-links
    /// the page through the annotation's `/P` entry.
    pub fn add_annotation(&mut self, page: ObjectRef, annot: ObjectRef) -> Result<()> {
        self.dict_set(annot, "P", Object::Reference(page))?;
        let dict = self.dict_mut(page)?;
        let annots = dict
            .entry("Annots".to_string())
            .or_insert_with(|| Object::Array(Vec::new()));
        let found = annots.type_name().to_string();
        let arr = annots.as_array_mut().ok_or(Error::InvalidObjectType {
            expected: "Array".to_string(),
            found,
        })?;
        arr.push(Object::Reference(annot));
        Ok(())
    }

    /// Detach an annotation from a page's `/Annots` list.
    pub fn remove_annotation(&mut self, page: ObjectRef, annot: ObjectRef) -> Result<()> {
        let dict = self.dict_mut(page)?;
        if let Some(arr) = dict.get_mut("Annots").and_then(|o| o.as_array_mut()) {
            arr.retain(|o| o.as_reference() != Some(annot));
        }
        Ok(())
    }

    /// Append raw content operators to a page's content stream.
    pub fn append_page_content(&mut self, page: ObjectRef, ops: &[u8]) -> Result<()> {
        let contents_ref = self
            .dict(page)?
            .get("Contents")
            .and_then(|o| o.as_reference())
            .ok_or_else(|| Error::InvalidForm("page has no content stream".to_string()))?;
        let obj = self.get_mut(contents_ref)?;
        match obj {
            Object::Stream { data, .. } => {
                let mut buf = Vec::with_capacity(data.len() + ops.len() + 1);
                buf.extend_from_slice(data);
                if !buf.is_empty() && !buf.ends_with(b"\n") {
                    buf.push(b'\n');
                }
                buf.extend_from_slice(ops);
                *data = bytes::Bytes::from(buf);
                Ok(())
            },
            other => Err(Error::InvalidObjectType {
                expected: "Stream".to_string(),
                found: other.type_name().to_string(),
            }),
        }
    }

    /// The decoded bytes of a page's content stream.
    pub fn page_content(&self, page: ObjectRef) -> Result<Vec<u8>> {
        let contents = match self.dict_get(page, "Contents") {
            Some(obj) => obj,
            None => return Ok(Vec::new()),
        };
        match contents {
            Object::Stream { data, .. } => Ok(data.to_vec()),
            other => Err(Error::InvalidObjectType {
                expected: "Stream".to_string(),
                found: other.type_name().to_string(),
            }),
        }
    }

    // === Interactive form root ===

    /// Reference to the document's AcroForm dictionary, if any.
    pub fn acroform_ref(&self) -> Option<ObjectRef> {
        self.acroform
    }

    /// Install or clear the document's AcroForm reference.
    pub fn set_acroform_ref(&mut self, r: Option<ObjectRef>) {
        self.acroform = r;
    }
}
