//! Choice fields (`/FT /Ch`): combo boxes and list boxes.
//!
//! Options live in `/Opt`, either a bare string (export and display are the
//! same) or an `[export, display]` pair. The persisted value is `/V` (export
//! text) plus `/I` (sorted selection indices); `/V` wins when the two
//! disagree, and every write recomputes both.

use crate::document::Document;
use crate::error::{Error, Result};
use crate::fields::flags::ChoiceFieldFlags;
use crate::fields::FieldNode;
use crate::geometry::Rect;
use crate::object::{Object, ObjectRef};
use crate::widget::Widget;

/// One `/Opt` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    /// The exported value written into `/V`
    pub export: String,
    /// The string shown to the user
    pub display: String,
}

impl ChoiceOption {
    /// An option whose export and display strings are the same.
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            export: value.clone(),
            display: value,
        }
    }

    fn from_object(doc: &Document, obj: &Object) -> Option<ChoiceOption> {
        match doc.resolve(obj).ok()? {
            Object::String(bytes) => {
                let s = crate::object::decode_text_string(&bytes);
                Some(ChoiceOption::plain(s))
            },
            Object::Array(pair) if pair.len() == 2 => {
                let export = doc.resolve(&pair[0]).ok()?.as_text()?;
                let display = doc.resolve(&pair[1]).ok()?.as_text()?;
                Some(ChoiceOption { export, display })
            },
            _ => None,
        }
    }

    fn to_object(&self) -> Object {
        if self.export == self.display {
            Object::from_text(&self.export)
        } else {
            Object::Array(vec![
                Object::from_text(&self.export),
                Object::from_text(&self.display),
            ])
        }
    }
}

fn read_options(doc: &Document, node: &FieldNode) -> Vec<ChoiceOption> {
    node.inherited(doc, "Opt")
        .and_then(|o| {
            o.as_array().map(|arr| {
                arr.iter()
                    .filter_map(|entry| ChoiceOption::from_object(doc, entry))
                    .collect()
            })
        })
        .unwrap_or_default()
}

fn write_options(doc: &mut Document, node: &FieldNode, options: &[ChoiceOption]) -> Result<()> {
    let arr = options.iter().map(|o| o.to_object()).collect();
    doc.dict_set(node.dict_ref(), "Opt", Object::Array(arr))
}

/// Current export value(s): `/V` when present, else derived from `/I`.
fn read_values(doc: &Document, node: &FieldNode, options: &[ChoiceOption]) -> Vec<String> {
    if let Some(v) = node.inherited(doc, "V") {
        return match v {
            Object::String(bytes) => vec![crate::object::decode_text_string(&bytes)],
            Object::Array(items) => items
                .iter()
                .filter_map(|o| doc.resolve(o).ok().and_then(|o| o.as_text()))
                .collect(),
            _ => Vec::new(),
        };
    }
    read_index_array(doc, node)
        .into_iter()
        .filter_map(|i| options.get(i as usize).map(|o| o.export.clone()))
        .collect()
}

fn read_index_array(doc: &Document, node: &FieldNode) -> Vec<i64> {
    node.inherited(doc, "I")
        .and_then(|o| {
            o.as_array()
                .map(|arr| arr.iter().filter_map(|x| x.as_integer()).collect())
        })
        .unwrap_or_default()
}

/// Write `/V` and `/I` together from a sorted index selection.
fn write_selection(
    doc: &mut Document,
    node: &FieldNode,
    options: &[ChoiceOption],
    indices: &[i64],
) -> Result<()> {
    let dict = node.dict_ref();
    match indices {
        [] => {
            doc.dict_remove(dict, "V")?;
            doc.dict_remove(dict, "I")?;
        },
        [single] => {
            let export = &options[*single as usize].export;
            doc.dict_set(dict, "V", Object::from_text(export))?;
            doc.dict_set(dict, "I", Object::Array(vec![Object::Integer(*single)]))?;
        },
        many => {
            let values = many
                .iter()
                .map(|&i| Object::from_text(&options[i as usize].export))
                .collect();
            doc.dict_set(dict, "V", Object::Array(values))?;
            let idx = many.iter().map(|&i| Object::Integer(i)).collect();
            doc.dict_set(dict, "I", Object::Array(idx))?;
        },
    }
    Ok(())
}

fn check_index(index: i64, count: usize) -> Result<()> {
    if index < -1 || index >= count as i64 {
        return Err(Error::IndexOutOfRange {
            index,
            valid: format!("-1..{}", count),
        });
    }
    Ok(())
}

fn create_choice(
    doc: &mut Document,
    name: &str,
    page: ObjectRef,
    rect: Rect,
    options: &[ChoiceOption],
    flags: ChoiceFieldFlags,
) -> Result<FieldNode> {
    let widget = Widget::create(doc, rect);
    let r = widget.dict_ref();
    doc.dict_set(r, "FT", Object::Name("Ch".to_string()))?;
    doc.dict_set(r, "T", Object::from_text(name))?;
    doc.dict_set(r, "Ff", Object::Integer(flags.bits() as i64))?;
    let node = FieldNode::new(r);
    write_options(doc, &node, options)?;
    doc.add_annotation(page, r)?;
    Ok(node)
}

/// A dropdown (`/FT /Ch` with the combo flag).
#[derive(Debug, Clone)]
pub struct ComboBoxField {
    node: FieldNode,
    options: Option<Vec<ChoiceOption>>,
}

impl ComboBoxField {
    /// Wrap a classified field node.
    pub fn new(node: FieldNode) -> Self {
        Self { node, options: None }
    }

    /// Create a fresh combo box as a merged field/widget dictionary.
    pub fn create(
        doc: &mut Document,
        name: &str,
        page: ObjectRef,
        rect: Rect,
        options: &[ChoiceOption],
    ) -> Result<ComboBoxField> {
        let node = create_choice(doc, name, page, rect, options, ChoiceFieldFlags::COMBO)?;
        Ok(ComboBoxField::new(node))
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

    /// Whether the user may type a value not present in the options.
    pub fn is_editable(&self, doc: &Document) -> bool {
        ChoiceFieldFlags::from_bits_truncate(self.node.flag_bits(doc))
            .contains(ChoiceFieldFlags::EDIT)
    }

    /// The option list, memoized.
    pub fn options(&mut self, doc: &Document) -> &[ChoiceOption] {
        if self.options.is_none() {
            self.options = Some(read_options(doc, &self.node));
        }
        self.options.as_deref().unwrap_or(&[])
    }

    /// Drop the memoized option list.
    pub fn invalidate_options(&mut self) {
        self.options = None;
    }

    /// Replace the option list; display strings double as exports.
    pub fn set_options(&mut self, doc: &mut Document, displays: &[&str]) -> Result<()> {
        let options: Vec<ChoiceOption> =
            displays.iter().map(|d| ChoiceOption::plain(*d)).collect();
        write_options(doc, &self.node, &options)?;
        self.options = Some(options);
        Ok(())
    }

    /// Replace the option list with distinct export and display strings.
    ///
    /// The two slices must be the same length.
    pub fn set_options_with_exports(
        &mut self,
        doc: &mut Document,
        exports: &[&str],
        displays: &[&str],
    ) -> Result<()> {
        if exports.len() != displays.len() {
            return Err(Error::OptionCountMismatch {
                exports: exports.len(),
                options: displays.len(),
            });
        }
        let options: Vec<ChoiceOption> = exports
            .iter()
            .zip(displays)
            .map(|(e, d)| ChoiceOption {
                export: (*e).to_string(),
                display: (*d).to_string(),
            })
            .collect();
        write_options(doc, &self.node, &options)?;
        self.options = Some(options);
        Ok(())
    }

    /// The current export value. `/V` wins over `/I`.
    pub fn value(&mut self, doc: &Document) -> Option<String> {
        let options = self.options(doc).to_vec();
        read_values(doc, &self.node, &options).into_iter().next()
    }

    /// Index of the current value among the options, or -1.
    pub fn selected_index(&mut self, doc: &Document) -> i64 {
        let Some(value) = self.value(doc) else { return -1 };
        self.options(doc)
            .iter()
            .position(|o| o.export == value)
            .map(|i| i as i64)
            .unwrap_or(-1)
    }

    /// Set the value by export string.
    ///
    /// A value outside the options is accepted only for editable combos;
    /// it is stored in `/V` with no `/I` entry.
    pub fn set_value(&mut self, doc: &mut Document, value: &str) -> Result<()> {
        if self.node.is_read_only(doc) {
            return Err(Error::ReadOnlyField(self.node.fully_qualified_name(doc)));
        }
        let options = self.options(doc).to_vec();
        match options.iter().position(|o| o.export == value) {
            Some(index) => write_selection(doc, &self.node, &options, &[index as i64]),
            None if self.is_editable(doc) => {
                doc.dict_set(self.node.dict_ref(), "V", Object::from_text(value))?;
                doc.dict_remove(self.node.dict_ref(), "I")
            },
            None => Err(Error::UnsupportedValue {
                field: self.node.fully_qualified_name(doc),
                value_type: format!("free-text ({:?})", value),
            }),
        }
    }

    /// Select by index; -1 clears.
    pub fn set_selected_index(&mut self, doc: &mut Document, index: i64) -> Result<()> {
        if self.node.is_read_only(doc) {
            return Err(Error::ReadOnlyField(self.node.fully_qualified_name(doc)));
        }
        let options = self.options(doc).to_vec();
        check_index(index, options.len())?;
        if index < 0 {
            write_selection(doc, &self.node, &options, &[])
        } else {
            write_selection(doc, &self.node, &options, &[index])
        }
    }
}

/// A scrolling list (`/FT /Ch` without the combo flag).
#[derive(Debug, Clone)]
pub struct ListBoxField {
    node: FieldNode,
    options: Option<Vec<ChoiceOption>>,
}

impl ListBoxField {
    /// Wrap a classified field node.
    pub fn new(node: FieldNode) -> Self {
        Self { node, options: None }
    }

    /// Create a fresh list box as a merged field/widget dictionary.
    pub fn create(
        doc: &mut Document,
        name: &str,
        page: ObjectRef,
        rect: Rect,
        options: &[ChoiceOption],
    ) -> Result<ListBoxField> {
        let node = create_choice(doc, name, page, rect, options, ChoiceFieldFlags::empty())?;
        Ok(ListBoxField::new(node))
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

    /// Whether multiple entries may be selected at once.
    pub fn is_multi_select(&self, doc: &Document) -> bool {
        ChoiceFieldFlags::from_bits_truncate(self.node.flag_bits(doc))
            .contains(ChoiceFieldFlags::MULTI_SELECT)
    }

    /// The option list, memoized.
    pub fn options(&mut self, doc: &Document) -> &[ChoiceOption] {
        if self.options.is_none() {
            self.options = Some(read_options(doc, &self.node));
        }
        self.options.as_deref().unwrap_or(&[])
    }

    /// Drop the memoized option list.
    pub fn invalidate_options(&mut self) {
        self.options = None;
    }

    /// Replace the option list; display strings double as exports.
    pub fn set_options(&mut self, doc: &mut Document, displays: &[&str]) -> Result<()> {
        let options: Vec<ChoiceOption> =
            displays.iter().map(|d| ChoiceOption::plain(*d)).collect();
        write_options(doc, &self.node, &options)?;
        self.options = Some(options);
        Ok(())
    }

    /// Current export values; `/V` wins over `/I`.
    pub fn values(&mut self, doc: &Document) -> Vec<String> {
        let options = self.options(doc).to_vec();
        read_values(doc, &self.node, &options)
    }

    /// The single current export value, if exactly one entry is selected.
    pub fn value(&mut self, doc: &Document) -> Option<String> {
        let mut values = self.values(doc);
        if values.len() == 1 {
            values.pop()
        } else {
            None
        }
    }

    /// Indices of the selected entries, sorted ascending.
    ///
    /// Derived from the current values so `/V` wins when `/I` disagrees.
    pub fn selected_indices(&mut self, doc: &Document) -> Vec<i64> {
        let values = self.values(doc);
        let options = self.options(doc);
        let mut indices: Vec<i64> = values
            .iter()
            .filter_map(|v| options.iter().position(|o| &o.export == v))
            .map(|i| i as i64)
            .collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    /// Select a single entry by index; -1 clears.
    pub fn set_selected_index(&mut self, doc: &mut Document, index: i64) -> Result<()> {
        if index < 0 {
            check_index(index, self.options(doc).len())?;
            return self.set_selected_indices(doc, &[]);
        }
        self.set_selected_indices(doc, &[index])
    }

    /// Replace the selection; indices are validated, sorted and deduplicated.
    pub fn set_selected_indices(&mut self, doc: &mut Document, indices: &[i64]) -> Result<()> {
        if self.node.is_read_only(doc) {
            return Err(Error::ReadOnlyField(self.node.fully_qualified_name(doc)));
        }
        let options = self.options(doc).to_vec();
        let mut sorted = indices.to_vec();
        for &index in &sorted {
            if index < 0 || index >= options.len() as i64 {
                return Err(Error::IndexOutOfRange {
                    index,
                    valid: format!("0..{}", options.len()),
                });
            }
        }
        sorted.sort_unstable();
        sorted.dedup();
        write_selection(doc, &self.node, &options, &sorted)
    }

    /// Select a single entry by export value.
    pub fn set_value(&mut self, doc: &mut Document, value: &str) -> Result<()> {
        let index = self
            .options(doc)
            .iter()
            .position(|o| o.export == value)
            .ok_or_else(|| Error::UnsupportedValue {
                field: self.node.fully_qualified_name(doc),
                value_type: format!("free-text ({:?})", value),
            })?;
        self.set_selected_indices(doc, &[index as i64])
    }

    /// Index of the first visible entry (`/TI`); 0 when absent.
    pub fn top_index(&self, doc: &Document) -> i64 {
        self.node
            .inherited(doc, "TI")
            .and_then(|o| o.as_integer())
            .unwrap_or(0)
    }

    /// Set the first visible entry. Negative indices are rejected; an index
    /// past the last option is clamped at render time, not here.
    pub fn set_top_index(&mut self, doc: &mut Document, index: i64) -> Result<()> {
        if index < 0 {
            return Err(Error::IndexOutOfRange {
                index,
                valid: "0..".to_string(),
            });
        }
        doc.dict_set(self.node.dict_ref(), "TI", Object::Integer(index))
    }
}
