//! Radio button groups: one field, one widget per option, at most one on.

use crate::document::Document;
use crate::error::{Error, Result};
use crate::fields::flags::ButtonFieldFlags;
use crate::fields::FieldNode;
use crate::geometry::Rect;
use crate::object::{Dict, Object, ObjectRef};
use crate::widget::{Widget, OFF_STATE};

/// An exclusive group of toggles.
#[derive(Debug, Clone)]
pub struct RadioButtonField {
    node: FieldNode,
    options: Option<Vec<String>>,
}

impl RadioButtonField {
    /// Wrap a classified field node.
    pub fn new(node: FieldNode) -> Self {
        Self { node, options: None }
    }

    /// Create a fresh radio group with one widget per option, all off.
    ///
    /// Each widget gets `/Off` plus its option name as appearance states so
    /// the group is classifiable and selectable before any appearance
    /// synthesis runs.
    pub fn create(
        doc: &mut Document,
        name: &str,
        page: ObjectRef,
        options: &[(&str, Rect)],
    ) -> Result<RadioButtonField> {
        let mut group = Dict::new();
        group.insert("FT".to_string(), Object::Name("Btn".to_string()));
        group.insert("T".to_string(), Object::from_text(name));
        group.insert(
            "Ff".to_string(),
            Object::Integer(ButtonFieldFlags::RADIO.bits() as i64),
        );
        group.insert("V".to_string(), Object::Name(OFF_STATE.to_string()));
        group.insert("Kids".to_string(), Object::Array(Vec::new()));
        let group = doc.add_object(Object::Dictionary(group));

        for (option, rect) in options {
            let widget = Widget::create(doc, *rect);
            let r = widget.dict_ref();
            doc.dict_set(r, "Parent", Object::Reference(group))?;
            let stream = doc.add_object(Object::Stream {
                dict: Dict::new(),
                data: bytes::Bytes::new(),
            });
            widget.set_normal_appearance(doc, OFF_STATE, stream)?;
            let stream = doc.add_object(Object::Stream {
                dict: Dict::new(),
                data: bytes::Bytes::new(),
            });
            widget.set_normal_appearance(doc, option, stream)?;
            widget.set_appearance_state(doc, OFF_STATE)?;
            doc.add_annotation(page, r)?;

            let kids = doc
                .dict_mut(group)?
                .get_mut("Kids")
                .and_then(|o| o.as_array_mut())
                .ok_or_else(|| Error::InvalidForm("radio group lost its Kids array".to_string()))?;
            kids.push(Object::Reference(r));
        }
        Ok(RadioButtonField::new(FieldNode::new(group)))
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

    /// Whether widgets sharing an option name toggle together.
    pub fn in_unison(&self, doc: &Document) -> bool {
        ButtonFieldFlags::from_bits_truncate(self.node.flag_bits(doc))
            .contains(ButtonFieldFlags::RADIOS_IN_UNISON)
    }

    /// The group's option names, one per widget in widget order.
    ///
    /// Memoized; call [`RadioButtonField::invalidate_options`] after changing
    /// the widget set or their appearance dictionaries.
    pub fn options(&mut self, doc: &Document) -> Result<&[String]> {
        if self.options.is_none() {
            let widgets = self.node.widgets(doc)?;
            let names = widgets
                .iter()
                .map(|w| {
                    w.non_off_name(doc)
                        .unwrap_or_else(|| OFF_STATE.to_string())
                })
                .collect();
            self.options = Some(names);
        }
        Ok(self.options.as_deref().unwrap_or(&[]))
    }

    /// Drop the memoized option list (and the widget cache beneath it).
    pub fn invalidate_options(&mut self) {
        self.options = None;
        self.node.invalidate_widgets();
    }

    /// Index of the selected widget, or -1 when the group is off.
    pub fn selected_index(&mut self, doc: &Document) -> Result<i64> {
        let value = self
            .node
            .inherited(doc, "V")
            .and_then(|o| o.as_name().map(|s| s.to_string()));
        let Some(value) = value else { return Ok(-1) };
        if value == OFF_STATE {
            return Ok(-1);
        }
        let options = self.options(doc)?;
        Ok(options
            .iter()
            .position(|name| name == &value)
            .map(|i| i as i64)
            .unwrap_or(-1))
    }

    /// The selected option name, or `None` when the group is off.
    pub fn value(&self, doc: &Document) -> Option<String> {
        self.node
            .inherited(doc, "V")
            .and_then(|o| o.as_name().map(|s| s.to_string()))
            .filter(|v| v != OFF_STATE)
    }

    /// Select the widget at `index`, or clear the group with -1.
    ///
    /// The widget at `index` turns on; in unison mode every widget sharing
    /// its option name turns on with it; everything else goes to `/Off`.
    /// Indices outside `[-1, option count)` fail with
    /// [`Error::IndexOutOfRange`].
    pub fn set_selected_index(&mut self, doc: &mut Document, index: i64) -> Result<()> {
        if self.node.is_read_only(doc) {
            return Err(Error::ReadOnlyField(self.node.fully_qualified_name(doc)));
        }
        let options = self.options(doc)?.to_vec();
        if index < -1 || index >= options.len() as i64 {
            return Err(Error::IndexOutOfRange {
                index,
                valid: format!("-1..{}", options.len()),
            });
        }

        let unison = self.in_unison(doc);
        let selected = if index >= 0 {
            Some(options[index as usize].clone())
        } else {
            None
        };

        let value = selected.clone().unwrap_or_else(|| OFF_STATE.to_string());
        doc.dict_set(self.node.dict_ref(), "V", Object::Name(value))?;

        let widgets: Vec<Widget> = self.node.widgets(doc)?.to_vec();
        for (i, widget) in widgets.iter().enumerate() {
            let on = match &selected {
                Some(name) if unison => options.get(i).map(|n| n == name).unwrap_or(false),
                Some(_) => i as i64 == index,
                None => false,
            };
            let state = if on {
                options[i].clone()
            } else {
                OFF_STATE.to_string()
            };
            widget.set_appearance_state(doc, &state)?;
        }
        Ok(())
    }

    /// Select an option by name.
    pub fn set_value(&mut self, doc: &mut Document, option: &str) -> Result<()> {
        let index = self
            .options(doc)?
            .iter()
            .position(|name| name == option)
            .ok_or_else(|| {
                Error::InvalidForm(format!(
                    "radio group {} has no option named {}",
                    self.node.fully_qualified_name(doc),
                    option
                ))
            })?;
        self.set_selected_index(doc, index as i64)
    }
}
