//! Widget annotations: one visual, page-placed instance of a field.

use crate::document::Document;
use crate::error::{Error, Result};
use crate::fields::flags::AnnotationFlags;
use crate::geometry::Rect;
use crate::object::{Dict, Object, ObjectRef};

/// The appearance-state name meaning "unchecked/unselected" for every
/// toggleable widget.
pub const OFF_STATE: &str = "Off";

/// A device color from an appearance-characteristics (`/MK`) color array.
///
/// Array length selects the color space: empty means "no color" (transparent),
/// one component grayscale, three RGB, four CMYK.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    /// Zero-length array: explicitly no color
    Transparent,
    /// One component: grayscale
    Gray(f32),
    /// Three components: RGB
    Rgb(f32, f32, f32),
    /// Four components: CMYK
    Cmyk(f32, f32, f32, f32),
}

impl Color {
    /// Decode an `/MK/BC` or `/MK/BG` array.
    pub fn from_array(arr: &[Object]) -> Option<Color> {
        let mut comps = Vec::with_capacity(arr.len());
        for item in arr {
            comps.push(item.as_number()? as f32);
        }
        match comps.as_slice() {
            [] => Some(Color::Transparent),
            [g] => Some(Color::Gray(*g)),
            [r, g, b] => Some(Color::Rgb(*r, *g, *b)),
            [c, m, y, k] => Some(Color::Cmyk(*c, *m, *y, *k)),
            _ => None,
        }
    }

    /// Encode back into an `/MK` color array object.
    pub fn to_array(&self) -> Object {
        let comps = match self {
            Color::Transparent => vec![],
            Color::Gray(g) => vec![*g],
            Color::Rgb(r, g, b) => vec![*r, *g, *b],
            Color::Cmyk(c, m, y, k) => vec![*c, *m, *y, *k],
        };
        Object::Array(comps.into_iter().map(|v| Object::Real(v as f64)).collect())
    }

    /// Content-stream operators selecting this color for filling, or `None`
    /// for a transparent color.
    pub fn fill_ops(&self) -> Option<String> {
        match self {
            Color::Transparent => None,
            Color::Gray(g) => Some(format!("{} g", g)),
            Color::Rgb(r, g, b) => Some(format!("{} {} {} rg", r, g, b)),
            Color::Cmyk(c, m, y, k) => Some(format!("{} {} {} {} k", c, m, y, k)),
        }
    }

    /// Content-stream operators selecting this color for stroking.
    pub fn stroke_ops(&self) -> Option<String> {
        match self {
            Color::Transparent => None,
            Color::Gray(g) => Some(format!("{} G", g)),
            Color::Rgb(r, g, b) => Some(format!("{} {} {} RG", r, g, b)),
            Color::Cmyk(c, m, y, k) => Some(format!("{} {} {} {} K", c, m, y, k)),
        }
    }
}

/// One visual placement of a field on a page.
///
/// Border and background colors are decoded once, at construction, from the
/// `/MK` sub-dictionary; they are a cached snapshot and do NOT track later
/// mutation of the underlying dictionary. Call [`Widget::refresh_colors`] to
/// re-snapshot after such a mutation.
#[derive(Debug, Clone)]
pub struct Widget {
    dict: ObjectRef,
    back_color: Option<Color>,
    border_color: Option<Color>,
}

impl Widget {
    /// Wrap an existing annotation dictionary.
    ///
    /// Fails with [`Error::NotAWidget`] when the dictionary does not carry
    /// `/Subtype /Widget`.
    pub fn from_dict(doc: &Document, dict: ObjectRef) -> Result<Widget> {
        let subtype = doc
            .dict_get(dict, "Subtype")
            .and_then(|o| o.as_name().map(|s| s.to_string()));
        match subtype.as_deref() {
            Some("Widget") => {},
            Some(other) => return Err(Error::NotAWidget(other.to_string())),
            None => return Err(Error::NotAWidget("absent".to_string())),
        }
        let (back, border) = Self::read_colors(doc, dict);
        Ok(Widget {
            dict,
            back_color: back,
            border_color: border,
        })
    }

    /// Create a fresh widget annotation with the given placement.
    ///
    /// The widget starts unplaced (no `/P`) until attached to a page via
    /// [`Document::add_annotation`].
    pub fn create(doc: &mut Document, rect: Rect) -> Widget {
        let mut dict = Dict::new();
        dict.insert("Type".to_string(), Object::Name("Annot".to_string()));
        dict.insert("Subtype".to_string(), Object::Name("Widget".to_string()));
        dict.insert("Rect".to_string(), rect.to_array());
        dict.insert(
            "F".to_string(),
            Object::Integer(AnnotationFlags::PRINT.bits() as i64),
        );
        let r = doc.add_object(Object::Dictionary(dict));
        Widget {
            dict: r,
            back_color: None,
            border_color: None,
        }
    }

    fn read_colors(doc: &Document, dict: ObjectRef) -> (Option<Color>, Option<Color>) {
        let mk = doc
            .dict_get(dict, "MK")
            .and_then(|o| o.as_dict().cloned());
        let decode = |key: &str| -> Option<Color> {
            mk.as_ref()?
                .get(key)
                .and_then(|o| doc.resolve(o).ok())
                .and_then(|o| o.as_array().and_then(|arr| Color::from_array(arr)))
        };
        (decode("BG"), decode("BC"))
    }

    /// Reference of the underlying annotation dictionary.
    pub fn dict_ref(&self) -> ObjectRef {
        self.dict
    }

    /// The widget's placement rectangle, if set.
    pub fn rect(&self, doc: &Document) -> Option<Rect> {
        doc.dict_get(self.dict, "Rect")
            .and_then(|o| o.as_array().and_then(|arr| Rect::from_array(arr)))
    }

    /// Place (or re-place) the widget.
    pub fn set_rect(&self, doc: &mut Document, rect: Rect) -> Result<()> {
        doc.dict_set(self.dict, "Rect", rect.to_array())
    }

    /// The page this widget is placed on, if any.
    pub fn page(&self, doc: &Document) -> Option<ObjectRef> {
        doc.dict(self.dict).ok()?.get("P")?.as_reference()
    }

    /// Counter-clockwise rotation in degrees; 0 when absent.
    pub fn rotation(&self, doc: &Document) -> i32 {
        doc.dict_get(self.dict, "MK")
            .and_then(|mk| {
                mk.as_dict()?
                    .get("R")
                    .and_then(|o| o.as_integer())
            })
            .unwrap_or(0) as i32
    }

    /// Set the rotation, creating the `/MK` sub-dictionary lazily.
    ///
    /// The value is normalized into {0, 90, 180, 270}.
    pub fn set_rotation(&self, doc: &mut Document, degrees: i32) -> Result<()> {
        let normalized = degrees.rem_euclid(360) / 90 * 90;
        let mk = doc.ensure_sub_dict(self.dict, "MK")?;
        mk.insert("R".to_string(), Object::Integer(normalized as i64));
        Ok(())
    }

    /// Background color snapshot taken at construction.
    pub fn back_color(&self) -> Option<Color> {
        self.back_color
    }

    /// Border color snapshot taken at construction.
    pub fn border_color(&self) -> Option<Color> {
        self.border_color
    }

    /// Write the background color into `/MK/BG`.
    ///
    /// The in-memory snapshot is left untouched; call
    /// [`Widget::refresh_colors`] to observe the change.
    pub fn set_back_color(&self, doc: &mut Document, color: Color) -> Result<()> {
        let mk = doc.ensure_sub_dict(self.dict, "MK")?;
        mk.insert("BG".to_string(), color.to_array());
        Ok(())
    }

    /// Write the border color into `/MK/BC`; same snapshot caveat as
    /// [`Widget::set_back_color`].
    pub fn set_border_color(&self, doc: &mut Document, color: Color) -> Result<()> {
        let mk = doc.ensure_sub_dict(self.dict, "MK")?;
        mk.insert("BC".to_string(), color.to_array());
        Ok(())
    }

    /// Re-decode the color snapshot from the underlying dictionary.
    pub fn refresh_colors(&mut self, doc: &Document) {
        let (back, border) = Self::read_colors(doc, self.dict);
        self.back_color = back;
        self.border_color = border;
    }

    /// Annotation flags from `/F`; empty when absent.
    pub fn annotation_flags(&self, doc: &Document) -> AnnotationFlags {
        doc.dict_get(self.dict, "F")
            .and_then(|o| o.as_integer())
            .map(|bits| AnnotationFlags::from_bits_truncate(bits as u32))
            .unwrap_or_default()
    }

    /// Set the annotation flags.
    pub fn set_annotation_flags(&self, doc: &mut Document, flags: AnnotationFlags) -> Result<()> {
        doc.dict_set(self.dict, "F", Object::Integer(flags.bits() as i64))
    }

    /// The current appearance-state name (`/AS`), if set.
    pub fn appearance_state(&self, doc: &Document) -> Option<String> {
        doc.dict_get(self.dict, "AS")
            .and_then(|o| o.as_name().map(|s| s.to_string()))
    }

    /// Select which appearance sub-stream is current.
    pub fn set_appearance_state(&self, doc: &mut Document, state: &str) -> Result<()> {
        doc.dict_set(self.dict, "AS", Object::Name(state.to_string()))
    }

    /// Whether the widget carries an appearance dictionary (`/AP`).
    pub fn has_appearance(&self, doc: &Document) -> bool {
        doc.dict_get(self.dict, "AP").is_some()
    }

    /// State names available under the normal appearance (`/AP/N`), in
    /// dictionary order. Empty when `/AP/N` is absent or a bare stream.
    pub fn appearance_state_names(&self, doc: &Document) -> Vec<String> {
        self.normal_appearance(doc)
            .and_then(|n| match n {
                Object::Dictionary(d) => Some(d.keys().cloned().collect()),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// The widget's "on" name: the first key of `/AP/N` that is not the
    /// `/Off` sentinel.
    pub fn non_off_name(&self, doc: &Document) -> Option<String> {
        self.appearance_state_names(doc)
            .into_iter()
            .find(|name| name != OFF_STATE)
    }

    fn normal_appearance(&self, doc: &Document) -> Option<Object> {
        let ap = doc.dict_get(self.dict, "AP")?;
        let n = ap.as_dict()?.get("N")?;
        doc.resolve(n).ok()
    }

    /// Resolve the appearance stream selected by the current `/AS` name.
    ///
    /// A bare-stream `/AP/N` is returned directly; a state-keyed dictionary is
    /// indexed by `/AS`.
    pub fn current_appearance_stream(&self, doc: &Document) -> Option<Object> {
        match self.normal_appearance(doc)? {
            stream @ Object::Stream { .. } => Some(stream),
            Object::Dictionary(states) => {
                let state = self.appearance_state(doc)?;
                let entry = states.get(&state)?;
                match doc.resolve(entry).ok()? {
                    stream @ Object::Stream { .. } => Some(stream),
                    _ => None,
                }
            },
            _ => None,
        }
    }

    /// Install a normal-appearance sub-stream under `state`, creating the
    /// `/AP` and `/AP/N` dictionaries lazily.
    pub fn set_normal_appearance(
        &self,
        doc: &mut Document,
        state: &str,
        stream: ObjectRef,
    ) -> Result<()> {
        let ap = doc.ensure_sub_dict(self.dict, "AP")?;
        let n = ap
            .entry("N".to_string())
            .or_insert_with(|| Object::Dictionary(Dict::new()));
        let found = n.type_name().to_string();
        let states = n.as_dict_mut().ok_or(Error::InvalidObjectType {
            expected: "Dictionary".to_string(),
            found,
        })?;
        states.insert(state.to_string(), Object::Reference(stream));
        Ok(())
    }

    /// Install a single (state-less) normal appearance stream, as used by
    /// text and choice fields.
    pub fn set_normal_appearance_stream(
        &self,
        doc: &mut Document,
        stream: ObjectRef,
    ) -> Result<()> {
        let ap = doc.ensure_sub_dict(self.dict, "AP")?;
        ap.insert("N".to_string(), Object::Reference(stream));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget_dict(doc: &mut Document, subtype: &str) -> ObjectRef {
        let mut dict = Dict::new();
        dict.insert("Subtype".to_string(), Object::Name(subtype.to_string()));
        doc.add_object(Object::Dictionary(dict))
    }

    #[test]
    fn test_from_dict_requires_widget_subtype() {
        let mut doc = Document::new();
        let ok = widget_dict(&mut doc, "Widget");
        assert!(Widget::from_dict(&doc, ok).is_ok());

        let bad = widget_dict(&mut doc, "Link");
        match Widget::from_dict(&doc, bad) {
            Err(Error::NotAWidget(name)) => assert_eq!(name, "Link"),
            other => panic!("expected NotAWidget, got {:?}", other),
        }
    }

    #[test]
    fn test_color_decode_by_length() {
        assert_eq!(Color::from_array(&[]), Some(Color::Transparent));
        assert_eq!(Color::from_array(&[Object::Real(0.5)]), Some(Color::Gray(0.5)));
        assert_eq!(
            Color::from_array(&[Object::Integer(1), Object::Integer(0), Object::Integer(0)]),
            Some(Color::Rgb(1.0, 0.0, 0.0))
        );
        assert_eq!(
            Color::from_array(&[
                Object::Real(0.0),
                Object::Real(0.1),
                Object::Real(0.2),
                Object::Real(0.3)
            ]),
            Some(Color::Cmyk(0.0, 0.1, 0.2, 0.3))
        );
        assert_eq!(Color::from_array(&[Object::Real(0.0), Object::Real(0.0)]), None);
    }

    #[test]
    fn test_rotation_default_and_lazy_mk() {
        let mut doc = Document::new();
        let w = Widget::create(&mut doc, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(w.rotation(&doc), 0);
        assert!(doc.dict_get(w.dict_ref(), "MK").is_none());

        w.set_rotation(&mut doc, 90).unwrap();
        assert_eq!(w.rotation(&doc), 90);
        assert!(doc.dict_get(w.dict_ref(), "MK").is_some());
    }

    #[test]
    fn test_rotation_normalized() {
        let mut doc = Document::new();
        let w = Widget::create(&mut doc, Rect::new(0.0, 0.0, 10.0, 10.0));
        w.set_rotation(&mut doc, -90).unwrap();
        assert_eq!(w.rotation(&doc), 270);
        w.set_rotation(&mut doc, 450).unwrap();
        assert_eq!(w.rotation(&doc), 90);
    }

    #[test]
    fn test_color_snapshot_is_not_live() {
        let mut doc = Document::new();
        let w = Widget::create(&mut doc, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(w.back_color(), None);

        w.set_back_color(&mut doc, Color::Rgb(1.0, 1.0, 0.0)).unwrap();
        // Snapshot is stale until explicitly refreshed.
        assert_eq!(w.back_color(), None);

        let mut w = w;
        w.refresh_colors(&doc);
        assert_eq!(w.back_color(), Some(Color::Rgb(1.0, 1.0, 0.0)));
    }

    #[test]
    fn test_non_off_name_first_key_wins() {
        let mut doc = Document::new();
        let w = Widget::create(&mut doc, Rect::new(0.0, 0.0, 10.0, 10.0));
        let s1 = doc.add_object(Object::Stream {
            dict: Dict::new(),
            data: bytes::Bytes::new(),
        });
        let s2 = doc.add_object(Object::Stream {
            dict: Dict::new(),
            data: bytes::Bytes::new(),
        });
        w.set_normal_appearance(&mut doc, OFF_STATE, s1).unwrap();
        w.set_normal_appearance(&mut doc, "Yes", s2).unwrap();

        assert_eq!(w.non_off_name(&doc).as_deref(), Some("Yes"));
        assert_eq!(w.appearance_state_names(&doc), vec!["Off", "Yes"]);
    }

    #[test]
    fn test_current_appearance_stream_selected_by_as() {
        let mut doc = Document::new();
        let w = Widget::create(&mut doc, Rect::new(0.0, 0.0, 10.0, 10.0));
        let on = doc.add_object(Object::Stream {
            dict: Dict::new(),
            data: bytes::Bytes::from_static(b"on"),
        });
        let off = doc.add_object(Object::Stream {
            dict: Dict::new(),
            data: bytes::Bytes::from_static(b"off"),
        });
        w.set_normal_appearance(&mut doc, OFF_STATE, off).unwrap();
        w.set_normal_appearance(&mut doc, "Yes", on).unwrap();

        w.set_appearance_state(&mut doc, "Yes").unwrap();
        match w.current_appearance_stream(&doc) {
            Some(Object::Stream { data, .. }) => assert_eq!(&data[..], b"on"),
            other => panic!("expected stream, got {:?}", other),
        }
    }
}
