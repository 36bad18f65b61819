//! Appearance synthesis: content streams giving each widget a visible face.
//!
//! Appearances are form XObjects referenced from a widget's `/AP/N`. Nothing
//! here runs eagerly; callers decide when to (re)generate, and regeneration
//! is deterministic, so running it twice replaces a stream with an identical
//! one.

use crate::document::Document;
use crate::error::{Error, Result};
use crate::fields::flags::{AnnotationFlags, TextAlignment, TextFieldFlags};
use crate::fields::{CheckBoxField, ComboBoxField, Field, ListBoxField, PushButtonField, TextField};
use crate::geometry::Rect;
use crate::object::{Dict, Object, ObjectRef};
use crate::widget::{Color, Widget, OFF_STATE};

/// Inset between the widget border and its content, in points.
const TEXT_PADDING: f32 = 2.0;

/// Width of a glyph relative to the font size, for the standard Type1 set.
const CHAR_WIDTH_FACTOR: f32 = 0.6;

/// Line advance relative to the font size.
const LINE_HEIGHT_FACTOR: f32 = 1.2;

/// A parsed default-appearance (`/DA`) string.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultAppearance {
    /// Font resource name, without the leading slash
    pub font: String,
    /// Font size in points; 0 means auto-size (rendered as 12 here)
    pub size: f32,
    /// Fill-color operators, e.g. `0 g` or `1 0 0 rg`
    pub color: String,
}

impl Default for DefaultAppearance {
    fn default() -> Self {
        Self {
            font: "Helv".to_string(),
            size: 12.0,
            color: "0 g".to_string(),
        }
    }
}

impl DefaultAppearance {
    /// Parse a `/DA` string like `/Helv 12 Tf 0 g`.
    ///
    /// Requires a `Tf` operator with a name and size before it; color
    /// operators (`g`, `rg`, `k`) are optional and the last one wins.
    pub fn parse(da: &str) -> Result<DefaultAppearance> {
        let tokens: Vec<&str> = da.split_whitespace().collect();
        let tf = tokens
            .iter()
            .position(|t| *t == "Tf")
            .ok_or_else(|| Error::InvalidForm(format!("no Tf operator in DA {:?}", da)))?;
        if tf < 2 {
            return Err(Error::InvalidForm(format!("truncated DA {:?}", da)));
        }
        let font = tokens[tf - 2]
            .strip_prefix('/')
            .ok_or_else(|| Error::InvalidForm(format!("DA font is not a name in {:?}", da)))?
            .to_string();
        let size: f32 = tokens[tf - 1]
            .parse()
            .map_err(|_| Error::InvalidForm(format!("bad DA font size in {:?}", da)))?;

        let mut color = "0 g".to_string();
        for (i, token) in tokens.iter().enumerate() {
            let operands = match *token {
                "g" => 1,
                "rg" => 3,
                "k" => 4,
                _ => continue,
            };
            if i >= operands && tokens[i - operands..i].iter().all(|t| t.parse::<f32>().is_ok()) {
                color = tokens[i - operands..=i].join(" ");
            }
        }
        Ok(DefaultAppearance { font, size, color })
    }

    /// Parse, falling back to `Helv 12` black on failure or absence.
    pub fn parse_or_default(da: Option<&str>) -> DefaultAppearance {
        match da {
            Some(da) => DefaultAppearance::parse(da).unwrap_or_else(|err| {
                log::warn!("unusable DA string, using defaults: {}", err);
                DefaultAppearance::default()
            }),
            None => DefaultAppearance::default(),
        }
    }

    /// Serialize back into a `/DA` string.
    pub fn to_da_string(&self) -> String {
        format!("/{} {} Tf {}", self.font, self.size, self.color)
    }

    /// Effective size: auto-size (0) renders as 12 points.
    fn effective_size(&self) -> f32 {
        if self.size > 0.0 {
            self.size
        } else {
            12.0
        }
    }
}

/// Fonts and default appearance shared by every synthesized stream, prepared
/// by the form root from its `/DR` dictionary.
#[derive(Debug, Clone)]
pub struct FormResources {
    /// `/Resources` dictionary to embed in each form XObject
    pub resources: Object,
    /// Form-level default appearance, used when a field has none
    pub default_da: String,
}

/// Escape `(`, `)` and `\` for a literal PDF string.
fn escape_pdf_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            },
            _ => out.push(c),
        }
    }
    out
}

/// Approximate a circle with four Bezier arcs.
fn circle_path(cx: f32, cy: f32, r: f32) -> String {
    const K: f32 = 0.5523;
    let k = r * K;
    format!(
        "{} {} m {} {} {} {} {} {} c {} {} {} {} {} {} c {} {} {} {} {} {} c {} {} {} {} {} {} c",
        cx + r, cy,
        cx + r, cy + k, cx + k, cy + r, cx, cy + r,
        cx - k, cy + r, cx - r, cy + k, cx - r, cy,
        cx - r, cy - k, cx - k, cy - r, cx, cy - r,
        cx + k, cy - r, cx + r, cy - k, cx + r, cy,
    )
}

/// Background fill + border stroke for a `w` by `h` canvas.
fn box_ops(w: f32, h: f32, back: Option<Color>, border: Option<Color>) -> String {
    let mut ops = String::new();
    if let Some(fill) = back.and_then(|c| c.fill_ops()) {
        ops.push_str(&format!("{} 0 0 {} {} re f\n", fill, w, h));
    }
    if let Some(stroke) = border.and_then(|c| c.stroke_ops()) {
        ops.push_str(&format!(
            "{} 1 w 0.5 0.5 {} {} re S\n",
            stroke,
            w - 1.0,
            h - 1.0
        ));
    }
    ops
}

fn wrap_lines(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        if paragraph.is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut current = String::new();
        for word in paragraph.split(' ') {
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed <= max_chars || current.is_empty() {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
            }
        }
        lines.push(current);
    }
    lines
}

/// Content operators for a text-field (or combo) face on a `w` by `h` canvas.
pub fn text_field_ops(
    value: &str,
    w: f32,
    h: f32,
    da: &DefaultAppearance,
    alignment: TextAlignment,
    multiline: bool,
    comb_cells: Option<i64>,
    back: Option<Color>,
    border: Option<Color>,
) -> String {
    let size = da.effective_size();
    let char_width = size * CHAR_WIDTH_FACTOR;
    let mut ops = String::new();
    ops.push_str(&box_ops(w, h, back, border));

    ops.push_str("/Tx BMC\nq\n");
    // Clip to the inset content rectangle.
    ops.push_str(&format!(
        "{} {} {} {} re W n\n",
        TEXT_PADDING,
        TEXT_PADDING,
        (w - 2.0 * TEXT_PADDING).max(0.0),
        (h - 2.0 * TEXT_PADDING).max(0.0)
    ));
    ops.push_str(&format!("BT\n/{} {} Tf\n{}\n", da.font, size, da.color));

    if let Some(cells) = comb_cells.filter(|&n| n > 0) {
        let cell = w / cells as f32;
        let y = (h - size) / 2.0 + size * 0.15;
        for (i, c) in value.chars().take(cells as usize).enumerate() {
            let x = i as f32 * cell + (cell - char_width) / 2.0;
            ops.push_str(&format!(
                "1 0 0 1 {} {} Tm ({}) Tj\n",
                x,
                y,
                escape_pdf_string(&c.to_string())
            ));
        }
    } else if multiline {
        let max_chars = (((w - 2.0 * TEXT_PADDING) / char_width) as usize).max(1);
        let line_height = size * LINE_HEIGHT_FACTOR;
        let mut y = h - TEXT_PADDING - size;
        for line in wrap_lines(value, max_chars) {
            if y < TEXT_PADDING {
                break;
            }
            ops.push_str(&format!(
                "1 0 0 1 {} {} Tm ({}) Tj\n",
                TEXT_PADDING,
                y,
                escape_pdf_string(&line)
            ));
            y -= line_height;
        }
    } else {
        let text_width = value.chars().count() as f32 * char_width;
        let x = match alignment {
            TextAlignment::Left => TEXT_PADDING,
            TextAlignment::Center => (w - text_width) / 2.0,
            TextAlignment::Right => w - TEXT_PADDING - text_width,
        }
        .max(TEXT_PADDING);
        let y = (h - size) / 2.0 + size * 0.15;
        ops.push_str(&format!(
            "1 0 0 1 {} {} Tm ({}) Tj\n",
            x,
            y,
            escape_pdf_string(value)
        ));
    }

    ops.push_str("ET\nQ\nEMC\n");
    ops
}

/// Checkbox off face: just the box.
pub fn checkbox_off_ops(w: f32, h: f32, back: Option<Color>, border: Option<Color>) -> String {
    let border = border.or(Some(Color::Gray(0.0)));
    box_ops(w, h, back, border)
}

/// Checkbox on face: the box plus an X mark with rounded caps.
pub fn checkbox_on_ops(
    w: f32,
    h: f32,
    back: Option<Color>,
    border: Option<Color>,
    mark: &str,
) -> String {
    let mut ops = checkbox_off_ops(w, h, back, border);
    let inset = w.min(h) * 0.25;
    ops.push_str(&format!(
        "q\n{} 1 J {} w\n{} {} m {} {} l\n{} {} m {} {} l\nS\nQ\n",
        mark,
        (w.min(h) * 0.1).max(1.0),
        inset,
        inset,
        w - inset,
        h - inset,
        inset,
        h - inset,
        w - inset,
        inset,
    ));
    ops
}

/// Radio off face: a circle border.
pub fn radio_off_ops(w: f32, h: f32, back: Option<Color>, border: Option<Color>) -> String {
    let r = w.min(h) / 2.0 - 0.5;
    let (cx, cy) = (w / 2.0, h / 2.0);
    let mut ops = String::new();
    if let Some(fill) = back.and_then(|c| c.fill_ops()) {
        ops.push_str(&format!("{} {} f\n", fill, circle_path(cx, cy, r)));
    }
    let stroke = border
        .and_then(|c| c.stroke_ops())
        .unwrap_or_else(|| "0 G".to_string());
    ops.push_str(&format!("{} 1 w {} S\n", stroke, circle_path(cx, cy, r)));
    ops
}

/// Radio on face: the circle plus a centered dot at quarter inset.
pub fn radio_on_ops(
    w: f32,
    h: f32,
    back: Option<Color>,
    border: Option<Color>,
    mark: &str,
) -> String {
    let mut ops = radio_off_ops(w, h, back, border);
    let r = (w.min(h) / 2.0) * 0.5;
    ops.push_str(&format!(
        "{} {} f\n",
        mark,
        circle_path(w / 2.0, h / 2.0, r)
    ));
    ops
}

/// Content operators for a list-box face.
///
/// Entries are laid out top-down starting at `top_index` (clamped into
/// range); selected entries get a highlight rectangle behind their text.
pub fn list_box_ops(
    displays: &[String],
    selected: &[i64],
    top_index: i64,
    w: f32,
    h: f32,
    da: &DefaultAppearance,
    back: Option<Color>,
    border: Option<Color>,
) -> String {
    let size = da.effective_size();
    let line_height = size * LINE_HEIGHT_FACTOR;
    // Clamp so the list never scrolls past its last page: the final rows
    // still fill the box.
    let visible = (((h - 2.0 * TEXT_PADDING) / line_height) as usize).max(1);
    let top = (top_index.max(0) as usize).min(displays.len().saturating_sub(visible));

    let mut ops = String::new();
    ops.push_str(&box_ops(w, h, back.or(Some(Color::Gray(1.0))), border));
    ops.push_str("/Tx BMC\nq\n");
    ops.push_str(&format!(
        "{} {} {} {} re W n\n",
        TEXT_PADDING,
        TEXT_PADDING,
        (w - 2.0 * TEXT_PADDING).max(0.0),
        (h - 2.0 * TEXT_PADDING).max(0.0)
    ));

    let mut y = h - TEXT_PADDING - line_height;
    for (i, display) in displays.iter().enumerate().skip(top) {
        if y < TEXT_PADDING - line_height {
            break;
        }
        if selected.contains(&(i as i64)) {
            // Adobe's selection blue.
            ops.push_str(&format!(
                "0.6 0.75 0.85 rg {} {} {} {} re f\n",
                TEXT_PADDING,
                y - size * 0.2,
                (w - 2.0 * TEXT_PADDING).max(0.0),
                line_height
            ));
        }
        ops.push_str(&format!(
            "BT\n/{} {} Tf\n{}\n1 0 0 1 {} {} Tm ({}) Tj\nET\n",
            da.font,
            size,
            da.color,
            TEXT_PADDING + 1.0,
            y,
            escape_pdf_string(display)
        ));
        y -= line_height;
    }
    ops.push_str("Q\nEMC\n");
    ops
}

/// Push-button face: box plus centered caption.
pub fn push_button_ops(
    caption: &str,
    w: f32,
    h: f32,
    da: &DefaultAppearance,
    back: Option<Color>,
    border: Option<Color>,
) -> String {
    let size = da.effective_size();
    let mut ops = String::new();
    ops.push_str(&box_ops(
        w,
        h,
        back.or(Some(Color::Gray(0.75))),
        border.or(Some(Color::Gray(0.0))),
    ));
    let text_width = caption.chars().count() as f32 * size * CHAR_WIDTH_FACTOR;
    let x = ((w - text_width) / 2.0).max(TEXT_PADDING);
    let y = (h - size) / 2.0 + size * 0.15;
    ops.push_str(&format!(
        "q\nBT\n/{} {} Tf\n{}\n1 0 0 1 {} {} Tm ({}) Tj\nET\nQ\n",
        da.font,
        size,
        da.color,
        x,
        y,
        escape_pdf_string(caption)
    ));
    ops
}

/// The drawing canvas and XObject geometry for a widget, honoring rotation.
struct Canvas {
    w: f32,
    h: f32,
    bbox: (f32, f32),
    matrix: Option<[f32; 6]>,
}

fn canvas_for(widget: &Widget, doc: &Document, rect: Rect) -> Canvas {
    let no_rotate = widget
        .annotation_flags(doc)
        .contains(AnnotationFlags::NO_ROTATE);
    let rotation = if no_rotate { 0 } else { widget.rotation(doc) };
    let w = rect.width.max(1.0);
    let h = rect.height.max(1.0);
    match rotation {
        90 => Canvas {
            w: h,
            h: w,
            bbox: (h, w),
            matrix: Some([0.0, 1.0, -1.0, 0.0, 0.0, 0.0]),
        },
        180 => Canvas {
            w,
            h,
            bbox: (w, h),
            matrix: Some([-1.0, 0.0, 0.0, -1.0, 0.0, 0.0]),
        },
        270 => Canvas {
            w: h,
            h: w,
            bbox: (h, w),
            matrix: Some([0.0, -1.0, 1.0, 0.0, 0.0, 0.0]),
        },
        _ => Canvas {
            w,
            h,
            bbox: (w, h),
            matrix: None,
        },
    }
}

/// Assemble a form XObject stream object.
pub fn build_form_xobject(
    doc: &mut Document,
    bbox: (f32, f32),
    matrix: Option<[f32; 6]>,
    resources: Option<Object>,
    ops: &str,
) -> ObjectRef {
    let mut dict = Dict::new();
    dict.insert("Type".to_string(), Object::Name("XObject".to_string()));
    dict.insert("Subtype".to_string(), Object::Name("Form".to_string()));
    dict.insert("FormType".to_string(), Object::Integer(1));
    dict.insert(
        "BBox".to_string(),
        Object::Array(vec![
            Object::Real(0.0),
            Object::Real(0.0),
            Object::Real(bbox.0 as f64),
            Object::Real(bbox.1 as f64),
        ]),
    );
    if let Some(m) = matrix {
        dict.insert(
            "Matrix".to_string(),
            Object::Array(m.iter().map(|&v| Object::Real(v as f64)).collect()),
        );
    }
    if let Some(res) = resources {
        dict.insert("Resources".to_string(), res);
    }
    dict.insert("Length".to_string(), Object::Integer(ops.len() as i64));
    doc.add_object(Object::Stream {
        dict,
        data: bytes::Bytes::from(ops.as_bytes().to_vec()),
    })
}

/// Install a state-keyed appearance stream, reusing the existing object slot
/// when the state already has one so regeneration never grows the store.
fn install_state_stream(
    doc: &mut Document,
    widget: &Widget,
    state: &str,
    bbox: (f32, f32),
    matrix: Option<[f32; 6]>,
    resources: Option<Object>,
    ops: &str,
) -> Result<()> {
    let existing = doc
        .dict_get(widget.dict_ref(), "AP")
        .and_then(|ap| ap.as_dict()?.get("N")?.as_dict()?.get(state)?.as_reference());
    let stream = build_form_xobject(doc, bbox, matrix, resources, ops);
    match existing {
        Some(slot) => {
            let built = doc.remove_object(stream).ok_or(Error::ObjectNotFound(
                stream.id, stream.gen,
            ))?;
            doc.set_object(slot, built);
            Ok(())
        },
        None => widget.set_normal_appearance(doc, state, stream),
    }
}

/// Install a single (state-less) appearance stream, reusing the slot.
fn install_stream(
    doc: &mut Document,
    widget: &Widget,
    bbox: (f32, f32),
    matrix: Option<[f32; 6]>,
    resources: Option<Object>,
    ops: &str,
) -> Result<()> {
    let existing = doc
        .dict_get(widget.dict_ref(), "AP")
        .and_then(|ap| ap.as_dict()?.get("N")?.as_reference());
    let stream = build_form_xobject(doc, bbox, matrix, resources, ops);
    match existing {
        Some(slot) => {
            let built = doc.remove_object(stream).ok_or(Error::ObjectNotFound(
                stream.id, stream.gen,
            ))?;
            doc.set_object(slot, built);
            Ok(())
        },
        None => widget.set_normal_appearance_stream(doc, stream),
    }
}

fn widget_rect_or_skip(doc: &Document, widget: &Widget) -> Option<Rect> {
    match widget.rect(doc) {
        Some(rect) if !rect.is_degenerate() => Some(rect),
        _ => {
            log::debug!(
                "widget {} has no drawable rectangle, skipping appearance",
                widget.dict_ref()
            );
            None
        },
    }
}

/// Synthesize (or refresh) the appearance streams of one classified field.
pub fn regenerate_field(
    doc: &mut Document,
    field: &mut Field,
    form: &FormResources,
) -> Result<()> {
    match field {
        Field::Text(f) => regenerate_text(doc, f, form),
        Field::ComboBox(f) => regenerate_combo(doc, f, form),
        Field::ListBox(f) => regenerate_list(doc, f, form),
        Field::CheckBox(f) => regenerate_checkbox(doc, f),
        Field::RadioButton(f) => regenerate_radio(doc, f),
        Field::PushButton(f) => regenerate_push_button(doc, f, form),
        Field::Signature(_) | Field::Generic(_) => Ok(()),
    }
}

fn field_da(doc: &Document, node: &crate::fields::FieldNode, form: &FormResources) -> DefaultAppearance {
    let da = node
        .inherited(doc, "DA")
        .and_then(|o| o.as_text())
        .unwrap_or_else(|| form.default_da.clone());
    DefaultAppearance::parse_or_default(Some(&da))
}

fn regenerate_text(doc: &mut Document, field: &mut TextField, form: &FormResources) -> Result<()> {
    let value = field.value(doc).unwrap_or_default();
    let mut value: String = match field.max_len(doc) {
        Some(n) if n >= 0 => value.chars().take(n as usize).collect(),
        _ => value,
    };
    if field
        .text_flags(doc)
        .contains(TextFieldFlags::PASSWORD)
    {
        value = "*".repeat(value.chars().count());
    }
    let da = field_da(doc, field.node(), form);
    let alignment = field.alignment(doc);
    let multiline = field.is_multiline(doc);
    let comb = if field.is_comb(doc) {
        field.max_len(doc)
    } else {
        None
    };

    let widgets: Vec<Widget> = field.node_mut().widgets(doc)?.to_vec();
    for widget in widgets {
        let Some(rect) = widget_rect_or_skip(doc, &widget) else {
            continue;
        };
        let canvas = canvas_for(&widget, doc, rect);
        let ops = text_field_ops(
            &value,
            canvas.w,
            canvas.h,
            &da,
            alignment,
            multiline,
            comb,
            widget.back_color(),
            widget.border_color(),
        );
        install_stream(
            doc,
            &widget,
            canvas.bbox,
            canvas.matrix,
            Some(form.resources.clone()),
            &ops,
        )?;
    }
    Ok(())
}

fn regenerate_combo(
    doc: &mut Document,
    field: &mut ComboBoxField,
    form: &FormResources,
) -> Result<()> {
    let export = field.value(doc).unwrap_or_default();
    // Show the display string when the export has one.
    let display = field
        .options(doc)
        .iter()
        .find(|o| o.export == export)
        .map(|o| o.display.clone())
        .unwrap_or(export);
    let da = field_da(doc, field.node(), form);

    let widgets: Vec<Widget> = field.node_mut().widgets(doc)?.to_vec();
    for widget in widgets {
        let Some(rect) = widget_rect_or_skip(doc, &widget) else {
            continue;
        };
        let canvas = canvas_for(&widget, doc, rect);
        let ops = text_field_ops(
            &display,
            canvas.w,
            canvas.h,
            &da,
            TextAlignment::Left,
            false,
            None,
            widget.back_color(),
            widget.border_color(),
        );
        install_stream(
            doc,
            &widget,
            canvas.bbox,
            canvas.matrix,
            Some(form.resources.clone()),
            &ops,
        )?;
    }
    Ok(())
}

fn regenerate_list(
    doc: &mut Document,
    field: &mut ListBoxField,
    form: &FormResources,
) -> Result<()> {
    let displays: Vec<String> = field
        .options(doc)
        .iter()
        .map(|o| o.display.clone())
        .collect();
    let selected = field.selected_indices(doc);
    let top_index = field.top_index(doc);
    let da = field_da(doc, field.node(), form);

    let widgets: Vec<Widget> = field.node_mut().widgets(doc)?.to_vec();
    for widget in widgets {
        let Some(rect) = widget_rect_or_skip(doc, &widget) else {
            continue;
        };
        let canvas = canvas_for(&widget, doc, rect);
        let ops = list_box_ops(
            &displays,
            &selected,
            top_index,
            canvas.w,
            canvas.h,
            &da,
            widget.back_color(),
            widget.border_color(),
        );
        install_stream(
            doc,
            &widget,
            canvas.bbox,
            canvas.matrix,
            Some(form.resources.clone()),
            &ops,
        )?;
    }
    Ok(())
}

fn regenerate_checkbox(doc: &mut Document, field: &mut CheckBoxField) -> Result<()> {
    let checked = field.is_checked(doc)?;
    let on_name = field.on_state_name(doc)?;
    let widgets: Vec<Widget> = field.node_mut().widgets(doc)?.to_vec();
    for widget in widgets {
        if widget.has_appearance(doc) {
            // An existing appearance is authoritative; only the state toggles.
            let state = if checked { on_name.clone() } else { OFF_STATE.to_string() };
            widget.set_appearance_state(doc, &state)?;
            continue;
        }
        let Some(rect) = widget_rect_or_skip(doc, &widget) else {
            continue;
        };
        let canvas = canvas_for(&widget, doc, rect);
        let off = checkbox_off_ops(canvas.w, canvas.h, widget.back_color(), widget.border_color());
        let on = checkbox_on_ops(
            canvas.w,
            canvas.h,
            widget.back_color(),
            widget.border_color(),
            "0 G",
        );
        install_state_stream(doc, &widget, OFF_STATE, canvas.bbox, canvas.matrix, None, &off)?;
        install_state_stream(doc, &widget, &on_name, canvas.bbox, canvas.matrix, None, &on)?;
        let state = if checked { on_name.clone() } else { OFF_STATE.to_string() };
        widget.set_appearance_state(doc, &state)?;
    }
    Ok(())
}

fn regenerate_radio(doc: &mut Document, field: &mut crate::fields::RadioButtonField) -> Result<()> {
    let widgets: Vec<Widget> = field.node_mut().widgets(doc)?.to_vec();
    for widget in widgets {
        let Some(on_name) = widget.non_off_name(doc) else {
            continue;
        };
        let Some(rect) = widget_rect_or_skip(doc, &widget) else {
            continue;
        };
        let canvas = canvas_for(&widget, doc, rect);
        let off = radio_off_ops(canvas.w, canvas.h, widget.back_color(), widget.border_color());
        let on = radio_on_ops(
            canvas.w,
            canvas.h,
            widget.back_color(),
            widget.border_color(),
            "0 g",
        );
        install_state_stream(doc, &widget, OFF_STATE, canvas.bbox, canvas.matrix, None, &off)?;
        install_state_stream(doc, &widget, &on_name, canvas.bbox, canvas.matrix, None, &on)?;
        if widget.appearance_state(doc).is_none() {
            widget.set_appearance_state(doc, OFF_STATE)?;
        }
    }
    Ok(())
}

fn regenerate_push_button(
    doc: &mut Document,
    field: &mut PushButtonField,
    form: &FormResources,
) -> Result<()> {
    let caption = field.caption(doc).unwrap_or_default();
    let da = field_da(doc, field.node(), form);
    let widgets: Vec<Widget> = field.node_mut().widgets(doc)?.to_vec();
    for widget in widgets {
        let Some(rect) = widget_rect_or_skip(doc, &widget) else {
            continue;
        };
        let canvas = canvas_for(&widget, doc, rect);
        let ops = push_button_ops(
            &caption,
            canvas.w,
            canvas.h,
            &da,
            widget.back_color(),
            widget.border_color(),
        );
        install_stream(
            doc,
            &widget,
            canvas.bbox,
            canvas.matrix,
            Some(form.resources.clone()),
            &ops,
        )?;
    }
    Ok(())
}
