//! Form flattening: bake every widget's current face into its page content
//! and remove the interactive layer.

use crate::acroform::AcroForm;
use crate::document::Document;
use crate::error::Result;
use crate::fields::flags::AnnotationFlags;
use crate::fields::FieldNode;
use crate::object::{Dict, Object, ObjectRef};
use crate::widget::Widget;

/// Flatten the document's interactive form.
///
/// Appearances are regenerated first so the baked output reflects current
/// values. Each visible widget's normal appearance is painted into its page
/// at the widget rectangle; hidden and no-view widgets are dropped without
/// painting. Afterwards the field dictionaries are removed from the store and
/// the form root is cleared. A document without a form is left untouched.
pub fn flatten_form(doc: &mut Document) -> Result<()> {
    let Some(form) = AcroForm::from_document(doc) else {
        return Ok(());
    };
    form.regenerate_appearances(doc)?;

    // Synthesized streams reference the form's /DR fonts; pages need them
    // once the operators move into page content.
    let fonts = form_fonts(doc, &form);
    for page in doc.pages().to_vec() {
        merge_fonts_into_page(doc, page, &fonts)?;
    }

    for root in form.field_refs(doc) {
        flatten_tree(doc, root)?;
    }

    let form_dict = form.dict_ref();
    doc.remove_object(form_dict);
    doc.set_acroform_ref(None);
    Ok(())
}

fn form_fonts(doc: &Document, form: &AcroForm) -> Dict {
    doc.dict_get(form.dict_ref(), "DR")
        .and_then(|dr| dr.as_dict()?.get("Font")?.as_dict().cloned())
        .unwrap_or_default()
}

fn merge_fonts_into_page(doc: &mut Document, page: ObjectRef, fonts: &Dict) -> Result<()> {
    if fonts.is_empty() {
        return Ok(());
    }
    let resources = doc.ensure_sub_dict(page, "Resources")?;
    let font_entry = resources
        .entry("Font".to_string())
        .or_insert_with(|| Object::Dictionary(Dict::new()));
    if let Some(page_fonts) = font_entry.as_dict_mut() {
        for (name, font) in fonts {
            page_fonts.entry(name.clone()).or_insert_with(|| font.clone());
        }
    }
    Ok(())
}

/// Flatten one field and its sub-fields, post-order, removing every
/// dictionary involved from the store.
fn flatten_tree(doc: &mut Document, dict: ObjectRef) -> Result<()> {
    let node = FieldNode::new(dict);
    for kid in node.child_fields(doc) {
        flatten_tree(doc, kid)?;
    }

    let mut node = node;
    let widgets: Vec<Widget> = node.widgets(doc)?.to_vec();
    for widget in &widgets {
        flatten_widget(doc, widget)?;
    }

    // A merged dictionary was already removed as its own widget.
    if doc.contains(dict) {
        doc.remove_object(dict);
    }
    Ok(())
}

fn flatten_widget(doc: &mut Document, widget: &Widget) -> Result<()> {
    let r = widget.dict_ref();
    let flags = widget.annotation_flags(doc);
    let visible = !flags.contains(AnnotationFlags::HIDDEN)
        && !flags.contains(AnnotationFlags::NO_VIEW);

    if visible {
        match widget.rect(doc) {
            Some(rect) if !rect.is_degenerate() => {
                if let Some(Object::Stream { data, .. }) =
                    widget.current_appearance_stream(doc)
                {
                    paint_stream(doc, widget, rect.x, rect.y, &data)?;
                } else {
                    paint_colors(doc, widget, rect)?;
                }
            },
            _ => log::debug!("widget {} has no drawable rectangle, dropping", r),
        }
    } else {
        log::debug!("widget {} is hidden, dropping without painting", r);
    }

    if let Some(page) = find_page(doc, widget) {
        doc.remove_annotation(page, r)?;
    }
    doc.remove_object(r);
    Ok(())
}

fn find_page(doc: &Document, widget: &Widget) -> Option<ObjectRef> {
    if let Some(page) = widget.page(doc) {
        return Some(page);
    }
    let r = widget.dict_ref();
    doc.pages()
        .iter()
        .copied()
        .find(|&page| {
            doc.page_annotations(page)
                .map(|annots| annots.contains(&r))
                .unwrap_or(false)
        })
}

/// Inline an appearance stream's operators into the page content, translated
/// to the widget's position and bracketed in a saved graphics state.
fn paint_stream(doc: &mut Document, widget: &Widget, x: f32, y: f32, data: &[u8]) -> Result<()> {
    let Some(page) = find_page(doc, widget) else {
        return Ok(());
    };
    let mut ops = format!("q\n1 0 0 1 {} {} cm\n", x, y).into_bytes();
    ops.extend_from_slice(data);
    ops.extend_from_slice(b"\nQ");
    doc.append_page_content(page, &ops)
}

/// Fallback for widgets without any appearance stream: paint the `/MK`
/// background and border directly.
fn paint_colors(doc: &mut Document, widget: &Widget, rect: crate::geometry::Rect) -> Result<()> {
    let Some(page) = find_page(doc, widget) else {
        return Ok(());
    };
    let mut refreshed = widget.clone();
    refreshed.refresh_colors(doc);

    let mut ops = String::from("q\n");
    if let Some(fill) = refreshed.back_color().and_then(|c| c.fill_ops()) {
        ops.push_str(&format!(
            "{} {} {} {} {} re f\n",
            fill, rect.x, rect.y, rect.width, rect.height
        ));
    }
    if let Some(stroke) = refreshed.border_color().and_then(|c| c.stroke_ops()) {
        ops.push_str(&format!(
            "{} 1 w {} {} {} {} re S\n",
            stroke,
            rect.x + 0.5,
            rect.y + 0.5,
            rect.width - 1.0,
            rect.height - 1.0
        ));
    }
    ops.push('Q');
    doc.append_page_content(page, ops.as_bytes())
}
