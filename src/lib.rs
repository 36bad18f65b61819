//! # acroform_oxide
//!
//! An engine for PDF interactive forms (AcroForm): field classification,
//! field hierarchy and naming, widget annotations, value and selection state,
//! appearance-stream synthesis, and form flattening.
//!
//! The crate operates on an in-memory object graph ([`document::Document`]);
//! parsing PDF bytes into that graph and serializing it back out are the job
//! of the surrounding toolkit, not of this crate.
//!
//! ## Quick start
//!
//! ```
//! use acroform_oxide::{AcroForm, Document, Rect, TextField};
//!
//! # fn main() -> acroform_oxide::Result<()> {
//! let mut doc = Document::new();
//! let form = AcroForm::create(&mut doc)?;
//! let page = doc.add_page(612.0, 792.0);
//!
//! let name = TextField::create(&mut doc, "FirstName", page, Rect::new(72.0, 700.0, 200.0, 20.0))?;
//! name.set_value(&mut doc, "John")?;
//! form.add_field(&mut doc, name.dict_ref())?;
//!
//! form.regenerate_appearances(&mut doc)?;
//! acroform_oxide::flatten_form(&mut doc)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module map
//!
//! - [`object`] / [`document`]: the object graph the engine works on
//! - [`fields`]: classification ([`fields::classify`]) and the typed field
//!   variants behind the [`Field`] enum
//! - [`widget`]: per-placement widget annotations
//! - [`appearance`]: content-stream synthesis and `/DA` handling
//! - [`acroform`]: the form root (`/Fields`, `/DR`, `NeedAppearances`)
//! - [`flatten`]: baking widgets into page content

pub mod acroform;
pub mod appearance;
pub mod document;
pub mod error;
pub mod fields;
pub mod flatten;
pub mod geometry;
pub mod object;
pub mod widget;

pub use acroform::AcroForm;
pub use appearance::{DefaultAppearance, FormResources};
pub use document::Document;
pub use error::{Error, Result};
pub use fields::flags::{
    AnnotationFlags, ButtonFieldFlags, ChoiceFieldFlags, FieldFlags, TextAlignment,
    TextFieldFlags,
};
pub use fields::{
    classify, CheckBoxField, ChoiceOption, ComboBoxField, Field, FieldKind, FieldNode,
    GenericField, ListBoxField, PushButtonField, RadioButtonField, SignatureField, TextField,
};
pub use flatten::flatten_form;
pub use geometry::Rect;
pub use object::{Dict, Object, ObjectRef};
pub use widget::{Color, Widget};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
