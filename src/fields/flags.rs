//! Field and annotation flag sets.
//!
//! Field flags per ISO 32000-1:2008 Section 12.7.3; each field family has its
//! own set sharing the common bits 1-3. Annotation flags per Section 12.5.3.

use bitflags::bitflags;

bitflags! {
    /// Common field flags applicable to all field types (PDF Table 221).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FieldFlags: u32 {
        /// Bit 1: Field is read-only; user cannot change the value
        const READ_ONLY = 1 << 0;

        /// Bit 2: Field is required; must have a value before submit
        const REQUIRED = 1 << 1;

        /// Bit 3: Field should not be exported by submit-form action
        const NO_EXPORT = 1 << 2;
    }
}

bitflags! {
    /// Text field flags (PDF Table 228).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TextFieldFlags: u32 {
        /// Bit 1: Field is read-only
        const READ_ONLY = 1 << 0;
        /// Bit 2: Field is required
        const REQUIRED = 1 << 1;
        /// Bit 3: Field should not be exported
        const NO_EXPORT = 1 << 2;

        /// Bit 13: Text may include multiple lines
        const MULTILINE = 1 << 12;

        /// Bit 14: Text should be displayed as asterisks (password)
        const PASSWORD = 1 << 13;

        /// Bit 24: Text should not scroll beyond visible area
        const DO_NOT_SCROLL = 1 << 23;

        /// Bit 25: Field is divided into equally spaced positions (comb).
        /// MaxLen must be set when using this flag
        const COMB = 1 << 24;
    }
}

bitflags! {
    /// Button field flags (PDF Table 226).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ButtonFieldFlags: u32 {
        /// Bit 1: Field is read-only
        const READ_ONLY = 1 << 0;
        /// Bit 2: Field is required
        const REQUIRED = 1 << 1;
        /// Bit 3: Field should not be exported
        const NO_EXPORT = 1 << 2;

        /// Bit 15: (checkbox/radio) No toggle to off; one in group must stay on
        const NO_TOGGLE_TO_OFF = 1 << 14;

        /// Bit 16: This is a radio button (if unset and not PUSHBUTTON, it's a
        /// checkbox, subject to the widget-name heuristic)
        const RADIO = 1 << 15;

        /// Bit 17: This is a push button (performs action, holds no value)
        const PUSHBUTTON = 1 << 16;

        /// Bit 26: Radio buttons in unison - widgets sharing an option name
        /// turn on and off together
        const RADIOS_IN_UNISON = 1 << 25;
    }
}

bitflags! {
    /// Choice field flags (PDF Table 230).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ChoiceFieldFlags: u32 {
        /// Bit 1: Field is read-only
        const READ_ONLY = 1 << 0;
        /// Bit 2: Field is required
        const REQUIRED = 1 << 1;
        /// Bit 3: Field should not be exported
        const NO_EXPORT = 1 << 2;

        /// Bit 18: This is a combo box (dropdown); if unset, a list box
        const COMBO = 1 << 17;

        /// Bit 19: (combo only) User may enter custom text
        const EDIT = 1 << 18;

        /// Bit 20: Options should be presented sorted
        const SORT = 1 << 19;

        /// Bit 22: (list only) Allow multiple selections
        const MULTI_SELECT = 1 << 21;

        /// Bit 27: Value is committed when selection changes (not on blur)
        const COMMIT_ON_SEL_CHANGE = 1 << 26;
    }
}

bitflags! {
    /// Annotation flags from a widget's `/F` entry (PDF Table 165).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct AnnotationFlags: u32 {
        /// Bit 1: Do not display if no handler available
        const INVISIBLE = 1 << 0;
        /// Bit 2: Do not display or print at all
        const HIDDEN = 1 << 1;
        /// Bit 3: Print when the page is printed
        const PRINT = 1 << 2;
        /// Bit 4: Do not scale with page zoom
        const NO_ZOOM = 1 << 3;
        /// Bit 5: Do not rotate with the page
        const NO_ROTATE = 1 << 4;
        /// Bit 6: Do not display on screen (may still print)
        const NO_VIEW = 1 << 5;
    }
}

/// Horizontal alignment for variable text (`/Q`, Section 12.7.3.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlignment {
    /// Left-aligned (Q=0)
    #[default]
    Left,
    /// Centered (Q=1)
    Center,
    /// Right-aligned (Q=2)
    Right,
}

impl TextAlignment {
    /// Get the PDF `/Q` value for this alignment.
    pub fn q_value(&self) -> i64 {
        match self {
            Self::Left => 0,
            Self::Center => 1,
            Self::Right => 2,
        }
    }

    /// Decode a `/Q` value; anything unrecognized falls back to left.
    pub fn from_q_value(q: i64) -> Self {
        match q {
            1 => Self::Center,
            2 => Self::Right,
            _ => Self::Left,
        }
    }
}
