//! Error types for the form field engine.
//!
//! Structural and contract violations (bad widget subtype, out-of-range
//! selection, writes to read-only fields) surface as hard errors. Best-effort
//! presentation inference never reaches this enum; those paths fall back to
//! defaults and log instead.

/// Result type alias for form engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reading or mutating form fields.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Referenced object not found in the object store
    #[error("Object not found: {0} {1} R")]
    ObjectNotFound(u32, u16),

    /// Object has wrong type
    #[error("Invalid object type: expected {expected}, found {found}")]
    InvalidObjectType {
        /// Expected object type
        expected: String,
        /// Actual object type found
        found: String,
    },

    /// Annotation dictionary lacks the `/Subtype /Widget` marker
    #[error("Annotation is not a widget: /Subtype is {0}")]
    NotAWidget(String),

    /// A value was assigned to a read-only field
    #[error("Field '{0}' is read-only")]
    ReadOnlyField(String),

    /// Selected index outside the valid option range
    #[error("Index {index} out of range (valid: {valid})")]
    IndexOutOfRange {
        /// Index supplied by the caller
        index: i64,
        /// Human-readable valid range
        valid: String,
    },

    /// A value of a shape the field cannot represent was assigned
    #[error("Field '{field}' cannot hold a {value_type} value")]
    UnsupportedValue {
        /// Fully qualified field name
        field: String,
        /// Type name of the rejected value
        value_type: String,
    },

    /// Export-value array length mismatches the option count
    #[error("Export value count {exports} does not match option count {options}")]
    OptionCountMismatch {
        /// Number of export values supplied
        exports: usize,
        /// Number of visible options
        options: usize,
    },

    /// Invalid form structure (generic)
    #[error("Invalid form structure: {0}")]
    InvalidForm(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_not_found_error() {
        let err = Error::ObjectNotFound(10, 0);
        let msg = format!("{}", err);
        assert!(msg.contains("10 0 R"));
    }

    #[test]
    fn test_invalid_object_type_error() {
        let err = Error::InvalidObjectType {
            expected: "Dictionary".to_string(),
            found: "Array".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Dictionary"));
        assert!(msg.contains("Array"));
    }

    #[test]
    fn test_not_a_widget_error() {
        let err = Error::NotAWidget("Link".to_string());
        assert!(format!("{}", err).contains("Link"));
    }

    #[test]
    fn test_index_out_of_range_error() {
        let err = Error::IndexOutOfRange {
            index: 5,
            valid: "-1..3".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains('5'));
        assert!(msg.contains("-1..3"));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
