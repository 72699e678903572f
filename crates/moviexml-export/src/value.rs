//! Conversion of SQLite cell values to XML text.

use rusqlite::types::ValueRef;

/// Whether a cell holds a value worth exporting.
///
/// NULL, empty text, empty blobs, integer zero and real zero all count as
/// absent; the corresponding element or attribute is omitted.
pub fn is_present(value: ValueRef<'_>) -> bool {
    match value {
        ValueRef::Null => false,
        ValueRef::Integer(i) => i != 0,
        ValueRef::Real(f) => f != 0.0,
        ValueRef::Text(t) => !t.is_empty(),
        ValueRef::Blob(b) => !b.is_empty(),
    }
}

/// Text form of a cell.
///
/// Reals with an integral value keep one decimal place (`2.0`), matching
/// how the values read back from the source schema. NULL becomes the empty
/// string.
pub fn to_text(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => {
            if f.fract() == 0.0 && f.is_finite() {
                format!("{:.1}", f)
            } else {
                f.to_string()
            }
        }
        ValueRef::Text(t) | ValueRef::Blob(t) => String::from_utf8_lossy(t).into_owned(),
    }
}

/// Text form of a cell, or `None` when it is absent per [`is_present`].
pub fn present_text(value: ValueRef<'_>) -> Option<String> {
    is_present(value).then(|| to_text(value))
}

/// Text form of a key cell, or `None` only when it is NULL.
///
/// Unlike [`present_text`], zero and empty values are real keys.
pub fn key_text(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        _ => Some(to_text(value)),
    }
}
