//! Validation error types

use std::fmt;

/// Validation error for domain models
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// Field is required but was not supplied
    Missing { field: &'static str },

    /// String doesn't match required format (e.g., numeric id)
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Invalid enum variant
    InvalidVariant {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    /// Request body could not be decoded
    MalformedBody { reason: String },

    /// Query string could not be decoded
    MalformedQuery { reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::Missing { field } => write!(f, "{} is required", field),
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            Self::InvalidVariant {
                field,
                value,
                expected,
            } => write!(f, "invalid {} '{}', must be {}", field, value, expected),
            Self::MalformedBody { reason } => write!(f, "invalid request body: {}", reason),
            Self::MalformedQuery { reason } => write!(f, "invalid query string: {}", reason),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Trim and bound a free-text field shared by the validated newtypes.
pub(crate) fn bounded_text(
    field: &'static str,
    s: &str,
    max: usize,
) -> Result<String, ValidationError> {
    let trimmed = s.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }

    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }

    Ok(trimmed.to_owned())
}

/// Normalise an optional URL-ish reference: blank strings mean "no value".
pub(crate) fn optional_reference(
    field: &'static str,
    s: Option<String>,
    max: usize,
) -> Result<Option<String>, ValidationError> {
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) if v.chars().count() > max => Err(ValidationError::TooLong { field, max }),
        Some(v) => Ok(Some(v.to_owned())),
    }
}

/// Patch form of [`optional_reference`].
///
/// `null` clears the stored value. A blank string counts as "not supplied",
/// matching what the frontend sends for an untouched field.
pub(crate) fn patch_reference(
    field: &'static str,
    s: Option<Option<String>>,
    max: usize,
) -> Result<Option<Option<String>>, ValidationError> {
    match s {
        None => Ok(None),
        Some(None) => Ok(Some(None)),
        Some(value) => Ok(optional_reference(field, value, max)?.map(Some)),
    }
}
