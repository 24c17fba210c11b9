//! Value validation for submitted ticket fields.
//!
//! Submitted values arrive as loose JSON. Each validator either produces the
//! typed value to store or a human-readable message for that field.

use crate::model::{BODY_MAX_LEN, Field};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

pub const MSG_NULL: &str = "This field may not be null.";
pub const MSG_BLANK: &str = "This field may not be blank.";
pub const MSG_NOT_STRING: &str = "Not a valid string.";
pub const MSG_NOT_BOOLEAN: &str = "Must be a valid boolean.";
pub const MSG_NULL_CHAR: &str = "Null characters are not allowed.";

const TRUE_WORDS: &[&str] = &["true", "t", "yes", "y", "on", "1"];
const FALSE_WORDS: &[&str] = &["false", "f", "no", "n", "off", "0"];

/// Validation messages keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, Vec<String>>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: Field, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, field: Field) -> Option<&[String]> {
        self.0.get(&field).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &[String])> {
        self.0.iter().map(|(field, messages)| (*field, messages.as_slice()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{field}: {}", messages.join(" "))?;
        }
        Ok(())
    }
}

/// Normalize a raw body string: trim, then enforce non-blank, no NUL and the
/// length cap.
///
/// # Errors
///
/// Returns the message to report against `body`.
pub fn normalize_body(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(MSG_BLANK.to_string());
    }
    if trimmed.contains('\0') {
        return Err(MSG_NULL_CHAR.to_string());
    }
    if trimmed.chars().count() > BODY_MAX_LEN {
        return Err(format!(
            "Ensure this field has no more than {BODY_MAX_LEN} characters."
        ));
    }
    Ok(trimmed.to_string())
}

/// Coerce a submitted `body` value. Numbers are accepted as their text form.
///
/// # Errors
///
/// Returns the message to report against `body`.
pub fn validate_body(value: &Value) -> Result<String, String> {
    match value {
        Value::Null => Err(MSG_NULL.to_string()),
        Value::String(s) => normalize_body(s),
        Value::Number(n) => normalize_body(&n.to_string()),
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => Err(MSG_NOT_STRING.to_string()),
    }
}

/// Coerce a submitted boolean flag (`is_completed`, `is_frozen`).
///
/// # Errors
///
/// Returns the message to report against the flag.
pub fn validate_flag(value: &Value) -> Result<bool, String> {
    match value {
        Value::Null => Err(MSG_NULL.to_string()),
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => match n.as_i64() {
            Some(1) => Ok(true),
            Some(0) => Ok(false),
            _ => Err(MSG_NOT_BOOLEAN.to_string()),
        },
        Value::String(s) => {
            let word = s.trim().to_ascii_lowercase();
            if TRUE_WORDS.contains(&word.as_str()) {
                Ok(true)
            } else if FALSE_WORDS.contains(&word.as_str()) {
                Ok(false)
            } else {
                Err(MSG_NOT_BOOLEAN.to_string())
            }
        }
        Value::Array(_) | Value::Object(_) => Err(MSG_NOT_BOOLEAN.to_string()),
    }
}
