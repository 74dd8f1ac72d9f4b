use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use bookshelf_core::BookId;

/// Upper bound on `title`, in characters (not bytes).
pub const TITLE_MAX_CHARS: usize = 200;

pub const MSG_FIELD_REQUIRED: &str = "This field is required.";
pub const MSG_FIELD_NOT_NULL: &str = "This field may not be null.";
pub const MSG_NOT_A_STRING: &str = "Not a valid string.";
pub const MSG_NOT_AN_INTEGER: &str = "A valid integer is required.";

/// A persisted book record.
///
/// The serialized form (`{id, title, release_year}`) is the HTTP response
/// shape; the field list is declared once here and shared by the store and
/// HTTP layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub release_year: i32,
}

/// A validated write payload: the mutable fields of a [`Book`] without an id.
///
/// Produced by [`BookDraft::from_wire`]; consumed by the store on insert and
/// update. Updates replace both fields wholesale, so the draft is always
/// complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    pub title: String,
    pub release_year: i32,
}

/// Field-scoped validation failures, keyed by field name.
///
/// Serializes as `{"field": ["message", ...], ...}`. A `BTreeMap` keeps the
/// field order deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for `field` (empty if the field validated cleanly).
    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl core::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl BookDraft {
    /// Validate an incoming JSON record into a draft.
    ///
    /// Purely local: no store access, and it runs before any persistence
    /// call. Checks presence and type of both fields and the title length
    /// bound. Failures accumulate per field rather than short-circuiting,
    /// so a body that is wrong in two places reports both.
    pub fn from_wire(value: &Value) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let title = match value.get("title") {
            None => {
                errors.push("title", MSG_FIELD_REQUIRED);
                None
            }
            Some(Value::Null) => {
                errors.push("title", MSG_FIELD_NOT_NULL);
                None
            }
            Some(Value::String(s)) => {
                if s.chars().count() > TITLE_MAX_CHARS {
                    errors.push(
                        "title",
                        format!(
                            "Ensure this field has no more than {TITLE_MAX_CHARS} characters."
                        ),
                    );
                    None
                } else {
                    Some(s.clone())
                }
            }
            Some(_) => {
                errors.push("title", MSG_NOT_A_STRING);
                None
            }
        };

        let release_year = match value.get("release_year") {
            None => {
                errors.push("release_year", MSG_FIELD_REQUIRED);
                None
            }
            Some(Value::Null) => {
                errors.push("release_year", MSG_FIELD_NOT_NULL);
                None
            }
            // Only JSON integers that fit the column type pass; floats,
            // strings and booleans do not coerce.
            Some(v) => match v.as_i64().and_then(|n| i32::try_from(n).ok()) {
                Some(n) => Some(n),
                None => {
                    errors.push("release_year", MSG_NOT_AN_INTEGER);
                    None
                }
            },
        };

        match (title, release_year) {
            (Some(title), Some(release_year)) => Ok(Self {
                title,
                release_year,
            }),
            _ => Err(errors),
        }
    }

    /// Attach a store-assigned id, producing the full record.
    pub fn into_book(self, id: BookId) -> Book {
        Book {
            id,
            title: self.title,
            release_year: self.release_year,
        }
    }
}
