//! Error taxonomy for the validate → transform → serialize pipeline.
//!
//! Input problems surface as [`ValidationError`] and are user-correctable.
//! [`LayoutError`] means the layout table or the serializer disagree with
//! themselves; it is a defect and should abort the run.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::layout::FieldKind;

/// Location of an offending value inside a document, e.g. `payees[3].payees_tin`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldPath {
    pub collection: String,
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl FieldPath {
    pub fn record(collection: &str, index: usize) -> Self {
        Self {
            collection: collection.to_string(),
            index,
            field: None,
        }
    }

    pub fn field(collection: &str, index: usize, field: &str) -> Self {
        Self {
            collection: collection.to_string(),
            index,
            field: Some(field.to_string()),
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.collection, self.index)?;
        if let Some(field) = &self.field {
            write!(f, ".{}", field)?;
        }
        Ok(())
    }
}

/// What is wrong with a single field or record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum FieldIssue {
    /// Required field absent or empty.
    Missing,
    /// Record entry is not a JSON object.
    NotAnObject { found: &'static str },
    /// JSON type cannot carry this field (e.g. a boolean TIN).
    WrongType { found: &'static str },
    /// Raw value longer than the field accepts.
    TooLong { max: usize, len: usize },
    /// Value rejected by the field's codec.
    Format { kind: FieldKind, value: String },
    /// Field holds something other than its one permitted value.
    Unexpected { expected: &'static str, value: String },
    /// Assigned sequence number does not fit the field.
    SequenceOverflow { max: u64 },
}

impl FieldIssue {
    /// Shape problems, as opposed to a well-formed value with bad content.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            FieldIssue::Missing | FieldIssue::NotAnObject { .. } | FieldIssue::WrongType { .. }
        )
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldIssue::Missing => write!(f, "required field is missing"),
            FieldIssue::NotAnObject { found } => write!(f, "expected an object, got {}", found),
            FieldIssue::WrongType { found } => write!(f, "unsupported value type {}", found),
            FieldIssue::TooLong { max, len } => {
                write!(f, "value is {} characters long (max {})", len, max)
            }
            FieldIssue::Format { kind, value } => {
                write!(f, "'{}' is not a valid {}", value, kind)
            }
            FieldIssue::Unexpected { expected, value } => {
                write!(f, "'{}' is not allowed, expected '{}'", value, expected)
            }
            FieldIssue::SequenceOverflow { max } => {
                write!(f, "sequence number would exceed {}", max)
            }
        }
    }
}

/// A single rejected field together with its path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub path: FieldPath,
    #[serde(flatten)]
    pub issue: FieldIssue,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.issue)
    }
}

/// Every violation found in one document, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Violations(pub Vec<Violation>);

impl Violations {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    pub fn first(&self) -> Option<&Violation> {
        self.0.first()
    }

    /// Number of distinct records with at least one violation.
    pub fn record_count(&self) -> usize {
        self.0
            .iter()
            .map(|v| v.path.index)
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Whether any violation points at `field` (any record).
    pub fn touches(&self, field: &str) -> bool {
        self.0
            .iter()
            .any(|v| v.path.field.as_deref() == Some(field))
    }

    pub(crate) fn push(&mut self, path: FieldPath, issue: FieldIssue) {
        self.0.push(Violation { path, issue });
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} violation(s)", self.0.len())?;
        for v in &self.0 {
            write!(f, "\n  {}", v)?;
        }
        Ok(())
    }
}

/// Rejection of an input document.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The document does not have the expected top-level shape.
    #[error("malformed document: {reason}")]
    Malformed { reason: String },

    /// One or more records failed field checks.
    #[error("document rejected: {0}")]
    Rejected(Violations),
}

impl ValidationError {
    pub fn violations(&self) -> Option<&Violations> {
        match self {
            ValidationError::Rejected(v) => Some(v),
            ValidationError::Malformed { .. } => None,
        }
    }
}

/// Internal layout or serialization invariant broken.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("unknown entity '{0}'")]
    UnknownEntity(String),

    #[error("field '{field}' has an invalid range {start}-{end}")]
    EmptyRange {
        field: &'static str,
        start: usize,
        end: usize,
    },

    #[error("gap before field '{field}': expected start {expected}, found {found}")]
    Gap {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("field '{field}' overlaps its predecessor: expected start {expected}, found {found}")]
    Overlap {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("field '{0}' is declared twice")]
    DuplicateField(&'static str),

    #[error("layout '{entity}' covers {covered} bytes but declares width {declared}")]
    WidthMismatch {
        entity: &'static str,
        declared: usize,
        covered: usize,
    },

    #[error("record {index} serialized to {actual} bytes, expected {expected}")]
    RecordWidth {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("record {record}: blank region {start}-{end} holds byte 0x{byte:02X} at column {column}")]
    BlankRegion {
        record: usize,
        start: usize,
        end: usize,
        column: usize,
        byte: u8,
    },

    #[error("region {start}-{end} lies outside a {len}-byte record")]
    OutOfBounds { start: usize, end: usize, len: usize },
}

/// Failure of the one-shot [`encode_document`](crate::encode_document) pipeline.
#[derive(Debug, Error)]
pub enum FireError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("layout integrity error: {0}")]
    Layout(#[from] LayoutError),
}
