//! Structural and per-field validation of input documents.
//!
//! Validation walks every record of the layout's collection and collects
//! every violation instead of stopping at the first one. Unknown keys are
//! ignored so upstream producers may add fields freely.
//!
//! A successful run yields a [`ValidatedBatch`], which is the only input the
//! transformer accepts.

use log::{debug, warn};
use serde_json::Value;

use crate::error::{FieldIssue, FieldPath, ValidationError, Violations};
use crate::layout::{EntityLayout, FieldSpec};
use crate::record::{Document, Record, json_type};

/// Records that passed validation, in input order.
///
/// Holds only the layout's data fields; extra keys have been dropped.
#[derive(Debug, Clone)]
pub struct ValidatedBatch {
    layout: &'static EntityLayout,
    records: Vec<Record>,
}

impl ValidatedBatch {
    pub fn layout(&self) -> &'static EntityLayout {
        self.layout
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Validate every record under `layout.collection`.
pub fn validate(
    document: &Document,
    layout: &'static EntityLayout,
) -> Result<ValidatedBatch, ValidationError> {
    let entries = document.collection(layout.collection)?;
    let mut violations = Violations::default();
    let mut records = Vec::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        if let Some(record) = check_record(layout, index, entry, &mut violations) {
            records.push(record);
        }
    }

    if !violations.is_empty() {
        warn!(
            "rejected {} of {} {} record(s): {} violation(s), first {}",
            violations.record_count(),
            entries.len(),
            layout.name,
            violations.len(),
            violations
                .first()
                .map(ToString::to_string)
                .unwrap_or_default()
        );
        return Err(ValidationError::Rejected(violations));
    }

    debug!("validated {} {} record(s)", records.len(), layout.name);
    Ok(ValidatedBatch { layout, records })
}

fn check_record(
    layout: &EntityLayout,
    index: usize,
    entry: &Value,
    violations: &mut Violations,
) -> Option<Record> {
    let Some(object) = entry.as_object() else {
        violations.push(
            FieldPath::record(layout.collection, index),
            FieldIssue::NotAnObject {
                found: json_type(entry),
            },
        );
        return None;
    };

    let before = violations.len();
    let mut record = Record::new();
    for spec in layout.data_fields() {
        let path = || FieldPath::field(layout.collection, index, spec.name);
        match object.get(spec.name) {
            None | Some(Value::Null) => {
                if spec.required {
                    violations.push(path(), FieldIssue::Missing);
                }
            }
            Some(value) => match check_field(spec, value) {
                Ok(Some(raw)) => {
                    record.insert(spec.name, raw);
                }
                Ok(None) => {
                    if spec.required {
                        violations.push(path(), FieldIssue::Missing);
                    }
                }
                Err(issue) => violations.push(path(), issue),
            },
        }
    }

    (violations.len() == before).then_some(record)
}

/// Check one present value. `Ok(None)` means the value is empty.
fn check_field(spec: &FieldSpec, value: &Value) -> Result<Option<String>, FieldIssue> {
    let raw = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) if spec.kind.is_numeric() => match n.as_u64() {
            Some(n) => n.to_string(),
            None => {
                return Err(FieldIssue::Format {
                    kind: spec.kind,
                    value: n.to_string(),
                });
            }
        },
        other => {
            return Err(FieldIssue::WrongType {
                found: json_type(other),
            });
        }
    };

    if raw.is_empty() {
        return Ok(None);
    }
    let max = spec.max_input_len();
    if raw.len() > max {
        return Err(FieldIssue::TooLong {
            max,
            len: raw.len(),
        });
    }
    if !spec.kind.is_valid(&raw, spec.width()) {
        return Err(FieldIssue::Format {
            kind: spec.kind,
            value: raw,
        });
    }
    if let Some(expected) = spec.fixed.filter(|e| !raw.eq_ignore_ascii_case(e)) {
        return Err(FieldIssue::Unexpected {
            expected,
            value: raw,
        });
    }
    Ok(Some(raw))
}
