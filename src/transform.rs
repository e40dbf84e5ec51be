//! Normalization of validated records into layout-complete records.

use std::collections::BTreeMap;

use log::{debug, warn};

use crate::codec;
use crate::error::{FieldIssue, FieldPath, ValidationError, Violations};
use crate::layout::{EntityLayout, FieldKind, FieldSpec};
use crate::validate::ValidatedBatch;

/// How record sequence numbers are assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequencePolicy {
    /// Keep caller-supplied numbers. Records without one are numbered
    /// upward from the highest supplied number (from 1 when none is).
    #[default]
    Preserve,
    /// Number every record `start, start + 1, ...` in input order.
    Renumber { start: u64 },
}

/// Options for [`xform`].
#[derive(Debug, Clone, Copy, Default)]
pub struct XformOptions {
    pub sequence: SequencePolicy,
}

/// A record carrying a normalized value for every field of its layout,
/// filler included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedRecord {
    layout: &'static EntityLayout,
    values: BTreeMap<&'static str, String>,
}

impl TransformedRecord {
    pub fn layout(&self) -> &'static EntityLayout {
        self.layout
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Field values in layout (column) order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.layout
            .fields
            .iter()
            .filter_map(|f| self.values.get(f.name).map(|v| (f.name, v.as_str())))
    }
}

/// Normalize every record of `batch`, preserving order.
///
/// Text is upper-cased, TIN and ZIP values lose their punctuation, numeric
/// fields are zero padded to their width, and every filler field is added.
/// Fails when an assigned sequence number does not fit its field.
pub fn xform(
    batch: &ValidatedBatch,
    options: &XformOptions,
) -> Result<Vec<TransformedRecord>, ValidationError> {
    let layout = batch.layout();
    let sequences = match layout.sequence_field() {
        Some(spec) => assign_sequences(batch, spec, options.sequence)?,
        None => Vec::new(),
    };
    let out: Vec<TransformedRecord> = batch
        .records()
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let mut values = BTreeMap::new();
            for spec in layout.fields {
                let width = spec.width();
                let value = match (spec.kind, record.get(spec.name)) {
                    (FieldKind::Filler, _) => codec::fill(width),
                    (FieldKind::Sequence, _) => {
                        spec.kind.normalize(&sequences[index].to_string(), width)
                    }
                    (kind, Some(raw)) => kind.normalize(raw, width),
                    (kind, None) => kind.default_value(width),
                };
                values.insert(spec.name, value);
            }
            TransformedRecord { layout, values }
        })
        .collect();
    debug!(
        "transformed {} {} record(s) ({:?})",
        out.len(),
        layout.name,
        options.sequence
    );
    Ok(out)
}

/// Sequence number of every record, each checked against the field width.
fn assign_sequences(
    batch: &ValidatedBatch,
    spec: &FieldSpec,
    policy: SequencePolicy,
) -> Result<Vec<u64>, ValidationError> {
    let layout = batch.layout();
    let max = u32::try_from(spec.width())
        .ok()
        .and_then(|width| 10u64.checked_pow(width))
        .map_or(u64::MAX, |limit| limit - 1);
    let supplied: Vec<Option<u64>> = batch
        .records()
        .iter()
        .map(|r| r.get(spec.name).map(|raw| raw.parse().unwrap_or(u64::MAX)))
        .collect();

    // `None` once the counter has run past u64.
    let mut next = match policy {
        SequencePolicy::Renumber { start } => Some(start),
        SequencePolicy::Preserve => supplied
            .iter()
            .flatten()
            .max()
            .map_or(Some(1), |highest| highest.checked_add(1)),
    };

    let mut violations = Violations::default();
    let mut out = Vec::with_capacity(supplied.len());
    for (index, given) in supplied.into_iter().enumerate() {
        let assigned = match (policy, given) {
            (SequencePolicy::Preserve, Some(n)) => Some(n),
            _ => {
                let current = next;
                next = next.and_then(|n| n.checked_add(1));
                current
            }
        };
        match assigned.filter(|n| *n <= max) {
            Some(n) => out.push(n),
            None => violations.push(
                FieldPath::field(layout.collection, index, spec.name),
                FieldIssue::SequenceOverflow { max },
            ),
        }
    }

    if !violations.is_empty() {
        warn!(
            "{} {} record(s) cannot be numbered within {} ({:?})",
            violations.len(),
            layout.name,
            max,
            policy
        );
        return Err(ValidationError::Rejected(violations));
    }
    Ok(out)
}
