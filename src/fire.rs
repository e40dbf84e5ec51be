use std::fmt::{self, Write};

use log::debug;

use crate::error::LayoutError;
use crate::layout::{EntityLayout, FieldSpec};
use crate::transform::TransformedRecord;

const RULER_WIDTH: usize = 75;

/// One serialized fixed-width record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FireRecord {
    layout: &'static EntityLayout,
    bytes: Vec<u8>,
}

impl FireRecord {
    /// Lay out a transformed record field by field in column order.
    pub fn encode(record: &TransformedRecord, index: usize) -> Result<Self, LayoutError> {
        let layout = record.layout();
        let mut bytes = Vec::with_capacity(layout.width);
        for spec in layout.fields {
            let value = record.get(spec.name).unwrap_or_default();
            spec.kind.encode(value, spec.width(), &mut bytes);
            let expected = spec.range.end;
            if bytes.len() != expected {
                return Err(LayoutError::RecordWidth {
                    index,
                    expected,
                    actual: bytes.len(),
                });
            }
        }
        Self::from_bytes(layout, bytes, index)
    }

    /// Wrap an already serialized record, checking its width.
    pub fn from_bytes(
        layout: &'static EntityLayout,
        bytes: Vec<u8>,
        index: usize,
    ) -> Result<Self, LayoutError> {
        if bytes.len() != layout.width {
            return Err(LayoutError::RecordWidth {
                index,
                expected: layout.width,
                actual: bytes.len(),
            });
        }
        Ok(Self { layout, bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn layout(&self) -> &'static EntityLayout {
        self.layout
    }

    /// Bytes occupied by `spec`.
    pub fn field(&self, spec: &FieldSpec) -> &[u8] {
        &self.bytes[spec.range.as_index()]
    }

    pub fn field_named(&self, name: &str) -> Option<&[u8]> {
        self.layout.field(name).map(|spec| self.field(spec))
    }

    pub fn render(&self, style: RenderStyle) -> String {
        match style {
            RenderStyle::Fields => self.render_fields(),
            RenderStyle::Ruler => self.render_ruler(),
        }
    }

    fn render_fields(&self) -> String {
        let mut out = String::new();
        let name_width = self
            .layout
            .fields
            .iter()
            .map(|f| f.name.len())
            .max()
            .unwrap_or(0);
        writeln!(&mut out, "{} ({} bytes)", self.layout.name, self.layout.width).ok();
        for spec in self.layout.fields {
            writeln!(
                &mut out,
                "{:>9}  {:<name_width$}  |{}|",
                spec.range.to_string(),
                spec.name,
                printable(self.field(spec)),
                name_width = name_width
            )
            .ok();
        }
        out
    }

    fn render_ruler(&self) -> String {
        // Rows of 75 columns; NUL rendered as '.'.
        let mut out = String::new();
        let ruler: String = (1..=RULER_WIDTH)
            .map(|c| match c % 10 {
                0 => char::from(b'0' + ((c / 10) % 10) as u8),
                5 => '+',
                _ => '.',
            })
            .collect();
        writeln!(&mut out, "       {}", ruler).ok();
        for (row, chunk) in self.bytes.chunks(RULER_WIDTH).enumerate() {
            writeln!(&mut out, "{:>5} |{}|", row * RULER_WIDTH + 1, printable(chunk)).ok();
        }
        out
    }
}

fn printable(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| match b {
            0x20..=0x7E => char::from(b),
            _ => '.',
        })
        .collect()
}

/// Serialize `records` in order and concatenate them without separators.
///
/// The result is exactly `records.len() * width` bytes; zero records
/// produce an empty byte string.
pub fn fire(records: &[TransformedRecord]) -> Result<Vec<u8>, LayoutError> {
    let width = records.first().map(|r| r.layout().width).unwrap_or(0);
    let mut out = Vec::with_capacity(width * records.len());
    for (index, record) in records.iter().enumerate() {
        let encoded = FireRecord::encode(record, index)?;
        out.extend_from_slice(encoded.as_bytes());
    }
    let expected = width * records.len();
    if out.len() != expected {
        return Err(LayoutError::RecordWidth {
            index: records.len(),
            expected,
            actual: out.len(),
        });
    }
    debug!("serialized {} record(s) into {} bytes", records.len(), out.len());
    Ok(out)
}

/// Cut a concatenated byte string back into records of `layout.width`.
pub fn split_records(
    layout: &'static EntityLayout,
    bytes: &[u8],
) -> Result<Vec<FireRecord>, LayoutError> {
    if bytes.len() % layout.width != 0 {
        return Err(LayoutError::RecordWidth {
            index: bytes.len() / layout.width,
            expected: layout.width,
            actual: bytes.len() % layout.width,
        });
    }
    bytes
        .chunks(layout.width)
        .enumerate()
        .map(|(index, chunk)| FireRecord::from_bytes(layout, chunk.to_vec(), index))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStyle {
    /// One line per field with its column range.
    Fields,
    /// Raw bytes under a column ruler.
    Ruler,
}

impl fmt::Display for RenderStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderStyle::Fields => write!(f, "fields"),
            RenderStyle::Ruler => write!(f, "ruler"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutRegistry;
    use crate::record::Document;
    use crate::transform::{XformOptions, xform};
    use crate::validate::validate;
    use serde_json::json;

    fn transformed(n: usize) -> Vec<TransformedRecord> {
        let records: Vec<_> = (0..n)
            .map(|i| {
                json!({
                    "record_type": "B",
                    "payment_year": "2018",
                    "payees_tin": "121234567",
                    "first_payee_name_line": format!("PAYEE {i}"),
                    "payee_mailing_address": "1234 ROADSTREET AVE",
                    "payee_city": "SPRINGFIELD",
                    "payee_state": "IL",
                    "payee_zip_code": "62701",
                    "payment_amount_1": "1500"
                })
            })
            .collect();
        let doc = Document::from_value(json!({ "payees": records }));
        let batch = validate(&doc, LayoutRegistry::payee()).unwrap();
        xform(&batch, &XformOptions::default()).unwrap()
    }

    #[test]
    fn width_is_n_times_record_width() {
        for n in [0, 1, 3] {
            assert_eq!(fire(&transformed(n)).unwrap().len(), 750 * n);
        }
    }

    #[test]
    fn records_are_concatenated_in_order() {
        let out = fire(&transformed(2)).unwrap();
        let records = split_records(LayoutRegistry::payee(), &out).unwrap();
        assert_eq!(records.len(), 2);
        let name = |r: &FireRecord| r.field_named("first_payee_name_line").unwrap()[..7].to_vec();
        assert_eq!(name(&records[0]), b"PAYEE 0");
        assert_eq!(name(&records[1]), b"PAYEE 1");
        assert_eq!(records[1].field_named("record_sequence_number").unwrap(), b"00000002");
    }

    #[test]
    fn amounts_are_zero_filled() {
        let out = fire(&transformed(1)).unwrap();
        assert_eq!(&out[54..66], b"000000001500");
        assert_eq!(&out[66..78], b"000000000000");
    }

    #[test]
    fn split_rejects_partial_records() {
        let err = split_records(LayoutRegistry::payee(), &[0u8; 751]).unwrap_err();
        assert_eq!(
            err,
            LayoutError::RecordWidth {
                index: 1,
                expected: 750,
                actual: 1
            }
        );
    }

    #[test]
    fn renders_nul_as_dot() {
        let out = fire(&transformed(1)).unwrap();
        let record = FireRecord::from_bytes(LayoutRegistry::payee(), out, 0).unwrap();
        let fields = record.render(RenderStyle::Fields);
        assert!(fields.contains("368-407"));
        assert!(fields.contains("|1234 ROADSTREET AVE.....................|"));
        let ruler = record.render(RenderStyle::Ruler);
        assert_eq!(ruler.lines().count(), 1 + 10);
        assert!(ruler.lines().nth(1).unwrap().starts_with("    1 |B2018"));
    }
}
