use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::error::LayoutError;

/// Inclusive, 1-indexed byte range inside a fixed-width record.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end + 1 - self.start
    }

    pub fn contains(&self, column: usize) -> bool {
        column >= self.start && column <= self.end
    }

    /// Zero-based slice bounds (`start - 1 .. end`).
    pub fn as_index(&self) -> std::ops::Range<usize> {
        self.start - 1..self.end
    }

    fn is_well_formed(&self) -> bool {
        self.start >= 1 && self.start <= self.end
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Semantic type of a field. Selects the codec used to validate,
/// normalize and serialize it.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text, upper-cased, NUL padded on the right.
    Alpha,
    /// Fixed-width digit string, zero padded on the left.
    Numeric,
    /// Record sequence number; numeric, assigned by position when absent.
    Sequence,
    /// Dollar amount in integer cents.
    Amount,
    /// Taxpayer identification number.
    Tin,
    /// 5 or 9 digit ZIP code.
    Zip,
    /// System-reserved region, never populated from caller data.
    Filler,
}

/// One column block of an entity layout.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub range: ByteRange,
    pub required: bool,
    /// The only value the field may hold, compared case-insensitively.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed: Option<&'static str>,
}

impl FieldSpec {
    pub fn width(&self) -> usize {
        self.range.len()
    }

    pub fn is_filler(&self) -> bool {
        self.kind == FieldKind::Filler
    }

    /// Longest raw input accepted before normalization.
    pub fn max_input_len(&self) -> usize {
        self.kind.max_input_len(self.width())
    }
}

/// Declarative fixed-width layout of one entity kind.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EntityLayout {
    pub name: &'static str,
    pub description: &'static str,
    /// Key of the record list inside an input document.
    pub collection: &'static str,
    pub width: usize,
    pub fields: &'static [FieldSpec],
}

impl EntityLayout {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields a caller may supply (everything except filler).
    pub fn data_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| !f.is_filler())
    }

    pub fn fillers(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.is_filler())
    }

    /// Reserved regions, in column order.
    pub fn blank_map(&self) -> Vec<ByteRange> {
        self.fillers().map(|f| f.range).collect()
    }

    pub fn sequence_field(&self) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.kind == FieldKind::Sequence)
    }

    /// Confirm the ranges tile `1..=width` exactly, in order, with unique names.
    pub fn check(&self) -> Result<(), LayoutError> {
        let mut seen = HashSet::new();
        let mut expected = 1usize;
        for field in self.fields {
            if !seen.insert(field.name) {
                return Err(LayoutError::DuplicateField(field.name));
            }
            if !field.range.is_well_formed() {
                return Err(LayoutError::EmptyRange {
                    field: field.name,
                    start: field.range.start,
                    end: field.range.end,
                });
            }
            if field.range.start > expected {
                return Err(LayoutError::Gap {
                    field: field.name,
                    expected,
                    found: field.range.start,
                });
            }
            if field.range.start < expected {
                return Err(LayoutError::Overlap {
                    field: field.name,
                    expected,
                    found: field.range.start,
                });
            }
            expected = field.range.end + 1;
        }
        let covered = expected - 1;
        if covered != self.width {
            return Err(LayoutError::WidthMismatch {
                entity: self.name,
                declared: self.width,
                covered,
            });
        }
        Ok(())
    }
}

/// Registry of built-in entity layouts.
pub struct LayoutRegistry;

impl LayoutRegistry {
    pub fn list() -> Vec<&'static EntityLayout> {
        vec![&PAYEE]
    }

    /// Resolve a layout by entity name or collection key (case-insensitive).
    pub fn get(name: &str) -> Result<&'static EntityLayout, LayoutError> {
        Self::list()
            .into_iter()
            .find(|l| l.name.eq_ignore_ascii_case(name) || l.collection.eq_ignore_ascii_case(name))
            .ok_or_else(|| LayoutError::UnknownEntity(name.to_string()))
    }

    pub fn payee() -> &'static EntityLayout {
        &PAYEE
    }
}

macro_rules! field {
    ($start:expr, $end:expr, $name:expr, $kind:ident) => {
        field!($start, $end, $name, $kind, false)
    };
    ($start:expr, $end:expr, $name:expr, $kind:ident, fixed $value:literal) => {
        FieldSpec {
            name: $name,
            kind: FieldKind::$kind,
            range: ByteRange::new($start, $end),
            required: true,
            fixed: Some($value),
        }
    };
    ($start:expr, $end:expr, $name:expr, $kind:ident, $required:expr) => {
        FieldSpec {
            name: $name,
            kind: FieldKind::$kind,
            range: ByteRange::new($start, $end),
            required: $required,
            fixed: None,
        }
    };
}

// Payee "B" record, 750 bytes.
static PAYEE_FIELDS: &[FieldSpec] = &[
    field!(1, 1, "record_type", Alpha, fixed "B"),
    field!(2, 5, "payment_year", Numeric, true),
    field!(6, 6, "corrected_return_indicator", Alpha),
    field!(7, 10, "name_control", Alpha),
    field!(11, 11, "type_of_tin", Alpha),
    field!(12, 20, "payees_tin", Tin, true),
    field!(21, 40, "payers_account_number_for_payee", Alpha),
    field!(41, 44, "payers_office_code", Alpha),
    field!(45, 54, "blank_1", Filler),
    field!(55, 66, "payment_amount_1", Amount),
    field!(67, 78, "payment_amount_2", Amount),
    field!(79, 90, "payment_amount_3", Amount),
    field!(91, 102, "payment_amount_4", Amount),
    field!(103, 114, "payment_amount_5", Amount),
    field!(115, 126, "payment_amount_6", Amount),
    field!(127, 138, "payment_amount_7", Amount),
    field!(139, 150, "payment_amount_8", Amount),
    field!(151, 162, "payment_amount_9", Amount),
    field!(163, 174, "payment_amount_a", Amount),
    field!(175, 186, "payment_amount_b", Amount),
    field!(187, 198, "payment_amount_c", Amount),
    field!(199, 210, "payment_amount_d", Amount),
    field!(211, 222, "payment_amount_e", Amount),
    field!(223, 234, "payment_amount_f", Amount),
    field!(235, 246, "payment_amount_g", Amount),
    field!(247, 247, "foreign_country_indicator", Alpha),
    field!(248, 287, "first_payee_name_line", Alpha, true),
    field!(288, 327, "second_payee_name_line", Alpha),
    field!(328, 367, "blank_2", Filler),
    field!(368, 407, "payee_mailing_address", Alpha, true),
    field!(408, 447, "blank_3", Filler),
    field!(448, 487, "payee_city", Alpha, true),
    field!(488, 489, "payee_state", Alpha, true),
    field!(490, 498, "payee_zip_code", Zip, true),
    field!(499, 499, "blank_4", Filler),
    field!(500, 507, "record_sequence_number", Sequence),
    field!(508, 543, "blank_5", Filler),
    field!(544, 544, "second_tin_notice", Alpha),
    field!(545, 546, "blank_6", Filler),
    field!(547, 547, "direct_sales_indicator", Alpha),
    field!(548, 548, "fatca_filing_requirement_indicator", Alpha),
    field!(549, 662, "blank_7", Filler),
    field!(663, 722, "special_data_entries", Alpha),
    field!(723, 734, "state_income_tax_withheld", Amount),
    field!(735, 746, "local_income_tax_withheld", Amount),
    field!(747, 748, "combined_federal_state_code", Numeric),
    field!(749, 750, "blank_8", Filler),
];

static PAYEE: EntityLayout = EntityLayout {
    name: "payee",
    description: "Payee \"B\" record (information return detail).",
    collection: "payees",
    width: 750,
    fields: PAYEE_FIELDS,
};
