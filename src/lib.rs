//! Core library for validating payee records and encoding them as
//! fixed-width IRS FIRE records.
//!
//! The pipeline is `validate` → `xform` → `fire`. Only a
//! [`ValidatedBatch`] can be transformed, so unvalidated data never reaches
//! the serializer.

mod blanks;
mod codec;
mod error;
mod fire;
mod layout;
mod record;
mod transform;
mod validate;

pub use blanks::{check_region, verify_blanks};
pub use codec::{
    digits_only, is_valid_amount, is_valid_digits, is_valid_text, is_valid_tin, is_valid_zip,
};
pub use error::{FieldIssue, FieldPath, FireError, LayoutError, ValidationError, Violation, Violations};
pub use fire::{FireRecord, RenderStyle, fire, split_records};
pub use layout::{ByteRange, EntityLayout, FieldKind, FieldSpec, LayoutRegistry};
pub use record::{Document, Record};
pub use transform::{SequencePolicy, TransformedRecord, XformOptions, xform};
pub use validate::{ValidatedBatch, validate};

/// Run the whole pipeline on one document and return the concatenated
/// fixed-width records, after checking the layout and every blank region.
pub fn encode_document(
    document: &Document,
    layout: &'static EntityLayout,
    options: &XformOptions,
) -> Result<Vec<u8>, FireError> {
    layout.check()?;
    let batch = validate(document, layout)?;
    let transformed = xform(&batch, options)?;
    let bytes = fire(&transformed)?;
    verify_blanks(layout, &bytes)?;
    Ok(bytes)
}
