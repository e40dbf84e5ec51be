//! Per-kind field rules.
//!
//! Every [`FieldKind`] has three faces:
//! - `is_valid`: does a raw caller value belong to the kind?
//! - `normalize`: the transform applied before serialization
//!   (upper-casing, punctuation stripping, zero padding).
//! - `encode`: emit exactly `width` bytes for a normalized value.
//!
//! Padding rules: text-like kinds are left-justified and NUL padded,
//! numeric kinds are right-justified and `'0'` padded, filler is all NUL.

use std::fmt;

use crate::layout::FieldKind;

pub const NUL: u8 = 0x00;
pub const ZERO: u8 = b'0';

const TIN_DIGITS: usize = 9;
const TIN_MAX_INPUT: usize = 11;
const ZIP_MAX_INPUT: usize = 10;

impl FieldKind {
    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::Alpha => "text",
            FieldKind::Numeric => "number",
            FieldKind::Sequence => "sequence number",
            FieldKind::Amount => "dollar amount",
            FieldKind::Tin => "TIN",
            FieldKind::Zip => "zip code",
            FieldKind::Filler => "filler",
        }
    }

    /// Right-justified, zero-filled kinds.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            FieldKind::Numeric | FieldKind::Sequence | FieldKind::Amount
        )
    }

    /// Byte used to pad a value up to the field width.
    pub fn pad_byte(&self) -> u8 {
        if self.is_numeric() { ZERO } else { NUL }
    }

    /// Longest raw input accepted for a field of `width` bytes.
    /// Punctuated identifiers may be longer than their output width.
    pub fn max_input_len(&self, width: usize) -> usize {
        match self {
            FieldKind::Tin => TIN_MAX_INPUT,
            FieldKind::Zip => ZIP_MAX_INPUT,
            FieldKind::Amount => width + 1,
            _ => width,
        }
    }

    pub fn is_valid(&self, raw: &str, width: usize) -> bool {
        match self {
            FieldKind::Alpha => is_valid_text(raw, width),
            FieldKind::Numeric | FieldKind::Sequence => is_valid_digits(raw, width),
            FieldKind::Amount => is_valid_amount(raw, width),
            FieldKind::Tin => is_valid_tin(raw),
            FieldKind::Zip => is_valid_zip(raw),
            FieldKind::Filler => false,
        }
    }

    /// Canonical representation of a valid raw value.
    pub fn canonicalize(&self, raw: &str) -> String {
        match self {
            FieldKind::Tin | FieldKind::Zip => digits_only(raw),
            FieldKind::Amount => raw.strip_prefix('+').unwrap_or(raw).to_string(),
            _ => raw.to_string(),
        }
    }

    /// Transform a validated value into its pre-serialization form.
    pub fn normalize(&self, raw: &str, width: usize) -> String {
        match self {
            FieldKind::Alpha => raw.to_ascii_uppercase(),
            FieldKind::Tin | FieldKind::Zip => digits_only(raw),
            FieldKind::Numeric | FieldKind::Sequence | FieldKind::Amount => {
                zero_pad(&self.canonicalize(raw), width)
            }
            FieldKind::Filler => fill(width),
        }
    }

    /// Value used when an optional field is absent.
    pub fn default_value(&self, width: usize) -> String {
        match self {
            FieldKind::Filler => fill(width),
            k if k.is_numeric() => zero_pad("", width),
            _ => String::new(),
        }
    }

    /// Append `value` padded to `width` bytes. Values longer than `width`
    /// are written whole so the caller's width check can catch them.
    pub fn encode(&self, value: &str, width: usize, out: &mut Vec<u8>) {
        let bytes = value.as_bytes();
        let pad = std::iter::repeat_n(self.pad_byte(), width.saturating_sub(bytes.len()));
        if self.is_numeric() {
            out.extend(pad);
            out.extend_from_slice(bytes);
        } else {
            out.extend_from_slice(bytes);
            out.extend(pad);
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Printable ASCII (space through tilde), at most `width` bytes.
pub fn is_valid_text(raw: &str, width: usize) -> bool {
    raw.len() <= width && raw.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

/// 1..=width ASCII digits.
pub fn is_valid_digits(raw: &str, width: usize) -> bool {
    !raw.is_empty() && raw.len() <= width && raw.bytes().all(|b| b.is_ascii_digit())
}

/// Non-negative integer cents with an optional leading `+`.
pub fn is_valid_amount(raw: &str, width: usize) -> bool {
    let digits = raw.strip_prefix('+').unwrap_or(raw);
    is_valid_digits(digits, width)
}

/// 9 digits once `-` and spaces are removed; nothing else tolerated.
pub fn is_valid_tin(raw: &str) -> bool {
    raw.len() <= TIN_MAX_INPUT
        && raw.chars().all(|c| c.is_ascii_digit() || c == '-' || c == ' ')
        && raw.bytes().filter(u8::is_ascii_digit).count() == TIN_DIGITS
}

/// `NNNNN`, `NNNNNNNNN` or `NNNNN-NNNN`.
pub fn is_valid_zip(raw: &str) -> bool {
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    match raw.split_once('-') {
        Some((head, tail)) => head.len() == 5 && tail.len() == 4 && all_digits(head) && all_digits(tail),
        None => (raw.len() == 5 || raw.len() == 9) && all_digits(raw),
    }
}

/// Drop everything except ASCII digits.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

pub fn zero_pad(digits: &str, width: usize) -> String {
    format!("{:0>width$}", digits, width = width)
}

pub fn fill(width: usize) -> String {
    "\0".repeat(width)
}
