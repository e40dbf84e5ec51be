//! Payee records through validate → xform → fire.

mod common;

use common::*;
use fire_irs::{
    FieldIssue, FireError, SequencePolicy, ValidationError, XformOptions, encode_document, fire,
    validate, verify_blanks,
};
use pretty_assertions::assert_eq;
use serde_json::json;

// Schema validation

#[test]
fn schema_ignores_extra_data() {
    let mut payees = valid_payees();
    payees[0]["extraneous_key"] = json!("should_be_ignored");
    let batch = validate(&with_payees(payees), payee_layout()).unwrap();
    assert_eq!(batch.len(), 2);
}

#[test]
fn schema_rejects_overly_long_values() {
    for (i, payee) in valid_payees().iter().enumerate() {
        for (key, value) in payee.as_object().unwrap() {
            let Some(text) = value.as_str() else { continue };
            let mut payees = valid_payees();
            payees[i][key] = json!(format!("{}{}", text, "A".repeat(99)));
            let err = validate(&with_payees(payees), payee_layout()).unwrap_err();
            let violations = err.violations().unwrap();
            assert!(violations.touches(key), "payees[{i}].{key} accepted an overlong value");
        }
    }
}

#[test]
fn schema_accepts_text_one_short_of_the_limit() {
    for spec in payee_layout().data_fields() {
        if spec.kind != fire_irs::FieldKind::Alpha || spec.width() < 2 {
            continue;
        }
        let short = "A".repeat(spec.width() - 1);
        assert!(validate_with(0, spec.name, json!(short)), "{} rejected", spec.name);
        let exact = "A".repeat(spec.width());
        assert!(validate_with(0, spec.name, json!(exact)), "{} rejected", spec.name);
        let over = "A".repeat(spec.width() + 1);
        assert!(!validate_with(0, spec.name, json!(over)), "{} accepted", spec.name);
    }
}

#[test]
fn schema_amount_codes() {
    for (i, payee) in valid_payees().iter().enumerate() {
        for key in payee.as_object().unwrap().keys() {
            if !key.starts_with("payment_amount_") {
                continue;
            }
            for amount in VALID_DOLLAR_AMOUNTS {
                assert!(validate_with(i, key, json!(amount)), "payees[{i}].{key} = {amount:?}");
            }
            for amount in INVALID_DOLLAR_AMOUNTS {
                assert!(!validate_with(i, key, json!(amount)), "payees[{i}].{key} = {amount:?}");
            }
        }
    }
}

#[test]
fn schema_amount_codes_on_every_amount_field() {
    for spec in payee_layout().data_fields() {
        if spec.kind != fire_irs::FieldKind::Amount {
            continue;
        }
        for amount in VALID_DOLLAR_AMOUNTS {
            assert!(validate_with(1, spec.name, json!(amount)), "{} = {amount:?}", spec.name);
        }
        for amount in INVALID_DOLLAR_AMOUNTS {
            assert!(!validate_with(1, spec.name, json!(amount)), "{} = {amount:?}", spec.name);
        }
    }
}

#[test]
fn schema_validation_tins() {
    for i in 0..valid_payees().len() {
        for tin in VALID_TINS {
            assert!(validate_with(i, "payees_tin", json!(tin)), "{tin}");
        }
        for tin in INVALID_TINS {
            assert!(!validate_with(i, "payees_tin", json!(tin)), "{tin}");
        }
    }
}

#[test]
fn schema_zip_codes() {
    for i in 0..valid_payees().len() {
        for zip in VALID_ZIPS {
            assert!(validate_with(i, "payee_zip_code", json!(zip)), "{zip}");
        }
        for zip in INVALID_ZIPS {
            assert!(!validate_with(i, "payee_zip_code", json!(zip)), "{zip}");
        }
    }
}

#[test]
fn schema_record_type_is_always_b() {
    assert!(validate_with(0, "record_type", json!("b")));
    for other in ["X", "A", "1", " "] {
        assert!(!validate_with(0, "record_type", json!(other)), "{other:?}");
    }
}

#[test]
fn missing_required_data_is_rejected() {
    let mut payees = valid_payees();
    payees[0].as_object_mut().unwrap().remove("payees_tin");
    let document = with_payees(payees);

    let err = validate(&document, payee_layout()).unwrap_err();
    let first = err.violations().unwrap().first().unwrap().clone();
    assert_eq!(first.path.to_string(), "payees[0].payees_tin");
    assert_eq!(first.issue, FieldIssue::Missing);
    assert!(first.issue.is_structural());

    let result = encode_document(&document, payee_layout(), &XformOptions::default());
    assert!(matches!(
        result,
        Err(FireError::Validation(ValidationError::Rejected(_)))
    ));
}

#[test]
fn document_without_collection_is_malformed() {
    let document = fire_irs::Document::from_value(json!({ "payers": [] }));
    let err = validate(&document, payee_layout()).unwrap_err();
    assert!(matches!(err, ValidationError::Malformed { .. }));
}

// xform

#[test]
fn xform_uppercase() {
    let mut payees = valid_payees();
    payees[0]["first_payee_name_line"] = json!("nocaps mclowercase");
    let transformed = transform(payees);
    assert_eq!(transformed[0].get("first_payee_name_line"), Some("NOCAPS MCLOWERCASE"));
    assert_eq!(transformed[0].get("payee_city"), Some("SPRINGFIELD"));
}

#[test]
fn xform_removes_punctuation() {
    for tin in VALID_TINS.iter().take(2) {
        let mut payees = valid_payees();
        payees[0]["payees_tin"] = json!(tin);
        let transformed = transform(payees);
        assert_eq!(transformed[0].get("payees_tin"), Some("121234567"));
    }
}

#[test]
fn xform_adds_system_fields() {
    let payees = valid_payees();
    assert!(payees[0].get("blank_2").is_none());
    let transformed = transform(payees);
    for filler in payee_layout().fillers() {
        assert!(transformed[0].contains(filler.name), "{} missing", filler.name);
    }
    for spec in payee_layout().fields {
        assert!(transformed[1].contains(spec.name), "{} missing", spec.name);
    }
}

// fire

#[test]
fn fire_string_length() {
    let payees = valid_payees();
    let n = payees.len();
    let out = fire(&transform(payees)).unwrap();
    assert_eq!(out.len(), 750 * n);
}

#[test]
fn fire_zero_records_is_empty() {
    let out = fire(&transform(Vec::new())).unwrap();
    assert!(out.is_empty());
    let bytes = encode_document(&with_payees(Vec::new()), payee_layout(), &XformOptions::default())
        .unwrap();
    assert!(bytes.is_empty());
}

#[test]
fn fire_padding_blanks() {
    let mut payees = valid_payees();
    payees[0]["payee_mailing_address"] = json!("1234 ROADSTREET AVE");
    let out = fire(&transform(payees)).unwrap();
    let addr = &out[367..407];
    assert_eq!(&addr[..19], b"1234 ROADSTREET AVE");
    assert_eq!(addr[19..].to_vec(), vec![0u8; 21]);
}

#[test]
fn fire_padding_zeros() {
    let mut payees = valid_payees();
    payees[0]["record_sequence_number"] = json!("2");
    let out = fire(&transform(payees)).unwrap();
    assert_eq!(&out[499..507], b"00000002");
}

#[test]
fn fire_blanks_layout() {
    let out = fire(&transform(valid_payees())).unwrap();
    for record in out.chunks(750) {
        for range in payee_layout().blank_map() {
            let region = &record[range.start - 1..range.end];
            assert!(region.iter().all(|&b| b == 0), "blank {range} holds data");
        }
    }
    assert_eq!(verify_blanks(payee_layout(), &out), Ok(()));
}

#[test]
fn fire_second_record_layout() {
    let out = fire(&transform(valid_payees())).unwrap();
    let second = &out[750..];
    assert_eq!(&second[..5], b"B2018");
    assert_eq!(&second[11..20], b"987654321");
    assert_eq!(&second[162..174], b"000012000000");
    assert_eq!(&second[489..498], b"972011234");
    assert_eq!(&second[499..507], b"00000004");
}

#[test]
fn fire_sequence_number_at_field_width() {
    let mut payees = valid_payees();
    payees[0]["record_sequence_number"] = json!("99999999");
    let out = fire(&transform(payees)).unwrap();
    assert_eq!(&out[499..507], b"99999999");
    assert_eq!(&out[750 + 499..750 + 507], b"00000004");
}

fn renumbered(start: u64) -> Result<Vec<u8>, FireError> {
    let options = XformOptions {
        sequence: SequencePolicy::Renumber { start },
    };
    encode_document(&with_payees(valid_payees()), payee_layout(), &options)
}

#[test]
fn renumbering_to_the_last_eight_digit_number() {
    let out = renumbered(99_999_998).unwrap();
    assert_eq!(&out[499..507], b"99999998");
    assert_eq!(&out[750 + 499..750 + 507], b"99999999");
}

#[test]
fn renumbering_past_eight_digits_is_a_validation_error() {
    for start in [99_999_999, 100_000_000, u64::MAX] {
        let err = renumbered(start).unwrap_err();
        let FireError::Validation(ValidationError::Rejected(violations)) = &err else {
            panic!("start {start}: expected a rejected document, got {err:?}");
        };
        assert!(violations.touches("record_sequence_number"));
        assert_eq!(
            violations.first().unwrap().issue,
            FieldIssue::SequenceOverflow { max: 99_999_999 }
        );
    }
}
