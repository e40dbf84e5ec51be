#![allow(dead_code)]

use fire_irs::{Document, EntityLayout, LayoutRegistry, TransformedRecord, XformOptions, validate, xform};
use serde_json::Value;

pub const FIXTURE: &str = "tests/data/payees.json";

pub const VALID_DOLLAR_AMOUNTS: &[&str] = &["0", "1", "1000", "+1000", "000000012345", "999999999999"];
pub const INVALID_DOLLAR_AMOUNTS: &[&str] =
    &["-1", "1.00", "$100", "1,000", "ten", " 5", "1000000000000", "12 34"];

pub const VALID_TINS: &[&str] = &["121234567", "12-1234567", "121-23-4567"];
pub const INVALID_TINS: &[&str] = &["12123456", "1212345678", "12-123456X", "12/1234567", "ABCDEFGHI"];

pub const VALID_ZIPS: &[&str] = &["12345", "123456789", "12345-6789"];
pub const INVALID_ZIPS: &[&str] = &["1234", "123456", "12345678", "1234567890", "12345-678", "ABCDE"];

pub fn payee_layout() -> &'static EntityLayout {
    LayoutRegistry::payee()
}

/// The fixture document as raw JSON.
pub fn valid_all_data() -> Value {
    let text = std::fs::read_to_string(FIXTURE).expect("fixture readable");
    serde_json::from_str(&text).expect("fixture is JSON")
}

/// The fixture with its payee list replaced.
pub fn with_payees(payees: Vec<Value>) -> Document {
    let mut root = valid_all_data();
    root["payees"] = Value::Array(payees);
    Document::from_value(root)
}

pub fn valid_payees() -> Vec<Value> {
    valid_all_data()["payees"].as_array().expect("payees array").clone()
}

pub fn transform(payees: Vec<Value>) -> Vec<TransformedRecord> {
    let batch = validate(&with_payees(payees), payee_layout()).expect("fixture validates");
    xform(&batch, &XformOptions::default()).expect("fixture transforms")
}

/// Validate with one field of one payee replaced.
pub fn validate_with(index: usize, field: &str, value: Value) -> bool {
    let mut payees = valid_payees();
    payees[index][field] = value;
    validate(&with_payees(payees), payee_layout()).is_ok()
}
