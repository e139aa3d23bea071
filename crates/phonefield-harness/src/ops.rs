#![forbid(unsafe_code)]

//! Operation sequences for property tests and fuzzing.

use proptest::prelude::*;

/// A single thing that can happen to a mounted field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOp {
    BeginEditing,
    Insert(String),
    Backspace,
    Replace(String),
    TapClear,
    PressReturn,
    EndEditing,
    /// Programmatic text change (a country picker, autofill).
    SetText(String),
    Tick,
    Refresh,
    /// Change the default region; invalid codes clear it.
    SetRegion(String),
}

/// Short fragments of phone-like text.
pub fn fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "[0-9]{1,3}",
        2 => "[0-9 ()+-]{1,4}",
        1 => "(x|ext|#)[0-9]{0,2}",
        1 => "[a-z]{1,2}",
    ]
}

/// A whole phone-like text.
pub fn phone_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "\\+?[0-9 ()-]{0,16}",
        Just(String::new()),
        Just("+1 (415) 555-1234".to_string()),
        Just("020 7946 0958".to_string()),
    ]
}

/// Any single operation.
pub fn field_op() -> impl Strategy<Value = FieldOp> {
    prop_oneof![
        2 => Just(FieldOp::BeginEditing),
        6 => fragment().prop_map(FieldOp::Insert),
        2 => Just(FieldOp::Backspace),
        1 => phone_text().prop_map(FieldOp::Replace),
        1 => Just(FieldOp::TapClear),
        1 => Just(FieldOp::PressReturn),
        1 => Just(FieldOp::EndEditing),
        2 => phone_text().prop_map(FieldOp::SetText),
        2 => Just(FieldOp::Tick),
        1 => Just(FieldOp::Refresh),
        1 => prop::sample::select(vec!["US", "GB", "DE", "JP", "XX", ""])
            .prop_map(|code| FieldOp::SetRegion(code.to_string())),
    ]
}

/// A sequence of up to `max_len` operations.
pub fn field_ops(max_len: usize) -> impl Strategy<Value = Vec<FieldOp>> {
    prop::collection::vec(field_op(), 0..=max_len)
}
