#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use phonefield_harness::{FieldFixture, FieldOp, region};
use phonefield_widgets::FormattingMode;

#[derive(Debug, Arbitrary)]
enum Op {
    BeginEditing,
    Insert(String),
    Backspace,
    Replace(String),
    TapClear,
    PressReturn,
    EndEditing,
    SetText(String),
    Tick,
    Refresh,
    SetRegion([u8; 2]),
}

impl From<Op> for FieldOp {
    fn from(op: Op) -> Self {
        match op {
            Op::BeginEditing => Self::BeginEditing,
            Op::Insert(s) => Self::Insert(s),
            Op::Backspace => Self::Backspace,
            Op::Replace(s) => Self::Replace(s),
            Op::TapClear => Self::TapClear,
            Op::PressReturn => Self::PressReturn,
            Op::EndEditing => Self::EndEditing,
            Op::SetText(s) => Self::SetText(s),
            Op::Tick => Self::Tick,
            Op::Refresh => Self::Refresh,
            Op::SetRegion(b) => Self::SetRegion(String::from_utf8_lossy(&b).into_owned()),
        }
    }
}

#[derive(Debug, Arbitrary)]
struct Input {
    canonical: bool,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    if input.ops.len() > 256 {
        return;
    }
    let mode = if input.canonical {
        FormattingMode::Canonical
    } else {
        FormattingMode::Verbatim
    };
    let mut fx = FieldFixture::builder()
        .mode(mode)
        .region(region("US"))
        .build();
    for op in input.ops {
        fx.apply(&op.into());
    }
    fx.settle();
    fx.assert_consistent();
});
