#![forbid(unsafe_code)]

//! Integration tests: field behavior observed through a headless control.

use phonefield_harness::{FieldFixture, region};
use phonefield_number::ParsedNumber;
use phonefield_widgets::{
    EditState, FieldConfig, FieldFlags, FormattingMode, HandlerKind, TextControl, TextNotification,
};

// ============================================================================
// Mode rules
// ============================================================================

#[test]
fn verbatim_value_mirrors_typed_text() {
    let fx = FieldFixture::verbatim(region("US"));
    fx.type_text("(415) 555-12");
    assert_eq!(fx.value(), "(415) 555-12");
    assert_eq!(fx.display.get(), "(415) 555-12");
    fx.assert_consistent();
}

#[test]
fn canonical_value_for_us_number() {
    let fx = FieldFixture::canonical(region("US"));
    fx.type_text("(415) 555-1234");
    assert_eq!(fx.value(), "+14155551234");
    assert_eq!(
        fx.coordinator().parsed_number(),
        Some(ParsedNumber::new(1, "4155551234"))
    );
    assert_eq!(
        fx.log.last(HandlerKind::NumberChanged).and_then(|s| s.number),
        Some(ParsedNumber::new(1, "4155551234"))
    );
}

#[test]
fn canonical_value_empty_for_letters() {
    let fx = FieldFixture::canonical(region("US"));
    fx.type_text("abc");
    assert_eq!(fx.value(), "");
    assert_eq!(fx.displayed(), "abc");
    fx.assert_consistent();
}

#[test]
fn canonical_value_appears_only_when_complete() {
    let fx = FieldFixture::canonical(region("GB"));
    fx.type_text("020 7946 095");
    assert_eq!(fx.value(), "+44207946095");
    fx.control.backspace();
    fx.control.backspace();
    assert_eq!(fx.value(), "");
    fx.type_text("958");
    assert_eq!(fx.value(), "+442079460958");
}

// ============================================================================
// Notifications
// ============================================================================

#[test]
fn matching_notification_changes_nothing() {
    let fx = FieldFixture::verbatim(region("US"));
    fx.type_text("555");
    fx.log.clear();
    let version = fx.value.version();

    fx.control.notifications().emit(&TextNotification {
        sender: fx.control.control_ref(),
        text: "555".into(),
    });
    fx.settle();

    assert!(fx.log.is_empty());
    assert_eq!(fx.value.version(), version);
    assert_eq!(fx.value(), "555");
}

#[test]
fn programmatic_text_applies_after_tick() {
    for mode in [FormattingMode::Verbatim, FormattingMode::Canonical] {
        let fx = FieldFixture::builder().mode(mode).region(region("US")).build();
        fx.type_text("555");
        fx.log.clear();

        fx.control.set_text("+1555");
        assert_eq!(fx.displayed(), "555");
        assert!(fx.log.is_empty());

        assert_eq!(fx.tick(), 1);
        assert_eq!(fx.displayed(), "+1555");
        let expected = match mode {
            FormattingMode::Verbatim => "+1555",
            FormattingMode::Canonical => "",
        };
        assert_eq!(fx.value(), expected);
        assert_eq!(
            fx.log.kinds(),
            vec![HandlerKind::TextChanged, HandlerKind::NumberChanged]
        );
        fx.assert_consistent();
    }
}

#[test]
fn picker_then_typing_uses_latest_text() {
    let fx = FieldFixture::canonical(region("US"));
    fx.control.begin_editing();
    fx.control.set_text("+44 ");
    fx.control.set_text("+44 20");
    fx.type_text(" 7946 0958");
    assert_eq!(fx.value(), "+442079460958");

    // The queued deferred task finds nothing pending.
    fx.log.clear();
    fx.settle();
    assert!(fx.log.is_empty());
    assert_eq!(fx.value(), "+442079460958");
    fx.assert_consistent();
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn clear_in_both_modes() {
    for mode in [FormattingMode::Verbatim, FormattingMode::Canonical] {
        let fx = FieldFixture::builder().mode(mode).region(region("US")).build();
        fx.type_text("4155551234");
        fx.log.clear();

        assert!(fx.control.tap_clear());
        fx.settle();
        assert_eq!(fx.displayed(), "");
        assert_eq!(fx.value(), "");
        assert_eq!(
            fx.log.kinds(),
            vec![
                HandlerKind::Clear,
                HandlerKind::TextChanged,
                HandlerKind::NumberChanged,
            ]
        );
        assert_eq!(fx.log.last(HandlerKind::NumberChanged).and_then(|s| s.number), None);
        assert_eq!(fx.coordinator().state(), EditState::Idle);
        fx.assert_consistent();
    }
}

#[test]
fn same_edit_twice_fires_handlers_each_time() {
    let fx = FieldFixture::canonical(region("US"));
    fx.coordinator().on_edit_changed("4155551234");
    let first = fx.coordinator().snapshot();
    fx.coordinator().on_edit_changed("4155551234");
    assert_eq!(fx.coordinator().snapshot(), first);
    assert_eq!(fx.log.count(HandlerKind::TextChanged), 2);
    assert_eq!(fx.log.count(HandlerKind::NumberChanged), 2);
}

#[test]
fn full_session_transcript() {
    let fx = FieldFixture::canonical(region("US"));
    fx.type_text("41");
    fx.control.press_return();
    fx.control.end_editing();
    assert_eq!(
        fx.log.kinds(),
        vec![
            HandlerKind::BeginEditing,
            HandlerKind::TextChanged,
            HandlerKind::NumberChanged,
            HandlerKind::TextChanged,
            HandlerKind::NumberChanged,
            HandlerKind::Return,
            HandlerKind::EndEditing,
        ]
    );
    let json = fx.log.to_json();
    assert_eq!(json[0]["editing"], true);
    assert_eq!(json[4]["text"], "41");
    assert_eq!(json[6]["editing"], false);
}

#[test]
fn identical_sessions_have_identical_digests() {
    let run = || {
        let fx = FieldFixture::canonical(region("GB"));
        fx.type_text("+44 (0)20 7946 0958");
        fx.control.tap_clear();
        fx.control.end_editing();
        fx.log.digest()
    };
    assert_eq!(run(), run());
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn max_digits_limits_typing() {
    let fx = FieldFixture::builder()
        .mode(FormattingMode::Canonical)
        .region(region("US"))
        .config(FieldConfig::default().max_digits(10))
        .build();
    fx.type_text("415 555 1234 99");
    assert_eq!(fx.displayed(), "415 555 1234 ");
    assert_eq!(fx.value(), "+14155551234");
}

#[test]
fn clear_on_begin_editing_reconciles_empty_text() {
    let fx = FieldFixture::builder()
        .initial("555")
        .config(FieldConfig::default().flag(FieldFlags::CLEAR_ON_BEGIN_EDITING, true))
        .build();
    assert_eq!(fx.control.text(), "555");
    fx.control.begin_editing();
    assert_eq!(fx.value(), "");
    assert_eq!(
        fx.log.kinds(),
        vec![
            HandlerKind::BeginEditing,
            HandlerKind::TextChanged,
            HandlerKind::NumberChanged,
        ]
    );
}

#[test]
fn region_change_applies_to_next_edit() {
    let mut fx = FieldFixture::canonical(region("US"));
    fx.type_text("030 12345678");
    assert_eq!(fx.value(), "");

    fx.field_mut().set_default_region(region("DE"));
    assert_eq!(fx.control.config().default_region, region("DE"));
    assert_eq!(fx.value(), "");

    fx.control.backspace();
    assert_eq!(fx.value(), "+49301234567");
    fx.settle();
    fx.assert_consistent();
}

#[test]
fn unmounted_field_stops_listening() {
    let mut fx = FieldFixture::verbatim(None);
    fx.type_text("12");
    fx.field_mut().unmount();
    fx.control.insert("3");
    fx.control.set_text("999");
    fx.settle();
    assert_eq!(fx.value(), "12");
    assert_eq!(fx.control.text(), "999");
}
