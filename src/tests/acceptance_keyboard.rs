//! Acceptance tests: dictating with the on-screen keyboard.
//!
//! Each scenario starts from an iPhone SE (375×667) and follows a clinician
//! tapping into the dictation field.

use crate::focus::FocusPhase;
use crate::publish;
use crate::test_harness::AcceptanceTestHarness;

// ===== Scenario: keyboard detection =====

#[test]
fn keyboard_300px_on_667px_viewport() {
    // GIVEN: iPhone SE, nothing focused
    let mut harness = AcceptanceTestHarness::iphone_se();

    // WHEN: A 300px keyboard opens
    let visible = harness.session_mut().source_mut().simulate_keyboard(true, 300.0);
    harness.session_mut().pump();

    // THEN: Visible height 367, reduction 300 over the noise threshold
    assert_eq!(visible, 367.0);
    let viewport = harness.viewport();
    assert_eq!(viewport.keyboard_height(), 300.0);
    assert!(viewport.is_keyboard_visible());
    assert!(viewport.is_reduced_viewport());
}

#[test]
fn address_bar_jitter_is_not_a_keyboard() {
    let mut harness = AcceptanceTestHarness::iphone_se();
    harness.tap_dictation_field();

    // 50px is the threshold itself: still treated as chrome jitter.
    harness.show_keyboard(50.0);

    assert!(!harness.viewport().is_keyboard_visible());
    assert_eq!(harness.focus_phase(), FocusPhase::Focused);
    assert_eq!(harness.css_var(publish::KEYBOARD_HEIGHT), Some("0px"));
}

// ===== Scenario: focused dictation =====

#[test]
fn focused_field_lifts_container_when_keyboard_opens() {
    // GIVEN: The dictation field has focus
    let mut harness = AcceptanceTestHarness::iphone_se();
    harness.tap_dictation_field();
    assert_eq!(harness.focus_phase(), FocusPhase::Focused);

    // WHEN: The keyboard opens
    harness.show_keyboard(300.0);

    // THEN: Coordinator tracks the keyboard and the container lifts 50px
    assert_eq!(harness.focus_phase(), FocusPhase::FocusedKeyboardVisible);
    let layout = harness.session().layout();
    assert_eq!(layout.style.transform(), "translateY(-50px)");
    assert_eq!(layout.style.height, 367.0);
    assert_eq!(
        layout.style.transition,
        "height 0.3s ease-out, transform 0.3s ease-out"
    );
    assert_eq!(harness.css_var(publish::ADJUSTED_HEIGHT), Some("367px"));
    assert_eq!(harness.css_var(publish::MOBILE_VH), Some("3.67px"));
}

#[test]
fn adjusted_plus_keyboard_equals_original() {
    let mut harness = AcceptanceTestHarness::iphone_se();
    harness.tap_dictation_field();

    for height in [120.0, 260.0, 301.5, 336.0] {
        harness.show_keyboard(height);
        let state = harness.session().focus_state();
        assert!(state.keyboard_visible);
        assert_eq!(
            state.adjusted_viewport_height + harness.viewport().keyboard_height(),
            state.original_viewport_height,
            "keyboard {height}"
        );
    }
}

#[test]
fn closing_keyboard_restores_full_height() {
    // GIVEN: Dictating with the keyboard open
    let mut harness = AcceptanceTestHarness::iphone_se();
    harness.tap_dictation_field().show_keyboard(300.0);

    // WHEN: The keyboard closes
    harness.hide_keyboard();

    // THEN: Heights match again and --keyboard-height is zeroed
    let state = harness.session().focus_state();
    assert_eq!(state.adjusted_viewport_height, state.original_viewport_height);
    assert_eq!(harness.css_var(publish::KEYBOARD_HEIGHT), Some("0px"));
    assert_eq!(harness.session().layout().style.transform(), "translateY(0px)");
    assert_eq!(harness.focus_phase(), FocusPhase::Focused);
}

#[test]
fn tapping_away_with_keyboard_open_resets() {
    let mut harness = AcceptanceTestHarness::iphone_se();
    harness.tap_dictation_field().show_keyboard(300.0);

    harness.tap_elsewhere();

    assert_eq!(harness.focus_phase(), FocusPhase::Idle);
    assert_eq!(harness.session().layout().style.transform(), "translateY(0px)");
    // Keyboard is still reported by the viewport until the host hides it.
    assert!(harness.viewport().is_keyboard_visible());
    assert_eq!(harness.css_var(publish::KEYBOARD_HEIGHT), Some("300px"));
}

#[test]
fn caret_survives_keyboard_round_trip() {
    let mut harness = AcceptanceTestHarness::iphone_se();
    harness.tap_dictation_field().select(12, 30);

    harness.show_keyboard(300.0).hide_keyboard();

    let state = harness.session().focus_state();
    assert_eq!((state.selection_start, state.selection_end), (12, 30));
}

#[test]
fn container_content_shrinks_with_keyboard() {
    let mut harness = AcceptanceTestHarness::iphone_se();
    harness.tap_dictation_field();
    let before = harness.session().container().content_height;

    harness.show_keyboard(300.0);

    let container = harness.session().container();
    assert!(container.content_height < before);
    assert_eq!(
        container.available_height,
        container.content_height + container.header_height + container.footer_height
    );
    assert_eq!(harness.css_var(publish::CONTENT_HEIGHT), Some("247px"));
}
