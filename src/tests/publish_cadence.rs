//! Publish cadence: at most one complete property set per host event.

use crate::config::ResolvedConfig;
use crate::integration::KeyboardLayoutSession;
use crate::model::ElementId;
use crate::publish::{self, RecordingPublisher};
use crate::source::MockViewportSource;

const ALL_PROPERTIES: [&str; 10] = [
    publish::MOBILE_VH,
    publish::KEYBOARD_HEIGHT,
    publish::ADJUSTED_HEIGHT,
    publish::SAFE_AREA_TOP,
    publish::SAFE_AREA_RIGHT,
    publish::SAFE_AREA_BOTTOM,
    publish::SAFE_AREA_LEFT,
    publish::CONTENT_HEIGHT,
    publish::HEADER_HEIGHT,
    publish::FOOTER_HEIGHT,
];

fn focused_session() -> KeyboardLayoutSession<MockViewportSource, RecordingPublisher> {
    let mut session = KeyboardLayoutSession::mount(
        MockViewportSource::iphone_se(),
        RecordingPublisher::new(),
        &ResolvedConfig::default(),
    );
    let field = ElementId::new("field");
    session.bind_textarea(field.clone());
    session.source_mut().focus(&field);
    session.pump();
    session
}

#[test]
fn every_publish_carries_the_full_set() {
    let mut session = focused_session();
    session.source_mut().simulate_keyboard(true, 300.0);
    session.pump();
    session.source_mut().rotate();
    session.pump();
    session.source_mut().simulate_keyboard(false, 0.0);
    session.pump();

    let history = &session.publisher().history;
    assert!(history.len() >= 3);
    for (i, properties) in history.iter().enumerate() {
        for name in ALL_PROPERTIES {
            assert!(properties.get(name).is_some(), "publish {i} missing {name}");
        }
    }
}

#[test]
fn consecutive_publishes_always_differ() {
    let mut session = focused_session();
    for height in [300.0, 300.0, 310.0, 0.0, 0.0, 260.0] {
        session.source_mut().simulate_keyboard(height > 0.0, height);
        session.pump();
    }

    let history = &session.publisher().history;
    for pair in history.windows(2) {
        assert_ne!(pair[0], pair[1]);
    }
}

#[test]
fn keyboard_show_publishes_height_and_lift_together() {
    let mut session = focused_session();
    let before = session.publisher().history.len();

    session.source_mut().simulate_keyboard(true, 300.0);
    session.pump();

    let history = &session.publisher().history;
    assert_eq!(history.len(), before + 1);
    let last = history.last().map(|p| (p.get(publish::KEYBOARD_HEIGHT), p.get(publish::ADJUSTED_HEIGHT)));
    assert_eq!(last, Some((Some("300px"), Some("367px"))));
    assert_eq!(session.layout().style.lift, 50.0);
}

#[test]
fn typing_and_frames_do_not_publish() {
    let field = ElementId::new("field");
    let mut session = focused_session();
    let before = session.publisher().history.len();

    session.source_mut().type_input(&field);
    session.source_mut().advance_clock(16.0);
    session.source_mut().tick_frame();
    session.pump();

    assert_eq!(session.publisher().history.len(), before);
}
