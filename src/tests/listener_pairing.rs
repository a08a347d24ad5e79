//! Every listener a session adds is removed exactly once, across rebinding
//! and teardown.

use crate::config::ResolvedConfig;
use crate::integration::KeyboardLayoutSession;
use crate::model::ElementId;
use crate::publish::CssPropertyBag;
use crate::source::{HostEventKind, MockViewportSource, ViewportSource};

type Session = KeyboardLayoutSession<MockViewportSource, CssPropertyBag>;

fn mount(source: MockViewportSource) -> Session {
    KeyboardLayoutSession::mount(source, CssPropertyBag::new(), &ResolvedConfig::default())
}

#[test]
fn rebinding_swaps_element_listeners() {
    let mut session = mount(MockViewportSource::iphone_se());
    let document_listeners = session.source().active_listener_count();
    assert_eq!(document_listeners, 6);

    session.bind_textarea(ElementId::new("a"));
    assert_eq!(session.source().active_listener_count(), document_listeners + 4);

    session.bind_textarea(ElementId::new("b"));
    assert_eq!(session.source().active_listener_count(), document_listeners + 4);

    // Same element again: nothing new registered.
    session.bind_textarea(ElementId::new("b"));
    assert_eq!(session.source().active_listener_count(), document_listeners + 4);

    session.unbind_textarea();
    assert_eq!(session.source().active_listener_count(), document_listeners);
}

#[test]
fn old_element_events_no_longer_arrive_after_rebind() {
    let a = ElementId::new("a");
    let b = ElementId::new("b");
    let mut session = mount(MockViewportSource::iphone_se());
    session.bind_textarea(a.clone());
    session.bind_textarea(b);

    session.source_mut().focus(&a);

    assert_eq!(session.source().queued_event_count(), 0);
    session.pump();
    assert!(!session.focus_state().is_focused);
}

#[test]
fn many_bind_cycles_leave_nothing_behind() {
    let mut session = mount(MockViewportSource::iphone_se().without_visual_viewport());
    for i in 0..20 {
        session.bind_textarea(ElementId::new(format!("field-{i}")));
        if i % 3 == 0 {
            session.unbind_textarea();
        }
    }

    session.teardown();

    assert_eq!(session.source().active_listener_count(), 0);
    assert_eq!(session.source().pending_frame_count(), 0);
    assert!(!session.source().has_listener(HostEventKind::WindowResize));
}

#[test]
fn frame_loop_holds_one_request_at_a_time() {
    let mut session = mount(MockViewportSource::iphone_se());
    for _ in 0..5 {
        session.source_mut().advance_clock(16.0);
        assert!(session.source_mut().tick_frame());
        session.pump();
        assert_eq!(session.source().pending_frame_count(), 1);
    }

    session.teardown();
    assert!(!session.source_mut().tick_frame());
}

#[test]
fn events_before_mount_are_dropped() {
    let mut source = MockViewportSource::iphone_se();
    // Events queued before mount have no listener and are dropped.
    source.set_window(375.0, 700.0);
    assert_eq!(source.queued_event_count(), 0);

    let session = mount(source);
    assert_eq!(session.viewport().viewport().height, 700.0);
    assert_eq!(session.source().geometry().inner_height, 700.0);
}
