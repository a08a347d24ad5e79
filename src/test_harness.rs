//! Acceptance test harness
//!
//! Wraps a [`KeyboardLayoutSession`] mounted on the mock host with a property
//! bag publisher, and exposes user-level actions (tap a field, open the
//! keyboard, rotate the phone) that pump host events after every step.

use crate::config::ResolvedConfig;
use crate::focus::FocusPhase;
use crate::integration::KeyboardLayoutSession;
use crate::model::{ElementId, Orientation, ViewportPatch, ViewportState};
use crate::publish::CssPropertyBag;
use crate::source::MockViewportSource;
use std::sync::Arc;

/// The dictation field used by most scenarios.
pub const DICTATION_FIELD: &str = "dictation";

pub struct AcceptanceTestHarness {
    session: KeyboardLayoutSession<MockViewportSource, CssPropertyBag>,
}

impl AcceptanceTestHarness {
    /// iPhone SE (375×667) with a visual viewport and default config.
    pub fn iphone_se() -> Self {
        Self::with_source(MockViewportSource::iphone_se(), &ResolvedConfig::default())
    }

    pub fn with_source(source: MockViewportSource, config: &ResolvedConfig) -> Self {
        Self {
            session: KeyboardLayoutSession::mount(source, CssPropertyBag::new(), config),
        }
    }

    /// Bind the dictation field without focusing it.
    pub fn bind_dictation_field(&mut self) -> &mut Self {
        self.session.bind_textarea(ElementId::new(DICTATION_FIELD));
        self
    }

    /// Bind and focus the dictation field.
    pub fn tap_dictation_field(&mut self) -> &mut Self {
        self.bind_dictation_field();
        self.session.source_mut().focus(&ElementId::new(DICTATION_FIELD));
        self.session.pump();
        self
    }

    pub fn tap_elsewhere(&mut self) -> &mut Self {
        self.session.source_mut().blur();
        self.session.pump();
        self
    }

    pub fn show_keyboard(&mut self, height: f64) -> &mut Self {
        self.session.source_mut().simulate_keyboard(true, height);
        self.session.pump();
        self
    }

    pub fn hide_keyboard(&mut self) -> &mut Self {
        self.session.source_mut().simulate_keyboard(false, 0.0);
        self.session.pump();
        self
    }

    pub fn rotate(&mut self) -> &mut Self {
        self.session.source_mut().rotate();
        self.session.pump();
        self
    }

    pub fn select(&mut self, start: u32, end: u32) -> &mut Self {
        self.session
            .source_mut()
            .select(&ElementId::new(DICTATION_FIELD), start, end);
        self.session.pump();
        self
    }

    pub fn update_viewport(&mut self, patch: ViewportPatch) -> bool {
        self.session.update_viewport(patch)
    }

    pub fn reset_viewport(&mut self) -> bool {
        self.session.reset_viewport()
    }

    // ===== Inspection =====

    pub fn viewport(&self) -> Arc<ViewportState> {
        self.session.viewport()
    }

    pub fn orientation(&self) -> Orientation {
        self.session.viewport().orientation()
    }

    pub fn focus_phase(&self) -> FocusPhase {
        self.session.focus().phase()
    }

    pub fn session(&self) -> &KeyboardLayoutSession<MockViewportSource, CssPropertyBag> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut KeyboardLayoutSession<MockViewportSource, CssPropertyBag> {
        &mut self.session
    }

    /// Current value of a published custom property on the document root.
    pub fn css_var(&self, name: &str) -> Option<&str> {
        self.session.publisher().get(name)
    }

    pub fn publish_count(&self) -> usize {
        self.session.publisher().publish_count()
    }
}
