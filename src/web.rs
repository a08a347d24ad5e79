//! JavaScript entry point (wasm32 only).
//!
//! ```js
//! const viewport = new KeyboardViewport();
//! viewport.bindTextarea("dictation");
//! requestAnimationFrame(function tick() {
//!   viewport.pump();
//!   requestAnimationFrame(tick);
//! });
//! ```
//!
//! DOM callbacks only queue events; nothing changes until `pump` drains them.

use crate::config::{merge_config, ConfigFile, ResolvedConfig};
use crate::integration::KeyboardLayoutSession;
use crate::model::ElementId;
use crate::publish::{StylePublisher, StyleSink};
use crate::source::BrowserViewportSource;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CssStyleDeclaration, Document, HtmlElement};

/// Inline style of `document.documentElement`.
pub struct RootStyle(CssStyleDeclaration);

impl RootStyle {
    /// `None` when the document root is not an HTML element.
    pub fn from_document(document: &Document) -> Option<Self> {
        let root = document.document_element()?.dyn_into::<HtmlElement>().ok()?;
        Some(Self(root.style()))
    }
}

impl StyleSink for RootStyle {
    fn set_property(&mut self, name: &str, value: &str) -> Result<(), String> {
        self.0.set_property(name, value).map_err(|err| format!("{err:?}"))
    }
}

/// Publisher writing custom properties onto the document root.
pub type DocumentStylePublisher = StylePublisher<RootStyle>;

/// A mounted keyboard-aware layout, driven from JavaScript.
#[wasm_bindgen]
pub struct KeyboardViewport {
    session: KeyboardLayoutSession<BrowserViewportSource, DocumentStylePublisher>,
}

#[wasm_bindgen]
impl KeyboardViewport {
    /// Mount on the current window.
    ///
    /// `config` is an optional TOML document in the same format as the
    /// config file; omitted keys keep their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>) -> Result<KeyboardViewport, JsValue> {
        let config = match config {
            Some(text) => {
                let file: ConfigFile =
                    toml::from_str(&text).map_err(|err| JsValue::from_str(&err.to_string()))?;
                merge_config(Some(file))
            }
            None => ResolvedConfig::default(),
        };
        let source =
            BrowserViewportSource::from_window().ok_or_else(|| JsValue::from_str("no browsing context"))?;
        let style = RootStyle::from_document(source.document())
            .ok_or_else(|| JsValue::from_str("document root is not an HTML element"))?;
        let session = KeyboardLayoutSession::mount(source, StylePublisher::new(style), &config);
        Ok(Self { session })
    }

    /// Bind the text element with DOM id `element_id`.
    #[wasm_bindgen(js_name = bindTextarea)]
    pub fn bind_textarea(&mut self, element_id: &str) {
        self.session.bind_textarea(ElementId::new(element_id));
    }

    /// Release the bound element, resetting any adjustment.
    #[wasm_bindgen(js_name = unbindTextarea)]
    pub fn unbind_textarea(&mut self) {
        self.session.unbind_textarea();
    }

    /// Apply every queued DOM event. Returns `true` if anything changed.
    pub fn pump(&mut self) -> bool {
        self.session.pump()
    }

    /// Whether the on-screen keyboard is up.
    #[wasm_bindgen(getter, js_name = keyboardVisible)]
    pub fn keyboard_visible(&self) -> bool {
        self.session.is_keyboard_visible()
    }

    /// Keyboard height in CSS pixels (0 when hidden).
    #[wasm_bindgen(getter, js_name = keyboardHeight)]
    pub fn keyboard_height(&self) -> f64 {
        self.session.keyboard_height()
    }

    /// Current metrics as a JSON string.
    #[wasm_bindgen(js_name = measurePerformance)]
    pub fn measure_performance(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.measure_performance())
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Remove every listener and stop the frame loop.
    pub fn destroy(&mut self) {
        self.session.teardown();
    }
}
