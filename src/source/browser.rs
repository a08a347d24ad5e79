//! `web-sys` host adapter.
//!
//! DOM callbacks push into a shared queue; the session drains it through
//! [`ViewportSource::next_event`]. Elements are addressed by their DOM `id`.
//!
//! Safe-area `env()` values cannot be read from script directly. The adapter
//! reads the computed custom properties `--safe-area-env-top/right/bottom/left`
//! on the document root, which a stylesheet is expected to set to the matching
//! `env(safe-area-inset-*)` expressions. Missing or unparsable values read as 0.

use super::{FrameHandle, HostEvent, HostEventKind, ListenerId, ViewportSource};
use crate::model::{CaretSnapshot, ElementId, GeometrySample, SafeAreaInsets, VisualViewportHandle};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, EventTarget, HtmlTextAreaElement, ResizeObserver, Window};

type EventQueue = Rc<RefCell<VecDeque<HostEvent>>>;

enum Attachment {
    Dom {
        target: EventTarget,
        name: &'static str,
        callback: Closure<dyn FnMut(web_sys::Event)>,
    },
    Observer {
        observer: ResizeObserver,
        _callback: Closure<dyn FnMut(js_sys::Array)>,
    },
}

/// Browser adapter over `window`, `document`, and `visualViewport`.
pub struct BrowserViewportSource {
    window: Window,
    document: Document,
    queue: EventQueue,
    listeners: HashMap<ListenerId, Attachment>,
    frames: HashMap<FrameHandle, (i32, Closure<dyn FnMut(f64)>)>,
    next_id: u64,
}

impl BrowserViewportSource {
    /// Attach to the global `window`. `None` outside a browsing context.
    pub fn from_window() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self {
            window,
            document,
            queue: Rc::new(RefCell::new(VecDeque::new())),
            listeners: HashMap::new(),
            frames: HashMap::new(),
            next_id: 1,
        })
    }

    /// The document the adapter listens on.
    pub fn document(&self) -> &Document {
        &self.document
    }

    fn element(&self, id: &ElementId) -> Option<Element> {
        self.document.get_element_by_id(id.as_str())
    }

    fn allocate(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn target_for(&self, kind: HostEventKind, element: Option<&ElementId>) -> Option<EventTarget> {
        match kind {
            HostEventKind::WindowResize | HostEventKind::OrientationChange => {
                Some(self.window.clone().into())
            }
            HostEventKind::VisualViewportResize | HostEventKind::VisualViewportScroll => {
                self.window.visual_viewport().map(Into::into)
            }
            HostEventKind::SelectionChange => Some(self.document.clone().into()),
            HostEventKind::RootResize => None,
            HostEventKind::Focus
            | HostEventKind::Blur
            | HostEventKind::ElementScroll
            | HostEventKind::Input => element.and_then(|id| self.element(id)).map(Into::into),
        }
    }

    fn observe_root(&self) -> Option<Attachment> {
        let root = self.document.document_element()?;
        let queue = Rc::clone(&self.queue);
        let callback = Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
            if entries.length() > 0 {
                queue.borrow_mut().push_back(HostEvent::RootResize);
            }
        });
        let observer = match ResizeObserver::new(callback.as_ref().unchecked_ref()) {
            Ok(observer) => observer,
            Err(err) => {
                warn!(?err, "ResizeObserver unavailable");
                return None;
            }
        };
        observer.observe(&root);
        Some(Attachment::Observer {
            observer,
            _callback: callback,
        })
    }

    fn env_inset(&self, style: &web_sys::CssStyleDeclaration, side: &str) -> f64 {
        style
            .get_property_value(&format!("--safe-area-env-{side}"))
            .ok()
            .and_then(|raw| raw.trim().trim_end_matches("px").parse::<f64>().ok())
            .unwrap_or(0.0)
    }
}

fn event_for(kind: HostEventKind, element: Option<&ElementId>) -> Option<HostEvent> {
    Some(match kind {
        HostEventKind::WindowResize => HostEvent::WindowResize,
        HostEventKind::OrientationChange => HostEvent::OrientationChange,
        HostEventKind::VisualViewportResize => HostEvent::VisualViewportResize,
        HostEventKind::VisualViewportScroll => HostEvent::VisualViewportScroll,
        HostEventKind::RootResize => HostEvent::RootResize,
        HostEventKind::SelectionChange => HostEvent::SelectionChange,
        HostEventKind::Focus => HostEvent::Focus(element?.clone()),
        HostEventKind::Blur => HostEvent::Blur(element?.clone()),
        HostEventKind::ElementScroll => HostEvent::Scroll(element?.clone()),
        HostEventKind::Input => HostEvent::Input(element?.clone()),
    })
}

impl ViewportSource for BrowserViewportSource {
    fn geometry(&self) -> GeometrySample {
        let read = |value: Result<JsValue, JsValue>| value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let visual = self.window.visual_viewport().map(|vv| VisualViewportHandle {
            width: vv.width(),
            height: vv.height(),
            offset_left: vv.offset_left(),
            offset_top: vv.offset_top(),
            page_left: vv.page_left(),
            page_top: vv.page_top(),
            scale: vv.scale(),
        });
        GeometrySample {
            inner_width: read(self.window.inner_width()),
            inner_height: read(self.window.inner_height()),
            device_pixel_ratio: self.window.device_pixel_ratio(),
            visual,
        }
    }

    fn safe_area_env(&self) -> SafeAreaInsets {
        let style = self
            .document
            .document_element()
            .and_then(|root| self.window.get_computed_style(&root).ok().flatten());
        match style {
            Some(style) => SafeAreaInsets::new(
                self.env_inset(&style, "top"),
                self.env_inset(&style, "right"),
                self.env_inset(&style, "bottom"),
                self.env_inset(&style, "left"),
            ),
            None => SafeAreaInsets::ZERO,
        }
    }

    fn active_element(&self) -> Option<ElementId> {
        let id = self.document.active_element()?.id();
        (!id.is_empty()).then(|| ElementId::new(id))
    }

    fn caret(&self, element: &ElementId) -> Option<CaretSnapshot> {
        let node = self.element(element)?;
        let scroll_top = node.scroll_top().max(0) as u32;
        let textarea = node.dyn_into::<HtmlTextAreaElement>().ok()?;
        Some(CaretSnapshot {
            selection_start: textarea.selection_start().ok().flatten().unwrap_or(0),
            selection_end: textarea.selection_end().ok().flatten().unwrap_or(0),
            scroll_top,
        })
    }

    fn add_listener(&mut self, kind: HostEventKind, element: Option<&ElementId>) -> ListenerId {
        let id = ListenerId::new(self.allocate());

        if kind == HostEventKind::RootResize {
            if let Some(attachment) = self.observe_root() {
                self.listeners.insert(id, attachment);
            }
            return id;
        }

        let (Some(target), Some(event)) = (self.target_for(kind, element), event_for(kind, element))
        else {
            warn!(?kind, element = ?element.map(ElementId::as_str), "no event target, listener not attached");
            return id;
        };

        let queue = Rc::clone(&self.queue);
        let callback = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
            queue.borrow_mut().push_back(event.clone());
        });
        let name = kind.dom_name();
        if let Err(err) = target.add_event_listener_with_callback(name, callback.as_ref().unchecked_ref()) {
            warn!(?err, name, "addEventListener failed");
            return id;
        }
        self.listeners.insert(
            id,
            Attachment::Dom {
                target,
                name,
                callback,
            },
        );
        id
    }

    fn remove_listener(&mut self, id: ListenerId) {
        match self.listeners.remove(&id) {
            Some(Attachment::Dom {
                target,
                name,
                callback,
            }) => {
                let _ = target.remove_event_listener_with_callback(name, callback.as_ref().unchecked_ref());
            }
            Some(Attachment::Observer { observer, .. }) => observer.disconnect(),
            None => {}
        }
    }

    fn request_animation_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle::new(self.allocate());
        let queue = Rc::clone(&self.queue);
        let callback = Closure::<dyn FnMut(f64)>::new(move |timestamp: f64| {
            queue.borrow_mut().push_back(HostEvent::AnimationFrame { timestamp });
        });
        match self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            Ok(raw) => {
                self.frames.insert(handle, (raw, callback));
            }
            Err(err) => warn!(?err, "requestAnimationFrame failed"),
        }
        handle
    }

    fn cancel_animation_frame(&mut self, handle: FrameHandle) {
        if let Some((raw, _callback)) = self.frames.remove(&handle) {
            let _ = self.window.cancel_animation_frame(raw);
        }
    }

    fn now(&self) -> Option<f64> {
        self.window.performance().map(|performance| performance.now())
    }

    fn next_event(&mut self) -> Option<HostEvent> {
        let event = self.queue.borrow_mut().pop_front();
        if matches!(event, Some(HostEvent::AnimationFrame { .. })) {
            // At most one frame is outstanding; once it fired its closure is spent.
            self.frames.clear();
        }
        event
    }
}

impl Drop for BrowserViewportSource {
    fn drop(&mut self) {
        let ids: Vec<ListenerId> = self.listeners.keys().copied().collect();
        for id in ids {
            self.remove_listener(id);
        }
        let handles: Vec<FrameHandle> = self.frames.keys().copied().collect();
        for handle in handles {
            self.cancel_animation_frame(handle);
        }
    }
}
