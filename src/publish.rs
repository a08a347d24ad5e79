//! CSS custom-property publishing.
//!
//! The document root's custom-property bag is the only resource shared across
//! mounted instances. All writes go through a single [`LayoutPublisher`] owned
//! by the session, one `publish` per host event, last writer wins.

use std::collections::BTreeMap;
use tracing::warn;

/// One percent of the visible height.
pub const MOBILE_VH: &str = "--mobile-vh";
/// On-screen keyboard height, `0px` when hidden.
pub const KEYBOARD_HEIGHT: &str = "--keyboard-height";
/// Height left above the keyboard.
pub const ADJUSTED_HEIGHT: &str = "--adjusted-height";
/// Resolved top inset.
pub const SAFE_AREA_TOP: &str = "--safe-area-top";
/// Resolved right inset.
pub const SAFE_AREA_RIGHT: &str = "--safe-area-right";
/// Resolved bottom inset.
pub const SAFE_AREA_BOTTOM: &str = "--safe-area-bottom";
/// Resolved left inset.
pub const SAFE_AREA_LEFT: &str = "--safe-area-left";
/// Scrollable content height between header and footer.
pub const CONTENT_HEIGHT: &str = "--content-height";
/// Fixed header height.
pub const HEADER_HEIGHT: &str = "--header-height";
/// Fixed footer height.
pub const FOOTER_HEIGHT: &str = "--footer-height";

/// Format a number for CSS: at most three decimals, no trailing zeros, never `-0`.
///
/// ```
/// # use keyboard_viewport::publish::css_number;
/// assert_eq!(css_number(300.0), "300");
/// assert_eq!(css_number(6.67), "6.67");
/// assert_eq!(css_number(-0.0), "0");
/// ```
pub fn css_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        rounded.to_string()
    }
}

/// Format a CSS pixel length.
pub fn css_px(value: f64) -> String {
    format!("{}px", css_number(value))
}

/// Ordered set of custom properties (`--name` → value).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CustomProperties(BTreeMap<String, String>);

impl CustomProperties {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property, replacing any previous value.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(name.to_string(), value.into());
    }

    /// Set a pixel-valued property.
    pub fn set_px(&mut self, name: &str, value: f64) {
        self.set(name, css_px(value));
    }

    /// Value of `name`, if set.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Overlay `other` on top of `self`; `other` wins on conflicts.
    pub fn extend(&mut self, other: &CustomProperties) {
        for (name, value) in &other.0 {
            self.0.insert(name.clone(), value.clone());
        }
    }

    /// Properties in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no property is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render as a `:root { ... }` style declaration block body.
    pub fn to_css(&self) -> String {
        self.iter()
            .map(|(name, value)| format!("{name}: {value};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl serde::Serialize for CustomProperties {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

/// Port for writing custom properties to the host document.
pub trait LayoutPublisher {
    /// Write every property in `properties`. Properties not mentioned are left as-is.
    fn publish(&mut self, properties: &CustomProperties);
}

/// In-memory last-writer-wins property bag.
///
/// Stands in for `document.documentElement.style` off-browser.
#[derive(Debug, Clone, Default)]
pub struct CssPropertyBag {
    current: CustomProperties,
    publishes: usize,
}

impl CssPropertyBag {
    /// Empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.current.get(name)
    }

    /// Everything written so far.
    pub fn properties(&self) -> &CustomProperties {
        &self.current
    }

    /// Number of `publish` calls received.
    pub fn publish_count(&self) -> usize {
        self.publishes
    }
}

impl LayoutPublisher for CssPropertyBag {
    fn publish(&mut self, properties: &CustomProperties) {
        self.current.extend(properties);
        self.publishes += 1;
    }
}

/// Publisher that keeps every published set, for asserting publish cadence.
#[derive(Debug, Clone, Default)]
pub struct RecordingPublisher {
    /// Every published set, oldest first.
    pub history: Vec<CustomProperties>,
}

impl RecordingPublisher {
    /// Publisher with an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent published set.
    pub fn last(&self) -> Option<&CustomProperties> {
        self.history.last()
    }
}

impl LayoutPublisher for RecordingPublisher {
    fn publish(&mut self, properties: &CustomProperties) {
        self.history.push(properties.clone());
    }
}

/// Host style declaration that takes one custom property at a time.
///
/// In the browser this is `document.documentElement.style`.
pub trait StyleSink {
    /// Set `name` to `value`.
    ///
    /// # Errors
    /// The host's message when it rejects the write.
    fn set_property(&mut self, name: &str, value: &str) -> Result<(), String>;
}

/// Publisher that writes each property straight into a [`StyleSink`].
///
/// A rejected property is logged and skipped; the rest of the set is still
/// written.
#[derive(Debug)]
pub struct StylePublisher<T: StyleSink> {
    sink: T,
    rejected: usize,
}

impl<T: StyleSink> StylePublisher<T> {
    /// Publish into `sink`.
    pub fn new(sink: T) -> Self {
        Self { sink, rejected: 0 }
    }

    /// The underlying style declaration.
    pub fn sink(&self) -> &T {
        &self.sink
    }

    /// Writes the host has refused so far.
    pub fn rejected_count(&self) -> usize {
        self.rejected
    }
}

impl<T: StyleSink> LayoutPublisher for StylePublisher<T> {
    fn publish(&mut self, properties: &CustomProperties) {
        for (name, value) in properties.iter() {
            if let Err(message) = self.sink.set_property(name, value) {
                self.rejected += 1;
                warn!(name, %message, "custom property rejected by host");
            }
        }
    }
}

impl<P: LayoutPublisher + ?Sized> LayoutPublisher for &mut P {
    fn publish(&mut self, properties: &CustomProperties) {
        (**self).publish(properties);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_number_trims_and_rounds() {
        assert_eq!(css_number(12.5), "12.5");
        assert_eq!(css_number(1.23456), "1.235");
        assert_eq!(css_number(f64::NAN), "0");
    }

    #[test]
    fn css_px_appends_unit() {
        assert_eq!(css_px(50.0), "50px");
        assert_eq!(css_px(-50.0), "-50px");
    }

    #[test]
    fn bag_is_last_writer_wins() {
        let mut bag = CssPropertyBag::new();
        let mut first = CustomProperties::new();
        first.set_px(KEYBOARD_HEIGHT, 300.0);
        first.set_px(HEADER_HEIGHT, 56.0);
        let mut second = CustomProperties::new();
        second.set_px(KEYBOARD_HEIGHT, 0.0);

        bag.publish(&first);
        bag.publish(&second);

        assert_eq!(bag.get(KEYBOARD_HEIGHT), Some("0px"));
        assert_eq!(bag.get(HEADER_HEIGHT), Some("56px"));
        assert_eq!(bag.publish_count(), 2);
    }

    #[test]
    fn to_css_is_sorted_by_name() {
        let mut props = CustomProperties::new();
        props.set_px(MOBILE_VH, 6.67);
        props.set_px(KEYBOARD_HEIGHT, 0.0);
        assert_eq!(props.to_css(), "--keyboard-height: 0px; --mobile-vh: 6.67px;");
    }

    #[test]
    fn recording_publisher_keeps_history() {
        let mut recorder = RecordingPublisher::new();
        let mut props = CustomProperties::new();
        props.set(MOBILE_VH, "1px");
        recorder.publish(&props);
        recorder.publish(&props);
        assert_eq!(recorder.history.len(), 2);
        assert_eq!(recorder.last(), Some(&props));
    }

    /// Style declaration that refuses one property name.
    #[derive(Default)]
    struct PickyStyle {
        written: Vec<(String, String)>,
        refuse: &'static str,
    }

    impl StyleSink for PickyStyle {
        fn set_property(&mut self, name: &str, value: &str) -> Result<(), String> {
            if name == self.refuse {
                return Err(format!("{name} is read-only"));
            }
            self.written.push((name.to_string(), value.to_string()));
            Ok(())
        }
    }

    #[test]
    fn style_publisher_writes_every_property_to_the_sink() {
        let mut publisher = StylePublisher::new(PickyStyle::default());
        let mut properties = CustomProperties::new();
        properties.set_px(KEYBOARD_HEIGHT, 300.0);
        properties.set_px(ADJUSTED_HEIGHT, 367.0);

        publisher.publish(&properties);

        assert_eq!(
            publisher.sink().written,
            vec![
                (ADJUSTED_HEIGHT.to_string(), "367px".to_string()),
                (KEYBOARD_HEIGHT.to_string(), "300px".to_string()),
            ]
        );
        assert_eq!(publisher.rejected_count(), 0);
    }

    #[test]
    fn style_publisher_skips_rejected_property_and_keeps_going() {
        let mut publisher = StylePublisher::new(PickyStyle {
            refuse: HEADER_HEIGHT,
            ..PickyStyle::default()
        });
        let mut properties = CustomProperties::new();
        properties.set_px(FOOTER_HEIGHT, 64.0);
        properties.set_px(HEADER_HEIGHT, 56.0);
        properties.set_px(MOBILE_VH, 6.67);

        publisher.publish(&properties);

        assert_eq!(publisher.rejected_count(), 1);
        let names: Vec<&str> = publisher.sink().written.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec![FOOTER_HEIGHT, MOBILE_VH]);
    }
}
