//! Container custom properties.

use crate::model::LayoutContainerState;
use crate::publish::{self, CustomProperties};

/// Custom properties describing the container chrome.
pub fn container_properties(container: &LayoutContainerState) -> CustomProperties {
    let mut properties = CustomProperties::new();
    properties.set_px(publish::CONTENT_HEIGHT, container.content_height);
    properties.set_px(publish::HEADER_HEIGHT, container.header_height);
    properties.set_px(publish::FOOTER_HEIGHT, container.footer_height);
    properties
}
