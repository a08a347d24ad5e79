//! Viewport geometry value types.

use serde::{Deserialize, Serialize};

/// Device orientation.
///
/// Inferred from geometry (`Landscape` iff width > height) unless a caller
/// supplies it explicitly, in which case the explicit value wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Taller than wide.
    #[default]
    Portrait,
    /// Wider than tall.
    Landscape,
}

impl Orientation {
    /// Infer orientation from a width/height pair.
    ///
    /// Square viewports count as portrait.
    pub fn infer(width: f64, height: f64) -> Self {
        if width > height {
            Self::Landscape
        } else {
            Self::Portrait
        }
    }

    /// The other orientation.
    pub fn flipped(self) -> Self {
        match self {
            Self::Portrait => Self::Landscape,
            Self::Landscape => Self::Portrait,
        }
    }

    /// CSS-style name (`portrait` / `landscape`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Portrait => "portrait",
            Self::Landscape => "landscape",
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Layout viewport geometry in CSS pixels.
///
/// Immutable value: every recompute builds a new one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewportConfig {
    /// Window inner width.
    pub width: f64,
    /// Window inner height.
    pub height: f64,
    /// Portrait or landscape.
    pub orientation: Orientation,
    /// Physical pixels per CSS pixel.
    pub device_pixel_ratio: f64,
}

impl ViewportConfig {
    /// Build a config with orientation inferred from the dimensions.
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            orientation: Orientation::infer(width, height),
            device_pixel_ratio,
        }
    }

    /// Merge a partial update into this config.
    ///
    /// An explicit `orientation` in the patch overrides inference. Otherwise the
    /// orientation is re-inferred from whichever width/height is available
    /// (the patched value if set, else the current one).
    pub fn merged(&self, patch: &ViewportPatch) -> Self {
        let width = patch.width.unwrap_or(self.width);
        let height = patch.height.unwrap_or(self.height);
        let orientation = patch
            .orientation
            .unwrap_or_else(|| Orientation::infer(width, height));

        Self {
            width,
            height,
            orientation,
            device_pixel_ratio: patch.device_pixel_ratio.unwrap_or(self.device_pixel_ratio),
        }
    }
}

/// Partial update for [`ViewportConfig`]. Unset fields keep their current value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct ViewportPatch {
    /// New width, if any.
    #[serde(default)]
    pub width: Option<f64>,
    /// New height, if any.
    #[serde(default)]
    pub height: Option<f64>,
    /// Explicit orientation, overriding inference.
    #[serde(default)]
    pub orientation: Option<Orientation>,
    /// New device pixel ratio, if any.
    #[serde(default)]
    pub device_pixel_ratio: Option<f64>,
}

impl ViewportPatch {
    /// Patch only the dimensions.
    pub fn size(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    /// Patch only the orientation.
    pub fn orientation(orientation: Orientation) -> Self {
        Self {
            orientation: Some(orientation),
            ..Self::default()
        }
    }
}

/// Snapshot of the host's visual viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VisualViewportHandle {
    /// Visible width in CSS px.
    pub width: f64,
    /// Visible height in CSS px.
    pub height: f64,
    /// Offset from the layout viewport's left edge.
    pub offset_left: f64,
    /// Offset from the layout viewport's top edge.
    pub offset_top: f64,
    /// Offset from the document's left edge.
    pub page_left: f64,
    /// Offset from the document's top edge.
    pub page_top: f64,
    /// Pinch-zoom scale.
    pub scale: f64,
}

impl VisualViewportHandle {
    /// Unscrolled, unzoomed visual viewport of the given size.
    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            offset_left: 0.0,
            offset_top: 0.0,
            page_left: 0.0,
            page_top: 0.0,
            scale: 1.0,
        }
    }
}

/// Raw geometry read from the host in one event callback.
///
/// Input to the geometry reducer; carries no derived state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometrySample {
    /// `window.innerWidth`.
    pub inner_width: f64,
    /// `window.innerHeight`.
    pub inner_height: f64,
    /// `window.devicePixelRatio`.
    pub device_pixel_ratio: f64,
    /// `None` when the Visual Viewport API is unavailable.
    pub visual: Option<VisualViewportHandle>,
}

/// Device-reserved padding in CSS pixels. All edges are non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SafeAreaInsets {
    /// Top edge.
    pub top: f64,
    /// Right edge.
    pub right: f64,
    /// Bottom edge.
    pub bottom: f64,
    /// Left edge.
    pub left: f64,
}

impl SafeAreaInsets {
    /// All-zero insets.
    pub const ZERO: Self = Self {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    /// Build insets, clamping negative (or NaN) edges to zero.
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top: non_negative(top),
            right: non_negative(right),
            bottom: non_negative(bottom),
            left: non_negative(left),
        }
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_nan() || value < 0.0 {
        0.0
    } else {
        value
    }
}
