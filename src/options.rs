//! Renderer configuration.
//!
//! Every section deserializes with `#[serde(default)]`, so a host may pass a
//! partial object (for example only `{"canvas": {"width": 800}}`) and the
//! remaining values fall back to the defaults below. A partial `header`
//! section is completed from the row defaults, not the header defaults.

use serde::{Deserialize, Serialize};

use crate::events::PointerButton;
use crate::measure::TextMetrics;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererOptions {
    pub canvas: CanvasOptions,
    pub keybindings: Keybindings,
    pub row: RowStyle,
    pub header: RowStyle,
    pub relation: RelationStyle,
    pub placement: PlacementBounds,
    pub zoom: ZoomOptions,
    pub frame: FrameStyle,
}

impl RendererOptions {
    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasOptions {
    pub width: f64,
    pub height: f64,
    pub background: String,
}

impl Default for CanvasOptions {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 1000.0,
            background: "#fbfbfb".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Keybindings {
    /// Button that pans the viewport while held.
    pub pan: PointerButton,
    /// Button that drags entity nodes.
    pub drag: PointerButton,
}

impl Default for Keybindings {
    fn default() -> Self {
        Self {
            pan: PointerButton::Middle,
            drag: PointerButton::Primary,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Start,
    Center,
}

/// Style of a row or header widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowStyle {
    pub height: f64,
    pub min_width: f64,
    pub fill: String,
    /// Fill while the pointer is over the widget; `None` disables row hover.
    pub hover_fill: Option<String>,
    pub stroke: String,
    pub stroke_width: f64,
    pub hover_stroke_width: f64,
    pub font_size: f64,
    pub font_family: String,
    pub text_color: String,
    pub text_align: TextAlign,
    pub padding_x: f64,
}

impl Default for RowStyle {
    fn default() -> Self {
        Self {
            height: 30.0,
            min_width: 200.0,
            fill: "#f6f6f6".into(),
            hover_fill: Some("#000".into()),
            stroke: "black".into(),
            stroke_width: 0.0,
            hover_stroke_width: 1.0,
            font_size: 20.0,
            font_family: "Helvetica".into(),
            text_color: "black".into(),
            text_align: TextAlign::Start,
            padding_x: 5.0,
        }
    }
}

impl RowStyle {
    pub fn header() -> Self {
        Self {
            height: 35.0,
            fill: "#316896".into(),
            hover_fill: None,
            text_color: "white".into(),
            text_align: TextAlign::Center,
            ..Self::default()
        }
    }

    pub fn metrics(&self) -> TextMetrics {
        TextMetrics::new(self.font_size, self.min_width)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationStyle {
    pub stroke: String,
    pub stroke_width: f64,
    pub hover_stroke: String,
    pub hover_stroke_width: f64,
    /// Pixel margin around each path segment that still counts as a hit.
    pub tolerance: f64,
    /// Horizontal clearance used when both nodes overlap horizontally.
    pub overlap_offset: f64,
    pub line_join: String,
}

impl Default for RelationStyle {
    fn default() -> Self {
        Self {
            stroke: "black".into(),
            stroke_width: 2.0,
            hover_stroke: "#619bcc".into(),
            hover_stroke_width: 3.0,
            tolerance: 5.0,
            overlap_offset: 20.0,
            line_join: "round".into(),
        }
    }
}

/// Outline drawn around each entity node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameStyle {
    pub stroke: String,
    pub stroke_width: f64,
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self {
            stroke: "black".into(),
            stroke_width: 2.0,
        }
    }
}

/// Rectangle the initial node positions are drawn from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementBounds {
    pub origin: f64,
    pub min_top: f64,
    pub max_top: f64,
    pub min_left: f64,
    pub max_left: f64,
}

impl Default for PlacementBounds {
    fn default() -> Self {
        Self {
            origin: 100.0,
            min_top: 50.0,
            max_top: 1000.0,
            min_left: 0.0,
            max_left: 1000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomOptions {
    pub min: f64,
    pub max: f64,
    /// Per-unit wheel factor: `zoom *= base ^ delta_y`.
    pub base: f64,
    /// Nominal content extent used when clamping the pan offset.
    pub content_size: f64,
    /// Below `margin_threshold / content_size` the content is centered.
    pub margin_threshold: f64,
}

impl Default for ZoomOptions {
    fn default() -> Self {
        Self {
            min: 0.01,
            max: 20.0,
            base: 0.999,
            content_size: 1000.0,
            margin_threshold: 400.0,
        }
    }
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            canvas: CanvasOptions::default(),
            keybindings: Keybindings::default(),
            row: RowStyle::default(),
            header: RowStyle::header(),
            relation: RelationStyle::default(),
            placement: PlacementBounds::default(),
            zoom: ZoomOptions::default(),
            frame: FrameStyle::default(),
        }
    }
}
