//! Row and header widgets: a labelled rectangle inside an entity node.
//!
//! Headers and rows share one value type; what differs is the style they are
//! built with, so both come out of [`row_widget`] / [`header_widget`].

use crate::capability::{HitTestable, Positionable, Renderable};
use crate::geometry::{Point, Rect};
use crate::options::{RowStyle, TextAlign};
use crate::scene::NodeId;
use crate::surface::{DrawTarget, Font, Paint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    Header,
    Row,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowWidget {
    pub kind: WidgetKind,
    label: String,
    style: RowStyle,
    /// Owning node; not an ownership edge, only used for lookups.
    node: Option<NodeId>,
    /// Absolute box in world coordinates.
    rect: Rect,
    /// Horizontal text offset from the widget center.
    text_x: f64,
    hovered: bool,
}

/// Build a row widget for `label` styled by `style`.
pub fn row_widget(label: impl Into<String>, style: &RowStyle) -> RowWidget {
    RowWidget::new(WidgetKind::Row, label.into(), style.clone())
}

/// Build a header widget for `label` styled by `style`.
pub fn header_widget(label: impl Into<String>, style: &RowStyle) -> RowWidget {
    RowWidget::new(WidgetKind::Header, label.into(), style.clone())
}

impl RowWidget {
    fn new(kind: WidgetKind, label: String, style: RowStyle) -> Self {
        let width = style.metrics().natural_width(&label);
        let mut widget = Self {
            kind,
            label,
            rect: Rect::new(0.0, 0.0, width, style.height),
            style,
            node: None,
            text_x: 0.0,
            hovered: false,
        };
        widget.recalculate_text_alignment();
        widget
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn style(&self) -> &RowStyle {
        &self.style
    }

    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    pub(crate) fn attach(&mut self, node: NodeId) {
        self.node = Some(node);
    }

    pub fn width(&self) -> f64 {
        self.rect.width
    }

    pub fn height(&self) -> f64 {
        self.rect.height
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Width this widget needs on its own, independent of its node.
    pub fn natural_width(&self) -> f64 {
        self.style.metrics().natural_width(&self.label)
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
        self.recalculate_text_alignment();
    }

    pub fn set_width(&mut self, width: f64) {
        self.rect.width = width;
        self.recalculate_text_alignment();
    }

    pub fn set_height(&mut self, height: f64) {
        self.rect.height = height;
    }

    pub(crate) fn set_origin(&mut self, left: f64, top: f64) {
        self.rect.left = left;
        self.rect.top = top;
    }

    /// Text x offset relative to the widget center.
    pub fn text_offset(&self) -> f64 {
        self.text_x
    }

    fn recalculate_text_alignment(&mut self) {
        self.text_x = match self.style.text_align {
            TextAlign::Center => -self.style.metrics().text_width(&self.label) / 2.0,
            TextAlign::Start => -self.rect.width / 2.0 + self.style.padding_x,
        };
    }

    /// Fill currently in effect.
    pub fn fill(&self) -> &str {
        match (&self.style.hover_fill, self.hovered) {
            (Some(fill), true) => fill,
            _ => &self.style.fill,
        }
    }

    fn stroke_width(&self) -> f64 {
        if self.hovered && self.style.hover_fill.is_some() {
            self.style.hover_stroke_width
        } else {
            self.style.stroke_width
        }
    }

    /// Update the hover flag; returns true only when the visible fill changed.
    pub fn set_hovered(&mut self, hovered: bool) -> bool {
        if self.style.hover_fill.is_none() || self.hovered == hovered {
            return false;
        }
        let before = self.fill().to_string();
        self.hovered = hovered;
        before != self.fill()
    }
}

impl Positionable for RowWidget {
    fn position(&self) -> Point {
        Point::new(self.rect.left, self.rect.top)
    }

    fn size(&self) -> (f64, f64) {
        (self.rect.width, self.rect.height)
    }
}

impl HitTestable for RowWidget {
    fn hit_test(&self, p: Point) -> bool {
        self.rect.contains(p)
    }
}

impl Renderable for RowWidget {
    fn draw(&self, target: &mut dyn DrawTarget) {
        target.rect(
            self.rect,
            &Paint {
                fill: self.fill().to_string(),
                stroke: self.style.stroke.clone(),
                stroke_width: self.stroke_width(),
            },
        );

        let center = self.rect.center();
        target.text(
            Point::new(center.x + self.text_x, center.y),
            &self.label,
            &Font {
                family: self.style.font_family.clone(),
                size: self.style.font_size,
                color: self.style.text_color.clone(),
            },
        );
    }
}
