//! Host input events and the notifications handed back to the host.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::scene::{EdgeKey, NodeId};

/// Pointer button, numbered like DOM `MouseEvent.button`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i16", into = "i16")]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
    Other(i16),
}

impl From<i16> for PointerButton {
    fn from(id: i16) -> Self {
        match id {
            0 => Self::Primary,
            1 => Self::Middle,
            2 => Self::Secondary,
            other => Self::Other(other),
        }
    }
}

impl From<PointerButton> for i16 {
    fn from(button: PointerButton) -> Self {
        match button {
            PointerButton::Primary => 0,
            PointerButton::Middle => 1,
            PointerButton::Secondary => 2,
            PointerButton::Other(id) => id,
        }
    }
}

/// Pointer down/up/move.
///
/// `client` is the position in page coordinates (used for pan deltas),
/// `offset` the position relative to the canvas element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub button: PointerButton,
    pub client: Point,
    pub offset: Point,
}

impl PointerEvent {
    pub fn new(button: PointerButton, client: Point, offset: Point) -> Self {
        Self {
            button,
            client,
            offset,
        }
    }

    /// Event whose client and canvas-relative positions coincide.
    pub fn at(button: PointerButton, x: f64, y: f64) -> Self {
        let p = Point::new(x, y);
        Self::new(button, p, p)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelEvent {
    pub delta_y: f64,
    pub offset: Point,
}

impl WheelEvent {
    pub fn new(delta_y: f64, offset: Point) -> Self {
        Self { delta_y, offset }
    }
}

/// What an input event changed, for the host to react to.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    RenderNeeded,
    SetCursor(&'static str),
    NodeMoved { node: NodeId },
    EdgeRerouted { edge: EdgeKey },
    EdgeHoverChanged { edge: EdgeKey, hovered: bool },
    RowHoverChanged { node: NodeId, row: usize, hovered: bool },
    Panned { dx: f64, dy: f64 },
    Zoomed { zoom: f64 },
}
