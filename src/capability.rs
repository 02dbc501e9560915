//! Capabilities shared by everything placed on the canvas.

use crate::geometry::{Point, Rect};
use crate::surface::DrawTarget;

pub trait Positionable {
    /// Top-left corner in world coordinates.
    fn position(&self) -> Point;

    fn size(&self) -> (f64, f64);

    fn bounds(&self) -> Rect {
        let p = self.position();
        let (w, h) = self.size();
        Rect::new(p.x, p.y, w, h)
    }
}

pub trait Renderable {
    fn draw(&self, target: &mut dyn DrawTarget);
}

pub trait HitTestable {
    fn hit_test(&self, p: Point) -> bool;
}
