//! Relation edges: routed lines between two entity nodes.

use std::fmt;

use crate::capability::{HitTestable, Positionable, Renderable};
use crate::entity::Interactivity;
use crate::geometry::{Point, Rect};
use crate::layout::routing::route;
use crate::options::RelationStyle;
use crate::scene::NodeId;
use crate::schema::Cardinality;
use crate::surface::{DrawTarget, Stroke};

/// Canonical relation key: `table0_row0_table1_row1`, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelationId(String);

impl RelationId {
    pub fn from_endpoints(a: &RelationEndpoint, b: &RelationEndpoint) -> Self {
        Self(format!(
            "{}_{}_{}_{}",
            a.table_name,
            a.first_label(),
            b.table_name,
            b.first_label()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One side of a relation, resolved to a node and at least one of its rows.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationEndpoint {
    pub node: NodeId,
    pub table_name: String,
    /// Row indices inside the node.
    pub rows: Vec<usize>,
    pub row_labels: Vec<String>,
    pub relation: Cardinality,
}

impl RelationEndpoint {
    fn first_label(&self) -> &str {
        self.row_labels.first().map(String::as_str).unwrap_or("")
    }
}

/// Hover state transition reported by [`RelationEdge::update_hover`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverChange {
    Unchanged,
    Entered,
    Left,
}

#[derive(Debug, Clone)]
pub struct RelationEdge {
    id: RelationId,
    pub label: Option<String>,
    endpoints: [RelationEndpoint; 2],
    path: [Point; 4],
    style: RelationStyle,
    hovered: bool,
    pub interactivity: Interactivity,
}

impl RelationEdge {
    pub fn new(endpoints: [RelationEndpoint; 2], style: RelationStyle) -> Self {
        let id = RelationId::from_endpoints(&endpoints[0], &endpoints[1]);
        Self {
            id,
            label: None,
            endpoints,
            path: [Point::default(); 4],
            style,
            hovered: false,
            interactivity: Interactivity::ENABLED,
        }
    }

    pub fn id(&self) -> &RelationId {
        &self.id
    }

    pub fn endpoints(&self) -> &[RelationEndpoint; 2] {
        &self.endpoints
    }

    pub fn touches(&self, node: NodeId) -> bool {
        self.endpoints.iter().any(|e| e.node == node)
    }

    pub fn path(&self) -> &[Point; 4] {
        &self.path
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Re-route from the endpoint nodes' current boxes.
    pub fn recalculate(&mut self, from: &Rect, to: &Rect) {
        let (path, case) = route(from, to, self.style.overlap_offset);
        tracing::trace!(edge = %self.id, ?case, "routed");
        self.path = path;
    }

    /// Consecutive point pairs of the path.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.path.windows(2).map(|w| (w[0], w[1]))
    }

    /// Stroke currently in effect.
    pub fn stroke(&self) -> Stroke {
        let (color, width) = if self.hovered {
            (&self.style.hover_stroke, self.style.hover_stroke_width)
        } else {
            (&self.style.stroke, self.style.stroke_width)
        };
        Stroke {
            color: color.clone(),
            width,
            line_join: self.style.line_join.clone(),
        }
    }

    /// Apply or drop the hover style for pointer `p`. Only transitions are
    /// reported; the path is never touched.
    pub fn update_hover(&mut self, p: Point) -> HoverChange {
        let hovering = self.hit_test(p);
        if hovering == self.hovered {
            return HoverChange::Unchanged;
        }
        self.hovered = hovering;
        if hovering {
            HoverChange::Entered
        } else {
            HoverChange::Left
        }
    }

    pub(crate) fn clear_hover(&mut self) -> bool {
        std::mem::replace(&mut self.hovered, false)
    }
}

impl Positionable for RelationEdge {
    fn position(&self) -> Point {
        let b = self.bounds();
        Point::new(b.left, b.top)
    }

    fn size(&self) -> (f64, f64) {
        let b = self.bounds();
        (b.width, b.height)
    }

    fn bounds(&self) -> Rect {
        let min_x = self.path.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let min_y = self.path.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_x = self.path.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let max_y = self.path.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        Rect::from_corners(Point::new(min_x, min_y), Point::new(max_x, max_y))
    }
}

impl HitTestable for RelationEdge {
    /// The pointer hits when it falls inside any segment's box grown by the
    /// hover tolerance.
    fn hit_test(&self, p: Point) -> bool {
        self.segments()
            .any(|(a, b)| Rect::from_corners(a, b).expand(self.style.tolerance).contains(p))
    }
}

impl Renderable for RelationEdge {
    fn draw(&self, target: &mut dyn DrawTarget) {
        target.polyline(&self.path, &self.stroke());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Scene;

    fn endpoint(node: NodeId, table: &str, row: &str) -> RelationEndpoint {
        RelationEndpoint {
            node,
            table_name: table.into(),
            rows: vec![0],
            row_labels: vec![row.into()],
            relation: Cardinality::One,
        }
    }

    fn edge() -> RelationEdge {
        let scene = Scene::default();
        let mut edge = RelationEdge::new(
            [
                endpoint(scene.node_id(0), "users", "id"),
                endpoint(scene.node_id(1), "orders", "user_id"),
            ],
            RelationStyle::default(),
        );
        edge.recalculate(
            &Rect::new(0.0, 0.0, 100.0, 50.0),
            &Rect::new(300.0, 100.0, 100.0, 50.0),
        );
        edge
    }

    #[test]
    fn test_canonical_id() {
        assert_eq!(edge().id().as_str(), "users_id_orders_user_id");
    }

    #[test]
    fn test_swapped_endpoints_do_not_share_id() {
        // Known gap: ids are order-sensitive, so a reversed declaration of
        // the same relation is kept as a second edge.
        let scene = Scene::default();
        let a = endpoint(scene.node_id(0), "users", "id");
        let b = endpoint(scene.node_id(1), "orders", "user_id");
        assert_ne!(
            RelationId::from_endpoints(&a, &b),
            RelationId::from_endpoints(&b, &a)
        );
    }

    #[test]
    fn test_hover_tolerance() {
        let e = edge();
        // first segment runs y=25 from x=100 to x=200
        assert!(e.hit_test(Point::new(150.0, 29.0)));
        assert!(e.hit_test(Point::new(150.0, 30.0)));
        assert!(!e.hit_test(Point::new(150.0, 31.0)));
        // vertical elbow at x=200
        assert!(e.hit_test(Point::new(204.0, 80.0)));
        assert!(!e.hit_test(Point::new(250.0, 80.0)));
    }

    #[test]
    fn test_hover_transitions_only() {
        let mut e = edge();
        let path = *e.path();

        assert_eq!(e.update_hover(Point::new(150.0, 25.0)), HoverChange::Entered);
        assert_eq!(e.update_hover(Point::new(160.0, 25.0)), HoverChange::Unchanged);
        assert_eq!(e.stroke().width, 3.0);
        assert_eq!(e.stroke().color, "#619bcc");

        assert_eq!(e.update_hover(Point::new(600.0, 600.0)), HoverChange::Left);
        assert_eq!(e.stroke().width, 2.0);
        assert_eq!(e.stroke().color, "black");
        assert_eq!(*e.path(), path);
    }
}
