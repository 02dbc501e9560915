//! Scene graph: every object currently on the canvas, their draw order, and
//! the subscriptions that keep relations attached to moving nodes.
//!
//! Handles carry the generation of the scene that issued them. A render
//! pass bumps the generation, so handles held by queued input from a previous
//! scene resolve to `None` instead of aliasing new objects.

use std::collections::HashMap;

use crate::capability::{HitTestable, Positionable, Renderable};
use crate::entity::{EntityNode, Interactivity};
use crate::geometry::Point;
use crate::relation::{HoverChange, RelationEdge, RelationId};
use crate::surface::DrawTarget;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    generation: u64,
    index: usize,
}

impl NodeId {
    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeKey {
    generation: u64,
    index: usize,
}

impl EdgeKey {
    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectRef {
    Node(NodeId),
    Edge(EdgeKey),
}

/// Callbacks the scene invokes on behalf of its objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subscription {
    /// Re-route `edge` whenever `node` moves.
    OnMove { node: NodeId, edge: EdgeKey },
    /// Test `target` against every pointer move.
    OnHoverTest(ObjectRef),
}

/// Effect of one pointer move on hover state.
#[derive(Debug, Clone, PartialEq)]
pub enum HoverUpdate {
    Edge { edge: EdgeKey, hovered: bool },
    Row { node: NodeId, row: usize, hovered: bool },
}

#[derive(Debug, Default)]
pub struct Scene {
    generation: u64,
    nodes: Vec<EntityNode>,
    edges: Vec<RelationEdge>,
    edge_ids: HashMap<RelationId, EdgeKey>,
    z_order: Vec<ObjectRef>,
    subscriptions: Vec<Subscription>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle the `index`-th node of the current generation will get.
    pub fn node_id(&self, index: usize) -> NodeId {
        NodeId {
            generation: self.generation,
            index,
        }
    }

    fn edge_key(&self, index: usize) -> EdgeKey {
        EdgeKey {
            generation: self.generation,
            index,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn nodes(&self) -> &[EntityNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[RelationEdge] {
        &self.edges
    }

    pub fn objects(&self) -> &[ObjectRef] {
        &self.z_order
    }

    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }

    pub fn node(&self, id: NodeId) -> Option<&EntityNode> {
        if id.generation != self.generation {
            return None;
        }
        self.nodes.get(id.index)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut EntityNode> {
        if id.generation != self.generation {
            return None;
        }
        self.nodes.get_mut(id.index)
    }

    pub fn edge(&self, key: EdgeKey) -> Option<&RelationEdge> {
        if key.generation != self.generation {
            return None;
        }
        self.edges.get(key.index)
    }

    fn edge_mut(&mut self, key: EdgeKey) -> Option<&mut RelationEdge> {
        if key.generation != self.generation {
            return None;
        }
        self.edges.get_mut(key.index)
    }

    pub fn find_edge(&self, id: &RelationId) -> Option<EdgeKey> {
        self.edge_ids.get(id).copied()
    }

    pub fn contains(&self, object: ObjectRef) -> bool {
        match object {
            ObjectRef::Node(id) => self.node(id).is_some(),
            ObjectRef::Edge(key) => self.edge(key).is_some(),
        }
    }

    /// Add a node built with `self.node_id(self.nodes().len())`.
    pub fn add_node(&mut self, node: EntityNode) -> NodeId {
        let id = self.node_id(self.nodes.len());
        debug_assert_eq!(node.id(), id, "node built for another slot");
        self.nodes.push(node);
        self.z_order.push(ObjectRef::Node(id));
        self.subscribe(Subscription::OnHoverTest(ObjectRef::Node(id)));
        id
    }

    /// Add an edge, or return the edge already registered under its id.
    /// The first edge added for an id wins.
    pub fn add_edge(&mut self, mut edge: RelationEdge) -> EdgeKey {
        if let Some(existing) = self.find_edge(edge.id()) {
            return existing;
        }

        let key = self.edge_key(self.edges.len());
        let [a, b] = edge.endpoints().clone();
        if let (Some(from), Some(to)) = (self.node(a.node), self.node(b.node)) {
            edge.recalculate(&from.bounds(), &to.bounds());
        }

        self.edge_ids.insert(edge.id().clone(), key);
        self.edges.push(edge);
        self.z_order.push(ObjectRef::Edge(key));

        self.subscribe(Subscription::OnMove { node: a.node, edge: key });
        if b.node != a.node {
            self.subscribe(Subscription::OnMove { node: b.node, edge: key });
        }
        self.subscribe(Subscription::OnHoverTest(ObjectRef::Edge(key)));
        for node in [a.node, b.node] {
            if let Some(node) = self.node_mut(node) {
                node.attach_relation(key);
            }
        }
        key
    }

    pub fn subscribe(&mut self, subscription: Subscription) {
        if !self.subscriptions.contains(&subscription) {
            self.subscriptions.push(subscription);
        }
    }

    /// Drop every subscription that mentions `object`.
    pub fn unsubscribe(&mut self, object: ObjectRef) {
        self.subscriptions.retain(|s| match (*s, object) {
            (Subscription::OnMove { node, .. }, ObjectRef::Node(id)) => node != id,
            (Subscription::OnMove { edge, .. }, ObjectRef::Edge(key)) => edge != key,
            (Subscription::OnHoverTest(target), _) => target != object,
        });
    }

    /// Remove everything and start a new generation. Returns how many
    /// objects were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.z_order.len();
        for object in std::mem::take(&mut self.z_order) {
            self.unsubscribe(object);
        }
        self.subscriptions.clear();
        self.nodes.clear();
        self.edges.clear();
        self.edge_ids.clear();
        self.generation += 1;
        removed
    }

    /// Move a node and re-route every edge subscribed to it. Returns the
    /// re-routed edges, or `None` for a stale handle.
    pub fn move_node(&mut self, id: NodeId, dx: f64, dy: f64) -> Option<Vec<EdgeKey>> {
        self.edit_node(id, |node| node.move_by(dx, dy))
            .map(|(_, rerouted)| rerouted)
    }

    /// Apply `edit` to a node, then notify its move subscribers since its box
    /// may have changed.
    pub fn edit_node<R>(
        &mut self,
        id: NodeId,
        edit: impl FnOnce(&mut EntityNode) -> R,
    ) -> Option<(R, Vec<EdgeKey>)> {
        let result = edit(self.node_mut(id)?);

        let subscribed: Vec<EdgeKey> = self
            .subscriptions
            .iter()
            .filter_map(|s| match *s {
                Subscription::OnMove { node, edge } if node == id => Some(edge),
                _ => None,
            })
            .collect();

        let mut rerouted = Vec::with_capacity(subscribed.len());
        for key in subscribed {
            if self.reroute(key) {
                rerouted.push(key);
            }
        }
        tracing::trace!(node = id.index, edges = rerouted.len(), "node changed");
        Some((result, rerouted))
    }

    fn reroute(&mut self, key: EdgeKey) -> bool {
        let Some(edge) = self.edge(key) else {
            return false;
        };
        let [a, b] = edge.endpoints();
        let (Some(from), Some(to)) = (self.node(a.node), self.node(b.node)) else {
            tracing::warn!(edge = %edge.id(), "edge endpoint no longer in scene");
            return false;
        };
        let (from, to) = (from.bounds(), to.bounds());
        match self.edge_mut(key) {
            Some(edge) => {
                edge.recalculate(&from, &to);
                true
            }
            None => false,
        }
    }

    pub fn bring_to_front(&mut self, object: ObjectRef) {
        if let Some(pos) = self.z_order.iter().position(|o| *o == object) {
            let object = self.z_order.remove(pos);
            self.z_order.push(object);
        }
    }

    /// Topmost evented node under `p`.
    pub fn node_at(&self, p: Point) -> Option<NodeId> {
        self.z_order.iter().rev().find_map(|o| match *o {
            ObjectRef::Node(id) => self
                .node(id)
                .filter(|n| n.interactivity.evented && n.hit_test(p))
                .map(|_| id),
            ObjectRef::Edge(_) => None,
        })
    }

    /// Run every hover-test subscription against world point `p`.
    pub fn pointer_moved(&mut self, p: Point) -> Vec<HoverUpdate> {
        let topmost = self.node_at(p);
        let targets: Vec<ObjectRef> = self
            .subscriptions
            .iter()
            .filter_map(|s| match *s {
                Subscription::OnHoverTest(target) => Some(target),
                Subscription::OnMove { .. } => None,
            })
            .collect();

        let mut updates = Vec::new();
        for target in targets {
            match target {
                ObjectRef::Edge(key) => {
                    let Some(edge) = self.edge_mut(key) else {
                        continue;
                    };
                    let change = if edge.interactivity.evented {
                        edge.update_hover(p)
                    } else if edge.clear_hover() {
                        HoverChange::Left
                    } else {
                        HoverChange::Unchanged
                    };
                    match change {
                        HoverChange::Entered => {
                            self.bring_to_front(target);
                            updates.push(HoverUpdate::Edge { edge: key, hovered: true });
                        }
                        HoverChange::Left => {
                            updates.push(HoverUpdate::Edge { edge: key, hovered: false });
                        }
                        HoverChange::Unchanged => {}
                    }
                }
                ObjectRef::Node(id) => {
                    let Some(node) = self.node_mut(id) else {
                        continue;
                    };
                    let hovered_row = if topmost == Some(id) { node.row_at(p) } else { None };
                    for (row, widget) in node.rows_mut().iter_mut().enumerate() {
                        let hovered = hovered_row == Some(row);
                        if widget.set_hovered(hovered) {
                            updates.push(HoverUpdate::Row { node: id, row, hovered });
                        }
                    }
                }
            }
        }
        updates
    }

    pub fn interactivity(&self, object: ObjectRef) -> Option<Interactivity> {
        match object {
            ObjectRef::Node(id) => self.node(id).map(|n| n.interactivity),
            ObjectRef::Edge(key) => self.edge(key).map(|e| e.interactivity),
        }
    }

    /// Returns false when `object` is not part of this scene.
    pub fn set_interactivity(&mut self, object: ObjectRef, value: Interactivity) -> bool {
        match object {
            ObjectRef::Node(id) => self.node_mut(id).map(|n| n.interactivity = value).is_some(),
            ObjectRef::Edge(key) => self.edge_mut(key).map(|e| e.interactivity = value).is_some(),
        }
    }

    /// Draw objects back to front.
    pub fn draw(&self, target: &mut dyn DrawTarget) {
        for object in &self.z_order {
            match *object {
                ObjectRef::Node(id) => {
                    if let Some(node) = self.node(id) {
                        node.draw(target);
                    }
                }
                ObjectRef::Edge(key) => {
                    if let Some(edge) = self.edge(key) {
                        edge.draw(target);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{RelationStyle, RowStyle};
    use crate::relation::RelationEndpoint;
    use crate::schema::Cardinality;

    fn add_table(scene: &mut Scene, name: &str, at: Point, rows: &[&str]) -> NodeId {
        let mut node = EntityNode::new(scene.node_id(scene.nodes().len()), name, None, at);
        node.add_header(name, &RowStyle::header());
        node.add_rows(rows.iter().copied(), &RowStyle::default());
        scene.add_node(node)
    }

    fn link(scene: &Scene, a: NodeId, ra: &str, b: NodeId, rb: &str) -> RelationEdge {
        let ep = |id: NodeId, row: &str| RelationEndpoint {
            node: id,
            table_name: scene.node(id).unwrap().table_name().to_string(),
            rows: vec![0],
            row_labels: vec![row.to_string()],
            relation: Cardinality::One,
        };
        RelationEdge::new([ep(a, ra), ep(b, rb)], RelationStyle::default())
    }

    fn sample() -> (Scene, NodeId, NodeId, NodeId, EdgeKey) {
        let mut scene = Scene::new();
        let users = add_table(&mut scene, "users", Point::new(0.0, 0.0), &["id"]);
        let orders = add_table(&mut scene, "orders", Point::new(600.0, 0.0), &["user_id"]);
        let tags = add_table(&mut scene, "tags", Point::new(0.0, 600.0), &["id"]);
        let edge = link(&scene, users, "id", orders, "user_id");
        let key = scene.add_edge(edge);
        (scene, users, orders, tags, key)
    }

    #[test]
    fn test_add_edge_dedups_by_id() {
        let (mut scene, users, orders, _, key) = sample();
        let again = link(&scene, users, "id", orders, "user_id");
        assert_eq!(scene.add_edge(again), key);
        assert_eq!(scene.edges().len(), 1);
        assert_eq!(scene.node(users).unwrap().relations(), &[key]);
    }

    #[test]
    fn test_move_reroutes_attached_edges_only() {
        let (mut scene, users, orders, tags, key) = sample();
        let before = *scene.edge(key).unwrap().path();

        assert_eq!(scene.move_node(tags, 10.0, 10.0), Some(vec![]));
        assert_eq!(*scene.edge(key).unwrap().path(), before);

        assert_eq!(scene.move_node(orders, 0.0, 40.0), Some(vec![key]));
        let after = *scene.edge(key).unwrap().path();
        assert_eq!(after[0], before[0]);
        assert_eq!(after[3].y, before[3].y + 40.0);

        scene.move_node(users, 25.0, 0.0);
        assert_eq!(scene.edge(key).unwrap().path()[0].x, before[0].x + 25.0);
    }

    #[test]
    fn test_stale_handles_after_clear() {
        let (mut scene, users, _, _, key) = sample();
        assert_eq!(scene.clear(), 4);
        assert!(scene.is_empty());
        assert!(scene.subscriptions().is_empty());
        assert!(scene.node(users).is_none());
        assert!(scene.edge(key).is_none());
        assert!(scene.move_node(users, 1.0, 1.0).is_none());

        // A new node in the same slot is not reachable through the old handle
        add_table(&mut scene, "fresh", Point::default(), &["id"]);
        assert!(scene.node(users).is_none());
        assert!(scene.node(scene.node_id(0)).is_some());
    }

    #[test]
    fn test_edge_hover_brings_to_front() {
        let (mut scene, _, _, _, key) = sample();
        let start = scene.edge(key).unwrap().path()[0];

        let updates = scene.pointer_moved(start.offset(1.0, 0.0));
        assert!(updates.contains(&HoverUpdate::Edge { edge: key, hovered: true }));
        assert_eq!(scene.objects().last(), Some(&ObjectRef::Edge(key)));

        // Moving along the edge does not report again
        let updates = scene.pointer_moved(start.offset(2.0, 0.0));
        assert!(!updates.iter().any(|u| matches!(u, HoverUpdate::Edge { .. })));
    }

    #[test]
    fn test_row_hover_only_on_topmost_node() {
        let mut scene = Scene::new();
        let below = add_table(&mut scene, "below", Point::new(0.0, 0.0), &["a"]);
        let above = add_table(&mut scene, "above", Point::new(0.0, 0.0), &["b"]);

        let updates = scene.pointer_moved(Point::new(50.0, 50.0));
        assert_eq!(
            updates,
            vec![HoverUpdate::Row { node: above, row: 0, hovered: true }]
        );
        assert!(!scene.node(below).unwrap().rows()[0].is_hovered());

        let updates = scene.pointer_moved(Point::new(900.0, 900.0));
        assert_eq!(
            updates,
            vec![HoverUpdate::Row { node: above, row: 0, hovered: false }]
        );
    }
}
