//! Pointer and wheel handling: panning, node dragging, hover, zoom.

use std::collections::HashMap;

use crate::entity::Interactivity;
use crate::events::{PointerEvent, SceneEvent, WheelEvent};
use crate::geometry::Point;
use crate::options::{Keybindings, ZoomOptions};
use crate::scene::{HoverUpdate, NodeId, ObjectRef};
use crate::surface::Canvas;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionMode {
    Idle,
    /// Pan button held; `last` is the previous client position.
    Panning { last: Point },
    /// Drag button held on a node; `last` is the previous world position.
    Dragging { node: NodeId, last: Point },
}

/// Per-object interactivity recorded when panning starts.
#[derive(Debug, Clone, Default)]
pub struct InteractivitySnapshot(HashMap<ObjectRef, Interactivity>);

impl InteractivitySnapshot {
    /// Record every object's state and disable it.
    fn take(canvas: &mut Canvas) -> Self {
        let objects = canvas.scene.objects().to_vec();
        let mut saved = HashMap::with_capacity(objects.len());
        for object in objects {
            if let Some(state) = canvas.scene.interactivity(object) {
                saved.insert(object, state);
                canvas.scene.set_interactivity(object, Interactivity::DISABLED);
            }
        }
        Self(saved)
    }

    /// Put the recorded states back on objects that still exist.
    fn restore(self, canvas: &mut Canvas) -> usize {
        let mut restored = 0;
        for (object, state) in self.0 {
            if canvas.scene.set_interactivity(object, state) {
                restored += 1;
            }
        }
        restored
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct InteractionController {
    mode: InteractionMode,
    snapshot: Option<InteractivitySnapshot>,
    keybindings: Keybindings,
    zoom: ZoomOptions,
}

impl InteractionController {
    pub fn new(keybindings: Keybindings, zoom: ZoomOptions) -> Self {
        Self {
            mode: InteractionMode::Idle,
            snapshot: None,
            keybindings,
            zoom,
        }
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// Forget the current gesture. Used when the scene is rebuilt underneath it.
    pub fn reset(&mut self, canvas: &mut Canvas) {
        if let Some(snapshot) = self.snapshot.take() {
            snapshot.restore(canvas);
        }
        self.mode = InteractionMode::Idle;
    }

    pub fn pointer_down(&mut self, canvas: &mut Canvas, event: &PointerEvent) -> Vec<SceneEvent> {
        if self.mode != InteractionMode::Idle {
            return Vec::new();
        }

        if event.button == self.keybindings.pan {
            self.snapshot = Some(InteractivitySnapshot::take(canvas));
            self.mode = InteractionMode::Panning { last: event.client };
            tracing::trace!("panning started");
            return vec![SceneEvent::SetCursor("grabbing")];
        }

        if event.button == self.keybindings.drag {
            let world = canvas.viewport.screen_to_world(event.offset);
            if let Some(node) = canvas.scene.node_at(world) {
                let selectable = canvas
                    .scene
                    .node(node)
                    .is_some_and(|n| n.interactivity.selectable);
                if selectable {
                    canvas.scene.bring_to_front(ObjectRef::Node(node));
                    self.mode = InteractionMode::Dragging { node, last: world };
                    return vec![SceneEvent::SetCursor("move"), SceneEvent::RenderNeeded];
                }
            }
        }

        Vec::new()
    }

    pub fn pointer_move(&mut self, canvas: &mut Canvas, event: &PointerEvent) -> Vec<SceneEvent> {
        match self.mode {
            InteractionMode::Panning { last } => {
                let dx = event.client.x - last.x;
                let dy = event.client.y - last.y;
                self.mode = InteractionMode::Panning { last: event.client };
                canvas.viewport.relative_pan(dx, dy);
                vec![SceneEvent::Panned { dx, dy }, SceneEvent::RenderNeeded]
            }
            InteractionMode::Dragging { node, last } => {
                let world = canvas.viewport.screen_to_world(event.offset);
                let (dx, dy) = (world.x - last.x, world.y - last.y);
                let Some(rerouted) = canvas.scene.move_node(node, dx, dy) else {
                    tracing::warn!(node = node.index(), "dragged node left the scene");
                    self.mode = InteractionMode::Idle;
                    return Vec::new();
                };
                self.mode = InteractionMode::Dragging { node, last: world };

                let mut events = vec![SceneEvent::NodeMoved { node }];
                events.extend(rerouted.into_iter().map(|edge| SceneEvent::EdgeRerouted { edge }));
                events.push(SceneEvent::RenderNeeded);
                events
            }
            InteractionMode::Idle => self.hover(canvas, event),
        }
    }

    fn hover(&mut self, canvas: &mut Canvas, event: &PointerEvent) -> Vec<SceneEvent> {
        let world = canvas.viewport.screen_to_world(event.offset);
        let mut events: Vec<SceneEvent> = canvas
            .scene
            .pointer_moved(world)
            .into_iter()
            .map(|update| match update {
                HoverUpdate::Edge { edge, hovered } => {
                    SceneEvent::EdgeHoverChanged { edge, hovered }
                }
                HoverUpdate::Row { node, row, hovered } => {
                    SceneEvent::RowHoverChanged { node, row, hovered }
                }
            })
            .collect();
        if !events.is_empty() {
            events.push(SceneEvent::RenderNeeded);
        }
        events
    }

    pub fn pointer_up(&mut self, canvas: &mut Canvas, event: &PointerEvent) -> Vec<SceneEvent> {
        match self.mode {
            InteractionMode::Panning { .. } if event.button == self.keybindings.pan => {
                let restored = self
                    .snapshot
                    .take()
                    .map_or(0, |snapshot| snapshot.restore(canvas));
                tracing::trace!(restored, "panning ended");
                self.mode = InteractionMode::Idle;
                vec![SceneEvent::SetCursor("default")]
            }
            InteractionMode::Dragging { .. } if event.button == self.keybindings.drag => {
                self.mode = InteractionMode::Idle;
                vec![SceneEvent::SetCursor("default")]
            }
            _ => Vec::new(),
        }
    }

    pub fn wheel(&mut self, canvas: &mut Canvas, event: &WheelEvent) -> Vec<SceneEvent> {
        let (width, height) = (canvas.width(), canvas.height());
        let zoom = canvas
            .viewport
            .apply_wheel(event.delta_y, event.offset, width, height, &self.zoom);
        vec![SceneEvent::Zoomed { zoom }, SceneEvent::RenderNeeded]
    }
}
