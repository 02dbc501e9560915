//! The diagram renderer: turns a schema into a scene on a canvas and routes
//! host input to it.

use crate::entity::EntityNode;
use crate::error::RenderError;
use crate::events::{PointerEvent, SceneEvent, WheelEvent};
use crate::interaction::InteractionController;
use crate::layout::{PlacementStrategy, RandomPlacement};
use crate::options::{CanvasOptions, RendererOptions};
use crate::relation::{RelationEdge, RelationEndpoint};
use crate::scene::{EdgeKey, NodeId, Scene};
use crate::schema::{Endpoint, Ref, Schema};
use crate::surface::{Canvas, DrawTarget};
use crate::svg::SvgTarget;
use crate::viewport::Viewport;

/// Something that can display a schema and be blanked.
pub trait SchemaRenderer {
    /// Replace whatever is displayed with `schema`.
    fn render(&mut self, schema: &Schema) -> Result<RenderSummary, RenderError>;
    /// Remove everything displayed, keeping the surface.
    fn clear(&mut self);
}

/// Counts from one render pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSummary {
    pub nodes: usize,
    pub edges: usize,
    /// Refs that resolved to an edge already in the scene.
    pub duplicates: usize,
}

pub struct DiagramRenderer {
    canvas_id: Option<String>,
    options: RendererOptions,
    canvas: Option<Canvas>,
    placement: Box<dyn PlacementStrategy>,
    controller: InteractionController,
}

impl DiagramRenderer {
    pub fn new(canvas_id: Option<String>, options: RendererOptions) -> Self {
        let controller =
            InteractionController::new(options.keybindings.clone(), options.zoom.clone());
        Self {
            canvas_id,
            options,
            canvas: None,
            placement: Box::new(RandomPlacement::new()),
            controller,
        }
    }

    pub fn with_placement(mut self, placement: Box<dyn PlacementStrategy>) -> Self {
        self.placement = placement;
        self
    }

    pub fn options(&self) -> &RendererOptions {
        &self.options
    }

    /// Create the surface if it does not exist yet.
    pub fn init(&mut self) -> Result<&mut Canvas, RenderError> {
        open_canvas(
            &mut self.canvas,
            self.canvas_id.as_deref(),
            &self.options.canvas,
        )
    }

    pub fn canvas(&self) -> Option<&Canvas> {
        self.canvas.as_ref()
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.canvas.as_ref().map(|c| &c.scene)
    }

    pub fn viewport(&self) -> Option<&Viewport> {
        self.canvas.as_ref().map(|c| &c.viewport)
    }

    /// Rebuild the scene from `schema`. On a structural error nothing of the
    /// schema is left on the canvas.
    pub fn render(&mut self, schema: &Schema) -> Result<RenderSummary, RenderError> {
        let canvas = open_canvas(
            &mut self.canvas,
            self.canvas_id.as_deref(),
            &self.options.canvas,
        )?;
        self.controller.reset(canvas);
        canvas.clear();

        match build_scene(
            &mut canvas.scene,
            schema,
            &self.options,
            self.placement.as_mut(),
        ) {
            Ok(summary) => {
                tracing::debug!(
                    schema = %schema.name,
                    nodes = summary.nodes,
                    edges = summary.edges,
                    duplicates = summary.duplicates,
                    "render pass complete"
                );
                Ok(summary)
            }
            Err(e) => {
                tracing::warn!(error = %e, "render aborted, scene cleared");
                canvas.clear();
                Err(e)
            }
        }
    }

    /// Remove every rendered object; the surface and viewport survive.
    pub fn clear(&mut self) {
        if let Some(canvas) = self.canvas.as_mut() {
            self.controller.reset(canvas);
            let removed = canvas.clear();
            tracing::trace!(removed, "scene cleared");
        }
    }

    pub fn pointer_down(&mut self, event: &PointerEvent) -> Vec<SceneEvent> {
        match self.canvas.as_mut() {
            Some(canvas) => self.controller.pointer_down(canvas, event),
            None => Vec::new(),
        }
    }

    pub fn pointer_move(&mut self, event: &PointerEvent) -> Vec<SceneEvent> {
        match self.canvas.as_mut() {
            Some(canvas) => self.controller.pointer_move(canvas, event),
            None => Vec::new(),
        }
    }

    pub fn pointer_up(&mut self, event: &PointerEvent) -> Vec<SceneEvent> {
        match self.canvas.as_mut() {
            Some(canvas) => self.controller.pointer_up(canvas, event),
            None => Vec::new(),
        }
    }

    pub fn wheel(&mut self, event: &WheelEvent) -> Vec<SceneEvent> {
        match self.canvas.as_mut() {
            Some(canvas) => self.controller.wheel(canvas, event),
            None => Vec::new(),
        }
    }

    /// Move a node programmatically. `None` when the handle is stale.
    pub fn move_node(&mut self, node: NodeId, dx: f64, dy: f64) -> Option<Vec<EdgeKey>> {
        self.canvas.as_mut()?.scene.move_node(node, dx, dy)
    }

    /// Relabel a row; the node is resized and its relations re-routed.
    pub fn set_row_label(&mut self, node: NodeId, row: usize, label: &str) -> bool {
        let Some(canvas) = self.canvas.as_mut() else {
            return false;
        };
        canvas
            .scene
            .edit_node(node, |n| n.set_row_label(row, label))
            .is_some_and(|(changed, _)| changed)
    }

    /// Resize a row; rows below it restack and relations re-route.
    pub fn set_row_height(&mut self, node: NodeId, row: usize, height: f64) -> bool {
        let Some(canvas) = self.canvas.as_mut() else {
            return false;
        };
        canvas
            .scene
            .edit_node(node, |n| n.set_row_height(row, height))
            .is_some_and(|(changed, _)| changed)
    }

    /// Returns false before the surface exists.
    pub fn draw(&self, target: &mut dyn DrawTarget) -> bool {
        match &self.canvas {
            Some(canvas) => {
                canvas.draw(target);
                true
            }
            None => false,
        }
    }

    pub fn to_svg(&self) -> Option<String> {
        let mut target = SvgTarget::new();
        self.draw(&mut target).then(|| target.into_string())
    }
}

impl SchemaRenderer for DiagramRenderer {
    fn render(&mut self, schema: &Schema) -> Result<RenderSummary, RenderError> {
        DiagramRenderer::render(self, schema)
    }

    fn clear(&mut self) {
        DiagramRenderer::clear(self)
    }
}

fn open_canvas<'a>(
    slot: &'a mut Option<Canvas>,
    id: Option<&str>,
    options: &CanvasOptions,
) -> Result<&'a mut Canvas, RenderError> {
    let canvas = match slot.take() {
        Some(canvas) => canvas,
        None => {
            let canvas = Canvas::new(id, options)?;
            tracing::debug!(
                id = canvas.id(),
                width = canvas.width(),
                height = canvas.height(),
                "canvas initialized"
            );
            canvas
        }
    };
    Ok(slot.insert(canvas))
}

/// One node per table in schema order, then one edge per distinct relation.
fn build_scene(
    scene: &mut Scene,
    schema: &Schema,
    options: &RendererOptions,
    placement: &mut dyn PlacementStrategy,
) -> Result<RenderSummary, RenderError> {
    for (index, table) in schema.tables.iter().enumerate() {
        let position = placement.place(index, table, &options.placement);
        let mut node = EntityNode::new(
            scene.node_id(index),
            &table.name,
            table.alias.clone(),
            position,
        )
        .with_frame(options.frame.clone());
        node.add_header(&table.name, &options.header);
        node.add_rows(table.fields.iter().map(|f| f.name.as_str()), &options.row);
        scene.add_node(node);
    }

    let mut summary = RenderSummary {
        nodes: scene.nodes().len(),
        ..Default::default()
    };

    for reference in &schema.refs {
        let endpoints = resolve_ref(scene, reference)?;
        let mut edge = RelationEdge::new(endpoints, options.relation.clone());
        if !reference.name.is_empty() {
            edge.label = Some(reference.name.clone());
        }

        let before = scene.edges().len();
        let key = scene.add_edge(edge);
        if scene.edges().len() == before {
            tracing::trace!(edge = key.index(), "relation already rendered");
            summary.duplicates += 1;
        }
    }
    summary.edges = scene.edges().len();

    Ok(summary)
}

fn resolve_ref(scene: &Scene, reference: &Ref) -> Result<[RelationEndpoint; 2], RenderError> {
    match reference.endpoints.as_slice() {
        [a, b] => Ok([resolve_endpoint(scene, a)?, resolve_endpoint(scene, b)?]),
        other => Err(RenderError::EndpointCount {
            name: reference.name.clone(),
            found: other.len(),
        }),
    }
}

/// Find the node for the endpoint's table (by name or alias) and every row
/// named in its field list.
fn resolve_endpoint(scene: &Scene, endpoint: &Endpoint) -> Result<RelationEndpoint, RenderError> {
    let node = scene
        .nodes()
        .iter()
        .find(|n| n.answers_to(&endpoint.table_name))
        .ok_or_else(|| RenderError::TableNotFound {
            table: endpoint.table_name.clone(),
        })?;

    let rows = node.find_rows(&endpoint.field_names);
    if rows.is_empty() {
        return Err(RenderError::RowNotFound {
            table: endpoint.table_name.clone(),
            fields: endpoint.field_names.clone(),
        });
    }

    Ok(RelationEndpoint {
        node: node.id(),
        table_name: node.table_name().to_string(),
        row_labels: rows
            .iter()
            .map(|&i| node.rows()[i].label().to_string())
            .collect(),
        rows,
        relation: endpoint.relation,
    })
}
