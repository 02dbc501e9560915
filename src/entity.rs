//! Entity nodes: one box per schema table.

use crate::capability::{HitTestable, Positionable, Renderable};
use crate::error::RenderError;
use crate::geometry::{Point, Rect};
use crate::options::{FrameStyle, RowStyle};
use crate::scene::{EdgeKey, NodeId};
use crate::surface::{DrawTarget, Paint};
use crate::widget::{RowWidget, header_widget, row_widget};

/// Whether an object reacts to the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interactivity {
    pub selectable: bool,
    pub evented: bool,
}

impl Interactivity {
    pub const ENABLED: Self = Self {
        selectable: true,
        evented: true,
    };
    pub const DISABLED: Self = Self {
        selectable: false,
        evented: false,
    };
}

#[derive(Debug, Clone)]
pub struct EntityNode {
    id: NodeId,
    table_name: String,
    table_alias: Option<String>,
    position: Point,
    width: f64,
    height: f64,
    header: Option<RowWidget>,
    rows: Vec<RowWidget>,
    relations: Vec<EdgeKey>,
    frame: FrameStyle,
    pub interactivity: Interactivity,
}

/// The composed visual group of a node: frame, header, and row stack.
#[derive(Debug, Clone, Copy)]
pub struct EntityGroup<'a> {
    pub frame: Rect,
    pub header: &'a RowWidget,
    pub rows: &'a [RowWidget],
}

impl EntityNode {
    pub fn new(
        id: NodeId,
        table_name: impl Into<String>,
        table_alias: Option<String>,
        position: Point,
    ) -> Self {
        Self {
            id,
            table_name: table_name.into(),
            table_alias,
            position,
            width: 0.0,
            height: 0.0,
            header: None,
            rows: Vec::new(),
            relations: Vec::new(),
            frame: FrameStyle::default(),
            interactivity: Interactivity::ENABLED,
        }
    }

    pub fn with_frame(mut self, frame: FrameStyle) -> Self {
        self.frame = frame;
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn table_alias(&self) -> Option<&str> {
        self.table_alias.as_deref()
    }

    /// True when an endpoint naming `name` refers to this node's table.
    pub fn answers_to(&self, name: &str) -> bool {
        self.table_name == name || self.table_alias.as_deref() == Some(name)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn header(&self) -> Option<&RowWidget> {
        self.header.as_ref()
    }

    pub fn rows(&self) -> &[RowWidget] {
        &self.rows
    }

    pub fn relations(&self) -> &[EdgeKey] {
        &self.relations
    }

    pub fn add_header(&mut self, label: impl Into<String>, style: &RowStyle) -> &RowWidget {
        let mut header = header_widget(label, style);
        header.attach(self.id);

        self.height = self.rows_height() + header.height();
        self.width = self.widest_row().max(header.natural_width());
        self.stretch_rows();
        self.stack_rows(self.position.y + header.height());

        header.set_width(self.width);
        header.set_origin(self.position.x, self.position.y);
        self.header.insert(header)
    }

    pub fn add_row(&mut self, label: impl Into<String>, style: &RowStyle) -> &RowWidget {
        let mut row = row_widget(label, style);
        row.attach(self.id);
        self.rows.push(row);

        self.recalculate_height();
        self.recalculate_width();

        &self.rows[self.rows.len() - 1]
    }

    pub fn add_rows<I, S>(&mut self, labels: I, style: &RowStyle) -> &[RowWidget]
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for label in labels {
            self.add_row(label, style);
        }
        &self.rows
    }

    /// Relabel a row and resize the node to fit.
    pub fn set_row_label(&mut self, index: usize, label: impl Into<String>) -> bool {
        let Some(row) = self.rows.get_mut(index) else {
            return false;
        };
        row.set_label(label);
        self.recalculate_width();
        true
    }

    /// Resize a row and restack the node.
    pub fn set_row_height(&mut self, index: usize, height: f64) -> bool {
        let Some(row) = self.rows.get_mut(index) else {
            return false;
        };
        row.set_height(height);
        self.recalculate_height();
        true
    }

    /// Height = header height (0 without header) + sum of row heights.
    pub fn recalculate_height(&mut self) {
        self.height = self.rows_height() + self.header.as_ref().map_or(0.0, RowWidget::height);
        self.layout_children();
    }

    /// Width = widest natural width among header and rows; every child is
    /// then stretched to it.
    pub fn recalculate_width(&mut self) {
        let header = self.header.as_ref().map_or(0.0, RowWidget::natural_width);
        self.width = self.widest_row().max(header);

        self.stretch_rows();
        if let Some(header) = &mut self.header {
            header.set_width(self.width);
        }
        self.layout_children();
    }

    fn rows_height(&self) -> f64 {
        self.rows.iter().map(RowWidget::height).sum()
    }

    fn widest_row(&self) -> f64 {
        self.rows
            .iter()
            .map(RowWidget::natural_width)
            .fold(0.0, f64::max)
    }

    fn stretch_rows(&mut self) {
        for row in &mut self.rows {
            row.set_width(self.width);
        }
    }

    /// Header at the top edge, rows stacked below it without gaps, all
    /// horizontally centered on the node.
    fn layout_children(&mut self) {
        let center_x = self.position.x + self.width / 2.0;
        let mut top = self.position.y;

        if let Some(header) = &mut self.header {
            header.set_origin(center_x - header.width() / 2.0, top);
            top += header.height();
        }
        self.stack_rows(top);
    }

    fn stack_rows(&mut self, mut top: f64) {
        let center_x = self.position.x + self.width / 2.0;
        for row in &mut self.rows {
            row.set_origin(center_x - row.width() / 2.0, top);
            top += row.height();
        }
    }

    /// Offset of row `index` below the header.
    pub fn row_offset(&self, index: usize) -> f64 {
        self.rows.iter().take(index).map(RowWidget::height).sum()
    }

    pub fn move_to(&mut self, position: Point) {
        self.position = position;
        self.layout_children();
    }

    pub fn move_by(&mut self, dx: f64, dy: f64) {
        self.move_to(self.position.offset(dx, dy));
    }

    pub(crate) fn attach_relation(&mut self, edge: EdgeKey) {
        if !self.relations.contains(&edge) {
            self.relations.push(edge);
        }
    }

    /// Indices of the rows whose label is in `names`, in row order.
    pub fn find_rows(&self, names: &[String]) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| names.iter().any(|n| n == row.label()))
            .map(|(i, _)| i)
            .collect()
    }

    /// Index of the row under `p`, if any.
    pub fn row_at(&self, p: Point) -> Option<usize> {
        self.rows.iter().position(|row| row.hit_test(p))
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [RowWidget] {
        &mut self.rows
    }

    /// The composed group; fails when no header was ever added.
    pub fn group(&self) -> Result<EntityGroup<'_>, RenderError> {
        let header = self
            .header
            .as_ref()
            .ok_or_else(|| RenderError::HeaderUndefined {
                table: self.table_name.clone(),
            })?;

        Ok(EntityGroup {
            frame: self.bounds(),
            header,
            rows: &self.rows,
        })
    }
}

impl Positionable for EntityNode {
    fn position(&self) -> Point {
        self.position
    }

    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }
}

impl HitTestable for EntityNode {
    fn hit_test(&self, p: Point) -> bool {
        self.bounds().contains(p)
    }
}

impl Renderable for EntityNode {
    fn draw(&self, target: &mut dyn DrawTarget) {
        let Ok(group) = self.group() else {
            tracing::warn!(table = %self.table_name, "skipping node without header");
            return;
        };

        group.header.draw(target);
        for row in group.rows {
            row.draw(target);
        }

        // Frame last so it sits on top of the row fills
        target.rect(
            group.frame,
            &Paint {
                fill: "none".into(),
                stroke: self.frame.stroke.clone(),
                stroke_width: self.frame.stroke_width,
            },
        );
    }
}
