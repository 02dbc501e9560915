//! The canvas surface: backing size, scene, viewport, and the drawing
//! interface scene objects render into.

use crate::error::ConfigError;
use crate::geometry::{Point, Rect};
use crate::options::CanvasOptions;
use crate::scene::Scene;
use crate::viewport::Viewport;

#[derive(Debug, Clone, PartialEq)]
pub struct Paint {
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub family: String,
    pub size: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub color: String,
    pub width: f64,
    pub line_join: String,
}

/// Something scene objects can be drawn into.
pub trait DrawTarget {
    /// Start a frame; `transform` is the viewport matrix `[a, b, c, d, e, f]`.
    fn begin(&mut self, width: f64, height: f64, background: &str, transform: [f64; 6]);
    fn rect(&mut self, rect: Rect, paint: &Paint);
    /// Text starting at `at.x`, vertically centered on `at.y`.
    fn text(&mut self, at: Point, text: &str, font: &Font);
    fn polyline(&mut self, points: &[Point], stroke: &Stroke);
    fn end(&mut self);
}

/// Recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Begin {
        width: f64,
        height: f64,
        background: String,
        transform: [f64; 6],
    },
    Rect(Rect, Paint),
    Text(Point, String, Font),
    Polyline(Vec<Point>, Stroke),
    End,
}

/// A target that just records what was drawn.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    pub ops: Vec<DrawOp>,
}

impl DrawTarget for DisplayList {
    fn begin(&mut self, width: f64, height: f64, background: &str, transform: [f64; 6]) {
        self.ops.clear();
        self.ops.push(DrawOp::Begin {
            width,
            height,
            background: background.to_string(),
            transform,
        });
    }

    fn rect(&mut self, rect: Rect, paint: &Paint) {
        self.ops.push(DrawOp::Rect(rect, paint.clone()));
    }

    fn text(&mut self, at: Point, text: &str, font: &Font) {
        self.ops.push(DrawOp::Text(at, text.to_string(), font.clone()));
    }

    fn polyline(&mut self, points: &[Point], stroke: &Stroke) {
        self.ops.push(DrawOp::Polyline(points.to_vec(), stroke.clone()));
    }

    fn end(&mut self) {
        self.ops.push(DrawOp::End);
    }
}

/// An initialized drawing surface.
#[derive(Debug)]
pub struct Canvas {
    id: String,
    width: f64,
    height: f64,
    background: String,
    pub scene: Scene,
    pub viewport: Viewport,
}

impl Canvas {
    /// Create the surface for element `id`; fails without an id. A size that
    /// is not a positive number falls back to the default for that axis.
    pub fn new(id: Option<&str>, options: &CanvasOptions) -> Result<Self, ConfigError> {
        let id = id
            .filter(|id| !id.trim().is_empty())
            .ok_or(ConfigError::MissingSurfaceId)?;
        let defaults = CanvasOptions::default();

        Ok(Self {
            id: id.to_string(),
            width: usable_size(options.width).unwrap_or(defaults.width),
            height: usable_size(options.height).unwrap_or(defaults.height),
            background: options.background.clone(),
            scene: Scene::new(),
            viewport: Viewport::default(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Remove every object; the surface and viewport stay as they are.
    pub fn clear(&mut self) -> usize {
        self.scene.clear()
    }

    pub fn draw(&self, target: &mut dyn DrawTarget) {
        target.begin(
            self.width,
            self.height,
            &self.background,
            self.viewport.transform(),
        );
        self.scene.draw(target);
        target.end();
    }
}

fn usable_size(size: f64) -> Option<f64> {
    (size.is_finite() && size > 0.0).then_some(size)
}
