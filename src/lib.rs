pub mod capability;
pub mod entity;
pub mod error;
pub mod events;
pub mod geometry;
pub mod interaction;
pub mod layout;
pub mod measure;
pub mod options;
pub mod processor;
pub mod relation;
pub mod renderer;
pub mod scene;
pub mod schema;
pub mod surface;
pub mod svg;
pub mod viewport;
pub mod widget;

use wasm_bindgen::prelude::*;

use events::{PointerButton, PointerEvent, SceneEvent, WheelEvent};
use geometry::Point;
use layout::GridPlacement;
use options::RendererOptions;
use processor::SchemaProcessor;
use renderer::DiagramRenderer;

pub use error::{ConfigError, ProcessError, RenderError};
pub use renderer::{RenderSummary, SchemaRenderer};
pub use schema::{Database, Schema};

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

fn js_error(e: impl std::fmt::Display) -> js_sys::Error {
    js_sys::Error::new(&e.to_string())
}

fn parse_options(options: Option<String>) -> Result<RendererOptions, js_sys::Error> {
    match options.as_deref() {
        Some(json) if !json.trim().is_empty() => {
            RendererOptions::from_json(json).map_err(js_error)
        }
        _ => Ok(RendererOptions::default()),
    }
}

/// Render schema JSON straight to SVG on a grid, without a live canvas.
#[wasm_bindgen(js_name = "erdToSvg")]
pub fn render_erd(source: &str, options: Option<String>) -> Result<String, js_sys::Error> {
    let renderer = DiagramRenderer::new(Some("svg".into()), parse_options(options)?)
        .with_placement(Box::new(GridPlacement::default()));
    let mut processor = SchemaProcessor::new(renderer);
    processor.render_text(source).map_err(js_error)?;
    Ok(processor.renderer().to_svg().unwrap_or_default())
}

/// Interactive diagram bound to one canvas element.
#[wasm_bindgen]
pub struct ErdCanvas {
    processor: SchemaProcessor<DiagramRenderer>,
    cursor: &'static str,
}

#[wasm_bindgen]
impl ErdCanvas {
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas_id: Option<String>,
        options: Option<String>,
    ) -> Result<ErdCanvas, js_sys::Error> {
        let renderer = DiagramRenderer::new(canvas_id, parse_options(options)?);
        Ok(Self {
            processor: SchemaProcessor::new(renderer),
            cursor: "default",
        })
    }

    pub fn init(&mut self) -> Result<(), js_sys::Error> {
        self.processor.renderer_mut().init().map_err(js_error)?;
        Ok(())
    }

    /// Render parser output. Failures clear the diagram and are rethrown.
    pub fn render(&mut self, schema_json: &str) -> Result<(), js_sys::Error> {
        self.processor.render_text(schema_json).map_err(js_error)?;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.processor.renderer_mut().clear();
    }

    /// Each pointer handler returns whether the canvas needs a redraw.
    #[wasm_bindgen(js_name = "pointerDown")]
    pub fn pointer_down(
        &mut self,
        button: i16,
        client_x: f64,
        client_y: f64,
        offset_x: f64,
        offset_y: f64,
    ) -> bool {
        let event = pointer(button, client_x, client_y, offset_x, offset_y);
        let events = self.processor.renderer_mut().pointer_down(&event);
        self.absorb(&events)
    }

    #[wasm_bindgen(js_name = "pointerMove")]
    pub fn pointer_move(
        &mut self,
        button: i16,
        client_x: f64,
        client_y: f64,
        offset_x: f64,
        offset_y: f64,
    ) -> bool {
        let event = pointer(button, client_x, client_y, offset_x, offset_y);
        let events = self.processor.renderer_mut().pointer_move(&event);
        self.absorb(&events)
    }

    #[wasm_bindgen(js_name = "pointerUp")]
    pub fn pointer_up(
        &mut self,
        button: i16,
        client_x: f64,
        client_y: f64,
        offset_x: f64,
        offset_y: f64,
    ) -> bool {
        let event = pointer(button, client_x, client_y, offset_x, offset_y);
        let events = self.processor.renderer_mut().pointer_up(&event);
        self.absorb(&events)
    }

    /// Returns the new zoom.
    pub fn wheel(&mut self, delta_y: f64, offset_x: f64, offset_y: f64) -> f64 {
        let event = WheelEvent::new(delta_y, Point::new(offset_x, offset_y));
        let events = self.processor.renderer_mut().wheel(&event);
        self.absorb(&events);
        self.zoom()
    }

    #[wasm_bindgen(getter)]
    pub fn zoom(&self) -> f64 {
        self.processor.renderer().viewport().map_or(1.0, |v| v.zoom())
    }

    /// `[a, b, c, d, e, f]` for `CanvasRenderingContext2D.setTransform`.
    #[wasm_bindgen(getter)]
    pub fn transform(&self) -> Vec<f64> {
        self.processor
            .renderer()
            .viewport()
            .map(|v| v.transform().to_vec())
            .unwrap_or_default()
    }

    #[wasm_bindgen(getter)]
    pub fn cursor(&self) -> String {
        self.cursor.to_string()
    }

    #[wasm_bindgen(js_name = "toSvg")]
    pub fn to_svg(&self) -> Option<String> {
        self.processor.renderer().to_svg()
    }
}

impl ErdCanvas {
    fn absorb(&mut self, events: &[SceneEvent]) -> bool {
        let mut redraw = false;
        for event in events {
            match event {
                SceneEvent::SetCursor(cursor) => self.cursor = *cursor,
                SceneEvent::RenderNeeded => redraw = true,
                _ => {}
            }
        }
        redraw
    }
}

fn pointer(
    button: i16,
    client_x: f64,
    client_y: f64,
    offset_x: f64,
    offset_y: f64,
) -> PointerEvent {
    PointerEvent::new(
        PointerButton::from(button),
        Point::new(client_x, client_y),
        Point::new(offset_x, offset_y),
    )
}
