//! Bridge between schema text and a renderer.
//!
//! The parser collaborator emits the schema tree as JSON. Text that does not
//! parse blanks the diagram instead of leaving a stale one on screen.

use crate::error::ProcessError;
use crate::renderer::{RenderSummary, SchemaRenderer};
use crate::schema::Database;

pub struct SchemaProcessor<R: SchemaRenderer> {
    renderer: R,
}

impl<R: SchemaRenderer> SchemaProcessor<R> {
    pub fn new(renderer: R) -> Self {
        Self { renderer }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Render the first schema in `text`. A database without schemas leaves
    /// the current diagram alone and returns `Ok(None)`; any failure clears it.
    pub fn render_text(&mut self, text: &str) -> Result<Option<RenderSummary>, ProcessError> {
        let result = self.process(text);
        if let Err(e) = &result {
            tracing::warn!(error = %e, "schema rejected, clearing diagram");
            self.renderer.clear();
        }
        result
    }

    fn process(&mut self, text: &str) -> Result<Option<RenderSummary>, ProcessError> {
        let database: Database = serde_json::from_str(text)?;
        let Some(schema) = database.schemas.first() else {
            tracing::debug!("no schemas in input");
            return Ok(None);
        };
        Ok(Some(self.renderer.render(schema)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use crate::schema::Schema;

    #[derive(Default)]
    struct Recorder {
        rendered: Vec<String>,
        clears: usize,
        fail_with: Option<RenderError>,
    }

    impl SchemaRenderer for Recorder {
        fn render(&mut self, schema: &Schema) -> Result<RenderSummary, RenderError> {
            if let Some(e) = self.fail_with.clone() {
                return Err(e);
            }
            self.rendered.push(schema.name.clone());
            Ok(RenderSummary {
                nodes: schema.tables.len(),
                ..Default::default()
            })
        }

        fn clear(&mut self) {
            self.clears += 1;
        }
    }

    #[test]
    fn test_renders_first_schema() {
        let mut p = SchemaProcessor::new(Recorder::default());
        let json = r#"{"schemas":[
            {"name":"a","tables":[{"name":"t","fields":[]}]},
            {"name":"b"}
        ]}"#;
        let summary = p.render_text(json).unwrap();
        assert_eq!(summary.map(|s| s.nodes), Some(1));
        assert_eq!(p.renderer().rendered, vec!["a"]);
        assert_eq!(p.renderer().clears, 0);
    }

    #[test]
    fn test_empty_database_is_ignored() {
        let mut p = SchemaProcessor::new(Recorder::default());
        assert_eq!(p.render_text(r#"{"schemas":[]}"#).unwrap(), None);
        assert!(p.renderer().rendered.is_empty());
        assert_eq!(p.renderer().clears, 0);
    }

    #[test]
    fn test_bad_text_clears() {
        let mut p = SchemaProcessor::new(Recorder::default());
        let err = p.render_text("Table users {").unwrap_err();
        assert!(matches!(err, ProcessError::Json(_)));
        assert_eq!(p.renderer().clears, 1);
    }

    #[test]
    fn test_render_error_clears() {
        let mut p = SchemaProcessor::new(Recorder {
            fail_with: Some(RenderError::TableNotFound {
                table: "ghosts".into(),
            }),
            ..Default::default()
        });
        let err = p.render_text(r#"{"schemas":[{"name":"a"}]}"#).unwrap_err();
        assert_eq!(err.to_string(), "Render error: Table not found: ghosts");
        assert_eq!(p.into_renderer().clears, 1);
    }
}
