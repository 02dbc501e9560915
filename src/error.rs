//! Error types for the diagram engine.

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Canvas surface id not set; it is required to initialize the canvas")]
    MissingSurfaceId,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Table not found: {table}")]
    TableNotFound { table: String },
    #[error("Row not found in table {table}: {}", fields.join(", "))]
    RowNotFound { table: String, fields: Vec<String> },
    #[error("Header undefined for table {table}")]
    HeaderUndefined { table: String },
    #[error("Relation {name:?} must have exactly two endpoints, found {found}")]
    EndpointCount { name: String, found: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("Schema parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}
