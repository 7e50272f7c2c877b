use thiserror::Error;

use crate::shape::ShapeId;

/// Errors that can occur while editing, saving or loading a scene
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("You have not created any shapes")]
    EmptyScene,

    #[error("No shape with id {0} in the scene")]
    ShapeNotFound(ShapeId),

    #[error("Unknown shape kind {name:?} at record {index}")]
    UnknownShapeKind { index: usize, name: String },

    #[error("Malformed shape record at index {index}: {source}")]
    MalformedRecord {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid scene data: {0}")]
    InvalidScene(String),

    #[error("A polygon is still being drawn; finish it first")]
    PolygonInProgress,

    #[error("Cannot transition from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },

    #[error("Failed to (de)serialize scene: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to access scene file: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for editor operations
pub type EditorResult<T> = Result<T, EditorError>;
