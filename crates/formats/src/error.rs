use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a Topology document, found type {0:?}")]
    NotATopology(String),

    #[error("expected GeoJSON FeatureCollection")]
    NotAFeatureCollection,

    #[error("unrecognised boundary document type {0:?}")]
    UnknownDocument(String),

    #[error("topology has no object named {0:?}")]
    MissingObject(String),

    #[error("arc index {index} out of range ({count} arcs)")]
    ArcOutOfRange { index: i64, count: usize },

    #[error("position must have at least two numbers")]
    InvalidPosition,

    #[error("{kind} geometry has malformed {field}")]
    MalformedGeometry { kind: String, field: &'static str },

    #[error("unsupported geometry type: {0}")]
    UnsupportedGeometry(String),

    #[error("invalid feature at index {index}: {reason}")]
    InvalidFeature { index: usize, reason: String },
}
