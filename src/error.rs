//! Error types for the scene exporter.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using ExportError.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Boxed error returned by a [`GeometryExporter`](crate::GeometryExporter).
pub type GeometryError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for scene export operations.
#[derive(Error, Debug)]
pub enum ExportError {
    /// A node kind the renderer cannot do without is missing from the scene.
    #[error("Missing required node: {0}")]
    MissingRequiredNode(String),

    /// The external geometry exporter failed. The host scene has been restored.
    #[error("Geometry export to {path:?} failed: {source}")]
    GeometryExport {
        path: PathBuf,
        #[source]
        source: GeometryError,
    },

    /// I/O error while writing the scene document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to serialize or parse JSON data.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A parent chain loops back on itself.
    #[error("Cyclic parenting detected at node: {0}")]
    CyclicParenting(String),

    /// A scene description references something that does not exist, or its
    /// settings are unusable.
    #[error("Invalid scene: {0}")]
    InvalidScene(String),

    /// The document and the geometry file would be written to the same path.
    #[error("Document and geometry file share the path {0:?}")]
    OutputConflict(PathBuf),
}

/// Problems that degrade the export without aborting it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExportWarning {
    /// An area light uses a shape with no rectangular extent.
    #[error("area light '{light}' has unsupported shape '{shape}', geometry omitted")]
    UnsupportedLightShape { light: String, shape: String },
    /// A node has no material and was given the default one.
    #[error("node '{node}' has no material, using '{fallback}'")]
    UnresolvedMaterial { node: String, fallback: String },
}
