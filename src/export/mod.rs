//! Geometry file export.
//!
//! Mesh vertices are not written by the exporter itself: a [`GeometryExporter`]
//! (normally the host's own OBJ writer) is invoked with the primary mesh nodes while
//! the scene is in its rest pose.

pub mod obj;

pub use obj::ObjWriter;

use crate::error::GeometryError;
use crate::instance::SelectedMesh;
use std::path::PathBuf;

/// Coordinate axis, with sign, as understood by mesh writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
    NegX,
    NegY,
    NegZ,
}

/// Everything the geometry exporter is told.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryRequest {
    /// Output file.
    pub path: PathBuf,
    pub forward: Axis,
    pub up: Axis,
    pub include_uvs: bool,
    pub include_normals: bool,
    pub triangulate: bool,
    /// Nodes to write, with the model name each must be written under.
    pub selection: Vec<SelectedMesh>,
}

impl GeometryRequest {
    /// Request in the renderer's convention (forward Z, up Y) with UVs, normals and
    /// triangulation enabled.
    pub fn renderer(path: impl Into<PathBuf>, selection: Vec<SelectedMesh>) -> Self {
        Self {
            path: path.into(),
            forward: Axis::Z,
            up: Axis::Y,
            include_uvs: true,
            include_normals: true,
            triangulate: true,
            selection,
        }
    }
}

/// External writer for the companion geometry file.
pub trait GeometryExporter<S: ?Sized> {
    /// Write the selected nodes of `scene` as described by `request`.
    fn export_geometry(
        &mut self,
        scene: &S,
        request: &GeometryRequest,
    ) -> std::result::Result<(), GeometryError>;
}

impl<S: ?Sized, F> GeometryExporter<S> for F
where
    F: FnMut(&S, &GeometryRequest) -> std::result::Result<(), GeometryError>,
{
    fn export_geometry(
        &mut self,
        scene: &S,
        request: &GeometryRequest,
    ) -> std::result::Result<(), GeometryError> {
        self(scene, request)
    }
}
