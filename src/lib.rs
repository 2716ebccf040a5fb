//! # Tray Exporter
//!
//! Exports a host 3D scene to the tray_rust renderer's scene format.
//!
//! ## Overview
//!
//! The exporter walks every node of a [`HostScene`], turns meshes, implicit
//! surfaces, lights and cameras into JSON records (sampling animated nodes into
//! keyframe splines) and writes a single scene document. Mesh vertex data goes to
//! a companion geometry file written by a [`GeometryExporter`], with each distinct
//! mesh data block written once.
//!
//! ## Quick Start
//!
//! ```ignore
//! use tray_exporter::{export_scene, MemoryScene, ObjWriter};
//!
//! let mut scene = MemoryScene::load("scene.json")?;
//! let report = export_scene(&mut scene, &mut ObjWriter::new(), "render/scene_tray.json")?;
//! println!("{} objects", report.document.objects.len());
//! ```
//!
//! ## Host Integration
//!
//! Implement [`HostScene`] for your scene graph and [`GeometryExporter`] for your
//! mesh writer, then drive an [`Exporter`]:
//!
//! ```ignore
//! use tray_exporter::{ExportConfig, Exporter};
//!
//! let exporter = Exporter::with_config(ExportConfig::default().with_samples(64));
//! let report = exporter.export(&mut my_scene, &mut my_obj_writer, path)?;
//! for warning in &report.warnings {
//!     eprintln!("{}", warning);
//! }
//! ```

pub mod animation;
pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod exporter;
pub mod host;
pub mod instance;
pub mod serializer;
pub mod space;
pub mod transaction;
pub mod types;

// Re-export main types for convenience
pub use config::{ExportConfig, FilterSettings, IntegratorSettings, MaterialSettings};
pub use document::SceneDocument;
pub use error::{ExportError, ExportWarning, GeometryError, Result};
pub use export::{GeometryExporter, GeometryRequest, ObjWriter};
pub use exporter::{ExportReport, Exporter};
pub use host::{MemoryScene, MeshData, SceneDescription};
pub use instance::{InstanceDeduplicator, SelectedMesh};
pub use space::{to_geometry_file_space, to_renderer_space};
pub use types::{
    AreaShape, FrameRange, HostScene, LightData, MaterialInfo, NodeId, NodeKind, ParentKind,
    ParentLink, RenderSettings, TimelineMarker, TransformOp,
};

/// Export `scene` to `path` with the default configuration.
pub fn export_scene<S, G, P>(scene: &mut S, geometry: &mut G, path: P) -> Result<ExportReport>
where
    S: HostScene + ?Sized,
    G: GeometryExporter<S> + ?Sized,
    P: AsRef<std::path::Path>,
{
    Exporter::new().export(scene, geometry, path.as_ref())
}

/// Load a scene description from a JSON file.
pub fn load_scene<P: AsRef<std::path::Path>>(path: P) -> Result<MemoryScene> {
    MemoryScene::load(path)
}
