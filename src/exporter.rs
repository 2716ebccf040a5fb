//! The export pipeline.

use crate::config::ExportConfig;
use crate::document::{geometry_path, geometry_reference, SceneDocument};
use crate::error::{ExportError, ExportWarning, Result};
use crate::export::{GeometryExporter, GeometryRequest};
use crate::serializer::{film, settings, SceneWalker};
use crate::transaction::SceneTransaction;
use crate::types::HostScene;
use std::path::{Path, PathBuf};

/// Result of a successful export.
#[derive(Debug)]
pub struct ExportReport {
    /// The document that was written.
    pub document: SceneDocument,
    /// Where the geometry exporter was asked to write.
    pub geometry_path: PathBuf,
    /// Number of mesh nodes written to the geometry file.
    pub exported_meshes: usize,
    /// Non-fatal problems. A non-empty list means a degraded export.
    pub warnings: Vec<ExportWarning>,
}

impl ExportReport {
    pub fn is_degraded(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Scene exporter.
pub struct Exporter {
    config: ExportConfig,
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter {
    /// Create an exporter with default configuration.
    pub fn new() -> Self {
        Self {
            config: ExportConfig::default(),
        }
    }

    /// Create an exporter with custom configuration.
    pub fn with_config(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Export `scene` to the document at `path` and its companion geometry file.
    ///
    /// The scene is mutated while the geometry exporter runs and is restored before
    /// this returns, also when the geometry export fails.
    pub fn export<S, G>(&self, scene: &mut S, geometry: &mut G, path: &Path) -> Result<ExportReport>
    where
        S: HostScene + ?Sized,
        G: GeometryExporter<S> + ?Sized,
    {
        log::info!("Exporting scene to {}", path.display());

        let has_camera = scene
            .nodes()
            .into_iter()
            .any(|id| scene.kind(id).is_camera());
        if !has_camera {
            return Err(ExportError::MissingRequiredNode("camera".to_string()));
        }

        let render_settings = scene.render_settings();
        render_settings.validate()?;

        let geometry_file = geometry_path(path, &self.config.geometry_extension);
        if geometry_file == path {
            return Err(ExportError::OutputConflict(geometry_file));
        }

        let walked =
            SceneWalker::new(&self.config, geometry_reference(&geometry_file)).walk(scene)?;
        log::info!(
            "Collected {} objects, {} cameras, {} materials",
            walked.objects.len(),
            walked.cameras.len(),
            walked.materials.len()
        );

        let request = GeometryRequest::renderer(&geometry_file, walked.selection);
        {
            let tx = SceneTransaction::begin(scene, &walked.captured);
            geometry
                .export_geometry(tx.scene(), &request)
                .map_err(|source| ExportError::GeometryExport {
                    path: geometry_file.clone(),
                    source,
                })?;
        }

        let document = SceneDocument {
            film: film(&render_settings, &self.config),
            cameras: walked.cameras,
            integrator: settings::integrator(&self.config),
            materials: walked.materials,
            objects: walked.objects,
        };
        document.write(path)?;

        for warning in &walked.warnings {
            log::warn!("{}", warning);
        }
        log::info!(
            "Wrote {} and {}",
            path.display(),
            geometry_file.display()
        );

        Ok(ExportReport {
            document,
            geometry_path: geometry_file,
            exported_meshes: request.selection.len(),
            warnings: walked.warnings,
        })
    }
}
