//! The renderer's scene document.

use crate::config::IntegratorSettings;
use crate::error::Result;
use crate::serializer::{CameraRecord, FilmRecord, MaterialRecord, ObjectRecord};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Top-level JSON document read by the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneDocument {
    pub film: FilmRecord,
    pub cameras: Vec<CameraRecord>,
    pub integrator: IntegratorSettings,
    pub materials: Vec<MaterialRecord>,
    pub objects: Vec<ObjectRecord>,
}

impl SceneDocument {
    /// Pretty-printed JSON text.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the document to `path`.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

/// Companion geometry file path: the document path with its extension replaced.
pub fn geometry_path(document: &Path, extension: &str) -> PathBuf {
    document.with_extension(extension)
}

/// How mesh records refer to the geometry file: its file name, relative to the
/// document.
pub fn geometry_reference(geometry: &Path) -> String {
    geometry
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| geometry.to_string_lossy().into_owned())
}
