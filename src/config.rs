//! Export configuration.
//!
//! Everything the host scene does not provide: renderer settings and the fixed
//! emission and material defaults. Loadable from JSON; missing fields keep their
//! defaults.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Material used for nodes without one, and for area lights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialSettings {
    pub name: String,
    pub diffuse: [f32; 3],
    pub roughness: f32,
}

impl Default for MaterialSettings {
    fn default() -> Self {
        Self {
            name: "white_wall".to_string(),
            diffuse: [0.740063, 0.742313, 0.733934],
            roughness: 1.0,
        }
    }
}

/// Light transport settings, written verbatim as the document's `integrator`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegratorSettings {
    #[serde(rename = "type")]
    pub kind: String,
    pub min_depth: u32,
    pub max_depth: u32,
}

impl Default for IntegratorSettings {
    fn default() -> Self {
        Self {
            kind: "pathtracer".to_string(),
            min_depth: 4,
            max_depth: 8,
        }
    }
}

/// Reconstruction filter, written verbatim as `film.filter`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    #[serde(rename = "type")]
    pub kind: String,
    pub width: f32,
    pub height: f32,
    pub b: f32,
    pub c: f32,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            kind: "mitchell_netravali".to_string(),
            width: 2.0,
            height: 2.0,
            b: 1.0 / 3.0,
            c: 1.0 / 3.0,
        }
    }
}

/// Main exporter configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Reserved material for unassigned nodes and area lights.
    pub default_material: MaterialSettings,
    pub integrator: IntegratorSettings,
    pub filter: FilterSettings,
    /// Emission of point lights: RGB color and strength.
    pub point_emission: [f32; 4],
    /// Emission of area lights: RGB color and strength.
    pub area_emission: [f32; 4],
    /// Radius of the sphere standing in for implicit surfaces.
    pub implicit_radius: f32,
    /// Extension of the companion geometry file.
    pub geometry_extension: String,
    /// Vertical field of view in degrees for cameras the host gives none.
    pub default_fov: f32,
    /// Append a horizontal mirror to camera transforms.
    pub mirror_cameras: bool,
    /// Override the host's samples per pixel.
    pub samples: Option<u32>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_material: MaterialSettings::default(),
            integrator: IntegratorSettings::default(),
            filter: FilterSettings::default(),
            point_emission: [1.0, 1.0, 1.0, 100.0],
            area_emission: [1.0, 0.772549, 0.560784, 40.0],
            implicit_radius: 1.0,
            geometry_extension: "obj".to_string(),
            default_fov: 39.6,
            mirror_cameras: true,
            samples: None,
        }
    }
}

impl ExportConfig {
    /// Load a configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Use a different integrator type.
    pub fn with_integrator(mut self, kind: &str) -> Self {
        self.integrator.kind = kind.to_string();
        self
    }

    /// Override the samples per pixel.
    pub fn with_samples(mut self, samples: u32) -> Self {
        self.samples = Some(samples);
        self
    }

    /// Replace the reserved default material.
    pub fn with_default_material(mut self, material: MaterialSettings) -> Self {
        self.default_material = material;
        self
    }
}
