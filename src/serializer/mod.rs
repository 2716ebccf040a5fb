//! Scene walker and per-kind serializers.
//!
//! The walker visits every host node once, snapshots it, and hands it to the
//! serializer for its kind. Meshes, implicit surfaces and lights become object
//! records; cameras go to a separate list.

mod camera;
mod light;
mod material;
mod mesh;
pub mod settings;

pub use camera::{active_at, CameraRecord, FieldOfView};
pub use light::{area_geometry, EmitterKind};
pub use material::{MaterialRecord, MaterialRegistry};
pub use settings::{film, FilmRecord};

use crate::animation::{self, KeyframeSpline};
use crate::config::ExportConfig;
use crate::error::{ExportWarning, Result};
use crate::instance::{InstanceDeduplicator, SelectedMesh};
use crate::space::SpaceConverter;
use crate::types::{HostScene, NodeId, NodeKind, SceneNode, TimelineMarker, TransformOp};
use serde::Serialize;

/// Whether an object only receives light or also emits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    Receiver,
    Emitter,
}

/// Shape of an object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Geometry {
    /// Named model inside the companion geometry file.
    Mesh { file: String, model: String },
    Sphere { radius: f32 },
    Rectangle { width: f32, height: f32 },
}

/// Static transform list or sampled animation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    Transform(Vec<TransformOp>),
    Keyframes(KeyframeSpline),
}

impl Placement {
    pub fn is_animated(&self) -> bool {
        matches!(self, Placement::Keyframes(_))
    }
}

/// One entry of the document's `objects` list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ObjectType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emitter: Option<EmitterKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emission: Option<[f32; 4]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
    #[serde(flatten)]
    pub placement: Placement,
}

/// Everything gathered in one pass over the scene.
#[derive(Debug)]
pub struct WalkOutput {
    pub objects: Vec<ObjectRecord>,
    pub cameras: Vec<CameraRecord>,
    pub materials: Vec<MaterialRecord>,
    /// Primary mesh nodes for the geometry export.
    pub selection: Vec<SelectedMesh>,
    /// Node snapshots, used to restore the scene after the geometry export.
    pub captured: Vec<SceneNode>,
    pub warnings: Vec<ExportWarning>,
}

/// Single-pass scene walker.
pub struct SceneWalker<'c> {
    config: &'c ExportConfig,
    geometry_file: String,
    frame_rate: f32,
    markers: Vec<TimelineMarker>,
    instances: InstanceDeduplicator,
    materials: MaterialRegistry,
    objects: Vec<ObjectRecord>,
    cameras: Vec<CameraRecord>,
    captured: Vec<SceneNode>,
    warnings: Vec<ExportWarning>,
}

impl<'c> SceneWalker<'c> {
    /// Create a walker whose mesh records reference `geometry_file`.
    pub fn new(config: &'c ExportConfig, geometry_file: impl Into<String>) -> Self {
        Self {
            config,
            geometry_file: geometry_file.into(),
            frame_rate: 24.0,
            markers: Vec::new(),
            instances: InstanceDeduplicator::new(),
            materials: MaterialRegistry::new(&config.default_material),
            objects: Vec::new(),
            cameras: Vec::new(),
            captured: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Visit every node of `scene`.
    pub fn walk<S: HostScene + ?Sized>(mut self, scene: &mut S) -> Result<WalkOutput> {
        self.frame_rate = scene.render_settings().frame_rate;
        self.markers = scene.markers();

        for id in scene.nodes() {
            self.visit(scene, id)?;
        }

        Ok(WalkOutput {
            objects: self.objects,
            cameras: self.cameras,
            materials: self.materials.into_records(),
            selection: self.instances.selection().to_vec(),
            captured: self.captured,
            warnings: self.warnings,
        })
    }

    fn visit<S: HostScene + ?Sized>(&mut self, scene: &mut S, id: NodeId) -> Result<()> {
        let node = SceneNode::capture(scene, id);
        log::debug!("Classifying '{}' as {}", node.name, node.kind.label());

        match &node.kind {
            NodeKind::Mesh { data } => {
                let record = self.mesh(scene, &node, data)?;
                self.objects.push(record);
            }
            NodeKind::ImplicitSurface => {
                let record = self.implicit_surface(scene, &node)?;
                self.objects.push(record);
            }
            NodeKind::Light { light } => {
                let record = self.light(scene, &node, light)?;
                self.objects.push(record);
            }
            NodeKind::Camera => {
                let record = self.camera(scene, &node)?;
                self.cameras.push(record);
            }
        }

        self.captured.push(node);
        Ok(())
    }

    /// Material name for a node, falling back to the reserved default.
    fn resolve_material(&mut self, node: &SceneNode) -> String {
        match &node.material {
            Some(material) => self.materials.register(material),
            None => {
                let fallback = self.materials.default_name().to_string();
                log::debug!("'{}' has no material, using '{}'", node.name, fallback);
                self.warnings.push(ExportWarning::UnresolvedMaterial {
                    node: node.name.clone(),
                    fallback: fallback.clone(),
                });
                fallback
            }
        }
    }

    /// Keyframes when the node or an ancestor is animated, its captured world
    /// transform otherwise. `suffix` is appended to every transform list.
    fn placement<S: HostScene + ?Sized>(
        &self,
        scene: &mut S,
        node: &SceneNode,
        converter: SpaceConverter,
        suffix: &[TransformOp],
    ) -> Result<Placement> {
        match animation::sample(scene, node.id, converter, self.frame_rate)? {
            Some(mut spline) => {
                for point in &mut spline.control_points {
                    point.transform.extend_from_slice(suffix);
                }
                Ok(Placement::Keyframes(spline))
            }
            None => {
                let mut ops = vec![TransformOp::matrix(converter.apply(node.world))];
                ops.extend_from_slice(suffix);
                Ok(Placement::Transform(ops))
            }
        }
    }
}
