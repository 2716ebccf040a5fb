//! In-memory host scene.

use crate::error::Result;
use crate::types::{
    FrameRange, HostScene, MaterialInfo, NodeId, NodeKind, ParentLink, RenderSettings,
    TimelineMarker,
};
use glam::{Mat4, Quat, Vec3};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use super::SceneDescription;

/// Maximum parent chain length evaluated for world transforms.
const MAX_PARENT_DEPTH: usize = 256;

/// Translation, rotation and scale of a node relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trs {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Trs {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Trs {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Build from Euler angles in degrees (XYZ order).
    pub fn from_euler_degrees(translation: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::from_euler(
                glam::EulerRot::XYZ,
                rotation.x.to_radians(),
                rotation.y.to_radians(),
                rotation.z.to_radians(),
            ),
            scale,
        }
    }

    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Componentwise interpolation, spherical for the rotation.
    pub fn lerp(&self, other: &Trs, t: f32) -> Trs {
        Trs {
            translation: self.translation.lerp(other.translation, t),
            rotation: self.rotation.slerp(other.rotation, t),
            scale: self.scale.lerp(other.scale, t),
        }
    }
}

/// Polygon data for one mesh-data block.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MeshData {
    /// Vertex positions.
    pub positions: Vec<[f32; 3]>,
    /// Per-vertex normals. Empty when the mesh has none.
    #[serde(default)]
    pub normals: Vec<[f32; 3]>,
    /// Per-vertex texture coordinates. Empty when the mesh has none.
    #[serde(default)]
    pub uvs: Vec<[f32; 2]>,
    /// Polygons as vertex index loops.
    pub faces: Vec<Vec<u32>>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Triangles after fan triangulation.
    pub fn triangle_count(&self) -> usize {
        self.faces.iter().map(|f| f.len().saturating_sub(2)).sum()
    }
}

#[derive(Debug, Clone)]
struct MemoryNode {
    name: String,
    kind: NodeKind,
    material: Option<MaterialInfo>,
    parent: Option<ParentLink>,
    local: Mat4,
    keys: Vec<(i32, Trs)>,
    muted: bool,
    fov: Option<f32>,
    fov_keys: Vec<(i32, f32)>,
}

/// A host scene held entirely in memory.
#[derive(Debug, Clone)]
pub struct MemoryScene {
    settings: RenderSettings,
    nodes: Vec<MemoryNode>,
    meshes: BTreeMap<String, MeshData>,
    markers: Vec<TimelineMarker>,
    current_frame: i32,
}

impl MemoryScene {
    /// Create an empty scene with the cursor on the first frame.
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            nodes: Vec::new(),
            meshes: BTreeMap::new(),
            markers: Vec::new(),
            current_frame: settings.frame_start,
        }
    }

    /// Load a scene description from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a scene description from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let description: SceneDescription = serde_json::from_str(json)?;
        description.build()
    }

    /// Add a node with an identity transform and return its handle.
    pub fn add_node(&mut self, name: impl Into<String>, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(MemoryNode {
            name: name.into(),
            kind,
            material: None,
            parent: None,
            local: Mat4::IDENTITY,
            keys: Vec::new(),
            muted: false,
            fov: None,
            fov_keys: Vec::new(),
        });
        id
    }

    /// Find a node by name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name).map(NodeId)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn set_material(&mut self, node: NodeId, material: MaterialInfo) {
        self.nodes[node.0].material = Some(material);
    }

    /// Add a transform keyframe. Keys stay sorted by frame; a key on an existing
    /// frame replaces it.
    pub fn add_key(&mut self, node: NodeId, frame: i32, trs: Trs) {
        insert_key(&mut self.nodes[node.0].keys, frame, trs);
    }

    /// Set the static field of view of a camera, in degrees.
    pub fn set_fov(&mut self, camera: NodeId, fov: f32) {
        self.nodes[camera.0].fov = Some(fov);
    }

    /// Add a field-of-view keyframe to a camera.
    pub fn add_fov_key(&mut self, camera: NodeId, frame: i32, fov: f32) {
        insert_key(&mut self.nodes[camera.0].fov_keys, frame, fov);
    }

    pub fn add_marker(&mut self, name: impl Into<String>, frame: i32, camera: Option<NodeId>) {
        self.markers.push(TimelineMarker {
            name: name.into(),
            frame,
            camera,
        });
    }

    pub fn add_mesh_data(&mut self, name: impl Into<String>, data: MeshData) {
        self.meshes.insert(name.into(), data);
    }

    pub fn mesh_data(&self, name: &str) -> Option<&MeshData> {
        self.meshes.get(name)
    }

    /// Mesh data referenced by a mesh node.
    pub fn mesh_data_for(&self, node: NodeId) -> Option<&MeshData> {
        match &self.nodes[node.0].kind {
            NodeKind::Mesh { data } => self.meshes.get(data),
            _ => None,
        }
    }

    /// Local transform at the current frame, animation applied unless muted.
    pub fn evaluated_local(&self, node: NodeId) -> Mat4 {
        let n = &self.nodes[node.0];
        if n.muted {
            return n.local;
        }
        sample_keys(&n.keys, self.current_frame, |a, b, t| a.lerp(&b, t))
            .map(|trs| trs.to_mat4())
            .unwrap_or(n.local)
    }
}

impl HostScene for MemoryScene {
    fn nodes(&self) -> Vec<NodeId> {
        (0..self.nodes.len()).map(NodeId).collect()
    }

    fn name(&self, node: NodeId) -> &str {
        &self.nodes[node.0].name
    }

    fn kind(&self, node: NodeId) -> &NodeKind {
        &self.nodes[node.0].kind
    }

    fn material(&self, node: NodeId) -> Option<MaterialInfo> {
        self.nodes[node.0].material.clone()
    }

    fn parent(&self, node: NodeId) -> Option<ParentLink> {
        self.nodes[node.0].parent
    }

    fn set_parent(&mut self, node: NodeId, parent: Option<ParentLink>) {
        self.nodes[node.0].parent = parent;
    }

    fn local_transform(&self, node: NodeId) -> Mat4 {
        self.nodes[node.0].local
    }

    fn set_local_transform(&mut self, node: NodeId, transform: Mat4) {
        self.nodes[node.0].local = transform;
    }

    fn world_transform(&self, node: NodeId) -> Mat4 {
        let mut world = self.evaluated_local(node);
        let mut current = self.nodes[node.0].parent;
        let mut depth = 0;

        while let Some(link) = current {
            depth += 1;
            if depth > MAX_PARENT_DEPTH {
                log::warn!(
                    "Parent chain of '{}' exceeds {} levels, truncating",
                    self.nodes[node.0].name,
                    MAX_PARENT_DEPTH
                );
                break;
            }
            world = self.evaluated_local(link.node) * world;
            current = self.nodes[link.node.0].parent;
        }

        world
    }

    fn animation_range(&self, node: NodeId) -> Option<FrameRange> {
        key_range(&self.nodes[node.0].keys)
    }

    fn is_animation_muted(&self, node: NodeId) -> bool {
        self.nodes[node.0].muted
    }

    fn set_animation_muted(&mut self, node: NodeId, muted: bool) {
        self.nodes[node.0].muted = muted;
    }

    fn camera_fov(&self, node: NodeId) -> Option<f32> {
        let n = &self.nodes[node.0];
        if !n.kind.is_camera() {
            return None;
        }
        if !n.muted {
            if let Some(fov) = sample_keys(&n.fov_keys, self.current_frame, |a, b, t| {
                a + (b - a) * t
            }) {
                return Some(fov);
            }
        }
        n.fov
    }

    fn fov_animation_range(&self, node: NodeId) -> Option<FrameRange> {
        let n = &self.nodes[node.0];
        if !n.kind.is_camera() {
            return None;
        }
        key_range(&n.fov_keys)
    }

    fn current_frame(&self) -> i32 {
        self.current_frame
    }

    fn set_current_frame(&mut self, frame: i32) {
        self.current_frame = frame;
    }

    fn render_settings(&self) -> RenderSettings {
        self.settings
    }

    fn markers(&self) -> Vec<TimelineMarker> {
        let mut markers = self.markers.clone();
        // Stable: markers on the same frame keep insertion order.
        markers.sort_by_key(|m| m.frame);
        markers
    }
}

fn insert_key<T>(keys: &mut Vec<(i32, T)>, frame: i32, value: T) {
    match keys.binary_search_by_key(&frame, |(f, _)| *f) {
        Ok(i) => keys[i] = (frame, value),
        Err(i) => keys.insert(i, (frame, value)),
    }
}

fn key_range<T>(keys: &[(i32, T)]) -> Option<FrameRange> {
    let first = keys.first()?.0;
    let last = keys.last()?.0;
    Some(FrameRange::new(first, last))
}

/// Linear interpolation between sorted keys, clamped at both ends.
fn sample_keys<T: Copy>(keys: &[(i32, T)], frame: i32, lerp: impl Fn(T, T, f32) -> T) -> Option<T> {
    let (first, last) = (keys.first()?, keys.last()?);
    if frame <= first.0 {
        return Some(first.1);
    }
    if frame >= last.0 {
        return Some(last.1);
    }

    let next = keys.partition_point(|(f, _)| *f <= frame);
    let (f0, v0) = keys[next - 1];
    let (f1, v1) = keys[next];
    if f0 == frame {
        return Some(v0);
    }
    let t = (frame - f0) as f32 / (f1 - f0) as f32;
    Some(lerp(v0, v1, t))
}
