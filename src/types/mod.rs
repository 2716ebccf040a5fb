//! Shared types used throughout the library.

mod transform;

pub use transform::{matrix_rows, TransformOp};

use crate::error::{ExportError, Result};
use glam::Mat4;
use serde::{Deserialize, Serialize};

/// Host-defined handle for a scene node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Closed set of node kinds the exporter understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    /// Polygon mesh backed by shareable mesh data.
    Mesh {
        /// Mesh-data identity, distinct from the node name.
        data: String,
    },
    /// Metaball-style primitive, exported as an analytic sphere.
    ImplicitSurface,
    /// Light source.
    Light { light: LightData },
    /// Camera.
    Camera,
}

impl NodeKind {
    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Mesh { .. } => "mesh",
            NodeKind::ImplicitSurface => "implicit surface",
            NodeKind::Light { .. } => "light",
            NodeKind::Camera => "camera",
        }
    }

    pub fn is_camera(&self) -> bool {
        matches!(self, NodeKind::Camera)
    }
}

/// Host light parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LightData {
    Point,
    Area {
        shape: AreaShape,
        /// Edge length (square) or width (rectangle).
        size: f32,
        /// Height, only meaningful for rectangles.
        #[serde(default)]
        size_y: f32,
    },
}

/// Shapes a host area light can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaShape {
    Square,
    Rectangle,
    Disk,
    Ellipse,
}

impl AreaShape {
    pub fn name(&self) -> &'static str {
        match self {
            AreaShape::Square => "square",
            AreaShape::Rectangle => "rectangle",
            AreaShape::Disk => "disk",
            AreaShape::Ellipse => "ellipse",
        }
    }
}

/// How a child is attached to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentKind {
    /// Plain object-to-object parenting.
    #[default]
    Object,
    /// Attached to an armature bone.
    Bone,
    /// Attached to mesh vertices.
    Vertex,
}

/// Non-owning parent relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentLink {
    pub node: NodeId,
    pub kind: ParentKind,
}

impl ParentLink {
    pub fn object(node: NodeId) -> Self {
        Self {
            node,
            kind: ParentKind::Object,
        }
    }
}

/// Inclusive range of integer frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRange {
    pub start: i32,
    pub end: i32,
}

impl FrameRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    /// Smallest range covering both.
    pub fn union(self, other: FrameRange) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Number of frames in the range.
    pub fn len(&self) -> usize {
        (self.end - self.start + 1) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
}

/// Material assigned to a node in the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialInfo {
    pub name: String,
    pub diffuse: [f32; 3],
}

/// Timeline marker, optionally bound to a camera.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineMarker {
    pub name: String,
    pub frame: i32,
    pub camera: Option<NodeId>,
}

/// Global render and playback settings read from the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Frames per second.
    pub frame_rate: f32,
    /// First frame of the scene (one-based).
    pub frame_start: i32,
    /// Last frame of the scene, inclusive.
    pub frame_end: i32,
    pub width: u32,
    pub height: u32,
    /// Samples per pixel.
    pub samples: u32,
}

impl RenderSettings {
    /// Reject settings that would produce non-finite frame times.
    pub fn validate(&self) -> Result<()> {
        if !self.frame_rate.is_finite() || self.frame_rate <= 0.0 {
            return Err(ExportError::InvalidScene(format!(
                "frame rate must be positive and finite, got {}",
                self.frame_rate
            )));
        }
        Ok(())
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            frame_rate: 24.0,
            frame_start: 1,
            frame_end: 1,
            width: 1280,
            height: 720,
            samples: 16,
        }
    }
}

/// Read/write view of the host application's scene.
///
/// Node handles passed to these methods must come from [`nodes()`](HostScene::nodes).
/// The exporter only writes parent links, local transforms, animation mute flags and
/// the playback cursor, and restores each of them before returning.
pub trait HostScene {
    /// All nodes in scene order.
    fn nodes(&self) -> Vec<NodeId>;

    /// Node name, unique within the scene.
    fn name(&self, node: NodeId) -> &str;

    fn kind(&self, node: NodeId) -> &NodeKind;

    /// Active material, if any.
    fn material(&self, node: NodeId) -> Option<MaterialInfo>;

    fn parent(&self, node: NodeId) -> Option<ParentLink>;

    fn set_parent(&mut self, node: NodeId, parent: Option<ParentLink>);

    /// Transform relative to the parent.
    fn local_transform(&self, node: NodeId) -> Mat4;

    fn set_local_transform(&mut self, node: NodeId, transform: Mat4);

    /// Fully resolved world transform at the current frame.
    fn world_transform(&self, node: NodeId) -> Mat4;

    /// Frame range of the node's own animation, if it has any.
    fn animation_range(&self, node: NodeId) -> Option<FrameRange>;

    fn is_animation_muted(&self, node: NodeId) -> bool;

    fn set_animation_muted(&mut self, node: NodeId, muted: bool);

    /// Vertical field of view in degrees at the current frame. `None` for non-cameras
    /// and for cameras without a value.
    fn camera_fov(&self, node: NodeId) -> Option<f32>;

    /// Frame range of the camera's field-of-view animation, if any.
    fn fov_animation_range(&self, node: NodeId) -> Option<FrameRange>;

    /// Playback cursor (one-based frame).
    fn current_frame(&self) -> i32;

    fn set_current_frame(&mut self, frame: i32);

    fn render_settings(&self) -> RenderSettings;

    /// Timeline markers in timeline order.
    fn markers(&self) -> Vec<TimelineMarker>;
}

/// Snapshot of a node taken when the walker classifies it.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    pub parent: Option<ParentLink>,
    pub local: Mat4,
    pub world: Mat4,
    pub animation: Option<FrameRange>,
    pub material: Option<MaterialInfo>,
}

impl SceneNode {
    /// Capture the node's current state.
    pub fn capture<S: HostScene + ?Sized>(scene: &S, id: NodeId) -> Self {
        Self {
            id,
            name: scene.name(id).to_string(),
            kind: scene.kind(id).clone(),
            parent: scene.parent(id),
            local: scene.local_transform(id),
            world: scene.world_transform(id),
            animation: scene.animation_range(id),
            material: scene.material(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_range_union() {
        let a = FrameRange::new(5, 10);
        let b = FrameRange::new(1, 7);
        let u = a.union(b);
        assert_eq!(u, FrameRange::new(1, 10));
        assert_eq!(u.len(), 10);
    }

    #[test]
    fn test_frame_range_normalizes_order() {
        let r = FrameRange::new(8, 3);
        assert_eq!(r.start, 3);
        assert_eq!(r.end, 8);
        assert!(!r.is_empty());
    }

    #[test]
    fn test_render_settings_reject_bad_frame_rate() {
        assert!(RenderSettings::default().validate().is_ok());
        for rate in [0.0, -24.0, f32::NAN, f32::INFINITY] {
            let settings = RenderSettings {
                frame_rate: rate,
                ..Default::default()
            };
            assert!(matches!(
                settings.validate(),
                Err(ExportError::InvalidScene(_))
            ));
        }
    }

    #[test]
    fn test_node_kind_parses_tagged_json() {
        let kind: NodeKind = serde_json::from_str(
            r#"{"type": "light", "light": {"type": "area", "shape": "rectangle", "size": 2.0, "size_y": 1.0}}"#,
        )
        .unwrap();
        assert_eq!(
            kind,
            NodeKind::Light {
                light: LightData::Area {
                    shape: AreaShape::Rectangle,
                    size: 2.0,
                    size_y: 1.0,
                }
            }
        );

        let mesh: NodeKind = serde_json::from_str(r#"{"type": "mesh", "data": "Box"}"#).unwrap();
        assert_eq!(mesh.label(), "mesh");
    }
}
