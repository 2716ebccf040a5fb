//! JSON scene description for [`MemoryScene`].

use crate::error::{ExportError, Result};
use crate::types::{
    HostScene, MaterialInfo, NodeId, NodeKind, ParentKind, ParentLink, RenderSettings,
};
use glam::Vec3;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

use super::{MemoryScene, MeshData, Trs};

/// Top-level scene description.
#[derive(Debug, Clone, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub settings: RenderSettings,
    /// Playback cursor. Defaults to the first frame.
    #[serde(default)]
    pub current_frame: Option<i32>,
    #[serde(default)]
    pub materials: Vec<MaterialInfo>,
    /// Mesh data keyed by mesh-data identity.
    #[serde(default)]
    pub meshes: BTreeMap<String, MeshData>,
    pub nodes: Vec<NodeDescription>,
    /// Timeline markers, in any order.
    #[serde(default)]
    pub markers: Vec<MarkerDescription>,
}

/// One scene node.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeDescription {
    pub name: String,
    pub kind: NodeKind,
    /// Material name from the `materials` list.
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub parent: Option<ParentDescription>,
    #[serde(default)]
    pub transform: TrsDescription,
    #[serde(default)]
    pub keys: Vec<KeyDescription>,
    /// Static field of view in degrees (cameras only).
    #[serde(default)]
    pub fov: Option<f32>,
    /// `[frame, degrees]` pairs (cameras only).
    #[serde(default)]
    pub fov_keys: Vec<(i32, f32)>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParentDescription {
    pub name: String,
    #[serde(default)]
    pub kind: ParentKind,
}

/// Translation, Euler rotation in degrees (XYZ) and scale.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct TrsDescription {
    pub translation: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
}

impl Default for TrsDescription {
    fn default() -> Self {
        Self {
            translation: [0.0; 3],
            rotation: [0.0; 3],
            scale: [1.0; 3],
        }
    }
}

impl TrsDescription {
    pub fn to_trs(&self) -> Trs {
        Trs::from_euler_degrees(
            Vec3::from(self.translation),
            Vec3::from(self.rotation),
            Vec3::from(self.scale),
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeyDescription {
    pub frame: i32,
    #[serde(flatten)]
    pub transform: TrsDescription,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarkerDescription {
    #[serde(default)]
    pub name: String,
    pub frame: i32,
    /// Name of the bound camera.
    #[serde(default)]
    pub camera: Option<String>,
}

impl SceneDescription {
    /// Build a [`MemoryScene`], resolving names to node handles.
    pub fn build(self) -> Result<MemoryScene> {
        self.settings.validate()?;
        let mut scene = MemoryScene::new(self.settings);
        if let Some(frame) = self.current_frame {
            scene.set_current_frame(frame);
        }

        let materials: HashMap<&str, &MaterialInfo> = self
            .materials
            .iter()
            .map(|m| (m.name.as_str(), m))
            .collect();

        for node in &self.nodes {
            if scene.find(&node.name).is_some() {
                return Err(ExportError::InvalidScene(format!(
                    "duplicate node name '{}'",
                    node.name
                )));
            }
            scene.add_node(node.name.clone(), node.kind.clone());
        }

        for (index, node) in self.nodes.iter().enumerate() {
            let id = NodeId(index);
            apply_node(&mut scene, id, node, &materials)?;
        }

        for marker in &self.markers {
            let camera = match &marker.camera {
                Some(name) => Some(scene.find(name).ok_or_else(|| {
                    ExportError::InvalidScene(format!(
                        "marker '{}' is bound to unknown camera '{}'",
                        marker.name, name
                    ))
                })?),
                None => None,
            };
            scene.add_marker(marker.name.clone(), marker.frame, camera);
        }

        for (name, data) in self.meshes {
            scene.add_mesh_data(name, data);
        }

        Ok(scene)
    }
}

fn apply_node(
    scene: &mut MemoryScene,
    id: NodeId,
    node: &NodeDescription,
    materials: &HashMap<&str, &MaterialInfo>,
) -> Result<()> {
    scene.set_local_transform(id, node.transform.to_trs().to_mat4());

    if let Some(parent) = &node.parent {
        let parent_id = scene.find(&parent.name).ok_or_else(|| {
            ExportError::InvalidScene(format!(
                "node '{}' has unknown parent '{}'",
                node.name, parent.name
            ))
        })?;
        scene.set_parent(
            id,
            Some(ParentLink {
                node: parent_id,
                kind: parent.kind,
            }),
        );
    }

    if let Some(name) = &node.material {
        let material = materials.get(name.as_str()).ok_or_else(|| {
            ExportError::InvalidScene(format!(
                "node '{}' uses unknown material '{}'",
                node.name, name
            ))
        })?;
        scene.set_material(id, (*material).clone());
    }

    for key in &node.keys {
        scene.add_key(id, key.frame, key.transform.to_trs());
    }

    if let Some(fov) = node.fov {
        scene.set_fov(id, fov);
    }
    for &(frame, fov) in &node.fov_keys {
        scene.add_fov_key(id, frame, fov);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r#"{
        "settings": {"frame_rate": 30, "frame_start": 1, "frame_end": 60},
        "materials": [{"name": "red", "diffuse": [0.8, 0.1, 0.1]}],
        "meshes": {"Box": {"positions": [[0,0,0],[1,0,0],[1,1,0]], "faces": [[0,1,2]]}},
        "nodes": [
            {"name": "Box", "kind": {"type": "mesh", "data": "Box"}, "material": "red",
             "transform": {"translation": [0, 0, 1]}},
            {"name": "Camera", "kind": {"type": "camera"}, "fov": 40,
             "parent": {"name": "Box"}},
            {"name": "Lamp", "kind": {"type": "light", "light": {"type": "point"}},
             "keys": [{"frame": 1}, {"frame": 10, "translation": [2, 0, 0]}]}
        ],
        "markers": [{"name": "cut", "frame": 5, "camera": "Camera"}]
    }"#;

    #[test]
    fn test_build_resolves_names() {
        let scene = MemoryScene::from_json(SCENE).unwrap();
        assert_eq!(scene.node_count(), 3);

        let camera = scene.find("Camera").unwrap();
        assert_eq!(scene.parent(camera), Some(ParentLink::object(NodeId(0))));
        assert_eq!(scene.camera_fov(camera), Some(40.0));
        assert_eq!(scene.material(NodeId(0)).unwrap().name, "red");
        assert_eq!(scene.markers()[0].camera, Some(camera));
        assert_eq!(scene.render_settings().frame_rate, 30.0);
        assert!(scene.mesh_data_for(NodeId(0)).is_some());
        assert!(scene.animation_range(NodeId(2)).is_some());
    }

    #[test]
    fn test_unknown_parent_is_rejected() {
        let json = r#"{"nodes": [{"name": "A", "kind": {"type": "implicit_surface"},
                        "parent": {"name": "Nope"}}]}"#;
        let err = MemoryScene::from_json(json).unwrap_err();
        assert!(matches!(err, ExportError::InvalidScene(_)));
    }

    #[test]
    fn test_zero_frame_rate_is_rejected() {
        let json = r#"{"settings": {"frame_rate": 0}, "nodes": []}"#;
        let err = MemoryScene::from_json(json).unwrap_err();
        assert!(matches!(err, ExportError::InvalidScene(_)));
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let json = r#"{"nodes": [
            {"name": "A", "kind": {"type": "camera"}},
            {"name": "A", "kind": {"type": "camera"}}
        ]}"#;
        assert!(MemoryScene::from_json(json).is_err());
    }
}
