//! Camera records.

use super::{Placement, SceneWalker};
use crate::animation::{self, ScalarSpline};
use crate::error::Result;
use crate::space::SpaceConverter;
use crate::types::{HostScene, NodeId, SceneNode, TimelineMarker, TransformOp};
use serde::Serialize;

/// Vertical field of view in degrees, fixed or animated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldOfView {
    Fixed(f32),
    Animated(ScalarSpline),
}

/// One entry of the document's `cameras` list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CameraRecord {
    pub name: String,
    pub fov: FieldOfView,
    /// Frame at which the renderer switches to this camera.
    pub active_at: i32,
    #[serde(flatten)]
    pub placement: Placement,
}

/// Frame of the last marker bound to `camera`, in timeline order; 0 if none.
pub fn active_at(markers: &[TimelineMarker], camera: NodeId) -> i32 {
    markers
        .iter()
        .filter(|m| m.camera == Some(camera))
        .last()
        .map(|m| m.frame)
        .unwrap_or(0)
}

impl SceneWalker<'_> {
    pub(super) fn camera<S: HostScene + ?Sized>(
        &mut self,
        scene: &mut S,
        node: &SceneNode,
    ) -> Result<CameraRecord> {
        let fov = match animation::sample_fov(scene, node.id, self.frame_rate) {
            Some(spline) => FieldOfView::Animated(spline),
            None => FieldOfView::Fixed(
                scene
                    .camera_fov(node.id)
                    .unwrap_or(self.config.default_fov),
            ),
        };

        let mut suffix = Vec::new();
        if self.config.mirror_cameras {
            suffix.push(TransformOp::mirror_x());
        }
        let placement = self.placement(scene, node, SpaceConverter::Renderer, &suffix)?;

        Ok(CameraRecord {
            name: node.name.clone(),
            fov,
            active_at: active_at(&self.markers, node.id),
            placement,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExportConfig;
    use crate::host::{MemoryScene, Trs};
    use crate::types::{NodeKind, RenderSettings};
    use glam::Vec3;

    fn marker(frame: i32, camera: Option<NodeId>) -> TimelineMarker {
        TimelineMarker {
            name: format!("F_{}", frame),
            frame,
            camera,
        }
    }

    #[test]
    fn test_active_at_last_marker_wins() {
        let cam = NodeId(2);
        let markers = vec![marker(5, Some(cam)), marker(10, Some(cam))];
        assert_eq!(active_at(&markers, cam), 10);
    }

    #[test]
    fn test_active_at_ignores_other_cameras() {
        let markers = vec![marker(3, Some(NodeId(1))), marker(7, None)];
        assert_eq!(active_at(&markers, NodeId(0)), 0);
        assert_eq!(active_at(&markers, NodeId(1)), 3);
    }

    #[test]
    fn test_static_camera_record() {
        let mut scene = MemoryScene::new(RenderSettings::default());
        let cam = scene.add_node("Camera", NodeKind::Camera);
        scene.set_fov(cam, 40.0);

        let config = ExportConfig::default();
        let output = SceneWalker::new(&config, "scene.obj").walk(&mut scene).unwrap();
        let json = serde_json::to_value(&output.cameras[0]).unwrap();

        assert_eq!(json["fov"], 40.0);
        assert_eq!(json["active_at"], 0);
        assert_eq!(json["transform"][0]["type"], "matrix");
        assert_eq!(json["transform"][1]["type"], "scale");
    }

    #[test]
    fn test_animated_fov_record() {
        let mut scene = MemoryScene::new(RenderSettings::default());
        let cam = scene.add_node("Camera", NodeKind::Camera);
        scene.add_fov_key(cam, 1, 30.0);
        scene.add_fov_key(cam, 5, 70.0);
        scene.add_marker("cut", 12, Some(cam));

        let config = ExportConfig::default();
        let output = SceneWalker::new(&config, "scene.obj").walk(&mut scene).unwrap();
        let record = &output.cameras[0];

        match &record.fov {
            FieldOfView::Animated(spline) => {
                assert_eq!(spline.values.len(), 5);
                assert_eq!(spline.knots.len(), 7);
                assert_eq!(spline.degree, 1);
            }
            other => panic!("expected animated fov, got {:?}", other),
        }
        assert_eq!(record.active_at, 12);
        // FOV animation alone does not move the camera.
        assert!(!record.placement.is_animated());
    }

    #[test]
    fn test_mirror_can_be_disabled() {
        let mut scene = MemoryScene::new(RenderSettings::default());
        scene.add_node("Camera", NodeKind::Camera);

        let config = ExportConfig {
            mirror_cameras: false,
            ..Default::default()
        };
        let output = SceneWalker::new(&config, "scene.obj").walk(&mut scene).unwrap();
        match &output.cameras[0].placement {
            Placement::Transform(ops) => assert_eq!(ops.len(), 1),
            other => panic!("expected static placement, got {:?}", other),
        }
    }

    #[test]
    fn test_camera_without_fov_uses_configured_default() {
        let mut scene = MemoryScene::new(RenderSettings::default());
        scene.add_node("Camera", NodeKind::Camera);

        let config = ExportConfig {
            default_fov: 55.0,
            ..Default::default()
        };
        let output = SceneWalker::new(&config, "scene.obj").walk(&mut scene).unwrap();
        assert_eq!(output.cameras[0].fov, FieldOfView::Fixed(55.0));
    }

    #[test]
    fn test_animated_camera_mirrors_every_control_point() {
        let mut scene = MemoryScene::new(RenderSettings::default());
        let cam = scene.add_node("Camera", NodeKind::Camera);
        scene.add_key(cam, 1, Trs::default());
        scene.add_key(cam, 4, Trs::from_translation(Vec3::new(0.0, 3.0, 0.0)));

        let config = ExportConfig::default();
        let output = SceneWalker::new(&config, "scene.obj").walk(&mut scene).unwrap();

        let spline = match &output.cameras[0].placement {
            Placement::Keyframes(spline) => spline,
            other => panic!("expected keyframes, got {:?}", other),
        };
        assert_eq!(spline.control_points.len(), 4);
        for point in &spline.control_points {
            assert_eq!(point.transform.len(), 2);
            assert!(matches!(point.transform[0], TransformOp::Matrix { .. }));
            assert_eq!(point.transform[1], TransformOp::mirror_x());
        }
    }
}

