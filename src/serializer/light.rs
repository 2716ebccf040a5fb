//! Light records.

use super::{Geometry, ObjectRecord, ObjectType, SceneWalker};
use crate::error::{ExportWarning, Result};
use crate::space::SpaceConverter;
use crate::types::{AreaShape, HostScene, LightData, SceneNode};
use serde::Serialize;

/// Renderer emitter kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmitterKind {
    Point,
    Area,
}

/// Planar extent of an area light. `None` for shapes without one.
pub fn area_geometry(shape: AreaShape, size: f32, size_y: f32) -> Option<Geometry> {
    match shape {
        AreaShape::Square => Some(Geometry::Rectangle {
            width: size,
            height: size,
        }),
        AreaShape::Rectangle => Some(Geometry::Rectangle {
            width: size,
            height: size_y,
        }),
        AreaShape::Disk | AreaShape::Ellipse => None,
    }
}

impl SceneWalker<'_> {
    pub(super) fn light<S: HostScene + ?Sized>(
        &mut self,
        scene: &mut S,
        node: &SceneNode,
        light: &LightData,
    ) -> Result<ObjectRecord> {
        let placement = self.placement(scene, node, SpaceConverter::Renderer, &[])?;

        let record = match *light {
            LightData::Point => ObjectRecord {
                name: node.name.clone(),
                kind: ObjectType::Emitter,
                material: None,
                emitter: Some(EmitterKind::Point),
                emission: Some(self.config.point_emission),
                geometry: None,
                placement,
            },
            LightData::Area {
                shape,
                size,
                size_y,
            } => {
                let geometry = area_geometry(shape, size, size_y);
                if geometry.is_none() {
                    let warning = ExportWarning::UnsupportedLightShape {
                        light: node.name.clone(),
                        shape: shape.name().to_string(),
                    };
                    log::debug!("{}", warning);
                    self.warnings.push(warning);
                }

                ObjectRecord {
                    name: node.name.clone(),
                    kind: ObjectType::Emitter,
                    material: Some(self.materials.default_name().to_string()),
                    emitter: Some(EmitterKind::Area),
                    emission: Some(self.config.area_emission),
                    geometry,
                    placement,
                }
            }
        };

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExportConfig;
    use crate::host::MemoryScene;
    use crate::types::{NodeKind, RenderSettings};

    fn export_light(light: LightData) -> super::super::WalkOutput {
        let mut scene = MemoryScene::new(RenderSettings::default());
        scene.add_node("Lamp", NodeKind::Light { light });
        let config = ExportConfig::default();
        SceneWalker::new(&config, "scene.obj").walk(&mut scene).unwrap()
    }

    #[test]
    fn test_point_light() {
        let output = export_light(LightData::Point);
        let record = &output.objects[0];
        assert_eq!(record.kind, ObjectType::Emitter);
        assert_eq!(record.emitter, Some(EmitterKind::Point));
        assert_eq!(record.emission, Some([1.0, 1.0, 1.0, 100.0]));
        assert!(record.geometry.is_none());
        assert!(record.material.is_none());
    }

    #[test]
    fn test_square_area_light() {
        let output = export_light(LightData::Area {
            shape: AreaShape::Square,
            size: 2.0,
            size_y: 0.0,
        });
        let record = &output.objects[0];
        assert_eq!(record.emitter, Some(EmitterKind::Area));
        assert_eq!(
            record.geometry,
            Some(Geometry::Rectangle {
                width: 2.0,
                height: 2.0
            })
        );
        assert_eq!(record.material.as_deref(), Some("white_wall"));
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_rectangle_area_light() {
        assert_eq!(
            area_geometry(AreaShape::Rectangle, 3.0, 0.5),
            Some(Geometry::Rectangle {
                width: 3.0,
                height: 0.5
            })
        );
    }

    #[test]
    fn test_disk_area_light_is_degraded() {
        let output = export_light(LightData::Area {
            shape: AreaShape::Disk,
            size: 1.0,
            size_y: 0.0,
        });
        let record = &output.objects[0];
        assert!(record.geometry.is_none());
        assert_eq!(record.emitter, Some(EmitterKind::Area));
        assert_eq!(
            output.warnings,
            vec![ExportWarning::UnsupportedLightShape {
                light: "Lamp".into(),
                shape: "disk".into()
            }]
        );
    }
}
