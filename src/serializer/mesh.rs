//! Mesh and implicit surface records.

use super::{Geometry, ObjectRecord, ObjectType, SceneWalker};
use crate::error::Result;
use crate::space::SpaceConverter;
use crate::types::{HostScene, SceneNode};

impl SceneWalker<'_> {
    /// Mesh node: a receiver pointing at its model in the geometry file.
    pub(super) fn mesh<S: HostScene + ?Sized>(
        &mut self,
        scene: &mut S,
        node: &SceneNode,
        data: &str,
    ) -> Result<ObjectRecord> {
        let instance = self.instances.resolve(data, node.id, &node.name);
        let material = self.resolve_material(node);
        let placement = self.placement(scene, node, SpaceConverter::GeometryFile, &[])?;

        Ok(ObjectRecord {
            name: node.name.clone(),
            kind: ObjectType::Receiver,
            material: Some(material),
            emitter: None,
            emission: None,
            geometry: Some(Geometry::Mesh {
                file: self.geometry_file.clone(),
                model: instance.model,
            }),
            placement,
        })
    }

    /// Implicit surface: approximated by a sphere, never deduplicated.
    pub(super) fn implicit_surface<S: HostScene + ?Sized>(
        &mut self,
        scene: &mut S,
        node: &SceneNode,
    ) -> Result<ObjectRecord> {
        let material = self.resolve_material(node);
        let placement = self.placement(scene, node, SpaceConverter::Renderer, &[])?;

        Ok(ObjectRecord {
            name: node.name.clone(),
            kind: ObjectType::Receiver,
            material: Some(material),
            emitter: None,
            emission: None,
            geometry: Some(Geometry::Sphere {
                radius: self.config.implicit_radius,
            }),
            placement,
        })
    }
}
