//! Wavefront OBJ geometry writer for [`MemoryScene`].
//!
//! Writes one `o` block per selected node, named after its model, with global
//! vertex, UV and normal pools as OBJ requires.

use super::{Axis, GeometryExporter, GeometryRequest};
use crate::error::GeometryError;
use crate::host::MemoryScene;
use crate::types::HostScene;
use glam::{Mat3, Vec3};
use std::fmt::Write;

impl Axis {
    pub fn to_vec3(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
            Axis::NegX => Vec3::NEG_X,
            Axis::NegY => Vec3::NEG_Y,
            Axis::NegZ => Vec3::NEG_Z,
        }
    }
}

/// Basis change from host axes (forward Y, up Z) to the requested ones. The
/// remaining axis is chosen so the basis stays right-handed.
pub fn axis_conversion(forward: Axis, up: Axis) -> Mat3 {
    let f = forward.to_vec3();
    let u = up.to_vec3();
    Mat3::from_cols(f.cross(u), f, u)
}

/// Writes OBJ files from in-memory mesh data.
#[derive(Debug, Default)]
pub struct ObjWriter {
    written: usize,
}

impl ObjWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of objects written by the last export.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Render the OBJ text for a request without touching the filesystem.
    pub fn to_obj_string(
        scene: &MemoryScene,
        request: &GeometryRequest,
    ) -> Result<String, GeometryError> {
        let conversion = axis_conversion(request.forward, request.up);

        let mut obj = String::new();
        writeln!(obj, "# tray-exporter OBJ Export")?;
        writeln!(obj, "# Objects: {}", request.selection.len())?;
        writeln!(obj)?;

        let (mut v_offset, mut vt_offset, mut vn_offset) = (1usize, 1usize, 1usize);

        for selected in &request.selection {
            let mesh = scene.mesh_data_for(selected.node).ok_or_else(|| {
                format!(
                    "node '{}' has no mesh data",
                    scene.name(selected.node)
                )
            })?;

            let world = scene.world_transform(selected.node);
            let normal_matrix = conversion * Mat3::from_mat4(world).inverse().transpose();
            let has_uvs = request.include_uvs && mesh.uvs.len() == mesh.positions.len();
            let has_normals =
                request.include_normals && mesh.normals.len() == mesh.positions.len();

            writeln!(obj, "o {}", selected.model)?;
            for p in &mesh.positions {
                let p = conversion * world.transform_point3(Vec3::from(*p));
                writeln!(obj, "v {} {} {}", p.x, p.y, p.z)?;
            }
            if has_uvs {
                for uv in &mesh.uvs {
                    writeln!(obj, "vt {} {}", uv[0], uv[1])?;
                }
            }
            if has_normals {
                for n in &mesh.normals {
                    let n = (normal_matrix * Vec3::from(*n)).normalize_or_zero();
                    writeln!(obj, "vn {} {} {}", n.x, n.y, n.z)?;
                }
            }

            for face in &mesh.faces {
                if face.len() < 3 {
                    log::warn!(
                        "Skipping degenerate face with {} vertices in model '{}'",
                        face.len(),
                        selected.model
                    );
                    continue;
                }
                if let Some(&bad) = face.iter().find(|&&i| i as usize >= mesh.positions.len()) {
                    return Err(format!(
                        "model '{}' references vertex {} of {}",
                        selected.model,
                        bad,
                        mesh.positions.len()
                    )
                    .into());
                }

                let corner = |i: u32| {
                    let i = i as usize;
                    match (has_uvs, has_normals) {
                        (true, true) => format!(
                            "{}/{}/{}",
                            i + v_offset,
                            i + vt_offset,
                            i + vn_offset
                        ),
                        (true, false) => format!("{}/{}", i + v_offset, i + vt_offset),
                        (false, true) => format!("{}//{}", i + v_offset, i + vn_offset),
                        (false, false) => format!("{}", i + v_offset),
                    }
                };

                if request.triangulate && face.len() > 3 {
                    for k in 1..face.len() - 1 {
                        writeln!(
                            obj,
                            "f {} {} {}",
                            corner(face[0]),
                            corner(face[k]),
                            corner(face[k + 1])
                        )?;
                    }
                } else {
                    let corners: Vec<String> = face.iter().map(|&i| corner(i)).collect();
                    writeln!(obj, "f {}", corners.join(" "))?;
                }
            }
            writeln!(obj)?;

            v_offset += mesh.positions.len();
            if has_uvs {
                vt_offset += mesh.uvs.len();
            }
            if has_normals {
                vn_offset += mesh.normals.len();
            }
        }

        Ok(obj)
    }
}

impl GeometryExporter<MemoryScene> for ObjWriter {
    fn export_geometry(
        &mut self,
        scene: &MemoryScene,
        request: &GeometryRequest,
    ) -> Result<(), GeometryError> {
        let obj = Self::to_obj_string(scene, request)?;
        std::fs::write(&request.path, obj)?;
        self.written = request.selection.len();
        log::info!(
            "Wrote {} objects to {}",
            self.written,
            request.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MeshData;
    use crate::instance::SelectedMesh;
    use crate::types::{NodeKind, RenderSettings};

    fn quad() -> MeshData {
        MeshData {
            positions: vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ],
            normals: vec![[0.0, 0.0, 1.0]; 4],
            uvs: vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
            faces: vec![vec![0, 1, 2, 3]],
        }
    }

    fn scene_with_quad() -> (MemoryScene, SelectedMesh) {
        let mut scene = MemoryScene::new(RenderSettings::default());
        let node = scene.add_node("Quad", NodeKind::Mesh { data: "Quad".into() });
        scene.add_mesh_data("Quad", quad());
        (
            scene,
            SelectedMesh {
                node,
                model: "Quad".into(),
            },
        )
    }

    #[test]
    fn test_axis_conversion_for_renderer() {
        let m = axis_conversion(Axis::Z, Axis::Y);
        assert_eq!(m * Vec3::new(1.0, 2.0, 3.0), Vec3::new(-1.0, 3.0, 2.0));
    }

    #[test]
    fn test_quad_is_triangulated() {
        let (scene, selected) = scene_with_quad();
        let request = GeometryRequest::renderer("unused.obj", vec![selected]);
        let obj = ObjWriter::to_obj_string(&scene, &request).unwrap();

        assert!(obj.contains("o Quad"));
        assert!(obj.contains("v -1 0 0"));
        assert!(obj.contains("vt 1 1"));
        assert!(obj.contains("vn 0 1 0"));
        assert!(obj.contains("f 1/1/1 2/2/2 3/3/3"));
        assert!(obj.contains("f 1/1/1 3/3/3 4/4/4"));
    }

    #[test]
    fn test_polygons_kept_without_triangulation() {
        let (scene, selected) = scene_with_quad();
        let mut request = GeometryRequest::renderer("unused.obj", vec![selected]);
        request.triangulate = false;
        request.include_uvs = false;
        request.include_normals = false;
        let obj = ObjWriter::to_obj_string(&scene, &request).unwrap();

        assert!(obj.contains("f 1 2 3 4"));
        assert!(!obj.contains("vt "));
    }

    #[test]
    fn test_missing_mesh_data_is_an_error() {
        let mut scene = MemoryScene::new(RenderSettings::default());
        let node = scene.add_node("Ghost", NodeKind::Mesh { data: "Ghost".into() });
        let request = GeometryRequest::renderer(
            "unused.obj",
            vec![SelectedMesh {
                node,
                model: "Ghost".into(),
            }],
        );
        assert!(ObjWriter::to_obj_string(&scene, &request).is_err());
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.obj");
        let (scene, selected) = scene_with_quad();

        let mut writer = ObjWriter::new();
        writer
            .export_geometry(&scene, &GeometryRequest::renderer(&path, vec![selected]))
            .unwrap();

        assert_eq!(writer.written(), 1);
        let content = std::fs::read_to_string(path).unwrap();
        assert_eq!(content.matches("\nf ").count(), 2);
    }

    #[test]
    fn test_degenerate_faces_are_skipped() {
        let mut scene = MemoryScene::new(RenderSettings::default());
        let node = scene.add_node("Tri", NodeKind::Mesh { data: "Tri".into() });
        scene.add_mesh_data(
            "Tri",
            MeshData {
                positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
                faces: vec![vec![], vec![0, 1], vec![0, 1, 2]],
                ..Default::default()
            },
        );
        let request = GeometryRequest::renderer(
            "unused.obj",
            vec![SelectedMesh {
                node,
                model: "Tri".into(),
            }],
        );
        let obj = ObjWriter::to_obj_string(&scene, &request).unwrap();

        let faces: Vec<&str> = obj.lines().filter(|l| l.starts_with("f")).collect();
        assert_eq!(faces, vec!["f 1 2 3"]);
    }
}

