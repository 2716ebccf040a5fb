//! Transform records as the renderer reads them.

use glam::Mat4;
use serde::{Deserialize, Serialize};

/// One entry of a renderer transform list. Entries are applied in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransformOp {
    /// Full 4x4 matrix, stored row by row.
    Matrix { matrix: [[f32; 4]; 4] },
    /// Non-uniform scale.
    Scale { scaling: [f32; 3] },
}

impl TransformOp {
    /// Matrix entry from a glam (column-major) matrix.
    pub fn matrix(m: Mat4) -> Self {
        TransformOp::Matrix {
            matrix: matrix_rows(&m),
        }
    }

    /// Horizontal mirror appended to camera transforms.
    pub fn mirror_x() -> Self {
        TransformOp::Scale {
            scaling: [-1.0, 1.0, 1.0],
        }
    }
}

/// Rows of a column-major matrix, top to bottom.
pub fn matrix_rows(m: &Mat4) -> [[f32; 4]; 4] {
    [
        m.row(0).to_array(),
        m.row(1).to_array(),
        m.row(2).to_array(),
        m.row(3).to_array(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_matrix_rows_put_translation_in_last_column() {
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let rows = matrix_rows(&m);
        assert_eq!(rows[0], [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(rows[1], [0.0, 1.0, 0.0, 2.0]);
        assert_eq!(rows[2], [0.0, 0.0, 1.0, 3.0]);
        assert_eq!(rows[3], [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_transform_op_json_shape() {
        let json = serde_json::to_value(TransformOp::mirror_x()).unwrap();
        assert_eq!(json["type"], "scale");
        assert_eq!(json["scaling"][0], -1.0);

        let json = serde_json::to_value(TransformOp::matrix(Mat4::IDENTITY)).unwrap();
        assert_eq!(json["type"], "matrix");
        assert_eq!(json["matrix"][3][3], 1.0);
    }
}
