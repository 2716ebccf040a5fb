//! Conversion from host axis convention (Z up) to renderer axis convention (Y up).
//!
//! Two variants exist. Lights, cameras and implicit surfaces only need the axis
//! remap. Meshes are written by the geometry exporter, which swaps axes itself and
//! mirrors X to keep the basis right-handed, so their transforms have to undo that
//! mirror as well.

use glam::{Mat4, Vec4};

/// Swaps the Y and Z axes. A permutation, so it is its own inverse.
pub const AXIS_REMAP: Mat4 = Mat4::from_cols(Vec4::X, Vec4::Z, Vec4::Y, Vec4::W);

/// Inverse of [`AXIS_REMAP`] (its transpose).
pub const AXIS_REMAP_INV: Mat4 = Mat4::from_cols(Vec4::X, Vec4::Z, Vec4::Y, Vec4::W);

/// Exact 90 degree rotation about X.
pub const ROTATE_X_90: Mat4 = Mat4::from_cols(
    Vec4::X,
    Vec4::new(0.0, 0.0, 1.0, 0.0),
    Vec4::new(0.0, -1.0, 0.0, 0.0),
    Vec4::W,
);

/// Negates X, matching the mirror the geometry exporter applies.
pub const MIRROR_X: Mat4 = Mat4::from_cols(Vec4::NEG_X, Vec4::Y, Vec4::Z, Vec4::W);

/// `A⁻¹ · M · A · Rx(90°)`, for lights, cameras and implicit surfaces.
pub fn to_renderer_space(m: Mat4) -> Mat4 {
    AXIS_REMAP_INV * m * AXIS_REMAP * ROTATE_X_90
}

/// `A⁻¹ · M · S · A`, for nodes whose vertices live in the geometry file.
pub fn to_geometry_file_space(m: Mat4) -> Mat4 {
    AXIS_REMAP_INV * m * MIRROR_X * AXIS_REMAP
}

/// Selects one of the two conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceConverter {
    Renderer,
    GeometryFile,
}

impl SpaceConverter {
    pub fn apply(self, m: Mat4) -> Mat4 {
        match self {
            SpaceConverter::Renderer => to_renderer_space(m),
            SpaceConverter::GeometryFile => to_geometry_file_space(m),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    fn bits(m: Mat4) -> Vec<u32> {
        m.to_cols_array().iter().map(|v| v.to_bits()).collect()
    }

    fn sample_matrix() -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::new(1.5, 0.5, 2.0),
            Quat::from_euler(glam::EulerRot::XYZ, 0.3, -1.1, 2.4),
            Vec3::new(4.0, -2.0, 7.5),
        )
    }

    #[test]
    fn test_conversions_are_deterministic() {
        let m = sample_matrix();
        assert_eq!(bits(to_renderer_space(m)), bits(to_renderer_space(m)));
        assert_eq!(
            bits(to_geometry_file_space(m)),
            bits(to_geometry_file_space(m))
        );
    }

    #[test]
    fn test_axis_remap_is_self_inverse() {
        assert_eq!(AXIS_REMAP * AXIS_REMAP_INV, Mat4::IDENTITY);
    }

    #[test]
    fn test_renderer_space_identity_is_rotation() {
        assert_eq!(to_renderer_space(Mat4::IDENTITY), ROTATE_X_90);
    }

    #[test]
    fn test_renderer_space_swaps_translation_axes() {
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let converted = to_renderer_space(m);
        assert_eq!(converted.w_axis, Vec4::new(1.0, 3.0, 2.0, 1.0));
    }

    #[test]
    fn test_geometry_space_identity_mirrors_x() {
        let converted = to_geometry_file_space(Mat4::IDENTITY);
        assert_eq!(converted, Mat4::from_scale(Vec3::new(-1.0, 1.0, 1.0)));
    }

    #[test]
    fn test_converter_dispatch() {
        let m = sample_matrix();
        assert_eq!(SpaceConverter::Renderer.apply(m), to_renderer_space(m));
        assert_eq!(
            SpaceConverter::GeometryFile.apply(m),
            to_geometry_file_space(m)
        );
    }
}
