//! Helpers for plain 4x4 affine matrices, as used when an image carries no
//! usable orientation decomposition.
use crate::matrix::Matrix4x4;
use nalgebra::{Matrix3, Matrix4, Scalar, Vector3};

/// 3x3 linear part of an affine.
pub type Affine3 = Matrix3<f64>;
/// Homogeneous 4x4 affine.
pub type Affine4 = Matrix4<f64>;

/// Separate a 4x4 affine into its 3x3 affine and translation components.
pub fn get_affine_and_translation<T: Scalar>(affine: &Matrix4<T>) -> (Matrix3<T>, Vector3<T>) {
    let translation = Vector3::new(
        affine[(0, 3)].clone(),
        affine[(1, 3)].clone(),
        affine[(2, 3)].clone(),
    );
    let affine = affine.fixed_view::<3, 3>(0, 0).into_owned();
    (affine, translation)
}

/// Get the affine implied by the given shape and zooms alone.
///
/// The world origin is put in the center of the image, and the first axis
/// is mirrored (radiological convention), as done for images with neither
/// qform nor sform.
pub fn shape_zoom_affine(shape: &[usize], spacing: &[f64]) -> Affine4 {
    let origin = Vector3::new(
        (shape[0] as f64 - 1.0) / 2.0,
        (shape[1] as f64 - 1.0) / 2.0,
        (shape[2] as f64 - 1.0) / 2.0,
    );
    let spacing = [-spacing[0], spacing[1], spacing[2]];
    #[rustfmt::skip]
    let affine = Affine4::new(
        spacing[0], 0.0, 0.0, -origin[0] * spacing[0],
        0.0, spacing[1], 0.0, -origin[1] * spacing[1],
        0.0, 0.0, spacing[2], -origin[2] * spacing[2],
        0.0, 0.0, 0.0, 1.0,
    );
    affine
}

/// Divide each of the first three columns by the voxel spacing along that
/// axis, so that the affine maps millimetres rather than voxels.
pub(crate) fn descale_columns(m: &mut Matrix4x4<f64>, pixdim: [f64; 3]) {
    for (j, p) in pixdim.iter().enumerate() {
        for i in 0..3 {
            m[(i, j)] /= *p;
        }
    }
}

/// Inverse of [`descale_columns`].
pub(crate) fn rescale_columns(m: &mut Matrix4x4<f64>, pixdim: [f64; 3]) {
    for (j, p) in pixdim.iter().enumerate() {
        for i in 0..3 {
            m[(i, j)] *= *p;
        }
    }
}
