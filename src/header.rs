//! This module defines the `NiftiQform` struct, the handful of NIfTI-1
//! header fields which describe the qform orientation of a volume.
//!
//! Decoding the header itself is left to the caller; these are the scalars
//! as found in the file, named after the fields of the NIfTI-1 header.
use crate::affine::{shape_zoom_affine, Affine4};
use crate::error::{Result, VoxelError};
use crate::orientation::OrientationDecomposition;
use crate::typedef::XForm;
use nalgebra::Matrix4;
use num_traits::FromPrimitive;

/// The qform fields of a NIfTI-1 header.
///
/// # Example
///
/// ```
/// use voxelcore::NiftiQform;
/// # fn run() -> voxelcore::Result<()> {
/// let qform = NiftiQform {
///     qform_code: 1,
///     pixdim: [-1., 0.9375, 0.9375, 3., 0., 0., 0., 0.],
///     quatern_c: 1.,
///     ..Default::default()
/// };
/// let orientation = qform.to_orientation()?;
/// assert_eq!(orientation.qfac(), -1.);
/// assert_eq!(orientation.voxel_to_world([1., 1., 1.]), [-0.9375, 0.9375, 3.]);
/// # Ok(())
/// # }
/// # run().unwrap();
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NiftiQform {
    /// NIFTI_XFORM_* code
    pub qform_code: i16,
    /// Quaternion b param
    pub quatern_b: f32,
    /// Quaternion c param
    pub quatern_c: f32,
    /// Quaternion d param
    pub quatern_d: f32,
    /// Quaternion x shift
    pub quatern_x: f32,
    /// Quaternion y shift
    pub quatern_y: f32,
    /// Quaternion z shift
    pub quatern_z: f32,
    /// Grid spacings, with `qfac` in the first element
    pub pixdim: [f32; 8],
}

impl Default for NiftiQform {
    fn default() -> NiftiQform {
        NiftiQform {
            qform_code: 0,
            quatern_b: 0.,
            quatern_c: 0.,
            quatern_d: 0.,
            quatern_x: 0.,
            quatern_y: 0.,
            quatern_z: 0.,
            pixdim: [1.; 8],
        }
    }
}

impl NiftiQform {
    /// Get the qform coordinate mapping method as a validated enum.
    pub fn qform(&self) -> Result<XForm> {
        XForm::from_i16(self.qform_code).ok_or_else(|| {
            VoxelError::InvalidArgument(format!("Invalid qform code {}", self.qform_code))
        })
    }

    /// Get the `qfac` sign factor held in `pixdim[0]`.
    ///
    /// Writers are supposed to store exactly ±1 there. Anything else,
    /// including a zero left by older tools, is read as +1.
    pub fn qfac(&self) -> f64 {
        let p = self.pixdim[0];
        if p == 1. || p == -1. {
            f64::from(p)
        } else {
            warn!("pixdim[0] is {} instead of ±1, assuming qfac = 1", p);
            1.
        }
    }

    /// Build the orientation described by these fields.
    pub fn to_orientation(&self) -> Result<OrientationDecomposition<f64>> {
        OrientationDecomposition::from_qform(self)
    }

    /// Get the voxel-to-world affine of a volume of the given spatial
    /// shape.
    ///
    /// When the qform code is 0 there is no orientation to speak of, and the
    /// affine is built from the shape and spacings alone, as
    /// [`shape_zoom_affine`] does.
    pub fn affine(&self, shape: [usize; 3]) -> Result<Affine4> {
        match self.qform()? {
            XForm::Unknown => {
                let spacing = [self.pixdim[1], self.pixdim[2], self.pixdim[3]].map(f64::from);
                Ok(shape_zoom_affine(&shape, &spacing))
            }
            _ => Ok(Matrix4::from(self.to_orientation()?.affine())),
        }
    }
}

impl From<&OrientationDecomposition<f64>> for NiftiQform {
    fn from(orientation: &OrientationDecomposition<f64>) -> Self {
        orientation.to_qform()
    }
}

#[cfg(test)]
mod tests {
    use super::NiftiQform;
    use crate::affine::Affine4;
    use crate::typedef::XForm;
    use approx::assert_abs_diff_eq;

    #[test]
    #[rustfmt::skip]
    fn qform() {
        let header = NiftiQform {
            qform_code: 1,
            pixdim: [-1.0, 0.9375, 0.9375, 3.0, 0.0, 0.0, 0.0, 0.0],
            quatern_b: 0.0,
            quatern_c: 1.0,
            quatern_d: 0.0,
            quatern_x: 59.557503,
            quatern_y: 73.172,
            quatern_z: 43.4291,
        };

        let real_affine = Affine4::new(
            -0.9375, 0.0,    0.0, 59.557503,
            0.0,     0.9375, 0.0, 73.172,
            0.0,     0.0,    3.0, 43.4291,
            0.0,     0.0,    0.0, 1.0
        );
        assert_eq!(header.qform().unwrap(), XForm::ScannerAnat);
        assert_abs_diff_eq!(header.affine([10, 10, 10]).unwrap(), real_affine, epsilon = 1e-5);
    }

    #[test]
    #[rustfmt::skip]
    fn none_valid() {
        // All of the quaternion is ignored, only `shape_zoom_affine` is used.
        let header = NiftiQform {
            qform_code: 0,
            pixdim: [-1.0, 0.9, 0.9, 3.0, 0.0, 0.0, 0.0, 0.0],
            quatern_b: 0.0,
            quatern_c: 1.0,
            quatern_d: 0.0,
            quatern_x: 59.0,
            quatern_y: 73.0,
            quatern_z: 43.0,
        };

        let real_affine = Affine4::new(
            -0.9, 0.0, 0.0,   44.55,
            0.0,  0.9, 0.0,  -44.55,
            0.0,  0.0, 3.0, -148.5,
            0.0, 0.0, 0.0, 1.0
        );
        assert_abs_diff_eq!(header.affine([100, 100, 100]).unwrap(), real_affine, epsilon = 1e-5);
    }

    #[test]
    fn repairs_qfac() {
        let mut header = NiftiQform::default();
        assert_eq!(header.qfac(), 1.);
        header.pixdim[0] = 0.;
        assert_eq!(header.qfac(), 1.);
        header.pixdim[0] = -1.;
        assert_eq!(header.qfac(), -1.);
        header.qform_code = 9;
        assert!(header.qform().is_err());
        assert!(header.affine([2, 2, 2]).is_err());
    }

    #[test]
    fn from_orientation() {
        let o = NiftiQform {
            qform_code: 2,
            pixdim: [1., 2., 3., 4., 0., 0., 0., 0.],
            quatern_b: 0.5,
            quatern_c: 0.5,
            quatern_d: 0.5,
            ..Default::default()
        }
        .to_orientation()
        .unwrap();
        let q = NiftiQform::from(&o);
        assert_abs_diff_eq!(q.quatern_b, 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(q.quatern_d, 0.5, epsilon = 1e-6);
        assert_eq!(q.pixdim[..4], [1., 2., 3., 4.]);
    }
}
