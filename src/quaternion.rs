//! Unit quaternions for the rotation part of an orientation.
//!
//! The NIfTI qform stores a rotation as the three imaginary components
//! `(b, c, d)` of a unit quaternion, with the real part implied. This
//! module converts between that form, 3x3 rotation matrices and
//! axis-angle pairs.
use crate::matrix::Matrix4x4;
use crate::util::sign;
use nalgebra::Matrix3;

/// Threshold on `|1 - |q|²|` under which a first order approximation of
/// `1 / |q|` is used when normalising.
const NORMALISATION_TOLERANCE: f64 = 2.107342e-8;

/// Below this, `sin(θ / 2)` is taken to be zero and the axis is returned
/// unscaled.
const AXIS_EPSILON: f64 = 1e-5;

/// A quaternion `w + xi + yj + zk`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    /// Real part.
    pub w: f64,
    /// First imaginary component (NIfTI `quatern_b`).
    pub x: f64,
    /// Second imaginary component (NIfTI `quatern_c`).
    pub y: f64,
    /// Third imaginary component (NIfTI `quatern_d`).
    pub z: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Quaternion::identity()
    }
}

impl Quaternion {
    /// Create a quaternion from its four components.
    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Quaternion { w, x, y, z }
    }

    /// The quaternion of the null rotation.
    pub fn identity() -> Self {
        Quaternion::new(1., 0., 0., 0.)
    }

    /// Calculate the unit quaternion of a rotation matrix.
    ///
    /// The four candidate magnitudes `|w|, |x|, |y|, |z|` are computed from
    /// the diagonal, and the signs of the other three are resolved against
    /// the largest one. Ties are broken in the order `w, x, y, z`.
    ///
    /// Rotation matrices apply to column vectors, so `m[(i, j)]` is the
    /// contribution of input component `j` to output component `i`.
    pub fn from_rotation(m: &Matrix3<f64>) -> Self {
        let r = |i: usize, j: usize| m[(i - 1, j - 1)];
        let candidate = |v: f64| (v / 4.).max(0.).sqrt();

        let mut q0 = candidate(r(1, 1) + r(2, 2) + r(3, 3) + 1.);
        let mut q1 = candidate(r(1, 1) - r(2, 2) - r(3, 3) + 1.);
        let mut q2 = candidate(-r(1, 1) + r(2, 2) - r(3, 3) + 1.);
        let mut q3 = candidate(-r(1, 1) - r(2, 2) + r(3, 3) + 1.);

        if q0 >= q1 && q0 >= q2 && q0 >= q3 {
            q1 *= sign(r(3, 2) - r(2, 3));
            q2 *= sign(r(1, 3) - r(3, 1));
            q3 *= sign(r(2, 1) - r(1, 2));
        } else if q1 >= q0 && q1 >= q2 && q1 >= q3 {
            q0 *= sign(r(3, 2) - r(2, 3));
            q2 *= sign(r(2, 1) + r(1, 2));
            q3 *= sign(r(1, 3) + r(3, 1));
        } else if q2 >= q0 && q2 >= q1 && q2 >= q3 {
            q0 *= sign(r(1, 3) - r(3, 1));
            q1 *= sign(r(2, 1) + r(1, 2));
            q3 *= sign(r(3, 2) + r(2, 3));
        } else {
            q0 *= sign(r(2, 1) - r(1, 2));
            q1 *= sign(r(3, 1) + r(1, 3));
            q2 *= sign(r(3, 2) + r(2, 3));
        }

        Quaternion::new(q0, q1, q2, q3).normalised()
    }

    /// Create the quaternion of a rotation by `angle` radians around a unit
    /// `axis`. The axis is not normalised.
    pub fn from_axis_angle(axis: [f64; 3], angle: f64) -> Self {
        let (s, c) = (angle / 2.).sin_cos();
        Quaternion::new(c, axis[0] * s, axis[1] * s, axis[2] * s)
    }

    /// Recover the rotation axis and angle (in radians) of this quaternion.
    ///
    /// For rotations close to zero the axis is arbitrary, and the imaginary
    /// part is returned as is.
    pub fn to_axis_angle(&self) -> ([f64; 3], f64) {
        let q = if self.w > 1. { self.normalised() } else { *self };
        let angle = 2. * q.w.acos();
        let s = (1. - q.w * q.w).sqrt();
        let axis = if s < AXIS_EPSILON {
            [q.x, q.y, q.z]
        } else {
            [q.x / s, q.y / s, q.z / s]
        };
        (axis, angle)
    }

    /// Get the squared magnitude `w² + x² + y² + z²`.
    pub fn square_magnitude(&self) -> f64 {
        self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Get the magnitude of the quaternion.
    pub fn magnitude(&self) -> f64 {
        self.square_magnitude().sqrt()
    }

    /// Multiply every component by `a`.
    pub fn scale(&self, a: f64) -> Self {
        Quaternion::new(self.w * a, self.x * a, self.y * a, self.z * a)
    }

    /// Get the quaternion scaled to unit magnitude.
    ///
    /// Quaternions which are already nearly unit sized are corrected with
    /// the Padé approximant `2 / (1 + |q|²)` instead of a square root.
    pub fn normalised(&self) -> Self {
        let m = self.square_magnitude();
        if m == 0. {
            return *self;
        }
        let factor = if (1. - m).abs() < NORMALISATION_TOLERANCE {
            2. / (1. + m)
        } else {
            1. / m.sqrt()
        };
        self.scale(factor)
    }

    /// Calculate the 3x3 rotation matrix of this quaternion.
    ///
    /// Unless `trust_normalised` is set, the result is divided by the
    /// squared magnitude so that non-unit quaternions still produce a
    /// rotation.
    pub fn to_rotation(&self, trust_normalised: bool) -> Matrix3<f64> {
        let Quaternion { w, x, y, z } = *self;
        let (xx, yy, zz, ww) = (x * x, y * y, z * z, w * w);
        let (xy, xz, yz) = (x * y, x * z, y * z);
        let (xw, yw, zw) = (x * w, y * w, z * w);

        #[rustfmt::skip]
        let m = Matrix3::new(
            xx - yy - zz + ww, 2. * (xy - zw),     2. * (xz + yw),
            2. * (xy + zw),    -xx + yy - zz + ww, 2. * (yz - xw),
            2. * (xz - yw),    2. * (yz + xw),     -xx - yy + zz + ww,
        );
        if trust_normalised {
            m
        } else {
            m / (xx + yy + zz + ww)
        }
    }

    /// Build the 4x4 rigid transform which rotates by this quaternion and
    /// then translates by `translation`.
    pub fn to_matrix4(&self, translation: [f64; 3], trust_normalised: bool) -> Matrix4x4<f64> {
        let r = self.to_rotation(trust_normalised);
        let mut out = Matrix4x4::identity();
        for i in 0..3 {
            for j in 0..3 {
                out[(i, j)] = r[(i, j)];
            }
            out[(i, 3)] = translation[i];
        }
        out
    }

    /// The imaginary components in the NIfTI qform convention, where the
    /// real part must be non-negative.
    pub fn to_qform_bcd(&self) -> [f64; 3] {
        let q = if self.w < 0. { self.scale(-1.) } else { *self };
        [q.x, q.y, q.z]
    }
}
