//! The voxel-to-world transform of an image, decomposed into rotation,
//! pixel spacing, translation and the NIfTI `qfac` sign.
//!
//! An [`OrientationDecomposition`] keeps the composed 3x4 affine and its
//! inverse next to the parts they were made from. Every mutation builds a
//! complete new value before replacing the old one, so the cached matrices
//! are never observed out of step with the parts.
use crate::affine::{descale_columns, rescale_columns};
use crate::error::{Result, VoxelError};
use crate::header::NiftiQform;
use crate::matrix::Matrix4x4;
use crate::quaternion::Quaternion;
use crate::util::validate_qfac;
use nalgebra::{Matrix3, Scalar};
use num_traits::Float;
use std::fmt;

/// Floating point types an orientation can be computed in.
pub trait Real: Float + Scalar + fmt::Display + Send + Sync {
    /// Convert from `f64`, rounding if needed.
    fn of_f64(v: f64) -> Self;
    /// Convert to `f64`.
    fn as_f64(self) -> f64;
}

impl Real for f32 {
    fn of_f64(v: f64) -> Self {
        v as f32
    }
    fn as_f64(self) -> f64 {
        f64::from(self)
    }
}

impl Real for f64 {
    fn of_f64(v: f64) -> Self {
        v
    }
    fn as_f64(self) -> f64 {
        self
    }
}

/// A voxel-to-world transform following the NIfTI qform model: a voxel
/// `(i, j, k)` lands on `R · (i·dx, j·dy, k·dz·qfac) + t`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrientationDecomposition<T = f64>
where
    T: Scalar,
{
    rotation: Matrix3<T>,
    pixdim: [T; 3],
    translation: [T; 3],
    qfac: T,
    fast: Matrix4x4<T>,
    inverse: Matrix4x4<T>,
}

impl<T: Real> Default for OrientationDecomposition<T> {
    fn default() -> Self {
        OrientationDecomposition {
            rotation: Matrix3::identity(),
            pixdim: [T::one(); 3],
            translation: [T::zero(); 3],
            qfac: T::one(),
            fast: Matrix4x4::identity(),
            inverse: Matrix4x4::identity(),
        }
    }
}

fn fast_affine<T: Real>(
    rotation: &Matrix3<T>,
    pixdim: [T; 3],
    translation: [T; 3],
    qfac: T,
) -> Matrix4x4<T> {
    let scale = [pixdim[0], pixdim[1], pixdim[2] * qfac];
    let mut m = Matrix4x4::identity();
    for i in 0..3 {
        for j in 0..3 {
            m[(i, j)] = rotation[(i, j)] * scale[j];
        }
        m[(i, 3)] = translation[i];
    }
    m
}

fn check_axis(axis: usize) -> Result<()> {
    if axis > 2 {
        return Err(VoxelError::InvalidArgument(format!(
            "Spatial axis must be 0, 1 or 2, got {}",
            axis
        )));
    }
    Ok(())
}

impl<T: Real> OrientationDecomposition<T> {
    /// Create an orientation from its parts.
    ///
    /// # Errors
    ///
    /// - `VoxelError::InvalidArgument` if `qfac` is not ±1 or a pixel
    /// spacing is not strictly positive.
    /// - `VoxelError::SingularMatrix` if the resulting affine cannot be
    /// inverted.
    pub fn new(rotation: Matrix3<T>, pixdim: [T; 3], translation: [T; 3], qfac: T) -> Result<Self> {
        validate_qfac(qfac)?;
        if pixdim.iter().any(|p| !(*p > T::zero())) {
            return Err(VoxelError::InvalidArgument(format!(
                "Pixel dimensions must be positive, got [{}, {}, {}]",
                pixdim[0], pixdim[1], pixdim[2]
            )));
        }
        let fast = fast_affine(&rotation, pixdim, translation, qfac);
        let inverse = fast.inverse()?;
        Ok(OrientationDecomposition {
            rotation,
            pixdim,
            translation,
            qfac,
            fast,
            inverse,
        })
    }

    /// Create an orientation from the NIfTI quaternion parameters. The
    /// real part `a` is derived from `(b, c, d)`, and taken as zero when
    /// `b² + c² + d²` exceeds one.
    pub fn from_quaternion(
        b: f64,
        c: f64,
        d: f64,
        pixdim: [T; 3],
        translation: [T; 3],
        qfac: T,
    ) -> Result<Self> {
        let (bb, cc, dd) = (b * b, c * c, d * d);
        let aa = 1. - bb - cc - dd;
        let (aa, a) = if aa > 0. { (aa, aa.sqrt()) } else { (0., 0.) };
        let (ab, ac, ad) = (a * b, a * c, a * d);
        let (bc, bd, cd) = (b * c, b * d, c * d);

        #[rustfmt::skip]
        let r = Matrix3::new(
            aa + bb - cc - dd, 2. * (bc - ad),    2. * (bd + ac),
            2. * (bc + ad),    aa + cc - bb - dd, 2. * (cd - ab),
            2. * (bd - ac),    2. * (cd + ab),    aa + dd - bb - cc,
        );
        OrientationDecomposition::new(r.map(T::of_f64), pixdim, translation, qfac)
    }

    /// Create an orientation from decoded header scalars.
    pub fn from_qform(qform: &NiftiQform) -> Result<Self> {
        let p = &qform.pixdim;
        OrientationDecomposition::from_quaternion(
            f64::from(qform.quatern_b),
            f64::from(qform.quatern_c),
            f64::from(qform.quatern_d),
            [p[1], p[2], p[3]].map(|v| T::of_f64(f64::from(v))),
            [qform.quatern_x, qform.quatern_y, qform.quatern_z].map(|v| T::of_f64(f64::from(v))),
            T::of_f64(qform.qfac()),
        )
    }

    /// Encode this orientation as header scalars. The rotation is
    /// re-expressed as a unit quaternion with a non-negative real part.
    ///
    /// A rotation holding a reflection (determinant -1, as left by
    /// [`flip`](Self::flip)) cannot be a quaternion. Its third column is
    /// negated and the sign moves to `qfac` in `pixdim[0]`, which leaves the
    /// affine unchanged.
    pub fn to_qform(&self) -> NiftiQform {
        let (rotation, qfac) = self.proper_rotation();
        let [b, c, d] = Quaternion::from_rotation(&rotation).to_qform_bcd();
        let p = self.pixdim.map(|v| v.as_f64() as f32);
        let t = self.translation.map(|v| v.as_f64() as f32);
        NiftiQform {
            qform_code: 1,
            quatern_b: b as f32,
            quatern_c: c as f32,
            quatern_d: d as f32,
            quatern_x: t[0],
            quatern_y: t[1],
            quatern_z: t[2],
            pixdim: [qfac as f32, p[0], p[1], p[2], 0., 0., 0., 0.],
        }
    }

    /// Replace every part at once.
    pub fn set(&mut self, rotation: Matrix3<T>, pixdim: [T; 3], translation: [T; 3], qfac: T) -> Result<()> {
        *self = OrientationDecomposition::new(rotation, pixdim, translation, qfac)?;
        Ok(())
    }

    /// Get a copy of the rotation.
    pub fn rotation(&self) -> Matrix3<T> {
        self.rotation
    }

    /// Get the rotation as a unit quaternion. A reflection is first taken
    /// out of the rotation as [`to_qform`](Self::to_qform) does, so this is
    /// the quaternion stored in the qform.
    pub fn quaternion(&self) -> Quaternion {
        Quaternion::from_rotation(&self.proper_rotation().0)
    }

    /// The rotation with its third column negated when its determinant is
    /// negative, and the `qfac` that keeps the affine the same.
    fn proper_rotation(&self) -> (Matrix3<f64>, f64) {
        let mut r = self.rotation.map(T::as_f64);
        let qfac = self.qfac.as_f64();
        if r.determinant() < 0. {
            for i in 0..3 {
                r[(i, 2)] = -r[(i, 2)];
            }
            (r, -qfac)
        } else {
            (r, qfac)
        }
    }

    /// Get a copy of the pixel spacings.
    pub fn pixdim(&self) -> [T; 3] {
        self.pixdim
    }

    /// Get a copy of the translation.
    pub fn translation(&self) -> [T; 3] {
        self.translation
    }

    /// Get the sign factor of the third axis.
    pub fn qfac(&self) -> T {
        self.qfac
    }

    /// Get the composed 3x4 affine, one row per world axis.
    pub fn fast_affine(&self) -> [[T; 4]; 3] {
        [self.fast.row(0), self.fast.row(1), self.fast.row(2)]
    }

    /// Get the composed affine as a homogeneous 4x4 matrix.
    pub fn affine(&self) -> Matrix4x4<T> {
        self.fast
    }

    /// Get the world-to-voxel matrix.
    pub fn inverse_affine(&self) -> Matrix4x4<T> {
        self.inverse
    }

    /// Map voxel coordinates to world coordinates.
    pub fn voxel_to_world(&self, voxel: [T; 3]) -> [T; 3] {
        self.fast.transform_point(voxel)
    }

    /// Map world coordinates to (fractional) voxel coordinates.
    pub fn world_to_voxel(&self, world: [T; 3]) -> [T; 3] {
        self.inverse.transform_point(world)
    }

    /// Post-compose a rigid transform given as a 4x4 matrix: its upper left
    /// block multiplies the rotation from the right and its last column is
    /// added to the translation.
    pub fn apply_transform(&mut self, rotate_and_translate: &Matrix4x4<T>) -> Result<()> {
        self.apply_transform_parts(
            &rotate_and_translate.rotation_block(),
            rotate_and_translate.translation(),
        )
    }

    /// Post-compose a rotation and add a translation.
    pub fn apply_transform_parts(&mut self, rotate: &Matrix3<T>, translate: [T; 3]) -> Result<()> {
        let rotation = Matrix3::from_fn(|i, j| {
            (0..3).fold(T::zero(), |acc, k| acc + self.rotation[(i, k)] * rotate[(k, j)])
        });
        let t = &self.translation;
        let translation = [t[0] + translate[0], t[1] + translate[1], t[2] + translate[2]];
        debug!("Applying transform, new translation {:?}", translation);
        self.set(rotation, self.pixdim, translation, self.qfac)
    }

    /// Mirror one voxel axis of an axis aligned orientation.
    ///
    /// The rotation's diagonal entry for `axis` changes sign and the
    /// translation moves by `size_along_axis` voxels, so that the image
    /// keeps covering the same region of world space. Flipping twice
    /// restores the original orientation.
    ///
    /// # Errors
    ///
    /// - `VoxelError::NotSupported` if the rotation has any non-zero
    /// off-diagonal entry.
    /// - `VoxelError::InvalidArgument` if `axis` is not 0, 1 or 2.
    pub fn flip(&mut self, axis: usize, size_along_axis: T) -> Result<()> {
        check_axis(axis)?;
        let r = &self.rotation;
        let off_diagonal = (0..3)
            .flat_map(|i| (0..3).map(move |j| (i, j)))
            .any(|(i, j)| i != j && r[(i, j)] != T::zero());
        if off_diagonal {
            return Err(VoxelError::NotSupported(
                "flip of an orientation which is not axis aligned",
            ));
        }
        let mut rotation = self.rotation;
        rotation[(axis, axis)] = -rotation[(axis, axis)];
        let new_diagonal = rotation[(axis, axis)];

        let extent = size_along_axis * self.pixdim[axis];
        let offset = if new_diagonal > T::zero() { -extent } else { extent };
        let q = if axis == 2 { self.qfac } else { T::one() };
        let mut translation = self.translation;
        translation[axis] = translation[axis] + q * offset;

        debug!("Flipping axis {} over {} voxels", axis, size_along_axis);
        self.set(rotation, self.pixdim, translation, self.qfac)
    }

    /// Get a copy of this orientation shifted in world space.
    pub fn translated(&self, offset: [T; 3]) -> Result<Self> {
        let t = &self.translation;
        OrientationDecomposition::new(
            self.rotation,
            self.pixdim,
            [t[0] + offset[0], t[1] + offset[1], t[2] + offset[2]],
            self.qfac,
        )
    }

    /// Get the orientation of this image after `pad_before` voxels are
    /// inserted before the origin of each axis. Voxel `p + pad_before` of
    /// the padded image lands where voxel `p` of this one does.
    pub fn for_padded_image(&self, pad_before: [usize; 3]) -> Result<Self> {
        let pad = pad_before.map(|p| T::of_f64(p as f64));
        let t = &self.translation;
        // world displacement of the pad, without the translation
        let moved = self.voxel_to_world(pad);
        let shift = [moved[0] - t[0], moved[1] - t[1], moved[2] - t[2]];
        OrientationDecomposition::new(
            self.rotation,
            self.pixdim,
            [t[0] - shift[0], t[1] - shift[1], t[2] - shift[2]],
            self.qfac,
        )
    }

    /// Compare two orientations by where they put a few voxels of an image
    /// of the given size: the origin, the far corner and, when two sides
    /// are equal so that a rotation could go unnoticed, voxel `(1, 3, 5)`.
    ///
    /// The default tolerance is a thousandth of the smallest pixel spacing.
    pub fn tolerant_eq(&self, other: &Self, image_size: [usize; 3], tolerance: Option<T>) -> bool {
        let tolerance = tolerance.unwrap_or_else(|| {
            let smallest = self.pixdim.iter().fold(T::infinity(), |m, p| m.min(*p));
            smallest * T::of_f64(0.001)
        });
        let close = |voxel: [T; 3]| {
            let a = self.voxel_to_world(voxel);
            let b = other.voxel_to_world(voxel);
            let d2 = (0..3).fold(T::zero(), |acc, i| acc + (a[i] - b[i]) * (a[i] - b[i]));
            d2.sqrt() <= tolerance
        };
        let [sx, sy, sz] = image_size;
        if !close([T::zero(); 3]) {
            return false;
        }
        if !close([sx, sy, sz].map(|s| T::of_f64(s as f64))) {
            return false;
        }
        if sx == sy || sy == sz || sz == sx {
            return close([1., 3., 5.].map(T::of_f64));
        }
        true
    }
}

/// Size and spacing of an image taking part in [`mr_transform`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageGeometry {
    /// Number of voxels along the first axis.
    pub width: usize,
    /// Pixel spacing of the three spatial axes.
    pub pixdim: [f64; 3],
}

/// Switches of [`mr_transform`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MrTransformOptions {
    /// Apply the inverse of the given transform.
    pub invert: bool,
    /// Mirror the first axis about the image width before composing.
    pub flip_x: bool,
    /// Compose with the source affine instead of replacing it.
    pub compose: bool,
}

/// Resample an image's affine onto a reference image the way MRtrix's
/// `mrtransform` does.
///
/// The reference affine has its columns divided by the reference spacing,
/// is multiplied by `transform` (inverted first if asked for, and mirrored
/// about the image widths with `flip_x`), optionally composed with the
/// equally de-scaled `source` affine, and finally re-scaled by this
/// image's spacing. The steps must happen in this order: rearranging them
/// gives a matrix with the right directions and the wrong magnitudes.
///
/// # Errors
///
/// - `VoxelError::SingularMatrix` if `transform` must be inverted and
/// cannot be.
pub fn mr_transform(
    source: &Matrix4x4<f64>,
    transform: &Matrix4x4<f64>,
    this: &ImageGeometry,
    reference: &ImageGeometry,
    reference_affine: &Matrix4x4<f64>,
    options: MrTransformOptions,
) -> Result<Matrix4x4<f64>> {
    let mut apply = if options.invert {
        transform.inverse()?
    } else {
        *transform
    };
    if options.flip_x {
        let mut r = Matrix4x4::from_diagonal([-1., 1., 1., 1.]);
        r[(0, 3)] = (reference.width as f64 - 1.) * reference.pixdim[0];
        let tmp = r * apply;
        r[(0, 3)] = (this.width as f64 - 1.) * this.pixdim[0];
        apply = tmp * r;
    }

    let mut reference_affine = *reference_affine;
    descale_columns(&mut reference_affine, reference.pixdim);
    let mut m = reference_affine * apply;
    if options.compose {
        let mut old = *source;
        descale_columns(&mut old, this.pixdim);
        m = m * old;
    }
    rescale_columns(&mut m, this.pixdim);
    Ok(m)
}

#[cfg(test)]
mod tests {
    use super::{mr_transform, ImageGeometry, MrTransformOptions, OrientationDecomposition};
    use crate::error::VoxelError;
    use crate::matrix::Matrix4x4;
    use approx::assert_abs_diff_eq;
    use nalgebra::Matrix3;
    use pretty_assertions::assert_eq;

    fn identity(qfac: f64) -> OrientationDecomposition {
        OrientationDecomposition::from_quaternion(0., 0., 0., [1., 1., 1.], [0., 0., 0.], qfac).unwrap()
    }

    #[test]
    fn qfac_mirrors_third_axis() {
        assert_eq!(identity(1.).voxel_to_world([1., 2., 3.]), [1., 2., 3.]);
        assert_eq!(identity(-1.).voxel_to_world([1., 2., 3.]), [1., 2., -3.]);
        assert_eq!(identity(-1.).world_to_voxel([1., 2., -3.]), [1., 2., 3.]);
    }

    #[test]
    fn rejects_bad_parts() {
        let r = Matrix3::identity();
        assert!(matches!(
            OrientationDecomposition::new(r, [1., 1., 1.], [0.; 3], 0.5),
            Err(VoxelError::InvalidArgument(_))
        ));
        assert!(matches!(
            OrientationDecomposition::new(r, [1., 0., 1.], [0.; 3], 1.),
            Err(VoxelError::InvalidArgument(_))
        ));
        assert_eq!(
            OrientationDecomposition::new(Matrix3::zeros(), [1., 1., 1.], [0.; 3], 1.),
            Err(VoxelError::SingularMatrix)
        );
    }

    #[test]
    fn reference_quaternion() {
        let o = OrientationDecomposition::from_quaternion(
            0.3781795,
            0.707736,
            0.5942821,
            [5.4, 3.3, 7.1],
            [21.3, -87.1, 101.72],
            1.,
        )
        .unwrap();
        let r = o.rotation();
        assert_abs_diff_eq!(r[(0, 0)], -0.7081229, epsilon = 1e-5);
        assert_abs_diff_eq!(r[(1, 0)], 0.5995155, epsilon = 1e-5);
        assert_abs_diff_eq!(r[(2, 2)], -0.2878200, epsilon = 1e-5);

        let world = o.voxel_to_world([7., 11., 13.]);
        assert_abs_diff_eq!(world[0], 60.17986, epsilon = 1e-3);
        assert_abs_diff_eq!(world[1], 9.70838, epsilon = 1e-3);
        assert_abs_diff_eq!(world[2], 121.27282, epsilon = 1e-3);

        let back = o.world_to_voxel(world);
        assert_abs_diff_eq!(back[0], 7., epsilon = 1e-9);
        assert_abs_diff_eq!(back[2], 13., epsilon = 1e-9);
    }

    #[test]
    fn flip_is_an_involution() {
        let r = Matrix3::from_diagonal(&nalgebra::Vector3::new(1., -1., 1.));
        let original = OrientationDecomposition::new(r, [2., 3., 4.], [10., 20., 30.], -1.).unwrap();
        for axis in 0..3 {
            let mut o = original.clone();
            o.flip(axis, 5.).unwrap();
            assert_ne!(o, original);
            o.flip(axis, 5.).unwrap();
            assert_eq!(o, original);
        }

        let mut o = original.clone();
        o.flip(0, 5.).unwrap();
        // new voxel i lands on old voxel 5 - i
        assert_eq!(o.voxel_to_world([0., 1., 1.]), original.voxel_to_world([5., 1., 1.]));
        assert_eq!(o.translation(), [20., 20., 30.]);

        let mut o = original.clone();
        o.flip(2, 5.).unwrap();
        assert_eq!(o.voxel_to_world([1., 1., 2.]), original.voxel_to_world([1., 1., 3.]));
    }

    #[test]
    fn flip_needs_axis_aligned_rotation() {
        let mut o = OrientationDecomposition::from_quaternion(0.3, 0.1, 0., [1.; 3], [0.; 3], 1.).unwrap();
        let before = o.clone();
        assert!(matches!(o.flip(1, 10.), Err(VoxelError::NotSupported(_))));
        assert_eq!(o, before);
        assert!(matches!(o.flip(3, 10.), Err(VoxelError::InvalidArgument(_))));
    }

    #[test]
    fn apply_transform_composes() {
        let mut o = identity(1.);
        #[rustfmt::skip]
        let m = Matrix4x4::from_rows([
            0., -1., 0., 1.,
            1., 0., 0., 2.,
            0., 0., 1., 3.,
            0., 0., 0., 1.,
        ]);
        o.apply_transform(&m).unwrap();
        assert_eq!(o.translation(), [1., 2., 3.]);
        assert_eq!(o.voxel_to_world([1., 0., 0.]), [1., 3., 3.]);
        // caches follow the parts
        assert_eq!(o.world_to_voxel([1., 3., 3.]), [1., 0., 0.]);
    }

    #[test]
    fn padded_and_translated() {
        let o = OrientationDecomposition::from_quaternion(0.2, -0.4, 0.1, [0.5, 1.5, 2.], [3., -2., 9.], -1.)
            .unwrap();
        let padded = o.for_padded_image([21, 19, 91]).unwrap();
        for p in &[[0., 0., 0.], [1., 2., 2.]] {
            let a = o.voxel_to_world(*p);
            let b = padded.voxel_to_world([p[0] + 21., p[1] + 19., p[2] + 91.]);
            for i in 0..3 {
                assert_abs_diff_eq!(a[i], b[i], epsilon = 1e-9);
            }
        }

        let moved = o.translated([1., 0., -1.]).unwrap();
        assert_eq!(moved.translation(), [4., -2., 8.]);
        assert!(!o.tolerant_eq(&moved, [4, 4, 4], None));
        assert!(o.tolerant_eq(&moved, [4, 4, 4], Some(2.)));
        assert!(o.tolerant_eq(&o.clone(), [3, 5, 7], None));
    }

    #[test]
    fn qform_round_trip() {
        let o = OrientationDecomposition::from_quaternion(0.2, -0.4, 0.1, [0.5, 1.5, 2.], [3., -2., 9.], -1.)
            .unwrap();
        let q = o.to_qform();
        assert_eq!(q.pixdim[0], -1.);
        let back = OrientationDecomposition::<f64>::from_qform(&q).unwrap();
        assert!(o.tolerant_eq(&back, [10, 10, 10], Some(1e-4)));
    }

    #[test]
    fn flipped_qform_keeps_mirror() {
        let mut o = OrientationDecomposition::new(Matrix3::identity(), [1., 2., 3.], [10., 20., 30.], 1.).unwrap();
        o.flip(0, 5.).unwrap();
        assert_eq!(o.voxel_to_world([1., 0., 0.]), [14., 20., 30.]);

        let q = o.to_qform();
        assert_eq!(q.pixdim[0], -1.);
        let back = OrientationDecomposition::<f64>::from_qform(&q).unwrap();
        assert_eq!(back.qfac(), -1.);
        assert_abs_diff_eq!(back.rotation().determinant(), 1., epsilon = 1e-12);
        assert!(o.tolerant_eq(&back, [5, 4, 3], Some(1e-5)));
        let world = back.voxel_to_world([1., 0., 0.]);
        assert_abs_diff_eq!(world[0], 14., epsilon = 1e-5);

        // a proper rotation keeps its qfac
        assert_eq!(identity(-1.).to_qform().pixdim[0], -1.);
        assert_eq!(identity(1.).to_qform().pixdim[0], 1.);
    }

    fn geometry(width: usize) -> ImageGeometry {
        ImageGeometry {
            width,
            pixdim: [2., 2., 2.],
        }
    }

    fn scaled() -> Matrix4x4<f64> {
        let mut m = Matrix4x4::from_diagonal([2., 2., 2., 1.]);
        m.set_col(3, [1., 1., 1., 1.]);
        m
    }

    #[test]
    fn mr_transform_identity_keeps_reference() {
        let g = geometry(10);
        let id = Matrix4x4::identity();
        let out = mr_transform(&scaled(), &id, &g, &g, &scaled(), MrTransformOptions::default()).unwrap();
        assert_eq!(out, scaled());

        let flip = MrTransformOptions {
            flip_x: true,
            ..Default::default()
        };
        let out = mr_transform(&scaled(), &id, &g, &g, &scaled(), flip).unwrap();
        assert_abs_diff_eq!(out, scaled(), epsilon = 1e-12);
    }

    #[test]
    fn mr_transform_invert_and_compose() {
        let g = geometry(10);
        let mut shift = Matrix4x4::identity();
        shift[(0, 3)] = 5.;

        let invert = MrTransformOptions {
            invert: true,
            ..Default::default()
        };
        let out = mr_transform(&scaled(), &shift, &g, &g, &scaled(), invert).unwrap();
        assert_eq!(out.col(3), [-4., 1., 1., 1.]);
        assert_eq!(out[(0, 0)], 2.);

        let compose = MrTransformOptions {
            compose: true,
            ..Default::default()
        };
        let id = Matrix4x4::identity();
        let out = mr_transform(&scaled(), &id, &g, &g, &scaled(), compose).unwrap();
        assert_eq!(out.col(3), [2., 2., 2., 1.]);
        assert_eq!(out[(1, 1)], 2.);

        let mut singular = Matrix4x4::identity();
        singular[(2, 2)] = 0.;
        assert_eq!(
            mr_transform(&scaled(), &singular, &g, &g, &scaled(), invert),
            Err(VoxelError::SingularMatrix)
        );
    }
}
