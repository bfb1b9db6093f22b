#[macro_use]
extern crate pretty_assertions;

mod util;

use approx::assert_abs_diff_eq;
use nalgebra::Matrix3;
use util::reference_orientation;
use voxelcore::{
    mr_transform, ImageGeometry, Matrix4x4, MrTransformOptions, NiftiQform, OrientationDecomposition,
    VoxelError,
};

#[test]
fn identity_and_qfac() {
    let o = OrientationDecomposition::<f64>::from_quaternion(0., 0., 0., [1., 1., 1.], [0., 0., 0.], 1.).unwrap();
    assert_eq!(o.voxel_to_world([1., 2., 3.]), [1., 2., 3.]);
    let o = OrientationDecomposition::<f64>::from_quaternion(0., 0., 0., [1., 1., 1.], [0., 0., 0.], -1.).unwrap();
    assert_eq!(o.voxel_to_world([1., 2., 3.]), [1., 2., -3.]);
    assert!(OrientationDecomposition::<f64>::from_quaternion(0., 0., 0., [1.; 3], [0.; 3], 0.).is_err());
}

#[test]
fn reference_scan() {
    let o = reference_orientation();
    assert_eq!(o.pixdim(), [5.4, 3.3, 7.1]);
    assert_eq!(o.translation(), [21.3, -87.1, 101.72]);

    #[rustfmt::skip]
    let expected = Matrix3::new(
        -0.7081229, 0.4710892, 0.5259629,
        0.5995158, 0.0076181, 0.8003266,
        0.3730184, 0.8820527, -0.2878200,
    );
    assert_abs_diff_eq!(o.rotation(), expected, epsilon = 1e-6);

    // coordinates reported by third party viewers for this scan
    let world = o.voxel_to_world([7., 11., 13.]);
    assert_abs_diff_eq!(world[0], 60.18, epsilon = 0.01);
    assert_abs_diff_eq!(world[1], 9.708, epsilon = 0.01);
    assert_abs_diff_eq!(world[2], 121.3, epsilon = 0.1);

    let q = o.quaternion();
    assert_abs_diff_eq!(q.x, 0.3781795, epsilon = 1e-6);
    assert_abs_diff_eq!(q.y, 0.707736, epsilon = 1e-6);
    assert_abs_diff_eq!(q.z, 0.5942821, epsilon = 1e-6);
}

#[test]
fn cached_inverse_follows_mutations() {
    let mut o = reference_orientation();
    let shift = Matrix4x4::from_rows([1., 0., 0., 4., 0., 1., 0., -2., 0., 0., 1., 0.5, 0., 0., 0., 1.]);
    o.apply_transform(&shift).unwrap();
    let t = o.translation();
    assert_abs_diff_eq!(t[0], 25.3, epsilon = 1e-12);
    assert_abs_diff_eq!(t[1], -89.1, epsilon = 1e-12);
    assert_abs_diff_eq!(t[2], 102.22, epsilon = 1e-12);
    let v = [3., 1., 4.];
    let back = o.world_to_voxel(o.voxel_to_world(v));
    for i in 0..3 {
        assert_abs_diff_eq!(back[i], v[i], epsilon = 1e-9);
    }
    let fast = o.fast_affine();
    assert_eq!(fast[1][3], t[1]);
    assert_eq!(o.affine().row(3), [0., 0., 0., 1.]);
}

#[test]
fn flip_round_trip_keeps_footprint() {
    let r = Matrix3::from_diagonal(&nalgebra::Vector3::new(-1., 1., 1.));
    let original = OrientationDecomposition::new(r, [0.9375, 0.9375, 3.], [59.5, 73.25, 43.5], -1.).unwrap();
    let mut o = original.clone();
    o.flip(0, 256.).unwrap();
    let a = o.voxel_to_world([0., 5., 5.]);
    let b = original.voxel_to_world([256., 5., 5.]);
    assert_eq!(a, b);
    o.flip(0, 256.).unwrap();
    assert_eq!(o, original);

    // the mirrored first axis survives encoding, carried by qfac
    let qform = NiftiQform::from(&original);
    assert_eq!(qform.pixdim[0], 1.);
    let decoded = qform.to_orientation().unwrap();
    assert!(original.tolerant_eq(&decoded, [256, 256, 30], None));
    assert_eq!(decoded.voxel_to_world([10., 5., 5.]), original.voxel_to_world([10., 5., 5.]));

    let mut oblique = reference_orientation();
    assert!(matches!(oblique.flip(0, 10.), Err(VoxelError::NotSupported(_))));
    assert_eq!(oblique, reference_orientation());
}

#[test]
fn padding_moves_origin() {
    let o = reference_orientation();
    let padded = o.for_padded_image([21, 19, 91]).unwrap();
    for x in 0..3 {
        for y in 0..3 {
            for z in 0..3 {
                let p = [x as f64, y as f64, z as f64];
                let a = o.voxel_to_world(p);
                let b = padded.voxel_to_world([p[0] + 21., p[1] + 19., p[2] + 91.]);
                for i in 0..3 {
                    assert_abs_diff_eq!(a[i], b[i], epsilon = 1e-3);
                }
            }
        }
    }
}

#[test]
fn qform_round_trip() {
    let o = reference_orientation();
    let qform = NiftiQform::from(&o);
    assert_eq!(qform.pixdim[0], 1.);
    let back = qform.to_orientation().unwrap();
    assert!(o.tolerant_eq(&back, [64, 64, 30], None));
    let moved = back.translated([0., 0., 1.]).unwrap();
    assert!(!o.tolerant_eq(&moved, [64, 64, 30], None));
}

#[test]
fn mr_transform_round_trip() {
    let o = reference_orientation();
    let this = ImageGeometry {
        width: 64,
        pixdim: o.pixdim(),
    };
    let rotation = voxelcore::Quaternion::from_axis_angle([0., 0., 1.], 0.1).to_matrix4([1., 2., 3.], true);
    let forward = mr_transform(&o.affine(), &rotation, &this, &this, &o.affine(), MrTransformOptions::default())
        .unwrap();
    let options = MrTransformOptions {
        invert: true,
        ..Default::default()
    };
    let back = mr_transform(&o.affine(), &rotation, &this, &this, &forward, options).unwrap();
    assert_abs_diff_eq!(back, o.affine(), epsilon = 1e-9);
}
