use voxelcore::{Array3D, Array4D, OrientationDecomposition};

/// A 3x4x5 grid where each voxel holds `100i + 10j + k`.
pub fn coded_grid() -> Array3D<i32> {
    Array3D::from_fn([3, 4, 5], |i, j, k| (100 * i + 10 * j + k) as i32)
}

/// A 2x3x2 grid with 4 volumes and pseudo-random, repeating values.
#[allow(dead_code)]
pub fn scrambled_4d() -> Array4D<f64> {
    let mut state = 7u32;
    Array4D::from_generator([2, 3, 2, 4], || {
        state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345) % 97;
        f64::from(state % 13) - 6.
    })
}

/// The orientation of the reference scan used across the orientation tests.
#[allow(dead_code)]
pub fn reference_orientation() -> OrientationDecomposition {
    OrientationDecomposition::from_quaternion(
        0.3781795,
        0.707736,
        0.5942821,
        [5.4, 3.3, 7.1],
        [21.3, -87.1, 101.72],
        1.,
    )
    .unwrap()
}
