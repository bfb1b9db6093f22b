#[macro_use]
extern crate pretty_assertions;

mod util;

use util::scrambled_4d;
use voxelcore::{Array3D, Array4D, VoxelArray, VoxelError, VoxelOrder};

#[test]
fn linearizations() {
    let grid = Array4D::from_x_fastest([2, 1, 1, 3], &[0, 1, 2, 3, 4, 5]).unwrap();
    assert_eq!(grid[[1, 0, 0, 2]], 5);
    assert_eq!(grid.to_vec(VoxelOrder::XFastest), vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(grid.to_vec(VoxelOrder::LastDimFastest), vec![0, 2, 4, 1, 3, 5]);

    let mut copy = Array4D::new(2, 1, 1, 3);
    copy.set_from(VoxelOrder::LastDimFastest, &[0, 2, 4, 1, 3, 5]).unwrap();
    assert_eq!(copy, grid);
    assert_eq!(copy.rank(), 4);
    assert!(copy.set_from(VoxelOrder::XFastest, &[0; 5]).is_err());
}

#[test]
fn volumes_share_a_shape() {
    let a = Array3D::<u16>::new(2, 2, 2);
    let b = Array3D::<u16>::new(2, 2, 3);
    assert_eq!(
        Array4D::from_volumes(vec![a.clone(), b.clone()]),
        Err(VoxelError::SizeMismatch(vec![2, 2, 2], vec![2, 2, 3]))
    );
    assert!(Array4D::<u16>::from_volumes(vec![]).is_err());

    let mut grid = Array4D::from_volume_copies(&[a.clone(), a.clone()]).unwrap();
    assert_eq!(grid.dim(), [2, 2, 2, 2]);
    assert!(grid.replace_volume(0, b).is_err());
    assert!(grid.replace_volume(2, a.clone()).is_err());
    let ones = a.map(|_| 1);
    let old = grid.replace_volume(1, ones).unwrap();
    assert_eq!(old, a);
    assert_eq!(grid.values().filter(|v| *v == 1).count(), 8);

    grid.apply_in_volume(0, |v| v + 5).unwrap();
    assert_eq!(grid.volume(0)[[1, 1, 1]], 5);
    assert!(grid.apply_in_volume(9, |v| v).is_err());
}

#[test]
fn parallel_map_matches_sequential() {
    let grid = scrambled_4d();
    let f = |v: f64| (v * 3.).round() as i32;
    assert_eq!(grid.map_parallel(f), grid.map(f));

    let mut doubled = grid.clone();
    doubled.apply_in_place(|v| v * 2.);
    assert!(doubled.values().zip(grid.values()).all(|(d, g)| d == 2. * g));
}

#[test]
fn sorting_and_ranks() {
    let grid = scrambled_4d();
    let ascending = grid.indices_sorted_ascending();
    let mut descending = grid.indices_sorted_descending(None).unwrap();
    assert_eq!(ascending.len(), 48);
    assert!(ascending.windows(2).all(|w| grid[w[0]] <= grid[w[1]]));
    descending.reverse();
    assert_eq!(descending, ascending);

    let mask = Array3D::from_fn([2, 3, 2], |i, _, _| i == 0);
    let masked = grid.indices_sorted_descending(Some(&mask)).unwrap();
    assert_eq!(masked.len(), 24);
    assert!(masked.iter().all(|idx| idx[0] == 0));
    assert!(masked.windows(2).all(|w| grid[w[0]] >= grid[w[1]]));
    assert!(grid.indices_sorted_descending(Some(&Array3D::new(2, 2, 2))).is_err());

    let ranks = grid.ranks();
    let normalised = grid.ranks_normalised();
    let lowest = ascending[0];
    let highest = ascending[47];
    assert_eq!(ranks[lowest], 0);
    assert_eq!(normalised[lowest], 0.);
    assert_eq!(normalised[highest], 1.);
}
