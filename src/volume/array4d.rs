//! Module holding the rank 4 voxel grid, a stack of rank 3 volumes.
//!
//! Each volume is an independent [`Array3D`], so that per-volume work can
//! be handed out to worker threads (see [`Array4D::map_parallel`]). All
//! volumes share one spatial shape.
use super::array3d::Array3D;
use super::element::DataElement;
use super::util::{ascending_order, normalised_ranks, ranks};
use super::{VoxelArray, VoxelOrder};
use crate::error::{Result, VoxelError};
use crate::util::{check_same_shape, check_voxel_count, resolve_range};
use std::ops::{Index, IndexMut};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A rank 4 voxel grid. Index `[x, y, z, v]` addresses voxel `[x, y, z]`
/// of volume `v`.
#[derive(Debug, Clone, PartialEq)]
pub struct Array4D<T> {
    dim: [usize; 4],
    volumes: Vec<Array3D<T>>,
}

impl<T: DataElement> Array4D<T> {
    /// Create a zero-filled grid of `size3` volumes.
    pub fn new(size0: usize, size1: usize, size2: usize, size3: usize) -> Self {
        Array4D {
            dim: [size0, size1, size2, size3],
            volumes: (0..size3).map(|_| Array3D::new(size0, size1, size2)).collect(),
        }
    }

    /// Stack the given volumes, taking ownership of them.
    ///
    /// # Errors
    ///
    /// - `VoxelError::InvalidArgument` if there are no volumes.
    /// - `VoxelError::SizeMismatch` if the volumes differ in shape.
    pub fn from_volumes(volumes: Vec<Array3D<T>>) -> Result<Self> {
        let first = volumes
            .first()
            .ok_or_else(|| VoxelError::InvalidArgument("Array4D cannot be empty".to_owned()))?
            .dim();
        for v in &volumes[1..] {
            check_same_shape(&first, &v.dim())?;
        }
        Ok(Array4D {
            dim: [first[0], first[1], first[2], volumes.len()],
            volumes,
        })
    }

    /// Stack volumes already known to share one shape.
    pub(super) fn from_parts(spatial: [usize; 3], volumes: Vec<Array3D<T>>) -> Self {
        debug_assert!(volumes.iter().all(|v| v.dim() == spatial));
        Array4D {
            dim: [spatial[0], spatial[1], spatial[2], volumes.len()],
            volumes,
        }
    }

    /// Stack copies of the given volumes.
    ///
    /// # Errors
    ///
    /// As in [`from_volumes`](Self::from_volumes).
    pub fn from_volume_copies(volumes: &[Array3D<T>]) -> Result<Self> {
        Array4D::from_volumes(volumes.to_vec())
    }

    /// Create a grid from a flat buffer in X-fastest order, volume slowest.
    ///
    /// # Errors
    ///
    /// - `VoxelError::InvalidArgument` on a wrong number of voxels.
    pub fn from_x_fastest(dim: [usize; 4], voxels: &[T]) -> Result<Self> {
        let mut out = Array4D::new(dim[0], dim[1], dim[2], dim[3]);
        out.set_from(VoxelOrder::XFastest, voxels)?;
        Ok(out)
    }

    /// Create a grid from a stream of values, filling one volume at a time
    /// in X-fastest order.
    pub fn from_generator<F>(dim: [usize; 4], mut generator: F) -> Self
    where
        F: FnMut() -> T,
    {
        let spatial = [dim[0], dim[1], dim[2]];
        Array4D {
            dim,
            volumes: (0..dim[3])
                .map(|_| Array3D::from_generator(spatial, &mut generator))
                .collect(),
        }
    }

    /// Get the shape of the grid, the number of volumes last.
    pub fn dim(&self) -> [usize; 4] {
        self.dim
    }

    /// Get the number of volumes.
    pub fn volume_count(&self) -> usize {
        self.dim[3]
    }

    /// Borrow one volume. Panics if `index` is not below the volume count.
    pub fn volume(&self, index: usize) -> &Array3D<T> {
        &self.volumes[index]
    }

    /// Swap in a new volume of the same spatial shape, returning the old
    /// one.
    ///
    /// # Errors
    ///
    /// - `VoxelError::OutOfRange` if `index` is not below the volume count.
    /// - `VoxelError::SizeMismatch` if the volume has a different shape.
    pub fn replace_volume(&mut self, index: usize, volume: Array3D<T>) -> Result<Array3D<T>> {
        let _ = resolve_range(&(index..=index), 3, self.dim[3])?;
        check_same_shape(&self.dim[..3], &volume.dim())?;
        Ok(std::mem::replace(&mut self.volumes[index], volume))
    }

    /// Replace every voxel of one volume with `f(value)`.
    ///
    /// # Errors
    ///
    /// - `VoxelError::OutOfRange` if `index` is not below the volume count.
    pub fn apply_in_volume<F>(&mut self, index: usize, f: F) -> Result<()>
    where
        F: FnMut(T) -> T,
    {
        let _ = resolve_range(&(index..=index), 3, self.dim[3])?;
        self.volumes[index].apply_in_place(f);
        Ok(())
    }

    /// Borrow all volumes in order.
    pub fn volumes(&self) -> &[Array3D<T>] {
        &self.volumes
    }

    /// Consume the grid into its volumes.
    pub fn into_volumes(self) -> Vec<Array3D<T>> {
        self.volumes
    }

    /// Replace every voxel with `f(value)`.
    pub fn apply_in_place<F>(&mut self, mut f: F)
    where
        F: FnMut(T) -> T,
    {
        for v in &mut self.volumes {
            v.apply_in_place(&mut f);
        }
    }

    /// Map every voxel into a new grid, one volume after the other.
    pub fn map<S, F>(&self, mut f: F) -> Array4D<S>
    where
        S: DataElement,
        F: FnMut(T) -> S,
    {
        Array4D {
            dim: self.dim,
            volumes: self.volumes.iter().map(|v| v.map(&mut f)).collect(),
        }
    }

    /// Map every voxel into a new grid, each volume on a worker of the
    /// global thread pool. The result is identical to [`map`](Self::map).
    ///
    /// Without the `parallel` feature the volumes are mapped in sequence.
    pub fn map_parallel<S, F>(&self, f: F) -> Array4D<S>
    where
        S: DataElement,
        F: Fn(T) -> S + Sync + Send,
    {
        debug!("Mapping {} volumes of {:?}", self.dim[3], &self.dim[..3]);
        #[cfg(feature = "parallel")]
        let volumes = self.volumes.par_iter().map(|v| v.map(&f)).collect();
        #[cfg(not(feature = "parallel"))]
        let volumes = self.volumes.iter().map(|v| v.map(&f)).collect();
        Array4D {
            dim: self.dim,
            volumes,
        }
    }

    /// Iterate over all voxels, one volume after the other.
    pub fn values(&self) -> impl Iterator<Item = T> + '_ {
        self.volumes.iter().flat_map(|v| v.values())
    }

    /// Replace each voxel with its rank among all voxels of all volumes.
    pub fn ranks(&self) -> Array4D<i64> {
        let all: Vec<T> = self.values().collect();
        self.split(ranks(&all))
    }

    /// Replace each voxel with its rank, rescaled to span exactly `[0, 1]`.
    pub fn ranks_normalised(&self) -> Array4D<f32> {
        let all: Vec<T> = self.values().collect();
        self.split(normalised_ranks(&all))
    }

    /// Every index of the grid, ordered by ascending voxel value. Equal
    /// values keep their traversal order (volume by volume).
    pub fn indices_sorted_ascending(&self) -> Vec<[usize; 4]> {
        let all: Vec<T> = self.values().collect();
        ascending_order(&all)
            .into_iter()
            .map(|n| self.unravel(n))
            .collect()
    }

    /// Every index of the grid ordered by descending voxel value, the
    /// reverse of [`indices_sorted_ascending`](Self::indices_sorted_ascending).
    /// With a spatial mask, only the indices whose `[x, y, z]` lies inside
    /// the mask are kept.
    ///
    /// # Errors
    ///
    /// - `VoxelError::SizeMismatch` if the mask does not have the spatial
    /// shape of the grid.
    pub fn indices_sorted_descending(&self, mask: Option<&Array3D<bool>>) -> Result<Vec<[usize; 4]>> {
        if let Some(mask) = mask {
            check_same_shape(&self.dim[..3], &mask.dim())?;
        }
        let mut out = self.indices_sorted_ascending();
        out.reverse();
        if let Some(mask) = mask {
            out.retain(|&[x, y, z, _]| mask[[x, y, z]]);
        }
        Ok(out)
    }

    fn unravel(&self, n: usize) -> [usize; 4] {
        let [d0, d1, d2, _] = self.dim;
        let per_volume = d0 * d1 * d2;
        let v = n / per_volume;
        let r = n % per_volume;
        [r / (d1 * d2), (r / d2) % d1, r % d2, v]
    }

    fn split<S: DataElement>(&self, all: Vec<S>) -> Array4D<S> {
        let spatial = [self.dim[0], self.dim[1], self.dim[2]];
        let per_volume: usize = spatial.iter().product();
        Array4D {
            dim: self.dim,
            volumes: (0..self.dim[3])
                .map(|v| Array3D::from_parts(spatial, all[v * per_volume..(v + 1) * per_volume].to_vec()))
                .collect(),
        }
    }
}

impl<T> Index<[usize; 4]> for Array4D<T> {
    type Output = T;

    fn index(&self, [x, y, z, v]: [usize; 4]) -> &T {
        &self.volumes[v][[x, y, z]]
    }
}

impl<T> IndexMut<[usize; 4]> for Array4D<T> {
    fn index_mut(&mut self, [x, y, z, v]: [usize; 4]) -> &mut T {
        &mut self.volumes[v][[x, y, z]]
    }
}

impl<T: DataElement> VoxelArray<T> for Array4D<T> {
    fn shape(&self) -> &[usize] {
        &self.dim
    }

    fn to_vec(&self, order: VoxelOrder) -> Vec<T> {
        match order {
            VoxelOrder::XFastest => self
                .volumes
                .iter()
                .flat_map(|v| v.to_vec(VoxelOrder::XFastest))
                .collect(),
            VoxelOrder::LastDimFastest => {
                let n = self.dim[3];
                let mut out = vec![T::default(); self.number_of_voxels()];
                for (v, volume) in self.volumes.iter().enumerate() {
                    for (i, value) in volume.values().enumerate() {
                        out[i * n + v] = value;
                    }
                }
                out
            }
        }
    }

    fn set_from(&mut self, order: VoxelOrder, voxels: &[T]) -> Result<()> {
        check_voxel_count(self.number_of_voxels(), voxels.len())?;
        let per_volume: usize = self.dim[..3].iter().product();
        if per_volume == 0 {
            return Ok(());
        }
        match order {
            VoxelOrder::XFastest => {
                for (volume, chunk) in self.volumes.iter_mut().zip(voxels.chunks_exact(per_volume)) {
                    volume.set_from(VoxelOrder::XFastest, chunk)?;
                }
            }
            VoxelOrder::LastDimFastest => {
                let n = self.dim[3];
                for (v, volume) in self.volumes.iter_mut().enumerate() {
                    let values: Vec<T> = voxels.iter().skip(v).step_by(n).copied().collect();
                    volume.set_from(VoxelOrder::LastDimFastest, &values)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Array4D;
    use crate::error::VoxelError;
    use crate::volume::{Array3D, VoxelArray, VoxelOrder};

    #[test]
    fn stacking() {
        let a = Array3D::from_fn([2, 2, 1], |i, j, _| (i * 2 + j) as u16);
        let b = a.map(|v| v + 10);
        let grid = Array4D::from_volumes(vec![a.clone(), b]).unwrap();
        assert_eq!(grid.dim(), [2, 2, 1, 2]);
        assert_eq!(grid[[1, 0, 0, 1]], 12);
        assert_eq!(grid.volume(0), &a);

        let mut grid = grid;
        let old = grid.replace_volume(0, a.map(|v| v * 2)).unwrap();
        assert_eq!(old, a);
        assert_eq!(grid[[1, 1, 0, 0]], 6);
        assert!(grid.replace_volume(0, Array3D::new(1, 1, 1)).is_err());
        assert!(grid.replace_volume(2, a.clone()).is_err());
        grid.apply_in_volume(1, |v| v - 10).unwrap();
        assert_eq!(grid.volume(1), &a);

        assert!(matches!(
            Array4D::<u16>::from_volumes(vec![]),
            Err(VoxelError::InvalidArgument(_))
        ));
        assert_eq!(
            Array4D::from_volume_copies(&[a, Array3D::new(2, 1, 1)]),
            Err(VoxelError::SizeMismatch(vec![2, 2, 1], vec![2, 1, 1]))
        );
    }

    #[test]
    fn linearizations() {
        let grid = Array4D::from_x_fastest([2, 1, 1, 3], &[1i8, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(grid[[1, 0, 0, 0]], 2);
        assert_eq!(grid[[0, 0, 0, 2]], 5);
        assert_eq!(grid.to_vec(VoxelOrder::LastDimFastest), vec![1, 3, 5, 2, 4, 6]);

        let mut other = Array4D::new(2, 1, 1, 3);
        other.set_from(VoxelOrder::LastDimFastest, &[1, 3, 5, 2, 4, 6]).unwrap();
        assert_eq!(other, grid);
        assert!(other.set_from(VoxelOrder::XFastest, &[0; 5]).is_err());
        assert_eq!(other, grid);
    }

    #[test]
    fn sorted_indices_with_mask() {
        let grid = Array4D::from_x_fastest([2, 1, 1, 2], &[0.5f32, 3., 2., -1.]).unwrap();
        assert_eq!(
            grid.indices_sorted_ascending(),
            vec![[1, 0, 0, 1], [0, 0, 0, 0], [0, 0, 0, 1], [1, 0, 0, 0]]
        );
        let mask = Array3D::from_fn([2, 1, 1], |i, _, _| i == 0);
        assert_eq!(
            grid.indices_sorted_descending(Some(&mask)).unwrap(),
            vec![[0, 0, 0, 1], [0, 0, 0, 0]]
        );
        assert!(grid.indices_sorted_descending(Some(&Array3D::new(1, 1, 1))).is_err());
    }

    #[test]
    fn ranks_across_volumes() {
        let grid = Array4D::from_x_fastest([1, 1, 2, 2], &[10u8, 40, 30, 20]).unwrap();
        assert_eq!(grid.ranks().to_vec(VoxelOrder::XFastest), vec![0, 3, 2, 1]);
        let r = grid.ranks_normalised();
        assert_eq!(r[[0, 0, 1, 0]], 1.);
        assert_eq!(r[[0, 0, 0, 0]], 0.);
    }
}
