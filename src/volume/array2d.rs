//! Module holding the rank 2 voxel array, used for slices of a volume.
use super::element::DataElement;
use super::util::{transpose_from_x_fastest, transpose_to_x_fastest};
use super::{VoxelArray, VoxelOrder};
use crate::error::Result;
use crate::util::{check_voxel_count, voxel_count};
use std::ops::{Index, IndexMut};

/// A rank 2 voxel array. Voxel `[i, j]` lives at `data[i * size1 + j]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Array2D<T> {
    dim: [usize; 2],
    data: Vec<T>,
}

impl<T: DataElement> Array2D<T> {
    /// Create a zero-filled array.
    ///
    /// # Panics
    ///
    /// If the number of voxels overflows `usize`. See
    /// [`try_new`](Self::try_new) for the fallible form.
    pub fn new(size0: usize, size1: usize) -> Self {
        match Array2D::try_new(size0, size1) {
            Ok(out) => out,
            Err(e) => panic!("{}", e),
        }
    }

    /// Create a zero-filled array.
    ///
    /// # Errors
    ///
    /// - `VoxelError::InvalidArgument` if the number of voxels overflows
    /// `usize`.
    pub fn try_new(size0: usize, size1: usize) -> Result<Self> {
        let dim = [size0, size1];
        Ok(Array2D {
            dim,
            data: vec![T::default(); voxel_count(&dim)?],
        })
    }

    /// Create an array from a flat buffer in the given order.
    ///
    /// # Errors
    ///
    /// - `VoxelError::InvalidArgument` if the buffer does not hold
    /// `size0 * size1` voxels.
    pub fn from_slice(size0: usize, size1: usize, order: VoxelOrder, voxels: &[T]) -> Result<Self> {
        let mut out = Array2D::try_new(size0, size1)?;
        out.set_from(order, voxels)?;
        Ok(out)
    }

    /// Get the shape of the array.
    pub fn dim(&self) -> [usize; 2] {
        self.dim
    }

    /// Replace every voxel with `f(value)`, in ascending index order.
    pub fn apply_in_place<F>(&mut self, mut f: F)
    where
        F: FnMut(T) -> T,
    {
        for v in &mut self.data {
            *v = f(*v);
        }
    }

    /// Replace every voxel with `f(i, j, value)`, in ascending index order.
    pub fn apply_in_place_indexed<F>(&mut self, mut f: F)
    where
        F: FnMut(usize, usize, T) -> T,
    {
        let size1 = self.dim[1];
        for (n, v) in self.data.iter_mut().enumerate() {
            *v = f(n / size1, n % size1, *v);
        }
    }

    /// Iterate over the voxels, highest axis quickest.
    pub fn values(&self) -> impl Iterator<Item = T> + '_ {
        self.data.iter().copied()
    }
}

impl<T> Index<[usize; 2]> for Array2D<T> {
    type Output = T;

    fn index(&self, [i, j]: [usize; 2]) -> &T {
        &self.data[i * self.dim[1] + j]
    }
}

impl<T> IndexMut<[usize; 2]> for Array2D<T> {
    fn index_mut(&mut self, [i, j]: [usize; 2]) -> &mut T {
        &mut self.data[i * self.dim[1] + j]
    }
}

impl<T: DataElement> VoxelArray<T> for Array2D<T> {
    fn shape(&self) -> &[usize] {
        &self.dim
    }

    fn to_vec(&self, order: VoxelOrder) -> Vec<T> {
        match order {
            VoxelOrder::LastDimFastest => self.data.clone(),
            VoxelOrder::XFastest => transpose_to_x_fastest(&self.data, &self.dim),
        }
    }

    fn set_from(&mut self, order: VoxelOrder, voxels: &[T]) -> Result<()> {
        match order {
            VoxelOrder::LastDimFastest => {
                check_voxel_count(self.data.len(), voxels.len())?;
                self.data.copy_from_slice(voxels);
                Ok(())
            }
            VoxelOrder::XFastest => transpose_from_x_fastest(voxels, &mut self.data, &self.dim),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Array2D;
    use crate::volume::{VoxelArray, VoxelOrder};

    #[test]
    fn linearizations() {
        let a = Array2D::from_slice(2, 3, VoxelOrder::XFastest, &[1u8, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(a[[1, 0]], 2);
        assert_eq!(a[[0, 2]], 5);
        assert_eq!(a.to_vec(VoxelOrder::LastDimFastest), vec![1, 3, 5, 2, 4, 6]);
        assert_eq!(a.to_vec(VoxelOrder::XFastest), vec![1, 2, 3, 4, 5, 6]);

        let b = Array2D::from_slice(2, 3, VoxelOrder::LastDimFastest, &[1u8, 3, 5, 2, 4, 6]).unwrap();
        assert_eq!(a, b);
        assert!(Array2D::<u8>::from_slice(2, 3, VoxelOrder::LastDimFastest, &[1]).is_err());
    }

    #[test]
    fn apply_indexed() {
        let mut a = Array2D::<i32>::new(3, 4);
        a.apply_in_place_indexed(|i, j, v| v + (10 * i + j) as i32);
        assert_eq!(a[[2, 3]], 23);
        a.apply_in_place(|v| -v);
        assert_eq!(a[[1, 2]], -12);
        assert_eq!(a.values().count(), 12);
    }

    #[test]
    fn oversized_shape() {
        assert!(Array2D::<u8>::try_new(usize::MAX, 2).is_err());
        assert!(Array2D::<u8>::from_slice(usize::MAX, 2, VoxelOrder::XFastest, &[]).is_err());
        assert_eq!(Array2D::<u8>::try_new(0, usize::MAX).unwrap().values().count(), 0);
    }

    #[test]
    #[should_panic(expected = "too many voxels")]
    fn oversized_new_panics() {
        let _ = Array2D::<u8>::new(usize::MAX, 2);
    }
}
