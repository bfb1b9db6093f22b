//! Module holding the rank 1 voxel array.
use super::element::DataElement;
use super::{VoxelArray, VoxelOrder};
use crate::error::Result;
use crate::util::check_voxel_count;
use std::ops::{Deref, Index};

/// A rank 1 voxel array, such as a per-volume intensity profile. Both
/// linearization conventions coincide for this rank.
#[derive(Debug, Clone, PartialEq)]
pub struct Array1D<T> {
    dim: [usize; 1],
    data: Vec<T>,
}

impl<T: DataElement> Array1D<T> {
    /// Create a zero-filled array of the given length.
    pub fn new(len: usize) -> Self {
        Array1D {
            dim: [len],
            data: vec![T::default(); len],
        }
    }

    /// Wrap an existing vector of voxels.
    pub fn from_vec(data: Vec<T>) -> Self {
        Array1D {
            dim: [data.len()],
            data,
        }
    }

    /// Consume the array into its voxels.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T> Deref for Array1D<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.data
    }
}

impl<T> Index<usize> for Array1D<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.data[index]
    }
}

impl<T: DataElement> From<Vec<T>> for Array1D<T> {
    fn from(data: Vec<T>) -> Self {
        Array1D::from_vec(data)
    }
}

impl<T: DataElement> VoxelArray<T> for Array1D<T> {
    fn shape(&self) -> &[usize] {
        &self.dim
    }

    fn to_vec(&self, _order: VoxelOrder) -> Vec<T> {
        self.data.clone()
    }

    fn set_from(&mut self, _order: VoxelOrder, voxels: &[T]) -> Result<()> {
        check_voxel_count(self.data.len(), voxels.len())?;
        self.data.copy_from_slice(voxels);
        Ok(())
    }
}
