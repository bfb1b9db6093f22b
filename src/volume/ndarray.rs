//! Interfaces and implementations specific to integration with `ndarray`.
//!
//! This module introduces the trait [`IntoNdArray`], which is implemented
//! for all grid types and maps them into an [`Array`] with a dynamic
//! number of dimensions. Grids can also be built from fixed-rank `ndarray`
//! arrays through `From`.
//!
//! #### Note on memory order
//!
//! Grids keep their voxels with the highest axis quickest, which is the
//! standard (row major) layout of `ndarray`. Conversions in both
//! directions are plain copies with no transposition, and a rank 4 grid
//! maps to an array of shape `(x, y, z, volume)`.
//!
//! [`IntoNdArray`]: ./trait.IntoNdArray.html
//! [`Array`]: ../../../ndarray/type.Array.html
use super::element::DataElement;
use super::{Array1D, Array2D, Array3D, Array4D, VoxelArray, VoxelOrder};
use crate::error::{Result, VoxelError};
use ndarray::{Array, Array1, Array2, Array3, Array4, Axis, IxDyn};

/// Trait for grids which can be converted to an ndarray.
///
/// Please see the [module-level documentation](index.html) for more details.
pub trait IntoNdArray {
    /// The voxel type of the grid.
    type Elem;

    /// Consume the grid into an ndarray with the same shape.
    fn into_ndarray(self) -> Result<Array<Self::Elem, IxDyn>>;
}

fn shaped<T>(shape: &[usize], data: Vec<T>) -> Result<Array<T, IxDyn>> {
    Array::from_shape_vec(IxDyn(shape), data).map_err(|e| VoxelError::InvalidArgument(e.to_string()))
}

impl<T: DataElement> IntoNdArray for Array1D<T> {
    type Elem = T;

    fn into_ndarray(self) -> Result<Array<T, IxDyn>> {
        let shape = self.shape().to_vec();
        shaped(&shape, self.into_vec())
    }
}

impl<T: DataElement> IntoNdArray for Array2D<T> {
    type Elem = T;

    fn into_ndarray(self) -> Result<Array<T, IxDyn>> {
        shaped(self.shape(), self.to_vec(VoxelOrder::LastDimFastest))
    }
}

impl<T: DataElement> IntoNdArray for Array3D<T> {
    type Elem = T;

    fn into_ndarray(self) -> Result<Array<T, IxDyn>> {
        let shape = self.dim();
        shaped(&shape, self.into_raw_vec())
    }
}

impl<T: DataElement> IntoNdArray for Array4D<T> {
    type Elem = T;

    fn into_ndarray(self) -> Result<Array<T, IxDyn>> {
        shaped(self.shape(), self.to_vec(VoxelOrder::LastDimFastest))
    }
}

impl<T: DataElement> From<Array1<T>> for Array1D<T> {
    fn from(a: Array1<T>) -> Self {
        Array1D::from_vec(a.iter().copied().collect())
    }
}

impl<T: DataElement> From<Array2<T>> for Array2D<T> {
    fn from(a: Array2<T>) -> Self {
        let (s0, s1) = a.dim();
        let mut out = Array2D::new(s0, s1);
        out.apply_in_place_indexed(|i, j, _| a[[i, j]]);
        out
    }
}

impl<T: DataElement> From<Array3<T>> for Array3D<T> {
    fn from(a: Array3<T>) -> Self {
        let (s0, s1, s2) = a.dim();
        // logical order is row major whatever the memory layout
        Array3D::from_parts([s0, s1, s2], a.iter().copied().collect())
    }
}

impl<T: DataElement> From<Array4<T>> for Array4D<T> {
    fn from(a: Array4<T>) -> Self {
        let (s0, s1, s2, _) = a.dim();
        let volumes = a
            .axis_iter(Axis(3))
            .map(|v| Array3D::from_parts([s0, s1, s2], v.iter().copied().collect()))
            .collect();
        Array4D::from_parts([s0, s1, s2], volumes)
    }
}
