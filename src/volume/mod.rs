//! This module defines the voxel grid API: owned rank 1 to 4 arrays with
//! explicit linearization conventions.
//!
//! Every grid keeps its voxels in a single flat buffer, laid out so that
//! the highest axis varies quickest. Exchanging voxels with other imaging
//! tools goes through [`VoxelArray::to_vec`] and [`VoxelArray::set_from`],
//! which always name the [`VoxelOrder`] of the flat buffer on the other
//! side.
//!
//! An integration with `ndarray` is available with the `ndarray_volumes`
//! feature.

pub mod array1d;
pub mod array2d;
pub mod array3d;
pub mod array4d;
pub mod buffer;
pub mod dynamic;
pub mod element;
#[cfg(feature = "ndarray_volumes")]
pub mod ndarray;
mod util;

pub use self::array1d::Array1D;
pub use self::array2d::Array2D;
pub use self::array3d::Array3D;
pub use self::array4d::Array4D;
pub use self::buffer::VoxelBuffer;
pub use self::dynamic::DynArray3D;
use self::element::DataElement;
use crate::error::Result;

/// Linearization convention of a flat voxel buffer.
///
/// The two conventions are never interchangeable: a buffer written in one
/// and read in the other transposes the axis order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoxelOrder {
    /// Axis 0 varies quickest (`buffer[x + nx * (y + ny * z)]`), as in
    /// NIfTI files and most on-disk formats.
    XFastest,
    /// The highest axis varies quickest
    /// (`buffer[z + nz * (y + ny * x)]`), as in C-ordered buffers.
    LastDimFastest,
}

/// Public API shared by all voxel grids, regardless of their rank.
pub trait VoxelArray<T: DataElement> {
    /// Get the shape of the grid, one size per axis.
    fn shape(&self) -> &[usize];

    /// Get the grid's number of dimensions.
    fn rank(&self) -> usize {
        self.shape().len()
    }

    /// Get the total number of voxels, the product of the shape.
    fn number_of_voxels(&self) -> usize {
        self.shape().iter().product()
    }

    /// Copy all voxels into a new flat buffer in the given order.
    fn to_vec(&self, order: VoxelOrder) -> Vec<T>;

    /// Overwrite all voxels from a flat buffer in the given order.
    ///
    /// # Errors
    ///
    /// - `VoxelError::InvalidArgument` if `voxels.len()` is not the number
    /// of voxels in the grid. The grid is left untouched.
    fn set_from(&mut self, order: VoxelOrder, voxels: &[T]) -> Result<()>;
}
