//! Flat voxel buffers for exchanging voxels with other imaging code.
//!
//! A [`VoxelBuffer`] carries the voxels together with the shape and the
//! linearization convention they were written in, and validates that the
//! three agree before anything is copied into a grid.
use super::element::DataElement;
use super::{Array3D, Array4D, VoxelArray, VoxelOrder};
use crate::error::{Result, VoxelError};
use crate::util::{check_same_shape, check_voxel_count};

/// A flat buffer of voxels in a declared order, with an explicit shape.
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelBuffer<T> {
    shape: Vec<usize>,
    order: VoxelOrder,
    data: Vec<T>,
}

impl<T: DataElement> VoxelBuffer<T> {
    /// Wrap a flat buffer.
    ///
    /// # Errors
    ///
    /// - `VoxelError::InvalidArgument` if the rank is not between 1 and 4,
    /// or the buffer length is not the product of the shape.
    pub fn new(data: Vec<T>, shape: &[usize], order: VoxelOrder) -> Result<Self> {
        if shape.is_empty() || shape.len() > 4 {
            return Err(VoxelError::InvalidArgument(format!(
                "Unsupported rank {}",
                shape.len()
            )));
        }
        check_voxel_count(shape.iter().product(), data.len())?;
        Ok(VoxelBuffer {
            shape: shape.to_vec(),
            order,
            data,
        })
    }

    /// Linearize a grid into a new buffer.
    pub fn from_grid<A>(grid: &A, order: VoxelOrder) -> Self
    where
        A: VoxelArray<T>,
    {
        VoxelBuffer {
            shape: grid.shape().to_vec(),
            order,
            data: grid.to_vec(order),
        }
    }

    /// The shape the voxels were written with.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// The linearization convention of the voxels.
    pub fn order(&self) -> VoxelOrder {
        self.order
    }

    /// View the voxels.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Consume the buffer into its voxels.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Copy the voxels into an existing grid.
    ///
    /// # Errors
    ///
    /// - `VoxelError::SizeMismatch` if the grid's shape is not the buffer's.
    pub fn write_into<A>(&self, grid: &mut A) -> Result<()>
    where
        A: VoxelArray<T>,
    {
        check_same_shape(&self.shape, grid.shape())?;
        grid.set_from(self.order, &self.data)
    }

    /// Build a rank 3 grid from the buffer.
    ///
    /// # Errors
    ///
    /// - `VoxelError::InvalidArgument` if the buffer is not rank 3.
    pub fn to_array3d(&self) -> Result<Array3D<T>> {
        match self.shape[..] {
            [s0, s1, s2] => {
                let mut out = Array3D::new(s0, s1, s2);
                self.write_into(&mut out)?;
                Ok(out)
            }
            _ => Err(VoxelError::InvalidArgument(format!(
                "Expected a rank 3 buffer, got shape {:?}",
                self.shape
            ))),
        }
    }

    /// Build a rank 4 grid from the buffer.
    ///
    /// # Errors
    ///
    /// - `VoxelError::InvalidArgument` if the buffer is not rank 4.
    pub fn to_array4d(&self) -> Result<Array4D<T>> {
        match self.shape[..] {
            [s0, s1, s2, s3] => {
                let mut out = Array4D::new(s0, s1, s2, s3);
                self.write_into(&mut out)?;
                Ok(out)
            }
            _ => Err(VoxelError::InvalidArgument(format!(
                "Expected a rank 4 buffer, got shape {:?}",
                self.shape
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::VoxelBuffer;
    use crate::error::VoxelError;
    use crate::volume::{Array3D, VoxelOrder};

    #[test]
    fn validates_length_and_rank() {
        assert!(VoxelBuffer::new(vec![0u8; 6], &[2, 3], VoxelOrder::XFastest).is_ok());
        assert!(VoxelBuffer::new(vec![0u8; 5], &[2, 3], VoxelOrder::XFastest).is_err());
        assert!(VoxelBuffer::new(vec![0u8; 1], &[], VoxelOrder::XFastest).is_err());
        assert!(VoxelBuffer::new(vec![0u8; 1], &[1; 5], VoxelOrder::XFastest).is_err());
    }

    #[test]
    fn write_checks_shape() {
        let buf = VoxelBuffer::new((0..8).collect::<Vec<i32>>(), &[2, 2, 2], VoxelOrder::XFastest).unwrap();
        let mut grid = Array3D::<i32>::new(2, 4, 1);
        assert_eq!(
            buf.write_into(&mut grid),
            Err(VoxelError::SizeMismatch(vec![2, 2, 2], vec![2, 4, 1]))
        );
        let grid = buf.to_array3d().unwrap();
        assert_eq!(grid[[1, 0, 0]], 1);
        assert!(buf.to_array4d().is_err());
    }
}
