//! Types for error handling go here.

quick_error! {
    /// Error type for all error kinds in this crate.
    ///
    /// A failed operation never leaves its operands partially written:
    /// every check is made before the first voxel or matrix entry changes.
    #[derive(Debug, Clone, PartialEq)]
    pub enum VoxelError {
        /// An argument was rejected: negative or zero sizes, wrong element
        /// counts, a `qfac` other than ±1, and so on.
        InvalidArgument(msg: String) {
            display("Invalid argument: {}", msg)
        }
        /// A range over an axis does not fit the grid: `start..end` was
        /// asked of axis number `axis`, which holds `len` voxels.
        #[allow(missing_docs)]
        OutOfRange { axis: usize, start: usize, end: usize, len: usize } {
            display("Range {}..{} out of bounds for axis {} of length {}", start, end, axis, len)
        }
        /// Two operands (or an operand and a destination) disagree in shape.
        SizeMismatch(expected: Vec<usize>, got: Vec<usize>) {
            display("Shape mismatch: expected {:?}, got {:?}", expected, got)
        }
        /// The operation is not defined for this input.
        NotSupported(msg: &'static str) {
            display("Not supported: {}", msg)
        }
        /// A matrix with a zero determinant was inverted.
        SingularMatrix {
            display("Matrix is singular and cannot be inverted")
        }
    }
}

/// Alias type for results originated from this crate.
pub type Result<T> = ::std::result::Result<T, VoxelError>;

impl VoxelError {
    /// Shorthand for the error raised by bulk setters when a flat buffer
    /// holds the wrong number of voxels.
    pub(crate) fn bad_voxel_count(expected: usize, got: usize) -> Self {
        VoxelError::InvalidArgument(format!(
            "Bad number of voxels: {}. Expected: {}",
            got, expected
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::VoxelError;

    #[test]
    fn out_of_range_message() {
        let e = VoxelError::OutOfRange {
            axis: 2,
            start: 3,
            end: 11,
            len: 10,
        };
        assert_eq!(e.to_string(), "Range 3..11 out of bounds for axis 2 of length 10");
    }
}
