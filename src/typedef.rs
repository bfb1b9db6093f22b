//! This module contains the closed set of voxel element types that the
//! grids are instantiated for. The discriminants are the NIfTI-1
//! `datatype` codes, so that primitive integer values read from a header
//! can be converted to these types and vice-versa. The coordinate system
//! codes of the qform are also found here.

/// Data type of the elements stored in a voxel grid.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, FromPrimitive)]
pub enum ElementType {
    /// binary (1 bit/voxel), held as `bool`.
    // NIFTI_TYPE_BINARY            1
    Bool = 1,
    /// unsigned char.
    // NIFTI_TYPE_UINT8           2
    Uint8 = 2,
    /// signed short.
    // NIFTI_TYPE_INT16           4
    Int16 = 4,
    /// signed int.
    // NIFTI_TYPE_INT32           8
    Int32 = 8,
    /// 32 bit float.
    // NIFTI_TYPE_FLOAT32        16
    Float32 = 16,
    /// 64 bit float = double.
    // NIFTI_TYPE_FLOAT64        64
    Float64 = 64,
    /// signed char.
    // NIFTI_TYPE_INT8          256
    Int8 = 256,
    /// unsigned short.
    // NIFTI_TYPE_UINT16        512
    Uint16 = 512,
    /// signed long long.
    // NIFTI_TYPE_INT64        1024
    Int64 = 1024,
}

impl ElementType {
    /// Retrieve the in-memory size of an element of this data type, in bytes.
    pub fn size_of(&self) -> usize {
        use self::ElementType::*;
        match *self {
            Bool | Int8 | Uint8 => 1,
            Int16 | Uint16 => 2,
            Int32 | Float32 => 4,
            Int64 | Float64 => 8,
        }
    }

    /// Whether the type is a floating point type.
    pub fn is_float(&self) -> bool {
        matches!(*self, ElementType::Float32 | ElementType::Float64)
    }
}

/// Coordinate system named by a header's `qform_code`.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, FromPrimitive)]
pub enum XForm {
    /// Arbitrary coordinates, no orientation stored.
    Unknown = 0,
    /// Scanner-based anatomical coordinates
    ScannerAnat = 1,
    /// Coordinates aligned to another file's,
    /// or to anatomical "truth".
    AlignedAnat = 2,
    /// Coordinates aligned to Talairach-Tournoux
    /// Atlas; (0,0,0)=AC, etc.
    Talairach = 3,
    /// MNI 152 normalized coordinates.
    Mni152 = 4,
}
