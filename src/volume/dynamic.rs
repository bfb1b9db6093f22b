//! A rank 3 grid whose element type is only known at run time, such as a
//! volume decoded from a file header's datatype code.
//!
//! The element type is resolved once per bulk operation by matching on the
//! variant; the per-voxel loops are all monomorphic.
use super::element::DataElement;
use super::Array3D;
use crate::typedef::ElementType;
use num_traits::AsPrimitive;

/// A rank 3 grid over one of the supported element types.
#[derive(Debug, Clone, PartialEq)]
pub enum DynArray3D {
    /// Boolean voxels, usually a mask.
    Bool(Array3D<bool>),
    /// `u8` voxels.
    Uint8(Array3D<u8>),
    /// `i8` voxels.
    Int8(Array3D<i8>),
    /// `u16` voxels.
    Uint16(Array3D<u16>),
    /// `i16` voxels.
    Int16(Array3D<i16>),
    /// `i32` voxels.
    Int32(Array3D<i32>),
    /// `i64` voxels.
    Int64(Array3D<i64>),
    /// `f32` voxels.
    Float32(Array3D<f32>),
    /// `f64` voxels.
    Float64(Array3D<f64>),
}

macro_rules! dispatch {
    ($self: expr, $a: ident => $body: expr) => {
        match $self {
            DynArray3D::Bool($a) => $body,
            DynArray3D::Uint8($a) => $body,
            DynArray3D::Int8($a) => $body,
            DynArray3D::Uint16($a) => $body,
            DynArray3D::Int16($a) => $body,
            DynArray3D::Int32($a) => $body,
            DynArray3D::Int64($a) => $body,
            DynArray3D::Float32($a) => $body,
            DynArray3D::Float64($a) => $body,
        }
    };
}

impl DynArray3D {
    /// Get the element type of the voxels.
    pub fn element_type(&self) -> ElementType {
        fn of<T: DataElement>(_: &Array3D<T>) -> ElementType {
            T::DATA_TYPE
        }
        dispatch!(self, a => of(a))
    }

    /// Get the shape of the grid.
    pub fn dim(&self) -> [usize; 3] {
        dispatch!(self, a => a.dim())
    }

    /// Convert every voxel to the numeric type `T` with `as` semantics:
    /// floats are truncated towards zero and saturate at the bounds of
    /// integer types, `true` becomes one.
    pub fn cast<T>(&self) -> Array3D<T>
    where
        T: DataElement,
        u8: AsPrimitive<T>,
        i8: AsPrimitive<T>,
        u16: AsPrimitive<T>,
        i16: AsPrimitive<T>,
        i32: AsPrimitive<T>,
        i64: AsPrimitive<T>,
        f32: AsPrimitive<T>,
        f64: AsPrimitive<T>,
    {
        match self {
            DynArray3D::Bool(a) => a.map(|v| AsPrimitive::<T>::as_(u8::from(v))),
            DynArray3D::Uint8(a) => a.map(AsPrimitive::<T>::as_),
            DynArray3D::Int8(a) => a.map(AsPrimitive::<T>::as_),
            DynArray3D::Uint16(a) => a.map(AsPrimitive::<T>::as_),
            DynArray3D::Int16(a) => a.map(AsPrimitive::<T>::as_),
            DynArray3D::Int32(a) => a.map(AsPrimitive::<T>::as_),
            DynArray3D::Int64(a) => a.map(AsPrimitive::<T>::as_),
            DynArray3D::Float32(a) => a.map(AsPrimitive::<T>::as_),
            DynArray3D::Float64(a) => a.map(AsPrimitive::<T>::as_),
        }
    }

    /// Turn the grid into a mask, true wherever the voxel is not zero.
    pub fn to_mask(&self) -> Array3D<bool> {
        fn nonzero<T: DataElement>(a: &Array3D<T>) -> Array3D<bool> {
            a.map(|v| v != T::default())
        }
        dispatch!(self, a => nonzero(a))
    }
}

macro_rules! impl_from_array {
    ($t: ty, $variant: ident) => {
        impl From<Array3D<$t>> for DynArray3D {
            fn from(a: Array3D<$t>) -> Self {
                DynArray3D::$variant(a)
            }
        }
    };
}

impl_from_array!(bool, Bool);
impl_from_array!(u8, Uint8);
impl_from_array!(i8, Int8);
impl_from_array!(u16, Uint16);
impl_from_array!(i16, Int16);
impl_from_array!(i32, Int32);
impl_from_array!(i64, Int64);
impl_from_array!(f32, Float32);
impl_from_array!(f64, Float64);
