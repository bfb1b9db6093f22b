//! This module defines the data element API, which characterizes the
//! closed set of voxel types that grids are instantiated for.
use crate::typedef::ElementType;
use std::cmp::Ordering;
use std::fmt::Debug;

/// Trait type for characterizing a voxel element, implemented for the
/// primitive types which are used by the crate to represent voxel values.
///
/// `Default::default()` is the element's zero value: it fills freshly
/// allocated grids and the positions vacated by shifts.
pub trait DataElement: 'static + Sized + Copy + Default + PartialEq + Debug + Send + Sync {
    /// The element type mapped to `Self`.
    const DATA_TYPE: ElementType;

    /// A total order over values of this type. Integers and booleans use
    /// their natural order, floating point types use IEEE 754 `totalOrder`,
    /// so that sorting never meets an incomparable pair.
    fn total_cmp(&self, other: &Self) -> Ordering;
}

macro_rules! impl_data_element_ord {
    ($t: ty, $dt: expr) => {
        impl DataElement for $t {
            const DATA_TYPE: ElementType = $dt;

            #[inline]
            fn total_cmp(&self, other: &Self) -> Ordering {
                Ord::cmp(self, other)
            }
        }
    };
}

macro_rules! impl_data_element_float {
    ($t: ty, $dt: expr) => {
        impl DataElement for $t {
            const DATA_TYPE: ElementType = $dt;

            #[inline]
            fn total_cmp(&self, other: &Self) -> Ordering {
                <$t>::total_cmp(self, other)
            }
        }
    };
}

impl_data_element_ord!(bool, ElementType::Bool);
impl_data_element_ord!(u8, ElementType::Uint8);
impl_data_element_ord!(i8, ElementType::Int8);
impl_data_element_ord!(u16, ElementType::Uint16);
impl_data_element_ord!(i16, ElementType::Int16);
impl_data_element_ord!(i32, ElementType::Int32);
impl_data_element_ord!(i64, ElementType::Int64);
impl_data_element_float!(f32, ElementType::Float32);
impl_data_element_float!(f64, ElementType::Float64);

#[cfg(test)]
mod tests {
    use super::DataElement;
    use crate::typedef::ElementType;
    use std::cmp::Ordering;

    #[test]
    fn data_types() {
        assert_eq!(<u8 as DataElement>::DATA_TYPE, ElementType::Uint8);
        assert_eq!(<bool as DataElement>::DATA_TYPE, ElementType::Bool);
        assert_eq!(<f64 as DataElement>::DATA_TYPE, ElementType::Float64);
    }

    #[test]
    fn float_total_order() {
        assert_eq!(DataElement::total_cmp(&1.0f32, &2.0), Ordering::Less);
        assert_eq!(DataElement::total_cmp(&f32::NAN, &f32::INFINITY), Ordering::Greater);
        assert_eq!(DataElement::total_cmp(&-3i16, &-3), Ordering::Equal);
        assert_eq!(DataElement::total_cmp(&false, &true), Ordering::Less);
    }
}
