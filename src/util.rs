//! Private utility module
use crate::error::{Result, VoxelError};
use crate::orientation::Real;
use std::ops::{Bound, RangeBounds};

/// Resolve a range over an axis of length `len` into `(start, end)`,
/// failing if it reaches outside of `0..len`.
pub(crate) fn resolve_range<R>(range: &R, axis: usize, len: usize) -> Result<(usize, usize)>
where
    R: RangeBounds<usize>,
{
    let start = match range.start_bound() {
        Bound::Included(&s) => s,
        Bound::Excluded(&s) => s + 1,
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&e) => e + 1,
        Bound::Excluded(&e) => e,
        Bound::Unbounded => len,
    };
    if start > end || end > len {
        return Err(VoxelError::OutOfRange {
            axis,
            start,
            end,
            len,
        });
    }
    Ok((start, end))
}

/// Fail with `InvalidArgument` unless the buffer holds exactly `expected`
/// voxels.
pub(crate) fn check_voxel_count(expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(VoxelError::bad_voxel_count(expected, got));
    }
    Ok(())
}

/// Fail with `SizeMismatch` unless both shapes are identical.
pub(crate) fn check_same_shape(expected: &[usize], got: &[usize]) -> Result<()> {
    if expected != got {
        return Err(VoxelError::SizeMismatch(expected.to_vec(), got.to_vec()));
    }
    Ok(())
}

/// Sign of a value, with zero mapping to zero (unlike `f64::signum`).
pub(crate) fn sign(value: f64) -> f64 {
    if value > 0. {
        1.
    } else if value < 0. {
        -1.
    } else {
        0.
    }
}

/// Number of voxels in a grid of the given shape.
///
/// Fails with `InvalidArgument` if the count does not fit in `usize`.
pub(crate) fn voxel_count(dim: &[usize]) -> Result<usize> {
    dim.iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| VoxelError::InvalidArgument(format!("Shape {:?} holds too many voxels", dim)))
}

/// Validate the NIfTI `qfac` sign factor.
pub(crate) fn validate_qfac<T: Real>(qfac: T) -> Result<()> {
    if qfac != T::one() && qfac != -T::one() {
        return Err(VoxelError::InvalidArgument(format!(
            "qfac expected only to be +1 or -1, got {}",
            qfac
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{check_same_shape, resolve_range, sign, validate_qfac, voxel_count};
    use crate::error::VoxelError;

    #[test]
    fn test_resolve_range() {
        assert_eq!(resolve_range(&(..), 0, 10).unwrap(), (0, 10));
        assert_eq!(resolve_range(&(2..5), 0, 10).unwrap(), (2, 5));
        assert_eq!(resolve_range(&(2..=5), 0, 10).unwrap(), (2, 6));
        assert_eq!(resolve_range(&(7..), 0, 10).unwrap(), (7, 10));
        assert_eq!(resolve_range(&(10..10), 0, 10).unwrap(), (10, 10));
        assert_eq!(
            resolve_range(&(3..11), 1, 10),
            Err(VoxelError::OutOfRange {
                axis: 1,
                start: 3,
                end: 11,
                len: 10
            })
        );
        #[allow(clippy::reversed_empty_ranges)]
        let backwards = 5..3;
        assert!(resolve_range(&backwards, 0, 10).is_err());
    }

    #[test]
    fn test_sign() {
        assert_eq!(sign(3.5), 1.);
        assert_eq!(sign(-0.1), -1.);
        assert_eq!(sign(0.), 0.);
        assert_eq!(sign(-0.), 0.);
    }

    #[test]
    fn test_checks() {
        assert!(check_same_shape(&[2, 3], &[2, 3]).is_ok());
        assert!(check_same_shape(&[2, 3], &[3, 2]).is_err());
        assert!(validate_qfac(1.).is_ok());
        assert!(validate_qfac(-1.).is_ok());
        assert!(validate_qfac(0.).is_err());
        assert!(validate_qfac(0.5f32).is_err());
        assert!(validate_qfac(f64::NAN).is_err());
    }

    #[test]
    fn test_voxel_count() {
        assert_eq!(voxel_count(&[2, 3, 4]), Ok(24));
        assert_eq!(voxel_count(&[2, 0, 4]), Ok(0));
        assert!(matches!(
            voxel_count(&[usize::MAX, 2, 1]),
            Err(VoxelError::InvalidArgument(_))
        ));
    }
}
