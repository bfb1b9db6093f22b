//! Hand-off point for imaging filters implemented outside of this crate
//! (bias field correction, smoothing, intensity normalisation, ...).
//!
//! A filter sees an input grid, a mask of the voxels it should consider and
//! an output grid of the same shape. The drivers in this module check the
//! shapes before and after the filter runs, so filter implementations can
//! index the three grids freely.
use crate::error::Result;
use crate::util::check_same_shape;
use crate::volume::element::DataElement;
use crate::volume::{Array3D, Array4D};

/// An imaging filter over rank 3 grids.
///
/// Any closure with the same signature as [`VolumeFilter::run`] is a
/// filter.
pub trait VolumeFilter<T: DataElement> {
    /// Filter `input`, restricted to the voxels where `mask` is true, into
    /// `output`.
    fn run(&self, input: &Array3D<T>, mask: &Array3D<bool>, output: &mut Array3D<T>) -> Result<()>;
}

impl<T, F> VolumeFilter<T> for F
where
    T: DataElement,
    F: Fn(&Array3D<T>, &Array3D<bool>, &mut Array3D<T>) -> Result<()>,
{
    fn run(&self, input: &Array3D<T>, mask: &Array3D<bool>, output: &mut Array3D<T>) -> Result<()> {
        self(input, mask, output)
    }
}

/// Run a filter after checking that the mask and the output have the shape
/// of the input.
///
/// # Errors
///
/// - `VoxelError::SizeMismatch` if the shapes disagree, before the filter
/// runs or because the filter replaced the output with a grid of another
/// shape.
/// - Any error raised by the filter itself.
pub fn apply_filter<T, F>(
    filter: &F,
    input: &Array3D<T>,
    mask: &Array3D<bool>,
    output: &mut Array3D<T>,
) -> Result<()>
where
    T: DataElement,
    F: VolumeFilter<T> + ?Sized,
{
    let shape = input.dim();
    check_same_shape(&shape, &mask.dim())?;
    check_same_shape(&shape, &output.dim())?;
    filter.run(input, mask, output)?;
    check_same_shape(&shape, &output.dim())
}

/// Run a filter on every volume of a rank 4 grid, with the same spatial
/// mask for all of them. A grid without volumes gives a grid without
/// volumes, once the mask is checked.
///
/// # Errors
///
/// As in [`apply_filter`], for any of the volumes.
pub fn apply_filter_per_volume<T, F>(
    filter: &F,
    input: &Array4D<T>,
    mask: &Array3D<bool>,
) -> Result<Array4D<T>>
where
    T: DataElement,
    F: VolumeFilter<T> + ?Sized,
{
    let [s0, s1, s2, _] = input.dim();
    check_same_shape(&[s0, s1, s2], &mask.dim())?;
    if input.volume_count() == 0 {
        return Ok(Array4D::new(s0, s1, s2, 0));
    }
    let volumes = input
        .volumes()
        .iter()
        .map(|volume| {
            let mut out = Array3D::new(s0, s1, s2);
            apply_filter(filter, volume, mask, &mut out)?;
            Ok(out)
        })
        .collect::<Result<Vec<_>>>()?;
    debug!("Filtered {} volumes", volumes.len());
    Array4D::from_volumes(volumes)
}
