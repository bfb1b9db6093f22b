//! Miscellaneous volume-related functions
use super::element::DataElement;
use crate::error::Result;
use crate::util::check_voxel_count;
use std::cmp::Ordering;

/// Map the position of a voxel in a last-dim-fastest buffer to its
/// position in an X-fastest buffer of the same shape.
pub fn last_dim_to_x_fastest(mut index: usize, dim: &[usize]) -> usize {
    // peel coordinates off from the quickest axis, accumulate from the slowest
    let mut out = 0;
    let mut stride = dim.iter().product::<usize>();
    for d in dim.iter().rev() {
        stride /= d;
        out += (index % d) * stride;
        index /= d;
    }
    out
}

/// Copy a buffer stored last-dim-fastest into a new X-fastest buffer.
pub fn transpose_to_x_fastest<T: Copy>(data: &[T], dim: &[usize]) -> Vec<T> {
    let mut out = data.to_vec();
    for (i, v) in data.iter().enumerate() {
        out[last_dim_to_x_fastest(i, dim)] = *v;
    }
    out
}

/// Fill a last-dim-fastest buffer from an X-fastest one. Both buffers must
/// already hold the number of voxels of `dim`.
pub fn transpose_from_x_fastest<T: Copy>(src: &[T], dest: &mut [T], dim: &[usize]) -> Result<()> {
    let n = dim.iter().product();
    check_voxel_count(n, src.len())?;
    check_voxel_count(n, dest.len())?;
    for (i, v) in dest.iter_mut().enumerate() {
        *v = src[last_dim_to_x_fastest(i, dim)];
    }
    Ok(())
}

/// Positions of `values` in ascending order of value. Equal values keep
/// their relative order.
pub fn ascending_order<T: DataElement>(values: &[T]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    order
}

/// Rank of every value among all of `values`: the number of values
/// strictly smaller than it, so ties share the lowest sorted position.
pub fn ranks<T: DataElement>(values: &[T]) -> Vec<i64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(DataElement::total_cmp);
    values
        .iter()
        .map(|v| sorted.partition_point(|s| s.total_cmp(v) == Ordering::Less) as i64)
        .collect()
}

/// Ranks rescaled to span exactly `[0, 1]`. When every value is equal (or
/// there is at most one value) all ranks are 0.
pub fn normalised_ranks<T: DataElement>(values: &[T]) -> Vec<f32> {
    let ranks = ranks(values);
    let min = ranks.iter().copied().min().unwrap_or(0);
    let max = ranks.iter().copied().max().unwrap_or(0);
    if max == min {
        return vec![0.; ranks.len()];
    }
    let span = (max - min) as f64;
    ranks
        .into_iter()
        .map(|r| ((r - min) as f64 / span) as f32)
        .collect()
}
