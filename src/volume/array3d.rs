//! Module holding the rank 3 voxel grid.
//!
//! Voxels are held in a single buffer, voxel `[i, j, k]` living at
//! `(i * size1 + j) * size2 + k`. Every operation that takes a second grid
//! (a mask, a zip operand or a destination) checks the shapes before the
//! first voxel is written.
use super::array2d::Array2D;
use super::element::DataElement;
use super::util::{ascending_order, normalised_ranks, ranks, transpose_from_x_fastest, transpose_to_x_fastest};
use super::{VoxelArray, VoxelOrder};
use crate::error::{Result, VoxelError};
use crate::region::VoxelBox;
use crate::util::{check_same_shape, check_voxel_count, resolve_range, voxel_count};
use std::ops::{Index, IndexMut, RangeBounds};

/// A rank 3 voxel grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Array3D<T> {
    dim: [usize; 3],
    data: Vec<T>,
}

impl<T: DataElement> Array3D<T> {
    /// Create a zero-filled grid.
    ///
    /// # Panics
    ///
    /// If the number of voxels overflows `usize`. See
    /// [`try_new`](Self::try_new) for the fallible form.
    pub fn new(size0: usize, size1: usize, size2: usize) -> Self {
        match Array3D::try_new(size0, size1, size2) {
            Ok(out) => out,
            Err(e) => panic!("{}", e),
        }
    }

    /// Create a zero-filled grid.
    ///
    /// # Errors
    ///
    /// - `VoxelError::InvalidArgument` if the number of voxels overflows
    /// `usize`.
    pub fn try_new(size0: usize, size1: usize, size2: usize) -> Result<Self> {
        let dim = [size0, size1, size2];
        Ok(Array3D {
            dim,
            data: vec![T::default(); voxel_count(&dim)?],
        })
    }

    /// Create a grid with the value of every voxel given by `f(i, j, k)`.
    ///
    /// # Panics
    ///
    /// If the number of voxels overflows `usize`.
    pub fn from_fn<F>(dim: [usize; 3], mut f: F) -> Self
    where
        F: FnMut(usize, usize, usize) -> T,
    {
        let mut out = Array3D::new(dim[0], dim[1], dim[2]);
        out.apply_in_place_indexed(|i, j, k, _| f(i, j, k));
        out
    }

    /// Create a grid from a stream of values, such as a random number
    /// generator. Voxels are filled in X-fastest order.
    ///
    /// # Panics
    ///
    /// If the number of voxels overflows `usize`.
    pub fn from_generator<F>(dim: [usize; 3], mut generator: F) -> Self
    where
        F: FnMut() -> T,
    {
        let mut out = Array3D::new(dim[0], dim[1], dim[2]);
        let values: Vec<T> = (0..out.data.len()).map(|_| generator()).collect();
        // lengths agree by construction
        let _ = transpose_from_x_fastest(&values, &mut out.data, &dim);
        out
    }

    /// Create a grid from a flat buffer in X-fastest order.
    ///
    /// # Errors
    ///
    /// - `VoxelError::InvalidArgument` on a wrong number of voxels, or if
    /// the number of voxels overflows `usize`.
    pub fn from_x_fastest(dim: [usize; 3], voxels: &[T]) -> Result<Self> {
        let mut out = Array3D::try_new(dim[0], dim[1], dim[2])?;
        transpose_from_x_fastest(voxels, &mut out.data, &dim)?;
        Ok(out)
    }

    /// Create a grid by taking ownership of a buffer in last-dim-fastest
    /// order.
    ///
    /// # Errors
    ///
    /// - `VoxelError::InvalidArgument` on a wrong number of voxels.
    pub fn from_last_dim_fastest(dim: [usize; 3], voxels: Vec<T>) -> Result<Self> {
        check_voxel_count(voxel_count(&dim)?, voxels.len())?;
        Ok(Array3D { dim, data: voxels })
    }

    /// Assemble a grid from parts already known to agree in size.
    pub(super) fn from_parts(dim: [usize; 3], data: Vec<T>) -> Self {
        debug_assert_eq!(dim.iter().product::<usize>(), data.len());
        Array3D { dim, data }
    }

    /// Get the shape of the grid.
    pub fn dim(&self) -> [usize; 3] {
        self.dim
    }

    /// View all voxels in storage (last-dim-fastest) order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Consume the grid into its voxels in last-dim-fastest order.
    pub fn into_raw_vec(self) -> Vec<T> {
        self.data
    }

    /// Fetch a voxel. Panics if the index is out of bounds.
    #[inline]
    pub fn get(&self, i: usize, j: usize, k: usize) -> T {
        self[[i, j, k]]
    }

    /// Write a voxel. Panics if the index is out of bounds.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, k: usize, value: T) {
        self[[i, j, k]] = value;
    }

    /// Fetch a voxel, or `None` if the index is out of bounds.
    pub fn get_checked(&self, index: [usize; 3]) -> Option<T> {
        if (0..3).all(|a| index[a] < self.dim[a]) {
            Some(self[index])
        } else {
            None
        }
    }

    /// Whether a (possibly negative) index lies inside the grid.
    pub fn in_bounds(&self, index: [isize; 3]) -> bool {
        (0..3).all(|a| index[a] >= 0 && (index[a] as usize) < self.dim[a])
    }

    /// Whether both grids have the same shape, regardless of element type.
    pub fn same_shape<S>(&self, other: &Array3D<S>) -> bool {
        self.dim == other.dim
    }

    /// Set every voxel inside the box to `value`.
    ///
    /// # Errors
    ///
    /// - `VoxelError::OutOfRange` if the box reaches outside of the grid.
    pub fn fill_box(&mut self, region: &VoxelBox<isize>, value: T) -> Result<()> {
        let origin = region.origin();
        let far = region.far_corner();
        for a in 0..3 {
            if origin[a] < 0 || far[a] as usize > self.dim[a] {
                return Err(VoxelError::OutOfRange {
                    axis: a,
                    start: origin[a].max(0) as usize,
                    end: far[a].max(0) as usize,
                    len: self.dim[a],
                });
            }
        }
        let size2 = self.dim[2];
        for i in origin[0] as usize..far[0] as usize {
            for j in origin[1] as usize..far[1] as usize {
                let row = (i * self.dim[1] + j) * size2;
                self.data[row + origin[2] as usize..row + far[2] as usize].fill(value);
            }
        }
        Ok(())
    }

    /// Copy a sub-volume into a new grid of the cropped size.
    ///
    /// # Errors
    ///
    /// - `VoxelError::OutOfRange` if a range does not fit its axis.
    pub fn crop<I, J, K>(&self, i: I, j: J, k: K) -> Result<Self>
    where
        I: RangeBounds<usize>,
        J: RangeBounds<usize>,
        K: RangeBounds<usize>,
    {
        let ri = resolve_range(&i, 0, self.dim[0])?;
        let rj = resolve_range(&j, 1, self.dim[1])?;
        let rk = resolve_range(&k, 2, self.dim[2])?;
        debug!("Cropping {:?} to {:?}, {:?}, {:?}", self.dim, ri, rj, rk);
        let mut out = Array3D::new(ri.1 - ri.0, rj.1 - rj.0, rk.1 - rk.0);
        self.copy_into(&mut out, ri.0..ri.1, rj.0..rj.1, rk.0..rk.1, [0, 0, 0])?;
        Ok(out)
    }

    /// Place this grid at the origin corner of a new, larger zero-filled
    /// grid.
    ///
    /// # Errors
    ///
    /// - `VoxelError::InvalidArgument` if a new size is smaller than the
    /// current one.
    pub fn pad_to(&self, size0: usize, size1: usize, size2: usize) -> Result<Self> {
        let new_dim = [size0, size1, size2];
        if (0..3).any(|a| new_dim[a] < self.dim[a]) {
            return Err(VoxelError::InvalidArgument(format!(
                "Cannot pad {:?} to the smaller shape {:?}",
                self.dim, new_dim
            )));
        }
        debug!("Padding {:?} to {:?}", self.dim, new_dim);
        let mut out = Array3D::new(size0, size1, size2);
        self.copy_into(&mut out, .., .., .., [0, 0, 0])?;
        Ok(out)
    }

    /// Copy the voxels in the given source ranges into `dest`, with the
    /// first source voxel landing at `dest_origin`.
    ///
    /// # Errors
    ///
    /// - `VoxelError::OutOfRange` if a source range does not fit this grid,
    /// or the copied block does not fit the destination. Nothing is written
    /// in either case.
    pub fn copy_into<I, J, K>(
        &self,
        dest: &mut Array3D<T>,
        i: I,
        j: J,
        k: K,
        dest_origin: [usize; 3],
    ) -> Result<()>
    where
        I: RangeBounds<usize>,
        J: RangeBounds<usize>,
        K: RangeBounds<usize>,
    {
        let src = [
            resolve_range(&i, 0, self.dim[0])?,
            resolve_range(&j, 1, self.dim[1])?,
            resolve_range(&k, 2, self.dim[2])?,
        ];
        let mut len = [0; 3];
        for a in 0..3 {
            len[a] = src[a].1 - src[a].0;
            let end = dest_origin[a] + len[a];
            if end > dest.dim[a] {
                return Err(VoxelError::OutOfRange {
                    axis: a,
                    start: dest_origin[a],
                    end,
                    len: dest.dim[a],
                });
            }
        }
        for di in 0..len[0] {
            for dj in 0..len[1] {
                let from = ((src[0].0 + di) * self.dim[1] + src[1].0 + dj) * self.dim[2] + src[2].0;
                let to = ((dest_origin[0] + di) * dest.dim[1] + dest_origin[1] + dj) * dest.dim[2]
                    + dest_origin[2];
                dest.data[to..to + len[2]].copy_from_slice(&self.data[from..from + len[2]]);
            }
        }
        Ok(())
    }

    /// Copy all voxels into another grid of the same shape.
    ///
    /// # Errors
    ///
    /// - `VoxelError::SizeMismatch` if the shapes differ.
    pub fn copy_to(&self, dest: &mut Array3D<T>) -> Result<()> {
        check_same_shape(&self.dim, &dest.dim)?;
        dest.data.copy_from_slice(&self.data);
        Ok(())
    }

    /// Extract the plane at `k` along the last axis.
    ///
    /// # Errors
    ///
    /// - `VoxelError::OutOfRange` if `k` is not inside the grid.
    pub fn z_slice(&self, k: usize) -> Result<Array2D<T>> {
        let _ = resolve_range(&(k..=k), 2, self.dim[2])?;
        let mut out = Array2D::new(self.dim[0], self.dim[1]);
        out.apply_in_place_indexed(|i, j, _| self[[i, j, k]]);
        Ok(out)
    }

    /// Replace the plane at `k` along the last axis.
    ///
    /// # Errors
    ///
    /// - `VoxelError::OutOfRange` if `k` is not inside the grid.
    /// - `VoxelError::SizeMismatch` if the slice is not `size0 × size1`.
    pub fn set_z_slice(&mut self, k: usize, slice: &Array2D<T>) -> Result<()> {
        let _ = resolve_range(&(k..=k), 2, self.dim[2])?;
        check_same_shape(&self.dim[..2], &slice.dim())?;
        for i in 0..self.dim[0] {
            for j in 0..self.dim[1] {
                self[[i, j, k]] = slice[[i, j]];
            }
        }
        Ok(())
    }

    /// View the voxels `[i, j, ..]` along the last axis.
    pub fn z_column(&self, i: usize, j: usize) -> &[T] {
        let start = (i * self.dim[1] + j) * self.dim[2];
        &self.data[start..start + self.dim[2]]
    }

    /// Mutable view of the voxels `[i, j, ..]` along the last axis.
    pub fn z_column_mut(&mut self, i: usize, j: usize) -> &mut [T] {
        let start = (i * self.dim[1] + j) * self.dim[2];
        &mut self.data[start..start + self.dim[2]]
    }

    /// Set one plane of the grid to zero.
    ///
    /// # Errors
    ///
    /// - `VoxelError::OutOfRange` if `axis > 2` or `index` is not inside
    /// that axis.
    pub fn clear_plane(&mut self, axis: usize, index: usize) -> Result<()> {
        self.for_each_in_plane(axis, index, |v| *v = T::default())
    }

    /// Replace every voxel with `f(value)`, in ascending index order.
    pub fn apply_in_place<F>(&mut self, mut f: F)
    where
        F: FnMut(T) -> T,
    {
        for v in &mut self.data {
            *v = f(*v);
        }
    }

    /// Replace every voxel where `mask` is true with `f(value)`.
    ///
    /// # Errors
    ///
    /// - `VoxelError::SizeMismatch` if the mask has a different shape.
    pub fn apply_in_place_masked<F>(&mut self, mut f: F, mask: &Array3D<bool>) -> Result<()>
    where
        F: FnMut(T) -> T,
    {
        check_same_shape(&self.dim, &mask.dim)?;
        for (v, _) in self.data.iter_mut().zip(&mask.data).filter(|(_, m)| **m) {
            *v = f(*v);
        }
        Ok(())
    }

    /// Replace every voxel with `f(i, j, k, value)`, in ascending index
    /// order.
    pub fn apply_in_place_indexed<F>(&mut self, mut f: F)
    where
        F: FnMut(usize, usize, usize, T) -> T,
    {
        let dim = self.dim;
        for (n, v) in self.data.iter_mut().enumerate() {
            let [i, j, k] = unravel(n, dim);
            *v = f(i, j, k, *v);
        }
    }

    /// Replace every voxel of the plane at `k` along the last axis with
    /// `f(value)`.
    ///
    /// # Errors
    ///
    /// - `VoxelError::OutOfRange` if `k` is not inside the grid.
    pub fn apply_in_z_slice<F>(&mut self, k: usize, mut f: F) -> Result<()>
    where
        F: FnMut(T) -> T,
    {
        self.for_each_in_plane(2, k, |v| *v = f(*v))
    }

    /// Map every voxel into a new grid.
    pub fn map<S, F>(&self, f: F) -> Array3D<S>
    where
        S: DataElement,
        F: FnMut(T) -> S,
    {
        Array3D {
            dim: self.dim,
            data: self.data.iter().copied().map(f).collect(),
        }
    }

    /// Map every voxel into an existing grid.
    ///
    /// # Errors
    ///
    /// - `VoxelError::SizeMismatch` if the destination has a different
    /// shape.
    pub fn map_into<S, F>(&self, mut f: F, dest: &mut Array3D<S>) -> Result<()>
    where
        S: DataElement,
        F: FnMut(T) -> S,
    {
        check_same_shape(&self.dim, &dest.dim)?;
        for (d, v) in dest.data.iter_mut().zip(&self.data) {
            *d = f(*v);
        }
        Ok(())
    }

    /// Combine the voxels of two grids into a new grid.
    ///
    /// # Errors
    ///
    /// - `VoxelError::SizeMismatch` if the grids have different shapes.
    pub fn zip_map<U, S, F>(&self, other: &Array3D<U>, mut f: F) -> Result<Array3D<S>>
    where
        U: DataElement,
        S: DataElement,
        F: FnMut(T, U) -> S,
    {
        check_same_shape(&self.dim, &other.dim)?;
        Ok(Array3D {
            dim: self.dim,
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(a, b)| f(*a, *b))
                .collect(),
        })
    }

    /// Combine the voxels of two grids into an existing grid.
    ///
    /// # Errors
    ///
    /// - `VoxelError::SizeMismatch` if any of the three shapes differ.
    pub fn zip_map_into<U, S, F>(&self, other: &Array3D<U>, mut f: F, dest: &mut Array3D<S>) -> Result<()>
    where
        U: DataElement,
        S: DataElement,
        F: FnMut(T, U) -> S,
    {
        check_same_shape(&self.dim, &other.dim)?;
        check_same_shape(&self.dim, &dest.dim)?;
        for ((d, a), b) in dest.data.iter_mut().zip(&self.data).zip(&other.data) {
            *d = f(*a, *b);
        }
        Ok(())
    }

    /// Replace every voxel with `f(value, other_value)`.
    ///
    /// # Errors
    ///
    /// - `VoxelError::SizeMismatch` if the grids have different shapes.
    pub fn zip_apply_in_place<U, F>(&mut self, other: &Array3D<U>, mut f: F) -> Result<()>
    where
        U: DataElement,
        F: FnMut(T, U) -> T,
    {
        check_same_shape(&self.dim, &other.dim)?;
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a = f(*a, *b);
        }
        Ok(())
    }

    /// Iterate over pairs of voxels at the same index of both grids.
    ///
    /// # Errors
    ///
    /// - `VoxelError::SizeMismatch` if the grids have different shapes.
    pub fn zip_values<'a, U>(&'a self, other: &'a Array3D<U>) -> Result<impl Iterator<Item = (T, U)> + 'a>
    where
        U: DataElement,
    {
        check_same_shape(&self.dim, &other.dim)?;
        Ok(self.data.iter().copied().zip(other.data.iter().copied()))
    }

    /// Iterate over the voxels where `mask` is true.
    ///
    /// # Errors
    ///
    /// - `VoxelError::SizeMismatch` if the mask has a different shape.
    pub fn voxels_in_mask<'a>(&'a self, mask: &'a Array3D<bool>) -> Result<impl Iterator<Item = T> + 'a> {
        Ok(self.zip_values(mask)?.filter(|(_, m)| *m).map(|(v, _)| v))
    }

    /// Iterate over the voxels where `mask` is false.
    ///
    /// # Errors
    ///
    /// - `VoxelError::SizeMismatch` if the mask has a different shape.
    pub fn voxels_outside_mask<'a>(&'a self, mask: &'a Array3D<bool>) -> Result<impl Iterator<Item = T> + 'a> {
        Ok(self.zip_values(mask)?.filter(|(_, m)| !*m).map(|(v, _)| v))
    }

    /// Iterate over the voxels in ascending index order.
    pub fn values(&self) -> impl Iterator<Item = T> + '_ {
        self.data.iter().copied()
    }

    /// Iterate over every index of the grid in ascending order, the last
    /// axis quickest.
    pub fn indices(&self) -> impl Iterator<Item = [usize; 3]> {
        let dim = self.dim;
        (0..self.data.len()).map(move |n| unravel(n, dim))
    }

    /// Face-connected neighbours of a voxel that lie inside the grid, the
    /// lower neighbours first.
    pub fn connected_voxels_6(&self, index: [usize; 3]) -> impl Iterator<Item = [usize; 3]> {
        let below = (0..3).filter(move |&a| index[a] > 0).map(move |a| {
            let mut n = index;
            n[a] -= 1;
            n
        });
        below.chain(self.connected_voxels_3(index))
    }

    /// Face-connected neighbours of a voxel one step up each axis, for
    /// visiting every edge of the voxel graph exactly once.
    pub fn connected_voxels_3(&self, index: [usize; 3]) -> impl Iterator<Item = [usize; 3]> {
        let dim = self.dim;
        (0..3).filter(move |&a| index[a] + 1 < dim[a]).map(move |a| {
            let mut n = index;
            n[a] += 1;
            n
        })
    }

    /// Every index of the grid, ordered by ascending voxel value. Equal
    /// values keep their traversal order.
    pub fn indices_sorted_ascending(&self) -> Vec<[usize; 3]> {
        let dim = self.dim;
        ascending_order(&self.data)
            .into_iter()
            .map(|n| unravel(n, dim))
            .collect()
    }

    /// Every index of the grid, ordered by descending voxel value: the
    /// reverse of [`indices_sorted_ascending`](Self::indices_sorted_ascending).
    pub fn indices_sorted_descending(&self) -> Vec<[usize; 3]> {
        let mut out = self.indices_sorted_ascending();
        out.reverse();
        out
    }

    /// Replace each voxel with its rank among all voxels: the number of
    /// voxels with a strictly smaller value.
    pub fn ranks(&self) -> Array3D<i64> {
        Array3D {
            dim: self.dim,
            data: ranks(&self.data),
        }
    }

    /// Replace each voxel with its rank, rescaled to span exactly `[0, 1]`.
    pub fn ranks_normalised(&self) -> Array3D<f32> {
        Array3D {
            dim: self.dim,
            data: normalised_ranks(&self.data),
        }
    }

    /// Move every voxel one step up axis 0; the plane at `i = 0` is zeroed.
    pub fn shift_i_plus(&mut self) {
        self.shift(0, true)
    }

    /// Move every voxel one step down axis 0; the last plane is zeroed.
    pub fn shift_i_minus(&mut self) {
        self.shift(0, false)
    }

    /// Move every voxel one step up axis 1; the plane at `j = 0` is zeroed.
    pub fn shift_j_plus(&mut self) {
        self.shift(1, true)
    }

    /// Move every voxel one step down axis 1; the last plane is zeroed.
    pub fn shift_j_minus(&mut self) {
        self.shift(1, false)
    }

    /// Move every voxel one step up axis 2; the plane at `k = 0` is zeroed.
    pub fn shift_k_plus(&mut self) {
        self.shift(2, true)
    }

    /// Move every voxel one step down axis 2; the last plane is zeroed.
    pub fn shift_k_minus(&mut self) {
        self.shift(2, false)
    }

    fn shift(&mut self, axis: usize, up: bool) {
        let len = self.dim[axis];
        let stride: usize = self.dim[axis + 1..].iter().product();
        let block = len * stride;
        if block == 0 {
            return;
        }
        for chunk in self.data.chunks_exact_mut(block) {
            if up {
                chunk.copy_within(..block - stride, stride);
                chunk[..stride].fill(T::default());
            } else {
                chunk.copy_within(stride.., 0);
                chunk[block - stride..].fill(T::default());
            }
        }
    }

    fn for_each_in_plane<F>(&mut self, axis: usize, index: usize, mut f: F) -> Result<()>
    where
        F: FnMut(&mut T),
    {
        if axis > 2 {
            return Err(VoxelError::InvalidArgument(format!("No axis {} in a rank 3 grid", axis)));
        }
        let (start, _) = resolve_range(&(index..=index), axis, self.dim[axis])?;
        let stride: usize = self.dim[axis + 1..].iter().product();
        let block = self.dim[axis] * stride;
        if block == 0 {
            return Ok(());
        }
        for chunk in self.data.chunks_exact_mut(block) {
            chunk[start * stride..(start + 1) * stride].iter_mut().for_each(&mut f);
        }
        Ok(())
    }
}

impl<T> Index<[usize; 3]> for Array3D<T> {
    type Output = T;

    #[inline]
    fn index(&self, [i, j, k]: [usize; 3]) -> &T {
        &self.data[(i * self.dim[1] + j) * self.dim[2] + k]
    }
}

impl<T> IndexMut<[usize; 3]> for Array3D<T> {
    #[inline]
    fn index_mut(&mut self, [i, j, k]: [usize; 3]) -> &mut T {
        &mut self.data[(i * self.dim[1] + j) * self.dim[2] + k]
    }
}

impl<T: DataElement> VoxelArray<T> for Array3D<T> {
    fn shape(&self) -> &[usize] {
        &self.dim
    }

    fn to_vec(&self, order: VoxelOrder) -> Vec<T> {
        match order {
            VoxelOrder::LastDimFastest => self.data.clone(),
            VoxelOrder::XFastest => transpose_to_x_fastest(&self.data, &self.dim),
        }
    }

    fn set_from(&mut self, order: VoxelOrder, voxels: &[T]) -> Result<()> {
        match order {
            VoxelOrder::LastDimFastest => {
                check_voxel_count(self.data.len(), voxels.len())?;
                self.data.copy_from_slice(voxels);
                Ok(())
            }
            VoxelOrder::XFastest => transpose_from_x_fastest(voxels, &mut self.data, &self.dim),
        }
    }
}

#[inline]
fn unravel(n: usize, [_, d1, d2]: [usize; 3]) -> [usize; 3] {
    [n / (d1 * d2), (n / d2) % d1, n % d2]
}
