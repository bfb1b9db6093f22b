//! A small, fixed size 4x4 matrix for homogeneous voxel/world transforms.
//!
//! This is the fast path for the 4x4 compositions done by the orientation
//! engine. Larger or odd-sized algebra is left to `nalgebra`, and
//! conversions in both directions are provided.
use crate::error::{Result, VoxelError};
use crate::quaternion::Quaternion;
use approx::AbsDiffEq;
use nalgebra::{Matrix3, Matrix4, Scalar};
use num_traits::Float;
use std::fmt;
use std::ops::{Index, IndexMut, Mul};
use std::str::FromStr;

/// A row major 4x4 matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix4x4<T> {
    m: [[T; 4]; 4],
}

/// The parts of an affine transform, as given by [`Matrix4x4::decompose`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineParts {
    /// The last column.
    pub translation: [f64; 3],
    /// The norm of each of the first three columns.
    pub scale: [f64; 3],
    /// The rotation left once the scale is divided out of the columns.
    pub rotation: Quaternion,
}

impl<T: Float> Default for Matrix4x4<T> {
    fn default() -> Self {
        Matrix4x4::identity()
    }
}

impl<T: Float> Matrix4x4<T> {
    /// A matrix filled with zeros.
    pub fn zeros() -> Self {
        Matrix4x4 {
            m: [[T::zero(); 4]; 4],
        }
    }

    /// The identity matrix.
    pub fn identity() -> Self {
        Matrix4x4::from_diagonal([T::one(); 4])
    }

    /// A diagonal matrix.
    pub fn from_diagonal(d: [T; 4]) -> Self {
        let mut out = Matrix4x4::zeros();
        for (i, v) in d.iter().enumerate() {
            out.m[i][i] = *v;
        }
        out
    }

    /// Build a matrix from 16 values listed one row after the other.
    pub fn from_rows(values: [T; 16]) -> Self {
        let mut out = Matrix4x4::zeros();
        for (n, v) in values.iter().enumerate() {
            out.m[n / 4][n % 4] = *v;
        }
        out
    }

    /// Build a matrix from 16 values listed one column after the other.
    pub fn from_cols(values: [T; 16]) -> Self {
        Matrix4x4::from_rows(values).transpose()
    }

    /// List the 16 values one row after the other.
    pub fn to_rows(&self) -> [T; 16] {
        let mut out = [T::zero(); 16];
        for (n, v) in out.iter_mut().enumerate() {
            *v = self.m[n / 4][n % 4];
        }
        out
    }

    /// List the 16 values one column after the other.
    pub fn to_cols(&self) -> [T; 16] {
        self.transpose().to_rows()
    }

    /// Get a row.
    pub fn row(&self, i: usize) -> [T; 4] {
        self.m[i]
    }

    /// Replace a row.
    pub fn set_row(&mut self, i: usize, row: [T; 4]) {
        self.m[i] = row;
    }

    /// Get a column.
    pub fn col(&self, j: usize) -> [T; 4] {
        [self.m[0][j], self.m[1][j], self.m[2][j], self.m[3][j]]
    }

    /// Replace a column.
    pub fn set_col(&mut self, j: usize, col: [T; 4]) {
        for (row, v) in self.m.iter_mut().zip(col.iter()) {
            row[j] = *v;
        }
    }

    /// Apply the affine part of the matrix to a point. The bottom row is
    /// assumed to be `[0, 0, 0, 1]`.
    pub fn transform_point(&self, p: [T; 3]) -> [T; 3] {
        let mut out = [T::zero(); 3];
        for (i, o) in out.iter_mut().enumerate() {
            let r = &self.m[i];
            *o = r[0] * p[0] + r[1] * p[1] + r[2] * p[2] + r[3];
        }
        out
    }

    /// Multiply every entry by a scalar.
    pub fn scale(&self, s: T) -> Self {
        let mut out = *self;
        out.m.iter_mut().flatten().for_each(|v| *v = *v * s);
        out
    }

    /// Get the transposed matrix.
    pub fn transpose(&self) -> Self {
        let mut out = Matrix4x4::zeros();
        for i in 0..4 {
            for j in 0..4 {
                out.m[j][i] = self.m[i][j];
            }
        }
        out
    }

    /// Determinant of the 3x3 matrix left when row `r` and column `c` are
    /// removed.
    fn minor(&self, r: usize, c: usize) -> T {
        let rows: Vec<usize> = (0..4).filter(|&i| i != r).collect();
        let cols: Vec<usize> = (0..4).filter(|&j| j != c).collect();
        let a = |i: usize, j: usize| self.m[rows[i]][cols[j]];
        a(0, 0) * (a(1, 1) * a(2, 2) - a(1, 2) * a(2, 1))
            - a(0, 1) * (a(1, 0) * a(2, 2) - a(1, 2) * a(2, 0))
            + a(0, 2) * (a(1, 0) * a(2, 1) - a(1, 1) * a(2, 0))
    }

    fn cofactor(&self, r: usize, c: usize) -> T {
        if (r + c) % 2 == 0 {
            self.minor(r, c)
        } else {
            -self.minor(r, c)
        }
    }

    /// Get the determinant, by cofactor expansion along the first row.
    pub fn determinant(&self) -> T {
        (0..4).fold(T::zero(), |acc, j| acc + self.m[0][j] * self.cofactor(0, j))
    }

    /// Invert the matrix through its adjugate. Returns `None` when the
    /// determinant is exactly zero.
    pub fn try_inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det == T::zero() {
            return None;
        }
        let mut adj = Matrix4x4::zeros();
        for i in 0..4 {
            for j in 0..4 {
                adj.m[j][i] = self.cofactor(i, j);
            }
        }
        Some(adj.scale(T::one() / det))
    }

    /// Invert the matrix.
    ///
    /// # Errors
    ///
    /// - `VoxelError::SingularMatrix` if the determinant is exactly zero.
    pub fn inverse(&self) -> Result<Self> {
        self.try_inverse().ok_or(VoxelError::SingularMatrix)
    }

    /// Get the upper left 3x3 block.
    pub fn rotation_block(&self) -> Matrix3<T>
    where
        T: Scalar,
    {
        Matrix3::from_fn(|i, j| self.m[i][j])
    }

    /// Get the first three entries of the last column.
    pub fn translation(&self) -> [T; 3] {
        [self.m[0][3], self.m[1][3], self.m[2][3]]
    }
}

impl Matrix4x4<f64> {
    /// Split an affine transform into translation, per-column scale and
    /// rotation. Shear is not represented.
    pub fn decompose(&self) -> AffineParts {
        let translation = self.translation();
        let norm = |j: usize| {
            (self.m[0][j] * self.m[0][j] + self.m[1][j] * self.m[1][j] + self.m[2][j] * self.m[2][j])
                .sqrt()
        };
        let scale = [norm(0), norm(1), norm(2)];
        let rotation = Matrix3::from_fn(|i, j| self.m[i][j] / scale[j]);
        AffineParts {
            translation,
            scale,
            rotation: Quaternion::from_rotation(&rotation),
        }
    }

    /// Get the axis and angle (in radians) of the rotation in this affine.
    pub fn to_axis_angle(&self) -> ([f64; 3], f64) {
        self.decompose().rotation.to_axis_angle()
    }

    /// Scale a rigid transform by `factor`: the rotation angle and the
    /// translation are both multiplied, so a factor of 0.5 goes half way.
    pub fn interpolate_rotation(&self, factor: f64) -> Self {
        let (axis, angle) = Quaternion::from_rotation(&self.rotation_block()).to_axis_angle();
        let t = self.translation();
        Quaternion::from_axis_angle(axis, angle * factor)
            .to_matrix4([t[0] * factor, t[1] * factor, t[2] * factor], true)
    }
}

impl<T> Index<(usize, usize)> for Matrix4x4<T> {
    type Output = T;

    fn index(&self, (i, j): (usize, usize)) -> &T {
        &self.m[i][j]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix4x4<T> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        &mut self.m[i][j]
    }
}

impl<T: Float> Mul for Matrix4x4<T> {
    type Output = Matrix4x4<T>;

    fn mul(self, rhs: Matrix4x4<T>) -> Matrix4x4<T> {
        let mut out = Matrix4x4::zeros();
        for i in 0..4 {
            for j in 0..4 {
                out.m[i][j] = (0..4).fold(T::zero(), |acc, k| acc + self.m[i][k] * rhs.m[k][j]);
            }
        }
        out
    }
}

impl<'a, T: Float> Mul<&'a Matrix4x4<T>> for &'a Matrix4x4<T> {
    type Output = Matrix4x4<T>;

    fn mul(self, rhs: &'a Matrix4x4<T>) -> Matrix4x4<T> {
        *self * *rhs
    }
}

/// Tab separated, one row per line.
impl<T: fmt::Display> fmt::Display for Matrix4x4<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, row) in self.m.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}\t{}\t{}\t{}", row[0], row[1], row[2], row[3])?;
        }
        Ok(())
    }
}

/// Parses 16 whitespace separated values, row after row, as written by
/// registration tools and by `Display`.
impl<T> FromStr for Matrix4x4<T>
where
    T: Float + FromStr,
    T::Err: fmt::Display,
{
    type Err = VoxelError;

    fn from_str(s: &str) -> Result<Self> {
        let values = s
            .split_whitespace()
            .map(|v| {
                v.parse::<T>()
                    .map_err(|e| VoxelError::InvalidArgument(format!("bad matrix entry {:?}: {}", v, e)))
            })
            .collect::<Result<Vec<T>>>()?;
        if values.len() != 16 {
            return Err(VoxelError::InvalidArgument(format!(
                "a 4x4 matrix needs 16 values, got {}",
                values.len()
            )));
        }
        let mut rows = [T::zero(); 16];
        rows.copy_from_slice(&values);
        Ok(Matrix4x4::from_rows(rows))
    }
}

impl<T: Float + Scalar> From<Matrix4<T>> for Matrix4x4<T> {
    fn from(m: Matrix4<T>) -> Self {
        let mut out = Matrix4x4::zeros();
        for i in 0..4 {
            for j in 0..4 {
                out.m[i][j] = m[(i, j)];
            }
        }
        out
    }
}

impl<T: Float + Scalar> From<Matrix4x4<T>> for Matrix4<T> {
    fn from(m: Matrix4x4<T>) -> Self {
        Matrix4::from_fn(|i, j| m.m[i][j])
    }
}

impl<T> AbsDiffEq for Matrix4x4<T>
where
    T: Float + AbsDiffEq<Epsilon = T>,
{
    type Epsilon = T;

    fn default_epsilon() -> T {
        T::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: T) -> bool {
        self.m
            .iter()
            .flatten()
            .zip(other.m.iter().flatten())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}
