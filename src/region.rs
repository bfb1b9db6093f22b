//! Axis-aligned regions over voxel grids.
//!
//! A region is an origin corner and a size. Negative sizes are accepted on
//! construction and normalised, so that the origin is always the corner
//! with the smallest coordinates and every size is non-negative.
use num_traits::{PrimInt, Signed};

fn normalise<T>(origin: T, size: T) -> (T, T)
where
    T: Signed + Copy + PartialOrd,
{
    if size < T::zero() {
        (origin + size, -size)
    } else {
        (origin, size)
    }
}

fn add<T: Signed + Copy, const N: usize>(a: [T; N], b: [T; N]) -> [T; N] {
    let mut out = a;
    for (o, b) in out.iter_mut().zip(b) {
        *o = *o + b;
    }
    out
}

/// A three dimensional box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoxelBox<T> {
    origin: [T; 3],
    size: [T; 3],
}

impl<T> VoxelBox<T>
where
    T: Signed + Copy + PartialOrd,
{
    /// Create a box, shifting the origin along any axis with a negative
    /// size.
    ///
    /// # Example
    ///
    /// ```
    /// # use voxelcore::VoxelBox;
    /// let b = VoxelBox::new([5, 0, 0], [-2, 1, 1]);
    /// assert_eq!(b.origin(), [3, 0, 0]);
    /// assert_eq!(b.size(), [2, 1, 1]);
    /// ```
    pub fn new(origin: [T; 3], size: [T; 3]) -> Self {
        let mut out = VoxelBox { origin, size };
        for a in 0..3 {
            let (o, s) = normalise(origin[a], size[a]);
            out.origin[a] = o;
            out.size[a] = s;
        }
        out
    }

    /// The corner with the smallest coordinates.
    pub fn origin(&self) -> [T; 3] {
        self.origin
    }

    /// The non-negative extent along each axis.
    pub fn size(&self) -> [T; 3] {
        self.size
    }

    /// The corner with the largest coordinates (exclusive).
    pub fn far_corner(&self) -> [T; 3] {
        add(self.origin, self.size)
    }

    /// Whether the point lies inside the box. The far faces are excluded.
    pub fn contains(&self, point: [T; 3]) -> bool {
        let far = self.far_corner();
        (0..3).all(|a| point[a] >= self.origin[a] && point[a] < far[a])
    }
}

impl<T> VoxelBox<T>
where
    T: PrimInt + Signed,
{
    /// Iterate over every integer position inside the box, the last axis
    /// quickest.
    pub fn positions(&self) -> Positions<T, 3> {
        Positions::new(self.origin, self.far_corner())
    }
}

/// A four dimensional box: three spatial axes and the volume axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoxelBox4<T> {
    origin: [T; 4],
    size: [T; 4],
}

impl<T> VoxelBox4<T>
where
    T: Signed + Copy + PartialOrd,
{
    /// Create a box, shifting the origin along any axis with a negative
    /// size.
    pub fn new(origin: [T; 4], size: [T; 4]) -> Self {
        let mut out = VoxelBox4 { origin, size };
        for a in 0..4 {
            let (o, s) = normalise(origin[a], size[a]);
            out.origin[a] = o;
            out.size[a] = s;
        }
        out
    }

    /// The corner with the smallest coordinates.
    pub fn origin(&self) -> [T; 4] {
        self.origin
    }

    /// The non-negative extent along each axis.
    pub fn size(&self) -> [T; 4] {
        self.size
    }

    /// The corner with the largest coordinates (exclusive).
    pub fn far_corner(&self) -> [T; 4] {
        add(self.origin, self.size)
    }

    /// Whether the point lies inside the box. The far faces are excluded.
    pub fn contains(&self, point: [T; 4]) -> bool {
        let far = self.far_corner();
        (0..4).all(|a| point[a] >= self.origin[a] && point[a] < far[a])
    }

    /// Compute the padding needed along each axis to turn this box into
    /// `target`, as `(before, after)`. Negative amounts are crops.
    ///
    /// # Example
    ///
    /// ```
    /// # use voxelcore::VoxelBox4;
    /// let small = VoxelBox4::new([2, 2, 2, 0], [4, 4, 4, 1]);
    /// let big = VoxelBox4::new([0, 1, 2, 0], [10, 6, 4, 1]);
    /// let (before, after) = small.padding_to(&big);
    /// assert_eq!(before, [2, 1, 0, 0]);
    /// assert_eq!(after, [4, 1, 0, 0]);
    /// assert_eq!(small.pad(before, after), big);
    /// ```
    pub fn padding_to(&self, target: &VoxelBox4<T>) -> ([T; 4], [T; 4]) {
        let mut before = self.origin;
        let mut after = self.size;
        for a in 0..4 {
            before[a] = self.origin[a] - target.origin[a];
            after[a] = target.size[a] - self.size[a] - before[a];
        }
        (before, after)
    }

    /// Grow (or, with negative amounts, shrink) the box along each axis.
    pub fn pad(&self, before: [T; 4], after: [T; 4]) -> VoxelBox4<T> {
        let mut origin = self.origin;
        let mut size = self.size;
        for a in 0..4 {
            origin[a] = origin[a] - before[a];
            size[a] = size[a] + before[a] + after[a];
        }
        VoxelBox4::new(origin, size)
    }

    /// Drop the volume axis.
    pub fn to_box3(&self) -> VoxelBox<T> {
        VoxelBox::new(
            [self.origin[0], self.origin[1], self.origin[2]],
            [self.size[0], self.size[1], self.size[2]],
        )
    }
}

impl<T> VoxelBox4<T>
where
    T: PrimInt + Signed,
{
    /// Iterate over every integer position inside the box, the last axis
    /// quickest.
    pub fn positions(&self) -> Positions<T, 4> {
        Positions::new(self.origin, self.far_corner())
    }
}

impl<T> From<VoxelBox4<T>> for VoxelBox<T>
where
    T: Signed + Copy + PartialOrd,
{
    fn from(b: VoxelBox4<T>) -> Self {
        b.to_box3()
    }
}

/// Iterator over the integer positions of a box.
#[derive(Debug, Clone)]
pub struct Positions<T, const N: usize> {
    start: [T; N],
    end: [T; N],
    next: Option<[T; N]>,
}

impl<T: PrimInt, const N: usize> Positions<T, N> {
    fn new(start: [T; N], end: [T; N]) -> Self {
        let empty = start.iter().zip(&end).any(|(s, e)| s >= e);
        Positions {
            start,
            end,
            next: if empty { None } else { Some(start) },
        }
    }
}

impl<T: PrimInt, const N: usize> Iterator for Positions<T, N> {
    type Item = [T; N];

    fn next(&mut self) -> Option<[T; N]> {
        let current = self.next?;
        let mut following = current;
        let mut axis = N;
        loop {
            if axis == 0 {
                self.next = None;
                break;
            }
            axis -= 1;
            following[axis] = following[axis] + T::one();
            if following[axis] < self.end[axis] {
                self.next = Some(following);
                break;
            }
            following[axis] = self.start[axis];
        }
        Some(current)
    }
}
