//! Voxel grid storage and orientation decomposition for volumetric images.
//!
//! The crate has two halves which never depend on each other:
//!
//! - [`volume`]: rank 1 to 4 voxel grids ([`Array3D`], [`Array4D`], ...),
//!   with explicit linearization conventions ([`VoxelOrder`]) for
//!   exchanging flat buffers with other imaging tools.
//! - [`orientation`], [`quaternion`] and [`matrix`]: the NIfTI qform model of
//!   a voxel-to-world transform, decomposed into rotation, pixel spacing,
//!   translation and the `qfac` sign.
//!
//! # Example
//!
//! ```
//! use voxelcore::{Array3D, OrientationDecomposition, VoxelArray, VoxelOrder};
//! # fn run() -> voxelcore::Result<()> {
//! let mut grid = Array3D::<f32>::new(2, 2, 2);
//! grid.set_from(VoxelOrder::XFastest, &[1., 2., 3., 4., 5., 6., 7., 8.])?;
//! assert_eq!(grid[[1, 0, 0]], 2.);
//!
//! let orientation =
//!     OrientationDecomposition::<f64>::from_quaternion(0., 0., 0., [1., 1., 1.], [0., 0., 0.], 1.)?;
//! assert_eq!(orientation.voxel_to_world([1., 2., 3.]), [1., 2., 3.]);
//! # Ok(())
//! # }
//! # run().unwrap();
//! ```
#![deny(missing_debug_implementations)]
#![warn(missing_docs, unused_extern_crates, trivial_casts, unused_results)]

#[macro_use]
extern crate quick_error;
#[macro_use]
extern crate num_derive;
#[macro_use]
extern crate log;

pub mod affine;
pub mod error;
pub mod filter;
pub mod header;
pub mod matrix;
pub mod orientation;
pub mod quaternion;
pub mod region;
pub mod typedef;
mod util;
pub mod volume;

pub use crate::error::{Result, VoxelError};
pub use crate::filter::{apply_filter, apply_filter_per_volume, VolumeFilter};
pub use crate::header::NiftiQform;
pub use crate::matrix::{AffineParts, Matrix4x4};
pub use crate::orientation::{
    mr_transform, ImageGeometry, MrTransformOptions, OrientationDecomposition, Real,
};
pub use crate::quaternion::Quaternion;
pub use crate::region::{VoxelBox, VoxelBox4};
pub use crate::typedef::{ElementType, XForm};
pub use crate::volume::element::DataElement;
#[cfg(feature = "ndarray_volumes")]
pub use crate::volume::ndarray::IntoNdArray;
pub use crate::volume::{
    Array1D, Array2D, Array3D, Array4D, DynArray3D, VoxelArray, VoxelBuffer, VoxelOrder,
};
