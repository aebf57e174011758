#![warn(clippy::all, clippy::cargo, clippy::nursery, clippy::pedantic)]
#![warn(missing_docs)]
#![allow(clippy::similar_names)]

//! Rotation-invariant 3D Zernike shape descriptors for cubic voxel grids.
//!
//! Implements the moment-based formulation of Novotni & Klein, *3D Zernike
//! Descriptors for Content Based Shape Retrieval* (SM '03): normalisation
//! of a voxel grid into the unit ball (`normalize`), scaled geometrical
//! moments (`moments`), a precomputed geometric-to-Zernike basis expansion
//! (`basis`), the resulting complex Zernike moments and their
//! rotation-invariant norms (`zernike`), and an inverse reconstruction path
//! (`reconstruct`). `descriptor` wires these into the single entry point
//! most callers want.

pub mod basis;
pub mod convert;
pub mod descriptor;
pub mod error;
pub mod index;
pub mod moments;
pub mod normalize;
pub mod reconstruct;
pub mod voxels;
pub mod zernike;

pub use basis::BasisTables;
pub use descriptor::{descriptor_compute, descriptor_compute_with_basis, Descriptor};
pub use error::{Error, Result};
pub use moments::MomentTable;
pub use normalize::Normalization;
pub use reconstruct::{reconstruct, ReconstructionBounds};
pub use voxels::{VoxelGrid, VoxelValue};
pub use zernike::{invariants, Omega, ZernikeEngine};
