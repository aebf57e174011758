//! The end-to-end descriptor pipeline: normalise the grid, accumulate
//! geometrical moments, precompute the basis tables, and assemble the
//! Zernike moments and invariants from them.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::basis::BasisTables;
use crate::error::{Error, Result};
use crate::moments::MomentTable;
use crate::normalize::Normalization;
use crate::voxels::VoxelGrid;
use crate::zernike::{invariants, Omega};

/// The full output of [`descriptor_compute`]: the rotation-invariant
/// vector, the complex Zernike moment tensor it was derived from, and the
/// normalisation record the input grid was mapped through.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Descriptor {
    /// The flat invariant vector `F`, in `(n, l)` ascending order.
    pub invariants: Vec<f64>,
    /// The complex Zernike moment tensor `Omega`.
    pub moments: Omega,
    /// The normalisation record `(cx, cy, cz, s)` used to compute `moments`.
    pub normalization: Normalization,
}

/// Computes the full 3D Zernike descriptor of `grid` up to order `order`.
///
/// `side` must match `grid.side()`; it is accepted explicitly (mirroring
/// the reference API) so callers that only hold a flat buffer and a
/// dimension can be validated before any computation happens.
///
/// # Errors
///
/// Fails with [`Error::InvalidIndex`] if `side != grid.side()`, with
/// [`Error::NoContent`] if the grid has no occupied voxels, or with
/// [`Error::NumericalFailure`] if a non-finite intermediate value is
/// observed.
pub fn descriptor_compute(grid: &VoxelGrid, side: usize, order: usize) -> Result<Descriptor> {
    let basis = BasisTables::new(order);
    descriptor_compute_with_basis(grid, side, &basis)
}

/// Like [`descriptor_compute`], but reuses an existing [`BasisTables`]
/// instead of building one from scratch. `basis.order()` is used as the
/// truncation order; callers that share one basis across many grids (a
/// batch driver, for instance) should build it once per worker pool
/// rather than once per grid.
///
/// # Errors
///
/// Same conditions as [`descriptor_compute`].
pub fn descriptor_compute_with_basis(
    grid: &VoxelGrid,
    side: usize,
    basis: &BasisTables,
) -> Result<Descriptor> {
    if side != grid.side() {
        return Err(Error::InvalidIndex {
            order: basis.order(),
            what: "side does not match the grid's actual side length",
        });
    }

    let (normalization, masked) = Normalization::compute(grid)?;
    let moments = MomentTable::new(
        &masked,
        normalization.cx,
        normalization.cy,
        normalization.cz,
        normalization.s,
        basis.order(),
    )?;
    let moments = Omega::compute(basis, &moments)?;
    let f = invariants(&moments)?;

    Ok(Descriptor {
        invariants: f,
        moments,
        normalization,
    })
}
