//! The normaliser — derives centre of gravity and scale from an
//! initial unit-scale moment computation, then masks voxels outside the
//! unit ball.

use crate::convert::f64_from_usize;
use crate::error::{Error, Result};
use crate::moments::MomentTable;
use crate::voxels::VoxelGrid;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The legacy "occupied" threshold for the radius estimate: voxels at or
/// below this density contribute to moments but not to the radius used to
/// derive the scale. This is a documented convention, not a tuned
/// parameter — see [`Normalization::compute`].
pub const DEFAULT_OCCUPANCY_THRESHOLD: f64 = 0.9;

/// The normalisation record `(cx, cy, cz, s)`: centre of gravity in voxel
/// coordinates and scale in units of 1/voxel.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Normalization {
    /// Centre of gravity, x coordinate, in voxel units.
    pub cx: f64,
    /// Centre of gravity, y coordinate, in voxel units.
    pub cy: f64,
    /// Centre of gravity, z coordinate, in voxel units.
    pub cz: f64,
    /// Scale, in units of 1/voxel. Always positive.
    pub s: f64,
}

impl Normalization {
    /// Computes the normalisation record for `grid` using the default
    /// occupancy threshold, and returns it alongside a copy of `grid` with
    /// voxels outside the unit ball masked to zero.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::NoContent`] if the grid has no occupied voxels.
    pub fn compute(grid: &VoxelGrid) -> Result<(Self, VoxelGrid)> {
        Self::compute_with_threshold(grid, DEFAULT_OCCUPANCY_THRESHOLD)
    }

    /// As [`Self::compute`], but with an explicit occupancy threshold.
    ///
    /// Behaviour on non-binary (density) voxel values is well defined:
    /// voxels at or below `theta` still contribute to the geometrical
    /// moments used for the centre of gravity, just not to the radius
    /// estimate that sets the scale. The default of `0.9` is a legacy
    /// convention for binary inputs and should be documented, not changed,
    /// for callers targeting comparability with existing descriptor
    /// corpora.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::NoContent`] if the grid's zeroth moment is zero
    /// or if no voxel exceeds `theta`.
    pub fn compute_with_threshold(grid: &VoxelGrid, theta: f64) -> Result<(Self, VoxelGrid)> {
        let unit = MomentTable::new(grid, 0.0, 0.0, 0.0, 1.0, 1)?;
        let m000 = unit.get(0, 0, 0)?;
        if m000 == 0.0 {
            return Err(Error::NoContent);
        }

        let cx = unit.get(1, 0, 0)? / m000;
        let cy = unit.get(0, 1, 0)? / m000;
        let cz = unit.get(0, 0, 1)? / m000;

        let d = grid.side();
        let mut sum = 0.0_f64;
        let mut count = 0_usize;
        for z in 0..d {
            for y in 0..d {
                for x in 0..d {
                    if grid.get(x, y, z) > theta {
                        let dx = VoxelGrid::axis_coordinate(x) - cx;
                        let dy = VoxelGrid::axis_coordinate(y) - cy;
                        let dz = VoxelGrid::axis_coordinate(z) - cz;
                        sum += dx * dx + dy * dy + dz * dz;
                        count += 1;
                    }
                }
            }
        }

        if count == 0 {
            return Err(Error::NoContent);
        }

        let rho = (sum / f64_from_usize(count)).sqrt();
        if rho == 0.0 {
            return Err(Error::NoContent);
        }
        let s = 1.0 / (2.0 * rho);

        if !s.is_finite() || !cx.is_finite() || !cy.is_finite() || !cz.is_finite() {
            return Err(Error::NumericalFailure);
        }

        let mut masked = grid.clone();
        let sqr_radius = (1.0 / s) * (1.0 / s);
        for z in 0..d {
            for y in 0..d {
                for x in 0..d {
                    let dx = VoxelGrid::axis_coordinate(x) - cx;
                    let dy = VoxelGrid::axis_coordinate(y) - cy;
                    let dz = VoxelGrid::axis_coordinate(z) - cz;
                    if dx * dx + dy * dy + dz * dz > sqr_radius {
                        masked.set(x, y, z, 0.0);
                    }
                }
            }
        }

        Ok((Self { cx, cy, cz, s }, masked))
    }
}
