//! The moment accumulator.

use crate::convert::f64_from_usize;
use crate::error::{Error, Result};
use crate::index::triple;
use crate::voxels::VoxelGrid;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Scaled geometrical moments `M_{pqr}` of a voxel grid, for every
/// `0 <= p + q + r <= order`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MomentTable {
    order: usize,
    values: Vec<f64>,
}

impl MomentTable {
    /// Computes `M_{pqr}` for `grid`, normalisation centre `(cx, cy, cz)` and
    /// scale `s`, for every `p + q + r <= order`.
    ///
    /// Uses three successive 1D separable passes — `O(D^3 N + D^2 N^2 + D
    /// N^3)` — rather than the naive `O(D^3 N^3)` triple sum.
    pub fn new(grid: &VoxelGrid, cx: f64, cy: f64, cz: f64, s: f64, order: usize) -> Result<Self> {
        let d = grid.side();
        let n = order;

        let powers_x = axis_powers(d, cx, s, n);
        let powers_y = axis_powers(d, cy, s, n);
        let powers_z = axis_powers(d, cz, s, n);

        // line[(x*d+y)*(n+1)+r] = sum_z f(x,y,z) * u_z^r
        let mut line = vec![0.0_f64; d * d * (n + 1)];
        for x in 0..d {
            for y in 0..d {
                for z in 0..d {
                    let f = grid.get(x, y, z);
                    if f == 0.0 {
                        continue;
                    }
                    let base = (x * d + y) * (n + 1);
                    let uz_base = z * (n + 1);
                    for r in 0..=n {
                        line[base + r] += f * powers_z[uz_base + r];
                    }
                }
            }
        }

        // plane[(x*(n+1)+q)*(n+1)+r] = sum_y u_y^q * line[(x*d+y)*(n+1)+r], q+r<=n
        let mut plane = vec![0.0_f64; d * (n + 1) * (n + 1)];
        for x in 0..d {
            for y in 0..d {
                let uy_base = y * (n + 1);
                let line_base = (x * d + y) * (n + 1);
                for q in 0..=n {
                    let uy_q = powers_y[uy_base + q];
                    if uy_q == 0.0 {
                        continue;
                    }
                    let plane_base = (x * (n + 1) + q) * (n + 1);
                    for r in 0..=(n - q) {
                        plane[plane_base + r] += uy_q * line[line_base + r];
                    }
                }
            }
        }

        // values[triple(n,p,q,r)] = sum_x u_x^p * plane[(x*(n+1)+q)*(n+1)+r], p+q+r<=n
        let mut values = vec![0.0_f64; (n + 1) * (n + 1) * (n + 1)];
        for x in 0..d {
            let ux_base = x * (n + 1);
            for p in 0..=n {
                let ux_p = powers_x[ux_base + p];
                if ux_p == 0.0 {
                    continue;
                }
                for q in 0..=(n - p) {
                    let plane_base = (x * (n + 1) + q) * (n + 1);
                    for r in 0..=(n - p - q) {
                        values[triple(n, p, q, r)] += ux_p * plane[plane_base + r];
                    }
                }
            }
        }

        if values.iter().any(|v| !v.is_finite()) {
            return Err(Error::NumericalFailure);
        }

        Ok(Self { order: n, values })
    }

    /// The maximal order this table was built for.
    #[must_use]
    pub const fn order(&self) -> usize {
        self.order
    }

    /// Returns `M_{pqr}`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidIndex`] if `p + q + r` exceeds the table's
    /// order.
    pub fn get(&self, p: usize, q: usize, r: usize) -> Result<f64> {
        if p + q + r > self.order {
            return Err(Error::InvalidIndex {
                order: self.order,
                what: "p + q + r exceeds moment table order",
            });
        }
        Ok(self.values[triple(self.order, p, q, r)])
    }
}

/// `powers[i * (n+1) + k] = (s * (i - c))^k`.
fn axis_powers(d: usize, c: f64, s: f64, n: usize) -> Vec<f64> {
    let mut powers = vec![0.0_f64; d * (n + 1)];
    for i in 0..d {
        let u = s * (f64_from_usize(i) - c);
        let base = i * (n + 1);
        let mut acc = 1.0;
        for k in 0..=n {
            powers[base + k] = acc;
            acc *= u;
        }
    }
    powers
}
