//! The Zernike moment engine — assembles complex moments `Omega_{n,l,m}`
//! from the geometrical moments and basis tables, then derives the
//! rotation-invariant norms `F_{n,l}`.

use std::f64::consts::PI;

use num_complex::Complex64;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::basis::BasisTables;
use crate::error::{Error, Result};
use crate::index::li;
use crate::moments::MomentTable;

const NORMALISATION: f64 = 3.0 / (4.0 * PI);

/// The complex Zernike moment tensor `Omega_{n,l,m}`, storing only `m >= 0`
/// (`Omega_{n,l,-m} = (-1)^m * conj(Omega_{n,l,m})`).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Omega {
    order: usize,
    /// `values[n][li(n,l)][m]`, `m >= 0`.
    values: Vec<Vec<Vec<Complex64>>>,
}

impl Omega {
    /// Computes `Omega_{n,l,m} = 3/(4 pi) * sum_i conj(chi_i) * M_{p_i,q_i,r_i}`
    /// for every `(n, l, m)` with `m >= 0` and `n` up to `basis.order()`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidIndex`] if `moments` was not computed to
    /// at least `basis.order()`, or with [`Error::NumericalFailure`] if a
    /// non-finite value is produced.
    pub fn compute(basis: &BasisTables, moments: &MomentTable) -> Result<Self> {
        let order = basis.order();
        if moments.order() < order {
            return Err(Error::InvalidIndex {
                order,
                what: "moment table was not computed to the basis order",
            });
        }

        let mut values = Vec::with_capacity(order + 1);
        for n in 0..=order {
            let l0 = n % 2;
            let mut per_n = Vec::with_capacity(n / 2 + 1);
            let mut l = l0;
            while l <= n {
                let mut per_l = Vec::with_capacity(l + 1);
                for m in 0..=l {
                    let mut zm = Complex64::new(0.0, 0.0);
                    for term in basis.g(n, l, m)? {
                        let moment = moments.get(term.p, term.q, term.r)?;
                        zm += term.value.conj() * moment;
                    }
                    zm *= NORMALISATION;

                    if !zm.re.is_finite() || !zm.im.is_finite() {
                        return Err(Error::NumericalFailure);
                    }
                    per_l.push(zm);
                }
                per_n.push(per_l);
                l += 2;
            }
            values.push(per_n);
        }

        Ok(Self { order, values })
    }

    /// The maximum order this tensor was computed for.
    #[must_use]
    pub const fn order(&self) -> usize {
        self.order
    }

    /// Returns `Omega_{n,l,m}` for any `m` in `[-l, l]`, folding negative
    /// `m` through the stored-only-`m>=0` symmetry relation.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidIndex`] if `(n, l)` is not admissible or
    /// `|m| > l`.
    pub fn get(&self, n: usize, l: usize, m: isize) -> Result<Complex64> {
        if n > self.order || l > n || (l % 2) != (n % 2) {
            return Err(Error::InvalidIndex {
                order: self.order,
                what: "(n, l) must satisfy l <= n and l === n (mod 2)",
            });
        }
        let m_abs = m.unsigned_abs();
        if m_abs > l {
            return Err(Error::InvalidIndex {
                order: self.order,
                what: "|m| must not exceed l",
            });
        }
        let value = self.values[n][li(n, l)][m_abs];
        Ok(if m < 0 && m_abs % 2 == 1 {
            -value.conj()
        } else if m < 0 {
            value.conj()
        } else {
            value
        })
    }
}

/// Derives the flat invariant vector `F`, one entry per `(n, l)` pair in
/// strict ascending lexicographic order.
///
/// Reproduces the reference implementation's running-sum convention: the
/// squared-norm accumulator is reset only when `n` changes, not for every
/// `l`, so `F_{n,l}` grows monotonically in `l` for fixed `n`. This is
/// a documented legacy quirk, preserved here for bit-compatibility with
/// existing descriptor corpora rather than reset to a "clean" per-`(n,l)`
/// norm.
///
/// # Errors
///
/// Fails with [`Error::NumericalFailure`] if a non-finite intermediate sum
/// is produced.
pub fn invariants(omega: &Omega) -> Result<Vec<f64>> {
    let order = omega.order();
    let mut out = Vec::with_capacity((0..=order).map(|n| n / 2 + 1).sum());

    for n in 0..=order {
        let mut sum = 0.0_f64;
        let l0 = n % 2;
        let mut l = l0;
        while l <= n {
            for m in -(isize::try_from(l).unwrap())..=isize::try_from(l).unwrap() {
                sum += omega.get(n, l, m)?.norm_sqr();
            }
            if !sum.is_finite() {
                return Err(Error::NumericalFailure);
            }
            out.push(sum.sqrt());
            l += 2;
        }
    }

    Ok(out)
}

/// The length of the invariant vector `F` produced for a given order:
/// `sum_{n=0}^{order} (floor(n/2) + 1)`.
#[must_use]
pub fn invariant_len(order: usize) -> usize {
    (0..=order).map(|n| n / 2 + 1).sum()
}

/// A stateful two-phase engine mirroring the reference implementation's
/// `Init`-then-`Compute` lifecycle: basis tables are built once by `init`,
/// and `compute` fails with [`Error::Uninitialised`] if called before that.
///
/// Most callers should prefer the stateless [`Omega::compute`]; this type
/// exists for callers that want the reference's explicit two-phase shape,
/// e.g. to share one set of basis tables across many grids.
#[derive(Clone, Debug, Default)]
pub struct ZernikeEngine {
    basis: Option<BasisTables>,
}

impl ZernikeEngine {
    /// Creates an engine with no basis tables yet.
    #[must_use]
    pub fn new() -> Self {
        Self { basis: None }
    }

    /// Precomputes the basis tables for the given order.
    pub fn init(&mut self, order: usize) {
        self.basis = Some(BasisTables::new(order));
    }

    /// The basis tables, if [`Self::init`] has been called.
    #[must_use]
    pub const fn basis(&self) -> Option<&BasisTables> {
        self.basis.as_ref()
    }

    /// Computes `Omega` from `moments`, using the basis tables built by the
    /// last call to [`Self::init`].
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Uninitialised`] if [`Self::init`] was never
    /// called, or propagates [`Omega::compute`]'s errors otherwise.
    pub fn compute(&self, moments: &MomentTable) -> Result<Omega> {
        let basis = self.basis.as_ref().ok_or(Error::Uninitialised)?;
        Omega::compute(basis, moments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::VoxelGrid;

    #[test]
    fn order_zero_matches_zeroth_moment_times_normalisation() {
        let grid = VoxelGrid::from_fn(3, |_, _, _| 1.0);
        let moments = MomentTable::new(&grid, 1.0, 1.0, 1.0, 1.0, 0).unwrap();
        let basis = BasisTables::new(0);
        let omega = Omega::compute(&basis, &moments).unwrap();
        let f = invariants(&omega).unwrap();
        assert_eq!(f.len(), 1);
        assert!((f[0] - NORMALISATION * moments.get(0, 0, 0).unwrap()).abs() < 1e-9);
    }

    #[test]
    fn uninitialised_engine_fails() {
        let grid = VoxelGrid::zeros(2);
        let moments = MomentTable::new(&grid, 0.0, 0.0, 0.0, 1.0, 0).unwrap();
        let engine = ZernikeEngine::new();
        assert!(matches!(engine.compute(&moments), Err(Error::Uninitialised)));
    }

    #[test]
    fn invariant_vector_length_matches_formula() {
        for order in 0..8 {
            let grid = VoxelGrid::from_fn(5, |x, y, z| f64::from(u8::from(x == 2 && y == 2 && z == 2)));
            let moments = MomentTable::new(&grid, 2.0, 2.0, 2.0, 1.0, order).unwrap();
            let basis = BasisTables::new(order);
            let omega = Omega::compute(&basis, &moments).unwrap();
            let f = invariants(&omega).unwrap();
            assert_eq!(f.len(), invariant_len(order));
        }
    }

    #[test]
    fn single_centred_voxel_has_zero_energy_above_n0() {
        let grid = VoxelGrid::from_fn(5, |x, y, z| f64::from(u8::from(x == 2 && y == 2 && z == 2)));
        let moments = MomentTable::new(&grid, 2.0, 2.0, 2.0, 1.0, 4).unwrap();
        let basis = BasisTables::new(4);
        let omega = Omega::compute(&basis, &moments).unwrap();
        for n in 1..=4 {
            let l0 = n % 2;
            let mut l = l0;
            while l <= n {
                for m in 0..=l {
                    assert!(omega.get(n, l, isize::try_from(m).unwrap()).unwrap().norm() < 1e-9);
                }
                l += 2;
            }
        }
    }
}
