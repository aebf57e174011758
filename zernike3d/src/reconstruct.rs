//! The reconstructor — evaluates a (possibly truncated) set of complex
//! Zernike moments back onto a dense complex-valued grid.

use num_complex::Complex64;

use crate::basis::BasisTables;
use crate::convert::f64_from_usize;
use crate::error::{Error, Result};
use crate::zernike::Omega;

/// Inclusive truncation bounds for reconstruction: only radial orders in
/// `[n_min, n_max]` and harmonic degrees in `[l_min, l_max]` contribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReconstructionBounds {
    /// Smallest radial order to include.
    pub n_min: usize,
    /// Largest radial order to include (clamped to the basis's order).
    pub n_max: usize,
    /// Smallest harmonic degree to include.
    pub l_min: usize,
    /// Largest harmonic degree to include.
    pub l_max: usize,
}

impl ReconstructionBounds {
    /// Bounds that include every `(n, l)` pair the basis and moments admit.
    #[must_use]
    pub const fn full(order: usize) -> Self {
        Self {
            n_min: 0,
            n_max: order,
            l_min: 0,
            l_max: order,
        }
    }
}

/// Reconstructs a dense `out_side^3` complex grid from `omega` truncated to
/// `bounds`, with the normalisation triple `(cx, cy, cz, s)` expressed in
/// output-grid coordinates (the caller rescales from the source grid by
/// `out_side / source_side` before calling this).
///
/// Voxels falling outside the unit ball in normalised coordinates are left
/// at zero. Output is in the engine's canonical `(z*out_side+y)*out_side+x`
/// linear order.
///
/// # Errors
///
/// Fails with [`Error::NumericalFailure`] if a non-finite value is
/// produced.
pub fn reconstruct(
    omega: &Omega,
    basis: &BasisTables,
    out_side: usize,
    cx: f64,
    cy: f64,
    cz: f64,
    s: f64,
    bounds: &ReconstructionBounds,
) -> Result<Vec<Complex64>> {
    let mut out = vec![Complex64::new(0.0, 0.0); out_side * out_side * out_side];
    let n_max = bounds.n_max.min(basis.order()).min(omega.order());

    for z in 0..out_side {
        let pz = s * (f64_from_usize(z) - cz);
        for y in 0..out_side {
            let py = s * (f64_from_usize(y) - cy);
            for x in 0..out_side {
                let px = s * (f64_from_usize(x) - cx);

                if px * px + py * py + pz * pz > 1.0 {
                    continue;
                }

                let mut fval = Complex64::new(0.0, 0.0);
                for n in bounds.n_min..=n_max {
                    let l0 = n % 2;
                    let mut l = l0;
                    while l <= n {
                        if l >= bounds.l_min && l <= bounds.l_max {
                            for m in -(isize::try_from(l).unwrap())..=isize::try_from(l).unwrap() {
                                fval += evaluate_term(basis, omega, n, l, m, px, py, pz)?;
                            }
                        }
                        l += 2;
                    }
                }

                if !fval.re.is_finite() || !fval.im.is_finite() {
                    return Err(Error::NumericalFailure);
                }
                out[(z * out_side + y) * out_side + x] = fval;
            }
        }
    }

    Ok(out)
}

fn evaluate_term(
    basis: &BasisTables,
    omega: &Omega,
    n: usize,
    l: usize,
    m: isize,
    px: f64,
    py: f64,
    pz: f64,
) -> Result<Complex64> {
    let m_abs = m.unsigned_abs();
    let mut zp = Complex64::new(0.0, 0.0);
    for term in basis.g(n, l, m_abs)? {
        let mut value = term.value;
        if m < 0 {
            value = value.conj();
            if m_abs % 2 == 1 {
                value = -value;
            }
        }
        zp += value * px.powi(i32::try_from(term.p).unwrap())
            * py.powi(i32::try_from(term.q).unwrap())
            * pz.powi(i32::try_from(term.r).unwrap());
    }
    Ok(zp * omega.get(n, l, m)?)
}
