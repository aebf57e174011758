//! Basis coefficient tables — the harmonic normalisation `c`, the
//! radial orthonormalisation `q`, and the geometric-to-Zernike expansion
//! `g`, all as pure functions of the maximum order `N`.
//!
//! The three tables are constructed once per order and are immutable
//! afterwards, so they may be shared by reference across computations for
//! the same order.

use num_complex::Complex64;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::convert::f64_from_usize;
use crate::error::{Error, Result};
use crate::index::{li, pair};

/// One term of the expansion `g_{n,l,m} = sum chi_i * x^{p_i} y^{q_i} z^{r_i}`:
/// a monomial in unit-ball coordinates together with its complex
/// coefficient.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GTerm {
    /// Exponent of `x` (the geometrical moment's `p` index).
    pub p: usize,
    /// Exponent of `y` (the geometrical moment's `q` index).
    pub q: usize,
    /// Exponent of `z` (the geometrical moment's `r` index).
    pub r: usize,
    /// The complex coefficient `chi_i`.
    pub value: Complex64,
}

/// The three basis tables, precomputed for a fixed maximum order.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BasisTables {
    order: usize,
    /// `c[pair(order, l, m)] = c_{l,m}`, `0 <= m <= l <= order`.
    c: Vec<f64>,
    /// `q[n][li(n,l)][mu] = q_{n,l,mu}`.
    q: Vec<Vec<Vec<f64>>>,
    /// `g[n][li(n,l)][m] = g_{n,l,m}`.
    g: Vec<Vec<Vec<Vec<GTerm>>>>,
}

impl BasisTables {
    /// Builds `c`, `q`, and `g` for `0 <= n <= order`, in that construction
    /// order (`g` depends on both `c` and `q`), the same loop order every
    /// time so floating-point summation stays stable across runs.
    #[must_use]
    pub fn new(order: usize) -> Self {
        let c = compute_c(order);
        let q = compute_q(order);
        let g = compute_g(order, &c, &q);
        Self { order, c, q, g }
    }

    /// The maximum order these tables were built for.
    #[must_use]
    pub const fn order(&self) -> usize {
        self.order
    }

    /// Returns `c_{l,m}` for `0 <= m <= l <= order`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidIndex`] if `l > order` or `m > l`.
    pub fn c(&self, l: usize, m: usize) -> Result<f64> {
        if l > self.order || m > l {
            return Err(Error::InvalidIndex {
                order: self.order,
                what: "c_{l,m} requires m <= l <= order",
            });
        }
        Ok(self.c[pair(self.order, l, m)])
    }

    /// Returns `q_{n,l,mu}` for the admissible `(n, l, mu)` triple.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidIndex`] if `n > order`, `l` is not an
    /// admissible harmonic degree for `n`, or `mu > (n - l) / 2`.
    pub fn q(&self, n: usize, l: usize, mu: usize) -> Result<f64> {
        let k = self.radial_steps(n, l)?;
        if mu > k {
            return Err(Error::InvalidIndex {
                order: self.order,
                what: "q_{n,l,mu} requires mu <= (n - l) / 2",
            });
        }
        Ok(self.q[n][li(n, l)][mu])
    }

    /// Returns the expansion terms of `g_{n,l,m}` for the admissible
    /// `(n, l, m)` triple.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidIndex`] if `n > order`, `l` is not an
    /// admissible harmonic degree for `n`, or `m > l`.
    pub fn g(&self, n: usize, l: usize, m: usize) -> Result<&[GTerm]> {
        self.radial_steps(n, l)?;
        if m > l {
            return Err(Error::InvalidIndex {
                order: self.order,
                what: "g_{n,l,m} requires m <= l",
            });
        }
        Ok(&self.g[n][li(n, l)][m])
    }

    /// Validates `(n, l)` and returns `k = (n - l) / 2`.
    fn radial_steps(&self, n: usize, l: usize) -> Result<usize> {
        if n > self.order || l > n || (l % 2) != (n % 2) {
            return Err(Error::InvalidIndex {
                order: self.order,
                what: "(n, l) must satisfy l <= n and l === n (mod 2)",
            });
        }
        Ok((n - l) / 2)
    }
}

/// Rising factorial (Pochhammer symbol) `(a)_k = a(a+1)...(a+k-1)`.
fn rising_factorial(a: f64, k: usize) -> f64 {
    (0..k).fold(1.0, |acc, i| acc * (a + f64_from_usize(i)))
}

/// Binomial coefficient `binom(n, k)`, computed multiplicatively to avoid
/// factorial overflow at the orders this engine targets.
fn binomial(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    (0..k).fold(1.0, |acc, i| {
        acc * f64_from_usize(n - i) / f64_from_usize(i + 1)
    })
}

fn compute_c(order: usize) -> Vec<f64> {
    let mut c = vec![0.0_f64; (order + 1) * (order + 1)];
    for l in 0..=order {
        for m in 0..=l {
            let n_sqrt = f64_from_usize(2 * l + 1) * rising_factorial(f64_from_usize(l + 1), m);
            let d_sqrt = rising_factorial(f64_from_usize(l - m + 1), m);
            c[pair(order, l, m)] = (n_sqrt / d_sqrt).sqrt();
        }
    }
    c
}

fn compute_q(order: usize) -> Vec<Vec<Vec<f64>>> {
    let mut q = Vec::with_capacity(order + 1);
    for n in 0..=order {
        let l0 = n % 2;
        let mut per_n = Vec::with_capacity(n / 2 + 1);
        let mut l = l0;
        while l <= n {
            let k = (n - l) / 2;
            let mut per_l = Vec::with_capacity(k + 1);
            for mu in 0..=k {
                let mut nom = binomial(2 * k, k)
                    * binomial(k, mu)
                    * binomial(2 * (k + l + mu) + 1, 2 * k);
                if (k + mu) % 2 == 1 {
                    nom = -nom;
                }
                let den = 2.0_f64.powi(i32::try_from(2 * k).unwrap()) * binomial(k + l + mu, k);
                let n_sqrt = f64_from_usize(2 * l + 4 * k + 3);
                per_l.push(nom / den * (n_sqrt / 3.0).sqrt());
            }
            per_n.push(per_l);
            l += 2;
        }
        q.push(per_n);
    }
    q
}

fn compute_g(order: usize, c: &[f64], q: &[Vec<Vec<f64>>]) -> Vec<Vec<Vec<Vec<GTerm>>>> {
    let mut g = Vec::with_capacity(order + 1);
    for n in 0..=order {
        let l0 = n % 2;
        let mut per_n = Vec::with_capacity(n / 2 + 1);
        let mut l = l0;
        while l <= n {
            let li_idx = li(n, l);
            let k = (n - l) / 2;
            let mut per_l = Vec::with_capacity(l + 1);
            for m in 0..=l {
                let w = c[pair(order, l, m)] / 2.0_f64.powi(i32::try_from(m).unwrap());
                let mut terms = Vec::new();

                for nu in 0..=k {
                    let w_nu = w * q[n][li_idx][nu];
                    for alpha in 0..=nu {
                        let w_nua = w_nu * binomial(nu, alpha);
                        for beta in 0..=(nu - alpha) {
                            let w_nuab = w_nua * binomial(nu - alpha, beta);
                            for p in 0..=m {
                                let w_nuabp = w_nuab * binomial(m, p);
                                for mu in 0..=(l - m) / 2 {
                                    let w_nuabpmu = w_nuabp * binomial(l, mu)
                                        * binomial(l - mu, m + mu)
                                        / 2.0_f64.powi(i32::try_from(2 * mu).unwrap());
                                    for qq in 0..=mu {
                                        let mut weight = w_nuabpmu * binomial(mu, qq);
                                        if (m - p + mu) % 2 == 1 {
                                            weight = -weight;
                                        }

                                        let value = match p % 4 {
                                            0 => Complex64::new(weight, 0.0),
                                            1 => Complex64::new(0.0, weight),
                                            2 => Complex64::new(-weight, 0.0),
                                            _ => Complex64::new(0.0, -weight),
                                        };

                                        // exponents are additions-then-subtraction so the
                                        // usize arithmetic never underflows; see DESIGN.md.
                                        let r_exp = (l - m) + 2 * (nu - alpha - beta) - 2 * mu;
                                        let q_exp = 2 * (mu - qq) + 2 * beta + (m - p);
                                        let p_exp = 2 * qq + p + 2 * alpha;

                                        terms.push(GTerm {
                                            p: p_exp,
                                            q: q_exp,
                                            r: r_exp,
                                            value,
                                        });
                                    }
                                }
                            }
                        }
                    }
                }

                per_l.push(terms);
            }
            per_n.push(per_l);
            l += 2;
        }
        g.push(per_n);
    }
    g
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn c_is_deterministic() {
        let a = BasisTables::new(6);
        let b = BasisTables::new(6);
        for l in 0..=6 {
            for m in 0..=l {
                assert!((a.c(l, m).unwrap() - b.c(l, m).unwrap()).abs() < 1e-15);
            }
        }
    }

    #[test]
    fn c_00_is_one() {
        let basis = BasisTables::new(0);
        assert!((basis.c(0, 0).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn g_exponents_sum_with_moment_order() {
        // Every term of g_{n,l,m} must correspond to a geometrical moment
        // with p+q+r <= n (since k = (n-l)/2 >= 0 and the exponents are
        // built from at most n "degrees of freedom" across nu/alpha/beta/mu/q/p).
        let basis = BasisTables::new(5);
        for n in 0..=5 {
            let l0 = n % 2;
            let mut l = l0;
            while l <= n {
                for m in 0..=l {
                    for term in basis.g(n, l, m).unwrap() {
                        assert!(term.p + term.q + term.r <= n);
                    }
                }
                l += 2;
            }
        }
    }

    #[test]
    fn out_of_range_indices_are_rejected() {
        let basis = BasisTables::new(3);
        assert!(matches!(basis.c(4, 0), Err(Error::InvalidIndex { .. })));
        assert!(matches!(basis.g(2, 1, 0), Err(Error::InvalidIndex { .. })));
        assert!(matches!(basis.q(3, 3, 5), Err(Error::InvalidIndex { .. })));
    }
}
