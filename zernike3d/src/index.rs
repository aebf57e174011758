//! Flat, closed-form addressing for the triangular tables the engine needs.
//!
//! Every table the engine builds is triangular in at least one pair of
//! indices (`p+q+r <= N`, `l <= n`, `m <= l`, ...). Rather than nested
//! `Vec<Vec<..>>` containers, each table is backed by one dense `Vec` sized
//! `(order+1)^k` addressed by these closed-form offsets; slots outside the
//! triangle are allocated but never read, since every accessor checks the
//! same bound the offset assumes before indexing.

#[inline]
#[must_use]
pub const fn pair(order: usize, a: usize, b: usize) -> usize {
    a * (order + 1) + b
}

#[inline]
#[must_use]
pub const fn triple(order: usize, a: usize, b: usize, c: usize) -> usize {
    (a * (order + 1) + b) * (order + 1) + c
}

/// The position of harmonic degree `l` among the degrees admissible for
/// radial order `n`, i.e. `{n mod 2, n mod 2 + 2, ..., n}`.
///
/// Callers must first check `l <= n` and that `l` and `n` share parity;
/// this function does not validate the pair itself.
#[inline]
#[must_use]
pub const fn li(n: usize, l: usize) -> usize {
    (l - n % 2) / 2
}

/// The number of harmonic degrees admissible for radial order `n`, i.e.
/// `|{n mod 2, n mod 2 + 2, ..., n}| = floor(n/2) + 1`.
#[inline]
#[must_use]
pub const fn l_count(n: usize) -> usize {
    n / 2 + 1
}
