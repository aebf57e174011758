//! Small numeric conversions shared across the engine.

/// Converts a voxel-grid index or count to `f64`.
///
/// # Panics
///
/// Panics if `x` does not fit in a `u32`, which would imply a grid far
/// larger than this engine is meant to address.
#[must_use]
pub fn f64_from_usize(x: usize) -> f64 {
    f64::from(u32::try_from(x).unwrap())
}
