//! Error taxonomy for the descriptor engine.

use thiserror::Error;

/// Errors raised by the moment accumulator, basis tables, Zernike engine,
/// normaliser, and reconstructor.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The grid has no occupied voxels, so the normaliser cannot determine a
    /// centre of gravity or scale.
    #[error("grid has no occupied voxels")]
    NoContent,
    /// A moment or basis entry was requested outside the admissible index
    /// range for the configured order. This indicates a programming error in
    /// the caller, not a property of the input data.
    #[error("index out of range for order {order}: {what}")]
    InvalidIndex {
        /// The maximum order the table was built for.
        order: usize,
        /// A short description of which index was out of range.
        what: &'static str,
    },
    /// The engine was asked to compute moments before the basis tables or a
    /// non-zero order were set.
    #[error("engine used before basis tables were initialised")]
    Uninitialised,
    /// A non-finite intermediate value (NaN or infinite) was observed during
    /// the computation.
    #[error("non-finite value encountered during computation")]
    NumericalFailure,
}

/// Convenience alias for fallible operations in this crate.
pub type Result<T> = std::result::Result<T, Error>;
