//! Error taxonomy for the batch driver's I/O-facing components (the
//! `.binvox` reader, content hashing, and the result store).
//!
//! The engine crate's own [`zernike3d::Error`] is propagated as-is where it
//! surfaces; this enum only covers failures specific to the driver.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading a `.binvox` file, hashing it, or persisting
/// a result.
#[derive(Debug, Error)]
pub enum DriverError {
    /// An I/O error occurred while reading or writing a file.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The file being read or written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The file did not begin with the `#binvox` magic.
    #[error("{path} is not a binvox file (missing #binvox magic)")]
    BadMagic {
        /// The file that failed to parse.
        path: PathBuf,
    },
    /// The file's header was malformed or truncated.
    #[error("{path} has a malformed binvox header: {what}")]
    BadHeader {
        /// The file that failed to parse.
        path: PathBuf,
        /// A short description of what was wrong.
        what: &'static str,
    },
    /// The voxel grid's dimensions were not equal on all three axes.
    #[error("{path} has unequal dimensions ({depth}x{height}x{width}); only cubic grids are supported")]
    NotCubic {
        /// The file that failed to parse.
        path: PathBuf,
        /// The depth axis read from the header.
        depth: usize,
        /// The height axis read from the header.
        height: usize,
        /// The width axis read from the header.
        width: usize,
    },
    /// The run-length-encoded data stream did not decode to exactly
    /// `side^3` voxels.
    #[error("{path} has a malformed run-length encoded voxel stream")]
    BadData {
        /// The file that failed to parse.
        path: PathBuf,
    },
}
