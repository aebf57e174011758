#![warn(clippy::all, clippy::cargo, clippy::nursery, clippy::pedantic)]
#![warn(missing_docs)]
#![allow(clippy::similar_names)]

//! Batch driver for computing 3D Zernike shape descriptors from directories
//! of `.binvox` files.
//!
//! The descriptor engine itself lives in [`zernike3d`]; this crate is the
//! thin external collaborator around it: it discovers input files
//! ([`binvox::discover`]), reads and parses the `.binvox` container
//! ([`binvox::read_binvox`]), fingerprints content for change detection
//! ([`hash`]), dispatches work across a bounded queue and worker pool
//! ([`driver`]), and persists results alongside provenance metadata
//! ([`store`]).

pub mod args;
pub mod binvox;
pub mod driver;
pub mod error;
pub mod hash;
pub mod store;

pub use args::Opts;
pub use driver::Summary;
pub use error::DriverError;
pub use store::ResultStore;
