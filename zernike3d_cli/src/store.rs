//! The result store.
//!
//! Every computed descriptor is written to an invariant file next to a
//! small provenance sidecar recording the source file's content hash and
//! the order it was computed at, so a rerun over an unchanged tree can
//! skip recomputation entirely.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DriverError;

/// Where computed descriptors and their provenance sidecars are written.
pub struct ResultStore {
    output_dir: PathBuf,
}

impl ResultStore {
    /// Creates a store rooted at `output_dir`. The directory need not
    /// exist yet; it is created on first write.
    #[must_use]
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    /// Returns `true` if `relative_path` already has a stored result for
    /// `hash` and `max_order`, meaning recomputation can be skipped.
    #[must_use]
    pub fn is_up_to_date(&self, relative_path: &Path, hash: &str, max_order: usize) -> bool {
        let Ok(contents) = fs::read_to_string(self.meta_path(relative_path)) else {
            return false;
        };
        let mut fields = contents.split_whitespace();
        let (Some(stored_hash), Some(stored_order)) = (fields.next(), fields.next()) else {
            return false;
        };
        stored_hash == hash && stored_order.parse() == Ok(max_order)
    }

    /// Writes the invariant vector for `relative_path` (format: the
    /// invariant count followed by the values, whitespace-separated) and
    /// its provenance sidecar.
    ///
    /// # Errors
    ///
    /// Fails with [`DriverError::Io`] if the output directory or either
    /// file cannot be written.
    pub fn persist(
        &self,
        relative_path: &Path,
        hash: &str,
        max_order: usize,
        invariants: &[f64],
    ) -> Result<(), DriverError> {
        let inv_path = self.invariant_path(relative_path);
        if let Some(parent) = inv_path.parent() {
            fs::create_dir_all(parent).map_err(|source| DriverError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut body = invariants.len().to_string();
        for value in invariants {
            body.push(' ');
            body.push_str(&value.to_string());
        }
        fs::write(&inv_path, body).map_err(|source| DriverError::Io {
            path: inv_path.clone(),
            source,
        })?;

        let meta_path = self.meta_path(relative_path);
        fs::write(&meta_path, format!("{hash} {max_order}")).map_err(|source| DriverError::Io {
            path: meta_path,
            source,
        })?;

        Ok(())
    }

    fn invariant_path(&self, relative_path: &Path) -> PathBuf {
        self.output_dir.join(relative_path).with_extension("inv")
    }

    fn meta_path(&self, relative_path: &Path) -> PathBuf {
        self.output_dir.join(relative_path).with_extension("inv.meta")
    }
}
