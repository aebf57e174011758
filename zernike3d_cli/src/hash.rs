//! Content fingerprinting — SHA-256 over file bytes, used for change
//! detection and memoised-result lookup.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::DriverError;

/// Computes the SHA-256 digest of `path`'s contents as a lowercase hex
/// string.
///
/// # Errors
///
/// Fails with [`DriverError::Io`] if the file cannot be opened or read.
pub fn compute_sha256(path: &Path) -> Result<String, DriverError> {
    let file = File::open(path).map_err(|source| DriverError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buffer = [0_u8; 64 * 1024];

    loop {
        let n = reader.read(&mut buffer).map_err(|source| DriverError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    use std::fmt::Write;
    Ok(hasher.finalize().iter().fold(String::new(), |mut out, byte| {
        let _ = write!(out, "{byte:02x}");
        out
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_known_digest_of_empty_input() {
        let dir = std::env::temp_dir().join(format!("zernike3d_hash_test_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("empty.bin");
        std::fs::write(&path, []).unwrap();

        let digest = compute_sha256(&path).unwrap();
        assert_eq!(
            digest,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn differs_for_different_contents() {
        let dir = std::env::temp_dir().join(format!("zernike3d_hash_test2_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let a = dir.join("a.bin");
        let b = dir.join("b.bin");
        std::fs::write(&a, b"hello").unwrap();
        std::fs::write(&b, b"world").unwrap();

        assert_ne!(compute_sha256(&a).unwrap(), compute_sha256(&b).unwrap());

        std::fs::remove_dir_all(dir).ok();
    }
}
