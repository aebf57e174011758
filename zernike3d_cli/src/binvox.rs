//! The `.binvox` file reader.
//!
//! Parses the text header and run-length-encoded voxel stream of the
//! `.binvox` container format (originally
//! <https://www.patrickmin.com/binvox/binvox.html>) into a dense buffer in
//! the container's native `(y, z, x)` axis order, then transposes it into
//! the engine's canonical `(z*D+y)*D+x` order before handing it to
//! [`zernike3d::VoxelGrid`].

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use zernike3d::VoxelGrid;

use crate::error::DriverError;

/// Reads a `.binvox` file from `path` and returns the voxel grid in the
/// engine's canonical axis order.
///
/// # Errors
///
/// Fails with [`DriverError`] if the file cannot be opened, the header is
/// malformed, the grid is not cubic, or the data stream is truncated or
/// overflows the declared size.
pub fn read_binvox(path: &Path) -> Result<VoxelGrid, DriverError> {
    let file = File::open(path).map_err(|source| DriverError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);

    let magic = read_token(&mut reader, path)?;
    if magic != "#binvox" {
        return Err(DriverError::BadMagic {
            path: path.to_path_buf(),
        });
    }

    let _version: u32 = read_token(&mut reader, path)?
        .parse()
        .map_err(|_| bad_header(path, "version is not an integer"))?;

    let mut depth = 0_usize;
    let mut height = 0_usize;
    let mut width = 0_usize;
    loop {
        let keyword = read_token(&mut reader, path)?;
        match keyword.as_str() {
            "data" => break,
            "dim" => {
                depth = read_token(&mut reader, path)?
                    .parse()
                    .map_err(|_| bad_header(path, "dim depth is not an integer"))?;
                height = read_token(&mut reader, path)?
                    .parse()
                    .map_err(|_| bad_header(path, "dim height is not an integer"))?;
                width = read_token(&mut reader, path)?
                    .parse()
                    .map_err(|_| bad_header(path, "dim width is not an integer"))?;
            }
            _ => {
                skip_line(&mut reader, path)?;
            }
        }
    }

    if depth == 0 {
        return Err(bad_header(path, "missing dim keyword"));
    }
    if depth != height || depth != width {
        return Err(DriverError::NotCubic {
            path: path.to_path_buf(),
            depth,
            height,
            width,
        });
    }
    let side = depth;

    // The byte immediately after the "data" keyword's trailing newline.
    let mut one = [0_u8; 1];
    reader.read_exact(&mut one).map_err(|source| DriverError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let size = side * side * side;
    let mut native = vec![0_u8; size];
    let mut index = 0_usize;
    let mut pair = [0_u8; 2];
    while index < size {
        match reader.read_exact(&mut pair) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                return Err(DriverError::BadData {
                    path: path.to_path_buf(),
                });
            }
            Err(source) => {
                return Err(DriverError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
        let [value, count] = pair;
        let end = index + usize::from(count);
        if end > size {
            return Err(DriverError::BadData {
                path: path.to_path_buf(),
            });
        }
        native[index..end].fill(value);
        index = end;
    }

    Ok(transpose_native_to_canonical(&native, side))
}

/// The binvox container's native axis order is `(y, z, x)` — linear offset
/// `(y*D+z)*D+x` — while the engine's canonical order is `(z*D+y)*D+x`.
/// This re-indexes one into the other.
fn transpose_native_to_canonical(native: &[u8], side: usize) -> VoxelGrid {
    VoxelGrid::from_fn(side, |x, y, z| {
        let native_index = (y * side + z) * side + x;
        f64::from(native[native_index])
    })
}

fn bad_header(path: &Path, what: &'static str) -> DriverError {
    DriverError::BadHeader {
        path: path.to_path_buf(),
        what,
    }
}

fn read_token(reader: &mut impl Read, path: &Path) -> Result<String, DriverError> {
    let mut token = String::new();
    let mut byte = [0_u8; 1];
    loop {
        let n = reader.read(&mut byte).map_err(|source| DriverError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if n == 0 {
            if token.is_empty() {
                return Err(bad_header(path, "unexpected end of file"));
            }
            break;
        }
        let c = byte[0] as char;
        if c.is_whitespace() {
            if token.is_empty() {
                continue;
            }
            break;
        }
        token.push(c);
    }
    Ok(token)
}

fn skip_line(reader: &mut impl Read, path: &Path) -> Result<(), DriverError> {
    let mut byte = [0_u8; 1];
    loop {
        let n = reader.read(&mut byte).map_err(|source| DriverError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if n == 0 || byte[0] == b'\n' {
            break;
        }
    }
    Ok(())
}

/// Returns the `.binvox` files under `dir`, recursively, in no particular
/// order.
#[must_use]
pub fn discover(dir: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    walk(dir, &mut out);
    out
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            walk(&path, out);
        } else if path.extension().is_some_and(|ext| ext == "binvox") {
            out.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_test_binvox(path: &Path, side: usize, occupied: &[(usize, usize, usize)]) {
        let mut file = File::create(path).unwrap();
        writeln!(file, "#binvox 1").unwrap();
        writeln!(file, "dim {side} {side} {side}").unwrap();
        writeln!(file, "translate 0 0 0").unwrap();
        writeln!(file, "scale 1").unwrap();
        writeln!(file, "data").unwrap();

        let size = side * side * side;
        let mut native = vec![0_u8; size];
        for &(x, y, z) in occupied {
            native[(y * side + z) * side + x] = 1;
        }

        let mut index = 0;
        while index < size {
            let value = native[index];
            let mut count = 0_u16;
            while index + usize::from(count) < size
                && count < 255
                && native[index + usize::from(count)] == value
            {
                count += 1;
            }
            file.write_all(&[value, u8::try_from(count).unwrap()]).unwrap();
            index += usize::from(count);
        }
    }

    #[test]
    fn round_trips_a_single_voxel() {
        let dir = make_temp_dir();
        let path = dir.join("one.binvox");
        write_test_binvox(&path, 4, &[(1, 2, 3)]);

        let grid = read_binvox(&path).unwrap();
        assert_eq!(grid.side(), 4);
        assert_eq!(grid.get(1, 2, 3), 1.0);
        assert_eq!(grid.count_above(0.5), 1);

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn rejects_non_binvox_files() {
        let dir = make_temp_dir();
        let path = dir.join("not.binvox");
        std::fs::write(&path, b"not a binvox file\n").unwrap();
        assert!(matches!(read_binvox(&path), Err(DriverError::BadMagic { .. })));
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn discover_finds_nested_binvox_files() {
        let dir = make_temp_dir();
        std::fs::create_dir_all(dir.join("sub")).unwrap();
        write_test_binvox(&dir.join("a.binvox"), 2, &[(0, 0, 0)]);
        write_test_binvox(&dir.join("sub").join("b.binvox"), 2, &[(0, 0, 0)]);
        std::fs::write(dir.join("ignore.txt"), b"x").unwrap();

        let mut found = discover(&dir);
        found.sort();
        assert_eq!(found.len(), 2);

        std::fs::remove_dir_all(dir).ok();
    }

    fn make_temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "zernike3d_binvox_test_{}_{}",
            std::process::id(),
            ADDR.fetch_add(1, std::sync::atomic::Ordering::Relaxed)
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    static ADDR: std::sync::atomic::AtomicUsize = std::sync::atomic::AtomicUsize::new(0);
}
