#![allow(missing_docs)]

use std::io::Write;

use assert_cmd::Command;
use assert_fs::fixture::PathChild;
use assert_fs::TempDir;

/// Writes a cubic `.binvox` file with a small solid block of occupied
/// voxels centred in the grid, in the container's native `(y, z, x)` order.
/// A single isolated voxel would give a zero RMS radius and fail
/// normalisation, so the fixture needs some actual extent.
fn write_small_block_binvox(path: &std::path::Path, side: u32) {
    let side = side as usize;
    let mut native = vec![0_u8; side * side * side];
    let lo = side / 2 - 1;
    let hi = side / 2 + 1;
    for x in lo..hi {
        for y in lo..hi {
            for z in lo..hi {
                native[(y * side + z) * side + x] = 1;
            }
        }
    }

    let mut file = std::fs::File::create(path).unwrap();
    writeln!(file, "#binvox 1").unwrap();
    writeln!(file, "dim {side} {side} {side}").unwrap();
    writeln!(file, "translate 0 0 0").unwrap();
    writeln!(file, "scale 1").unwrap();
    writeln!(file, "data").unwrap();

    let size = native.len();
    let mut index = 0;
    while index < size {
        let value = native[index];
        let mut count = 0_usize;
        while index + count < size && count < 255 && native[index + count] == value {
            count += 1;
        }
        file.write_all(&[value, u8::try_from(count).unwrap()]).unwrap();
        index += count;
    }
}

#[test]
fn computes_and_caches_a_descriptor() {
    let dir = TempDir::new().unwrap();
    let voxel_path = dir.child("shape.binvox");
    write_small_block_binvox(voxel_path.path(), 8);

    Command::cargo_bin("zernike3d")
        .unwrap()
        .args([
            "--dir",
            dir.path().to_str().unwrap(),
            "--max-order",
            "2",
        ])
        .assert()
        .success();

    let inv_path = dir.child("shape.inv");
    let meta_path = dir.child("shape.inv.meta");
    assert!(inv_path.path().is_file());
    assert!(meta_path.path().is_file());

    let body = std::fs::read_to_string(inv_path.path()).unwrap();
    let mut fields = body.split_whitespace();
    let count: usize = fields.next().unwrap().parse().unwrap();
    assert_eq!(count, fields.count());

    // A second run over unchanged content must not fail; the driver should
    // recognise the cached result and skip recomputation.
    Command::cargo_bin("zernike3d")
        .unwrap()
        .args([
            "--dir",
            dir.path().to_str().unwrap(),
            "--max-order",
            "2",
        ])
        .assert()
        .success();
}

#[test]
fn empty_directory_succeeds_with_nothing_to_do() {
    let dir = TempDir::new().unwrap();

    Command::cargo_bin("zernike3d")
        .unwrap()
        .args([
            "--dir",
            dir.path().to_str().unwrap(),
            "--max-order",
            "4",
        ])
        .assert()
        .success();
}
