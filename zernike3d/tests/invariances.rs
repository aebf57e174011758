#![allow(missing_docs)]

use float_cmp::assert_approx_eq;
use rand::Rng;
use rand_pcg::Pcg64;
use zernike3d::{descriptor_compute, VoxelGrid};

fn noisy_ball(side: usize, radius: f64, seed: u128) -> VoxelGrid {
    let centre = (side as f64 - 1.0) / 2.0;
    let mut rng = Pcg64::new(seed, 0xa02_bdbf_7bb3_c0a7_ac28_fa16_a64a_bf96);
    let jitter: Vec<f64> = (0..side * side * side)
        .map(|_| rng.gen::<f64>() * 0.05)
        .collect();
    VoxelGrid::from_fn(side, move |x, y, z| {
        let dx = x as f64 - centre;
        let dy = y as f64 - centre;
        let dz = z as f64 - centre;
        let inside = dx * dx + dy * dy + dz * dz <= radius * radius;
        let i = (z * side + y) * side + x;
        if inside {
            1.0
        } else {
            jitter[i]
        }
    })
}

/// A permutation of a grid's voxel axes that corresponds to an exact
/// multiple of a 90-degree rotation, so resampling introduces no
/// interpolation error and the comparison can be tight.
fn rotate_90_about_z(grid: &VoxelGrid) -> VoxelGrid {
    let side = grid.side();
    VoxelGrid::from_fn(side, |x, y, z| {
        // (x, y) -> (y, side-1-x) is a 90-degree rotation in the xy-plane.
        grid.get(y, side - 1 - x, z)
    })
}

fn axis_aligned_cube(side: usize, half_extent: usize) -> VoxelGrid {
    let c = side / 2;
    VoxelGrid::from_fn(side, move |x, y, z| {
        let in_range =
            |v: usize| v + half_extent >= c && v < c + half_extent;
        f64::from(u8::from(in_range(x) && in_range(y) && in_range(z)))
    })
}

#[test]
fn rotation_about_z_leaves_invariants_unchanged() {
    let side = 32;
    let cube = axis_aligned_cube(side, 10);
    let rotated = rotate_90_about_z(&cube);

    let a = descriptor_compute(&cube, side, 4).unwrap();
    let b = descriptor_compute(&rotated, side, 4).unwrap();

    assert_eq!(a.invariants.len(), b.invariants.len());
    for (x, y) in a.invariants.iter().zip(b.invariants.iter()) {
        let scale = x.abs().max(1e-12);
        assert_approx_eq!(f64, *x / scale, *y / scale, epsilon = 1e-6);
    }
}

#[test]
fn rotation_is_invariant_on_irregular_content_too() {
    let side = 24;
    let grid = noisy_ball(side, 8.0, 7);
    let rotated = rotate_90_about_z(&grid);

    let a = descriptor_compute(&grid, side, 3).unwrap();
    let b = descriptor_compute(&rotated, side, 3).unwrap();

    for (x, y) in a.invariants.iter().zip(b.invariants.iter()) {
        let scale = x.abs().max(1e-9);
        assert!(
            ((x - y) / scale).abs() < 1e-6,
            "x={x} y={y} diverge beyond tolerance"
        );
    }
}

#[test]
fn scaling_voxel_values_scales_the_invariant_vector() {
    let side = 24;
    let grid = axis_aligned_cube(side, 8);
    let lambda = 3.5;
    let scaled = VoxelGrid::from_fn(side, |x, y, z| lambda * grid.get(x, y, z));

    let a = descriptor_compute(&grid, side, 4).unwrap();
    let b = descriptor_compute(&scaled, side, 4).unwrap();

    for (x, y) in a.invariants.iter().zip(b.invariants.iter()) {
        assert_approx_eq!(f64, lambda * x, *y, epsilon = 1e-6 * x.abs().max(1.0));
    }

    // Ratios between invariants are scale-invariant.
    if a.invariants[0].abs() > 1e-9 {
        for i in 1..a.invariants.len() {
            let ratio_a = a.invariants[i] / a.invariants[0];
            let ratio_b = b.invariants[i] / b.invariants[0];
            assert_approx_eq!(f64, ratio_a, ratio_b, epsilon = 1e-6);
        }
    }
}

#[test]
fn random_sample_of_orders_all_produce_finite_invariants() {
    let mut rng = Pcg64::new(0x1234_5678, 0x9abc_def0_1234_5678_9abc_def0_1234_5678);
    let grid = axis_aligned_cube(20, 6);

    for _ in 0..5 {
        let order = (rng.gen::<f64>() * 12.0) as usize;
        let descriptor = descriptor_compute(&grid, 20, order).unwrap();
        assert!(descriptor.invariants.iter().all(|v| v.is_finite()));
    }
}
