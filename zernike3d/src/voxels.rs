//! The voxel grid data model the engine computes over.

use crate::convert::f64_from_usize;

/// A scalar type that can stand in for a voxel value.
///
/// The engine treats the grid as a real-valued density throughout, so any
/// source type only needs to say how it converts into that density.
pub trait VoxelValue: Copy {
    /// Converts this value into the real-valued working scalar.
    fn to_density(self) -> f64;
}

impl VoxelValue for bool {
    fn to_density(self) -> f64 {
        if self {
            1.0
        } else {
            0.0
        }
    }
}

impl VoxelValue for u8 {
    fn to_density(self) -> f64 {
        f64::from(self)
    }
}

impl VoxelValue for f32 {
    fn to_density(self) -> f64 {
        f64::from(self)
    }
}

impl VoxelValue for f64 {
    fn to_density(self) -> f64 {
        self
    }
}

/// A dense cubic voxel grid of side `side`, addressed `(x, y, z)` with the
/// canonical linear offset `(z * side + y) * side + x`.
#[derive(Clone, Debug, PartialEq)]
pub struct VoxelGrid {
    side: usize,
    data: Vec<f64>,
}

impl VoxelGrid {
    /// Builds an all-zero grid of the given side length.
    #[must_use]
    pub fn zeros(side: usize) -> Self {
        Self {
            side,
            data: vec![0.0; side * side * side],
        }
    }

    /// Builds a grid from `side^3` values in canonical `(z*side+y)*side+x`
    /// order, converting each through [`VoxelValue::to_density`].
    ///
    /// # Panics
    ///
    /// Panics if `values.len() != side^3`.
    #[must_use]
    pub fn from_values<T: VoxelValue>(side: usize, values: &[T]) -> Self {
        assert_eq!(
            values.len(),
            side * side * side,
            "voxel data length does not match side^3"
        );
        Self {
            side,
            data: values.iter().map(|v| v.to_density()).collect(),
        }
    }

    /// Builds a grid by evaluating `f(x, y, z)` at every voxel.
    #[must_use]
    pub fn from_fn(side: usize, mut f: impl FnMut(usize, usize, usize) -> f64) -> Self {
        let mut data = vec![0.0; side * side * side];
        for z in 0..side {
            for y in 0..side {
                for x in 0..side {
                    data[(z * side + y) * side + x] = f(x, y, z);
                }
            }
        }
        Self { side, data }
    }

    /// The edge length of the cube.
    #[must_use]
    pub const fn side(&self) -> usize {
        self.side
    }

    #[inline]
    fn offset(&self, x: usize, y: usize, z: usize) -> usize {
        (z * self.side + y) * self.side + x
    }

    /// Reads the density at `(x, y, z)`.
    #[must_use]
    pub fn get(&self, x: usize, y: usize, z: usize) -> f64 {
        self.data[self.offset(x, y, z)]
    }

    /// Writes the density at `(x, y, z)`.
    pub fn set(&mut self, x: usize, y: usize, z: usize, value: f64) {
        let i = self.offset(x, y, z);
        self.data[i] = value;
    }

    /// The number of occupied voxels, i.e. voxels whose density exceeds
    /// `threshold`.
    #[must_use]
    pub fn count_above(&self, threshold: f64) -> usize {
        self.data.iter().filter(|&&v| v > threshold).count()
    }

    /// The underlying dense buffer in canonical order.
    #[must_use]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// The voxel-space coordinate of index `i` along one axis, as a real
    /// number (`f64::from(i)` under the hood).
    #[must_use]
    pub fn axis_coordinate(i: usize) -> f64 {
        f64_from_usize(i)
    }
}
