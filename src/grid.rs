//! Cell-centered cuboid grid for the stable-fluids solver.
//!
//! The grid holds an `N^3` interior wrapped in a one-cell ghost shell, so the
//! full side length is `M = N + 2`. All per-cell state lives in flat
//! struct-of-arrays storage indexed by `x*M*M + y*M + z` (x-major). Boundary
//! cells are never advanced directly; they are recomputed from interior
//! neighbors after every sweep (see the `boundary` module).

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{SolverError, SolverResult};

/// 3D cell grid with double-buffered density and velocity fields.
///
/// `velocity_prev` / `density_prev` are strict double-buffers: a stage reads
/// one buffer and writes the other, and the simulator exchanges them with
/// [`Grid3D::swap_velocity`] / [`Grid3D::swap_density`] between stages.
/// `pressure` and `divergence` are scratch fields owned by the projection.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Grid3D {
    /// Interior resolution per axis.
    n: usize,
    /// Full side length including the ghost shell (`n + 2`).
    m: usize,

    /// Current velocity per cell.
    pub velocity: Vec<Vec3>,
    /// Previous-step velocity (advection/diffusion source buffer).
    pub velocity_prev: Vec<Vec3>,
    /// Current density per cell.
    pub density: Vec<f32>,
    /// Previous-step density.
    pub density_prev: Vec<f32>,
    /// Pressure scratch for the projection solve.
    pub pressure: Vec<f32>,
    /// Velocity-divergence scratch for the projection solve.
    pub divergence: Vec<f32>,
}

impl Grid3D {
    /// Create a zero-initialized grid with interior resolution `n`.
    pub fn new(n: usize) -> Self {
        assert!(n >= 1, "grid interior resolution must be >= 1, got {}", n);
        let m = n + 2;
        let cell_count = m * m * m;

        Self {
            n,
            m,
            velocity: vec![Vec3::ZERO; cell_count],
            velocity_prev: vec![Vec3::ZERO; cell_count],
            density: vec![0.0; cell_count],
            density_prev: vec![0.0; cell_count],
            pressure: vec![0.0; cell_count],
            divergence: vec![0.0; cell_count],
        }
    }

    /// Interior resolution per axis.
    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Full side length including the ghost shell.
    #[inline]
    pub fn side(&self) -> usize {
        self.m
    }

    /// Total cell count (`side^3`).
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.m * self.m * self.m
    }

    /// Linear index of cell `(x, y, z)`, x-major.
    ///
    /// Panics in debug builds on out-of-range coordinates; use
    /// [`Grid3D::try_index`] for a checked variant.
    #[inline]
    pub fn cell_index(&self, x: usize, y: usize, z: usize) -> usize {
        debug_assert!(
            x < self.m && y < self.m && z < self.m,
            "cell ({}, {}, {}) out of bounds for side {}",
            x,
            y,
            z,
            self.m
        );
        x * self.m * self.m + y * self.m + z
    }

    /// Checked linear index of cell `(x, y, z)`.
    #[inline]
    pub fn try_index(&self, x: usize, y: usize, z: usize) -> SolverResult<usize> {
        if x < self.m && y < self.m && z < self.m {
            Ok(x * self.m * self.m + y * self.m + z)
        } else {
            Err(SolverError::IndexOutOfBounds {
                x,
                y,
                z,
                side: self.m,
            })
        }
    }

    /// True if `(x, y, z)` lies on the outer shell.
    #[inline]
    pub fn is_boundary(&self, x: usize, y: usize, z: usize) -> bool {
        let hi = self.m - 1;
        x == 0 || y == 0 || z == 0 || x == hi || y == hi || z == hi
    }

    // ========== Read accessors ==========

    /// Density at `(x, y, z)`. Panics on out-of-range coordinates.
    #[inline]
    pub fn density_at(&self, x: usize, y: usize, z: usize) -> f32 {
        self.density[self.checked_index(x, y, z)]
    }

    /// Velocity at `(x, y, z)`. Panics on out-of-range coordinates.
    #[inline]
    pub fn velocity_at(&self, x: usize, y: usize, z: usize) -> Vec3 {
        self.velocity[self.checked_index(x, y, z)]
    }

    /// Checked density lookup.
    pub fn try_density_at(&self, x: usize, y: usize, z: usize) -> SolverResult<f32> {
        Ok(self.density[self.try_index(x, y, z)?])
    }

    /// Checked velocity lookup.
    pub fn try_velocity_at(&self, x: usize, y: usize, z: usize) -> SolverResult<Vec3> {
        Ok(self.velocity[self.try_index(x, y, z)?])
    }

    // ========== Writers (host seeding / sources) ==========

    /// Set the density of a cell. Panics on out-of-range coordinates.
    pub fn set_density(&mut self, x: usize, y: usize, z: usize, value: f32) {
        let idx = self.checked_index(x, y, z);
        self.density[idx] = value;
    }

    /// Set the velocity of a cell. Panics on out-of-range coordinates.
    pub fn set_velocity(&mut self, x: usize, y: usize, z: usize, value: Vec3) {
        let idx = self.checked_index(x, y, z);
        self.velocity[idx] = value;
    }

    // ========== Double-buffer exchange ==========

    /// Exchange the current and previous velocity buffers.
    pub fn swap_velocity(&mut self) {
        std::mem::swap(&mut self.velocity, &mut self.velocity_prev);
    }

    /// Exchange the current and previous density buffers.
    pub fn swap_density(&mut self) {
        std::mem::swap(&mut self.density, &mut self.density_prev);
    }

    #[inline]
    fn checked_index(&self, x: usize, y: usize, z: usize) -> usize {
        assert!(
            x < self.m && y < self.m && z < self.m,
            "cell ({}, {}, {}) out of bounds for side {}",
            x,
            y,
            z,
            self.m
        );
        x * self.m * self.m + y * self.m + z
    }
}
