//! Fixed-count Gauss–Seidel relaxation over the grid interior.
//!
//! Solves systems of the form `field(c) = (source(c) + a * sum6(c)) / denom`
//! where `sum6` is the six axis neighbors. Sweeps run in a fixed x, y, z
//! order and read the live buffer, so neighbors visited earlier in the same
//! sweep contribute their already-updated values. That ordering is part of
//! the numerical contract; parallelizing a sweep would silently turn this
//! into Jacobi iteration with different convergence behavior.
//!
//! Diffusion uses `a = dt * rate * N^2`, `denom = 1 + 6a`; the pressure
//! Poisson solve uses `a = 1`, `denom = 6`.

use glam::Vec3;

use crate::boundary::{self, BoundaryRule};

/// Relax a scalar field for `iterations` full sweeps, re-applying scalar
/// boundary conditions after each sweep.
pub fn relax_scalar(
    n: usize,
    field: &mut [f32],
    source: &[f32],
    a: f32,
    denom: f32,
    iterations: usize,
) {
    let m = n + 2;
    let idx = |x: usize, y: usize, z: usize| x * m * m + y * m + z;

    for _ in 0..iterations {
        for x in 1..=n {
            for y in 1..=n {
                for z in 1..=n {
                    let sum = field[idx(x - 1, y, z)]
                        + field[idx(x + 1, y, z)]
                        + field[idx(x, y - 1, z)]
                        + field[idx(x, y + 1, z)]
                        + field[idx(x, y, z - 1)]
                        + field[idx(x, y, z + 1)];
                    field[idx(x, y, z)] = (source[idx(x, y, z)] + a * sum) / denom;
                }
            }
        }
        boundary::fill_scalar(n, field);
    }
}

/// Relax a vector field for `iterations` full sweeps, re-applying the given
/// boundary rule after each sweep.
pub fn relax_vector(
    n: usize,
    field: &mut [Vec3],
    source: &[Vec3],
    a: f32,
    denom: f32,
    iterations: usize,
    rule: BoundaryRule,
) {
    let m = n + 2;
    let idx = |x: usize, y: usize, z: usize| x * m * m + y * m + z;

    for _ in 0..iterations {
        for x in 1..=n {
            for y in 1..=n {
                for z in 1..=n {
                    let sum = field[idx(x - 1, y, z)]
                        + field[idx(x + 1, y, z)]
                        + field[idx(x, y - 1, z)]
                        + field[idx(x, y + 1, z)]
                        + field[idx(x, y, z - 1)]
                        + field[idx(x, y, z + 1)];
                    field[idx(x, y, z)] = (source[idx(x, y, z)] + sum * a) / denom;
                }
            }
        }
        boundary::fill_vector(n, field, rule);
    }
}
