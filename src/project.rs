//! Pressure projection (discrete Helmholtz–Hodge decomposition).
//!
//! One projection removes the divergent part of the velocity field:
//! centered-difference divergence into a scratch field, a fixed-count
//! Gauss–Seidel solve of the pressure Poisson equation, then subtraction of
//! the discrete pressure gradient. Scalar boundary conditions are applied to
//! the scratch fields and the wall rule to velocity, matching the sweeps in
//! the other stages.
//!
//! The pressure scratch is reset to zero on every call, so a projection is a
//! pure function of the current velocity field rather than of the call
//! history.

use glam::Vec3;

use crate::boundary::{self, BoundaryRule};
use crate::grid::Grid3D;
use crate::relax;

/// Compute the centered-difference divergence of the velocity field into the
/// grid's divergence scratch, scaled by the physical cell spacing `h`.
pub fn compute_divergence(grid: &mut Grid3D, h: f32) {
    let n = grid.n();
    let m = grid.side();
    let idx = |x: usize, y: usize, z: usize| x * m * m + y * m + z;

    let velocity = &grid.velocity;
    let divergence = &mut grid.divergence;

    for x in 1..=n {
        for y in 1..=n {
            for z in 1..=n {
                let dx = velocity[idx(x + 1, y, z)].x - velocity[idx(x - 1, y, z)].x;
                let dy = velocity[idx(x, y + 1, z)].y - velocity[idx(x, y - 1, z)].y;
                let dz = velocity[idx(x, y, z + 1)].z - velocity[idx(x, y, z - 1)].z;
                divergence[idx(x, y, z)] = -0.5 * h * (dx + dy + dz);
            }
        }
    }

    boundary::fill_scalar(n, divergence);
}

/// Solve the pressure Poisson equation `sum6(p) - 6p = div` by fixed-count
/// relaxation, from a zeroed pressure scratch.
pub fn solve_pressure(grid: &mut Grid3D, iterations: usize) {
    let n = grid.n();
    grid.pressure.fill(0.0);
    boundary::fill_scalar(n, &mut grid.pressure);
    relax::relax_scalar(n, &mut grid.pressure, &grid.divergence, 1.0, 6.0, iterations);
}

/// Subtract the discrete pressure gradient from the velocity field and
/// re-apply the wall rule.
pub fn subtract_pressure_gradient(grid: &mut Grid3D, h: f32) {
    let n = grid.n();
    let m = grid.side();
    let idx = |x: usize, y: usize, z: usize| x * m * m + y * m + z;

    let pressure = &grid.pressure;
    let velocity = &mut grid.velocity;

    for x in 1..=n {
        for y in 1..=n {
            for z in 1..=n {
                let gx = 0.5 * (pressure[idx(x + 1, y, z)] - pressure[idx(x - 1, y, z)]) / h;
                let gy = 0.5 * (pressure[idx(x, y + 1, z)] - pressure[idx(x, y - 1, z)]) / h;
                let gz = 0.5 * (pressure[idx(x, y, z + 1)] - pressure[idx(x, y, z - 1)]) / h;
                velocity[idx(x, y, z)] -= Vec3::new(gx, gy, gz);
            }
        }
    }

    boundary::fill_vector(n, velocity, BoundaryRule::MirrorNormal);
}

/// Run one full projection: divergence, pressure solve, gradient subtraction.
///
/// `gap_size` is the physical extent of one cell times `N` (the domain
/// spacing parameter); the cell spacing used by the finite differences is
/// `h = gap_size / N`.
pub fn project(grid: &mut Grid3D, gap_size: f32, iterations: usize) {
    let h = gap_size / grid.n() as f32;
    compute_divergence(grid, h);
    solve_pressure(grid, iterations);
    subtract_pressure_gradient(grid, h);
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Largest interior divergence magnitude.
    fn max_divergence(grid: &mut Grid3D, h: f32) -> f32 {
        compute_divergence(grid, h);
        let n = grid.n();
        let m = grid.side();
        let mut max = 0.0f32;
        for x in 1..=n {
            for y in 1..=n {
                for z in 1..=n {
                    max = max.max(grid.divergence[x * m * m + y * m + z].abs());
                }
            }
        }
        max
    }

    /// Uniform outward radial velocity around the grid center.
    fn seed_radial(grid: &mut Grid3D) {
        let n = grid.n();
        let center = (n as f32 + 1.0) / 2.0;
        for x in 1..=n {
            for y in 1..=n {
                for z in 1..=n {
                    let r = Vec3::new(x as f32 - center, y as f32 - center, z as f32 - center);
                    let v = if r.length() > 1e-6 {
                        r.normalize()
                    } else {
                        Vec3::ZERO
                    };
                    grid.set_velocity(x, y, z, v);
                }
            }
        }
        boundary::fill_vector(n, &mut grid.velocity, BoundaryRule::MirrorNormal);
    }

    #[test]
    fn test_zero_velocity_projection_fixed_point() {
        let mut grid = Grid3D::new(6);
        project(&mut grid, 100.0, 4);

        assert!(grid.divergence.iter().all(|&d| d == 0.0));
        assert!(grid.pressure.iter().all(|&p| p == 0.0));
        assert!(grid.velocity.iter().all(|&v| v == Vec3::ZERO));
    }

    #[test]
    fn test_projection_reduces_divergence() {
        let mut grid = Grid3D::new(8);
        seed_radial(&mut grid);
        let h = 100.0 / 8.0;

        let before = max_divergence(&mut grid, h);
        assert!(before > 0.0, "radial seed should be divergent");

        project(&mut grid, 100.0, 20);

        let after = max_divergence(&mut grid, h);
        assert!(
            after < before * 0.5,
            "projection should materially reduce divergence: before={}, after={}",
            before,
            after
        );
    }

    #[test]
    fn test_divergence_reduction_improves_with_iterations() {
        let h = 100.0 / 8.0;
        let mut residuals = Vec::new();

        for iterations in [1usize, 4, 16, 64] {
            let mut grid = Grid3D::new(8);
            seed_radial(&mut grid);
            project(&mut grid, 100.0, iterations);
            residuals.push(max_divergence(&mut grid, h));
        }

        for pair in residuals.windows(2) {
            assert!(
                pair[1] <= pair[0] + 1e-6,
                "residual should not grow with more iterations: {:?}",
                residuals
            );
        }
        assert!(
            residuals.last().unwrap() < &(residuals[0] * 0.5),
            "residual should fall substantially from 1 to 64 iterations: {:?}",
            residuals
        );
    }

    #[test]
    fn test_pressure_solve_starts_from_scratch() {
        // Two identical projections on identical velocity fields must agree
        // exactly; stale pressure from an earlier call must not leak in.
        let mut a = Grid3D::new(6);
        seed_radial(&mut a);
        let mut b = a.clone();

        // Pollute b's pressure scratch before projecting.
        b.pressure.fill(123.0);

        project(&mut a, 50.0, 4);
        project(&mut b, 50.0, 4);

        assert_eq!(a.pressure, b.pressure);
        assert_eq!(a.velocity, b.velocity);
    }
}
