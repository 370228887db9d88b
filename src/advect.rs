//! Semi-Lagrangian advection with trilinear resampling.
//!
//! Each interior cell traces its velocity backward over the time step,
//! clamps the traced position into the interpolation stencil, samples the
//! field's previous buffer at the eight surrounding lattice points, and
//! writes the blend into the current buffer. The `dt * N` scaling converts
//! the physical time step into grid units (one grid unit = domain / N).
//!
//! Single-precision throughout, with no NaN/infinity guard: pathological
//! velocity inputs propagate silently.

use std::ops::{Add, Mul};

use glam::Vec3;

use crate::boundary::{self, BoundaryRule};

/// Clamp a backtraced coordinate into `[0.5, N + 0.5]`, the span covered by
/// the interior plus one boundary layer. A hard clamp, not a reflection.
#[inline]
fn clamp_backtrace(value: f32, n: usize) -> f32 {
    value.clamp(0.5, n as f32 + 0.5)
}

/// Trilinear sample of `prev` at a clamped position.
fn sample<T>(m: usize, prev: &[T], x: f32, y: f32, z: f32) -> T
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T>,
{
    let idx = |x: usize, y: usize, z: usize| x * m * m + y * m + z;

    let i0 = x as usize;
    let j0 = y as usize;
    let k0 = z as usize;
    let (i1, j1, k1) = (i0 + 1, j0 + 1, k0 + 1);

    let s1 = x - i0 as f32;
    let s0 = 1.0 - s1;
    let t1 = y - j0 as f32;
    let t0 = 1.0 - t1;
    let u1 = z - k0 as f32;
    let u0 = 1.0 - u1;

    let lower = (prev[idx(i0, j0, k0)] * u0 + prev[idx(i0, j0, k1)] * u1) * t0
        + (prev[idx(i0, j1, k0)] * u0 + prev[idx(i0, j1, k1)] * u1) * t1;
    let upper = (prev[idx(i1, j0, k0)] * u0 + prev[idx(i1, j0, k1)] * u1) * t0
        + (prev[idx(i1, j1, k0)] * u0 + prev[idx(i1, j1, k1)] * u1) * t1;

    lower * s0 + upper * s1
}

/// Advect a scalar field through the velocity field, then re-apply scalar
/// boundary conditions.
pub fn advect_scalar(n: usize, dt: f32, field: &mut [f32], prev: &[f32], velocity: &[Vec3]) {
    let m = n + 2;
    let dt0 = dt * n as f32;
    let idx = |x: usize, y: usize, z: usize| x * m * m + y * m + z;

    for x in 1..=n {
        for y in 1..=n {
            for z in 1..=n {
                let i = idx(x, y, z);
                let v = velocity[i];
                let px = clamp_backtrace(x as f32 - v.x * dt0, n);
                let py = clamp_backtrace(y as f32 - v.y * dt0, n);
                let pz = clamp_backtrace(z as f32 - v.z * dt0, n);
                field[i] = sample(m, prev, px, py, pz);
            }
        }
    }

    boundary::fill_scalar(n, field);
}

/// Advect the velocity field through itself, then re-apply the wall rule.
///
/// Both the backtrace velocity and the sampled values come from `prev`; the
/// current buffer is write-only here, so the in-place sweep is well defined.
pub fn advect_vector(n: usize, dt: f32, field: &mut [Vec3], prev: &[Vec3]) {
    let m = n + 2;
    let dt0 = dt * n as f32;
    let idx = |x: usize, y: usize, z: usize| x * m * m + y * m + z;

    for x in 1..=n {
        for y in 1..=n {
            for z in 1..=n {
                let i = idx(x, y, z);
                let v = prev[i];
                let px = clamp_backtrace(x as f32 - v.x * dt0, n);
                let py = clamp_backtrace(y as f32 - v.y * dt0, n);
                let pz = clamp_backtrace(z as f32 - v.z * dt0, n);
                field[i] = sample(m, prev, px, py, pz);
            }
        }
    }

    boundary::fill_vector(n, field, BoundaryRule::MirrorNormal);
}
