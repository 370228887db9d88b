//! Ghost-shell boundary handling.
//!
//! Every relaxation/advection sweep only touches interior cells, leaving the
//! outer shell stale. These routines rebuild the shell: the six faces first
//! (one pass per axis, each boundary plane cell copying its neighbor one step
//! inward along that axis), then the eight corners, each set to the mean of
//! its three axis-adjacent boundary-edge cells. Interior cells are never
//! touched.
//!
//! Scalar fields use a zero-gradient copy. The velocity field mirrors the
//! component normal to each face (no-penetration wall) and copies the
//! tangential components.

use glam::Vec3;

/// Per-field reflection policy for the face passes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BoundaryRule {
    /// Zero-gradient: the ghost cell copies its inward neighbor unchanged.
    Copy,
    /// Wall: the component normal to the face is negated on copy.
    MirrorNormal,
}

#[inline]
fn plane_cell(axis: usize, a: usize, u: usize, v: usize) -> (usize, usize, usize) {
    match axis {
        0 => (a, u, v),
        1 => (u, a, v),
        _ => (u, v, a),
    }
}

/// Rebuild the shell of a scalar field (density, pressure, divergence).
pub fn fill_scalar(n: usize, field: &mut [f32]) {
    let m = n + 2;
    let hi = m - 1;
    let idx = |x: usize, y: usize, z: usize| x * m * m + y * m + z;

    for axis in 0..3 {
        for u in 0..m {
            for v in 0..m {
                let (x, y, z) = plane_cell(axis, 0, u, v);
                let (sx, sy, sz) = plane_cell(axis, 1, u, v);
                field[idx(x, y, z)] = field[idx(sx, sy, sz)];

                let (x, y, z) = plane_cell(axis, hi, u, v);
                let (sx, sy, sz) = plane_cell(axis, n, u, v);
                field[idx(x, y, z)] = field[idx(sx, sy, sz)];
            }
        }
    }

    for &cx in &[0, hi] {
        for &cy in &[0, hi] {
            for &cz in &[0, hi] {
                let nx = if cx == 0 { 1 } else { n };
                let ny = if cy == 0 { 1 } else { n };
                let nz = if cz == 0 { 1 } else { n };
                field[idx(cx, cy, cz)] = (field[idx(nx, cy, cz)]
                    + field[idx(cx, ny, cz)]
                    + field[idx(cx, cy, nz)])
                    / 3.0;
            }
        }
    }
}

/// Rebuild the shell of a vector field.
///
/// With [`BoundaryRule::MirrorNormal`] the face-normal component flips sign;
/// corners always average all three components.
pub fn fill_vector(n: usize, field: &mut [Vec3], rule: BoundaryRule) {
    let m = n + 2;
    let hi = m - 1;
    let idx = |x: usize, y: usize, z: usize| x * m * m + y * m + z;

    for axis in 0..3 {
        for u in 0..m {
            for v in 0..m {
                for (a, src_a) in [(0, 1), (hi, n)] {
                    let (x, y, z) = plane_cell(axis, a, u, v);
                    let (sx, sy, sz) = plane_cell(axis, src_a, u, v);
                    let mut value = field[idx(sx, sy, sz)];
                    if rule == BoundaryRule::MirrorNormal {
                        value[axis] = -value[axis];
                    }
                    field[idx(x, y, z)] = value;
                }
            }
        }
    }

    for &cx in &[0, hi] {
        for &cy in &[0, hi] {
            for &cz in &[0, hi] {
                let nx = if cx == 0 { 1 } else { n };
                let ny = if cy == 0 { 1 } else { n };
                let nz = if cz == 0 { 1 } else { n };
                field[idx(cx, cy, cz)] = (field[idx(nx, cy, cz)]
                    + field[idx(cx, ny, cz)]
                    + field[idx(cx, cy, nz)])
                    / 3.0;
            }
        }
    }
}
