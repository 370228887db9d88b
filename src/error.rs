//! Error taxonomy for the solver.
//!
//! The kernel is closed numeric code, so the surface is small: configuration
//! problems are fatal at construction time, and out-of-range cell access is a
//! caller bug. Numeric degeneracy (NaN/inf from extreme velocities) is not
//! detected; callers needing robustness must clamp inputs externally.

use thiserror::Error;

/// Result alias used by the solver's fallible entry points.
pub type SolverResult<T> = Result<T, SolverError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// Rejected construction parameters. No default substitution is applied.
    #[error("invalid solver configuration: {0}")]
    InvalidConfig(String),

    /// Cell access outside `[0, side-1]^3`.
    #[error("cell ({x}, {y}, {z}) out of bounds for grid of side {side}")]
    IndexOutOfBounds {
        x: usize,
        y: usize,
        z: usize,
        side: usize,
    },
}
