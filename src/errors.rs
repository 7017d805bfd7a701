//! Failure kinds for the RTIN engine's two validation boundaries.

use thiserror::Error;

/// Argument-validation failures surfaced by [`crate::tileset::Tileset`] and
/// [`crate::error_map::ErrorMap`].
///
/// Both variants are caller errors: they are raised once at the API
/// boundary and are never retried internally.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RtinError {
    /// `grid_size - 1` is not a positive power of two, or `grid_size` is
    /// outside the supported range.
    #[error(
        "invalid grid size {grid_size}: grid_size - 1 must be a positive power of two, \
         and grid_size must not exceed {max}"
    )]
    InvalidGridSize { grid_size: usize, max: usize },

    /// A heightmap was bound to a tileset whose vertex count it does not match.
    #[error(
        "heightmap size mismatch: expected {expected} elevations ({grid_size} x {grid_size}), got {actual}"
    )]
    HeightmapSizeMismatch {
        grid_size: usize,
        expected: usize,
        actual: usize,
    },
}

pub type Result<T> = std::result::Result<T, RtinError>;
